//! Conditional checkmarks and the payment line.
//!
//! Room categories carry two independent selections: the room class (from
//! the code prefix) and the tier (the exact code). Each selection activates
//! at most one position from its own predicate table.

use std::str::FromStr;

use super::layout::{Field, PlacementDescriptor};
use crate::reservation::ResolvedPayment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomClass {
    ExecutiveSuite,
    BusinessRoom,
}

impl RoomClass {
    pub const ALL: [RoomClass; 2] = [RoomClass::ExecutiveSuite, RoomClass::BusinessRoom];

    pub const fn prefix(self) -> &'static str {
        match self {
            RoomClass::ExecutiveSuite => "ES-",
            RoomClass::BusinessRoom => "BR-",
        }
    }

    pub fn from_category(category: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| category.starts_with(class.prefix()))
    }
}

/// The five bookable room tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomTier {
    ExecutiveA,
    ExecutiveB,
    BusinessA,
    BusinessB1,
    BusinessB2,
}

impl RoomTier {
    pub const ALL: [RoomTier; 5] = [
        RoomTier::ExecutiveA,
        RoomTier::ExecutiveB,
        RoomTier::BusinessA,
        RoomTier::BusinessB1,
        RoomTier::BusinessB2,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            RoomTier::ExecutiveA => "ES-A",
            RoomTier::ExecutiveB => "ES-B",
            RoomTier::BusinessA => "BR-A",
            RoomTier::BusinessB1 => "BR-B1",
            RoomTier::BusinessB2 => "BR-B2",
        }
    }

    pub const fn room_class(self) -> RoomClass {
        match self {
            RoomTier::ExecutiveA | RoomTier::ExecutiveB => RoomClass::ExecutiveSuite,
            _ => RoomClass::BusinessRoom,
        }
    }
}

impl FromStr for RoomTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|tier| tier.code() == s).ok_or(())
    }
}

/// The two selections derived from a category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategorySelection {
    pub room_class: Option<RoomClass>,
    pub tier: Option<RoomTier>,
}

impl CategorySelection {
    pub fn resolve(category: Option<&str>) -> Self {
        let Some(category) = category else {
            return Self::default();
        };
        Self {
            room_class: RoomClass::from_category(category),
            tier: category.parse().ok(),
        }
    }
}

pub const CLASS_MARKS: [(RoomClass, PlacementDescriptor); 2] = [
    (RoomClass::ExecutiveSuite, PlacementDescriptor::mark(0, 260.0, 550.0)),
    (RoomClass::BusinessRoom, PlacementDescriptor::mark(0, 395.0, 550.0)),
];

pub const TIER_MARKS: [(RoomTier, PlacementDescriptor); 5] = [
    (RoomTier::ExecutiveA, PlacementDescriptor::mark(0, 260.0, 483.0)),
    (RoomTier::ExecutiveB, PlacementDescriptor::mark(0, 260.0, 465.0)),
    (RoomTier::BusinessA, PlacementDescriptor::mark(0, 480.0, 482.0)),
    (RoomTier::BusinessB1, PlacementDescriptor::mark(0, 480.0, 462.0)),
    (RoomTier::BusinessB2, PlacementDescriptor::mark(0, 480.0, 445.0)),
];

// Both tables are indexed by enum discriminant.
pub fn class_mark(class: RoomClass) -> PlacementDescriptor {
    CLASS_MARKS[class as usize].1
}

pub fn tier_mark(tier: RoomTier) -> PlacementDescriptor {
    TIER_MARKS[tier as usize].1
}

/// Mark positions activated by a category, class mark first.
pub fn resolve_marks(category: Option<&str>) -> Vec<(Field, PlacementDescriptor)> {
    let selection = CategorySelection::resolve(category);
    let mut marks = Vec::with_capacity(2);
    if let Some(class) = selection.room_class {
        marks.push((Field::ClassMark, class_mark(class)));
    }
    if let Some(tier) = selection.tier {
        marks.push((Field::TierMark, tier_mark(tier)));
    }
    marks
}

pub const PAID_BY_GUEST: &str = "YES";
pub const NOT_PAID_BY_GUEST: &str = "NO";

/// Text for the "charges paid by the guest" line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLine {
    pub label: &'static str,
    /// Sponsor name, only when someone other than the guest pays.
    pub source_name: Option<String>,
}

pub fn resolve_payment_line(payment: &ResolvedPayment) -> PaymentLine {
    if payment.is_guest_paid() {
        return PaymentLine {
            label: PAID_BY_GUEST,
            source_name: None,
        };
    }
    PaymentLine {
        label: NOT_PAID_BY_GUEST,
        source_name: payment.source_name.clone(),
    }
}
