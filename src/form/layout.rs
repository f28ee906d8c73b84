//! Field placement table for the registration form template.
//!
//! Coordinates are PDF user-space points with the origin at the bottom-left
//! corner of the page. Mutually exclusive mark positions live next to their
//! predicates in [`super::marks`].

/// Which embedded font a placement draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontRef {
    Body,
    Symbol,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

pub const BLACK: Rgb = Rgb {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};

/// Where and how one field's value is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementDescriptor {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub font: FontRef,
    pub size: f32,
    pub color: Rgb,
    pub max_width: Option<f32>,
    pub line_height: Option<f32>,
    /// Draw the symbol font's checkmark instead of the value.
    pub glyph_mark: bool,
}

impl PlacementDescriptor {
    /// Body-font text at the default size.
    pub const fn text(page: usize, x: f32, y: f32) -> Self {
        Self {
            page,
            x,
            y,
            font: FontRef::Body,
            size: DEFAULT_FONT_SIZE,
            color: BLACK,
            max_width: None,
            line_height: None,
            glyph_mark: false,
        }
    }

    /// Checkmark glyph from the symbol font.
    pub const fn mark(page: usize, x: f32, y: f32) -> Self {
        Self {
            font: FontRef::Symbol,
            glyph_mark: true,
            ..Self::text(page, x, y)
        }
    }

    pub const fn sized(self, size: f32) -> Self {
        Self { size, ..self }
    }

    pub const fn wrapped(self, max_width: f32, line_height: f32) -> Self {
        Self {
            max_width: Some(max_width),
            line_height: Some(line_height),
            ..self
        }
    }

    /// The same placement moved `dy` points down the page.
    pub fn shifted_down(self, dy: f32) -> Self {
        Self {
            y: self.y - dy,
            ..self
        }
    }
}

/// Image box for embedded pictures (signatures).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Logical fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    GuestName,
    GuestGender,
    Address,
    ContactNumber,
    NumberOfGuests,
    NumberOfRooms,
    RoomType,
    ArrivalDate,
    ArrivalTime,
    DepartureDate,
    DepartureTime,
    Purpose,
    ClassMark,
    TierMark,
    PaymentLine,
    SourceName,
    ApprovalAttached,
    ConfirmedRoomNo,
    EntrySerialNo,
    EntryPageNo,
    EntryDate,
    BookingDate,
    CheckInTime,
    CheckOutTime,
    Remarks,
    ApplicantName,
    ApplicantDesignation,
    ApplicantDepartment,
    ApplicantCode,
    ApplicantMobile,
    ApplicationDate,
    SignatureText,
    SignatureImage,
    ReviewerRole(usize),
}

/// Static placements for every text field of the form.
pub const FORM_LAYOUT: &[(Field, PlacementDescriptor)] = &[
    (Field::GuestName, PlacementDescriptor::text(0, 210.0, 698.0)),
    (Field::GuestGender, PlacementDescriptor::text(0, 470.0, 698.0)),
    (Field::Address, PlacementDescriptor::text(0, 210.0, 680.0)),
    (Field::ContactNumber, PlacementDescriptor::text(0, 160.0, 661.0)),
    (Field::NumberOfGuests, PlacementDescriptor::text(0, 330.0, 661.0)),
    (Field::NumberOfRooms, PlacementDescriptor::text(0, 520.0, 661.0)),
    (Field::RoomType, PlacementDescriptor::text(0, 365.0, 643.0)),
    (Field::ArrivalDate, PlacementDescriptor::text(0, 88.0, 605.0)),
    (Field::ArrivalTime, PlacementDescriptor::text(0, 200.0, 605.0)),
    (Field::DepartureDate, PlacementDescriptor::text(0, 330.0, 605.0)),
    (Field::DepartureTime, PlacementDescriptor::text(0, 450.0, 605.0)),
    (Field::Purpose, PlacementDescriptor::text(0, 200.0, 575.0)),
    (Field::PaymentLine, PlacementDescriptor::text(0, 385.0, 339.0)),
    (Field::SourceName, PlacementDescriptor::text(0, 400.0, 325.0)),
    (Field::ApprovalAttached, PlacementDescriptor::text(0, 450.0, 311.0)),
    (Field::ConfirmedRoomNo, PlacementDescriptor::text(0, 70.0, 100.0)),
    (Field::EntrySerialNo, PlacementDescriptor::text(0, 130.0, 100.0)),
    (Field::EntryPageNo, PlacementDescriptor::text(0, 180.0, 100.0)),
    (Field::EntryDate, PlacementDescriptor::text(0, 213.0, 100.0)),
    (Field::BookingDate, PlacementDescriptor::text(0, 285.0, 105.0)),
    (Field::CheckInTime, PlacementDescriptor::text(0, 355.0, 107.0)),
    (Field::CheckOutTime, PlacementDescriptor::text(0, 355.0, 94.0)),
    (
        Field::Remarks,
        PlacementDescriptor::text(0, 420.0, 105.0)
            .sized(11.0)
            .wrapped(350.0, 14.0),
    ),
    (Field::ApplicantName, PlacementDescriptor::text(0, 55.0, 215.0)),
    (Field::ApplicantDesignation, PlacementDescriptor::text(0, 155.0, 215.0)),
    (Field::ApplicantDepartment, PlacementDescriptor::text(0, 255.0, 215.0)),
    (Field::ApplicantCode, PlacementDescriptor::text(0, 340.0, 215.0)),
    (Field::ApplicantMobile, PlacementDescriptor::text(0, 440.0, 215.0)),
    (Field::ApplicationDate, PlacementDescriptor::text(0, 88.0, 190.0)),
    (Field::SignatureText, PlacementDescriptor::text(0, 440.0, 185.0)),
];

/// First reviewer line on the approvals page; later entries step down.
pub const REVIEWER_ORIGIN: PlacementDescriptor = PlacementDescriptor::text(1, 55.0, 600.0);
pub const REVIEWER_LINE_STEP: f32 = 20.0;

/// Signature box for images sent as data URLs.
pub const SIGNATURE_DATA_URL_IMAGE: ImagePlacement = ImagePlacement {
    page: 0,
    x: 415.0,
    y: 173.0,
    width: 120.0,
    height: 40.0,
};

/// Signature box for raw image bytes and bare base64, level with text
/// signatures.
pub const SIGNATURE_INLINE_IMAGE: ImagePlacement = ImagePlacement {
    page: 0,
    x: 440.0,
    y: 185.0,
    width: 120.0,
    height: 40.0,
};

/// Look up the placement for a text field.
///
/// Mark fields resolve through the predicate tables and reviewer lines
/// through [`reviewer_placement`], so they have no entry here.
pub fn placement(field: Field) -> Option<PlacementDescriptor> {
    match field {
        Field::ReviewerRole(index) => Some(reviewer_placement(index)),
        _ => FORM_LAYOUT
            .iter()
            .find(|(key, _)| *key == field)
            .map(|(_, descriptor)| *descriptor),
    }
}

pub fn reviewer_placement(index: usize) -> PlacementDescriptor {
    REVIEWER_ORIGIN.shifted_down(index as f32 * REVIEWER_LINE_STEP)
}
