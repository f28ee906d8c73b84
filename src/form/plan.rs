//! Render plans: the resolved list of draws for one generation.

use super::layout::{placement, Field, ImagePlacement, PlacementDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text, or the checkmark glyph when the placement is a glyph mark.
    Field {
        field: Field,
        placement: PlacementDescriptor,
        value: String,
    },
    /// Encoded image bytes (PNG/JPEG) scaled into the placement box.
    Image {
        field: Field,
        placement: ImagePlacement,
        bytes: Vec<u8>,
    },
}

impl DrawOp {
    pub fn field(&self) -> Field {
        match self {
            DrawOp::Field { field, .. } | DrawOp::Image { field, .. } => *field,
        }
    }

    pub fn page(&self) -> usize {
        match self {
            DrawOp::Field { placement, .. } => placement.page,
            DrawOp::Image { placement, .. } => placement.page,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderPlan {
    ops: Vec<DrawOp>,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text field at its layout position. Empty values draw nothing.
    pub fn text(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        match placement(field) {
            Some(placement) => self.ops.push(DrawOp::Field {
                field,
                placement,
                value,
            }),
            None => log::warn!("No layout entry for {:?}; value skipped", field),
        }
    }

    pub fn mark(&mut self, field: Field, placement: PlacementDescriptor) {
        self.ops.push(DrawOp::Field {
            field,
            placement,
            value: String::new(),
        });
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Text queued for a field, if any.
    pub fn value_of(&self, field: Field) -> Option<&str> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Field {
                field: f, value, ..
            } if *f == field => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn placement_of(&self, field: Field) -> Option<PlacementDescriptor> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Field {
                field: f,
                placement,
                ..
            } if *f == field => Some(*placement),
            _ => None,
        })
    }

    pub fn contains(&self, field: Field) -> bool {
        self.ops.iter().any(|op| op.field() == field)
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
    }

    /// Highest page index any draw targets.
    pub fn last_page(&self) -> Option<usize> {
        self.ops.iter().map(DrawOp::page).max()
    }
}
