//! Registration form generation - overlays a reservation onto the PDF template.
//!
//! Modules, leaf first:
//! - `resources` - fetches the template and font bytes for one generation
//! - `common` - date formatting and value coercion
//! - `layout` / `marks` - where each field and checkmark goes
//! - `signature` - decoding the applicant's signature
//! - `fonts` / `renderer` / `engine` - drawing onto the template with lopdf
//! - `registration_form` - builds the render plan and owns generate/update

pub mod common;
pub mod engine;
pub mod fonts;
pub mod handlers;
pub mod layout;
pub mod marks;
pub mod plan;
pub mod registration_form;
pub mod renderer;
pub mod resources;
pub mod signature;
pub mod traits;
pub mod validation;

pub use engine::PdfOverlayEngine;
pub use plan::{DrawOp, RenderPlan};
pub use registration_form::RegistrationFormGenerator;
pub use resources::{ResourceLoader, ResourceLocations, ResourceSource, TemplateResources};
pub use traits::{Generator, Validator};

use thiserror::Error;

/// A template or font could not be retrieved.
#[derive(Debug, Error)]
pub enum ResourceFetchError {
    #[error("request for {location} failed: {source}")]
    Request {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{location} responded with HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResourceFetchError {
    pub fn location(&self) -> &str {
        match self {
            ResourceFetchError::Request { location, .. }
            | ResourceFetchError::Status { location, .. }
            | ResourceFetchError::Io { location, .. } => location,
        }
    }
}

/// Failure confined to one drawn element (the signature image).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed data URL")]
    MalformedDataUrl,
    #[error("signature carries no image data")]
    MissingData,
    #[error("invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to compress image data: {0}")]
    Compress(#[from] std::io::Error),
}

/// Errors that abort a document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    ResourceFetch(#[from] ResourceFetchError),
    #[error("failed to parse PDF template: {0}")]
    Template(#[source] lopdf::Error),
    #[error("failed to load {name} font: {reason}")]
    Font { name: &'static str, reason: String },
    #[error("layout targets page {index} but the template has {count} page(s)")]
    PageOutOfRange { index: usize, count: usize },
    #[error("failed to update PDF objects: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to encode PDF content: {0}")]
    Encode(#[source] std::io::Error),
    #[error("failed to serialize PDF: {0}")]
    Serialize(String),
}

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    /// Generation date as printed on the form (`DD-MM-YYYY`).
    pub generated_on: String,
}

impl GeneratedDocument {
    pub fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }
}
