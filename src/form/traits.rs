//! Traits for generator system standardization.

use async_trait::async_trait;

use super::validation::ValidationErrors;
use super::{GeneratedDocument, GeneratorError};

/// Trait for validating request objects.
pub trait Validator {
    /// Validate the state of the object.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Trait for document generators.
#[async_trait]
pub trait Generator<Req: Sync + ?Sized> {
    /// Generate a document from the request.
    async fn generate(&self, request: &Req) -> Result<GeneratedDocument, GeneratorError>;
}
