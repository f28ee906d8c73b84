//! Input validation for form regeneration.
//!
//! Collects every problem with a record before reporting, so a client fixing
//! an edit sees all missing fields at once.

use std::fmt;

/// Validation error with a user-facing message.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
            .with_suggestion(format!("Provide the {}", label.to_lowercase()))
    }

    /// Create error for a missing nested section of the record
    pub fn missing_section(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} details are missing", label))
            .with_suggestion(format!("Include the {} section", label.to_lowercase()))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Numbered, multi-line report of every collected error.
    pub fn to_report(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} problem(s) found",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }
}

/// Validate that an optional string is present and not blank
pub fn validate_required(
    value: Option<&str>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate that a nested section is present
pub fn validate_present<T>(value: Option<&T>, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.is_none() {
        errors.add(ValidationError::missing_section(field, label));
    }
}
