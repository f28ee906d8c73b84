//! Server and form configuration read from the environment.

use chrono::FixedOffset;
use std::env;
use thiserror::Error;

use crate::form::registration_form::DEFAULT_DISPLAY_OFFSET_MINUTES;
use crate::form::ResourceLocations;

pub const DEFAULT_TEMPLATE_LOCATION: &str = "static/forms/Revised_Register_Form.pdf";
pub const DEFAULT_BODY_FONT_LOCATION: &str = "static/forms/Ubuntu-R.ttf";
pub const DEFAULT_SYMBOL_FONT_LOCATION: &str = "static/forms/Wingdings2.ttf";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{name}={minutes} is outside the allowed UTC offset range")]
    OffsetOutOfRange { name: &'static str, minutes: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub locations: ResourceLocations,
    /// Base URL that relative resource locations are fetched from.
    pub resource_base_url: Option<String>,
    pub display_offset: FixedOffset,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl FormConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let offset_minutes = match var("FORM_UTC_OFFSET_MINUTES") {
            Some(raw) => parse_number::<i32>("FORM_UTC_OFFSET_MINUTES", &raw, "integer")?,
            None => DEFAULT_DISPLAY_OFFSET_MINUTES,
        };
        let display_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::OffsetOutOfRange {
                name: "FORM_UTC_OFFSET_MINUTES",
                minutes: offset_minutes,
            })?;

        let port = match var("PORT") {
            Some(raw) => parse_number::<u16>("PORT", &raw, "port number")?,
            None => DEFAULT_PORT,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            locations: ResourceLocations {
                template: var("FORM_TEMPLATE_LOCATION")
                    .unwrap_or_else(|| DEFAULT_TEMPLATE_LOCATION.to_string()),
                body_font: var("FORM_BODY_FONT_LOCATION")
                    .unwrap_or_else(|| DEFAULT_BODY_FONT_LOCATION.to_string()),
                symbol_font: var("FORM_SYMBOL_FONT_LOCATION")
                    .unwrap_or_else(|| DEFAULT_SYMBOL_FONT_LOCATION.to_string()),
            },
            resource_base_url: var("FORM_RESOURCE_BASE_URL"),
            display_offset,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            cors_allowed_origins,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        expected,
    })
}
