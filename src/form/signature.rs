//! Applicant signature handling.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;

use super::layout::{
    placement, Field, ImagePlacement, SIGNATURE_DATA_URL_IMAGE, SIGNATURE_INLINE_IMAGE,
};
use super::plan::DrawOp;
use super::RenderError;
use crate::reservation::{Signature, SignatureData, SignatureKind};

lazy_static! {
    static ref DATA_URL: Regex = Regex::new(r"(?s)^data:([^,]*),(.*)$").unwrap();
}

/// Decode the image bytes carried by a signature payload.
///
/// Data URLs have their base64 payload extracted and decoded; other strings
/// are treated as bare base64; byte arrays are used as-is.
pub fn decode_image_data(data: &SignatureData) -> Result<Vec<u8>, RenderError> {
    match data {
        SignatureData::Bytes(bytes) => Ok(bytes.clone()),
        SignatureData::Encoded(text) if is_data_url(text) => {
            let captures = DATA_URL
                .captures(text)
                .ok_or(RenderError::MalformedDataUrl)?;
            if !captures[1].ends_with(";base64") {
                return Err(RenderError::MalformedDataUrl);
            }
            decode_base64(&captures[2])
        }
        SignatureData::Encoded(text) => decode_base64(text),
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, RenderError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(RenderError::MissingData);
    }
    Ok(BASE64.decode(compact)?)
}

/// Data URL signatures sit in their own box; raw bytes and bare base64 are
/// drawn at the text signature anchor.
pub fn image_placement(data: &SignatureData) -> ImagePlacement {
    match data {
        SignatureData::Encoded(text) if is_data_url(text) => SIGNATURE_DATA_URL_IMAGE,
        _ => SIGNATURE_INLINE_IMAGE,
    }
}

fn is_data_url(text: &str) -> bool {
    text.starts_with("data:")
}

/// Resolve a signature to its draw operation.
///
/// Image decode failures are logged and yield `None`, leaving the signature
/// area blank without failing the document.
pub fn resolve_signature(signature: Option<&Signature>) -> Option<DrawOp> {
    let signature = signature?;
    match signature.kind {
        SignatureKind::Image => {
            let Some(data) = signature.data.as_ref() else {
                log::warn!("Image signature without data; leaving signature blank");
                return None;
            };
            match decode_image_data(data) {
                Ok(bytes) => Some(DrawOp::Image {
                    field: Field::SignatureImage,
                    placement: image_placement(data),
                    bytes,
                }),
                Err(e) => {
                    log::warn!("Failed to decode signature image: {}", e);
                    None
                }
            }
        }
        SignatureKind::Text => {
            let text = match signature.data.as_ref()? {
                SignatureData::Encoded(text) => text.clone(),
                SignatureData::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            };
            if text.is_empty() {
                return None;
            }
            Some(DrawOp::Field {
                field: Field::SignatureText,
                placement: placement(Field::SignatureText)?,
                value: text,
            })
        }
        SignatureKind::Unknown => {
            log::debug!("Ignoring signature of unknown type");
            None
        }
    }
}
