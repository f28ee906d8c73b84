use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Source value meaning the guest settles boarding/lodging charges personally.
pub const GUEST_PAYS: &str = "GUEST";

/// A loosely typed form value. Clients send counts and codes as strings or
/// numbers interchangeably, so these are coerced to display text on render.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// `false`, zero, NaN and blank text: values the form leaves empty.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Flag(flag) => !flag,
            Scalar::Number(number) => *number == 0.0 || number.is_nan(),
            Scalar::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Flag(flag) => write!(f, "{}", flag),
            Scalar::Number(number) => write!(f, "{}", number),
            Scalar::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub code: Option<Scalar>,
    pub mobile: Option<Scalar>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub source: Option<String>,
    pub source_name: Option<String>,
}

/// Office-use annotations filled in by the approving administrator.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAnnotation {
    pub approval_attached: Option<Scalar>,
    pub confirmed_room_no: Option<Scalar>,
    pub entry_serial_no: Option<Scalar>,
    pub entry_page_no: Option<Scalar>,
    pub entry_date: Option<String>,
    pub booking_date: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    Image,
    Text,
    #[serde(other)]
    Unknown,
}

/// Signature payload: a data URL, bare base64 or literal text, or the raw
/// image bytes as a JSON byte array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(untagged)]
pub enum SignatureData {
    Encoded(String),
    Bytes(Vec<u8>),
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct Signature {
    #[serde(rename = "type")]
    pub kind: SignatureKind,
    pub data: Option<SignatureData>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct Reviewer {
    pub role: Option<String>,
    pub status: Option<String>,
}

impl Reviewer {
    pub fn is_approved(&self) -> bool {
        self.status.as_deref() == Some("APPROVED")
    }
}

/// A reservation as submitted by the booking client.
///
/// The record is read-only input to document generation; nothing in this
/// crate mutates or stores it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    #[schema(example = "Jane Doe")]
    pub guest_name: Option<String>,
    #[schema(example = "FEMALE")]
    pub guest_gender: Option<String>,
    pub address: Option<String>,
    pub number_of_guests: Option<Scalar>,
    pub number_of_rooms: Option<Scalar>,
    pub room_type: Option<String>,
    #[schema(example = "2024-03-05T00:00:00Z")]
    pub arrival_date: Option<String>,
    pub arrival_time: Option<String>,
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub purpose: Option<String>,
    #[schema(example = "ES-A")]
    pub category: Option<String>,
    pub applicant: Option<Applicant>,
    pub payment: Option<Payment>,
    /// Legacy location of `payment.source`.
    pub source: Option<String>,
    /// Legacy location of `payment.sourceName`.
    pub source_name: Option<String>,
    pub admin_annotation: Option<AdminAnnotation>,
    pub signature: Option<Signature>,
    pub reviewers: Option<Vec<Reviewer>>,
}

/// Payment details after resolving the nested and legacy locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPayment {
    pub source: Option<String>,
    pub source_name: Option<String>,
}

impl ResolvedPayment {
    pub fn is_guest_paid(&self) -> bool {
        self.source.as_deref() == Some(GUEST_PAYS)
    }
}

impl ReservationRecord {
    /// Resolve `payment.source`/`payment.sourceName` against their legacy
    /// top-level copies.
    ///
    /// A non-empty nested value always wins; the top-level value is used only
    /// when the nested one is absent or empty. The two fields are resolved
    /// independently.
    pub fn payment(&self) -> ResolvedPayment {
        let nested = self.payment.as_ref();
        ResolvedPayment {
            source: first_non_empty(
                nested.and_then(|p| p.source.as_deref()),
                self.source.as_deref(),
            ),
            source_name: first_non_empty(
                nested.and_then(|p| p.source_name.as_deref()),
                self.source_name.as_deref(),
            ),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

fn first_non_empty(preferred: Option<&str>, fallback: Option<&str>) -> Option<String> {
    preferred
        .filter(|value| !value.is_empty())
        .or(fallback.filter(|value| !value.is_empty()))
        .map(str::to_string)
}
