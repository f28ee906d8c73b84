//! Reservation records as received from the booking client.

pub mod model;

pub use model::{
    AdminAnnotation, Applicant, Payment, ReservationRecord, ResolvedPayment, Reviewer, Scalar,
    Signature, SignatureData, SignatureKind, GUEST_PAYS,
};
