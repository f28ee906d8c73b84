use serde_json::json;

use reservation_form_server::reservation::{
    ReservationRecord, Scalar, SignatureData, SignatureKind,
};

#[test]
fn test_record_deserializes_from_client_json() {
    let record: ReservationRecord = serde_json::from_value(json!({
        "guestName": "Jane Doe",
        "guestGender": "FEMALE",
        "numberOfGuests": 2,
        "numberOfRooms": "1",
        "arrivalDate": "2024-03-05T00:00:00Z",
        "category": "BR-B1",
        "applicant": { "name": "R. Sharma", "code": 1234, "mobile": "9876543210" },
        "payment": { "source": "PROJECT", "sourceName": "DST Grant" },
        "adminAnnotation": { "approvalAttached": true, "entrySerialNo": 17 },
        "signature": { "type": "image", "data": "data:image/png;base64,AAAA" },
        "reviewers": [{ "role": "HOD", "status": "APPROVED" }]
    }))
    .unwrap();

    assert_eq!(record.guest_name.as_deref(), Some("Jane Doe"));
    assert_eq!(record.number_of_guests, Some(Scalar::Number(2.0)));
    assert_eq!(record.number_of_rooms, Some(Scalar::Text("1".to_string())));
    assert_eq!(record.category(), Some("BR-B1"));

    let applicant = record.applicant.as_ref().unwrap();
    assert_eq!(applicant.code, Some(Scalar::Number(1234.0)));
    assert_eq!(applicant.designation, None);

    let annotation = record.admin_annotation.as_ref().unwrap();
    assert_eq!(annotation.approval_attached, Some(Scalar::Flag(true)));
    assert_eq!(annotation.entry_serial_no.as_ref().unwrap().to_string(), "17");

    let signature = record.signature.as_ref().unwrap();
    assert_eq!(signature.kind, SignatureKind::Image);
    assert!(matches!(signature.data, Some(SignatureData::Encoded(_))));

    let reviewers = record.reviewers.as_ref().unwrap();
    assert!(reviewers[0].is_approved());
}

#[test]
fn test_missing_fields_default_to_absent() {
    let record: ReservationRecord = serde_json::from_value(json!({})).unwrap();
    assert!(record.guest_name.is_none());
    assert!(record.applicant.is_none());
    assert_eq!(record.payment().source, None);
}

#[test]
fn test_signature_byte_array_and_unknown_kind() {
    let record: ReservationRecord = serde_json::from_value(json!({
        "signature": { "type": "drawing", "data": [137, 80, 78, 71] }
    }))
    .unwrap();

    let signature = record.signature.unwrap();
    assert_eq!(signature.kind, SignatureKind::Unknown);
    assert_eq!(signature.data, Some(SignatureData::Bytes(vec![137, 80, 78, 71])));
}

#[test]
fn test_payment_precedence_per_field() {
    let record: ReservationRecord = serde_json::from_value(json!({
        "payment": { "source": "", "sourceName": "Nested Sponsor" },
        "source": "OFFICE",
        "sourceName": "Legacy Sponsor"
    }))
    .unwrap();

    let payment = record.payment();
    assert_eq!(payment.source.as_deref(), Some("OFFICE"));
    assert_eq!(payment.source_name.as_deref(), Some("Nested Sponsor"));
    assert!(!payment.is_guest_paid());
}

#[test]
fn test_legacy_guest_source() {
    let record: ReservationRecord = serde_json::from_value(json!({ "source": "GUEST" })).unwrap();
    assert!(record.payment().is_guest_paid());
}

#[test]
fn test_reviewer_status_must_match_exactly() {
    let record: ReservationRecord = serde_json::from_value(json!({
        "reviewers": [
            { "role": "HOD", "status": "approved" },
            { "role": "Dean", "status": "PENDING" },
            { "role": "Registrar" }
        ]
    }))
    .unwrap();
    assert!(record.reviewers.unwrap().iter().all(|r| !r.is_approved()));
}

#[test]
fn test_scalar_blankness() {
    assert!(Scalar::from("  ").is_blank());
    assert!(Scalar::Flag(false).is_blank());
    assert!(Scalar::Number(0.0).is_blank());
    assert!(!Scalar::Number(-1.0).is_blank());
    assert_eq!(Scalar::Number(2.5).to_string(), "2.5");
}
