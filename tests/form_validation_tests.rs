mod common;

use reservation_form_server::form::validation::{
    validate_present, validate_required, ValidationError, ValidationErrors,
};
use reservation_form_server::form::Validator;

#[test]
fn test_sample_record_is_valid() {
    assert!(common::sample_record().validate().is_ok());
}

#[test]
fn test_each_required_field_is_reported() {
    let mut record = common::sample_record();
    record.guest_name = Some("   ".to_string());
    record.arrival_date = None;

    let errors = record.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.fields(), vec!["guestName", "arrivalDate"]);
}

#[test]
fn test_missing_applicant_section() {
    let mut record = common::sample_record();
    record.applicant = None;

    let errors = record.validate().unwrap_err();
    assert_eq!(errors.fields(), vec!["applicant"]);
    assert!(errors.to_report().contains("Applicant details are missing"));
}

#[test]
fn test_report_numbers_every_problem() {
    let mut errors = ValidationErrors::new();
    validate_required(None, "guestName", "Guest name", &mut errors);
    validate_present::<()>(None, "applicant", "Applicant", &mut errors);

    let report = errors.to_report();
    assert!(report.starts_with("Validation failed: 2 problem(s) found"));
    assert!(report.contains("1. [guestName] Guest name must not be empty"));
    assert!(report.contains("2. [applicant] Applicant details are missing"));
}

#[test]
fn test_added_errors_appear_in_report() {
    let mut errors = ValidationErrors::new();
    assert!(errors.is_empty());

    errors.add(ValidationError::new("arrivalDate", "Arrival date is in the past"));
    assert!(!errors.is_empty());
    assert!(errors
        .to_report()
        .contains("[arrivalDate] Arrival date is in the past"));
}

#[test]
fn test_error_display_includes_suggestion() {
    let error = ValidationError::empty_field("departureDate", "Departure date");
    assert_eq!(
        error.to_string(),
        "[departureDate] Departure date must not be empty. Provide the departure date"
    );
}
