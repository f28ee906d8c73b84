//! Generator for the guest house registration form.
//!
//! Every call regenerates the whole document from the record. An edited
//! reservation can flip several checkmarks and the signature area at once,
//! so there is no incremental path that patches a previous document.

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::common::{
    display_text, format_display_date, format_gender, sanitize_filename, today_at,
    DISPLAY_DATE_FORMAT,
};
use super::engine::PdfOverlayEngine;
use super::layout::Field;
use super::marks::{resolve_marks, resolve_payment_line};
use super::plan::RenderPlan;
use super::resources::{ResourceLoader, ResourceLocations, ResourceSource};
use super::signature::resolve_signature;
use super::traits::{Generator, Validator};
use super::validation::{validate_present, validate_required, ValidationErrors};
use super::{GeneratedDocument, GeneratorError};
use crate::reservation::{AdminAnnotation, Applicant, ReservationRecord, Scalar};

const SERIAL_SUFFIX: &str = " and ";
const DATE_TIME_SUFFIX: &str = " ,";

/// India Standard Time, the zone the form's application date is printed in.
pub const DEFAULT_DISPLAY_OFFSET_MINUTES: i32 = 330;

impl Validator for ReservationRecord {
    /// Check the fields a regenerated form cannot do without.
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_required(self.guest_name.as_deref(), "guestName", "Guest name", &mut errors);
        validate_required(
            self.arrival_date.as_deref(),
            "arrivalDate",
            "Arrival date",
            &mut errors,
        );
        validate_required(
            self.departure_date.as_deref(),
            "departureDate",
            "Departure date",
            &mut errors,
        );
        validate_present(self.applicant.as_ref(), "applicant", "Applicant", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Builds registration form PDFs from reservation records.
#[derive(Clone)]
pub struct RegistrationFormGenerator {
    loader: ResourceLoader,
    display_offset: FixedOffset,
}

impl RegistrationFormGenerator {
    pub fn new(source: Arc<dyn ResourceSource>, locations: ResourceLocations) -> Self {
        Self {
            loader: ResourceLoader::new(source, locations),
            display_offset: default_display_offset(),
        }
    }

    /// Use a different UTC offset for the printed application date.
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    /// Generate the form, always from scratch.
    ///
    /// Fails if the template or a font cannot be fetched or parsed; a
    /// signature image that cannot be decoded is skipped instead.
    pub async fn generate(
        &self,
        record: &ReservationRecord,
    ) -> Result<GeneratedDocument, GeneratorError> {
        let generation_id = Uuid::new_v4();
        let payment = record.payment();
        log::info!(
            "[{}] Generating registration form: guest={:?}, category={:?}, source={:?}",
            generation_id,
            record.guest_name.as_deref().unwrap_or(""),
            record.category().unwrap_or(""),
            payment.source.as_deref().unwrap_or("")
        );

        let today = today_at(self.display_offset);
        let plan = build_plan(record, today);
        log::debug!("[{}] Render plan holds {} draw(s)", generation_id, plan.len());

        let resources = self.loader.load().await?;
        let pdf = PdfOverlayEngine::render(resources, &plan)?;

        let filename = format!(
            "registration-form-{}.pdf",
            sanitize_filename(record.guest_name.as_deref().unwrap_or(""), "guest")
        );
        log::info!(
            "[{}] Generated {} ({} bytes)",
            generation_id,
            filename,
            pdf.len()
        );

        Ok(GeneratedDocument {
            filename,
            pdf,
            generated_on: today.format(DISPLAY_DATE_FORMAT).to_string(),
        })
    }

    /// Regenerate the form for an edited reservation.
    ///
    /// Returns `None` without fetching anything when required fields are
    /// missing, and `None` when generation fails. Both are logged.
    pub async fn update(&self, record: &ReservationRecord) -> Option<GeneratedDocument> {
        if let Err(errors) = record.validate() {
            log::warn!("Registration form update rejected\n{}", errors.to_report());
            return None;
        }

        match self.generate(record).await {
            Ok(document) => Some(document),
            Err(e) => {
                log::error!("Registration form update failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl Generator<ReservationRecord> for RegistrationFormGenerator {
    async fn generate(
        &self,
        request: &ReservationRecord,
    ) -> Result<GeneratedDocument, GeneratorError> {
        RegistrationFormGenerator::generate(self, request).await
    }
}

pub fn default_display_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_DISPLAY_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix())
}

/// Resolve every draw for a record, in form order.
pub fn build_plan(record: &ReservationRecord, today: NaiveDate) -> RenderPlan {
    let mut plan = RenderPlan::new();
    let applicant = record.applicant.as_ref();

    plan.text(Field::GuestName, display_text(record.guest_name.as_deref()));
    plan.text(Field::GuestGender, format_gender(record.guest_gender.as_deref()));
    plan.text(Field::Address, display_text(record.address.as_deref()));
    plan.text(
        Field::ContactNumber,
        display_text(applicant.and_then(|a| a.mobile.as_ref())),
    );
    plan.text(Field::NumberOfGuests, display_text(record.number_of_guests.as_ref()));
    plan.text(Field::NumberOfRooms, display_text(record.number_of_rooms.as_ref()));
    plan.text(Field::RoomType, display_text(record.room_type.as_deref()));
    plan.text(Field::ArrivalDate, format_display_date(record.arrival_date.as_deref()));
    plan.text(Field::ArrivalTime, display_text(record.arrival_time.as_deref()));
    plan.text(Field::DepartureDate, format_display_date(record.departure_date.as_deref()));
    plan.text(Field::DepartureTime, display_text(record.departure_time.as_deref()));
    plan.text(Field::Purpose, display_text(record.purpose.as_deref()));

    for (field, placement) in resolve_marks(record.category()) {
        plan.mark(field, placement);
    }

    let payment_line = resolve_payment_line(&record.payment());
    plan.text(Field::PaymentLine, payment_line.label);
    if let Some(source_name) = payment_line.source_name {
        plan.text(Field::SourceName, source_name);
    }

    if let Some(annotation) = record.admin_annotation.as_ref() {
        plan_admin_annotation(&mut plan, annotation);
    }

    if let Some(applicant) = applicant {
        plan_applicant(&mut plan, applicant);
    }

    plan.text(
        Field::ApplicationDate,
        today.format(DISPLAY_DATE_FORMAT).to_string(),
    );

    if let Some(op) = resolve_signature(record.signature.as_ref()) {
        plan.push(op);
    }

    for (index, reviewer) in record.reviewers.iter().flatten().enumerate() {
        if reviewer.is_approved() {
            plan.text(
                Field::ReviewerRole(index),
                display_text(reviewer.role.as_deref()),
            );
        }
    }

    plan
}

fn plan_admin_annotation(plan: &mut RenderPlan, annotation: &AdminAnnotation) {
    plan.text(
        Field::ApprovalAttached,
        annotation_text(annotation.approval_attached.as_ref()),
    );
    plan.text(
        Field::ConfirmedRoomNo,
        annotation_text(annotation.confirmed_room_no.as_ref()),
    );
    plan.text(
        Field::EntrySerialNo,
        with_suffix(annotation_text(annotation.entry_serial_no.as_ref()), SERIAL_SUFFIX),
    );
    plan.text(
        Field::EntryPageNo,
        annotation_text(annotation.entry_page_no.as_ref()),
    );
    plan.text(
        Field::EntryDate,
        format_display_date(annotation.entry_date.as_deref()),
    );
    plan.text(
        Field::BookingDate,
        with_suffix(
            format_display_date(annotation.booking_date.as_deref()),
            DATE_TIME_SUFFIX,
        ),
    );
    plan.text(
        Field::CheckInTime,
        with_suffix(
            display_text(annotation.check_in_time.as_deref()),
            DATE_TIME_SUFFIX,
        ),
    );
    plan.text(
        Field::CheckOutTime,
        display_text(annotation.check_out_time.as_deref()),
    );
    plan.text(Field::Remarks, display_text(annotation.remarks.as_deref()));
}

fn plan_applicant(plan: &mut RenderPlan, applicant: &Applicant) {
    plan.text(Field::ApplicantName, display_text(applicant.name.as_deref()));
    plan.text(
        Field::ApplicantDesignation,
        display_text(applicant.designation.as_deref()),
    );
    plan.text(
        Field::ApplicantDepartment,
        display_text(applicant.department.as_deref()),
    );
    plan.text(Field::ApplicantCode, display_text(applicant.code.as_ref()));
    plan.text(Field::ApplicantMobile, display_text(applicant.mobile.as_ref()));
}

/// Office-use values print as given unless blank (`false`, `0`, empty).
fn annotation_text(value: Option<&Scalar>) -> String {
    value
        .filter(|value| !value.is_blank())
        .map(Scalar::to_string)
        .unwrap_or_default()
}

// Suffixes only follow a value; an absent value stays blank.
fn with_suffix(value: String, suffix: &str) -> String {
    if value.is_empty() {
        value
    } else {
        value + suffix
    }
}
