//! Booking Form - fills the travel booking request paper
//!
//! Ties the pieces together for one concrete form:
//! - the static booking document schema
//! - the static position registry for the form template
//! - the static field plan in physical layout order
//! - the validate -> resolve -> overlay pipeline
//!
//! # Example
//!
//! ```ignore
//! use booking_form::fill_booking_form;
//!
//! let template = std::fs::read("tehaisho.pdf")?;
//! let filled = fill_booking_form(&template, &booking_data, 2)?;
//! std::fs::write("out.pdf", filled)?;
//! ```

pub mod plan;
pub mod positions;
pub mod schema;

pub use plan::{BOOKING_PLAN, HEISEI_EPOCH_YEAR};
pub use positions::BOOKING_POSITIONS;
pub use schema::{BOOKING_SCHEMA, ADDRESS_KINDS, GENDERS, PHONE_KINDS, PHONE_ROWS};

use form_core::{resolve, validate, FormError, Placement};
use pdf_overlay::{FormPage, OverlayError};
use serde_json::Value;
use thiserror::Error;

/// The form page of the standard booking template (1-indexed)
pub const DEFAULT_FORM_PAGE: usize = 2;

/// Errors from the end-to-end fill pipeline
#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("overlay failed: {0}")]
    Overlay(#[from] OverlayError),
}

/// Result type for booking form operations
pub type Result<T> = std::result::Result<T, BookingError>;

/// Validate a booking document and compute its placement sequence.
///
/// Exposed separately so callers can inspect what would be drawn
/// without touching a template PDF.
pub fn booking_placements(booking_data: &Value) -> Result<Vec<Placement>> {
    let normalized = validate(&BOOKING_SCHEMA, booking_data).map_err(FormError::from)?;
    let placements =
        resolve(&normalized, &BOOKING_POSITIONS, &BOOKING_PLAN).map_err(FormError::from)?;
    Ok(placements)
}

/// Fill the booking request form.
///
/// Validates `booking_data`, maps it onto the template's form page and
/// returns the filled single-page PDF. Either the complete form comes
/// back or the first error does; no partially filled output is ever
/// produced.
pub fn fill_booking_form(
    template_pdf: &[u8],
    booking_data: &Value,
    form_page: usize,
) -> Result<Vec<u8>> {
    let placements = booking_placements(booking_data)?;

    let mut page = FormPage::from_bytes(template_pdf, form_page)?;
    page.overlay(&placements)?;
    Ok(page.extract_to_bytes()?)
}
