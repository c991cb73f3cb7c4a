//! Booking Form Filler
//!
//! Fills the travel booking request paper from a JSON booking document.
//!
//! Usage:
//!   cargo run --example fill_booking -- <template.pdf> <booking.json> [output.pdf] [page]
//!
//! Example:
//!   cargo run --example fill_booking -- data/tehaisho.pdf input/booking.json output/filled.pdf

use anyhow::{bail, Context};
use booking_form::{fill_booking_form, DEFAULT_FORM_PAGE};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} <template.pdf> <booking.json> [output.pdf] [page]",
            args[0]
        );
        bail!("missing arguments");
    }

    let template_path = &args[1];
    let booking_path = &args[2];
    let output_path = args.get(3).map(String::as_str).unwrap_or("output/filled.pdf");
    let form_page = match args.get(4) {
        Some(raw) => raw.parse().context("page must be a number")?,
        None => DEFAULT_FORM_PAGE,
    };

    let template = std::fs::read(template_path)
        .with_context(|| format!("failed to read template {template_path}"))?;
    let booking_json = std::fs::read_to_string(booking_path)
        .with_context(|| format!("failed to read booking data {booking_path}"))?;
    let booking: serde_json::Value =
        serde_json::from_str(&booking_json).context("booking data is not valid JSON")?;

    let filled = fill_booking_form(&template, &booking, form_page)?;

    if let Some(parent) = std::path::Path::new(output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, filled)?;

    println!("Wrote {output_path}");
    Ok(())
}
