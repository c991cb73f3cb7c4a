//! End-to-end tests for the booking request form pipeline

use booking_form::{
    booking_placements, fill_booking_form, BookingError, DEFAULT_FORM_PAGE,
};
use form_core::{FormError, SELECTION_MARK};
use lopdf::dictionary;
use pretty_assertions::assert_eq;
use serde_json::json;

/// Create a minimal valid template PDF with the given page count
fn create_template_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Pages",
        "Count" => page_count as i32,
        "Kids" => vec![], // Will be updated below
    }));

    let mut page_ids = Vec::new();
    for _ in 0..page_count {
        let contents_id = doc.add_object(lopdf::Object::Stream(lopdf::Stream::new(
            lopdf::dictionary! {},
            vec![],
        )));

        let page_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()],
            "Resources" => lopdf::dictionary! {},
            "Contents" => contents_id,
        }));
        page_ids.push(page_id);
    }

    let mut pages_dict = doc.get_object(pages_id).unwrap().as_dict().unwrap().clone();
    pages_dict.set(
        "Kids",
        lopdf::Object::Array(page_ids.into_iter().map(|id| id.into()).collect()),
    );
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn sample_booking() -> serde_json::Value {
    json!({
        "request_date": "2018-10-01",
        "representative": {
            "name": "健保 太郎",
            "name_kana": "ケンポ タロウ",
            "gender": "male",
            "employer": "株式会社○△□",
            "insurance": { "symbol": 1234, "number": 56 },
            "phones": [
                { "number": "090-1234-5678", "kind": "mobile" },
                { "number": "0123-45-6789", "kind": "home" }
            ]
        },
        "mailing": {
            "invoice_address": {
                "kind": "home",
                "postal_code": "123-4567",
                "address": "東京都港区○△□1-2-3"
            },
            "documents_address": {
                "kind": "work",
                "postal_code": "345-6789",
                "address": "東京都港区○△□4-5-6"
            }
        }
    })
}

#[test]
fn test_placements_follow_the_form_layout() {
    let placements = booking_placements(&sample_booking()).unwrap();

    let texts: Vec<&str> = placements.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            // request date, Heisei 30
            "30", "10", "1",
            // representative block
            "健保 太郎", "ケンポ タロウ", SELECTION_MARK, "株式会社○△□", "1234", "56",
            // phone rows
            "090", "1234", "5678", SELECTION_MARK,
            "0123", "45", "6789", SELECTION_MARK,
            // mailing block
            SELECTION_MARK, "123-4567", "東京都港区○△□1-2-3",
            SELECTION_MARK, "345-6789", "東京都港区○△□4-5-6",
        ]
    );
}

#[test]
fn test_every_placement_is_drawable_on_this_form() {
    let placements = booking_placements(&sample_booking()).unwrap();

    assert!(placements.iter().all(|p| p.position.is_drawable()));
}

#[test]
fn test_request_date_default_is_injected() {
    let mut booking = sample_booking();
    booking.as_object_mut().unwrap().remove("request_date");

    // today converts to some positive era year, so this must succeed
    let placements = booking_placements(&booking).unwrap();

    assert!(!placements.is_empty());
}

#[test]
fn test_validation_reports_all_problems_at_once() {
    let mut booking = sample_booking();
    booking["representative"]
        .as_object_mut()
        .unwrap()
        .remove("name");
    booking["representative"]["gender"] = json!("other");

    let error = booking_placements(&booking).unwrap_err();

    let BookingError::Form(FormError::Validation(validation)) = error else {
        panic!("expected a validation error");
    };
    assert_eq!(validation.violations.len(), 2);
}

#[test]
fn test_fill_produces_single_page_pdf() {
    let template = create_template_pdf(3);

    let filled = fill_booking_form(&template, &sample_booking(), DEFAULT_FORM_PAGE).unwrap();

    let doc = lopdf::Document::load_mem(&filled).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_fill_writes_text_operators() {
    let template = create_template_pdf(3);

    let filled = fill_booking_form(&template, &sample_booking(), DEFAULT_FORM_PAGE).unwrap();

    let doc = lopdf::Document::load_mem(&filled).unwrap();
    let pages = doc.get_pages();
    let page_id = pages[&1];
    let content = doc.get_page_content(page_id).unwrap();
    let content = String::from_utf8_lossy(&content);

    // era year 30 as UTF-16BE hex, placed at the date coordinates
    assert!(content.contains("62 747 Td"));
    assert!(content.contains("<00330030> Tj"));
}

#[test]
fn test_fill_rejects_out_of_range_page() {
    let template = create_template_pdf(1);

    let error = fill_booking_form(&template, &sample_booking(), 2).unwrap_err();

    assert!(matches!(
        error,
        BookingError::Overlay(pdf_overlay::OverlayError::InvalidPage(2, 1))
    ));
}

#[test]
fn test_no_output_on_invalid_data() {
    let template = create_template_pdf(3);
    let mut booking = sample_booking();
    booking["representative"]["phones"][0]["number"] = json!("090 1234 5678");

    assert!(fill_booking_form(&template, &booking, DEFAULT_FORM_PAGE).is_err());
}
