//! Static document schema for the booking request form

use form_core::{FieldSpec, ListSpec, ObjectSpec};
use std::sync::LazyLock;

/// Allowed gender values on the form
pub const GENDERS: [&str; 2] = ["male", "female"];

/// Allowed phone kinds, in the form's left-to-right mark order
pub const PHONE_KINDS: [&str; 3] = ["mobile", "home", "work"];

/// Allowed mailing address kinds
pub const ADDRESS_KINDS: [&str; 2] = ["home", "work"];

/// Exact number of contact phone rows the form provides
pub const PHONE_ROWS: usize = 2;

/// The booking request document schema, process-wide immutable.
pub static BOOKING_SCHEMA: LazyLock<ObjectSpec> = LazyLock::new(|| {
    ObjectSpec::new()
        .field("request_date", FieldSpec::date().default_today())
        .field(
            "representative",
            ObjectSpec::new()
                .required()
                .field("name", FieldSpec::string().required())
                .field("name_kana", FieldSpec::string().required())
                .field("gender", FieldSpec::string().required().allowed(GENDERS))
                .field("employer", FieldSpec::string().required())
                .field(
                    "insurance",
                    ObjectSpec::new()
                        .required()
                        .field("symbol", FieldSpec::integer().required().min(0))
                        .field("number", FieldSpec::integer().required().min(0)),
                )
                .field(
                    "phones",
                    ListSpec::new(
                        ObjectSpec::new()
                            .field(
                                "number",
                                FieldSpec::string()
                                    .required()
                                    .pattern(r"\d+-\d+-\d+")
                                    .max_length(13),
                            )
                            .field(
                                "kind",
                                FieldSpec::string().required().allowed(PHONE_KINDS),
                            ),
                    )
                    .required()
                    .length(PHONE_ROWS, PHONE_ROWS),
                ),
        )
        .field(
            "mailing",
            ObjectSpec::new()
                .required()
                .field("invoice_address", address_spec())
                .field("documents_address", address_spec()),
        )
});

fn address_spec() -> ObjectSpec {
    ObjectSpec::new()
        .required()
        .field("kind", FieldSpec::string().required().allowed(ADDRESS_KINDS))
        .field(
            "postal_code",
            FieldSpec::string().required().pattern(r"\d{3}-\d{4}"),
        )
        .field("address", FieldSpec::string().required())
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_core::validate;
    use serde_json::json;

    #[test]
    fn test_schema_accepts_complete_booking() {
        let document = crate::tests::sample_booking();

        let normalized = validate(&BOOKING_SCHEMA, &document).unwrap();

        // the request date default was injected
        assert!(normalized.get("request_date").is_some());
    }

    #[test]
    fn test_schema_rejects_single_phone() {
        let mut document = crate::tests::sample_booking();
        document["representative"]["phones"]
            .as_array_mut()
            .unwrap()
            .pop();

        let error = validate(&BOOKING_SCHEMA, &document).unwrap_err();

        assert_eq!(error.violations.len(), 1);
    }

    #[test]
    fn test_schema_rejects_bad_postal_code() {
        let mut document = crate::tests::sample_booking();
        document["mailing"]["invoice_address"]["postal_code"] = json!("1234-567");

        assert!(validate(&BOOKING_SCHEMA, &document).is_err());
    }
}
