//! Static field plan: the physical visiting order of the form

use form_core::{path, FieldPlan, Formatter};
use std::sync::LazyLock;

/// The Heisei era starts in 1989; printed era years are offset from 1988.
pub const HEISEI_EPOCH_YEAR: i32 = 1988;

/// The plan walks the form top to bottom: request date, representative
/// block, the repeated phone rows, then the two mailing addresses.
pub static BOOKING_PLAN: LazyLock<FieldPlan> = LazyLock::new(|| {
    FieldPlan::new()
        .field(
            path!["request_date"],
            Formatter::EraDate {
                epoch_year: HEISEI_EPOCH_YEAR,
            },
        )
        .field(path!["representative", "name"], Formatter::Verbatim)
        .field(path!["representative", "name_kana"], Formatter::Verbatim)
        .field(path!["representative", "gender"], Formatter::Selection)
        .field(path!["representative", "employer"], Formatter::Verbatim)
        .field(
            path!["representative", "insurance", "symbol"],
            Formatter::Verbatim,
        )
        .field(
            path!["representative", "insurance", "number"],
            Formatter::Verbatim,
        )
        .repeat(
            path!["representative", "phones"],
            vec![
                (path!["number"], Formatter::Delimited { delimiter: '-' }),
                (path!["kind"], Formatter::Selection),
            ],
        )
        .field(path!["mailing", "invoice_address", "kind"], Formatter::Selection)
        .field(
            path!["mailing", "invoice_address", "postal_code"],
            Formatter::Verbatim,
        )
        .field(
            path!["mailing", "invoice_address", "address"],
            Formatter::Verbatim,
        )
        .field(
            path!["mailing", "documents_address", "kind"],
            Formatter::Selection,
        )
        .field(
            path!["mailing", "documents_address", "postal_code"],
            Formatter::Verbatim,
        )
        .field(
            path!["mailing", "documents_address", "address"],
            Formatter::Verbatim,
        )
});
