//! Static position registry for the booking request form template
//!
//! Coordinates are PDF points on the template's form page, measured
//! from the bottom-left corner.

use form_core::{Position, PositionNode};
use std::sync::LazyLock;

/// The drawing positions, a tree of the same shape as the schema.
pub static BOOKING_POSITIONS: LazyLock<PositionNode> = LazyLock::new(|| {
    PositionNode::object([
        (
            "request_date",
            PositionNode::named([
                ("era_year", Position::at(62.0, 747.0, 9.0)),
                ("month", Position::at(84.0, 747.0, 9.0)),
                ("day", Position::at(104.0, 747.0, 9.0)),
            ]),
        ),
        (
            "representative",
            PositionNode::object([
                ("name", PositionNode::Leaf(Position::at(180.0, 712.0, 10.0))),
                (
                    "name_kana",
                    PositionNode::Leaf(Position::at(180.0, 732.0, 10.0)),
                ),
                (
                    "gender",
                    PositionNode::by_value([
                        ("male", Position::at(501.0, 711.0, 16.0)),
                        ("female", Position::at(535.0, 711.0, 16.0)),
                    ]),
                ),
                (
                    "employer",
                    PositionNode::Leaf(Position::at(180.0, 690.0, 9.0)),
                ),
                (
                    "insurance",
                    PositionNode::object([
                        (
                            "symbol",
                            PositionNode::Leaf(Position::spaced(490.0, 690.0, 10.0, 2.0)),
                        ),
                        (
                            "number",
                            PositionNode::Leaf(Position::spaced(540.0, 690.0, 10.0, 2.0)),
                        ),
                    ]),
                ),
                (
                    "phones",
                    PositionNode::list([phone_row(668.0, 666.0), phone_row(647.0, 645.0)]),
                ),
            ]),
        ),
        (
            "mailing",
            PositionNode::object([
                ("invoice_address", address_block(606.0, 609.0)),
                ("documents_address", address_block(585.0, 589.0)),
            ]),
        ),
    ])
});

/// One contact phone row: the number split over three boxes, the kind
/// marked in one of three circles printed slightly lower.
fn phone_row(number_y: f64, kind_y: f64) -> PositionNode {
    PositionNode::object([
        (
            "number",
            PositionNode::slots([
                Position::spaced(225.0, number_y, 10.0, 2.0),
                Position::spaced(290.0, number_y, 10.0, 2.0),
                Position::spaced(360.0, number_y, 10.0, 2.0),
            ]),
        ),
        (
            "kind",
            PositionNode::by_value([
                ("mobile", Position::at(441.0, kind_y, 16.0)),
                ("home", Position::at(465.0, kind_y, 16.0)),
                ("work", Position::at(493.0, kind_y, 16.0)),
            ]),
        ),
    ])
}

fn address_block(kind_y: f64, text_y: f64) -> PositionNode {
    PositionNode::object([
        (
            "kind",
            PositionNode::by_value([
                ("home", Position::at(144.0, kind_y, 16.0)),
                ("work", Position::at(177.0, kind_y, 16.0)),
            ]),
        ),
        (
            "postal_code",
            PositionNode::Leaf(Position::spaced(217.0, text_y, 8.0, 2.0)),
        ),
        (
            "address",
            PositionNode::Leaf(Position::at(266.0, text_y, 8.0)),
        ),
    ])
}
