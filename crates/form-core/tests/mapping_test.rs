//! Integration tests for the schema -> plan -> placement pipeline

use form_core::{
    path, resolve, validate, FieldPlan, FieldSpec, Formatter, ListSpec, ObjectSpec, Position,
    PositionNode, ResolveError, Violation, SELECTION_MARK,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn schema() -> ObjectSpec {
    ObjectSpec::new()
        .field("request_date", FieldSpec::date().default_today())
        .field(
            "guest",
            ObjectSpec::new()
                .required()
                .field("name", FieldSpec::string().required())
                .field(
                    "gender",
                    FieldSpec::string().required().allowed(["male", "female"]),
                )
                .field(
                    "phones",
                    ListSpec::new(
                        ObjectSpec::new()
                            .field(
                                "number",
                                FieldSpec::string().required().pattern(r"\d+-\d+-\d+"),
                            )
                            .field(
                                "kind",
                                FieldSpec::string()
                                    .required()
                                    .allowed(["mobile", "home", "work"]),
                            ),
                    )
                    .required()
                    .length(1, 3),
                ),
        )
}

fn registry() -> PositionNode {
    let phone_row = |y: f64| {
        PositionNode::object([
            (
                "number",
                PositionNode::slots([
                    Position::spaced(225.0, y, 10.0, 2.0),
                    Position::spaced(290.0, y, 10.0, 2.0),
                    Position::spaced(360.0, y, 10.0, 2.0),
                ]),
            ),
            (
                "kind",
                PositionNode::by_value([
                    ("mobile", Position::at(441.0, y, 16.0)),
                    ("home", Position::at(465.0, y, 16.0)),
                    ("work", Position::Suppressed),
                ]),
            ),
        ])
    };

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
            "guest",
            PositionNode::object([
                ("name", PositionNode::Leaf(Position::at(180.0, 712.0, 10.0))),
                (
                    "gender",
                    PositionNode::by_value([
                        ("male", Position::at(501.0, 711.0, 16.0)),
                        ("female", Position::at(535.0, 711.0, 16.0)),
                    ]),
                ),
                (
                    "phones",
                    // registry defines three rows; the document decides
                    // how many are actually visited
                    PositionNode::list([phone_row(668.0), phone_row(647.0), phone_row(626.0)]),
                ),
            ]),
        ),
    ])
}

fn plan() -> FieldPlan {
    FieldPlan::new()
        .field(
            path!["request_date"],
            Formatter::EraDate { epoch_year: 1988 },
        )
        .field(path!["guest", "name"], Formatter::Verbatim)
        .field(path!["guest", "gender"], Formatter::Selection)
        .repeat(
            path!["guest", "phones"],
            vec![
                (path!["number"], Formatter::Delimited { delimiter: '-' }),
                (path!["kind"], Formatter::Selection),
            ],
        )
}

fn document() -> serde_json::Value {
    json!({
        "request_date": "2018-10-01",
        "guest": {
            "name": "健保 太郎",
            "gender": "male",
            "phones": [
                { "number": "090-1234-5678", "kind": "mobile" },
                { "number": "0123-45-6789", "kind": "home" }
            ]
        }
    })
}

#[test]
fn validation_reports_independent_missing_fields_together() {
    let document = json!({
        "guest": {
            "phones": [{ "number": "090-1234-5678", "kind": "mobile" }]
        }
    });

    let error = validate(&schema(), &document).unwrap_err();

    assert!(error.violations.contains(&Violation::MissingField {
        path: "$.guest.name".into()
    }));
    assert!(error.violations.contains(&Violation::MissingField {
        path: "$.guest.gender".into()
    }));
}

#[test]
fn normalizing_twice_is_a_no_op() {
    let once = validate(&schema(), &document()).unwrap();
    let twice = validate(&schema(), &once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn full_pipeline_produces_plan_ordered_placements() {
    let normalized = validate(&schema(), &document()).unwrap();

    let placements = resolve(&normalized, &registry(), &plan()).unwrap();

    let texts: Vec<&str> = placements.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            // era date: Heisei 30
            "30", "10", "1",
            // guest block
            "健保 太郎", SELECTION_MARK,
            // phone row 0
            "090", "1234", "5678", SELECTION_MARK,
            // phone row 1
            "0123", "45", "6789", SELECTION_MARK,
        ]
    );
}

#[test]
fn repeat_expansion_follows_document_length_not_registry() {
    let normalized = validate(&schema(), &document()).unwrap();

    let placements = resolve(&normalized, &registry(), &plan()).unwrap();

    // two phone rows in the document, three in the registry: only the
    // first two rows produce placements (4 fragments per row)
    let phone_fragments = placements.len() - 5;
    assert_eq!(phone_fragments, 8);
}

#[test]
fn suppressed_positions_stay_in_the_sequence() {
    let mut doc = document();
    doc["guest"]["phones"][0]["kind"] = json!("work");
    let normalized = validate(&schema(), &doc).unwrap();

    let placements = resolve(&normalized, &registry(), &plan()).unwrap();

    let suppressed: Vec<_> = placements
        .iter()
        .filter(|p| !p.position.is_drawable())
        .collect();
    assert_eq!(suppressed.len(), 1);
    assert_eq!(suppressed[0].text, SELECTION_MARK);
}

#[test]
fn resolution_aborts_without_partial_output_on_format_error() {
    let mut doc = document();
    // post-validation corruption: a two-part phone number
    doc["guest"]["phones"][1]["number"] = json!("0123-456789");
    // skip validation to reach the formatter directly

    let error = resolve(&doc, &registry(), &plan()).unwrap_err();

    assert!(matches!(error, ResolveError::Format { .. }));
}

#[test]
fn plan_path_missing_from_registry_is_fatal() {
    let plan = FieldPlan::new().field(path!["guest", "nickname"], Formatter::Verbatim);
    let mut doc = document();
    doc["guest"]["nickname"] = json!("T");

    let error = resolve(&doc, &registry(), &plan).unwrap_err();

    assert_eq!(
        error,
        ResolveError::RegistryPath {
            path: "$.guest.nickname".into()
        }
    );
}
