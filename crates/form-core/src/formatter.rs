//! Per-field formatters turning typed values into positioned text

use crate::position::{Position, PositionNode};
use crate::schema::DATE_FORMAT;
use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// The mark glyph drawn at a selection field's chosen position
pub const SELECTION_MARK: &str = "○";

/// Monday-first weekday labels
pub const WEEKDAY_LABELS: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

/// One text fragment bound to its drawing position - the contract
/// boundary to the external renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub text: String,
    pub position: Position,
}

impl Placement {
    pub fn new(text: impl Into<String>, position: Position) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// Formatter contract violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("'{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("year {year} is not after era epoch {epoch}")]
    BeforeEpoch { year: i32, epoch: i32 },

    #[error("expected {expected} '{delimiter}'-separated parts in '{value}', got {actual}")]
    PartCount {
        value: String,
        delimiter: char,
        expected: usize,
        actual: usize,
    },

    #[error("'{0}' has no registered mark position")]
    UnmappedSelection(String),

    #[error("value {0} is not a printable scalar")]
    NotScalar(String),

    #[error("{formatter} formatter needs a {expected} position node")]
    PositionShape {
        formatter: &'static str,
        expected: &'static str,
    },

    #[error("missing sub-position '{0}'")]
    MissingSubPosition(String),
}

/// The closed set of per-field formatters.
///
/// Each variant maps one document value plus its position node to one
/// or more placements, so the resolver's dispatch is a single uniform
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// Stringify the scalar at a single position (the default)
    Verbatim,
    /// Like `Verbatim`, but an absent/null value renders as empty text
    NullSafe,
    /// Era-relative year, month and day at named sub-positions
    EraDate { epoch_year: i32 },
    /// Year, month, day and Monday-first weekday label
    WeekdayDate,
    /// Month and day only, for recurring per-item dates
    MonthDay,
    /// Split on a delimiter into exactly as many parts as there are slots
    Delimited { delimiter: char },
    /// Draw the mark glyph at the position keyed by the value
    Selection,
}

impl Formatter {
    pub fn name(&self) -> &'static str {
        match self {
            Formatter::Verbatim => "verbatim",
            Formatter::NullSafe => "null-safe",
            Formatter::EraDate { .. } => "era-date",
            Formatter::WeekdayDate => "weekday-date",
            Formatter::MonthDay => "month-day",
            Formatter::Delimited { .. } => "delimited",
            Formatter::Selection => "selection",
        }
    }

    /// Whether the resolver may hand this formatter a null for a path
    /// absent from the document.
    pub fn tolerates_missing(&self) -> bool {
        matches!(self, Formatter::NullSafe)
    }

    /// Map a document value and its position node to placements.
    pub fn format(
        &self,
        value: &Value,
        node: &PositionNode,
    ) -> Result<Vec<Placement>, FormatError> {
        match self {
            Formatter::Verbatim => {
                let position = self.expect_leaf(node)?;
                Ok(vec![Placement::new(scalar_text(value)?, position)])
            }
            Formatter::NullSafe => {
                let position = self.expect_leaf(node)?;
                let text = if value.is_null() {
                    String::new()
                } else {
                    scalar_text(value)?
                };
                Ok(vec![Placement::new(text, position)])
            }
            Formatter::EraDate { epoch_year } => {
                let date = date_value(value)?;
                let parts = self.expect_named(node)?;
                let era_year = date.year() - epoch_year;
                if era_year < 1 {
                    return Err(FormatError::BeforeEpoch {
                        year: date.year(),
                        epoch: *epoch_year,
                    });
                }
                Ok(vec![
                    Placement::new(era_year.to_string(), self.sub_position(parts, "era_year")?),
                    Placement::new(date.month().to_string(), self.sub_position(parts, "month")?),
                    Placement::new(date.day().to_string(), self.sub_position(parts, "day")?),
                ])
            }
            Formatter::WeekdayDate => {
                let date = date_value(value)?;
                let parts = self.expect_named(node)?;
                let weekday = WEEKDAY_LABELS[date.weekday().num_days_from_monday() as usize];
                Ok(vec![
                    Placement::new(date.year().to_string(), self.sub_position(parts, "year")?),
                    Placement::new(date.month().to_string(), self.sub_position(parts, "month")?),
                    Placement::new(date.day().to_string(), self.sub_position(parts, "day")?),
                    Placement::new(weekday, self.sub_position(parts, "weekday")?),
                ])
            }
            Formatter::MonthDay => {
                let date = date_value(value)?;
                let parts = self.expect_named(node)?;
                Ok(vec![
                    Placement::new(date.month().to_string(), self.sub_position(parts, "month")?),
                    Placement::new(date.day().to_string(), self.sub_position(parts, "day")?),
                ])
            }
            Formatter::Delimited { delimiter } => {
                let text = string_value(value)?;
                let slots = match node {
                    PositionNode::Slots(slots) => slots,
                    _ => {
                        return Err(FormatError::PositionShape {
                            formatter: self.name(),
                            expected: "slots",
                        })
                    }
                };
                let parts: Vec<&str> = text.split(*delimiter).collect();
                if parts.len() != slots.len() {
                    return Err(FormatError::PartCount {
                        value: text.to_string(),
                        delimiter: *delimiter,
                        expected: slots.len(),
                        actual: parts.len(),
                    });
                }
                Ok(parts
                    .iter()
                    .zip(slots.iter())
                    .map(|(part, position)| Placement::new(*part, *position))
                    .collect())
            }
            Formatter::Selection => {
                let text = string_value(value)?;
                let marks = match node {
                    PositionNode::ByValue(marks) => marks,
                    _ => {
                        return Err(FormatError::PositionShape {
                            formatter: self.name(),
                            expected: "by-value",
                        })
                    }
                };
                let position = marks
                    .get(text)
                    .ok_or_else(|| FormatError::UnmappedSelection(text.to_string()))?;
                Ok(vec![Placement::new(SELECTION_MARK, *position)])
            }
        }
    }

    fn expect_leaf(&self, node: &PositionNode) -> Result<Position, FormatError> {
        match node {
            PositionNode::Leaf(position) => Ok(*position),
            _ => Err(FormatError::PositionShape {
                formatter: self.name(),
                expected: "leaf",
            }),
        }
    }

    fn expect_named<'a>(
        &self,
        node: &'a PositionNode,
    ) -> Result<&'a BTreeMap<String, Position>, FormatError> {
        match node {
            PositionNode::Named(parts) => Ok(parts),
            _ => Err(FormatError::PositionShape {
                formatter: self.name(),
                expected: "named",
            }),
        }
    }

    fn sub_position(
        &self,
        parts: &BTreeMap<String, Position>,
        name: &str,
    ) -> Result<Position, FormatError> {
        parts
            .get(name)
            .copied()
            .ok_or_else(|| FormatError::MissingSubPosition(name.to_string()))
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Verbatim
    }
}

fn scalar_text(value: &Value) -> Result<String, FormatError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(FormatError::NotScalar(value.to_string())),
    }
}

fn string_value(value: &Value) -> Result<&str, FormatError> {
    value
        .as_str()
        .ok_or_else(|| FormatError::NotScalar(value.to_string()))
}

fn date_value(value: &Value) -> Result<NaiveDate, FormatError> {
    let text = string_value(value)?;
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| FormatError::InvalidDate(text.to_string()))
}
