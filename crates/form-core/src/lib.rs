//! Form Core - Template-driven field mapping engine
//!
//! This crate binds a validated, hierarchical document to fixed print
//! coordinates on a paper form template. It provides:
//! - Field paths shared by the document tree and the position registry
//! - A declarative document schema with collect-all validation
//! - A position registry mirroring the schema's shape
//! - Per-field formatters (dates, selections, delimited strings)
//! - A plan-driven resolver producing the ordered placement list
//!
//! # Example
//!
//! ```ignore
//! use form_core::{resolve, validate, FieldPlan, Formatter};
//!
//! let normalized = validate(&schema, &raw_document)?;
//! let placements = resolve(&normalized, &registry, &plan)?;
//! // hand `placements` to the external renderer
//! ```

pub mod formatter;
pub mod path;
pub mod position;
pub mod resolver;
pub mod schema;

pub use formatter::{FormatError, Formatter, Placement, SELECTION_MARK, WEEKDAY_LABELS};
pub use path::{FieldPath, PathSyntaxError, Segment};
pub use position::{DrawPos, Position, PositionNode};
pub use resolver::{resolve, FieldPlan, PlanEntry, ResolveError};
pub use schema::{
    validate, DefaultValue, FieldSpec, ListSpec, ObjectSpec, ScalarKind, ScalarSpec,
    ValidationError, Violation, DATE_FORMAT,
};

use thiserror::Error;

/// Errors that can occur while mapping a document onto a form
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for form mapping operations
pub type Result<T> = std::result::Result<T, FormError>;
