//! Plan-driven resolution of a document against the position registry

use crate::formatter::{FormatError, Formatter, Placement};
use crate::path::FieldPath;
use crate::position::PositionNode;
use serde_json::Value;
use thiserror::Error;

static NULL: Value = Value::Null;

/// One step of a field plan
#[derive(Debug, Clone)]
pub enum PlanEntry {
    /// Format the value at `path` with `formatter`
    Field {
        path: FieldPath,
        formatter: Formatter,
    },
    /// Expand once per index of the list at `path`, applying each
    /// relative entry under that index. Expansion is bounded by the
    /// actual document list length, not by the registry.
    Repeat {
        path: FieldPath,
        entries: Vec<(FieldPath, Formatter)>,
    },
}

/// The explicit, ordered visiting plan for one form layout.
///
/// Plan order is output order; it reflects the physical layout of the
/// target form, not the schema's key order.
#[derive(Debug, Clone, Default)]
pub struct FieldPlan {
    entries: Vec<PlanEntry>,
}

impl FieldPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, path: FieldPath, formatter: Formatter) -> Self {
        self.entries.push(PlanEntry::Field { path, formatter });
        self
    }

    pub fn repeat(mut self, path: FieldPath, entries: Vec<(FieldPath, Formatter)>) -> Self {
        self.entries.push(PlanEntry::Repeat { path, entries });
        self
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }
}

/// Errors raised while walking the plan
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("document has no value at {path}")]
    DocumentPath { path: String },

    #[error("position registry has no entry at {path}")]
    RegistryPath { path: String },

    #[error("formatting {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: FormatError,
    },
}

/// Walk the plan, keeping the document and the registry in lock-step,
/// and produce the ordered placement sequence.
///
/// The first path or format error aborts the whole resolution; an
/// incomplete form must never be rendered.
pub fn resolve(
    document: &Value,
    registry: &PositionNode,
    plan: &FieldPlan,
) -> Result<Vec<Placement>, ResolveError> {
    let mut placements = Vec::new();

    for entry in plan.entries() {
        match entry {
            PlanEntry::Field { path, formatter } => {
                resolve_field(document, registry, path, *formatter, &mut placements)?;
            }
            PlanEntry::Repeat { path, entries } => {
                let list = path
                    .lookup(document)
                    .and_then(Value::as_array)
                    .ok_or_else(|| ResolveError::DocumentPath {
                        path: path.to_string(),
                    })?;
                for index in 0..list.len() {
                    let item_path = path.child(index);
                    for (relative, formatter) in entries {
                        let field_path = item_path.join(relative);
                        resolve_field(document, registry, &field_path, *formatter, &mut placements)?;
                    }
                }
            }
        }
    }

    Ok(placements)
}

fn resolve_field(
    document: &Value,
    registry: &PositionNode,
    path: &FieldPath,
    formatter: Formatter,
    placements: &mut Vec<Placement>,
) -> Result<(), ResolveError> {
    let node = registry
        .lookup(path)
        .ok_or_else(|| ResolveError::RegistryPath {
            path: path.to_string(),
        })?;

    let value = match path.lookup(document) {
        Some(value) => value,
        None if formatter.tolerates_missing() => &NULL,
        None => {
            return Err(ResolveError::DocumentPath {
                path: path.to_string(),
            })
        }
    };

    let fragments = formatter
        .format(value, node)
        .map_err(|source| ResolveError::Format {
            path: path.to_string(),
            source,
        })?;
    placements.extend(fragments);
    Ok(())
}
