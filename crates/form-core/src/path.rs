//! Field paths for document and registry traversal

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A single step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object key
    Key(String),
    /// List index
    Index(usize),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Ordered sequence of keys and indices identifying a node in the
/// document tree or the position registry.
///
/// The textual form is JSONPath-like:
/// - `$.field` - Root field
/// - `$.object.field` - Nested field
/// - `$.array[0].field` - Array element field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

/// Error raised when a path string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field path '{path}': {reason}")]
pub struct PathSyntaxError {
    pub path: String,
    pub reason: String,
}

impl FieldPath {
    /// The empty path (the tree root)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse a JSONPath-like path string
    ///
    /// The leading `$.` is optional, so relative sub-paths such as
    /// `"number"` parse as well.
    pub fn parse(path: &str) -> std::result::Result<Self, PathSyntaxError> {
        let trimmed = path.strip_prefix("$.").unwrap_or(path);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let err = |reason: &str| PathSyntaxError {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        for part in trimmed.split('.') {
            // Check for array index
            if let Some(bracket_pos) = part.find('[') {
                let field = &part[..bracket_pos];
                if !part.ends_with(']') {
                    return Err(err("unterminated index"));
                }
                let index_str = &part[bracket_pos + 1..part.len() - 1];
                let index: usize = index_str
                    .parse()
                    .map_err(|_| err("index is not a number"))?;

                if !field.is_empty() {
                    segments.push(Segment::Key(field.to_string()));
                }
                segments.push(Segment::Index(index));
            } else if part.is_empty() {
                return Err(err("empty segment"));
            } else {
                segments.push(Segment::Key(part.to_string()));
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend with a single key or index
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Extend with a relative sub-path
    pub fn join(&self, relative: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(relative.segments.iter().cloned());
        Self { segments }
    }

    /// Descend the document tree by this path
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.get(key.as_str())?,
                Segment::Index(index) => current.get(*index)?,
            };
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Build a [`FieldPath`] from literal keys and indices:
/// `path!["representative", "phones", 0, "number"]`
#[macro_export]
macro_rules! path {
    [$($segment:expr),* $(,)?] => {
        $crate::FieldPath::from_segments(vec![$($crate::Segment::from($segment)),*])
    };
}
