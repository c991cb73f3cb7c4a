//! Drawing positions and the position registry tree

use crate::path::{FieldPath, Segment};
use std::collections::BTreeMap;

/// Drawing coordinates for one text fragment, in PDF points from the
/// bottom-left of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPos {
    pub x: f64,
    pub y: f64,
    pub font_size: f32,
    pub char_space: f32,
}

/// Where a text fragment lands on the form.
///
/// `Suppressed` marks a field whose text is computed for traceability
/// but has no printed location on the physical form; the renderer skips
/// it with a single pattern match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Drawable(DrawPos),
    Suppressed,
}

impl Position {
    pub fn at(x: f64, y: f64, font_size: f32) -> Self {
        Position::Drawable(DrawPos {
            x,
            y,
            font_size,
            char_space: 0.0,
        })
    }

    pub fn spaced(x: f64, y: f64, font_size: f32, char_space: f32) -> Self {
        Position::Drawable(DrawPos {
            x,
            y,
            font_size,
            char_space,
        })
    }

    pub fn is_drawable(&self) -> bool {
        matches!(self, Position::Drawable(_))
    }
}

/// A node of the position registry, a tree of the same shape as the
/// document schema. Leaf variants carry the coordinates a formatter
/// distributes its fragments over.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionNode {
    /// One position for a single-fragment formatter
    Leaf(Position),
    /// Ordered positions for a multi-fragment formatter
    Slots(Vec<Position>),
    /// Allowed value -> mark position for a selection field
    ByValue(BTreeMap<String, Position>),
    /// Part name -> position for a compound formatter (e.g. a date)
    Named(BTreeMap<String, Position>),
    /// Interior node keyed like the document object
    Object(BTreeMap<String, PositionNode>),
    /// Interior node for a repeated section
    List(Vec<PositionNode>),
}

impl PositionNode {
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PositionNode)>,
    {
        PositionNode::Object(
            entries
                .into_iter()
                .map(|(key, node)| (key.into(), node))
                .collect(),
        )
    }

    pub fn by_value<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Position)>,
    {
        PositionNode::ByValue(
            entries
                .into_iter()
                .map(|(key, position)| (key.into(), position))
                .collect(),
        )
    }

    pub fn named<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Position)>,
    {
        PositionNode::Named(
            entries
                .into_iter()
                .map(|(key, position)| (key.into(), position))
                .collect(),
        )
    }

    pub fn slots(positions: impl IntoIterator<Item = Position>) -> Self {
        PositionNode::Slots(positions.into_iter().collect())
    }

    pub fn list(nodes: impl IntoIterator<Item = PositionNode>) -> Self {
        PositionNode::List(nodes.into_iter().collect())
    }

    /// Descend the registry by a field path. Leaf variants are not
    /// traversable; a path running into one returns `None`.
    pub fn lookup(&self, path: &FieldPath) -> Option<&PositionNode> {
        let mut current = self;
        for segment in path.segments() {
            current = match (current, segment) {
                (PositionNode::Object(map), Segment::Key(key)) => map.get(key)?,
                (PositionNode::List(nodes), Segment::Index(index)) => nodes.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<Position> for PositionNode {
    fn from(position: Position) -> Self {
        PositionNode::Leaf(position)
    }
}
