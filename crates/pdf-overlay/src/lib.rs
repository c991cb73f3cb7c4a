//! PDF Overlay - draws resolved placements onto a form page
//!
//! This crate is the rendering collaborator of `form-core`:
//! - Select the form page from a paged template PDF
//! - Draw each drawable placement at its coordinates with the fixed
//!   non-embedded CID font
//! - Serialize a document containing only the filled form page
//!
//! # Example
//!
//! ```ignore
//! use pdf_overlay::FormPage;
//!
//! let mut page = FormPage::from_bytes(&template_bytes, 2)?;
//! page.overlay(&placements)?;
//! let filled = page.extract_to_bytes()?;
//! ```

mod overlay;

pub use overlay::{FormPage, FORM_FONT};

use thiserror::Error;

/// Errors surfaced from the overlay renderer
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to open PDF: {0}")]
    Open(String),

    #[error("invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("malformed page tree: {0}")]
    PageTree(String),

    #[error("failed to save PDF: {0}")]
    Save(String),

    #[error("lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),
}

/// Result type for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;
