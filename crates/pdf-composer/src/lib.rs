//! PDF markup utilities for annotating and re-outlining existing documents.
//!
//! This crate provides low-level PDF manipulation using lopdf:
//! - Highlight and rectangle-outline annotations with generated appearances
//! - Outline (table of contents) replacement and read-back
//! - PDF text string encoding for titles

pub mod annotation;
mod error;
pub mod outline;
pub mod text_string;

pub use annotation::{Annotation, AnnotationKind, add_highlight, add_outline};
pub use error::ComposerError;
pub use outline::{get_toc, set_toc};
