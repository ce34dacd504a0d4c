//! # findtext-core
//!
//! The search-and-markup pipeline behind the `findtext` command:
//! - **config**: immutable run settings and the emphasis mode
//! - **validate**: precondition checks on the configured paths
//! - **terms**: loading the JSON search terms file
//! - **document**: the `MarkupDocument` seam and its `lopdf` implementation
//! - **processor**: the page loop, outline commit and save
//! - **error**: the unified error type and its exit status mapping

pub mod config;
pub mod document;
pub mod error;
pub mod processor;
pub mod terms;
pub mod validate;

pub use config::{EmphasisMode, Settings};
pub use document::{MarkupDocument, PdfDocument};
pub use error::{EXIT_FAILURE, EXIT_USAGE, FindTextError};
pub use processor::{ProcessReport, process_document, run, run_with_output, sort_toc};
pub use terms::load_terms;
pub use validate::validate;

pub use findtext_types::{Rect, TocEntry};
