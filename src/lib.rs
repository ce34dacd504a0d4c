//! # findtext
//!
//! Searches a PDF for a list of text terms, marks every match with a highlight
//! or a rectangle outline, and replaces the document outline with one entry
//! per match, sorted by term.
//!
//! The work is split across the workspace crates re-exported here:
//! - **types**: geometry, colours and outline entries
//! - **text**: positioned text extraction and literal search
//! - **composer**: annotations and outline read/write on `lopdf` documents
//! - **core**: settings, validation, term loading and the page processor

pub use findtext_composer as composer;
pub use findtext_core as core;
pub use findtext_text as text;
pub use findtext_types as types;

pub mod cli;

pub use findtext_core::{
    EmphasisMode, FindTextError, MarkupDocument, PdfDocument, ProcessReport, Settings, run, run_with_output,
};
