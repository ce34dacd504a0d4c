//! The error type shared by every stage of a run, and its exit status mapping.

use findtext_composer::ComposerError;
use findtext_text::TextError;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status for usage, precondition and input-data errors.
pub const EXIT_USAGE: i32 = 2;
/// Exit status for failures while processing or saving the document.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug)]
pub enum FindTextError {
    #[error("The input PDF file does not exist.")]
    InputNotFound(PathBuf),

    #[error("The JSON search terms file does not exist.")]
    TermsNotFound(PathBuf),

    #[error("The path to the output PDF file does not exist.")]
    OutputDirNotFound(PathBuf),

    #[error("Invalid emphasis '{0}': expected 'highlight' or 'outline'")]
    InvalidEmphasis(String),

    #[error("Could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid search terms file '{}': {source}", path.display())]
    Terms {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not open PDF '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        source: lopdf::Error,
    },

    #[error("Text extraction failed on page {page}: {source}")]
    Text { page: usize, source: TextError },

    #[error("Page {0} does not exist in the document")]
    PageOutOfRange(usize),

    #[error("Markup failed: {0}")]
    Composer(#[from] ComposerError),

    #[error("Could not save '{}': {message}", path.display())]
    Save { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FindTextError {
    /// The process exit status this error should terminate the program with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound(_)
            | Self::TermsNotFound(_)
            | Self::OutputDirNotFound(_)
            | Self::InvalidEmphasis(_)
            | Self::Read { .. }
            | Self::Terms { .. }
            | Self::Load { .. } => EXIT_USAGE,
            Self::Text { .. }
            | Self::PageOutOfRange(_)
            | Self::Composer(_)
            | Self::Save { .. }
            | Self::Io(_) => EXIT_FAILURE,
        }
    }
}
