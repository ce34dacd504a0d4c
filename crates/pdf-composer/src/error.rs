use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Invalid table of contents: {0}")]
    InvalidToc(String),

    #[error("{0}")]
    Other(String),
}
