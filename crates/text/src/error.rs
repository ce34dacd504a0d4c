use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Malformed content stream: {0}")]
    Content(String),

    #[error("Page {0:?} is not a page dictionary")]
    NotAPage(lopdf::ObjectId),
}
