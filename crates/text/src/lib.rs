//! Positioned text extraction and literal search over `lopdf` pages.
//!
//! `extract_page` interprets a page's content streams into a [`TextPage`]:
//! characters with user-space boxes, grouped into lines. [`TextPage::search`]
//! then turns a search term into the rectangles an annotation should cover.

pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
mod interpreter;
mod metrics;
mod objects;
pub mod page;
pub mod search;

pub use error::TextError;
pub use page::{TextChar, TextLine, TextPage};

use findtext_types::Matrix;
use interpreter::Interpreter;
use log::debug;
use lopdf::{Document, Object, ObjectId};
use objects::{inherited, resolve, resolve_dict, stream_bytes};

/// Extracts the positioned text of the page object `page_id`.
pub fn extract_page(doc: &Document, page_id: ObjectId) -> Result<TextPage, TextError> {
    let page = doc.get_dictionary(page_id)?;
    if matches!(page.get(b"Type").and_then(Object::as_name), Ok(kind) if kind != b"Page") {
        return Err(TextError::NotAPage(page_id));
    }
    let content = page_content(doc, page_id)?;
    let resources = inherited(doc, page_id, b"Resources").and_then(|o| resolve_dict(doc, o));

    let mut interpreter = Interpreter::new(doc);
    interpreter.run(&content, resources, Matrix::identity(), 0)?;
    let chars = interpreter.into_chars();
    debug!("Page {:?}: {} characters extracted", page_id, chars.len());
    Ok(TextPage::from_chars(chars))
}

/// Concatenates the page's content streams, which may be a single stream or an array.
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, TextError> {
    let page = doc.get_dictionary(page_id)?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    let streams = match resolve(doc, contents) {
        Some(Object::Array(items)) => items.iter().filter_map(|o| resolve(doc, o)).collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    };
    let mut content = Vec::new();
    for obj in streams {
        if let Object::Stream(stream) = obj {
            content.extend(stream_bytes(stream)?);
            content.push(b'\n');
        }
    }
    Ok(content)
}
