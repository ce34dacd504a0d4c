//! The document seam the page processor works against, and its `lopdf`
//! implementation.

use crate::config::EmphasisMode;
use crate::error::FindTextError;
use findtext_composer::{add_highlight, add_outline, set_toc};
use findtext_text::extract_page;
use findtext_types::{Rect, TocEntry};
use log::{debug, info};
use lopdf::{Document, ObjectId};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// The operations the page processor needs from a PDF document.
///
/// Pages are addressed by 0-based index in document order.
pub trait MarkupDocument {
    fn page_count(&self) -> usize;

    /// Searches one page for every term, returning the match rectangles of
    /// each term in the order the terms were given.
    fn search_page(&self, page_index: usize, terms: &[String]) -> Result<Vec<Vec<Rect>>, FindTextError>;

    /// Marks `rect` on the page and finalizes the annotation's appearance.
    fn annotate(&mut self, page_index: usize, rect: Rect, emphasis: EmphasisMode) -> Result<(), FindTextError>;

    /// Replaces the document outline.
    fn set_toc(&mut self, entries: &[TocEntry]) -> Result<(), FindTextError>;

    fn save(&mut self, path: &Path) -> Result<(), FindTextError>;
}

/// A PDF loaded into memory with `lopdf`.
#[derive(Debug)]
pub struct PdfDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, FindTextError> {
        let bytes = fs::read(path).map_err(|source| FindTextError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Document::load_mem(&bytes).map_err(|source| FindTextError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let this = Self::from_document(doc);
        info!("Opened {} ({} pages)", path.display(), this.page_count());
        Ok(this)
    }

    pub fn from_document(doc: Document) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self { doc, page_ids }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    fn page_id(&self, page_index: usize) -> Result<ObjectId, FindTextError> {
        self.page_ids
            .get(page_index)
            .copied()
            .ok_or(FindTextError::PageOutOfRange(page_index + 1))
    }
}

impl MarkupDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn search_page(&self, page_index: usize, terms: &[String]) -> Result<Vec<Vec<Rect>>, FindTextError> {
        let page_id = self.page_id(page_index)?;
        let page = extract_page(&self.doc, page_id).map_err(|source| FindTextError::Text {
            page: page_index + 1,
            source,
        })?;
        debug!("Page {}: {} text lines", page_index + 1, page.lines().len());
        Ok(terms.iter().map(|term| page.search(term)).collect())
    }

    fn annotate(&mut self, page_index: usize, rect: Rect, emphasis: EmphasisMode) -> Result<(), FindTextError> {
        let page_id = self.page_id(page_index)?;
        let annotation = match emphasis {
            EmphasisMode::Highlight => add_highlight(&mut self.doc, page_id, rect)?,
            EmphasisMode::Outline => add_outline(&mut self.doc, page_id, rect)?,
        };
        annotation.update(&mut self.doc)?;
        Ok(())
    }

    fn set_toc(&mut self, entries: &[TocEntry]) -> Result<(), FindTextError> {
        set_toc(&mut self.doc, entries)?;
        Ok(())
    }

    /// Writes to a temporary file next to `path` and renames it into place, so
    /// a failed save never leaves a partial output file.
    fn save(&mut self, path: &Path) -> Result<(), FindTextError> {
        let save_error = |message: String| FindTextError::Save {
            path: path.to_path_buf(),
            message,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| save_error(e.to_string()))?;
        self.doc
            .save_to(temp.as_file_mut())
            .map_err(|e| save_error(e.to_string()))?;
        temp.persist(path).map_err(|e| save_error(e.to_string()))?;
        info!("Saved {}", path.display());
        Ok(())
    }
}
