//! The search terms file: `{ "text_terms": ["term", ...] }`.

use crate::error::FindTextError;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TermsFile {
    text_terms: Vec<String>,
}

/// Reads the ordered term list. A missing `text_terms` key or malformed JSON
/// is an error; empty terms are kept (they never match) but reported.
pub fn load_terms(path: &Path) -> Result<Vec<String>, FindTextError> {
    let data = fs::read_to_string(path).map_err(|source| FindTextError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let terms = parse_terms(&data).map_err(|source| FindTextError::Terms {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} search terms from {}", terms.len(), path.display());
    Ok(terms)
}

fn parse_terms(data: &str) -> Result<Vec<String>, serde_json::Error> {
    let file: TermsFile = serde_json::from_str(data)?;
    for (i, term) in file.text_terms.iter().enumerate() {
        if term.is_empty() {
            warn!("Search term #{} is empty and will never match", i + 1);
        }
    }
    Ok(file.text_terms)
}
