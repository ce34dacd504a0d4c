//! Run settings, resolved once from the command line and passed by reference.

use crate::error::FindTextError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How each match is marked on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmphasisMode {
    /// A translucent yellow `Highlight` annotation.
    Highlight,
    /// A red rectangle (`Square` annotation) around the match.
    #[default]
    Outline,
}

impl EmphasisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Outline => "outline",
        }
    }
}

impl fmt::Display for EmphasisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmphasisMode {
    type Err = FindTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "highlight" => Ok(Self::Highlight),
            "outline" => Ok(Self::Outline),
            other => Err(FindTextError::InvalidEmphasis(other.to_string())),
        }
    }
}

/// Immutable configuration of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_path: PathBuf,
    pub search_terms_path: PathBuf,
    pub output_path: PathBuf,
    /// Suppresses the per-page progress lines.
    pub quiet: bool,
    pub emphasis: EmphasisMode,
}

impl Settings {
    pub fn new(
        input_path: impl Into<PathBuf>,
        search_terms_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            search_terms_path: search_terms_path.into(),
            output_path: output_path.into(),
            quiet: false,
            emphasis: EmphasisMode::default(),
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_emphasis(mut self, emphasis: EmphasisMode) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Directory the output file will be written into.
    pub fn output_dir(&self) -> &Path {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}
