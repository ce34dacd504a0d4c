pub mod fixtures;
pub mod pdf_assertions;

use findtext::Settings;
use lopdf::Document as LopdfDocument;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A temporary directory holding the input PDF and terms file of one run.
pub struct Workspace {
    pub dir: TempDir,
    pub input: PathBuf,
    pub terms: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    /// Writes `doc` and a terms file listing `terms` into a fresh directory.
    pub fn new(doc: &mut LopdfDocument, terms: &[&str]) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.pdf");
        let terms_path = dir.path().join("terms.json");
        let output = dir.path().join("output.pdf");
        doc.save(&input)?;
        std::fs::write(&terms_path, fixtures::terms_json(terms))?;
        Ok(Self {
            dir,
            input,
            terms: terms_path,
            output,
        })
    }

    /// Quiet settings pointing at this workspace's files.
    pub fn settings(&self) -> Settings {
        Settings::new(&self.input, &self.terms, &self.output).with_quiet(true)
    }

    pub fn output_doc(&self) -> Result<LopdfDocument, lopdf::Error> {
        LopdfDocument::load(&self.output)
    }
}

/// Runs the compiled `findtext` binary with `args`.
pub fn run_cli<I, S>(args: I) -> std::io::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_findtext"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
}
