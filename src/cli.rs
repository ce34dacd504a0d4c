//! Command line flags and their conversion into run settings.

use clap::{Parser, ValueEnum};
use findtext_core::{EmphasisMode, Settings};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "findtext",
    about = "Find text terms in a PDF, mark every match and list the matches in the outline",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Input PDF file
    #[arg(short, long, value_name = "PDF")]
    pub input: PathBuf,

    /// JSON file with the search terms: {"text_terms": [...]}
    #[arg(short, long, value_name = "JSON")]
    pub search: PathBuf,

    /// Output PDF file
    #[arg(short, long, value_name = "PDF")]
    pub output: PathBuf,

    /// Do not print per-page progress
    #[arg(short, long)]
    pub quiet: bool,

    /// How matches are marked
    #[arg(short, long, value_enum, default_value_t = EmphasisArg::Outline)]
    pub emphasis: EmphasisArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmphasisArg {
    /// Translucent yellow highlight
    Highlight,
    /// Red rectangle around the match
    Outline,
}

impl From<EmphasisArg> for EmphasisMode {
    fn from(arg: EmphasisArg) -> Self {
        match arg {
            EmphasisArg::Highlight => EmphasisMode::Highlight,
            EmphasisArg::Outline => EmphasisMode::Outline,
        }
    }
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings::new(cli.input, cli.search, cli.output)
            .with_quiet(cli.quiet)
            .with_emphasis(cli.emphasis.into())
    }
}
