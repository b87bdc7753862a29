//! texmeter - Document statistics for multi-file LaTeX projects
//!
//! texmeter provides:
//! - Include expansion with cycle protection
//! - Character, word, formula, code block and citation counts
//! - Per-section breakdown inclusive of nested headings
//! - Image resolution with file sizes
//! - Text or json reports

use anyhow::Result;
use clap::Parser;

use crate::core::model::ReportError;

mod cli;
mod core;
mod flows;
mod latex;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli::run(cli) {
        Err(err) => match err.downcast_ref::<ReportError>() {
            Some(ReportError::MainNotFound(path)) => {
                eprintln!("[report] Main file not found: {}", path.display());
                std::process::exit(2);
            }
            _ => Err(err),
        },
        ok => ok,
    }
}
