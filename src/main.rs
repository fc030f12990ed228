//! Document Quality CLI Tool
//!
//! Scores uploaded document images before they are stored.

use anyhow::Context;
use clap::Parser;
use doc_quality::cli::{run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).context("docq failed") {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
