// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod highlight;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Text Highlight CLI
#[derive(Parser, Debug)]
#[command(name = "text-highlight-cli")]
#[command(version)]
#[command(about = "Offline tools for the text highlight model", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Highlight text in an image file
    Highlight(highlight::HighlightArgs),

    /// Show model input/output details
    Info(highlight::InfoArgs),
}

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Highlight(args) => highlight::highlight_file(args),
        Commands::Info(args) => highlight::model_info(args),
    }
}
