use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tinct")]
#[command(about = "Compile CSS into Tinct style rules", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a stylesheet to JSON
    Compile {
        /// CSS file, or `-` for stdin
        input: PathBuf,
        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON file with compiler options
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the rem multiplier
        #[arg(long)]
        rem: Option<f64>,
        /// Keep `rem` as a runtime unit
        #[arg(long, conflicts_with = "rem")]
        runtime_rem: bool,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
        /// Exit with an error when the compile produced warnings
        #[arg(long)]
        deny_warnings: bool,
    },
}
