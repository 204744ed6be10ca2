//! Tinct - command line compiler

mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tinct_compiler::{compile_with_report, CompilerOptions};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Compile { input, output, config, rem, runtime_rem, pretty, deny_warnings } => {
            let mut options = load_options(config.as_deref())?;
            if let Some(rem) = rem {
                options.inline_rem = Some(rem);
            }
            if runtime_rem {
                options.inline_rem = None;
            }

            let css = read_input(&input)?;
            let report = compile_with_report(&css, options)
                .with_context(|| format!("failed to compile {}", input.display()))?;
            for warning in &report.warnings {
                tracing::warn!("{}: {}", input.display(), warning);
            }
            tracing::info!(
                "Compiled {} rules for {} classes",
                report.stylesheet.rule_count(),
                report.stylesheet.rule_sets.len()
            );

            let json = if pretty {
                serde_json::to_string_pretty(&report.stylesheet)?
            } else {
                serde_json::to_string(&report.stylesheet)?
            };
            write_output(output.as_deref(), &json)?;

            if deny_warnings && !report.warnings.is_empty() {
                bail!("{} warnings", report.warnings.len());
            }
        }
    }
    Ok(())
}

fn load_options(path: Option<&Path>) -> Result<CompilerOptions> {
    let Some(path) = path else {
        return Ok(CompilerOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid compiler options in {}", path.display()))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut css = String::new();
        io::stdin().read_to_string(&mut css).context("failed to read stdin")?;
        return Ok(css);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, json: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
            Ok(())
        }
    }
}
