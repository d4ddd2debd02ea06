// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ImageIO - inspect the runtime plugin catalog.
//!
//! This is the binary entry point. It loads configuration, builds a catalog
//! backed by real shared libraries and runs one subcommand against it.

mod formats;
mod resolve;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use imageio_config::model::{CatalogConfig, ImageIoConfig};
use imageio_core::{FormatKind, ImageIoError};
use imageio_plugin::{CatalogOptions, DylibLoader, ImageIo};

/// ImageIO - inspect the runtime plugin catalog.
#[derive(Parser, Debug)]
#[command(name = "imageio", version, about, long_about = None)]
struct Cli {
    /// Plugin searchpath; overrides `catalog.searchpath` from the config.
    #[arg(long, global = true)]
    searchpath: Option<String>,

    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every format found on the searchpath.
    Formats {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show which plugin would open FILE.
    Resolve {
        /// File name to resolve; only its extension (or bare name) matters.
        file: String,
        /// Resolve a writer instead of a reader.
        #[arg(long)]
        output: bool,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => imageio_config::load_and_validate_path(path),
        None => imageio_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            imageio_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level);

    let searchpath = effective_searchpath(&cli, &config);
    let catalog = ImageIo::new(Arc::new(DylibLoader), catalog_options(&config.catalog));
    tracing::debug!(searchpath = %searchpath, "catalog ready");

    let result = match cli.command {
        Commands::Formats { json } => formats::run_formats(&catalog, &searchpath, json),
        Commands::Resolve { file, output, json } => {
            let kind = if output {
                FormatKind::Output
            } else {
                FormatKind::Input
            };
            resolve::run_resolve(&catalog, &file, kind, &searchpath, json)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("imageio: {err}");
            ExitCode::FAILURE
        }
    }
}

/// The `--searchpath` flag wins over the configured one.
fn effective_searchpath(cli: &Cli, config: &ImageIoConfig) -> String {
    cli.searchpath
        .clone()
        .unwrap_or_else(|| config.catalog.searchpath.clone())
}

fn catalog_options(config: &CatalogConfig) -> CatalogOptions {
    CatalogOptions {
        library_path_env: config.library_path_env.clone(),
        rescan_on_miss: config.rescan_on_miss,
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` takes precedence.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("imageio={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Serialize `value` as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), ImageIoError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ImageIoError::Config(format!("failed to encode JSON: {e}")))?;
    println!("{text}");
    Ok(())
}
