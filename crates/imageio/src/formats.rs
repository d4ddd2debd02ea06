// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `imageio formats` command implementation.
//!
//! Walks the searchpath once, then prints every registered format with
//! its reader/writer capability, claimed extensions and plugin file.

use std::path::PathBuf;

use imageio_core::{FormatKind, ImageIoError};
use imageio_plugin::ImageIo;
use serde::Serialize;

/// One row of `imageio formats` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatSummary {
    pub format: String,
    pub input: bool,
    pub output: bool,
    pub input_extensions: Vec<String>,
    pub output_extensions: Vec<String>,
    pub plugin: PathBuf,
}

/// Catalog the searchpath and summarize the registry, sorted by format name.
pub fn collect_formats(catalog: &ImageIo, searchpath: &str) -> Vec<FormatSummary> {
    let stats = catalog.catalog_all_plugins(searchpath);
    tracing::debug!(
        directories = stats.directories,
        candidates = stats.candidates,
        registered = stats.registered,
        skipped = stats.skipped,
        "searchpath cataloged"
    );

    catalog.with_registry(|registry| {
        registry
            .records()
            .into_iter()
            .map(|record| FormatSummary {
                format: record.format_name().to_string(),
                input: record.factory(FormatKind::Input).is_some(),
                output: record.factory(FormatKind::Output).is_some(),
                input_extensions: record
                    .extensions(FormatKind::Input)
                    .iter()
                    .cloned()
                    .collect(),
                output_extensions: record
                    .extensions(FormatKind::Output)
                    .iter()
                    .cloned()
                    .collect(),
                plugin: record.path().to_path_buf(),
            })
            .collect()
    })
}

/// Run the `imageio formats` command.
pub fn run_formats(catalog: &ImageIo, searchpath: &str, json: bool) -> Result<(), ImageIoError> {
    let formats = collect_formats(catalog, searchpath);

    if json {
        return crate::print_json(&formats);
    }

    if formats.is_empty() {
        println!("no plugins found (searchpath = \"{searchpath}\")");
        return Ok(());
    }

    println!("{:<12} {:<3} {:<3} {:<24} PLUGIN", "FORMAT", "IN", "OUT", "EXTENSIONS");
    for summary in &formats {
        println!(
            "{:<12} {:<3} {:<3} {:<24} {}",
            summary.format,
            mark(summary.input),
            mark(summary.output),
            extension_column(summary),
            summary.plugin.display()
        );
    }
    Ok(())
}

fn mark(present: bool) -> &'static str {
    if present { "x" } else { "-" }
}

/// Union of reader and writer extensions, comma-separated.
fn extension_column(summary: &FormatSummary) -> String {
    let mut all: Vec<&str> = summary
        .input_extensions
        .iter()
        .chain(&summary.output_extensions)
        .map(String::as_str)
        .collect();
    all.sort_unstable();
    all.dedup();
    if all.is_empty() {
        "-".to_string()
    } else {
        all.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageio_test_utils::{Codec, MockPlugin, PluginHarness};

    #[test]
    fn summaries_report_capabilities() {
        let harness = PluginHarness::new();
        let tiff = harness.install(
            "plugins",
            &MockPlugin::new("tiff")
                .with_input(Codec::Alpha.create_fn(), &["tif", "tiff"])
                .with_output(Codec::Beta.create_fn(), &["tif"]),
        );
        harness.install(
            "plugins",
            &MockPlugin::new("png").with_input(Codec::Gamma.create_fn(), &["png"]),
        );
        let catalog = harness.catalog();

        let formats = collect_formats(&catalog, &harness.searchpath(&["plugins"]));

        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].format, "png");
        assert!(formats[0].input && !formats[0].output);
        assert_eq!(formats[1].format, "tiff");
        assert!(formats[1].input && formats[1].output);
        assert_eq!(formats[1].input_extensions, vec!["tif", "tiff"]);
        assert_eq!(formats[1].plugin, tiff);
        assert_eq!(extension_column(&formats[1]), "tif,tiff");
    }

    #[test]
    fn empty_searchpath_lists_nothing() {
        let harness = PluginHarness::new();
        let catalog = harness.catalog();
        assert!(collect_formats(&catalog, &harness.searchpath(&["empty"])).is_empty());
    }
}
