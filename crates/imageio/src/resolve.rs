// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `imageio resolve` command implementation.

use std::path::PathBuf;

use imageio_core::{FormatKind, ImageIoError};
use imageio_plugin::ImageIo;
use serde::Serialize;

/// Which plugin would handle a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub file: String,
    pub kind: FormatKind,
    pub format: String,
    pub plugin: Option<PathBuf>,
}

/// Resolve `file` without creating an instance.
pub fn resolve_file(
    catalog: &ImageIo,
    file: &str,
    kind: FormatKind,
    searchpath: &str,
) -> Result<Resolution, ImageIoError> {
    let factory = catalog.resolve(kind, file, searchpath)?;
    let format = factory.format_name().to_string();
    let plugin = catalog.with_registry(|registry| {
        registry
            .record(&format)
            .map(|record| record.path().to_path_buf())
    });
    Ok(Resolution {
        file: file.to_string(),
        kind,
        format,
        plugin,
    })
}

/// Run the `imageio resolve` command.
pub fn run_resolve(
    catalog: &ImageIo,
    file: &str,
    kind: FormatKind,
    searchpath: &str,
    json: bool,
) -> Result<(), ImageIoError> {
    let resolution = resolve_file(catalog, file, kind, searchpath)?;
    if json {
        return crate::print_json(&resolution);
    }
    match &resolution.plugin {
        Some(path) => println!(
            "{}: {} {} ({})",
            resolution.file,
            resolution.format,
            resolution.kind,
            path.display()
        ),
        None => println!("{}: {} {}", resolution.file, resolution.format, resolution.kind),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageio_test_utils::{Codec, MockPlugin, PluginHarness};

    #[test]
    fn resolves_extension_to_plugin_file() {
        let harness = PluginHarness::new();
        let jpeg = harness.install(
            "plugins",
            &MockPlugin::new("jpeg").with_output(Codec::Alpha.create_fn(), &["jpg", "jpeg"]),
        );
        let catalog = harness.catalog();

        let resolution = resolve_file(
            &catalog,
            "holiday.JPG",
            FormatKind::Output,
            &harness.searchpath(&["plugins"]),
        )
        .unwrap();

        assert_eq!(resolution.format, "jpeg");
        assert_eq!(resolution.kind, FormatKind::Output);
        assert_eq!(resolution.plugin, Some(jpeg));
    }

    #[test]
    fn unknown_extension_is_plugin_not_found() {
        let harness = PluginHarness::new();
        let catalog = harness.catalog();

        let err = resolve_file(
            &catalog,
            "scan.xyz",
            FormatKind::Input,
            &harness.searchpath(&["plugins"]),
        )
        .unwrap_err();
        assert!(matches!(err, ImageIoError::PluginNotFound { .. }));
    }
}
