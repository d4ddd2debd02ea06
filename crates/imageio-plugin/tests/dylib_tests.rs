// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog tests against real shared libraries built with the system C
//! compiler (`$CC`, default `cc`). Skipped when no compiler can be spawned.

#![cfg(unix)]

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use imageio_core::FormatKind;
use imageio_plugin::naming::plugin_file_name;
use imageio_plugin::{CatalogOptions, DylibLoader, ImageIo};

const PNG_PLUGIN: &str = r#"
int imageio_version = 3;
static int png_reader;
void *png_input_imageio_create(void) { return &png_reader; }
const char *png_input_extensions[] = { "PNG", "apng", 0 };
"#;

const STALE_PLUGIN: &str = r#"
int imageio_version = 2;
static int tga_reader;
void *tga_input_imageio_create(void) { return &tga_reader; }
"#;

const EMPTY_PLUGIN: &str = r#"
int imageio_version = 3;
"#;

/// Compile `source` into `<dir>/<format>.imageio.<ext>`.
/// Returns `false` when no compiler is available.
fn build_plugin(dir: &Path, format: &str, source: &str) -> bool {
    let src = dir.join(format!("{format}.c"));
    std::fs::write(&src, source).unwrap();
    let compiler = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());

    let output = Command::new(&compiler)
        .args(["-shared", "-fPIC", "-O0", "-o"])
        .arg(dir.join(plugin_file_name(format)))
        .arg(&src)
        .output();
    match output {
        Ok(output) => {
            assert!(
                output.status.success(),
                "{compiler} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            eprintln!("skipping: C compiler `{compiler}` not found");
            false
        }
        Err(e) => panic!("failed to run {compiler}: {e}"),
    }
}

#[test]
fn shared_library_plugins_are_cataloged() {
    let dir = tempfile::tempdir().unwrap();
    if !build_plugin(dir.path(), "png", PNG_PLUGIN) {
        return;
    }
    assert!(build_plugin(dir.path(), "tga", STALE_PLUGIN));
    assert!(build_plugin(dir.path(), "bmp", EMPTY_PLUGIN));

    let catalog = ImageIo::new(
        Arc::new(DylibLoader),
        CatalogOptions {
            library_path_env: "IMAGEIO_DYLIB_TEST_UNSET".to_string(),
            rescan_on_miss: true,
        },
    );
    let searchpath = dir.path().display().to_string();

    let stats = catalog.catalog_all_plugins(&searchpath);
    assert_eq!(stats.candidates, 3);
    assert_eq!(stats.registered, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(catalog.format_list(), vec!["png"]);
    assert_eq!(catalog.extension_list(FormatKind::Input), vec!["apng", "png"]);

    let by_ext = catalog.create_input("photo.png", &searchpath).unwrap();
    let by_alias = catalog.create_input("photo.APNG", &searchpath).unwrap();
    assert_eq!(by_ext.as_ptr(), by_alias.as_ptr());
    assert_eq!(by_ext.format_name(), "png");

    assert!(catalog.create_input("image.tga", &searchpath).is_err());
    assert!(catalog.create_output("photo.png", &searchpath).is_err());
}
