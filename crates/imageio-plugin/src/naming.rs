// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File and symbol naming conventions for plugin modules.
//!
//! A plugin for format `fmt` lives in `fmt.imageio.<ext>` and exports
//! `imageio_version`, plus any of `fmt_input_imageio_create`,
//! `fmt_output_imageio_create`, `fmt_input_extensions` and
//! `fmt_output_extensions`.

use imageio_core::FormatKind;

/// Symbol holding the plugin's ABI version tag.
pub const VERSION_SYMBOL: &str = "imageio_version";

/// Platform-specific shared library extension.
pub fn plugin_extension() -> &'static str {
    if cfg!(target_os = "windows") {
        "dll"
    } else if cfg!(target_os = "macos") {
        "dylib"
    } else {
        "so"
    }
}

/// Suffix every plugin file name ends with (`.imageio.so` on Linux).
pub fn plugin_suffix() -> String {
    format!(".imageio.{}", plugin_extension())
}

/// File name a plugin for `format_name` is expected to have.
pub fn plugin_file_name(format_name: &str) -> String {
    format!("{format_name}{}", plugin_suffix())
}

/// Derive the format name from a directory entry's file name.
///
/// Returns `None` for files that are not plugins.
pub fn format_name_for(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(plugin_suffix().as_str())
        .filter(|name| !name.is_empty())
}

/// Name of the factory symbol for `format_name`.
pub fn create_symbol(format_name: &str, kind: FormatKind) -> String {
    format!("{format_name}_{}_imageio_create", kind.symbol_tag())
}

/// Name of the null-terminated extension list symbol for `format_name`.
pub fn extensions_symbol(format_name: &str, kind: FormatKind) -> String {
    format!("{format_name}_{}_extensions", kind.symbol_tag())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_name_strips_suffix() {
        let file = plugin_file_name("png");
        assert_eq!(format_name_for(&file), Some("png"));
    }

    #[test]
    fn non_plugin_files_are_ignored() {
        assert_eq!(format_name_for("README.md"), None);
        assert_eq!(format_name_for(&format!("libpng.{}", plugin_extension())), None);
        assert_eq!(format_name_for("png.imageio.txt"), None);
    }

    #[test]
    fn bare_suffix_is_not_a_plugin() {
        assert_eq!(format_name_for(&plugin_suffix()), None);
    }

    #[test]
    fn format_name_keeps_scanned_case() {
        let file = plugin_file_name("OpenEXR");
        assert_eq!(format_name_for(&file), Some("OpenEXR"));
    }

    #[test]
    fn symbol_names_follow_convention() {
        assert_eq!(create_symbol("png", FormatKind::Input), "png_input_imageio_create");
        assert_eq!(create_symbol("tiff", FormatKind::Output), "tiff_output_imageio_create");
        assert_eq!(extensions_symbol("jpeg", FormatKind::Input), "jpeg_input_extensions");
        assert_eq!(extensions_symbol("jpeg", FormatKind::Output), "jpeg_output_extensions");
    }
}
