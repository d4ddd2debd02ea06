// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the ImageIO plugin catalog.
//!
//! This crate provides the ABI version tag plugins are checked against, the
//! error taxonomy used by the catalog and dispatcher, and the process-wide
//! last-error sink.

pub mod error;
pub mod last_error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ImageIoError, PluginError};
pub use last_error::{geterror, has_error, set_error};
pub use types::{FormatKind, IMAGEIO_VERSION};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_kind_display_and_parse() {
        use std::str::FromStr;

        for kind in FormatKind::ALL {
            let s = kind.to_string();
            let parsed = FormatKind::from_str(&s).expect("should parse back");
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn format_kind_serialization() {
        let json = serde_json::to_string(&FormatKind::Input).expect("should serialize");
        let parsed: FormatKind = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(parsed, FormatKind::Input);
    }

    #[test]
    fn symbol_tags_are_lower_case() {
        assert_eq!(FormatKind::Input.symbol_tag(), "input");
        assert_eq!(FormatKind::Output.symbol_tag(), "output");
    }
}
