// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the ImageIO plugin catalog.
//!
//! [`ImageIoError`] is what callers of the dispatch entry points see.
//! [`PluginError`] describes why a single plugin module contributed nothing to
//! the catalog; those are logged and skipped, never surfaced by a dispatch call.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::FormatKind;

/// Errors returned by the public dispatch and configuration entry points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageIoError {
    /// The caller passed an argument that cannot be used (e.g. an empty filename).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No registered factory answers the format key, even after scanning.
    #[error("could not find a plugin for \"{filename}\"\n    searchpath = \"{searchpath}\"")]
    PluginNotFound { filename: String, searchpath: String },

    /// A factory was found but returned a null instance.
    #[error("{kind} plugin for format \"{format}\" failed to create an instance")]
    CreateFailed { format: String, kind: FormatKind },

    /// Configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Reasons a plugin module was skipped while cataloging.
///
/// None of these abort a scan: the module simply does not contribute.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    /// The module loader could not open the file.
    #[error("failed to open plugin {}: {reason}", path.display())]
    ModuleOpenFailed { path: PathBuf, reason: String },

    /// The module has no `imageio_version` symbol or it holds the wrong value.
    #[error(
        "plugin {} has ABI version {}, expected {expected}",
        path.display(),
        found.map_or_else(|| "<missing>".to_string(), |v| v.to_string())
    )]
    VersionMismatch {
        path: PathBuf,
        expected: i32,
        found: Option<i32>,
    },

    /// Another module already claimed this format name.
    #[error(
        "{format} had multiple plugins: \"{}\" as well as \"{}\"; ignoring all but the first one",
        existing.display(),
        ignored.display()
    )]
    DuplicatePluginForFormat {
        format: String,
        existing: PathBuf,
        ignored: PathBuf,
    },

    /// An extension was already routed to an earlier plugin's factory.
    #[error("{kind} extension \"{extension}\" is already claimed")]
    ExtensionAlreadyClaimed { kind: FormatKind, extension: String },

    /// The module exports neither an input nor an output factory.
    #[error("plugin {} exports no input or output factory", path.display())]
    NoFactories { path: PathBuf },
}
