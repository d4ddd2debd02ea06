// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment reports where extraction failed; this module turns each failure
//! into a [`ConfigError`] that miette renders against the TOML it came from,
//! listing the keys of the offending table and a close match when there is
//! one.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::fmt::Write as _;

use figment::error::{Error as FigmentError, Kind};
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

use crate::model;

/// Jaro-Winkler score a key must beat to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// A configuration error that miette can render.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no table of the model accepts.
    #[error("unknown key `{key}` in {}", table_label(section))]
    #[diagnostic(
        code(imageio::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Dotted table path; empty for the top level.
        section: String,
        suggestion: Option<String>,
        /// Comma-separated keys the table accepts.
        valid_keys: String,
        #[label("not recognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for `{key}`: {detail}")]
    #[diagnostic(code(imageio::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that parsed but is not acceptable.
    #[error("validation error: {message}")]
    #[diagnostic(code(imageio::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(imageio::config::other))]
    Other(String),
}

fn table_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error carried by a `figment::Error` into a [`ConfigError`].
///
/// `sources` pairs a display name with TOML text and is used to attach spans.
pub fn figment_to_config_errors(
    err: FigmentError,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, sources))
        .collect()
}

fn convert(error: &FigmentError, sources: &[(String, String)]) -> ConfigError {
    let source = source_for(error, sources);
    match &error.kind {
        Kind::UnknownField(key, expected) => {
            let section = error.path.join(".");
            let valid = model::known_keys(&section).unwrap_or(*expected);
            let (span, src) = attach(source, &error.path, key);
            ConfigError::UnknownKey {
                key: key.clone(),
                suggestion: suggest_key(key, valid),
                valid_keys: valid.join(", "),
                section,
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) => {
            let (span, src) = match error.path.split_last() {
                Some((key, table)) => attach(source, table, key),
                None => (None, None),
            };
            ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.clone(),
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

/// The source the failing value came from: the file figment names, or the
/// only source when exactly one was supplied.
fn source_for<'a>(
    error: &FigmentError,
    sources: &'a [(String, String)],
) -> Option<&'a (String, String)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    match (file, sources) {
        (Some(path), _) => sources.iter().find(|(name, _)| *name == path),
        (None, [only]) => Some(only),
        (None, _) => None,
    }
}

fn attach(
    source: Option<&(String, String)>,
    table: &[String],
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some((name, content)) = source else {
        return (None, None);
    };
    match key_span(content, table, key) {
        Some(span) => (Some(span), Some(NamedSource::new(name, content.clone()))),
        None => (None, None),
    }
}

/// Span of `key` inside table `table` of `content`.
///
/// Only assignments under the matching `[table]` header count. A top-level
/// key may also be a table header itself (`[plugins]`).
pub fn key_span(content: &str, table: &[String], key: &str) -> Option<SourceSpan> {
    let wanted = table.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(header) = trimmed.strip_prefix('[') {
            let name = header.split(']').next().unwrap_or_default().trim();
            if wanted.is_empty() && name == key {
                let start = offset + indent + 1 + (header.len() - header.trim_start().len());
                return Some(SourceSpan::new(start.into(), key.len()));
            }
            current = name.to_string();
        } else if current == wanted
            && trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
        {
            return Some(SourceSpan::new((offset + indent).into(), key.len()));
        }

        offset += line.len();
    }

    None
}

/// The valid key closest to `unknown`, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render `errors` as a single report, one diagnostic after another.
pub fn render_report(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    let _ = writeln!(out, "imageio: {} configuration error(s)", errors.len());
    for error in errors {
        if handler.render_report(&mut out, error).is_err() {
            let _ = writeln!(out, "  {error}");
        }
    }
    out
}

/// Print [`render_report`] to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_report(errors));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> Vec<String> {
        vec![name.to_string()]
    }

    fn spanned<'a>(content: &'a str, span: SourceSpan) -> &'a str {
        &content[span.offset()..span.offset() + span.len()]
    }

    #[test]
    fn suggests_closest_catalog_key() {
        let valid = model::CatalogConfig::KEYS;
        assert_eq!(suggest_key("serchpath", valid).as_deref(), Some("searchpath"));
        assert_eq!(
            suggest_key("rescan_onmiss", valid).as_deref(),
            Some("rescan_on_miss")
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        assert_eq!(suggest_key("zzzzzz", model::CatalogConfig::KEYS), None);
    }

    #[test]
    fn key_span_stays_inside_its_table() {
        let content = "[catalog]\nlevel = 1\n[logging]\n  level = \"x\"\n";
        let span = key_span(content, &table("logging"), "level").unwrap();
        assert!(span.offset() > content.find("[logging]").unwrap());
        assert_eq!(spanned(content, span), "level");
    }

    #[test]
    fn key_span_ignores_prefix_matches() {
        let content = "[logging]\nlevels = 1\n";
        assert!(key_span(content, &table("logging"), "level").is_none());
    }

    #[test]
    fn key_span_finds_unknown_top_level_table() {
        let content = "[catalog]\n[ plugins ]\ndir = 1\n";
        let span = key_span(content, &[], "plugins").unwrap();
        assert_eq!(spanned(content, span), "plugins");
    }

    #[test]
    fn report_counts_errors() {
        let errors = vec![
            ConfigError::Validation {
                message: "logging.level `x` must be one of trace".to_string(),
            },
            ConfigError::Other("boom".to_string()),
        ];
        let report = render_report(&errors);
        assert!(report.starts_with("imageio: 2 configuration error(s)"));
        assert!(report.contains("logging.level"));
        assert!(report.contains("boom"));
    }
}
