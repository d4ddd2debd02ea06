// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatcher: resolves a filename to a format and creates codec instances.
//!
//! All registry reads and catalog builds happen under one mutex. The
//! resolved factory is cloned out and invoked after the guard is dropped,
//! so a codec whose initialisation calls back into `create_input` or
//! `create_output` cannot deadlock against its own lookup.

use std::collections::HashSet;
use std::ffi::c_void;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use imageio_core::{FormatKind, ImageIoError, set_error};

use crate::catalog::{
    CatalogOptions, ScanStats, catalog_all_plugins, merged_searchpath, walk_searchpath,
};
use crate::instance::{ImageInput, ImageOutput};
use crate::loader::{DylibLoader, ModuleLoader};
use crate::record::Factory;
use crate::registry::FormatRegistry;

static GLOBAL: LazyLock<ImageIo> =
    LazyLock::new(|| ImageIo::new(Arc::new(DylibLoader), CatalogOptions::default()));

#[derive(Default)]
struct CatalogState {
    registry: FormatRegistry,
    scanned: HashSet<String>,
}

/// A plugin catalog with its dispatch entry points.
///
/// Most callers use the process-wide instance through [`create_input`] and
/// [`create_output`]; separate instances are useful for tests and tools that
/// want their own loader.
pub struct ImageIo {
    loader: Arc<dyn ModuleLoader>,
    options: CatalogOptions,
    state: Mutex<CatalogState>,
}

impl ImageIo {
    /// Create an empty catalog using `loader` to open plugin modules.
    pub fn new(loader: Arc<dyn ModuleLoader>, options: CatalogOptions) -> Self {
        Self {
            loader,
            options,
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// The process-wide catalog backed by shared libraries.
    pub fn global() -> &'static ImageIo {
        &GLOBAL
    }

    /// Options this catalog was created with.
    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    // Poisoning is ignored: the registry is insert-only.
    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a reader for `filename`, scanning `searchpath` if needed.
    pub fn create_input(
        &self,
        filename: &str,
        searchpath: &str,
    ) -> Result<ImageInput, ImageIoError> {
        report(self.create(FormatKind::Input, filename, searchpath))
            .map(|(raw, factory)| ImageInput::new(raw, factory))
    }

    /// Create a writer for `filename`, scanning `searchpath` if needed.
    pub fn create_output(
        &self,
        filename: &str,
        searchpath: &str,
    ) -> Result<ImageOutput, ImageIoError> {
        report(self.create(FormatKind::Output, filename, searchpath))
            .map(|(raw, factory)| ImageOutput::new(raw, factory))
    }

    fn create(
        &self,
        kind: FormatKind,
        filename: &str,
        searchpath: &str,
    ) -> Result<(NonNull<c_void>, Factory), ImageIoError> {
        let factory = self.resolve(kind, filename, searchpath)?;
        let raw = factory.create().ok_or_else(|| ImageIoError::CreateFailed {
            format: factory.format_name().to_string(),
            kind,
        })?;
        Ok((raw, factory))
    }

    /// Find the factory that would handle `filename` without invoking it.
    ///
    /// On a miss the searchpath is cataloged and the lookup retried.
    pub fn resolve(
        &self,
        kind: FormatKind,
        filename: &str,
        searchpath: &str,
    ) -> Result<Factory, ImageIoError> {
        let key = format_key(filename).ok_or_else(|| {
            ImageIoError::InvalidArgument(format!(
                "create_{}() called with no filename",
                kind.symbol_tag()
            ))
        })?;

        let mut state = self.lock();
        if state.registry.lookup(kind, &key).is_none() {
            self.scan(&mut state, searchpath);
        }
        state
            .registry
            .lookup(kind, &key)
            .cloned()
            .ok_or_else(|| ImageIoError::PluginNotFound {
                filename: filename.to_string(),
                searchpath: searchpath.to_string(),
            })
    }

    /// Catalog every plugin on `searchpath` (plus the environment path).
    pub fn catalog_all_plugins(&self, searchpath: &str) -> ScanStats {
        let mut state = self.lock();
        catalog_all_plugins(
            &mut state.registry,
            self.loader.as_ref(),
            &self.options,
            searchpath,
        )
    }

    fn scan(&self, state: &mut CatalogState, searchpath: &str) {
        let merged = merged_searchpath(&self.options, searchpath);
        if !self.options.rescan_on_miss && !state.scanned.insert(merged.clone()) {
            tracing::trace!(searchpath = %merged, "already walked, not rescanning");
            return;
        }
        walk_searchpath(&mut state.registry, self.loader.as_ref(), &merged);
    }

    /// Run `f` against the registry while holding the catalog lock.
    ///
    /// `f` must not call back into this catalog.
    pub fn with_registry<R>(&self, f: impl FnOnce(&FormatRegistry) -> R) -> R {
        f(&self.lock().registry)
    }

    /// Sorted list of cataloged format names.
    pub fn format_list(&self) -> Vec<String> {
        self.with_registry(FormatRegistry::format_list)
    }

    /// Sorted list of extensions routed to a factory of the given kind.
    pub fn extension_list(&self, kind: FormatKind) -> Vec<String> {
        self.with_registry(|registry| registry.extension_list(kind))
    }
}

impl std::fmt::Debug for ImageIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageIo")
            .field("options", &self.options)
            .field("registry", &self.lock().registry)
            .finish()
    }
}

/// Record a failure in the last-error sink before handing it back.
fn report<T>(result: Result<T, ImageIoError>) -> Result<T, ImageIoError> {
    if let Err(e) = &result {
        set_error(e.to_string());
    }
    result
}

/// Derive the lower-cased registry key for `filename`.
///
/// The key is the file extension without its leading dot. A filename with
/// no extension is taken to be a format name itself. Returns `None` for an
/// empty filename.
pub fn format_key(filename: &str) -> Option<String> {
    if filename.is_empty() {
        return None;
    }
    let key = match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext,
        None => filename.strip_prefix('.').unwrap_or(filename),
    };
    Some(key.to_lowercase())
}

/// Create a reader for `filename` using the process-wide catalog.
pub fn create_input(filename: &str, searchpath: &str) -> Result<ImageInput, ImageIoError> {
    ImageIo::global().create_input(filename, searchpath)
}

/// Create a writer for `filename` using the process-wide catalog.
pub fn create_output(filename: &str, searchpath: &str) -> Result<ImageOutput, ImageIoError> {
    ImageIo::global().create_output(filename, searchpath)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_lower_cased_extension() {
        assert_eq!(format_key("photo.png").as_deref(), Some("png"));
        assert_eq!(format_key("photo.PNG").as_deref(), Some("png"));
        assert_eq!(format_key("/some/dir/scan.v2.TIFF").as_deref(), Some("tiff"));
    }

    #[test]
    fn bare_name_is_the_key() {
        assert_eq!(format_key("png").as_deref(), Some("png"));
        assert_eq!(format_key("OpenEXR").as_deref(), Some("openexr"));
    }

    #[test]
    fn leading_dot_is_stripped() {
        assert_eq!(format_key(".jpg").as_deref(), Some("jpg"));
    }

    #[test]
    fn empty_filename_has_no_key() {
        assert_eq!(format_key(""), None);
    }

    #[test]
    fn global_catalog_rejects_empty_filename() {
        let err = create_input("", "").unwrap_err();
        assert!(matches!(err, ImageIoError::InvalidArgument(_)));
    }
}
