// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog builder: discovers plugin modules on a searchpath, validates
//! them, and populates the [`FormatRegistry`].
//!
//! A module is fully inspected before it touches the registry. Modules that
//! fail to open, carry the wrong ABI version, or export no factory are
//! closed and leave no trace, so they never block a later plugin with the
//! same format name.

use std::collections::BTreeSet;
use std::ffi::{CStr, c_char, c_int, c_void};
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use imageio_core::{FormatKind, IMAGEIO_VERSION, PluginError};

use crate::loader::{Module, ModuleLoader};
use crate::naming;
use crate::record::{CreateFn, Factory, PluginRecord};
use crate::registry::FormatRegistry;
use crate::searchpath::{
    DEFAULT_LIBRARY_PATH_ENV, library_path_from_env, merge_library_path, searchpath_split,
};

/// Tunables for catalog building and dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Environment variable whose value is searched ahead of the caller's path.
    pub library_path_env: String,
    /// Re-walk the searchpath on every lookup miss. When false, each
    /// distinct merged searchpath (library-path variable plus caller path)
    /// is walked at most once per catalog.
    pub rescan_on_miss: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            library_path_env: DEFAULT_LIBRARY_PATH_ENV.to_string(),
            rescan_on_miss: true,
        }
    }
}

/// Result of cataloging a single plugin file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cataloged {
    /// The module was validated and its factories registered.
    Registered { input: bool, output: bool },
    /// This exact file was cataloged before; nothing changed.
    AlreadyCataloged,
}

/// Summary of one walk over a searchpath.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Directories that were enumerated.
    pub directories: usize,
    /// Files whose names matched the plugin suffix.
    pub candidates: usize,
    /// Plugins newly added to the registry.
    pub registered: usize,
    /// Candidates that contributed nothing (see [`PluginError`]).
    pub skipped: usize,
}

/// Catalog the plugin at `path` under `format_name`.
///
/// Every failure is local to this plugin and leaves the registry untouched.
pub fn catalog_plugin(
    registry: &mut FormatRegistry,
    loader: &dyn ModuleLoader,
    format_name: &str,
    path: &Path,
) -> Result<Cataloged, PluginError> {
    if let Some(existing) = registry.record(format_name) {
        if existing.path() == path {
            return Ok(Cataloged::AlreadyCataloged);
        }
        tracing::warn!(
            format = format_name,
            existing = %existing.path().display(),
            ignored = %path.display(),
            "format had multiple plugins, ignoring all but the first one"
        );
        return Err(PluginError::DuplicatePluginForFormat {
            format: format_name.to_string(),
            existing: existing.path().to_path_buf(),
            ignored: path.to_path_buf(),
        });
    }

    let module = loader
        .open(path)
        .map_err(|reason| PluginError::ModuleOpenFailed {
            path: path.to_path_buf(),
            reason,
        })?;

    let found = module.symbol(naming::VERSION_SYMBOL).map(|ptr| {
        // SAFETY: `imageio_version` is exported as a C int by convention.
        unsafe { ptr.cast::<c_int>().as_ptr().read() }
    });
    if found != Some(IMAGEIO_VERSION) {
        return Err(PluginError::VersionMismatch {
            path: path.to_path_buf(),
            expected: IMAGEIO_VERSION,
            found,
        });
    }

    let format: Arc<str> = Arc::from(format_name);
    let mut record = PluginRecord::new(format_name, path, Arc::clone(&module));
    let mut exported = Vec::new();
    // Output is probed before input.
    for kind in [FormatKind::Output, FormatKind::Input] {
        if let Some(factory) = resolve_factory(&module, &format, kind) {
            let extensions = read_extensions(module.as_ref(), format_name, kind);
            record.set_factory(factory.clone(), extensions.clone());
            exported.push((kind, factory, extensions));
        }
    }

    if exported.is_empty() {
        return Err(PluginError::NoFactories {
            path: path.to_path_buf(),
        });
    }

    let mut outcome = (false, false);
    for (kind, factory, extensions) in exported {
        if !registry.register_format(kind, format_name, factory.clone()) {
            continue;
        }
        match kind {
            FormatKind::Input => outcome.0 = true,
            FormatKind::Output => outcome.1 = true,
        }
        for extension in &extensions {
            if let Err(e) = registry.register_extension(kind, extension, factory.clone()) {
                tracing::trace!(format = format_name, error = %e, "extension left to earlier plugin");
            }
        }
    }
    registry.insert_record(record);

    tracing::debug!(
        format = format_name,
        path = %path.display(),
        input = outcome.0,
        output = outcome.1,
        "cataloged plugin"
    );
    Ok(Cataloged::Registered {
        input: outcome.0,
        output: outcome.1,
    })
}

/// Walk every directory on the searchpath and catalog each plugin file.
///
/// The directories named by `options.library_path_env` are searched first.
/// Entries within a directory are visited in file-name order so that
/// extension claims are deterministic.
pub fn catalog_all_plugins(
    registry: &mut FormatRegistry,
    loader: &dyn ModuleLoader,
    options: &CatalogOptions,
    searchpath: &str,
) -> ScanStats {
    walk_searchpath(registry, loader, &merged_searchpath(options, searchpath))
}

/// The searchpath a scan actually walks: the directories named by
/// `options.library_path_env`, then `searchpath`.
pub fn merged_searchpath(options: &CatalogOptions, searchpath: &str) -> String {
    let library_path = library_path_from_env(&options.library_path_env);
    merge_library_path(library_path.as_deref(), searchpath)
}

/// Catalog every plugin on an already merged searchpath.
pub(crate) fn walk_searchpath(
    registry: &mut FormatRegistry,
    loader: &dyn ModuleLoader,
    merged: &str,
) -> ScanStats {
    let mut stats = ScanStats::default();

    for dir in searchpath_split(merged) {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "cannot read plugin directory");
                continue;
            }
        };
        stats.directories += 1;

        let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
        paths.sort();

        for path in paths {
            let Some(format_name) = path
                .file_name()
                .and_then(|leaf| leaf.to_str())
                .and_then(naming::format_name_for)
            else {
                continue;
            };
            stats.candidates += 1;

            match catalog_plugin(registry, loader, format_name, &path) {
                Ok(Cataloged::Registered { .. }) => stats.registered += 1,
                Ok(Cataloged::AlreadyCataloged) => {}
                Err(e) => {
                    stats.skipped += 1;
                    tracing::debug!(error = %e, "skipping plugin");
                }
            }
        }
    }

    tracing::info!(
        searchpath = %merged,
        directories = stats.directories,
        candidates = stats.candidates,
        registered = stats.registered,
        skipped = stats.skipped,
        "plugin scan finished"
    );
    stats
}

fn resolve_factory(
    module: &Arc<dyn Module>,
    format: &Arc<str>,
    kind: FormatKind,
) -> Option<Factory> {
    let ptr = module.symbol(&naming::create_symbol(format, kind))?;
    // SAFETY: the module passed the ABI version check, so its
    // `<fmt>_*_imageio_create` exports have the `CreateFn` signature.
    let create = unsafe { std::mem::transmute::<*mut c_void, CreateFn>(ptr.as_ptr()) };
    // SAFETY: the factory keeps `module` alive alongside the function pointer.
    Some(unsafe { Factory::new(Arc::clone(format), kind, create, Arc::clone(module)) })
}

fn read_extensions(module: &dyn Module, format_name: &str, kind: FormatKind) -> BTreeSet<String> {
    let mut extensions = BTreeSet::new();
    let Some(list) = module.symbol(&naming::extensions_symbol(format_name, kind)) else {
        return extensions;
    };
    let mut cursor: NonNull<*const c_char> = list.cast();
    loop {
        // SAFETY: the symbol is a null-terminated array of C strings, and the
        // module is alive for the duration of this loop.
        let entry = unsafe { cursor.as_ptr().read() };
        if entry.is_null() {
            break;
        }
        // SAFETY: non-null entries are NUL-terminated strings owned by the module.
        let extension = unsafe { CStr::from_ptr(entry) };
        extensions.insert(extension.to_string_lossy().to_lowercase());
        // SAFETY: `entry` was not the terminator, so the next slot is in bounds.
        cursor = unsafe { cursor.add(1) };
    }
    extensions
}
