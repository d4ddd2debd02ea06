// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module loader adapter.
//!
//! The catalog only needs three things from a dynamic module: open it by
//! path, resolve a symbol address by name, and close it. Closing is modelled
//! as dropping the last `Arc<dyn Module>`, so a module that fails validation
//! is released as soon as the catalog lets go of it, and a registered module
//! lives as long as the registry or any factory cloned from it.

use std::ffi::c_void;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use libloading::Library;

/// An opened dynamic module.
///
/// # Safety
///
/// Every address returned by [`Module::symbol`] must stay valid for as long
/// as the module value is alive, and must point at the item the exporting
/// plugin declared under that name.
pub unsafe trait Module: Send + Sync {
    /// Resolve an exported symbol to its address.
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>>;
}

/// Opens dynamic modules by path.
pub trait ModuleLoader: Send + Sync {
    /// Open the module at `path`, or describe why it could not be opened.
    fn open(&self, path: &Path) -> Result<Arc<dyn Module>, String>;
}

/// Loads plugin modules as shared libraries via `libloading`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DylibLoader;

struct DylibModule {
    library: Library,
}

// SAFETY: symbol addresses come straight from the dynamic linker and stay
// valid until `library` is dropped, which only happens with the module.
unsafe impl Module for DylibModule {
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        // SAFETY: only the symbol address is read here; interpreting it is
        // up to the catalog, which checks the ABI version first.
        let symbol = unsafe { self.library.get::<*mut c_void>(name.as_bytes()) }.ok()?;
        NonNull::new(*symbol)
    }
}

impl ModuleLoader for DylibLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn Module>, String> {
        // SAFETY: opening a library runs its initialisers. Plugins found on
        // the searchpath are trusted by whoever configured that searchpath.
        let library = unsafe { Library::new(path) }.map_err(|e| e.to_string())?;
        Ok(Arc::new(DylibModule { library }))
    }
}
