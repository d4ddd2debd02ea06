// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed factories and the per-plugin record kept by the registry.

use std::collections::BTreeSet;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::Arc;

use imageio_core::FormatKind;

use crate::loader::Module;

/// Signature of a plugin's `<fmt>_{input,output}_imageio_create` export.
pub type CreateFn = unsafe extern "C" fn() -> *mut c_void;

/// A validated codec factory.
///
/// Holds the module that exports it, so the function pointer can never
/// outlive the code it points into.
#[derive(Clone)]
pub struct Factory {
    format: Arc<str>,
    kind: FormatKind,
    create: CreateFn,
    _module: Arc<dyn Module>,
}

impl Factory {
    /// Wrap a creator exported by `module`.
    ///
    /// # Safety
    ///
    /// `create` must be safe to call with no arguments for as long as
    /// `module` is alive, and must return either null or a new instance.
    pub unsafe fn new(
        format: Arc<str>,
        kind: FormatKind,
        create: CreateFn,
        module: Arc<dyn Module>,
    ) -> Self {
        Self {
            format,
            kind,
            create,
            _module: module,
        }
    }

    /// Format name of the plugin that exported this factory.
    pub fn format_name(&self) -> &str {
        &self.format
    }

    /// Whether this factory produces readers or writers.
    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    /// Whether two factories call the same creator function.
    pub fn same_creator(&self, other: &Factory) -> bool {
        std::ptr::fn_addr_eq(self.create, other.create)
    }

    /// Invoke the creator. `None` means the plugin returned null.
    pub fn create(&self) -> Option<NonNull<c_void>> {
        // SAFETY: guaranteed by the contract of `Factory::new`; `self._module`
        // keeps the exporting module loaded for the duration of the call.
        NonNull::new(unsafe { (self.create)() })
    }
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("format", &self.format)
            .field("kind", &self.kind)
            .field("create", &(self.create as *const ()))
            .finish()
    }
}

/// One successfully validated plugin module.
///
/// A record only exists for modules that passed the version check and
/// exported at least one factory. It owns the module for the lifetime of
/// the registry.
pub struct PluginRecord {
    format_name: String,
    path: PathBuf,
    _module: Arc<dyn Module>,
    input: Option<Factory>,
    output: Option<Factory>,
    input_extensions: BTreeSet<String>,
    output_extensions: BTreeSet<String>,
}

impl PluginRecord {
    pub(crate) fn new(format_name: &str, path: &Path, module: Arc<dyn Module>) -> Self {
        Self {
            format_name: format_name.to_string(),
            path: path.to_path_buf(),
            _module: module,
            input: None,
            output: None,
            input_extensions: BTreeSet::new(),
            output_extensions: BTreeSet::new(),
        }
    }

    pub(crate) fn set_factory(&mut self, factory: Factory, extensions: BTreeSet<String>) {
        match factory.kind() {
            FormatKind::Input => {
                self.input = Some(factory);
                self.input_extensions = extensions;
            }
            FormatKind::Output => {
                self.output = Some(factory);
                self.output_extensions = extensions;
            }
        }
    }

    /// Format name as scanned from the file name.
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    /// Path of the module file this record was built from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The factory of the given kind, if the plugin exported one.
    pub fn factory(&self, kind: FormatKind) -> Option<&Factory> {
        match kind {
            FormatKind::Input => self.input.as_ref(),
            FormatKind::Output => self.output.as_ref(),
        }
    }

    /// Lower-cased extensions the plugin declared for the given kind.
    ///
    /// Extensions already claimed by an earlier plugin are still listed here;
    /// the registry decides which factory answers them.
    pub fn extensions(&self, kind: FormatKind) -> &BTreeSet<String> {
        match kind {
            FormatKind::Input => &self.input_extensions,
            FormatKind::Output => &self.output_extensions,
        }
    }
}

impl std::fmt::Debug for PluginRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRecord")
            .field("format_name", &self.format_name)
            .field("path", &self.path)
            .field("input", &self.input.is_some())
            .field("output", &self.output.is_some())
            .field("input_extensions", &self.input_extensions)
            .field("output_extensions", &self.output_extensions)
            .finish()
    }
}
