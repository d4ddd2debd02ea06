// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory module loader.
//!
//! `MockLoader` maps file paths to symbol tables built from [`MockPlugin`]
//! descriptions. Opening an unknown path fails just like opening a file
//! that is not a shared library. Open and close counts are tracked per path.

use std::collections::HashMap;
use std::ffi::{CString, c_char, c_int, c_void};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use imageio_core::{FormatKind, IMAGEIO_VERSION};
use imageio_plugin::naming::{VERSION_SYMBOL, create_symbol, extensions_symbol};
use imageio_plugin::{CreateFn, Module, ModuleLoader};

/// Description of what a fake plugin module exports.
#[derive(Debug, Clone)]
pub struct MockPlugin {
    format: String,
    version: Option<i32>,
    input: Option<(CreateFn, Option<Vec<String>>)>,
    output: Option<(CreateFn, Option<Vec<String>>)>,
}

impl MockPlugin {
    /// A plugin for `format` exporting the current ABI version and nothing else.
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
            version: Some(IMAGEIO_VERSION),
            input: None,
            output: None,
        }
    }

    /// Format name the plugin file is named after.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Override the exported version tag; `None` omits the symbol.
    pub fn with_version(mut self, version: Option<i32>) -> Self {
        self.version = version;
        self
    }

    /// Export an input factory and its extension list.
    pub fn with_input(mut self, create: CreateFn, extensions: &[&str]) -> Self {
        self.input = Some((create, Some(to_strings(extensions))));
        self
    }

    /// Export an output factory and its extension list.
    pub fn with_output(mut self, create: CreateFn, extensions: &[&str]) -> Self {
        self.output = Some((create, Some(to_strings(extensions))));
        self
    }

    /// Export an input factory without any `_input_extensions` symbol.
    pub fn with_input_only(mut self, create: CreateFn) -> Self {
        self.input = Some((create, None));
        self
    }

    fn symbol_table(&self) -> HashMap<String, usize> {
        let mut symbols = HashMap::new();
        if let Some(version) = self.version {
            let slot: &'static mut c_int = Box::leak(Box::new(version));
            symbols.insert(VERSION_SYMBOL.to_string(), slot as *mut c_int as usize);
        }
        let exports = [
            (FormatKind::Input, &self.input),
            (FormatKind::Output, &self.output),
        ];
        for (kind, export) in exports {
            let Some((create, extensions)) = export else {
                continue;
            };
            symbols.insert(create_symbol(&self.format, kind), *create as usize);
            if let Some(extensions) = extensions {
                symbols.insert(
                    extensions_symbol(&self.format, kind),
                    leak_c_string_array(extensions),
                );
            }
        }
        symbols
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build a leaked, null-terminated `char*[]` and return its address.
fn leak_c_string_array(items: &[String]) -> usize {
    let mut array: Vec<*const c_char> = items
        .iter()
        .map(|item| {
            CString::new(item.as_str())
                .expect("extension without NUL")
                .into_raw() as *const c_char
        })
        .collect();
    array.push(std::ptr::null());
    Box::leak(array.into_boxed_slice()).as_ptr() as usize
}

struct MockEntry {
    symbols: HashMap<String, usize>,
    opened: AtomicUsize,
    live: AtomicUsize,
}

struct MockModule {
    entry: Arc<MockEntry>,
}

// SAFETY: every address in the table points at leaked data or a function
// item, valid for the rest of the process.
unsafe impl Module for MockModule {
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        self.entry
            .symbols
            .get(name)
            .and_then(|addr| NonNull::new(*addr as *mut c_void))
    }
}

impl Drop for MockModule {
    fn drop(&mut self) {
        self.entry.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Module loader serving fake plugins registered by path.
#[derive(Default)]
pub struct MockLoader {
    entries: Mutex<HashMap<PathBuf, Arc<MockEntry>>>,
}

impl MockLoader {
    /// Create a loader that knows no modules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` openable as `plugin`.
    pub fn install(&self, path: &Path, plugin: &MockPlugin) {
        let entry = Arc::new(MockEntry {
            symbols: plugin.symbol_table(),
            opened: AtomicUsize::new(0),
            live: AtomicUsize::new(0),
        });
        self.entries
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), entry);
    }

    fn entry(&self, path: &Path) -> Option<Arc<MockEntry>> {
        self.entries.lock().unwrap().get(path).cloned()
    }

    /// How many times `path` has been opened.
    pub fn open_count(&self, path: &Path) -> usize {
        self.entry(path)
            .map_or(0, |entry| entry.opened.load(Ordering::SeqCst))
    }

    /// How many modules opened from `path` have not been closed yet.
    pub fn live_count(&self, path: &Path) -> usize {
        self.entry(path)
            .map_or(0, |entry| entry.live.load(Ordering::SeqCst))
    }
}

impl ModuleLoader for MockLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn Module>, String> {
        let entry = self
            .entry(path)
            .ok_or_else(|| format!("{}: not a loadable module", path.display()))?;
        entry.opened.fetch_add(1, Ordering::SeqCst);
        entry.live.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockModule { entry }))
    }
}
