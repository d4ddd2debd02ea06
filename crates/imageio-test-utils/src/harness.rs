// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for catalog and dispatch integration tests.
//!
//! `PluginHarness` owns a temp directory tree. Installing a [`MockPlugin`]
//! writes an empty `<format>.imageio.<ext>` file into a named subdirectory
//! and teaches the shared [`MockLoader`] what that file exports, so the
//! catalog's real directory walk finds it.

use std::path::PathBuf;
use std::sync::Arc;

use imageio_plugin::naming::plugin_file_name;
use imageio_plugin::{CatalogOptions, ImageIo, SEARCHPATH_SEPARATOR};
use tempfile::TempDir;

use crate::mock_loader::{MockLoader, MockPlugin};

/// Environment variable the harness points the catalog at; never set by tests
/// unless they do so explicitly.
pub const TEST_LIBRARY_PATH_ENV: &str = "IMAGEIO_TEST_LIBRARY_PATH";

/// Builder for creating plugin test environments.
pub struct PluginHarnessBuilder {
    options: CatalogOptions,
}

impl PluginHarnessBuilder {
    fn new() -> Self {
        Self {
            options: CatalogOptions {
                library_path_env: TEST_LIBRARY_PATH_ENV.to_string(),
                rescan_on_miss: true,
            },
        }
    }

    /// Walk each searchpath only once instead of on every miss.
    pub fn with_rescan_on_miss(mut self, rescan: bool) -> Self {
        self.options.rescan_on_miss = rescan;
        self
    }

    /// Read the supplementary searchpath from a different variable.
    pub fn with_library_path_env(mut self, var: &str) -> Self {
        self.options.library_path_env = var.to_string();
        self
    }

    /// Create the temp directory and loader.
    pub fn build(self) -> PluginHarness {
        PluginHarness {
            root: tempfile::tempdir().expect("create temp plugin root"),
            loader: Arc::new(MockLoader::new()),
            options: self.options,
        }
    }
}

/// Temp plugin directories backed by a [`MockLoader`].
pub struct PluginHarness {
    root: TempDir,
    loader: Arc<MockLoader>,
    options: CatalogOptions,
}

impl PluginHarness {
    /// Start building a harness.
    pub fn builder() -> PluginHarnessBuilder {
        PluginHarnessBuilder::new()
    }

    /// A harness with default options.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The loader shared by every catalog this harness creates.
    pub fn loader(&self) -> Arc<MockLoader> {
        Arc::clone(&self.loader)
    }

    /// Options used for catalogs created by [`PluginHarness::catalog`].
    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// Path of subdirectory `name`, created if missing.
    pub fn dir(&self, name: &str) -> PathBuf {
        let dir = self.root.path().join(name);
        std::fs::create_dir_all(&dir).expect("create plugin dir");
        dir
    }

    /// Install `plugin` as `<dir>/<format>.imageio.<ext>` and return its path.
    pub fn install(&self, dir: &str, plugin: &MockPlugin) -> PathBuf {
        let path = self.write_file(dir, &plugin_file_name(plugin.format()));
        self.loader.install(&path, plugin);
        path
    }

    /// Write an empty file the loader knows nothing about.
    pub fn write_file(&self, dir: &str, file_name: &str) -> PathBuf {
        let path = self.dir(dir).join(file_name);
        std::fs::write(&path, b"").expect("write plugin file");
        path
    }

    /// Searchpath string listing the given subdirectories in order.
    pub fn searchpath(&self, dirs: &[&str]) -> String {
        dirs.iter()
            .map(|name| self.dir(name).display().to_string())
            .collect::<Vec<_>>()
            .join(&SEARCHPATH_SEPARATOR.to_string())
    }

    /// A fresh, empty catalog using this harness's loader.
    pub fn catalog(&self) -> ImageIo {
        ImageIo::new(self.loader.clone(), self.options.clone())
    }
}

impl Default for PluginHarness {
    fn default() -> Self {
        Self::new()
    }
}
