// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime plugin catalog for ImageIO codecs.
//!
//! Codec plugins are shared libraries named `<format>.imageio.<ext>` found
//! on a searchpath. The catalog opens each one, checks its ABI version,
//! and routes its format name and file extensions to the input and output
//! factories it exports. Lookups are lazy: a miss triggers a scan, and the
//! first plugin to claim a name or extension keeps it.
//!
//! ```no_run
//! let input = imageio_plugin::create_input("photo.png", "/usr/lib/imageio")
//!     .expect("png plugin");
//! println!("opened with {}", input.format_name());
//! ```

pub mod catalog;
pub mod dispatch;
pub mod instance;
pub mod loader;
pub mod naming;
pub mod record;
pub mod registry;
pub mod searchpath;

pub use catalog::{
    CatalogOptions, Cataloged, ScanStats, catalog_all_plugins, catalog_plugin, merged_searchpath,
};
pub use dispatch::{ImageIo, create_input, create_output, format_key};
pub use instance::{ImageInput, ImageOutput};
pub use loader::{DylibLoader, Module, ModuleLoader};
pub use record::{CreateFn, Factory, PluginRecord};
pub use registry::FormatRegistry;
pub use searchpath::{SEARCHPATH_SEPARATOR, merge_library_path, searchpath_split};
