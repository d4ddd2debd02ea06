// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Format registry mapping format names and file extensions to factories.
//!
//! The registry keeps four maps (input/output by name, input/output by
//! extension) plus one [`PluginRecord`] per cataloged plugin. Every map is
//! insert-if-absent: the first plugin to claim a key keeps it. Keys are
//! compared exactly as stored, so callers lower-case before looking up.

use std::collections::HashMap;

use imageio_core::{FormatKind, PluginError};

use crate::record::{Factory, PluginRecord};

/// Name and extension tables for every cataloged plugin.
#[derive(Default)]
pub struct FormatRegistry {
    input_by_name: HashMap<String, Factory>,
    input_by_ext: HashMap<String, Factory>,
    output_by_name: HashMap<String, Factory>,
    output_by_ext: HashMap<String, Factory>,
    records: HashMap<String, PluginRecord>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn by_name(&self, kind: FormatKind) -> &HashMap<String, Factory> {
        match kind {
            FormatKind::Input => &self.input_by_name,
            FormatKind::Output => &self.output_by_name,
        }
    }

    fn by_ext(&self, kind: FormatKind) -> &HashMap<String, Factory> {
        match kind {
            FormatKind::Input => &self.input_by_ext,
            FormatKind::Output => &self.output_by_ext,
        }
    }

    /// Find the factory answering `key`, checking format names before extensions.
    pub fn lookup(&self, kind: FormatKind, key: &str) -> Option<&Factory> {
        self.by_name(kind)
            .get(key)
            .or_else(|| self.by_ext(kind).get(key))
    }

    /// Find the factory registered under a format name only.
    pub fn lookup_name(&self, kind: FormatKind, name: &str) -> Option<&Factory> {
        self.by_name(kind).get(name)
    }

    /// Find the factory registered under an extension only.
    pub fn lookup_extension(&self, kind: FormatKind, extension: &str) -> Option<&Factory> {
        self.by_ext(kind).get(extension)
    }

    /// Register `factory` under a format name if the name is unclaimed.
    ///
    /// Returns `true` if it was newly inserted.
    pub fn register_format(&mut self, kind: FormatKind, name: &str, factory: Factory) -> bool {
        let map = match kind {
            FormatKind::Input => &mut self.input_by_name,
            FormatKind::Output => &mut self.output_by_name,
        };
        if map.contains_key(name) {
            return false;
        }
        map.insert(name.to_string(), factory);
        true
    }

    /// Route an extension to `factory` unless an earlier plugin claimed it.
    pub fn register_extension(
        &mut self,
        kind: FormatKind,
        extension: &str,
        factory: Factory,
    ) -> Result<(), PluginError> {
        let map = match kind {
            FormatKind::Input => &mut self.input_by_ext,
            FormatKind::Output => &mut self.output_by_ext,
        };
        if map.contains_key(extension) {
            return Err(PluginError::ExtensionAlreadyClaimed {
                kind,
                extension: extension.to_string(),
            });
        }
        map.insert(extension.to_string(), factory);
        Ok(())
    }

    /// The record cataloged under `format_name`, if any.
    pub fn record(&self, format_name: &str) -> Option<&PluginRecord> {
        self.records.get(format_name)
    }

    pub(crate) fn insert_record(&mut self, record: PluginRecord) {
        self.records
            .entry(record.format_name().to_string())
            .or_insert(record);
    }

    /// All plugin records, sorted by format name.
    pub fn records(&self) -> Vec<&PluginRecord> {
        let mut records: Vec<&PluginRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.format_name().cmp(b.format_name()));
        records
    }

    /// Sorted list of cataloged format names.
    pub fn format_list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted list of extensions routed to a factory of the given kind.
    pub fn extension_list(&self, kind: FormatKind) -> Vec<String> {
        let mut extensions: Vec<String> = self.by_ext(kind).keys().cloned().collect();
        extensions.sort();
        extensions
    }

    /// Number of cataloged plugins.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no plugin has been cataloged.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("plugins", &self.records.len())
            .field("input_formats", &self.input_by_name.len())
            .field("output_formats", &self.output_by_name.len())
            .field("input_extensions", &self.input_by_ext.len())
            .field("output_extensions", &self.output_by_ext.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::c_void;
    use std::ptr::NonNull;
    use std::sync::Arc;

    use super::*;
    use crate::loader::Module;
    use crate::record::CreateFn;

    struct Inert;

    // SAFETY: exports nothing.
    unsafe impl Module for Inert {
        fn symbol(&self, _name: &str) -> Option<NonNull<c_void>> {
            None
        }
    }

    static FIRST: u8 = 1;
    static SECOND: u8 = 2;

    extern "C" fn make_first() -> *mut c_void {
        &FIRST as *const u8 as *mut c_void
    }

    extern "C" fn make_second() -> *mut c_void {
        &SECOND as *const u8 as *mut c_void
    }

    fn factory(format: &str, kind: FormatKind, create: CreateFn) -> Factory {
        // SAFETY: the creators above only return static addresses.
        unsafe { Factory::new(Arc::from(format), kind, create, Arc::new(Inert)) }
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let registry = FormatRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup(FormatKind::Input, "png").is_none());
        assert!(registry.format_list().is_empty());
    }

    #[test]
    fn register_format_is_insert_if_absent() {
        let mut registry = FormatRegistry::new();
        let first = factory("png", FormatKind::Input, make_first);
        let second = factory("png", FormatKind::Input, make_second);

        assert!(registry.register_format(FormatKind::Input, "png", first.clone()));
        assert!(!registry.register_format(FormatKind::Input, "png", second));

        let found = registry.lookup(FormatKind::Input, "png").unwrap();
        assert!(found.same_creator(&first));
    }

    #[test]
    fn extension_collisions_keep_first_claim() {
        let mut registry = FormatRegistry::new();
        let jpeg = factory("jpeg", FormatKind::Input, make_first);
        let jfif = factory("jfif", FormatKind::Input, make_second);

        registry
            .register_extension(FormatKind::Input, "jpg", jpeg.clone())
            .unwrap();
        let err = registry
            .register_extension(FormatKind::Input, "jpg", jfif)
            .unwrap_err();
        assert_eq!(
            err,
            PluginError::ExtensionAlreadyClaimed {
                kind: FormatKind::Input,
                extension: "jpg".into(),
            }
        );
        assert_eq!(
            registry
                .lookup_extension(FormatKind::Input, "jpg")
                .unwrap()
                .format_name(),
            "jpeg"
        );
    }

    #[test]
    fn names_answer_before_extensions() {
        let mut registry = FormatRegistry::new();
        let by_ext = factory("other", FormatKind::Output, make_first);
        let by_name = factory("tga", FormatKind::Output, make_second);

        registry
            .register_extension(FormatKind::Output, "tga", by_ext)
            .unwrap();
        registry.register_format(FormatKind::Output, "tga", by_name.clone());

        let found = registry.lookup(FormatKind::Output, "tga").unwrap();
        assert!(found.same_creator(&by_name));
    }

    #[test]
    fn input_and_output_maps_are_separate() {
        let mut registry = FormatRegistry::new();
        registry.register_format(
            FormatKind::Input,
            "png",
            factory("png", FormatKind::Input, make_first),
        );
        assert!(registry.lookup(FormatKind::Input, "png").is_some());
        assert!(registry.lookup(FormatKind::Output, "png").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut registry = FormatRegistry::new();
        registry
            .register_extension(
                FormatKind::Input,
                "png",
                factory("png", FormatKind::Input, make_first),
            )
            .unwrap();
        assert!(registry.lookup(FormatKind::Input, "PNG").is_none());
    }

    #[test]
    fn extension_list_is_sorted() {
        let mut registry = FormatRegistry::new();
        for ext in ["tif", "jpg", "png"] {
            registry
                .register_extension(
                    FormatKind::Input,
                    ext,
                    factory("any", FormatKind::Input, make_first),
                )
                .unwrap();
        }
        assert_eq!(
            registry.extension_list(FormatKind::Input),
            vec!["jpg", "png", "tif"]
        );
        assert!(registry.extension_list(FormatKind::Output).is_empty());
    }
}
