// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owned handles to codec instances created by plugin factories.

use std::ffi::c_void;
use std::ptr::NonNull;

use crate::record::Factory;

/// A reader instance created by a plugin's input factory.
///
/// The handle keeps the producing module loaded. The instance itself is
/// opaque to the catalog; hand it to the codec layer with [`ImageInput::into_raw`].
#[derive(Debug)]
pub struct ImageInput {
    raw: NonNull<c_void>,
    factory: Factory,
}

impl ImageInput {
    pub(crate) fn new(raw: NonNull<c_void>, factory: Factory) -> Self {
        Self { raw, factory }
    }

    /// Format name of the plugin that created this instance.
    pub fn format_name(&self) -> &str {
        self.factory.format_name()
    }

    /// Borrow the raw instance pointer.
    pub fn as_ptr(&self) -> *mut c_void {
        self.raw.as_ptr()
    }

    /// Release ownership of the raw instance pointer.
    pub fn into_raw(self) -> *mut c_void {
        self.raw.as_ptr()
    }
}

/// A writer instance created by a plugin's output factory.
#[derive(Debug)]
pub struct ImageOutput {
    raw: NonNull<c_void>,
    factory: Factory,
}

impl ImageOutput {
    pub(crate) fn new(raw: NonNull<c_void>, factory: Factory) -> Self {
        Self { raw, factory }
    }

    /// Format name of the plugin that created this instance.
    pub fn format_name(&self) -> &str {
        self.factory.format_name()
    }

    /// Borrow the raw instance pointer.
    pub fn as_ptr(&self) -> *mut c_void {
        self.raw.as_ptr()
    }

    /// Release ownership of the raw instance pointer.
    pub fn into_raw(self) -> *mut c_void {
        self.raw.as_ptr()
    }
}
