// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fake codec factories.
//!
//! Each factory returns the address of its own static marker, so a test can
//! tell which plugin answered a lookup from the instance pointer alone.

use std::ffi::c_void;

use imageio_plugin::CreateFn;

static ALPHA: u8 = 0xA1;
static BETA: u8 = 0xB2;
static GAMMA: u8 = 0xC3;

extern "C" fn create_alpha() -> *mut c_void {
    &ALPHA as *const u8 as *mut c_void
}

extern "C" fn create_beta() -> *mut c_void {
    &BETA as *const u8 as *mut c_void
}

extern "C" fn create_gamma() -> *mut c_void {
    &GAMMA as *const u8 as *mut c_void
}

extern "C" fn create_null() -> *mut c_void {
    std::ptr::null_mut()
}

/// A fake codec family whose instances can be identified by pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Alpha,
    Beta,
    Gamma,
}

impl Codec {
    /// The factory producing this codec's instances.
    pub fn create_fn(self) -> CreateFn {
        match self {
            Codec::Alpha => create_alpha,
            Codec::Beta => create_beta,
            Codec::Gamma => create_gamma,
        }
    }

    /// Address every instance of this codec has.
    pub fn instance_ptr(self) -> *mut c_void {
        match self {
            Codec::Alpha => &ALPHA as *const u8 as *mut c_void,
            Codec::Beta => &BETA as *const u8 as *mut c_void,
            Codec::Gamma => &GAMMA as *const u8 as *mut c_void,
        }
    }

    /// Identify which codec produced `instance`.
    pub fn of(instance: *mut c_void) -> Option<Codec> {
        [Codec::Alpha, Codec::Beta, Codec::Gamma]
            .into_iter()
            .find(|codec| codec.instance_ptr() == instance)
    }
}

/// A factory that always fails by returning null.
pub fn null_create_fn() -> CreateFn {
    create_null
}
