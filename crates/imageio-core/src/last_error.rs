// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide last-error message sink.
//!
//! Failed dispatch calls leave a human-readable message here in addition to
//! returning `Err`, so hosts that only check for a missing instance can still
//! report what went wrong.

use std::sync::{Mutex, PoisonError};

static LAST_ERROR: Mutex<String> = Mutex::new(String::new());

/// Replace the pending error message.
pub fn set_error(message: impl Into<String>) {
    *LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner) = message.into();
}

/// Whether an error message is pending.
pub fn has_error() -> bool {
    !LAST_ERROR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_empty()
}

/// Take the pending error message, leaving the sink empty.
pub fn geterror() -> String {
    std::mem::take(&mut *LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner))
}
