// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for ImageIO plugin catalog tests.
//!
//! Provides an in-memory module loader and a temp-directory harness so
//! catalog and dispatch behaviour can be tested without building real
//! shared libraries.
//!
//! # Components
//!
//! - [`MockLoader`] - Module loader serving symbol tables registered per path
//! - [`MockPlugin`] - Builder describing what a fake plugin exports
//! - [`Codec`] - Distinguishable fake factories for assertions
//! - [`PluginHarness`] - Temp plugin directories wired to a `MockLoader`

pub mod fixtures;
pub mod harness;
pub mod mock_loader;

pub use fixtures::Codec;
pub use harness::{PluginHarness, PluginHarnessBuilder};
pub use mock_loader::{MockLoader, MockPlugin};
