// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the catalog, the dispatcher, and plugins.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// ABI version tag a plugin must export as `imageio_version` to be trusted.
pub const IMAGEIO_VERSION: i32 = 3;

/// Which side of a codec a factory produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum FormatKind {
    /// Readers (`ImageInput`).
    Input,
    /// Writers (`ImageOutput`).
    Output,
}

impl FormatKind {
    /// Both kinds, input first.
    pub const ALL: [FormatKind; 2] = [FormatKind::Input, FormatKind::Output];

    /// Lower-case tag used in plugin symbol names (`input` / `output`).
    pub fn symbol_tag(self) -> &'static str {
        match self {
            FormatKind::Input => "input",
            FormatKind::Output => "output",
        }
    }
}
