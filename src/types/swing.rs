// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Swing mode wire format.

use std::fmt;

/// Swing flag as it appears on the wire.
///
/// Only the exact string `"on"` means on. Everything else, including
/// `"ON"` and `"true"`, is off.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::types::SwingMode;
///
/// assert_eq!(SwingMode::from_payload("on"), SwingMode::On);
/// assert_eq!(SwingMode::from_payload("ON"), SwingMode::Off);
/// assert_eq!(SwingMode::from(true).as_str(), "on");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwingMode {
    /// Swing disabled.
    #[default]
    Off,
    /// Swing enabled on both axes.
    On,
}

impl SwingMode {
    /// Parses a swing string from an inbound payload.
    #[must_use]
    pub fn from_payload(value: &str) -> Self {
        if value == "on" { Self::On } else { Self::Off }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns `true` if swing is enabled.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for SwingMode {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl fmt::Display for SwingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
