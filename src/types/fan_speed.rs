// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed setting.

use std::fmt;

/// Fan speed as requested over MQTT.
///
/// Like [`AcMode`](super::AcMode), unknown strings are accepted and kept
/// verbatim; the infrared translator treats them as automatic fan speed.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::types::FanSpeed;
///
/// assert_eq!(FanSpeed::from_payload("medium"), FanSpeed::Medium);
/// assert_eq!(FanSpeed::from_payload("turbo").as_str(), "turbo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FanSpeed {
    /// Lowest speed.
    Low,
    /// Middle speed.
    Medium,
    /// Highest speed.
    High,
    /// Unit-controlled speed.
    #[default]
    Auto,
    /// Any other string, stored verbatim.
    Unrecognized(String),
}

impl FanSpeed {
    /// Parses a fan mode string from an inbound payload. Never fails.
    #[must_use]
    pub fn from_payload(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "auto" => Self::Auto,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire representation used in the published state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Auto => "auto",
            Self::Unrecognized(value) => value,
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
