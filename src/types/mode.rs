// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode of the air conditioner.

use std::fmt;

/// Operating mode as requested over MQTT.
///
/// Matching is exact: `"cool"` is [`AcMode::Cool`], but `"Cool"` is kept as
/// [`AcMode::Unrecognized`] so that it round-trips unchanged into the
/// published state. Unrecognized modes count as "not off" and are only
/// normalized when the state is translated into an infrared command.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::types::AcMode;
///
/// assert_eq!(AcMode::from_payload("fan_only"), AcMode::FanOnly);
/// assert_eq!(AcMode::FanOnly.as_str(), "fan_only");
///
/// let odd = AcMode::from_payload("dry");
/// assert_eq!(odd, AcMode::Unrecognized("dry".to_string()));
/// assert_eq!(odd.as_str(), "dry");
/// assert!(!odd.is_off());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AcMode {
    /// Unit is off.
    #[default]
    Off,
    /// Cooling.
    Cool,
    /// Heating.
    Heat,
    /// Fan only, no compressor.
    FanOnly,
    /// Unit picks cooling or heating.
    Auto,
    /// Any other string, stored verbatim.
    Unrecognized(String),
}

impl AcMode {
    /// Parses a mode string from an inbound payload. Never fails.
    #[must_use]
    pub fn from_payload(value: &str) -> Self {
        match value {
            "off" => Self::Off,
            "cool" => Self::Cool,
            "heat" => Self::Heat,
            "fan_only" => Self::FanOnly,
            "auto" => Self::Auto,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire representation used in the published state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Off => "off",
            Self::Cool => "cool",
            Self::Heat => "heat",
            Self::FanOnly => "fan_only",
            Self::Auto => "auto",
            Self::Unrecognized(value) => value,
        }
    }

    /// Returns `true` only for [`AcMode::Off`].
    #[must_use]
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

impl fmt::Display for AcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
