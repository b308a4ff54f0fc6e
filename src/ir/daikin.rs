// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Daikin infrared command model.
//!
//! The codes match the Daikin remote protocol as implemented by common IR
//! libraries (3-bit mode field, 4-bit fan field).

use std::fmt;

use crate::types::{AcMode, FanSpeed};

/// Daikin operating mode code.
///
/// There is no "off" mode on the wire; off is the power flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DaikinMode {
    /// `AUTO`
    Auto = 0b000,
    /// `COOL`
    Cool = 0b011,
    /// `HEAT`
    Heat = 0b100,
    /// `FAN`
    Fan = 0b110,
}

impl DaikinMode {
    /// Maps a requested mode to a device mode.
    ///
    /// Returns `None` for [`AcMode::Off`] and unrecognized modes, which the
    /// device can only express by switching power off.
    #[must_use]
    pub fn from_ac_mode(mode: &AcMode) -> Option<Self> {
        match mode {
            AcMode::Cool => Some(Self::Cool),
            AcMode::Heat => Some(Self::Heat),
            AcMode::FanOnly => Some(Self::Fan),
            AcMode::Auto => Some(Self::Auto),
            AcMode::Off | AcMode::Unrecognized(_) => None,
        }
    }

    /// Returns the protocol code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the protocol name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Cool => "COOL",
            Self::Heat => "HEAT",
            Self::Fan => "FAN",
        }
    }
}

impl fmt::Display for DaikinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daikin fan speed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DaikinFan {
    /// `FAN_MIN`
    Min = 1,
    /// `FAN_MED`
    Med = 3,
    /// `FAN_MAX`
    Max = 5,
    /// `FAN_AUTO`
    Auto = 0b1010,
}

impl DaikinFan {
    /// Returns the protocol code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the protocol name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "FAN_MIN",
            Self::Med => "FAN_MED",
            Self::Max => "FAN_MAX",
            Self::Auto => "FAN_AUTO",
        }
    }
}

impl From<&FanSpeed> for DaikinFan {
    /// Anything that is not low, medium or high falls back to automatic.
    fn from(speed: &FanSpeed) -> Self {
        match speed {
            FanSpeed::Low => Self::Min,
            FanSpeed::Medium => Self::Med,
            FanSpeed::High => Self::Max,
            FanSpeed::Auto | FanSpeed::Unrecognized(_) => Self::Auto,
        }
    }
}

impl fmt::Display for DaikinFan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full state carried by one Daikin transmission.
///
/// Like the handheld remote, every transmission carries the complete
/// state, not a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DaikinCommand {
    power: bool,
    mode: DaikinMode,
    temperature: u8,
    fan: DaikinFan,
    swing_vertical: bool,
    swing_horizontal: bool,
}

impl DaikinCommand {
    /// Encoder state set up at boot, before any command arrives.
    ///
    /// This is never transmitted on its own. Its mode (`COOL`) only shows
    /// up on the wire if the first commands leave the mode at off.
    #[must_use]
    pub const fn boot_priming() -> Self {
        Self {
            power: false,
            mode: DaikinMode::Cool,
            temperature: 25,
            fan: DaikinFan::Auto,
            swing_vertical: false,
            swing_horizontal: false,
        }
    }

    /// Power flag.
    #[must_use]
    pub const fn power(&self) -> bool {
        self.power
    }

    /// Mode code.
    #[must_use]
    pub const fn mode(&self) -> DaikinMode {
        self.mode
    }

    /// Setpoint in degrees Celsius.
    #[must_use]
    pub const fn temperature(&self) -> u8 {
        self.temperature
    }

    /// Fan code.
    #[must_use]
    pub const fn fan(&self) -> DaikinFan {
        self.fan
    }

    /// Vertical swing flag.
    #[must_use]
    pub const fn swing_vertical(&self) -> bool {
        self.swing_vertical
    }

    /// Horizontal swing flag.
    #[must_use]
    pub const fn swing_horizontal(&self) -> bool {
        self.swing_horizontal
    }

    pub(crate) fn set_power(&mut self, power: bool) {
        self.power = power;
    }

    pub(crate) fn set_mode(&mut self, mode: DaikinMode) {
        self.mode = mode;
    }

    pub(crate) fn set_temperature(&mut self, temperature: u8) {
        self.temperature = temperature;
    }

    pub(crate) fn set_fan(&mut self, fan: DaikinFan) {
        self.fan = fan;
    }

    pub(crate) fn set_swing(&mut self, vertical: bool, horizontal: bool) {
        self.swing_vertical = vertical;
        self.swing_horizontal = horizontal;
    }
}

impl Default for DaikinCommand {
    fn default() -> Self {
        Self::boot_priming()
    }
}

impl fmt::Display for DaikinCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: bool| if b { "on" } else { "off" };
        write!(
            f,
            "power={} mode={} temp={} fan={} swing_v={} swing_h={}",
            on_off(self.power),
            self.mode,
            self.temperature,
            self.fan,
            on_off(self.swing_vertical),
            on_off(self.swing_horizontal),
        )
    }
}
