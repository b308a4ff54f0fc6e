// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial update extracted from one inbound command.

use crate::types::{AcMode, FanSpeed, SwingMode};

/// Field values requested by a single set command.
///
/// `None` means the key was absent from the payload; it never means
/// "reset to default". The temperature is kept as the raw number so that
/// range and integer checks happen during reconciliation.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::state::PendingUpdate;
/// use hvac_ir_bridge::types::AcMode;
///
/// let update = PendingUpdate::new().with_mode(AcMode::Cool).with_temperature(22.0);
/// assert_eq!(update.mode(), Some(&AcMode::Cool));
/// assert!(update.fan_mode().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingUpdate {
    mode: Option<AcMode>,
    temperature: Option<f64>,
    fan_mode: Option<FanSpeed>,
    swing_mode: Option<SwingMode>,
}

impl PendingUpdate {
    /// Creates an update with nothing specified.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested mode.
    #[must_use]
    pub fn with_mode(mut self, mode: AcMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the requested temperature, unvalidated.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the requested fan speed.
    #[must_use]
    pub fn with_fan_mode(mut self, fan_mode: FanSpeed) -> Self {
        self.fan_mode = Some(fan_mode);
        self
    }

    /// Sets the requested swing mode.
    #[must_use]
    pub fn with_swing_mode(mut self, swing_mode: SwingMode) -> Self {
        self.swing_mode = Some(swing_mode);
        self
    }

    /// Requested mode, if any.
    #[must_use]
    pub fn mode(&self) -> Option<&AcMode> {
        self.mode.as_ref()
    }

    /// Requested temperature, if any.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Requested fan speed, if any.
    #[must_use]
    pub fn fan_mode(&self) -> Option<&FanSpeed> {
        self.fan_mode.as_ref()
    }

    /// Requested swing mode, if any.
    #[must_use]
    pub fn swing_mode(&self) -> Option<SwingMode> {
        self.swing_mode
    }

    /// Returns `true` if no field was specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.temperature.is_none()
            && self.fan_mode.is_none()
            && self.swing_mode.is_none()
    }
}
