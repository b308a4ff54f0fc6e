// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air conditioner state tracking and reconciliation.

use crate::types::{AcMode, FanSpeed, SwingMode, Temperature};

use super::PendingUpdate;

/// Current desired state of the air conditioner.
///
/// There is exactly one of these per bridge. It starts at the defaults
/// below and lives in memory only; a restart goes back to the defaults.
///
/// | field         | default |
/// |---------------|---------|
/// | `power`       | `false` |
/// | `mode`        | `Off`   |
/// | `temperature` | `25`    |
/// | `fan_speed`   | `Auto`  |
/// | `swing`       | `false` |
///
/// # Power and mode
///
/// `power` cannot be set directly. [`AcState::set_mode`] keeps
/// `power == !mode.is_off()` at all times.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::state::AcState;
/// use hvac_ir_bridge::types::AcMode;
///
/// let mut state = AcState::new();
/// assert!(!state.power());
///
/// state.set_mode(AcMode::Heat);
/// assert!(state.power());
///
/// state.set_mode(AcMode::Off);
/// assert!(!state.power());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcState {
    power: bool,
    mode: AcMode,
    temperature: Temperature,
    fan_speed: FanSpeed,
    swing: bool,
}

impl AcState {
    /// Creates the startup state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the unit should be running.
    #[must_use]
    pub fn power(&self) -> bool {
        self.power
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &AcMode {
        &self.mode
    }

    /// Sets the mode and derives power from it.
    ///
    /// Any mode other than [`AcMode::Off`], including unrecognized ones,
    /// turns power on.
    pub fn set_mode(&mut self, mode: AcMode) {
        self.power = !mode.is_off();
        self.mode = mode;
    }

    /// Target temperature.
    #[must_use]
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Sets the target temperature.
    pub fn set_temperature(&mut self, temperature: Temperature) {
        self.temperature = temperature;
    }

    /// Fan speed.
    #[must_use]
    pub fn fan_speed(&self) -> &FanSpeed {
        &self.fan_speed
    }

    /// Sets the fan speed.
    pub fn set_fan_speed(&mut self, fan_speed: FanSpeed) {
        self.fan_speed = fan_speed;
    }

    /// Whether swing is enabled (both axes).
    #[must_use]
    pub fn swing(&self) -> bool {
        self.swing
    }

    /// Enables or disables swing.
    pub fn set_swing(&mut self, swing: bool) {
        self.swing = swing;
    }

    /// Swing as its wire representation.
    #[must_use]
    pub fn swing_mode(&self) -> SwingMode {
        SwingMode::from(self.swing)
    }

    // ========== Reconciliation ==========

    /// Merges a pending update and returns whether the state actually changed.
    ///
    /// Each field is handled on its own: a field that is absent, equal to
    /// the current value, or (for temperature) invalid leaves the state
    /// untouched without affecting the other fields.
    ///
    /// # Returns
    ///
    /// Returns `true` if at least one field took a new value, `false` if the
    /// update was a no-op.
    pub fn apply(&mut self, update: &PendingUpdate) -> bool {
        let mut changed = false;

        if let Some(mode) = update.mode()
            && *mode != self.mode
        {
            self.set_mode(mode.clone());
            changed = true;
        }

        if let Some(requested) = update.temperature() {
            match Temperature::from_request(requested) {
                Ok(temperature) if temperature != self.temperature => {
                    self.temperature = temperature;
                    changed = true;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring requested temperature");
                }
            }
        }

        if let Some(fan_speed) = update.fan_mode()
            && *fan_speed != self.fan_speed
        {
            self.fan_speed = fan_speed.clone();
            changed = true;
        }

        if let Some(swing) = update.swing_mode()
            && swing.is_on() != self.swing
        {
            self.swing = swing.is_on();
            changed = true;
        }

        changed
    }
}
