// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound state payload.

use serde::Serialize;

use super::AcState;

/// JSON body published on the state topic.
///
/// Mode and fan speed are echoed as stored, so an unrecognized value
/// sent by a client is visible to every subscriber.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::state::{AcState, StatePayload};
///
/// let state = AcState::new();
/// let payload = StatePayload::from(&state);
/// assert_eq!(
///     payload.to_json().unwrap(),
///     r#"{"mode":"off","temperature":25,"fan_mode":"auto","swing_mode":"off"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePayload<'a> {
    /// Mode string.
    pub mode: &'a str,
    /// Target temperature.
    pub temperature: u8,
    /// Fan speed string.
    pub fan_mode: &'a str,
    /// `"on"` or `"off"`.
    pub swing_mode: &'static str,
}

impl StatePayload<'_> {
    /// Serializes the payload.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'a> From<&'a AcState> for StatePayload<'a> {
    fn from(state: &'a AcState) -> Self {
        Self {
            mode: state.mode().as_str(),
            temperature: state.temperature().value(),
            fan_mode: state.fan_speed().as_str(),
            swing_mode: state.swing_mode().as_str(),
        }
    }
}
