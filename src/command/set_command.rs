// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for inbound set commands.

use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::state::PendingUpdate;
use crate::types::{AcMode, FanSpeed, SwingMode};

/// Raw set command as received on the set topic.
///
/// Every key is optional and loosely typed: a client sending
/// `{"mode": 3}` gets its mode stored as `"3"` rather than having the whole
/// message rejected. Only broken JSON is an error.
///
/// An explicit `null` is the one non-string value that is not stringified:
/// it counts as an absent key. Storing the text `"null"` as a mode would
/// switch the unit on, and clients commonly send `null` for attributes they
/// have no value for.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::command::SetCommand;
///
/// let cmd = SetCommand::parse(br#"{"mode":"cool","temperature":22}"#).unwrap();
/// let update = cmd.to_pending_update();
/// assert_eq!(update.temperature(), Some(22.0));
/// assert!(update.fan_mode().is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetCommand {
    #[serde(default)]
    mode: Option<Value>,

    #[serde(default)]
    temperature: Option<Value>,

    #[serde(default)]
    fan_mode: Option<Value>,

    #[serde(default)]
    swing_mode: Option<Value>,
}

impl SetCommand {
    /// Parses a payload.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Json` if the payload is not valid JSON and
    /// `DecodeError::NotAnObject` if the top-level value is not an object.
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(payload)?;
        if !value.is_object() {
            return Err(DecodeError::NotAnObject(json_type_name(&value)));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Converts to a pending update containing only the keys present.
    ///
    /// An explicit `null` is treated as absent for every key. No range or
    /// enum validation is done here.
    #[must_use]
    pub fn to_pending_update(&self) -> PendingUpdate {
        let mut update = PendingUpdate::new();

        if let Some(mode) = text(self.mode.as_ref()) {
            update = update.with_mode(AcMode::from_payload(&mode));
        }

        if let Some(value) = self.temperature.as_ref() {
            match value.as_f64() {
                Some(t) => update = update.with_temperature(t),
                None => {
                    tracing::debug!(value = %value, "Ignoring non-numeric temperature");
                }
            }
        }

        if let Some(fan_mode) = text(self.fan_mode.as_ref()) {
            update = update.with_fan_mode(FanSpeed::from_payload(&fan_mode));
        }

        if let Some(swing) = self.swing_mode.as_ref() {
            let swing = swing.as_str().map_or(SwingMode::Off, SwingMode::from_payload);
            update = update.with_swing_mode(swing);
        }

        update
    }
}

/// Renders a JSON value as text: strings as-is, anything else as JSON.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
