// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transmitter that drives a Tasmota IR bridge over MQTT.

use rumqttc::{AsyncClient, QoS};
use serde::Serialize;

use crate::error::TransmitError;
use crate::ir::{DaikinCommand, DaikinFan, DaikinMode, IrTransmitter};

/// Sends Daikin commands as Tasmota `IRHVAC` JSON.
///
/// The command goes to `cmnd/<topic>/IRHVAC`, where `<topic>` is the
/// Tasmota topic of the IR bridge. The client is usually the bridge's own
/// connection (see `MqttTransport::client`).
#[derive(Debug, Clone)]
pub struct TasmotaIrHvac {
    client: AsyncClient,
    command_topic: String,
}

impl TasmotaIrHvac {
    /// Creates a transmitter for the IR bridge with the given Tasmota topic.
    #[must_use]
    pub fn new(client: AsyncClient, device_topic: &str) -> Self {
        Self {
            client,
            command_topic: format!("cmnd/{device_topic}/IRHVAC"),
        }
    }

    /// Topic the commands are published to.
    #[must_use]
    pub fn command_topic(&self) -> &str {
        &self.command_topic
    }
}

impl IrTransmitter for TasmotaIrHvac {
    fn transmit(&mut self, command: &DaikinCommand) -> Result<(), TransmitError> {
        let payload = serde_json::to_string(&IrHvacPayload::from(command))?;
        tracing::debug!(topic = %self.command_topic, payload = %payload, "Publishing IRHVAC command");
        self.client
            .try_publish(&self.command_topic, QoS::AtLeastOnce, false, payload)?;
        Ok(())
    }
}

/// Body of a Tasmota `IRHVAC` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct IrHvacPayload {
    vendor: &'static str,
    power: &'static str,
    mode: &'static str,
    temp: u8,
    fan_speed: &'static str,
    swing_v: &'static str,
    swing_h: &'static str,
}

impl From<&DaikinCommand> for IrHvacPayload {
    fn from(cmd: &DaikinCommand) -> Self {
        let on_off = |b: bool| if b { "On" } else { "Off" };
        let swing = |b: bool| if b { "Auto" } else { "Off" };

        Self {
            vendor: "DAIKIN",
            power: on_off(cmd.power()),
            mode: match cmd.mode() {
                DaikinMode::Auto => "Auto",
                DaikinMode::Cool => "Cool",
                DaikinMode::Heat => "Heat",
                DaikinMode::Fan => "Fan",
            },
            temp: cmd.temperature(),
            fan_speed: match cmd.fan() {
                DaikinFan::Min => "Min",
                DaikinFan::Med => "Medium",
                DaikinFan::Max => "Max",
                DaikinFan::Auto => "Auto",
            },
            swing_v: swing(cmd.swing_vertical()),
            swing_h: swing(cmd.swing_horizontal()),
        }
    }
}
