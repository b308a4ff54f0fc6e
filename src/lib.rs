// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hvac_ir_bridge` - An MQTT bridge for Daikin infrared air conditioners.
//!
//! The bridge receives desired-state commands on an MQTT topic, keeps the
//! air conditioner state, sends a Daikin infrared command whenever the
//! state changes and publishes the resulting state, retained, for
//! home-automation dashboards.
//!
//! # Message Flow
//!
//! ```text
//!   <ns>/hvac/set ──► decode ──► reconcile ──► (changed?) ──► IR transmit
//!                                                   │
//!                                                   └──► <ns>/hvac/state (retained)
//! ```
//!
//! The state is also published on every (re)connection and every 30
//! seconds regardless of changes.
//!
//! # Payloads
//!
//! Inbound, all keys optional:
//!
//! ```json
//! { "mode": "cool", "temperature": 22, "fan_mode": "high", "swing_mode": "on" }
//! ```
//!
//! Outbound:
//!
//! ```json
//! { "mode": "cool", "temperature": 22, "fan_mode": "high", "swing_mode": "on" }
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use hvac_ir_bridge::bridge::{Bridge, BridgeSettings};
//! use hvac_ir_bridge::ir::LogTransmitter;
//! use hvac_ir_bridge::protocol::MqttTransport;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> hvac_ir_bridge::Result<()> {
//!     let transport = MqttTransport::builder()
//!         .host("192.168.1.50")
//!         .credentials("ac", "secret")
//!         .build()?;
//!
//!     let mut bridge = Bridge::new(transport, LogTransmitter::new(), BridgeSettings::default());
//!     bridge.run().await;
//!     Ok(())
//! }
//! ```
//!
//! # Reconciliation Without a Broker
//!
//! The state logic is usable on its own:
//!
//! ```
//! use hvac_ir_bridge::command::{decode_set_command, DEFAULT_MAX_PAYLOAD_SIZE};
//! use hvac_ir_bridge::state::AcState;
//!
//! let mut state = AcState::new();
//! let update = decode_set_command(br#"{"mode":"heat"}"#, DEFAULT_MAX_PAYLOAD_SIZE)?;
//!
//! assert!(state.apply(&update));
//! assert!(state.power());
//! assert!(!state.apply(&update));
//! # Ok::<(), hvac_ir_bridge::error::DecodeError>(())
//! ```

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod ir;
pub mod protocol;
pub mod state;
pub mod types;

pub use bridge::{Bridge, BridgeSettings, MessageOutcome};
pub use config::BridgeConfig;
pub use error::{ConfigError, DecodeError, Error, ProtocolError, Result, TransmitError, ValueError};
pub use ir::{DaikinCommand, DaikinTranslator, IrTransmitter};
pub use protocol::{InboundMessage, Transport};
pub use state::{AcState, PendingUpdate};
pub use types::{AcMode, FanSpeed, SwingMode, Temperature};
