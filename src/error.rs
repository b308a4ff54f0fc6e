// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! Nothing in here is fatal once the bridge loop is running: decode errors
//! drop a single message, protocol errors trigger a reconnect, and transmit
//! errors only suppress the post-change publish for one message.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// An inbound command could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error occurred during MQTT communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The infrared command could not be handed to the transmitter.
    #[error("transmit error: {0}")]
    Transmit(#[from] TransmitError),

    /// The bridge configuration is unusable.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// A value that must be a whole number had a fractional part.
    #[error("value {0} is not an integer")]
    NotInteger(f64),
}

/// Errors raised while decoding an inbound set command.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed, but the top-level value is not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The payload exceeds the inbound message buffer.
    #[error("payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge {
        /// Size of the rejected payload.
        size: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Errors related to MQTT communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The MQTT client rejected a request.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed or was lost.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection attempt timed out.
    #[error("connection timed out after {0} ms")]
    Timeout(u64),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// An operation needed a live connection.
    #[error("not connected")]
    NotConnected,

    /// An outbound payload could not be encoded.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised when handing a command to the infrared transmitter.
///
/// Infrared has no acknowledgement channel, so these only cover the local
/// hand-off, never delivery to the air conditioner.
#[derive(Debug, Error)]
pub enum TransmitError {
    /// The MQTT client used to reach an IR bridge rejected the publish.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The command could not be serialized for the transmitter.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The transmitter refused the command.
    #[error("transmitter rejected command: {0}")]
    Rejected(String),
}

/// Errors related to loading the bridge configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
