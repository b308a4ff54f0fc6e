// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message transport for the bridge.
//!
//! The bridge only needs a handful of publish/subscribe operations, captured
//! by the [`Transport`] trait. [`MqttTransport`] implements it on top of
//! `rumqttc`.

#[cfg(feature = "mqtt")]
mod mqtt;

#[cfg(feature = "mqtt")]
pub use mqtt::{MqttTransport, MqttTransportBuilder};

use crate::error::ProtocolError;

/// A message received on a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Topic the message was published on.
    pub topic: String,
    /// Raw payload.
    pub payload: Vec<u8>,
}

impl InboundMessage {
    /// Creates a new inbound message.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Payload as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn payload_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Publish/subscribe operations used by the bridge.
///
/// All methods are driven from a single task; implementations do not need
/// to be `Sync`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Returns whether the transport currently has a live session.
    fn is_connected(&self) -> bool;

    /// Performs one connection attempt using the configured client id and
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the attempt fails or times out.
    async fn connect(&mut self) -> Result<(), ProtocolError>;

    /// Subscribes to a topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be queued.
    async fn subscribe(&mut self, topic: &str) -> Result<(), ProtocolError>;

    /// Publishes a payload, optionally retained.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be queued.
    async fn publish(&mut self, topic: &str, payload: &str, retain: bool)
    -> Result<(), ProtocolError>;

    /// Pumps the connection once.
    ///
    /// Resolves with `Some` when a message arrives on a subscribed topic and
    /// with `None` after any other network event. Must be cancel safe: the
    /// bridge drops this future when its publish timer fires.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the connection dropped. The transport
    /// reports `is_connected() == false` afterwards.
    async fn poll(&mut self) -> Result<Option<InboundMessage>, ProtocolError>;
}
