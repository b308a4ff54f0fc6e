// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The bridge loop.
//!
//! [`Bridge`] owns the air conditioner state and drives everything from a
//! single task:
//!
//! ```text
//!   ensure_connected ──► poll (until the publish deadline) ──► periodic publish
//!          │                    │
//!          │                    └─► decode ─► reconcile ─► transmit ─► publish
//!          └─► subscribe + publish on every (re)connect
//! ```
//!
//! Nothing here runs concurrently, so the state needs no locking.

use std::time::Duration;

use tokio::time::Instant;

use crate::command::{DEFAULT_MAX_PAYLOAD_SIZE, decode_set_command};
use crate::error::ProtocolError;
use crate::ir::{DaikinCommand, DaikinTranslator, IrTransmitter};
use crate::protocol::{InboundMessage, Transport};
use crate::state::{AcState, StatePayload};

/// Default topic for inbound set commands.
pub const DEFAULT_SET_TOPIC: &str = "daikinboxy/hvac/set";

/// Default topic for state publications.
pub const DEFAULT_STATE_TOPIC: &str = "daikinboxy/hvac/state";

/// Topics, timings and limits used by the bridge loop.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hvac_ir_bridge::bridge::BridgeSettings;
///
/// let settings = BridgeSettings::default()
///     .with_topics("home/ac/set", "home/ac/state")
///     .with_publish_interval(Duration::from_secs(60));
///
/// assert_eq!(settings.set_topic, "home/ac/set");
/// assert_eq!(settings.reconnect_delay, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Topic carrying inbound set commands.
    pub set_topic: String,
    /// Topic the state is published to, retained.
    pub state_topic: String,
    /// Interval of the unconditional state publication.
    pub publish_interval: Duration,
    /// Fixed delay between connection attempts.
    pub reconnect_delay: Duration,
    /// Largest accepted inbound payload in bytes.
    pub max_payload_size: usize,
}

impl BridgeSettings {
    /// Sets the set and state topics.
    #[must_use]
    pub fn with_topics(mut self, set_topic: impl Into<String>, state_topic: impl Into<String>) -> Self {
        self.set_topic = set_topic.into();
        self.state_topic = state_topic.into();
        self
    }

    /// Sets the periodic publication interval.
    #[must_use]
    pub fn with_publish_interval(mut self, interval: Duration) -> Self {
        self.publish_interval = interval;
        self
    }

    /// Sets the delay between connection attempts.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the inbound payload limit.
    #[must_use]
    pub fn with_max_payload_size(mut self, size: usize) -> Self {
        self.max_payload_size = size;
        self
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            set_topic: DEFAULT_SET_TOPIC.to_string(),
            state_topic: DEFAULT_STATE_TOPIC.to_string(),
            publish_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(5),
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The message was not on the set topic.
    IgnoredTopic,
    /// The payload could not be decoded; nothing changed.
    Rejected,
    /// The payload decoded but no field changed value.
    Unchanged,
    /// The state changed, was transmitted and published.
    Applied,
    /// The state changed but the transmitter refused the command, so the
    /// post-change publication was skipped.
    TransmitFailed,
}

/// Bridge between the message bus and the air conditioner.
///
/// # Examples
///
/// ```no_run
/// use hvac_ir_bridge::bridge::{Bridge, BridgeSettings};
/// use hvac_ir_bridge::ir::LogTransmitter;
/// use hvac_ir_bridge::protocol::MqttTransport;
///
/// # async fn example() -> hvac_ir_bridge::Result<()> {
/// let transport = MqttTransport::builder().host("192.168.1.50").build()?;
/// let mut bridge = Bridge::new(transport, LogTransmitter::new(), BridgeSettings::default());
/// bridge.run().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bridge<T, I> {
    state: AcState,
    translator: DaikinTranslator<I>,
    transport: T,
    settings: BridgeSettings,
    subscribed: bool,
    last_periodic_publish: Instant,
}

impl<T: Transport, I: IrTransmitter> Bridge<T, I> {
    /// Creates a bridge with the default state.
    ///
    /// The periodic publication timer starts now.
    #[must_use]
    pub fn new(transport: T, transmitter: I, settings: BridgeSettings) -> Self {
        Self {
            state: AcState::new(),
            translator: DaikinTranslator::new(transmitter),
            transport,
            settings,
            subscribed: false,
            last_periodic_publish: Instant::now(),
        }
    }

    /// Current air conditioner state.
    #[must_use]
    pub fn state(&self) -> &AcState {
        &self.state
    }

    /// Last command handed to the translator's encoder.
    #[must_use]
    pub fn command(&self) -> &DaikinCommand {
        self.translator.command()
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The infrared transmitter.
    #[must_use]
    pub fn transmitter(&self) -> &I {
        self.translator.transmitter()
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Runs the loop forever.
    pub async fn run(&mut self) {
        tracing::info!(
            set_topic = %self.settings.set_topic,
            state_topic = %self.settings.state_topic,
            "Starting HVAC bridge"
        );
        loop {
            self.run_once().await;
        }
    }

    /// Runs one loop iteration.
    ///
    /// Makes sure the transport is connected, waits for at most one
    /// network event until the next periodic publication is due, then
    /// publishes if the interval has elapsed and the connection is still up.
    pub async fn run_once(&mut self) {
        self.ensure_connected().await;

        let deadline = self.last_periodic_publish + self.settings.publish_interval;
        match tokio::time::timeout_at(deadline, self.transport.poll()).await {
            Ok(Ok(Some(message))) => {
                self.handle_message(&message).await;
            }
            Ok(Ok(None)) | Err(_) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Connection lost");
            }
        }

        if self.last_periodic_publish.elapsed() >= self.settings.publish_interval {
            // While disconnected the slot is skipped; the reconnect publishes
            if self.transport.is_connected() {
                tracing::debug!("Periodic state publication");
                if let Err(e) = self.publish_state().await {
                    tracing::warn!(error = %e, "Periodic state publication failed");
                }
            }
            self.last_periodic_publish = Instant::now();
        }
    }

    /// Blocks until the transport is connected and subscribed.
    ///
    /// After every successful connection the set topic is subscribed and
    /// the current state is published once. A failed connect or subscribe
    /// is retried after the fixed reconnect delay, without limit. A failed
    /// publication is only logged.
    pub async fn ensure_connected(&mut self) {
        loop {
            if !self.transport.is_connected() {
                self.subscribed = false;
                tracing::info!("Attempting MQTT connection");
                if let Err(e) = self.transport.connect().await {
                    self.wait_before_retry(&e, "MQTT connection failed").await;
                    continue;
                }
            }

            if self.subscribed {
                return;
            }

            if let Err(e) = self.transport.subscribe(&self.settings.set_topic).await {
                self.wait_before_retry(&e, "Subscription to set topic failed")
                    .await;
                continue;
            }
            self.subscribed = true;
            tracing::info!(topic = %self.settings.set_topic, "Subscribed to set topic");

            if let Err(e) = self.publish_state().await {
                tracing::warn!(error = %e, "State publication after connect failed");
            }
            return;
        }
    }

    async fn wait_before_retry(&self, error: &ProtocolError, message: &'static str) {
        tracing::warn!(
            error = %error,
            retry_in_secs = self.settings.reconnect_delay.as_secs(),
            "{message}"
        );
        tokio::time::sleep(self.settings.reconnect_delay).await;
    }

    /// Processes one inbound message.
    ///
    /// On a change, the new state is committed before transmission, and
    /// transmission happens before the post-change publication.
    pub async fn handle_message(&mut self, message: &InboundMessage) -> MessageOutcome {
        tracing::info!(
            topic = %message.topic,
            payload = %message.payload_lossy(),
            "Message received"
        );

        if message.topic != self.settings.set_topic {
            tracing::debug!(topic = %message.topic, "Ignoring message on unexpected topic");
            return MessageOutcome::IgnoredTopic;
        }

        let update = match decode_set_command(&message.payload, self.settings.max_payload_size) {
            Ok(update) => update,
            Err(e) => {
                tracing::error!(error = %e, "Failed to decode set command");
                return MessageOutcome::Rejected;
            }
        };

        if !self.state.apply(&update) {
            tracing::debug!("State unchanged, nothing to send");
            return MessageOutcome::Unchanged;
        }

        if let Err(e) = self.translator.send(&self.state) {
            tracing::warn!(error = %e, "IR transmission failed");
            return MessageOutcome::TransmitFailed;
        }

        if let Err(e) = self.publish_state().await {
            tracing::warn!(error = %e, "State publication failed");
        }
        MessageOutcome::Applied
    }

    /// Publishes the current state, retained.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport refused the publish.
    pub async fn publish_state(&mut self) -> Result<(), ProtocolError> {
        let payload = StatePayload::from(&self.state).to_json()?;

        self.transport
            .publish(&self.settings.state_topic, &payload, true)
            .await?;
        tracing::info!(topic = %self.settings.state_topic, payload = %payload, "State published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::error::TransmitError;
    use crate::types::{AcMode, FanSpeed};

    /// Transport fed from a queue; an empty queue never resolves.
    #[derive(Debug, Default)]
    struct QueueTransport {
        connected: bool,
        refuse_connects: usize,
        refuse_subscribes: usize,
        refuse_publishes: usize,
        connect_attempts: usize,
        subscribe_attempts: usize,
        subscriptions: Vec<String>,
        published: Vec<(String, String, bool)>,
        inbox: VecDeque<Result<InboundMessage, ProtocolError>>,
    }

    impl Transport for QueueTransport {
        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn connect(&mut self) -> Result<(), ProtocolError> {
            self.connect_attempts += 1;
            if self.refuse_connects > 0 {
                self.refuse_connects -= 1;
                return Err(ProtocolError::ConnectionFailed("refused".to_string()));
            }
            self.connected = true;
            Ok(())
        }

        async fn subscribe(&mut self, topic: &str) -> Result<(), ProtocolError> {
            self.subscribe_attempts += 1;
            if self.refuse_subscribes > 0 {
                self.refuse_subscribes -= 1;
                return Err(ProtocolError::ConnectionFailed("queue full".to_string()));
            }
            self.subscriptions.push(topic.to_string());
            Ok(())
        }

        async fn publish(
            &mut self,
            topic: &str,
            payload: &str,
            retain: bool,
        ) -> Result<(), ProtocolError> {
            if self.refuse_publishes > 0 {
                self.refuse_publishes -= 1;
                return Err(ProtocolError::ConnectionFailed("queue full".to_string()));
            }
            self.published
                .push((topic.to_string(), payload.to_string(), retain));
            Ok(())
        }

        async fn poll(&mut self) -> Result<Option<InboundMessage>, ProtocolError> {
            match self.inbox.pop_front() {
                Some(Ok(message)) => Ok(Some(message)),
                Some(Err(e)) => {
                    self.connected = false;
                    Err(e)
                }
                None => std::future::pending().await,
            }
        }
    }

    #[derive(Debug, Default)]
    struct Recorder {
        sent: Vec<DaikinCommand>,
        refuse: bool,
    }

    impl IrTransmitter for Recorder {
        fn transmit(&mut self, command: &DaikinCommand) -> Result<(), TransmitError> {
            if self.refuse {
                return Err(TransmitError::Rejected("busy".to_string()));
            }
            self.sent.push(*command);
            Ok(())
        }
    }

    fn bridge() -> Bridge<QueueTransport, Recorder> {
        Bridge::new(
            QueueTransport::default(),
            Recorder::default(),
            BridgeSettings::default(),
        )
    }

    fn set(payload: &str) -> InboundMessage {
        InboundMessage::new(DEFAULT_SET_TOPIC, payload)
    }

    #[tokio::test]
    async fn applied_change_transmits_then_publishes() {
        let mut bridge = bridge();
        let outcome = bridge
            .handle_message(&set(r#"{"mode":"heat","temperature":21}"#))
            .await;

        assert_eq!(outcome, MessageOutcome::Applied);
        assert_eq!(bridge.state().mode(), &AcMode::Heat);
        assert_eq!(bridge.transmitter().sent.len(), 1);
        assert_eq!(bridge.transport().published.len(), 1);

        let (topic, payload, retain) = &bridge.transport().published[0];
        assert_eq!(topic, DEFAULT_STATE_TOPIC);
        assert_eq!(
            payload,
            r#"{"mode":"heat","temperature":21,"fan_mode":"auto","swing_mode":"off"}"#
        );
        assert!(retain);
    }

    #[tokio::test]
    async fn other_topics_are_ignored() {
        let mut bridge = bridge();
        let message = InboundMessage::new("daikinboxy/hvac/other", r#"{"mode":"cool"}"#);

        assert_eq!(
            bridge.handle_message(&message).await,
            MessageOutcome::IgnoredTopic
        );
        assert_eq!(bridge.state(), &AcState::new());
        assert!(bridge.transmitter().sent.is_empty());
    }

    #[tokio::test]
    async fn unchanged_state_is_silent() {
        let mut bridge = bridge();
        let outcome = bridge
            .handle_message(&set(r#"{"mode":"off","temperature":25}"#))
            .await;

        assert_eq!(outcome, MessageOutcome::Unchanged);
        assert!(bridge.transmitter().sent.is_empty());
        assert!(bridge.transport().published.is_empty());
    }

    #[tokio::test]
    async fn oversized_payload_is_rejected() {
        let mut bridge = Bridge::new(
            QueueTransport::default(),
            Recorder::default(),
            BridgeSettings::default().with_max_payload_size(8),
        );

        let outcome = bridge.handle_message(&set(r#"{"mode":"cool"}"#)).await;
        assert_eq!(outcome, MessageOutcome::Rejected);
        assert_eq!(bridge.state().mode(), &AcMode::Off);
    }

    #[tokio::test]
    async fn refused_transmission_skips_publication() {
        let mut bridge = bridge();
        bridge.translator = DaikinTranslator::new(Recorder {
            refuse: true,
            ..Recorder::default()
        });

        let outcome = bridge.handle_message(&set(r#"{"fan_mode":"low"}"#)).await;

        assert_eq!(outcome, MessageOutcome::TransmitFailed);
        assert_eq!(bridge.state().fan_speed(), &FanSpeed::Low);
        assert!(bridge.transport().published.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn connect_retries_with_fixed_delay() {
        let mut bridge = bridge();
        bridge.transport_mut().refuse_connects = 3;

        let started = Instant::now();
        bridge.ensure_connected().await;

        assert_eq!(bridge.transport().connect_attempts, 4);
        assert_eq!(started.elapsed(), Duration::from_secs(15));
        assert_eq!(bridge.transport().subscriptions, vec![DEFAULT_SET_TOPIC]);
        assert_eq!(bridge.transport().published.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn connected_transport_is_left_alone() {
        let mut bridge = bridge();
        bridge.ensure_connected().await;
        bridge.ensure_connected().await;

        assert_eq!(bridge.transport().connect_attempts, 1);
        assert_eq!(bridge.transport().published.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_subscribe_is_retried_on_live_connection() {
        let mut bridge = bridge();
        bridge.transport_mut().refuse_subscribes = 1;

        let started = Instant::now();
        bridge.ensure_connected().await;

        let transport = bridge.transport();
        assert_eq!(transport.connect_attempts, 1);
        assert_eq!(transport.subscribe_attempts, 2);
        assert_eq!(transport.subscriptions, vec![DEFAULT_SET_TOPIC]);
        assert_eq!(transport.published.len(), 1);
        assert_eq!(started.elapsed(), Duration::from_secs(5));

        // Already subscribed; nothing more to do
        bridge.ensure_connected().await;
        assert_eq!(bridge.transport().subscribe_attempts, 2);
        assert_eq!(bridge.transport().published.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_connect_publication_does_not_retry() {
        let mut bridge = bridge();
        bridge.transport_mut().refuse_publishes = 1;

        let started = Instant::now();
        bridge.ensure_connected().await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(bridge.transport().connect_attempts, 1);
        assert_eq!(bridge.transport().subscriptions.len(), 1);
        assert!(bridge.transport().published.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_publication_skipped_while_disconnected() {
        let mut bridge = bridge();
        bridge.ensure_connected().await;
        bridge
            .transport_mut()
            .inbox
            .push_back(Err(ProtocolError::NotConnected));

        tokio::time::advance(Duration::from_secs(30)).await;
        bridge.run_once().await;

        assert!(!bridge.transport().is_connected());
        assert_eq!(bridge.transport().published.len(), 1);

        // The reconnect publishes once; the periodic slot was consumed
        bridge
            .transport_mut()
            .inbox
            .push_back(Ok(InboundMessage::new("other/topic", "{}")));
        bridge.run_once().await;
        assert_eq!(bridge.transport().connect_attempts, 2);
        assert_eq!(bridge.transport().published.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_iteration_waits_for_periodic_publication() {
        let mut bridge = bridge();
        let started = Instant::now();

        // Connect publication, then the first periodic one
        bridge.run_once().await;

        assert_eq!(started.elapsed(), Duration::from_secs(30));
        assert_eq!(bridge.transport().published.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn message_iteration_does_not_wait() {
        let mut bridge = bridge();
        bridge
            .transport_mut()
            .inbox
            .push_back(Ok(set(r#"{"swing_mode":"on"}"#)));

        let started = Instant::now();
        bridge.run_once().await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(bridge.state().swing());
        assert_eq!(bridge.transmitter().sent.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_connection_is_restored_on_next_iteration() {
        let mut bridge = bridge();
        bridge
            .transport_mut()
            .inbox
            .push_back(Err(ProtocolError::NotConnected));

        bridge.run_once().await;
        assert!(!bridge.transport().is_connected());

        bridge
            .transport_mut()
            .inbox
            .push_back(Ok(set(r#"{"temperature":19}"#)));
        bridge.run_once().await;

        assert_eq!(bridge.transport().connect_attempts, 2);
        assert_eq!(bridge.transport().subscriptions.len(), 2);
        assert_eq!(bridge.state().temperature().value(), 19);
    }
}
