// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios for the bridge loop against an in-memory broker.

use std::collections::VecDeque;
use std::time::Duration;

use hvac_ir_bridge::bridge::{Bridge, BridgeSettings, DEFAULT_SET_TOPIC, DEFAULT_STATE_TOPIC};
use hvac_ir_bridge::error::{ProtocolError, TransmitError};
use hvac_ir_bridge::ir::{DaikinCommand, DaikinFan, DaikinMode, IrTransmitter};
use hvac_ir_bridge::protocol::{InboundMessage, Transport};
use hvac_ir_bridge::types::{AcMode, FanSpeed};
use hvac_ir_bridge::MessageOutcome;
use tokio::time::Instant;

/// One retained or plain publication seen by the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Published {
    topic: String,
    payload: String,
    retain: bool,
}

#[derive(Debug, Default)]
struct MemoryBroker {
    connected: bool,
    connects: usize,
    subscriptions: Vec<String>,
    published: Vec<Published>,
    inbox: VecDeque<Result<InboundMessage, ProtocolError>>,
}

impl MemoryBroker {
    fn deliver(&mut self, payload: &str) {
        self.inbox
            .push_back(Ok(InboundMessage::new(DEFAULT_SET_TOPIC, payload)));
    }

    fn drop_connection(&mut self) {
        self.inbox.push_back(Err(ProtocolError::NotConnected));
    }

    fn state_publications(&self) -> Vec<&str> {
        self.published
            .iter()
            .filter(|p| p.topic == DEFAULT_STATE_TOPIC)
            .map(|p| p.payload.as_str())
            .collect()
    }
}

impl Transport for MemoryBroker {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), ProtocolError> {
        self.connects += 1;
        self.connected = true;
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), ProtocolError> {
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    async fn publish(
        &mut self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Result<(), ProtocolError> {
        self.published.push(Published {
            topic: topic.to_string(),
            payload: payload.to_string(),
            retain,
        });
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
struct RecordingTransmitter {
    sent: Vec<DaikinCommand>,
}

impl IrTransmitter for RecordingTransmitter {
    fn transmit(&mut self, command: &DaikinCommand) -> Result<(), TransmitError> {
        self.sent.push(*command);
        Ok(())
    }
}

type TestBridge = Bridge<MemoryBroker, RecordingTransmitter>;

/// A bridge that has already connected and published its initial state.
async fn connected_bridge() -> TestBridge {
    let mut bridge = Bridge::new(
        MemoryBroker::default(),
        RecordingTransmitter::default(),
        BridgeSettings::default(),
    );
    bridge.ensure_connected().await;
    bridge.transport_mut().published.clear();
    bridge
}

async fn deliver(bridge: &mut TestBridge, payload: &str) {
    bridge.transport_mut().deliver(payload);
    bridge.run_once().await;
}

mod command_handling {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn full_command_from_defaults() {
        let mut bridge = connected_bridge().await;
        deliver(
            &mut bridge,
            r#"{"mode":"cool","temperature":22,"fan_mode":"high","swing_mode":"on"}"#,
        )
        .await;

        let state = bridge.state();
        assert!(state.power());
        assert_eq!(state.mode(), &AcMode::Cool);
        assert_eq!(state.temperature().value(), 22);
        assert_eq!(state.fan_speed(), &FanSpeed::High);
        assert!(state.swing());

        let sent = &bridge.transmitter().sent;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].power());
        assert_eq!(sent[0].mode(), DaikinMode::Cool);
        assert_eq!(sent[0].temperature(), 22);
        assert_eq!(sent[0].fan(), DaikinFan::Max);
        assert!(sent[0].swing_vertical() && sent[0].swing_horizontal());

        assert_eq!(
            bridge.transport().published,
            vec![Published {
                topic: DEFAULT_STATE_TOPIC.to_string(),
                payload: r#"{"mode":"cool","temperature":22,"fan_mode":"high","swing_mode":"on"}"#
                    .to_string(),
                retain: true,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_payload_changes_nothing() {
        let mut bridge = connected_bridge().await;
        let before = bridge.state().clone();

        let outcome = bridge
            .handle_message(&InboundMessage::new(DEFAULT_SET_TOPIC, r#"{"mode":"cool""#))
            .await;

        assert_eq!(outcome, MessageOutcome::Rejected);
        assert_eq!(bridge.state(), &before);
        assert!(bridge.transmitter().sent.is_empty());
        assert!(bridge.transport().published.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_command_is_transmitted_once() {
        let mut bridge = connected_bridge().await;
        let payload = r#"{"mode":"heat","temperature":24,"fan_mode":"low","swing_mode":"off"}"#;

        deliver(&mut bridge, payload).await;
        let outcome = bridge
            .handle_message(&InboundMessage::new(DEFAULT_SET_TOPIC, payload))
            .await;

        assert_eq!(outcome, MessageOutcome::Unchanged);
        assert_eq!(bridge.transmitter().sent.len(), 1);
        assert_eq!(bridge.transport().state_publications().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn temperature_only_update_preserves_other_fields() {
        let mut bridge = connected_bridge().await;
        deliver(
            &mut bridge,
            r#"{"mode":"auto","fan_mode":"medium","swing_mode":"on"}"#,
        )
        .await;
        deliver(&mut bridge, r#"{"temperature":20}"#).await;

        let state = bridge.state();
        assert_eq!(state.mode(), &AcMode::Auto);
        assert_eq!(state.fan_speed(), &FanSpeed::Medium);
        assert!(state.swing());
        assert_eq!(state.temperature().value(), 20);
        assert_eq!(bridge.transmitter().sent.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_temperatures_are_dropped() {
        let mut bridge = connected_bridge().await;

        for payload in [
            r#"{"temperature":17}"#,
            r#"{"temperature":31}"#,
            r#"{"temperature":-5}"#,
            r#"{"temperature":22.5}"#,
        ] {
            let outcome = bridge
                .handle_message(&InboundMessage::new(DEFAULT_SET_TOPIC, payload))
                .await;
            assert_eq!(outcome, MessageOutcome::Unchanged, "{payload}");
        }

        assert_eq!(bridge.state().temperature().value(), 25);
        assert!(bridge.transmitter().sent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn range_bounds_are_accepted() {
        let mut bridge = connected_bridge().await;

        deliver(&mut bridge, r#"{"temperature":18}"#).await;
        assert_eq!(bridge.state().temperature().value(), 18);

        deliver(&mut bridge, r#"{"temperature":30}"#).await;
        assert_eq!(bridge.state().temperature().value(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn mode_drives_power() {
        let mut bridge = connected_bridge().await;

        deliver(&mut bridge, r#"{"mode":"fan_only"}"#).await;
        assert!(bridge.state().power());

        deliver(&mut bridge, r#"{"mode":"off"}"#).await;
        assert!(!bridge.state().power());

        let last = bridge.transmitter().sent.last().copied().unwrap();
        assert!(!last.power());
        assert_eq!(last.mode(), DaikinMode::Fan);
    }

    #[tokio::test(start_paused = true)]
    async fn unrecognized_fan_is_stored_and_sent_as_auto() {
        let mut bridge = connected_bridge().await;
        deliver(&mut bridge, r#"{"mode":"cool","fan_mode":"high"}"#).await;
        deliver(&mut bridge, r#"{"fan_mode":"turbo"}"#).await;

        assert_eq!(
            bridge.state().fan_speed(),
            &FanSpeed::Unrecognized("turbo".to_string())
        );
        assert_eq!(bridge.command().fan(), DaikinFan::Auto);
        assert_eq!(
            bridge.transport().state_publications().last().copied(),
            Some(r#"{"mode":"cool","temperature":25,"fan_mode":"turbo","swing_mode":"off"}"#)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn swing_matches_only_lowercase_on() {
        let mut bridge = connected_bridge().await;

        let outcome = bridge
            .handle_message(&InboundMessage::new(
                DEFAULT_SET_TOPIC,
                r#"{"swing_mode":"ON"}"#,
            ))
            .await;
        assert_eq!(outcome, MessageOutcome::Unchanged);
        assert!(!bridge.state().swing());

        deliver(&mut bridge, r#"{"swing_mode":"on"}"#).await;
        assert!(bridge.state().swing());
    }
}

mod scheduling {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_connection_publishes_state() {
        let mut bridge = Bridge::new(
            MemoryBroker::default(),
            RecordingTransmitter::default(),
            BridgeSettings::default(),
        );
        bridge.ensure_connected().await;

        let broker = bridge.transport();
        assert_eq!(broker.connects, 1);
        assert_eq!(broker.subscriptions, vec![DEFAULT_SET_TOPIC.to_string()]);
        assert_eq!(
            broker.published,
            vec![Published {
                topic: DEFAULT_STATE_TOPIC.to_string(),
                payload: r#"{"mode":"off","temperature":25,"fan_mode":"auto","swing_mode":"off"}"#
                    .to_string(),
                retain: true,
            }]
        );
        assert!(bridge.transmitter().sent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_publishes_exactly_once() {
        let mut bridge = connected_bridge().await;
        let started = Instant::now();

        bridge.transport_mut().drop_connection();
        bridge.run_once().await;
        assert!(bridge.transport().published.is_empty());

        bridge.transport_mut().deliver(r#"{"mode":"cool"}"#);
        bridge.run_once().await;

        // One reconnect publication plus one post-change publication
        let broker = bridge.transport();
        assert_eq!(broker.connects, 2);
        assert_eq!(broker.state_publications().len(), 2);
        assert_eq!(
            broker.state_publications()[0],
            r#"{"mode":"off","temperature":25,"fan_mode":"auto","swing_mode":"off"}"#
        );
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_bridge_publishes_every_interval() {
        let mut bridge = connected_bridge().await;
        let started = Instant::now();

        for _ in 0..3 {
            bridge.run_once().await;
        }

        assert_eq!(started.elapsed(), Duration::from_secs(90));
        assert_eq!(bridge.transport().state_publications().len(), 3);
        assert!(bridge.transport().published.iter().all(|p| p.retain));
        assert!(bridge.transmitter().sent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn messages_do_not_delay_periodic_publication() {
        let mut bridge = connected_bridge().await;
        let started = Instant::now();

        tokio::time::advance(Duration::from_secs(20)).await;
        deliver(&mut bridge, r#"{"temperature":21}"#).await;
        assert_eq!(bridge.transport().state_publications().len(), 1);

        // Next iteration waits only for the remainder of the interval
        bridge.run_once().await;
        assert_eq!(started.elapsed(), Duration::from_secs(30));
        assert_eq!(bridge.transport().state_publications().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_interval_is_honored() {
        let mut bridge = Bridge::new(
            MemoryBroker::default(),
            RecordingTransmitter::default(),
            BridgeSettings::default().with_publish_interval(Duration::from_secs(5)),
        );
        bridge.ensure_connected().await;
        let started = Instant::now();

        bridge.run_once().await;
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }
}
