// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport built on `rumqttc`.
//!
//! Unlike a typical `rumqttc` setup, the event loop is not spawned on its
//! own task. The bridge drives it directly through [`Transport::poll`] so
//! that message handling and periodic publishing stay strictly sequential.

use std::time::Duration;

use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::error::ProtocolError;
use crate::protocol::{InboundMessage, Transport};

/// Default client id prefix; a random suffix is appended.
const DEFAULT_CLIENT_ID_PREFIX: &str = "hvac-bridge";

/// Capacity of the request queue between the client and the event loop.
const REQUEST_CAPACITY: usize = 10;

/// Configuration for an MQTT transport.
#[derive(Debug, Clone)]
struct MqttTransportConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    client_id: Option<String>,
    client_id_prefix: String,
    keep_alive: Duration,
    connection_timeout: Duration,
}

impl Default for MqttTransportConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            credentials: None,
            client_id: None,
            client_id_prefix: DEFAULT_CLIENT_ID_PREFIX.to_string(),
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

/// MQTT connection owned by the bridge loop.
///
/// # Examples
///
/// ```no_run
/// use hvac_ir_bridge::protocol::{MqttTransport, Transport};
///
/// # async fn example() -> hvac_ir_bridge::Result<()> {
/// let mut transport = MqttTransport::builder()
///     .host("192.168.1.50")
///     .credentials("user", "password")
///     .build()?;
///
/// transport.connect().await?;
/// transport.subscribe("daikinboxy/hvac/set").await?;
/// # Ok(())
/// # }
/// ```
pub struct MqttTransport {
    client: AsyncClient,
    event_loop: EventLoop,
    client_id: String,
    config: MqttTransportConfig,
    connected: bool,
}

impl MqttTransport {
    /// Creates a new builder for configuring an MQTT transport.
    #[must_use]
    pub fn builder() -> MqttTransportBuilder {
        MqttTransportBuilder::default()
    }

    /// Returns the client id presented to the broker.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Returns a handle for publishing through this connection.
    ///
    /// Requests made through the handle are carried by the same event loop,
    /// so they only go out while the bridge is polling.
    #[must_use]
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }
}

impl std::fmt::Debug for MqttTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttTransport")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("client_id", &self.client_id)
            .field("connected", &self.connected)
            .finish_non_exhaustive()
    }
}

impl Transport for MqttTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), ProtocolError> {
        let timeout = self.config.connection_timeout;
        let event_loop = &mut self.event_loop;

        // The event loop (re)connects on the first poll after a failure
        let attempt = async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                        if connack.code == ConnectReturnCode::Success {
                            return Ok(());
                        }
                        return Err(ProtocolError::ConnectionFailed(format!(
                            "broker refused connection: {:?}",
                            connack.code
                        )));
                    }
                    Ok(_) => {}
                    Err(e) => return Err(ProtocolError::ConnectionFailed(e.to_string())),
                }
            }
        };

        match tokio::time::timeout(timeout, attempt).await {
            Ok(Ok(())) => {
                self.connected = true;
                tracing::info!(
                    host = %self.config.host,
                    port = %self.config.port,
                    client_id = %self.client_id,
                    "Connected to MQTT broker"
                );
                Ok(())
            }
            Ok(Err(e)) => {
                self.connected = false;
                Err(e)
            }
            Err(_) => {
                self.connected = false;
                // Safe: connection timeouts are configured in seconds
                #[allow(clippy::cast_possible_truncation)]
                let timeout_ms = timeout.as_millis() as u64;
                Err(ProtocolError::Timeout(timeout_ms))
            }
        }
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), ProtocolError> {
        self.client.try_subscribe(topic, QoS::AtLeastOnce)?;
        tracing::debug!(topic = %topic, "Subscribed");
        Ok(())
    }

    async fn publish(
        &mut self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Result<(), ProtocolError> {
        tracing::debug!(topic = %topic, payload = %payload, retain, "Publishing MQTT message");
        self.client
            .try_publish(topic, QoS::AtLeastOnce, retain, payload.as_bytes().to_vec())?;
        Ok(())
    }

    async fn poll(&mut self) -> Result<Option<InboundMessage>, ProtocolError> {
        match self.event_loop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => Ok(Some(InboundMessage::new(
                publish.topic,
                publish.payload.to_vec(),
            ))),
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
                Ok(None)
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker disconnected");
                self.connected = false;
                Err(ProtocolError::NotConnected)
            }
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::error!(error = %e, "MQTT event loop error");
                self.connected = false;
                Err(ProtocolError::ConnectionFailed(e.to_string()))
            }
        }
    }
}

/// Builder for creating an MQTT transport.
///
/// Building does not touch the network; the first
/// [`Transport::connect`] call does.
#[derive(Debug, Default)]
pub struct MqttTransportBuilder {
    config: MqttTransportConfig,
}

impl MqttTransportBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets a fixed client id instead of a generated one.
    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = Some(id.into());
        self
    }

    /// Sets the prefix of the generated client id (default: `hvac-bridge`).
    #[must_use]
    pub fn client_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.client_id_prefix = prefix.into();
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the timeout of a single connection attempt (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Builds the transport without connecting.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is not set.
    pub fn build(self) -> Result<MqttTransport, ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let client_id = self
            .config
            .client_id
            .clone()
            .unwrap_or_else(|| generate_client_id(&self.config.client_id_prefix));

        let mut mqtt_options = MqttOptions::new(&client_id, &self.config.host, self.config.port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_CAPACITY);

        Ok(MqttTransport {
            client,
            event_loop,
            client_id,
            config: self.config,
            connected: false,
        })
    }
}

/// Generates `<prefix>-<4 hex digits>`.
fn generate_client_id(prefix: &str) -> String {
    let bytes = uuid::Uuid::new_v4();
    let bytes = bytes.as_bytes();
    let suffix = u16::from_be_bytes([bytes[0], bytes[1]]);
    format!("{prefix}-{suffix:04x}")
}
