// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration loaded from a JSON file.
//!
//! Every field has a default, so an empty object (or no file at all) is a
//! valid configuration:
//!
//! ```json
//! {
//!   "mqtt": { "host": "192.168.1.50", "username": "ac", "password": "secret" },
//!   "topics": { "set": "daikinboxy/hvac/set", "state": "daikinboxy/hvac/state" },
//!   "publish_interval_secs": 30,
//!   "ir": { "backend": "tasmota", "topic": "ir_bridge" }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::bridge::{BridgeSettings, DEFAULT_SET_TOPIC, DEFAULT_STATE_TOPIC};
use crate::command::DEFAULT_MAX_PAYLOAD_SIZE;
use crate::error::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "HVAC_BRIDGE_CONFIG";

/// Top-level bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Broker connection.
    pub mqtt: MqttConfig,
    /// Topic names.
    pub topics: TopicConfig,
    /// Seconds between unconditional state publications.
    pub publish_interval_secs: u64,
    /// Seconds between connection attempts.
    pub reconnect_delay_secs: u64,
    /// Largest accepted inbound payload in bytes.
    pub max_payload_size: usize,
    /// Infrared transmitter backend.
    pub ir: IrBackend,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig::default(),
            topics: TopicConfig::default(),
            publish_interval_secs: 30,
            reconnect_delay_secs: 5,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            ir: IrBackend::default(),
        }
    }
}

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker host name or address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Optional user name.
    pub username: Option<String>,
    /// Optional password, only used together with `username`.
    pub password: Option<String>,
    /// Prefix of the generated client id.
    pub client_id_prefix: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u64,
    /// Timeout of one connection attempt in seconds.
    pub connection_timeout_secs: u64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            username: None,
            password: None,
            client_id_prefix: "hvac-bridge".to_string(),
            keep_alive_secs: 30,
            connection_timeout_secs: 10,
        }
    }
}

/// Topic names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Inbound set commands.
    pub set: String,
    /// Retained state publications.
    pub state: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            set: DEFAULT_SET_TOPIC.to_string(),
            state: DEFAULT_STATE_TOPIC.to_string(),
        }
    }
}

/// Where infrared commands go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum IrBackend {
    /// Log commands without transmitting.
    #[default]
    Log,
    /// Publish Tasmota `IRHVAC` commands to an IR bridge.
    Tasmota {
        /// Tasmota topic of the IR bridge.
        topic: String,
    },
}

impl BridgeConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` on malformed JSON and
    /// `ConfigError::Invalid` if a value is unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use hvac_ir_bridge::config::BridgeConfig;
    ///
    /// let config = BridgeConfig::from_json(r#"{"mqtt":{"host":"broker.lan"}}"#).unwrap();
    /// assert_eq!(config.mqtt.host, "broker.lan");
    /// assert_eq!(config.mqtt.port, 1883);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks values that would stall or break the bridge loop.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };

        if self.mqtt.host.trim().is_empty() {
            return invalid("mqtt.host must not be empty");
        }
        if self.topics.set.is_empty() || self.topics.state.is_empty() {
            return invalid("topics must not be empty");
        }
        if self.publish_interval_secs == 0 {
            return invalid("publish_interval_secs must be > 0");
        }
        if self.reconnect_delay_secs == 0 {
            return invalid("reconnect_delay_secs must be > 0");
        }
        if self.mqtt.connection_timeout_secs == 0 {
            return invalid("mqtt.connection_timeout_secs must be > 0");
        }
        if self.mqtt.keep_alive_secs < 5 {
            return invalid("mqtt.keep_alive_secs must be >= 5");
        }
        if self.max_payload_size == 0 {
            return invalid("max_payload_size must be > 0");
        }
        if let IrBackend::Tasmota { topic } = &self.ir
            && topic.is_empty()
        {
            return invalid("ir.topic must not be empty");
        }
        Ok(())
    }

    /// Settings for the bridge loop.
    #[must_use]
    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings::default()
            .with_topics(&self.topics.set, &self.topics.state)
            .with_publish_interval(Duration::from_secs(self.publish_interval_secs))
            .with_reconnect_delay(Duration::from_secs(self.reconnect_delay_secs))
            .with_max_payload_size(self.max_payload_size)
    }

    /// Builds the MQTT transport described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the broker address is unusable.
    #[cfg(feature = "mqtt")]
    pub fn mqtt_transport(
        &self,
    ) -> Result<crate::protocol::MqttTransport, crate::error::ProtocolError> {
        let mqtt = &self.mqtt;
        let mut builder = crate::protocol::MqttTransport::builder()
            .host(&mqtt.host)
            .port(mqtt.port)
            .client_id_prefix(&mqtt.client_id_prefix)
            .keep_alive(Duration::from_secs(mqtt.keep_alive_secs))
            .connection_timeout(Duration::from_secs(mqtt.connection_timeout_secs));

        if let Some(username) = &mqtt.username {
            builder = builder.credentials(username, mqtt.password.as_deref().unwrap_or_default());
        }

        builder.build()
    }
}
