// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor configuration types.
//!
//! A [`MonitorConfig`] is read by the host process at startup, either built
//! in code with the `with_*` methods or deserialized from the host's own
//! config file. Wire key names match the config blocks users already have
//! for these boards (`boardId`, `temperature_enabled`, ...), so existing
//! setups keep working.

use serde::Deserialize;

/// Default board identifier when none is configured.
const DEFAULT_BOARD_ID: &str = "unknown";

/// Default accessory manufacturer string.
const DEFAULT_MANUFACTURER: &str = "Evening Indie";

/// Default accessory model string.
const DEFAULT_MODEL: &str = "Alison Room Monitor";

/// Configuration for a single room monitor.
///
/// # Examples
///
/// ```
/// use alison_lib::config::{MonitorConfig, TopicScheme};
///
/// let config = MonitorConfig::new("Bedroom", "mqtt://broker.local:1883")
///     .with_board_id("a1b2c3")
///     .with_humidity_enabled(true);
///
/// assert_eq!(config.topics().status(), "/alison/a1b2c3/status");
///
/// // Boards flashed with the esp8266 firmware use the other convention
/// let config = MonitorConfig::new("Attic", "mqtt://broker.local:1883")
///     .with_board_id("d4e5f6")
///     .with_scheme(TopicScheme::Esp8266);
///
/// assert_eq!(config.topics().status(), "/alison/esp8266/d4e5f6/status");
/// assert!(config.topics().presence().is_none());
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Display name for the accessory. Required.
    pub name: String,

    /// Board identifier, used in topic derivation and as the serial number.
    #[serde(rename = "boardId", default = "default_board_id")]
    pub board_id: String,

    /// Manufacturer string reported to the accessory framework.
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,

    /// Model string reported to the accessory framework.
    #[serde(default = "default_model")]
    pub model: String,

    /// Firmware revision reported to the accessory framework.
    ///
    /// Defaults to this crate's version when not set.
    #[serde(default)]
    pub firmware_version: Option<String>,

    /// MQTT broker URL (e.g. `mqtt://broker.local:1883`). Required.
    pub url: String,

    /// Override for the status topic.
    ///
    /// Replaces the scheme-derived status topic only; the presence topic
    /// keeps its own derivation. One topic must never serve both roles.
    #[serde(default)]
    pub topic: Option<String>,

    /// Override for the presence topic, independent of `topic`.
    #[serde(default)]
    pub presence_topic: Option<String>,

    /// Whether the temperature sensor service is exposed.
    #[serde(default = "default_true")]
    pub temperature_enabled: bool,

    /// Whether the humidity sensor service is exposed.
    #[serde(default)]
    pub humidity_enabled: bool,

    /// Topic derivation convention used by the board firmware.
    #[serde(default)]
    pub scheme: TopicScheme,

    /// Status payload shape. Defaults to the scheme's native shape.
    #[serde(default)]
    pub payload: Option<PayloadSchema>,
}

fn default_board_id() -> String {
    DEFAULT_BOARD_ID.to_string()
}

fn default_manufacturer() -> String {
    DEFAULT_MANUFACTURER.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_true() -> bool {
    true
}

impl MonitorConfig {
    /// Creates a configuration with the required fields and all defaults.
    #[must_use]
    pub fn new(name: impl Into<String>, broker_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            board_id: default_board_id(),
            manufacturer: default_manufacturer(),
            model: default_model(),
            firmware_version: None,
            url: broker_url.into(),
            topic: None,
            presence_topic: None,
            temperature_enabled: true,
            humidity_enabled: false,
            scheme: TopicScheme::default(),
            payload: None,
        }
    }

    /// Sets the board identifier.
    #[must_use]
    pub fn with_board_id(mut self, board_id: impl Into<String>) -> Self {
        self.board_id = board_id.into();
        self
    }

    /// Sets the manufacturer string.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    /// Sets the model string.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the reported firmware revision.
    #[must_use]
    pub fn with_firmware_version(mut self, version: impl Into<String>) -> Self {
        self.firmware_version = Some(version.into());
        self
    }

    /// Overrides the status topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Overrides the presence topic.
    #[must_use]
    pub fn with_presence_topic(mut self, topic: impl Into<String>) -> Self {
        self.presence_topic = Some(topic.into());
        self
    }

    /// Enables or disables the temperature sensor service.
    #[must_use]
    pub fn with_temperature_enabled(mut self, enabled: bool) -> Self {
        self.temperature_enabled = enabled;
        self
    }

    /// Enables or disables the humidity sensor service.
    #[must_use]
    pub fn with_humidity_enabled(mut self, enabled: bool) -> Self {
        self.humidity_enabled = enabled;
        self
    }

    /// Sets the topic derivation scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: TopicScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the status payload shape explicitly.
    #[must_use]
    pub fn with_payload(mut self, payload: PayloadSchema) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Returns the payload shape in effect, explicit or scheme-derived.
    #[must_use]
    pub fn payload_schema(&self) -> PayloadSchema {
        self.payload.unwrap_or_else(|| self.scheme.default_payload())
    }

    /// Derives the topic set for this configuration.
    #[must_use]
    pub fn topics(&self) -> TopicSet {
        let status = self
            .topic
            .clone()
            .unwrap_or_else(|| self.scheme.status_topic(&self.board_id));
        let presence = self
            .presence_topic
            .clone()
            .or_else(|| self.scheme.presence_topic(&self.board_id));
        TopicSet { status, presence }
    }
}

/// Topic derivation convention used by the board firmware.
///
/// The two fielded firmware generations publish under different topic trees
/// and with different payload shapes. The scheme selects both defaults;
/// either can still be overridden independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicScheme {
    /// `/alison/{board_id}/status` plus `/alison/{board_id}/presence`,
    /// nested status payloads.
    #[default]
    RoomMonitor,

    /// `/alison/esp8266/{board_id}/status`, flat status payloads, no
    /// presence topic.
    Esp8266,
}

impl TopicScheme {
    /// Derives the status topic for a board.
    #[must_use]
    pub fn status_topic(self, board_id: &str) -> String {
        match self {
            Self::RoomMonitor => format!("/alison/{board_id}/status"),
            Self::Esp8266 => format!("/alison/esp8266/{board_id}/status"),
        }
    }

    /// Derives the presence topic for a board, if the scheme has one.
    #[must_use]
    pub fn presence_topic(self, board_id: &str) -> Option<String> {
        match self {
            Self::RoomMonitor => Some(format!("/alison/{board_id}/presence")),
            Self::Esp8266 => None,
        }
    }

    /// Returns the payload shape this firmware generation publishes.
    #[must_use]
    pub const fn default_payload(self) -> PayloadSchema {
        match self {
            Self::RoomMonitor => PayloadSchema::Nested,
            Self::Esp8266 => PayloadSchema::Flat,
        }
    }
}

/// Shape of the JSON status payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSchema {
    /// Readings wrapped in an `env` object: `{"env":{"c":21.5,"h":40}}`.
    Nested,

    /// Readings at the top level: `{"c":21.5,"h":40}`.
    Flat,
}

/// The derived set of topics a monitor subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    status: String,
    presence: Option<String>,
}

impl TopicSet {
    /// Returns the status topic.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the presence topic, if one is configured.
    #[must_use]
    pub fn presence(&self) -> Option<&str> {
        self.presence.as_deref()
    }

    /// Returns the topics to subscribe to, status first.
    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.status.as_str()).chain(self.presence.as_deref())
    }
}
