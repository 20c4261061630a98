// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Alison Lib - A Rust library to bridge Alison room monitors into
//! smart-home accessories.
//!
//! Alison room monitors publish environmental readings as JSON over MQTT.
//! This library subscribes to a board's topics, keeps the latest
//! temperature/humidity pair, and exposes it the way an accessory
//! framework wants to consume it: synchronous reads, a capability list,
//! and change notifications that fire exactly once per distinct value.
//!
//! # Supported Features
//!
//! - **Status tracking**: latest temperature and humidity with change
//!   detection, stale values retained across malformed messages
//! - **Presence tracking**: optional presence topic with online/offline
//!   recognition
//! - **Both board generations**: nested (`{"env":{"c":..}}`) and flat
//!   (`{"c":..}`) payloads, both topic conventions
//! - **Accessory surface**: identity metadata, capability toggles, and
//!   push subscriptions for a host framework
//!
//! # Quick Start
//!
//! ## Bridging a board over MQTT
//!
//! ```no_run
//! use alison_lib::{MonitorConfig, MqttLink, RoomMonitor};
//!
//! #[tokio::main]
//! async fn main() -> alison_lib::Result<()> {
//!     let config = MonitorConfig::new("Bedroom", "mqtt://broker.local:1883")
//!         .with_board_id("a1b2c3")
//!         .with_humidity_enabled(true);
//!
//!     let monitor = RoomMonitor::new(config)?;
//!
//!     // Push notifications for the host framework
//!     monitor.on_temperature_changed(|degrees| {
//!         println!("temperature is now {degrees} C");
//!     });
//!
//!     // Connect and start feeding the monitor
//!     let link = MqttLink::builder().connect(monitor.clone()).await?;
//!
//!     // Synchronous reads whenever the framework asks
//!     let _ = monitor.temperature();
//!
//!     link.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Driving the reconciler directly
//!
//! The monitor does not care where messages come from, which keeps it easy
//! to test:
//!
//! ```
//! use alison_lib::{MonitorConfig, RoomMonitor};
//!
//! # fn main() -> alison_lib::Result<()> {
//! let monitor = RoomMonitor::new(
//!     MonitorConfig::new("Bedroom", "mqtt://broker.local:1883").with_board_id("a1b2c3"),
//! )?;
//!
//! monitor.ingest("/alison/a1b2c3/status", br#"{"env":{"c":21.5}}"#)?;
//! assert_eq!(monitor.temperature(), 21.5);
//! # Ok(())
//! # }
//! ```

pub mod accessory;
pub mod config;
pub mod error;
mod monitor;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod telemetry;

pub use accessory::{AccessoryInfo, AccessoryService, Capabilities};
pub use config::{MonitorConfig, PayloadSchema, TopicScheme, TopicSet};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result};
pub use monitor::{Ingested, RoomMonitor};
pub use protocol::{MqttLink, MqttLinkBuilder};
pub use state::{ReadingChange, SensorReading};
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use telemetry::{Availability, EnvReadings, PresenceReport};
