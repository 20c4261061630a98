// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The room monitor reconciler.
//!
//! [`RoomMonitor`] owns the best-known reading pair for one board and the
//! accessory surface built around it: synchronous reads, the service list,
//! and change subscriptions. Inbound messages enter through
//! [`ingest`](RoomMonitor::ingest); the transport link feeds it, but
//! anything that can produce `(topic, payload)` pairs will do.
//!
//! The monitor holds no connection state and performs no blocking work.
//! All collaborators are passed in, none are reached through process-wide
//! globals.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::accessory::{AccessoryInfo, AccessoryService, Capabilities};
use crate::config::{MonitorConfig, PayloadSchema, TopicSet};
use crate::error::{ConfigError, ParseError};
use crate::state::{ReadingChange, SensorReading};
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::telemetry::{PresenceReport, parse_status};

/// Outcome of ingesting one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingested {
    /// A status message was parsed; carries the accepted changes.
    ///
    /// Empty when every carried value matched the stored reading.
    Status(Vec<ReadingChange>),

    /// A presence message was observed.
    Presence(PresenceReport),

    /// The topic is outside the monitor's subscriptions.
    Ignored,
}

/// A single room monitor bridged into an accessory.
///
/// `RoomMonitor` is cheaply cloneable; clones share the same state. The
/// usual arrangement gives one clone to the transport link for ingestion
/// and keeps another for the host framework's reads.
///
/// # Examples
///
/// ```
/// use alison_lib::{MonitorConfig, RoomMonitor};
///
/// # fn main() -> alison_lib::Result<()> {
/// let config = MonitorConfig::new("Bedroom", "mqtt://broker.local:1883")
///     .with_board_id("a1b2c3")
///     .with_humidity_enabled(true);
/// let monitor = RoomMonitor::new(config)?;
///
/// monitor.on_temperature_changed(|degrees| {
///     println!("now {degrees} C");
/// });
///
/// let topic = monitor.topics().status().to_string();
/// monitor.ingest(&topic, br#"{"env":{"c":21.5}}"#)?;
/// assert_eq!(monitor.temperature(), 21.5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RoomMonitor {
    inner: Arc<MonitorInner>,
}

#[derive(Debug)]
struct MonitorInner {
    name: String,
    broker_url: String,
    topics: TopicSet,
    schema: PayloadSchema,
    info: AccessoryInfo,
    capabilities: Capabilities,
    reading: RwLock<SensorReading>,
    presence: RwLock<Option<PresenceReport>>,
    callbacks: CallbackRegistry,
}

impl RoomMonitor {
    /// Creates a monitor from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the display name or broker URL is
    /// missing or empty.
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        if config.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        if config.url.trim().is_empty() {
            return Err(ConfigError::MissingBrokerUrl);
        }

        let topics = config.topics();
        if topics.presence() == Some(topics.status()) {
            // One topic under both roles is almost certainly a config
            // mistake; presence classification wins at ingest.
            tracing::warn!(
                monitor = %config.name,
                topic = %topics.status(),
                "status and presence topics collide"
            );
        }

        let info = AccessoryInfo::from_config(&config);
        let capabilities =
            Capabilities::from_flags(config.temperature_enabled, config.humidity_enabled);
        let schema = config.payload_schema();

        Ok(Self {
            inner: Arc::new(MonitorInner {
                name: config.name,
                broker_url: config.url,
                topics,
                schema,
                info,
                capabilities,
                reading: RwLock::new(SensorReading::new()),
                presence: RwLock::new(None),
                callbacks: CallbackRegistry::new(),
            }),
        })
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Ingests one inbound message.
    ///
    /// Presence messages are decoded as text, logged, stored as the last
    /// report, and dispatched to presence callbacks; they never touch the
    /// readings. Status messages are parsed per the configured payload
    /// shape; each carried value that differs from the stored one replaces
    /// it and is dispatched exactly once. Messages on any other topic are
    /// ignored.
    ///
    /// Both readings are updated under a single write lock, so a
    /// concurrent read observes the pair before or after the whole
    /// message, never in between. Callbacks run after the lock is
    /// released.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for a malformed or schema-mismatched status
    /// payload. The stored readings are untouched and nothing is
    /// dispatched; the caller is expected to log and move on.
    pub fn ingest(&self, topic: &str, payload: &[u8]) -> Result<Ingested, ParseError> {
        if self.inner.topics.presence() == Some(topic) {
            return Ok(self.ingest_presence(payload));
        }

        if self.inner.topics.status() == topic {
            return self.ingest_status(payload).map(Ingested::Status);
        }

        tracing::trace!(
            monitor = %self.inner.name,
            topic = %topic,
            "ignoring message on unsubscribed topic"
        );
        Ok(Ingested::Ignored)
    }

    fn ingest_presence(&self, payload: &[u8]) -> Ingested {
        let text = String::from_utf8_lossy(payload).into_owned();
        tracing::info!(
            monitor = %self.inner.name,
            presence = %text,
            "sensor connection report"
        );

        let report = PresenceReport::new(text);
        *self.inner.presence.write() = Some(report.clone());
        self.inner.callbacks.dispatch_presence(&report);
        Ingested::Presence(report)
    }

    fn ingest_status(&self, payload: &[u8]) -> Result<Vec<ReadingChange>, ParseError> {
        let readings = parse_status(payload, self.inner.schema)?;

        let mut accepted = Vec::new();
        {
            let mut reading = self.inner.reading.write();
            for change in readings.to_changes() {
                if reading.apply(&change) {
                    accepted.push(change);
                }
            }
        }

        for change in &accepted {
            tracing::debug!(
                monitor = %self.inner.name,
                change = %change,
                "reading updated"
            );
            self.inner.callbacks.dispatch(change);
        }

        Ok(accepted)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the current temperature in degrees Celsius.
    ///
    /// Never blocks beyond the read lock and never fails; before the first
    /// status message this is `0.0`.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.inner.reading.read().temperature()
    }

    /// Returns the current relative humidity in percent.
    #[must_use]
    pub fn humidity(&self) -> f32 {
        self.inner.reading.read().humidity()
    }

    /// Returns an atomic snapshot of the reading pair.
    #[must_use]
    pub fn reading(&self) -> SensorReading {
        *self.inner.reading.read()
    }

    /// Returns the last presence report, if any was observed.
    #[must_use]
    pub fn presence(&self) -> Option<PresenceReport> {
        self.inner.presence.read().clone()
    }

    // =========================================================================
    // Accessory surface
    // =========================================================================

    /// Returns the accessory display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the identity metadata for the accessory framework.
    #[must_use]
    pub fn info(&self) -> &AccessoryInfo {
        &self.inner.info
    }

    /// Returns the configured sensor capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.inner.capabilities
    }

    /// Returns the services to register, information first.
    ///
    /// Follows the configuration flags only; ingested data never widens
    /// the list.
    #[must_use]
    pub fn services(&self) -> Vec<AccessoryService> {
        self.inner.capabilities.services()
    }

    /// Returns the topics this monitor listens on.
    #[must_use]
    pub fn topics(&self) -> &TopicSet {
        &self.inner.topics
    }

    /// Returns the configured broker URL.
    #[must_use]
    pub fn broker_url(&self) -> &str {
        &self.inner.broker_url
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Subscribes to temperature changes.
    ///
    /// The callback fires once per accepted change with the new value in
    /// degrees Celsius.
    pub fn on_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_temperature_changed(callback)
    }

    /// Subscribes to humidity changes.
    pub fn on_humidity_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_humidity_changed(callback)
    }

    /// Subscribes to all reading changes.
    pub fn on_reading_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ReadingChange) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_reading_changed(callback)
    }

    /// Subscribes to presence reports.
    pub fn on_presence<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_presence(callback)
    }

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::config::TopicScheme;

    fn monitor() -> RoomMonitor {
        RoomMonitor::new(
            MonitorConfig::new("Bedroom", "mqtt://broker:1883")
                .with_board_id("a1b2c3")
                .with_humidity_enabled(true),
        )
        .unwrap()
    }

    fn flat_monitor() -> RoomMonitor {
        RoomMonitor::new(
            MonitorConfig::new("Attic", "mqtt://broker:1883")
                .with_board_id("d4e5f6")
                .with_scheme(TopicScheme::Esp8266)
                .with_humidity_enabled(true),
        )
        .unwrap()
    }

    fn counted_changes(monitor: &RoomMonitor) -> Arc<AtomicU32> {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        monitor.on_reading_changed(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        counter
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = RoomMonitor::new(MonitorConfig::new("  ", "mqtt://broker:1883")).unwrap_err();
        assert_eq!(err, ConfigError::MissingName);
    }

    #[test]
    fn missing_url_is_rejected() {
        let err = RoomMonitor::new(MonitorConfig::new("Bedroom", "")).unwrap_err();
        assert_eq!(err, ConfigError::MissingBrokerUrl);
    }

    #[test]
    fn first_status_message_sets_temperature() {
        // Initial state (0.0, 0.0); one nested message with only `c`
        let monitor = monitor();
        let notifications = counted_changes(&monitor);

        let outcome = monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":21.5}}"#)
            .unwrap();

        assert_eq!(outcome, Ingested::Status(vec![ReadingChange::Temperature(21.5)]));
        assert_eq!(monitor.temperature(), 21.5);
        assert_eq!(monitor.humidity(), 0.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeated_message_notifies_once() {
        let monitor = monitor();
        let notifications = counted_changes(&monitor);

        let payload = br#"{"env":{"c":21.5,"h":40}}"#;
        monitor.ingest("/alison/a1b2c3/status", payload).unwrap();
        assert_eq!(notifications.load(Ordering::SeqCst), 2);

        let outcome = monitor.ingest("/alison/a1b2c3/status", payload).unwrap();
        assert_eq!(outcome, Ingested::Status(vec![]));
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn absent_field_keeps_previous_reading() {
        let monitor = monitor();
        let notifications = counted_changes(&monitor);

        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":21.5,"h":40}}"#)
            .unwrap();
        // Same temperature, humidity absent: nothing to notify
        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":21.5}}"#)
            .unwrap();

        assert_eq!(monitor.temperature(), 21.5);
        assert_eq!(monitor.humidity(), 40.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn malformed_payload_is_absorbed() {
        let monitor = monitor();
        let notifications = counted_changes(&monitor);

        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":21.5}}"#)
            .unwrap();

        let err = monitor
            .ingest("/alison/a1b2c3/status", b"{not json")
            .unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));

        // Prior reading retained, no extra notification
        assert_eq!(monitor.temperature(), 21.5);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn presence_message_never_mutates_readings() {
        let monitor = monitor();
        let notifications = counted_changes(&monitor);

        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":21.5,"h":40}}"#)
            .unwrap();

        // Even JSON that looks like a status payload is plain text here
        let outcome = monitor
            .ingest("/alison/a1b2c3/presence", br#"{"env":{"c":99,"h":99}}"#)
            .unwrap();
        assert!(matches!(outcome, Ingested::Presence(_)));

        assert_eq!(monitor.temperature(), 21.5);
        assert_eq!(monitor.humidity(), 40.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn presence_message_is_stored_and_dispatched() {
        let monitor = monitor();
        let seen = Arc::new(AtomicU32::new(0));
        let seen_clone = seen.clone();
        monitor.on_presence(move |_report| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(monitor.presence().is_none());
        monitor.ingest("/alison/a1b2c3/presence", b"Online").unwrap();

        let report = monitor.presence().unwrap();
        assert_eq!(report.raw(), "Online");
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn flat_schema_full_message_notifies_twice() {
        let monitor = flat_monitor();
        let notifications = counted_changes(&monitor);

        let outcome = monitor
            .ingest("/alison/esp8266/d4e5f6/status", br#"{"c":18,"h":55}"#)
            .unwrap();

        assert_eq!(
            outcome,
            Ingested::Status(vec![
                ReadingChange::Temperature(18.0),
                ReadingChange::Humidity(55.0),
            ])
        );
        assert_eq!(monitor.temperature(), 18.0);
        assert_eq!(monitor.humidity(), 55.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_topic_is_ignored() {
        let monitor = monitor();
        let notifications = counted_changes(&monitor);

        let outcome = monitor
            .ingest("/alison/other/status", br#"{"env":{"c":30}}"#)
            .unwrap();

        assert_eq!(outcome, Ingested::Ignored);
        assert_eq!(monitor.temperature(), 0.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn disabled_humidity_stays_out_of_services() {
        let monitor = RoomMonitor::new(
            MonitorConfig::new("Bedroom", "mqtt://broker:1883").with_board_id("a1b2c3"),
        )
        .unwrap();

        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"h":40}}"#)
            .unwrap();

        // The reading is tracked but the service list follows config only
        assert_eq!(monitor.humidity(), 40.0);
        assert!(!monitor.services().contains(&AccessoryService::HumiditySensor));
        assert!(monitor.services().contains(&AccessoryService::Information));
        assert!(monitor.services().contains(&AccessoryService::TemperatureSensor));
    }

    #[test]
    fn per_characteristic_callbacks_receive_values() {
        let monitor = monitor();

        let last_temperature = Arc::new(RwLock::new(None::<f32>));
        let last_humidity = Arc::new(RwLock::new(None::<f32>));
        let t = last_temperature.clone();
        let h = last_humidity.clone();
        monitor.on_temperature_changed(move |degrees| *t.write() = Some(degrees));
        monitor.on_humidity_changed(move |percent| *h.write() = Some(percent));

        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":19.5,"h":47}}"#)
            .unwrap();

        assert_eq!(*last_temperature.read(), Some(19.5));
        assert_eq!(*last_humidity.read(), Some(47.0));
    }

    #[test]
    fn unsubscribed_callback_stops_firing() {
        let monitor = monitor();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let id = monitor.on_temperature_changed(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":20}}"#)
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(monitor.unsubscribe(id));
        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":21}}"#)
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_state() {
        let monitor = monitor();
        let reader = monitor.clone();

        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":23}}"#)
            .unwrap();

        assert_eq!(reader.temperature(), 23.0);
    }

    #[test]
    fn colliding_topics_classify_as_presence() {
        // Explicitly configuring the same topic for both roles is warned
        // about at construction; ingest then treats it as presence so
        // sensor JSON is never half-applied.
        let monitor = RoomMonitor::new(
            MonitorConfig::new("Bedroom", "mqtt://broker:1883")
                .with_topic("/shared")
                .with_presence_topic("/shared"),
        )
        .unwrap();

        let outcome = monitor.ingest("/shared", br#"{"env":{"c":21.5}}"#).unwrap();
        assert!(matches!(outcome, Ingested::Presence(_)));
        assert_eq!(monitor.temperature(), 0.0);
    }

    #[test]
    fn snapshot_returns_consistent_pair() {
        let monitor = monitor();
        monitor
            .ingest("/alison/a1b2c3/status", br#"{"env":{"c":21.5,"h":40}}"#)
            .unwrap();

        let snapshot = monitor.reading();
        assert_eq!(snapshot.temperature(), 21.5);
        assert_eq!(snapshot.humidity(), 40.0);
    }
}
