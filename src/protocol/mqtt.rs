// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport link for room monitors.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tokio::task::JoinHandle;

use crate::error::ProtocolError;
use crate::monitor::RoomMonitor;

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Delay before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// MQTT link feeding a room monitor.
///
/// The link connects to the monitor's configured broker, subscribes to its
/// topic set, and runs an event loop task that hands every inbound message
/// to [`RoomMonitor::ingest`]. Connection loss is retried in place;
/// subscriptions are re-established on every connection acknowledgment, so
/// a broker restart needs no action from the monitor's owner.
///
/// # Examples
///
/// ```no_run
/// use alison_lib::{MonitorConfig, MqttLink, RoomMonitor};
///
/// #[tokio::main]
/// async fn main() -> alison_lib::Result<()> {
///     let config = MonitorConfig::new("Bedroom", "mqtt://broker.local:1883")
///         .with_board_id("a1b2c3");
///     let monitor = RoomMonitor::new(config)?;
///
///     let link = MqttLink::builder().connect(monitor.clone()).await?;
///
///     // The monitor now tracks whatever the board publishes
///     println!("{} C", monitor.temperature());
///
///     link.disconnect().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MqttLink {
    client: AsyncClient,
    monitor: RoomMonitor,
    connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    event_task: JoinHandle<()>,
}

impl MqttLink {
    /// Creates a new builder for configuring the link.
    #[must_use]
    pub fn builder() -> MqttLinkBuilder {
        MqttLinkBuilder::default()
    }

    /// Returns whether the link currently has an acknowledged connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Returns the monitor this link feeds.
    #[must_use]
    pub fn monitor(&self) -> &RoomMonitor {
        &self.monitor
    }

    /// Disconnects from the broker and stops the event loop task.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be queued.
    pub async fn disconnect(self) -> Result<(), ProtocolError> {
        self.shutdown.store(true, Ordering::Release);
        self.client
            .disconnect()
            .await
            .map_err(ProtocolError::Mqtt)?;
        let _ = self.event_task.await;
        Ok(())
    }
}

/// Builder for creating an MQTT link with custom connection settings.
#[derive(Debug, Default)]
pub struct MqttLinkBuilder {
    username: Option<String>,
    password: Option<String>,
    client_id: Option<String>,
    keep_alive: Option<Duration>,
}

impl MqttLinkBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets authentication credentials for the MQTT broker.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets a custom client ID.
    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.keep_alive = Some(duration);
        self
    }

    /// Connects to the monitor's broker and starts the event loop.
    ///
    /// Returns as soon as the connection attempt is underway; subscription
    /// happens when the broker acknowledges the connection.
    ///
    /// # Errors
    ///
    /// Returns error if the broker URL cannot be parsed.
    // The connection itself is established lazily by the event loop task.
    #[allow(clippy::unused_async)]
    pub async fn connect(self, monitor: RoomMonitor) -> Result<MqttLink, ProtocolError> {
        let (host, port) = parse_mqtt_url(monitor.broker_url())?;

        // Generate or use provided client ID (PID + counter to avoid conflicts)
        let client_id = self.client_id.unwrap_or_else(|| {
            let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("alison_{}_{}", std::process::id(), counter)
        });

        tracing::info!(
            monitor = %monitor.name(),
            broker = %monitor.broker_url(),
            client_id = %client_id,
            "connecting to broker"
        );

        let mut mqtt_options = MqttOptions::new(&client_id, host, port);
        mqtt_options.set_keep_alive(self.keep_alive.unwrap_or(Duration::from_secs(30)));
        mqtt_options.set_clean_session(true);

        if let (Some(username), Some(password)) = (self.username, self.password) {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        let connected = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let event_task = tokio::spawn(handle_mqtt_events(
            event_loop,
            client.clone(),
            monitor.clone(),
            Arc::clone(&connected),
            Arc::clone(&shutdown),
        ));

        Ok(MqttLink {
            client,
            monitor,
            connected,
            shutdown,
            event_task,
        })
    }
}

/// Handles MQTT events in the background.
async fn handle_mqtt_events(
    mut event_loop: EventLoop,
    client: AsyncClient,
    monitor: RoomMonitor,
    connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
) {
    use rumqttc::{Event, Packet};

    let mut ever_connected = false;

    loop {
        if shutdown.load(Ordering::Acquire) {
            break;
        }

        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                if ever_connected {
                    tracing::info!(monitor = %monitor.name(), "mqtt client reconnected");
                } else {
                    tracing::info!(monitor = %monitor.name(), "mqtt client connected");
                    ever_connected = true;
                }
                connected.store(true, Ordering::Release);

                // Subscribe on every acknowledgment so subscriptions
                // survive broker restarts without owner involvement.
                for topic in monitor.topics().subscriptions() {
                    tracing::info!(
                        monitor = %monitor.name(),
                        topic = %topic,
                        "subscribing"
                    );
                    if let Err(e) = client.subscribe(topic, QoS::AtLeastOnce).await {
                        tracing::error!(topic = %topic, error = %e, "subscribe failed");
                    }
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "mqtt subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if let Err(e) = monitor.ingest(&publish.topic, &publish.payload) {
                    tracing::warn!(
                        monitor = %monitor.name(),
                        topic = %publish.topic,
                        error = %e,
                        "discarding unparseable status payload"
                    );
                }
            }
            Ok(_) => {}
            Err(e) => {
                connected.store(false, Ordering::Release);
                if shutdown.load(Ordering::Acquire) {
                    break;
                }
                tracing::warn!(error = %e, "mqtt connection lost, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }

    tracing::debug!(monitor = %monitor.name(), "mqtt event loop stopped");
}

/// Parses an MQTT URL into host and port.
fn parse_mqtt_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), 1883)
    };

    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mqtt_url_with_port() {
        let (host, port) = parse_mqtt_url("mqtt://192.168.1.50:1883").unwrap();
        assert_eq!(host, "192.168.1.50");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_default_port() {
        let (host, port) = parse_mqtt_url("broker.local").unwrap();
        assert_eq!(host, "broker.local");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_tcp_scheme() {
        let (host, port) = parse_mqtt_url("tcp://broker.local:8883").unwrap();
        assert_eq!(host, "broker.local");
        assert_eq!(port, 8883);
    }

    #[test]
    fn parse_mqtt_url_invalid_port() {
        let result = parse_mqtt_url("mqtt://broker.local:not_a_port");
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn link_builder_fields() {
        let builder = MqttLinkBuilder::new()
            .credentials("user", "pass")
            .client_id("my_client")
            .keep_alive(Duration::from_secs(60));

        assert_eq!(builder.username, Some("user".to_string()));
        assert_eq!(builder.password, Some("pass".to_string()));
        assert_eq!(builder.client_id, Some("my_client".to_string()));
        assert_eq!(builder.keep_alive, Some(Duration::from_secs(60)));
    }
}
