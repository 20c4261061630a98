// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for monitor subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Internal registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::ReadingChange;
use crate::telemetry::PresenceReport;

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a monitor's lifetime.
///
/// # Examples
///
/// ```ignore
/// let sub_id = monitor.on_temperature_changed(|degrees| { /* ... */ });
///
/// // Later, unsubscribe
/// monitor.unsubscribe(sub_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for temperature callbacks.
type TemperatureCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// Type alias for humidity callbacks.
type HumidityCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// Type alias for generic reading change callbacks.
type ReadingChangedCallback = Arc<dyn Fn(&ReadingChange) + Send + Sync>;

/// Type alias for presence callbacks.
type PresenceCallback = Arc<dyn Fn(&PresenceReport) + Send + Sync>;

/// Registry for managing monitor subscription callbacks.
///
/// This is an internal type used by the monitor to store and dispatch
/// callbacks. It uses thread-safe interior mutability via
/// `parking_lot::RwLock`, so the transport task can dispatch while the host
/// registers or removes subscriptions from another thread.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Temperature change callbacks.
    temperature_callbacks: RwLock<HashMap<SubscriptionId, TemperatureCallback>>,
    /// Humidity change callbacks.
    humidity_callbacks: RwLock<HashMap<SubscriptionId, HumidityCallback>>,
    /// Generic reading change callbacks (receive all changes).
    reading_callbacks: RwLock<HashMap<SubscriptionId, ReadingChangedCallback>>,
    /// Presence report callbacks.
    presence_callbacks: RwLock<HashMap<SubscriptionId, PresenceCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            temperature_callbacks: RwLock::new(HashMap::new()),
            humidity_callbacks: RwLock::new(HashMap::new()),
            reading_callbacks: RwLock::new(HashMap::new()),
            presence_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for temperature changes.
    ///
    /// The callback receives the new temperature in degrees Celsius.
    pub fn on_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.temperature_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for humidity changes.
    ///
    /// The callback receives the new relative humidity in percent.
    pub fn on_humidity_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.humidity_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for all reading changes.
    ///
    /// This is useful for logging or debugging, as it receives every change.
    pub fn on_reading_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ReadingChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.reading_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for presence reports.
    pub fn on_presence<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.presence_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.temperature_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.humidity_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.reading_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.presence_callbacks.write().remove(&id).is_some() {
            return true;
        }
        false
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.temperature_callbacks.write().clear();
        self.humidity_callbacks.write().clear();
        self.reading_callbacks.write().clear();
        self.presence_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches an accepted reading change to relevant callbacks.
    ///
    /// Generic reading callbacks always fire; the per-characteristic
    /// callbacks fire for their own change type. Callbacks are called
    /// synchronously in an arbitrary order.
    pub fn dispatch(&self, change: &ReadingChange) {
        {
            let callbacks = self.reading_callbacks.read();
            for callback in callbacks.values() {
                callback(change);
            }
        }

        match change {
            ReadingChange::Temperature(degrees) => {
                let callbacks = self.temperature_callbacks.read();
                for callback in callbacks.values() {
                    callback(*degrees);
                }
            }
            ReadingChange::Humidity(percent) => {
                let callbacks = self.humidity_callbacks.read();
                for callback in callbacks.values() {
                    callback(*percent);
                }
            }
        }
    }

    /// Dispatches a presence report to presence callbacks.
    pub fn dispatch_presence(&self, report: &PresenceReport) {
        let callbacks = self.presence_callbacks.read();
        for callback in callbacks.values() {
            callback(report);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.temperature_callbacks.read().len()
            + self.humidity_callbacks.read().len()
            + self.reading_callbacks.read().len()
            + self.presence_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
