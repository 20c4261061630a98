// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker transport for room monitors.
//!
//! The transport owns everything connection-shaped: URL parsing, the MQTT
//! client, subscriptions, and the event loop that feeds inbound messages
//! into a [`RoomMonitor`](crate::RoomMonitor). The reconciler never sees a
//! connection event; reconnects and resubscription happen here.

mod mqtt;

pub use mqtt::{MqttLink, MqttLinkBuilder};
