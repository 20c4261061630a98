// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Alison bridge library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: monitor configuration, broker communication, and status payload
//! parsing.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when bridging a
/// room monitor into an accessory.
#[derive(Debug, Error)]
pub enum Error {
    /// Error in the monitor configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred during broker communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a status payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors in the monitor configuration.
///
/// These surface from [`RoomMonitor::new`](crate::RoomMonitor::new) at
/// construction time only; a constructed monitor never fails on
/// configuration grounds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The display name is missing or empty.
    #[error("display name is required")]
    MissingName,

    /// The broker URL is missing or empty.
    #[error("broker URL is required")]
    MissingBrokerUrl,
}

/// Errors related to MQTT broker communication.
///
/// These are owned entirely by the transport link; the reconciler itself
/// never produces or observes them.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing room monitor status payloads.
///
/// A parse failure is recovered at the ingestion boundary: the transport
/// logs it and the previously stored readings are retained.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
