// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for room monitor status messages.

use serde::Deserialize;

use crate::config::PayloadSchema;
use crate::error::ParseError;
use crate::state::ReadingChange;

/// Environmental readings carried by a status message.
///
/// Both fields are optional: a message that omits a measurement (or sets it
/// to `null`) simply carries no update for it.
///
/// # Examples
///
/// ```
/// use alison_lib::telemetry::EnvReadings;
///
/// let readings: EnvReadings = serde_json::from_str(r#"{"c":21.5,"h":40}"#).unwrap();
/// assert_eq!(readings.temperature(), Some(21.5));
/// assert_eq!(readings.humidity(), Some(40.0));
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EnvReadings {
    /// Temperature in degrees Celsius.
    #[serde(rename = "c", default)]
    temperature: Option<f32>,

    /// Relative humidity in percent.
    #[serde(rename = "h", default)]
    humidity: Option<f32>,
}

impl EnvReadings {
    /// Returns the temperature reading, if the message carried one.
    #[must_use]
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Returns the humidity reading, if the message carried one.
    #[must_use]
    pub fn humidity(&self) -> Option<f32> {
        self.humidity
    }

    /// Converts the carried readings into changes, temperature first.
    #[must_use]
    pub fn to_changes(&self) -> Vec<ReadingChange> {
        let mut changes = Vec::with_capacity(2);
        if let Some(degrees) = self.temperature {
            changes.push(ReadingChange::Temperature(degrees));
        }
        if let Some(percent) = self.humidity {
            changes.push(ReadingChange::Humidity(percent));
        }
        changes
    }
}

/// Nested status message shape: readings wrapped in an `env` object.
#[derive(Debug, Clone, Default, Deserialize)]
struct NestedStatus {
    #[serde(default)]
    env: Option<EnvReadings>,
}

/// Parses a raw status payload according to the configured shape.
///
/// # Errors
///
/// Returns [`ParseError::Json`] when the payload is not valid JSON of the
/// expected shape, and [`ParseError::MissingField`] when a nested payload
/// has no `env` object.
pub fn parse_status(payload: &[u8], schema: PayloadSchema) -> Result<EnvReadings, ParseError> {
    match schema {
        PayloadSchema::Nested => {
            let status: NestedStatus = serde_json::from_slice(payload)?;
            status
                .env
                .ok_or_else(|| ParseError::MissingField("env".to_string()))
        }
        PayloadSchema::Flat => Ok(serde_json::from_slice(payload)?),
    }
}
