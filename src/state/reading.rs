// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracked sensor readings.

use serde::{Deserialize, Serialize};

use super::ReadingChange;

/// The best-known temperature/humidity pair for a monitor.
///
/// Both fields start at `0.0` and are replaced as status messages arrive.
/// A field never resets once written: a status message that omits a
/// measurement leaves the stored value alone.
///
/// # Examples
///
/// ```
/// use alison_lib::state::{ReadingChange, SensorReading};
///
/// let mut reading = SensorReading::new();
/// assert_eq!(reading.temperature(), 0.0);
///
/// reading.apply(&ReadingChange::Temperature(21.5));
/// assert_eq!(reading.temperature(), 21.5);
/// assert_eq!(reading.humidity(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Temperature in degrees Celsius.
    temperature: f32,
    /// Relative humidity in percent.
    humidity: f32,
}

impl SensorReading {
    /// Creates a new reading pair at `(0.0, 0.0)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored temperature in degrees Celsius.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Returns the stored relative humidity in percent.
    #[must_use]
    pub fn humidity(&self) -> f32 {
        self.humidity
    }

    /// Applies a change and returns whether the stored value moved.
    ///
    /// Comparison is direct inequality with no tolerance: every distinct
    /// incoming value counts as a change, a repeated value never does.
    // Exact comparison: a repeated value must not re-notify.
    #[allow(clippy::float_cmp)]
    pub fn apply(&mut self, change: &ReadingChange) -> bool {
        match change {
            ReadingChange::Temperature(degrees) => {
                if self.temperature == *degrees {
                    false
                } else {
                    self.temperature = *degrees;
                    true
                }
            }
            ReadingChange::Humidity(percent) => {
                if self.humidity == *percent {
                    false
                } else {
                    self.humidity = *percent;
                    true
                }
            }
        }
    }
}
