// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reading change representation.

use serde::{Deserialize, Serialize};

/// A change to one of the monitor's readings.
///
/// Changes are produced by parsing a status payload and applied to a
/// [`SensorReading`](super::SensorReading). A change that does not move the
/// stored value is dropped before notification.
///
/// # Examples
///
/// ```
/// use alison_lib::state::{ReadingChange, SensorReading};
///
/// let mut reading = SensorReading::new();
/// assert!(reading.apply(&ReadingChange::Temperature(21.5)));
/// assert!(!reading.apply(&ReadingChange::Temperature(21.5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReadingChange {
    /// Temperature changed, in degrees Celsius.
    Temperature(f32),

    /// Relative humidity changed, in percent.
    Humidity(f32),
}

impl ReadingChange {
    /// Creates a temperature change.
    #[must_use]
    pub const fn temperature(degrees: f32) -> Self {
        Self::Temperature(degrees)
    }

    /// Creates a humidity change.
    #[must_use]
    pub const fn humidity(percent: f32) -> Self {
        Self::Humidity(percent)
    }

    /// Returns the carried value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        match self {
            Self::Temperature(v) | Self::Humidity(v) => *v,
        }
    }
}

impl std::fmt::Display for ReadingChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature(v) => write!(f, "temperature {v}"),
            Self::Humidity(v) => write!(f, "humidity {v}"),
        }
    }
}
