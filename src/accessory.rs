// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory identity and capability types.
//!
//! These describe what the host framework exposes for a monitor: the
//! identity metadata shown for the accessory, and the list of sensor
//! services toggled by configuration. The information service is always
//! present; temperature and humidity are optional capabilities.

use crate::config::MonitorConfig;

/// Identity metadata reported to the accessory framework.
///
/// # Examples
///
/// ```
/// use alison_lib::accessory::AccessoryInfo;
/// use alison_lib::config::MonitorConfig;
///
/// let config = MonitorConfig::new("Bedroom", "mqtt://broker:1883").with_board_id("a1b2c3");
/// let info = AccessoryInfo::from_config(&config);
///
/// assert_eq!(info.manufacturer(), "Evening Indie");
/// assert_eq!(info.serial_number(), "a1b2c3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInfo {
    name: String,
    manufacturer: String,
    model: String,
    serial_number: String,
    firmware_revision: String,
}

impl AccessoryInfo {
    /// Builds the identity metadata from a monitor configuration.
    ///
    /// The board id doubles as the serial number. The firmware revision
    /// defaults to this crate's version when the config does not set one.
    #[must_use]
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            name: config.name.clone(),
            manufacturer: config.manufacturer.clone(),
            model: config.model.clone(),
            serial_number: config.board_id.clone(),
            firmware_revision: config
                .firmware_version
                .clone()
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    /// Returns the accessory display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the manufacturer string.
    #[must_use]
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Returns the model string.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the serial number (the board id).
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Returns the firmware revision.
    #[must_use]
    pub fn firmware_revision(&self) -> &str {
        &self.firmware_revision
    }
}

/// Sensor capabilities of a monitor.
///
/// Each flag toggles whether the corresponding sensor service is exposed to
/// the accessory framework. Readings for a disabled capability are still
/// tracked; they are simply not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Temperature sensor service exposed.
    pub temperature: bool,

    /// Humidity sensor service exposed.
    pub humidity: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            temperature: true,
            humidity: false,
        }
    }
}

impl Capabilities {
    /// Creates capabilities from the configuration flags.
    #[must_use]
    pub const fn from_flags(temperature: bool, humidity: bool) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Creates capabilities for a temperature-only monitor.
    #[must_use]
    pub const fn temperature_only() -> Self {
        Self {
            temperature: true,
            humidity: false,
        }
    }

    /// Creates capabilities for a combined temperature/humidity monitor.
    #[must_use]
    pub const fn environmental() -> Self {
        Self {
            temperature: true,
            humidity: true,
        }
    }

    /// Returns the services to register, information first.
    ///
    /// The information service is always included; sensor services follow
    /// their flags.
    #[must_use]
    pub fn services(&self) -> Vec<AccessoryService> {
        let mut services = vec![AccessoryService::Information];
        if self.temperature {
            services.push(AccessoryService::TemperatureSensor);
        }
        if self.humidity {
            services.push(AccessoryService::HumiditySensor);
        }
        services
    }
}

/// A service exposed to the accessory framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessoryService {
    /// Identity metadata. Always exposed.
    Information,

    /// Current temperature characteristic.
    TemperatureSensor,

    /// Current relative humidity characteristic.
    HumiditySensor,
}

impl std::fmt::Display for AccessoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Information => "information",
            Self::TemperatureSensor => "temperature sensor",
            Self::HumiditySensor => "humidity sensor",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_from_config_defaults() {
        let config = MonitorConfig::new("Bedroom", "mqtt://broker:1883");
        let info = AccessoryInfo::from_config(&config);

        assert_eq!(info.name(), "Bedroom");
        assert_eq!(info.manufacturer(), "Evening Indie");
        assert_eq!(info.model(), "Alison Room Monitor");
        assert_eq!(info.serial_number(), "unknown");
        assert_eq!(info.firmware_revision(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn info_firmware_override() {
        let config =
            MonitorConfig::new("Bedroom", "mqtt://broker:1883").with_firmware_version("2.4.1");
        let info = AccessoryInfo::from_config(&config);

        assert_eq!(info.firmware_revision(), "2.4.1");
    }

    #[test]
    fn default_capabilities() {
        let caps = Capabilities::default();
        assert!(caps.temperature);
        assert!(!caps.humidity);
    }

    #[test]
    fn services_always_include_information() {
        let caps = Capabilities::from_flags(false, false);
        assert_eq!(caps.services(), vec![AccessoryService::Information]);
    }

    #[test]
    fn services_follow_flags() {
        let caps = Capabilities::environmental();
        assert_eq!(
            caps.services(),
            vec![
                AccessoryService::Information,
                AccessoryService::TemperatureSensor,
                AccessoryService::HumiditySensor,
            ]
        );

        let caps = Capabilities::temperature_only();
        assert!(!caps.services().contains(&AccessoryService::HumiditySensor));
    }

    #[test]
    fn service_display() {
        assert_eq!(AccessoryService::TemperatureSensor.to_string(), "temperature sensor");
        assert_eq!(AccessoryService::Information.to_string(), "information");
    }
}
