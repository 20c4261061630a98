// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presence message handling.
//!
//! Boards with a presence topic publish plain text there when their broker
//! connection comes and goes. The text is diagnostic: it is logged, stored
//! as the last report, and never touches the sensor readings.

use chrono::{DateTime, Utc};

/// Connection state announced on the presence topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The board reported itself connected.
    Online,

    /// The board reported itself disconnected.
    Offline,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// The last message observed on the presence topic.
///
/// # Examples
///
/// ```
/// use alison_lib::telemetry::{Availability, PresenceReport};
///
/// let report = PresenceReport::new("Online");
/// assert_eq!(report.availability(), Some(Availability::Online));
///
/// let report = PresenceReport::new("rebooting after OTA");
/// assert_eq!(report.availability(), None);
/// assert_eq!(report.raw(), "rebooting after OTA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceReport {
    raw: String,
    received_at: DateTime<Utc>,
}

impl PresenceReport {
    /// Creates a report from the raw message text, stamped with the
    /// current time.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            received_at: Utc::now(),
        }
    }

    /// Returns the raw message text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns when the report was received.
    #[must_use]
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Parses the text as an availability announcement.
    ///
    /// `Online`/`Offline` are recognized case-insensitively; any other text
    /// is opaque and returns `None`.
    #[must_use]
    pub fn availability(&self) -> Option<Availability> {
        if self.raw.eq_ignore_ascii_case("online") {
            Some(Availability::Online)
        } else if self.raw.eq_ignore_ascii_case("offline") {
            Some(Availability::Offline)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_is_recognized() {
        assert_eq!(
            PresenceReport::new("Online").availability(),
            Some(Availability::Online)
        );
        assert_eq!(
            PresenceReport::new("online").availability(),
            Some(Availability::Online)
        );
    }

    #[test]
    fn offline_is_recognized() {
        assert_eq!(
            PresenceReport::new("OFFLINE").availability(),
            Some(Availability::Offline)
        );
    }

    #[test]
    fn other_text_is_opaque() {
        let report = PresenceReport::new("rebooting after OTA");
        assert_eq!(report.availability(), None);
        assert_eq!(report.raw(), "rebooting after OTA");
    }

    #[test]
    fn availability_display() {
        assert_eq!(Availability::Online.to_string(), "online");
        assert_eq!(Availability::Offline.to_string(), "offline");
    }
}
