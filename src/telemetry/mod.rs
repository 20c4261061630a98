// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsers for inbound monitor messages.
//!
//! Status messages are JSON in one of two shapes (see
//! [`PayloadSchema`](crate::config::PayloadSchema)); presence messages are
//! plain text.

mod presence;
mod status;

pub use presence::{Availability, PresenceReport};
pub use status::{EnvReadings, parse_status};
