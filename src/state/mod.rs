// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor reading state.
//!
//! [`SensorReading`] holds the best-known temperature/humidity pair;
//! [`ReadingChange`] is the unit of change detection. Applying a change
//! reports whether the stored value actually moved, which is what gates
//! change notifications to the host framework.

mod change;
mod reading;

pub use change::ReadingChange;
pub use reading::SensorReading;
