// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriptions for reading and presence notifications.
//!
//! The host framework registers callbacks here to be told when a
//! characteristic value changes. Dispatch happens synchronously after a
//! change is accepted, exactly once per distinct incoming value.

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
