// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the air conditioner state.
//!
//! Mode and fan speed keep unknown strings instead of rejecting them; the
//! temperature is a validated newtype.

mod fan_speed;
mod mode;
mod swing;
mod temperature;

pub use fan_speed::FanSpeed;
pub use mode::AcMode;
pub use swing::SwingMode;
pub use temperature::Temperature;
