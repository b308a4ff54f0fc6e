// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air conditioner state management types.
//!
//! [`AcState`] holds the single current state, [`PendingUpdate`] carries the
//! fields requested by one inbound command, and [`StatePayload`] is what
//! gets published back.
//!
//! # Examples
//!
//! ```
//! use hvac_ir_bridge::state::{AcState, PendingUpdate};
//! use hvac_ir_bridge::types::AcMode;
//!
//! let mut state = AcState::new();
//!
//! // Apply returns true if state actually changed
//! let update = PendingUpdate::new().with_mode(AcMode::Cool);
//! assert!(state.apply(&update));
//!
//! // Applying same update again returns false
//! assert!(!state.apply(&update));
//! ```

mod ac_state;
mod pending_update;
mod state_payload;

pub use ac_state::AcState;
pub use pending_update::PendingUpdate;
pub use state_payload::StatePayload;
