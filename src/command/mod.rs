// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of inbound set commands.
//!
//! Commands arrive as JSON objects on the set topic:
//!
//! ```text
//! { "mode": "off"|"cool"|"heat"|"fan_only"|"auto",
//!   "temperature": 18-30,
//!   "fan_mode": "low"|"medium"|"high"|"auto",
//!   "swing_mode": "on"|"off" }
//! ```
//!
//! All keys are optional. Decoding only checks structure; value
//! validation happens in [`AcState::apply`](crate::state::AcState::apply).

mod set_command;

pub use set_command::SetCommand;

use crate::error::DecodeError;
use crate::state::PendingUpdate;

/// Default maximum inbound payload size in bytes.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 256;

/// Decodes one inbound payload into a pending update.
///
/// # Errors
///
/// Returns `DecodeError::PayloadTooLarge` if the payload exceeds
/// `max_payload_size`, otherwise any error from [`SetCommand::parse`].
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::command::{decode_set_command, DEFAULT_MAX_PAYLOAD_SIZE};
///
/// let update = decode_set_command(br#"{"fan_mode":"low"}"#, DEFAULT_MAX_PAYLOAD_SIZE).unwrap();
/// assert!(update.fan_mode().is_some());
///
/// assert!(decode_set_command(b"{", DEFAULT_MAX_PAYLOAD_SIZE).is_err());
/// ```
pub fn decode_set_command(
    payload: &[u8],
    max_payload_size: usize,
) -> Result<PendingUpdate, DecodeError> {
    if payload.len() > max_payload_size {
        return Err(DecodeError::PayloadTooLarge {
            size: payload.len(),
            max: max_payload_size,
        });
    }
    SetCommand::parse(payload).map(|cmd| cmd.to_pending_update())
}
