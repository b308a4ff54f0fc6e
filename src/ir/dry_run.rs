// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dry-run transmitter.

use crate::error::TransmitError;

use super::{DaikinCommand, IrTransmitter};

/// Transmitter that only logs what it would send.
///
/// Useful when running the bridge without IR hardware attached.
#[derive(Debug, Clone, Default)]
pub struct LogTransmitter {
    count: u64,
}

impl LogTransmitter {
    /// Creates a new dry-run transmitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands "sent" so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl IrTransmitter for LogTransmitter {
    fn transmit(&mut self, command: &DaikinCommand) -> Result<(), TransmitError> {
        self.count += 1;
        tracing::info!(command = %command, count = self.count, "IR transmission (dry run)");
        Ok(())
    }
}
