// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of the air conditioner state into Daikin infrared commands.
//!
//! # Architecture
//!
//! ```text
//!   AcState ──► DaikinTranslator ──► DaikinCommand ──► IrTransmitter
//!                (keeps encoder state)                  (fire-and-forget)
//! ```
//!
//! The waveform itself is produced by the [`IrTransmitter`] implementation;
//! this module only decides *what* to send.

mod daikin;
mod dry_run;
#[cfg(feature = "mqtt")]
mod tasmota;

pub use daikin::{DaikinCommand, DaikinFan, DaikinMode};
pub use dry_run::LogTransmitter;
#[cfg(feature = "mqtt")]
pub use tasmota::TasmotaIrHvac;

use crate::error::TransmitError;
use crate::state::AcState;

/// Something that can put a Daikin command on the air.
///
/// Infrared has no acknowledgement, so `Ok(())` only means the command was
/// handed off. Implementations must not retry.
pub trait IrTransmitter {
    /// Transmits one complete command.
    ///
    /// # Errors
    ///
    /// Returns `TransmitError` if the command could not be handed off.
    fn transmit(&mut self, command: &DaikinCommand) -> Result<(), TransmitError>;
}

impl<T: IrTransmitter + ?Sized> IrTransmitter for Box<T> {
    fn transmit(&mut self, command: &DaikinCommand) -> Result<(), TransmitError> {
        (**self).transmit(command)
    }
}

/// Maps [`AcState`] onto Daikin commands and sends them.
///
/// The translator owns the encoder state. It starts from
/// [`DaikinCommand::boot_priming`] and only overwrites the mode when the
/// requested mode has a device code, so switching to off keeps the last
/// real mode in the frame.
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::ir::{DaikinFan, DaikinMode, DaikinTranslator, LogTransmitter};
/// use hvac_ir_bridge::state::AcState;
/// use hvac_ir_bridge::types::{AcMode, FanSpeed};
///
/// let mut state = AcState::new();
/// state.set_mode(AcMode::Heat);
/// state.set_fan_speed(FanSpeed::Unrecognized("turbo".to_string()));
///
/// let mut translator = DaikinTranslator::new(LogTransmitter::new());
/// let sent = translator.send(&state).unwrap();
/// assert!(sent.power());
/// assert_eq!(sent.mode(), DaikinMode::Heat);
/// assert_eq!(sent.fan(), DaikinFan::Auto);
/// ```
#[derive(Debug)]
pub struct DaikinTranslator<I> {
    command: DaikinCommand,
    transmitter: I,
}

impl<I: IrTransmitter> DaikinTranslator<I> {
    /// Creates a translator primed with the boot command.
    #[must_use]
    pub fn new(transmitter: I) -> Self {
        Self {
            command: DaikinCommand::boot_priming(),
            transmitter,
        }
    }

    /// Updates the encoder state from `state` without transmitting.
    pub fn translate(&mut self, state: &AcState) -> &DaikinCommand {
        self.command.set_power(state.power());
        match DaikinMode::from_ac_mode(state.mode()) {
            Some(mode) => self.command.set_mode(mode),
            None => self.command.set_power(false),
        }
        self.command.set_temperature(state.temperature().value());
        self.command.set_fan(DaikinFan::from(state.fan_speed()));
        self.command.set_swing(state.swing(), state.swing());
        &self.command
    }

    /// Translates `state` and transmits exactly one command.
    ///
    /// # Errors
    ///
    /// Returns `TransmitError` if the transmitter refused the command.
    pub fn send(&mut self, state: &AcState) -> Result<&DaikinCommand, TransmitError> {
        self.translate(state);
        tracing::info!(
            power = self.command.power(),
            mode = %self.command.mode(),
            temperature = self.command.temperature(),
            fan = %self.command.fan(),
            swing = self.command.swing_vertical(),
            "Sending IR command to Daikin AC"
        );
        self.transmitter.transmit(&self.command)?;
        Ok(&self.command)
    }

    /// Current encoder state.
    #[must_use]
    pub fn command(&self) -> &DaikinCommand {
        &self.command
    }

    /// The underlying transmitter.
    #[must_use]
    pub fn transmitter(&self) -> &I {
        &self.transmitter
    }
}
