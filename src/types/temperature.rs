// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature type.

use std::fmt;

use crate::error::ValueError;

/// Target temperature in whole degrees Celsius (18-30).
///
/// # Examples
///
/// ```
/// use hvac_ir_bridge::types::Temperature;
///
/// let t = Temperature::new(22).unwrap();
/// assert_eq!(t.value(), 22);
///
/// assert!(Temperature::new(31).is_err());
/// assert_eq!(Temperature::default().value(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature(u8);

impl Temperature {
    /// Lowest accepted setpoint.
    pub const MIN: u8 = 18;

    /// Highest accepted setpoint.
    pub const MAX: u8 = 30;

    /// Setpoint at startup.
    pub const DEFAULT: Self = Self(25);

    /// Creates a new temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [18, 30].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(Self::out_of_range(f64::from(value)));
        }
        Ok(Self(value))
    }

    /// Validates a raw number from an inbound payload.
    ///
    /// JSON does not distinguish `22` from `22.0`, so any whole number is
    /// accepted; fractional values are not.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotInteger` for fractional or non-finite values
    /// and `ValueError::OutOfRange` for whole numbers outside [18, 30].
    pub fn from_request(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ValueError::NotInteger(value));
        }
        if value < f64::from(Self::MIN) || value > f64::from(Self::MAX) {
            return Err(Self::out_of_range(value));
        }
        // Safe: range checked above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let degrees = value as u8;
        Ok(Self(degrees))
    }

    /// Returns the temperature in degrees Celsius.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    fn out_of_range(actual: f64) -> ValueError {
        ValueError::OutOfRange {
            min: i64::from(Self::MIN),
            max: i64::from(Self::MAX),
            actual,
        }
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
