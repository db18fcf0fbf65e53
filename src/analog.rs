// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debounced analog input pipeline.
//!
//! Rotary dials report through a noisy ADC; readings that barely differ from
//! the previous one are jitter, not intent. The filter discards them and
//! normalizes accepted readings onto the unit range used by every color
//! channel.

/// Debounce filter and normalizer for raw ADC readings.
///
/// # Examples
///
/// ```
/// use ledroom_lib::AnalogFilter;
///
/// let mut filter = AnalogFilter::new(0, u16::MAX);
/// // First reading clears the threshold against the initial zero
/// assert!(filter.filter(100.0).is_some());
/// // A wiggle below the threshold is jitter
/// assert!(filter.filter(110.0).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct AnalogFilter {
    prev_raw: f64,
    min_adc: f64,
    max_adc: f64,
}

impl AnalogFilter {
    /// Minimum raw delta for a reading to count as movement.
    pub const THRESHOLD: f64 = 20.0;

    /// Creates a filter for the given ADC bounds.
    ///
    /// The bounds must span a non-empty range; room configuration validation
    /// guarantees that before a filter is built.
    #[must_use]
    pub fn new(min_adc: u16, max_adc: u16) -> Self {
        Self {
            prev_raw: 0.0,
            min_adc: f64::from(min_adc),
            max_adc: f64::from(max_adc),
        }
    }

    /// Filters a raw reading.
    ///
    /// Returns `None` when the reading is within [`Self::THRESHOLD`] of the
    /// previous accepted one (no state change). Otherwise records the reading
    /// and returns it normalized onto `[0, 1]` by the configured bounds.
    pub fn filter(&mut self, raw: f64) -> Option<f64> {
        if (self.prev_raw - raw).abs() < Self::THRESHOLD {
            return None;
        }
        self.prev_raw = raw;

        let span = self.max_adc - self.min_adc;
        Some(((raw - self.min_adc) / span).clamp(0.0, 1.0))
    }

    /// Returns the last accepted raw reading.
    #[must_use]
    pub const fn prev_raw(&self) -> f64 {
        self.prev_raw
    }
}
