// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The panic flash animation.

use std::time::Duration;

use crate::dispatch::DeviceDispatcher;
use crate::types::Color;

/// A fixed, non-interruptible flashing animation for the alarm mode.
///
/// Alternates the room between off and two fully-saturated warning colors
/// with zero fade, a fixed number of times. The sequence is awaited inline
/// by whatever triggered it; once started it runs to completion.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ledroom_lib::PanicSequencer;
///
/// // Defaults: 50 iterations, 50 ms between flashes
/// let sequencer = PanicSequencer::new();
///
/// // Shortened, e.g. for a demo installation
/// let quick = PanicSequencer::new()
///     .with_iterations(5)
///     .with_pause(Duration::from_millis(20));
/// ```
#[derive(Debug, Clone)]
pub struct PanicSequencer {
    iterations: u32,
    pause: Duration,
}

impl PanicSequencer {
    /// Default number of flash cycles.
    pub const ITERATIONS: u32 = 50;

    /// Default pause between color transitions.
    pub const PAUSE: Duration = Duration::from_millis(50);

    /// Creates a sequencer with the default cycle count and pause.
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: Self::ITERATIONS,
            pause: Self::PAUSE,
        }
    }

    /// Sets the number of flash cycles.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the pause between color transitions.
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Runs the full animation against the room's main endpoints.
    pub async fn run(&self, dispatcher: &DeviceDispatcher) {
        let red = Color::new(0.0, 1.0, 1.0, 0.0);
        let blue = Color::new(2.0 / 3.0, 1.0, 1.0, 0.0);

        tracing::warn!(iterations = self.iterations, "running panic flash sequence");

        for _ in 0..self.iterations {
            for color in [&Color::OFF, &red, &Color::OFF, &blue] {
                dispatcher.dispatch_color(color, 0).await;
                tokio::time::sleep(self.pause).await;
            }
        }
    }
}

impl Default for PanicSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let sequencer = PanicSequencer::new();
        assert_eq!(sequencer.iterations, PanicSequencer::ITERATIONS);
        assert_eq!(sequencer.pause, PanicSequencer::PAUSE);
    }

    #[test]
    fn builder_overrides() {
        let sequencer = PanicSequencer::new()
            .with_iterations(3)
            .with_pause(Duration::from_millis(1));
        assert_eq!(sequencer.iterations, 3);
        assert_eq!(sequencer.pause, Duration::from_millis(1));
    }
}
