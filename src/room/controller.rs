// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-room control logic.
//!
//! A [`RoomController`] owns one room's color, mode, and timers, and turns
//! external events (motion pulses, switch toggles, analog readings) into
//! device commands. Each controller is driven by one event at a time; the
//! registry wraps every controller in its own lock so unrelated rooms never
//! serialize on each other.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analog::AnalogFilter;
use crate::config::RoomConfig;
use crate::daylight::DaylightGate;
use crate::dispatch::{DEFAULT_FADE_MS, DeviceDispatcher};
use crate::error::ConfigError;
use crate::types::{Color, ColorMode};

use super::panic::PanicSequencer;

/// Analog idle window: a dial untouched for longer than this drops the mode
/// machine back to brightness.
pub const IDLE_WINDOW: Duration = Duration::from_secs(2);

/// Stateful controller for a single room.
///
/// Created once per configured room at process start and kept for the
/// process lifetime. All mutation goes through the operations below.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ledroom_lib::{DaylightGate, DeviceFamily, RoomConfig, RoomController};
///
/// # async fn example() -> ledroom_lib::Result<()> {
/// let gate = Arc::new(DaylightGate::new(51.1309, 17.10175)?);
/// let config = RoomConfig::new(
///     "bedroom",
///     DeviceFamily::Rgbw,
///     vec!["http://192.168.100.10".to_string()],
/// );
/// let mut room = RoomController::new(config, gate)?;
///
/// room.handle_motion_detected().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RoomController {
    config: RoomConfig,
    dispatcher: DeviceDispatcher,
    gate: Arc<DaylightGate>,
    panic: PanicSequencer,
    idle_window: Duration,

    color: Color,
    filter: AnalogFilter,
    mode: ColorMode,
    light_on: bool,
    enabled: bool,
    closet_brightness: u8,
    last_motion: Instant,
    last_analog: Instant,
}

impl RoomController {
    /// Creates a controller from a validated room configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is unusable (no
    /// endpoints, degenerate ADC bounds, malformed desired color). The
    /// caller is expected to log the error and exclude the room.
    pub fn new(config: RoomConfig, gate: Arc<DaylightGate>) -> Result<Self, ConfigError> {
        let color = config.validate()?;
        let dispatcher = DeviceDispatcher::new(
            config.family,
            config.endpoints.clone(),
            config.closet_endpoints.clone(),
        )
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let filter = AnalogFilter::new(config.min_adc, config.max_adc);
        let now = Instant::now();
        let closet_brightness = config.closet_brightness;

        Ok(Self {
            config,
            dispatcher,
            gate,
            panic: PanicSequencer::new(),
            idle_window: IDLE_WINDOW,
            color,
            filter,
            mode: ColorMode::Brightness,
            light_on: false,
            enabled: true,
            closet_brightness,
            last_motion: now,
            last_analog: now,
        })
    }

    /// Overrides the analog idle window.
    #[must_use]
    pub fn with_idle_window(mut self, window: Duration) -> Self {
        self.idle_window = window;
        self
    }

    /// Overrides the panic sequencer tuning.
    #[must_use]
    pub fn with_panic_sequencer(mut self, panic: PanicSequencer) -> Self {
        self.panic = panic;
        self
    }

    /// Returns the room configuration.
    #[must_use]
    pub const fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Returns the current color.
    #[must_use]
    pub const fn color(&self) -> &Color {
        &self.color
    }

    /// Returns the mode the analog dial currently drives.
    #[must_use]
    pub const fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Returns true if the light is on.
    #[must_use]
    pub const fn is_light_on(&self) -> bool {
        self.light_on
    }

    /// Returns true if the room reacts to events.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cached closet brightness byte.
    #[must_use]
    pub const fn closet_brightness(&self) -> u8 {
        self.closet_brightness
    }

    /// Handles a motion pulse from the room's detector.
    ///
    /// Ignored while the room is disabled or during daylight. Otherwise the
    /// motion timestamp is refreshed and the light is switched on if it was
    /// off.
    pub async fn handle_motion_detected(&mut self) {
        if !self.enabled {
            return;
        }
        if self.is_daylight().await {
            return;
        }
        self.last_motion = Instant::now();
        if self.light_on {
            return;
        }
        self.set_light(true).await;
    }

    /// Switches the room light on or off.
    ///
    /// Turning on pushes the current color (and, for closet rooms, the
    /// cached closet brightness); turning off pushes the all-zero color
    /// (and zero closet brightness).
    pub async fn set_light(&mut self, on: bool) {
        tracing::debug!(room = %self.config.name, on, "switching light");
        self.light_on = on;

        if on {
            self.dispatcher
                .dispatch_color(&self.color, DEFAULT_FADE_MS)
                .await;
            if self.config.family.has_closet() {
                self.dispatcher
                    .dispatch_closet_brightness(self.closet_brightness)
                    .await;
            }
        } else {
            self.dispatcher
                .dispatch_color(&Color::OFF, DEFAULT_FADE_MS)
                .await;
            if self.config.family.has_closet() {
                self.dispatcher.dispatch_closet_brightness(0).await;
            }
        }
    }

    /// Handles the physical switch toggling the room on or off.
    ///
    /// Disabling forces the light off. Enabling while the light is off
    /// advances the mode cycle by one step, refreshes the analog idle timer
    /// and the motion timestamp, runs the panic sequence when the cycle
    /// lands on [`ColorMode::Panic`] (the mode then restarts at
    /// brightness), and finally switches the light on.
    pub async fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;

        if !enabled {
            self.set_light(false).await;
            return;
        }

        if !self.light_on {
            self.mode = self.mode.next();
            self.last_analog = Instant::now();
            self.last_motion = Instant::now();
            tracing::debug!(room = %self.config.name, mode = %self.mode, "advanced dial mode");

            if self.mode == ColorMode::Panic {
                self.panic.run(&self.dispatcher).await;
                self.mode = ColorMode::Brightness;
            }
        }
        self.set_light(true).await;
    }

    /// Decides whether the room should auto-extinguish.
    ///
    /// False while disabled, while the light is off, or when the room has
    /// no motion detector installed. Otherwise true once the detection
    /// deadline has elapsed *and* it is daylight: a lit room rides out the
    /// night, and motion keeps pushing the deadline.
    pub async fn should_auto_off(&self) -> bool {
        if !self.enabled || !self.light_on || !self.config.motion_detector {
            return false;
        }
        let deadline = self.last_motion + self.config.detection_timeout();
        if Instant::now() < deadline {
            return false;
        }
        self.is_daylight().await
    }

    /// Switches the light off when [`Self::should_auto_off`] says so.
    pub async fn tick_auto_off(&mut self) {
        if self.should_auto_off().await {
            tracing::debug!(room = %self.config.name, "auto-off deadline reached");
            self.set_light(false).await;
        }
    }

    /// Applies an analog dial reading.
    ///
    /// With `ignore_threshold` unset, `raw` is an ADC reading that passes
    /// the debounce filter and is normalized by the configured bounds; a
    /// reading within the jitter threshold of the previous one is dropped
    /// without any state change. With it set, `raw` is already a unit value
    /// and skips the filter (callers that report percentages directly).
    ///
    /// The resolved mode decides which channel the value drives. A reading
    /// arriving after the idle window is applied to brightness, not to
    /// whatever mode was active before the pause. `override_mode` bypasses
    /// the mode machine entirely.
    pub async fn change_analog(
        &mut self,
        raw: f64,
        override_mode: Option<ColorMode>,
        ignore_threshold: bool,
    ) {
        let value = if ignore_threshold {
            raw.clamp(0.0, 1.0)
        } else {
            match self.filter.filter(raw) {
                Some(value) => value,
                None => return,
            }
        };

        if !self.enabled {
            return;
        }

        // Idle reset is evaluated against the previous activity timestamp,
        // then the mode is read, and only then is the timestamp refreshed.
        if self.last_analog.elapsed() > self.idle_window && self.mode != ColorMode::Brightness {
            tracing::debug!(room = %self.config.name, "dial idle, resetting mode to brightness");
            self.mode = ColorMode::Brightness;
        }
        let mode = override_mode.unwrap_or(self.mode);
        self.last_analog = Instant::now();

        // The dial never desaturates the color.
        self.color.set_saturation(1.0);

        tracing::debug!(room = %self.config.name, %mode, value, "applying analog value");
        match mode {
            ColorMode::Brightness => {
                self.color.set_value(value);
                self.dispatch_current_color().await;
            }
            ColorMode::Hue => {
                self.color.set_hue(value);
                self.dispatch_current_color().await;
            }
            ColorMode::White => {
                self.color.set_white(value);
                self.dispatch_current_color().await;
            }
            ColorMode::Closet => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let brightness = (value * 255.0) as u8;
                self.closet_brightness = brightness;
                self.dispatcher.dispatch_closet_brightness(brightness).await;
            }
            ColorMode::Panic => {
                self.panic.run(&self.dispatcher).await;
            }
        }
    }

    async fn dispatch_current_color(&self) {
        self.dispatcher
            .dispatch_color(&self.color, DEFAULT_FADE_MS)
            .await;
    }

    /// Resolves the daylight gate, mapping failure to "not daylight".
    ///
    /// Motion in an unlit room should still produce light, and auto-off
    /// must never extinguish on an unknown answer.
    async fn is_daylight(&self) -> bool {
        match self.gate.is_daylight_now().await {
            Ok(daylight) => daylight,
            Err(error) => {
                tracing::warn!(
                    room = %self.config.name,
                    %error,
                    "daylight lookup failed, assuming night"
                );
                false
            }
        }
    }
}
