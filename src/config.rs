// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room configuration types.
//!
//! A [`RoomConfig`] is read from the external configuration store at startup
//! and stays immutable for the lifetime of its room controller. Validation
//! happens once, at controller construction; a room that fails validation is
//! excluded instead of failing the process.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Color;

/// The device families a room can be wired with.
///
/// Each family fixes the wire encoding for color commands and whether the
/// room carries auxiliary closet devices. Adding a family means adding a
/// variant and its encoding choice here, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceFamily {
    /// RGBW controllers driven with the 10-digit hex command.
    Rgbw,
    /// Two-channel warm/cool controllers driven with the 8-digit hex command.
    Cct,
    /// RGBW main lights plus auxiliary brightness-only closet devices.
    RgbwCloset,
}

impl DeviceFamily {
    /// Encodes a color in this family's wire format.
    #[must_use]
    pub fn encode(self, color: &Color) -> String {
        match self {
            Self::Rgbw | Self::RgbwCloset => color.encode_rgbw(),
            Self::Cct => color.encode_cct(),
        }
    }

    /// Returns true if rooms of this family drive closet devices.
    #[must_use]
    pub const fn has_closet(self) -> bool {
        matches!(self, Self::RgbwCloset)
    }
}

/// Configuration for a single room, as stored in the external config store.
///
/// # Examples
///
/// ```
/// use ledroom_lib::{DeviceFamily, RoomConfig};
///
/// let config = RoomConfig::new(
///     "bedroom",
///     DeviceFamily::Rgbw,
///     vec!["http://192.168.100.10".to_string()],
/// )
/// .with_motion_detector(true)
/// .with_detection_timeout_secs(10 * 60);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// The room name, unique within its house.
    pub name: String,
    /// Base URLs of the room's main light controllers.
    pub endpoints: Vec<String>,
    /// Base URLs of the auxiliary closet devices (closet families only).
    #[serde(default)]
    pub closet_endpoints: Vec<String>,
    /// The device family the room is wired with.
    pub family: DeviceFamily,
    /// Seconds without motion before the room qualifies for auto-off.
    #[serde(default = "default_detection_timeout_secs")]
    pub detection_timeout_secs: u64,
    /// Raw ADC reading mapped to 0.0.
    #[serde(default)]
    pub min_adc: u16,
    /// Raw ADC reading mapped to 1.0.
    #[serde(default = "default_max_adc")]
    pub max_adc: u16,
    /// Whether a motion detector is installed in the room.
    #[serde(default)]
    pub motion_detector: bool,
    /// Closet brightness byte restored on light-on (closet families only).
    #[serde(default = "default_closet_brightness")]
    pub closet_brightness: u8,
    /// The color to restore when the room lights up, in `rrggbbww` hex.
    #[serde(default = "default_desired_color")]
    pub desired_color: String,
}

fn default_detection_timeout_secs() -> u64 {
    15 * 60
}

fn default_max_adc() -> u16 {
    u16::MAX
}

fn default_closet_brightness() -> u8 {
    255
}

fn default_desired_color() -> String {
    "ffffffff".to_string()
}

impl RoomConfig {
    /// Creates a room configuration with default tuning values.
    #[must_use]
    pub fn new(name: impl Into<String>, family: DeviceFamily, endpoints: Vec<String>) -> Self {
        Self {
            name: name.into(),
            endpoints,
            closet_endpoints: Vec::new(),
            family,
            detection_timeout_secs: default_detection_timeout_secs(),
            min_adc: 0,
            max_adc: default_max_adc(),
            motion_detector: false,
            closet_brightness: default_closet_brightness(),
            desired_color: default_desired_color(),
        }
    }

    /// Sets the auxiliary closet endpoints.
    #[must_use]
    pub fn with_closet_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.closet_endpoints = endpoints;
        self
    }

    /// Sets the ADC normalization bounds.
    #[must_use]
    pub fn with_adc_bounds(mut self, min: u16, max: u16) -> Self {
        self.min_adc = min;
        self.max_adc = max;
        self
    }

    /// Sets whether the room has a motion detector installed.
    #[must_use]
    pub fn with_motion_detector(mut self, installed: bool) -> Self {
        self.motion_detector = installed;
        self
    }

    /// Sets the no-motion timeout in seconds.
    #[must_use]
    pub fn with_detection_timeout_secs(mut self, seconds: u64) -> Self {
        self.detection_timeout_secs = seconds;
        self
    }

    /// Sets the restored closet brightness byte.
    #[must_use]
    pub fn with_closet_brightness(mut self, brightness: u8) -> Self {
        self.closet_brightness = brightness;
        self
    }

    /// Sets the color restored on light-on.
    #[must_use]
    pub fn with_desired_color(mut self, hex: impl Into<String>) -> Self {
        self.desired_color = hex.into();
        self
    }

    /// Validates the configuration and decodes the desired color.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the room has no endpoints, the ADC
    /// bounds do not span a range, or the desired color is malformed.
    pub fn validate(&self) -> Result<Color, ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if self.min_adc >= self.max_adc {
            return Err(ConfigError::InvalidAdcBounds {
                min: self.min_adc,
                max: self.max_adc,
            });
        }
        Ok(Color::decode(&self.desired_color)?)
    }

    /// Returns the no-motion timeout as a [`Duration`].
    #[must_use]
    pub const fn detection_timeout(&self) -> Duration {
        Duration::from_secs(self.detection_timeout_secs)
    }
}

/// One house worth of room configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseConfig {
    /// The house name.
    pub name: String,
    /// The rooms configured in this house.
    pub rooms: Vec<RoomConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColorError;

    fn base_config() -> RoomConfig {
        RoomConfig::new(
            "office",
            DeviceFamily::Rgbw,
            vec!["http://10.0.0.5".to_string()],
        )
    }

    #[test]
    fn valid_config_decodes_color() {
        let color = base_config().with_desired_color("ff000000").validate().unwrap();
        assert!((color.value() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_empty_endpoints() {
        let config = RoomConfig::new("office", DeviceFamily::Rgbw, Vec::new());
        assert_eq!(config.validate(), Err(ConfigError::NoEndpoints));
    }

    #[test]
    fn rejects_degenerate_adc_bounds() {
        let config = base_config().with_adc_bounds(500, 500);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidAdcBounds { min: 500, max: 500 })
        );

        let config = base_config().with_adc_bounds(600, 500);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAdcBounds { .. })
        ));
    }

    #[test]
    fn rejects_malformed_color() {
        let config = base_config().with_desired_color("nothex00");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Color(ColorError::Digit(_)))
        ));
    }

    #[test]
    fn family_picks_encoding() {
        let color = Color::new(0.0, 1.0, 1.0, 0.0);
        assert_eq!(DeviceFamily::Rgbw.encode(&color), "ff00000000");
        assert_eq!(DeviceFamily::RgbwCloset.encode(&color), "ff00000000");
        assert_eq!(DeviceFamily::Cct.encode(&color), "ff00ff00");
    }

    #[test]
    fn only_closet_family_has_closet() {
        assert!(DeviceFamily::RgbwCloset.has_closet());
        assert!(!DeviceFamily::Rgbw.has_closet());
        assert!(!DeviceFamily::Cct.has_closet());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "name": "hall",
            "endpoints": ["http://10.0.0.9"],
            "family": "cct"
        }"#;
        let config: RoomConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.family, DeviceFamily::Cct);
        assert_eq!(config.min_adc, 0);
        assert_eq!(config.max_adc, u16::MAX);
        assert_eq!(config.detection_timeout_secs, 900);
        assert!(!config.motion_detector);
        assert!(config.closet_endpoints.is_empty());
        assert_eq!(config.desired_color, "ffffffff");
    }

    #[test]
    fn detection_timeout_duration() {
        let config = base_config().with_detection_timeout_secs(90);
        assert_eq!(config.detection_timeout(), Duration::from_secs(90));
    }
}
