// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The color channel (or action) currently driven by the analog dial.

use std::fmt;

/// Which color channel the analog input currently drives.
///
/// The modes form a fixed cycle advanced by switch-on events:
/// `Brightness → Hue → White → Closet → Panic → Brightness`. `Panic` is
/// transient; reaching it runs the panic sequencer and the cycle restarts
/// at `Brightness`.
///
/// # Examples
///
/// ```
/// use ledroom_lib::ColorMode;
///
/// assert_eq!(ColorMode::default(), ColorMode::Brightness);
/// assert_eq!(ColorMode::Brightness.next(), ColorMode::Hue);
/// assert_eq!(ColorMode::Panic.next(), ColorMode::Brightness);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// The dial sets the overall brightness (value channel).
    #[default]
    Brightness,
    /// The dial sets the hue (warm/cool mix on CCT devices).
    Hue,
    /// The dial sets the white channel.
    White,
    /// The dial sets the auxiliary closet brightness.
    Closet,
    /// The dial triggers the panic flash sequence.
    Panic,
}

impl ColorMode {
    /// The full mode cycle in order.
    pub const SEQUENCE: [Self; 5] = [
        Self::Brightness,
        Self::Hue,
        Self::White,
        Self::Closet,
        Self::Panic,
    ];

    /// Returns the next mode in the cycle, wrapping after [`Self::Panic`].
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Brightness => Self::Hue,
            Self::Hue => Self::White,
            Self::White => Self::Closet,
            Self::Closet => Self::Panic,
            Self::Panic => Self::Brightness,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Brightness => "brightness",
            Self::Hue => "hue",
            Self::White => "white",
            Self::Closet => "closet",
            Self::Panic => "panic",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_mode_and_wraps() {
        let mut mode = ColorMode::Brightness;
        let mut visited = Vec::new();
        for _ in 0..ColorMode::SEQUENCE.len() {
            visited.push(mode);
            mode = mode.next();
        }
        assert_eq!(visited, ColorMode::SEQUENCE);
        assert_eq!(mode, ColorMode::Brightness);
    }

    #[test]
    fn default_is_brightness() {
        assert_eq!(ColorMode::default(), ColorMode::Brightness);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ColorMode::Closet).unwrap();
        assert_eq!(json, "\"closet\"");
        let mode: ColorMode = serde_json::from_str("\"brightness\"").unwrap();
        assert_eq!(mode, ColorMode::Brightness);
    }

    #[test]
    fn display_names() {
        assert_eq!(ColorMode::Panic.to_string(), "panic");
        assert_eq!(ColorMode::Hue.to_string(), "hue");
    }
}
