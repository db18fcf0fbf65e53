// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `ledroom` library.
//!
//! This module provides the error hierarchy for the library: color encoding
//! validation, room configuration, daylight provider lookups, and device
//! command dispatch.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A room configuration was invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The daylight provider could not be queried and no window was cached.
    #[error("daylight provider error: {0}")]
    Daylight(#[from] DaylightError),

    /// The addressed room is not registered.
    #[error("room not found: {house}/{room}")]
    RoomNotFound {
        /// The house the caller addressed.
        house: String,
        /// The room the caller addressed.
        room: String,
    },
}

/// Errors related to parsing a color wire encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The encoding does not have the expected number of hex digits.
    #[error("color encoding must be 8 hex digits, got {0}")]
    Length(usize),

    /// The encoding contains a character that is not a hex digit.
    #[error("invalid hex digits in color encoding: {0}")]
    Digit(String),
}

/// Errors detected while validating a room configuration.
///
/// These are fatal for the affected room at controller construction time.
/// The registry logs them once at startup and excludes the room instead of
/// failing the whole process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured desired color is not a valid wire encoding.
    #[error("invalid desired color: {0}")]
    Color(#[from] ColorError),

    /// The ADC bounds do not span a usable range.
    #[error("ADC lower bound {min} must be below upper bound {max}")]
    InvalidAdcBounds {
        /// The configured lower bound.
        min: u16,
        /// The configured upper bound.
        max: u16,
    },

    /// The room lists no device endpoints.
    #[error("room has no device endpoints")]
    NoEndpoints,

    /// The HTTP client for the room's dispatcher could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from the daylight-window provider.
///
/// Distinguishable from "it is night": a failed lookup must never silently
/// default to either daylight or darkness, because both auto-on and auto-off
/// depend on the answer.
#[derive(Debug, Error)]
pub enum DaylightError {
    /// The provider request failed.
    #[error("daylight provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider response could not be interpreted.
    #[error("malformed daylight provider response: {0}")]
    Parse(String),
}

/// Errors from a single device command request.
///
/// The dispatcher logs these per endpoint and otherwise absorbs them; they
/// never propagate to the operation that triggered the command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request failed to connect, send, or complete within the timeout.
    #[error("device request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered with a non-success status code.
    #[error("device answered HTTP {0}")]
    Status(u16),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_error_display() {
        let err = ColorError::Length(6);
        assert_eq!(err.to_string(), "color encoding must be 8 hex digits, got 6");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidAdcBounds { min: 100, max: 100 };
        assert_eq!(
            err.to_string(),
            "ADC lower bound 100 must be below upper bound 100"
        );
    }

    #[test]
    fn config_error_from_color_error() {
        let err: ConfigError = ColorError::Length(0).into();
        assert!(matches!(err, ConfigError::Color(ColorError::Length(0))));
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::NoEndpoints.into();
        assert!(matches!(err, Error::Config(ConfigError::NoEndpoints)));
    }

    #[test]
    fn room_not_found_display() {
        let err = Error::RoomNotFound {
            house: "home".to_string(),
            room: "attic".to_string(),
        };
        assert_eq!(err.to_string(), "room not found: home/attic");
    }

    #[test]
    fn dispatch_error_display() {
        let err = DispatchError::Status(503);
        assert_eq!(err.to_string(), "device answered HTTP 503");
    }
}
