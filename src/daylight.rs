// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Daylight gate with a per-day cached sunrise/sunset window.
//!
//! Motion-triggered lighting is suppressed during daylight, and auto-off
//! only fires during daylight. The gate answers "is it daylight right now"
//! from a window fetched lazily from a remote provider, at most once per
//! UTC calendar day, and shared by every room controller in the process.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, TimeDelta, Utc};
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::DaylightError;

/// Default daylight-times provider.
pub const DEFAULT_BASE_URL: &str = "https://api.sunrisesunset.io";

/// Default provider request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A sunrise/sunset window for one calendar day, normalized to UTC.
///
/// Serializable so a host can persist the last known window and seed a
/// fresh gate with [`DaylightGate::prime`] after a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaylightWindow {
    /// The UTC calendar date the window applies to.
    pub date: NaiveDate,
    /// Sunrise as a UTC time of day.
    pub sunrise_utc: NaiveTime,
    /// Sunset as a UTC time of day.
    pub sunset_utc: NaiveTime,
}

impl DaylightWindow {
    /// Returns true iff `time` lies strictly between sunrise and sunset.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.sunrise_utc < time && time < self.sunset_utc
    }
}

/// Shared daylight gate.
///
/// Safe to call from any number of rooms concurrently: the cached window is
/// swapped as a single `Copy` value, so readers never observe a torn write.
/// Concurrent callers crossing a date boundary may both refetch; the second
/// write is redundant but harmless.
///
/// # Examples
///
/// ```no_run
/// use ledroom_lib::DaylightGate;
///
/// # async fn example() -> Result<(), ledroom_lib::DaylightError> {
/// let gate = DaylightGate::new(51.1309, 17.10175)?;
/// if gate.is_daylight_now().await? {
///     // skip motion-triggered lighting
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DaylightGate {
    client: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    cache: RwLock<Option<DaylightWindow>>,
}

impl DaylightGate {
    /// Creates a gate for the given geographic coordinate.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DaylightError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(DaylightError::Http)?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            latitude,
            longitude,
            cache: RwLock::new(None),
        })
    }

    /// Overrides the provider base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Seeds the cache with a previously persisted window.
    pub fn prime(&self, window: DaylightWindow) {
        *self.cache.write() = Some(window);
    }

    /// Returns the currently cached window, if any.
    #[must_use]
    pub fn cached_window(&self) -> Option<DaylightWindow> {
        *self.cache.read()
    }

    /// Answers whether it is daylight at this instant.
    ///
    /// Refreshes the cached window when its date is not today's UTC date.
    /// A failed refresh falls back to the previous window with a warning;
    /// the error surfaces only when no window has ever been known, so the
    /// caller can pick its own fallback instead of a silent default.
    ///
    /// # Errors
    ///
    /// Returns [`DaylightError`] if the provider is unreachable or returns
    /// garbage and no earlier window is cached.
    pub async fn is_daylight_now(&self) -> Result<bool, DaylightError> {
        let today = Utc::now().date_naive();
        let cached = self.cached_window();

        let window = match cached {
            Some(window) if window.date == today => window,
            stale => match self.fetch_window().await {
                Ok(window) => {
                    tracing::debug!(
                        date = %window.date,
                        sunrise = %window.sunrise_utc,
                        sunset = %window.sunset_utc,
                        "refreshed daylight window"
                    );
                    *self.cache.write() = Some(window);
                    window
                }
                Err(error) => match stale {
                    Some(window) => {
                        tracing::warn!(
                            %error,
                            stale_date = %window.date,
                            "daylight refresh failed, using previous window"
                        );
                        window
                    }
                    None => return Err(error),
                },
            },
        };

        Ok(window.contains(Utc::now().time()))
    }

    async fn fetch_window(&self) -> Result<DaylightWindow, DaylightError> {
        let url = format!(
            "{}/json?lat={}&lng={}",
            self.base_url, self.latitude, self.longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(DaylightError::Http)?;

        let payload: ProviderResponse = response.json().await?;
        normalize_window(&payload.results)
    }
}

/// Provider response envelope.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    results: ProviderResults,
}

/// The fields of the provider response this gate consumes.
#[derive(Debug, Deserialize)]
struct ProviderResults {
    /// Sunrise as a local 12-hour clock time, e.g. `"7:15:30 AM"`.
    sunrise: String,
    /// Sunset as a local 12-hour clock time.
    sunset: String,
    /// The calendar date the times apply to, `YYYY-MM-DD`.
    date: String,
    /// Offset of the local times from UTC, in minutes.
    utc_offset: i64,
}

/// Normalizes the provider's local clock times into a UTC window.
fn normalize_window(results: &ProviderResults) -> Result<DaylightWindow, DaylightError> {
    let date = NaiveDate::parse_from_str(&results.date, "%Y-%m-%d")
        .map_err(|e| DaylightError::Parse(format!("date '{}': {e}", results.date)))?;
    let sunrise = parse_clock_time(&results.sunrise)?;
    let sunset = parse_clock_time(&results.sunset)?;

    let offset = TimeDelta::minutes(results.utc_offset);
    Ok(DaylightWindow {
        date,
        sunrise_utc: sunrise.overflowing_sub_signed(offset).0,
        sunset_utc: sunset.overflowing_sub_signed(offset).0,
    })
}

fn parse_clock_time(text: &str) -> Result<NaiveTime, DaylightError> {
    NaiveTime::parse_from_str(text, "%I:%M:%S %p")
        .map_err(|e| DaylightError::Parse(format!("time '{text}': {e}")))
}
