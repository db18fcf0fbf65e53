// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best-effort concurrent command dispatch to physical device endpoints.
//!
//! A room usually drives more than one controller, and controllers fail in
//! uninteresting ways: unplugged, rebooting, mid-firmware-update. Commands
//! therefore fan out to every endpoint at once, each request racing its own
//! timeout, and a failing endpoint is logged and forgotten — it never delays
//! the others and never fails the operation that issued the command.

use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinSet;

use crate::config::DeviceFamily;
use crate::error::DispatchError;
use crate::types::Color;

/// Fade duration appended to ordinary light-switching commands.
pub const DEFAULT_FADE_MS: u64 = 300;

/// Per-request timeout for device commands.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Closet brightness at or below this is indistinguishable from off.
const CLOSET_NOISE_FLOOR: u8 = 2;

/// Sends color and closet commands to one room's device endpoints.
///
/// # Examples
///
/// ```no_run
/// use ledroom_lib::{Color, DeviceFamily, DeviceDispatcher, DEFAULT_FADE_MS};
///
/// # async fn example() -> Result<(), ledroom_lib::DispatchError> {
/// let dispatcher = DeviceDispatcher::new(
///     DeviceFamily::Rgbw,
///     vec!["http://192.168.100.10".to_string()],
///     Vec::new(),
/// )?;
/// dispatcher
///     .dispatch_color(&Color::new(0.0, 1.0, 1.0, 0.0), DEFAULT_FADE_MS)
///     .await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeviceDispatcher {
    client: Client,
    family: DeviceFamily,
    endpoints: Vec<String>,
    closet_endpoints: Vec<String>,
}

impl DeviceDispatcher {
    /// Creates a dispatcher for a room's endpoint sets.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        family: DeviceFamily,
        endpoints: Vec<String>,
        closet_endpoints: Vec<String>,
    ) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DispatchError::Http)?;

        Ok(Self {
            client,
            family,
            endpoints,
            closet_endpoints,
        })
    }

    /// Returns the main endpoint set.
    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Returns the auxiliary closet endpoint set.
    #[must_use]
    pub fn closet_endpoints(&self) -> &[String] {
        &self.closet_endpoints
    }

    /// Returns the device family the dispatcher encodes for.
    #[must_use]
    pub const fn family(&self) -> DeviceFamily {
        self.family
    }

    /// Pushes a color to every main endpoint concurrently.
    ///
    /// The command is `GET {endpoint}/s/{hex}` with `/colorFadeMs/{ms}`
    /// appended when `fade_ms` is nonzero. Completion is gated on the
    /// slowest endpoint, capped by the per-request timeout; failures are
    /// logged and absorbed.
    pub async fn dispatch_color(&self, color: &Color, fade_ms: u64) {
        let hex = self.family.encode(color);
        tracing::debug!(%color, %hex, fade_ms, "dispatching color command");

        let mut requests = JoinSet::new();
        for endpoint in &self.endpoints {
            let mut url = format!("{endpoint}/s/{hex}");
            if fade_ms > 0 {
                url.push_str(&format!("/colorFadeMs/{fade_ms}"));
            }
            let client = self.client.clone();
            requests.spawn(async move {
                if let Err(error) = send_get(&client, &url).await {
                    tracing::warn!(url = %url, %error, "color command failed");
                }
            });
        }
        while requests.join_next().await.is_some() {}
    }

    /// Pushes a brightness byte to every closet endpoint concurrently.
    ///
    /// The command is `POST {endpoint}/json/state` with an on/off flag
    /// (brightness above the noise floor) and the brightness as a string.
    /// Same best-effort semantics as [`Self::dispatch_color`].
    pub async fn dispatch_closet_brightness(&self, brightness: u8) {
        tracing::debug!(brightness, "dispatching closet brightness");

        let body = serde_json::json!({
            "on": brightness > CLOSET_NOISE_FLOOR,
            "bri": brightness.to_string(),
        });

        let mut requests = JoinSet::new();
        for endpoint in &self.closet_endpoints {
            let url = format!("{endpoint}/json/state");
            let client = self.client.clone();
            let body = body.clone();
            requests.spawn(async move {
                if let Err(error) = send_post(&client, &url, &body).await {
                    tracing::warn!(url = %url, %error, "closet command failed");
                }
            });
        }
        while requests.join_next().await.is_some() {}
    }
}

async fn send_get(client: &Client, url: &str) -> Result<(), DispatchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DispatchError::Status(status.as_u16()));
    }
    Ok(())
}

async fn send_post(
    client: &Client,
    url: &str,
    body: &serde_json::Value,
) -> Result<(), DispatchError> {
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DispatchError::Status(status.as_u16()));
    }
    Ok(())
}
