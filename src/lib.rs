// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ledroom` - per-room control of networked RGBW/CCT lighting.
//!
//! This library turns motion pulses, physical switch toggles, and rotary
//! dial readings into color commands for the light controllers wired into
//! each room of a house.
//!
//! # What it does
//!
//! - **Color model**: one normalized hue/saturation/value/white color per
//!   room, with the RGBW and CCT hex wire encodings the devices speak
//! - **Mode cycling**: switch-on events walk the dial through brightness,
//!   hue, white, closet brightness, and a panic flash sequence
//! - **Debounced dial input**: raw ADC readings are jitter-filtered and
//!   normalized before they drive the selected channel
//! - **Daylight gating**: motion only lights a room outside the cached
//!   sunrise/sunset window; idle rooms auto-extinguish in daylight
//! - **Best-effort fan-out**: commands go to all of a room's endpoints
//!   concurrently, and a dead device never blocks the rest
//!
//! The HTTP routing layer, the pub/sub bridge, and the configuration store
//! live outside this crate; they call into [`RoomManager`] with plain room
//! addresses.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ledroom_lib::{DaylightGate, DeviceFamily, HouseConfig, RoomConfig, RoomManager};
//!
//! #[tokio::main]
//! async fn main() -> ledroom_lib::Result<()> {
//!     // One shared daylight gate for the whole house
//!     let gate = Arc::new(DaylightGate::new(51.1309, 17.10175)?);
//!
//!     let houses = vec![HouseConfig {
//!         name: "home".to_string(),
//!         rooms: vec![
//!             RoomConfig::new(
//!                 "bedroom",
//!                 DeviceFamily::RgbwCloset,
//!                 vec!["http://192.168.100.10".to_string()],
//!             )
//!             .with_closet_endpoints(vec!["http://192.168.100.43".to_string()])
//!             .with_motion_detector(true)
//!             .with_detection_timeout_secs(15 * 60),
//!         ],
//!     }];
//!
//!     let manager = Arc::new(RoomManager::from_houses(gate, houses));
//!
//!     // Host-owned polling loop for motion auto-off
//!     tokio::spawn(Arc::clone(&manager).run_auto_off_loop());
//!
//!     // Events arrive from the HTTP / pub-sub layers:
//!     manager.handle_motion_detected("home", "bedroom").await?;
//!     manager.set_enabled("home", "bedroom", true).await?;
//!     manager.change_analog("home", "bedroom", 40000.0, None, false).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod analog;
pub mod config;
pub mod daylight;
pub mod dispatch;
pub mod error;
pub mod manager;
pub mod room;
pub mod types;

pub use analog::AnalogFilter;
pub use config::{DeviceFamily, HouseConfig, RoomConfig};
pub use daylight::{DaylightGate, DaylightWindow};
pub use dispatch::{DEFAULT_FADE_MS, DeviceDispatcher, REQUEST_TIMEOUT};
pub use error::{ColorError, ConfigError, DaylightError, DispatchError, Error, Result};
pub use manager::{AUTO_OFF_INTERVAL, RoomManager};
pub use room::{IDLE_WINDOW, PanicSequencer, RoomController};
pub use types::{Color, ColorMode};
