// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of room controllers and the operations exposed to event sources.
//!
//! The HTTP routing layer and the pub/sub bridge both end up here: they
//! address a room by house and room name and invoke one operation. Every
//! controller sits behind its own lock, so two rooms never serialize on
//! each other, while two events for the same room apply strictly one at a
//! time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::config::{HouseConfig, RoomConfig};
use crate::daylight::DaylightGate;
use crate::error::{ConfigError, Error, Result};
use crate::room::RoomController;
use crate::types::ColorMode;

/// Cadence of the auto-off polling loop.
pub const AUTO_OFF_INTERVAL: Duration = Duration::from_secs(1);

/// Registry of all configured rooms, grouped by house.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ledroom_lib::{DaylightGate, DeviceFamily, HouseConfig, RoomConfig, RoomManager};
///
/// #[tokio::main]
/// async fn main() -> ledroom_lib::Result<()> {
///     let gate = Arc::new(DaylightGate::new(51.1309, 17.10175)?);
///     let houses = vec![HouseConfig {
///         name: "home".to_string(),
///         rooms: vec![RoomConfig::new(
///             "bedroom",
///             DeviceFamily::Rgbw,
///             vec!["http://192.168.100.10".to_string()],
///         )
///         .with_motion_detector(true)],
///     }];
///
///     let manager = Arc::new(RoomManager::from_houses(gate, houses));
///     tokio::spawn(Arc::clone(&manager).run_auto_off_loop());
///
///     manager.handle_motion_detected("home", "bedroom").await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RoomManager {
    houses: HashMap<String, HashMap<String, Arc<Mutex<RoomController>>>>,
    gate: Arc<DaylightGate>,
}

impl RoomManager {
    /// Creates an empty registry sharing the given daylight gate.
    #[must_use]
    pub fn new(gate: Arc<DaylightGate>) -> Self {
        Self {
            houses: HashMap::new(),
            gate,
        }
    }

    /// Builds a registry from the configuration store's house records.
    ///
    /// Rooms with invalid configurations are logged and excluded; the rest
    /// of the registry comes up normally.
    #[must_use]
    pub fn from_houses(gate: Arc<DaylightGate>, houses: Vec<HouseConfig>) -> Self {
        let mut manager = Self::new(gate);
        for house in houses {
            for room in house.rooms {
                let room_name = room.name.clone();
                if let Err(error) = manager.add_room(&house.name, room) {
                    tracing::error!(
                        house = %house.name,
                        room = %room_name,
                        %error,
                        "room excluded: invalid configuration"
                    );
                }
            }
        }
        manager
    }

    /// Adds a single room to a house.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the room configuration is invalid.
    pub fn add_room(&mut self, house: &str, config: RoomConfig) -> std::result::Result<(), ConfigError> {
        let controller = RoomController::new(config, Arc::clone(&self.gate))?;
        let name = controller.config().name.clone();
        self.houses
            .entry(house.to_string())
            .or_default()
            .insert(name, Arc::new(Mutex::new(controller)));
        Ok(())
    }

    /// Returns the shared daylight gate.
    #[must_use]
    pub fn gate(&self) -> &Arc<DaylightGate> {
        &self.gate
    }

    /// Returns the number of registered rooms across all houses.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.houses.values().map(HashMap::len).sum()
    }

    /// Looks up a room's controller handle.
    #[must_use]
    pub fn room(&self, house: &str, room: &str) -> Option<Arc<Mutex<RoomController>>> {
        self.houses.get(house)?.get(room).cloned()
    }

    fn room_or_err(&self, house: &str, room: &str) -> Result<Arc<Mutex<RoomController>>> {
        self.room(house, room).ok_or_else(|| Error::RoomNotFound {
            house: house.to_string(),
            room: room.to_string(),
        })
    }

    /// Routes a motion pulse to a room.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoomNotFound`] for unknown addresses. Device
    /// failures are absorbed by the dispatcher and never surface here.
    pub async fn handle_motion_detected(&self, house: &str, room: &str) -> Result<()> {
        let controller = self.room_or_err(house, room)?;
        controller.lock().await.handle_motion_detected().await;
        Ok(())
    }

    /// Routes a switch toggle to a room.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoomNotFound`] for unknown addresses.
    pub async fn set_enabled(&self, house: &str, room: &str, enabled: bool) -> Result<()> {
        let controller = self.room_or_err(house, room)?;
        controller.lock().await.set_enabled(enabled).await;
        Ok(())
    }

    /// Routes an analog dial reading to a room.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoomNotFound`] for unknown addresses.
    pub async fn change_analog(
        &self,
        house: &str,
        room: &str,
        raw: f64,
        override_mode: Option<ColorMode>,
        ignore_threshold: bool,
    ) -> Result<()> {
        let controller = self.room_or_err(house, room)?;
        controller
            .lock()
            .await
            .change_analog(raw, override_mode, ignore_threshold)
            .await;
        Ok(())
    }

    /// Runs one auto-off check over every room with a motion detector.
    pub async fn tick_auto_off(&self) {
        for rooms in self.houses.values() {
            for controller in rooms.values() {
                let mut controller = controller.lock().await;
                if controller.config().motion_detector {
                    controller.tick_auto_off().await;
                }
            }
        }
    }

    /// Polls the auto-off check once per second, forever.
    ///
    /// Spawn this once at startup:
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use ledroom_lib::{DaylightGate, RoomManager};
    /// # fn example(manager: Arc<RoomManager>) {
    /// tokio::spawn(Arc::clone(&manager).run_auto_off_loop());
    /// # }
    /// ```
    pub async fn run_auto_off_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(AUTO_OFF_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick_auto_off().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceFamily;

    fn gate() -> Arc<DaylightGate> {
        Arc::new(DaylightGate::new(51.0, 17.0).unwrap())
    }

    fn valid_room(name: &str) -> RoomConfig {
        RoomConfig::new(
            name,
            DeviceFamily::Rgbw,
            vec!["http://10.0.0.5".to_string()],
        )
    }

    #[test]
    fn from_houses_excludes_invalid_rooms() {
        let houses = vec![HouseConfig {
            name: "home".to_string(),
            rooms: vec![
                valid_room("bedroom"),
                RoomConfig::new("broken", DeviceFamily::Rgbw, Vec::new()),
                valid_room("kitchen").with_adc_bounds(7, 7),
            ],
        }];

        let manager = RoomManager::from_houses(gate(), houses);
        assert_eq!(manager.room_count(), 1);
        assert!(manager.room("home", "bedroom").is_some());
        assert!(manager.room("home", "broken").is_none());
        assert!(manager.room("home", "kitchen").is_none());
    }

    #[test]
    fn rooms_are_scoped_by_house() {
        let houses = vec![
            HouseConfig {
                name: "home".to_string(),
                rooms: vec![valid_room("bedroom")],
            },
            HouseConfig {
                name: "cabin".to_string(),
                rooms: vec![valid_room("bedroom")],
            },
        ];

        let manager = RoomManager::from_houses(gate(), houses);
        assert_eq!(manager.room_count(), 2);
        assert!(manager.room("home", "bedroom").is_some());
        assert!(manager.room("cabin", "bedroom").is_some());
        assert!(manager.room("cabin", "kitchen").is_none());
    }

    #[tokio::test]
    async fn unknown_room_is_an_error() {
        let manager = RoomManager::new(gate());
        let err = manager
            .handle_motion_detected("home", "attic")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RoomNotFound { .. }));
    }
}
