//! Tracker data types and resources.

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender},
};
use std::time::Duration;

use crate::camera::CameraPlacement;
use crate::core::coordinates::GeoPosition;

pub const WHERETHEISS_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544";

/// Assumed ISS altitude. The feeds' own altitude (if any) is ignored.
pub const DEFAULT_ALTITUDE_M: f64 = 500_000.0;

/// Position feed settings. The body may be flat (`{"latitude", "longitude"}`,
/// wheretheiss.at) or nested under `iss_position` (open-notify); the shape is
/// detected per response.
#[derive(Resource, Clone, Debug)]
pub struct TrackerConfig {
    pub endpoint: String,
    pub poll_interval: Duration,
    pub altitude_m: f64,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: WHERETHEISS_URL.to_string(),
            poll_interval: Duration::from_millis(5000),
            altitude_m: DEFAULT_ALTITUDE_M,
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("isstracker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Gates the one-time camera placement.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewState {
    has_initialized_camera: bool,
}

impl ViewState {
    pub fn has_initialized_camera(&self) -> bool {
        self.has_initialized_camera
    }

    /// Returns true exactly once, on the first call.
    pub fn claim_initial_view(&mut self) -> bool {
        if self.has_initialized_camera {
            return false;
        }
        self.has_initialized_camera = true;
        true
    }
}

/// Everything the poller, camera initializer, and popup share.
#[derive(Resource, Debug)]
pub struct TrackerContext {
    /// Last successfully fetched position (or the startup placeholder).
    pub position: GeoPosition,
    pub last_update: Option<DateTime<Utc>>,
    pub view: ViewState,
    /// Placement computed on the first success, waiting to be applied to the camera.
    pub pending_view: Option<CameraPlacement>,
    /// Set once any fetch has completed, successful or not.
    pub first_fetch_done: bool,
    /// Set when the fetch worker has exited; no further results will arrive.
    pub worker_stopped: bool,
}

impl Default for TrackerContext {
    fn default() -> Self {
        Self {
            position: GeoPosition::new(0.0, 0.0, DEFAULT_ALTITUDE_M),
            last_update: None,
            view: ViewState::default(),
            pending_view: None,
            first_fetch_done: false,
            worker_stopped: false,
        }
    }
}

/// Fires once immediately, then every `interval`.
#[derive(Resource, Debug)]
pub struct PollSchedule {
    timer: Timer,
    fired_initial: bool,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            timer: Timer::new(interval, TimerMode::Repeating),
            fired_initial: false,
        }
    }

    /// Advance by `delta`; returns how many fetches are due.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        let mut due = 0;
        if !self.fired_initial {
            self.fired_initial = true;
            due += 1;
        }
        self.timer.tick(delta);
        due + self.timer.times_finished_this_tick()
    }
}

/// Marker component for the tracked ISS entity.
#[derive(Component)]
pub struct TrackedObject;

/// Appearance of the tracked marker.
#[derive(Resource, Clone, Debug)]
pub struct MarkerConfig {
    pub name: String,
    /// Sphere radius in km. Large enough to stay clickable from 4 Earth radii out.
    pub radius_km: f32,
    pub color: Color,
    pub emissive_intensity: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            name: "ISS".to_string(),
            radius_km: 150.0,
            color: Color::srgb(1.0, 1.0, 0.0),
            emissive_intensity: 20.0,
        }
    }
}

#[derive(Resource)]
pub struct PositionChannels {
    pub cmd_tx: Sender<PositionCommand>,
    pub res_rx: Arc<Mutex<Receiver<PositionResult>>>,
}

#[derive(Debug)]
pub enum PositionCommand {
    Fetch { url: String, altitude_m: f64 },
}

#[derive(Debug)]
pub enum PositionResult {
    Position {
        position: GeoPosition,
        fetched_at: DateTime<Utc>,
    },
    Error {
        error: String,
    },
}
