//! ISS position tracking
//!
//! Polls the position endpoint on a fixed cadence through a background
//! worker, moves the tracked marker, and queues the one-time camera placement.

use bevy::prelude::*;

pub mod fetcher;
pub mod systems;
pub mod types;

pub use systems::{apply_position_results, poll_position};
pub use types::{MarkerConfig, TrackedObject, TrackerConfig, TrackerContext};

/// Plugin for ISS position polling.
pub struct TrackerPlugin;

impl Plugin for TrackerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackerConfig>()
            .init_resource::<MarkerConfig>()
            .init_resource::<TrackerContext>()
            .add_systems(
                Startup,
                (systems::setup_position_worker, systems::spawn_tracked_object),
            )
            .add_systems(Update, (poll_position, apply_position_results).chain());
    }
}
