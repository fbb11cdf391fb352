//! Camera module
//!
//! Computes the one-time initial viewpoint from the first tracked position
//! and applies it to the orbit camera.

use bevy::prelude::*;

pub mod placement;
pub mod systems;

pub use placement::{CameraPlacement, ViewConfig, ViewHeuristic, compute_initial_view};
pub use systems::apply_initial_camera_view;

/// Marker for the orbit camera that renders the globe.
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the initial camera placement
pub struct InitialViewPlugin;

impl Plugin for InitialViewPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewConfig>()
            .add_systems(
                Update,
                apply_initial_camera_view.after(crate::tracker::apply_position_results),
            );
    }
}
