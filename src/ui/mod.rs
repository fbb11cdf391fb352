//! User interface module
//!
//! Info popup for the tracked marker, hover cursor feedback, and the
//! startup loading overlay.

use bevy::prelude::*;

pub mod overlay;
pub mod popup;
pub mod state;

pub use state::{PopupConfig, PopupState};

/// Plugin for user interface management
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PopupConfig>()
            .init_resource::<PopupState>()
            .add_systems(
                Startup,
                (popup::spawn_popup, overlay::spawn_loading_overlay),
            )
            .add_systems(
                Update,
                (
                    popup::attach_tracked_object_observers,
                    (popup::tick_popup_timer, popup::sync_popup_nodes).chain(),
                    overlay::hide_loading_overlay,
                ),
            );
    }
}
