//! Startup "locating" overlay, removed once the first fetch completes or the
//! fetch worker exits.

use bevy::picking::Pickable;
use bevy::prelude::*;
use bevy_feathers::palette;

use crate::tracker::TrackerContext;

#[derive(Component)]
pub struct LoadingOverlay;

pub fn spawn_loading_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Pickable::IGNORE,
            LoadingOverlay,
            Name::new("Loading Overlay"),
        ))
        .with_child((
            Text::new("Locating ISS…"),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(palette::LIGHT_GRAY_1),
            Pickable::IGNORE,
        ));
}

pub fn hide_loading_overlay(
    mut commands: Commands,
    ctx: Res<TrackerContext>,
    q_overlay: Query<Entity, With<LoadingOverlay>>,
) {
    if !ctx.first_fetch_done && !ctx.worker_stopped {
        return;
    }
    for entity in &q_overlay {
        commands.entity(entity).despawn();
    }
}
