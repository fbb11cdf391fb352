//! ISS info popup: spawn, click handling, auto-hide, and sync to UI nodes.

use bevy::picking::Pickable;
use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_feathers::palette;

use crate::tracker::{TrackedObject, TrackerContext};
use crate::ui::state::{PopupConfig, PopupContent, PopupState};

#[derive(Component)]
pub struct PopupRoot;

#[derive(Component)]
pub struct PopupCoordinates;

#[derive(Component)]
pub struct PopupUpdated;

#[derive(Component)]
pub struct PopupCloseButton;

const POPUP_BG: Color = Color::srgba(0.04, 0.08, 0.12, 0.92);
const CLOSE_BG: Color = Color::srgba(0.08, 0.2, 0.26, 0.95);

pub fn spawn_popup(mut commands: Commands, config: Res<PopupConfig>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(20.0),
                right: Val::Px(20.0),
                width: Val::Px(360.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(14.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(POPUP_BG),
            Visibility::Hidden,
            PopupRoot,
            Name::new("ISS Popup"),
        ))
        .with_children(|popup| {
            popup
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|header| {
                    header.spawn((
                        Text::new(config.title.clone()),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(palette::ACCENT),
                    ));
                    header
                        .spawn((
                            Button,
                            Node {
                                padding: UiRect::axes(Val::Px(8.0), Val::Px(2.0)),
                                ..default()
                            },
                            BackgroundColor(CLOSE_BG),
                            PopupCloseButton,
                        ))
                        .with_child((
                            Text::new("×"),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(palette::LIGHT_GRAY_1),
                            Pickable::IGNORE,
                        ))
                        .observe(close_popup_on_click);
                });
            popup.spawn((
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(palette::LIGHT_GRAY_1),
                PopupCoordinates,
            ));
            popup.spawn((
                Text::new(""),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(palette::LIGHT_GRAY_2),
                PopupUpdated,
            ));
            popup.spawn((
                Text::new(config.description.clone()),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(palette::LIGHT_GRAY_2),
            ));
        });
}

/// Hook click and hover handlers onto the tracked marker once it exists.
pub fn attach_tracked_object_observers(
    mut commands: Commands,
    q_added: Query<Entity, Added<TrackedObject>>,
) {
    for entity in &q_added {
        commands
            .entity(entity)
            .observe(open_popup_on_click)
            .observe(show_pointer_cursor)
            .observe(restore_default_cursor);
    }
}

fn open_popup_on_click(
    mut click: On<Pointer<Click>>,
    ctx: Res<TrackerContext>,
    config: Res<PopupConfig>,
    mut popup: ResMut<PopupState>,
) {
    if click.button != PointerButton::Primary {
        return;
    }
    popup.open(PopupContent::from_context(&ctx), config.auto_hide);
    debug!("[POPUP] opened at {}", popup.content().coordinates);
    click.propagate(false);
}

fn close_popup_on_click(mut click: On<Pointer<Click>>, mut popup: ResMut<PopupState>) {
    popup.close();
    click.propagate(false);
}

fn show_pointer_cursor(
    _over: On<Pointer<Over>>,
    mut commands: Commands,
    q_window: Query<Entity, With<PrimaryWindow>>,
) {
    if let Ok(window) = q_window.single() {
        commands
            .entity(window)
            .insert(CursorIcon::from(SystemCursorIcon::Pointer));
    }
}

fn restore_default_cursor(
    _out: On<Pointer<Out>>,
    mut commands: Commands,
    q_window: Query<Entity, With<PrimaryWindow>>,
) {
    if let Ok(window) = q_window.single() {
        commands
            .entity(window)
            .insert(CursorIcon::from(SystemCursorIcon::Default));
    }
}

pub fn tick_popup_timer(time: Res<Time>, mut popup: ResMut<PopupState>) {
    if !popup.has_pending_dismiss() {
        return;
    }
    // Only flag a change when the popup actually hides
    if popup.bypass_change_detection().tick(time.delta()) {
        popup.set_changed();
        debug!("[POPUP] auto-hidden");
    }
}

pub fn sync_popup_nodes(
    popup: Res<PopupState>,
    mut q_root: Query<&mut Visibility, With<PopupRoot>>,
    mut q_coords: Query<&mut Text, (With<PopupCoordinates>, Without<PopupUpdated>)>,
    mut q_updated: Query<&mut Text, (With<PopupUpdated>, Without<PopupCoordinates>)>,
) {
    if !popup.is_changed() {
        return;
    }

    for mut visibility in q_root.iter_mut() {
        *visibility = if popup.is_visible() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    let content = popup.content();
    for mut text in q_coords.iter_mut() {
        text.0 = content.coordinates.clone();
    }
    for mut text in q_updated.iter_mut() {
        text.0 = content.updated.clone().unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinates::GeoPosition;
    use bevy::camera::NormalizedRenderTarget;
    use bevy::picking::backend::HitData;
    use bevy::picking::pointer::{Location, PointerId};
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn popup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(1000)));
        app.init_resource::<PopupConfig>();
        app.init_resource::<PopupState>();
        app.add_systems(Update, (tick_popup_timer, sync_popup_nodes).chain());
        app
    }

    fn spawn_nodes(app: &mut App) -> (Entity, Entity) {
        let root = app.world_mut().spawn((PopupRoot, Visibility::Hidden)).id();
        let coords = app
            .world_mut()
            .spawn((PopupCoordinates, Text::new("")))
            .id();
        (root, coords)
    }

    fn open(app: &mut App, coordinates: &str) {
        app.world_mut().resource_mut::<PopupState>().open(
            PopupContent {
                coordinates: coordinates.to_string(),
                updated: None,
            },
            Duration::from_millis(3000),
        );
    }

    #[test]
    fn test_open_shows_root_and_writes_coordinates() {
        let mut app = popup_app();
        let (root, coords) = spawn_nodes(&mut app);
        open(&mut app, "Lat: 51.50°, Lon: -0.12°");

        app.update();

        assert_eq!(
            app.world().get::<Visibility>(root),
            Some(&Visibility::Visible)
        );
        assert_eq!(
            app.world().get::<Text>(coords).map(|t| t.0.as_str()),
            Some("Lat: 51.50°, Lon: -0.12°")
        );
    }

    #[test]
    fn test_popup_hides_itself_after_idle_period() {
        let mut app = popup_app();
        let (root, _) = spawn_nodes(&mut app);
        open(&mut app, "Lat: 0.00°, Lon: 0.00°");

        app.update();
        app.update();
        assert!(app.world().resource::<PopupState>().is_visible());

        // Virtual time clamps each frame to 250 ms; 20 frames is well past 3 s
        for _ in 0..20 {
            app.update();
        }
        assert!(!app.world().resource::<PopupState>().is_visible());
        assert_eq!(
            app.world().get::<Visibility>(root),
            Some(&Visibility::Hidden)
        );
    }

    #[test]
    fn test_closed_popup_stays_hidden() {
        let mut app = popup_app();
        let (root, _) = spawn_nodes(&mut app);
        open(&mut app, "Lat: 0.00°, Lon: 0.00°");
        app.update();

        app.world_mut().resource_mut::<PopupState>().close();
        for _ in 0..6 {
            app.update();
        }
        assert_eq!(
            app.world().get::<Visibility>(root),
            Some(&Visibility::Hidden)
        );
        assert!(!app.world().resource::<PopupState>().has_pending_dismiss());
    }

    fn location() -> Location {
        Location {
            target: NormalizedRenderTarget::None {
                width: 800,
                height: 600,
            },
            position: Vec2::new(400.0, 300.0),
        }
    }

    fn hit() -> HitData {
        HitData::new(Entity::PLACEHOLDER, 0.0, None, None)
    }

    fn click(app: &mut App, entity: Entity, button: PointerButton) {
        let event = Click {
            button,
            hit: hit(),
            duration: Duration::from_millis(80),
        };
        app.world_mut()
            .trigger(Pointer::new(PointerId::Mouse, location(), event, entity));
        app.world_mut().flush();
    }

    /// Marker with observers attached, plus the resources the handlers read.
    fn interaction_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<TrackerContext>();
        app.init_resource::<PopupConfig>();
        app.init_resource::<PopupState>();
        app.add_systems(Update, attach_tracked_object_observers);
        let tracked = app.world_mut().spawn(TrackedObject).id();
        app.update();
        (app, tracked)
    }

    #[test]
    fn test_clicking_marker_opens_popup_with_latest_position() {
        let (mut app, tracked) = interaction_app();
        app.world_mut().resource_mut::<TrackerContext>().position =
            GeoPosition::new(10.0, 10.0, 500_000.0);
        click(&mut app, tracked, PointerButton::Primary);
        assert_eq!(
            app.world().resource::<PopupState>().content().coordinates,
            "Lat: 10.00°, Lon: 10.00°"
        );

        // A newer fix is picked up by the next click
        app.world_mut().resource_mut::<TrackerContext>().position =
            GeoPosition::new(51.5, -0.12, 500_000.0);
        click(&mut app, tracked, PointerButton::Primary);

        let popup = app.world().resource::<PopupState>();
        assert!(popup.is_visible());
        assert!(popup.has_pending_dismiss());
        assert_eq!(popup.content().coordinates, "Lat: 51.50°, Lon: -0.12°");
    }

    #[test]
    fn test_secondary_click_does_not_open_popup() {
        let (mut app, tracked) = interaction_app();
        click(&mut app, tracked, PointerButton::Secondary);
        click(&mut app, tracked, PointerButton::Middle);
        assert!(!app.world().resource::<PopupState>().is_visible());
    }

    #[test]
    fn test_close_button_hides_popup_and_cancels_timer() {
        let (mut app, tracked) = interaction_app();
        let close = app
            .world_mut()
            .spawn(PopupCloseButton)
            .observe(close_popup_on_click)
            .id();

        click(&mut app, tracked, PointerButton::Primary);
        assert!(app.world().resource::<PopupState>().is_visible());

        click(&mut app, close, PointerButton::Primary);
        let popup = app.world().resource::<PopupState>();
        assert!(!popup.is_visible());
        assert!(!popup.has_pending_dismiss());
    }

    #[test]
    fn test_hovering_marker_toggles_pointer_cursor() {
        let (mut app, tracked) = interaction_app();
        let window = app.world_mut().spawn(PrimaryWindow).id();

        let over = Over { hit: hit() };
        app.world_mut()
            .trigger(Pointer::new(PointerId::Mouse, location(), over, tracked));
        app.world_mut().flush();
        assert_eq!(
            app.world().get::<CursorIcon>(window),
            Some(&CursorIcon::from(SystemCursorIcon::Pointer))
        );

        let out = Out { hit: hit() };
        app.world_mut()
            .trigger(Pointer::new(PointerId::Mouse, location(), out, tracked));
        app.world_mut().flush();
        assert_eq!(
            app.world().get::<CursorIcon>(window),
            Some(&CursorIcon::from(SystemCursorIcon::Default))
        );
        // Hover never touches the popup
        assert!(!app.world().resource::<PopupState>().is_visible());
    }
}
