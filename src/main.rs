use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::GlobalAmbientLight;
use bevy::light::SunDisk;
use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_feathers::FeathersPlugins;
use bevy_feathers::dark_theme::create_dark_theme;
use bevy_feathers::palette;
use bevy_feathers::theme::UiTheme;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod camera;
mod core;
mod tracker;
mod ui;
mod visualization;

use camera::{InitialViewPlugin, MainCamera};
use tracker::TrackerPlugin;
use ui::UiPlugin;
use visualization::EarthPlugin;

// Setup scene and camera
pub fn setup(mut commands: Commands) {
    // Keep the night side of the globe readable
    commands.insert_resource(GlobalAmbientLight {
        brightness: 150.0,
        ..default()
    });

    // World units are kilometers; ~4x Earth's radius until the first fix arrives
    let initial_distance = 25_000.0;

    let pan_orbit = PanOrbitCamera {
        focus: Vec3::ZERO,
        radius: Some(initial_distance),
        yaw: Some(0.0),
        pitch: Some(0.0),
        force_update: true,
        ..default()
    };

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 1.0,
            far: 250_000.0,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        pan_orbit,
        MainCamera,
        Tonemapping::TonyMcMapface,
        Transform::from_xyz(0.0, 0.0, initial_distance).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let sun_distance = 150_000.0;
    let sun_direction = Vec3::new(0.3, 0.2, 1.0).normalize();

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        SunDisk::EARTH,
        Transform::from_translation(sun_direction * sun_distance).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Sun"),
    ));
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "ISS Tracker".to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    // Feathers initializes `UiTheme` but does not populate it by default.
    let mut theme = UiTheme(create_dark_theme());
    theme.set_color("feathers.text.main", palette::LIGHT_GRAY_1);
    theme.set_color("feathers.text.dim", palette::LIGHT_GRAY_2);
    theme.set_color("feathers.focus", palette::ACCENT);
    theme.set_color("feathers.button.bg", Color::srgba(0.06, 0.12, 0.16, 0.9));
    theme.set_color(
        "feathers.button.bg.hover",
        Color::srgba(0.08, 0.2, 0.26, 0.95),
    );
    theme.set_color("feathers.button.txt", Color::srgba(0.6, 1.0, 1.0, 1.0));
    app.insert_resource(theme);

    app.add_plugins(FeathersPlugins);
    app.add_plugins(PanOrbitCameraPlugin);
    app.add_plugins(MeshPickingPlugin);

    app.add_plugins(EarthPlugin);
    app.add_plugins(TrackerPlugin);
    app.add_plugins(InitialViewPlugin);
    app.add_plugins(UiPlugin);
    app.add_systems(Startup, setup);

    app.run();
}
