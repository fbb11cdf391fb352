//! Camera systems: applying the one-time initial placement.

use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::camera::MainCamera;
use crate::tracker::TrackerContext;

/// Apply the placement computed on the first successful fetch, if any.
pub fn apply_initial_camera_view(
    mut ctx: ResMut<TrackerContext>,
    mut q_camera: Query<(&mut PanOrbitCamera, &mut Transform), With<MainCamera>>,
) {
    if ctx.pending_view.is_none() {
        return;
    }
    let Ok((mut poc, mut cam_transform)) = q_camera.single_mut() else {
        warn!("[CAMERA] main camera not found; initial view deferred");
        return;
    };
    let Some(placement) = ctx.pending_view.take() else {
        return;
    };

    let (radius, yaw, pitch) = placement.orbit_parameters();
    poc.focus = Vec3::ZERO;

    poc.target_radius = radius;
    poc.target_yaw = yaw;
    poc.target_pitch = pitch;

    // Jump straight there instead of easing in
    poc.radius = Some(radius);
    poc.yaw = Some(yaw);
    poc.pitch = Some(pitch);
    poc.force_update = true;

    cam_transform.translation = placement.destination;
    cam_transform.look_to(placement.direction, placement.up);

    info!(
        "[CAMERA] initial view at ({:.0}, {:.0}, {:.0}) km",
        placement.destination.x, placement.destination.y, placement.destination.z
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraPlacement, ViewConfig, compute_initial_view};
    use crate::core::coordinates::GeoPosition;

    fn app_with_camera() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<TrackerContext>();
        app.add_systems(Update, apply_initial_camera_view);
        let camera = app
            .world_mut()
            .spawn((PanOrbitCamera::default(), Transform::default(), MainCamera))
            .id();
        (app, camera)
    }

    #[test]
    fn test_pending_view_is_applied_once_and_consumed() {
        let (mut app, camera) = app_with_camera();
        let placement =
            compute_initial_view(&GeoPosition::new(0.0, 0.0, 500_000.0), &ViewConfig::default());
        app.world_mut().resource_mut::<TrackerContext>().pending_view = Some(placement);

        app.update();

        assert!(app.world().resource::<TrackerContext>().pending_view.is_none());
        let transform = app.world().get::<Transform>(camera).unwrap();
        assert!(transform.translation.distance(placement.destination) < 1e-2);
        let poc = app.world().get::<PanOrbitCamera>(camera).unwrap();
        assert_eq!(poc.radius, Some(placement.destination.length()));
        assert!(poc.force_update);
    }

    #[test]
    fn test_no_pending_view_leaves_camera_alone() {
        let (mut app, camera) = app_with_camera();
        app.update();
        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation, Vec3::ZERO);
    }

    #[test]
    fn test_missing_camera_keeps_view_pending() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<TrackerContext>();
        app.add_systems(Update, apply_initial_camera_view);
        app.world_mut().resource_mut::<TrackerContext>().pending_view =
            Some(CameraPlacement::looking_at_center(Vec3::new(0.0, 0.0, 100.0)));

        app.update();

        assert!(app.world().resource::<TrackerContext>().pending_view.is_some());
    }
}
