//! One-shot camera placement math.

use bevy::prelude::*;

use crate::core::coordinates::{GeoPosition, ellipsoid_maximum_radius_km};

/// How the initial viewpoint is chosen relative to the tracked object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewHeuristic {
    /// Above the surface point antipodal to the tracked object.
    #[default]
    Antipodal,
    /// Along the negated direction of the tracked object's world position.
    NegatedDirection,
}

#[derive(Resource, Clone, Debug)]
pub struct ViewConfig {
    pub heuristic: ViewHeuristic,
    /// Camera distance from the globe center, in multiples of the maximum radius.
    pub distance_factor: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            heuristic: ViewHeuristic::Antipodal,
            distance_factor: 4.0,
        }
    }
}

/// A "set view" command: where the camera sits and how it is oriented.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPlacement {
    pub destination: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
}

impl CameraPlacement {
    /// Camera at `destination` looking at the globe center.
    pub fn looking_at_center(destination: Vec3) -> Self {
        let direction = (-destination).normalize();
        Self {
            destination,
            direction,
            up: up_for(direction),
        }
    }

    /// Orbit parameters (radius, yaw, pitch) matching the PanOrbitCamera convention
    /// used by the main camera: yaw about +Y from +Z, pitch toward +Y.
    pub fn orbit_parameters(&self) -> (f32, f32, f32) {
        let radius = self.destination.length();
        let dir = self.destination / radius;
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        let yaw = dir.x.atan2(dir.z);
        (radius, yaw, pitch)
    }
}

/// World polar axis with the component along `direction` removed.
fn up_for(direction: Vec3) -> Vec3 {
    let up = Vec3::Y - direction * Vec3::Y.dot(direction);
    if up.length_squared() < 1e-8 {
        // Looking straight down a pole; any equatorial axis works.
        Vec3::Z
    } else {
        up.normalize()
    }
}

/// Initial viewpoint for a tracked object at `tracked`.
pub fn compute_initial_view(tracked: &GeoPosition, config: &ViewConfig) -> CameraPlacement {
    let distance = ellipsoid_maximum_radius_km() * config.distance_factor;
    let outward = match config.heuristic {
        ViewHeuristic::Antipodal => {
            let antipode = tracked.antipode();
            GeoPosition::new(antipode.latitude_deg, antipode.longitude_deg, 0.0)
                .to_world_km()
                .normalize()
        }
        ViewHeuristic::NegatedDirection => -tracked.to_world_km().normalize(),
    };
    CameraPlacement::looking_at_center(outward * distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn antipodal() -> ViewConfig {
        ViewConfig::default()
    }

    fn negated() -> ViewConfig {
        ViewConfig {
            heuristic: ViewHeuristic::NegatedDirection,
            ..default()
        }
    }

    #[test]
    fn test_antipodal_view_of_origin_sits_over_lon_180() {
        let tracked = GeoPosition::new(0.0, 0.0, 500_000.0);
        let view = compute_initial_view(&tracked, &antipodal());
        let r = ellipsoid_maximum_radius_km() * 4.0;

        // lon 180 on the equator is ECEF -X, which is Bevy -Z
        assert!((view.destination.z + r).abs() < 1e-2);
        assert!(view.destination.x.abs() < 1e-2);
        assert!(view.destination.y.abs() < 1e-2);
    }

    #[test]
    fn test_direction_points_at_center_and_is_unit() {
        let tracked = GeoPosition::new(51.5, -0.12, 500_000.0);
        for config in [antipodal(), negated()] {
            let view = compute_initial_view(&tracked, &config);
            assert!((view.direction.length() - 1.0).abs() < EPSILON);
            let to_center = (-view.destination).normalize();
            assert!(view.direction.dot(to_center) > 1.0 - EPSILON);
        }
    }

    #[test]
    fn test_up_is_orthogonal_to_direction() {
        for (lat, lon) in [(0.0, 0.0), (51.5, -0.12), (-70.0, 100.0), (90.0, 0.0)] {
            let view = compute_initial_view(&GeoPosition::new(lat, lon, 0.0), &antipodal());
            assert!((view.up.length() - 1.0).abs() < EPSILON);
            assert!(view.up.dot(view.direction).abs() < EPSILON, "lat {lat} lon {lon}");
        }
    }

    #[test]
    fn test_viewpoint_is_on_far_side_from_tracked_object() {
        let tracked = GeoPosition::new(30.0, 60.0, 500_000.0);
        let tracked_dir = tracked.to_world_km().normalize();
        for config in [antipodal(), negated()] {
            let view = compute_initial_view(&tracked, &config);
            assert!(view.destination.normalize().dot(tracked_dir) < -0.99);
        }
    }

    #[test]
    fn test_distance_factor_scales_destination() {
        let tracked = GeoPosition::new(10.0, 20.0, 0.0);
        let config = ViewConfig {
            distance_factor: 2.0,
            ..default()
        };
        let view = compute_initial_view(&tracked, &config);
        let expected = ellipsoid_maximum_radius_km() * 2.0;
        assert!((view.destination.length() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_orbit_parameters_for_axis_directions() {
        let (radius, yaw, pitch) =
            CameraPlacement::looking_at_center(Vec3::new(0.0, 0.0, 100.0)).orbit_parameters();
        assert!((radius - 100.0).abs() < EPSILON);
        assert!(yaw.abs() < EPSILON);
        assert!(pitch.abs() < EPSILON);

        let (_, yaw, _) =
            CameraPlacement::looking_at_center(Vec3::new(100.0, 0.0, 0.0)).orbit_parameters();
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < EPSILON);

        let (_, _, pitch) =
            CameraPlacement::looking_at_center(Vec3::new(0.0, 100.0, 0.0)).orbit_parameters();
        assert!((pitch - std::f32::consts::FRAC_PI_2).abs() < EPSILON);
    }
}
