//! Core coordinate utilities
//!
//! Geodetic (WGS84) positions, their conversion to Earth-centered Earth-fixed
//! (ECEF) kilometers, and the remap from ECEF into Bevy world space.
//!
//! World units are kilometers. Bevy is Y-up, so the polar axis maps to +Y:
//! Bevy (x, y, z) = (ECEF.y, ECEF.z, ECEF.x).

use bevy::math::{DVec3, Vec3};

/// WGS84 semi-major axis (equatorial radius) in km.
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (polar radius) in km.
pub const WGS84_B_KM: f64 = WGS84_A_KM * (1.0 - WGS84_F);
/// First eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// A geographic position on or above the WGS84 ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl GeoPosition {
    pub const fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// ECEF position in kilometers.
    pub fn to_ecef_km(&self) -> DVec3 {
        geodetic_to_ecef_km(self.latitude_deg, self.longitude_deg, self.altitude_m)
    }

    /// Bevy world position in kilometers.
    pub fn to_world_km(&self) -> Vec3 {
        ecef_to_bevy_world_km(self.to_ecef_km())
    }

    /// Surface point diametrically opposite this one. Altitude is kept.
    pub fn antipode(&self) -> Self {
        Self {
            latitude_deg: -self.latitude_deg,
            longitude_deg: wrap_antipode_longitude(self.longitude_deg + 180.0),
            altitude_m: self.altitude_m,
        }
    }

    /// "Lat: 51.50°, Lon: -0.12°"
    pub fn format_lat_lon(&self) -> String {
        format!(
            "Lat: {:.2}°, Lon: {:.2}°",
            self.latitude_deg, self.longitude_deg
        )
    }
}

// Input is lon + 180 with lon in [-180, 180], so one wrap suffices.
fn wrap_antipode_longitude(lon: f64) -> f64 {
    if lon > 180.0 { lon - 360.0 } else { lon }
}

/// Geodetic (degrees, meters) -> ECEF (km) on the WGS84 ellipsoid.
pub fn geodetic_to_ecef_km(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> DVec3 {
    let lat = latitude_deg.to_radians();
    let lon = longitude_deg.to_radians();
    let h = altitude_m / 1000.0;

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    // Prime vertical radius of curvature
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    DVec3::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + h) * sin_lat,
    )
}

/// ECEF (km) -> geodetic (degrees, meters). Fixed-point iteration on latitude,
/// converges to sub-millimeter within a handful of steps for near-Earth points.
pub fn ecef_km_to_geodetic(ecef: DVec3) -> GeoPosition {
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let longitude = ecef.y.atan2(ecef.x);

    let mut lat = ecef.z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..8 {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (ecef.z + WGS84_E2 * n * sin_lat).atan2(p);
    }

    let (sin_lat, cos_lat) = lat.sin_cos();
    // Height form that stays well-conditioned at the poles
    let h_km = p * cos_lat + ecef.z * sin_lat
        - WGS84_A_KM * (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    GeoPosition {
        latitude_deg: lat.to_degrees(),
        longitude_deg: longitude.to_degrees(),
        altitude_m: h_km * 1000.0,
    }
}

/// Remap ECEF axes to Bevy world coordinates in kilometers.
/// Mapping: Bevy (x,y,z) = (ECEF.y, ECEF.z, ECEF.x)
pub fn ecef_to_bevy_world_km(ecef: DVec3) -> Vec3 {
    Vec3::new(ecef.y as f32, ecef.z as f32, ecef.x as f32)
}

/// Inverse of [`ecef_to_bevy_world_km`].
pub fn bevy_world_to_ecef_km(world: Vec3) -> DVec3 {
    DVec3::new(world.z as f64, world.x as f64, world.y as f64)
}

/// Largest radius of the ellipsoid, in world units.
pub fn ellipsoid_maximum_radius_km() -> f32 {
    WGS84_A_KM.max(WGS84_B_KM) as f32
}

// =================================== Tests ===================================
