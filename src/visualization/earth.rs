use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use std::collections::HashMap;

use crate::core::coordinates::{
    WGS84_A_KM, WGS84_B_KM, bevy_world_to_ecef_km, ecef_km_to_geodetic,
};
use crate::visualization::basemap::generate_basemap;

/// Globe appearance.
#[derive(Resource, Clone, Debug)]
pub struct GlobeConfig {
    /// Icosphere subdivision level; each level quadruples the triangle count.
    pub subdivisions: u32,
    /// Equirectangular image under `assets/`. Replaces the generated basemap when set.
    pub texture: Option<String>,
    /// Size of the generated coastline basemap, in pixels.
    pub basemap_size: UVec2,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            subdivisions: 5,
            texture: None,
            basemap_size: UVec2::new(2048, 1024),
        }
    }
}

/// Plugin for Earth rendering and mesh generation
pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobeConfig>()
            .add_systems(Startup, spawn_globe);
    }
}

pub fn spawn_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    asset_server: Res<AssetServer>,
    config: Res<GlobeConfig>,
) {
    let mesh_handle = meshes.add(generate_ellipsoid(config.subdivisions));

    let texture = match &config.texture {
        Some(path) => asset_server.load(path.clone()),
        None => images.add(generate_basemap(
            config.basemap_size.x,
            config.basemap_size.y,
        )),
    };

    let material_handle = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(texture),
        perceptual_roughness: 1.0,
        ..default()
    });

    commands
        .spawn((
            Mesh3d(mesh_handle),
            MeshMaterial3d(material_handle),
            Transform::from_xyz(0.0, 0.0, 0.0),
            Visibility::Visible,
            Name::new("Earth"),
        ))
        .observe(|mut event: On<Pointer<Click>>| {
            if let Some(pos) = event.hit.position {
                let geo = ecef_km_to_geodetic(bevy_world_to_ecef_km(pos));
                info!("Globe click at {}", geo.format_lat_lon());
            }
            event.propagate(false);
        });
}

/// Icosphere scaled to the WGS84 ellipsoid (Bevy +Y is the polar axis).
pub fn generate_ellipsoid(subdivisions: u32) -> Mesh {
    let (unit_positions, mut indices) = icosphere(subdivisions);

    let a = WGS84_A_KM as f32;
    let b = WGS84_B_KM as f32;

    let mut positions = Vec::with_capacity(unit_positions.len());
    let mut normals = Vec::with_capacity(unit_positions.len());
    let mut uvs = Vec::with_capacity(unit_positions.len());

    for n in unit_positions {
        let p = Vec3::new(n.x * a, n.y * b, n.z * a);
        positions.push(p);
        // Surface normal of x²/a² + y²/b² + z²/a² = 1
        normals.push(Vec3::new(p.x / (a * a), p.y / (b * b), p.z / (a * a)).normalize());
        uvs.push(equirectangular_uv(n));
    }

    fix_texture_seams(&mut positions, &mut uvs, &mut normals, &mut indices);

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_indices(Indices::U32(indices));
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh
}

/// u from longitude (-180..180 -> 0..1), v from latitude (90..-90 -> 0..1).
fn equirectangular_uv(unit: Vec3) -> [f32; 2] {
    let lat = unit.y.clamp(-1.0, 1.0).asin();
    let lon = unit.x.atan2(unit.z);
    let u = lon / std::f32::consts::TAU + 0.5;
    let v = 0.5 - lat / std::f32::consts::PI;
    [u, v]
}

/// Unit icosphere: vertex positions and triangle indices.
fn icosphere(subdivisions: u32) -> (Vec<Vec3>, Vec<u32>) {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0; // Golden ratio
    let mut vertices = vec![
        Vec3::new(-1.0, phi, 0.0).normalize(),
        Vec3::new(1.0, phi, 0.0).normalize(),
        Vec3::new(-1.0, -phi, 0.0).normalize(),
        Vec3::new(1.0, -phi, 0.0).normalize(),
        Vec3::new(0.0, -1.0, phi).normalize(),
        Vec3::new(0.0, 1.0, phi).normalize(),
        Vec3::new(0.0, -1.0, -phi).normalize(),
        Vec3::new(0.0, 1.0, -phi).normalize(),
        Vec3::new(phi, 0.0, -1.0).normalize(),
        Vec3::new(phi, 0.0, 1.0).normalize(),
        Vec3::new(-phi, 0.0, -1.0).normalize(),
        Vec3::new(-phi, 0.0, 1.0).normalize(),
    ];

    let mut indices = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(indices.len() * 4);
        midpoints.clear();

        for tri in indices.chunks(3) {
            let (v1, v2, v3) = (tri[0], tri[1], tri[2]);
            let a = midpoint(&mut vertices, &mut midpoints, v1, v2);
            let b = midpoint(&mut vertices, &mut midpoints, v2, v3);
            let c = midpoint(&mut vertices, &mut midpoints, v3, v1);

            next.extend_from_slice(&[v1, a, c]);
            next.extend_from_slice(&[v2, b, a]);
            next.extend_from_slice(&[v3, c, b]);
            next.extend_from_slice(&[a, b, c]);
        }

        indices = next;
    }

    (vertices, indices)
}

fn midpoint(
    vertices: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    v1: u32,
    v2: u32,
) -> u32 {
    let key = if v1 < v2 { (v1, v2) } else { (v2, v1) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }

    let mid = ((vertices[v1 as usize] + vertices[v2 as usize]) / 2.0).normalize();
    vertices.push(mid);
    let index = vertices.len() as u32 - 1;
    cache.insert(key, index);
    index
}

/// Duplicate vertices of triangles that straddle the antimeridian so their
/// u coordinates don't wrap across the whole texture.
fn fix_texture_seams(
    vertices: &mut Vec<Vec3>,
    uvs: &mut Vec<[f32; 2]>,
    normals: &mut Vec<Vec3>,
    indices: &mut Vec<u32>,
) {
    let mut new_indices = Vec::with_capacity(indices.len());

    for tri in indices.chunks(3) {
        let us = [
            uvs[tri[0] as usize][0],
            uvs[tri[1] as usize][0],
            uvs[tri[2] as usize][0],
        ];
        let max_du = (us[0] - us[1])
            .abs()
            .max((us[0] - us[2]).abs())
            .max((us[1] - us[2]).abs());

        if max_du <= 0.5 {
            new_indices.extend_from_slice(tri);
            continue;
        }

        let mut fixed = [tri[0], tri[1], tri[2]];
        for (slot, &idx) in fixed.iter_mut().zip(tri) {
            let i = idx as usize;
            if uvs[i][0] < 0.25 {
                vertices.push(vertices[i]);
                normals.push(normals[i]);
                uvs.push([uvs[i][0] + 1.0, uvs[i][1]]);
                *slot = vertices.len() as u32 - 1;
            }
        }
        new_indices.extend_from_slice(&fixed);
    }

    *indices = new_indices;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinates::GeoPosition;

    #[test]
    fn test_icosphere_counts() {
        let (vertices, indices) = icosphere(0);
        assert_eq!(vertices.len(), 12);
        assert_eq!(indices.len(), 60);

        let (vertices, indices) = icosphere(2);
        // V = 10 * 4^n + 2
        assert_eq!(vertices.len(), 162);
        assert_eq!(indices.len(), 20 * 16 * 3);
    }

    #[test]
    fn test_ellipsoid_vertices_lie_on_wgs84_surface() {
        let mesh = generate_ellipsoid(2);
        let Some(positions) = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attr| attr.as_float3())
        else {
            panic!("mesh has no float3 positions");
        };
        let (a, b) = (WGS84_A_KM as f32, WGS84_B_KM as f32);
        for p in positions {
            let s = (p[0] / a).powi(2) + (p[1] / b).powi(2) + (p[2] / a).powi(2);
            assert!((s - 1.0).abs() < 1e-4, "{p:?} off surface ({s})");
        }
    }

    #[test]
    fn test_surface_point_is_on_mesh_ellipsoid() {
        // A geodetic surface point lands on the same ellipsoid the mesh uses
        let p = GeoPosition::new(45.0, 30.0, 0.0).to_world_km();
        let (a, b) = (WGS84_A_KM as f32, WGS84_B_KM as f32);
        let s = (p.x / a).powi(2) + (p.y / b).powi(2) + (p.z / a).powi(2);
        assert!((s - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_uv_mapping_matches_geography() {
        // lat 0, lon 0 is Bevy +Z -> texture center
        let [u, v] = equirectangular_uv(Vec3::Z);
        assert!((u - 0.5).abs() < 1e-6 && (v - 0.5).abs() < 1e-6);

        // North pole -> top row
        let [_, v] = equirectangular_uv(Vec3::Y);
        assert!(v.abs() < 1e-6);

        // lon +90 is Bevy +X -> three quarters across
        let [u, _] = equirectangular_uv(Vec3::X);
        assert!((u - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_seam_fix_duplicates_vertices_without_changing_triangles() {
        let (unit, _) = icosphere(3);
        let mesh = generate_ellipsoid(3);
        let vertex_count = mesh.count_vertices();
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("mesh has no u32 indices");
        };
        assert_eq!(indices.len(), 20 * 64 * 3);
        assert!(vertex_count > unit.len(), "seam vertices were not duplicated");
        assert!(indices.iter().all(|&i| (i as usize) < vertex_count));
    }

    #[test]
    fn test_globe_uses_generated_basemap_by_default() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()));
        app.init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>();
        app.insert_resource(GlobeConfig {
            subdivisions: 1,
            basemap_size: UVec2::new(64, 32),
            ..default()
        });
        app.add_systems(Startup, spawn_globe);
        app.update();

        let mut q_globe = app
            .world_mut()
            .query::<(&Name, &MeshMaterial3d<StandardMaterial>)>();
        let Ok((name, material)) = q_globe.single(app.world()) else {
            panic!("expected exactly one globe entity");
        };
        assert_eq!(name.as_str(), "Earth");

        let Some(texture) = app
            .world()
            .resource::<Assets<StandardMaterial>>()
            .get(&material.0)
            .and_then(|m| m.base_color_texture.clone())
        else {
            panic!("globe material has no texture");
        };
        let Some(image) = app.world().resource::<Assets<Image>>().get(&texture) else {
            panic!("basemap image was not added");
        };
        assert_eq!((image.width(), image.height()), (64, 32));
    }
}
