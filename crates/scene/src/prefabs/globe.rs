use foundation::math::{GeoCoordinate, Vec3};

use crate::World;
use crate::components::{Drawable3D, Light, Material, Name, Transform};
use crate::entity::EntityId;

/// Parameters for assembling the globe scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeSceneParams {
    pub globe_radius: f64,
    pub globe_width_segments: u32,
    pub globe_height_segments: u32,
    pub marker: GeoCoordinate,
    pub marker_radius: f64,
    pub marker_segments: u32,
    pub marker_color: [f32; 4],
    pub star_count: u32,
    pub star_half_extent: f64,
    pub star_seed: u32,
    pub star_size: f32,
    pub ambient: Light,
    pub directional: Light,
}

impl Default for GlobeSceneParams {
    fn default() -> Self {
        Self {
            globe_radius: 100.0,
            globe_width_segments: 30,
            globe_height_segments: 30,
            marker: GeoCoordinate::new(35.6895, 139.6917),
            marker_radius: 2.0,
            marker_segments: 16,
            marker_color: [1.0, 0.0, 0.0, 1.0],
            star_count: 10_000,
            star_half_extent: 1000.0,
            star_seed: 1,
            star_size: 0.5,
            ambient: Light::ambient([1.0, 1.0, 1.0], 1.0),
            directional: Light::directional([1.0, 1.0, 1.0], 0.5, Vec3::new(1.0, 1.0, 1.0)),
        }
    }
}

/// Entities created by [`assemble_globe_scene`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeScene {
    pub stars: EntityId,
    pub ambient_light: EntityId,
    pub directional_light: EntityId,
    pub globe: EntityId,
    pub marker: EntityId,
    /// World-space marker center on the globe surface.
    pub marker_position: Vec3,
}

pub fn spawn_globe(world: &mut World, radius: f64, width_segments: u32, height_segments: u32) -> EntityId {
    let entity = world.spawn();
    world.set_name(entity, Name("globe"));
    world.set_transform(entity, Transform::identity());
    world.set_drawable_3d(
        entity,
        Drawable3D::sphere(
            radius,
            width_segments,
            height_segments,
            Material::Lit {
                color: [1.0, 1.0, 1.0, 1.0],
                textured: true,
            },
        ),
    );
    entity
}

/// Spawn a marker sphere centered on the globe surface at `coord`.
pub fn spawn_marker(
    world: &mut World,
    coord: GeoCoordinate,
    globe_radius: f64,
    marker_radius: f64,
    segments: u32,
    color: [f32; 4],
) -> EntityId {
    let entity = world.spawn();
    world.set_name(entity, Name("marker"));
    world.set_transform(entity, Transform::at(coord.to_vec3(globe_radius)));
    world.set_drawable_3d(
        entity,
        Drawable3D::sphere(marker_radius, segments, segments, Material::Unlit { color }),
    );
    entity
}

pub fn spawn_starfield(world: &mut World, count: u32, half_extent: f64, seed: u32, size: f32) -> EntityId {
    let entity = world.spawn();
    world.set_name(entity, Name("stars"));
    world.set_transform(entity, Transform::identity());
    world.set_drawable_3d(
        entity,
        Drawable3D::point_cloud(
            count,
            half_extent,
            seed,
            Material::Points {
                color: [1.0, 1.0, 1.0, 1.0],
                size,
            },
        ),
    );
    entity
}

pub fn spawn_light(world: &mut World, name: &'static str, light: Light) -> EntityId {
    let entity = world.spawn();
    world.set_name(entity, Name(name));
    world.set_light(entity, light);
    entity
}

/// Build the whole static scene once: stars, lights, globe, marker.
pub fn assemble_globe_scene(world: &mut World, params: &GlobeSceneParams) -> GlobeScene {
    let stars = spawn_starfield(
        world,
        params.star_count,
        params.star_half_extent,
        params.star_seed,
        params.star_size,
    );
    let ambient_light = spawn_light(world, "ambient-light", params.ambient);
    let directional_light = spawn_light(world, "directional-light", params.directional);
    let globe = spawn_globe(
        world,
        params.globe_radius,
        params.globe_width_segments,
        params.globe_height_segments,
    );
    let marker = spawn_marker(
        world,
        params.marker,
        params.globe_radius,
        params.marker_radius,
        params.marker_segments,
        params.marker_color,
    );

    GlobeScene {
        stars,
        ambient_light,
        directional_light,
        globe,
        marker,
        marker_position: params.marker.to_vec3(params.globe_radius),
    }
}
