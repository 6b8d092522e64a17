//! Pointer-to-scene mapping for click picking.

use foundation::math::{Vec2, unproject};
use scene::World;
use scene::picking::{PickHit, PickOptions, pick_screen};
use scene::prefabs::GlobeScene;

use crate::camera::Camera;

/// Map a pointer position in CSS pixels to normalized device coordinates.
///
/// The viewport center maps to `(0, 0)`, the top-left corner to `(-1, 1)`
/// and the bottom-right corner to `(1, -1)`. Degenerate viewports yield
/// `None`.
pub fn pointer_to_ndc(x_px: f64, y_px: f64, width: f64, height: f64) -> Option<Vec2> {
    if !(width > 0.0 && height > 0.0) || !x_px.is_finite() || !y_px.is_finite() {
        return None;
    }
    Some(Vec2::new(x_px / width * 2.0 - 1.0, -(y_px / height) * 2.0 + 1.0))
}

/// Nearest pickable object under the pointer, if any.
pub fn handle_click(
    world: &World,
    camera: &Camera,
    x_px: f64,
    y_px: f64,
    width: f64,
    height: f64,
) -> Option<PickHit> {
    pick_screen(
        world,
        x_px,
        y_px,
        |x, y| camera.ray_through_ndc(pointer_to_ndc(x, y, width, height)?),
        PickOptions::default(),
    )
}

/// Log line for a pick: the entity name, plus the geographic location for
/// globe hits.
pub fn describe_hit(hit: &PickHit, scene: &GlobeScene) -> String {
    let name = hit.name.map(|n| n.as_str()).unwrap_or("unnamed");
    if hit.entity == scene.globe {
        if let Some((geo, _)) = unproject(hit.point) {
            return format!(
                "{name} {} at lat {:.4}, lon {:.4}",
                hit.entity, geo.lat_deg, geo.lon_deg
            );
        }
    }
    format!("{name} {} at distance {:.2}", hit.entity, hit.distance)
}
