//! Spherical orbit controls around a fixed target.
//!
//! Pointer drags and wheel steps only accumulate deltas; [`OrbitControls::update`]
//! applies them to the camera once per frame. With damping enabled each
//! frame applies `damping_factor` of the remaining delta, so motion eases
//! out over subsequent frames after the pointer stops.

use std::f64::consts::{PI, TAU};

use foundation::math::{Vec2, Vec3};

use crate::camera::Camera;
use crate::config::ControlsConfig;

/// Keeps the polar angle off the poles where the view basis degenerates.
const POLAR_EPS: f64 = 1e-6;

/// Base per-notch wheel zoom ratio; raised to `zoom_speed`.
const ZOOM_STEP: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragMode {
    #[default]
    None,
    Rotate,
    Pan,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub enable_pan: bool,
    pub min_distance: f64,
    pub max_distance: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_polar: f64,
    pub max_polar: f64,

    viewport_height: f64,
    drag: DragMode,
    last_pos_px: [f64; 2],

    pending_azimuth: f64,
    pending_polar: f64,
    pending_scale: f64,
    pending_pan_px: Vec2,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            enable_pan: config.enable_pan,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_polar: 0.0,
            max_polar: PI,
            viewport_height: 1.0,
            drag: DragMode::None,
            last_pos_px: [0.0, 0.0],
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_scale: 1.0,
            pending_pan_px: Vec2::new(0.0, 0.0),
        }
    }

    pub fn set_viewport_height(&mut self, height_px: f64) {
        self.viewport_height = height_px.max(1.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragMode::None
    }

    /// `button` follows `MouseEvent.button`: 0 left, 1 middle, 2 right.
    pub fn on_pointer_down(&mut self, pos_px: [f64; 2], button: i16) {
        self.drag = match button {
            0 => DragMode::Rotate,
            2 if self.enable_pan => DragMode::Pan,
            _ => DragMode::None,
        };
        self.last_pos_px = pos_px;
    }

    pub fn on_pointer_move(&mut self, pos_px: [f64; 2]) {
        let dx = pos_px[0] - self.last_pos_px[0];
        let dy = pos_px[1] - self.last_pos_px[1];
        self.last_pos_px = pos_px;

        match self.drag {
            DragMode::None => {}
            DragMode::Rotate => {
                // A drag across the full viewport height turns one full revolution.
                self.pending_azimuth -= TAU * dx / self.viewport_height * self.rotate_speed;
                self.pending_polar -= TAU * dy / self.viewport_height * self.rotate_speed;
            }
            DragMode::Pan => {
                self.pending_pan_px = Vec2::new(
                    self.pending_pan_px.x + dx,
                    self.pending_pan_px.y + dy,
                );
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        self.drag = DragMode::None;
    }

    /// Positive `delta_y` (scrolling down) moves the camera away.
    pub fn on_wheel(&mut self, delta_y: f64) {
        let step = ZOOM_STEP.powf(self.zoom_speed);
        if delta_y > 0.0 {
            self.pending_scale /= step;
        } else if delta_y < 0.0 {
            self.pending_scale *= step;
        }
    }

    /// Drop accumulated input without moving the camera.
    pub fn discard_pending(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_scale = 1.0;
        self.pending_pan_px = Vec2::new(0.0, 0.0);
    }

    /// Apply pending deltas to `camera` and aim it at the target.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= 0.0 || !radius.is_finite() {
            self.discard_pending();
            return;
        }

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        azimuth += self.pending_azimuth * factor;
        polar += self.pending_polar * factor;
        polar = polar.clamp(self.min_polar.max(POLAR_EPS), self.max_polar.min(PI - POLAR_EPS));

        let radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);

        if self.enable_pan {
            let pan = self.pan_offset(camera, radius, factor);
            self.target = self.target + pan;
        }

        let sin_polar = polar.sin();
        let offset = Vec3::new(
            radius * sin_polar * azimuth.sin(),
            radius * polar.cos(),
            radius * sin_polar * azimuth.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at = self.target;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.pending_azimuth *= keep;
            self.pending_polar *= keep;
            self.pending_pan_px = Vec2::new(self.pending_pan_px.x * keep, self.pending_pan_px.y * keep);
        } else {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
            self.pending_pan_px = Vec2::new(0.0, 0.0);
        }
        self.pending_scale = 1.0;
    }

    /// World-space target shift for this frame's share of the pending pan.
    ///
    /// One pixel moves the target by the height of one pixel at the target
    /// distance, so the globe tracks the pointer.
    fn pan_offset(&self, camera: &Camera, radius: f64, factor: f64) -> Vec3 {
        let Some((_, right, up)) = camera.basis() else {
            return Vec3::ZERO;
        };
        let world_per_px =
            2.0 * radius * (0.5 * camera.fov_y_deg.to_radians()).tan() / self.viewport_height;
        let dx = self.pending_pan_px.x * factor * world_per_px;
        let dy = self.pending_pan_px.y * factor * world_per_px;
        right * -dx + up * dy
    }
}

#[cfg(test)]
mod tests {
    use super::OrbitControls;
    use crate::camera::Camera;
    use crate::config::ControlsConfig;
    use foundation::math::Vec3;

    fn setup() -> (OrbitControls, Camera) {
        let mut controls = OrbitControls::new(&ControlsConfig::default());
        controls.set_viewport_height(800.0);
        let camera = Camera::new(Vec3::new(0.0, 0.0, 400.0), 50.0, 1.0, 1000.0);
        (controls, camera)
    }

    #[test]
    fn idle_update_keeps_camera_in_place() {
        let (mut controls, mut camera) = setup();
        controls.update(&mut camera);
        assert!(camera.position.distance(Vec3::new(0.0, 0.0, 400.0)) < 1e-9);
        assert_eq!(camera.look_at, Vec3::ZERO);
    }

    #[test]
    fn damped_rotation_converges_to_full_drag() {
        let (mut controls, mut camera) = setup();
        // Half the viewport height turns half a revolution.
        controls.on_pointer_down([100.0, 100.0], 0);
        controls.on_pointer_move([500.0, 100.0]);
        controls.on_pointer_up();

        controls.update(&mut camera);
        let first = camera.position;
        assert!(first.distance(Vec3::new(0.0, 0.0, 400.0)) > 1.0);
        assert!((first.length() - 400.0).abs() < 1e-9);

        for _ in 0..200 {
            controls.update(&mut camera);
        }
        assert!(camera.position.distance(Vec3::new(0.0, 0.0, -400.0)) < 1e-6);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        controls.on_pointer_down([0.0, 0.0], 0);
        controls.on_pointer_move([200.0, 0.0]);
        controls.update(&mut camera);
        // A quarter revolution to the left of +Z.
        assert!(camera.position.distance(Vec3::new(-400.0, 0.0, 0.0)) < 1e-6);
    }

    #[test]
    fn wheel_zoom_is_clamped() {
        let (mut controls, mut camera) = setup();
        for _ in 0..100 {
            controls.on_wheel(120.0);
            controls.update(&mut camera);
        }
        assert!((camera.position.length() - 600.0).abs() < 1e-9);

        for _ in 0..100 {
            controls.on_wheel(-120.0);
            controls.update(&mut camera);
        }
        assert!((camera.position.length() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn polar_angle_stops_short_of_the_pole() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        controls.on_pointer_down([0.0, 0.0], 0);
        controls.on_pointer_move([0.0, 5000.0]);
        controls.update(&mut camera);
        assert!(camera.position.y.abs() < 400.0);
        assert!(camera.basis().is_some());
    }

    #[test]
    fn right_drag_does_nothing_while_pan_is_disabled() {
        let (mut controls, mut camera) = setup();
        controls.on_pointer_down([0.0, 0.0], 2);
        assert!(!controls.is_dragging());
        controls.on_pointer_move([300.0, 300.0]);
        controls.update(&mut camera);
        assert_eq!(controls.target, Vec3::ZERO);
        assert!(camera.position.distance(Vec3::new(0.0, 0.0, 400.0)) < 1e-9);
    }

    #[test]
    fn pan_moves_target_when_enabled() {
        let (mut controls, mut camera) = setup();
        controls.enable_pan = true;
        controls.enable_damping = false;
        controls.on_pointer_down([0.0, 0.0], 2);
        controls.on_pointer_move([100.0, 0.0]);
        controls.update(&mut camera);
        assert!(controls.target.x < 0.0);
        assert_eq!(camera.look_at, controls.target);
    }

    #[test]
    fn discard_drops_pending_input() {
        let (mut controls, mut camera) = setup();
        controls.on_pointer_down([0.0, 0.0], 0);
        controls.on_pointer_move([300.0, 120.0]);
        controls.on_wheel(120.0);
        controls.discard_pending();
        controls.update(&mut camera);
        assert!(camera.position.distance(Vec3::new(0.0, 0.0, 400.0)) < 1e-9);
    }
}
