use foundation::math::Vec3;
use runtime::{EventBus, EventKind, Frame, Tick};
use tracing::trace;

use crate::camera::{Camera, CameraTransition, TransitionProgress};
use crate::config::ViewerConfig;
use crate::orbit::OrbitControls;

/// Owns the camera and arbitrates between the transition and orbit input.
///
/// While a transition runs it has exclusive control of the camera and any
/// orbit input gathered in the meantime is dropped.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: Camera,
    pub controls: OrbitControls,
    transition: CameraTransition,
}

impl CameraRig {
    pub fn new(config: &ViewerConfig) -> Self {
        let camera = Camera::new(
            config.initial_camera_position(),
            config.camera.fov_y_deg,
            config.camera.near,
            config.camera.far,
        );
        Self {
            camera,
            controls: OrbitControls::new(&config.controls),
            transition: CameraTransition::new(),
        }
    }

    /// Start moving from wherever the camera is now. `now_ms` is the host
    /// time of the call, in the same timebase as frame timestamps.
    pub fn focus(&mut self, target: Vec3, look_at: Vec3, now_ms: f64, duration_ms: f64) {
        self.transition
            .begin(self.camera.position, target, look_at, now_ms, duration_ms);
    }

    pub fn transition(&self) -> &CameraTransition {
        &self.transition
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.camera.set_aspect(width, height);
        self.controls.set_viewport_height(height);
    }
}

impl Tick for CameraRig {
    fn tick(&mut self, frame: &Frame, bus: &mut EventBus) {
        if !self.transition.is_running() {
            self.controls.update(&mut self.camera);
            return;
        }

        self.controls.discard_pending();
        match self.transition.advance(&mut self.camera, frame.host_ms) {
            TransitionProgress::Finished => {
                let p = self.camera.position;
                bus.emit(
                    *frame,
                    EventKind::Camera,
                    format!("transition complete at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z),
                );
            }
            TransitionProgress::Moving => {
                trace!(frame = frame.index, "camera transition step");
            }
            TransitionProgress::Idle => {}
        }
    }
}
