//! Perspective camera and the timed position transition that drives it.

use foundation::math::{Vec2, Vec3};
use scene::picking::Ray;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(position: Vec3, fov_y_deg: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            look_at: Vec3::ZERO,
            fov_y_deg,
            aspect: 1.0,
            near,
            far,
        }
    }

    pub fn set_aspect(&mut self, width: f64, height: f64) {
        self.aspect = if height <= 0.0 || width <= 0.0 {
            1.0
        } else {
            (width / height).max(1e-6)
        };
    }

    /// Orthonormal `(forward, right, up)` basis, or `None` when the camera
    /// sits on its look-at point.
    ///
    /// World +Y is the up hint; looking straight along it falls back to -Z.
    pub fn basis(&self) -> Option<(Vec3, Vec3, Vec3)> {
        let forward = (self.look_at - self.position).try_normalize()?;
        let right = forward
            .cross(Vec3::Y)
            .try_normalize()
            .or_else(|| forward.cross(Vec3::new(0.0, 0.0, -1.0)).try_normalize())?;
        let up = right.cross(forward);
        Some((forward, right, up))
    }

    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        match self.basis() {
            Some((forward, right, up)) => mat4_view_rh(self.position, forward, right, up),
            None => MAT4_IDENTITY,
        }
    }

    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        mat4_perspective_rh_z0(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        mat4_mul(self.projection_matrix(), self.view_matrix())
    }

    /// World-space ray from the camera through a normalized device coordinate.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let (forward, right, up) = self.basis()?;
        let tan_half = (0.5 * self.fov_y_deg.to_radians()).tan();
        let dir = forward + right * (ndc.x * tan_half * self.aspect) + up * (ndc.y * tan_half);
        Some(Ray::new(self.position, dir.try_normalize()?))
    }
}

const MAT4_IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [[f32; 4]; 4] {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    // Column-major, RH, depth range [0, 1].
    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

fn mat4_view_rh(eye: Vec3, f: Vec3, s: Vec3, u: Vec3) -> [[f32; 4]; 4] {
    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, -f.x as f32, 0.0],
        [s.y as f32, u.y as f32, -f.y as f32, 0.0],
        [s.z as f32, u.z as f32, -f.z as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

/// Linear interpolation from `start` to `target` at `elapsed_ms`.
///
/// Returns `target` exactly once `elapsed_ms >= duration_ms`, and for any
/// non-positive duration.
pub fn sample(start: Vec3, target: Vec3, elapsed_ms: f64, duration_ms: f64) -> Vec3 {
    if duration_ms <= 0.0 || elapsed_ms >= duration_ms {
        return target;
    }
    let t = (elapsed_ms / duration_ms).max(0.0);
    start.lerp(target, t)
}

/// Camera transition state. `Running` remembers the host timestamp it was
/// started at; progress is always `now - started_ms`, never a sum of frame
/// deltas.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Running {
        start: Vec3,
        target: Vec3,
        look_at: Vec3,
        started_ms: f64,
        duration_ms: f64,
    },
}

/// Outcome of advancing a transition by one tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransitionProgress {
    Idle,
    Moving,
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct CameraTransition {
    state: TransitionState,
}

impl CameraTransition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start moving from `from` to `target` at host time `now_ms`, replacing
    /// any transition in flight.
    pub fn begin(
        &mut self,
        from: Vec3,
        target: Vec3,
        look_at: Vec3,
        now_ms: f64,
        duration_ms: f64,
    ) {
        self.state = TransitionState::Running {
            start: from,
            target,
            look_at,
            started_ms: now_ms,
            duration_ms,
        };
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TransitionState::Running { .. })
    }

    /// Write the pose for host time `now_ms` into `camera`.
    pub fn advance(&mut self, camera: &mut Camera, now_ms: f64) -> TransitionProgress {
        let TransitionState::Running {
            start,
            target,
            look_at,
            started_ms,
            duration_ms,
        } = self.state
        else {
            return TransitionProgress::Idle;
        };

        // A frame stamped before the call that began the transition counts as t = 0.
        let elapsed_ms = (now_ms - started_ms).max(0.0);
        camera.position = sample(start, target, elapsed_ms, duration_ms);
        camera.look_at = look_at;

        if duration_ms <= 0.0 || elapsed_ms >= duration_ms {
            self.state = TransitionState::Idle;
            TransitionProgress::Finished
        } else {
            TransitionProgress::Moving
        }
    }
}
