//! Damped, pointer-driven viewpoint.
//!
//! Scene coordinates are the host-normalized surface space: x in 0..1 from
//! left to right, y in 0..1 from top to bottom, z a shallow depth band around
//! 0. At rest the unit square exactly fills the view frustum at z = 0.

use crate::constants::*;
use crate::palette::CameraStyle;
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Half extents of the frustum slice through the target plane.
    pub fn half_extents(&self) -> Vec2 {
        let half_h = (self.fovy_radians * 0.5).tan() * (self.eye.z - self.target.z).abs();
        Vec2::new(half_h * self.aspect, half_h)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOVY,
            znear: 0.05,
            zfar: 20.0,
        }
    }
}

pub struct CameraController {
    style: CameraStyle,
    camera: Camera,
    offset: Vec2,
    target: Vec2,
    pending: Option<Vec2>,
    pointer: Option<Vec2>,
    accepts_pointer: bool,
}

impl CameraController {
    /// `touch_only` devices never accept pointer samples.
    pub fn new(style: CameraStyle, touch_only: bool) -> Self {
        Self {
            style,
            camera: Camera::default(),
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
            pending: None,
            pointer: None,
            accepts_pointer: !touch_only,
        }
    }

    /// Record a pointer sample in scene space. Samples arriving between two
    /// frames coalesce: only the latest one is seen by `apply`.
    pub fn push_pointer(&mut self, x: f32, y: f32) {
        if !self.accepts_pointer || !x.is_finite() || !y.is_finite() {
            return;
        }
        self.pending = Some(Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)));
    }

    /// Pointer left the surface: ease back to centre and stop attracting.
    pub fn clear_pointer(&mut self) {
        self.pending = None;
        self.pointer = None;
        self.target = Vec2::ZERO;
    }

    /// Consume the pending sample and move the offset toward its target.
    pub fn apply(&mut self, dt: f32) {
        if let Some(p) = self.pending.take() {
            self.pointer = Some(p);
            self.target = (p - Vec2::splat(0.5)) * 2.0;
        }
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let alpha = 1.0 - (1.0 - CAMERA_DAMPING).powf(dt * REFERENCE_FPS);
        self.offset += (self.target - self.offset) * alpha;
    }

    /// Model-view-projection for the current offset and surface aspect.
    pub fn transform(&mut self, aspect: f32) -> Mat4 {
        self.camera.aspect = aspect.max(1e-3);
        let half = self.camera.half_extents();
        // unit square (y down) -> frustum slice at z = 0 (y up)
        let fit = Mat4::from_scale(Vec3::new(2.0 * half.x, -2.0 * half.y, 1.0))
            * Mat4::from_translation(Vec3::new(-0.5, -0.5, 0.0));
        match self.style {
            CameraStyle::Parallax => {
                self.camera.eye = Vec3::new(
                    self.offset.x * PARALLAX_RANGE,
                    -self.offset.y * PARALLAX_RANGE,
                    CAMERA_Z,
                );
                self.camera.target = Vec3::ZERO;
                self.camera.projection_matrix() * self.camera.view_matrix() * fit
            }
            CameraStyle::Orbit => {
                self.camera.eye = Vec3::new(0.0, 0.0, CAMERA_Z);
                self.camera.target = Vec3::ZERO;
                let tilt = Mat4::from_rotation_y(self.offset.x * ORBIT_RANGE_RAD)
                    * Mat4::from_rotation_x(self.offset.y * ORBIT_RANGE_RAD);
                self.camera.projection_matrix() * self.camera.view_matrix() * tilt * fit
            }
        }
    }

    /// Last consumed pointer sample as a point on the scene's z = 0 plane.
    pub fn pointer_world(&self) -> Option<Vec3> {
        self.pointer.map(|p| p.extend(0.0))
    }

    /// Stop accepting input and forget any sample in flight.
    pub fn dispose(&mut self) {
        self.accepts_pointer = false;
        self.pending = None;
        self.pointer = None;
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn accepts_pointer(&self) -> bool {
        self.accepts_pointer
    }

    pub fn style(&self) -> CameraStyle {
        self.style
    }
}
