//! Model and camera transforms: yaw/pitch Euler basis, position, scale.

use math::{clamp, cos, sin, to_radians, Vec3, PI};

/// Intrinsic yaw-then-pitch rotation, uniform per-axis scale, and a
/// translation. Basis vectors are recomputed on demand from the four
/// fields — there is no cached state to invalidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub yaw: f32,
    pub pitch: f32,
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            yaw: 0.0,
            pitch: 0.0,
            position: Vec3::ZERO,
            scale: Vec3::splat(1.0),
        }
    }
}

impl Transform {
    pub fn new() -> Transform { Transform::default() }

    /// Right, up, and forward basis vectors for the current yaw/pitch,
    /// composed as an intrinsic Y (yaw) then X (pitch) rotation.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let ihat_yaw = Vec3::new(cos(self.yaw), 0.0, -sin(self.yaw));
        let jhat_yaw = Vec3::new(0.0, 1.0, 0.0);
        let khat_yaw = Vec3::new(sin(self.yaw), 0.0, cos(self.yaw));

        let ihat_pitch = Vec3::new(1.0, 0.0, 0.0);
        let jhat_pitch = Vec3::new(0.0, cos(self.pitch), -sin(self.pitch));
        let khat_pitch = Vec3::new(0.0, sin(self.pitch), cos(self.pitch));

        (
            transform_by(ihat_yaw, jhat_yaw, khat_yaw, ihat_pitch),
            transform_by(ihat_yaw, jhat_yaw, khat_yaw, jhat_pitch),
            transform_by(ihat_yaw, jhat_yaw, khat_yaw, khat_pitch),
        )
    }

    /// Transpose of `basis()` — valid because the basis is an orthonormal
    /// rotation; scale inversion happens separately, per-axis, in
    /// `to_local`.
    pub fn inverse_basis(&self) -> (Vec3, Vec3, Vec3) {
        let (ihat, jhat, khat) = self.basis();
        (
            Vec3::new(ihat.x, jhat.x, khat.x),
            Vec3::new(ihat.y, jhat.y, khat.y),
            Vec3::new(ihat.z, jhat.z, khat.z),
        )
    }

    /// model-space -> world-space (or view-space, when this is the camera's
    /// transform and `p` is already in world-space).
    pub fn to_world(&self, p: Vec3) -> Vec3 {
        let (mut ihat, mut jhat, mut khat) = self.basis();
        ihat = ihat * self.scale.x;
        jhat = jhat * self.scale.y;
        khat = khat * self.scale.z;
        transform_by(ihat, jhat, khat, p) + self.position
    }

    /// Inverse of `to_world`: subtract translation, rotate by the inverse
    /// (transposed) basis, then undo scale per-axis.
    pub fn to_local(&self, p: Vec3) -> Vec3 {
        let (ihat, jhat, khat) = self.inverse_basis();
        let local = transform_by(ihat, jhat, khat, p - self.position);
        Vec3::new(local.x / self.scale.x, local.y / self.scale.y, local.z / self.scale.z)
    }
}

#[inline]
fn transform_by(ihat: Vec3, jhat: Vec3, khat: Vec3, v: Vec3) -> Vec3 {
    Vec3::new(
        v.x * ihat.x + v.y * jhat.x + v.z * khat.x,
        v.x * ihat.y + v.y * jhat.y + v.z * khat.y,
        v.x * ihat.z + v.y * jhat.z + v.z * khat.z,
    )
}

/// Per-frame input delta, already decoded by the external input
/// collaborator (spec §6): relative mouse motion plus WASD booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// A `Transform` plus projection and movement parameters, with basis
/// vectors cached and refreshed once per frame.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub transform: Transform,
    pub fov: f32,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            transform: Transform::default(),
            fov: PI / 2.0,
            move_speed: 5.0,
            mouse_sensitivity: 2.0,
            forward: Vec3::new(0.0, 0.0, 1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Camera {
        let mut cam = Camera::default();
        cam.transform.position = position;
        cam.refresh_basis();
        cam
    }

    pub fn forward(&self) -> Vec3 { self.forward }
    pub fn right(&self) -> Vec3 { self.right }
    pub fn up(&self) -> Vec3 { self.up }

    fn refresh_basis(&mut self) {
        let (right, up, forward) = self.transform.basis();
        self.right = right;
        self.up = up;
        self.forward = forward;
    }

    /// Apply one frame's input: mouse drag rotates (yaw unconstrained,
    /// pitch clamped to +/-89 degrees), WASD translates along the
    /// refreshed forward/right vectors, scaled by `move_speed * delta_time`.
    pub fn update(&mut self, input: InputState, delta_time: f32, screen_width: f32) {
        let dx = input.mouse_dx / screen_width * self.mouse_sensitivity;
        let dy = input.mouse_dy / screen_width * self.mouse_sensitivity;

        self.transform.pitch = clamp(
            self.transform.pitch - dy,
            -to_radians(89.0),
            to_radians(89.0),
        );
        self.transform.yaw += dx;

        self.refresh_basis();

        let mut delta = Vec3::ZERO;
        if input.forward {
            delta += self.forward;
        }
        if input.backward {
            delta -= self.forward;
        }
        if input.right {
            delta += self.right;
        }
        if input.left {
            delta -= self.right;
        }

        self.transform.position += delta.normalized() * self.move_speed * delta_time;
    }
}
