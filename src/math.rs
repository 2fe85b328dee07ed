//! Free-function math kernel: 2D/3D vectors and scalar approximations.
//!
//! The trigonometric and square-root routines below are deliberately
//! hand-rolled rather than delegated to libm/hardware intrinsics, mirroring
//! the numeric constraints the rest of the pipeline is built against
//! (perspective-correct interpolation via reciprocal-depth blending wants a
//! `sqrt` with a known, reproducible error curve, not whatever the platform
//! happens to ship).

use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

pub const PI: f32 = 3.14159265358979323846;

#[inline]
pub fn min(a: f32, b: f32) -> f32 { if a < b { a } else { b } }

#[inline]
pub fn max(a: f32, b: f32) -> f32 { if a > b { a } else { b } }

#[inline]
pub fn clamp(value: f32, min_val: f32, max_val: f32) -> f32 {
    max(min_val, min(value, max_val))
}

#[inline]
pub fn to_radians(degrees: f32) -> f32 { degrees * (PI / 180.0) }

/// Floor for `f32`, used by texture UV wrapping.
#[inline]
pub fn floor_f32(x: f32) -> f32 { x.floor() }

/// Wrap an angle into `[-PI, PI]`, the domain the Taylor-series
/// approximations below are accurate over.
pub fn wrap_pi(mut x: f32) -> f32 {
    while x < -PI {
        x += 2.0 * PI;
    }
    while x > PI {
        x -= 2.0 * PI;
    }
    x
}

/// 9th-order Taylor-series sine, accurate to within ~1e-5 over `[-PI, PI]`.
pub fn sin(x: f32) -> f32 {
    let x = wrap_pi(x);
    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;
    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362880.0
}

/// 10th-order Taylor-series cosine, accurate to within ~1e-5 over `[-PI, PI]`.
pub fn cos(x: f32) -> f32 {
    let x = wrap_pi(x);
    let x2 = x * x;
    let x4 = x2 * x2;
    let x6 = x4 * x2;
    let x8 = x4 * x4;
    let x10 = x8 * x2;
    1.0 - x2 / 2.0 + x4 / 24.0 - x6 / 720.0 + x8 / 40320.0 - x10 / 3628800.0
}

pub fn tan(x: f32) -> f32 { sin(x) / cos(x) }

/// Rational-polynomial arctangent approximation (max error ~0.0038 rad).
pub fn atan(x: f32) -> f32 {
    let abs_x = x.abs();
    if abs_x <= 1.0 {
        x / (1.0 + 0.28 * x * x)
    } else {
        let result = (PI / 2.0) - x / (x * x + 0.28);
        if x < 0.0 { -result } else { result }
    }
}

/// Newton-Raphson square root: no reciprocal-square-root shortcut, fixed
/// iteration count so the result is reproducible across platforms.
pub fn sqrt(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut guess = x;
    for _ in 0..10 {
        guess = 0.5 * (guess + x / guess);
    }
    guess
}

pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    let t = clamp(t, 0.0, 1.0);
    a + (b - a) * t
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Vec2 { Vec2 { x, y } }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 { self.x * other.x + self.y * other.y }

    pub fn normalized(self) -> Vec2 {
        let len = sqrt(self.dot(self));
        if len > 1e-6 { self / len } else { Vec2::ZERO }
    }

    pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        Vec2::new(lerp_f32(a.x, b.x, t), lerp_f32(a.y, b.y, t))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 { Vec2::new(self.x * rhs, self.y * rhs) }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 { Vec2::new(self.x / rhs, self.y / rhs) }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Vec3 { Vec3 { x, y, z } }

    #[inline]
    pub fn splat(v: f32) -> Vec3 { Vec3::new(v, v, v) }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 { self.x * other.x + self.y * other.y + self.z * other.z }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn normalized(self) -> Vec3 {
        let len = sqrt(self.dot(self));
        if len > 1e-6 { self / len } else { Vec3::ZERO }
    }

    pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        Vec3::new(lerp_f32(a.x, b.x, t), lerp_f32(a.y, b.y, t), lerp_f32(a.z, b.z, t))
    }

    #[inline]
    pub fn xy(self) -> Vec2 { Vec2::new(self.x, self.y) }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 { Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z) }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 { Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z) }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 { Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs) }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 { Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs) }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sin_cos_match_std_within_tolerance() {
        let mut x = -PI;
        while x <= PI {
            assert!((sin(x) - x.sin()).abs() < 1e-3, "sin({}) diverged", x);
            assert!((cos(x) - x.cos()).abs() < 1e-3, "cos({}) diverged", x);
            x += 0.1;
        }
    }

    #[test]
    fn sqrt_matches_std_within_tolerance() {
        for v in [0.0f32, 1.0, 2.0, 4.0, 100.0, 0.0001].iter() {
            assert!((sqrt(*v) - v.sqrt()).abs() < 1e-3);
        }
    }

    #[test]
    fn sqrt_of_negative_is_zero() {
        assert_eq!(sqrt(-4.0), 0.0);
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(lerp_f32(0.0, 10.0, -1.0), 0.0);
        assert_eq!(lerp_f32(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp_f32(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn vec3_normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn vec3_cross_orthogonal_unit_axes() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    }
}
