//! Width x height RGB texture with nearest and bilinear samplers.

use error::{RenderError, RenderResult};
use math::{floor_f32, Vec3};

/// An RGB image sampled in `[0, 1]` UV space, wrapping on both axes.
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<Vec3>) -> RenderResult<Texture> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTextureDimensions);
        }
        let expected = width * height;
        if pixels.len() != expected {
            return Err(RenderError::InvalidTextureLength { expected, actual: pixels.len() });
        }
        Ok(Texture { width, height, pixels })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Nearest-neighbor sample. Works for any width/height, power-of-two or
    /// not.
    pub fn sample_nearest(&self, u: f32, v: f32) -> Vec3 {
        let wrapped_u = wrap_unit(u);
        let wrapped_v = wrap_unit(v);

        let x = (wrapped_u * (self.width - 1) as f32) as usize;
        let y = (wrapped_v * (self.height - 1) as f32) as usize;

        self.pixels[y * self.width + x]
    }

    /// Bilinear sample. Requires power-of-two width and height: the second
    /// texel in each direction wraps via `(coord + 1) & (dimension - 1)`,
    /// which only wraps correctly when `dimension` is a power of two.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Vec3 {
        debug_assert!(
            self.width.is_power_of_two() && self.height.is_power_of_two(),
            "bilinear sampling requires power-of-two texture dimensions"
        );

        let u = u - floor_f32(u);
        let v = v - floor_f32(v);

        let fx = u * self.width as f32;
        let fy = v * self.height as f32;

        let x0 = fx as usize;
        let y0 = fy as usize;
        let x1 = (x0 + 1) & (self.width - 1);
        let y1 = (y0 + 1) & (self.height - 1);

        let fx_fract = fx - x0 as f32;
        let fy_fract = fy - y0 as f32;

        let c00 = self.pixels[y0 * self.width + x0];
        let c10 = self.pixels[y0 * self.width + x1];
        let c01 = self.pixels[y1 * self.width + x0];
        let c11 = self.pixels[y1 * self.width + x1];

        let w00 = (1.0 - fx_fract) * (1.0 - fy_fract);
        let w10 = fx_fract * (1.0 - fy_fract);
        let w01 = (1.0 - fx_fract) * fy_fract;
        let w11 = fx_fract * fy_fract;

        c00 * w00 + c10 * w10 + c01 * w01 + c11 * w11
    }
}

/// Wrap `x` into `[0, 1)`.
fn wrap_unit(x: f32) -> f32 {
    let mut w = x - floor_f32(x);
    if w < 0.0 {
        w += 1.0;
    }
    w
}
