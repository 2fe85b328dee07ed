//! Per-pixel shading.
//!
//! The rasterizer invokes a shader once per covered pixel — millions of
//! times a frame — so dispatch is a tagged enum matched once per
//! tile-batch rather than a `dyn Trait` call per pixel (see the REDESIGN
//! FLAGS note on virtual dispatch): the match compiles down to a direct
//! call the optimizer can inline, instead of an indirect call through a
//! vtable for every single pixel.

use math::Vec3;
use texture::Texture;

/// A shader is invoked with the interpolated, perspective-corrected
/// position, normal, and UV of a covered pixel and returns a linear RGB
/// color. Implementations must be pure functions of their inputs plus
/// whatever immutable state they hold — the rasterizer calls them
/// concurrently from every tile worker.
pub enum Shader {
    /// Samples a texture at the interpolated UV, ignoring position/normal.
    Texture(Texture),
    /// Half-Lambert `(N . L + 1) / 2` shaded as grey, ignoring the UV.
    Lit { light_dir: Vec3 },
    /// Product of `Texture` and `Lit`.
    LitTexture { texture: Texture, light_dir: Vec3 },
}

impl Shader {
    pub fn shade(&self, _position: Vec3, normal: Vec3, uv: math::Vec2) -> Vec3 {
        match *self {
            Shader::Texture(ref tex) => tex.sample_nearest(uv.x, uv.y),
            Shader::Lit { light_dir } => Vec3::splat(half_lambert(normal, light_dir)),
            Shader::LitTexture { ref texture, light_dir } => {
                texture.sample_nearest(uv.x, uv.y) * half_lambert(normal, light_dir)
            }
        }
    }
}

#[inline]
fn half_lambert(normal: Vec3, light_dir: Vec3) -> f32 {
    (normal.normalized().dot(light_dir.normalized()) + 1.0) / 2.0
}
