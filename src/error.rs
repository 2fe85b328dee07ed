//! Construction-time error taxonomy.
//!
//! Per-pixel and per-triangle numerical edge cases (degenerate triangles,
//! fully-clipped triangles, a denominator too close to zero) are not errors
//! — they are silently-dropped pipeline outcomes, logged at `trace` level
//! from the module that makes the call. Only configuration mistakes made
//! once, at construction time, are surfaced as `Result`.

#[derive(Debug, Fail)]
pub enum RenderError {
    #[fail(display = "texture dimensions must be non-zero")]
    InvalidTextureDimensions,
    #[fail(display = "texture pixel data length {} does not match width*height {}", actual, expected)]
    InvalidTextureLength { expected: usize, actual: usize },
    #[fail(display = "framebuffer dimensions must be non-zero")]
    InvalidFramebufferDimensions,
    #[fail(display = "mesh attribute streams must have equal length")]
    MeshAttributeLengthMismatch,
    #[fail(display = "mesh index count {} is not a multiple of 3", _0)]
    IndexCountNotMultipleOfThree(usize),
}

pub type RenderResult<T> = Result<T, RenderError>;
