#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate num_cpus;
extern crate scoped_threadpool;
extern crate smallvec;

pub mod clip;
pub mod color;
pub mod engine;
pub mod error;
pub mod math;
mod parallel;
pub mod mesh;
pub mod raster;
pub mod setup;
pub mod shader;
pub mod texture;
pub mod transform;

pub use color::Color8;
pub use engine::{Engine, FrameContext, ModelInstance};
pub use error::{RenderError, RenderResult};
pub use mesh::Mesh;
pub use shader::Shader;
pub use texture::Texture;
pub use transform::{Camera, InputState, Transform};
