//! Top-level driver: owns the camera and worker pool, and turns a list
//! of model instances into a fully shaded color buffer each frame.
//!
//! `Engine` never holds a reference back to its caller. The caller
//! builds a [`FrameContext`] with this frame's timing and input, passes
//! it by value into [`Engine::render_frame`], and gets the drawn frame
//! back — there is no owner/child reference cycle between the engine
//! and whatever application embeds it.

use scoped_threadpool::Pool;

use clip::{clip_and_project, ProjectedStream, FAR_PLANE, NEAR_PLANE};
use color::Color8;
use error::{RenderError, RenderResult};
use mesh::Mesh;
use setup::build_triangle_setup;
use raster::rasterize;
use shader::Shader;
use transform::{Camera, InputState, Transform};

/// One frame's worth of externally-sourced state. Constructed by the
/// caller and consumed by `render_frame` — the engine keeps nothing
/// from it after the call returns.
pub struct FrameContext {
    pub delta_time: f32,
    pub input: InputState,
}

/// A mesh, its placement in world space, and the shader it draws with.
pub struct ModelInstance {
    pub mesh: Mesh,
    pub transform: Transform,
    pub shader: Shader,
}

/// Owns the camera, the worker pool, and per-frame scratch buffers.
/// `width`/`height` are fixed at construction — resizing requires a new
/// `Engine`, same as the teacher's original renderer.
pub struct Engine {
    pub camera: Camera,
    pub clear_color: Color8,
    width: usize,
    height: usize,
    pool: Pool,
    worker_count: u32,
    depth_buffer: Vec<f32>,
    stream: ProjectedStream,
}

impl Engine {
    /// Fails construction if either dimension is zero — the same
    /// configuration-error gate spec.md §7 requires of texture
    /// construction, applied to the engine's own framebuffer dimensions.
    pub fn new(width: usize, height: usize, camera: Camera, clear_color: Color8) -> RenderResult<Engine> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidFramebufferDimensions);
        }

        let worker_count = ::num_cpus::get().max(1) as u32;
        info!("engine starting with {} tile workers at {}x{}", worker_count, width, height);
        Ok(Engine {
            camera,
            clear_color,
            width,
            height,
            pool: Pool::new(worker_count),
            worker_count,
            depth_buffer: vec![::std::f32::INFINITY; width * height],
            stream: ProjectedStream::new(),
        })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Clear, cull, clip, set up, and rasterize every model in `models`
    /// into `color_buffer` (row-major ABGR8888, length `width * height`).
    pub fn render_frame(&mut self, models: &[ModelInstance], color_buffer: &mut [u32], ctx: FrameContext) {
        assert_eq!(color_buffer.len(), self.width * self.height, "color buffer does not match engine dimensions");

        self.camera.update(ctx.input, ctx.delta_time, self.width as f32);

        let clear = self.clear_color.to_abgr();
        for px in color_buffer.iter_mut() {
            *px = clear;
        }
        for d in self.depth_buffer.iter_mut() {
            *d = ::std::f32::INFINITY;
        }

        let screen = (self.width as f32, self.height as f32);

        for model in models {
            if !is_model_visible(&model.mesh, &model.transform, &self.camera) {
                continue;
            }

            self.stream.clear();
            clip_and_project(&model.mesh, &model.transform, &self.camera, screen, &mut self.stream);
            if self.stream.indices.is_empty() {
                continue;
            }

            let triangles = build_triangle_setup(&self.stream, screen);
            if triangles.is_empty() {
                continue;
            }

            rasterize(
                &mut self.pool,
                self.worker_count,
                &triangles,
                &model.shader,
                self.width,
                self.height,
                color_buffer,
                &mut self.depth_buffer,
            );
        }
    }
}

/// Cheap, deliberately loose visibility cull: only two corners of the
/// model's local-space bounding box (min and max) are carried through
/// to view space, rather than all eight. A box that straddles the near
/// plane near its silhouette can pass this check while actually being
/// invisible — the real per-triangle near-plane clip in `clip_and_project`
/// is what ultimately decides what gets drawn. This mirrors the
/// original's `is_model_visible`; tightening it to all eight corners is
/// one of the Open Questions recorded in DESIGN.md.
fn is_model_visible(mesh: &Mesh, model_transform: &Transform, camera: &Camera) -> bool {
    let (min, max) = match mesh.bounds() {
        Some(bounds) => bounds,
        None => return false,
    };

    let min_view = camera.transform.to_local(model_transform.to_world(min));
    let max_view = camera.transform.to_local(model_transform.to_world(max));

    let in_front = min_view.z > NEAR_PLANE || max_view.z > NEAR_PLANE;
    let past_far = min_view.z > FAR_PLANE && max_view.z > FAR_PLANE;

    in_front && !past_far
}
