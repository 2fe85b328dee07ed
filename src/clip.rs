//! Near-plane clipping and screen-space projection.
//!
//! Per triangle: transform into view space, classify the three vertices
//! against the near plane, emit 0/1/2 triangles with interpolated
//! attributes, and project every emitted vertex to screen space. Clipping
//! against the four side planes is out of scope — lateral bounds are
//! handled by scissored tile iteration in the rasterizer instead (spec
//! §1 Non-goals).

use smallvec::SmallVec;

use mesh::Mesh;
use math::{tan, Vec2, Vec3};
use transform::{Camera, Transform};

pub const NEAR_PLANE: f32 = 0.01;

/// Far-plane distance used only by the engine's cheap per-model AABB
/// cull (spec.md §4.7) — the rasterizer itself has no far clip.
pub const FAR_PLANE: f32 = 1000.0;

/// One clipped-and-projected vertex, not yet committed to the stream.
/// A triangle against the near plane emits at most two output
/// triangles (six vertices) — small enough that `SmallVec` keeps the
/// whole batch on the stack for the overwhelming majority of triangles,
/// which clip to zero or one output triangle.
#[derive(Clone, Copy)]
struct EmittedVertex {
    screen: Vec2,
    uv: Vec2,
    normal: Vec3,
    depth: f32,
}

type EmittedBatch = SmallVec<[EmittedVertex; 6]>;

/// Post-clip vertex stream in structure-of-arrays layout, rebuilt from
/// scratch every frame for every model.
#[derive(Debug, Default)]
pub struct ProjectedStream {
    pub positions: Vec<Vec2>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub depths: Vec<f32>,
    pub indices: Vec<u32>,
}

impl ProjectedStream {
    pub fn new() -> ProjectedStream { ProjectedStream::default() }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.normals.clear();
        self.depths.clear();
        self.indices.clear();
    }

    fn push(&mut self, screen: Vec2, uv: Vec2, normal: Vec3, depth: f32) {
        self.positions.push(screen);
        self.uvs.push(uv);
        self.normals.push(normal);
        self.depths.push(depth);
        self.indices.push((self.positions.len() - 1) as u32);
    }
}

/// Transform a model-space vertex into the camera's view space.
#[inline]
pub fn vertex_to_view(p: Vec3, model_transform: &Transform, camera: &Camera) -> Vec3 {
    camera.transform.to_local(model_transform.to_world(p))
}

/// Aspect-corrected view-space -> screen-space projection (spec §4.2's
/// canonical form; a legacy non-aspect-corrected projection existed in the
/// original and was explicitly superseded — see DESIGN.md).
pub fn view_to_screen(view_point: Vec3, screen: (f32, f32), fov: f32) -> Vec2 {
    let aspect_ratio = screen.0 / screen.1;
    let scale_y = tan(fov / 2.0);
    let scale_x = scale_y * aspect_ratio;

    let inv_z = 1.0 / view_point.z;
    let ndc_x = view_point.x * inv_z / scale_x;
    let ndc_y = view_point.y * inv_z / scale_y;

    Vec2::new((ndc_x + 1.0) * 0.5 * screen.0, (1.0 - ndc_y) * 0.5 * screen.1)
}

/// Clip and project every triangle of `mesh`, appending the results to
/// `stream`. `stream` is assumed already cleared by the caller for this
/// frame's draw of this model.
pub fn clip_and_project(
    mesh: &Mesh,
    model_transform: &Transform,
    camera: &Camera,
    screen: (f32, f32),
    stream: &mut ProjectedStream,
) {
    let near = NEAR_PLANE;

    for tri in mesh.indices.chunks(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let indices = [ia, ib, ic];

        let view_pts = [
            vertex_to_view(mesh.positions[ia], model_transform, camera),
            vertex_to_view(mesh.positions[ib], model_transform, camera),
            vertex_to_view(mesh.positions[ic], model_transform, camera),
        ];

        let clipped = [
            view_pts[0].z <= near,
            view_pts[1].z <= near,
            view_pts[2].z <= near,
        ];
        let clip_count = clipped.iter().filter(|&&c| c).count();

        let mut batch: EmittedBatch = SmallVec::new();

        match clip_count {
            0 => {
                for i in 0..3 {
                    batch.push(kept_vertex(mesh, view_pts[i], indices[i], screen, camera.fov));
                }
            }
            3 => {
                trace!("triangle fully behind near plane, dropped");
            }
            1 => {
                let clip_i = if clipped[0] { 0 } else if clipped[1] { 1 } else { 2 };
                let a_i = (clip_i + 1) % 3;
                let b_i = (clip_i + 2) % 3;

                let c = view_pts[clip_i];
                let a = view_pts[a_i];
                let b = view_pts[b_i];

                let t_a = (near - c.z) / (a.z - c.z);
                let t_b = (near - c.z) / (b.z - c.z);

                let intersect_a = Vec3::lerp(c, a, t_a);
                let intersect_b = Vec3::lerp(c, b, t_b);

                batch.push(lerped_vertex(mesh, intersect_a, indices[clip_i], indices[a_i], t_a, screen, camera.fov));
                batch.push(kept_vertex(mesh, a, indices[a_i], screen, camera.fov));
                batch.push(kept_vertex(mesh, b, indices[b_i], screen, camera.fov));

                batch.push(lerped_vertex(mesh, intersect_a, indices[clip_i], indices[a_i], t_a, screen, camera.fov));
                batch.push(kept_vertex(mesh, b, indices[b_i], screen, camera.fov));
                batch.push(lerped_vertex(mesh, intersect_b, indices[clip_i], indices[b_i], t_b, screen, camera.fov));
            }
            2 => {
                let keep_i = if !clipped[0] { 0 } else if !clipped[1] { 1 } else { 2 };
                let a_i = (keep_i + 1) % 3;
                let b_i = (keep_i + 2) % 3;

                let keep = view_pts[keep_i];
                let a = view_pts[a_i];
                let b = view_pts[b_i];

                let t_a = (near - keep.z) / (a.z - keep.z);
                let t_b = (near - keep.z) / (b.z - keep.z);

                let intersect_a = Vec3::lerp(keep, a, t_a);
                let intersect_b = Vec3::lerp(keep, b, t_b);

                batch.push(kept_vertex(mesh, keep, indices[keep_i], screen, camera.fov));
                batch.push(lerped_vertex(mesh, intersect_a, indices[keep_i], indices[a_i], t_a, screen, camera.fov));
                batch.push(lerped_vertex(mesh, intersect_b, indices[keep_i], indices[b_i], t_b, screen, camera.fov));
            }
            _ => unreachable!("clip_count is a count of 3 booleans"),
        }

        for v in batch {
            stream.push(v.screen, v.uv, v.normal, v.depth);
        }
    }
}

fn kept_vertex(mesh: &Mesh, view_point: Vec3, vert_index: usize, screen: (f32, f32), fov: f32) -> EmittedVertex {
    EmittedVertex {
        screen: view_to_screen(view_point, screen, fov),
        uv: mesh.uvs[vert_index],
        normal: mesh.normals[vert_index],
        depth: view_point.z,
    }
}

fn lerped_vertex(
    mesh: &Mesh,
    view_point: Vec3,
    vert_a: usize,
    vert_b: usize,
    t: f32,
    screen: (f32, f32),
    fov: f32,
) -> EmittedVertex {
    EmittedVertex {
        screen: view_to_screen(view_point, screen, fov),
        uv: Vec2::lerp(mesh.uvs[vert_a], mesh.uvs[vert_b], t),
        normal: Vec3::lerp(mesh.normals[vert_a], mesh.normals[vert_b], t),
        depth: view_point.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh::Mesh;
    use transform::{Camera, Transform};

    fn single_triangle(positions: [Vec3; 3]) -> Mesh {
        Mesh::new(
            positions.to_vec(),
            vec![Vec2::ZERO; 3],
            vec![Vec3::new(0.0, 0.0, 1.0); 3],
            vec![0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn unclipped_triangle_emits_one_triangle() {
        let mesh = single_triangle([
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ]);
        let camera = Camera::new(Vec3::ZERO);
        let mut stream = ProjectedStream::new();
        clip_and_project(&mesh, &Transform::default(), &camera, (4.0, 4.0), &mut stream);
        assert_eq!(stream.indices.len(), 3);
    }

    #[test]
    fn fully_behind_near_plane_emits_nothing() {
        let mesh = single_triangle([
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        ]);
        let camera = Camera::new(Vec3::ZERO);
        let mut stream = ProjectedStream::new();
        clip_and_project(&mesh, &Transform::default(), &camera, (4.0, 4.0), &mut stream);
        assert_eq!(stream.indices.len(), 0);
    }

    #[test]
    fn one_vertex_clipped_emits_two_triangles() {
        let mesh = single_triangle([
            Vec3::new(0.0, 0.0, -0.5),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ]);
        let camera = Camera::new(Vec3::ZERO);
        let mut stream = ProjectedStream::new();
        clip_and_project(&mesh, &Transform::default(), &camera, (4.0, 4.0), &mut stream);
        assert_eq!(stream.indices.len(), 6);
        // t = (0.01 - (-0.5)) / (1 - (-0.5)) = 0.34
        let expected_depth = Vec3::lerp(Vec3::new(0.0, 0.0, -0.5), Vec3::new(1.0, 0.0, 1.0), 0.34).z;
        assert!((stream.depths[0] - expected_depth).abs() < 1e-3);
    }

    #[test]
    fn two_vertices_clipped_emits_one_triangle() {
        let mesh = single_triangle([
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -0.5),
            Vec3::new(0.0, 1.0, -0.5),
        ]);
        let camera = Camera::new(Vec3::ZERO);
        let mut stream = ProjectedStream::new();
        clip_and_project(&mesh, &Transform::default(), &camera, (4.0, 4.0), &mut stream);
        assert_eq!(stream.indices.len(), 3);
    }

    #[test]
    fn ndc_origin_projects_to_screen_center() {
        let screen = (800.0, 600.0);
        let p = view_to_screen(Vec3::new(0.0, 0.0, 5.0), screen, ::math::PI / 2.0);
        assert!((p.x - 400.0).abs() < 0.5);
        assert!((p.y - 300.0).abs() < 0.5);
    }
}
