//! Triangle setup: turns a clipped, projected triangle into the
//! precomputed record the rasterizer walks pixel-by-pixel.

use clip::ProjectedStream;
use math::{Vec2, Vec3};

/// Triangles whose screen-space area falls below this are degenerate —
/// a sliver too thin to safely divide by, or already facing away after
/// clipping collapsed it to a line. Dropped silently, same as a
/// fully-clipped triangle.
const MIN_DENOM: f32 = 1e-5;

/// Everything the rasterizer needs for one triangle, with per-vertex
/// attributes already premultiplied by reciprocal view-space depth so
/// that interpolating them screen-linearly and dividing by interpolated
/// `inv_depth` gives perspective-correct results (spec §4.3).
#[derive(Debug, Clone, Copy)]
pub struct TriangleSetup {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,

    pub min: Vec2,
    pub max: Vec2,

    /// `1 / view_z` at each vertex.
    pub inv_depth: [f32; 3],
    /// `uv / view_z` at each vertex.
    pub uv_over_z: [Vec2; 3],
    /// `normal / view_z` at each vertex.
    pub normal_over_z: [Vec3; 3],

    /// Reciprocal of the doubled signed area, cached so the rasterizer's
    /// per-pixel barycentric divide becomes a multiply.
    pub inv_denom: f32,
}

/// Build one `TriangleSetup` per triangle remaining in `stream`, dropping
/// degenerate ones (zero or near-zero screen-space area).
pub fn build_triangle_setup(stream: &ProjectedStream, screen: (f32, f32)) -> Vec<TriangleSetup> {
    let mut out = Vec::with_capacity(stream.indices.len() / 3);

    for tri in stream.indices.chunks(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);

        let p0 = stream.positions[ia];
        let p1 = stream.positions[ib];
        let p2 = stream.positions[ic];

        let denom = edge(p0, p1, p2);
        if denom.abs() < MIN_DENOM {
            trace!("degenerate triangle dropped, denom = {}", denom);
            continue;
        }

        let min = Vec2::new(
            p0.x.min(p1.x).min(p2.x).max(0.0),
            p0.y.min(p1.y).min(p2.y).max(0.0),
        );
        let max = Vec2::new(
            p0.x.max(p1.x).max(p2.x).min(screen.0 - 1.0),
            p0.y.max(p1.y).max(p2.y).min(screen.1 - 1.0),
        );
        if min.x > max.x || min.y > max.y {
            continue;
        }

        let depths = [stream.depths[ia], stream.depths[ib], stream.depths[ic]];
        let inv_depth = [1.0 / depths[0], 1.0 / depths[1], 1.0 / depths[2]];

        let uv_over_z = [
            stream.uvs[ia] * inv_depth[0],
            stream.uvs[ib] * inv_depth[1],
            stream.uvs[ic] * inv_depth[2],
        ];
        let normal_over_z = [
            stream.normals[ia] * inv_depth[0],
            stream.normals[ib] * inv_depth[1],
            stream.normals[ic] * inv_depth[2],
        ];

        out.push(TriangleSetup {
            p0,
            p1,
            p2,
            min,
            max,
            inv_depth,
            uv_over_z,
            normal_over_z,
            inv_denom: 1.0 / denom,
        });
    }

    out
}

/// Doubled signed area of the triangle `(a, b, c)`; also the edge
/// function used to compute barycentric weights in the rasterizer.
#[inline]
pub fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clip::ProjectedStream;

    fn stream_for(p0: Vec2, p1: Vec2, p2: Vec2) -> ProjectedStream {
        let mut s = ProjectedStream::new();
        s.positions = vec![p0, p1, p2];
        s.uvs = vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        s.normals = vec![Vec3::new(0.0, 0.0, 1.0); 3];
        s.depths = vec![1.0, 2.0, 3.0];
        s.indices = vec![0, 1, 2];
        s
    }

    #[test]
    fn builds_one_setup_for_nondegenerate_triangle() {
        let stream = stream_for(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0));
        let setups = build_triangle_setup(&stream, (100.0, 100.0));
        assert_eq!(setups.len(), 1);
        assert!((setups[0].inv_depth[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn drops_zero_area_triangle() {
        let stream = stream_for(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0));
        let setups = build_triangle_setup(&stream, (100.0, 100.0));
        assert!(setups.is_empty());
    }

    #[test]
    fn bounds_clamped_to_screen() {
        let stream = stream_for(Vec2::new(-50.0, -50.0), Vec2::new(150.0, 0.0), Vec2::new(0.0, 150.0));
        let setups = build_triangle_setup(&stream, (100.0, 100.0));
        assert_eq!(setups.len(), 1);
        assert_eq!(setups[0].min, Vec2::new(0.0, 0.0));
        assert_eq!(setups[0].max, Vec2::new(99.0, 99.0));
    }

    #[test]
    fn uv_premultiplied_by_inverse_depth() {
        let stream = stream_for(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0));
        let setups = build_triangle_setup(&stream, (100.0, 100.0));
        let expected = Vec2::new(1.0, 0.0) * (1.0 / 2.0);
        assert!((setups[0].uv_over_z[1].x - expected.x).abs() < 1e-6);
    }
}
