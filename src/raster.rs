//! Tiled, parallel rasterization.
//!
//! The frame is partitized into fixed-size tiles; a pool of worker
//! threads pulls tiles off a shared atomic counter (work-stealing —
//! a worker that finishes a cheap tile early just grabs the next one)
//! and rasterizes every triangle against its own tile independently.
//! Tiles own disjoint pixel ranges, so two workers never write the same
//! color/depth cell — that's what lets `parallel::TrustedThreadSafe`
//! hand out concurrent `&mut` views of the same buffers safely.

use std::sync::atomic::{AtomicUsize, Ordering};

use scoped_threadpool::Pool;

use color::pack_abgr;
use math::{Vec2, Vec3};
use parallel::TrustedThreadSafe;
use setup::{edge, TriangleSetup};
use shader::Shader;

pub const TILE_SIZE: i32 = 64;

/// Barycentric weights are accepted slightly negative so that shared
/// edges between adjacent triangles don't leave a hairline gap of
/// unshaded pixels — the classic top-left-rule substitute.
const EDGE_EPSILON: f32 = -1e-4;

#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// Partition a `width x height` frame into `TILE_SIZE`-square tiles,
/// clipped to the frame at the right and bottom edges.
pub fn build_tiles(width: usize, height: usize) -> Vec<Tile> {
    let (width, height) = (width as i32, height as i32);
    let mut tiles = Vec::new();
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            tiles.push(Tile {
                x0: x,
                y0: y,
                x1: (x + TILE_SIZE).min(width),
                y1: (y + TILE_SIZE).min(height),
            });
            x += TILE_SIZE;
        }
        y += TILE_SIZE;
    }
    tiles
}

/// Rasterize every triangle in `triangles` into `color_buffer`/
/// `depth_buffer`, both row-major with stride `width`. `depth_buffer`
/// must already hold the previous pass's depths (or `f32::INFINITY` for
/// a fresh frame) — the test here is strictly-less-than, so a pixel
/// exactly tied with what's already there keeps the earlier draw.
pub fn rasterize(
    pool: &mut Pool,
    worker_count: u32,
    triangles: &[TriangleSetup],
    shader: &Shader,
    width: usize,
    height: usize,
    color_buffer: &mut [u32],
    depth_buffer: &mut [f32],
) {
    let tiles = build_tiles(width, height);
    let next_tile = AtomicUsize::new(0);
    let color_cell = TrustedThreadSafe::new(color_buffer);
    let depth_cell = TrustedThreadSafe::new(depth_buffer);

    pool.scoped(|scope| {
        for _ in 0..worker_count {
            let tiles = &tiles;
            let next_tile = &next_tile;
            let color_cell = &color_cell;
            let depth_cell = &depth_cell;

            scope.execute(move || loop {
                let i = next_tile.fetch_add(1, Ordering::Relaxed);
                if i >= tiles.len() {
                    break;
                }
                rasterize_tile(&tiles[i], triangles, shader, width, color_cell.as_mut(), depth_cell.as_mut());
            });
        }
    });
}

fn rasterize_tile(
    tile: &Tile,
    triangles: &[TriangleSetup],
    shader: &Shader,
    width: usize,
    color_buffer: &mut [u32],
    depth_buffer: &mut [f32],
) {
    for tri in triangles {
        let min_x = tri.min.x.max(tile.x0 as f32).floor() as i32;
        let min_y = tri.min.y.max(tile.y0 as f32).floor() as i32;
        let max_x = tri.max.x.min((tile.x1 - 1) as f32).floor() as i32;
        let max_y = tri.max.y.min((tile.y1 - 1) as f32).floor() as i32;

        if min_x > max_x || min_y > max_y {
            continue;
        }

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

                let w0 = edge(tri.p1, tri.p2, p);
                let w1 = edge(tri.p2, tri.p0, p);
                let w2 = edge(tri.p0, tri.p1, p);

                let b0 = w0 * tri.inv_denom;
                let b1 = w1 * tri.inv_denom;
                let b2 = w2 * tri.inv_denom;

                if b0 < EDGE_EPSILON || b1 < EDGE_EPSILON || b2 < EDGE_EPSILON {
                    continue;
                }

                let inv_depth = b0 * tri.inv_depth[0] + b1 * tri.inv_depth[1] + b2 * tri.inv_depth[2];
                let depth = 1.0 / inv_depth;

                let pixel_index = y as usize * width + x as usize;
                if depth < depth_buffer[pixel_index] {
                    let uv_over_z = tri.uv_over_z[0] * b0 + tri.uv_over_z[1] * b1 + tri.uv_over_z[2] * b2;
                    let normal_over_z = tri.normal_over_z[0] * b0 + tri.normal_over_z[1] * b1 + tri.normal_over_z[2] * b2;

                    let uv = uv_over_z * depth;
                    let normal = normal_over_z * depth;

                    let color = shader.shade(Vec3::new(p.x, p.y, depth), normal, uv);

                    color_buffer[pixel_index] = pack_abgr(color);
                    depth_buffer[pixel_index] = depth;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clip::ProjectedStream;
    use setup::build_triangle_setup;

    #[test]
    fn tiles_cover_frame_without_overlap() {
        let tiles = build_tiles(130, 65);
        assert_eq!(tiles.len(), 3 * 2);
        let last = tiles.last().unwrap();
        assert_eq!(last.x1, 130);
        assert_eq!(last.y1, 65);
    }

    fn setup_full_screen_triangle(width: f32, height: f32, depth: f32) -> TriangleSetup {
        let mut stream = ProjectedStream::new();
        stream.positions = vec![Vec2::new(-10.0, -10.0), Vec2::new(width * 3.0, -10.0), Vec2::new(-10.0, height * 3.0)];
        stream.uvs = vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        stream.normals = vec![Vec3::new(0.0, 0.0, 1.0); 3];
        stream.depths = vec![depth; 3];
        stream.indices = vec![0, 1, 2];
        build_triangle_setup(&stream, (width, height)).remove(0)
    }

    #[test]
    fn single_tile_draw_covers_pixel() {
        let tri = setup_full_screen_triangle(16.0, 16.0, 2.0);
        let shader = Shader::Lit { light_dir: Vec3::new(0.0, 0.0, 1.0) };
        let mut color = vec![0u32; 16 * 16];
        let mut depth = vec![::std::f32::INFINITY; 16 * 16];
        let tile = Tile { x0: 0, y0: 0, x1: 16, y1: 16 };
        rasterize_tile(&tile, &[tri], &shader, 16, &mut color, &mut depth);
        assert_ne!(color[8 * 16 + 8], 0);
        assert!(depth[8 * 16 + 8] < ::std::f32::INFINITY);
    }

    #[test]
    fn nearer_triangle_wins_depth_test() {
        let far = setup_full_screen_triangle(8.0, 8.0, 10.0);
        let near = setup_full_screen_triangle(8.0, 8.0, 2.0);
        let shader = Shader::Lit { light_dir: Vec3::new(0.0, 0.0, 1.0) };
        let mut color = vec![0u32; 8 * 8];
        let mut depth = vec![::std::f32::INFINITY; 8 * 8];
        let tile = Tile { x0: 0, y0: 0, x1: 8, y1: 8 };
        rasterize_tile(&tile, &[far], &shader, 8, &mut color, &mut depth);
        rasterize_tile(&tile, &[near], &shader, 8, &mut color, &mut depth);
        assert!((depth[4 * 8 + 4] - 2.0).abs() < 1e-3);
    }

    #[test]
    fn rendering_by_tiles_matches_rendering_as_one_tile() {
        // A triangle whose bounding box straddles the x=16 boundary,
        // rasterized once as a single 32-wide tile and once as two
        // 16-wide tiles; both must produce identical buffers.
        let mut stream = ProjectedStream::new();
        stream.positions = vec![Vec2::new(4.0, 4.0), Vec2::new(28.0, 8.0), Vec2::new(12.0, 28.0)];
        stream.uvs = vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        stream.normals = vec![Vec3::new(0.0, 0.0, 1.0); 3];
        stream.depths = vec![2.0, 3.0, 4.0];
        stream.indices = vec![0, 1, 2];
        let tri = build_triangle_setup(&stream, (32.0, 32.0)).remove(0);
        let shader = Shader::Lit { light_dir: Vec3::new(0.2, 0.3, 0.9) };

        let mut color_one_tile = vec![0u32; 32 * 32];
        let mut depth_one_tile = vec![::std::f32::INFINITY; 32 * 32];
        let single = Tile { x0: 0, y0: 0, x1: 32, y1: 32 };
        rasterize_tile(&single, &[tri], &shader, 32, &mut color_one_tile, &mut depth_one_tile);

        let mut color_tiled = vec![0u32; 32 * 32];
        let mut depth_tiled = vec![::std::f32::INFINITY; 32 * 32];
        for tile in &[
            Tile { x0: 0, y0: 0, x1: 16, y1: 16 },
            Tile { x0: 16, y0: 0, x1: 32, y1: 16 },
            Tile { x0: 0, y0: 16, x1: 16, y1: 32 },
            Tile { x0: 16, y0: 16, x1: 32, y1: 32 },
        ] {
            rasterize_tile(tile, &[tri], &shader, 32, &mut color_tiled, &mut depth_tiled);
        }

        assert_eq!(color_one_tile, color_tiled);
        assert_eq!(depth_one_tile, depth_tiled);
    }

    #[test]
    fn farther_triangle_drawn_second_does_not_overwrite() {
        let near = setup_full_screen_triangle(8.0, 8.0, 2.0);
        let far = setup_full_screen_triangle(8.0, 8.0, 10.0);
        let shader = Shader::Lit { light_dir: Vec3::new(0.0, 0.0, 1.0) };
        let mut color = vec![0u32; 8 * 8];
        let mut depth = vec![::std::f32::INFINITY; 8 * 8];
        let tile = Tile { x0: 0, y0: 0, x1: 8, y1: 8 };
        rasterize_tile(&tile, &[near], &shader, 8, &mut color, &mut depth);
        rasterize_tile(&tile, &[far], &shader, 8, &mut color, &mut depth);
        assert!((depth[4 * 8 + 4] - 2.0).abs() < 1e-3);
    }
}
