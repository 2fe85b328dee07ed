//! Indexed triangle mesh: the core's sole geometry input.

use error::{RenderError, RenderResult};
use math::{Vec2, Vec3};

/// Three equal-length attribute streams plus a flat triangle index list.
///
/// `max(indices) < positions.len()` is a documented caller precondition,
/// not something `Mesh` validates — spec treats an out-of-bounds vertex
/// index as undefined behavior, the caller's responsibility. What `Mesh`
/// does validate at construction is the cheap, always-checkable shape
/// invariant: the three attribute streams agree in length, and the index
/// count is a multiple of 3.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, normals: Vec<Vec3>, indices: Vec<u32>) -> RenderResult<Mesh> {
        if positions.len() != uvs.len() || positions.len() != normals.len() {
            return Err(RenderError::MeshAttributeLengthMismatch);
        }
        if indices.len() % 3 != 0 {
            return Err(RenderError::IndexCountNotMultipleOfThree(indices.len()));
        }
        Ok(Mesh { positions, uvs, normals, indices })
    }

    pub fn triangle_count(&self) -> usize { self.indices.len() / 3 }

    /// Model-space axis-aligned bounding box of the position stream, used
    /// by the engine's cheap per-model visibility cull. Returns `None` for
    /// an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for &p in iter {
            min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![Vec2::ZERO; 4],
            vec![Vec3::new(0.0, 0.0, 1.0); 4],
            vec![0, 1, 2, 0, 2, 3],
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_attribute_lengths() {
        let result = Mesh::new(vec![Vec3::ZERO; 3], vec![Vec2::ZERO; 2], vec![Vec3::ZERO; 3], vec![0, 1, 2]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_index_count_not_multiple_of_three() {
        let result = Mesh::new(vec![Vec3::ZERO; 3], vec![Vec2::ZERO; 3], vec![Vec3::ZERO; 3], vec![0, 1]);
        assert!(result.is_err());
    }

    #[test]
    fn triangle_count_and_bounds() {
        let mesh = quad();
        assert_eq!(mesh.triangle_count(), 2);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn bounds_of_empty_mesh_is_none() {
        let mesh = Mesh::new(vec![], vec![], vec![], vec![]).unwrap();
        assert!(mesh.bounds().is_none());
    }
}
