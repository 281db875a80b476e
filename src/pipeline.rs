//! Per-frame vertex pipeline.
//!
//! Transforms every unique source vertex of a mesh exactly once per frame
//! and caches the result by vertex index, so triangles that share vertices
//! reuse one transform instead of recomputing it. The cache is rebuilt
//! every frame because the world and camera transforms change per frame.

use crate::math::mat4::Mat4;
use crate::mesh::{Mesh, Vertex};

/// Transform a mesh's vertices into screen space.
///
/// `combined` must be `projection * camera * world`. For each vertex:
/// - position goes through `combined`, the perspective divide, and the
///   NDC-to-pixel viewport mapping with a y flip (screen origin is
///   top-left, NDC y points up); z keeps its normalized depth.
/// - the normal is transformed by `world` alone and re-normalized.
///   Transforms are assumed rigid or uniformly scaled, so no
///   inverse-transpose correction is needed.
/// - the color is copied unchanged.
pub fn process_vertices(mesh: &Mesh, combined: &Mat4, width: u32, height: u32) -> Vec<Vertex> {
    let half_width = 0.5 * width as f32;
    let half_height = 0.5 * height as f32;

    mesh.vertices
        .iter()
        .map(|v| {
            let mut p = (*combined * v.position).divide_w();
            p.x = (p.x + 1.0) * half_width;
            p.y = height as f32 - (p.y + 1.0) * half_height;

            let normal = (mesh.world * v.normal).normalized();
            Vertex::new(p, normal, v.color)
        })
        .collect()
}
