//! Mesh and vertex types plus scene-geometry factories.
//!
//! A mesh owns its source vertices and a triangle index list. The index
//! list sits behind an `Arc` so per-frame rasterization jobs can share it
//! across worker threads without copying the geometry.
//!
//! # Winding
//!
//! Front faces wind counter-clockwise when viewed from outside the surface
//! (the usual convention, matching OBJ files). The viewport y-flip turns
//! that into a positive screen-space signed area, which is what the
//! rasterizer's backface cull keeps.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::colors::Color;
use crate::math::mat4::Mat4;
use crate::math::vec4::Vec4;

/// A single mesh vertex. The position is in mesh space here; the vertex
/// pipeline produces the screen-space form once per frame.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub position: Vec4,
    pub normal: Vec4,
    pub color: Color,
}

impl Vertex {
    pub fn new(position: Vec4, normal: Vec4, color: Color) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// Triangle mesh with a per-mesh world transform and lighting coefficients.
#[derive(Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Arc<Vec<[u32; 3]>>,
    /// Mesh-to-world transform, updated by the caller between frames.
    pub world: Mat4,
    /// Ambient reflection coefficient.
    pub ka: f32,
    /// Diffuse reflection coefficient.
    pub kd: f32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles: Arc::new(triangles),
            world: Mat4::identity(),
            ka: 1.0,
            kd: 1.0,
        }
    }

    /// Axis-aligned cube centered on the origin with distinct face colors.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut triangles = Vec::with_capacity(12);

        // Corners listed counter-clockwise as seen from outside each face
        push_face(
            &mut vertices,
            &mut triangles,
            [
                Vec4::point(-h, -h, h),
                Vec4::point(h, -h, h),
                Vec4::point(h, h, h),
                Vec4::point(-h, h, h),
            ],
            Vec4::direction(0.0, 0.0, 1.0),
            Color::new(0.9, 0.2, 0.2),
        );
        push_face(
            &mut vertices,
            &mut triangles,
            [
                Vec4::point(h, -h, -h),
                Vec4::point(-h, -h, -h),
                Vec4::point(-h, h, -h),
                Vec4::point(h, h, -h),
            ],
            Vec4::direction(0.0, 0.0, -1.0),
            Color::new(0.2, 0.9, 0.2),
        );
        push_face(
            &mut vertices,
            &mut triangles,
            [
                Vec4::point(h, -h, h),
                Vec4::point(h, -h, -h),
                Vec4::point(h, h, -h),
                Vec4::point(h, h, h),
            ],
            Vec4::direction(1.0, 0.0, 0.0),
            Color::new(0.2, 0.2, 0.9),
        );
        push_face(
            &mut vertices,
            &mut triangles,
            [
                Vec4::point(-h, -h, -h),
                Vec4::point(-h, -h, h),
                Vec4::point(-h, h, h),
                Vec4::point(-h, h, -h),
            ],
            Vec4::direction(-1.0, 0.0, 0.0),
            Color::new(0.9, 0.9, 0.2),
        );
        push_face(
            &mut vertices,
            &mut triangles,
            [
                Vec4::point(-h, h, h),
                Vec4::point(h, h, h),
                Vec4::point(h, h, -h),
                Vec4::point(-h, h, -h),
            ],
            Vec4::direction(0.0, 1.0, 0.0),
            Color::new(0.2, 0.9, 0.9),
        );
        push_face(
            &mut vertices,
            &mut triangles,
            [
                Vec4::point(-h, -h, -h),
                Vec4::point(h, -h, -h),
                Vec4::point(h, -h, h),
                Vec4::point(-h, -h, h),
            ],
            Vec4::direction(0.0, -1.0, 0.0),
            Color::new(0.9, 0.2, 0.9),
        );

        Self::new(vertices, triangles)
    }

    /// UV sphere centered on the origin. `rings` are latitude subdivisions
    /// (>= 2), `segments` longitude subdivisions (>= 3).
    pub fn sphere(radius: f32, rings: u32, segments: u32) -> Self {
        use std::f32::consts::PI;

        let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
        for i in 0..=rings {
            let theta = PI * i as f32 / rings as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            for j in 0..=segments {
                let phi = 2.0 * PI * j as f32 / segments as f32;
                let (sin_p, cos_p) = phi.sin_cos();
                let normal = Vec4::direction(sin_t * cos_p, cos_t, sin_t * sin_p);
                vertices.push(Vertex::new(
                    Vec4::point(normal.x * radius, normal.y * radius, normal.z * radius),
                    normal,
                    Color::WHITE,
                ));
            }
        }

        let stride = segments + 1;
        let mut triangles = Vec::with_capacity((rings * segments * 2) as usize);
        for i in 0..rings {
            for j in 0..segments {
                let a = i * stride + j;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                // Pole rows produce zero-area triangles the rasterizer skips
                triangles.push([d, c, a]);
                triangles.push([d, a, b]);
            }
        }

        Self::new(vertices, triangles)
    }

    /// Flat rectangle in the z=0 plane spanning (x0, y0) to (x1, y1),
    /// facing +z.
    pub fn rectangle(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let mut vertices = Vec::with_capacity(4);
        let mut triangles = Vec::with_capacity(2);
        push_face(
            &mut vertices,
            &mut triangles,
            [
                Vec4::point(x0, y0, 0.0),
                Vec4::point(x1, y0, 0.0),
                Vec4::point(x1, y1, 0.0),
                Vec4::point(x0, y1, 0.0),
            ],
            Vec4::direction(0.0, 0.0, 1.0),
            Color::WHITE,
        );
        Self::new(vertices, triangles)
    }

    /// Load all geometry from an OBJ file into a single mesh.
    ///
    /// OBJ front faces are counter-clockwise, matching this crate's
    /// convention, so indices are taken as-is. Missing normals are
    /// reconstructed by area-weighted face-normal accumulation. Vertex
    /// colors default to white; use lighting and the ka/kd coefficients
    /// for surface response.
    pub fn from_obj(path: &str) -> Result<Self, LoadError> {
        let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;

        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for model in &models {
            let mesh = &model.mesh;
            let base = vertices.len() as u32;
            let has_normals = !mesh.normals.is_empty();

            for (i, p) in mesh.positions.chunks_exact(3).enumerate() {
                let normal = if has_normals {
                    Vec4::direction(
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    )
                } else {
                    Vec4::direction(0.0, 0.0, 0.0)
                };
                vertices.push(Vertex::new(
                    Vec4::point(p[0], p[1], p[2]),
                    normal,
                    Color::WHITE,
                ));
            }

            for tri in mesh.indices.chunks_exact(3) {
                triangles.push([base + tri[0], base + tri[1], base + tri[2]]);
            }
        }

        if triangles.is_empty() {
            return Err(LoadError::NoGeometry);
        }

        let needs_normals = vertices.iter().any(|v| v.normal.dot(v.normal) == 0.0);
        if needs_normals {
            accumulate_normals(&mut vertices, &triangles);
        }

        log::debug!(
            "loaded OBJ mesh: {} vertices, {} triangles",
            vertices.len(),
            triangles.len()
        );
        Ok(Self::new(vertices, triangles))
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Append one quad face as two counter-clockwise triangles.
fn push_face(
    vertices: &mut Vec<Vertex>,
    triangles: &mut Vec<[u32; 3]>,
    corners: [Vec4; 4],
    normal: Vec4,
    color: Color,
) {
    let base = vertices.len() as u32;
    for corner in corners {
        vertices.push(Vertex::new(corner, normal, color));
    }
    triangles.push([base, base + 1, base + 2]);
    triangles.push([base, base + 2, base + 3]);
}

/// Rebuild vertex normals from area-weighted face normals.
fn accumulate_normals(vertices: &mut [Vertex], triangles: &[[u32; 3]]) {
    for tri in triangles {
        let [a, b, c] = tri.map(|i| vertices[i as usize].position);
        // Counter-clockwise winding: the cross product faces outward
        let face = (b - a).cross(c - a);
        for &i in tri {
            let n = &mut vertices[i as usize].normal;
            *n = Vec4::direction(n.x + face.x, n.y + face.y, n.z + face.z);
        }
    }
    for v in vertices.iter_mut() {
        if v.normal.dot(v.normal) > 0.0 {
            v.normal = v.normal.normalized();
        }
    }
}

/// Error loading mesh geometry from disk.
#[derive(Debug)]
pub enum LoadError {
    /// The OBJ parser failed (includes unreadable files).
    Obj(tobj::LoadError),
    /// The file parsed but contained no triangles.
    NoGeometry,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "failed to load OBJ: {e}"),
            LoadError::NoGeometry => write!(f, "OBJ file contains no triangles"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Obj(e) => Some(e),
            LoadError::NoGeometry => None,
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}
