//! A real-time, CPU-only triangle rasterizer.
//!
//! This crate converts 3D meshes, camera/world transforms, and a single
//! directional light into shaded pixels without any GPU API. SDL2 is used
//! only to display the finished frame; all rasterization happens on the
//! CPU, optionally parallelized across a fixed worker pool that owns
//! disjoint screen bands.
//!
//! # Quick Start
//!
//! ```ignore
//! use softrast::prelude::*;
//!
//! let mut canvas = SdlCanvas::create(1024, 768, "softrast")?;
//! let mut renderer = Renderer::new(1024, 768);
//! let light = DirectionalLight::new(
//!     Vec4::direction(0.0, 1.0, 1.0),
//!     Color::WHITE,
//!     Color::splat(0.2),
//! );
//! let mut mesh = Mesh::cube(1.0);
//! mesh.world = Mat4::translation(0.0, 0.0, -4.0);
//!
//! while canvas.check_input() {
//!     renderer.begin_frame(&mut canvas);
//!     renderer.render_mesh(&mesh, &Mat4::identity(), &light);
//!     renderer.present(&mut canvas);
//! }
//! ```

pub mod canvas;
pub mod colors;
pub mod depth;
pub mod framebuffer;
pub mod light;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod pool;
pub mod raster;
pub mod renderer;

// Re-export commonly needed types at crate root for convenience
pub use light::DirectionalLight;
pub use mesh::{LoadError, Mesh, Vertex};
pub use pool::WorkerPool;
pub use renderer::Renderer;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softrast::prelude::*;
/// ```
pub mod prelude {
    // Canvas & input
    pub use crate::canvas::{BufferCanvas, Canvas, Key, SdlCanvas};

    // Colors
    pub use crate::colors::Color;

    // Lighting
    pub use crate::light::DirectionalLight;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec4::Vec4;

    // Meshes
    pub use crate::mesh::{LoadError, Mesh, Vertex};

    // Rendering
    pub use crate::renderer::Renderer;

    // Scheduling
    pub use crate::pool::WorkerPool;
}
