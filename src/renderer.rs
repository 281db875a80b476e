//! Frame orchestrator.
//!
//! Drives the per-frame pipeline: compose `projection * camera * world`,
//! run the vertex pipeline once per mesh, rasterize into the band-
//! partitioned frame target (serially or across the worker pool), and
//! commit finished pixels to the external canvas.
//!
//! # Concurrency
//!
//! Parallel work is partitioned by disjoint screen bands rather than
//! triangle ranges: one job per band rasterizes the whole mesh clamped to
//! its rows, so no two jobs can ever touch the same pixel and the
//! depth-test-then-write sequence needs no per-pixel synchronization. The
//! serial and parallel paths produce identical frames.
//!
//! Between `submit` and `wait_idle` the jobs share the vertex cache, the
//! triangle index list and the light; `wait_idle` must return before any
//! of that per-frame state is touched again.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use crate::canvas::Canvas;
use crate::colors;
use crate::framebuffer::FrameTarget;
use crate::light::DirectionalLight;
use crate::math::mat4::Mat4;
use crate::mesh::Mesh;
use crate::pipeline;
use crate::pool::WorkerPool;
use crate::raster;

const DEFAULT_FOV: f32 = FRAC_PI_2;
const DEFAULT_NEAR: f32 = 0.1;
const DEFAULT_FAR: f32 = 100.0;

pub struct Renderer {
    projection: Mat4,
    target: FrameTarget,
    pool: WorkerPool,
    parallel: bool,
}

impl Renderer {
    /// Renderer with one worker (and one band) per hardware thread.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pool(width, height, WorkerPool::with_default_size())
    }

    /// Renderer with an explicit worker count, for tests and benchmarks.
    pub fn with_workers(width: u32, height: u32, workers: usize) -> Self {
        Self::with_pool(width, height, WorkerPool::new(workers))
    }

    fn with_pool(width: u32, height: u32, pool: WorkerPool) -> Self {
        let aspect = width as f32 / height as f32;
        log::info!(
            "renderer: {width}x{height}, {} band(s)/worker(s)",
            pool.worker_count()
        );
        Self {
            projection: Mat4::perspective(DEFAULT_FOV, aspect, DEFAULT_NEAR, DEFAULT_FAR),
            target: FrameTarget::new(width, height, pool.worker_count()),
            pool,
            parallel: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Switch between single-threaded and pooled rasterization. Both paths
    /// render identical frames; this is a performance choice only.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Replace the projection, keeping the frame's aspect ratio.
    pub fn set_perspective(&mut self, fov: f32, near: f32, far: f32) {
        let aspect = self.width() as f32 / self.height() as f32;
        self.projection = Mat4::perspective(fov, aspect, near, far);
    }

    /// Start a frame: clear the external canvas and reset the frame
    /// target's color and depth storage.
    pub fn begin_frame(&mut self, canvas: &mut dyn Canvas) {
        canvas.clear();
        self.target.clear(colors::BACKGROUND);
    }

    /// Rasterize one mesh into the current frame.
    ///
    /// Does not return until every band job for this mesh has drained, so
    /// callers may mutate mesh transforms freely between calls.
    pub fn render_mesh(&mut self, mesh: &Mesh, camera: &Mat4, light: &DirectionalLight) {
        let combined = self.projection * *camera * mesh.world;
        let light = light.normalized();
        let cache = Arc::new(pipeline::process_vertices(
            mesh,
            &combined,
            self.width(),
            self.height(),
        ));
        let (ka, kd) = (mesh.ka, mesh.kd);

        if self.parallel {
            for band in self.target.bands() {
                let band = Arc::clone(band);
                let cache = Arc::clone(&cache);
                let triangles = Arc::clone(&mesh.triangles);
                self.pool.submit(move || {
                    let mut band = band.lock().unwrap();
                    raster::rasterize_mesh(&mut band, &triangles, &cache, &light, ka, kd);
                });
            }
            self.pool.wait_idle();
        } else {
            for band in self.target.bands() {
                let mut band = band.lock().unwrap();
                raster::rasterize_mesh(&mut band, &mesh.triangles, &cache, &light, ka, kd);
            }
        }
    }

    /// Commit the finished frame: draw every pixel to the canvas and
    /// present it.
    pub fn present(&self, canvas: &mut dyn Canvas) {
        for band in self.target.bands() {
            let band = band.lock().unwrap();
            let (y_start, y_end) = band.y_range();
            let width = band.width();
            let pixels = band.pixels();
            for y in y_start..y_end {
                let row = &pixels[((y - y_start) * width) as usize..][..width as usize];
                for (x, &color) in row.iter().enumerate() {
                    canvas.draw(x as u32, y, color);
                }
            }
        }
        canvas.present();
    }

    /// Color at a pixel of the current frame (test helper).
    pub fn color_at(&self, x: u32, y: u32) -> u32 {
        self.target.color_at(x, y)
    }

    /// Depth at a pixel of the current frame (test helper).
    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.target.depth_at(x, y)
    }
}
