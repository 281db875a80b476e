//! Demo scenes for the software rasterizer.
//!
//! Run with an optional scene name and RNG seed:
//!
//! ```text
//! softrast [helix|columns|single] [seed]
//! ```
//!
//! `helix` (the default) flies the camera through 1600 spinning cubes and
//! spheres arranged in a twisted corridor; `columns` is a lighter
//! two-column variant; `single` is a sphere steered with W/A/S/D/Q/E.

use std::time::Instant;

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use softrast::prelude::*;

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;
const DEFAULT_SEED: u64 = 0x50F7_4A57;

/// Per-mesh rotation increments applied every frame.
struct Spin {
    x: f32,
    y: f32,
    z: f32,
}

impl Spin {
    fn random(rng: &mut StdRng) -> Self {
        Self {
            x: rng.gen_range(-0.1..0.1),
            y: rng.gen_range(-0.1..0.1),
            z: rng.gen_range(-0.1..0.1),
        }
    }
}

fn scene_light() -> DirectionalLight {
    DirectionalLight::new(
        Vec4::direction(0.0, 1.0, 1.0),
        Color::WHITE,
        Color::splat(0.2),
    )
}

/// A corridor of rings: 16 meshes per ring, 100 rings, every 5th mesh a
/// sphere, each ring twisted a little further than the last.
fn build_helix(rng: &mut StdRng) -> (Vec<Mesh>, Vec<Spin>) {
    use std::f32::consts::TAU;

    let rings = 100u32;
    let per_ring = 16u32;
    let ring_radius = 6.0;
    let ring_depth = 3.5;

    let mut meshes = Vec::with_capacity((rings * per_ring) as usize);
    let mut spins = Vec::with_capacity((rings * per_ring) as usize);
    for i in 0..rings {
        let twist = i as f32 * 0.2;
        for j in 0..per_ring {
            let mut mesh = if (i * per_ring + j) % 5 == 0 {
                Mesh::sphere(1.0, 15, 15)
            } else {
                Mesh::cube(1.0)
            };

            let theta = j as f32 / per_ring as f32 * TAU + twist;
            let x = theta.cos() * ring_radius;
            let y = theta.sin() * ring_radius;
            let z = -ring_depth * i as f32;
            mesh.world = Mat4::translation(x, y, z);

            meshes.push(mesh);
            spins.push(Spin::random(rng));
        }
    }
    (meshes, spins)
}

/// Two columns of cubes with a random initial orientation each.
fn build_columns(rng: &mut StdRng) -> (Vec<Mesh>, Vec<Spin>) {
    use std::f32::consts::TAU;

    let mut meshes = Vec::new();
    let mut spins = Vec::new();
    for i in 0..20 {
        for x in [-2.0, 2.0] {
            let mut mesh = Mesh::cube(1.0);
            let orient = match rng.gen_range(0..3u32) {
                0 => Mat4::rotate_x(rng.gen_range(0.0..TAU)),
                1 => Mat4::rotate_y(rng.gen_range(0.0..TAU)),
                _ => Mat4::rotate_z(rng.gen_range(0.0..TAU)),
            };
            mesh.world = Mat4::translation(x, 0.0, -3.0 * i as f32) * orient;
            meshes.push(mesh);
            spins.push(Spin::random(rng));
        }
    }
    (meshes, spins)
}

/// Fly the camera back and forth through a corridor scene, spinning every
/// mesh each frame and logging the time per sweep cycle.
fn run_corridor(canvas: &mut SdlCanvas, meshes: &mut [Mesh], spins: &[Spin], depth: f32) {
    let mut renderer = Renderer::new(WIDTH, HEIGHT);
    let light = scene_light();

    let mut zoffset = 8.0f32;
    let mut step = -0.15f32;
    let max_depth = -depth + 10.0;

    let mut cycle = 0u32;
    let mut cycle_start = Instant::now();

    while canvas.check_input() {
        let camera = Mat4::translation(0.0, 0.0, -zoffset);

        for (mesh, spin) in meshes.iter_mut().zip(spins) {
            mesh.world = mesh.world * Mat4::rotate_xyz(spin.x, spin.y, spin.z);
        }

        zoffset += step;
        if zoffset < max_depth || zoffset > 8.0 {
            step = -step;
            cycle += 1;
            if cycle % 2 == 0 {
                log::info!(
                    "sweep {} took {:.1} ms",
                    cycle / 2,
                    cycle_start.elapsed().as_secs_f64() * 1000.0
                );
                cycle_start = Instant::now();
            }
        }

        renderer.begin_frame(canvas);
        for mesh in meshes.iter() {
            renderer.render_mesh(mesh, &camera, &light);
        }
        renderer.present(canvas);
    }
}

/// Single sphere steered with W/A/S/D (x/y) and Q/E (z).
fn run_single(canvas: &mut SdlCanvas) {
    let mut renderer = Renderer::new(WIDTH, HEIGHT);
    let light = scene_light();
    let camera = Mat4::identity();

    let mut sphere = Mesh::sphere(1.0, 10, 20);
    let (mut x, mut y, mut z) = (0.0f32, 0.0f32, -4.0f32);

    while canvas.check_input() {
        if canvas.key_pressed(Key::A) {
            x -= 0.1;
        }
        if canvas.key_pressed(Key::D) {
            x += 0.1;
        }
        if canvas.key_pressed(Key::W) {
            y += 0.1;
        }
        if canvas.key_pressed(Key::S) {
            y -= 0.1;
        }
        if canvas.key_pressed(Key::Q) {
            z += 0.1;
        }
        if canvas.key_pressed(Key::E) {
            z -= 0.1;
        }
        sphere.world = Mat4::translation(x, y, z);

        renderer.begin_frame(canvas);
        renderer.render_mesh(&sphere, &camera, &light);
        renderer.present(canvas);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let scene = args.get(1).map(String::as_str).unwrap_or("helix");
    let seed = match args.get(2) {
        Some(s) => s.parse()?,
        None => DEFAULT_SEED,
    };
    let mut rng = StdRng::seed_from_u64(seed);

    let mut canvas =
        SdlCanvas::create(WIDTH, HEIGHT, "softrast").map_err(|e| anyhow!("SDL setup: {e}"))?;

    match scene {
        "helix" => {
            let (mut meshes, spins) = build_helix(&mut rng);
            log::info!("helix scene: {} meshes, seed {seed:#x}", meshes.len());
            run_corridor(&mut canvas, &mut meshes, &spins, 100.0 * 3.5);
        }
        "columns" => {
            let (mut meshes, spins) = build_columns(&mut rng);
            log::info!("columns scene: {} meshes, seed {seed:#x}", meshes.len());
            run_corridor(&mut canvas, &mut meshes, &spins, 20.0 * 3.0);
        }
        "single" => run_single(&mut canvas),
        other => return Err(anyhow!("unknown scene '{other}'")),
    }

    Ok(())
}
