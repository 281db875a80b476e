//! Triangle scan-conversion and shading kernel.
//!
//! Operates on screen-space vertices produced by the vertex pipeline and
//! writes into one tile band. Clamping the bounding box to the band's row
//! range is what keeps parallel band jobs pixel-disjoint.
//!
//! # Edge convention
//!
//! The inside test is inclusive on all three edges (barycentric weights in
//! [0, 1]), so a pixel center exactly on an edge shared by two triangles
//! may be shaded by both. A canonical top-left rule would resolve this;
//! the inclusive test is kept deliberately and documented as a known
//! artifact.

use crate::framebuffer::Band;
use crate::light::DirectionalLight;
use crate::mesh::Vertex;

/// Triangles with a screen-space signed area at or below this are skipped
/// as degenerate (or backfacing when negative).
const AREA_EPSILON: f32 = 1e-6;

/// Interpolated depths at or below this are treated as behind the camera.
const DEPTH_EPSILON: f32 = 0.001;

/// The standard edge function: signed, doubled area of the triangle
/// (a, b, p). Front faces (counter-clockwise before the viewport y-flip)
/// produce a positive value for their own vertex triple.
#[inline]
fn edge(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (px - ax) * (by - ay) - (py - ay) * (bx - ax)
}

/// Rasterize every triangle of a mesh into one band.
///
/// `cache` is the per-frame vertex cache; `triangles` indexes into it.
/// The light direction must already be normalized.
pub fn rasterize_mesh(
    band: &mut Band,
    triangles: &[[u32; 3]],
    cache: &[Vertex],
    light: &DirectionalLight,
    ka: f32,
    kd: f32,
) {
    for tri in triangles {
        draw_triangle(
            band,
            &cache[tri[0] as usize],
            &cache[tri[1] as usize],
            &cache[tri[2] as usize],
            light,
            ka,
            kd,
        );
    }
}

/// Rasterize a single screen-space triangle into one band.
///
/// Vertices carry screen-space x/y, normalized depth in z, world-space
/// normals and source colors. The light direction must already be
/// normalized.
pub fn draw_triangle(
    band: &mut Band,
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    light: &DirectionalLight,
    ka: f32,
    kd: f32,
) {
    // Reject any triangle touching depth outside the visible range; no
    // partial clipping
    if v0.position.z.abs() > 1.0 || v1.position.z.abs() > 1.0 || v2.position.z.abs() > 1.0 {
        return;
    }

    let (x0, y0) = (v0.position.x, v0.position.y);
    let (x1, y1) = (v1.position.x, v1.position.y);
    let (x2, y2) = (v2.position.x, v2.position.y);

    // Signed area doubles as the backface cull: front faces wind to a
    // positive area in screen space
    let area = edge(x0, y0, x1, y1, x2, y2);
    if area <= AREA_EPSILON {
        return;
    }
    let inv_area = 1.0 / area;

    // Bounding box clamped to the band's pixel rect
    let (band_y_start, band_y_end) = band.y_range();
    let min_x = (x0.min(x1).min(x2).floor().max(0.0)) as u32;
    let max_x = (x0.max(x1).max(x2).ceil()).min((band.width() - 1) as f32) as u32;
    let min_y = (y0.min(y1).min(y2).floor().max(band_y_start as f32)) as u32;
    let max_y = (y0.max(y1).max(y2).ceil()).min((band_y_end - 1) as f32) as u32;
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        let py = y as f32 + 0.5;
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;

            let alpha = edge(x1, y1, x2, y2, px, py) * inv_area;
            let beta = edge(x2, y2, x0, y0, px, py) * inv_area;
            let gamma = edge(x0, y0, x1, y1, px, py) * inv_area;

            // Inclusive on edges; shared-edge pixels may shade twice
            let inside = (0.0..=1.0).contains(&alpha)
                && (0.0..=1.0).contains(&beta)
                && (0.0..=1.0).contains(&gamma);
            if !inside {
                continue;
            }

            // Depth test before any shading work
            let depth = alpha * v0.position.z + beta * v1.position.z + gamma * v2.position.z;
            if depth <= DEPTH_EPSILON || depth >= band.depth_at(x, y) {
                continue;
            }

            let color =
                v0.color * alpha + v1.color * beta + v2.color * gamma;
            let normal =
                (v0.normal * alpha + v1.normal * beta + v2.normal * gamma).normalized();

            let lambert = light.intensity(normal);
            let shaded = color * kd * (light.diffuse * lambert) + light.ambient * ka;

            band.set_pixel(x, y, depth, shaded.clamped().to_argb());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{self, Color};
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;

    const W: u32 = 64;
    const H: u32 = 64;

    fn band() -> Band {
        Band::new(W, 0, H)
    }

    fn head_on_light() -> DirectionalLight {
        // Pointing out of the screen, straight at front faces
        DirectionalLight::new(Vec4::direction(0.0, 0.0, 1.0), Color::WHITE, Color::BLACK)
    }

    fn screen_vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(
            Vec4::new(x, y, z, 1.0),
            Vec4::direction(0.0, 0.0, 1.0),
            Color::WHITE,
        )
    }

    fn count_shaded(band: &Band) -> usize {
        let (start, end) = band.y_range();
        let mut n = 0;
        for y in start..end {
            for x in 0..band.width() {
                if band.color_at(x, y) != colors::BACKGROUND {
                    n += 1;
                }
            }
        }
        n
    }

    /// Screen-space triangle wound front-facing (positive signed area).
    fn front_triangle(depth: f32) -> (Vertex, Vertex, Vertex) {
        (
            screen_vertex(10.0, 10.0, depth),
            screen_vertex(30.0, 50.0, depth),
            screen_vertex(50.0, 10.0, depth),
        )
    }

    #[test]
    fn test_front_facing_triangle_is_drawn() {
        let mut band = band();
        let (a, b, c) = front_triangle(0.5);
        draw_triangle(&mut band, &a, &b, &c, &head_on_light(), 0.0, 1.0);
        assert!(count_shaded(&band) > 0);
    }

    #[test]
    fn test_backfacing_triangle_is_culled() {
        let mut band = band();
        let (a, b, c) = front_triangle(0.5);
        // Swapped winding flips the signed area negative
        draw_triangle(&mut band, &a, &c, &b, &head_on_light(), 0.0, 1.0);
        assert_eq!(count_shaded(&band), 0);
    }

    #[test]
    fn test_degenerate_triangle_is_skipped() {
        let mut band = band();
        let (a, b, c) = (
            screen_vertex(10.0, 10.0, 0.5),
            screen_vertex(20.0, 20.0, 0.5),
            screen_vertex(30.0, 30.0, 0.5),
        );
        draw_triangle(&mut band, &a, &b, &c, &head_on_light(), 0.0, 1.0);
        assert_eq!(count_shaded(&band), 0);
    }

    #[test]
    fn test_offscreen_triangle_writes_nothing() {
        let mut band = band();
        // Front-facing but entirely left of and above the canvas
        let (a, b, c) = (
            screen_vertex(-300.0, -300.0, 0.5),
            screen_vertex(-250.0, -200.0, 0.5),
            screen_vertex(-200.0, -300.0, 0.5),
        );
        draw_triangle(&mut band, &a, &b, &c, &head_on_light(), 0.0, 1.0);
        assert_eq!(count_shaded(&band), 0);
    }

    #[test]
    fn test_out_of_depth_range_triangle_is_rejected() {
        let mut band = band();
        // One vertex beyond the far plane rejects the whole triangle
        let (a, b, c) = (
            screen_vertex(10.0, 10.0, 1.5),
            screen_vertex(30.0, 50.0, 0.5),
            screen_vertex(50.0, 10.0, 0.5),
        );
        draw_triangle(&mut band, &a, &b, &c, &head_on_light(), 0.0, 1.0);
        assert_eq!(count_shaded(&band), 0);
    }

    #[test]
    fn test_occluded_triangle_changes_nothing() {
        let mut band = band();
        let light = head_on_light();
        let near = front_triangle(0.2);
        draw_triangle(&mut band, &near.0, &near.1, &near.2, &light, 0.0, 1.0);
        let before: Vec<u32> = (0..H).flat_map(|y| (0..W).map(move |x| (x, y)))
            .map(|(x, y)| band.color_at(x, y))
            .collect();

        // Same footprint, farther away: every pixel fails the depth test
        let far = front_triangle(0.8);
        draw_triangle(&mut band, &far.0, &far.1, &far.2, &light, 0.0, 1.0);

        let after: Vec<u32> = (0..H).flat_map(|y| (0..W).map(move |x| (x, y)))
            .map(|(x, y)| band.color_at(x, y))
            .collect();
        assert_eq!(before, after);
        assert_relative_eq!(band.depth_at(30, 30), 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_nearer_triangle_wins() {
        let mut band = band();
        let light = head_on_light();
        let far = front_triangle(0.8);
        draw_triangle(&mut band, &far.0, &far.1, &far.2, &light, 0.0, 1.0);
        let near = front_triangle(0.2);
        draw_triangle(&mut band, &near.0, &near.1, &near.2, &light, 0.0, 1.0);
        assert_relative_eq!(band.depth_at(30, 30), 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_behind_camera_depth_is_rejected() {
        let mut band = band();
        // Depth 0.0 <= the behind-camera epsilon
        let (a, b, c) = front_triangle(0.0);
        draw_triangle(&mut band, &a, &b, &c, &head_on_light(), 0.0, 1.0);
        assert_eq!(count_shaded(&band), 0);
    }

    #[test]
    fn test_band_clamp_keeps_writes_inside_rows() {
        // Band covering rows 16..32 of a 64-row frame
        let mut band = Band::new(W, 16, 16);
        let (a, b, c) = (
            screen_vertex(10.0, 0.0, 0.5),
            screen_vertex(30.0, 60.0, 0.5),
            screen_vertex(60.0, 0.0, 0.5),
        );
        draw_triangle(&mut band, &a, &b, &c, &head_on_light(), 0.0, 1.0);
        // Writes landed, and only rows 16..32 exist to receive them
        assert!(count_shaded(&band) > 0);
    }

    #[test]
    fn test_lambert_shading_values() {
        let mut band = band();
        // Head-on grey diffuse with a grey ambient floor, ka = kd = 1
        let light = DirectionalLight::new(
            Vec4::direction(0.0, 0.0, 1.0),
            Color::splat(0.5),
            Color::splat(0.25),
        );
        let (a, b, c) = front_triangle(0.5);
        draw_triangle(&mut band, &a, &b, &c, &light, 1.0, 1.0);
        // 1.0 * 1.0 * 0.5 + 0.25 = 0.75 per channel
        let expected = Color::splat(0.75).to_argb();
        assert_eq!(band.color_at(30, 30), expected);
    }
}
