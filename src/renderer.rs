/*
 * Renderer Module
 *
 * This module draws the pond scene from the world state and the per-fish
 * geometry caches. It never mutates simulation state; all caches it reads
 * (background mesh, per-fish gradients) are refreshed during the update
 * phase. Layers are painted back to front: background gradient, ripples,
 * the offset shadow pass, food pellets, then the fish bodies with their
 * spine shading, pelvic fins and dorsal fin.
 *
 * Curves are flattened by fixed-step sampling into preallocated buffers so
 * the draw path does not grow the heap once warmed up.
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::koi::Koi;
use crate::palette::{self, Gradient};
use crate::ui;
use crate::vecmath;
use crate::world::Food;

const QUAD_STEPS: usize = 4;
const CUBIC_STEPS: usize = 8;
// Pelvic fins attach at this spine node
const FIN_NODE: usize = 3;

// Reusable point buffers for flattened curves, owned by the Model and
// borrowed mutably for the duration of one frame
pub struct RenderScratch {
    outline: Vec<Vec2>,
    band: Vec<Vec2>,
    fin: Vec<Vec2>,
    ray: Vec<Vec2>,
    colored: Vec<(Point2, Srgba<f32>)>,
}

impl RenderScratch {
    pub fn new() -> Self {
        Self {
            outline: Vec::with_capacity(256),
            band: Vec::with_capacity(64),
            fin: Vec::with_capacity(32),
            ray: Vec::with_capacity(16),
            colored: Vec::with_capacity(256),
        }
    }
}

impl Default for RenderScratch {
    fn default() -> Self {
        Self::new()
    }
}

// Simulation space has its origin at the top-left corner with y growing
// downward; nannou draws from the window center with y growing upward.
fn to_screen(p: Vec2, width: f32, height: f32) -> Point2 {
    pt2(p.x - width * 0.5, height * 0.5 - p.y)
}

fn lerp_v(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

fn quad_point(p0: Vec2, c: Vec2, p1: Vec2, t: f32) -> Vec2 {
    lerp_v(lerp_v(p0, c, t), lerp_v(c, p1, t), t)
}

// Flatten a quadratic curve from the buffer's current endpoint
fn push_quad(buf: &mut Vec<Vec2>, c: Vec2, end: Vec2) {
    let start = *buf.last().expect("curve needs a current point");
    for s in 1..=QUAD_STEPS {
        let t = s as f32 / QUAD_STEPS as f32;
        buf.push(quad_point(start, c, end, t));
    }
}

// Flatten a cubic curve from the buffer's current endpoint
fn push_cubic(buf: &mut Vec<Vec2>, c1: Vec2, c2: Vec2, end: Vec2) {
    let start = *buf.last().expect("curve needs a current point");
    for s in 1..=CUBIC_STEPS {
        let t = s as f32 / CUBIC_STEPS as f32;
        let a = lerp_v(start, c1, t);
        let b = lerp_v(c1, c2, t);
        let c = lerp_v(c2, end, t);
        buf.push(lerp_v(lerp_v(a, b, t), lerp_v(b, c, t), t));
    }
}

// Unified body outline: down the right profile with midpoint quadratics,
// into the tail V-notch, back up the left profile, closed by a bezier
// head cap.
fn build_outline(koi: &Koi, buf: &mut Vec<Vec2>) {
    let geo = &koi.geo;
    let n = geo.left.len();

    buf.clear();
    buf.push(geo.right[0]);
    for i in 1..n {
        let p0 = geo.right[i - 1];
        let p1 = geo.right[i];
        push_quad(buf, p0, (p0 + p1) * 0.5);
    }

    buf.push(geo.tail_center);
    buf.push(geo.left[n - 1]);

    for i in (1..n).rev() {
        let p0 = geo.left[i];
        let p1 = geo.left[i - 1];
        push_quad(buf, p0, (p0 + p1) * 0.5);
    }

    let body_angle = (geo.head.y - geo.neck.y).atan2(geo.head.x - geo.neck.x);
    let dir = vec2(body_angle.cos(), body_angle.sin());
    let head_w = vecmath::mag(geo.left[0] - geo.right[0]) * 0.75;
    push_cubic(
        buf,
        geo.left[0] + dir * head_w,
        geo.right[0] + dir * head_w,
        geo.right[0],
    );
}

// Fin outline in its local frame: root at the origin, tip at +x
fn build_fin_local(koi: &Koi, side: f32, buf: &mut Vec<Vec2>) {
    let fl = koi.size * 3.2 * 0.5;
    let fw = koi.size * 0.75 * 1.1;
    let curve_y = side * fw * 0.8;

    buf.clear();
    buf.push(Vec2::ZERO);
    if side > 0.0 {
        push_quad(buf, vec2(fl * 0.35, 0.0), vec2(fl, 0.0));
        push_quad(buf, vec2(fl * 0.25, curve_y), Vec2::ZERO);
    } else {
        push_quad(buf, vec2(fl * 0.25, curve_y), vec2(fl, 0.0));
        push_quad(buf, vec2(fl * 0.35, 0.0), Vec2::ZERO);
    }
}

// Placement of a fin's local frame in simulation space
fn fin_frame(koi: &Koi, side: f32) -> (Vec2, f32) {
    let p = koi.spine[FIN_NODE];
    let angle = koi.geo.angles[FIN_NODE];
    let w = koi.size * 0.6;

    // Lateral offset from the spine, expressed in the body frame
    let off = side * w * 0.65;
    let origin = vec2(p.x - angle.sin() * off, p.y + angle.cos() * off);
    let theta = angle + side * (PI * 0.22 - 0.15);
    (origin, theta)
}

fn local_to_sim(local: Vec2, origin: Vec2, theta: f32) -> Vec2 {
    let (sin_t, cos_t) = theta.sin_cos();
    vec2(
        origin.x + local.x * cos_t - local.y * sin_t,
        origin.y + local.x * sin_t + local.y * cos_t,
    )
}

fn draw_fin(
    draw: &Draw,
    koi: &Koi,
    side: f32,
    shadow_offset: Option<Vec2>,
    width: f32,
    height: f32,
    fin_buf: &mut Vec<Vec2>,
    ray_buf: &mut Vec<Vec2>,
    colored: &mut Vec<(Point2, Srgba<f32>)>,
) {
    let (origin, theta) = fin_frame(koi, side);
    let fl = koi.size * 3.2 * 0.5;
    let fw = koi.size * 0.75 * 1.1;
    let curve_y = side * fw * 0.8;

    build_fin_local(koi, side, fin_buf);

    if let Some(offset) = shadow_offset {
        draw.polygon()
            .color(palette::shadow_fill())
            .points(fin_buf.iter().map(|&local| {
                to_screen(local_to_sim(local, origin, theta) + offset, width, height)
            }));
        return;
    }

    // Root-to-tip gradient fill
    let grad = &koi.cache.fin;
    colored.clear();
    for &local in fin_buf.iter() {
        let t = (local.x / fl).clamp(0.0, 1.0);
        let p = to_screen(local_to_sim(local, origin, theta), width, height);
        colored.push((p, grad.sample(t)));
    }
    draw.polygon().points_colored(colored.iter().cloned());

    // Translucent fin rays fanning from the root
    let ray_color = srgba(1.0, 1.0, 1.0, 0.2);
    for j in 1..=7 {
        let t = j as f32 / 8.0;
        let tip = vec2(fl * (0.5 + t * 0.5), curve_y * t * 0.9);
        let ctrl = vec2(fl * 0.2, curve_y * t * 0.5);

        ray_buf.clear();
        ray_buf.push(Vec2::ZERO);
        push_quad(ray_buf, ctrl, tip);

        draw.polyline()
            .weight(0.5)
            .points(
                ray_buf
                    .iter()
                    .map(|&local| to_screen(local_to_sim(local, origin, theta), width, height)),
            )
            .color(ray_color);
    }
}

// Tapering darkened band along the backbone, fading toward the tail.
// Approximates the original's blurred multiply layer with a per-vertex
// alpha fade.
fn draw_spine_shade(
    draw: &Draw,
    koi: &Koi,
    width: f32,
    height: f32,
    band: &mut Vec<Vec2>,
    colored: &mut Vec<(Point2, Srgba<f32>)>,
) {
    let n = koi.spine.len();
    let band_len = n - 4;
    if band_len <= 2 {
        return;
    }

    let grad: &Gradient = &koi.cache.spine;
    band.clear();
    colored.clear();

    for k in 0..band_len {
        let p = koi.spine[k];
        let angle = koi.geo.angles[k] + PI / 2.0;
        let t = k as f32 / band_len as f32;
        let w = (1.0 - t) * koi.size * 0.22;
        band.push(vec2(p.x + angle.cos() * w, p.y + angle.sin() * w));
    }
    for k in (0..band_len).rev() {
        let p = koi.spine[k];
        let angle = koi.geo.angles[k] + PI / 2.0;
        let t = k as f32 / band_len as f32;
        let w = (1.0 - t) * koi.size * 0.22;
        band.push(vec2(p.x - angle.cos() * w, p.y - angle.sin() * w));
    }

    for (i, &p) in band.iter().enumerate() {
        // Mirror the fade on the way back up the band
        let k = if i < band_len { i } else { 2 * band_len - 1 - i };
        let t = k as f32 / band_len as f32;
        colored.push((to_screen(p, width, height), grad.sample(t)));
    }

    draw.polygon().points_colored(colored.iter().cloned());
}

// Sway-animated translucent ribbon along the back
fn draw_dorsal_fin(
    draw: &Draw,
    koi: &Koi,
    width: f32,
    height: f32,
    band: &mut Vec<Vec2>,
    colored: &mut Vec<(Point2, Srgba<f32>)>,
) {
    let n = koi.spine.len();
    let d_start = 4;
    let d_end = n - 8;
    if d_end <= d_start {
        return;
    }

    let sway = (koi.fin_phase * 1.5).sin() * 1.5;
    let size_factor = koi.size / 50.0;
    let grad = palette::dorsal_gradient();
    let span = (d_end - d_start) as f32;

    band.clear();
    colored.clear();

    let ribbon_offset = |k: usize| -> (Vec2, f32) {
        let t = (k - d_start) as f32 / span;
        let angle = koi.geo.angles[k] - PI / 2.0;
        let width_factor = ((t * 3.14).sin() * 0.8 + 0.2) * size_factor;
        let sway_offset = sway * (t * 3.14).sin();

        let cos_a = angle.cos();
        let sin_a = angle.sin();
        // Perpendicular of the ribbon direction carries the sway
        let dx = cos_a * width_factor - sin_a * sway_offset;
        let dy = sin_a * width_factor + cos_a * sway_offset;
        (vec2(dx, dy), t)
    };

    for k in d_start..=d_end {
        let (d, t) = ribbon_offset(k);
        band.push(koi.spine[k] + d);
        colored.push((to_screen(koi.spine[k] + d, width, height), grad.sample(t)));
    }
    for k in (d_start..=d_end).rev() {
        let (d, t) = ribbon_offset(k);
        band.push(koi.spine[k] - d);
        colored.push((to_screen(koi.spine[k] - d, width, height), grad.sample(t)));
    }

    draw.polygon().points_colored(colored.iter().cloned());
}

fn draw_food_pellet(draw: &Draw, food: &Food, width: f32, height: f32) {
    let center = to_screen(food.pos, width, height);
    draw.ellipse()
        .xy(center)
        .radius(5.0)
        .color(palette::food_fill())
        .stroke(palette::food_stroke())
        .stroke_weight(1.0);

    // Seeded speckles so each pellet looks distinct but stable
    let seed = food.id as f32;
    for j in 0..4 {
        let r = (seed + j as f32) % 3.0;
        let theta = (seed * j as f32) % 6.28;
        let p = food.pos + vec2(theta.cos() * r, theta.sin() * r);
        draw.ellipse()
            .xy(to_screen(p, width, height))
            .radius(0.8)
            .color(palette::food_speckle());
    }
}

fn draw_body(
    draw: &Draw,
    koi: &Koi,
    width: f32,
    height: f32,
    outline: &mut Vec<Vec2>,
    colored: &mut Vec<(Point2, Srgba<f32>)>,
) {
    build_outline(koi, outline);

    let geo = &koi.geo;
    let body_angle = (geo.head.y - geo.neck.y).atan2(geo.head.x - geo.neck.x);
    let dir = vec2(body_angle.cos(), body_angle.sin());
    let grad_len = koi.size * 8.5;
    let grad = &koi.cache.body;

    colored.clear();
    for &p in outline.iter() {
        // Distance from the head along the body axis picks the gradient stop
        let along = (p - geo.head).dot(-dir);
        let t = (along / grad_len).clamp(0.0, 1.0);
        colored.push((to_screen(p, width, height), grad.sample(t)));
    }
    draw.polygon().points_colored(colored.iter().cloned());
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let width = model.surface_size.x;
    let height = model.surface_size.y;

    // Zero-area surface: nothing sensible to draw, keep the UI alive
    if width <= 0.0 || height <= 0.0 {
        draw.background().color(palette::water_top());
        draw.to_frame(app, &frame).unwrap();
        model.egui.draw_to_frame(&frame).unwrap();
        return;
    }

    let mut scratch_guard = model.render_scratch.borrow_mut();
    let scratch = &mut *scratch_guard;

    // Background gradient, cached mesh rebuilt only on resize
    draw.polygon()
        .points_colored(model.background.mesh.iter().cloned());

    // Ripples
    for r in &model.world.ripples {
        if r.radius > 0.0 {
            draw.ellipse()
                .xy(to_screen(r.pos, width, height))
                .radius(r.radius)
                .no_fill()
                .stroke(palette::ripple_stroke(r.strength))
                .stroke_weight(1.0);
        }
    }

    // Shadow pass: everything re-drawn flat and offset by the light angle
    let angle_rad = model.params.shadow_angle.to_radians();
    let shadow = vec2(
        angle_rad.cos() * model.params.shadow_height,
        angle_rad.sin() * model.params.shadow_height,
    );

    for f in &model.world.foods {
        draw.ellipse()
            .xy(to_screen(f.pos + shadow, width, height))
            .radius(6.0)
            .color(palette::shadow_fill());
    }
    for koi in &model.world.kois {
        build_outline(koi, &mut scratch.outline);
        draw.polygon()
            .color(palette::shadow_fill())
            .points(scratch.outline.iter().map(|&p| to_screen(p + shadow, width, height)));
        for side in [1.0, -1.0] {
            draw_fin(
                &draw,
                koi,
                side,
                Some(shadow),
                width,
                height,
                &mut scratch.fin,
                &mut scratch.ray,
                &mut scratch.colored,
            );
        }
    }

    // Food pellets
    for f in &model.world.foods {
        draw_food_pellet(&draw, f, width, height);
    }

    // Fish bodies, back to front within each fish: fins, body, spine
    // shading, dorsal fin
    for koi in &model.world.kois {
        for side in [1.0, -1.0] {
            draw_fin(
                &draw,
                koi,
                side,
                None,
                width,
                height,
                &mut scratch.fin,
                &mut scratch.ray,
                &mut scratch.colored,
            );
        }

        draw_body(&draw, koi, width, height, &mut scratch.outline, &mut scratch.colored);
        draw_spine_shade(&draw, koi, width, height, &mut scratch.band, &mut scratch.colored);
        draw_dorsal_fin(&draw, koi, width, height, &mut scratch.band, &mut scratch.colored);
    }

    // Draw debug info if enabled
    if model.params.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, app.window_rect());
    }

    // Finish drawing
    draw.to_frame(app, &frame).unwrap();

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koi::KoiVariant;
    use rand::rngs::mock::StepRng;

    #[test]
    fn screen_transform_centers_and_flips_y() {
        let p = to_screen(vec2(0.0, 0.0), 800.0, 600.0);
        assert_eq!(p, pt2(-400.0, 300.0));
        let p = to_screen(vec2(800.0, 600.0), 800.0, 600.0);
        assert_eq!(p, pt2(400.0, -300.0));
        let p = to_screen(vec2(400.0, 300.0), 800.0, 600.0);
        assert_eq!(p, pt2(0.0, 0.0));
    }

    #[test]
    fn outline_is_closed_and_finite() {
        let mut rng = StepRng::new(9, 5);
        let koi = Koi::new(1, KoiVariant::Kohaku, 55.0, vec2(400.0, 300.0), 0.4, &mut rng);
        let mut buf = Vec::new();
        build_outline(&koi, &mut buf);

        assert!(buf.len() > 2 * crate::SPINE_SEGMENTS);
        for p in &buf {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        // The head cap lands back on the outline's starting point
        let first = buf[0];
        let last = *buf.last().unwrap();
        assert!(vecmath::mag(last - first) < 1e-3);
    }

    #[test]
    fn fin_frames_mirror_left_and_right() {
        let mut rng = StepRng::new(9, 5);
        let koi = Koi::new(1, KoiVariant::Kohaku, 55.0, vec2(400.0, 300.0), 0.0, &mut rng);
        let (o_left, t_left) = fin_frame(&koi, 1.0);
        let (o_right, t_right) = fin_frame(&koi, -1.0);

        let p = koi.spine[FIN_NODE];
        // Opposite lateral offsets from the same spine node
        assert!(vecmath::mag((o_left - p) + (o_right - p)) < 1e-4);
        // Opposite rake around the body tangent
        let angle = koi.geo.angles[FIN_NODE];
        assert!(((t_left - angle) + (t_right - angle)).abs() < 1e-5);
    }
}
