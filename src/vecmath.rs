/*
 * Vector Math Module
 *
 * Small 2D vector helpers used by the steering and geometry code.
 * The hot paths write into caller-owned storage (spines, profile arrays,
 * scratch vectors) so a frame never grows the heap; `Vec2` itself is Copy,
 * so intermediate values stay on the stack.
 */

use nannou::prelude::*;

// Write (x, y) into an existing vector
pub fn set(target: &mut Vec2, x: f32, y: f32) {
    target.x = x;
    target.y = y;
}

// target = a - b
pub fn sub(target: &mut Vec2, a: Vec2, b: Vec2) {
    target.x = a.x - b.x;
    target.y = a.y - b.y;
}

// Scale in place
pub fn scale(target: &mut Vec2, n: f32) {
    target.x *= n;
    target.y *= n;
}

// Accumulate in place
pub fn add(target: &mut Vec2, v: Vec2) {
    target.x += v.x;
    target.y += v.y;
}

pub fn mag(v: Vec2) -> f32 {
    v.x.hypot(v.y)
}

pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

// Unit vector, degrading to zero for zero-magnitude input. A NaN here would
// corrupt an agent's spine for the rest of its lifetime, so never divide by
// a zero length.
pub fn safe_normalize(v: Vec2) -> Vec2 {
    let len = mag(v);
    if len > 0.0 {
        vec2(v.x / len, v.y / len)
    } else {
        Vec2::ZERO
    }
}

// Clamp the magnitude of a vector in place
pub fn limit(v: &mut Vec2, max: f32) {
    let len = mag(*v);
    if len > max && len > 0.0 {
        scale(v, max / len);
    }
}

// Fold an angle difference into [-PI, PI]
pub fn wrap_angle(mut a: f32) -> f32 {
    while a > PI {
        a -= PI * 2.0;
    }
    while a < -PI {
        a += PI * 2.0;
    }
    a
}
