/*
 * Geometry Builder Module
 *
 * Derives everything the renderer needs from the solved spine: a tangent
 * angle per node, left/right lateral profile curves with the traveling
 * swim wave superimposed, and the head/neck/tail reference points. All
 * arrays are preallocated at spawn and rewritten in place every tick.
 */

use nannou::prelude::*;

use crate::SPINE_SEGMENTS;

// Half-width of the body at normalized arc position t in [0, 1].
// Three-piece koi silhouette: near-circular head taper, long mid-body
// taper down to 0.1x, then the tail flare up to 1.65x.
pub fn body_width(t: f32, size: f32) -> f32 {
    if t < 0.2 {
        let x = t / 0.2;
        (0.45 + 0.55 * (1.0 - (x - 1.0).powi(2)).max(0.0).sqrt()) * size * 0.6
    } else if t < 0.7 {
        let p = (t - 0.2) / 0.5;
        (1.0 - (1.0 - (p * PI / 2.0).cos()) * 0.9) * size * 0.6
    } else {
        let p = (t - 0.7) / 0.3;
        (0.15 + (1.0 - (p * PI / 2.0).cos()) * 1.5) * size * 0.6
    }
}

#[derive(Clone)]
pub struct KoiGeometry {
    // Tangent direction at each spine node
    pub angles: Vec<f32>,
    pub left: Vec<Vec2>,
    pub right: Vec<Vec2>,
    pub head: Vec2,
    pub neck: Vec2,
    // Point where the tail flare begins
    pub tail_root: Vec2,
    // Deepest point of the tail V-notch
    pub tail_center: Vec2,
}

impl KoiGeometry {
    pub fn new(spine: &[Vec2]) -> Self {
        let n = spine.len();
        let mut geo = Self {
            angles: vec![0.0; n],
            left: vec![Vec2::ZERO; n],
            right: vec![Vec2::ZERO; n],
            head: spine[0],
            neck: spine[1],
            tail_root: spine[n - 7],
            tail_center: (spine[n - 2] + spine[n - 3]) * 0.5,
        };
        geo.rebuild(spine, 0.0, 1.0, 1.0);
        geo
    }

    // Recompute the full geometry cache from the current spine
    pub fn rebuild(&mut self, spine: &[Vec2], tail_phase: f32, size: f32, wave_amplitude: f32) {
        let n = spine.len();
        debug_assert_eq!(n, SPINE_SEGMENTS);
        debug_assert_eq!(self.angles.len(), n);

        // Tangent angles: central difference inside, one-sided at the ends
        for i in 0..n {
            let (dx, dy) = if i == 0 {
                (spine[1].x - spine[0].x, spine[1].y - spine[0].y)
            } else if i == n - 1 {
                (spine[i].x - spine[i - 1].x, spine[i].y - spine[i - 1].y)
            } else {
                (spine[i + 1].x - spine[i - 1].x, spine[i + 1].y - spine[i - 1].y)
            };
            self.angles[i] = dy.atan2(dx);
        }

        // Lateral profiles: width plus a traveling wave that ramps from
        // zero at the head to full amplitude at the tail
        for i in 0..n {
            let p = spine[i];
            let t = i as f32 / (n - 1) as f32;
            let wave = (tail_phase - i as f32 * 0.4).sin() * wave_amplitude * (i as f32 / n as f32) * 14.0;
            let perp = self.angles[i] + PI / 2.0;
            let w = body_width(t, size);

            let (sin_p, cos_p) = perp.sin_cos();
            let wx = cos_p * wave;
            let wy = sin_p * wave;
            let cx = cos_p * w;
            let cy = sin_p * w;

            self.left[i] = vec2(p.x + cx + wx, p.y + cy + wy);
            self.right[i] = vec2(p.x - cx + wx, p.y - cy + wy);
        }

        self.head = spine[0];
        self.neck = spine[1];
        self.tail_root = spine[n - 7];
        self.tail_center = (spine[n - 2] + spine[n - 3]) * 0.5;
    }
}
