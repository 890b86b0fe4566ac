/*
 * Koi Module
 *
 * This module defines the Koi struct, the per-agent state for one fish:
 * kinematics, the rigid-segment spine driven by the IK solver, the two
 * animation oscillators, the behavior state tag, and the cached render
 * gradients keyed by color variant.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::geometry::KoiGeometry;
use crate::palette::{self, Gradient};
use crate::SPINE_SEGMENTS;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KoiVariant {
    Kohaku,   // White with red
    Yamabuki, // Gold
    Orenji,   // Deep orange
    Taisho,   // White, red, black
    Utsuri,   // Black with orange
    Tancho,   // White with a red crown
}

// Behavior state tag, re-evaluated every tick. `Eating` is carried in the
// state space but the steering logic never holds it: consumption resolves
// instantly inside `Seeking`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwimState {
    Wandering,
    Seeking,
    Eating,
    Repositioning,
}

// Gradients are rebuilt only when the variant changes, not every frame.
// A single previous-value comparison is enough; no generation counter.
#[derive(Clone)]
pub struct GradientCache {
    last_variant: Option<KoiVariant>,
    pub body: Gradient,
    pub spine: Gradient,
    pub fin: Gradient,
}

impl GradientCache {
    pub fn new() -> Self {
        Self {
            last_variant: None,
            body: palette::body_gradient(KoiVariant::Kohaku),
            spine: palette::spine_gradient(KoiVariant::Kohaku),
            fin: palette::fin_gradient(KoiVariant::Kohaku),
        }
    }

    // Returns true when the cache was actually rebuilt
    pub fn refresh(&mut self, variant: KoiVariant) -> bool {
        if self.last_variant == Some(variant) {
            return false;
        }
        self.body = palette::body_gradient(variant);
        self.spine = palette::spine_gradient(variant);
        self.fin = palette::fin_gradient(variant);
        self.last_variant = Some(variant);
        true
    }
}

impl Default for GradientCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct Koi {
    pub id: u64,
    pub variant: KoiVariant,
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    pub target_angle: f32,
    pub size: f32,
    // Backbone nodes, node 0 is the head. Length never changes after spawn.
    pub spine: Vec<Vec2>,
    pub tail_phase: f32,
    pub fin_phase: f32,
    pub state: SwimState,
    // Ticks left before the fish re-evaluates food seeking
    pub reposition_timer: u32,
    pub geo: KoiGeometry,
    pub cache: GradientCache,
}

impl Koi {
    pub fn new<R: Rng>(
        id: u64,
        variant: KoiVariant,
        size: f32,
        pos: Vec2,
        heading: f32,
        rng: &mut R,
    ) -> Self {
        // Lay the spine out straight behind the head; the solver tightens
        // it to the real segment length on the first tick.
        let mut spine = Vec::with_capacity(SPINE_SEGMENTS);
        for j in 0..SPINE_SEGMENTS {
            spine.push(vec2(
                pos.x - heading.cos() * j as f32 * 5.0,
                pos.y - heading.sin() * j as f32 * 5.0,
            ));
        }
        let geo = KoiGeometry::new(&spine);

        Self {
            id,
            variant,
            pos,
            vel: vec2(heading.cos() * 0.5, heading.sin() * 0.5),
            speed: 0.5,
            target_angle: heading,
            size,
            spine,
            tail_phase: rng.gen::<f32>() * PI * 2.0,
            fin_phase: rng.gen::<f32>() * PI * 2.0,
            state: SwimState::Wandering,
            reposition_timer: 0,
            geo,
            cache: GradientCache::new(),
        }
    }
}
