/*
 * World State Module
 *
 * Owns the mutable collections of fish, food pellets and ripples, the
 * simulated wall clock, the monotonic id counter, and the scratch vectors
 * shared by the steering math within a single tick. Iteration order of the
 * collections is insertion order; removals happen in reverse during the
 * tick sweeps so indices stay valid.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::koi::{Koi, KoiVariant};

// Spawn size table, cycled when more fish are requested than entries
const SIZE_CONFIGS: [f32; 6] = [1.1, 1.15, 1.0, 0.95, 1.2, 1.05];

pub struct Food {
    pub id: u64,
    pub pos: Vec2,
    pub created_ms: f64,
}

pub struct Ripple {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
    pub strength: f32,
}

// Working storage for the per-fish steering math. Shared by all fish within
// one tick, reset at the start of each fish's turn, never kept across ticks.
#[derive(Default)]
pub struct Scratch {
    pub desired: Vec2,
    pub to_food: Vec2,
}

pub struct World {
    pub kois: Vec<Koi>,
    pub foods: Vec<Food>,
    pub ripples: Vec<Ripple>,
    pub scratch: Scratch,
    // Simulated wall clock in milliseconds, advanced once per tick
    pub clock_ms: f64,
    pub next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self {
            kois: Vec::new(),
            foods: Vec::new(),
            ripples: Vec::new(),
            scratch: Scratch::default(),
            clock_ms: 0.0,
            next_id: 0,
        }
    }

    pub fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // Replace the population with `count` fish at random positions and
    // headings, sizes cycled from the fixed config table.
    pub fn spawn_kois<R: Rng>(
        &mut self,
        count: usize,
        variant: KoiVariant,
        width: f32,
        height: f32,
        rng: &mut R,
    ) {
        self.kois.clear();

        let padding = 200.0;
        let span_x = (width - padding * 2.0).max(1.0);
        let span_y = (height - padding * 2.0).max(1.0);

        for i in 0..count {
            let size = SIZE_CONFIGS[i % SIZE_CONFIGS.len()] * 50.0;
            let pos = vec2(
                padding + rng.gen::<f32>() * span_x,
                padding + rng.gen::<f32>() * span_y,
            );
            let heading = rng.gen::<f32>() * PI * 2.0;
            let id = self.alloc_id();
            self.kois.push(Koi::new(id, variant, size, pos, heading, rng));
        }
    }

    // Click handler entry point: a pellet plus a splash ripple at the point
    pub fn add_food(&mut self, pos: Vec2) {
        let id = self.alloc_id();
        self.foods.push(Food {
            id,
            pos,
            created_ms: self.clock_ms,
        });
        let ripple_id = self.alloc_id();
        self.ripples.push(Ripple {
            id: ripple_id,
            pos,
            radius: 0.0,
            strength: 1.0,
        });
    }

    // Theme selection applies to the whole population immediately; the
    // per-fish gradient caches notice the variant change on their own.
    pub fn set_variant(&mut self, variant: KoiVariant) {
        for koi in &mut self.kois {
            koi.variant = variant;
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SPINE_SEGMENTS;
    use rand::rngs::mock::StepRng;

    #[test]
    fn spawn_cycles_size_configs() {
        let mut world = World::new();
        let mut rng = StepRng::new(1, 7);
        world.spawn_kois(8, KoiVariant::Kohaku, 800.0, 600.0, &mut rng);

        assert_eq!(world.kois.len(), 8);
        assert_eq!(world.kois[0].size, SIZE_CONFIGS[0] * 50.0);
        assert_eq!(world.kois[6].size, SIZE_CONFIGS[0] * 50.0);
        assert_eq!(world.kois[7].size, SIZE_CONFIGS[1] * 50.0);
        for koi in &world.kois {
            assert_eq!(koi.spine.len(), SPINE_SEGMENTS);
        }
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut world = World::new();
        let mut rng = StepRng::new(1, 7);
        world.spawn_kois(3, KoiVariant::Kohaku, 800.0, 600.0, &mut rng);
        world.add_food(vec2(10.0, 10.0));
        world.add_food(vec2(20.0, 20.0));

        let mut ids: Vec<u64> = world.kois.iter().map(|k| k.id).collect();
        ids.extend(world.foods.iter().map(|f| f.id));
        ids.extend(world.ripples.iter().map(|r| r.id));
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn add_food_spawns_click_ripple() {
        let mut world = World::new();
        world.add_food(vec2(120.0, 80.0));

        assert_eq!(world.foods.len(), 1);
        assert_eq!(world.ripples.len(), 1);
        assert_eq!(world.ripples[0].pos, vec2(120.0, 80.0));
        assert_eq!(world.ripples[0].radius, 0.0);
        assert_eq!(world.ripples[0].strength, 1.0);
    }

    #[test]
    fn theme_change_applies_to_all_fish() {
        let mut world = World::new();
        let mut rng = StepRng::new(1, 7);
        world.spawn_kois(4, KoiVariant::Kohaku, 800.0, 600.0, &mut rng);
        world.set_variant(KoiVariant::Utsuri);
        assert!(world.kois.iter().all(|k| k.variant == KoiVariant::Utsuri));
    }
}
