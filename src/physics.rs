/*
 * Physics Module
 *
 * This module advances the whole world by one fixed timestep: ripple decay,
 * food drift and expiry, then the per-fish behavior state machine
 * (wandering, seeking, repositioning), boundary avoidance, speed and turn
 * limiting, integration, and finally the spine solve and geometry rebuild.
 *
 * Simulation for all fish completes inside this module before the renderer
 * reads anything, so a frame never observes a half-updated world.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::koi::{Koi, SwimState};
use crate::params::PondParams;
use crate::spine;
use crate::vecmath;
use crate::world::{Food, Ripple, Scratch, World};
use crate::{EAT_DISTANCE, FOOD_DETECTION_RADIUS, FOOD_LIFETIME_MS, MAX_SPEED, TICK_MS};

// Advance the world by one tick within a width x height surface.
// A zero-area surface skips the tick entirely; a resampled simulation
// self-corrects on the next valid frame, so nothing is retried.
pub fn tick<R: Rng>(world: &mut World, width: f32, height: f32, params: &PondParams, rng: &mut R) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    world.clock_ms += TICK_MS;

    update_ripples(&mut world.ripples);
    float_and_expire_food(&mut world.foods, world.clock_ms);

    let World {
        kois,
        foods,
        ripples,
        scratch,
        next_id,
        ..
    } = world;

    for koi in kois.iter_mut() {
        step_koi(koi, foods, ripples, next_id, scratch, width, height, params, rng);
    }
}

// Ripples grow and fade at fixed rates; spent ones are removed in reverse
fn update_ripples(ripples: &mut Vec<Ripple>) {
    for i in (0..ripples.len()).rev() {
        let r = &mut ripples[i];
        r.radius += 1.0;
        if r.radius > 0.0 {
            r.strength -= 0.005;
        }
        if r.strength <= 0.0 {
            ripples.remove(i);
        }
    }
}

// Cosmetic idle drift keyed by id, plus expiry of uneaten pellets so the
// collection stays bounded
fn float_and_expire_food(foods: &mut Vec<Food>, clock_ms: f64) {
    let now_sec = (clock_ms * 0.001) as f32;
    for i in (0..foods.len()).rev() {
        let f = &mut foods[i];
        f.pos.x += (now_sec + f.id as f32).cos() * 0.15;
        f.pos.y += (now_sec + f.id as f32).sin() * 0.15;

        if clock_ms - f.created_ms > FOOD_LIFETIME_MS {
            foods.remove(i);
        }
    }
}

// Project a wander circle ahead of the current heading and pick the point
// on its rim given by the slowly drifting target angle
fn wander_target(vel: Vec2, target_angle: f32, distance: f32, radius: f32) -> Vec2 {
    let heading = vecmath::safe_normalize(vel);
    vec2(
        heading.x * distance + target_angle.cos() * radius,
        heading.y * distance + target_angle.sin() * radius,
    )
}

#[allow(clippy::too_many_arguments)]
fn step_koi<R: Rng>(
    koi: &mut Koi,
    foods: &mut Vec<Food>,
    ripples: &mut Vec<Ripple>,
    next_id: &mut u64,
    scratch: &mut Scratch,
    width: f32,
    height: f32,
    params: &PondParams,
    rng: &mut R,
) {
    let swim_speed = params.swim_speed;
    let detection_sq = FOOD_DETECTION_RADIUS * FOOD_DETECTION_RADIUS;

    // Reset the shared desired-velocity scratch for this fish's turn
    vecmath::set(&mut scratch.desired, 0.0, 0.0);

    if koi.reposition_timer > 0 {
        // The fish overshot its food: swim away on a tight wander circle
        // before trying an approach again
        koi.state = SwimState::Repositioning;
        koi.reposition_timer -= 1;

        koi.target_angle += (rng.gen::<f32>() * 2.0 - 1.0) * 0.05;
        let target = wander_target(koi.vel, koi.target_angle, 100.0, 10.0);

        vecmath::set(&mut scratch.desired, target.x, target.y);
        vecmath::limit(&mut scratch.desired, MAX_SPEED * 1.2 * swim_speed);
    } else {
        // Nearest pellet in detection range, squared distances only
        let mut closest: Option<usize> = None;
        let mut closest_sq = f32::INFINITY;
        for (k, f) in foods.iter().enumerate() {
            let d_sq = vecmath::dist_sq(koi.pos, f.pos);
            if d_sq < detection_sq && d_sq < closest_sq {
                closest_sq = d_sq;
                closest = Some(k);
            }
        }

        if let Some(idx) = closest {
            koi.state = SwimState::Seeking;
            vecmath::sub(&mut scratch.to_food, foods[idx].pos, koi.pos);
            let d = closest_sq.sqrt();

            let heading = vecmath::safe_normalize(koi.vel);
            let food_dir = vecmath::safe_normalize(scratch.to_food);
            let alignment = heading.x * food_dir.x + heading.y * food_dir.y;

            // Close but badly aligned: break off and circle back
            if d < 50.0 && alignment < 0.2 {
                koi.reposition_timer = 90;
            }

            let mut speed = MAX_SPEED * 2.8 * swim_speed;
            let arrival_radius = 120.0;
            if d < arrival_radius {
                speed = (speed * (d / arrival_radius)).max(0.5);
            }

            vecmath::set(&mut scratch.desired, food_dir.x * speed, food_dir.y * speed);

            if d < EAT_DISTANCE {
                foods.remove(idx);
                *next_id += 1;
                ripples.push(Ripple {
                    id: *next_id,
                    pos: koi.pos,
                    radius: 0.0,
                    strength: 1.0,
                });
            }
        } else {
            koi.state = SwimState::Wandering;
            koi.target_angle += (rng.gen::<f32>() * 2.0 - 1.0) * 0.003;
            let target = wander_target(koi.vel, koi.target_angle, 1000.0, 10.0);

            vecmath::set(&mut scratch.desired, target.x, target.y);
            vecmath::limit(&mut scratch.desired, MAX_SPEED * 0.8 * swim_speed);
        }
    }

    // Boundary avoidance: inward push growing quadratically with
    // penetration into the margin band; corners get both components
    let margin = 150.0;
    let steer_str = 8.0;
    if koi.pos.x < margin {
        scratch.desired.x += steer_str * (1.0 - koi.pos.x / margin).powi(2);
    }
    if koi.pos.x > width - margin {
        scratch.desired.x -= steer_str * (1.0 - (width - koi.pos.x) / margin).powi(2);
    }
    if koi.pos.y < margin {
        scratch.desired.y += steer_str * (1.0 - koi.pos.y / margin).powi(2);
    }
    if koi.pos.y > height - margin {
        scratch.desired.y -= steer_str * (1.0 - (height - koi.pos.y) / margin).powi(2);
    }

    // State-dependent speed cap
    let speed_limit_multiplier = match koi.state {
        SwimState::Seeking => 2.8,
        SwimState::Repositioning => 1.2,
        _ => 1.0,
    };
    let max_spd = MAX_SPEED * speed_limit_multiplier * swim_speed;
    vecmath::limit(&mut scratch.desired, max_spd);

    let current_angle = koi.vel.y.atan2(koi.vel.x);
    let desired_angle = scratch.desired.y.atan2(scratch.desired.x);
    let current_speed = vecmath::mag(koi.vel);
    let target_speed = vecmath::mag(scratch.desired);

    let is_seeking = koi.state == SwimState::Seeking;
    let is_repositioning = koi.state == SwimState::Repositioning;

    // Exponential speed smoothing, floored so fish never fully stop
    let accel_rate = if is_seeking || is_repositioning { 0.2 } else { 0.04 };
    let new_speed =
        (current_speed + (target_speed - current_speed) * accel_rate).max(MAX_SPEED * 0.1);

    // Angle-wrapped turn, capped by a state- and speed-dependent rate
    let mut delta_angle = vecmath::wrap_angle(desired_angle - current_angle);
    let turn_multiplier = if is_seeking {
        6.0
    } else if is_repositioning {
        4.0
    } else {
        1.0
    };
    let final_max_turn = 0.0025 * turn_multiplier * (new_speed / MAX_SPEED + 0.5);
    delta_angle = delta_angle.clamp(-final_max_turn, final_max_turn);
    let new_angle = current_angle + delta_angle;

    koi.vel = vec2(new_angle.cos() * new_speed, new_angle.sin() * new_speed);
    vecmath::add(&mut koi.pos, koi.vel);

    // Hard clamp at the overscan margin prevents runaway divergence
    let bounds_margin = 50.0;
    koi.pos.x = koi.pos.x.clamp(-bounds_margin, width + bounds_margin);
    koi.pos.y = koi.pos.y.clamp(-bounds_margin, height + bounds_margin);

    // Soft nudge back toward the visible area, no hard snap
    if koi.pos.x < 0.0 {
        koi.vel.x += 0.1;
    }
    if koi.pos.x > width {
        koi.vel.x -= 0.1;
    }
    if koi.pos.y < 0.0 {
        koi.vel.y += 0.1;
    }
    if koi.pos.y > height {
        koi.vel.y -= 0.1;
    }

    // Faster swimming animates faster
    let rate = 0.02 + (new_speed / MAX_SPEED) * 0.08;
    koi.tail_phase += rate;
    koi.fin_phase += rate * 1.1;
    koi.speed = new_speed;

    // Spine IK toward the new head position, then refresh the render geometry
    let seg_len = spine::segment_len(koi.size, params.body_length);
    spine::solve(&mut koi.spine, koi.pos, seg_len);
    koi.geo
        .rebuild(&koi.spine, koi.tail_phase, koi.size, params.wave_amplitude);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::koi::KoiVariant;
    use crate::{SPINE_SEGMENTS, TICK_MS};
    use rand::rngs::mock::StepRng;

    fn world_with_one_koi(pos: Vec2, heading: f32) -> World {
        let mut world = World::new();
        let id = world.alloc_id();
        let mut rng = StepRng::new(3, 11);
        world
            .kois
            .push(Koi::new(id, KoiVariant::Kohaku, 55.0, pos, heading, &mut rng));
        world
    }

    fn params() -> PondParams {
        PondParams::default()
    }

    #[test]
    fn no_food_converges_to_wandering_within_one_tick() {
        let mut world = world_with_one_koi(vec2(400.0, 300.0), 0.0);
        world.kois[0].state = SwimState::Seeking;
        let mut rng = StepRng::new(5, 7);

        tick(&mut world, 800.0, 600.0, &params(), &mut rng);
        assert_eq!(world.kois[0].state, SwimState::Wandering);

        for _ in 0..200 {
            tick(&mut world, 800.0, 600.0, &params(), &mut rng);
            assert_eq!(world.kois[0].state, SwimState::Wandering);
        }
    }

    #[test]
    fn food_straight_ahead_is_eaten_with_one_ripple() {
        // Heading +x, pellet 10 units directly ahead: inside the eat
        // distance and perfectly aligned, so no reposition detour
        let mut world = world_with_one_koi(vec2(400.0, 300.0), 0.0);
        world.foods.push(Food {
            id: 99,
            pos: vec2(410.0, 300.0),
            created_ms: 0.0,
        });
        let mut rng = StepRng::new(5, 7);

        for _ in 0..10 {
            tick(&mut world, 800.0, 600.0, &params(), &mut rng);
            if world.foods.is_empty() {
                break;
            }
        }

        assert!(world.foods.is_empty(), "pellet was never consumed");
        assert_eq!(world.ripples.len(), 1);
        // The ripple spawns at the eater, not at the pellet
        let d = vecmath::mag(world.ripples[0].pos - world.kois[0].pos);
        assert!(d < EAT_DISTANCE * 2.0);
    }

    #[test]
    fn speed_stays_inside_envelope() {
        let p = params();
        let lo = MAX_SPEED * 0.1 - 1e-4;
        let hi = MAX_SPEED * 2.8 * p.swim_speed + 1e-4;

        let mut world = world_with_one_koi(vec2(400.0, 300.0), 1.2);
        // Distant pellet keeps the fish seeking at full throttle for a while
        world.foods.push(Food {
            id: 1,
            pos: vec2(80.0, 80.0),
            created_ms: 0.0,
        });
        let mut rng = StepRng::new(17, 29);

        for _ in 0..600 {
            tick(&mut world, 800.0, 600.0, &p, &mut rng);
            let s = world.kois[0].speed;
            assert!(s >= lo && s <= hi, "speed {} outside envelope", s);
            assert!((vecmath::mag(world.kois[0].vel) - s).abs() < 1e-3);
        }
    }

    #[test]
    fn uneaten_food_expires_after_lifetime() {
        let mut world = World::new();
        world.add_food(vec2(200.0, 200.0));
        let created = world.foods[0].created_ms;
        let mut rng = StepRng::new(5, 7);

        // Step just past the 30s lifetime on the simulated clock
        let ticks = (FOOD_LIFETIME_MS / TICK_MS) as usize + 2;
        for _ in 0..ticks {
            tick(&mut world, 800.0, 600.0, &params(), &mut rng);
        }

        assert!(world.clock_ms - created > FOOD_LIFETIME_MS);
        assert!(world.foods.is_empty());
    }

    #[test]
    fn ripples_grow_fade_and_expire() {
        let mut world = World::new();
        world.add_food(vec2(100.0, 100.0));
        let mut rng = StepRng::new(5, 7);

        tick(&mut world, 800.0, 600.0, &params(), &mut rng);
        assert!(world.ripples[0].radius > 0.0);
        assert!(world.ripples[0].strength < 1.0);

        // strength 1.0 at 0.005 per tick decays to zero inside 201 ticks
        for _ in 0..210 {
            tick(&mut world, 800.0, 600.0, &params(), &mut rng);
        }
        assert!(world.ripples.is_empty());
    }

    #[test]
    fn geometry_invariants_hold_every_tick() {
        let mut world = world_with_one_koi(vec2(400.0, 300.0), 0.7);
        world.add_food(vec2(600.0, 350.0));
        let mut rng = StepRng::new(23, 31);

        for _ in 0..300 {
            tick(&mut world, 800.0, 600.0, &params(), &mut rng);
            let koi = &world.kois[0];
            assert_eq!(koi.spine.len(), SPINE_SEGMENTS);
            assert_eq!(koi.geo.left.len(), SPINE_SEGMENTS);
            assert_eq!(koi.geo.right.len(), SPINE_SEGMENTS);
            assert!(matches!(
                koi.state,
                SwimState::Wandering | SwimState::Seeking | SwimState::Repositioning
            ));
        }
    }

    #[test]
    fn zero_area_surface_skips_and_recovers_without_nan() {
        let mut world = world_with_one_koi(vec2(400.0, 300.0), 0.3);
        let mut rng = StepRng::new(5, 7);

        let before = world.kois[0].pos;
        let clock_before = world.clock_ms;
        tick(&mut world, 0.0, 0.0, &params(), &mut rng);
        tick(&mut world, 0.0, 600.0, &params(), &mut rng);

        // Skipped outright: no time passes, nothing moves
        assert_eq!(world.kois[0].pos, before);
        assert_eq!(world.clock_ms, clock_before);

        for _ in 0..60 {
            tick(&mut world, 800.0, 600.0, &params(), &mut rng);
        }
        let koi = &world.kois[0];
        assert!(koi.pos.x.is_finite() && koi.pos.y.is_finite());
        for p in koi.spine.iter().chain(koi.geo.left.iter()).chain(koi.geo.right.iter()) {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn tick_is_deterministic_for_a_fixed_rng() {
        let build = || {
            let mut world = World::new();
            let mut rng = StepRng::new(41, 9);
            world.spawn_kois(4, KoiVariant::Utsuri, 800.0, 600.0, &mut rng);
            world.add_food(vec2(250.0, 420.0));
            world
        };

        let mut a = build();
        let mut b = build();

        let mut rng_a = StepRng::new(77, 13);
        let mut rng_b = StepRng::new(77, 13);
        for _ in 0..50 {
            tick(&mut a, 800.0, 600.0, &params(), &mut rng_a);
            tick(&mut b, 800.0, 600.0, &params(), &mut rng_b);
        }

        for (ka, kb) in a.kois.iter().zip(b.kois.iter()) {
            assert_eq!(ka.pos, kb.pos);
            assert_eq!(ka.vel, kb.vel);
            assert_eq!(ka.spine, kb.spine);
        }
    }
}
