/*
 * Koi Pond Simulation - Module Definitions
 *
 * This file defines the module structure for the koi pond application.
 * It organizes the code into logical components for better maintainability.
 */

// Re-export key components for easier access
pub use koi::{Koi, KoiVariant, SwimState};
pub use params::PondParams;
pub use world::{Food, Ripple, Scratch, World};
pub use debug::DebugInfo;
pub use app::Model;

// Define modules
pub mod vecmath;
pub mod palette;
pub mod koi;
pub mod spine;
pub mod geometry;
pub mod params;
pub mod world;
pub mod physics;
pub mod debug;
pub mod app;
pub mod ui;
pub mod renderer;

// Constants
pub const SPINE_SEGMENTS: usize = 16;
pub const MAX_SPEED: f32 = 1.2;
pub const FOOD_DETECTION_RADIUS: f32 = 700.0;
pub const EAT_DISTANCE: f32 = 22.0;

// Simulated wall clock advance per tick (60 ticks per second)
pub const TICK_MS: f64 = 1000.0 / 60.0;
pub const FOOD_LIFETIME_MS: f64 = 30_000.0;

// Flocking perception radii, reserved but not wired into the behavior logic
pub const SEPARATION_RADIUS: f32 = 250.0;
pub const ALIGN_RADIUS: f32 = 150.0;
pub const COHESION_RADIUS: f32 = 150.0;
