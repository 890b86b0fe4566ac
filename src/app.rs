/*
 * Application Module
 *
 * This module defines the main application model and logic for the koi pond.
 * It wires the window, the egui controls, the fixed-timestep simulation and
 * the renderer together. All mutation happens here in update(); the view
 * only reads.
 */

use nannou::prelude::*;
use nannou::winit::event::MouseButton;
use nannou_egui::Egui;
use std::cell::RefCell;

use crate::debug::DebugInfo;
use crate::params::PondParams;
use crate::physics;
use crate::renderer::{self, RenderScratch};
use crate::ui;
use crate::world::World;

// Screen-space background mesh, rebuilt only when the surface size changes
pub struct BackgroundCache {
    pub size: Vec2,
    pub mesh: [(Point2, Srgba<f32>); 4],
}

impl BackgroundCache {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: vec2(width, height),
            mesh: build_background_mesh(width, height),
        }
    }

    // Returns true when the mesh was rebuilt
    pub fn refresh(&mut self, width: f32, height: f32) -> bool {
        if self.size.x == width && self.size.y == height {
            return false;
        }
        self.size = vec2(width, height);
        self.mesh = build_background_mesh(width, height);
        true
    }
}

fn build_background_mesh(width: f32, height: f32) -> [(Point2, Srgba<f32>); 4] {
    let top = crate::palette::water_top();
    let bottom = crate::palette::water_bottom();
    [
        (pt2(-width * 0.5, -height * 0.5), bottom),
        (pt2(width * 0.5, -height * 0.5), bottom),
        (pt2(width * 0.5, height * 0.5), top),
        (pt2(-width * 0.5, height * 0.5), top),
    ]
}

// Main model for the application
pub struct Model {
    pub world: World,
    pub params: PondParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub mouse_position: Vec2,
    // Simulation surface size in points, mirrors the window's inner rect
    pub surface_size: Vec2,
    pub background: BackgroundCache,
    // Curve flattening buffers, mutated during view() only
    pub render_scratch: RefCell<RenderScratch>,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // Get the primary monitor's dimensions
    let monitor = app.primary_monitor().expect("Failed to get primary monitor");
    let monitor_size = monitor.size();

    // Calculate window size based on monitor size (80% of monitor size)
    let window_width = monitor_size.width as f32 * 0.8;
    let window_height = monitor_size.height as f32 * 0.8;

    // Create the main window with dynamic size
    let window_id = app
        .new_window()
        .title("Koi Pond")
        .size(window_width as u32, window_height as u32)
        .view(renderer::view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    // Get the window
    let window = app.window(window_id).unwrap();

    // Create the UI
    let egui = Egui::from_window(&window);

    let params = PondParams::default();

    let rect = window.rect();
    let width = rect.w();
    let height = rect.h();

    // Populate the pond
    let mut world = World::new();
    let mut rng = rand::thread_rng();
    world.spawn_kois(params.fish_count, params.theme, width, height, &mut rng);

    Model {
        world,
        params,
        egui,
        debug_info: DebugInfo::default(),
        mouse_position: Vec2::ZERO,
        surface_size: vec2(width, height),
        background: BackgroundCache::new(width, height),
        render_scratch: RefCell::new(RenderScratch::new()),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    // Update debug info
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    // Update UI and check what changed
    let (should_respawn, fish_count_changed, theme_changed, _ui_changed) =
        ui::update_ui(&mut model.egui, &mut model.params, &model.debug_info);

    // Track the window size; the background mesh follows it
    let rect = app.window_rect();
    let width = rect.w();
    let height = rect.h();
    model.surface_size = vec2(width, height);
    model.background.refresh(width, height);

    let mut rng = rand::thread_rng();

    // Handle respawn
    if should_respawn || fish_count_changed {
        model.world.spawn_kois(
            model.params.fish_count,
            model.params.theme,
            width,
            height,
            &mut rng,
        );
    }

    if theme_changed {
        model.world.set_variant(model.params.theme);
    }

    // Refresh the per-fish gradient caches outside the render path
    let mut rebuilds = 0;
    for koi in &mut model.world.kois {
        if koi.cache.refresh(koi.variant) {
            rebuilds += 1;
        }
    }
    model.debug_info.gradient_rebuilds = rebuilds;

    model.debug_info.koi_count = model.world.kois.len();
    model.debug_info.food_count = model.world.foods.len();
    model.debug_info.ripple_count = model.world.ripples.len();

    // Advance the simulation by one fixed step per frame
    if !model.params.pause_simulation {
        physics::tick(&mut model.world, width, height, &model.params, &mut rng);
    }
}

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.mouse_position = vec2(pos.x, pos.y);
}

// Mouse pressed event handler: drop a food pellet where the water was clicked
pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }

    // Ignore clicks that land on the UI
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    // Window coords are centered with y up; the simulation uses a top-left
    // origin with y down
    let sim = vec2(
        model.mouse_position.x + model.surface_size.x * 0.5,
        model.surface_size.y * 0.5 - model.mouse_position.y,
    );
    model.world.add_food(sim);
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Pass events to egui
    model.egui.handle_raw_event(event);
}
