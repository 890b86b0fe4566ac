/*
 * Pond Parameters Module
 *
 * This module defines the PondParams struct that contains all the
 * adjustable parameters for the koi pond. These parameters can be
 * modified through the UI. It also provides methods for parameter change
 * detection and management to improve separation of concerns.
 */

use crate::koi::KoiVariant;

// Parameters for the simulation that can be adjusted via UI
pub struct PondParams {
    // Consumed only when the pond is (re)spawned
    pub fish_count: usize,
    pub body_length: f32,
    pub wave_amplitude: f32,
    pub swim_speed: f32,
    // Shadow direction in degrees and offset distance in surface units
    pub shadow_angle: f32,
    pub shadow_height: f32,
    // Applied to every fish immediately on change
    pub theme: KoiVariant,
    pub show_debug: bool,
    pub pause_simulation: bool,

    // Internal state for tracking changes
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
struct ParamSnapshot {
    fish_count: usize,
    body_length: f32,
    wave_amplitude: f32,
    swim_speed: f32,
    shadow_angle: f32,
    shadow_height: f32,
    theme: KoiVariant,
    show_debug: bool,
    pause_simulation: bool,
}

impl Default for PondParams {
    fn default() -> Self {
        Self {
            fish_count: 6,
            body_length: 1.0,
            wave_amplitude: 1.0,
            swim_speed: 1.0,
            shadow_angle: 45.0,
            shadow_height: 50.0,
            theme: KoiVariant::Kohaku,
            show_debug: false,
            pause_simulation: false,
            // Initialize with no previous values
            previous_values: None,
        }
    }
}

impl PondParams {
    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(ParamSnapshot {
            fish_count: self.fish_count,
            body_length: self.body_length,
            wave_amplitude: self.wave_amplitude,
            swim_speed: self.swim_speed,
            shadow_angle: self.shadow_angle,
            shadow_height: self.shadow_height,
            theme: self.theme,
            show_debug: self.show_debug,
            pause_simulation: self.pause_simulation,
        });
    }

    // Check what changed since the last snapshot.
    // Returns (fish_count_changed, theme_changed, any_ui_changed).
    pub fn detect_changes(&self) -> (bool, bool, bool) {
        let mut fish_count_changed = false;
        let mut theme_changed = false;
        let mut ui_changed = false;

        // If we don't have previous values, nothing has changed
        if let Some(prev) = &self.previous_values {
            if self.fish_count != prev.fish_count {
                fish_count_changed = true;
                ui_changed = true;
            }

            if self.theme != prev.theme {
                theme_changed = true;
                ui_changed = true;
            }

            if self.body_length != prev.body_length
                || self.wave_amplitude != prev.wave_amplitude
                || self.swim_speed != prev.swim_speed
                || self.shadow_angle != prev.shadow_angle
                || self.shadow_height != prev.shadow_height
                || self.show_debug != prev.show_debug
                || self.pause_simulation != prev.pause_simulation
            {
                ui_changed = true;
            }
        }

        (fish_count_changed, theme_changed, ui_changed)
    }

    // Get parameter ranges for UI sliders
    pub fn get_fish_count_range() -> std::ops::RangeInclusive<usize> {
        0..=60
    }

    pub fn get_body_length_range() -> std::ops::RangeInclusive<f32> {
        0.5..=2.0
    }

    pub fn get_wave_amplitude_range() -> std::ops::RangeInclusive<f32> {
        0.0..=2.0
    }

    pub fn get_swim_speed_range() -> std::ops::RangeInclusive<f32> {
        0.1..=3.0
    }

    pub fn get_shadow_angle_range() -> std::ops::RangeInclusive<f32> {
        0.0..=360.0
    }

    pub fn get_shadow_height_range() -> std::ops::RangeInclusive<f32> {
        0.0..=120.0
    }
}
