/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for adjusting pond parameters and
 * the koi color theme. Parameter change detection is handled by PondParams.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::koi::KoiVariant;
use crate::params::PondParams;

// Update the UI and report (should_respawn, fish_count_changed, theme_changed, ui_changed)
pub fn update_ui(
    egui: &mut Egui,
    params: &mut PondParams,
    debug_info: &DebugInfo,
) -> (bool, bool, bool, bool) {
    let mut should_respawn = false;

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Pond Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Fish", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.fish_count, PondParams::get_fish_count_range())
                        .text("Fish Count"),
                );

                if ui.button("Respawn Fish").clicked() {
                    should_respawn = true;
                }

                ui.add(
                    egui::Slider::new(&mut params.body_length, PondParams::get_body_length_range())
                        .text("Body Length"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.wave_amplitude,
                        PondParams::get_wave_amplitude_range(),
                    )
                    .text("Wave Amplitude"),
                );
                ui.add(
                    egui::Slider::new(&mut params.swim_speed, PondParams::get_swim_speed_range())
                        .text("Swim Speed"),
                );
            });

            ui.collapsing("Color Theme", |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut params.theme, KoiVariant::Kohaku, "Pure Red");
                    ui.selectable_value(&mut params.theme, KoiVariant::Yamabuki, "Gold");
                    ui.selectable_value(&mut params.theme, KoiVariant::Utsuri, "Orange-Gold");
                });
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut params.theme, KoiVariant::Taisho, "Taisho");
                    ui.selectable_value(&mut params.theme, KoiVariant::Orenji, "Orenji");
                    ui.selectable_value(&mut params.theme, KoiVariant::Tancho, "Tancho");
                });
            });

            ui.collapsing("Light", |ui| {
                ui.add(
                    egui::Slider::new(
                        &mut params.shadow_angle,
                        PondParams::get_shadow_angle_range(),
                    )
                    .text("Shadow Angle"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.shadow_height,
                        PondParams::get_shadow_height_range(),
                    )
                    .text("Shadow Height"),
                );
            });

            ui.separator();
            ui.label("Click the water to drop food");
            ui.label(format!("FPS: {:.1}", debug_info.fps));
            ui.label(format!(
                "Frame time: {:.2} ms",
                debug_info.frame_time.as_secs_f64() * 1000.0
            ));

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    // Detect parameter changes
    let (fish_count_changed, theme_changed, ui_changed) = params.detect_changes();

    (should_respawn, fish_count_changed, theme_changed, ui_changed)
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    // Create a background panel in the top-left corner
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 200.0;
    let panel_height = line_height * 6.0 + margin;
    let panel_x = window_rect.left() + panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    // Draw the background panel
    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.left() + margin;
    let text_y = window_rect.top() - margin;

    // Draw each line of text
    let debug_texts = [
        format!("FPS: {:.1}", debug_info.fps),
        format!(
            "Frame time: {:.2} ms",
            debug_info.frame_time.as_secs_f64() * 1000.0
        ),
        format!("Fish: {}", debug_info.koi_count),
        format!("Food: {}", debug_info.food_count),
        format!("Ripples: {}", debug_info.ripple_count),
        format!("Gradient rebuilds: {}", debug_info.gradient_rebuilds),
    ];

    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        // Position the text with a fixed offset from the left edge
        draw.text(text)
            .x_y(text_x + 70.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
