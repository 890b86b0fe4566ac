/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and entity counters to be displayed in the UI overlay.
 */

use std::time::Duration;

// Debug information to display
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub koi_count: usize,
    pub food_count: usize,
    pub ripple_count: usize,
    // Gradient cache rebuilds observed on the last update
    pub gradient_rebuilds: usize,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            koi_count: 0,
            food_count: 0,
            ripple_count: 0,
            gradient_rebuilds: 0,
        }
    }
}
