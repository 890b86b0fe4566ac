/*
 * Palette Module
 *
 * Fixed color tables for the pond scene and for each koi variant.
 * A variant maps to a head-to-tail body gradient, a spine shading tint and
 * a fin gradient. Variants without a dedicated table fall back to the red
 * (Kohaku) gradient; that fallback is load-bearing for new variants.
 */

use nannou::color::{srgba, Srgba};

use crate::koi::KoiVariant;

// Scene colors
pub fn water_top() -> Srgba<f32> {
    srgba(0.890, 0.933, 1.0, 1.0)
}

pub fn water_bottom() -> Srgba<f32> {
    srgba(0.953, 0.906, 0.914, 1.0)
}

pub fn ripple_stroke(strength: f32) -> Srgba<f32> {
    srgba(0.549, 0.588, 0.627, strength * 0.25)
}

pub fn shadow_fill() -> Srgba<f32> {
    srgba(0.0, 0.0, 0.0, 0.02)
}

pub fn food_fill() -> Srgba<f32> {
    srgba(0.545, 0.353, 0.169, 1.0)
}

pub fn food_stroke() -> Srgba<f32> {
    srgba(0.243, 0.153, 0.137, 1.0)
}

pub fn food_speckle() -> Srgba<f32> {
    srgba(0.361, 0.227, 0.118, 1.0)
}

// Two-stop linear gradient, interpolated per vertex by the renderer
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Gradient {
    pub start: Srgba<f32>,
    pub end: Srgba<f32>,
}

impl Gradient {
    pub fn sample(&self, t: f32) -> Srgba<f32> {
        let t = t.clamp(0.0, 1.0);
        srgba(
            self.start.color.red + (self.end.color.red - self.start.color.red) * t,
            self.start.color.green + (self.end.color.green - self.start.color.green) * t,
            self.start.color.blue + (self.end.color.blue - self.start.color.blue) * t,
            self.start.alpha + (self.end.alpha - self.start.alpha) * t,
        )
    }
}

// Head color shared by the body and fin gradients of a variant
fn head_color(variant: KoiVariant) -> Srgba<f32> {
    match variant {
        KoiVariant::Yamabuki => srgba(0.902, 0.667, 0.078, 1.0),
        KoiVariant::Utsuri => srgba(0.918, 0.345, 0.047, 1.0),
        KoiVariant::Taisho => srgba(0.929, 0.510, 0.290, 1.0),
        KoiVariant::Orenji => srgba(0.800, 0.259, 0.227, 1.0),
        // Kohaku, Tancho and anything new share the red head
        _ => srgba(0.843, 0.157, 0.157, 1.0),
    }
}

// Body fill, head to tail
pub fn body_gradient(variant: KoiVariant) -> Gradient {
    let end = match variant {
        KoiVariant::Yamabuki => srgba(0.980, 0.933, 0.816, 1.0),
        KoiVariant::Utsuri => srgba(0.980, 0.800, 0.082, 1.0),
        KoiVariant::Taisho => srgba(0.345, 0.561, 0.776, 1.0),
        KoiVariant::Orenji => srgba(0.886, 0.694, 0.337, 1.0),
        _ => srgba(0.969, 0.831, 0.831, 1.0),
    };
    Gradient {
        start: head_color(variant),
        end,
    }
}

// Darkened band drawn along the backbone, fading out toward the tail
pub fn spine_gradient(variant: KoiVariant) -> Gradient {
    let start = match variant {
        KoiVariant::Yamabuki => srgba(0.549, 0.392, 0.0, 0.4),
        KoiVariant::Utsuri => srgba(0.918, 0.345, 0.047, 0.3),
        KoiVariant::Taisho => srgba(0.929, 0.510, 0.290, 0.3),
        KoiVariant::Orenji => srgba(0.800, 0.259, 0.227, 0.3),
        _ => srgba(0.471, 0.078, 0.078, 0.4),
    };
    Gradient {
        start,
        end: srgba(0.0, 0.0, 0.0, 0.0),
    }
}

// Pelvic fin fill, root to tip
pub fn fin_gradient(variant: KoiVariant) -> Gradient {
    let end = match variant {
        KoiVariant::Orenji => srgba(0.886, 0.694, 0.337, 0.4),
        KoiVariant::Taisho => srgba(0.345, 0.561, 0.776, 0.4),
        _ => srgba(1.0, 1.0, 1.0, 0.0),
    };
    Gradient {
        start: head_color(variant),
        end,
    }
}

// Dorsal fin ribbon is variant independent
pub fn dorsal_gradient() -> Gradient {
    Gradient {
        start: srgba(1.0, 1.0, 1.0, 0.45),
        end: srgba(1.0, 1.0, 1.0, 0.05),
    }
}
