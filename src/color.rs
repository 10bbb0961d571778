use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Timepoint;
use crate::volcano::Significance;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting at `hue_offset` degrees.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.6);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fixed mappings
// ---------------------------------------------------------------------------

/// One colour per timepoint, indexed by [`Timepoint::index`].
#[derive(Debug, Clone)]
pub struct TimepointColors {
    colors: Vec<Color32>,
}

impl Default for TimepointColors {
    fn default() -> Self {
        Self {
            colors: generate_palette(Timepoint::ALL.len(), 200.0),
        }
    }
}

impl TimepointColors {
    pub fn color_for(&self, timepoint: Timepoint) -> Color32 {
        self.colors
            .get(timepoint.index())
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

pub const TREND_LINE: Color32 = Color32::WHITE;
pub const PANEL_BACKGROUND: Color32 = Color32::from_rgb(0x2C, 0x5F, 0x7C);

pub fn significance_color(sig: Significance) -> Color32 {
    match sig {
        // crimson
        Significance::Up => Color32::from_rgb(220, 20, 60),
        // sea green
        Significance::Down => Color32::from_rgb(46, 139, 87),
        Significance::NotSignificant => Color32::from_rgb(0x22, 0x22, 0x22),
    }
}
