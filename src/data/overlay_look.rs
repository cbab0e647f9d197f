//! OverlayLook: visual styling for marker lines, bands and threshold curves.

use egui::Color32;
use egui_plot::LineStyle;

use crate::data::marker::Axis;

/// Stroke colors of the raw x/y/z channels.
pub fn axis_color(axis: Axis) -> Color32 {
    match axis {
        Axis::X => Color32::from_rgb(0xff, 0xc6, 0xb7),
        Axis::Y => Color32::from_rgb(0xfd, 0x8c, 0x73),
        Axis::Z => Color32::from_rgb(0xe3, 0x06, 0x13),
    }
}

pub const WARNING_COLOR: Color32 = Color32::from_rgb(0xFA, 0xCC, 0x15);
pub const ALERT_COLOR: Color32 = Color32::from_rgb(0xE1, 0x1D, 0x48);

/// The look of one overlay element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLook {
    pub color: Color32,
    pub width: f32,
    pub style: LineStyle,
    /// Stroke opacity for lines, fill opacity for bands.
    pub opacity: f32,
}

impl Default for OverlayLook {
    fn default() -> Self {
        Self {
            color: Color32::GRAY,
            width: 1.0,
            style: LineStyle::Solid,
            opacity: 1.0,
        }
    }
}

impl OverlayLook {
    /// Dashed `7 3` reference line.
    pub fn dashed(color: Color32, opacity: f32) -> Self {
        Self {
            color,
            width: 1.0,
            style: LineStyle::Dashed { length: 7.0 },
            opacity,
        }
    }

    pub fn band(color: Color32, fill_opacity: f32) -> Self {
        Self {
            color,
            width: 0.0,
            style: LineStyle::Solid,
            opacity: fill_opacity,
        }
    }

    pub fn solid(color: Color32) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Color with the opacity folded into alpha.
    pub fn effective_color(&self) -> Color32 {
        let a = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(self.color.r(), self.color.g(), self.color.b(), a)
    }
}
