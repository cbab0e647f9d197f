//! Marker definitions: base markers, derived harmonic markers and typed updates.

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::config::MarkerLimits;
use crate::data::harmonics::expand_harmonics;

/// Signal channel a marker annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Label used in tables and CSV files, e.g. `X-Axis`.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X-Axis",
            Axis::Y => "Y-Axis",
            Axis::Z => "Z-Axis",
        }
    }

    /// Parse a label such as `X-Axis`, `y-axis` or plain `z`.
    ///
    /// Only the text before the first `-` is considered.
    pub fn from_label(s: &str) -> Option<Axis> {
        let head = s.split('-').next().unwrap_or("").trim().to_lowercase();
        match head.as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }

    /// Position of this axis in `[x, y, z]` sample tuples.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Side-band settings of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideBands {
    pub enabled: bool,
    pub count: u32,
    pub spacing: f64,
    pub left_enabled: bool,
    pub right_enabled: bool,
}

impl Default for SideBands {
    fn default() -> Self {
        Self {
            enabled: false,
            count: 2,
            spacing: 10.0,
            left_enabled: true,
            right_enabled: true,
        }
    }
}

impl SideBands {
    /// `L`, `R`, `L/R` or empty, depending on the enabled directions.
    pub fn direction_code(&self) -> &'static str {
        match (self.left_enabled, self.right_enabled) {
            (true, true) => "L/R",
            (true, false) => "L",
            (false, true) => "R",
            (false, false) => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideBandSide {
    Left,
    Right,
}

/// A derived overlay line. Never edited directly; see [`Marker::harmonic_markers`].
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicMarker {
    /// Integral for harmonics and sub-harmonics; side-bands keep fractional spacing.
    pub frequency: f64,
    pub band_width: f64,
    pub is_harmonic: bool,
    /// Only set for sub-harmonics, formatted `1/<n>`.
    pub order: Option<String>,
    pub is_side_band: bool,
    pub side: Option<SideBandSide>,
}

impl HarmonicMarker {
    /// Overlay label, e.g. `200 Hz`.
    pub fn label(&self) -> String {
        format!("{} Hz", self.frequency)
    }
}

/// A user-placed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub frequency: i64,
    pub band_width: f64,
    pub color: Color32,
    pub harmonics: u32,
    pub sub_harmonics: u32,
    pub axis: Axis,
    pub name: String,
    pub visible: bool,
    pub side_bands: SideBands,
}

impl Marker {
    /// A visible marker with no harmonics and default (disabled) side-bands.
    pub fn new(name: impl Into<String>, frequency: f64, axis: Axis) -> Self {
        Self {
            frequency: round_to_i64(frequency),
            band_width: 20.0,
            color: Color32::GRAY,
            harmonics: 0,
            sub_harmonics: 0,
            axis,
            name: name.into(),
            visible: true,
            side_bands: SideBands::default(),
        }
    }

    /// Derived overlay lines for this marker, recomputed on every call so they
    /// always reflect the current fields.
    pub fn harmonic_markers(&self) -> Vec<HarmonicMarker> {
        expand_harmonics(self)
    }

    /// Ratio of this marker's frequency to a reference frequency.
    pub fn order_ratio(&self, base_frequency: f64) -> f64 {
        self.frequency as f64 / base_frequency
    }

    /// Cap harmonic, sub-harmonic and side-band counts at `limits`.
    pub(crate) fn clamp_counts(&mut self, limits: &MarkerLimits) {
        self.harmonics = self.harmonics.min(limits.max_harmonics);
        self.sub_harmonics = self.sub_harmonics.min(limits.max_sub_harmonics);
        self.side_bands.count = self.side_bands.count.min(limits.max_side_bands);
    }

    /// Apply a typed field update. Returns `false` when the update was rejected
    /// (non-finite numbers) and the marker is unchanged.
    pub(crate) fn apply_update(&mut self, update: MarkerUpdate, limits: &MarkerLimits) -> bool {
        match update {
            MarkerUpdate::Name(name) => {
                self.name = name.chars().take(limits.max_marker_name_len).collect();
            }
            MarkerUpdate::Frequency(f) => {
                if !f.is_finite() {
                    return false;
                }
                self.frequency = round_to_i64(f);
            }
            MarkerUpdate::BandWidth(bw) => {
                if !bw.is_finite() {
                    return false;
                }
                self.band_width = bw.max(0.0);
            }
            MarkerUpdate::Harmonics(n) => self.harmonics = n.min(limits.max_harmonics),
            MarkerUpdate::SubHarmonics(n) => {
                self.sub_harmonics = n.min(limits.max_sub_harmonics)
            }
            MarkerUpdate::Axis(axis) => self.axis = axis,
            MarkerUpdate::Visible(v) => self.visible = v,
            MarkerUpdate::SideBand(sb) => match sb {
                SideBandUpdate::Enabled(v) => self.side_bands.enabled = v,
                SideBandUpdate::Count(n) => {
                    self.side_bands.count = n.min(limits.max_side_bands)
                }
                SideBandUpdate::Spacing(s) => {
                    if !s.is_finite() {
                        return false;
                    }
                    self.side_bands.spacing = s;
                }
                SideBandUpdate::LeftEnabled(v) => self.side_bands.left_enabled = v,
                SideBandUpdate::RightEnabled(v) => self.side_bands.right_enabled = v,
            },
        }
        true
    }
}

/// Edit of a single marker field.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerUpdate {
    Name(String),
    /// Rounded to the nearest integer before storage.
    Frequency(f64),
    /// Clamped at zero.
    BandWidth(f64),
    Harmonics(u32),
    SubHarmonics(u32),
    Axis(Axis),
    Visible(bool),
    SideBand(SideBandUpdate),
}

/// Edit of a field inside [`SideBands`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideBandUpdate {
    Enabled(bool),
    Count(u32),
    Spacing(f64),
    LeftEnabled(bool),
    RightEnabled(bool),
}

/// Round to the nearest integer with halves going toward positive infinity
/// (`-2.5 -> -2`, `2.5 -> 3`).
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

pub(crate) fn round_to_i64(x: f64) -> i64 {
    round_half_up(x) as i64
}

/// Convert a parsed count to an iteration count: negatives and non-finite
/// values become zero, fractions are truncated.
pub(crate) fn clamp_count(x: f64) -> u32 {
    if !x.is_finite() || x <= 0.0 {
        0
    } else if x >= u32::MAX as f64 {
        u32::MAX
    } else {
        x.trunc() as u32
    }
}

/// Golden-angle hue spacing so consecutive markers get well separated colors.
pub fn marker_color(index: u64) -> Color32 {
    let hue = (index as f64 * 137.508) % 360.0;
    hsl_to_color(hue, 0.7, 0.5)
}

fn hsl_to_color(hue: f64, saturation: f64, lightness: f64) -> Color32 {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(to_u8(r), to_u8(g), to_u8(b))
}
