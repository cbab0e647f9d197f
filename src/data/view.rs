//! View settings: order vs. frequency domain, Y scale and channel visibility,
//! plus the label formatting that depends on them.

use serde::{Deserialize, Serialize};

use crate::data::marker::{round_half_up, Axis};
use crate::data::samples::AxisBounds;

/// How X values are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DomainType {
    /// Raw axis values (Hz or ms).
    #[default]
    Native,
    /// Multiples of the base frequency, e.g. `1.5x`.
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YScale {
    #[default]
    Linear,
    Log,
}

impl YScale {
    pub fn toggled(self) -> Self {
        match self {
            YScale::Linear => YScale::Log,
            YScale::Log => YScale::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleAxes {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Default for VisibleAxes {
    fn default() -> Self {
        Self {
            x: true,
            y: true,
            z: true,
        }
    }
}

impl VisibleAxes {
    pub fn is_visible(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn toggle(&mut self, axis: Axis) {
        let v = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        };
        *v = !*v;
    }

    /// First visible channel in x, y, z order; a chart click annotates this one.
    pub fn first_visible(&self) -> Option<Axis> {
        Axis::ALL.into_iter().find(|a| self.is_visible(*a))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    base_frequency: f64,
    pub domain: DomainType,
    pub y_scale: YScale,
    pub visible_axes: VisibleAxes,
    pub log_floor: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            base_frequency: 100.0,
            domain: DomainType::Native,
            y_scale: YScale::Linear,
            visible_axes: VisibleAxes::default(),
            log_floor: 0.0001,
        }
    }
}

impl ViewSettings {
    pub fn new(base_frequency: f64, log_floor: f64) -> Self {
        let mut s = Self {
            log_floor,
            ..Default::default()
        };
        s.set_base_frequency(base_frequency);
        s
    }

    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    /// Set the reference frequency for order ratios, rounded to an integer.
    /// Values that do not round to a positive number are rejected.
    pub fn set_base_frequency(&mut self, f: f64) -> bool {
        let rounded = round_half_up(f);
        if !rounded.is_finite() || rounded <= 0.0 {
            return false;
        }
        self.base_frequency = rounded;
        true
    }

    pub fn toggle_y_scale(&mut self) {
        self.y_scale = self.y_scale.toggled();
    }

    /// X tick label: the value itself, or `<ratio:.1>x` in the order domain.
    pub fn format_x_tick(&self, value: f64) -> String {
        match self.domain {
            DomainType::Native => format!("{value}"),
            DomainType::Order => format!("{:.1}x", value / self.base_frequency),
        }
    }

    /// `(tick count, minimum tick gap in px)` for the X axis.
    pub fn x_tick_layout(&self) -> (usize, f32) {
        match self.domain {
            DomainType::Native => (34, 20.0),
            DomainType::Order => (22, 10.0),
        }
    }

    /// Order ratio as shown in marker tables, e.g. `1.50x`.
    pub fn format_order(&self, frequency: f64) -> String {
        format!("{:.2}x", frequency / self.base_frequency)
    }

    /// Hover readout for one axis position; `values` are the visible channels.
    pub fn tooltip_lines(&self, frequency: f64, values: &[(Axis, Option<f64>)]) -> Vec<String> {
        let mut lines = vec![
            format!("Freq: {frequency:.0} Hz"),
            format!("Order: x{:.2}", frequency / self.base_frequency),
        ];
        for (axis, v) in values {
            let name = axis.label().replace("-Axis", "");
            match v {
                Some(v) if *v != 0.0 => lines.push(format!("{name}: {v:.2} mg")),
                _ => lines.push(format!("{name}: N/A mg")),
            }
        }
        lines
    }

    /// Y range for the plot; on a log scale the lower bound is raised to the floor.
    pub fn y_range(&self, bounds: &AxisBounds) -> [f64; 2] {
        match self.y_scale {
            YScale::Linear => [bounds.y_min, bounds.y_max],
            YScale::Log => [bounds.y_min.max(self.log_floor), bounds.y_max],
        }
    }

    /// Y tick label: two decimals, or exponent form on a log scale.
    pub fn format_y_tick(&self, value: f64) -> String {
        match self.y_scale {
            YScale::Linear => format!("{value:.2}"),
            YScale::Log => format!("{value:.2e}"),
        }
    }
}
