//! Raw sample files: whitespace-separated `x y z` or `x y z fx fy fz` per line.
//!
//! The 0-based index of each non-blank line becomes the sample's axis position.

use crate::data::marker::Axis;
use crate::error::SampleFileError;

/// Replacement for exact zeros so log-scaled axes stay finite.
pub const ZERO_REPLACEMENT: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Axis position (Hz or ms); the line index in the source file.
    pub frequency: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Filtered channels, present for 6-column files.
    pub filtered: Option<[f64; 3]>,
}

impl SamplePoint {
    pub fn value(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn filtered_value(&self, axis: Axis) -> Option<f64> {
        self.filtered.map(|f| f[axis.index()])
    }
}

fn remap_zero(v: f64) -> f64 {
    if v == 0.0 {
        ZERO_REPLACEMENT
    } else {
        v
    }
}

/// Parse the whole text of a sample file.
pub fn parse_samples(text: &str) -> Result<Vec<SamplePoint>, SampleFileError> {
    let mut out = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut values = Vec::with_capacity(6);
        for tok in line.split_whitespace() {
            let v: f64 = tok.parse().map_err(|_| SampleFileError::Malformed {
                line: line_no + 1,
                reason: format!("{tok:?} is not a number"),
            })?;
            values.push(remap_zero(v));
        }
        let filtered = match values.len() {
            3 => None,
            6 => Some([values[3], values[4], values[5]]),
            n => {
                return Err(SampleFileError::Malformed {
                    line: line_no + 1,
                    reason: format!("expected 3 or 6 columns, found {n}"),
                })
            }
        };
        out.push(SamplePoint {
            frequency: out.len() as f64,
            x: values[0],
            y: values[1],
            z: values[2],
            filtered,
        });
    }
    if out.is_empty() {
        return Err(SampleFileError::Empty);
    }
    log::info!("parsed {} samples", out.len());
    Ok(out)
}

/// Plot extents derived from the loaded samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisBounds {
    /// X spans `[0, last position]`; Y spans `[min * 1.1, max * 1.5]` over all
    /// three raw channels. All zero for empty data.
    pub fn from_samples(data: &[SamplePoint]) -> Self {
        let Some(last) = data.last() else {
            return Self::default();
        };
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for p in data {
            for v in [p.x, p.y, p.z] {
                y_min = y_min.min(v);
                y_max = y_max.max(v);
            }
        }
        Self {
            x_min: 0.0,
            x_max: last.frequency,
            y_min: y_min * 1.1,
            y_max: y_max * 1.5,
        }
    }
}
