//! Warning/alert threshold breakpoints and their step curves.
//!
//! Breakpoints are edited as free text in any order. Building the curves sorts
//! them by start frequency and emits two points per breakpoint: its start and
//! the start of the next one (or `start + 1` for the last), so each breakpoint
//! becomes one horizontal segment.

use serde::{Deserialize, Serialize};

use crate::error::{ThresholdError, ThresholdField};

/// One editable row of the threshold table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBreakpoint {
    pub start_frequency: String,
    pub warning_amplitude: String,
    pub alert_amplitude: String,
}

impl ThresholdBreakpoint {
    pub fn new(start: &str, warning: &str, alert: &str) -> Self {
        Self {
            start_frequency: start.to_string(),
            warning_amplitude: warning.to_string(),
            alert_amplitude: alert.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.start_frequency.trim().is_empty()
            && self.warning_amplitude.trim().is_empty()
            && self.alert_amplitude.trim().is_empty()
    }

    fn field_mut(&mut self, field: ThresholdField) -> &mut String {
        match field {
            ThresholdField::StartFrequency => &mut self.start_frequency,
            ThresholdField::WarningAmplitude => &mut self.warning_amplitude,
            ThresholdField::AlertAmplitude => &mut self.alert_amplitude,
        }
    }
}

/// A stepAfter polyline as `(frequency, value)` points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepCurve(pub Vec<[f64; 2]>);

impl StepCurve {
    pub fn points(&self) -> &[[f64; 2]] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdCurves {
    pub warning: StepCurve,
    pub alert: StepCurve,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParsedBreakpoint {
    start: f64,
    warning: f64,
    alert: f64,
}

fn parse_field(row: usize, field: ThresholdField, value: &str) -> Result<f64, ThresholdError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ThresholdError::NotNumeric {
            row,
            field,
            value: value.to_string(),
        })
}

/// Build the warning and alert step curves.
///
/// Fully blank rows are ignored; any other non-numeric field is an error.
/// Breakpoints with equal start frequencies keep their input order.
pub fn build_step_curves(
    breakpoints: &[ThresholdBreakpoint],
) -> Result<ThresholdCurves, ThresholdError> {
    let mut parsed = Vec::with_capacity(breakpoints.len());
    for (i, bp) in breakpoints.iter().enumerate() {
        if bp.is_blank() {
            continue;
        }
        let row = i + 1;
        parsed.push(ParsedBreakpoint {
            start: parse_field(row, ThresholdField::StartFrequency, &bp.start_frequency)?,
            warning: parse_field(row, ThresholdField::WarningAmplitude, &bp.warning_amplitude)?,
            alert: parse_field(row, ThresholdField::AlertAmplitude, &bp.alert_amplitude)?,
        });
    }

    // slice::sort_by is stable
    parsed.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut curves = ThresholdCurves::default();
    for (i, bp) in parsed.iter().enumerate() {
        let end = match parsed.get(i + 1) {
            Some(next) => next.start,
            None => bp.start + 1.0,
        };
        curves.warning.0.push([bp.start, bp.warning]);
        curves.warning.0.push([end, bp.warning]);
        curves.alert.0.push([bp.start, bp.alert]);
        curves.alert.0.push([end, bp.alert]);
    }
    Ok(curves)
}

/// The editable threshold table. Starts with one empty row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdInputs {
    rows: Vec<ThresholdBreakpoint>,
}

impl Default for ThresholdInputs {
    fn default() -> Self {
        Self {
            rows: vec![ThresholdBreakpoint::default()],
        }
    }
}

impl ThresholdInputs {
    pub fn from_rows(rows: Vec<ThresholdBreakpoint>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ThresholdBreakpoint] {
        &self.rows
    }

    pub fn add_row(&mut self) {
        self.rows.push(ThresholdBreakpoint::default());
    }

    /// Set one field of the row at `index`. Returns `false` if there is no such row.
    pub fn set_field(&mut self, index: usize, field: ThresholdField, value: &str) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                *row.field_mut(field) = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&mut self, index: usize) -> Option<ThresholdBreakpoint> {
        if index < self.rows.len() {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }

    pub fn build(&self) -> Result<ThresholdCurves, ThresholdError> {
        build_step_curves(&self.rows)
    }
}
