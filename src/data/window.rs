//! The brushed sub-range of the axis and the full-range predicate.

use serde::{Deserialize, Serialize};

use crate::data::samples::SamplePoint;

/// `None` means the full data domain is shown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainWindow {
    range: Option<[f64; 2]>,
}

impl DomainWindow {
    pub fn new(range: Option<[f64; 2]>) -> Self {
        Self { range }
    }

    pub fn range(&self) -> Option<[f64; 2]> {
        self.range
    }

    /// Translate a brush over sample indices into axis values.
    ///
    /// If either index falls outside `data` the window is left as it was and
    /// `false` is returned. Reversed indices are swapped.
    pub fn set_from_brush(
        &mut self,
        start_index: usize,
        end_index: usize,
        data: &[SamplePoint],
    ) -> bool {
        let (Some(a), Some(b)) = (data.get(start_index), data.get(end_index)) else {
            log::debug!(
                "brush [{start_index}, {end_index}] outside {} samples, ignored",
                data.len()
            );
            return false;
        };
        let (start, end) = if a.frequency <= b.frequency {
            (a.frequency, b.frequency)
        } else {
            (b.frequency, a.frequency)
        };
        self.range = Some([start, end]);
        true
    }

    pub fn clear(&mut self) {
        self.range = None;
    }

    /// Whether this window covers the whole of `data`.
    pub fn is_full_range(&self, data: &[SamplePoint]) -> bool {
        is_full_range(self.range, data)
    }

    /// Visible X domain: the window if set, otherwise `[0, last position]`.
    pub fn x_domain(&self, data: &[SamplePoint]) -> [f64; 2] {
        match self.range {
            Some(r) => r,
            None => [0.0, data.last().map(|p| p.frequency).unwrap_or(0.0)],
        }
    }
}

/// True when there is no window, no data, or the window spans the first and
/// last sample positions. Threshold overlays are only drawn in that case.
pub fn is_full_range(window: Option<[f64; 2]>, data: &[SamplePoint]) -> bool {
    let Some([start, end]) = window else {
        return true;
    };
    match (data.first(), data.last()) {
        (Some(first), Some(last)) => start <= first.frequency && end >= last.frequency,
        _ => true,
    }
}
