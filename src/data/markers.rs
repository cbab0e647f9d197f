//! Marker storage with a separate display order.
//!
//! Markers live in a dense vector (storage order). `order` is a permutation of
//! storage indices giving the order in which tables and CSV exports list them.
//! Invariant: `order` is always a bijection onto `0..markers.len()`.

use crate::config::{MarkerDefaults, MarkerLimits};
use crate::data::marker::{marker_color, round_to_i64, Axis, Marker, MarkerUpdate, SideBands};
use crate::error::EngineError;

#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    order: Vec<usize>,
    color_index: u64,
    defaults: MarkerDefaults,
    limits: MarkerLimits,
}

impl MarkerStore {
    pub fn new(defaults: MarkerDefaults, limits: MarkerLimits) -> Self {
        Self {
            defaults,
            limits,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers in storage order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    /// Display order as storage indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Markers in display order, with their storage index.
    pub fn display_order(&self) -> impl Iterator<Item = (usize, &Marker)> + '_ {
        self.order.iter().map(move |&i| (i, &self.markers[i]))
    }

    /// Number of colors handed out so far.
    pub fn color_index(&self) -> u64 {
        self.color_index
    }

    pub fn limits(&self) -> &MarkerLimits {
        &self.limits
    }

    /// Move the color counter forward to `to`; it never goes back.
    pub(crate) fn advance_color_index(&mut self, to: u64) {
        self.color_index = self.color_index.max(to);
    }

    /// Hand out the next marker color and advance the counter.
    pub fn next_color(&mut self) -> egui::Color32 {
        let c = marker_color(self.color_index);
        self.color_index += 1;
        c
    }

    /// Append a marker and place it last in display order. Returns its storage index.
    pub fn add(&mut self, mut marker: Marker) -> usize {
        marker.clamp_counts(&self.limits);
        let index = self.markers.len();
        self.markers.push(marker);
        self.order.push(index);
        self.color_index += 1;
        log::debug!("marker {index} added ({} total)", self.markers.len());
        index
    }

    /// Create a marker at a clicked axis position using the configured defaults.
    ///
    /// An empty name becomes `Marker <n>` where `n` is the new marker count.
    /// A non-finite frequency is rejected and nothing is added.
    pub fn create_marker(
        &mut self,
        frequency: f64,
        axis: Axis,
        name: &str,
    ) -> Result<usize, EngineError> {
        if !frequency.is_finite() {
            return Err(EngineError::NonFiniteFrequency);
        }
        let name = if name.trim().is_empty() {
            format!("Marker {}", self.markers.len() + 1)
        } else {
            name.chars().take(self.limits.max_marker_name_len).collect()
        };
        let d = &self.defaults;
        let marker = Marker {
            frequency: round_to_i64(frequency),
            band_width: d.band_width,
            color: marker_color(self.color_index),
            harmonics: 0,
            sub_harmonics: 0,
            axis,
            name,
            visible: true,
            side_bands: SideBands {
                enabled: false,
                count: d.side_band_count,
                spacing: d.side_band_spacing,
                left_enabled: d.side_band_left,
                right_enabled: d.side_band_right,
            },
        };
        Ok(self.add(marker))
    }

    /// Apply one field update to the marker at storage `index`.
    ///
    /// Returns `Ok(false)` if the value was rejected (e.g. a non-finite number).
    pub fn update(&mut self, index: usize, update: MarkerUpdate) -> Result<bool, EngineError> {
        let len = self.markers.len();
        let marker = self
            .markers
            .get_mut(index)
            .ok_or(EngineError::MarkerIndex { index, len })?;
        let applied = marker.apply_update(update, &self.limits);
        if !applied {
            log::debug!("marker {index}: rejected non-finite update");
        }
        Ok(applied)
    }

    /// Remove the marker at storage `index`, compacting storage and reindexing the order.
    pub fn remove(&mut self, index: usize) -> Result<Marker, EngineError> {
        let len = self.markers.len();
        if index >= len {
            return Err(EngineError::MarkerIndex { index, len });
        }
        let removed = self.markers.remove(index);
        self.order.retain(|&i| i != index);
        for i in self.order.iter_mut() {
            if *i > index {
                *i -= 1;
            }
        }
        log::debug!("marker {index} removed ({} left)", self.markers.len());
        Ok(removed)
    }

    /// Flip the visibility of the marker at storage `index`. Returns the new state.
    pub fn toggle_visibility(&mut self, index: usize) -> Result<bool, EngineError> {
        let len = self.markers.len();
        let marker = self
            .markers
            .get_mut(index)
            .ok_or(EngineError::MarkerIndex { index, len })?;
        marker.visible = !marker.visible;
        Ok(marker.visible)
    }

    /// Move the entry at display position `from` to display position `to`.
    /// Storage order is untouched.
    pub fn move_in_display_order(&mut self, from: usize, to: usize) -> Result<(), EngineError> {
        let len = self.order.len();
        if from >= len {
            return Err(EngineError::DisplayPosition {
                position: from,
                len,
            });
        }
        if to >= len {
            return Err(EngineError::DisplayPosition { position: to, len });
        }
        let entry = self.order.remove(from);
        self.order.insert(to, entry);
        Ok(())
    }

    /// Replace every marker at once; display order becomes storage order.
    /// Counts are capped at the store's limits.
    pub fn replace_all(&mut self, mut markers: Vec<Marker>) {
        for m in markers.iter_mut() {
            m.clamp_counts(&self.limits);
        }
        self.order = (0..markers.len()).collect();
        self.markers = markers;
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.order.clear();
    }

    /// Set the display order directly; rejected unless it is a permutation.
    pub fn set_order(&mut self, order: Vec<usize>) -> bool {
        if !is_permutation(&order, self.markers.len()) {
            return false;
        }
        self.order = order;
        true
    }

    /// Check the order invariant.
    pub fn order_is_consistent(&self) -> bool {
        is_permutation(&self.order, self.markers.len())
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}
