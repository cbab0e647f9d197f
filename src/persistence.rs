//! Session persistence: save and load analysis state to/from JSON files.
//!
//! Markers are stored through a mirror type since `Color32` does not derive
//! serde traits. Derived harmonic markers are recomputed on load and never stored.

use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::data::marker::{Axis, Marker, SideBands};
use crate::data::thresholds::{ThresholdBreakpoint, ThresholdInputs};
use crate::data::view::ViewSettings;
use crate::error::PersistenceError;
use crate::session::AnalysisSession;

// ---------- Serializable mirror types ----------

/// Serializable version of [`Marker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSerde {
    pub name: String,
    pub frequency: i64,
    pub band_width: f64,
    pub color_rgba: [u8; 4],
    pub harmonics: u32,
    pub sub_harmonics: u32,
    pub axis: Axis,
    pub visible: bool,
    #[serde(default)]
    pub side_bands: SideBands,
}

impl From<&Marker> for MarkerSerde {
    fn from(m: &Marker) -> Self {
        Self {
            name: m.name.clone(),
            frequency: m.frequency,
            band_width: m.band_width,
            color_rgba: m.color.to_array(),
            harmonics: m.harmonics,
            sub_harmonics: m.sub_harmonics,
            axis: m.axis,
            visible: m.visible,
            side_bands: m.side_bands,
        }
    }
}

impl MarkerSerde {
    pub fn into_marker(self) -> Marker {
        let [r, g, b, a] = self.color_rgba;
        Marker {
            frequency: self.frequency,
            band_width: self.band_width,
            color: Color32::from_rgba_premultiplied(r, g, b, a),
            harmonics: self.harmonics,
            sub_harmonics: self.sub_harmonics,
            axis: self.axis,
            name: self.name,
            visible: self.visible,
            side_bands: self.side_bands,
        }
    }
}

/// Everything needed to restore an analysis apart from the raw samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub analysis_name: String,
    pub view: ViewSettings,
    /// Markers in display order.
    pub markers: Vec<MarkerSerde>,
    /// Next value of the marker color counter.
    #[serde(default)]
    pub color_index: u64,
    #[serde(default)]
    pub thresholds: Vec<ThresholdBreakpoint>,
    /// RFC 3339 local time of the save.
    #[serde(default)]
    pub saved_at: Option<String>,
}

impl From<&AnalysisSession> for SessionSnapshot {
    fn from(session: &AnalysisSession) -> Self {
        let store = session.store();
        Self {
            analysis_name: session.analysis_name().to_string(),
            view: session.view().clone(),
            markers: store.display_order().map(|(_, m)| m.into()).collect(),
            color_index: store.color_index(),
            thresholds: session.threshold_inputs().rows().to_vec(),
            saved_at: Some(chrono::Local::now().to_rfc3339()),
        }
    }
}

impl SessionSnapshot {
    /// Replace the session's markers, view, name and threshold rows.
    /// Markers come back with identity display order; threshold curves must
    /// be generated again.
    pub fn apply_to(self, session: &mut AnalysisSession) {
        session.set_analysis_name(&self.analysis_name);
        session.restore_view(self.view);
        let markers = self.markers.into_iter().map(MarkerSerde::into_marker).collect();
        session.restore_markers(markers, self.color_index);
        let inputs = if self.thresholds.is_empty() {
            ThresholdInputs::default()
        } else {
            ThresholdInputs::from_rows(self.thresholds)
        };
        session.restore_thresholds(inputs);
    }
}

pub fn snapshot_to_json(snapshot: &SessionSnapshot) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn snapshot_from_json(json: &str) -> Result<SessionSnapshot, PersistenceError> {
    Ok(serde_json::from_str(json)?)
}

/// Save a snapshot to a JSON file.
pub fn save_to_path(snapshot: &SessionSnapshot, path: &Path) -> Result<(), PersistenceError> {
    let txt = snapshot_to_json(snapshot)?;
    std::fs::write(path, txt)?;
    log::info!("saved session with {} markers to {:?}", snapshot.markers.len(), path);
    Ok(())
}

/// Load a snapshot from a JSON file.
pub fn load_from_path(path: &Path) -> Result<SessionSnapshot, PersistenceError> {
    let txt = std::fs::read_to_string(path)?;
    snapshot_from_json(&txt)
}
