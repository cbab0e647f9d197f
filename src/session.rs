//! View-level analysis state: markers, samples, brush window, thresholds and
//! view settings, plus the import guard and file loading.
//!
//! Every mutation is synchronous. File content is read completely before any
//! parsing, and an import replaces the marker collection in a single step.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::commands::EngineCommand;
use crate::config::AnalysisConfig;
use crate::data::marker::{Axis, Marker, MarkerUpdate};
use crate::data::marker_csv::{export_file_name, export_markers, parse_markers_csv_with_limits};
use crate::data::markers::MarkerStore;
use crate::data::samples::{parse_samples, AxisBounds, SamplePoint};
use crate::data::thresholds::{ThresholdCurves, ThresholdInputs};
use crate::data::view::ViewSettings;
use crate::data::window::DomainWindow;
use crate::error::{ImportError, SampleFileError, SessionError, ThresholdField};
use crate::events::{EngineEvent, EventController, EventKind};

// ─────────────────────────────────────────────────────────────────────────────
// Import guard
// ─────────────────────────────────────────────────────────────────────────────

/// Allows at most one marker import per session to be outstanding.
#[derive(Debug, Clone, Default)]
pub struct ImportSlot {
    busy: Arc<AtomicBool>,
}

impl ImportSlot {
    pub fn try_acquire(&self) -> Option<ImportTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ImportTicket {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that an import is in flight. Dropping it frees the slot, which also
/// happens when a pending `import_markers_file_async` future is dropped.
#[derive(Debug)]
pub struct ImportTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for ImportTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File reading
// ─────────────────────────────────────────────────────────────────────────────

/// Read a whole text file.
pub fn read_text(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

/// Read a whole text file without blocking the executor. Cancel by dropping the future.
#[cfg(feature = "async-io")]
pub async fn read_text_async(path: impl AsRef<Path>) -> std::io::Result<String> {
    tokio::fs::read_to_string(path).await
}

// ─────────────────────────────────────────────────────────────────────────────
// AnalysisSession
// ─────────────────────────────────────────────────────────────────────────────

pub struct AnalysisSession {
    config: AnalysisConfig,
    store: MarkerStore,
    samples: Vec<SamplePoint>,
    bounds: AxisBounds,
    window: DomainWindow,
    thresholds: ThresholdInputs,
    curves: Option<ThresholdCurves>,
    view: ViewSettings,
    analysis_name: String,
    import_slot: ImportSlot,
    events: EventController,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        let store = MarkerStore::new(config.marker_defaults.clone(), config.limits.clone());
        let view = ViewSettings::new(config.base_frequency, config.log_floor);
        Self {
            config,
            store,
            samples: Vec::new(),
            bounds: AxisBounds::default(),
            window: DomainWindow::default(),
            thresholds: ThresholdInputs::default(),
            curves: None,
            view,
            analysis_name: String::new(),
            import_slot: ImportSlot::default(),
            events: EventController::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn events(&self) -> &EventController {
        &self.events
    }

    fn emit(&self, event: EngineEvent) {
        self.events.emit(event);
    }

    // ── Markers ─────────────────────────────────────────────────────────

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// Create a marker from a chart click. Without an explicit axis the first
    /// visible channel is used (X if all are hidden).
    pub fn create_marker(
        &mut self,
        frequency: f64,
        axis: Option<Axis>,
        name: &str,
    ) -> Result<usize, SessionError> {
        let axis = axis
            .or_else(|| self.view.visible_axes.first_visible())
            .unwrap_or(Axis::X);
        let index = self.store.create_marker(frequency, axis, name)?;
        self.emit(EngineEvent::new(EventKind::MARKER_ADDED).with_marker(index));
        Ok(index)
    }

    /// Add a fully specified marker (its color is kept).
    pub fn add_marker(&mut self, marker: Marker) -> usize {
        let index = self.store.add(marker);
        self.emit(EngineEvent::new(EventKind::MARKER_ADDED).with_marker(index));
        index
    }

    pub fn update_marker(&mut self, index: usize, update: MarkerUpdate) -> Result<bool, SessionError> {
        let applied = self.store.update(index, update)?;
        if applied {
            self.emit(EngineEvent::new(EventKind::MARKER_UPDATED).with_marker(index));
        }
        Ok(applied)
    }

    pub fn remove_marker(&mut self, index: usize) -> Result<Marker, SessionError> {
        let removed = self.store.remove(index)?;
        self.emit(EngineEvent::new(EventKind::MARKER_REMOVED).with_marker(index));
        Ok(removed)
    }

    pub fn toggle_marker_visibility(&mut self, index: usize) -> Result<bool, SessionError> {
        let visible = self.store.toggle_visibility(index)?;
        self.emit(EngineEvent::new(EventKind::MARKER_UPDATED).with_marker(index));
        Ok(visible)
    }

    pub fn move_marker(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.store.move_in_display_order(from, to)?;
        self.emit(EngineEvent::new(EventKind::MARKER_REORDERED));
        Ok(())
    }

    /// Restore a saved marker collection in display order.
    pub(crate) fn restore_markers(&mut self, markers: Vec<Marker>, color_index: u64) {
        let n = markers.len();
        self.store.replace_all(markers);
        self.store.advance_color_index(color_index);
        self.emit(EngineEvent::new(EventKind::MARKERS_IMPORTED).with_count(n));
    }

    // ── Import / export ─────────────────────────────────────────────────

    /// Reserve the import slot. Fails while another import is outstanding.
    pub fn begin_import(&self) -> Result<ImportTicket, SessionError> {
        self.import_slot.try_acquire().ok_or_else(|| {
            log::warn!("marker import refused: another import is in progress");
            SessionError::ImportInFlight
        })
    }

    pub fn import_in_flight(&self) -> bool {
        self.import_slot.is_busy()
    }

    /// Complete an import started with [`begin_import`](Self::begin_import).
    /// The ticket is released whether or not the text is valid.
    pub fn finish_marker_import(
        &mut self,
        ticket: ImportTicket,
        text: &str,
    ) -> Result<usize, SessionError> {
        let result = self.store.import_csv(text);
        drop(ticket);
        match result {
            Ok(n) => {
                self.emit(EngineEvent::new(EventKind::MARKERS_IMPORTED).with_count(n));
                Ok(n)
            }
            Err(e) => {
                log::warn!("marker import failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Validate and apply a marker CSV in one step.
    pub fn import_markers_csv(&mut self, text: &str) -> Result<usize, SessionError> {
        let ticket = self.begin_import()?;
        self.finish_marker_import(ticket, text)
    }

    pub fn import_markers_file(&mut self, path: &Path) -> Result<usize, SessionError> {
        let ticket = self.begin_import()?;
        let text = read_text(path).map_err(ImportError::Io)?;
        self.finish_marker_import(ticket, &text)
    }

    /// Read and import a marker file without blocking the executor. The import
    /// slot is held across the read.
    #[cfg(feature = "async-io")]
    pub async fn import_markers_file_async(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<usize, SessionError> {
        let ticket = self.begin_import()?;
        let text = read_text_async(path).await.map_err(ImportError::Io)?;
        self.finish_marker_import(ticket, &text)
    }

    /// Check a marker CSV without applying it.
    pub fn validate_markers_csv(&self, text: &str) -> Result<usize, ImportError> {
        parse_markers_csv_with_limits(text, self.store.limits()).map(|m| m.len())
    }

    pub fn export_markers_csv(&self) -> Result<String, csv::Error> {
        let s = export_markers(&self.store, self.view.base_frequency())?;
        self.emit(EngineEvent::new(EventKind::MARKERS_EXPORTED).with_count(self.store.len()));
        Ok(s)
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(&self.analysis_name)
    }

    /// Write the marker CSV into `dir` under [`export_file_name`](Self::export_file_name).
    pub fn export_markers_to_dir(&self, dir: &Path) -> Result<PathBuf, csv::Error> {
        let path = dir.join(self.export_file_name());
        let s = self.export_markers_csv()?;
        std::fs::write(&path, s)?;
        log::info!("exported {} markers to {:?}", self.store.len(), path);
        Ok(path)
    }

    // ── Samples ─────────────────────────────────────────────────────────

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    pub fn axis_bounds(&self) -> &AxisBounds {
        &self.bounds
    }

    /// Replace the loaded samples. The brush window is cleared since it
    /// referred to the old data.
    pub fn load_samples_text(&mut self, text: &str) -> Result<usize, SessionError> {
        let samples = parse_samples(text)?;
        let n = samples.len();
        self.bounds = AxisBounds::from_samples(&samples);
        self.samples = samples;
        self.window.clear();
        self.emit(EngineEvent::new(EventKind::SAMPLES_LOADED).with_count(n));
        Ok(n)
    }

    pub fn load_samples_file(&mut self, path: &Path) -> Result<usize, SessionError> {
        let text = read_text(path).map_err(SampleFileError::Io)?;
        self.load_samples_text(&text)
    }

    // ── Domain window ───────────────────────────────────────────────────

    pub fn window(&self) -> &DomainWindow {
        &self.window
    }

    /// Apply a brush over sample indices. Out-of-range brushes change nothing.
    pub fn set_brush(&mut self, start_index: usize, end_index: usize) -> bool {
        let changed = self
            .window
            .set_from_brush(start_index, end_index, &self.samples);
        if changed {
            self.emit(EngineEvent::new(EventKind::WINDOW_CHANGED).with_window(self.window.range()));
        }
        changed
    }

    pub fn clear_brush(&mut self) {
        self.window.clear();
        self.emit(EngineEvent::new(EventKind::WINDOW_CHANGED));
    }

    pub fn is_full_range(&self) -> bool {
        self.window.is_full_range(&self.samples)
    }

    pub fn x_domain(&self) -> [f64; 2] {
        self.window.x_domain(&self.samples)
    }

    // ── Thresholds ──────────────────────────────────────────────────────

    pub fn threshold_inputs(&self) -> &ThresholdInputs {
        &self.thresholds
    }

    pub fn add_threshold_row(&mut self) {
        self.thresholds.add_row();
    }

    pub fn set_threshold_field(&mut self, row: usize, field: ThresholdField, value: &str) -> bool {
        self.thresholds.set_field(row, field, value)
    }

    pub fn remove_threshold_row(&mut self, row: usize) -> bool {
        self.thresholds.remove_row(row).is_some()
    }

    pub(crate) fn restore_thresholds(&mut self, inputs: ThresholdInputs) {
        self.thresholds = inputs;
        self.curves = None;
    }

    /// Build the step curves from the current rows. On error the previously
    /// generated curves are kept.
    pub fn generate_thresholds(&mut self) -> Result<&ThresholdCurves, SessionError> {
        let curves = self.thresholds.build()?;
        self.emit(EngineEvent::new(EventKind::THRESHOLDS_GENERATED).with_count(curves.warning.0.len() / 2));
        Ok(self.curves.insert(curves))
    }

    pub fn threshold_curves(&self) -> Option<&ThresholdCurves> {
        self.curves.as_ref()
    }

    /// Curves to draw right now: only once generated and while the whole
    /// domain is visible.
    pub fn visible_threshold_curves(&self) -> Option<&ThresholdCurves> {
        if self.is_full_range() {
            self.curves.as_ref()
        } else {
            None
        }
    }

    // ── View ────────────────────────────────────────────────────────────

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewSettings {
        &mut self.view
    }

    pub(crate) fn restore_view(&mut self, view: ViewSettings) {
        self.view = view;
        self.emit(EngineEvent::new(EventKind::VIEW_CHANGED));
    }

    pub fn set_base_frequency(&mut self, f: f64) -> Result<(), SessionError> {
        if !self.view.set_base_frequency(f) {
            return Err(SessionError::BaseFrequency(f));
        }
        self.emit(EngineEvent::new(EventKind::VIEW_CHANGED));
        Ok(())
    }

    pub fn analysis_name(&self) -> &str {
        &self.analysis_name
    }

    pub fn set_analysis_name(&mut self, name: &str) {
        self.analysis_name = name
            .chars()
            .take(self.config.limits.max_analysis_name_len)
            .collect();
    }

    // ── Commands ────────────────────────────────────────────────────────

    pub fn apply_command(&mut self, cmd: EngineCommand) -> Result<(), SessionError> {
        match cmd {
            EngineCommand::CreateMarker {
                frequency,
                axis,
                name,
            } => {
                self.create_marker(frequency, axis, &name)?;
            }
            EngineCommand::UpdateMarker { index, update } => {
                self.update_marker(index, update)?;
            }
            EngineCommand::RemoveMarker { index } => {
                self.remove_marker(index)?;
            }
            EngineCommand::ToggleVisibility { index } => {
                self.toggle_marker_visibility(index)?;
            }
            EngineCommand::MoveMarker { from, to } => self.move_marker(from, to)?,
            EngineCommand::SetBrush(Some((start, end))) => {
                self.set_brush(start, end);
            }
            EngineCommand::SetBrush(None) => self.clear_brush(),
            EngineCommand::SetThresholdField { row, field, value } => {
                self.set_threshold_field(row, field, &value);
            }
            EngineCommand::AddThresholdRow => self.add_threshold_row(),
            EngineCommand::GenerateThresholds => {
                self.generate_thresholds()?;
            }
        }
        Ok(())
    }

    /// Apply every queued command in order. Failing commands are logged and
    /// skipped. Returns how many succeeded.
    pub fn drain_commands(&mut self, rx: &Receiver<EngineCommand>) -> usize {
        let mut applied = 0;
        while let Ok(cmd) = rx.try_recv() {
            match self.apply_command(cmd) {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("command failed: {e}"),
            }
        }
        applied
    }
}
