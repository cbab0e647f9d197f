//! Spectral markers crate root: re-exports and module wiring.
//!
//! An engine for annotating vibration spectra with markers, derived
//! harmonic/side-band overlay lines and warning/alert threshold curves:
//! - `data`: markers, harmonic expansion, marker CSV, samples, domain window, thresholds, view settings
//! - `session`: the analysis session owning all state, with the import guard
//! - `overlay`: overlay geometry and egui_plot rendering
//! - `commands` / `events`: command channel in, change notifications out
//! - `persistence`: JSON session snapshots
//! - `config`: YAML user defaults

pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod overlay;
pub mod persistence;
pub mod session;

// Public re-exports for a compact external API
pub use commands::{channel, CommandSink, EngineCommand};
pub use config::{AnalysisConfig, MarkerDefaults, MarkerLimits};
pub use data::harmonics::expand_harmonics;
pub use data::marker::{Axis, HarmonicMarker, Marker, MarkerUpdate, SideBandSide, SideBandUpdate, SideBands};
pub use data::markers::MarkerStore;
pub use data::thresholds::{build_step_curves, StepCurve, ThresholdBreakpoint, ThresholdCurves};
pub use data::window::{is_full_range, DomainWindow};
pub use error::{EngineError, ImportError, SampleFileError, SessionError, ThresholdError, ThresholdField};
pub use events::{EngineEvent, EventController, EventFilter, EventKind};
pub use overlay::{build_overlays, render_overlays, ChannelTrace, Overlays};
pub use persistence::SessionSnapshot;
pub use session::{AnalysisSession, ImportTicket};
