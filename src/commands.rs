//! Commands from the presentation layer into the analysis session.
//!
//! A renderer or form forwards user actions through a [`CommandSink`]; the
//! owner of the [`AnalysisSession`](crate::session::AnalysisSession) applies
//! them in order with `drain_commands`.

use std::sync::mpsc::{Receiver, SendError, Sender};

use crate::data::marker::{Axis, MarkerUpdate};
use crate::error::ThresholdField;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Place a marker at a clicked axis position. `axis: None` uses the first
    /// visible channel; an empty name gets a generated one.
    CreateMarker {
        frequency: f64,
        axis: Option<Axis>,
        name: String,
    },
    UpdateMarker {
        index: usize,
        update: MarkerUpdate,
    },
    RemoveMarker {
        index: usize,
    },
    ToggleVisibility {
        index: usize,
    },
    /// Move a row of the marker table from one display position to another.
    MoveMarker {
        from: usize,
        to: usize,
    },
    /// Brush over sample indices; `None` clears the window.
    SetBrush(Option<(usize, usize)>),
    SetThresholdField {
        row: usize,
        field: ThresholdField,
        value: String,
    },
    AddThresholdRow,
    GenerateThresholds,
}

/// Sending half handed to UI code.
#[derive(Clone)]
pub struct CommandSink {
    tx: Sender<EngineCommand>,
}

impl CommandSink {
    pub fn send(&self, cmd: EngineCommand) -> Result<(), SendError<EngineCommand>> {
        self.tx.send(cmd)
    }

    /// Forward a chart click as a marker creation.
    pub fn click_at(
        &self,
        frequency: f64,
        axis: Option<Axis>,
        name: impl Into<String>,
    ) -> Result<(), SendError<EngineCommand>> {
        self.tx.send(EngineCommand::CreateMarker {
            frequency,
            axis,
            name: name.into(),
        })
    }

    pub fn update_marker(
        &self,
        index: usize,
        update: MarkerUpdate,
    ) -> Result<(), SendError<EngineCommand>> {
        self.tx.send(EngineCommand::UpdateMarker { index, update })
    }

    pub fn brush(&self, range: Option<(usize, usize)>) -> Result<(), SendError<EngineCommand>> {
        self.tx.send(EngineCommand::SetBrush(range))
    }
}

pub fn channel() -> (CommandSink, Receiver<EngineCommand>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (CommandSink { tx }, rx)
}
