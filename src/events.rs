//! Change notifications from the analysis session.
//!
//! Renderers and tables subscribe via [`EventController`] with an
//! [`EventFilter`] and receive [`EngineEvent`]s on an `mpsc` channel. Each
//! event carries a set of [`EventKind`] flags; an event is delivered when
//! `(event.kinds & filter) != 0`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    // ── Markers ─────────────────────────────────────────────────────────
    pub const MARKER_ADDED: Self = Self(1 << 0);
    /// A field of an existing marker changed (including visibility).
    pub const MARKER_UPDATED: Self = Self(1 << 1);
    pub const MARKER_REMOVED: Self = Self(1 << 2);
    /// Display order changed without touching marker fields.
    pub const MARKER_REORDERED: Self = Self(1 << 3);
    /// The whole marker collection was replaced by an import.
    pub const MARKERS_IMPORTED: Self = Self(1 << 4);
    pub const MARKERS_EXPORTED: Self = Self(1 << 5);

    // ── View ────────────────────────────────────────────────────────────
    pub const WINDOW_CHANGED: Self = Self(1 << 6);
    pub const VIEW_CHANGED: Self = Self(1 << 7);

    // ── Data ────────────────────────────────────────────────────────────
    pub const SAMPLES_LOADED: Self = Self(1 << 8);
    pub const THRESHOLDS_GENERATED: Self = Self(1 << 9);

    /// Wildcard: matches every event kind.
    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }
        let pairs: &[(EventKind, &str)] = &[
            (EventKind::MARKER_ADDED, "MARKER_ADDED"),
            (EventKind::MARKER_UPDATED, "MARKER_UPDATED"),
            (EventKind::MARKER_REMOVED, "MARKER_REMOVED"),
            (EventKind::MARKER_REORDERED, "MARKER_REORDERED"),
            (EventKind::MARKERS_IMPORTED, "MARKERS_IMPORTED"),
            (EventKind::MARKERS_EXPORTED, "MARKERS_EXPORTED"),
            (EventKind::WINDOW_CHANGED, "WINDOW_CHANGED"),
            (EventKind::VIEW_CHANGED, "VIEW_CHANGED"),
            (EventKind::SAMPLES_LOADED, "SAMPLES_LOADED"),
            (EventKind::THRESHOLDS_GENERATED, "THRESHOLDS_GENERATED"),
        ];
        let mut names = Vec::new();
        let mut known_bits = 0u32;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }
        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{extra:x}"));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EngineEvent
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub kinds: EventKind,
    /// Seconds since the controller was created; set on emit.
    pub timestamp: f64,
    /// Storage index of the affected marker, for single-marker events.
    pub marker_index: Option<usize>,
    /// Number of markers/samples involved, for bulk events.
    pub count: Option<usize>,
    /// Visible window after a `WINDOW_CHANGED`.
    pub window: Option<[f64; 2]>,
}

impl EngineEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            marker_index: None,
            count: None,
            window: None,
        }
    }

    pub fn with_marker(mut self, index: usize) -> Self {
        self.marker_index = Some(index);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_window(mut self, window: Option<[f64; 2]>) -> Self {
        self.window = window;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &EngineEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<EngineEvent>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    start_instant: std::time::Instant,
}

/// Distributes engine events to subscribers. Cheap to clone; clones share subscribers.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: std::time::Instant::now(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EventCtrlInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn subscribe(&self, filter: EventFilter) -> Receiver<EngineEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.lock().subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<EngineEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Send `event` to every subscriber whose filter matches. Subscribers whose
    /// receiver was dropped are removed when a send to them fails.
    pub fn emit(&self, mut event: EngineEvent) {
        let mut inner = self.lock();
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}
