//! Event types and sinks for observing layout runs.
//!
//! [`LayoutEvent`]s are emitted by [`crate::scatter::runner::run_layout_with_events`]
//! and [`crate::scatter::runner::LayoutRunner::run_with_events`] as the run moves
//! through its stages. Sinks may opt out of individual event kinds through
//! [`EventSink::wants`], which skips building the event entirely.
use glam::IVec2;

use crate::path::FallbackReason;
use crate::scatter::plan::Placement;
use crate::scatter::runner::{LayoutConfig, ParameterClamp};

/// Describes events emitted by a layout run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum LayoutEvent {
    /// Emitted once the configuration is sanitized and the seed resolved.
    RunStarted {
        /// The sanitized configuration.
        config: LayoutConfig,
        /// Seed driving every random draw of this run.
        seed: u64,
        /// Number of candidate images.
        pool_size: usize,
    },

    /// Emitted for every out-of-range parameter that was clamped.
    ParameterClamped { clamp: ParameterClamp },

    /// Emitted after path extraction.
    PathExtracted {
        /// Number of path points available for sampling.
        points: usize,
        /// Set when the synthetic circle replaced the extracted path.
        fallback: Option<FallbackReason>,
    },

    /// Emitted after placement points were chosen.
    PointsSelected { points: Vec<IVec2> },

    /// Emitted after images were assigned to placements.
    ImagesSelected {
        /// Pool index per placement, in placement order.
        assignment: Vec<usize>,
    },

    /// Emitted after a placement was composited.
    PlacementMade {
        /// Position of the placement in z-order.
        index: usize,
        placement: Placement,
        /// Top-left corner of the transformed image on the canvas.
        origin: IVec2,
        /// Size of the transformed image.
        size: (u32, u32),
    },

    /// Emitted when the run completes.
    RunFinished { placements: usize, seed: u64 },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. stage or parameter name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`LayoutEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutEventKind {
    RunStarted,
    ParameterClamped,
    PathExtracted,
    PointsSelected,
    ImagesSelected,
    PlacementMade,
    RunFinished,
    Warning,
}

impl LayoutEvent {
    pub fn kind(&self) -> LayoutEventKind {
        match self {
            LayoutEvent::RunStarted { .. } => LayoutEventKind::RunStarted,
            LayoutEvent::ParameterClamped { .. } => LayoutEventKind::ParameterClamped,
            LayoutEvent::PathExtracted { .. } => LayoutEventKind::PathExtracted,
            LayoutEvent::PointsSelected { .. } => LayoutEventKind::PointsSelected,
            LayoutEvent::ImagesSelected { .. } => LayoutEventKind::ImagesSelected,
            LayoutEvent::PlacementMade { .. } => LayoutEventKind::PlacementMade,
            LayoutEvent::RunFinished { .. } => LayoutEventKind::RunFinished,
            LayoutEvent::Warning { .. } => LayoutEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`LayoutEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: LayoutEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: LayoutEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = LayoutEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: LayoutEvent) {}

    #[inline]
    fn wants(&self, _kind: LayoutEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(LayoutEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(LayoutEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(LayoutEvent),
{
    #[inline]
    fn send(&mut self, event: LayoutEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally filtered by kind.
#[derive(Default)]
pub struct VecSink {
    events: Vec<LayoutEvent>,
    only: Option<Vec<LayoutEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collect only the listed kinds.
    pub fn only(kinds: impl IntoIterator<Item = LayoutEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<LayoutEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[LayoutEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: LayoutEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: LayoutEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: LayoutEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: LayoutEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: LayoutEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
