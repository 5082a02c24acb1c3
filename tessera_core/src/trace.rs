// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-loop instrumentation.
//!
//! [`TraceSink`] has one method per event, each defaulting to a no-op.
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`; with the `trace`
//! feature off every method compiles to nothing, with it on each call is a
//! single `Option` branch.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps during a canvas frame
//! and produces a [`FrameSummary`].

use kurbo::Vec2;

use crate::depth_field::{FallbackReason, RendererKind};
use crate::motion::PanState;
use crate::time::HostTime;
use crate::timing::{FrameTick, LoopKind};
use crate::visibility::GridRange;

/// Which part of a frame is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Distortion update and velocity decay.
    Motion,
    /// Visibility resolution.
    Resolve,
    /// Reconciling tile elements with the host.
    Present,
    /// Star field advance and draw.
    Field,
}

impl PhaseKind {
    /// Short lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Motion => "motion",
            Self::Resolve => "resolve",
            Self::Present => "present",
            Self::Field => "field",
        }
    }
}

/// Emitted when a loop receives a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTickEvent {
    /// Per-loop frame counter.
    pub frame_index: u64,
    /// Loop that ticked.
    pub source: LoopKind,
    /// Host time of the tick.
    pub now: HostTime,
    /// Milliseconds since the loop started.
    pub elapsed_ms: f64,
}

impl FrameTickEvent {
    /// Builds the event for `tick` at `elapsed_ms` into its loop.
    #[must_use]
    pub const fn new(tick: &FrameTick, elapsed_ms: f64) -> Self {
        Self {
            frame_index: tick.frame_index,
            source: tick.source,
            now: tick.now,
            elapsed_ms,
        }
    }
}

/// Marks the beginning of a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Phase starting.
    pub phase: PhaseKind,
    /// Host time at phase start.
    pub timestamp: HostTime,
}

/// Marks the end of a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Phase ending.
    pub phase: PhaseKind,
    /// Host time at phase end.
    pub timestamp: HostTime,
}

/// Emitted after visibility resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilesResolvedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Pan offset used.
    pub offset: Vec2,
    /// Buffered unit range, `None` for an empty viewport.
    pub range: Option<GridRange>,
    /// Number of tile instances produced.
    pub instances: u32,
}

/// Emitted when new distortion frequencies are pushed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortionEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Horizontal base frequency.
    pub freq_x: f64,
    /// Vertical base frequency.
    pub freq_y: f64,
}

/// Emitted once when a parallax field picks its renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererSelectedEvent {
    /// Chosen renderer.
    pub kind: RendererKind,
    /// Why the accelerated path was skipped.
    pub fallback_reason: Option<FallbackReason>,
    /// Stars in the field.
    pub star_count: u32,
}

/// Per-frame summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Loop that produced the frame.
    pub source: LoopKind,
    /// Host time of the tick.
    pub now: HostTime,
    /// Milliseconds since the loop started.
    pub elapsed_ms: f64,
    /// Motion phase duration in ticks (0 if not measured).
    pub motion_ticks: u64,
    /// Resolve phase duration in ticks (0 if not measured).
    pub resolve_ticks: u64,
    /// Present phase duration in ticks (0 if not measured).
    pub present_ticks: u64,
    /// Field phase duration in ticks (0 if not measured).
    pub field_ticks: u64,
    /// Tile instances materialized this frame.
    pub instances: u32,
    /// Pan offset at the end of the frame.
    pub offset: Vec2,
    /// Whether velocity had decayed to zero.
    pub at_rest: bool,
}

/// Receives trace events. Every method defaults to a no-op.
pub trait TraceSink {
    /// A loop received a tick.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// A phase began.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// A phase ended.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Visibility was resolved.
    fn on_tiles_resolved(&mut self, e: &TilesResolvedEvent) {
        _ = e;
    }

    /// Distortion frequencies were pushed.
    fn on_distortion(&mut self, e: &DistortionEvent) {
        _ = e;
    }

    /// A parallax field chose its renderer.
    fn on_renderer_selected(&mut self, e: &RendererSelectedEvent) {
        _ = e;
    }

    /// A frame summary is ready.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

/// A [`TraceSink`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:expr) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards everything.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameTickEvent`].
    #[inline]
    pub fn frame_tick(&mut self, e: &FrameTickEvent) {
        dispatch!(self, on_frame_tick, e);
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        dispatch!(self, on_phase_begin, e);
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        dispatch!(self, on_phase_end, e);
    }

    /// Emits a [`TilesResolvedEvent`].
    #[inline]
    pub fn tiles_resolved(&mut self, e: &TilesResolvedEvent) {
        dispatch!(self, on_tiles_resolved, e);
    }

    /// Emits a [`DistortionEvent`].
    #[inline]
    pub fn distortion(&mut self, e: &DistortionEvent) {
        dispatch!(self, on_distortion, e);
    }

    /// Emits a [`RendererSelectedEvent`].
    #[inline]
    pub fn renderer_selected(&mut self, e: &RendererSelectedEvent) {
        dispatch!(self, on_renderer_selected, e);
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        dispatch!(self, on_frame_summary, s);
    }
}

const PHASES: usize = 4;

const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Motion => 0,
        PhaseKind::Resolve => 1,
        PhaseKind::Present => 2,
        PhaseKind::Field => 3,
    }
}

/// Collects phase timestamps and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: FrameTickEvent,
    starts: [Option<HostTime>; PHASES],
    ends: [Option<HostTime>; PHASES],
    instances: u32,
    pan: PanState,
}

impl FrameSummaryBuilder {
    /// Starts a summary for `tick`.
    #[must_use]
    pub fn new(tick: &FrameTickEvent) -> Self {
        Self {
            tick: *tick,
            starts: [None; PHASES],
            ends: [None; PHASES],
            instances: 0,
            pan: PanState::default(),
        }
    }

    /// Records a phase start.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.starts[phase_index(phase)] = Some(t);
    }

    /// Records a phase end.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.ends[phase_index(phase)] = Some(t);
    }

    /// Records how many tiles were materialized.
    pub fn set_instances(&mut self, instances: usize) {
        self.instances = u32::try_from(instances).unwrap_or(u32::MAX);
    }

    /// Records the pan state at the end of the frame.
    pub fn set_pan(&mut self, pan: &PanState) {
        self.pan = *pan;
    }

    /// Produces the summary.
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.frame_index,
            source: self.tick.source,
            now: self.tick.now,
            elapsed_ms: self.tick.elapsed_ms,
            motion_ticks: self.duration(PhaseKind::Motion),
            resolve_ticks: self.duration(PhaseKind::Resolve),
            present_ticks: self.duration(PhaseKind::Present),
            field_ticks: self.duration(PhaseKind::Field),
            instances: self.instances,
            offset: self.pan.offset,
            at_rest: self.pan.is_at_rest(),
        }
    }

    fn duration(&self, phase: PhaseKind) -> u64 {
        let i = phase_index(phase);
        match (self.starts[i], self.ends[i]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).ticks(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick() -> FrameTickEvent {
        FrameTickEvent::new(
            &FrameTick {
                now: HostTime(1_000_000),
                frame_index: 42,
                source: LoopKind::Canvas,
            },
            16.5,
        )
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut b = FrameSummaryBuilder::new(&sample_tick());
        b.phase_begin(PhaseKind::Motion, HostTime(1_000_000));
        b.phase_end(PhaseKind::Motion, HostTime(1_000_040));
        b.phase_begin(PhaseKind::Resolve, HostTime(1_000_040));
        b.phase_end(PhaseKind::Resolve, HostTime(1_000_300));
        b.phase_begin(PhaseKind::Present, HostTime(1_000_300));
        b.phase_end(PhaseKind::Present, HostTime(1_001_000));
        b.set_instances(100);
        b.set_pan(&PanState::at(Vec2::new(-5.0, -6.0)));

        let s = b.finish();
        assert_eq!(s.frame_index, 42);
        assert_eq!(s.motion_ticks, 40);
        assert_eq!(s.resolve_ticks, 260);
        assert_eq!(s.present_ticks, 700);
        assert_eq!(s.field_ticks, 0);
        assert_eq!(s.instances, 100);
        assert_eq!(s.offset, Vec2::new(-5.0, -6.0));
        assert!(s.at_rest);
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_tick(&sample_tick());
        tracer.distortion(&DistortionEvent {
            frame_index: 0,
            freq_x: 0.01,
            freq_y: 0.06,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct Recording {
            ticks: Vec<u64>,
            selected: Vec<RendererKind>,
        }
        impl TraceSink for Recording {
            fn on_frame_tick(&mut self, e: &FrameTickEvent) {
                self.ticks.push(e.frame_index);
            }
            fn on_renderer_selected(&mut self, e: &RendererSelectedEvent) {
                self.selected.push(e.kind);
            }
        }

        let mut sink = Recording {
            ticks: Vec::new(),
            selected: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_tick(&sample_tick());
        tracer.renderer_selected(&RendererSelectedEvent {
            kind: RendererKind::Fallback,
            fallback_reason: Some(FallbackReason::ShaderCompile),
            star_count: 800,
        });
        drop(tracer);
        assert_eq!(sink.ticks, &[42]);
        assert_eq!(sink.selected, &[RendererKind::Fallback]);
    }
}
