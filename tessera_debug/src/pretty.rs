// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host
//! timestamps are converted to microseconds using a [`Timebase`].

use std::io::Write;

use tessera_core::time::{HostTime, Timebase};
use tessera_core::trace::{
    DistortionEvent, FrameSummary, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent,
    RendererSelectedEvent, TilesResolvedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ticks_to_us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.ticks_to_us(t.ticks())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] {} frame={} now={:.1}µs elapsed={:.1}ms",
            e.source.label(),
            e.frame_index,
            self.host_us(e.now),
            e.elapsed_ms,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.label(),
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.label(),
            self.host_us(e.timestamp),
        );
    }

    fn on_tiles_resolved(&mut self, e: &TilesResolvedEvent) {
        match e.range {
            Some(r) => {
                let _ = writeln!(
                    self.writer,
                    "[tiles] frame={} offset=({:.1}, {:.1}) cols={}..={} rows={}..={} instances={}",
                    e.frame_index,
                    e.offset.x,
                    e.offset.y,
                    r.start_col,
                    r.end_col,
                    r.start_row,
                    r.end_row,
                    e.instances,
                );
            }
            None => {
                let _ = writeln!(
                    self.writer,
                    "[tiles] frame={} offset=({:.1}, {:.1}) empty viewport",
                    e.frame_index, e.offset.x, e.offset.y,
                );
            }
        }
    }

    fn on_distortion(&mut self, e: &DistortionEvent) {
        let _ = writeln!(
            self.writer,
            "[distortion] frame={} base={:.5} {:.5}",
            e.frame_index, e.freq_x, e.freq_y,
        );
    }

    fn on_renderer_selected(&mut self, e: &RendererSelectedEvent) {
        let reason = e
            .fallback_reason
            .map_or_else(|| "-".to_owned(), |r| r.to_string());
        let _ = writeln!(
            self.writer,
            "[renderer] {:?} stars={} reason={reason}",
            e.kind, e.star_count,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let rest = if s.at_rest { "rest" } else { "moving" };
        let _ = writeln!(
            self.writer,
            "[summary] {} frame={} motion={:.1}µs resolve={:.1}µs present={:.1}µs \
             field={:.1}µs instances={} {rest}",
            s.source.label(),
            s.frame_index,
            self.ticks_to_us(s.motion_ticks),
            self.ticks_to_us(s.resolve_ticks),
            self.ticks_to_us(s.present_ticks),
            self.ticks_to_us(s.field_ticks),
            s.instances,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use tessera_core::depth_field::{FallbackReason, RendererKind};
    use tessera_core::timing::{FrameTick, LoopKind};
    use tessera_core::visibility::GridRange;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_frame_tick(&FrameTickEvent::new(
            &FrameTick {
                now: HostTime(1_000_000),
                frame_index: 1,
                source: LoopKind::Canvas,
            },
            16.0,
        ));
        let output = output(sink);
        assert!(output.contains("[tick] canvas"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("now=1000.0µs"), "got: {output}");
    }

    #[test]
    fn pretty_print_tiles_and_empty_viewport() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_tiles_resolved(&TilesResolvedEvent {
            frame_index: 3,
            offset: Vec2::new(-1728.0, -1600.0),
            range: Some(GridRange {
                start_col: 0,
                end_col: 3,
                start_row: 0,
                end_row: 2,
            }),
            instances: 60,
        });
        sink.on_tiles_resolved(&TilesResolvedEvent {
            frame_index: 4,
            offset: Vec2::ZERO,
            range: None,
            instances: 0,
        });
        let output = output(sink);
        assert!(output.contains("cols=0..=3 rows=0..=2 instances=60"), "got: {output}");
        assert!(output.contains("frame=4 offset=(0.0, 0.0) empty viewport"), "got: {output}");
    }

    #[test]
    fn pretty_print_fallback_reason() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_renderer_selected(&RendererSelectedEvent {
            kind: RendererKind::Fallback,
            fallback_reason: Some(FallbackReason::ContextUnavailable),
            star_count: 800,
        });
        let output = output(sink);
        assert!(output.contains("Fallback stars=800"), "got: {output}");
        assert!(output.contains("reason=context unavailable"), "got: {output}");
    }
}
