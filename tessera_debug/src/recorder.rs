// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each prefixed by a one-byte
//! tag. Floating-point fields are stored as their IEEE-754 bits. [`decode`]
//! reads them back as an iterator of [`RecordedEvent`]; an unknown tag or a
//! truncated record ends the iteration.

use kurbo::Vec2;

use tessera_core::depth_field::{FallbackReason, RendererKind};
use tessera_core::time::HostTime;
use tessera_core::timing::LoopKind;
use tessera_core::trace::{
    DistortionEvent, FrameSummary, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    RendererSelectedEvent, TilesResolvedEvent, TraceSink,
};
use tessera_core::visibility::GridRange;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_TICK: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_TILES_RESOLVED: u8 = 4;
const TAG_DISTORTION: u8 = 5;
const TAG_RENDERER_SELECTED: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_vec2(&mut self, v: Vec2) {
        self.write_f64(v.x);
        self.write_f64(v.y);
    }

    fn write_source(&mut self, source: LoopKind) {
        self.write_u8(match source {
            LoopKind::Canvas => 0,
            LoopKind::Field => 1,
        });
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Motion => 0,
            PhaseKind::Resolve => 1,
            PhaseKind::Present => 2,
            PhaseKind::Field => 3,
        });
    }

    fn write_range(&mut self, range: Option<GridRange>) {
        match range {
            Some(r) => {
                self.write_u8(1);
                self.write_i64(r.start_col);
                self.write_i64(r.end_col);
                self.write_i64(r.start_row);
                self.write_i64(r.end_row);
            }
            None => {
                self.write_u8(0);
                for _ in 0..4 {
                    self.write_i64(0);
                }
            }
        }
    }

    fn write_fallback_reason(&mut self, reason: Option<FallbackReason>) {
        self.write_u8(match reason {
            None => 0,
            Some(FallbackReason::ContextUnavailable) => 1,
            Some(FallbackReason::ShaderCompile) => 2,
            Some(FallbackReason::ProgramLink) => 3,
            Some(FallbackReason::Resource) => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.write_u8(TAG_FRAME_TICK);
        self.write_u64(e.frame_index);
        self.write_source(e.source);
        self.write_u64(e.now.ticks());
        self.write_f64(e.elapsed_ms);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_tiles_resolved(&mut self, e: &TilesResolvedEvent) {
        self.write_u8(TAG_TILES_RESOLVED);
        self.write_u64(e.frame_index);
        self.write_vec2(e.offset);
        self.write_range(e.range);
        self.write_u32(e.instances);
    }

    fn on_distortion(&mut self, e: &DistortionEvent) {
        self.write_u8(TAG_DISTORTION);
        self.write_u64(e.frame_index);
        self.write_f64(e.freq_x);
        self.write_f64(e.freq_y);
    }

    fn on_renderer_selected(&mut self, e: &RendererSelectedEvent) {
        self.write_u8(TAG_RENDERER_SELECTED);
        self.write_u8(match e.kind {
            RendererKind::Accelerated => 0,
            RendererKind::Fallback => 1,
        });
        self.write_fallback_reason(e.fallback_reason);
        self.write_u32(e.star_count);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_source(s.source);
        self.write_u64(s.now.ticks());
        self.write_f64(s.elapsed_ms);
        self.write_u64(s.motion_ticks);
        self.write_u64(s.resolve_ticks);
        self.write_u64(s.present_ticks);
        self.write_u64(s.field_ticks);
        self.write_u32(s.instances);
        self.write_vec2(s.offset);
        self.write_u8(u8::from(s.at_rest));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`TilesResolvedEvent`].
    TilesResolved(TilesResolvedEvent),
    /// A [`DistortionEvent`].
    Distortion(DistortionEvent),
    /// A [`RendererSelectedEvent`].
    RendererSelected(RendererSelectedEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes: [u8; N] = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        let [v] = self.take::<1>()?;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_i64(&mut self) -> Option<i64> {
        self.take().map(i64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_vec2(&mut self) -> Option<Vec2> {
        Some(Vec2::new(self.read_f64()?, self.read_f64()?))
    }

    fn read_source(&mut self) -> Option<LoopKind> {
        Some(match self.read_u8()? {
            0 => LoopKind::Canvas,
            _ => LoopKind::Field,
        })
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Motion,
            1 => PhaseKind::Resolve,
            2 => PhaseKind::Present,
            _ => PhaseKind::Field,
        })
    }

    fn read_range(&mut self) -> Option<Option<GridRange>> {
        let present = self.read_u8()?;
        let range = GridRange {
            start_col: self.read_i64()?,
            end_col: self.read_i64()?,
            start_row: self.read_i64()?,
            end_row: self.read_i64()?,
        };
        Some((present != 0).then_some(range))
    }

    fn read_fallback_reason(&mut self) -> Option<Option<FallbackReason>> {
        Some(match self.read_u8()? {
            0 => None,
            1 => Some(FallbackReason::ContextUnavailable),
            2 => Some(FallbackReason::ShaderCompile),
            3 => Some(FallbackReason::ProgramLink),
            _ => Some(FallbackReason::Resource),
        })
    }

    fn decode_frame_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameTick(FrameTickEvent {
            frame_index: self.read_u64()?,
            source: self.read_source()?,
            now: HostTime(self.read_u64()?),
            elapsed_ms: self.read_f64()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_tiles_resolved(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TilesResolved(TilesResolvedEvent {
            frame_index: self.read_u64()?,
            offset: self.read_vec2()?,
            range: self.read_range()?,
            instances: self.read_u32()?,
        }))
    }

    fn decode_distortion(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Distortion(DistortionEvent {
            frame_index: self.read_u64()?,
            freq_x: self.read_f64()?,
            freq_y: self.read_f64()?,
        }))
    }

    fn decode_renderer_selected(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RendererSelected(RendererSelectedEvent {
            kind: match self.read_u8()? {
                0 => RendererKind::Accelerated,
                _ => RendererKind::Fallback,
            },
            fallback_reason: self.read_fallback_reason()?,
            star_count: self.read_u32()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            source: self.read_source()?,
            now: HostTime(self.read_u64()?),
            elapsed_ms: self.read_f64()?,
            motion_ticks: self.read_u64()?,
            resolve_ticks: self.read_u64()?,
            present_ticks: self.read_u64()?,
            field_ticks: self.read_u64()?,
            instances: self.read_u32()?,
            offset: self.read_vec2()?,
            at_rest: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_FRAME_TICK => self.decode_frame_tick(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_TILES_RESOLVED => self.decode_tiles_resolved(),
            TAG_DISTORTION => self.decode_distortion(),
            TAG_RENDERER_SELECTED => self.decode_renderer_selected(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::timing::FrameTick;

    fn sample_tick_event() -> FrameTickEvent {
        FrameTickEvent::new(
            &FrameTick {
                now: HostTime(1_000_000),
                frame_index: 7,
                source: LoopKind::Canvas,
            },
            116.5,
        )
    }

    fn sample_summary() -> FrameSummary {
        FrameSummary {
            frame_index: 7,
            source: LoopKind::Canvas,
            now: HostTime(1_000_000),
            elapsed_ms: 116.5,
            motion_ticks: 40,
            resolve_ticks: 260,
            present_ticks: 700,
            field_ticks: 0,
            instances: 60,
            offset: Vec2::new(-1778.0, -1570.0),
            at_rest: false,
        }
    }

    #[test]
    fn round_trip_frame_tick() {
        let mut rec = RecorderSink::new();
        let orig = sample_tick_event();
        rec.on_frame_tick(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, vec![RecordedEvent::FrameTick(orig)]);
    }

    #[test]
    fn round_trip_tiles_resolved_with_and_without_range() {
        let mut rec = RecorderSink::new();
        let with_range = TilesResolvedEvent {
            frame_index: 2,
            offset: Vec2::new(-1728.0, -1600.0),
            range: Some(GridRange {
                start_col: 0,
                end_col: 3,
                start_row: 0,
                end_row: 2,
            }),
            instances: 60,
        };
        let empty = TilesResolvedEvent {
            frame_index: 3,
            offset: Vec2::new(-1728.0, -1600.0),
            range: None,
            instances: 0,
        };
        rec.on_tiles_resolved(&with_range);
        rec.on_tiles_resolved(&empty);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            vec![
                RecordedEvent::TilesResolved(with_range),
                RecordedEvent::TilesResolved(empty),
            ]
        );
    }

    #[test]
    fn round_trip_renderer_selected() {
        let mut rec = RecorderSink::new();
        let orig = RendererSelectedEvent {
            kind: RendererKind::Fallback,
            fallback_reason: Some(FallbackReason::ProgramLink),
            star_count: 800,
        };
        rec.on_renderer_selected(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, vec![RecordedEvent::RendererSelected(orig)]);
    }

    #[test]
    fn round_trip_multiple_events() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&sample_tick_event());
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 7,
            phase: PhaseKind::Motion,
            timestamp: HostTime(1_000_000),
        });
        rec.on_distortion(&DistortionEvent {
            frame_index: 7,
            freq_x: 0.010_116,
            freq_y: 0.059_998,
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 7,
            phase: PhaseKind::Motion,
            timestamp: HostTime(1_000_040),
        });
        rec.on_frame_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], RecordedEvent::FrameTick(_)));
        assert!(matches!(events[1], RecordedEvent::PhaseBegin(_)));
        match &events[2] {
            RecordedEvent::Distortion(e) => {
                assert_eq!(e.freq_x, 0.010_116);
                assert_eq!(e.freq_y, 0.059_998);
            }
            other => panic!("expected Distortion, got {other:?}"),
        }
        assert!(matches!(events[3], RecordedEvent::PhaseEnd(_)));
        assert_eq!(events[4], RecordedEvent::FrameSummary(sample_summary()));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&sample_tick_event());
        rec.on_frame_summary(&sample_summary());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RecordedEvent::FrameTick(_)));
    }

    #[test]
    fn unknown_tag_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&sample_tick_event());
        let mut bytes = rec.into_bytes();
        bytes.push(0xFF);
        bytes.extend_from_slice(&[0; 16]);

        assert_eq!(decode(&bytes).count(), 1);
    }
}
