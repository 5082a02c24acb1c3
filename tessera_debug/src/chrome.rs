// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each loop gets its own thread row: the canvas loop is `tid` 0 and the
//! star field loop is `tid` 1. Phase begin/end pairs become duration slices
//! on the row of the most recent tick.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use tessera_core::time::Timebase;
use tessera_core::timing::LoopKind;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Events without their own timestamp reuse the last seen one.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;
    let mut current_tid = 0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameTick(e) => {
                last_ts = ticks_to_us(e.now.ticks(), timebase);
                current_tid = tid(e.source);
                events.push(json!({
                    "ph": "i",
                    "name": "FrameTick",
                    "cat": "Loop",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": current_tid,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "loop": e.source.label(),
                        "elapsed_ms": e.elapsed_ms,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "B",
                    "name": e.phase.label(),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": current_tid,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "E",
                    "name": e.phase.label(),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": current_tid,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::TilesResolved(e) => {
                let range = e.range.map(|r| {
                    json!({
                        "cols": [r.start_col, r.end_col],
                        "rows": [r.start_row, r.end_row],
                    })
                });
                events.push(json!({
                    "ph": "i",
                    "name": "TilesResolved",
                    "cat": "Canvas",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": current_tid,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "offset": [e.offset.x, e.offset.y],
                        "range": range,
                        "instances": e.instances,
                    }
                }));
            }
            RecordedEvent::Distortion(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "Distortion",
                    "cat": "Canvas",
                    "ts": last_ts,
                    "pid": 0,
                    "args": {
                        "freq_x": e.freq_x,
                        "freq_y": e.freq_y,
                    }
                }));
            }
            RecordedEvent::RendererSelected(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RendererSelected",
                    "cat": "Field",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": tid(LoopKind::Field),
                    "s": "g",
                    "args": {
                        "kind": format!("{:?}", e.kind),
                        "fallback_reason": e.fallback_reason.map(|r| r.to_string()),
                        "star_count": e.star_count,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": ticks_to_us(s.now.ticks(), timebase),
                    "pid": 0,
                    "tid": tid(s.source),
                    "s": "t",
                    "args": {
                        "frame_index": s.frame_index,
                        "motion_us": ticks_to_us(s.motion_ticks, timebase),
                        "resolve_us": ticks_to_us(s.resolve_ticks, timebase),
                        "present_us": ticks_to_us(s.present_ticks, timebase),
                        "field_us": ticks_to_us(s.field_ticks, timebase),
                        "instances": s.instances,
                        "offset": [s.offset.x, s.offset.y],
                        "at_rest": s.at_rest,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn tid(source: LoopKind) -> u32 {
    match source {
        LoopKind::Canvas => 0,
        LoopKind::Field => 1,
    }
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use kurbo::Vec2;
    use tessera_core::depth_field::{FallbackReason, RendererKind};
    use tessera_core::time::HostTime;
    use tessera_core::timing::FrameTick;
    use tessera_core::trace::{
        DistortionEvent, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
        RendererSelectedEvent, TilesResolvedEvent, TraceSink,
    };

    fn export_to_values(rec: &RecorderSink, timebase: Timebase) -> Vec<Value> {
        let mut out = Vec::new();
        export(rec.as_bytes(), timebase, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&FrameTickEvent::new(
            &FrameTick {
                now: HostTime(1_000_000),
                frame_index: 0,
                source: LoopKind::Canvas,
            },
            0.0,
        ));
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Motion,
            timestamp: HostTime(1_000_000),
        });
        rec.on_distortion(&DistortionEvent {
            frame_index: 0,
            freq_x: 0.01,
            freq_y: 0.06,
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Motion,
            timestamp: HostTime(1_000_100),
        });

        let parsed = export_to_values(&rec, Timebase::NANOS);
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "FrameTick");
        assert_eq!(parsed[0]["args"]["loop"], "canvas");

        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "motion");

        // Counter events carry the last seen timestamp.
        assert_eq!(parsed[2]["ph"], "C");
        assert_eq!(parsed[2]["ts"], 1000.0);

        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(parsed[3]["ts"], 1000.1);
    }

    #[test]
    fn field_loop_uses_its_own_row() {
        let mut rec = RecorderSink::new();
        rec.on_renderer_selected(&RendererSelectedEvent {
            kind: RendererKind::Fallback,
            fallback_reason: Some(FallbackReason::ShaderCompile),
            star_count: 800,
        });
        rec.on_frame_tick(&FrameTickEvent::new(
            &FrameTick {
                now: HostTime(2_000),
                frame_index: 1,
                source: LoopKind::Field,
            },
            16.0,
        ));
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 1,
            phase: PhaseKind::Field,
            timestamp: HostTime(2_000),
        });

        let parsed = export_to_values(&rec, Timebase::MICROS);
        assert_eq!(parsed[0]["tid"], 1);
        assert_eq!(parsed[0]["args"]["fallback_reason"], "shader compile failed");
        assert_eq!(parsed[1]["tid"], 1);
        assert_eq!(parsed[1]["ts"], 2000.0);
        assert_eq!(parsed[2]["tid"], 1);
        assert_eq!(parsed[2]["name"], "field");
    }

    #[test]
    fn tiles_without_range_export_null() {
        let mut rec = RecorderSink::new();
        rec.on_tiles_resolved(&TilesResolvedEvent {
            frame_index: 0,
            offset: Vec2::new(-10.0, -20.0),
            range: None,
            instances: 0,
        });
        let parsed = export_to_values(&rec, Timebase::MICROS);
        assert!(parsed[0]["args"]["range"].is_null());
        assert_eq!(parsed[0]["args"]["offset"][1], -20.0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
