// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame work of the canvas loop.
//!
//! [`FrameScheduler::on_tick`] runs once per display refresh while the
//! canvas loop is active. It pushes fresh distortion parameters to the
//! filter and then decays the pan velocity. It does not resolve tiles;
//! hosts re-resolve whenever the offset or viewport changes.

use crate::distortion::{Distortion, DistortionConfig, DistortionSink};
use crate::motion::{MotionController, PanState};
use crate::time::Timebase;
use crate::timing::{FrameClock, FrameTick};
use crate::trace::{DistortionEvent, FrameTickEvent, Tracer};

/// What one canvas tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Milliseconds since the loop started.
    pub elapsed_ms: f64,
    /// Frequencies pushed to the filter.
    pub distortion: Distortion,
    /// Whether the pan offset moved this tick.
    pub offset_moved: bool,
}

/// Drives distortion and velocity decay from loop ticks.
#[derive(Clone, Copy, Debug)]
pub struct FrameScheduler {
    distortion: DistortionConfig,
    clock: FrameClock,
}

impl FrameScheduler {
    /// Creates a scheduler.
    #[must_use]
    pub const fn new(distortion: DistortionConfig, timebase: Timebase) -> Self {
        Self {
            distortion,
            clock: FrameClock::new(timebase),
        }
    }

    /// Handles one tick.
    pub fn on_tick(
        &mut self,
        tick: &FrameTick,
        motion: &MotionController,
        pan: &mut PanState,
        filter: &mut dyn DistortionSink,
        tracer: &mut Tracer<'_>,
    ) -> FrameReport {
        let elapsed_ms = self.clock.elapsed_ms(tick.now);
        tracer.frame_tick(&FrameTickEvent::new(tick, elapsed_ms));

        let distortion = self.distortion.at(elapsed_ms);
        filter.set_base_frequency(distortion);
        tracer.distortion(&DistortionEvent {
            frame_index: tick.frame_index,
            freq_x: distortion.freq_x,
            freq_y: distortion.freq_y,
        });

        let offset_moved = motion.tick(pan);
        FrameReport {
            elapsed_ms,
            distortion,
            offset_moved,
        }
    }

    /// Forgets the loop start so the next tick begins a new timeline.
    ///
    /// Call when the owning loop stops.
    pub fn reset(&mut self) {
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionConfig;
    use crate::time::HostTime;
    use crate::timing::LoopKind;
    use alloc::vec::Vec;
    use kurbo::Vec2;

    fn tick(ms: u64, frame_index: u64) -> FrameTick {
        FrameTick {
            now: HostTime(ms * 1000),
            frame_index,
            source: LoopKind::Canvas,
        }
    }

    #[test]
    fn first_tick_uses_loop_start_origin() {
        let mut sched = FrameScheduler::new(DistortionConfig::drift(), Timebase::MICROS);
        let motion = MotionController::default();
        let mut pan = PanState::default();
        let mut pushed = Vec::new();
        let mut sink = |d: Distortion| pushed.push(d);

        let r = sched.on_tick(&tick(90_000, 0), &motion, &mut pan, &mut sink, &mut Tracer::none());
        assert_eq!(r.elapsed_ms, 0.0);
        assert_eq!(r.distortion.freq_x, 0.01);

        let r = sched.on_tick(&tick(91_000, 1), &motion, &mut pan, &mut sink, &mut Tracer::none());
        assert!((r.elapsed_ms - 1000.0).abs() < 1e-9);
        assert_eq!(pushed.len(), 2);
    }

    #[test]
    fn tick_decays_velocity_without_moving() {
        let mut sched = FrameScheduler::new(DistortionConfig::drift(), Timebase::MICROS);
        let motion = MotionController::new(MotionConfig::direct());
        let mut pan = PanState::default();
        let _ = motion.apply_input_delta(&mut pan, Vec2::new(0.0, 20.0));
        let mut sink = |_: Distortion| {};
        let r = sched.on_tick(&tick(0, 0), &motion, &mut pan, &mut sink, &mut Tracer::none());
        assert!(!r.offset_moved);
        assert!((pan.velocity.y - 19.2).abs() < 1e-12);
        assert_eq!(pan.offset, Vec2::new(0.0, -20.0));
    }

    #[test]
    fn reset_restarts_timeline() {
        let mut sched = FrameScheduler::new(DistortionConfig::drift(), Timebase::MICROS);
        let motion = MotionController::default();
        let mut pan = PanState::default();
        let mut sink = |_: Distortion| {};
        let _ = sched.on_tick(&tick(5, 0), &motion, &mut pan, &mut sink, &mut Tracer::none());
        sched.reset();
        let r = sched.on_tick(&tick(500, 1), &motion, &mut pan, &mut sink, &mut Tracer::none());
        assert_eq!(r.elapsed_ms, 0.0);
    }
}
