// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame ticks and loop-relative clocks.
//!
//! Backends deliver a [`FrameTick`] on every display refresh. Each loop keeps
//! a [`FrameClock`] whose origin is the first tick it sees after starting, so
//! time-driven formulas receive milliseconds since that loop began.

use crate::time::{HostTime, Timebase};

/// Which cooperative loop a tick belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoopKind {
    /// The canvas loop: pan motion and distortion.
    Canvas,
    /// The parallax star field loop.
    Field,
}

impl LoopKind {
    /// Short lowercase label, used by trace exporters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Field => "field",
        }
    }
}

/// A frame opportunity delivered by a backend loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Monotonically increasing per-loop frame counter.
    pub frame_index: u64,
    /// The loop that produced this tick.
    pub source: LoopKind,
}

/// Loop-relative time in milliseconds.
///
/// The origin is latched from the first observed tick and cleared by
/// [`reset`](Self::reset) when the owning loop stops.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    timebase: Timebase,
    origin: Option<HostTime>,
}

impl FrameClock {
    /// Creates a clock that has not observed any tick yet.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            origin: None,
        }
    }

    /// Returns milliseconds elapsed since the first tick observed after the
    /// last reset. The first call returns `0.0`.
    pub fn elapsed_ms(&mut self, now: HostTime) -> f64 {
        let origin = *self.origin.get_or_insert(now);
        now.saturating_duration_since(origin)
            .as_millis_f64(self.timebase)
    }

    /// The latched origin, if any tick has been observed.
    #[must_use]
    pub const fn origin(&self) -> Option<HostTime> {
        self.origin
    }

    /// Forgets the origin so the next tick starts a new timeline.
    pub fn reset(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_origin() {
        let mut clock = FrameClock::new(Timebase::MICROS);
        assert_eq!(clock.elapsed_ms(HostTime(5_000_000)), 0.0);
        assert_eq!(clock.origin(), Some(HostTime(5_000_000)));
        let ms = clock.elapsed_ms(HostTime(5_016_000));
        assert!((ms - 16.0).abs() < 1e-9);
    }

    #[test]
    fn reset_starts_a_new_timeline() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        let _ = clock.elapsed_ms(HostTime(1_000));
        clock.reset();
        assert_eq!(clock.origin(), None);
        assert_eq!(clock.elapsed_ms(HostTime(9_000_000)), 0.0);
    }
}
