// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for tessera.
//!
//! - [`RafLoop`]: `requestAnimationFrame` frame loop
//! - [`TilePresenter`]: keyed reconciliation of tile instances into DOM
//!   elements
//! - [`TurbulenceFilter`]: the SVG displacement filter the canvas is drawn
//!   through
//! - [`WheelBinding`] and [`ResizeBinding`]: scoped input listeners
//! - [`StarfieldCanvas`]: the parallax background with WebGL and 2D
//!   renderers

#![no_std]

extern crate alloc;

mod error;
mod field;
mod filter;
mod input;
mod presenter;
mod raf;
mod stars_2d;
mod stars_gl;

pub use error::{AcceleratedInitError, WebError};
pub use field::StarfieldCanvas;
pub use filter::TurbulenceFilter;
pub use input::{ResizeBinding, WheelBinding, window_size};
pub use presenter::{PresentStats, TilePainter, TilePresenter};
pub use raf::RafLoop;
pub use stars_2d::CanvasStars;
pub use stars_gl::GlStars;

use tessera_core::time::{HostTime, Timebase};

/// Current host time from `performance.now()`, in microsecond ticks.
#[must_use]
pub fn now() -> HostTime {
    millis_to_host_time(raf::performance_now())
}

/// The web [`Timebase`]: one tick is one microsecond.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

pub(crate) fn millis_to_host_time(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "DOMHighResTimeStamp is a small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timebase_is_microsecond() {
        assert_eq!(timebase().ticks_to_nanos(1), 1000);
    }

    #[test]
    fn millis_become_microsecond_ticks() {
        assert_eq!(millis_to_host_time(16.5), HostTime(16_500));
        assert_eq!(millis_to_host_time(0.0), HostTime(0));
    }
}
