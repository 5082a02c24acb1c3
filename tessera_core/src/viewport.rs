// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport size tracking.

use kurbo::Size;

/// Current drawable region size, updated on host resize notifications.
///
/// Starts at zero until the first measurement. Negative or non-finite
/// reports are clamped to zero so downstream code only ever sees a
/// non-negative finite size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportTracker {
    size: Size,
    measured: bool,
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

impl ViewportTracker {
    /// A tracker that has not been measured yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            size: Size::ZERO,
            measured: false,
        }
    }

    /// Records a new size. Returns `true` if it differs from the previous
    /// one, or if this is the first measurement.
    pub fn observe(&mut self, size: Size) -> bool {
        let size = Size::new(sanitize(size.width), sanitize(size.height));
        let changed = !self.measured || size != self.size;
        self.size = size;
        self.measured = true;
        changed
    }

    /// The last observed size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Whether [`observe`](Self::observe) has been called.
    #[must_use]
    pub const fn is_measured(&self) -> bool {
        self.measured
    }

    /// Whether the viewport has no drawable area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_always_changes() {
        let mut vp = ViewportTracker::new();
        assert!(vp.is_empty());
        assert!(vp.observe(Size::ZERO), "first measurement counts as a change");
        assert!(vp.is_measured());
        assert!(!vp.observe(Size::ZERO));
    }

    #[test]
    fn bad_reports_clamp_to_zero() {
        let mut vp = ViewportTracker::new();
        vp.observe(Size::new(-5.0, f64::INFINITY));
        assert_eq!(vp.size(), Size::ZERO);
    }

    #[test]
    fn resize_reports_change() {
        let mut vp = ViewportTracker::new();
        vp.observe(Size::new(800.0, 600.0));
        assert!(vp.observe(Size::new(1024.0, 600.0)));
        assert_eq!(vp.size().width, 1024.0);
    }
}
