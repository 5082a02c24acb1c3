// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-varying turbulence parameters.
//!
//! The canvas is drawn through a turbulence displacement filter whose base
//! frequencies drift slowly with time:
//!
//! ```text
//! freq_x = 0.01 + sin(t · 0.0002) · 0.005
//! freq_y = 0.05 + cos(t · 0.0002) · 0.01
//! ```
//!
//! with `t` in milliseconds since the canvas loop started.

/// A pair of base frequencies for the turbulence filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distortion {
    /// Horizontal base frequency.
    pub freq_x: f64,
    /// Vertical base frequency.
    pub freq_y: f64,
}

impl Distortion {
    /// Formats as the `"fx fy"` pair an SVG `baseFrequency` attribute takes.
    #[must_use]
    pub fn to_attribute(&self) -> alloc::string::String {
        alloc::format!("{} {}", self.freq_x, self.freq_y)
    }
}

/// Coefficients of the frequency drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortionConfig {
    /// Mean horizontal frequency.
    pub base_x: f64,
    /// Horizontal swing.
    pub amplitude_x: f64,
    /// Mean vertical frequency.
    pub base_y: f64,
    /// Vertical swing.
    pub amplitude_y: f64,
    /// Angular rate per millisecond.
    pub rate: f64,
}

impl DistortionConfig {
    /// The slow drift used by the gallery.
    #[must_use]
    pub const fn drift() -> Self {
        Self {
            base_x: 0.01,
            amplitude_x: 0.005,
            base_y: 0.05,
            amplitude_y: 0.01,
            rate: 0.0002,
        }
    }

    /// Parameters at `t_ms` milliseconds after loop start.
    #[must_use]
    pub fn at(&self, t_ms: f64) -> Distortion {
        let phase = t_ms * self.rate;
        Distortion {
            freq_x: self.base_x + libm::sin(phase) * self.amplitude_x,
            freq_y: self.base_y + libm::cos(phase) * self.amplitude_y,
        }
    }
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self::drift()
    }
}

/// Receives distortion parameters once per canvas frame.
pub trait DistortionSink {
    /// Pushes new base frequencies to the filter.
    fn set_base_frequency(&mut self, distortion: Distortion);
}

impl<F: FnMut(Distortion)> DistortionSink for F {
    fn set_base_frequency(&mut self, distortion: Distortion) {
        self(distortion);
    }
}
