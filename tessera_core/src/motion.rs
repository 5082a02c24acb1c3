// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan offset and velocity.
//!
//! Wheel input moves the offset immediately and also feeds a velocity that
//! decays every frame. With the default configuration the velocity is
//! bookkeeping only: nothing integrates it back into the offset, so the
//! canvas stops the instant input stops. [`MotionConfig::coasting`] enables
//! the momentum glide.

use kurbo::Vec2;

/// Tunables for [`MotionController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Per-tick velocity multiplier.
    pub friction: f64,
    /// Velocity components strictly below this magnitude snap to zero.
    pub rest_epsilon: f64,
    /// Whether each tick also moves the offset by the current velocity.
    pub coasting: bool,
}

impl MotionConfig {
    /// Direct manipulation: offset follows input, velocity decays unseen.
    #[must_use]
    pub const fn direct() -> Self {
        Self {
            friction: 0.96,
            rest_epsilon: 0.01,
            coasting: false,
        }
    }

    /// Like [`direct`](Self::direct), plus momentum glide after input stops.
    #[must_use]
    pub const fn coasting() -> Self {
        Self {
            coasting: true,
            ..Self::direct()
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::direct()
    }
}

/// Mutable pan state owned by a screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanState {
    /// Translation applied to every tile instance.
    pub offset: Vec2,
    /// Last input delta, decayed each tick.
    pub velocity: Vec2,
}

impl PanState {
    /// At rest at `offset`.
    #[must_use]
    pub const fn at(offset: Vec2) -> Self {
        Self {
            offset,
            velocity: Vec2::ZERO,
        }
    }

    /// Whether both velocity components are zero.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.velocity == Vec2::ZERO
    }
}

/// Tells the host what to do with the native event that carried a delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum InputResponse {
    /// The delta moved the canvas; suppress native scrolling.
    Consumed,
    /// The delta was not usable.
    Ignored,
}

impl InputResponse {
    /// Whether the host should call `preventDefault` on the event.
    #[must_use]
    pub const fn prevent_default(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Stateless operator over a [`PanState`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionController {
    config: MotionConfig,
}

impl MotionController {
    /// Creates a controller.
    #[must_use]
    pub const fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Applies a wheel or trackpad delta.
    ///
    /// The offset moves opposite to the delta, and the velocity becomes the
    /// delta itself. A delta that is not finite, or that would push the
    /// offset out of the finite range, is ignored and `pan` is left as is.
    pub fn apply_input_delta(&self, pan: &mut PanState, delta: Vec2) -> InputResponse {
        let offset = pan.offset - delta;
        if !delta.is_finite() || !offset.is_finite() {
            return InputResponse::Ignored;
        }
        pan.offset = offset;
        pan.velocity = delta;
        InputResponse::Consumed
    }

    /// Advances one frame. Returns `true` if the offset moved.
    ///
    /// A coasting step that would leave the finite range is dropped; the
    /// velocity still decays.
    pub fn tick(&self, pan: &mut PanState) -> bool {
        let mut moved = false;
        if self.config.coasting && !pan.is_at_rest() {
            let offset = pan.offset - pan.velocity;
            if offset.is_finite() {
                pan.offset = offset;
                moved = true;
            }
        }
        pan.velocity = Vec2::new(
            self.decay(pan.velocity.x),
            self.decay(pan.velocity.y),
        );
        moved
    }

    fn decay(&self, v: f64) -> f64 {
        let v = v * self.config.friction;
        if v.abs() < self.config.rest_epsilon { 0.0 } else { v }
    }
}
