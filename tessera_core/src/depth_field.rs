// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallax background with two interchangeable renderers.
//!
//! [`ParallaxField::select`] probes the accelerated renderer once. If the
//! probe fails, the reason is recorded and the fallback renderer is built
//! instead; the choice never changes afterwards. Both renderers draw the
//! same CPU-simulated [`StarField`], sized by the configuration that goes
//! with the chosen path.

use core::fmt;

use kurbo::Size;

use crate::starfield::{StarField, StarFieldConfig};
use crate::trace::{RendererSelectedEvent, Tracer};

/// Which renderer a field ended up with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// GPU point sprites.
    Accelerated,
    /// Immediate-mode 2D drawing.
    Fallback,
}

/// Why the accelerated renderer was not used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// No GPU context could be obtained.
    ContextUnavailable,
    /// A shader failed to compile.
    ShaderCompile,
    /// The shader program failed to link.
    ProgramLink,
    /// Any other resource creation failure.
    Resource,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ContextUnavailable => "context unavailable",
            Self::ShaderCompile => "shader compile failed",
            Self::ProgramLink => "program link failed",
            Self::Resource => "resource creation failed",
        })
    }
}

/// A backend that can draw a [`StarField`].
pub trait DepthFieldRenderer {
    /// Adopts new drawing bounds.
    fn resize(&mut self, bounds: Size);

    /// Draws one frame of `field`.
    fn render(&mut self, field: &StarField);
}

/// The renderer chosen at construction.
#[derive(Debug)]
pub enum Strategy<A, F> {
    /// The accelerated path succeeded.
    Accelerated(A),
    /// The accelerated path failed and this fallback is drawing instead.
    Fallback(F),
}

/// Star field plus the renderer drawing it.
#[derive(Debug)]
pub struct ParallaxField<A, F> {
    field: StarField,
    strategy: Strategy<A, F>,
    fallback_reason: Option<FallbackReason>,
}

impl<A: DepthFieldRenderer, F: DepthFieldRenderer> ParallaxField<A, F> {
    /// Chooses a renderer once.
    ///
    /// `accelerated` is tried with a field built from `accelerated_config`.
    /// On failure, `fallback` is called with a field built from
    /// `fallback_config`.
    ///
    /// # Errors
    ///
    /// Returns the fallback constructor's error if both paths fail.
    pub fn select<E, G>(
        bounds: Size,
        accelerated_config: StarFieldConfig,
        fallback_config: StarFieldConfig,
        accelerated: impl FnOnce(&StarField) -> Result<A, E>,
        fallback: impl FnOnce(&StarField) -> Result<F, G>,
        tracer: &mut Tracer<'_>,
    ) -> Result<Self, G>
    where
        FallbackReason: for<'e> From<&'e E>,
    {
        let field = StarField::new(accelerated_config, bounds);
        let this = match accelerated(&field) {
            Ok(renderer) => Self {
                field,
                strategy: Strategy::Accelerated(renderer),
                fallback_reason: None,
            },
            Err(err) => {
                let reason = FallbackReason::from(&err);
                let field = StarField::new(fallback_config, bounds);
                let renderer = fallback(&field)?;
                Self {
                    field,
                    strategy: Strategy::Fallback(renderer),
                    fallback_reason: Some(reason),
                }
            }
        };
        tracer.renderer_selected(&RendererSelectedEvent {
            kind: this.kind(),
            fallback_reason: this.fallback_reason,
            star_count: u32::try_from(this.field.len()).unwrap_or(u32::MAX),
        });
        Ok(this)
    }

    /// Advances the simulation one frame and draws it.
    pub fn tick(&mut self) -> usize {
        let respawned = self.field.advance();
        match &mut self.strategy {
            Strategy::Accelerated(r) => r.render(&self.field),
            Strategy::Fallback(r) => r.render(&self.field),
        }
        respawned
    }

    /// Propagates a viewport resize to the simulation and the renderer.
    pub fn resize(&mut self, bounds: Size) {
        self.field.resize(bounds);
        match &mut self.strategy {
            Strategy::Accelerated(r) => r.resize(bounds),
            Strategy::Fallback(r) => r.resize(bounds),
        }
    }
}

impl<A, F> ParallaxField<A, F> {
    /// Which renderer is active.
    #[must_use]
    pub const fn kind(&self) -> RendererKind {
        match self.strategy {
            Strategy::Accelerated(_) => RendererKind::Accelerated,
            Strategy::Fallback(_) => RendererKind::Fallback,
        }
    }

    /// Why the accelerated path was skipped, if it was.
    #[must_use]
    pub const fn fallback_reason(&self) -> Option<FallbackReason> {
        self.fallback_reason
    }

    /// The simulated stars.
    #[must_use]
    pub const fn field(&self) -> &StarField {
        &self.field
    }

    /// The active renderer.
    #[must_use]
    pub const fn strategy(&self) -> &Strategy<A, F> {
        &self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counting {
        frames: usize,
        last_visible: usize,
        bounds: Option<Size>,
    }

    impl DepthFieldRenderer for Counting {
        fn resize(&mut self, bounds: Size) {
            self.bounds = Some(bounds);
        }

        fn render(&mut self, field: &StarField) {
            self.frames += 1;
            self.last_visible = field.visible().count();
        }
    }

    #[derive(Debug)]
    struct NoGpu;

    impl From<&NoGpu> for FallbackReason {
        fn from(_: &NoGpu) -> Self {
            Self::ContextUnavailable
        }
    }

    const VIEW: Size = Size::new(1280.0, 720.0);

    #[test]
    fn accelerated_when_probe_succeeds() {
        let field = ParallaxField::<Counting, Counting>::select(
            VIEW,
            StarFieldConfig::accelerated(),
            StarFieldConfig::fallback(),
            |_| Ok::<_, NoGpu>(Counting::default()),
            |_| Ok::<_, ()>(Counting::default()),
            &mut Tracer::none(),
        )
        .unwrap();
        assert_eq!(field.kind(), RendererKind::Accelerated);
        assert_eq!(field.fallback_reason(), None);
        assert_eq!(field.field().len(), 1200);
    }

    #[test]
    fn falls_back_with_reason() {
        let mut field = ParallaxField::<Counting, Counting>::select(
            VIEW,
            StarFieldConfig::accelerated(),
            StarFieldConfig::fallback(),
            |_| Err(NoGpu),
            |_| Ok::<_, ()>(Counting::default()),
            &mut Tracer::none(),
        )
        .unwrap();
        assert_eq!(field.kind(), RendererKind::Fallback);
        assert_eq!(field.fallback_reason(), Some(FallbackReason::ContextUnavailable));
        assert_eq!(field.field().len(), 800);
        field.tick();
        let Strategy::Fallback(r) = field.strategy() else {
            panic!("expected fallback");
        };
        assert_eq!(r.frames, 1);
        assert!(r.last_visible > 0, "fallback must draw stars");
    }

    #[test]
    fn fallback_error_propagates() {
        let result = ParallaxField::<Counting, Counting>::select(
            VIEW,
            StarFieldConfig::accelerated(),
            StarFieldConfig::fallback(),
            |_| Err(NoGpu),
            |_| Err("no 2d context"),
            &mut Tracer::none(),
        );
        assert_eq!(result.err(), Some("no 2d context"));
    }

    #[test]
    fn resize_reaches_renderer() {
        let mut field = ParallaxField::<Counting, Counting>::select(
            VIEW,
            StarFieldConfig::accelerated(),
            StarFieldConfig::fallback(),
            |_| Ok::<_, NoGpu>(Counting::default()),
            |_| Ok::<_, ()>(Counting::default()),
            &mut Tracer::none(),
        )
        .unwrap();
        field.resize(Size::new(640.0, 480.0));
        assert_eq!(field.field().bounds(), Size::new(640.0, 480.0));
        let Strategy::Accelerated(r) = field.strategy() else {
            panic!("expected accelerated");
        };
        assert_eq!(r.bounds, Some(Size::new(640.0, 480.0)));
    }
}
