// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parallax star field mounted in the page.

use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Size;
use tessera_core::depth_field::{FallbackReason, ParallaxField, RendererKind};
use tessera_core::frame_loop::FrameLoop;
use tessera_core::starfield::StarFieldConfig;
use tessera_core::timing::LoopKind;
use tessera_core::trace::Tracer;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, HtmlCanvasElement, Window};

use crate::error::WebError;
use crate::input::{ResizeBinding, window_size};
use crate::raf::RafLoop;
use crate::stars_2d::CanvasStars;
use crate::stars_gl::GlStars;

type Field = ParallaxField<GlStars, CanvasStars>;

struct Mounted {
    field: Field,
    canvas: HtmlCanvasElement,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "window sizes are small non-negative values"
)]
fn set_pixel_size(canvas: &HtmlCanvasElement, size: Size) {
    canvas.set_width(size.width as u32);
    canvas.set_height(size.height as u32);
}

fn create_canvas(doc: &Document, size: Size) -> Result<HtmlCanvasElement, WebError> {
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.unchecked_into();
    let s = canvas.style();
    s.set_property("position", "fixed")?;
    s.set_property("inset", "0")?;
    s.set_property("width", "100%")?;
    s.set_property("height", "100%")?;
    s.set_property("pointer-events", "none")?;
    s.set_property("z-index", "0")?;
    set_pixel_size(&canvas, size);
    Ok(canvas)
}

/// A full-window canvas drawing a [`ParallaxField`] on its own frame loop.
///
/// The renderer is chosen once in [`mount`](Self::mount). Dropping the
/// handle stops the loop, detaches the resize listener and removes the
/// canvas.
pub struct StarfieldCanvas {
    mounted: Rc<RefCell<Mounted>>,
    raf: RafLoop,
    _resize: ResizeBinding,
}

impl core::fmt::Debug for StarfieldCanvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StarfieldCanvas")
            .field("kind", &self.kind())
            .field("raf", &self.raf)
            .finish_non_exhaustive()
    }
}

impl StarfieldCanvas {
    /// Creates the canvas under `parent`, picks a renderer, and starts
    /// animating.
    ///
    /// # Errors
    ///
    /// Fails if the canvas cannot be created or neither WebGL nor 2D
    /// drawing is available.
    pub fn mount(
        window: &Window,
        parent: &Element,
        accelerated: StarFieldConfig,
        fallback: StarFieldConfig,
        tracer: &mut Tracer<'_>,
    ) -> Result<Self, WebError> {
        let doc = window.document().ok_or(WebError::NoDocument)?;
        let bounds = window_size(window);
        let canvas = RefCell::new(create_canvas(&doc, bounds)?);
        parent.append_child(&canvas.borrow())?;

        let field = Field::select(
            bounds,
            accelerated,
            fallback,
            |stars| {
                GlStars::new(&canvas.borrow(), stars)
                    .inspect_err(|err| tracing::warn!(%err, "webgl star renderer failed"))
            },
            |stars| {
                // A canvas that handed out a WebGL context will not give a
                // 2D one, so draw on a fresh element.
                let fresh = create_canvas(&doc, bounds)?;
                canvas.borrow().replace_with_with_node_1(&fresh)?;
                canvas.replace(fresh);
                CanvasStars::new(&canvas.borrow(), stars)
            },
            tracer,
        )?;
        tracing::info!(
            kind = ?field.kind(),
            stars = field.field().len(),
            "star field renderer selected"
        );
        if let Some(reason) = field.fallback_reason() {
            tracing::warn!(%reason, "webgl unavailable, drawing stars in 2d");
        }

        let mounted = Rc::new(RefCell::new(Mounted {
            field,
            canvas: canvas.into_inner(),
        }));

        let target = Rc::clone(&mounted);
        let resize = ResizeBinding::attach(window, move |size| {
            tracing::debug!(width = size.width, height = size.height, "star field resized");
            let mut m = target.borrow_mut();
            set_pixel_size(&m.canvas, size);
            m.field.resize(size);
        })?;

        let target = Rc::clone(&mounted);
        let raf = RafLoop::new(LoopKind::Field, move |_tick| {
            target.borrow_mut().field.tick();
        });
        raf.start();

        Ok(Self {
            mounted,
            raf,
            _resize: resize,
        })
    }

    /// Which renderer was chosen.
    #[must_use]
    pub fn kind(&self) -> RendererKind {
        self.mounted.borrow().field.kind()
    }

    /// Why WebGL was not used, if it was not.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        self.mounted.borrow().field.fallback_reason()
    }

    /// Number of simulated stars.
    #[must_use]
    pub fn star_count(&self) -> usize {
        self.mounted.borrow().field.field().len()
    }

    /// The frame loop driving the field.
    #[must_use]
    pub fn frame_loop(&self) -> &dyn FrameLoop {
        &self.raf
    }
}

impl Drop for StarfieldCanvas {
    fn drop(&mut self) {
        self.raf.stop();
        self.mounted.borrow().canvas.remove();
    }
}
