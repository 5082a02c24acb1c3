// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immediate-mode 2D star renderer, used when WebGL is unavailable.

use alloc::format;

use kurbo::Size;
use tessera_core::depth_field::DepthFieldRenderer;
use tessera_core::starfield::{ProjectedStar, StarField};
use wasm_bindgen::JsCast as _;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::WebError;

const TAU: f64 = core::f64::consts::TAU;
const GLOW: &str = "200, 220, 255";

/// Draws a [`StarField`] with glows and motion trails on a 2D context.
pub struct CanvasStars {
    ctx: CanvasRenderingContext2d,
    bounds: Size,
}

impl core::fmt::Debug for CanvasStars {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasStars")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl CanvasStars {
    /// Acquires a 2D context on `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Canvas2dUnavailable`] if the canvas has no 2D
    /// context, for example because another context type was already
    /// created on it.
    pub fn new(canvas: &HtmlCanvasElement, field: &StarField) -> Result<Self, WebError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(WebError::Canvas2dUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| WebError::Canvas2dUnavailable)?;
        tracing::info!(stars = field.len(), "2d star renderer ready");
        Ok(Self {
            ctx,
            bounds: field.bounds(),
        })
    }

    fn background(&self) {
        let Size { width, height } = self.bounds;
        let (cx, cy) = (width / 2.0, height / 2.0);
        match self.ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, cx) {
            Ok(grad) => {
                let _ = grad.add_color_stop(0.0, "#0a0520");
                let _ = grad.add_color_stop(0.5, "#150a30");
                let _ = grad.add_color_stop(1.0, "#000000");
                self.ctx.set_fill_style_canvas_gradient(&grad);
            }
            Err(_) => self.ctx.set_fill_style_str("#000000"),
        }
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn star(&self, p: &ProjectedStar) {
        let ctx = &self.ctx;
        let (x, y) = (p.center.x, p.center.y);
        let alpha = p.opacity * p.brightness;

        let halo = p.radius * 3.0;
        if let Ok(glow) = ctx.create_radial_gradient(x, y, 0.0, x, y, halo) {
            let _ = glow.add_color_stop(0.0, &format!("rgba({GLOW}, {})", alpha * 0.3));
            let _ = glow.add_color_stop(1.0, &format!("rgba({GLOW}, 0)"));
            ctx.begin_path();
            ctx.set_fill_style_canvas_gradient(&glow);
            let _ = ctx.arc(x, y, halo, 0.0, TAU);
            ctx.fill();
        }

        ctx.begin_path();
        ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha})"));
        let _ = ctx.arc(x, y, p.radius, 0.0, TAU);
        ctx.fill();

        if let Some(from) = p.trail_from {
            let trail = ctx.create_linear_gradient(from.x, from.y, x, y);
            let _ = trail.add_color_stop(0.0, &format!("rgba({GLOW}, 0)"));
            let _ = trail.add_color_stop(1.0, &format!("rgba({GLOW}, {})", p.opacity * 0.3));
            ctx.begin_path();
            ctx.set_stroke_style_canvas_gradient(&trail);
            ctx.set_line_width(p.radius * 0.5);
            ctx.move_to(from.x, from.y);
            ctx.line_to(x, y);
            ctx.stroke();
        }
    }
}

impl DepthFieldRenderer for CanvasStars {
    fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    fn render(&mut self, field: &StarField) {
        self.background();
        for p in field.visible() {
            self.star(&p);
        }
    }
}
