// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: the tiled work and contact canvases over a parallax star field.
//!
//! The page shows the built-in catalog on the infinite work canvas. Wheel or
//! trackpad input pans it, the canvas is drawn through an animated SVG
//! turbulence filter, and a star field runs on its own frame loop behind
//! it. The header switches between the work canvas, the grid-arranged
//! contact canvas and a small content editor.
//!
//! Query parameters:
//!
//! - `?stars=N` sets the star count of both renderers.
//! - `?coast=1` lets the canvas keep gliding after a flick.
//!
//! Build with: `wasm-pack build --target web demos/gallery_web`
//!
//! Then serve `demos/gallery_web/` and open `index.html` in a browser.

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

mod app;
mod cards;
mod console;

use tessera_backend_web::WebError;
use tessera_core::catalog;
use tessera_core::motion::MotionConfig;
use tessera_core::starfield::StarFieldConfig;
use wasm_bindgen::prelude::*;

/// Largest star count accepted from the query string.
const MAX_STARS: usize = 20_000;

/// Page options read from the query string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Options {
    stars: Option<usize>,
    coast: bool,
}

impl Options {
    /// Parses `location.search`. Unknown keys and malformed values are
    /// ignored.
    pub(crate) fn from_query(search: &str) -> Self {
        let mut options = Self::default();
        for pair in search.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "stars" => {
                    options.stars = value.parse::<usize>().ok().map(|n| n.min(MAX_STARS));
                }
                "coast" => options.coast = matches!(value, "1" | "true" | ""),
                _ => {}
            }
        }
        options
    }

    pub(crate) fn motion(&self) -> MotionConfig {
        if self.coast {
            MotionConfig::coasting()
        } else {
            MotionConfig::default()
        }
    }

    /// Accelerated and fallback star configs, with the count override applied
    /// to both.
    pub(crate) fn star_configs(&self) -> (StarFieldConfig, StarFieldConfig) {
        let accelerated = StarFieldConfig::accelerated();
        let fallback = StarFieldConfig::fallback();
        match self.stars {
            Some(n) => (accelerated.with_count(n), fallback.with_count(n)),
            None => (accelerated, fallback),
        }
    }
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console::init_logging();
    start().map_err(|err| JsValue::from_str(&err.to_string()))
}

fn start() -> Result<(), WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let search = window.location().search().unwrap_or_default();
    let options = Options::from_query(&search);
    tracing::info!(?options, "starting gallery");
    app::App::launch(window, catalog::default_store(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{next_kind, shows_button};
    use tessera_core::content::TileKind;
    use tessera_core::screen::{NavAction, ViewId};

    #[test]
    fn empty_query_uses_defaults() {
        let options = Options::from_query("");
        assert_eq!(options, Options::default());
        assert_eq!(options.motion(), MotionConfig::direct());
        let (accelerated, fallback) = options.star_configs();
        assert_eq!(accelerated.count, 1200);
        assert_eq!(fallback.count, 800);
    }

    #[test]
    fn stars_and_coast_are_read() {
        let options = Options::from_query("?stars=300&coast=1");
        assert_eq!(options.stars, Some(300));
        assert!(options.coast);
        assert_eq!(options.motion(), MotionConfig::coasting());
        let (accelerated, fallback) = options.star_configs();
        assert_eq!(accelerated.count, 300);
        assert_eq!(fallback.count, 300);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let options = Options::from_query("?stars=lots&coast=0&zoom=2");
        assert_eq!(options.stars, None);
        assert!(!options.coast);
    }

    #[test]
    fn star_count_is_capped() {
        let options = Options::from_query("?stars=99999999");
        assert_eq!(options.stars, Some(MAX_STARS));
    }

    #[test]
    fn header_matches_view() {
        assert!(shows_button(ViewId::Work, NavAction::Contact));
        assert!(!shows_button(ViewId::Work, NavAction::WorkTab));
        assert!(shows_button(ViewId::Contact, NavAction::WorkTab));
        assert!(!shows_button(ViewId::Contact, NavAction::Contact));
        assert!(shows_button(ViewId::Cms, NavAction::Logo));
        assert!(!shows_button(ViewId::Cms, NavAction::LogIn));
    }

    #[test]
    fn shape_cycle_visits_every_kind() {
        let mut kind = TileKind::Mobile;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(kind);
            kind = next_kind(kind);
        }
        assert_eq!(kind, TileKind::Mobile);
        assert_eq!(
            seen,
            [
                TileKind::Mobile,
                TileKind::Desktop,
                TileKind::Square,
                TileKind::LargeSquare
            ]
        );
    }
}
