// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG turbulence displacement filter.

use alloc::format;
use alloc::string::String;

use tessera_core::distortion::{Distortion, DistortionSink};
use web_sys::{Document, Element};

use crate::error::WebError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// A hidden `<svg>` holding a `feTurbulence` → `feDisplacementMap` filter.
///
/// Reference it from CSS with [`css_url`](Self::css_url). The SVG is removed
/// when this handle drops.
pub struct TurbulenceFilter {
    root: Element,
    turbulence: Element,
    id: String,
}

impl core::fmt::Debug for TurbulenceFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TurbulenceFilter")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

fn svg(doc: &Document, tag: &str, attrs: &[(&str, &str)]) -> Result<Element, WebError> {
    let el = doc.create_element_ns(Some(SVG_NS), tag)?;
    for (name, value) in attrs {
        el.set_attribute(name, value)?;
    }
    Ok(el)
}

impl TurbulenceFilter {
    /// Builds the filter under `parent` with element id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Js`] if any DOM call throws.
    pub fn install(
        doc: &Document,
        parent: &Element,
        id: &str,
        displacement: f64,
    ) -> Result<Self, WebError> {
        let root = svg(
            doc,
            "svg",
            &[(
                "style",
                "position: absolute; width: 0; height: 0; pointer-events: none",
            )],
        )?;
        let defs = svg(doc, "defs", &[])?;
        let filter = svg(doc, "filter", &[("id", id)])?;
        let turbulence = svg(
            doc,
            "feTurbulence",
            &[
                ("type", "fractalNoise"),
                ("baseFrequency", "0.01 0.05"),
                ("numOctaves", "3"),
                ("result", "noise"),
            ],
        )?;
        let scale = format!("{displacement}");
        let displace = svg(
            doc,
            "feDisplacementMap",
            &[
                ("in", "SourceGraphic"),
                ("in2", "noise"),
                ("scale", &scale),
                ("xChannelSelector", "R"),
                ("yChannelSelector", "G"),
            ],
        )?;
        filter.append_child(&turbulence)?;
        filter.append_child(&displace)?;
        defs.append_child(&filter)?;
        root.append_child(&defs)?;
        parent.append_child(&root)?;
        Ok(Self {
            root,
            turbulence,
            id: id.into(),
        })
    }

    /// `url(#id)`, for use in `filter` or `backdrop-filter`.
    #[must_use]
    pub fn css_url(&self) -> String {
        format!("url(#{})", self.id)
    }
}

impl DistortionSink for TurbulenceFilter {
    fn set_base_frequency(&mut self, distortion: Distortion) {
        let _ = self
            .turbulence
            .set_attribute("baseFrequency", &distortion.to_attribute());
    }
}

impl Drop for TurbulenceFilter {
    fn drop(&mut self) {
        self.root.remove();
    }
}
