// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed DOM reconciliation for tile instances.
//!
//! Every resolved [`TileInstance`] maps to one absolutely positioned element
//! keyed by its [`InstanceKey`]. Elements for keys that stay visible are
//! only repositioned; new keys get an element from the [`TilePainter`], and
//! keys that drop out of the resolved set are removed.

use alloc::collections::BTreeMap;
use alloc::format;

use kurbo::Point;
use tessera_core::visibility::{InstanceKey, TileInstance};
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlElement};

use crate::error::WebError;

/// Builds the DOM content of a tile.
pub trait TilePainter {
    /// Creates the element for a newly visible instance. The presenter
    /// positions and sizes it afterwards.
    ///
    /// # Errors
    ///
    /// Any thrown DOM error aborts the current present pass.
    fn create(&mut self, doc: &Document, tile: &TileInstance) -> Result<HtmlElement, JsValue>;
}

/// What a [`TilePresenter::present`] pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresentStats {
    /// Elements created.
    pub added: usize,
    /// Elements whose transform changed.
    pub moved: usize,
    /// Elements removed.
    pub removed: usize,
    /// Elements alive after the pass.
    pub live: usize,
}

struct Slot {
    element: HtmlElement,
    origin: Point,
    generation: u64,
}

/// Keeps a container's children in sync with the resolved tile set.
pub struct TilePresenter<P> {
    container: HtmlElement,
    painter: P,
    slots: BTreeMap<InstanceKey, Slot>,
    generation: u64,
}

impl<P> core::fmt::Debug for TilePresenter<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TilePresenter")
            .field("live", &self.slots.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

fn place(element: &HtmlElement, origin: Point) {
    let _ = element.style().set_property(
        "transform",
        &format!("translate3d({}px, {}px, 0)", origin.x, origin.y),
    );
}

impl<P: TilePainter> TilePresenter<P> {
    /// Creates a presenter that owns the children it adds to `container`.
    pub fn new(container: HtmlElement, painter: P) -> Self {
        Self {
            container,
            painter,
            slots: BTreeMap::new(),
            generation: 0,
        }
    }

    /// The container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// The painter, for hosts that need to update what it paints.
    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no elements are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reconciles the container with `tiles`.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::NoDocument`] if the container is detached, or a
    /// DOM error from element creation.
    pub fn present(&mut self, tiles: &[TileInstance]) -> Result<PresentStats, WebError> {
        self.generation += 1;
        let generation = self.generation;
        let mut stats = PresentStats::default();
        let doc = self.container.owner_document().ok_or(WebError::NoDocument)?;

        for tile in tiles {
            if let Some(slot) = self.slots.get_mut(&tile.key) {
                slot.generation = generation;
                if slot.origin != tile.origin {
                    place(&slot.element, tile.origin);
                    slot.origin = tile.origin;
                    stats.moved += 1;
                }
                continue;
            }
            let element = self.painter.create(&doc, tile)?;
            let s = element.style();
            let _ = s.set_property("position", "absolute");
            let _ = s.set_property("left", "0");
            let _ = s.set_property("top", "0");
            let _ = s.set_property("width", &format!("{}px", tile.size.width));
            let _ = s.set_property("height", &format!("{}px", tile.size.height));
            let _ = s.set_property("will-change", "transform");
            place(&element, tile.origin);
            self.container.append_child(&element)?;
            self.slots.insert(
                tile.key.clone(),
                Slot {
                    element,
                    origin: tile.origin,
                    generation,
                },
            );
            stats.added += 1;
        }

        self.slots.retain(|_, slot| {
            let keep = slot.generation == generation;
            if !keep {
                slot.element.remove();
                stats.removed += 1;
            }
            keep
        });
        stats.live = self.slots.len();
        Ok(stats)
    }

    /// Removes every element this presenter created.
    pub fn clear(&mut self) {
        for slot in self.slots.values() {
            slot.element.remove();
        }
        self.slots.clear();
    }
}

impl<P> Drop for TilePresenter<P> {
    fn drop(&mut self) {
        for slot in self.slots.values() {
            slot.element.remove();
        }
    }
}
