// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screens: a layout unit, a pan state and a viewport, plus navigation.
//!
//! The work and contact screens share everything except how they build
//! their unit and where their header controls lead.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::catalog::WORK_UNIT;
use crate::content::ItemStore;
use crate::distortion::DistortionSink;
use crate::layout::{GridSpec, LayoutError, LayoutUnit};
use crate::motion::{InputResponse, MotionConfig, MotionController, PanState};
use crate::scheduler::{FrameReport, FrameScheduler};
use crate::timing::FrameTick;
use crate::trace::{TilesResolvedEvent, Tracer};
use crate::viewport::ViewportTracker;
use crate::visibility::{GridRange, TileInstance, resolve_into};

/// Top-level views of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewId {
    /// Scattered portfolio canvas.
    Work,
    /// Regular grid canvas.
    Contact,
    /// Content management panel.
    Cms,
}

/// Header controls a screen exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavAction {
    /// The logo mark.
    Logo,
    /// The "Work" tab.
    WorkTab,
    /// The "About" tab.
    AboutTab,
    /// The "Contact" button.
    Contact,
    /// The "Log in" button.
    LogIn,
}

/// Receives view changes.
pub trait Navigator {
    /// Switches to `view`.
    fn navigate(&mut self, view: ViewId);
}

impl<F: FnMut(ViewId)> Navigator for F {
    fn navigate(&mut self, view: ViewId) {
        self(view);
    }
}

/// One pannable canvas view.
#[derive(Clone, Debug)]
pub struct Screen {
    view: ViewId,
    unit: LayoutUnit,
    pan: PanState,
    viewport: ViewportTracker,
    motion: MotionController,
    content_revision: u64,
}

impl Screen {
    /// Builds a screen around an existing unit. Panning starts at
    /// `(-W, -H)`, one unit up and left of the origin.
    #[must_use]
    pub fn new(view: ViewId, unit: LayoutUnit, motion: MotionConfig) -> Self {
        let size = unit.size();
        Self {
            view,
            unit,
            pan: PanState::at(Vec2::new(-size.width, -size.height)),
            viewport: ViewportTracker::new(),
            motion: MotionController::new(motion),
            content_revision: 0,
        }
    }

    /// The scattered work canvas built from item positions.
    ///
    /// # Errors
    ///
    /// Fails if an item does not fit the 1728 × 1600 unit.
    pub fn work(store: &ItemStore, motion: MotionConfig) -> Result<Self, LayoutError> {
        let unit = LayoutUnit::from_items(WORK_UNIT, store.items())?;
        Ok(Self::new(ViewId::Work, unit, motion).with_revision(store.revision()))
    }

    /// The contact canvas: every item re-laid on a two-column grid.
    ///
    /// # Errors
    ///
    /// Fails only if the grid parameters are degenerate.
    pub fn contact(store: &ItemStore, motion: MotionConfig) -> Result<Self, LayoutError> {
        let unit = LayoutUnit::from_grid(&GridSpec::contact(), store.items())?;
        Ok(Self::new(ViewId::Contact, unit, motion).with_revision(store.revision()))
    }

    /// Builds the screen for `view`, or `None` for views that are not
    /// canvases.
    ///
    /// # Errors
    ///
    /// See [`work`](Self::work) and [`contact`](Self::contact).
    pub fn for_view(
        view: ViewId,
        store: &ItemStore,
        motion: MotionConfig,
    ) -> Result<Option<Self>, LayoutError> {
        match view {
            ViewId::Work => Self::work(store, motion).map(Some),
            ViewId::Contact => Self::contact(store, motion).map(Some),
            ViewId::Cms => Ok(None),
        }
    }

    fn with_revision(mut self, revision: u64) -> Self {
        self.content_revision = revision;
        self
    }

    /// Rebuilds the unit if `store` changed since this screen was built.
    /// The pan state and viewport survive. Returns whether a rebuild
    /// happened.
    ///
    /// # Errors
    ///
    /// Leaves the screen untouched and returns the error if the new unit is
    /// invalid.
    pub fn sync_content(&mut self, store: &ItemStore) -> Result<bool, LayoutError> {
        if store.revision() == self.content_revision {
            return Ok(false);
        }
        self.unit = match self.view {
            ViewId::Contact => LayoutUnit::from_grid(&GridSpec::contact(), store.items())?,
            _ => LayoutUnit::from_items(WORK_UNIT, store.items())?,
        };
        self.content_revision = store.revision();
        Ok(true)
    }

    /// Which view this screen is.
    #[must_use]
    pub const fn view(&self) -> ViewId {
        self.view
    }

    /// The tiled unit.
    #[must_use]
    pub const fn unit(&self) -> &LayoutUnit {
        &self.unit
    }

    /// Current pan state.
    #[must_use]
    pub const fn pan(&self) -> &PanState {
        &self.pan
    }

    /// Current viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport.size()
    }

    /// Handles a wheel or trackpad delta.
    pub fn on_wheel(&mut self, delta: Vec2) -> InputResponse {
        self.motion.apply_input_delta(&mut self.pan, delta)
    }

    /// Handles a viewport resize. Returns whether the size changed.
    pub fn on_resize(&mut self, size: Size) -> bool {
        self.viewport.observe(size)
    }

    /// Runs one canvas loop tick against this screen's pan state.
    pub fn frame(
        &mut self,
        scheduler: &mut FrameScheduler,
        tick: &FrameTick,
        filter: &mut dyn DistortionSink,
        tracer: &mut Tracer<'_>,
    ) -> FrameReport {
        scheduler.on_tick(tick, &self.motion, &mut self.pan, filter, tracer)
    }

    /// Resolves visible tiles for the current offset and viewport into
    /// `out`.
    pub fn resolve_into(
        &self,
        frame_index: u64,
        out: &mut Vec<TileInstance>,
        tracer: &mut Tracer<'_>,
    ) -> Option<GridRange> {
        let range = resolve_into(self.pan.offset, self.viewport.size(), &self.unit, out);
        tracer.tiles_resolved(&TilesResolvedEvent {
            frame_index,
            offset: self.pan.offset,
            range,
            instances: u32::try_from(out.len()).unwrap_or(u32::MAX),
        });
        range
    }

    /// Resolves visible tiles for the current offset and viewport.
    #[must_use]
    pub fn visible_tiles(&self) -> Vec<TileInstance> {
        let mut out = Vec::new();
        resolve_into(self.pan.offset, self.viewport.size(), &self.unit, &mut out);
        out
    }

    /// Where a header control leads from this screen, if anywhere.
    #[must_use]
    pub const fn route(&self, action: NavAction) -> Option<ViewId> {
        match (self.view, action) {
            (_, NavAction::LogIn) => Some(ViewId::Cms),
            (ViewId::Work, NavAction::Logo) => Some(ViewId::Work),
            (ViewId::Work, NavAction::Contact) => Some(ViewId::Contact),
            (ViewId::Contact, NavAction::Logo | NavAction::WorkTab) => Some(ViewId::Work),
            _ => None,
        }
    }

    /// Activates a header control, notifying `nav` if it leads somewhere.
    pub fn activate(&self, action: NavAction, nav: &mut dyn Navigator) -> bool {
        match self.route(action) {
            Some(view) => {
                nav.navigate(view);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::content::{ItemPatch, TileKind};
    use alloc::string::ToString;
    use kurbo::Point;

    #[test]
    fn screens_start_one_unit_up_left() {
        let store = catalog::default_store();
        let work = Screen::work(&store, MotionConfig::default()).unwrap();
        assert_eq!(work.pan().offset, Vec2::new(-1728.0, -1600.0));
        let contact = Screen::contact(&store, MotionConfig::default()).unwrap();
        assert_eq!(contact.pan().offset, Vec2::new(-1568.0, -1590.0));
    }

    #[test]
    fn unmeasured_screen_shows_nothing() {
        let work = Screen::work(&catalog::default_store(), MotionConfig::default()).unwrap();
        assert!(work.visible_tiles().is_empty());
    }

    #[test]
    fn wheel_then_resolve() {
        let mut work = Screen::work(&catalog::default_store(), MotionConfig::default()).unwrap();
        work.on_resize(Size::new(1000.0, 800.0));
        let before = work.visible_tiles();
        assert!(!before.is_empty());
        let r = work.on_wheel(Vec2::new(40.0, 0.0));
        assert!(r.prevent_default());
        let after = work.visible_tiles();
        let a = before.iter().find(|t| t.key.to_string() == "1-1-1").unwrap();
        let b = after.iter().find(|t| t.key.to_string() == "1-1-1").unwrap();
        assert_eq!(b.origin, a.origin - Vec2::new(40.0, 0.0));
    }

    #[test]
    fn content_edits_rebuild_the_unit() {
        let mut store = catalog::default_store();
        let mut work = Screen::work(&store, MotionConfig::default()).unwrap();
        assert!(!work.sync_content(&store).unwrap());
        store.update(
            "3",
            ItemPatch {
                tile_kind: Some(TileKind::Mobile),
                local: Some(Point::new(150.0, 550.0)),
                ..ItemPatch::default()
            },
        );
        assert!(work.sync_content(&store).unwrap());
        assert_eq!(work.unit().placements()[2].size, Size::new(288.0, 600.0));
        assert_eq!(work.pan().offset, Vec2::new(-1728.0, -1600.0));
    }

    #[test]
    fn reshaped_item_may_overhang_the_unit() {
        let mut store = catalog::default_store();
        let mut work = Screen::work(&store, MotionConfig::default()).unwrap();
        store.update(
            "5",
            ItemPatch {
                tile_kind: Some(TileKind::Mobile),
                ..ItemPatch::default()
            },
        );
        assert!(work.sync_content(&store).unwrap());
        let rect = work.unit().placements()[4].local_rect();
        assert_eq!(rect.y1, 1700.0, "reaches past the 1600px unit");
    }

    #[test]
    fn invalid_edit_keeps_old_unit() {
        let mut store = catalog::default_store();
        let mut work = Screen::work(&store, MotionConfig::default()).unwrap();
        store.update(
            "5",
            ItemPatch {
                local: Some(Point::new(3500.0, 0.0)),
                ..ItemPatch::default()
            },
        );
        assert!(work.sync_content(&store).is_err());
        assert_eq!(work.unit().placements()[4].local, Point::new(400.0, 1100.0));
    }

    #[test]
    fn routes_differ_between_screens() {
        let store = catalog::default_store();
        let work = Screen::work(&store, MotionConfig::default()).unwrap();
        let contact = Screen::contact(&store, MotionConfig::default()).unwrap();
        assert_eq!(work.route(NavAction::Contact), Some(ViewId::Contact));
        assert_eq!(work.route(NavAction::WorkTab), None);
        assert_eq!(contact.route(NavAction::WorkTab), Some(ViewId::Work));
        assert_eq!(contact.route(NavAction::Contact), None);
        assert_eq!(contact.route(NavAction::LogIn), Some(ViewId::Cms));

        let mut went = None;
        assert!(contact.activate(NavAction::Logo, &mut |v: ViewId| went = Some(v)));
        assert_eq!(went, Some(ViewId::Work));
    }

    #[test]
    fn cms_is_not_a_canvas() {
        let store = catalog::default_store();
        assert!(Screen::for_view(ViewId::Cms, &store, MotionConfig::default()).unwrap().is_none());
    }
}
