// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page wiring: header, active view, and the shared star field and filter.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kurbo::{Size, Vec2};
use tessera_backend_web::{
    RafLoop, ResizeBinding, StarfieldCanvas, TilePresenter, TurbulenceFilter, WebError,
    WheelBinding,
};
use tessera_core::content::{ItemPatch, ItemStore, TileKind};
use tessera_core::distortion::DistortionConfig;
use tessera_core::frame_loop::FrameLoop;
use tessera_core::motion::InputResponse;
use tessera_core::scheduler::FrameScheduler;
use tessera_core::screen::{NavAction, Screen, ViewId};
use tessera_core::timing::{FrameTick, LoopKind};
use tessera_core::trace::Tracer;
use tessera_core::visibility::TileInstance;
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, HtmlElement, Window};

use crate::Options;
use crate::cards::CardPainter;

const FILTER_ID: &str = "tessera-distortion";
const DISPLACEMENT: f64 = 6.0;

type Listener = Closure<dyn FnMut(Event)>;

const BUTTONS: [(NavAction, &str); 5] = [
    (NavAction::Logo, "tessera"),
    (NavAction::WorkTab, "Work"),
    (NavAction::AboutTab, "About"),
    (NavAction::Contact, "Contact"),
    (NavAction::LogIn, "Log in"),
];

/// Which header controls a view shows.
pub(crate) fn shows_button(view: ViewId, action: NavAction) -> bool {
    match view {
        ViewId::Work => matches!(
            action,
            NavAction::Logo | NavAction::Contact | NavAction::LogIn
        ),
        ViewId::Contact => !matches!(action, NavAction::Contact),
        ViewId::Cms => matches!(action, NavAction::Logo | NavAction::WorkTab),
    }
}

/// The next shape in the editor's cycle.
pub(crate) fn next_kind(kind: TileKind) -> TileKind {
    match kind {
        TileKind::Mobile => TileKind::Desktop,
        TileKind::Desktop => TileKind::Square,
        TileKind::Square => TileKind::LargeSquare,
        TileKind::LargeSquare => TileKind::Mobile,
    }
}

fn kind_label(kind: TileKind) -> &'static str {
    match kind {
        TileKind::Mobile => "Mobile",
        TileKind::Desktop => "Desktop",
        TileKind::Square => "Square",
        TileKind::LargeSquare => "Large square",
    }
}

fn element(doc: &Document, tag: &str, style: &str) -> Result<HtmlElement, WebError> {
    let el = doc.create_element(tag)?;
    el.set_attribute("style", style)?;
    Ok(el.unchecked_into())
}

fn on_click(
    target: &HtmlElement,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, WebError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

struct Header {
    root: HtmlElement,
    buttons: Vec<(NavAction, HtmlElement)>,
    listeners: Vec<Listener>,
}

impl Header {
    fn new(doc: &Document, parent: &HtmlElement) -> Result<Self, WebError> {
        let root = element(
            doc,
            "nav",
            "position: fixed; top: 0; left: 0; right: 0; z-index: 3; display: flex; \
             gap: 12px; align-items: center; padding: 16px 24px; \
             font-family: system-ui, sans-serif; background: rgba(10, 5, 32, 0.6); \
             backdrop-filter: blur(12px)",
        )?;
        let mut buttons = Vec::with_capacity(BUTTONS.len());
        for (action, label) in BUTTONS {
            let style = if action == NavAction::Logo {
                "margin-right: auto; font-weight: 700; font-size: 18px; color: #fff; \
                 background: none; border: 0; cursor: pointer"
            } else {
                "color: #e8e6ff; background: rgba(255, 255, 255, 0.08); border: 0; \
                 border-radius: 999px; padding: 8px 16px; cursor: pointer"
            };
            let button = element(doc, "button", style)?;
            button.set_text_content(Some(label));
            root.append_child(&button)?;
            buttons.push((action, button));
        }
        parent.append_child(&root)?;
        Ok(Self {
            root,
            buttons,
            listeners: Vec::new(),
        })
    }

    fn bind(&mut self, app: &Weak<RefCell<App>>) -> Result<(), WebError> {
        for (action, button) in &self.buttons {
            let action = *action;
            let app = app.clone();
            self.listeners.push(on_click(button, move |_| {
                let Some(app) = app.upgrade() else {
                    return;
                };
                let target = app.borrow().route(action);
                if let Some(view) = target
                    && let Err(err) = App::show(&app, view)
                {
                    warn!(%err, ?view, "navigation failed");
                }
            })?);
        }
        Ok(())
    }

    fn show_for(&self, view: ViewId) {
        for (action, button) in &self.buttons {
            let display = if shows_button(view, *action) { "" } else { "none" };
            let _ = button.style().set_property("display", display);
        }
    }
}

impl Drop for Header {
    fn drop(&mut self) {
        self.root.remove();
    }
}

struct CanvasState {
    screen: Screen,
    scheduler: FrameScheduler,
    presenter: TilePresenter<CardPainter>,
    filter: Rc<RefCell<TurbulenceFilter>>,
    tiles: Vec<TileInstance>,
    needs_present: bool,
}

impl CanvasState {
    fn on_frame(&mut self, tick: FrameTick) {
        let report = {
            let mut filter = self.filter.borrow_mut();
            self.screen
                .frame(&mut self.scheduler, &tick, &mut *filter, &mut Tracer::none())
        };
        if report.offset_moved || self.needs_present {
            self.present(tick.frame_index);
        }
    }

    fn on_wheel(&mut self, delta: Vec2) -> InputResponse {
        let response = self.screen.on_wheel(delta);
        if response == InputResponse::Consumed {
            self.needs_present = true;
        }
        response
    }

    fn on_resize(&mut self, size: Size) {
        if self.screen.on_resize(size) {
            debug!(width = size.width, height = size.height, "viewport resized");
            self.needs_present = true;
        }
    }

    fn present(&mut self, frame_index: u64) {
        self.needs_present = false;
        self.screen
            .resolve_into(frame_index, &mut self.tiles, &mut Tracer::none());
        match self.presenter.present(&self.tiles) {
            Ok(stats) if stats.added + stats.removed > 0 => debug!(
                added = stats.added,
                removed = stats.removed,
                live = stats.live,
                "tiles reconciled"
            ),
            Ok(_) => {}
            Err(err) => warn!(%err, "tile presentation failed"),
        }
    }
}

/// A mounted canvas screen. Dropping it stops its loop, detaches its
/// listeners and removes its elements.
struct CanvasView {
    plane: HtmlElement,
    raf: RafLoop,
    _wheel: WheelBinding,
    _resize: ResizeBinding,
    state: Rc<RefCell<CanvasState>>,
}

impl CanvasView {
    fn mount(app: &App, screen: Screen) -> Result<Self, WebError> {
        let plane = element(
            &app.doc,
            "div",
            "position: fixed; inset: 0; overflow: hidden; z-index: 1",
        )?;
        plane
            .style()
            .set_property("filter", &app.filter.borrow().css_url())?;
        app.body.append_child(&plane)?;

        let state = Rc::new(RefCell::new(CanvasState {
            screen,
            scheduler: FrameScheduler::new(
                DistortionConfig::drift(),
                tessera_backend_web::timebase(),
            ),
            presenter: TilePresenter::new(plane.clone(), CardPainter::new(app.store.items())),
            filter: Rc::clone(&app.filter),
            tiles: Vec::new(),
            needs_present: true,
        }));

        let target = Rc::clone(&state);
        let resize =
            ResizeBinding::attach(&app.window, move |size| target.borrow_mut().on_resize(size))?;
        let target = Rc::clone(&state);
        let wheel =
            WheelBinding::attach(&app.window, move |delta| target.borrow_mut().on_wheel(delta))?;
        let target = Rc::clone(&state);
        let raf = RafLoop::new(LoopKind::Canvas, move |tick| {
            target.borrow_mut().on_frame(tick);
        });
        raf.start();

        Ok(Self {
            plane,
            raf,
            _wheel: wheel,
            _resize: resize,
            state,
        })
    }
}

impl Drop for CanvasView {
    fn drop(&mut self) {
        self.raf.stop();
        self.plane.remove();
    }
}

/// A small editor that cycles each item's shape.
struct CmsPanel {
    root: HtmlElement,
    _listeners: Vec<Listener>,
}

impl CmsPanel {
    fn mount(weak: &Weak<RefCell<App>>, app: &App) -> Result<Self, WebError> {
        let doc = &app.doc;
        let root = element(
            doc,
            "section",
            "position: fixed; top: 96px; left: 50%; transform: translateX(-50%); z-index: 2; \
             width: min(640px, 90vw); padding: 24px; border-radius: 16px; \
             background: rgba(20, 16, 40, 0.92); color: #e8e6ff; \
             font-family: system-ui, sans-serif",
        )?;
        let heading = element(doc, "h2", "margin: 0 0 16px")?;
        heading.set_text_content(Some("Content"));
        root.append_child(&heading)?;

        let mut listeners = Vec::with_capacity(app.store.len());
        for item in app.store.items() {
            let row = element(
                doc,
                "div",
                "display: flex; align-items: center; gap: 12px; padding: 8px 0",
            )?;
            let title = element(doc, "span", "flex: 1")?;
            title.set_text_content(Some(&item.title));
            let shape = element(doc, "button", "min-width: 120px; cursor: pointer")?;
            shape.set_text_content(Some(kind_label(item.tile_kind)));
            row.append_child(&title)?;
            row.append_child(&shape)?;
            root.append_child(&row)?;

            let app = weak.clone();
            let id = item.id.clone();
            let label = shape.clone();
            listeners.push(on_click(&shape, move |_| {
                let Some(app) = app.upgrade() else {
                    return;
                };
                let mut app = app.borrow_mut();
                if let Some(kind) = app.cycle_shape(id.as_str()) {
                    label.set_text_content(Some(kind_label(kind)));
                }
            })?);
        }

        app.body.append_child(&root)?;
        Ok(Self {
            root,
            _listeners: listeners,
        })
    }
}

impl Drop for CmsPanel {
    fn drop(&mut self) {
        self.root.remove();
    }
}

enum View {
    Canvas(CanvasView),
    Cms(CmsPanel),
}

/// Everything the page keeps alive.
pub(crate) struct App {
    window: Window,
    doc: Document,
    body: HtmlElement,
    store: ItemStore,
    options: Options,
    filter: Rc<RefCell<TurbulenceFilter>>,
    header: Header,
    current: Option<(ViewId, View)>,
    _stars: Option<StarfieldCanvas>,
}

impl App {
    /// Builds the page and shows the work canvas.
    pub(crate) fn launch(window: Window, store: ItemStore, options: Options) -> Result<(), WebError> {
        let doc = window.document().ok_or(WebError::NoDocument)?;
        let body = doc.body().ok_or(WebError::NoDocument)?;

        let filter = TurbulenceFilter::install(&doc, &body, FILTER_ID, DISPLACEMENT)?;
        let (accelerated, fallback) = options.star_configs();
        let stars = match StarfieldCanvas::mount(
            &window,
            &body,
            accelerated,
            fallback,
            &mut Tracer::none(),
        ) {
            Ok(stars) => Some(stars),
            Err(err) => {
                warn!(%err, "star field unavailable");
                None
            }
        };
        let header = Header::new(&doc, &body)?;

        let app = Rc::new(RefCell::new(Self {
            window,
            doc,
            body,
            store,
            options,
            filter: Rc::new(RefCell::new(filter)),
            header,
            current: None,
            _stars: stars,
        }));
        app.borrow_mut().header.bind(&Rc::downgrade(&app))?;
        Self::show(&app, ViewId::Work)?;

        // Keep the app alive; there is no graceful shutdown on the web.
        std::mem::forget(app);
        Ok(())
    }

    /// Replaces the current view with `view`.
    fn show(this: &Rc<RefCell<Self>>, view: ViewId) -> Result<(), WebError> {
        let mut app = this.borrow_mut();
        app.current = None;
        let mounted = match Screen::for_view(view, &app.store, app.options.motion())? {
            Some(screen) => View::Canvas(CanvasView::mount(&app, screen)?),
            None => View::Cms(CmsPanel::mount(&Rc::downgrade(this), &app)?),
        };
        app.current = Some((view, mounted));
        app.header.show_for(view);
        info!(?view, items = app.store.len(), "view shown");
        Ok(())
    }

    /// Where a header control leads from the current view.
    fn route(&self, action: NavAction) -> Option<ViewId> {
        match &self.current {
            Some((_, View::Canvas(canvas))) => {
                let mut target = None;
                canvas
                    .state
                    .borrow()
                    .screen
                    .activate(action, &mut |v: ViewId| target = Some(v));
                target
            }
            _ => match action {
                NavAction::Logo | NavAction::WorkTab => Some(ViewId::Work),
                _ => None,
            },
        }
    }

    /// Advances an item to its next shape, reverting if the work layout
    /// would no longer fit. Returns the shape the item ends up with.
    fn cycle_shape(&mut self, id: &str) -> Option<TileKind> {
        let item = self.store.get(id)?;
        let (previous, previous_size) = (item.tile_kind, item.size);
        let next = next_kind(previous);
        self.store.update(
            id,
            ItemPatch {
                tile_kind: Some(next),
                ..ItemPatch::default()
            },
        );
        match Screen::work(&self.store, self.options.motion()) {
            Ok(_) => {
                info!(id, shape = kind_label(next), "item reshaped");
                Some(next)
            }
            Err(err) => {
                warn!(%err, id, "shape does not fit the work canvas, reverting");
                self.store.update(
                    id,
                    ItemPatch {
                        tile_kind: Some(previous),
                        size: Some(previous_size),
                        ..ItemPatch::default()
                    },
                );
                Some(previous)
            }
        }
    }
}
