// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless pan session that exercises the tracing and diagnostics pipeline.
//!
//! Builds the work canvas from the built-in catalog, feeds it a burst of
//! simulated wheel deltas, and pumps 60 frames through both cooperative
//! loops. Events go to a [`PrettyPrintSink`](tessera_debug::pretty::PrettyPrintSink)
//! on stdout and a [`RecorderSink`](tessera_debug::recorder::RecorderSink),
//! which is then exported as Chrome trace JSON.
//!
//! Pass `--coast` to keep the pan moving after the wheel burst ends.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::{Size, Vec2};
use tracing::{info, warn};

use tessera_core::catalog;
use tessera_core::content::{ItemPatch, ItemStore, TileKind};
use tessera_core::depth_field::{DepthFieldRenderer, FallbackReason, ParallaxField, Strategy};
use tessera_core::distortion::{Distortion, DistortionConfig};
use tessera_core::frame_loop::{FrameLoop, ManualLoop};
use tessera_core::motion::MotionConfig;
use tessera_core::scheduler::FrameScheduler;
use tessera_core::screen::Screen;
use tessera_core::starfield::{StarField, StarFieldConfig};
use tessera_core::time::{HostTime, Timebase};
use tessera_core::timing::{FrameClock, FrameTick, LoopKind};
use tessera_core::trace::{
    DistortionEvent, FrameSummary, FrameSummaryBuilder, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, RendererSelectedEvent, TilesResolvedEvent, TraceSink, Tracer,
};
use tessera_core::visibility::TileInstance;

use tessera_debug::pretty::PrettyPrintSink;
use tessera_debug::recorder::RecorderSink;

const FRAME_COUNT: u64 = 60;
/// 16.667ms refresh interval in microseconds (≈60 Hz).
const REFRESH_INTERVAL_US: u64 = 16_667;
const VIEWPORT: Size = Size::new(1920.0, 1080.0);
/// Frame at which the demo edits an item to show a layout rebuild.
const EDIT_FRAME: u64 = 30;

/// Forwards every event to both sinks.
struct Sinks {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Sinks {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.pretty.on_frame_tick(e);
        self.recorder.on_frame_tick(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_tiles_resolved(&mut self, e: &TilesResolvedEvent) {
        self.pretty.on_tiles_resolved(e);
        self.recorder.on_tiles_resolved(e);
    }

    fn on_distortion(&mut self, e: &DistortionEvent) {
        self.pretty.on_distortion(e);
        self.recorder.on_distortion(e);
    }

    fn on_renderer_selected(&mut self, e: &RendererSelectedEvent) {
        self.pretty.on_renderer_selected(e);
        self.recorder.on_renderer_selected(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.recorder.on_frame_summary(s);
    }
}

/// A renderer with no output: counts what it would have drawn.
#[derive(Debug, Default)]
struct HeadlessStars {
    bounds: Size,
    drawn: usize,
}

impl DepthFieldRenderer for HeadlessStars {
    fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    fn render(&mut self, field: &StarField) {
        self.drawn = field.visible().count();
    }
}

/// A headless host has no GPU context.
#[derive(Debug)]
struct NoGpu;

impl From<&NoGpu> for FallbackReason {
    fn from(_: &NoGpu) -> Self {
        Self::ContextUnavailable
    }
}

struct Session {
    store: ItemStore,
    screen: Screen,
    scheduler: FrameScheduler,
    field: ParallaxField<HeadlessStars, HeadlessStars>,
    field_clock: FrameClock,
    sinks: Sinks,
    wheel: VecDeque<Vec2>,
    tiles: Vec<TileInstance>,
    last_distortion: Option<Distortion>,
}

impl Session {
    fn canvas_frame(&mut self, tick: FrameTick) {
        let Self {
            store,
            screen,
            scheduler,
            sinks,
            wheel,
            tiles,
            last_distortion,
            ..
        } = self;
        let now = tick.now.ticks();
        let frame_index = tick.frame_index;

        if frame_index == EDIT_FRAME {
            store.update(
                "3",
                ItemPatch {
                    tile_kind: Some(TileKind::Square),
                    ..ItemPatch::default()
                },
            );
            match screen.sync_content(store) {
                Ok(rebuilt) => info!(rebuilt, revision = store.revision(), "content synced"),
                Err(err) => warn!(%err, "edit rejected, keeping previous layout"),
            }
        }

        if let Some(delta) = wheel.pop_front() {
            let _ = screen.on_wheel(delta);
        }

        let mut tracer = Tracer::new(sinks);

        let motion = Span::new(PhaseKind::Motion, HostTime(now + 20), 40);
        let report = motion.run(&mut tracer, frame_index, |tracer| {
            screen.frame(
                &mut *scheduler,
                &tick,
                &mut |d: Distortion| *last_distortion = Some(d),
                tracer,
            )
        });

        let resolve = Span::new(PhaseKind::Resolve, motion.end, 300);
        resolve.run(&mut tracer, frame_index, |tracer| {
            screen.resolve_into(frame_index, &mut *tiles, tracer)
        });

        // Presenting is simulated at a fixed cost per tile.
        let present = Span::new(PhaseKind::Present, resolve.end, 20 * tiles.len() as u64);
        present.run(&mut tracer, frame_index, |_| ());

        let mut summary =
            FrameSummaryBuilder::new(&FrameTickEvent::new(&tick, report.elapsed_ms));
        for span in [motion, resolve, present] {
            span.record(&mut summary);
        }
        summary.set_instances(tiles.len());
        summary.set_pan(screen.pan());
        tracer.frame_summary(&summary.finish());
    }

    fn field_frame(&mut self, tick: FrameTick) {
        let elapsed_ms = self.field_clock.elapsed_ms(tick.now);
        let tick_event = FrameTickEvent::new(&tick, elapsed_ms);
        let mut tracer = Tracer::new(&mut self.sinks);
        tracer.frame_tick(&tick_event);

        let field = &mut self.field;
        let span = Span::new(PhaseKind::Field, HostTime(tick.now.ticks() + 10), 800);
        span.run(&mut tracer, tick.frame_index, |_| field.tick());

        let mut summary = FrameSummaryBuilder::new(&tick_event);
        span.record(&mut summary);
        tracer.frame_summary(&summary.finish());
    }
}

/// A simulated phase with fixed start and end timestamps.
#[derive(Clone, Copy)]
struct Span {
    phase: PhaseKind,
    start: HostTime,
    end: HostTime,
}

impl Span {
    fn new(phase: PhaseKind, start: HostTime, cost_us: u64) -> Self {
        Self {
            phase,
            start,
            end: HostTime(start.ticks() + cost_us),
        }
    }

    fn run<R>(
        &self,
        tracer: &mut Tracer<'_>,
        frame_index: u64,
        work: impl FnOnce(&mut Tracer<'_>) -> R,
    ) -> R {
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: self.phase,
            timestamp: self.start,
        });
        let out = work(tracer);
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: self.phase,
            timestamp: self.end,
        });
        out
    }

    fn record(&self, summary: &mut FrameSummaryBuilder) {
        summary.phase_begin(self.phase, self.start);
        summary.phase_end(self.phase, self.end);
    }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let timebase = Timebase::MICROS;
    let motion = if std::env::args().any(|a| a == "--coast") {
        MotionConfig::coasting()
    } else {
        MotionConfig::direct()
    };

    let mut sinks = Sinks {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout()), timebase),
        recorder: RecorderSink::new(),
    };

    let store = catalog::default_store();
    let mut screen = match Screen::work(&store, motion) {
        Ok(screen) => screen,
        Err(err) => {
            warn!(%err, "built-in catalog does not fit its unit");
            return;
        }
    };
    screen.on_resize(VIEWPORT);

    let field = {
        let mut tracer = Tracer::new(&mut sinks);
        let selected = ParallaxField::select(
            VIEWPORT,
            StarFieldConfig::accelerated(),
            StarFieldConfig::fallback(),
            |_| Err::<HeadlessStars, _>(NoGpu),
            |field| {
                Ok::<_, Infallible>(HeadlessStars {
                    bounds: field.bounds(),
                    drawn: 0,
                })
            },
            &mut tracer,
        );
        let Ok(field) = selected;
        field
    };
    info!(
        kind = ?field.kind(),
        stars = field.field().len(),
        reason = ?field.fallback_reason(),
        "star field ready"
    );

    // A short flick right and down, then nothing.
    let wheel: VecDeque<Vec2> = (0_i32..12)
        .map(|i| Vec2::new(40.0 - f64::from(i) * 3.0, 25.0 - f64::from(i) * 2.0))
        .collect();

    let session = Rc::new(RefCell::new(Session {
        store,
        screen,
        scheduler: FrameScheduler::new(DistortionConfig::drift(), timebase),
        field,
        field_clock: FrameClock::new(timebase),
        sinks,
        wheel,
        tiles: Vec::new(),
        last_distortion: None,
    }));

    let canvas_loop = {
        let session = Rc::clone(&session);
        ManualLoop::new(LoopKind::Canvas, move |tick| {
            session.borrow_mut().canvas_frame(tick);
        })
    };
    let field_loop = {
        let session = Rc::clone(&session);
        ManualLoop::new(LoopKind::Field, move |tick| {
            session.borrow_mut().field_frame(tick);
        })
    };
    canvas_loop.start();
    field_loop.start();

    let mut now_us: u64 = 1_000_000; // start at 1s
    for _ in 0..FRAME_COUNT {
        canvas_loop.pump(HostTime(now_us));
        field_loop.pump(HostTime(now_us + 2_000));
        now_us += REFRESH_INTERVAL_US;
    }
    canvas_loop.stop();
    field_loop.stop();

    let session = session.borrow();
    let pan = session.screen.pan();
    let (Strategy::Accelerated(stars) | Strategy::Fallback(stars)) = session.field.strategy();
    info!(
        canvas_frames = canvas_loop.frames_delivered(),
        field_frames = field_loop.frames_delivered(),
        offset_x = pan.offset.x,
        offset_y = pan.offset.y,
        at_rest = pan.is_at_rest(),
        tiles = session.tiles.len(),
        stars_drawn = stars.drawn,
        field_bounds = ?stars.bounds,
        distortion = ?session.last_distortion.map(|d| d.to_attribute()),
        "session finished"
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            warn!(%err, "failed to create {path}");
            return;
        }
    };
    let mut writer = BufWriter::new(file);
    if let Err(err) =
        tessera_debug::chrome::export(session.sinks.recorder.as_bytes(), timebase, &mut writer)
    {
        warn!(%err, "failed to write Chrome trace");
        return;
    }

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}
