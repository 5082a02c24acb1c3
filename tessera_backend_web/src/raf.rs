// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame loop.
//!
//! Each callback receives a `DOMHighResTimeStamp` in milliseconds, which is
//! converted to microsecond [`HostTime`](tessera_core::time::HostTime)
//! ticks.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use tessera_core::frame_loop::FrameLoop;
use tessera_core::timing::{FrameTick, LoopKind};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::millis_to_host_time;

// Global bindings avoid fetching the Window on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// Registered with the browser; references itself through `inner`.
    closure: RefCell<Option<RafClosure>>,
    callback: RefCell<Box<dyn FnMut(FrameTick)>>,
    frame_counter: Cell<u64>,
    source: LoopKind,
    running: Cell<bool>,
    /// Handle of the pending request, cancelled on stop.
    raf_id: Cell<i32>,
}

/// A self-rescheduling `requestAnimationFrame` loop.
///
/// Create with [`RafLoop::new`], then [`start`](FrameLoop::start) it.
/// Dropping the loop cancels the pending frame and releases the JS closure.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

impl RafLoop {
    /// Creates a loop that is not yet running.
    pub fn new(source: LoopKind, callback: impl FnMut(FrameTick) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                source,
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    fn schedule(inner: &RafInner) {
        if let Some(ref closure) = *inner.closure.borrow() {
            inner
                .raf_id
                .set(request_animation_frame(closure.as_ref().unchecked_ref()));
        }
    }
}

impl FrameLoop for RafLoop {
    fn start(&self) {
        if self.inner.running.replace(true) {
            return;
        }
        tracing::debug!(source = self.inner.source.label(), "frame loop started");

        if self.inner.closure.borrow().is_none() {
            let inner = Rc::downgrade(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if !inner.running.get() {
                    return;
                }
                let frame_index = inner.frame_counter.get();
                inner.frame_counter.set(frame_index + 1);
                let tick = FrameTick {
                    now: millis_to_host_time(timestamp_ms),
                    frame_index,
                    source: inner.source,
                };
                inner.callback.borrow_mut()(tick);
                if inner.running.get() {
                    Self::schedule(&inner);
                }
            }) as Box<dyn FnMut(f64)>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }
        Self::schedule(&self.inner);
    }

    fn stop(&self) {
        if !self.inner.running.replace(false) {
            return;
        }
        cancel_animation_frame(self.inner.raf_id.get());
        tracing::debug!(
            source = self.inner.source.label(),
            frames = self.inner.frame_counter.get(),
            "frame loop stopped"
        );
    }

    fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("source", &self.inner.source)
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish_non_exhaustive()
    }
}
