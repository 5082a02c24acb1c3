// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable frame loops.
//!
//! A [`FrameLoop`] delivers [`FrameTick`]s to one callback between
//! [`start`](FrameLoop::start) and [`stop`](FrameLoop::stop). Dropping the
//! last handle to a loop stops it. The browser backend implements this on top of
//! `requestAnimationFrame`; [`ManualLoop`] is a host-driven implementation
//! for native tools and tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::time::HostTime;
use crate::timing::{FrameTick, LoopKind};

/// Start/stop lifecycle shared by frame loop implementations.
pub trait FrameLoop {
    /// Begins delivering ticks. Idempotent.
    fn start(&self);

    /// Stops delivering ticks. Idempotent.
    fn stop(&self);

    /// Whether ticks are being delivered.
    fn is_running(&self) -> bool;
}

struct ManualInner {
    source: LoopKind,
    callback: RefCell<Box<dyn FnMut(FrameTick)>>,
    frame_counter: Cell<u64>,
    running: Cell<bool>,
}

/// A frame loop pumped explicitly by the host.
///
/// Cloning yields another handle to the same loop.
#[derive(Clone)]
pub struct ManualLoop {
    inner: Rc<ManualInner>,
}

impl fmt::Debug for ManualLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualLoop")
            .field("source", &self.inner.source)
            .field("frame_counter", &self.inner.frame_counter.get())
            .field("running", &self.inner.running.get())
            .finish_non_exhaustive()
    }
}

impl ManualLoop {
    /// Creates a stopped loop.
    pub fn new(source: LoopKind, callback: impl FnMut(FrameTick) + 'static) -> Self {
        Self {
            inner: Rc::new(ManualInner {
                source,
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                running: Cell::new(false),
            }),
        }
    }

    /// Delivers one tick at `now` if the loop is running. Returns whether a
    /// tick was delivered.
    pub fn pump(&self, now: HostTime) -> bool {
        if !self.inner.running.get() {
            return false;
        }
        let frame_index = self.inner.frame_counter.get();
        self.inner.frame_counter.set(frame_index + 1);
        let tick = FrameTick {
            now,
            frame_index,
            source: self.inner.source,
        };
        (self.inner.callback.borrow_mut())(tick);
        true
    }

    /// Ticks delivered so far.
    #[must_use]
    pub fn frames_delivered(&self) -> u64 {
        self.inner.frame_counter.get()
    }
}

impl FrameLoop for ManualLoop {
    fn start(&self) {
        self.inner.running.set(true);
    }

    fn stop(&self) {
        self.inner.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}
