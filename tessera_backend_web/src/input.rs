// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped wheel and resize listeners.
//!
//! Each binding owns its JS closure and removes the listener when dropped,
//! so a screen's input wiring lives exactly as long as the screen.

use alloc::boxed::Box;

use kurbo::{Size, Vec2};
use tessera_core::motion::InputResponse;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, EventTarget, WheelEvent, Window};

use crate::error::WebError;

type Listener = Closure<dyn FnMut(Event)>;

struct Registration {
    target: EventTarget,
    kind: &'static str,
    closure: Listener,
}

impl Registration {
    fn remove(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Current inner size of `window`, or zero if it cannot be read.
#[must_use]
pub fn window_size(window: &Window) -> Size {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Size::new(read(window.inner_width()), read(window.inner_height()))
}

/// A non-passive `wheel` listener.
///
/// The handler receives raw `(deltaX, deltaY)`; when it answers
/// [`InputResponse::Consumed`] the native scroll is suppressed.
pub struct WheelBinding {
    reg: Registration,
}

impl WheelBinding {
    /// Attaches `handler` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Js`] if the listener cannot be added.
    pub fn attach(
        target: &EventTarget,
        mut handler: impl FnMut(Vec2) -> InputResponse + 'static,
    ) -> Result<Self, WebError> {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            let delta = Vec2::new(wheel.delta_x(), wheel.delta_y());
            if handler(delta).prevent_default() {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            reg: Registration {
                target: target.clone(),
                kind: "wheel",
                closure,
            },
        })
    }
}

impl Drop for WheelBinding {
    fn drop(&mut self) {
        self.reg.remove();
    }
}

impl core::fmt::Debug for WheelBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WheelBinding").finish_non_exhaustive()
    }
}

/// A `resize` listener on the window.
pub struct ResizeBinding {
    reg: Registration,
}

impl ResizeBinding {
    /// Attaches `handler` and immediately calls it once with the current
    /// size, so the first measurement does not wait for a resize.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Js`] if the listener cannot be added.
    pub fn attach(
        window: &Window,
        mut handler: impl FnMut(Size) + 'static,
    ) -> Result<Self, WebError> {
        handler(window_size(window));
        let source = window.clone();
        let closure = Closure::wrap(Box::new(move |_: Event| {
            handler(window_size(&source));
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        Ok(Self {
            reg: Registration {
                target: window.clone().into(),
                kind: "resize",
                closure,
            },
        })
    }
}

impl Drop for ResizeBinding {
    fn drop(&mut self) {
        self.reg.remove();
    }
}

impl core::fmt::Debug for ResizeBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResizeBinding").finish_non_exhaustive()
    }
}
