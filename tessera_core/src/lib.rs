// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model of an infinite, pannable, tiled canvas.
//!
//! `tessera_core` holds everything about the canvas that does not touch a
//! host: layout units, pan motion, visibility resolution, the distortion
//! drift, and the parallax star field simulation. It is `no_std`
//! compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   wheel delta ──► Screen::on_wheel ──► PanState.offset
//!   resize      ──► Screen::on_resize ─► ViewportTracker
//!                                            │
//!                    offset + viewport + LayoutUnit
//!                                            ▼
//!                               visibility::resolve ──► [TileInstance]
//!
//!   canvas loop tick ──► FrameScheduler::on_tick ──► DistortionSink
//!                                               └──► MotionController::tick
//!
//!   field loop tick  ──► ParallaxField::tick ──► StarField::advance
//!                                           └──► DepthFieldRenderer::render
//! ```
//!
//! **[`layout`]** validates [`LayoutUnit`](layout::LayoutUnit)s, the
//! rectangles that repeat across the plane.
//!
//! **[`motion`]** applies input deltas and decays velocity.
//!
//! **[`visibility`]** maps an offset and viewport to the tile instances that
//! must exist, keyed `itemId-col-row`.
//!
//! **[`scheduler`]** is the per-tick work of the canvas loop.
//!
//! **[`depth_field`]** and **[`starfield`]** implement the background: one
//! renderer chosen up front, one CPU simulation.
//!
//! **[`screen`]** ties a unit, pan state and viewport together for the work
//! and contact views.
//!
//! **[`trace`]** has the [`TraceSink`](trace::TraceSink) trait and event
//! types, wrapped by a zero-overhead [`Tracer`](trace::Tracer).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod catalog;
pub mod content;
pub mod depth_field;
pub mod distortion;
pub mod frame_loop;
pub mod layout;
pub mod motion;
pub mod scheduler;
pub mod screen;
pub mod starfield;
pub mod time;
pub mod timing;
pub mod trace;
pub mod viewport;
pub mod visibility;
