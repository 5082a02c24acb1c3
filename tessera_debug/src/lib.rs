// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for tessera frame
//! diagnostics.
//!
//! Each module provides a [`TraceSink`](tessera_core::trace::TraceSink)
//! implementation or a consumer of one:
//!
//! - [`pretty::PrettyPrintSink`] writes one human-readable line per event.
//! - [`recorder::RecorderSink`] records events into a compact binary buffer,
//!   and [`recorder::decode`] plays them back.
//! - [`chrome::export`] turns a recording into Chrome Trace Event Format JSON.

pub mod chrome;
pub mod pretty;
pub mod recorder;
