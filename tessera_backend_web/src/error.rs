// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use tessera_core::depth_field::FallbackReason;
use tessera_core::layout::LayoutError;
use wasm_bindgen::JsValue;

/// Why the WebGL star renderer could not be set up.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AcceleratedInitError {
    /// Neither `webgl` nor `experimental-webgl` produced a context.
    #[error("no WebGL context available")]
    ContextUnavailable,
    /// `getContext` threw.
    #[error("WebGL context lookup failed: {0}")]
    ContextLookup(String),
    /// `createShader` returned null.
    #[error("could not create shader object")]
    ShaderCreate,
    /// A shader did not compile.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile {
        /// `"vertex"` or `"fragment"`.
        stage: &'static str,
        /// Driver info log.
        log: String,
    },
    /// `createProgram` returned null.
    #[error("could not create program object")]
    ProgramCreate,
    /// The program did not link.
    #[error("program failed to link: {0}")]
    ProgramLink(String),
    /// `createBuffer` returned null.
    #[error("could not create vertex buffer")]
    BufferCreate,
    /// A required uniform is missing from the linked program.
    #[error("uniform `{0}` not found")]
    MissingUniform(&'static str),
    /// A required vertex attribute is missing from the linked program.
    #[error("attribute `{0}` not found")]
    MissingAttribute(&'static str),
}

impl From<&AcceleratedInitError> for FallbackReason {
    fn from(e: &AcceleratedInitError) -> Self {
        match e {
            AcceleratedInitError::ContextUnavailable | AcceleratedInitError::ContextLookup(_) => {
                Self::ContextUnavailable
            }
            AcceleratedInitError::ShaderCreate | AcceleratedInitError::ShaderCompile { .. } => {
                Self::ShaderCompile
            }
            AcceleratedInitError::ProgramCreate | AcceleratedInitError::ProgramLink(_) => {
                Self::ProgramLink
            }
            AcceleratedInitError::BufferCreate
            | AcceleratedInitError::MissingUniform(_)
            | AcceleratedInitError::MissingAttribute(_) => Self::Resource,
        }
    }
}

/// Errors from the browser backend.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WebError {
    /// No global `window`.
    #[error("no window")]
    NoWindow,
    /// The window has no document.
    #[error("no document")]
    NoDocument,
    /// `getContext("2d")` returned null.
    #[error("2D canvas context unavailable")]
    Canvas2dUnavailable,
    /// A content edit produced an invalid layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// A DOM call threw.
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe(&value))
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| alloc::format!("{value:?}"))
}
