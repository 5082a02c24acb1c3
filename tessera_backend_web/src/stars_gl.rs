// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebGL point-sprite star renderer.
//!
//! Star positions are simulated on the CPU by the shared
//! [`StarField`] and streamed into one dynamic vertex buffer per frame; the
//! vertex shader only projects. Advancing depth in the shader would save the
//! upload, but then recycling would live in two places; with one simulation
//! both renderers respawn stars by the same rule whichever one was selected.
//! At a few thousand stars the per-frame upload is a few tens of kilobytes.

use alloc::string::String;
use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};
use kurbo::Size;
use tessera_core::depth_field::DepthFieldRenderer;
use tessera_core::starfield::StarField;
use wasm_bindgen::JsCast as _;
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as Gl, WebGlShader,
    WebGlUniformLocation,
};

use crate::error::{AcceleratedInitError, describe};

const VERTEX_SHADER: &str = r#"
attribute vec3 position;
attribute float size;

uniform vec2 resolution;
uniform float projection;
uniform float maxDepth;

varying float vBrightness;
varying float vOpacity;

void main() {
    float scale = projection / max(position.z, 1.0);
    vec2 center = resolution * 0.5;
    vec2 screen = (position.xy - center) * scale + center;
    gl_Position = vec4(
        screen.x / resolution.x * 2.0 - 1.0,
        -(screen.y / resolution.y * 2.0 - 1.0),
        0.0,
        1.0
    );
    gl_PointSize = size * scale * 2.0;
    vBrightness = 0.3 + (size / 3.0) * 0.7;
    vOpacity = min(1.0, (maxDepth - position.z) / maxDepth);
}
"#;

const FRAGMENT_SHADER: &str = r#"
precision mediump float;

varying float vBrightness;
varying float vOpacity;

void main() {
    vec2 offset = gl_PointCoord - vec2(0.5);
    float dist = length(offset);
    if (dist > 0.5) discard;
    float alpha = (1.0 - dist * 2.0) * vOpacity * vBrightness;
    gl_FragColor = vec4(1.0, 1.0, 1.0, alpha);
}
"#;

/// Deep-space clear colour.
const CLEAR: [f32; 4] = [0.04, 0.02, 0.12, 1.0];

/// One star as uploaded to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
struct StarVertex {
    position: [f32; 3],
    size: f32,
}

const STRIDE: i32 = 16;
const FLOATS_PER_VERTEX: usize = 4;
const _: () = assert!(size_of::<StarVertex>() == STRIDE as usize);

#[expect(
    clippy::cast_possible_truncation,
    reason = "GPU attributes are single precision"
)]
fn narrow(v: f64) -> f32 {
    v as f32
}

/// Draws a [`StarField`] as additive point sprites.
pub struct GlStars {
    gl: Gl,
    program: WebGlProgram,
    buffer: WebGlBuffer,
    resolution: WebGlUniformLocation,
    vertices: Vec<StarVertex>,
    capacity: usize,
}

impl core::fmt::Debug for GlStars {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlStars")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

fn context(canvas: &HtmlCanvasElement) -> Result<Gl, AcceleratedInitError> {
    for name in ["webgl", "experimental-webgl"] {
        let ctx = canvas
            .get_context(name)
            .map_err(|e| AcceleratedInitError::ContextLookup(describe(&e)))?;
        if let Some(ctx) = ctx
            && let Ok(gl) = ctx.dyn_into::<Gl>()
        {
            return Ok(gl);
        }
    }
    Err(AcceleratedInitError::ContextUnavailable)
}

fn compile(
    gl: &Gl,
    kind: u32,
    stage: &'static str,
    source: &str,
) -> Result<WebGlShader, AcceleratedInitError> {
    let shader = gl
        .create_shader(kind)
        .ok_or(AcceleratedInitError::ShaderCreate)?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(AcceleratedInitError::ShaderCompile { stage, log })
    }
}

fn link(gl: &Gl, vs: &WebGlShader, fs: &WebGlShader) -> Result<WebGlProgram, AcceleratedInitError> {
    let program = gl
        .create_program()
        .ok_or(AcceleratedInitError::ProgramCreate)?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log: String = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(AcceleratedInitError::ProgramLink(log))
    }
}

fn attribute(gl: &Gl, program: &WebGlProgram, name: &'static str) -> Result<u32, AcceleratedInitError> {
    u32::try_from(gl.get_attrib_location(program, name))
        .map_err(|_| AcceleratedInitError::MissingAttribute(name))
}

fn uniform(
    gl: &Gl,
    program: &WebGlProgram,
    name: &'static str,
) -> Result<WebGlUniformLocation, AcceleratedInitError> {
    gl.get_uniform_location(program, name)
        .ok_or(AcceleratedInitError::MissingUniform(name))
}

impl GlStars {
    /// Acquires a WebGL context on `canvas` and prepares buffers for
    /// `field`.
    ///
    /// # Errors
    ///
    /// Any failure means the caller should fall back to 2D drawing.
    pub fn new(canvas: &HtmlCanvasElement, field: &StarField) -> Result<Self, AcceleratedInitError> {
        let gl = context(canvas)?;
        let vs = compile(&gl, Gl::VERTEX_SHADER, "vertex", VERTEX_SHADER)?;
        let fs = compile(&gl, Gl::FRAGMENT_SHADER, "fragment", FRAGMENT_SHADER)?;
        let program = link(&gl, &vs, &fs)?;
        gl.use_program(Some(&program));

        let position = attribute(&gl, &program, "position")?;
        let size = attribute(&gl, &program, "size")?;
        let resolution = uniform(&gl, &program, "resolution")?;
        let projection = uniform(&gl, &program, "projection")?;
        let max_depth = uniform(&gl, &program, "maxDepth")?;

        let buffer = gl.create_buffer().ok_or(AcceleratedInitError::BufferCreate)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        gl.enable_vertex_attrib_array(position);
        gl.vertex_attrib_pointer_with_i32(position, 3, Gl::FLOAT, false, STRIDE, 0);
        gl.enable_vertex_attrib_array(size);
        gl.vertex_attrib_pointer_with_i32(size, 1, Gl::FLOAT, false, STRIDE, 12);

        let config = field.config();
        gl.uniform1f(Some(&projection), narrow(config.projection_scale));
        gl.uniform1f(Some(&max_depth), narrow(config.max_depth));

        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE);
        let [r, g, b, a] = CLEAR;
        gl.clear_color(r, g, b, a);

        let mut this = Self {
            gl,
            program,
            buffer,
            resolution,
            vertices: Vec::with_capacity(field.len()),
            capacity: 0,
        };
        this.resize(field.bounds());
        tracing::info!(stars = field.len(), "webgl star renderer ready");
        Ok(this)
    }

    fn upload(&mut self) {
        let floats: &[f32] = bytemuck::cast_slice(&self.vertices);
        let array = js_sys::Float32Array::from(floats);
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.buffer));
        if self.vertices.len() == self.capacity {
            self.gl
                .buffer_sub_data_with_i32_and_array_buffer_view(Gl::ARRAY_BUFFER, 0, &array);
        } else {
            self.gl
                .buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::DYNAMIC_DRAW);
            self.capacity = self.vertices.len();
        }
        debug_assert_eq!(floats.len(), self.vertices.len() * FLOATS_PER_VERTEX);
    }
}

impl DepthFieldRenderer for GlStars {
    fn resize(&mut self, bounds: Size) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "viewport sizes are small positive integers"
        )]
        let (w, h) = (bounds.width as i32, bounds.height as i32);
        self.gl.viewport(0, 0, w, h);
        self.gl.use_program(Some(&self.program));
        self.gl
            .uniform2f(Some(&self.resolution), narrow(bounds.width), narrow(bounds.height));
    }

    fn render(&mut self, field: &StarField) {
        self.vertices.clear();
        self.vertices.extend(field.stars().iter().map(|s| StarVertex {
            position: [narrow(s.x), narrow(s.y), narrow(s.z)],
            size: narrow(s.size),
        }));
        self.upload();

        let gl = &self.gl;
        gl.clear(Gl::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        let count = i32::try_from(self.vertices.len()).unwrap_or(i32::MAX);
        gl.draw_arrays(Gl::POINTS, 0, count);
    }
}
