//! Module for anything related to rendering.
//!
//! This module contains the hard-coded geometry, the scene that draws it and the SDL2 frontend
//! that plugs the scene into the render loop. The shaders live under `render/shaders`.

use std::sync::Arc;

use glam::{Vec3, Vec4};
use glow::HasContext;
use serde::Deserialize;

use crate::{
    abs::{App, Mesh, ShaderError, ShaderProgram, ShaderSources, Vertex},
    config::AppConfig,
    other::InputEvent,
    run::Frontend,
};

/// A vertex with a position and a per-vertex color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorVertex {
    pub position: Vec3,
    pub color: Vec3,
}

impl ColorVertex {
    pub const fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}

impl Vertex for ColorVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<ColorVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Color attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                3,
                glow::FLOAT,
                false,
                stride,
                std::mem::offset_of!(ColorVertex, color) as i32,
            );
        }
    }
}

/// A position-only vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionVertex {
    pub position: Vec3,
}

impl Vertex for PositionVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(
                0,
                3,
                glow::FLOAT,
                false,
                std::mem::size_of::<PositionVertex>() as i32,
                0,
            );
        }
    }
}

/// Red, green and blue corners of the drawn triangle.
pub const TRIANGLE_VERTICES: [ColorVertex; 3] = [
    // bottom right
    ColorVertex::new(Vec3::new(0.5, -0.5, 0.0), Vec3::new(1.0, 0.0, 0.0)),
    // bottom left
    ColorVertex::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    // middle top
    ColorVertex::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.0, 1.0)),
];

pub const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

/// A square made of two triangles sharing the bottom-right/top-left diagonal.
pub const QUAD_VERTICES: [PositionVertex; 4] = [
    PositionVertex { position: Vec3::new(0.5, -0.5, 0.0) },  // bottom right
    PositionVertex { position: Vec3::new(-0.5, 0.5, 0.0) },  // top left
    PositionVertex { position: Vec3::new(0.5, 0.5, 0.0) },   // top right
    PositionVertex { position: Vec3::new(-0.5, -0.5, 0.0) }, // bottom left
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 1, 3];

/// Which of the hard-coded meshes to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// The per-vertex colored triangle.
    #[default]
    Triangle,
    /// The two-triangle square, filled with a single uniform color.
    Quad,
}

impl Shape {
    /// The built-in shaders matching this shape's vertex layout.
    pub fn embedded_shaders(self) -> ShaderSources {
        match self {
            Shape::Triangle => ShaderSources::new(
                include_str!("shaders/triangle/vert.glsl"),
                include_str!("shaders/triangle/frag.glsl"),
            ),
            Shape::Quad => ShaderSources::new(
                include_str!("shaders/flat/vert.glsl"),
                include_str!("shaders/flat/frag.glsl"),
            ),
        }
    }

    fn upload(self, gl: &Arc<glow::Context>) -> Result<Mesh, String> {
        match self {
            Shape::Triangle => {
                Mesh::new(gl, &TRIANGLE_VERTICES, &TRIANGLE_INDICES, glow::TRIANGLES)
            }
            Shape::Quad => Mesh::new(gl, &QUAD_VERTICES, &QUAD_INDICES, glow::TRIANGLES),
        }
    }
}

/// Errors raised while uploading the scene to the GPU.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("failed to create mesh: {0}")]
    Mesh(String),
}

/// The shader program and mesh, built once at startup.
pub struct Scene {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    mesh: Mesh,
    shape: Shape,
    clear_color: Vec4,
    quad_color: Vec4,
    wireframe: bool,
}

impl Scene {
    /// Builds the program first so a broken shader never gets as far as a buffer upload.
    pub fn new(
        gl: &Arc<glow::Context>,
        sources: &ShaderSources,
        config: &AppConfig,
    ) -> Result<Self, SceneError> {
        let program = ShaderProgram::from_sources(gl, sources)?;
        let mesh = config.shape.upload(gl).map_err(SceneError::Mesh)?;
        log::info!("Uploaded {:?} mesh with {} indices", config.shape, mesh.index_count());

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            mesh,
            shape: config.shape,
            clear_color: Vec4::from_array(config.clear_color),
            quad_color: Vec4::from_array(config.quad_color),
            wireframe: config.wireframe,
        })
    }

    /// Clears the frame and draws the mesh.
    pub fn render(&self) {
        unsafe {
            let c = self.clear_color;
            self.gl.clear_color(c.x, c.y, c.z, c.w);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
            self.gl.polygon_mode(
                glow::FRONT_AND_BACK,
                if self.wireframe { glow::LINE } else { glow::FILL },
            );
        }

        self.program.use_program();
        if self.shape == Shape::Quad {
            self.program.set_uniform("uColor", self.quad_color);
        }
        self.mesh.draw();
    }
}

/// Plugs a [`Scene`] and the SDL2 window into the render loop.
pub struct SdlFrontend<'a> {
    app: &'a mut App,
    scene: &'a Scene,
}

impl<'a> SdlFrontend<'a> {
    pub fn new(app: &'a mut App, scene: &'a Scene) -> Self {
        Self { app, scene }
    }
}

impl Frontend for SdlFrontend<'_> {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let window = &self.app.window;
        self.app
            .event_pump
            .poll_iter()
            .filter_map(|event| InputEvent::from_sdl(&event, window))
            .collect()
    }

    fn resize(&mut self, width: u32, height: u32) {
        unsafe {
            self.app.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    fn render(&mut self) {
        self.scene.render();
    }

    fn present(&mut self) {
        self.app.window.gl_swap_window();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::test_context;

    #[test]
    fn test_color_vertex_layout() {
        assert_eq!(std::mem::size_of::<ColorVertex>(), 6 * std::mem::size_of::<f32>());
        assert_eq!(std::mem::offset_of!(ColorVertex, position), 0);
        assert_eq!(
            std::mem::offset_of!(ColorVertex, color),
            3 * std::mem::size_of::<f32>()
        );
        assert_eq!(std::mem::size_of::<PositionVertex>(), 3 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_indices_in_bounds() {
        assert!(TRIANGLE_INDICES
            .iter()
            .all(|&i| (i as usize) < TRIANGLE_VERTICES.len()));
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
        assert_eq!(TRIANGLE_INDICES.len() % 3, 0);
        assert_eq!(QUAD_INDICES.len() % 3, 0);
    }

    #[test]
    fn test_quad_covers_all_corners() {
        let mut used = QUAD_INDICES.to_vec();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_embedded_shaders() {
        let triangle = Shape::Triangle.embedded_shaders();
        assert!(triangle.vertex.starts_with("#version 330 core"));
        assert!(triangle.fragment.starts_with("#version 330 core"));
        assert!(triangle.vertex.contains("layout (location = 0) in vec3 aPos;"));
        assert!(triangle.vertex.contains("layout (location = 1) in vec3 aColor;"));
        assert!(triangle.fragment.contains("in vec3 ourColor;"));

        let quad = Shape::Quad.embedded_shaders();
        assert!(!quad.vertex.contains("aColor"));
        assert!(quad.fragment.contains("uniform vec4 uColor;"));
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(serde_json::from_str::<Shape>(r#""quad""#).unwrap(), Shape::Quad);
        assert_eq!(serde_json::from_str::<Shape>(r#""triangle""#).unwrap(), Shape::Triangle);
        assert_eq!(Shape::default(), Shape::Triangle);
    }

    #[test]
    #[ignore = "requires a display and an OpenGL 3.3 context"]
    fn test_scene_builds_and_renders() {
        let ctx = test_context();
        let config = AppConfig::default();
        let scene = Scene::new(&ctx.gl, &Shape::Triangle.embedded_shaders(), &config).unwrap();
        assert_eq!(scene.mesh.index_count(), 3);
        scene.render();
        unsafe {
            assert_eq!(ctx.gl.get_error(), glow::NO_ERROR);
        }
    }

    #[test]
    #[ignore = "requires a display and an OpenGL 3.3 context"]
    fn test_quad_scene_renders() {
        let ctx = test_context();
        let config = AppConfig {
            shape: Shape::Quad,
            wireframe: true,
            ..AppConfig::default()
        };
        let scene = Scene::new(&ctx.gl, &Shape::Quad.embedded_shaders(), &config).unwrap();
        assert_eq!(scene.mesh.index_count(), 6);
        scene.render();
        unsafe {
            assert_eq!(ctx.gl.get_error(), glow::NO_ERROR);
        }
    }

    #[test]
    #[ignore = "requires a display and an OpenGL 3.3 context"]
    fn test_broken_shader_stops_scene() {
        let ctx = test_context();
        let mut sources = Shape::Triangle.embedded_shaders();
        sources.vertex.push_str("\n}\n");

        assert!(matches!(
            Scene::new(&ctx.gl, &sources, &AppConfig::default()),
            Err(SceneError::Shader(ShaderError::Compile { .. }))
        ));
    }
}
