//! This module contains the thin wrappers over SDL2 and OpenGL: application setup, shader
//! management and mesh handling.

pub mod app;
pub mod mesh;
pub mod shader;

pub use app::*;
pub use mesh::*;
pub use shader::*;

/// A hidden window with a current OpenGL 3.3 core context, for tests that talk to the driver.
#[cfg(test)]
pub(crate) struct TestContext {
    pub gl: std::sync::Arc<glow::Context>,
    _gl_context: sdl2::video::GLContext,
    _window: sdl2::video::Window,
    _video: sdl2::VideoSubsystem,
    _sdl: sdl2::Sdl,
}

#[cfg(test)]
pub(crate) fn test_context() -> TestContext {
    let sdl = sdl2::init().unwrap();
    let video = sdl.video().unwrap();
    let gl_attr = video.gl_attr();
    gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
    gl_attr.set_context_version(3, 3);

    let window = video
        .window("test", 64, 64)
        .opengl()
        .hidden()
        .build()
        .unwrap();
    let gl_context = window.gl_create_context().unwrap();
    window.gl_make_current(&gl_context).unwrap();
    let gl = unsafe {
        glow::Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _)
    };

    TestContext {
        gl: std::sync::Arc::new(gl),
        _gl_context: gl_context,
        _window: window,
        _video: video,
        _sdl: sdl,
    }
}
