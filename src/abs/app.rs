//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use glow::HasContext;

use crate::config::AppConfig;

/// Errors raised while bootstrapping the window and OpenGL context.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("failed to create window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
///
/// `gl` is declared before `gl_context` so the function table is released before the context.
pub struct App {
    pub gl: Arc<glow::Context>,
    _gl_context: sdl2::video::GLContext,
    pub window: sdl2::video::Window,
    pub event_pump: sdl2::EventPump,
    _video_subsystem: sdl2::VideoSubsystem,
    _sdl: sdl2::Sdl,
}

impl App {
    /// Creates a new [`App`] from the window and context settings in `config`.
    /// The width and height options are ignored if `fullscreen` is set to `true`.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let sdl = sdl2::init().map_err(AppError::Sdl)?;
        let video_subsystem = sdl.video().map_err(AppError::Sdl)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(config.gl_version[0], config.gl_version[1]);
        if config.debug_context {
            gl_attr.set_context_flags().debug().set();
        }

        let (width, height) = if config.fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(AppError::Sdl)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (config.width, config.height)
        };

        let mut window = video_subsystem
            .window(&config.title, width, height)
            .opengl()
            .resizable()
            .build()?;
        window
            .set_fullscreen(if config.fullscreen {
                sdl2::video::FullscreenType::Desktop
            } else {
                sdl2::video::FullscreenType::Off
            })
            .map_err(AppError::Sdl)?;

        let gl_context = window.gl_create_context().map_err(AppError::Sdl)?;
        window.gl_make_current(&gl_context).map_err(AppError::Sdl)?;

        let swap_interval = if config.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(swap_interval) {
            log::warn!("Could not set swap interval: {e}");
        }

        let mut gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };

        unsafe {
            log::info!(
                "OpenGL {} on {}",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER)
            );
        }

        if config.debug_context {
            install_debug_callback(&mut gl);
        }

        let event_pump = sdl.event_pump().map_err(AppError::Sdl)?;
        let gl = Arc::new(gl);

        let app = Self {
            gl,
            _gl_context: gl_context,
            window,
            event_pump,
            _video_subsystem: video_subsystem,
            _sdl: sdl,
        };
        app.sync_viewport();
        Ok(app)
    }

    /// Sets the viewport to the window's current drawable size.
    pub fn sync_viewport(&self) {
        let (width, height) = self.window.drawable_size();
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }
}

/// Routes driver debug messages into the logger.
fn install_debug_callback(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        log::warn!("Debug context requested but KHR_debug is not available");
        return;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|source, kind, id, severity, message| {
            log::log!(
                target: "gl",
                debug_severity_level(severity),
                "[{source:#x}/{kind:#x}/{id}] {message}"
            );
        });
    }
}

/// Maps a `GL_DEBUG_SEVERITY_*` value to a log level.
pub fn debug_severity_level(severity: u32) -> log::Level {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => log::Level::Error,
        glow::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        glow::DEBUG_SEVERITY_LOW => log::Level::Info,
        _ => log::Level::Debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_severity_levels() {
        assert_eq!(debug_severity_level(glow::DEBUG_SEVERITY_HIGH), log::Level::Error);
        assert_eq!(debug_severity_level(glow::DEBUG_SEVERITY_MEDIUM), log::Level::Warn);
        assert_eq!(debug_severity_level(glow::DEBUG_SEVERITY_LOW), log::Level::Info);
        assert_eq!(
            debug_severity_level(glow::DEBUG_SEVERITY_NOTIFICATION),
            log::Level::Debug
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::Sdl("No available video device".to_string());
        assert_eq!(err.to_string(), "SDL error: No available video device");
    }
}
