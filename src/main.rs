use std::process::ExitCode;

use anyhow::Context;

use crate::{
    abs::{App, ShaderSources},
    config::AppConfig,
    render::{Scene, SdlFrontend},
};

mod abs;
mod config;
mod logging;
mod other;
mod render;
mod run;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Before the logger is installed the max level is `Off` and records are dropped.
            if log::max_level() == log::LevelFilter::Off {
                eprintln!("Error: {}", error_message(&err));
            } else {
                log::error!("{}", error_message(&err));
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    logging::init(config.log_level).context("failed to install logger")?;

    let mut app = App::new(&config).context("failed to open window")?;

    let sources = match &config.shaders {
        Some(paths) => ShaderSources::from_files(&paths.vertex, &paths.fragment)
            .context("failed to load shaders")?,
        None => config.shape.embedded_shaders(),
    };

    // Declared after `app` so the GPU objects are dropped while the context is still alive.
    let scene = Scene::new(&app.gl, &sources, &config).context("failed to build scene")?;

    let frames = run::run(&mut SdlFrontend::new(&mut app, &scene));
    log::info!("Closed after {frames} frames");

    Ok(())
}

/// The error and its causes on one line, outermost first.
fn error_message(err: &anyhow::Error) -> String {
    format!("{err:#}")
}
