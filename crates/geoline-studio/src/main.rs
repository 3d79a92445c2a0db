//! Geoline studio: interactive viewer for the wide-line pipeline.
//!
//! Keys:
//! - `W` cycle route width (rebuild), `A` extend the coast route (rebuild)
//! - `T` toggle join threshold, `V` toggle graticule, `B` swap route bin
//! - drag / arrows pan, wheel / `+` `-` zoom, `R` reset view, `Esc` quit

mod app;
mod config;
mod dataset;

use anyhow::{Context, Result};
use winit::event_loop::EventLoop;

use geoline_engine::logging::init_logging;

use crate::app::Studio;
use crate::config::StudioConfig;

fn main() -> Result<()> {
    let config = StudioConfig::from_env();
    init_logging(config.logging.clone());
    log::info!("map CRS {}", config.map_crs);

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut studio = Studio::new(config)?;

    event_loop
        .run_app(&mut studio)
        .context("winit event loop terminated with error")?;

    Ok(())
}
