use anyhow::Result;

mod camera;
mod color;
mod config;
mod demo;
mod engine;
mod frame_loop;
mod geometry;
mod light;
mod material;
mod rendering;
mod scene_graph;
mod window;

use crate::{config::DemoConfig, frame_loop::StopSignal};

fn main() -> Result<()> {
    pretty_env_logger::init();

    window::run(DemoConfig::default(), StopSignal::new())?;

    Ok(())
}
