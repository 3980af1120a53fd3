mod app;
mod config;
mod engine;
mod fill;
mod grid;
mod input;
mod noise;
mod render;
mod ripple;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
