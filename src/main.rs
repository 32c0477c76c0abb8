mod calendar;
mod config;
mod error;
mod geometry;
mod grid;
mod renderer;
mod surface;

use std::path::Path;

use chrono::Local;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use calendar::RawEvent;
use config::RenderConfig;
use renderer::CalendarRenderer;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let events_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "events.json".to_string());
    let config = RenderConfig::load();

    eprintln!("Reading events from {events_path}...");
    let raw = std::fs::read_to_string(&events_path)
        .wrap_err_with(|| format!("could not read event records from {events_path}"))?;
    let records: Vec<RawEvent> =
        serde_json::from_str(&raw).wrap_err("event records are not valid JSON")?;

    let mut renderer = CalendarRenderer::new(config)?;
    renderer.load(&records)?;
    renderer.draw()?;

    let output = format!("{}.png", Local::now().date_naive());
    renderer.save(Path::new(&output))?;
    eprintln!("Saved {output}");
    Ok(())
}
