//! One rendering session: load event records, draw the month, save.

use std::collections::HashMap;
use std::path::Path;

use crate::calendar::{Appointment, Month, RawEvent};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::surface::Surface;

pub struct CalendarRenderer {
    config: RenderConfig,
    grid: Grid,
    surface: Surface,
    month: Option<Month>,
}

impl CalendarRenderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        let surface = Surface::new(&config)?;
        let grid = Grid::new(&config);
        Ok(Self {
            config,
            grid,
            surface,
            month: None,
        })
    }

    /// Convert and deduplicate the raw records, then build the month. One
    /// bad record fails the whole batch.
    pub fn load(&mut self, records: &[RawEvent]) -> Result<()> {
        let appointments = dedup_by_id(records)?;
        tracing::info!(
            records = records.len(),
            appointments = appointments.len(),
            month = self.config.month,
            year = self.config.year,
            "loaded events"
        );
        self.month = Some(Month::new(&self.config, &self.grid, &appointments));
        Ok(())
    }

    /// Grid first, then the header and day cells on top.
    pub fn draw(&mut self) -> Result<()> {
        let month = self.month.as_ref().ok_or(Error::NotLoaded)?;
        self.grid.draw(&mut self.surface, &self.config)?;
        month.draw(&self.config, &self.grid, &mut self.surface)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.surface.save(path)?;
        tracing::info!(path = %path.display(), "saved calendar image");
        Ok(())
    }
}

/// The first record wins when two share an id.
fn dedup_by_id(records: &[RawEvent]) -> Result<Vec<Appointment>> {
    let mut by_id: HashMap<String, Appointment> = HashMap::new();
    for record in records {
        let appointment = Appointment::load(record)?;
        by_id.entry(appointment.id.clone()).or_insert(appointment);
    }
    Ok(by_id.into_values().collect())
}
