//! One rendered day cell: the number, the today highlight, and the
//! stacked appointment labels.

use chrono::{NaiveDate, NaiveTime};
use image::Rgba;

use crate::calendar::Appointment;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::{Box, Resize};
use crate::grid::Grid;
use crate::surface::{Surface, TextMeasure};

const TODAY_CIRCLE_MARGIN_PX: i32 = 5;

pub struct Day {
    day: u32,
    appointments: Vec<Appointment>,
}

impl Day {
    /// Select and order the appointments active on this day.
    pub fn new(day: u32, appointments: &[Appointment], config: &RenderConfig) -> Self {
        let midnight = NaiveDate::from_ymd_opt(config.year, config.month, day)
            .expect("day comes from the month layout")
            .and_time(NaiveTime::MIN)
            .and_utc();
        let mut selected: Vec<Appointment> = appointments
            .iter()
            .filter(|a| a.on_day(midnight))
            .cloned()
            .collect();
        // multi-day spans stack on top, then by end time of day
        selected.sort_by_key(|a| (!a.is_multi_day(), a.end.time(), a.end));
        Self {
            day,
            appointments: selected,
        }
    }

    #[allow(dead_code)]
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    fn date(&self, config: &RenderConfig) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(config.year, config.month, self.day)
    }

    fn is_today(&self, config: &RenderConfig) -> bool {
        self.date(config) == Some(config.today)
    }

    fn number_ink(&self, config: &RenderConfig, grid: &Grid) -> Result<Rgba<u8>> {
        if self.is_today(config) {
            Ok(config.today_ink)
        } else if grid.is_weekend(self.day)? {
            Ok(config.weekend_ink)
        } else {
            Ok(config.line_ink)
        }
    }

    pub fn draw(&self, config: &RenderConfig, grid: &Grid, surface: &mut Surface) -> Result<()> {
        let coords = grid.coords_for_day(self.day, 1)?;
        let label = self.day.to_string();
        let (x0, y0, x1, y1) = surface.text_bbox(&label, config.number_size);
        let offset_x = (coords.width() - (x1 - x0)) / 2;
        let anchor = coords.start() + (offset_x, 0);
        let mut offset_y = y1 + config.day_spacing_px;

        if self.is_today(config) {
            if let Ok(mut circle) = Box::from_corners(x0, y0, x1, y1) {
                circle.resize(Resize::Uniform(TODAY_CIRCLE_MARGIN_PX))?;
                let mut circle = circle.encapsulating_square()?;
                circle.anchor_to(anchor);
                surface.draw_ellipse(&circle, config.today_fill);
                offset_y = offset_y.max(circle.height());
            }
        }

        surface.draw_text(anchor, &label, self.number_ink(config, grid)?, config.number_size);

        for appointment in &self.appointments {
            offset_y += config.appointment_spacing_px;
            offset_y += appointment.draw(config, grid, surface, offset_y, Some(self.day))?;
        }
        Ok(())
    }
}
