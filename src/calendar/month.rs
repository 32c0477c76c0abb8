//! The month composer: every day cell plus the sized header label.

use crate::calendar::{Appointment, Day};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::Point;
use crate::grid::Grid;
use crate::surface::{Surface, TextMeasure};

/// The header size search gives up after this many refinement steps, so
/// pathological font metrics cannot spin it forever.
const HEADER_SEARCH_LIMIT: u32 = 32;

pub struct Month {
    label: String,
    days: Vec<Day>,
}

impl Month {
    /// One `Day` per non-empty grid cell, row-major.
    pub fn new(config: &RenderConfig, grid: &Grid, appointments: &[Appointment]) -> Self {
        let days = grid
            .days()
            .map(|day| Day::new(day, appointments, config))
            .collect();
        let label = format!("{} {}", month_name(config.month), config.year);
        Self { label, days }
    }

    #[allow(dead_code)]
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Largest font size whose rendered label keeps its descender inside
    /// the reserved header, by halving-step growth until the overshoot is
    /// within one pixel.
    fn header_size(&self, config: &RenderConfig, measure: &impl TextMeasure) -> f32 {
        let mut size = 1.0f32;
        let mut diff = 2.0f32;
        for _ in 0..HEADER_SEARCH_LIMIT {
            if diff <= 1.0 {
                break;
            }
            size += diff / 2.0;
            let (_, _, _, y1) = measure.text_bbox(&self.label, size + diff / 2.0);
            diff = config.header_px as f32 - y1 as f32;
        }
        size
    }

    pub fn draw(&self, config: &RenderConfig, grid: &Grid, surface: &mut Surface) -> Result<()> {
        let size = self.header_size(config, surface);
        let (x0, y0, x1, _) = surface.text_bbox(&self.label, size);
        let at = Point::new(config.width / 2 - (x1 - x0) / 2, -y0 / 2);
        surface.draw_text(at, &self.label, config.line_ink, size);
        for day in &self.days {
            day.draw(config, grid, surface)?;
        }
        Ok(())
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RenderConfig {
        RenderConfig {
            month: 12,
            year: 2023,
            width: 1000,
            height: 1100,
            header_px: 100,
            ..RenderConfig::default()
        }
    }

    /// Metrics that scale linearly with the font size.
    struct Linear;

    impl TextMeasure for Linear {
        fn text_width(&self, text: &str, px: f32) -> i32 {
            (text.chars().count() as f32 * px * 0.6) as i32
        }

        fn text_bbox(&self, text: &str, px: f32) -> (i32, i32, i32, i32) {
            (0, (px * 0.2) as i32, self.text_width(text, px), px as i32)
        }
    }

    #[test]
    fn test_one_day_per_calendar_day() {
        let config = config();
        let grid = Grid::new(&config);
        let month = Month::new(&config, &grid, &[]);
        assert_eq!(month.days().len(), 31);
    }

    #[test]
    fn test_header_label_names_the_month() {
        let config = config();
        let grid = Grid::new(&config);
        let month = Month::new(&config, &grid, &[]);
        assert_eq!(month.label, "December 2023");
    }

    #[test]
    fn test_header_size_search_terminates_within_the_header() {
        let config = config();
        let grid = Grid::new(&config);
        let month = Month::new(&config, &grid, &[]);
        let size = month.header_size(&config, &Linear);
        assert!(size >= 1.0);
        let (_, _, _, y1) = Linear.text_bbox(&month.label, size);
        assert!(y1 <= config.header_px);
    }

    #[test]
    fn test_header_size_search_is_bounded_on_flat_metrics() {
        // a degenerate font that never grows would loop forever unbounded
        struct Flat;
        impl TextMeasure for Flat {
            fn text_width(&self, _text: &str, _px: f32) -> i32 {
                1
            }
            fn text_bbox(&self, _text: &str, _px: f32) -> (i32, i32, i32, i32) {
                (0, 0, 1, 1)
            }
        }
        let config = config();
        let grid = Grid::new(&config);
        let month = Month::new(&config, &grid, &[]);
        let size = month.header_size(&config, &Flat);
        assert!(size.is_finite());
    }
}
