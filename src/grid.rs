//! The month grid: maps a day of month to its pixel cell on the canvas.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::{Box, Point};
use crate::surface::Surface;

/// Week rows of weekday columns for one month; 0 marks a slot outside the
/// month. Immutable for the rendering session.
pub struct Grid {
    layout: Vec<Vec<u32>>,
    rows: usize,
    cols: usize,
    width: i32,
    height: i32,
    header_px: i32,
    first_weekday: Weekday,
}

impl Grid {
    pub fn new(config: &RenderConfig) -> Self {
        let layout = month_layout(config.year, config.month, config.first_weekday);
        Self::from_layout(
            layout,
            config.width,
            config.height,
            config.header_px,
            config.first_weekday,
        )
    }

    fn from_layout(
        layout: Vec<Vec<u32>>,
        width: i32,
        height: i32,
        header_px: i32,
        first_weekday: Weekday,
    ) -> Self {
        let rows = layout.len().max(1);
        let cols = layout.iter().map(Vec::len).max().unwrap_or(1).max(1);
        Self {
            layout,
            rows,
            cols,
            width,
            height,
            header_px,
            first_weekday,
        }
    }

    /// Non-empty cells in row-major order.
    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.layout.iter().flatten().copied().filter(|&day| day != 0)
    }

    fn locate(&self, day: u32) -> Result<(usize, usize)> {
        if day != 0 {
            for (row, week) in self.layout.iter().enumerate() {
                for (col, &cell) in week.iter().enumerate() {
                    if cell == day {
                        return Ok((row, col));
                    }
                }
            }
        }
        Err(Error::DayNotFound(day))
    }

    pub fn is_weekend(&self, day: u32) -> Result<bool> {
        let (_, col) = self.locate(day)?;
        let weekday = (self.first_weekday.num_days_from_monday() as usize + col) % 7;
        Ok(weekday >= 5)
    }

    /// Width of a single column cell.
    pub fn cell_width(&self) -> i32 {
        self.width / self.cols as i32
    }

    fn row_height(&self) -> i32 {
        (self.height - self.header_px) / self.rows as i32
    }

    fn cell_box(&self, row: usize, col: usize, span_cols: u32) -> Result<Box> {
        let col_w = self.cell_width();
        let row_h = self.row_height();
        let start = Point::new(col_w * col as i32, self.header_px + row_h * row as i32);
        // clamp at the right edge; spans never wrap to the next row
        let span = span_cols.max(1).min((self.cols - col) as u32);
        let end = start + (span as i32 * col_w, row_h);
        Box::new(start, end)
    }

    /// The pixel rectangle for `day`, widened to `span_days` columns.
    pub fn coords_for_day(&self, day: u32, span_days: u32) -> Result<Box> {
        let (row, col) = self.locate(day)?;
        self.cell_box(row, col, span_days)
    }

    /// Outline every cell; a no-op unless grid rendering is enabled.
    pub fn draw(&self, surface: &mut Surface, config: &RenderConfig) -> Result<()> {
        if !config.render_grid {
            return Ok(());
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.cell_box(row, col, 1)?
                    .draw(surface, config.line_ink, config.line_width);
            }
        }
        Ok(())
    }
}

/// Week rows for the month with `first_weekday` in column 0.
fn month_layout(year: i32, month: u32, first_weekday: Weekday) -> Vec<Vec<u32>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid year/month");
    let offset =
        (7 + first.weekday().num_days_from_monday() - first_weekday.num_days_from_monday()) % 7;

    let mut weeks = Vec::new();
    let mut week = vec![0u32; 7];
    let mut col = offset as usize;
    for day in 1..=days_in_month(year, month) {
        week[col] = day;
        col += 1;
        if col == 7 {
            weeks.push(std::mem::replace(&mut week, vec![0u32; 7]));
            col = 0;
        }
    }
    if week.iter().any(|&day| day != 0) {
        weeks.push(week);
    }
    weeks
}

fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .unwrap()
    .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    .num_days() as u32
}
