//! Rendering configuration, with an optional TOML overlay from the user
//! config dir.

use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use image::Rgba;
use serde::Deserialize;

/// Everything one render pass needs to know. Defaults describe a portrait
/// 1080x1920 canvas with a Monday-first week.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub month: u32,
    pub year: i32,
    /// The date that gets the highlight circle.
    pub today: NaiveDate,
    pub width: i32,
    pub height: i32,
    /// Vertical space reserved for the month header.
    pub header_px: i32,
    pub line_ink: Rgba<u8>,
    pub line_width: u32,
    /// Vertical gap between stacked appointment labels.
    pub appointment_spacing_px: i32,
    /// Horizontal inset of a label from its cell edges.
    pub appointment_padding_px: i32,
    /// Gap between the day number and the first label.
    pub day_spacing_px: i32,
    /// Font size of the day number.
    pub number_size: f32,
    /// Font size of appointment labels.
    pub font_size: f32,
    /// Explicit font file; falls back to well-known system locations.
    pub font_path: Option<PathBuf>,
    pub first_weekday: Weekday,
    pub render_grid: bool,
    pub draw_background: bool,
    pub today_fill: Rgba<u8>,
    pub today_ink: Rgba<u8>,
    pub weekend_ink: Rgba<u8>,
    pub background_fill: Rgba<u8>,
    pub background_outline: Rgba<u8>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            month: today.month(),
            year: today.year(),
            today,
            width: 1080,
            height: 1920,
            header_px: 350,
            line_ink: Rgba([0, 0, 0, 255]),
            line_width: 2,
            appointment_spacing_px: 5,
            appointment_padding_px: 8,
            day_spacing_px: 5,
            number_size: 60.0,
            font_size: 12.0,
            font_path: None,
            first_weekday: Weekday::Mon,
            render_grid: true,
            draw_background: true,
            today_fill: Rgba([255, 0, 0, 255]),
            today_ink: Rgba([255, 255, 255, 255]),
            weekend_ink: Rgba([255, 0, 0, 255]),
            background_fill: Rgba([125, 125, 255, 255]),
            background_outline: Rgba([70, 70, 125, 255]),
        }
    }
}

impl RenderConfig {
    /// Load the user config file if present, otherwise defaults. Invalid
    /// values in the file are ignored, not fatal.
    pub fn load() -> Self {
        config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|content| toml::from_str::<FileConfig>(&content).ok())
            .map(FileConfig::into_config)
            .unwrap_or_default()
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("calendar-image").join("config.toml"))
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    month: Option<u32>,
    year: Option<i32>,
    width: Option<i32>,
    height: Option<i32>,
    header_px: Option<i32>,
    line_ink: Option<String>,
    line_width: Option<u32>,
    appointment_spacing_px: Option<i32>,
    appointment_padding_px: Option<i32>,
    day_spacing_px: Option<i32>,
    number_size: Option<f32>,
    font_size: Option<f32>,
    font_path: Option<PathBuf>,
    first_weekday: Option<String>,
    render_grid: Option<bool>,
    draw_background: Option<bool>,
    today_fill: Option<String>,
    today_ink: Option<String>,
    weekend_ink: Option<String>,
    background_fill: Option<String>,
    background_outline: Option<String>,
}

impl FileConfig {
    fn into_config(self) -> RenderConfig {
        let mut config = RenderConfig::default();

        if let Some(m) = self.month.filter(|m| (1..=12).contains(m)) {
            config.month = m;
        }
        if let Some(y) = self.year {
            config.year = y;
        }
        if let Some(w) = self.width.filter(|w| *w > 0) {
            config.width = w;
        }
        if let Some(h) = self.height.filter(|h| *h > 0) {
            config.height = h;
        }
        if let Some(h) = self.header_px.filter(|h| *h >= 0) {
            config.header_px = h;
        }
        if let Some(c) = self.line_ink.as_deref().and_then(parse_color) {
            config.line_ink = c;
        }
        if let Some(w) = self.line_width {
            config.line_width = w;
        }
        if let Some(s) = self.appointment_spacing_px {
            config.appointment_spacing_px = s;
        }
        if let Some(p) = self.appointment_padding_px {
            config.appointment_padding_px = p;
        }
        if let Some(s) = self.day_spacing_px {
            config.day_spacing_px = s;
        }
        if let Some(s) = self.number_size.filter(|s| *s > 0.0) {
            config.number_size = s;
        }
        if let Some(s) = self.font_size.filter(|s| *s > 0.0) {
            config.font_size = s;
        }
        if let Some(p) = self.font_path {
            config.font_path = Some(p);
        }
        if let Some(w) = self.first_weekday.as_deref().and_then(parse_weekday) {
            config.first_weekday = w;
        }
        if let Some(r) = self.render_grid {
            config.render_grid = r;
        }
        if let Some(b) = self.draw_background {
            config.draw_background = b;
        }
        if let Some(c) = self.today_fill.as_deref().and_then(parse_color) {
            config.today_fill = c;
        }
        if let Some(c) = self.today_ink.as_deref().and_then(parse_color) {
            config.today_ink = c;
        }
        if let Some(c) = self.weekend_ink.as_deref().and_then(parse_color) {
            config.weekend_ink = c;
        }
        if let Some(c) = self.background_fill.as_deref().and_then(parse_color) {
            config.background_fill = c;
        }
        if let Some(c) = self.background_outline.as_deref().and_then(parse_color) {
            config.background_outline = c;
        }

        config
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Rgba<u8>> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(&s[1..3], 16).ok()?;
        let g = u8::from_str_radix(&s[3..5], 16).ok()?;
        let b = u8::from_str_radix(&s[5..7], 16).ok()?;
        return Some(Rgba([r, g, b, 255]));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Rgba([0, 0, 0, 255])),
        "red" => Some(Rgba([255, 0, 0, 255])),
        "green" => Some(Rgba([0, 128, 0, 255])),
        "yellow" => Some(Rgba([255, 255, 0, 255])),
        "blue" => Some(Rgba([0, 0, 255, 255])),
        "magenta" => Some(Rgba([255, 0, 255, 255])),
        "cyan" => Some(Rgba([0, 255, 255, 255])),
        "white" => Some(Rgba([255, 255, 255, 255])),
        "gray" | "grey" => Some(Rgba([128, 128, 128, 255])),
        _ => None,
    }
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}
