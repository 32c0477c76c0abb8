//! Error types for the render pipeline.

use thiserror::Error;

use crate::geometry::Point;

#[derive(Error, Debug)]
pub enum Error {
    /// An event record arrived without one of its required fields.
    #[error("event record is missing `{0}`")]
    MissingField(&'static str),

    #[error("could not parse event timestamp `{value}`")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("event `{0}` ends before it starts")]
    EndBeforeStart(String),

    /// Only reachable when a caller passes a day outside the rendered
    /// month; days taken from the grid layout always resolve.
    #[error("day {0} is not part of the month layout")]
    DayNotFound(u32),

    #[error("box corners out of order: start {start}, end {end}")]
    InvertedBox { start: Point, end: Point },

    #[error("nothing to render: load events first")]
    NotLoaded,

    #[error("no usable font found (set `font_path` in the config)")]
    FontUnavailable,

    #[error("font data is not a valid font")]
    InvalidFont(#[from] ab_glyph::InvalidFont),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
