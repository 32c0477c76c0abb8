//! A loaded calendar event: its span, predicates, and label drawing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::{Box, Resize};
use crate::grid::Grid;
use crate::surface::{Surface, TextMeasure};

const ELLIPSIS: char = '\u{2026}';
const BACKGROUND_MARGIN_PX: i32 = 5;
const BACKGROUND_RADIUS_PX: i32 = 8;

/// One event as the calendar source hands it over. Either stamp form may
/// be present; `dateTime` wins over `date`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub start: Option<RawStamp>,
    pub end: Option<RawStamp>,
    pub summary: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStamp {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl RawStamp {
    fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

/// A validated event. Immutable once loaded; identity is the source id.
#[derive(Debug, Clone)]
pub struct Appointment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub id: String,
    pub summary: String,
}

impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Appointment {}

impl std::hash::Hash for Appointment {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Appointment {
    /// Validate and convert one raw record. Any missing field makes the
    /// record unusable.
    pub fn load(record: &RawEvent) -> Result<Self> {
        let start = record
            .start
            .as_ref()
            .and_then(RawStamp::value)
            .ok_or(Error::MissingField("start"))?;
        let end = record
            .end
            .as_ref()
            .and_then(RawStamp::value)
            .ok_or(Error::MissingField("end"))?;
        let start = parse_stamp(start)?;
        let end = parse_stamp(end)?;
        let summary = record.summary.clone().ok_or(Error::MissingField("summary"))?;
        let id = record.id.clone().ok_or(Error::MissingField("id"))?;
        if end < start {
            return Err(Error::EndBeforeStart(id));
        }
        Ok(Self {
            start,
            end,
            id,
            summary,
        })
    }

    /// Inclusive count of the calendar days the event is drawn across.
    pub fn span_days(&self) -> u32 {
        let days = (self.end.date_naive() - self.start.date_naive()).num_days();
        if days > 1 {
            days as u32 + 1
        } else {
            1
        }
    }

    pub fn is_multi_day(&self) -> bool {
        self.span_days() > 1
    }

    /// Active at `instant`'s day: inside the [start, end) range, or on the
    /// start date itself. The date clause keeps midnight probes matching
    /// all-day events whose range is empty at that instant.
    pub fn on_day(&self, instant: DateTime<Utc>) -> bool {
        (self.start <= instant && instant < self.end)
            || instant.date_naive() == self.start.date_naive()
    }

    /// The label, shortened until it fits `available` pixels. A leading
    /// `HH:MM ` is added unless the event starts at midnight. Empty when
    /// even a bare ellipsis is too wide.
    pub fn fit_label(&self, available: i32, measure: &impl TextMeasure, px: f32) -> String {
        let label = if self.start.time() == NaiveTime::MIN {
            self.summary.clone()
        } else {
            format!("{} {}", self.start.format("%H:%M"), self.summary)
        };
        let full_width = measure.text_width(&label, px);
        if full_width <= available {
            return label;
        }
        let chars: Vec<char> = label.chars().collect();
        let ratio = available.max(0) as f32 / full_width as f32;
        let longest = (chars.len() as f32 * ratio) as usize;
        for take in (0..=longest).rev() {
            let mut candidate: String = chars[..take].iter().collect();
            candidate.push(ELLIPSIS);
            if measure.text_width(&candidate, px) <= available {
                return candidate;
            }
        }
        String::new()
    }

    /// Draw the label (and its background) into the cell of `for_day`,
    /// `offset_y` pixels below the cell top. Returns the vertical extent
    /// consumed, so the caller can stack the next label beneath it.
    pub fn draw(
        &self,
        config: &RenderConfig,
        grid: &Grid,
        surface: &mut Surface,
        offset_y: i32,
        for_day: Option<u32>,
    ) -> Result<i32> {
        let day = for_day.unwrap_or(self.start.day());
        let coords = grid.coords_for_day(day, self.span_days())?;
        let available =
            self.span_days() as i32 * (grid.cell_width() - 2 * config.appointment_padding_px);
        let label = self.fit_label(available, surface, config.font_size);
        if label.is_empty() {
            // unlabelable; keeps its slot but renders nothing
            return Ok(0);
        }
        let (x0, y0, x1, y1) = surface.text_bbox(&label, config.font_size);
        let Ok(mut text_box) = Box::from_corners(x0, y0, x1, y1) else {
            return Ok(0);
        };
        let anchor = coords.start() + (config.appointment_padding_px, offset_y);
        text_box.anchor_to(anchor);
        let mut consumed = text_box.height();
        if config.draw_background {
            let mut background = text_box.clone();
            background.resize(Resize::Uniform(BACKGROUND_MARGIN_PX))?;
            surface.draw_rounded_rect(
                &background,
                BACKGROUND_RADIUS_PX,
                config.background_fill,
                config.background_outline,
            );
            consumed = background.height();
        }
        surface.draw_text(anchor, &label, config.line_ink, config.font_size);
        Ok(consumed)
    }
}

fn parse_stamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim_end_matches('Z');
    let naive = if trimmed.contains('T') {
        trimmed.parse::<NaiveDateTime>()
    } else {
        trimmed
            .parse::<NaiveDate>()
            .map(|date| date.and_time(NaiveTime::MIN))
    };
    naive.map(|n| n.and_utc()).map_err(|source| Error::Timestamp {
        value: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    fn raw(json: &str) -> RawEvent {
        serde_json::from_str(json).expect("valid record json")
    }

    fn appointment(start: &str, end: &str, id: &str) -> Appointment {
        Appointment {
            start: parse_stamp(start).unwrap(),
            end: parse_stamp(end).unwrap(),
            id: id.to_string(),
            summary: "Example event".to_string(),
        }
    }

    /// Fixed-metric measurer: every char is `width` pixels wide.
    struct CharWidth(i32);

    impl TextMeasure for CharWidth {
        fn text_width(&self, text: &str, _px: f32) -> i32 {
            self.0 * text.chars().count() as i32
        }

        fn text_bbox(&self, text: &str, px: f32) -> (i32, i32, i32, i32) {
            let w = self.text_width(text, px);
            if w == 0 {
                (0, 0, 0, 0)
            } else {
                (0, 0, w, px as i32)
            }
        }
    }

    #[test]
    fn test_load_accepts_date_and_datetime_forms() {
        let loaded = Appointment::load(&raw(
            r#"{"start": {"date": "2023-12-06"},
                "end": {"dateTime": "2023-12-07T06:09:23Z"},
                "summary": "Example event", "id": "hash1234"}"#,
        ))
        .unwrap();
        assert_eq!(loaded.start, Utc.with_ymd_and_hms(2023, 12, 6, 0, 0, 0).unwrap());
        assert_eq!(loaded.end, Utc.with_ymd_and_hms(2023, 12, 7, 6, 9, 23).unwrap());
        assert_eq!(loaded.summary, "Example event");
        assert_eq!(loaded.id, "hash1234");
    }

    #[test]
    fn test_load_prefers_datetime_over_date() {
        let loaded = Appointment::load(&raw(
            r#"{"start": {"date": "2023-12-01", "dateTime": "2023-12-06T10:30:00Z"},
                "end": {"date": "2023-12-07"},
                "summary": "Example event", "id": "a"}"#,
        ))
        .unwrap();
        assert_eq!(loaded.start, Utc.with_ymd_and_hms(2023, 12, 6, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_load_missing_id_fails() {
        let err = Appointment::load(&raw(
            r#"{"start": {"date": "2023-12-06"}, "end": {"date": "2023-12-07"},
                "summary": "Example event"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::MissingField("id")));
    }

    #[test]
    fn test_load_empty_stamp_counts_as_missing() {
        let err = Appointment::load(&raw(
            r#"{"start": {}, "end": {"date": "2023-12-07"},
                "summary": "Example event", "id": "a"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::MissingField("start")));
    }

    #[test]
    fn test_load_rejects_end_before_start() {
        let err = Appointment::load(&raw(
            r#"{"start": {"date": "2023-12-07"}, "end": {"date": "2023-12-06"},
                "summary": "Example event", "id": "a"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::EndBeforeStart(_)));
    }

    #[test]
    fn test_span_is_inclusive_for_multi_day_events() {
        let multi = appointment("2023-12-06", "2023-12-08", "a");
        assert_eq!(multi.span_days(), 3);
        assert!(multi.is_multi_day());
    }

    #[test]
    fn test_span_of_short_events_is_one() {
        let timed = appointment("2023-12-06T10:00:00", "2023-12-06T11:00:00", "a");
        assert_eq!(timed.span_days(), 1);
        assert!(!timed.is_multi_day());
        // exactly one day apart still renders in a single cell
        let overnight = appointment("2023-12-06", "2023-12-07T06:09:23", "b");
        assert_eq!(overnight.span_days(), 1);
    }

    #[test]
    fn test_on_day_includes_the_start_midnight() {
        let all_day = appointment("2023-12-06T00:00:00", "2023-12-07T00:00:00", "a");
        let midnight = Utc.with_ymd_and_hms(2023, 12, 6, 0, 0, 0).unwrap();
        assert!(all_day.on_day(midnight));
    }

    #[test]
    fn test_on_day_excludes_the_end_instant() {
        let all_day = appointment("2023-12-06T00:00:00", "2023-12-07T00:00:00", "a");
        let next_midnight = Utc.with_ymd_and_hms(2023, 12, 7, 0, 0, 0).unwrap();
        assert!(!all_day.on_day(next_midnight));
    }

    #[test]
    fn test_on_day_matches_start_date_for_later_instants() {
        // the timed range ended before the probe, but the date matches
        let timed = appointment("2023-12-06T08:00:00", "2023-12-06T09:00:00", "a");
        let midnight = Utc.with_ymd_and_hms(2023, 12, 6, 0, 0, 0).unwrap();
        assert!(timed.on_day(midnight));
    }

    #[test]
    fn test_identity_is_the_id_alone() {
        let mut a = appointment("2023-12-06", "2023-12-08", "same");
        let b = appointment("2023-12-20", "2023-12-21", "same");
        a.summary = "completely different".to_string();
        assert_eq!(a, b);
        let set: HashSet<Appointment> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_fit_label_keeps_text_that_fits() {
        let all_day = appointment("2023-12-06", "2023-12-08", "a");
        let label = all_day.fit_label(200, &CharWidth(10), 12.0);
        assert_eq!(label, "Example event");
    }

    #[test]
    fn test_fit_label_prefixes_the_start_time() {
        let timed = appointment("2023-12-06T06:09:23", "2023-12-06T07:00:00", "a");
        let label = timed.fit_label(500, &CharWidth(10), 12.0);
        assert_eq!(label, "06:09 Example event");
    }

    #[test]
    fn test_fit_label_truncates_to_the_longest_fit() {
        let all_day = appointment("2023-12-06", "2023-12-08", "a");
        // 13 chars at 10px = 130px; 60px leaves room for 5 chars + ellipsis
        let label = all_day.fit_label(60, &CharWidth(10), 12.0);
        assert_eq!(label, "Examp\u{2026}");
    }

    #[test]
    fn test_fit_label_gives_up_with_an_empty_string() {
        let all_day = appointment("2023-12-06", "2023-12-08", "a");
        assert_eq!(all_day.fit_label(5, &CharWidth(10), 12.0), "");
    }

    #[test]
    fn test_fit_label_never_splits_multibyte_chars() {
        let mut all_day = appointment("2023-12-06", "2023-12-08", "a");
        all_day.summary = "Grüße übergeben zur Überraschung".to_string();
        for available in [0, 15, 55, 105, 155] {
            let label = all_day.fit_label(available, &CharWidth(10), 12.0);
            assert!(label.chars().count() as i32 * 10 <= available.max(0) || label.is_empty());
        }
    }
}
