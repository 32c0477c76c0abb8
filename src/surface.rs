//! The raster surface: an RGBA canvas, draw primitives, and text metrics.

use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_ellipse_mut, draw_filled_rect_mut, draw_line_segment_mut,
    draw_text_mut,
};
use imageproc::rect::Rect;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::{Box, Point};

/// Well-known font locations tried when the config does not name one.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Pixel measurement of rendered text at a font size.
///
/// Offsets are relative to the top-left anchor `draw_text` uses; text with
/// no ink (empty or all-whitespace) measures as all zeros.
pub trait TextMeasure {
    /// Advance width in pixels.
    fn text_width(&self, text: &str, px: f32) -> i32;
    /// Ink bounds as (x0, y0, x1, y1).
    fn text_bbox(&self, text: &str, px: f32) -> (i32, i32, i32, i32);
}

pub struct Surface {
    img: RgbaImage,
    font: FontVec,
}

impl Surface {
    /// A white canvas of the configured size with the session font loaded.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let img = RgbaImage::from_pixel(
            config.width.max(1) as u32,
            config.height.max(1) as u32,
            Rgba([255, 255, 255, 255]),
        );
        let font = load_font(config.font_path.as_deref())?;
        Ok(Self { img, font })
    }

    /// Axis-aligned lines honor `width`; anything else degrades to a
    /// single-pixel segment.
    pub fn draw_line(&mut self, from: Point, to: Point, ink: Rgba<u8>, width: u32) {
        let width = width.max(1) as i32;
        if from.y == to.y {
            let x0 = from.x.min(to.x);
            let len = (to.x - from.x).unsigned_abs() + 1;
            let rect = Rect::at(x0, from.y - width / 2).of_size(len, width as u32);
            draw_filled_rect_mut(&mut self.img, rect, ink);
        } else if from.x == to.x {
            let y0 = from.y.min(to.y);
            let len = (to.y - from.y).unsigned_abs() + 1;
            let rect = Rect::at(from.x - width / 2, y0).of_size(width as u32, len);
            draw_filled_rect_mut(&mut self.img, rect, ink);
        } else {
            draw_line_segment_mut(
                &mut self.img,
                (from.x as f32, from.y as f32),
                (to.x as f32, to.y as f32),
                ink,
            );
        }
    }

    pub fn draw_rounded_rect(&mut self, bx: &Box, radius: i32, fill: Rgba<u8>, outline: Rgba<u8>) {
        self.fill_rounded(bx.as_tuple(), radius, outline);
        let (x0, y0, x1, y1) = bx.as_tuple();
        if x1 - x0 > 2 && y1 - y0 > 2 {
            self.fill_rounded((x0 + 1, y0 + 1, x1 - 1, y1 - 1), (radius - 1).max(0), fill);
        }
    }

    fn fill_rounded(&mut self, (x0, y0, x1, y1): (i32, i32, i32, i32), radius: i32, color: Rgba<u8>) {
        let w = x1 - x0;
        let h = y1 - y0;
        if w <= 0 || h <= 0 {
            return;
        }
        let r = radius.clamp(0, w.min(h) / 2);
        if r == 0 {
            draw_filled_rect_mut(&mut self.img, Rect::at(x0, y0).of_size(w as u32, h as u32), color);
            return;
        }
        if w - 2 * r > 0 {
            let band = Rect::at(x0 + r, y0).of_size((w - 2 * r) as u32, h as u32);
            draw_filled_rect_mut(&mut self.img, band, color);
        }
        if h - 2 * r > 0 {
            let band = Rect::at(x0, y0 + r).of_size(w as u32, (h - 2 * r) as u32);
            draw_filled_rect_mut(&mut self.img, band, color);
        }
        for (cx, cy) in [
            (x0 + r, y0 + r),
            (x1 - r, y0 + r),
            (x0 + r, y1 - r),
            (x1 - r, y1 - r),
        ] {
            draw_filled_circle_mut(&mut self.img, (cx, cy), r, color);
        }
    }

    pub fn draw_ellipse(&mut self, bx: &Box, fill: Rgba<u8>) {
        let mid = bx.midpoint();
        draw_filled_ellipse_mut(
            &mut self.img,
            (mid.x, mid.y),
            bx.width() / 2,
            bx.height() / 2,
            fill,
        );
    }

    pub fn draw_text(&mut self, at: Point, text: &str, ink: Rgba<u8>, px: f32) {
        draw_text_mut(
            &mut self.img,
            ink,
            at.x,
            at.y,
            PxScale::from(px),
            &self.font,
            text,
        );
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.img.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

impl TextMeasure for Surface {
    fn text_width(&self, text: &str, px: f32) -> i32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut caret = 0.0f32;
        let mut last: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.font().glyph_id(c);
            if let Some(prev) = last {
                caret += scaled.kern(prev, id);
            }
            caret += scaled.h_advance(id);
            last = Some(id);
        }
        caret.ceil() as i32
    }

    fn text_bbox(&self, text: &str, px: f32) -> (i32, i32, i32, i32) {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let ascent = scaled.ascent();
        let mut caret = 0.0f32;
        let mut last: Option<GlyphId> = None;
        let mut bounds: Option<(f32, f32, f32, f32)> = None;
        for c in text.chars() {
            let mut glyph = scaled.scaled_glyph(c);
            if let Some(prev) = last {
                caret += scaled.kern(prev, glyph.id);
            }
            last = Some(glyph.id);
            glyph.position = point(caret, ascent);
            caret += scaled.h_advance(glyph.id);
            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let px_bounds = outlined.px_bounds();
                let (x0, y0, x1, y1) =
                    bounds.unwrap_or((f32::MAX, f32::MAX, f32::MIN, f32::MIN));
                bounds = Some((
                    x0.min(px_bounds.min.x),
                    y0.min(px_bounds.min.y),
                    x1.max(px_bounds.max.x),
                    y1.max(px_bounds.max.y),
                ));
            }
        }
        match bounds {
            Some((x0, y0, x1, y1)) => (x0 as i32, y0 as i32, x1.ceil() as i32, y1.ceil() as i32),
            None => (0, 0, 0, 0),
        }
    }
}

fn load_font(configured: Option<&Path>) -> Result<FontVec> {
    let candidates = configured
        .into_iter()
        .map(Path::to_path_buf)
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from));
    for path in candidates {
        if let Ok(bytes) = std::fs::read(&path) {
            tracing::debug!(path = %path.display(), "loaded font");
            return Ok(FontVec::try_from_vec(bytes)?);
        }
    }
    Err(Error::FontUnavailable)
}
