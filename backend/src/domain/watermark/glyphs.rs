//! Label rasterisation.
//!
//! Labels are measured first and then rasterised one column window at a
//! time. The mask only ever covers the requested window, so its size is
//! bounded by the canvas and not by the label length.

use std::ops::Range;

use ab_glyph::{Font, FontArc, Glyph, GlyphId, PxScale, Rect, ScaleFont, point};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{GrayImage, Luma};

const BITMAP_CELL: u32 = 8;

/// Source of glyph shapes.
#[derive(Clone)]
pub(super) enum GlyphSet {
    /// Outline font rasterised at the requested pixel size.
    Scalable(FontArc),
    /// Built-in 8x8 bitmap glyphs scaled by an integer factor.
    Bitmap,
}

/// Ink extent of a rendered label in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct LabelExtent {
    pub(super) width: u32,
    pub(super) height: u32,
}

impl GlyphSet {
    /// Measure `label` at roughly `size` pixels tall without rasterising it.
    pub(super) fn measure(&self, label: &str, size: u32) -> LabelExtent {
        match self {
            Self::Scalable(font) => outline_bounds(font, label, px_scale(size))
                .map(extent_of)
                .unwrap_or_default(),
            Self::Bitmap => bitmap_extent(label, size),
        }
    }

    /// Render label columns `columns` into a mask as tall as the label.
    ///
    /// Columns are relative to the left edge of [`Self::measure`]'s extent
    /// and are clamped to it.
    pub(super) fn rasterise(&self, label: &str, size: u32, columns: Range<u32>) -> GrayImage {
        match self {
            Self::Scalable(font) => rasterise_outline(font, label, size, columns),
            Self::Bitmap => rasterise_bitmap(label, size, columns),
        }
    }
}

fn clamp_window(columns: Range<u32>, width: u32) -> Range<u32> {
    let start = columns.start.min(width);
    start..columns.end.clamp(start, width)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "font sizes stay far below the f32 integer limit"
)]
fn px_scale(size: u32) -> PxScale {
    PxScale::from(size as f32)
}

#[expect(clippy::float_arithmetic, reason = "glyph metrics are floating point")]
fn positioned_glyphs<'a>(
    font: &'a FontArc,
    label: &'a str,
    scale: PxScale,
) -> impl Iterator<Item = Glyph> + 'a {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0_f32;
    let mut previous: Option<GlyphId> = None;
    label.chars().map(move |ch| {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(id);
        previous = Some(id);
        glyph
    })
}

// Outlines are dropped as soon as their bounds are read.
fn outline_bounds(font: &FontArc, label: &str, scale: PxScale) -> Option<Rect> {
    positioned_glyphs(font, label, scale)
        .filter_map(|glyph| font.outline_glyph(glyph))
        .map(|outlined| outlined.px_bounds())
        .reduce(union)
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "pixel bounds are whole and non-negative; casts saturate"
)]
fn extent_of(bounds: Rect) -> LabelExtent {
    LabelExtent {
        width: (bounds.max.x - bounds.min.x).ceil() as u32,
        height: (bounds.max.y - bounds.min.y).ceil() as u32,
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "glyph metrics are floating point and pixel offsets are whole"
)]
fn rasterise_outline(font: &FontArc, label: &str, size: u32, columns: Range<u32>) -> GrayImage {
    let scale = px_scale(size);
    let Some(bounds) = outline_bounds(font, label, scale) else {
        return GrayImage::new(0, 0);
    };
    let extent = extent_of(bounds);
    let window = clamp_window(columns, extent.width);
    let mut mask = GrayImage::new(window.end - window.start, extent.height);
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return mask;
    }

    // Ink may overhang the advance box; cull with a one-em margin.
    let scaled = font.as_scaled(scale);
    let left = bounds.min.x + window.start as f32 - scale.x;
    let right = bounds.min.x + window.end as f32 + scale.x;
    for glyph in positioned_glyphs(font, label, scale) {
        let advance_end = glyph.position.x + scaled.h_advance(glyph.id);
        if advance_end < left || glyph.position.x > right {
            continue;
        }
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let glyph_bounds = outlined.px_bounds();
        let offset_x = (glyph_bounds.min.x - bounds.min.x) as i64 - i64::from(window.start);
        let offset_y = (glyph_bounds.min.y - bounds.min.y) as i64;
        outlined.draw(|x, y, coverage| {
            let (Ok(px), Ok(py)) = (
                u32::try_from(offset_x + i64::from(x)),
                u32::try_from(offset_y + i64::from(y)),
            ) else {
                return;
            };
            if px < width && py < height {
                let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                let pixel = mask.get_pixel_mut(px, py);
                pixel.0[0] = pixel.0[0].max(value);
            }
        });
    }
    mask
}

fn union(a: Rect, b: Rect) -> Rect {
    Rect {
        min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    }
}

fn bitmap_cell(size: u32) -> u32 {
    BITMAP_CELL * (size / BITMAP_CELL).max(1)
}

fn bitmap_extent(label: &str, size: u32) -> LabelExtent {
    let cell = bitmap_cell(size);
    let columns = u32::try_from(label.chars().count()).unwrap_or(u32::MAX);
    LabelExtent {
        width: cell.saturating_mul(columns),
        height: cell,
    }
}

fn rasterise_bitmap(label: &str, size: u32, columns: Range<u32>) -> GrayImage {
    let cell = bitmap_cell(size);
    let factor = cell / BITMAP_CELL;
    let window = clamp_window(columns, bitmap_extent(label, size).width);
    let mut mask = GrayImage::new(window.end - window.start, cell);
    if mask.width() == 0 {
        return mask;
    }

    let first = window.start / cell;
    let last = window.end.div_ceil(cell);
    let visible = (0_u32..)
        .zip(label.chars())
        .skip_while(|(column, _)| *column < first)
        .take_while(|(column, _)| *column < last);
    for (column, ch) in visible {
        for (row, bits) in (0_u32..).zip(bitmap_glyph(ch)) {
            for bit in 0..BITMAP_CELL {
                if bits & (1 << bit) == 0 {
                    continue;
                }
                let left = u64::from(column) * u64::from(cell) + u64::from(bit * factor);
                for dx in 0..factor {
                    let Some(x) = u64::from(dx)
                        .checked_add(left)
                        .and_then(|x| x.checked_sub(u64::from(window.start)))
                        .and_then(|x| u32::try_from(x).ok())
                        .filter(|x| *x < mask.width())
                    else {
                        continue;
                    };
                    for dy in 0..factor {
                        mask.put_pixel(x, row * factor + dy, Luma([u8::MAX]));
                    }
                }
            }
        }
    }
    mask
}

fn bitmap_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}
