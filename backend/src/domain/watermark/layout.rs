//! Geometry of the watermark overlay.
//!
//! Coordinates are signed: labels wider than the image produce negative
//! origins, and drawing clips them to the canvas.

use std::ops::Range;

/// Smallest font size used for any image.
pub const MIN_FONT_SIZE: u32 = 20;
/// Gap between the bottom of the text and the bottom edge of the image.
pub const BOTTOM_MARGIN: i64 = 20;
/// Padding between the text and the edge of the shaded box.
pub const BOX_PADDING: i64 = 10;

/// Font size for an image of `height` pixels: 4% of the height, at least
/// [`MIN_FONT_SIZE`].
///
/// # Examples
/// ```
/// use babygen::domain::watermark::font_size;
///
/// assert_eq!(font_size(100), 20);
/// assert_eq!(font_size(1024), 40);
/// ```
pub fn font_size(height: u32) -> u32 {
    let scaled = u64::from(height) * 4 / 100;
    u32::try_from(scaled)
        .unwrap_or(u32::MAX)
        .max(MIN_FONT_SIZE)
}

/// Placement of the label and its backing box.
///
/// Box edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    /// Left edge of the text.
    pub text_x: i64,
    /// Top edge of the text.
    pub text_y: i64,
    /// Left edge of the shaded box.
    pub box_left: i64,
    /// Top edge of the shaded box.
    pub box_top: i64,
    /// Right edge of the shaded box.
    pub box_right: i64,
    /// Bottom edge of the shaded box.
    pub box_bottom: i64,
}

/// Centre a `text_width` x `text_height` label horizontally and anchor it
/// [`BOTTOM_MARGIN`] pixels above the bottom edge.
pub fn overlay_layout(
    width: u32,
    height: u32,
    text_width: u32,
    text_height: u32,
) -> OverlayLayout {
    let text_width = i64::from(text_width);
    let text_height = i64::from(text_height);
    let text_x = (i64::from(width) - text_width).div_euclid(2);
    let text_y = i64::from(height) - text_height - BOTTOM_MARGIN;
    OverlayLayout {
        text_x,
        text_y,
        box_left: text_x - BOX_PADDING,
        box_top: text_y - BOX_PADDING,
        box_right: text_x + text_width + BOX_PADDING,
        box_bottom: text_y + text_height + BOX_PADDING,
    }
}

/// Label columns that land on a canvas `canvas_width` pixels wide.
///
/// Only these columns are rasterised, so the glyph mask never outgrows the
/// canvas however long the label is.
///
/// # Examples
/// ```
/// use babygen::domain::watermark::{overlay_layout, visible_columns};
///
/// let layout = overlay_layout(100, 100, 300, 20);
/// assert_eq!(visible_columns(&layout, 300, 100), 100..200);
/// ```
pub fn visible_columns(layout: &OverlayLayout, text_width: u32, canvas_width: u32) -> Range<u32> {
    let text_width_i = i64::from(text_width);
    let start = (-layout.text_x).clamp(0, text_width_i);
    let end = (i64::from(canvas_width) - layout.text_x).clamp(start, text_width_i);
    let start = u32::try_from(start).unwrap_or(text_width);
    let end = u32::try_from(end).unwrap_or(text_width);
    start..end
}
