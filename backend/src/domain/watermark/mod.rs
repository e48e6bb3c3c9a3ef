//! Watermark compositor.
//!
//! Burns a `"{name} - {age}"` label onto a base64 image: the label is centred
//! near the bottom edge over a translucent dark box and the result is
//! re-encoded as JPEG. Compositing is best effort. [`WatermarkCompositor::apply`]
//! reports a narrowed [`WatermarkError`], while
//! [`WatermarkCompositor::apply_or_original`] swallows it and hands back the
//! caller's payload untouched.

mod glyphs;
mod layout;

use ab_glyph::FontArc;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, RgbImage};
use tracing::{debug, warn};

use self::glyphs::GlyphSet;
pub use self::layout::{
    BOTTOM_MARGIN, BOX_PADDING, MIN_FONT_SIZE, OverlayLayout, font_size, overlay_layout,
    visible_columns,
};
use super::ports::WatermarkedImage;

/// JPEG quality of composited output.
pub const JPEG_QUALITY: u8 = 95;
/// Font looked up when no other path is configured.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

const BOX_SHADE: [u8; 3] = [0, 0, 0];
const BOX_ALPHA: u16 = 180;
const TEXT_COLOUR: [u8; 3] = [255, 255, 255];

/// Narrowed compositing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatermarkError {
    /// The payload was not base64 or not a decodable image.
    #[error("failed to decode image: {message}")]
    Decode {
        /// Decoder message.
        message: String,
    },
    /// The scalable font could not be parsed.
    #[error("failed to load font: {message}")]
    FontLoad {
        /// Parser message.
        message: String,
    },
    /// The composited raster could not be encoded.
    #[error("failed to encode image: {message}")]
    Encode {
        /// Encoder message.
        message: String,
    },
}

/// Format the watermark label.
///
/// # Examples
/// ```
/// use babygen::domain::watermark::watermark_label;
///
/// assert_eq!(watermark_label("Emma", "Teen"), "Emma - Teen");
/// ```
pub fn watermark_label(name: &str, age: &str) -> String {
    format!("{name} - {age}")
}

/// Composites labels onto images.
#[derive(Clone)]
pub struct WatermarkCompositor {
    glyphs: GlyphSet,
}

impl WatermarkCompositor {
    /// Compositor drawing with the built-in bitmap glyphs.
    pub fn with_bitmap_glyphs() -> Self {
        Self {
            glyphs: GlyphSet::Bitmap,
        }
    }

    /// Compositor drawing with a TrueType/OpenType font.
    pub fn from_font_bytes(bytes: Vec<u8>) -> Result<Self, WatermarkError> {
        let font = FontArc::try_from_vec(bytes).map_err(|err| WatermarkError::FontLoad {
            message: err.to_string(),
        })?;
        Ok(Self {
            glyphs: GlyphSet::Scalable(font),
        })
    }

    /// Use `font_bytes` when present and parseable, otherwise bitmap glyphs.
    pub fn with_fallback(font_bytes: Option<Vec<u8>>) -> Self {
        let Some(bytes) = font_bytes else {
            warn!("no watermark font available; using built-in glyphs");
            return Self::with_bitmap_glyphs();
        };
        Self::from_font_bytes(bytes).unwrap_or_else(|err| {
            warn!(error = %err, "watermark font rejected; using built-in glyphs");
            Self::with_bitmap_glyphs()
        })
    }

    /// Whether a scalable font is in use.
    pub fn has_scalable_font(&self) -> bool {
        matches!(self.glyphs, GlyphSet::Scalable(_))
    }

    /// Composite `label` onto the base64 `payload`, returning a base64 JPEG.
    pub fn apply(&self, payload: &str, label: &str) -> Result<String, WatermarkError> {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|err| WatermarkError::Decode {
                message: err.to_string(),
            })?;
        let mut canvas = image::load_from_memory(&bytes)
            .map_err(|err| WatermarkError::Decode {
                message: err.to_string(),
            })?
            .into_rgb8();

        let (width, height) = canvas.dimensions();
        let size = font_size(height);
        let extent = self.glyphs.measure(label, size);
        let layout = overlay_layout(width, height, extent.width, extent.height);
        let columns = visible_columns(&layout, extent.width, width);
        let origin_x = layout.text_x + i64::from(columns.start);
        let mask = self.glyphs.rasterise(label, size, columns);
        shade_box(&mut canvas, &layout);
        draw_mask(&mut canvas, &mask, origin_x, layout.text_y);

        let encoded = encode_jpeg(&canvas)?;
        debug!(width, height, "watermark composited");
        Ok(STANDARD.encode(encoded))
    }

    /// Like [`Self::apply`], but any failure yields the unmodified payload.
    pub fn apply_or_original(&self, payload: &str, label: &str) -> WatermarkedImage {
        match self.apply(payload, label) {
            Ok(image_base64) => WatermarkedImage {
                image_base64,
                applied: true,
            },
            Err(err) => {
                warn!(error = %err, "watermark skipped; returning original image");
                WatermarkedImage {
                    image_base64: payload.to_owned(),
                    applied: false,
                }
            }
        }
    }
}

impl Default for WatermarkCompositor {
    fn default() -> Self {
        Self::with_bitmap_glyphs()
    }
}

fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>, WatermarkError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|err| WatermarkError::Encode {
            message: err.to_string(),
        })?;
    Ok(out)
}

// Inclusive range of canvas indices covered by [start, end], if any.
fn clip(start: i64, end: i64, limit: u32) -> Option<(u32, u32)> {
    let last = i64::from(limit) - 1;
    let start = start.max(0);
    let end = end.min(last);
    if start > end {
        return None;
    }
    Some((u32::try_from(start).ok()?, u32::try_from(end).ok()?))
}

fn blend(base: u8, overlay: u8, alpha: u16) -> u8 {
    let mixed = (u16::from(base) * (255 - alpha) + u16::from(overlay) * alpha + 127) / 255;
    u8::try_from(mixed).unwrap_or(u8::MAX)
}

fn shade_box(canvas: &mut RgbImage, layout: &OverlayLayout) {
    let (Some((left, right)), Some((top, bottom))) = (
        clip(layout.box_left, layout.box_right, canvas.width()),
        clip(layout.box_top, layout.box_bottom, canvas.height()),
    ) else {
        return;
    };
    for y in top..=bottom {
        for x in left..=right {
            let pixel = canvas.get_pixel_mut(x, y);
            for (channel, shade) in pixel.0.iter_mut().zip(BOX_SHADE) {
                *channel = blend(*channel, shade, BOX_ALPHA);
            }
        }
    }
}

fn draw_mask(canvas: &mut RgbImage, mask: &GrayImage, origin_x: i64, origin_y: i64) {
    for (mx, my, coverage) in mask.enumerate_pixels() {
        let alpha = coverage.0[0];
        if alpha == 0 {
            continue;
        }
        let x = origin_x + i64::from(mx);
        let y = origin_y + i64::from(my);
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            continue;
        };
        if x >= canvas.width() || y >= canvas.height() {
            continue;
        }
        let pixel = canvas.get_pixel_mut(x, y);
        for (channel, colour) in pixel.0.iter_mut().zip(TEXT_COLOUR) {
            *channel = blend(*channel, colour, u16::from(alpha));
        }
    }
}
