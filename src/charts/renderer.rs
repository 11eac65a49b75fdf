//! Static Chart Renderer
//! Rasterises a bar chart to PNG.
//!
//! Layout:
//! 1. White background; top margin holds value labels, bottom margin holds category labels
//! 2. Light grid lines at quarters of the maximum value
//! 3. One filled bar per category, evenly spaced, scaled to the maximum
//! 4. Total above each bar, category name centered below it
//! 5. Black axis lines on the left and bottom

use crate::charts::ChartData;
use ab_glyph::{FontRef, PxScale};
use image::{ImageBuffer, ImageError, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::io::Cursor;
use thiserror::Error;

// Colors (RGBA)
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GRAY: Rgba<u8> = Rgba([220, 220, 220, 255]); // Grid lines
const TEXT: Rgba<u8> = Rgba([40, 40, 40, 255]);

const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
const LABEL_SIZE: f32 = 14.0;

const MARGIN_X: u32 = 20;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 30;
/// Gap between a bar and its labels.
const LABEL_GAP: i32 = 4;
/// Fraction of each slot covered by its bar.
const BAR_FILL: f64 = 0.6;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Image too small: {width}x{height}")]
    TooSmall { width: u32, height: u32 },
    #[error("Failed to load label font")]
    Font,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] ImageError),
}

/// Pixel rectangle of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BarRect {
    pub fn center_x(&self) -> i32 {
        (self.x + self.width / 2) as i32
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Compute bar rectangles for a `width` x `height` canvas.
    pub fn layout(data: &ChartData, width: u32, height: u32) -> Result<Vec<BarRect>, ChartError> {
        if width <= 2 * MARGIN_X + 1 || height <= MARGIN_TOP + MARGIN_BOTTOM + 1 {
            return Err(ChartError::TooSmall { width, height });
        }

        let plot_w = width - 2 * MARGIN_X;
        let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = height - MARGIN_BOTTOM;
        let max = data.max_value();

        if data.bars.is_empty() {
            return Ok(Vec::new());
        }

        let slot = plot_w as f64 / data.bars.len() as f64;
        let bar_w = ((slot * BAR_FILL).floor() as u32).max(1);

        let rects = data
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let h = if max == 0 {
                    0
                } else {
                    ((bar.value as f64 / max as f64) * plot_h as f64).round() as u32
                };
                let center = MARGIN_X as f64 + slot * (i as f64 + 0.5);
                BarRect {
                    x: (center - bar_w as f64 / 2.0).round() as u32,
                    y: baseline - h,
                    width: bar_w,
                    height: h,
                }
            })
            .collect();

        Ok(rects)
    }

    pub fn render(data: &ChartData, width: u32, height: u32) -> Result<RgbaImage, ChartError> {
        let rects = Self::layout(data, width, height)?;
        let font = FontRef::try_from_slice(FONT_DATA).map_err(|_| ChartError::Font)?;
        let scale = PxScale::from(LABEL_SIZE);
        let mut img = ImageBuffer::from_pixel(width, height, WHITE);

        let left = MARGIN_X as f32;
        let right = (width - MARGIN_X) as f32;
        let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = height - MARGIN_BOTTOM;

        // Grid
        for q in 1..=4 {
            let y = (baseline - plot_h * q / 4) as f32;
            draw_line_segment_mut(&mut img, (left, y), (right, y), GRAY);
        }

        for (rect, bar) in rects.iter().zip(&data.bars) {
            let [r, g, b] = bar.color;
            if rect.height > 0 {
                draw_filled_rect_mut(
                    &mut img,
                    Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height),
                    Rgba([r, g, b, 255]),
                );
            }

            let value = bar.value.to_string();
            let (value_w, value_h) = text_size(scale, &font, &value);
            draw_text_mut(
                &mut img,
                TEXT,
                rect.center_x() - value_w as i32 / 2,
                rect.y as i32 - value_h as i32 - LABEL_GAP,
                scale,
                &font,
                &value,
            );

            let (label_w, _) = text_size(scale, &font, &bar.label);
            draw_text_mut(
                &mut img,
                TEXT,
                rect.center_x() - label_w as i32 / 2,
                baseline as i32 + LABEL_GAP,
                scale,
                &font,
                &bar.label,
            );
        }

        // Axes
        let base = baseline as f32;
        draw_line_segment_mut(&mut img, (left, MARGIN_TOP as f32), (left, base), BLACK);
        draw_line_segment_mut(&mut img, (left, base), (right, base), BLACK);

        Ok(img)
    }

    /// Render and encode as PNG.
    pub fn render_png(data: &ChartData, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
        let img = Self::render(data, width, height)?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
