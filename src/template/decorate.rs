//! Magnified diagnostic rendering of a built template.
//!
//! Each template pixel becomes a `zoom x zoom` cell inside a one-cell gray
//! frame. Ink is black, holes pink, plain background white. Key points with a
//! non-zero distance get a cell outline whose shade follows the distance,
//! blue outside the symbol and red inside holes. Slim bounds and anchors are
//! drawn in green.

use super::Template;
use crate::classify::{PixelClass, PixelMap};
use crate::util::{HeadTplError, HeadTplResult};

const FRAME: [u8; 3] = [128, 128, 128];
const INK: [u8; 3] = [0, 0, 0];
const HOLE: [u8; 3] = [255, 175, 175];
const PAPER: [u8; 3] = [255, 255, 255];
const MARK: [u8; 3] = [0, 200, 0];

/// Owned RGB8 image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl DecoratedImage {
    fn filled(width: usize, height: usize, color: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&color);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// RGB value at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    fn put(&mut self, x: usize, y: usize, color: [u8; 3]) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 3;
            self.data[idx..idx + 3].copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: [u8; 3]) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.put(xx, yy, color);
            }
        }
    }

    fn outline(&mut self, x: usize, y: usize, w: usize, h: usize, thickness: usize, color: [u8; 3]) {
        if w == 0 || h == 0 {
            return;
        }
        let t = thickness.min(w).min(h);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y, t, h, color);
        self.fill_rect(x + w - t, y, t, h, color);
    }
}

/// Draws `template` over its pixel classes, magnified by `zoom`.
pub fn decorate(template: &Template, classes: &PixelMap, zoom: usize) -> HeadTplResult<DecoratedImage> {
    if zoom == 0 {
        return Err(HeadTplError::InvalidConfig {
            reason: "zoom must be > 0",
        });
    }
    if classes.width() != template.width() || classes.height() != template.height() {
        return Err(HeadTplError::InvalidDimensions {
            width: classes.width(),
            height: classes.height(),
        });
    }

    let width = template.width();
    let height = template.height();
    let mut img = DecoratedImage::filled((width + 2) * zoom, (height + 2) * zoom, FRAME);

    for y in 0..height {
        for x in 0..width {
            let color = match classes.get(x, y).unwrap_or_default() {
                PixelClass::Foreground => INK,
                PixelClass::Hole => HOLE,
                PixelClass::Background => PAPER,
            };
            img.fill_rect((x + 1) * zoom, (y + 1) * zoom, zoom, zoom, color);
        }
    }

    if let Some(points) = template.key_points() {
        let max = points
            .iter()
            .map(|kp| kp.distance.unsigned_abs())
            .max()
            .unwrap_or(0)
            .max(1);
        for kp in points.iter().filter(|kp| kp.distance != 0) {
            let shade = (200 * kp.distance.unsigned_abs() / max) as u8;
            let color = if kp.distance > 0 {
                [shade, shade, 255]
            } else {
                [255, shade, shade]
            };
            img.outline((kp.x + 1) * zoom, (kp.y + 1) * zoom, zoom, zoom, 1, color);
        }
    }

    let slim = template.slim_bounds();
    let thickness = (zoom / 8).max(1);
    img.outline(
        (slim.x + 1) * zoom,
        (slim.y + 1) * zoom,
        slim.width * zoom,
        slim.height * zoom,
        thickness,
        MARK,
    );

    let radius = (zoom * 3 / 8).max(1);
    for offset in template.anchors().values() {
        let cx = ((offset.x + 1.0) * zoom as f64).round().max(0.0) as usize;
        let cy = ((offset.y + 1.0) * zoom as f64).round().max(0.0) as usize;
        img.fill_rect(
            cx.saturating_sub(radius),
            cy.saturating_sub(radius),
            2 * radius,
            2 * radius,
            MARK,
        );
    }

    Ok(img)
}
