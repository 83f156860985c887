//! Tri-state pixel classification of rendered glyph rasters.
//!
//! A rendered glyph is alpha-blended black ink. Classification keeps only two
//! outcomes, foreground ink and background; interior holes are carved out of
//! the background later by the flood filler.

use crate::image::{ImageView, Rect, Rgba};
use crate::util::{HeadTplError, HeadTplResult};

/// Class of one template pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelClass {
    /// Symbol ink.
    Foreground,
    /// Exterior background.
    #[default]
    Background,
    /// Background enclosed by the symbol.
    Hole,
}

/// Dense row-major grid of pixel classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelMap {
    data: Vec<PixelClass>,
    width: usize,
    height: usize,
}

impl PixelMap {
    /// Creates a map where every pixel is `class`.
    pub fn filled(width: usize, height: usize, class: PixelClass) -> HeadTplResult<Self> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or(HeadTplError::InvalidDimensions { width, height })?;
        Ok(Self {
            data: vec![class; len],
            width,
            height,
        })
    }

    /// Builds a map from rows of characters: `#` foreground, `o` hole,
    /// anything else background. Rows must share the same length.
    pub fn from_ascii(rows: &[&str]) -> HeadTplResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut map = Self::filled(width, height, PixelClass::Background)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(HeadTplError::InvalidDimensions {
                    width: row.chars().count(),
                    height,
                });
            }
            for (x, c) in row.chars().enumerate() {
                let class = match c {
                    '#' => PixelClass::Foreground,
                    'o' => PixelClass::Hole,
                    _ => PixelClass::Background,
                };
                map.set(x, y, class);
            }
        }
        Ok(map)
    }

    /// Returns the map width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the map height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Full map bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Returns the class at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<PixelClass> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Returns true if `(x, y)` is in bounds and holds `class`.
    pub fn is(&self, x: usize, y: usize, class: PixelClass) -> bool {
        self.get(x, y) == Some(class)
    }

    /// Overwrites the class at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, class: PixelClass) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = class;
        }
    }

    /// Returns the row-major class buffer.
    pub fn as_slice(&self) -> &[PixelClass] {
        &self.data
    }

    /// Returns a row-major mask that is true on foreground pixels.
    pub fn foreground_mask(&self) -> Vec<bool> {
        self.data
            .iter()
            .map(|&class| class == PixelClass::Foreground)
            .collect()
    }

    /// Counts pixels holding `class`.
    pub fn count(&self, class: PixelClass) -> usize {
        self.data.iter().filter(|&&c| c == class).count()
    }

    /// Counts foreground pixels in column `x`.
    pub(crate) fn column_foreground(&self, x: usize) -> usize {
        (0..self.height)
            .filter(|&y| self.data[y * self.width + x] == PixelClass::Foreground)
            .count()
    }

    /// Counts foreground pixels in row `y`.
    pub(crate) fn row_foreground(&self, y: usize) -> usize {
        let start = y * self.width;
        self.data[start..start + self.width]
            .iter()
            .filter(|&&c| c == PixelClass::Foreground)
            .count()
    }
}

/// Classifies every pixel of a rendered glyph.
///
/// A pixel with `alpha < threshold` is background. Otherwise its red channel
/// decides: `red >= threshold` is background, anything darker is foreground.
/// Hole pixels are never produced here.
pub fn binarize(src: ImageView<'_, Rgba>, threshold: u8) -> PixelMap {
    let width = src.width();
    let height = src.height();
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = src.row(y).expect("row within view bounds");
        data.extend(row.iter().map(|pix| classify_pixel(*pix, threshold)));
    }
    PixelMap {
        data,
        width,
        height,
    }
}

#[inline]
fn classify_pixel(pix: Rgba, threshold: u8) -> PixelClass {
    if pix.a < threshold || pix.r >= threshold {
        PixelClass::Background
    } else {
        PixelClass::Foreground
    }
}
