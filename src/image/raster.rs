//! Owned RGBA raster produced by a symbol renderer.

use crate::image::{ImageView, Rect};
use crate::util::{HeadTplError, HeadTplResult};

/// Un-premultiplied RGBA pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent pixel.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    /// Opaque black ink.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    /// Creates a pixel from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Black ink with the given coverage as alpha.
    pub const fn ink(alpha: u8) -> Self {
        Self::new(0, 0, 0, alpha)
    }
}

/// Owned contiguous RGBA raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Creates a fully transparent raster.
    pub fn new(width: usize, height: usize) -> HeadTplResult<Self> {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Creates a raster with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: Rgba) -> HeadTplResult<Self> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or(HeadTplError::InvalidDimensions { width, height })?;
        Ok(Self {
            data: vec![value; len],
            width,
            height,
        })
    }

    /// Wraps a row-major pixel buffer of exactly `width * height` pixels.
    pub fn from_vec(data: Vec<Rgba>, width: usize, height: usize) -> HeadTplResult<Self> {
        let needed = crate::image::required_len(width, height, width)?;
        if data.len() != needed {
            return Err(HeadTplError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Full raster bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[Rgba] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Overwrites the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: Rgba) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Returns a borrowed view of the raster.
    pub fn view(&self) -> ImageView<'_, Rgba> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}
