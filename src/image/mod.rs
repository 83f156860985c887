//! Raster views, owned RGBA rasters and integer rectangles.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. Glyph rasters handed
//! over by a renderer are borrowed through this view before classification.

use crate::util::{HeadTplError, HeadTplResult};

#[cfg(feature = "image-io")]
pub mod io;
mod raster;

pub use raster::{Raster, Rgba};

/// Integer rectangle in pixel coordinates, `width`/`height` in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the rectangle spanning the inclusive corners `(x1, y1)`-`(x2, y2)`.
    pub fn from_corners(x1: usize, y1: usize, x2: usize, y2: usize) -> Self {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Returns true when the rectangle holds no pixel.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if pixel `(x, y)` lies inside.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Geometric center, `(x + w/2, y + h/2)`.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Clips this rectangle to `[0, width) x [0, height)`.
    pub fn clipped(&self, width: usize, height: usize) -> Rect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> HeadTplResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> HeadTplResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(HeadTplError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }

    /// Returns a zero-copy view restricted to `rect`.
    pub fn roi(&self, rect: Rect) -> HeadTplResult<ImageView<'a, T>> {
        if rect.is_empty() {
            return Err(HeadTplError::InvalidDimensions {
                width: rect.width,
                height: rect.height,
            });
        }
        if rect.right() > self.width || rect.bottom() > self.height {
            return Err(HeadTplError::OutOfBounds {
                x: rect.right() - 1,
                y: rect.bottom() - 1,
                width: self.width,
                height: self.height,
            });
        }
        let start = rect.y * self.stride + rect.x;
        ImageView::new(&self.data[start..], rect.width, rect.height, self.stride)
    }
}

pub(crate) fn required_len(width: usize, height: usize, stride: usize) -> HeadTplResult<usize> {
    if width == 0 || height == 0 {
        return Err(HeadTplError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(HeadTplError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(HeadTplError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{ImageView, Rect};
    use crate::util::HeadTplError;

    #[test]
    fn rect_corners_and_center() {
        let rect = Rect::from_corners(7, 9, 2, 3);
        assert_eq!(rect, Rect::new(2, 3, 6, 7));
        assert_eq!(rect.right(), 8);
        assert_eq!(rect.bottom(), 10);
        assert_eq!(rect.center(), (5.0, 6.5));
        assert!(rect.contains(2, 3));
        assert!(!rect.contains(8, 3));
    }

    #[test]
    fn rect_clipping_stays_inside() {
        let rect = Rect::new(3, 3, 10, 10).clipped(8, 5);
        assert_eq!(rect, Rect::new(3, 3, 5, 2));
        assert!(Rect::new(0, 0, 8, 5).contains_rect(&rect));
    }

    #[test]
    fn view_roi_keeps_stride() {
        let data: Vec<u8> = (0u8..16).collect();
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        let roi = view.roi(Rect::new(1, 1, 2, 2)).unwrap();
        assert_eq!(roi.stride(), 4);
        assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
        assert_eq!(roi.get(0, 0).copied(), Some(5u8));

        let err = view.roi(Rect::new(3, 3, 2, 2)).err().unwrap();
        assert_eq!(
            err,
            HeadTplError::OutOfBounds {
                x: 4,
                y: 4,
                width: 4,
                height: 4,
            }
        );
    }
}
