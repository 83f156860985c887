//! Signed distance tables built from template pixel maps.
//!
//! Values are raw chamfer units: 0 on foreground, positive outside the
//! symbol, negative inside holes once `negate_where` has been applied.

mod chamfer;

pub use chamfer::ChamferKernel;

use crate::classify::{PixelClass, PixelMap};
use crate::util::math::round_i32;
use crate::util::{HeadTplError, HeadTplResult};

/// Dense row-major table of signed chamfer distances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceTable {
    data: Vec<i32>,
    width: usize,
    height: usize,
    normalizer: i32,
}

impl DistanceTable {
    /// Raw value stored where no foreground pixel exists at all.
    pub const UNREACHABLE: i32 = i32::MAX / 4;

    /// Default normalizer of the 3-4 chamfer kernel.
    pub const DEFAULT_NORMALIZER: i32 = 3;

    /// Wraps a row-major buffer of exactly `width * height` values.
    pub fn from_vec(
        data: Vec<i32>,
        width: usize,
        height: usize,
        normalizer: i32,
    ) -> HeadTplResult<Self> {
        let needed = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or(HeadTplError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(HeadTplError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if normalizer <= 0 {
            return Err(HeadTplError::InvalidConfig {
                reason: "distance normalizer must be > 0",
            });
        }
        Ok(Self {
            data,
            width,
            height,
            normalizer,
        })
    }

    /// Computes the 3-4 chamfer table of the foreground pixels of `map`.
    pub fn from_pixel_map(map: &PixelMap) -> HeadTplResult<Self> {
        ChamferKernel::CHAMFER_3_4.compute(&map.foreground_mask(), map.width(), map.height())
    }

    /// Returns the table width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the table height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Divisor from raw units to pixels.
    pub fn normalizer(&self) -> i32 {
        self.normalizer
    }

    /// Returns the row-major raw values.
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    /// Returns the raw value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Returns the value at `(x, y)` converted to pixel units.
    pub fn normalized(&self, x: usize, y: usize) -> Option<f64> {
        self.get(x, y)
            .map(|raw| f64::from(raw) / f64::from(self.normalizer))
    }

    /// Forces `d = -|d|` on every pixel of `map` holding `class`.
    pub fn negate_where(&mut self, map: &PixelMap, class: PixelClass) -> HeadTplResult<usize> {
        if map.width() != self.width || map.height() != self.height {
            return Err(HeadTplError::InvalidDimensions {
                width: map.width(),
                height: map.height(),
            });
        }
        let mut count = 0usize;
        for (value, &pix) in self.data.iter_mut().zip(map.as_slice()) {
            if pix == class {
                *value = -value.abs();
                count += 1;
            }
        }
        Ok(count)
    }

    /// Shrinks the table by averaging `ratio x ratio` blocks into a
    /// `width x height` table.
    ///
    /// Blocks are clipped to the source; a block starting past the source edge
    /// reuses the last source row or column. Means are rounded half away from
    /// zero and a rounded magnitude of exactly 1 is snapped to 0.
    pub fn downsample(&self, ratio: usize, width: usize, height: usize) -> HeadTplResult<Self> {
        if ratio == 0 {
            return Err(HeadTplError::InvalidConfig {
                reason: "downsampling ratio must be > 0",
            });
        }
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or(HeadTplError::InvalidDimensions { width, height })?;

        let mut dst = Vec::with_capacity(len);
        for y in 0..height {
            let (y0, y1) = block_span(y, ratio, self.height);
            for x in 0..width {
                let (x0, x1) = block_span(x, ratio, self.width);
                let mut sum = 0i64;
                for sy in y0..y1 {
                    let row = &self.data[sy * self.width..(sy + 1) * self.width];
                    sum += row[x0..x1].iter().map(|&v| i64::from(v)).sum::<i64>();
                }
                let count = ((y1 - y0) * (x1 - x0)) as f64;
                let mean = round_i32(sum as f64 / count);
                dst.push(if mean.abs() == 1 { 0 } else { mean });
            }
        }

        Self::from_vec(dst, width, height, self.normalizer)
    }
}

/// Source index range `[start, end)` for destination index `idx`.
fn block_span(idx: usize, ratio: usize, src_len: usize) -> (usize, usize) {
    let start = (idx * ratio).min(src_len - 1);
    let end = (start + ratio).min(src_len).max(start + 1);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::DistanceTable;
    use crate::classify::{PixelClass, PixelMap};

    #[test]
    fn downsample_averages_and_snaps_unit_values() {
        #[rustfmt::skip]
        let data = vec![
            0, 1, 6, 6,
            1, 2, 6, 6,
            -3, -3, 9, 9,
            -3, -2, 9, 9,
        ];
        let table = DistanceTable::from_vec(data, 4, 4, 3).unwrap();
        let small = table.downsample(2, 2, 2).unwrap();
        // (0+1+1+2)/4 = 1 -> snapped; (-3-3-3-2)/4 = -2.75 -> -3.
        assert_eq!(small.as_slice(), &[0, 6, -3, 9]);
        assert_eq!(small.normalizer(), 3);
    }

    #[test]
    fn downsample_clips_blocks_to_source() {
        let table = DistanceTable::from_vec(vec![4, 8, 12], 3, 1, 3).unwrap();
        let small = table.downsample(2, 2, 1).unwrap();
        assert_eq!(small.as_slice(), &[6, 12]);
        let wide = table.downsample(2, 3, 1).unwrap();
        assert_eq!(wide.as_slice(), &[6, 12, 12]);
    }

    #[test]
    fn negate_where_flips_only_selected_class() {
        let map = PixelMap::from_ascii(&["#o."]).unwrap();
        let mut table = DistanceTable::from_vec(vec![0, 3, 3], 3, 1, 3).unwrap();
        assert_eq!(table.negate_where(&map, PixelClass::Hole).unwrap(), 1);
        assert_eq!(table.as_slice(), &[0, -3, 3]);
        assert_eq!(table.normalized(1, 0), Some(-1.0));
    }
}
