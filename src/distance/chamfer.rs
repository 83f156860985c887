//! Two-pass 3-4 chamfer distance transform.
//!
//! Orthogonal steps cost 3, diagonal steps cost 4, and raw values divided by
//! the normalizer (3) approximate Euclidean pixel distances. The forward pass
//! scans rows top-down with the west, north-west, north and north-east
//! neighbors; the backward pass scans bottom-up with the mirrored neighbors.
//! Both masks are symmetric, so the result is invariant under 90 degree
//! rotations of the input.

use crate::distance::DistanceTable;
use crate::trace::trace_span;
use crate::util::{HeadTplError, HeadTplResult};

/// Integer chamfer weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChamferKernel {
    /// Cost of a horizontal or vertical step.
    pub orthogonal: i32,
    /// Cost of a diagonal step.
    pub diagonal: i32,
}

impl Default for ChamferKernel {
    fn default() -> Self {
        Self::CHAMFER_3_4
    }
}

impl ChamferKernel {
    /// The 3-4 kernel used for both template building and match-time tables.
    pub const CHAMFER_3_4: ChamferKernel = ChamferKernel {
        orthogonal: 3,
        diagonal: 4,
    };

    /// Divisor converting raw values to pixel distances.
    pub fn normalizer(&self) -> i32 {
        self.orthogonal
    }

    /// Closed-form distance of an unobstructed `(dx, dy)` displacement.
    pub fn offset_distance(&self, dx: i64, dy: i64) -> i64 {
        let (dx, dy) = (dx.abs(), dy.abs());
        let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
        i64::from(self.diagonal) * lo + i64::from(self.orthogonal) * (hi - lo)
    }

    /// Computes the distance from every pixel to the nearest `true` cell of a
    /// row-major `mask`.
    ///
    /// Foreground pixels get 0. Pixels with no foreground at all in the mask
    /// get `DistanceTable::UNREACHABLE`.
    pub fn compute(&self, mask: &[bool], width: usize, height: usize) -> HeadTplResult<DistanceTable> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or(HeadTplError::InvalidDimensions { width, height })?;
        if mask.len() != len {
            return Err(HeadTplError::BufferTooSmall {
                needed: len,
                got: mask.len(),
            });
        }

        let _span = trace_span!("chamfer", width = width, height = height).entered();

        let far = DistanceTable::UNREACHABLE;
        let mut d: Vec<i32> = mask.iter().map(|&fg| if fg { 0 } else { far }).collect();
        let ortho = self.orthogonal;
        let diag = self.diagonal;

        // Forward pass.
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let mut best = d[idx];
                if best == 0 {
                    continue;
                }
                if x > 0 {
                    best = best.min(d[idx - 1].saturating_add(ortho));
                }
                if y > 0 {
                    let up = idx - width;
                    best = best.min(d[up].saturating_add(ortho));
                    if x > 0 {
                        best = best.min(d[up - 1].saturating_add(diag));
                    }
                    if x + 1 < width {
                        best = best.min(d[up + 1].saturating_add(diag));
                    }
                }
                d[idx] = best.min(far);
            }
        }

        // Backward pass.
        for y in (0..height).rev() {
            for x in (0..width).rev() {
                let idx = y * width + x;
                let mut best = d[idx];
                if best == 0 {
                    continue;
                }
                if x + 1 < width {
                    best = best.min(d[idx + 1].saturating_add(ortho));
                }
                if y + 1 < height {
                    let down = idx + width;
                    best = best.min(d[down].saturating_add(ortho));
                    if x + 1 < width {
                        best = best.min(d[down + 1].saturating_add(diag));
                    }
                    if x > 0 {
                        best = best.min(d[down - 1].saturating_add(diag));
                    }
                }
                d[idx] = best.min(far);
            }
        }

        DistanceTable::from_vec(d, width, height, self.normalizer())
    }
}
