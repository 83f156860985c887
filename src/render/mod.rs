//! Symbol rendering seam.
//!
//! Template building only needs a rasterized glyph and the renderer's own
//! ("fat") extent of the symbol inside that raster. Real font engines live
//! outside this crate and plug in through `SymbolRenderer`; the synthetic
//! renderer draws procedural noteheads for tests, benches and the CLI.

mod synthetic;

pub use synthetic::SyntheticRenderer;

use crate::image::{Raster, Rect};
use crate::shape::{Family, Shape};
use crate::util::{HeadTplError, HeadTplResult};

/// A rasterized symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendering {
    raster: Raster,
    fat_bounds: Rect,
}

impl Rendering {
    /// Pairs a raster with the symbol extent reported by the renderer.
    ///
    /// The fat bounds are clipped to the raster.
    pub fn new(raster: Raster, fat_bounds: Rect) -> HeadTplResult<Self> {
        let fat_bounds = fat_bounds.clipped(raster.width(), raster.height());
        if fat_bounds.is_empty() {
            return Err(HeadTplError::InvalidDimensions {
                width: fat_bounds.width,
                height: fat_bounds.height,
            });
        }
        Ok(Self { raster, fat_bounds })
    }

    /// The rendered RGBA raster.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Renderer-reported symbol extent, possibly larger than the visible ink.
    pub fn fat_bounds(&self) -> Rect {
        self.fat_bounds
    }
}

/// Rasterizes one shape of one family at one point size.
pub trait SymbolRenderer: Send + Sync {
    /// Returns `Ok(None)` when the family has no usable glyph for `shape`
    /// at this size; that is an expected outcome, not an error.
    fn render(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Rendering>>;
}

impl<R: SymbolRenderer + ?Sized> SymbolRenderer for &R {
    fn render(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Rendering>> {
        (**self).render(shape, family, point_size)
    }
}

impl<R: SymbolRenderer + ?Sized> SymbolRenderer for std::sync::Arc<R> {
    fn render(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Rendering>> {
        (**self).render(shape, family, point_size)
    }
}
