//! Deterministic test renderers drawing square glyphs.
#![allow(dead_code)]

use headtpl::{
    Family, HeadTplResult, Raster, Rect, Rendering, Rgba, Shape, SymbolRenderer,
};
use std::sync::Mutex;

/// Blank border around every test glyph.
pub const MARGIN: usize = 2;

/// Stroke thickness of a ring drawn on an `n x n` raster.
pub fn ring_thickness(n: usize) -> usize {
    (n / 8).max(2)
}

/// True where the square ring of an `n x n` raster has ink.
pub fn ring_ink(n: usize, x: usize, y: usize, open: bool) -> bool {
    let lo = MARGIN;
    let hi = n - MARGIN;
    let t = ring_thickness(n);
    if x < lo || x >= hi || y < lo || y >= hi {
        return false;
    }
    let inside = x >= lo + t && x < hi - t && y >= lo + t && y < hi - t;
    let gap = open && y < lo + t && (x == n / 2 || x + 1 == n / 2);
    !inside && !gap
}

/// Square ring occupying `n x n` pixels, optionally broken at the top.
pub fn ring_rendering(n: usize, open: bool) -> Rendering {
    let mut raster = Raster::new(n, n).expect("raster");
    for y in 0..n {
        for x in 0..n {
            if ring_ink(n, x, y, open) {
                raster.set(x, y, Rgba::BLACK);
            }
        }
    }
    let fat = Rect::new(MARGIN, MARGIN, n - 2 * MARGIN, n - 2 * MARGIN);
    Rendering::new(raster, fat).expect("rendering")
}

/// Solid `side x side` square with a two pixel margin.
pub fn solid_rendering(side: usize) -> Rendering {
    let n = side + 2 * MARGIN;
    let mut raster = Raster::new(n, n).expect("raster");
    for y in MARGIN..MARGIN + side {
        for x in MARGIN..MARGIN + side {
            raster.set(x, y, Rgba::BLACK);
        }
    }
    Rendering::new(raster, Rect::new(MARGIN, MARGIN, side, side)).expect("rendering")
}

/// Draws a ring whose pixel size equals the point size. The ring is left
/// open below `closed_from`, and requested sizes are recorded.
pub struct RingRenderer {
    pub closed_from: u32,
    pub requests: Mutex<Vec<u32>>,
}

impl RingRenderer {
    pub fn closed() -> Self {
        Self::closed_from(0)
    }

    pub fn closed_from(size: u32) -> Self {
        Self {
            closed_from: size,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<u32> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl SymbolRenderer for RingRenderer {
    fn render(
        &self,
        _shape: Shape,
        _family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Rendering>> {
        self.requests.lock().expect("requests lock").push(point_size);
        let open = point_size < self.closed_from;
        Ok(Some(ring_rendering(point_size as usize, open)))
    }
}

/// Draws a fixed solid square for every shape except `missing`.
pub struct SolidRenderer {
    pub side: usize,
    pub missing: Option<Shape>,
}

impl SymbolRenderer for SolidRenderer {
    fn render(
        &self,
        shape: Shape,
        _family: Family,
        _point_size: u32,
    ) -> HeadTplResult<Option<Rendering>> {
        if Some(shape) == self.missing {
            return Ok(None);
        }
        Ok(Some(solid_rendering(self.side)))
    }
}
