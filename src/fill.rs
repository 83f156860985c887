//! 4-connected flood filling over a `PixelMap`.
//!
//! Filling uses an explicit worklist so that large, high-resolution renders
//! cannot exhaust the call stack. Diagonal neighbors are never visited.

use crate::classify::{PixelClass, PixelMap};

/// Flood filler bound to one pixel map.
pub struct FloodFiller<'a> {
    map: &'a mut PixelMap,
    stack: Vec<(usize, usize)>,
}

impl<'a> FloodFiller<'a> {
    /// Creates a filler operating in place on `map`.
    pub fn new(map: &'a mut PixelMap) -> Self {
        Self {
            map,
            stack: Vec::new(),
        }
    }

    /// Replaces the 4-connected region of `old` pixels reachable from
    /// `(x, y)` with `new`, returning the number of changed pixels.
    ///
    /// Nothing happens when `old == new` or when the start pixel is out of
    /// bounds or not `old`.
    pub fn fill(&mut self, x: usize, y: usize, old: PixelClass, new: PixelClass) -> usize {
        if old == new || !self.map.is(x, y, old) {
            return 0;
        }

        let width = self.map.width();
        let height = self.map.height();
        let mut changed = 0usize;
        self.stack.clear();
        self.stack.push((x, y));

        while let Some((px, py)) = self.stack.pop() {
            if !self.map.is(px, py, old) {
                continue;
            }
            self.map.set(px, py, new);
            changed += 1;

            if px + 1 < width {
                self.stack.push((px + 1, py));
            }
            if px > 0 {
                self.stack.push((px - 1, py));
            }
            if py + 1 < height {
                self.stack.push((px, py + 1));
            }
            if py > 0 {
                self.stack.push((px, py - 1));
            }
        }

        changed
    }

    /// Overwrites `(x, y)` with `new` if no in-bounds 4-neighbor shares its
    /// current class. Returns true when the pixel changed.
    pub fn adjust(&mut self, x: usize, y: usize, new: PixelClass) -> bool {
        let Some(class) = self.map.get(x, y) else {
            return false;
        };

        let shared = neighbors4(x, y).any(|(nx, ny)| self.map.is(nx, ny, class));
        if shared || class == new {
            return false;
        }

        self.map.set(x, y, new);
        true
    }
}

/// Candidate 4-neighbors of `(x, y)`; negative coordinates are skipped,
/// the map rejects the ones past its far edges.
fn neighbors4(x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
    let west = x.checked_sub(1).map(|nx| (nx, y));
    let north = y.checked_sub(1).map(|ny| (x, ny));
    [west, Some((x + 1, y)), north, Some((x, y + 1))]
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::FloodFiller;
    use crate::classify::{PixelClass, PixelMap};

    #[test]
    fn fill_stops_at_foreground_and_ignores_diagonals() {
        let mut map = PixelMap::from_ascii(&[
            "#####", //
            "#..##", //
            "#.#.#", //
            "##..#", //
            "#####",
        ])
        .unwrap();
        let changed =
            FloodFiller::new(&mut map).fill(1, 1, PixelClass::Background, PixelClass::Hole);
        assert_eq!(changed, 3);
        assert!(map.is(3, 2, PixelClass::Background));
        assert!(map.is(2, 3, PixelClass::Background));
        assert!(map.is(1, 2, PixelClass::Hole));
    }

    #[test]
    fn fill_is_noop_for_same_class_or_wrong_start() {
        let mut map = PixelMap::from_ascii(&["..", ".#"]).unwrap();
        let before = map.clone();
        let mut filler = FloodFiller::new(&mut map);
        assert_eq!(
            filler.fill(0, 0, PixelClass::Background, PixelClass::Background),
            0
        );
        assert_eq!(filler.fill(1, 1, PixelClass::Background, PixelClass::Hole), 0);
        assert_eq!(filler.fill(9, 9, PixelClass::Background, PixelClass::Hole), 0);
        assert_eq!(map, before);
    }

    #[test]
    fn adjust_only_rewrites_isolated_pixels() {
        let mut map = PixelMap::from_ascii(&[
            "#####", //
            "#.#o#", //
            "##o.#", //
            "#####",
        ])
        .unwrap();
        let mut filler = FloodFiller::new(&mut map);
        assert!(filler.adjust(1, 1, PixelClass::Hole));
        assert!(filler.adjust(3, 2, PixelClass::Hole));
        assert!(!filler.adjust(0, 0, PixelClass::Hole));
        assert!(map.is(1, 1, PixelClass::Hole));
        assert!(map.is(3, 2, PixelClass::Hole));
    }

    #[test]
    fn fill_handles_large_regions_without_recursion() {
        let mut map = PixelMap::filled(600, 600, PixelClass::Background).unwrap();
        let changed =
            FloodFiller::new(&mut map).fill(300, 300, PixelClass::Background, PixelClass::Hole);
        assert_eq!(changed, 600 * 600);
    }
}
