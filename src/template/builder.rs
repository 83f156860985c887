//! Template construction for one (shape, family, point size) triple.
//!
//! A build renders the glyph, binarizes it, trims the slim bounds, carves
//! interior holes for hole-bearing heads, runs the chamfer transform and
//! finally samples key points and places anchors. When hole carving leaks
//! out of the symbol the whole pipeline is rerun at a multiplied point size
//! and the resulting distance table is block-averaged back down.

use super::decorate::{decorate, DecoratedImage};
use super::{place_anchors, KeyPoint, Template};
use crate::classify::{binarize, PixelClass, PixelMap};
use crate::distance::DistanceTable;
use crate::fill::FloodFiller;
use crate::image::Rect;
use crate::render::SymbolRenderer;
use crate::shape::{Family, Shape};
use crate::trace::{trace_debug, trace_event, trace_span, trace_warn};
use crate::util::math::{saturating_pow, scale_rounded};
use crate::util::{HeadTplError, HeadTplResult};

/// Parameters of template construction.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildConfig {
    /// Alpha and red threshold separating ink from background.
    pub binarization_threshold: u8,
    /// Minimum foreground pixels a border row or column needs to bound the slim box.
    pub min_cells_per_side: usize,
    /// Horizontal stem offset as a fraction of slim width; negative is inside.
    pub stem_dx: f64,
    /// Vertical stem extent as a fraction of slim height.
    pub stem_dy: f64,
    /// Point size at which `max_raw_distance` applies unscaled.
    pub reference_point_size: u32,
    /// Largest raw distance kept as a key point at the reference size.
    pub max_raw_distance: u32,
    /// Point size multiplier applied per retry after a hole overflow.
    pub retry_multiplier: u32,
    /// Maximum number of higher-resolution retries.
    pub max_retries: u32,
    /// Extract key points while building rather than on first use.
    pub prepopulate_key_points: bool,
    /// Build catalog shapes in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            binarization_threshold: 140,
            min_cells_per_side: 2,
            stem_dx: -0.1,
            stem_dy: -0.2,
            reference_point_size: 80,
            max_raw_distance: 8,
            retry_multiplier: 2,
            max_retries: 2,
            prepopulate_key_points: true,
            parallel: false,
        }
    }
}

impl BuildConfig {
    /// Checks parameter ranges.
    pub fn validate(&self) -> HeadTplResult<()> {
        if self.binarization_threshold == 0 {
            return Err(HeadTplError::InvalidConfig {
                reason: "binarization threshold must be > 0",
            });
        }
        if self.min_cells_per_side == 0 {
            return Err(HeadTplError::InvalidConfig {
                reason: "min cells per side must be > 0",
            });
        }
        if self.reference_point_size == 0 {
            return Err(HeadTplError::InvalidConfig {
                reason: "reference point size must be > 0",
            });
        }
        if self.retry_multiplier < 2 {
            return Err(HeadTplError::InvalidConfig {
                reason: "retry multiplier must be >= 2",
            });
        }
        if !self.stem_dx.is_finite() || !self.stem_dy.is_finite() {
            return Err(HeadTplError::InvalidConfig {
                reason: "stem offsets must be finite",
            });
        }
        Ok(())
    }
}

/// Binarized rendering with its trimmed bounds.
struct Prepared {
    map: PixelMap,
    slim: Rect,
}

/// Signed distance field at the requested size.
struct Field {
    classes: PixelMap,
    table: DistanceTable,
}

/// Builds templates from glyphs supplied by a `SymbolRenderer`.
pub struct TemplateBuilder<R> {
    renderer: R,
    config: BuildConfig,
}

impl<R: SymbolRenderer> TemplateBuilder<R> {
    /// Creates a builder after validating `config`.
    pub fn new(renderer: R, config: BuildConfig) -> HeadTplResult<Self> {
        config.validate()?;
        Ok(Self { renderer, config })
    }

    /// Returns the build configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Returns the glyph renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Largest raw key-point distance at `point_size`, scaled linearly from
    /// the reference size.
    pub fn max_raw_distance(&self, point_size: u32) -> i32 {
        let raw = scale_rounded(
            self.config.max_raw_distance,
            point_size,
            self.config.reference_point_size,
        );
        i32::try_from(raw).unwrap_or(i32::MAX)
    }

    /// Reference key-point bound in pixels.
    pub fn max_distance(&self) -> f64 {
        f64::from(self.config.max_raw_distance) / f64::from(DistanceTable::DEFAULT_NORMALIZER)
    }

    /// Builds the template of `shape` for `family` at `point_size`.
    ///
    /// Returns `Ok(None)` when the renderer has no glyph or when hole
    /// detection still overflows after the last retry.
    pub fn build(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Template>> {
        check_point_size(point_size)?;
        let _span = trace_span!(
            "build_template",
            shape = shape.name(),
            family = family.name(),
            point_size = point_size
        )
        .entered();

        let Some(prepared) = self.prepare(shape, family, point_size)? else {
            trace_event!("no_template", shape = shape.name(), family = family.name());
            return Ok(None);
        };
        let width = prepared.map.width();
        let height = prepared.map.height();
        let slim = prepared.slim;

        let key_points = if self.config.prepopulate_key_points {
            match self.resolve(shape, family, point_size, prepared)? {
                Some(field) => Some(self.extract(&field.table, point_size)),
                None => return Ok(None),
            }
        } else {
            None
        };

        let template = self.assemble(shape, family, point_size, width, height, slim, key_points);
        trace_debug!(
            "template_built",
            shape = shape.name(),
            width = width,
            height = height,
            key_points = template.key_points().map_or(0, <[KeyPoint]>::len)
        );
        Ok(Some(template))
    }

    /// Runs the distance pipeline only and returns the key points.
    pub fn key_points(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Vec<KeyPoint>>> {
        check_point_size(point_size)?;
        let Some(prepared) = self.prepare(shape, family, point_size)? else {
            return Ok(None);
        };
        Ok(self
            .resolve(shape, family, point_size, prepared)?
            .map(|field| self.extract(&field.table, point_size)))
    }

    /// Fills the key points of a template built without them.
    ///
    /// An already populated template is returned as is. A template whose
    /// holes cannot be resolved any more ends up with no key points.
    pub fn populate_key_points<'t>(&self, template: &'t Template) -> HeadTplResult<&'t [KeyPoint]> {
        let cell = template.key_point_cell();
        if let Some(points) = cell.get() {
            return Ok(points);
        }
        let points = match self.key_points(template.shape(), template.family(), template.point_size())? {
            Some(points) => points,
            None => {
                trace_warn!(
                    "unusable_template",
                    shape = template.shape().name(),
                    family = template.family().name(),
                    point_size = template.point_size()
                );
                Vec::new()
            }
        };
        let _ = cell.set(points);
        Ok(cell.get().expect("key points should be initialized"))
    }

    /// Builds the template and its magnified diagnostic image.
    pub fn decorated(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
        zoom: usize,
    ) -> HeadTplResult<Option<(Template, DecoratedImage)>> {
        check_point_size(point_size)?;
        let Some(prepared) = self.prepare(shape, family, point_size)? else {
            return Ok(None);
        };
        let width = prepared.map.width();
        let height = prepared.map.height();
        let slim = prepared.slim;
        let Some(field) = self.resolve(shape, family, point_size, prepared)? else {
            return Ok(None);
        };
        let key_points = self.extract(&field.table, point_size);
        let template = self.assemble(shape, family, point_size, width, height, slim, Some(key_points));
        let image = decorate(&template, &field.classes, zoom)?;
        Ok(Some((template, image)))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
        width: usize,
        height: usize,
        slim: Rect,
        key_points: Option<Vec<KeyPoint>>,
    ) -> Template {
        let anchors = place_anchors(shape, slim, self.config.stem_dx, self.config.stem_dy);
        Template::new(
            shape, family, point_size, width, height, slim, anchors, key_points,
        )
    }

    /// Renders, binarizes and trims one glyph.
    fn prepare(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Prepared>> {
        let Some(rendering) = self.renderer.render(shape, family, point_size)? else {
            return Ok(None);
        };
        let map = binarize(
            rendering.raster().view(),
            self.config.binarization_threshold,
        );
        let slim = slim_bounds(&map, rendering.fat_bounds(), self.config.min_cells_per_side);
        Ok(Some(Prepared { map, slim }))
    }

    /// Produces the signed distance field at `point_size`, retrying at
    /// multiplied sizes while hole carving overflows.
    fn resolve(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
        prepared: Prepared,
    ) -> HeadTplResult<Option<Field>> {
        let width = prepared.map.width();
        let height = prepared.map.height();
        if let Some(field) = signed_field(shape, prepared)? {
            return Ok(Some(field));
        }

        for attempt in 1..=self.config.max_retries {
            let ratio = saturating_pow(self.config.retry_multiplier, attempt);
            let Some(size) = point_size.checked_mul(ratio) else {
                break;
            };
            trace_debug!(
                "hole_overflow_retry",
                shape = shape.name(),
                attempt = attempt,
                point_size = size
            );
            let Some(large) = self.prepare(shape, family, size)? else {
                break;
            };
            if let Some(field) = signed_field(shape, large)? {
                let table = field.table.downsample(ratio as usize, width, height)?;
                let classes = classes_from_table(&table)?;
                return Ok(Some(Field { classes, table }));
            }
        }

        trace_warn!(
            "unusable_template",
            shape = shape.name(),
            family = family.name(),
            point_size = point_size
        );
        Ok(None)
    }

    /// Row-major scan keeping every value within the size-scaled bound.
    fn extract(&self, table: &DistanceTable, point_size: u32) -> Vec<KeyPoint> {
        let max = self.max_raw_distance(point_size);
        let width = table.width();
        table
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.unsigned_abs() <= max.unsigned_abs())
            .map(|(idx, &distance)| KeyPoint {
                x: idx % width,
                y: idx / width,
                distance,
            })
            .collect()
    }
}

fn check_point_size(point_size: u32) -> HeadTplResult<()> {
    if point_size == 0 {
        return Err(HeadTplError::InvalidPointSize { point_size });
    }
    Ok(())
}

/// Carves holes when the shape has any and computes the signed table.
/// `None` means hole carving reached the raster origin.
fn signed_field(shape: Shape, prepared: Prepared) -> HeadTplResult<Option<Field>> {
    let Prepared { mut map, slim } = prepared;
    if shape.has_holes() && !carve_holes(shape, &mut map, slim) {
        return Ok(None);
    }
    let mut table = DistanceTable::from_pixel_map(&map)?;
    if shape.has_holes() {
        table.negate_where(&map, PixelClass::Hole)?;
    }
    Ok(Some(Field {
        classes: map,
        table,
    }))
}

/// Scans whole columns and rows inward from each side; the first line with
/// at least `min_cells` foreground pixels bounds the symbol. Sides with no
/// such line keep the renderer's fat bounds.
pub(crate) fn slim_bounds(map: &PixelMap, fat: Rect, min_cells: usize) -> Rect {
    let width = map.width();
    let height = map.height();
    let fat = fat.clipped(width, height);

    let x1 = (0..width)
        .find(|&x| map.column_foreground(x) >= min_cells)
        .unwrap_or(fat.x);
    let x2 = (0..width)
        .rev()
        .find(|&x| map.column_foreground(x) >= min_cells)
        .unwrap_or(fat.right().saturating_sub(1));
    let y1 = (0..height)
        .find(|&y| map.row_foreground(y) >= min_cells)
        .unwrap_or(fat.y);
    let y2 = (0..height)
        .rev()
        .find(|&y| map.row_foreground(y) >= min_cells)
        .unwrap_or(fat.bottom().saturating_sub(1));

    Rect::from_corners(x1, y1, x2, y2)
}

/// Marks interior background as `Hole`.
///
/// Each seed tries its 3x3 neighborhood in row-major order and floods the
/// first background pixel found. Background pixels of the slim interior that
/// still have no background neighbor are then turned into holes as well.
/// Returns false when the flood reached pixel (0, 0).
pub(crate) fn carve_holes(shape: Shape, map: &mut PixelMap, slim: Rect) -> bool {
    {
        let mut filler = FloodFiller::new(map);
        for (sx, sy) in shape.hole_seeds(slim) {
            'seed: for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    let (Some(x), Some(y)) = (sx.checked_add_signed(dx), sy.checked_add_signed(dy))
                    else {
                        continue;
                    };
                    if filler.fill(x, y, PixelClass::Background, PixelClass::Hole) > 0 {
                        break 'seed;
                    }
                }
            }
        }
    }

    if map.is(0, 0, PixelClass::Hole) {
        return false;
    }

    let interior: Vec<(usize, usize)> = (slim.y + 1..slim.bottom().saturating_sub(1))
        .flat_map(|y| (slim.x + 1..slim.right().saturating_sub(1)).map(move |x| (x, y)))
        .filter(|&(x, y)| map.is(x, y, PixelClass::Background))
        .collect();
    let mut filler = FloodFiller::new(map);
    for (x, y) in interior {
        filler.adjust(x, y, PixelClass::Hole);
    }
    true
}

/// Reconstructs pixel classes from a signed table: 0 is ink, negative is hole.
fn classes_from_table(table: &DistanceTable) -> HeadTplResult<PixelMap> {
    let mut map = PixelMap::filled(table.width(), table.height(), PixelClass::Background)?;
    for (idx, &d) in table.as_slice().iter().enumerate() {
        let class = match d {
            0 => PixelClass::Foreground,
            d if d < 0 => PixelClass::Hole,
            _ => continue,
        };
        map.set(idx % table.width(), idx / table.width(), class);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::{carve_holes, slim_bounds, BuildConfig};
    use crate::classify::{PixelClass, PixelMap};
    use crate::image::Rect;
    use crate::shape::Shape;
    use crate::util::HeadTplError;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(BuildConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let cfg = BuildConfig {
            retry_multiplier: 1,
            ..BuildConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(HeadTplError::InvalidConfig {
                reason: "retry multiplier must be >= 2"
            })
        );
        let cfg = BuildConfig {
            binarization_threshold: 0,
            ..BuildConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = BuildConfig {
            stem_dx: f64::NAN,
            ..BuildConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn slim_bounds_skip_sparse_lines() {
        let map = PixelMap::from_ascii(&[
            "........",
            "...#....",
            "..####..",
            "..####..",
            "....#...",
            "........",
        ])
        .unwrap();
        let slim = slim_bounds(&map, map.bounds(), 2);
        assert_eq!(slim, Rect::new(2, 2, 4, 2));
        let loose = slim_bounds(&map, map.bounds(), 1);
        assert_eq!(loose, Rect::new(2, 1, 4, 4));
    }

    #[test]
    fn slim_bounds_fall_back_to_fat_box() {
        let map = PixelMap::filled(10, 8, PixelClass::Background).unwrap();
        let fat = Rect::new(2, 1, 5, 4);
        assert_eq!(slim_bounds(&map, fat, 2), fat);
    }

    #[test]
    fn carve_holes_fills_closed_ring() {
        let mut map = PixelMap::from_ascii(&[
            ".......",
            ".#####.",
            ".#...#.",
            ".#...#.",
            ".#...#.",
            ".#####.",
            ".......",
        ])
        .unwrap();
        assert!(carve_holes(Shape::NoteheadVoid, &mut map, Rect::new(1, 1, 5, 5)));
        assert_eq!(map.count(PixelClass::Hole), 9);
        assert!(map.is(0, 0, PixelClass::Background));
    }

    #[test]
    fn carve_holes_reports_leak_to_origin() {
        let mut map = PixelMap::from_ascii(&[
            ".......",
            ".##.##.",
            ".#...#.",
            ".#...#.",
            ".#####.",
            ".......",
        ])
        .unwrap();
        assert!(!carve_holes(Shape::NoteheadVoid, &mut map, Rect::new(1, 1, 5, 4)));
    }

    #[test]
    fn adjust_sweep_catches_isolated_background() {
        // The seed lands in the upper cell; the single pixel below is enclosed.
        let mut map = PixelMap::from_ascii(&[
            ".......",
            ".#####.",
            ".#...#.",
            ".#####.",
            ".##.##.",
            ".#####.",
            ".......",
        ])
        .unwrap();
        assert!(carve_holes(Shape::NoteheadVoid, &mut map, Rect::new(1, 1, 5, 5)));
        assert!(map.is(3, 2, PixelClass::Hole));
        assert!(map.is(3, 4, PixelClass::Hole));
    }
}
