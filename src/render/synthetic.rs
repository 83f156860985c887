//! Procedural notehead renderer.
//!
//! Heads are described as an ordered list of filled primitives that are
//! either painted or erased, then rasterized with `n x n` supersampling into
//! black ink whose alpha is the pixel coverage. One staff space is a quarter
//! of the point size and a regular head is one staff space high; cue heads
//! are scaled by `SMALL_RATIO`. Breves add two vertical bars on each side.

use crate::image::{Raster, Rect, Rgba};
use crate::render::{Rendering, SymbolRenderer};
use crate::shape::{Family, HeadDuration, HeadMotif, Shape};
use crate::util::{HeadTplError, HeadTplResult};

/// Size ratio of cue and grace heads.
pub const SMALL_RATIO: f64 = 0.67;

/// Heads smaller than this many pixels are not drawn.
const MIN_HEAD_HEIGHT: f64 = 2.0;

/// Renderer drawing geometric noteheads for every known family.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticRenderer {
    supersampling: usize,
}

impl Default for SyntheticRenderer {
    fn default() -> Self {
        Self { supersampling: 4 }
    }
}

impl SyntheticRenderer {
    /// Creates a renderer with `n x n` samples per pixel (clamped to >= 1).
    pub fn with_supersampling(n: usize) -> Self {
        Self {
            supersampling: n.max(1),
        }
    }

    /// True when `family` has a glyph for `shape`.
    pub fn supports(family: Family, shape: Shape) -> bool {
        match family {
            Family::Bravura | Family::Leland => true,
            Family::MusicalSymbols => matches!(shape.motif(), HeadMotif::Oval | HeadMotif::Small),
            Family::JazzPerc => shape.motif() != HeadMotif::Small,
            Family::FinaleJazz => {
                shape.duration() != HeadDuration::Breve || shape == Shape::Breve
            }
        }
    }
}

impl SymbolRenderer for SyntheticRenderer {
    fn render(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Rendering>> {
        if point_size == 0 {
            return Err(HeadTplError::InvalidPointSize { point_size });
        }
        if !Self::supports(family, shape) {
            return Ok(None);
        }

        let space = f64::from(point_size) / 4.0;
        let head = if shape.is_small() {
            space * SMALL_RATIO
        } else {
            space
        };
        if head < MIN_HEAD_HEIGHT {
            return Ok(None);
        }

        let glyph = Glyph::design(shape, Style::of(family), head);
        glyph.rasterize(head, self.supersampling).map(Some)
    }
}

/// Per-family drawing parameters.
#[derive(Clone, Copy, Debug)]
struct Style {
    tilt_deg: f64,
    stroke_scale: f64,
    width_scale: f64,
}

impl Style {
    fn of(family: Family) -> Self {
        match family {
            Family::Bravura => Style {
                tilt_deg: 20.0,
                stroke_scale: 1.0,
                width_scale: 1.0,
            },
            Family::Leland => Style {
                tilt_deg: 18.0,
                stroke_scale: 1.05,
                width_scale: 1.04,
            },
            Family::FinaleJazz => Style {
                tilt_deg: 25.0,
                stroke_scale: 1.3,
                width_scale: 1.08,
            },
            Family::JazzPerc => Style {
                tilt_deg: 22.0,
                stroke_scale: 1.2,
                width_scale: 1.0,
            },
            Family::MusicalSymbols => Style {
                tilt_deg: 15.0,
                stroke_scale: 0.9,
                width_scale: 0.96,
            },
        }
    }
}

#[derive(Clone, Debug)]
enum Primitive {
    Ellipse {
        cx: f64,
        cy: f64,
        a: f64,
        b: f64,
        angle: f64,
    },
    Polygon(Vec<(f64, f64)>),
    Capsule {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        radius: f64,
    },
    Box {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
}

impl Primitive {
    fn contains(&self, px: f64, py: f64) -> bool {
        match self {
            Primitive::Ellipse {
                cx,
                cy,
                a,
                b,
                angle,
            } => {
                let (sin, cos) = angle.sin_cos();
                let (dx, dy) = (px - cx, py - cy);
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                (u / a).powi(2) + (v / b).powi(2) <= 1.0
            }
            Primitive::Polygon(points) => {
                let mut inside = false;
                let mut j = points.len() - 1;
                for i in 0..points.len() {
                    let (xi, yi) = points[i];
                    let (xj, yj) = points[j];
                    if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                        inside = !inside;
                    }
                    j = i;
                }
                inside
            }
            Primitive::Capsule {
                x0,
                y0,
                x1,
                y1,
                radius,
            } => {
                let (vx, vy) = (x1 - x0, y1 - y0);
                let len2 = vx * vx + vy * vy;
                let t = if len2 > 0.0 {
                    (((px - x0) * vx + (py - y0) * vy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (qx, qy) = (x0 + t * vx, y0 + t * vy);
                (px - qx).powi(2) + (py - qy).powi(2) <= radius * radius
            }
            Primitive::Box { x0, y0, x1, y1 } => px >= *x0 && px <= *x1 && py >= *y0 && py <= *y1,
        }
    }

    /// Axis-aligned extent `(min_x, min_y, max_x, max_y)`.
    fn extent(&self) -> (f64, f64, f64, f64) {
        match self {
            Primitive::Ellipse {
                cx,
                cy,
                a,
                b,
                angle,
            } => {
                let (sin, cos) = angle.sin_cos();
                let hw = ((a * cos).powi(2) + (b * sin).powi(2)).sqrt();
                let hh = ((a * sin).powi(2) + (b * cos).powi(2)).sqrt();
                (cx - hw, cy - hh, cx + hw, cy + hh)
            }
            Primitive::Polygon(points) => points.iter().fold(
                (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
                |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            ),
            Primitive::Capsule {
                x0,
                y0,
                x1,
                y1,
                radius,
            } => (
                x0.min(*x1) - radius,
                y0.min(*y1) - radius,
                x0.max(*x1) + radius,
                y0.max(*y1) + radius,
            ),
            Primitive::Box { x0, y0, x1, y1 } => (*x0, *y0, *x1, *y1),
        }
    }
}

/// Ordered paint/erase program centered on the origin.
#[derive(Default)]
struct Glyph {
    ops: Vec<(Primitive, bool)>,
}

impl Glyph {
    fn paint(&mut self, prim: Primitive) {
        self.ops.push((prim, true));
    }

    fn erase(&mut self, prim: Primitive) {
        self.ops.push((prim, false));
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        self.ops.iter().fold(false, |inside, (prim, paint)| {
            if prim.contains(x, y) {
                *paint
            } else {
                inside
            }
        })
    }

    fn extent(&self) -> (f64, f64, f64, f64) {
        self.ops
            .iter()
            .filter(|(_, paint)| *paint)
            .map(|(prim, _)| prim.extent())
            .fold(
                (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
                |(a, b, c, d), (x0, y0, x1, y1)| (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
            )
    }

    fn design(shape: Shape, style: Style, h: f64) -> Glyph {
        let stroke = (0.11 * h * style.stroke_scale).max(1.0);
        let tilt = style.tilt_deg.to_radians();
        let duration = shape.duration();
        let breve = duration == HeadDuration::Breve;
        let width_factor = match duration {
            HeadDuration::Quarter | HeadDuration::Half => 1.0,
            HeadDuration::Whole | HeadDuration::Breve => 1.3,
        } * style.width_scale;
        let filled = duration == HeadDuration::Quarter;
        let bar_half_height = 0.65 * h;

        let mut glyph = Glyph::default();
        let half_width = match shape.motif() {
            HeadMotif::Oval | HeadMotif::Small => {
                glyph.oval(duration, tilt, h, width_factor);
                0.6 * h * width_factor
            }
            HeadMotif::Diamond => {
                let hw = 0.6 * h * width_factor;
                let hh = 0.5 * h;
                glyph.paint(diamond(hw, hh));
                if !filled {
                    let (iw, ih) = (hw - 2.2 * stroke, hh - 1.8 * stroke);
                    if iw > 0.5 && ih > 0.5 {
                        glyph.erase(diamond(iw, ih));
                    }
                }
                hw
            }
            HeadMotif::Triangle => {
                let hw = 0.6 * h * width_factor;
                let hh = 0.5 * h;
                let outer = [(-hw, -hh), (hw, -hh), (0.0, hh)];
                glyph.paint(Primitive::Polygon(outer.to_vec()));
                if !filled {
                    let (gx, gy) = (0.0, -hh / 3.0);
                    let inner = outer
                        .iter()
                        .map(|&(x, y)| (gx + 0.5 * (x - gx), gy + 0.5 * (y - gy)))
                        .collect();
                    glyph.erase(Primitive::Polygon(inner));
                }
                hw
            }
            HeadMotif::Cross => {
                let hw = 0.55 * h * width_factor;
                let hh = 0.5 * h;
                glyph.cross(shape, hw, hh, breve, bar_half_height, stroke);
                hw
            }
            HeadMotif::Circle => {
                let r = 0.5 * h;
                glyph.circle_x(r, stroke);
                r
            }
        };

        if breve {
            glyph.bars(half_width, bar_half_height, h);
        }
        glyph
    }

    fn oval(&mut self, duration: HeadDuration, tilt: f64, h: f64, width_factor: f64) {
        match duration {
            HeadDuration::Quarter => self.paint(ellipse(0.62 * h, 0.42 * h, tilt)),
            HeadDuration::Half => {
                self.paint(ellipse(0.62 * h, 0.42 * h, tilt));
                self.erase(ellipse(0.5 * h, 0.19 * h, tilt + 15f64.to_radians()));
            }
            HeadDuration::Whole | HeadDuration::Breve => {
                self.paint(ellipse(0.6 * h * width_factor, 0.5 * h, 0.0));
                self.erase(ellipse(0.42 * h, 0.3 * h, 55f64.to_radians()));
            }
        }
    }

    fn cross(
        &mut self,
        shape: Shape,
        hw: f64,
        hh: f64,
        breve: bool,
        bar_half_height: f64,
        stroke: f64,
    ) {
        if shape == Shape::NoteheadCross {
            let r = 0.9 * stroke;
            let (ex, ey) = (hw - r, hh - r);
            self.paint(capsule(-ex, -ey, ex, ey, r));
            self.paint(capsule(-ex, ey, ex, -ey, r));
            return;
        }

        // Hollow strokes: paint thick arms, then erase their core.
        let outer = 2.0 * stroke;
        let inner = outer - stroke;
        let (ex, ey) = if breve {
            (hw, bar_half_height - outer)
        } else {
            (hw - outer, hh - outer)
        };
        self.paint(capsule(-ex, -ey, ex, ey, outer));
        self.paint(capsule(-ex, ey, ex, -ey, outer));

        let len = (ex * ex + ey * ey).sqrt();
        let keep = ((len - 1.5 * stroke - inner) / len).max(0.0);
        let (ix, iy) = (ex * keep, ey * keep);
        if inner > 0.0 && keep > 0.0 {
            self.erase(capsule(-ix, -iy, ix, iy, inner));
            self.erase(capsule(-ix, iy, ix, -iy, inner));
        }
    }

    fn circle_x(&mut self, r: f64, stroke: f64) {
        self.paint(ellipse(r, r, 0.0));
        self.erase(ellipse(r - stroke, r - stroke, 0.0));
        let d = (r - 0.5 * stroke) * std::f64::consts::FRAC_1_SQRT_2;
        let half = 0.5 * stroke;
        self.paint(capsule(-d, -d, d, d, half));
        self.paint(capsule(-d, d, d, -d, half));
    }

    fn bars(&mut self, head_half_width: f64, half_height: f64, h: f64) {
        let thickness = (0.1 * h).max(1.0);
        let gap = (0.08 * h).max(1.0);
        for side in [-1.0f64, 1.0] {
            let inner = head_half_width;
            let outer = head_half_width + thickness + gap;
            for start in [inner, outer] {
                let (a, b) = (side * start, side * (start + thickness));
                self.paint(Primitive::Box {
                    x0: a.min(b),
                    y0: -half_height,
                    x1: a.max(b),
                    y1: half_height,
                });
            }
        }
    }

    fn rasterize(&self, h: f64, n: usize) -> HeadTplResult<Rendering> {
        let (min_x, min_y, max_x, max_y) = self.extent();
        let glyph_w = (max_x - min_x).ceil().max(1.0) as usize;
        let glyph_h = (max_y - min_y).ceil().max(1.0) as usize;
        let margin = ((0.25 * h).ceil() as usize).max(2);
        let width = glyph_w + 2 * margin;
        let height = glyph_h + 2 * margin;

        let mut raster = Raster::new(width, height)?;
        let samples = (n * n) as f64;
        let step = 1.0 / n as f64;
        let origin_x = min_x - margin as f64;
        let origin_y = min_y - margin as f64;

        for y in 0..height {
            for x in 0..width {
                let mut hits = 0usize;
                for j in 0..n {
                    let sy = origin_y + y as f64 + (j as f64 + 0.5) * step;
                    for i in 0..n {
                        let sx = origin_x + x as f64 + (i as f64 + 0.5) * step;
                        if self.contains(sx, sy) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    let alpha = (hits as f64 * 255.0 / samples).round() as u8;
                    raster.set(x, y, Rgba::ink(alpha));
                }
            }
        }

        let fat = Rect::new(margin - 1, margin - 1, glyph_w + 2, glyph_h + 2);
        Rendering::new(raster, fat)
    }
}

fn ellipse(a: f64, b: f64, angle: f64) -> Primitive {
    Primitive::Ellipse {
        cx: 0.0,
        cy: 0.0,
        a,
        b,
        angle,
    }
}

fn diamond(hw: f64, hh: f64) -> Primitive {
    Primitive::Polygon(vec![(-hw, 0.0), (0.0, -hh), (hw, 0.0), (0.0, hh)])
}

fn capsule(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64) -> Primitive {
    Primitive::Capsule {
        x0,
        y0,
        x1,
        y1,
        radius,
    }
}
