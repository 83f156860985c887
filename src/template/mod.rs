//! Built head templates.
//!
//! A `Template` is the immutable outcome of one build for a
//! (shape, family, point size) triple: image dimensions, slim symbol bounds,
//! sparse signed key points and named anchor offsets.

use crate::image::Rect;
use crate::shape::{Family, Shape};
use std::collections::BTreeMap;
use std::sync::OnceLock;

mod anchors;
pub mod builder;
pub mod decorate;

pub use anchors::{place_anchors, stem_bottom, stem_top};
pub use builder::{BuildConfig, TemplateBuilder};

/// One sampled location of the template distance field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPoint {
    /// Column within the template.
    pub x: usize,
    /// Row within the template.
    pub y: usize,
    /// Raw chamfer distance: negative in holes, 0 on ink, positive outside.
    pub distance: i32,
}

impl KeyPoint {
    /// True for foreground (ink) locations.
    pub fn is_foreground(&self) -> bool {
        self.distance == 0
    }

    /// True for locations inside a hole.
    pub fn is_hole(&self) -> bool {
        self.distance < 0
    }
}

/// Horizontal side of a head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Named reference locations within a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    Center,
    MiddleLeft,
    MiddleRight,
    TopLeftStem,
    BottomLeftStem,
    TopRightStem,
    BottomRightStem,
}

impl Anchor {
    /// Every anchor, in display order.
    pub const ALL: [Anchor; 7] = [
        Anchor::Center,
        Anchor::MiddleLeft,
        Anchor::MiddleRight,
        Anchor::TopLeftStem,
        Anchor::BottomLeftStem,
        Anchor::TopRightStem,
        Anchor::BottomRightStem,
    ];

    /// Short label used in diagnostics.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Anchor::Center => "C",
            Anchor::MiddleLeft => "ML",
            Anchor::MiddleRight => "MR",
            Anchor::TopLeftStem => "TLS",
            Anchor::BottomLeftStem => "BLS",
            Anchor::TopRightStem => "TRS",
            Anchor::BottomRightStem => "BRS",
        }
    }

    /// True for the four stem attachment corners.
    pub fn is_stem(self) -> bool {
        matches!(
            self,
            Anchor::TopLeftStem
                | Anchor::BottomLeftStem
                | Anchor::TopRightStem
                | Anchor::BottomRightStem
        )
    }
}

/// Fractional offset from the template's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorOffset {
    pub x: f64,
    pub y: f64,
}

impl AnchorOffset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Immutable template of one head shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    shape: Shape,
    family: Family,
    point_size: u32,
    width: usize,
    height: usize,
    slim_bounds: Rect,
    anchors: BTreeMap<Anchor, AnchorOffset>,
    key_points: OnceLock<Vec<KeyPoint>>,
}

impl Template {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        shape: Shape,
        family: Family,
        point_size: u32,
        width: usize,
        height: usize,
        slim_bounds: Rect,
        anchors: BTreeMap<Anchor, AnchorOffset>,
        key_points: Option<Vec<KeyPoint>>,
    ) -> Self {
        debug_assert!(Rect::new(0, 0, width, height).contains_rect(&slim_bounds));
        let cell = OnceLock::new();
        if let Some(points) = key_points {
            let _ = cell.set(points);
        }
        Self {
            shape,
            family,
            point_size,
            width,
            height,
            slim_bounds,
            anchors,
            key_points: cell,
        }
    }

    /// Head shape of this template.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Font family the template was rendered with.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Requested point size.
    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    /// Template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tight symbol bounds within the template.
    pub fn slim_bounds(&self) -> Rect {
        self.slim_bounds
    }

    /// Key points, if they have been populated.
    pub fn key_points(&self) -> Option<&[KeyPoint]> {
        self.key_points.get().map(Vec::as_slice)
    }

    pub(crate) fn key_point_cell(&self) -> &OnceLock<Vec<KeyPoint>> {
        &self.key_points
    }

    /// All anchors of this template.
    pub fn anchors(&self) -> &BTreeMap<Anchor, AnchorOffset> {
        &self.anchors
    }

    /// Offset of `anchor`, if the shape defines it.
    pub fn anchor(&self, anchor: Anchor) -> Option<AnchorOffset> {
        self.anchors.get(&anchor).copied()
    }

    /// Mid-height stem location on `side`: abscissa of that side's stem
    /// anchors, ordinate of the center. `None` for stem-less heads.
    pub fn stem_middle(&self, side: Side) -> Option<AnchorOffset> {
        let top = match side {
            Side::Left => self.anchor(Anchor::TopLeftStem)?,
            Side::Right => self.anchor(Anchor::TopRightStem)?,
        };
        let center = self.anchor(Anchor::Center)?;
        Some(AnchorOffset::new(top.x, center.y))
    }

    /// Upper-left template corner when `anchor` is placed at `(x, y)`.
    pub fn upper_left(&self, x: f64, y: f64, anchor: Option<Anchor>) -> Option<(f64, f64)> {
        match anchor {
            None => Some((x, y)),
            Some(anchor) => {
                let offset = self.anchor(anchor)?;
                Some((x - offset.x, y - offset.y))
            }
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} size:{} {}x{} slim:{}x{}@({},{})",
            self.shape,
            self.family,
            self.point_size,
            self.width,
            self.height,
            self.slim_bounds.width,
            self.slim_bounds.height,
            self.slim_bounds.x,
            self.slim_bounds.y,
        )?;
        if let Some(points) = self.key_points() {
            write!(f, " keyPoints:{}", points.len())?;
        }
        Ok(())
    }
}
