//! Anchor placement on the slim symbol box.
//!
//! Every head gets its center and its middle left/right points. Heads that
//! can take a stem also get a top and a bottom attachment point on each side,
//! shifted horizontally by `stem_dx * width` (negative means inside the box)
//! at ordinates that depend on the head engraving.

use super::{Anchor, AnchorOffset, Side};
use crate::image::Rect;
use crate::shape::Shape;
use std::collections::BTreeMap;

/// Computes the anchors of `shape` for the slim box `slim`.
pub fn place_anchors(
    shape: Shape,
    slim: Rect,
    stem_dx: f64,
    stem_dy: f64,
) -> BTreeMap<Anchor, AnchorOffset> {
    let mut anchors = BTreeMap::new();
    let (cx, cy) = slim.center();
    let x = slim.x as f64;
    let w = slim.width as f64;

    anchors.insert(Anchor::Center, AnchorOffset::new(cx, cy));
    anchors.insert(Anchor::MiddleLeft, AnchorOffset::new(x, cy));
    anchors.insert(Anchor::MiddleRight, AnchorOffset::new(x + w, cy));

    if shape.is_stem_less() {
        return anchors;
    }

    let dx = stem_dx * w;
    let left = x - dx;
    let right = x + w + dx;

    anchors.insert(
        Anchor::TopLeftStem,
        AnchorOffset::new(left, stem_top(shape, slim, Side::Left, stem_dy)),
    );
    anchors.insert(
        Anchor::BottomLeftStem,
        AnchorOffset::new(left, stem_bottom(shape, slim, Side::Left, stem_dy)),
    );
    anchors.insert(
        Anchor::TopRightStem,
        AnchorOffset::new(right, stem_top(shape, slim, Side::Right, stem_dy)),
    );
    anchors.insert(
        Anchor::BottomRightStem,
        AnchorOffset::new(right, stem_bottom(shape, slim, Side::Right, stem_dy)),
    );
    anchors
}

/// Ordinate of the upper end of the stem attachment on `side`.
pub fn stem_top(shape: Shape, slim: Rect, side: Side, stem_dy: f64) -> f64 {
    use Shape::*;
    let y = slim.y as f64;
    let h = slim.height as f64;
    match shape {
        NoteheadBlack | NoteheadBlackSmall | NoteheadVoid | NoteheadVoidSmall => match side {
            Side::Left => y + 0.5 * h,
            Side::Right => y - stem_dy * h,
        },
        NoteheadCross => match side {
            Side::Left => y + 0.2 * h,
            Side::Right => y,
        },
        NoteheadDiamondFilled | NoteheadDiamondVoid => y + h / 2.0,
        NoteheadCrossVoid | NoteheadTriangleDownFilled | NoteheadTriangleDownVoid => y,
        _ => y - stem_dy * h,
    }
}

/// Ordinate of the lower end of the stem attachment on `side`.
pub fn stem_bottom(shape: Shape, slim: Rect, side: Side, stem_dy: f64) -> f64 {
    use Shape::*;
    let y = slim.y as f64;
    let h = slim.height as f64;
    match shape {
        NoteheadBlack | NoteheadBlackSmall | NoteheadVoid | NoteheadVoidSmall => match side {
            Side::Left => y + h * (1.0 + stem_dy),
            Side::Right => y + 0.5 * h,
        },
        NoteheadCross => match side {
            Side::Left => y + h,
            Side::Right => y + (1.0 - 0.2) * h,
        },
        NoteheadCrossVoid => y + h,
        NoteheadDiamondFilled | NoteheadDiamondVoid => y + h / 2.0,
        NoteheadTriangleDownFilled | NoteheadTriangleDownVoid => y,
        _ => y + h * (1.0 + stem_dy),
    }
}

#[cfg(test)]
mod tests {
    use super::{place_anchors, stem_bottom, stem_top};
    use crate::image::Rect;
    use crate::shape::Shape;
    use crate::template::{Anchor, AnchorOffset, Side};

    const SLIM: Rect = Rect::new(2, 4, 20, 10);

    #[test]
    fn stem_less_heads_get_three_anchors() {
        let anchors = place_anchors(Shape::WholeNote, SLIM, -0.1, -0.2);
        assert_eq!(anchors.len(), 3);
        assert_eq!(anchors[&Anchor::Center], AnchorOffset::new(12.0, 9.0));
        assert_eq!(anchors[&Anchor::MiddleLeft], AnchorOffset::new(2.0, 9.0));
        assert_eq!(anchors[&Anchor::MiddleRight], AnchorOffset::new(22.0, 9.0));
    }

    #[test]
    fn black_head_stems_sit_inside_the_box() {
        let anchors = place_anchors(Shape::NoteheadBlack, SLIM, -0.1, -0.2);
        assert_eq!(anchors.len(), 7);
        let tl = anchors[&Anchor::TopLeftStem];
        let bl = anchors[&Anchor::BottomLeftStem];
        let tr = anchors[&Anchor::TopRightStem];
        let br = anchors[&Anchor::BottomRightStem];
        assert!((tl.x - 4.0).abs() < 1e-9);
        assert!((tr.x - 20.0).abs() < 1e-9);
        assert!((tl.y - 9.0).abs() < 1e-9);
        assert!((bl.y - 12.0).abs() < 1e-9);
        assert!((tr.y - 6.0).abs() < 1e-9);
        assert!((br.y - 9.0).abs() < 1e-9);
    }

    #[test]
    fn motif_specific_ordinates() {
        let dy = -0.2;
        assert_eq!(stem_top(Shape::NoteheadCross, SLIM, Side::Left, dy), 6.0);
        assert_eq!(stem_bottom(Shape::NoteheadCross, SLIM, Side::Right, dy), 12.0);
        assert_eq!(stem_top(Shape::NoteheadDiamondVoid, SLIM, Side::Right, dy), 9.0);
        assert_eq!(stem_bottom(Shape::NoteheadTriangleDownVoid, SLIM, Side::Left, dy), 4.0);
        assert_eq!(stem_top(Shape::NoteheadCrossVoid, SLIM, Side::Left, dy), 4.0);
        assert_eq!(stem_bottom(Shape::NoteheadCrossVoid, SLIM, Side::Left, dy), 14.0);
        assert!((stem_top(Shape::NoteheadCircleX, SLIM, Side::Left, dy) - 6.0).abs() < 1e-9);
        assert!((stem_bottom(Shape::NoteheadCircleX, SLIM, Side::Right, dy) - 12.0).abs() < 1e-9);
    }
}
