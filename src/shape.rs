//! Notehead shapes, music font families and the static shape tables.
//!
//! Membership of every table below mirrors the head classification used by
//! the recognizer: which heads carry interior holes, which never take a stem,
//! and where hole seeds sit inside the slim symbol box.

use crate::image::Rect;

/// Notehead shapes handled by template matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape {
    // Duration 2.
    Breve,
    BreveSmall,
    BreveCross,
    BreveDiamond,
    BreveTriangleDown,
    BreveCircleX,
    // Duration 1.
    WholeNote,
    WholeNoteSmall,
    WholeNoteCross,
    WholeNoteDiamond,
    WholeNoteTriangleDown,
    WholeNoteCircleX,
    // Duration 1/2.
    NoteheadVoid,
    NoteheadVoidSmall,
    NoteheadCrossVoid,
    NoteheadDiamondVoid,
    NoteheadTriangleDownVoid,
    NoteheadCircleXVoid,
    // Duration 1/4.
    NoteheadBlack,
    NoteheadBlackSmall,
    NoteheadCross,
    NoteheadDiamondFilled,
    NoteheadTriangleDownFilled,
    NoteheadCircleX,
}

/// All head shapes, in catalog order.
pub const HEADS: [Shape; 24] = [
    Shape::Breve,
    Shape::BreveSmall,
    Shape::BreveCross,
    Shape::BreveDiamond,
    Shape::BreveTriangleDown,
    Shape::BreveCircleX,
    Shape::WholeNote,
    Shape::WholeNoteSmall,
    Shape::WholeNoteCross,
    Shape::WholeNoteDiamond,
    Shape::WholeNoteTriangleDown,
    Shape::WholeNoteCircleX,
    Shape::NoteheadVoid,
    Shape::NoteheadVoidSmall,
    Shape::NoteheadCrossVoid,
    Shape::NoteheadDiamondVoid,
    Shape::NoteheadTriangleDownVoid,
    Shape::NoteheadCircleXVoid,
    Shape::NoteheadBlack,
    Shape::NoteheadBlackSmall,
    Shape::NoteheadCross,
    Shape::NoteheadDiamondFilled,
    Shape::NoteheadTriangleDownFilled,
    Shape::NoteheadCircleX,
];

/// Heads whose rendering encloses background.
pub const SHAPES_WITH_HOLES: [Shape; 19] = [
    Shape::Breve,
    Shape::BreveSmall,
    Shape::BreveCross,
    Shape::BreveDiamond,
    Shape::BreveTriangleDown,
    Shape::BreveCircleX,
    Shape::WholeNote,
    Shape::WholeNoteSmall,
    Shape::WholeNoteCross,
    Shape::WholeNoteDiamond,
    Shape::WholeNoteTriangleDown,
    Shape::WholeNoteCircleX,
    Shape::NoteheadVoid,
    Shape::NoteheadVoidSmall,
    Shape::NoteheadCrossVoid,
    Shape::NoteheadDiamondVoid,
    Shape::NoteheadTriangleDownVoid,
    Shape::NoteheadCircleXVoid,
    Shape::NoteheadCircleX,
];

/// Heads that never take a stem: breves and wholes.
pub const STEM_LESS_HEADS: [Shape; 12] = [
    Shape::Breve,
    Shape::BreveSmall,
    Shape::BreveCross,
    Shape::BreveDiamond,
    Shape::BreveTriangleDown,
    Shape::BreveCircleX,
    Shape::WholeNote,
    Shape::WholeNoteSmall,
    Shape::WholeNoteCross,
    Shape::WholeNoteDiamond,
    Shape::WholeNoteTriangleDown,
    Shape::WholeNoteCircleX,
];

/// Graphical family of a head, independent of its duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeadMotif {
    Oval,
    Small,
    Cross,
    Diamond,
    Triangle,
    Circle,
}

/// Head duration class, used to pick the drawing style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeadDuration {
    Breve,
    Whole,
    Half,
    Quarter,
}

impl Shape {
    /// Upper-snake name, as used in reports and file names.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Breve => "BREVE",
            Shape::BreveSmall => "BREVE_SMALL",
            Shape::BreveCross => "BREVE_CROSS",
            Shape::BreveDiamond => "BREVE_DIAMOND",
            Shape::BreveTriangleDown => "BREVE_TRIANGLE_DOWN",
            Shape::BreveCircleX => "BREVE_CIRCLE_X",
            Shape::WholeNote => "WHOLE_NOTE",
            Shape::WholeNoteSmall => "WHOLE_NOTE_SMALL",
            Shape::WholeNoteCross => "WHOLE_NOTE_CROSS",
            Shape::WholeNoteDiamond => "WHOLE_NOTE_DIAMOND",
            Shape::WholeNoteTriangleDown => "WHOLE_NOTE_TRIANGLE_DOWN",
            Shape::WholeNoteCircleX => "WHOLE_NOTE_CIRCLE_X",
            Shape::NoteheadVoid => "NOTEHEAD_VOID",
            Shape::NoteheadVoidSmall => "NOTEHEAD_VOID_SMALL",
            Shape::NoteheadCrossVoid => "NOTEHEAD_CROSS_VOID",
            Shape::NoteheadDiamondVoid => "NOTEHEAD_DIAMOND_VOID",
            Shape::NoteheadTriangleDownVoid => "NOTEHEAD_TRIANGLE_DOWN_VOID",
            Shape::NoteheadCircleXVoid => "NOTEHEAD_CIRCLE_X_VOID",
            Shape::NoteheadBlack => "NOTEHEAD_BLACK",
            Shape::NoteheadBlackSmall => "NOTEHEAD_BLACK_SMALL",
            Shape::NoteheadCross => "NOTEHEAD_CROSS",
            Shape::NoteheadDiamondFilled => "NOTEHEAD_DIAMOND_FILLED",
            Shape::NoteheadTriangleDownFilled => "NOTEHEAD_TRIANGLE_DOWN_FILLED",
            Shape::NoteheadCircleX => "NOTEHEAD_CIRCLE_X",
        }
    }

    /// Parses an upper-snake name back into a shape.
    pub fn from_name(name: &str) -> Option<Shape> {
        HEADS.iter().copied().find(|shape| shape.name() == name)
    }

    /// True for heads whose rendering encloses background.
    pub fn has_holes(self) -> bool {
        SHAPES_WITH_HOLES.contains(&self)
    }

    /// True for heads that never take a stem.
    pub fn is_stem_less(self) -> bool {
        STEM_LESS_HEADS.contains(&self)
    }

    /// True for cue/grace sized heads.
    pub fn is_small(self) -> bool {
        self.motif() == HeadMotif::Small
    }

    /// Graphical family of the head.
    pub fn motif(self) -> HeadMotif {
        use Shape::*;
        match self {
            Breve | WholeNote | NoteheadVoid | NoteheadBlack => HeadMotif::Oval,
            BreveSmall | WholeNoteSmall | NoteheadVoidSmall | NoteheadBlackSmall => {
                HeadMotif::Small
            }
            BreveCross | WholeNoteCross | NoteheadCrossVoid | NoteheadCross => HeadMotif::Cross,
            BreveDiamond | WholeNoteDiamond | NoteheadDiamondVoid | NoteheadDiamondFilled => {
                HeadMotif::Diamond
            }
            BreveTriangleDown
            | WholeNoteTriangleDown
            | NoteheadTriangleDownVoid
            | NoteheadTriangleDownFilled => HeadMotif::Triangle,
            BreveCircleX | WholeNoteCircleX | NoteheadCircleXVoid | NoteheadCircleX => {
                HeadMotif::Circle
            }
        }
    }

    /// Duration class of the head.
    pub fn duration(self) -> HeadDuration {
        use Shape::*;
        match self {
            Breve | BreveSmall | BreveCross | BreveDiamond | BreveTriangleDown | BreveCircleX => {
                HeadDuration::Breve
            }
            WholeNote | WholeNoteSmall | WholeNoteCross | WholeNoteDiamond
            | WholeNoteTriangleDown | WholeNoteCircleX => HeadDuration::Whole,
            NoteheadVoid | NoteheadVoidSmall | NoteheadCrossVoid | NoteheadDiamondVoid
            | NoteheadTriangleDownVoid | NoteheadCircleXVoid => HeadDuration::Half,
            NoteheadBlack | NoteheadBlackSmall | NoteheadCross | NoteheadDiamondFilled
            | NoteheadTriangleDownFilled | NoteheadCircleX => HeadDuration::Quarter,
        }
    }

    /// Interior seed points used to locate holes within `slim`.
    ///
    /// Circle-x heads get four seeds on the axes, the breve variant placed
    /// closer to the center because of its side bars; the breve cross gets
    /// three seeds on the horizontal axis; every other head one central seed.
    pub fn hole_seeds(self, slim: Rect) -> Vec<(usize, usize)> {
        let Rect {
            x,
            y,
            width: w,
            height: h,
        } = slim;
        match self {
            Shape::WholeNoteCircleX | Shape::NoteheadCircleXVoid | Shape::NoteheadCircleX => vec![
                (x + w / 4, y + h / 2),
                (x + 3 * w / 4, y + h / 2),
                (x + w / 2, y + h / 4),
                (x + w / 2, y + 3 * h / 4),
            ],
            Shape::BreveCircleX => vec![
                (x + 3 * w / 8, y + h / 2),
                (x + 5 * w / 8, y + h / 2),
                (x + w / 2, y + h / 4),
                (x + w / 2, y + 3 * h / 4),
            ],
            Shape::BreveCross => vec![
                (x + w / 4, y + h / 2),
                (x + w / 2, y + h / 2),
                (x + 3 * w / 4, y + h / 2),
            ],
            _ => vec![(x + w / 2, y + h / 2)],
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Music font families a renderer may draw heads with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Bravura,
    FinaleJazz,
    JazzPerc,
    Leland,
    MusicalSymbols,
}

impl Family {
    /// Every known family.
    pub const ALL: [Family; 5] = [
        Family::Bravura,
        Family::FinaleJazz,
        Family::JazzPerc,
        Family::Leland,
        Family::MusicalSymbols,
    ];

    /// Font family name.
    pub fn name(self) -> &'static str {
        match self {
            Family::Bravura => "Bravura",
            Family::FinaleJazz => "FinaleJazz",
            Family::JazzPerc => "JazzPerc",
            Family::Leland => "Leland",
            Family::MusicalSymbols => "MusicalSymbols",
        }
    }

    /// Parses a family name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Family> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| family.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Family, HeadMotif, Shape, HEADS, SHAPES_WITH_HOLES, STEM_LESS_HEADS};
    use crate::image::Rect;

    #[test]
    fn tables_are_subsets_of_heads() {
        for shape in SHAPES_WITH_HOLES.iter().chain(STEM_LESS_HEADS.iter()) {
            assert!(HEADS.contains(shape));
        }
        let filled_without_holes: Vec<Shape> =
            HEADS.iter().copied().filter(|s| !s.has_holes()).collect();
        assert_eq!(
            filled_without_holes,
            vec![
                Shape::NoteheadBlack,
                Shape::NoteheadBlackSmall,
                Shape::NoteheadCross,
                Shape::NoteheadDiamondFilled,
                Shape::NoteheadTriangleDownFilled,
            ]
        );
    }

    #[test]
    fn names_round_trip() {
        for shape in HEADS {
            assert_eq!(Shape::from_name(shape.name()), Some(shape));
        }
        assert_eq!(Family::from_name("leland"), Some(Family::Leland));
        assert_eq!(Family::from_name("Petaluma"), None);
    }

    #[test]
    fn seed_layouts_follow_motif() {
        let slim = Rect::new(10, 20, 16, 8);
        assert_eq!(Shape::NoteheadVoid.hole_seeds(slim), vec![(18, 24)]);
        assert_eq!(Shape::BreveCross.hole_seeds(slim).len(), 3);
        assert_eq!(
            Shape::BreveCircleX.hole_seeds(slim),
            vec![(16, 24), (20, 24), (18, 22), (18, 26)]
        );
        assert_eq!(Shape::NoteheadCircleX.motif(), HeadMotif::Circle);
    }
}
