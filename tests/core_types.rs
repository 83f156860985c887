use headtpl::lowlevel::{binarize, FloodFiller, SHAPES_WITH_HOLES, STEM_LESS_HEADS};
use headtpl::{
    Family, HeadTplError, ImageView, PixelClass, PixelMap, Raster, Rect, Rgba, Shape, HEADS,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        HeadTplError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        HeadTplError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );

    let err = ImageView::new(&data[..3], 2, 2, 2).err().unwrap();
    assert_eq!(err, HeadTplError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let roi = view.roi(Rect::new(1, 1, 2, 2)).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0), Some(&data[5..7]));
    assert_eq!(roi.get(1, 1), Some(&10));
    assert_eq!(roi.get(2, 0), None);

    let err = view.roi(Rect::new(3, 3, 2, 1)).err().unwrap();
    assert_eq!(
        err,
        HeadTplError::OutOfBounds {
            x: 4,
            y: 3,
            width: 4,
            height: 4,
        }
    );
}

#[test]
fn binarize_respects_view_stride() {
    let mut raster = Raster::new(5, 3).unwrap();
    raster.set(1, 1, Rgba::BLACK);
    raster.set(2, 1, Rgba::ink(100));
    raster.set(3, 1, Rgba::WHITE);
    let view = raster.view().roi(Rect::new(1, 1, 3, 1)).unwrap();
    let map = binarize(view, 140);
    assert_eq!(
        map.as_slice(),
        &[
            PixelClass::Foreground,
            PixelClass::Background,
            PixelClass::Background,
        ]
    );
}

#[test]
fn flood_fill_handles_large_regions_without_recursion() {
    let size = 1000;
    let mut map = PixelMap::filled(size, size, PixelClass::Background).unwrap();
    let mut filler = FloodFiller::new(&mut map);
    let changed = filler.fill(0, 0, PixelClass::Background, PixelClass::Hole);
    assert_eq!(changed, size * size);
    assert_eq!(map.count(PixelClass::Hole), size * size);
}

#[test]
fn flood_fill_is_four_connected() {
    let mut map = PixelMap::from_ascii(&[
        "..#..",
        ".#.#.",
        "#...#",
        ".#.#.",
        "..#..",
    ])
    .unwrap();
    let mut filler = FloodFiller::new(&mut map);
    assert_eq!(filler.fill(2, 2, PixelClass::Background, PixelClass::Hole), 5);
    assert_eq!(filler.fill(2, 2, PixelClass::Hole, PixelClass::Hole), 0);
    assert_eq!(filler.fill(0, 2, PixelClass::Background, PixelClass::Hole), 0);
    assert!(map.is(0, 0, PixelClass::Background));
    assert!(map.is(2, 1, PixelClass::Hole));
}

#[test]
fn adjust_only_rewrites_isolated_pixels() {
    let mut map = PixelMap::from_ascii(&["###", "#.#", "###", "..#"]).unwrap();
    let mut filler = FloodFiller::new(&mut map);
    assert!(filler.adjust(1, 1, PixelClass::Hole));
    assert!(!filler.adjust(0, 3, PixelClass::Hole));
    assert!(!filler.adjust(1, 1, PixelClass::Hole));
    assert!(map.is(1, 1, PixelClass::Hole));
    assert!(map.is(0, 3, PixelClass::Background));
}

#[test]
fn shape_tables_have_expected_membership() {
    assert_eq!(HEADS.len(), 24);
    assert_eq!(SHAPES_WITH_HOLES.len(), 19);
    assert_eq!(STEM_LESS_HEADS.len(), 12);
    assert!(Shape::NoteheadVoid.has_holes());
    assert!(!Shape::NoteheadBlack.has_holes());
    assert!(Shape::Breve.is_stem_less());
    assert!(Shape::WholeNoteCircleX.is_stem_less());
    assert!(!Shape::NoteheadDiamondVoid.is_stem_less());
    assert_eq!(Family::from_name("BRAVURA"), Some(Family::Bravura));
    assert_eq!(Family::ALL.len(), 5);
}
