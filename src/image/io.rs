//! Convenience helpers for glyph rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{Raster, Rgba};
use crate::template::decorate::DecoratedImage;
use crate::util::{HeadTplError, HeadTplResult};
use std::path::Path;

/// Creates an owned raster from an RGBA image buffer.
pub fn raster_from_rgba(img: &image::RgbaImage) -> HeadTplResult<Raster> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .pixels()
        .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
        .collect();
    Raster::from_vec(data, width, height)
}

/// Loads an image from disk and converts it to an RGBA raster.
pub fn load_raster<P: AsRef<Path>>(path: P) -> HeadTplResult<Raster> {
    let img = image::open(path).map_err(|err| HeadTplError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_rgba(&img.to_rgba8())
}

/// Writes a decorated template image; the format follows the extension.
pub fn save_decorated<P: AsRef<Path>>(img: &DecoratedImage, path: P) -> HeadTplResult<()> {
    let buffer = image::RgbImage::from_raw(
        img.width() as u32,
        img.height() as u32,
        img.as_raw().to_vec(),
    )
    .ok_or(HeadTplError::BufferTooSmall {
        needed: img.width() * img.height() * 3,
        got: img.as_raw().len(),
    })?;
    buffer.save(path).map_err(|err| HeadTplError::ImageIo {
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{load_raster, raster_from_rgba, save_decorated};
    use crate::classify::PixelMap;
    use crate::image::{Rect, Rgba};
    use crate::shape::{Family, Shape};
    use crate::template::decorate::decorate;
    use crate::template::{place_anchors, Template};

    #[test]
    fn converts_rgba_buffer() {
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        let raster = raster_from_rgba(&img).unwrap();
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.get(2, 1), Some(Rgba::new(10, 20, 30, 255)));
        assert_eq!(raster.get(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn decorated_png_reloads_as_opaque_raster() {
        let classes = PixelMap::from_ascii(&["....", ".##.", "...."]).unwrap();
        let slim = Rect::new(1, 1, 2, 1);
        let anchors = place_anchors(Shape::WholeNote, slim, -0.1, -0.2);
        let tpl = Template::new(
            Shape::WholeNote,
            Family::Leland,
            12,
            4,
            3,
            slim,
            anchors,
            Some(Vec::new()),
        );
        let img = decorate(&tpl, &classes, 4).unwrap();
        let path = std::env::temp_dir().join(format!("headtpl-io-{}.png", std::process::id()));
        save_decorated(&img, &path).unwrap();
        let raster = load_raster(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(raster.width(), img.width());
        assert_eq!(raster.height(), img.height());
        assert_eq!(raster.get(0, 0), Some(Rgba::new(128, 128, 128, 255)));
    }
}
