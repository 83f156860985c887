//! headtpl builds notehead templates for optical music recognition.
//!
//! A template is the signed chamfer distance field of a rendered notehead,
//! sampled sparsely around the symbol, plus anchor points for stem alignment.
//! Templates are grouped per (font family, point size) in catalogs held by a
//! thread-safe `TemplateFactory`, with optional parallel catalog builds via
//! the `rayon` feature.

pub mod catalog;
pub mod classify;
pub mod distance;
pub mod fill;
pub mod image;
pub mod lowlevel;
pub mod render;
pub mod shape;
pub mod template;
mod trace;
pub mod util;

pub use catalog::{Catalog, TemplateFactory};
pub use classify::{PixelClass, PixelMap};
pub use distance::DistanceTable;
pub use image::{ImageView, Raster, Rect, Rgba};
pub use render::{Rendering, SymbolRenderer, SyntheticRenderer};
pub use shape::{Family, Shape, HEADS};
pub use template::decorate::DecoratedImage;
pub use template::{
    Anchor, AnchorOffset, BuildConfig, KeyPoint, Side, Template, TemplateBuilder,
};
pub use util::{HeadTplError, HeadTplResult};
