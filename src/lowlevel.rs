//! Low-level building blocks of the template pipeline.
//!
//! These are the stages `TemplateBuilder` chains together, exposed for custom
//! pipelines and for match-time distance sampling with the same kernel. Most
//! users should prefer `TemplateFactory` and `TemplateBuilder`.

pub use crate::classify::binarize;
pub use crate::distance::ChamferKernel;
pub use crate::fill::FloodFiller;
pub use crate::shape::{HeadDuration, HeadMotif, SHAPES_WITH_HOLES, STEM_LESS_HEADS};
pub use crate::template::decorate::decorate;
pub use crate::template::{place_anchors, stem_bottom, stem_top};
