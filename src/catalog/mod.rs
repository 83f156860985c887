//! Per (family, point size) collections of head templates.
//!
//! A catalog is built eagerly for every shape of `HEADS` and is never
//! mutated afterwards. Shapes the renderer cannot draw, or whose holes cannot
//! be resolved, are simply absent.

pub mod factory;

pub use factory::TemplateFactory;

use crate::render::SymbolRenderer;
use crate::shape::{Family, Shape, HEADS};
use crate::template::{Template, TemplateBuilder};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{HeadTplError, HeadTplResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::collections::HashMap;

type ShapeResult = (Shape, HeadTplResult<Option<Template>>);

/// Templates of all head shapes for one family at one point size.
#[derive(Debug)]
pub struct Catalog {
    family: Family,
    point_size: u32,
    templates: HashMap<Shape, Template>,
}

impl Catalog {
    /// Builds the template of every head shape.
    pub fn build<R: SymbolRenderer>(
        builder: &TemplateBuilder<R>,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Self> {
        if point_size == 0 {
            return Err(HeadTplError::InvalidPointSize { point_size });
        }
        Ok(Self::collect(builder, family, point_size))
    }

    /// Builds all shapes; `point_size` must already be validated.
    pub(crate) fn collect<R: SymbolRenderer>(
        builder: &TemplateBuilder<R>,
        family: Family,
        point_size: u32,
    ) -> Self {
        let _span = trace_span!(
            "build_catalog",
            family = family.name(),
            point_size = point_size
        )
        .entered();

        let results = build_shapes(builder, family, point_size);
        let mut templates = HashMap::with_capacity(results.len());
        for (shape, result) in results {
            match result {
                Ok(Some(template)) => {
                    templates.insert(shape, template);
                }
                Ok(None) => {}
                Err(err) => {
                    trace_warn!(
                        "shape_build_failed",
                        shape = shape.name(),
                        family = family.name(),
                        reason = err.to_string().as_str()
                    );
                }
            }
        }

        trace_event!(
            "catalog_built",
            family = family.name(),
            point_size = point_size,
            templates = templates.len()
        );
        Self {
            family,
            point_size,
            templates,
        }
    }

    /// Family of this catalog.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Point size of this catalog.
    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    /// Template of `shape`, if one could be built.
    pub fn template(&self, shape: Shape) -> Option<&Template> {
        self.templates.get(&shape)
    }

    /// Number of templates held.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when no shape produced a template.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates over the templates in `HEADS` order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> + '_ {
        HEADS.iter().filter_map(|shape| self.templates.get(shape))
    }
}

#[cfg(feature = "rayon")]
fn build_shapes<R: SymbolRenderer>(
    builder: &TemplateBuilder<R>,
    family: Family,
    point_size: u32,
) -> Vec<ShapeResult> {
    if builder.config().parallel {
        HEADS
            .par_iter()
            .map(|&shape| (shape, builder.build(shape, family, point_size)))
            .collect()
    } else {
        build_shapes_seq(builder, family, point_size)
    }
}

#[cfg(not(feature = "rayon"))]
fn build_shapes<R: SymbolRenderer>(
    builder: &TemplateBuilder<R>,
    family: Family,
    point_size: u32,
) -> Vec<ShapeResult> {
    build_shapes_seq(builder, family, point_size)
}

fn build_shapes_seq<R: SymbolRenderer>(
    builder: &TemplateBuilder<R>,
    family: Family,
    point_size: u32,
) -> Vec<ShapeResult> {
    HEADS
        .iter()
        .map(|&shape| (shape, builder.build(shape, family, point_size)))
        .collect()
}
