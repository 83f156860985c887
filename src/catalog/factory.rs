//! Lazily populated registry of catalogs.
//!
//! The registry maps `family -> point size -> slot`. A slot is inserted under
//! the write lock on first request and filled through `OnceLock`, so callers
//! racing on one key all wait for the same build and receive the same
//! `Arc<Catalog>`. Entries are never evicted.

use super::Catalog;
use crate::render::SymbolRenderer;
use crate::shape::Family;
use crate::template::TemplateBuilder;
use crate::trace::trace_debug;
use crate::util::{HeadTplError, HeadTplResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

type Slot = Arc<OnceLock<Arc<Catalog>>>;

/// Thread-safe get-or-build cache of catalogs.
pub struct TemplateFactory<R> {
    builder: TemplateBuilder<R>,
    catalogs: RwLock<HashMap<Family, BTreeMap<u32, Slot>>>,
}

impl<R: SymbolRenderer> TemplateFactory<R> {
    /// Creates an empty factory building with `builder`.
    pub fn new(builder: TemplateBuilder<R>) -> Self {
        Self {
            builder,
            catalogs: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the template builder.
    pub fn builder(&self) -> &TemplateBuilder<R> {
        &self.builder
    }

    /// Returns the catalog for `(family, point_size)`, building it on first
    /// request. At most one catalog is ever built per key.
    pub fn catalog(&self, family: Family, point_size: u32) -> HeadTplResult<Arc<Catalog>> {
        if point_size == 0 {
            return Err(HeadTplError::InvalidPointSize { point_size });
        }
        let slot = self.slot(family, point_size);
        let catalog = slot.get_or_init(|| {
            trace_debug!(
                "catalog_miss",
                family = family.name(),
                point_size = point_size
            );
            Arc::new(Catalog::collect(&self.builder, family, point_size))
        });
        Ok(Arc::clone(catalog))
    }

    /// Returns the catalog for `(family, point_size)` only if already built.
    pub fn cached(&self, family: Family, point_size: u32) -> Option<Arc<Catalog>> {
        let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
        catalogs
            .get(&family)
            .and_then(|sizes| sizes.get(&point_size))
            .and_then(|slot| slot.get())
            .cloned()
    }

    /// Number of catalogs built so far.
    pub fn len(&self) -> usize {
        let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
        catalogs
            .values()
            .flat_map(BTreeMap::values)
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// True when no catalog has been built yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point sizes already built for `family`, ascending.
    pub fn point_sizes(&self, family: Family) -> Vec<u32> {
        let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
        catalogs
            .get(&family)
            .map(|sizes| {
                sizes
                    .iter()
                    .filter(|(_, slot)| slot.get().is_some())
                    .map(|(&size, _)| size)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Looks the slot up under the read lock, inserting it under the write
    /// lock on a miss.
    fn slot(&self, family: Family, point_size: u32) -> Slot {
        {
            let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = catalogs.get(&family).and_then(|sizes| sizes.get(&point_size)) {
                return Arc::clone(slot);
            }
        }
        let mut catalogs = self.catalogs.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            catalogs
                .entry(family)
                .or_default()
                .entry(point_size)
                .or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateFactory;
    use crate::render::SyntheticRenderer;
    use crate::shape::Family;
    use crate::template::{BuildConfig, TemplateBuilder};
    use crate::util::HeadTplError;
    use std::sync::Arc;

    fn factory() -> TemplateFactory<SyntheticRenderer> {
        let builder = TemplateBuilder::new(SyntheticRenderer::default(), BuildConfig::default())
            .expect("default config");
        TemplateFactory::new(builder)
    }

    #[test]
    fn catalogs_are_cached_per_key() {
        let factory = factory();
        assert!(factory.is_empty());
        assert!(factory.cached(Family::Bravura, 40).is_none());

        let first = factory.catalog(Family::Bravura, 40).unwrap();
        let again = factory.catalog(Family::Bravura, 40).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&first, &factory.cached(Family::Bravura, 40).unwrap()));

        let other = factory.catalog(Family::Leland, 40).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(factory.len(), 2);
        assert_eq!(factory.point_sizes(Family::Bravura), vec![40]);
    }

    #[test]
    fn zero_point_size_is_rejected() {
        let factory = factory();
        assert_eq!(
            factory.catalog(Family::Bravura, 0).unwrap_err(),
            HeadTplError::InvalidPointSize { point_size: 0 }
        );
        assert!(factory.is_empty());
    }
}
