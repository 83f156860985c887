mod common;

use common::SolidRenderer;
use headtpl::{
    BuildConfig, Family, HeadTplResult, Rendering, Shape, SymbolRenderer, SyntheticRenderer,
    TemplateBuilder, TemplateFactory, HEADS,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Counts renders to detect duplicate catalog builds.
struct CountingRenderer {
    inner: SolidRenderer,
    renders: AtomicUsize,
}

impl SymbolRenderer for CountingRenderer {
    fn render(
        &self,
        shape: Shape,
        family: Family,
        point_size: u32,
    ) -> HeadTplResult<Option<Rendering>> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        self.inner.render(shape, family, point_size)
    }
}

#[test]
fn concurrent_requests_share_one_catalog() {
    let renderer = CountingRenderer {
        inner: SolidRenderer {
            side: 10,
            missing: None,
        },
        renders: AtomicUsize::new(0),
    };
    let builder = TemplateBuilder::new(renderer, BuildConfig::default()).unwrap();
    let factory = Arc::new(TemplateFactory::new(builder));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let factory = Arc::clone(&factory);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                factory.catalog(Family::Bravura, 32).unwrap()
            })
        })
        .collect();
    let catalogs: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    for catalog in &catalogs[1..] {
        assert!(Arc::ptr_eq(&catalogs[0], catalog));
    }
    assert_eq!(factory.len(), 1);
    // One render per head shape: the catalog was built exactly once.
    assert_eq!(
        factory.builder().renderer().renders.load(Ordering::SeqCst),
        HEADS.len()
    );
}

#[test]
fn distinct_keys_build_distinct_catalogs_concurrently() {
    let builder = TemplateBuilder::new(SyntheticRenderer::default(), BuildConfig::default()).unwrap();
    let factory = Arc::new(TemplateFactory::new(builder));
    let keys = [
        (Family::Bravura, 24),
        (Family::Leland, 24),
        (Family::Bravura, 28),
        (Family::MusicalSymbols, 24),
    ];

    let handles: Vec<_> = keys
        .iter()
        .flat_map(|&key| [key, key])
        .map(|(family, size)| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || factory.catalog(family, size).unwrap())
        })
        .collect();
    for handle in handles {
        let catalog = handle.join().unwrap();
        let cached = factory
            .cached(catalog.family(), catalog.point_size())
            .expect("cached after build");
        assert!(Arc::ptr_eq(&catalog, &cached));
    }

    assert_eq!(factory.len(), keys.len());
    assert_eq!(factory.point_sizes(Family::Bravura), vec![24, 28]);
}
