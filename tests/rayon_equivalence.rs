#![cfg(feature = "rayon")]

use headtpl::{BuildConfig, Catalog, Family, SyntheticRenderer, TemplateBuilder};

#[test]
fn parallel_catalog_matches_sequential() {
    let sequential =
        TemplateBuilder::new(SyntheticRenderer::default(), BuildConfig::default()).unwrap();
    let parallel = TemplateBuilder::new(
        SyntheticRenderer::default(),
        BuildConfig {
            parallel: true,
            ..BuildConfig::default()
        },
    )
    .unwrap();

    for family in [Family::Bravura, Family::JazzPerc] {
        let seq = Catalog::build(&sequential, family, 40).unwrap();
        let par = Catalog::build(&parallel, family, 40).unwrap();
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a, b);
        }
    }
}
