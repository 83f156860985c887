use clap::Parser;
use headtpl::image::io::save_decorated;
use headtpl::{
    BuildConfig, Catalog, Family, KeyPoint, Shape, SyntheticRenderer, Template, TemplateBuilder,
    TemplateFactory, HEADS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Notehead template builder (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BuildConfigJson {
    binarization_threshold: u8,
    min_cells_per_side: usize,
    stem_dx: f64,
    stem_dy: f64,
    reference_point_size: u32,
    max_raw_distance: u32,
    retry_multiplier: u32,
    max_retries: u32,
    prepopulate_key_points: bool,
    parallel: bool,
}

impl Default for BuildConfigJson {
    fn default() -> Self {
        let cfg = BuildConfig::default();
        Self {
            binarization_threshold: cfg.binarization_threshold,
            min_cells_per_side: cfg.min_cells_per_side,
            stem_dx: cfg.stem_dx,
            stem_dy: cfg.stem_dy,
            reference_point_size: cfg.reference_point_size,
            max_raw_distance: cfg.max_raw_distance,
            retry_multiplier: cfg.retry_multiplier,
            max_retries: cfg.max_retries,
            prepopulate_key_points: cfg.prepopulate_key_points,
            parallel: cfg.parallel,
        }
    }
}

impl From<BuildConfigJson> for BuildConfig {
    fn from(value: BuildConfigJson) -> Self {
        Self {
            binarization_threshold: value.binarization_threshold,
            min_cells_per_side: value.min_cells_per_side,
            stem_dx: value.stem_dx,
            stem_dy: value.stem_dy,
            reference_point_size: value.reference_point_size,
            max_raw_distance: value.max_raw_distance,
            retry_multiplier: value.retry_multiplier,
            max_retries: value.max_retries,
            prepopulate_key_points: value.prepopulate_key_points,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    families: Vec<String>,
    min_point_size: u32,
    max_point_size: Option<u32>,
    shapes: Option<Vec<String>>,
    build: BuildConfigJson,
    output_path: Option<String>,
    decorate_dir: Option<String>,
    zoom: usize,
    include_key_points: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            families: Vec::new(),
            min_point_size: 80,
            max_point_size: None,
            shapes: None,
            build: BuildConfigJson::default(),
            output_path: None,
            decorate_dir: None,
            zoom: 50,
            include_key_points: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct RectRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Serialize)]
struct TemplateRecord {
    shape: &'static str,
    width: usize,
    height: usize,
    slim_bounds: RectRecord,
    anchors: BTreeMap<&'static str, [f64; 2]>,
    key_point_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_points: Option<Vec<[i64; 3]>>,
}

impl TemplateRecord {
    fn new(template: &Template, key_points: &[KeyPoint], include_points: bool) -> Self {
        let slim = template.slim_bounds();
        Self {
            shape: template.shape().name(),
            width: template.width(),
            height: template.height(),
            slim_bounds: RectRecord {
                x: slim.x,
                y: slim.y,
                width: slim.width,
                height: slim.height,
            },
            anchors: template
                .anchors()
                .iter()
                .map(|(anchor, offset)| (anchor.abbreviation(), [offset.x, offset.y]))
                .collect(),
            key_point_count: key_points.len(),
            key_points: include_points.then(|| {
                key_points
                    .iter()
                    .map(|kp| [kp.x as i64, kp.y as i64, i64::from(kp.distance)])
                    .collect()
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct CatalogRecord {
    family: &'static str,
    point_size: u32,
    templates: Vec<TemplateRecord>,
    missing: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct Output {
    catalogs: Vec<CatalogRecord>,
}

fn parse_families(names: &[String]) -> Result<Vec<Family>, Box<dyn std::error::Error>> {
    if names.is_empty() {
        return Ok(Family::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| Family::from_name(name).ok_or_else(|| format!("unknown family {name}").into()))
        .collect()
}

fn parse_shapes(names: Option<&[String]>) -> Result<Vec<Shape>, Box<dyn std::error::Error>> {
    let Some(names) = names else {
        return Ok(HEADS.to_vec());
    };
    names
        .iter()
        .map(|name| {
            Shape::from_name(name).ok_or_else(|| format!("unknown head shape {name}").into())
        })
        .collect()
}

fn report_catalog(
    factory: &TemplateFactory<SyntheticRenderer>,
    catalog: &Catalog,
    shapes: &[Shape],
    include_points: bool,
) -> Result<CatalogRecord, Box<dyn std::error::Error>> {
    let mut templates = Vec::new();
    let mut missing = Vec::new();
    for &shape in shapes {
        match catalog.template(shape) {
            Some(template) => {
                let points = factory.builder().populate_key_points(template)?;
                templates.push(TemplateRecord::new(template, points, include_points));
            }
            None => missing.push(shape.name()),
        }
    }
    Ok(CatalogRecord {
        family: catalog.family().name(),
        point_size: catalog.point_size(),
        templates,
        missing,
    })
}

fn write_decorations(
    builder: &TemplateBuilder<SyntheticRenderer>,
    dir: &Path,
    family: Family,
    point_size: u32,
    shapes: &[Shape],
    zoom: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = dir.join(format!("{}-{}", family.name(), point_size));
    fs::create_dir_all(&dir)?;
    for &shape in shapes {
        if let Some((_, image)) = builder.decorated(shape, family, point_size, zoom)? {
            save_decorated(&image, dir.join(format!("{}.png", shape.name())))?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("headtpl=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    let min_size = config.min_point_size;
    let max_size = config.max_point_size.unwrap_or(min_size);
    if min_size == 0 || max_size < min_size {
        return Err("point size range must be non-empty and start above 0".into());
    }
    if config.zoom == 0 {
        return Err("zoom must be at least 1".into());
    }
    let families = parse_families(&config.families)?;
    let shapes = parse_shapes(config.shapes.as_deref())?;

    let builder = TemplateBuilder::new(SyntheticRenderer::default(), config.build.into())?;
    let factory = TemplateFactory::new(builder);

    let mut catalogs = Vec::new();
    for &family in &families {
        for point_size in min_size..=max_size {
            let catalog = factory.catalog(family, point_size)?;
            tracing::info!(
                family = family.name(),
                point_size,
                templates = catalog.len(),
                "catalog ready"
            );
            catalogs.push(report_catalog(
                &factory,
                &catalog,
                &shapes,
                config.include_key_points,
            )?);
            if let Some(dir) = &config.decorate_dir {
                write_decorations(
                    factory.builder(),
                    Path::new(dir),
                    family,
                    point_size,
                    &shapes,
                    config.zoom,
                )?;
            }
        }
    }

    let output = Output { catalogs };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
