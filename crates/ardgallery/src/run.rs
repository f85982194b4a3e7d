use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use artworks::{Catalog, Viewport};
use galleryconfig::GalleryConfig;
use renderer::{Renderer, RendererConfig, SnapshotOptions, DEFAULT_SNAPSHOT_SEED};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, RunArgs, SnapshotArgs};
use crate::health::{health_body, HealthServer};
use crate::paths::AppPaths;

pub fn run(cli: Cli) -> Result<()> {
    initialise_tracing();

    let paths = AppPaths::discover()?;
    tracing::debug!(
        config = %paths.config_dir().display(),
        "resolved ardgallery paths"
    );

    match cli.command {
        None => run_gallery(&paths, cli.config.as_deref(), &cli.run),
        Some(Command::Run(args)) => {
            run_gallery(&paths, cli.config.as_deref(), &args.or(&cli.run))
        }
        Some(Command::List) => {
            let config = load_config(&paths, cli.config.as_deref())?;
            list(&config)
        }
        Some(Command::Health) => {
            println!("{}", health_body()?);
            Ok(())
        }
        Some(Command::Snapshot(args)) => {
            let config = load_config(&paths, cli.config.as_deref())?;
            snapshot(&config, &args)
        }
        Some(Command::Where) => {
            where_(&paths, cli.config.as_deref());
            Ok(())
        }
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries command output (`list`, `health`, `where`).
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn config_source(paths: &AppPaths, explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| paths.config_file(), Path::to_path_buf)
}

/// Reads the gallery config. An explicit path must exist; the default file
/// is optional and falls back to built-in defaults.
pub fn load_config(paths: &AppPaths, explicit: Option<&Path>) -> Result<GalleryConfig> {
    let path = config_source(paths, explicit);
    if explicit.is_none() && !path.exists() {
        tracing::debug!(path = %path.display(), "no gallery config found; using defaults");
        return Ok(GalleryConfig::default());
    }
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read gallery config {}", path.display()))?;
    let config = GalleryConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid gallery config {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded gallery config");
    Ok(config)
}

/// Applies command-line overrides on top of the file values.
pub fn apply_overrides(config: &mut GalleryConfig, args: &RunArgs) -> Result<()> {
    if let Some((width, height)) = args.size {
        config.display.width = width;
        config.display.height = height;
    }
    if let Some(fps) = args.fps {
        config.display.fps = Some(fps);
    }
    if let Some(start) = args.start {
        config.display.start = start;
    }
    if let Some(seed) = args.seed {
        config.artworks.seed = Some(seed);
    }
    if let Some(addr) = args.health_addr.as_ref() {
        config.health.addr = Some(addr.clone());
    }
    config
        .validate()
        .context("invalid command-line overrides")?;
    Ok(())
}

fn run_gallery(paths: &AppPaths, explicit: Option<&Path>, args: &RunArgs) -> Result<()> {
    let mut config = load_config(paths, explicit)?;
    apply_overrides(&mut config, args)?;

    let catalog = Catalog::from_slugs(&config.artworks.order)
        .context("failed to build artwork catalog")?;
    if let Some(addr) = config.health_addr()? {
        HealthServer::spawn(addr)?;
    }

    let renderer_config = RendererConfig::from_gallery(&config);
    tracing::info!(
        artworks = catalog.len(),
        start = renderer_config.start,
        seed = ?renderer_config.seed,
        "starting ARD gallery"
    );
    Renderer::new(renderer_config, catalog).run()
}

fn list(config: &GalleryConfig) -> Result<()> {
    let catalog = Catalog::from_slugs(&config.artworks.order)?;
    for descriptor in catalog.iter() {
        println!(
            "{:>2}  {}  {:<20}  {:<20}  {}",
            descriptor.index,
            descriptor.kind.badge(),
            descriptor.slug,
            descriptor.title,
            descriptor.technique
        );
    }
    Ok(())
}

fn snapshot(config: &GalleryConfig, args: &SnapshotArgs) -> Result<()> {
    let catalog = Catalog::standard();
    let descriptor = catalog.find(&args.artwork)?;
    let (width, height) = args.size;
    let options = SnapshotOptions {
        time: args.time,
        size: Viewport::new(width, height),
        seed: args
            .seed
            .or(config.artworks.seed)
            .unwrap_or(DEFAULT_SNAPSHOT_SEED),
    };
    renderer::save_snapshot(descriptor, &options, &args.output)?;
    println!("{}", args.output.display());
    Ok(())
}

fn where_(paths: &AppPaths, explicit: Option<&Path>) {
    let file = config_source(paths, explicit);
    let state = if file.exists() { "present" } else { "missing" };
    println!("config dir:  {}", paths.config_dir().display());
    println!("config file: {} ({state})", file.display());
}
