use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ardgallery",
    author,
    version,
    about = "ARD generative art gallery",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Gallery config file; defaults to `gallery.toml` in the config directory.
    #[arg(long, value_name = "PATH", global = true, env = "ARDGALLERY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Initial window size (e.g. `1280x800`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// FPS cap for the gallery window (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Index of the artwork shown first; out-of-range values saturate.
    #[arg(long, value_name = "INDEX")]
    pub start: Option<usize>,

    /// Fixed seed for artwork randomness.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Serve `GET /health` on this address (e.g. `127.0.0.1:5000`).
    #[arg(long, value_name = "ADDR")]
    pub health_addr: Option<String>,
}

impl RunArgs {
    /// Fills flags missing here from `outer`, the ones given before the
    /// `run` subcommand. Flags given to `run` win.
    pub fn or(self, outer: &RunArgs) -> RunArgs {
        RunArgs {
            size: self.size.or(outer.size),
            fps: self.fps.or(outer.fps),
            start: self.start.or(outer.start),
            seed: self.seed.or(outer.seed),
            health_addr: self.health_addr.or_else(|| outer.health_addr.clone()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the gallery window (the default).
    Run(RunArgs),
    /// Print the artwork catalog.
    List,
    /// Print the health response body once and exit.
    Health,
    /// Render one artwork headless to a PNG file.
    Snapshot(SnapshotArgs),
    /// Print the resolved config directory and file.
    Where,
}

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Artwork slug (e.g. `zen-garden`) or catalog index.
    #[arg(long, value_name = "SLUG|INDEX")]
    pub artwork: String,

    /// Seconds of animation to run before capturing.
    #[arg(long, value_name = "SECONDS", default_value_t = 2.0)]
    pub time: f32,

    /// Output image size.
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_surface_size,
        default_value = "640x400"
    )]
    pub size: (u32, u32),

    /// Seed for the artwork; falls back to the config seed.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Destination PNG.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 1280x800".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in size '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in size '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err("dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}
