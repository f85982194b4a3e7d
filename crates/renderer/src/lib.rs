//! Renderer crate for the ARD gallery.
//!
//! Glues the winit window, the animation host that drives artwork units and
//! the `wgpu` presenter together. The overall flow is:
//!
//! ```text
//!   CLI / ardgallery
//!          │ RendererConfig + Catalog
//!          ▼
//!   Renderer::run ──▶ GalleryWindow ──▶ winit event loop ──▶ render()
//!                          │                                   │
//!                          ├─▶ Navigator ─▶ GallerySelection    ├─▶ AnimationHost::frame ─▶ Canvas
//!                          │                 │ SelectionChange  ├─▶ shell::draw (chrome)
//!                          └─────────────────┴─▶ host.mount     └─▶ GpuPresenter::present
//! ```
//!
//! Artworks draw into a CPU canvas; the window composes chrome on top and
//! uploads the result as one texture per frame. `snapshot` runs the same
//! host headless on a fixed clock.

mod glyphs;
mod gpu;
mod host;
mod input;
mod runtime;
mod shell;
mod snapshot;
mod types;
mod window;

use anyhow::Result;
use artworks::Catalog;

pub use host::{
    mount_settled, AnimationHost, Failure, FrameRequest, FrameScheduler, HostError, ManualFrames,
};
pub use runtime::{
    BoxedTimeSource, FixedStepSource, FramePacer, SystemTimeSource, TimeSample, TimeSource,
};
pub use shell::{window_title, ChromeHit, ChromeLayout, Rect};
pub use snapshot::{
    render_snapshot, save_snapshot, SnapshotOptions, DEFAULT_SNAPSHOT_SEED, MAX_SNAPSHOT_SECONDS,
};
pub use types::RendererConfig;

/// Entry point used by the binary to open the gallery.
pub struct Renderer {
    config: RendererConfig,
    catalog: Catalog,
}

impl Renderer {
    pub fn new(config: RendererConfig, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and blocks until the user closes it.
    pub fn run(self) -> Result<()> {
        tracing::info!(
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            artworks = self.catalog.len(),
            "launching gallery window"
        );
        window::run(self.config, self.catalog)
    }
}
