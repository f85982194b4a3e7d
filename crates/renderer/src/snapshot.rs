//! Headless rendering of a single artwork, used by `ardgallery snapshot`.
//!
//! The unit runs on a fixed 60 Hz clock so the same artwork, time, size and
//! seed always produce the same image.

use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use artworks::{ArtworkDescriptor, PointerState, Viewport, MAX_DIMENSION};
use image::RgbaImage;
use tracing::{debug, info};

use crate::host::{AnimationHost, ManualFrames};
use crate::runtime::{FixedStepSource, TimeSource};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SNAPSHOT_SEED: u64 = 7;

/// Longest stretch of animation a snapshot will simulate.
pub const MAX_SNAPSHOT_SECONDS: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotOptions {
    /// Seconds of animation to run before capturing.
    pub time: f32,
    pub size: Viewport,
    pub seed: u64,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            time: 2.0,
            size: Viewport::new(640, 400),
            seed: DEFAULT_SNAPSHOT_SEED,
        }
    }
}

impl SnapshotOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_SNAPSHOT_SECONDS).contains(&self.time) {
            bail!(
                "snapshot time {}s is outside 0..={MAX_SNAPSHOT_SECONDS}s",
                self.time
            );
        }
        let Viewport { width, height } = self.size;
        if width == 0 || height == 0 {
            bail!("snapshot size {width}x{height} is empty");
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            bail!("snapshot size {width}x{height} exceeds the {MAX_DIMENSION}px edge limit");
        }
        Ok(())
    }
}

/// Mounts `descriptor`, steps it up to `options.time` and returns the last
/// frame. Times and sizes out of range are rejected rather than clamped.
pub fn render_snapshot(descriptor: &ArtworkDescriptor, options: &SnapshotOptions) -> Result<RgbaImage> {
    options.validate()?;
    let origin = Instant::now();
    let mut clock = FixedStepSource::sixty_hz(origin);
    let frames = clock.frames_until(options.time);

    let mut host = AnimationHost::new(ManualFrames::new(), options.size, Some(options.seed));
    host.mount(descriptor, origin)
        .with_context(|| format!("failed to mount '{}'", descriptor.slug))?;

    for _ in 0..frames {
        let sample = clock.sample();
        host.frame(sample.at, PointerState::default())
            .with_context(|| format!("'{}' failed at {:.3}s", descriptor.slug, sample.seconds))?;
    }

    let canvas = host
        .canvas()
        .ok_or_else(|| anyhow!("'{}' has no surface to capture", descriptor.slug))?;
    debug!(
        slug = descriptor.slug,
        frames,
        width = canvas.width(),
        height = canvas.height(),
        "captured snapshot"
    );
    RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.as_bytes().to_vec())
        .ok_or_else(|| anyhow!("canvas buffer does not match its dimensions"))
}

/// Renders a snapshot and writes it as PNG.
pub fn save_snapshot(descriptor: &ArtworkDescriptor, options: &SnapshotOptions, path: &Path) -> Result<()> {
    let image = render_snapshot(descriptor, options)?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    info!(
        slug = descriptor.slug,
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "wrote snapshot"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use artworks::Catalog;

    fn small(time: f32) -> SnapshotOptions {
        SnapshotOptions {
            time,
            size: Viewport::new(96, 64),
            seed: 3,
        }
    }

    #[test]
    fn snapshot_matches_requested_size() {
        let catalog = Catalog::standard();
        for descriptor in catalog.iter() {
            let image = render_snapshot(descriptor, &small(0.5)).expect("snapshot");
            assert_eq!(image.dimensions(), (96, 64), "{}", descriptor.slug);
        }
    }

    #[test]
    fn snapshots_are_deterministic() {
        let catalog = Catalog::standard();
        let descriptor = catalog.find("zen-garden").expect("zen garden");
        let first = render_snapshot(descriptor, &small(1.0)).expect("first");
        let second = render_snapshot(descriptor, &small(1.0)).expect("second");
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn zero_sized_snapshot_is_an_error() {
        let catalog = Catalog::standard();
        let descriptor = catalog.get(0).expect("first artwork");
        let options = SnapshotOptions {
            size: Viewport::new(0, 64),
            ..small(0.0)
        };
        assert!(render_snapshot(descriptor, &options).is_err());
    }

    #[test]
    fn saved_snapshot_is_a_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dew.png");
        let catalog = Catalog::standard();
        let descriptor = catalog.find("morning-dew").expect("morning dew");
        save_snapshot(descriptor, &small(0.25), &path).expect("save");

        let decoded = image::open(&path).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (96, 64));
    }

    #[test]
    fn out_of_range_time_is_rejected() {
        let catalog = Catalog::standard();
        let descriptor = catalog.get(0).expect("first artwork");
        for time in [MAX_SNAPSHOT_SECONDS + 1.0, 1e30, f32::INFINITY, f32::NAN, -1.0] {
            let err = render_snapshot(descriptor, &small(time)).unwrap_err();
            assert!(err.to_string().contains("snapshot time"), "{time}: {err}");
        }
        assert!(small(MAX_SNAPSHOT_SECONDS).validate().is_ok());
    }

    #[test]
    fn oversized_snapshot_is_rejected() {
        let catalog = Catalog::standard();
        let descriptor = catalog.get(0).expect("first artwork");
        let options = SnapshotOptions {
            size: Viewport::new(MAX_DIMENSION + 1, 64),
            ..small(0.0)
        };
        let err = render_snapshot(descriptor, &options).unwrap_err();
        assert!(err.to_string().contains("edge limit"), "{err}");
    }
}
