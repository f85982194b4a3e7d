//! Owns the mounted artwork and everything it renders into.
//!
//! At most one unit is mounted at a time. Mounting tears the previous unit
//! down first, so its canvas, scene and outstanding frame request are gone
//! before the next one is built.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use artworks::{
    Artwork, ArtworkDescriptor, ArtworkError, ArtworkKind, Canvas, Catalog, Frame, PointerEvent,
    PointerState, Scene, Surface, SurfaceError, Viewport, MAX_DIMENSION,
};
use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use selection::{GallerySelection, SelectionChange};
use tracing::{debug, error, trace, warn};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to allocate drawing surface: {0}")]
    Surface(#[from] SurfaceError),
    #[error("artwork step failed: {0}")]
    Step(#[from] ArtworkError),
}

/// Handle for one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Source of animation frames: the window's redraw requests, or a manual
/// driver for headless rendering and tests.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Called when a requested frame is about to run.
    fn complete_frame(&mut self, request: FrameRequest) {
        self.cancel_frame(request);
    }
}

/// Scheduler that only records requests; callers decide when frames run.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    outstanding: BTreeSet<FrameRequest>,
    issued: u64,
    cancelled: u64,
    completed: u64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest::new(self.next_id);
        self.next_id += 1;
        self.issued += 1;
        self.outstanding.insert(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.outstanding.remove(&request) {
            self.cancelled += 1;
        }
    }

    fn complete_frame(&mut self, request: FrameRequest) {
        if self.outstanding.remove(&request) {
            self.completed += 1;
        }
    }
}

/// Why the current artwork is not animating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub index: usize,
    pub title: &'static str,
    pub message: String,
}

struct Mounted {
    descriptor: ArtworkDescriptor,
    unit: Box<dyn Artwork>,
    canvas: Canvas,
    scene: Option<Scene>,
    mounted_at: Instant,
    last_frame: Option<Instant>,
    frame_index: u64,
    request: Option<FrameRequest>,
}

/// Provisions the drawing context for the selected artwork and drives its
/// frames.
pub struct AnimationHost<F: FrameScheduler> {
    scheduler: F,
    requested: Viewport,
    seeds: StdRng,
    mounted: Option<Mounted>,
    failure: Option<Failure>,
}

impl<F: FrameScheduler> AnimationHost<F> {
    /// `seed` fixes the sequence of per-mount seeds; entropy when absent.
    pub fn new(scheduler: F, viewport: Viewport, seed: Option<u64>) -> Self {
        let seeds = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            scheduler,
            requested: viewport,
            seeds,
            mounted: None,
            failure: None,
        }
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Last size handed to [`AnimationHost::resize`], possibly empty.
    pub fn requested_viewport(&self) -> Viewport {
        self.requested
    }

    /// Size of the surface units actually draw into.
    pub fn viewport(&self) -> Viewport {
        clamp_viewport(self.requested)
    }

    pub fn mounted(&self) -> Option<&ArtworkDescriptor> {
        self.mounted.as_ref().map(|mounted| &mounted.descriptor)
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.mounted.as_ref().map(|mounted| &mounted.canvas)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.mounted.as_ref().and_then(|mounted| mounted.scene.as_ref())
    }

    /// True while a mounted, healthy unit is waiting for its next frame.
    pub fn wants_frame(&self) -> bool {
        self.failure.is_none()
            && self
                .mounted
                .as_ref()
                .is_some_and(|mounted| mounted.request.is_some())
    }

    pub fn mount(&mut self, descriptor: &ArtworkDescriptor, now: Instant) -> Result<(), HostError> {
        self.unmount();

        let viewport = self.viewport();
        let canvas = match Canvas::new(viewport.width, viewport.height) {
            Ok(canvas) => canvas,
            Err(err) => {
                error!(
                    index = descriptor.index,
                    title = descriptor.title,
                    error = %err,
                    "failed to allocate surface for artwork"
                );
                self.failure = Some(Failure {
                    index: descriptor.index,
                    title: descriptor.title,
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };
        let scene = match descriptor.kind {
            ArtworkKind::Scene3d => Some(Scene::new(viewport)),
            ArtworkKind::Surface2d => None,
        };
        let seed = self.seeds.gen::<u64>();
        let unit = descriptor.instantiate(viewport, seed);
        let request = self.scheduler.request_frame();

        debug!(
            index = descriptor.index,
            title = descriptor.title,
            kind = %descriptor.kind,
            width = viewport.width,
            height = viewport.height,
            "mounted artwork"
        );
        self.mounted = Some(Mounted {
            descriptor: *descriptor,
            unit,
            canvas,
            scene,
            mounted_at: now,
            last_frame: None,
            frame_index: 0,
            request: Some(request),
        });
        Ok(())
    }

    /// Runs one step if a frame was requested. Returns whether a step ran.
    pub fn frame(&mut self, now: Instant, pointer: PointerState) -> Result<bool, HostError> {
        if self.failure.is_some() {
            return Ok(false);
        }
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(false);
        };
        let Some(request) = mounted.request.take() else {
            return Ok(false);
        };
        self.scheduler.complete_frame(request);

        let Mounted {
            descriptor,
            unit,
            canvas,
            scene,
            mounted_at,
            last_frame,
            frame_index,
            request,
        } = mounted;

        let frame = Frame {
            elapsed: now.saturating_duration_since(*mounted_at),
            delta: last_frame.map_or(Duration::ZERO, |last| now.saturating_duration_since(last)),
            index: *frame_index,
            pointer,
            viewport: canvas.viewport(),
        };
        let mut surface = match scene.as_ref() {
            Some(scene) => Surface::with_scene(canvas, scene),
            None => Surface::flat(canvas),
        };
        let started = Instant::now();
        if let Err(err) = unit.step(&frame, &mut surface) {
            error!(
                index = descriptor.index,
                title = descriptor.title,
                error = %err,
                "artwork failed; halting its animation"
            );
            self.failure = Some(Failure {
                index: descriptor.index,
                title: descriptor.title,
                message: err.to_string(),
            });
            return Err(err.into());
        }
        canvas.flush();
        trace!(
            index = descriptor.index,
            frame = frame.index,
            step_us = started.elapsed().as_micros() as u64,
            "artwork step"
        );

        *last_frame = Some(now);
        *frame_index += 1;
        *request = Some(self.scheduler.request_frame());
        Ok(true)
    }

    /// Applies a new viewport. Empty sizes are remembered but leave the
    /// surface untouched.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), HostError> {
        self.requested = viewport;
        if viewport.is_empty() {
            trace!(%viewport, "ignoring empty viewport");
            return Ok(());
        }
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };
        let applied = clamp_viewport(viewport);
        if applied == mounted.canvas.viewport() {
            return Ok(());
        }
        if let Err(err) = mounted.canvas.resize(applied.width, applied.height) {
            self.failure = Some(Failure {
                index: mounted.descriptor.index,
                title: mounted.descriptor.title,
                message: err.to_string(),
            });
            return Err(err.into());
        }
        if let Some(scene) = mounted.scene.as_mut() {
            scene.resize(applied);
        }
        mounted.unit.resize(applied);
        debug!(
            index = mounted.descriptor.index,
            width = applied.width,
            height = applied.height,
            "resized artwork"
        );
        Ok(())
    }

    pub fn dispatch(&mut self, event: PointerEvent) {
        if self.failure.is_some() {
            return;
        }
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.unit.pointer(event);
        }
    }

    pub fn unmount(&mut self) {
        self.failure = None;
        let Some(mut mounted) = self.mounted.take() else {
            return;
        };
        if let Some(request) = mounted.request.take() {
            self.scheduler.cancel_frame(request);
        }
        mounted.unit.teardown();
        debug!(
            index = mounted.descriptor.index,
            title = mounted.descriptor.title,
            frames = mounted.frame_index,
            "unmounted artwork"
        );
    }
}

impl<F: FrameScheduler> Drop for AnimationHost<F> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Settles `selection` at `now` and mounts the artwork it landed on.
///
/// Changes that piled up on `changes` collapse into the last one, so only
/// the final target is ever built. Returns the mounted descriptor when a
/// change was applied; a unit that fails to mount is recorded on the host
/// as a failure and still returned.
pub fn mount_settled<F: FrameScheduler>(
    host: &mut AnimationHost<F>,
    selection: &mut GallerySelection,
    changes: &Receiver<SelectionChange>,
    catalog: &Catalog,
    now: Instant,
) -> Option<ArtworkDescriptor> {
    selection.tick(now);
    let change = changes.try_iter().last()?;
    let descriptor = catalog.get(change.current).copied()?;
    debug!(
        from = change.previous,
        to = change.current,
        title = descriptor.title,
        "mounting selection"
    );
    if let Err(err) = host.mount(&descriptor, now) {
        warn!(index = descriptor.index, error = %err, "artwork could not be mounted");
    }
    Some(descriptor)
}

fn clamp_viewport(viewport: Viewport) -> Viewport {
    Viewport::new(
        viewport.width.min(MAX_DIMENSION),
        viewport.height.min(MAX_DIMENSION),
    )
}
