use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use artworks::{Canvas, Catalog, Color, PointerEvent, PointerState, Viewport};
use crossbeam_channel::Receiver;
use selection::{GallerySelection, NavAction, NavInput, Navigator, SelectionChange};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use tracing::{debug, error, info, trace, warn};

use crate::gpu::GpuPresenter;
use crate::host::{self, AnimationHost, FrameRequest, FrameScheduler};
use crate::input::{self, PointerMapping};
use crate::runtime::{BoxedTimeSource, FramePacer, SystemTimeSource};
use crate::shell::{self, ChromeLayout, ShellView};
use crate::types::RendererConfig;

/// Frame scheduler backed by the window's redraw requests.
///
/// At most one frame is outstanding; the event loop turns it into a
/// `request_redraw` once the pacer allows.
#[derive(Debug, Default)]
pub(crate) struct WindowFrames {
    next_id: u64,
    pending: Option<FrameRequest>,
}

impl WindowFrames {
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl FrameScheduler for WindowFrames {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest::new(self.next_id);
        self.next_id += 1;
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

/// Everything the gallery window owns. The GPU surface is declared first
/// so it is dropped before the window it renders into.
struct GalleryWindow {
    gpu: GpuPresenter,
    window: Arc<Window>,
    catalog: Catalog,
    selection: GallerySelection,
    changes: Receiver<SelectionChange>,
    navigator: Navigator,
    host: AnimationHost<WindowFrames>,
    clock: BoxedTimeSource,
    pacer: FramePacer,
    pointer: PointerState,
    cursor: Option<PhysicalPosition<f64>>,
    mapping: PointerMapping,
    layout: ChromeLayout,
    composed: Option<Canvas>,
    needs_paint: bool,
}

impl GalleryWindow {
    fn new(window: Arc<Window>, config: &RendererConfig, catalog: Catalog) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuPresenter::new(window.as_ref(), size)?;
        let now = Instant::now();
        let mut selection =
            GallerySelection::new(catalog.len(), config.start, config.navigation.transition)?;
        let changes = selection.subscribe();
        let navigator = Navigator::from_config(&config.navigation, now);
        let viewport = viewport_of(size);
        let host = AnimationHost::new(WindowFrames::default(), viewport, config.seed);

        let mut state = Self {
            gpu,
            window,
            layout: ChromeLayout::new(viewport.width, viewport.height, catalog.len()),
            catalog,
            selection,
            changes,
            navigator,
            host,
            clock: Box::new(SystemTimeSource::new()),
            pacer: FramePacer::new(config.target_fps),
            pointer: PointerState::default(),
            cursor: None,
            mapping: PointerMapping::new(size, viewport),
            composed: None,
            needs_paint: true,
        };
        state.mount_current(now);
        Ok(state)
    }

    fn mount_current(&mut self, now: Instant) {
        let index = self.selection.current();
        let Some(descriptor) = self.catalog.get(index).copied() else {
            return;
        };
        self.window.set_title(&shell::window_title(&descriptor));
        if let Err(err) = self.host.mount(&descriptor, now) {
            warn!(index, error = %err, "artwork could not be mounted");
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        let viewport = self.host.viewport();
        self.mapping = PointerMapping::new(self.window.inner_size(), viewport);
        if viewport.is_empty() {
            return;
        }
        self.layout = ChromeLayout::new(viewport.width, viewport.height, self.catalog.len());
        let composed = match self.composed.take() {
            Some(mut canvas) => canvas.resize(viewport.width, viewport.height).map(|_| canvas),
            None => Canvas::new(viewport.width, viewport.height),
        };
        self.composed = composed
            .map_err(|err| warn!(error = %err, "failed to allocate composition buffer"))
            .ok();
        self.needs_paint = true;
    }

    fn navigate(&mut self, input: NavInput, now: Instant) {
        let was_visible = self.navigator.chrome().is_visible();
        let action = self
            .navigator
            .handle(input, &mut self.selection, now);
        if action != NavAction::Nothing || was_visible != self.navigator.chrome().is_visible() {
            self.needs_paint = true;
        }
    }

    fn pointer_event(&mut self, event: PointerEvent) {
        self.pointer.apply(&event);
        if !self.navigator.chrome().is_menu_open() {
            self.host.dispatch(event);
        }
    }

    /// Routes a press to the chrome when it hits a control, otherwise to
    /// the artwork.
    fn press(&mut self, point: glam::Vec2, event: PointerEvent, now: Instant) -> bool {
        match self.layout.hit_test(point, self.navigator.chrome()) {
            Some(hit) => {
                let input = hit.nav_input().unwrap_or(NavInput::PointerMoved);
                self.navigate(input, now);
                true
            }
            None => {
                self.navigate(NavInput::PointerMoved, now);
                self.pointer_event(event);
                false
            }
        }
    }

    fn handle_touch(&mut self, touch: Touch, now: Instant) {
        let point = self.mapping.to_canvas(touch.location);
        let y = touch.location.y as f32;
        match touch.phase {
            TouchPhase::Started => {
                if !self.press(point, PointerEvent::TouchStart(point), now) {
                    self.navigate(NavInput::TouchStart { y }, now);
                }
            }
            TouchPhase::Moved => self.pointer_event(PointerEvent::Moved(point)),
            TouchPhase::Ended => {
                self.navigate(NavInput::TouchEnd { y }, now);
                self.pointer_event(PointerEvent::TouchEnd(point));
            }
            TouchPhase::Cancelled => self.pointer_event(PointerEvent::TouchEnd(point)),
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>, now: Instant) {
        self.gpu.resize(size);
        let viewport = viewport_of(size);
        if let Err(err) = self.host.resize(viewport) {
            warn!(%viewport, error = %err, "artwork could not follow the resize");
        }
        if self.host.mounted().is_none() && !viewport.is_empty() {
            debug!(%viewport, "remounting artwork after resize");
            self.mount_current(now);
        } else {
            self.relayout();
        }
    }

    /// Advances deadlines: settles transitions and hides idle chrome.
    fn tick(&mut self, now: Instant) {
        if self.navigator.tick(now) {
            self.needs_paint = true;
        }
        let settled = host::mount_settled(
            &mut self.host,
            &mut self.selection,
            &self.changes,
            &self.catalog,
            now,
        );
        if let Some(descriptor) = settled {
            self.window.set_title(&shell::window_title(&descriptor));
            self.relayout();
        }
    }

    fn wants_redraw(&self) -> bool {
        if self.composed.is_none() || self.host.requested_viewport().is_empty() {
            return false;
        }
        self.needs_paint || (self.host.wants_frame() && self.host.scheduler().is_pending())
    }

    /// Steps the artwork, composes the chrome and presents. Returns
    /// `false` when the surface is unusable and the gallery should close.
    fn render(&mut self) -> bool {
        let sample = self.clock.sample();
        let now = sample.at;
        if let Err(err) = self.host.frame(now, self.pointer) {
            debug!(error = %err, "artwork stopped animating");
        }

        let Some(composed) = self.composed.as_mut() else {
            return true;
        };
        match self.host.canvas() {
            Some(canvas) if self.host.failure().is_none() => composed.copy_from(canvas),
            _ => composed.clear(Color::VOID),
        }
        let view = ShellView {
            catalog: &self.catalog,
            selection: &self.selection,
            chrome: self.navigator.chrome(),
            failure: self.host.failure(),
        };
        shell::draw(composed, &self.layout, &view);

        self.pacer.mark_rendered(now);
        self.needs_paint = false;
        match self.gpu.present(composed) {
            Ok(()) => {
                trace!(frame = sample.frame_index, "presented frame");
                true
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                self.needs_paint = true;
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory; closing gallery");
                false
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout; retrying next frame");
                self.needs_paint = true;
                true
            }
            Err(other) => {
                warn!(error = ?other, "surface error; retrying next frame");
                self.needs_paint = true;
                true
            }
        }
    }

    fn schedule(&mut self, elwt: &EventLoopWindowTarget<()>) {
        let now = Instant::now();
        let mut wake = [
            self.selection.next_deadline(),
            self.navigator.chrome().hide_deadline(),
        ]
        .into_iter()
        .flatten()
        .min();

        if self.wants_redraw() {
            if self.pacer.ready_for_frame(now) {
                trace!("scheduler: issuing redraw now");
                self.window.request_redraw();
            } else if let Some(deadline) = self.pacer.next_deadline() {
                wake = Some(wake.map_or(deadline, |other| other.min(deadline)));
            }
        }

        match wake {
            Some(deadline) => {
                trace!(
                    deadline_ms = deadline.saturating_duration_since(now).as_millis() as u64,
                    "scheduler: waiting"
                );
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            None => elwt.set_control_flow(ControlFlow::Wait),
        }
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        let now = Instant::now();
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = input::pressed_key(event.state, &event.logical_key) {
                    self.navigate(NavInput::Key(key), now);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
                self.navigate(NavInput::PointerMoved, now);
                let point = self.mapping.to_canvas(position);
                self.pointer_event(PointerEvent::Moved(point));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.pointer.position = None;
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let Some(position) = self.cursor else {
                    return;
                };
                let point = self.mapping.to_canvas(position);
                match state {
                    ElementState::Pressed => {
                        self.press(point, PointerEvent::Pressed(point), now);
                    }
                    ElementState::Released => self.pointer_event(PointerEvent::Released(point)),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = input::wheel_delta(delta);
                self.navigate(NavInput::Wheel { delta_y }, now);
            }
            WindowEvent::Touch(touch) => self.handle_touch(touch, now),
            WindowEvent::Resized(size) => self.resize(size, now),
            WindowEvent::RedrawRequested => {
                if !self.render() {
                    elwt.exit();
                }
            }
            _ => {}
        }
    }
}

fn viewport_of(size: PhysicalSize<u32>) -> Viewport {
    Viewport::new(size.width, size.height)
}

/// Opens the gallery window and blocks until it is closed.
pub(crate) fn run(config: RendererConfig, catalog: Catalog) -> Result<()> {
    if catalog.is_empty() {
        return Err(anyhow!("the gallery has no artworks to show"));
    }
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title("ARD")
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create gallery window: {err}"))?;
    let window = Arc::new(window);

    let mut state = GalleryWindow::new(window, &config, catalog)
        .map_err(|err| anyhow!("failed to initialise gallery window: {err:#}"))?;
    info!(
        artworks = state.catalog.len(),
        start = state.selection.current(),
        fps = ?config.target_fps,
        "gallery window ready"
    );

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                state.handle_window_event(event, elwt);
            }
            Event::AboutToWait => {
                state.tick(Instant::now());
                state.schedule(elwt);
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
