//! The gallery's artworks and the contract they share.
//!
//! Each artwork is an [`Artwork`] built from a [`Viewport`] and a seed. The
//! host calls [`Artwork::step`] once per frame with a [`Surface`] to draw
//! on; 3D pieces additionally receive a [`Scene`] holding the camera, the
//! light rig and fog.

mod canvas;
mod catalog;
mod scene;
mod unit;
mod units;

use std::time::Duration;

use glam::Vec2;

pub use canvas::{Canvas, Color, SurfaceError, MAX_DIMENSION};
pub use catalog::{ArtworkDescriptor, ArtworkKind, Catalog, CatalogError, Constructor};
pub use scene::{Camera, Fog, LightRig, Projected, Scene};
pub use unit::{Artwork, ArtworkError, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height) as f32
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Latest known pointer position and button state, in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Option<Vec2>,
    pub pressed: bool,
}

impl PointerState {
    pub fn apply(&mut self, event: &PointerEvent) {
        self.position = Some(event.position());
        match event {
            PointerEvent::Pressed(_) | PointerEvent::TouchStart(_) => self.pressed = true,
            PointerEvent::Released(_) | PointerEvent::TouchEnd(_) => self.pressed = false,
            PointerEvent::Moved(_) => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Pressed(Vec2),
    Released(Vec2),
    TouchStart(Vec2),
    TouchEnd(Vec2),
}

impl PointerEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            PointerEvent::Moved(p)
            | PointerEvent::Pressed(p)
            | PointerEvent::Released(p)
            | PointerEvent::TouchStart(p)
            | PointerEvent::TouchEnd(p) => p,
        }
    }

    /// Clicks and touch starts: the "poke" most artworks react to.
    pub fn is_press(&self) -> bool {
        matches!(self, PointerEvent::Pressed(_) | PointerEvent::TouchStart(_))
    }
}

/// Timing and input handed to a single step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Time since the artwork was mounted.
    pub elapsed: Duration,
    /// Time since the previous step.
    pub delta: Duration,
    pub index: u64,
    pub pointer: PointerState,
    pub viewport: Viewport,
}

impl Frame {
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Step length in units of a 60 Hz frame, capped so a stalled window
    /// does not make simulations jump.
    pub fn ticks(&self) -> f32 {
        (self.delta.as_secs_f32() * 60.0).clamp(0.0, 6.0)
    }
}
