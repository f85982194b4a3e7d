//! Empty Canvas: eight point sources interfering on a dark field; a touch
//! adds a ninth that fades away.

use glam::Vec2;

use super::decay;
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const WAVELENGTH: f32 = 25.0;
const TIME_STEP: f32 = 0.012;
const INFLUENCE_DECAY: f32 = 0.95;
const CELL: usize = 4;

pub struct EmptyCanvas {
    sources: Vec<Vec2>,
    viewport: Viewport,
    time: f32,
    touch: Vec2,
    influence: f32,
}

pub fn build(viewport: Viewport, _seed: u64) -> Box<dyn Artwork> {
    Box::new(EmptyCanvas {
        sources: sources_for(viewport),
        viewport,
        time: 0.0,
        touch: viewport.center(),
        influence: 0.0,
    })
}

fn sources_for(viewport: Viewport) -> Vec<Vec2> {
    let (w, h) = (viewport.width as f32, viewport.height as f32);
    vec![
        Vec2::new(w / 2.0, h / 2.0),
        Vec2::new(w / 4.0, h / 4.0),
        Vec2::new(3.0 * w / 4.0, h / 4.0),
        Vec2::new(w / 4.0, 3.0 * h / 4.0),
        Vec2::new(3.0 * w / 4.0, 3.0 * h / 4.0),
        Vec2::new(w / 2.0, h / 5.0),
        Vec2::new(w / 2.0, 4.0 * h / 5.0),
        Vec2::new(w / 5.0, h / 2.0),
    ]
}

impl EmptyCanvas {
    fn amplitude(&self, point: Vec2) -> f32 {
        let k = std::f32::consts::TAU / WAVELENGTH;
        let mut sum: f32 = self
            .sources
            .iter()
            .map(|source| (point.distance(*source) * k - self.time * 6.0).sin())
            .sum();
        if self.influence > 0.001 {
            sum += (point.distance(self.touch) * k - self.time * 8.0).sin() * self.influence * 3.0;
        }
        sum / (self.sources.len() as f32 + 3.0 * self.influence)
    }
}

impl Artwork for EmptyCanvas {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.sources = sources_for(viewport);
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let ticks = frame.ticks();
        self.time += TIME_STEP * ticks;
        self.influence = decay(self.influence, INFLUENCE_DECAY, ticks);
        if let Some(position) = frame.pointer.position {
            self.touch = position;
        }

        let canvas = &mut *surface.canvas;
        canvas.clear(Color::VOID);
        let cols = self.viewport.width as usize / CELL + 1;
        let rows = self.viewport.height as usize / CELL + 1;
        for row in 0..rows {
            for col in 0..cols {
                let origin = Vec2::new((col * CELL) as f32, (row * CELL) as f32);
                let value = self.amplitude(origin + Vec2::splat(CELL as f32 * 0.5));
                // Only the crests light up; troughs stay in the void.
                let crest = (value * 0.5 + 0.5).powi(3);
                if crest > 0.05 {
                    canvas.fill_rect(
                        origin.x,
                        origin.y,
                        CELL as f32 - 1.0,
                        CELL as f32 - 1.0,
                        Color::TAN.with_alpha(crest * 0.6),
                    );
                }
            }
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.touch = event.position();
        if event.is_press() {
            self.influence = 1.0;
        }
    }

    fn teardown(&mut self) {
        self.sources.clear();
    }
}
