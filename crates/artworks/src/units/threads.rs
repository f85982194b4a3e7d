//! Emerging Text: sixteen drifting wave sources whose quiet lines, where
//! the summed field crosses zero, read like threads of handwriting.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{decay, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const GRID: usize = 4;
const RESOLUTION: usize = 4;
const THRESHOLD: f32 = 0.18;

struct Source {
    position: Vec2,
    wavelength: f32,
    phase: f32,
    drift: Vec2,
    drift_speed: f32,
}

pub struct EmergingText {
    sources: Vec<Source>,
    viewport: Viewport,
    time: f32,
    touch: Option<(Vec2, f32)>,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut rng = seeded(seed);
    let mut sources = Vec::with_capacity(GRID * GRID);
    for i in 0..GRID {
        for j in 0..GRID {
            sources.push(Source {
                position: Vec2::new(
                    viewport.width as f32 * (i as f32 + 0.5) / GRID as f32,
                    viewport.height as f32 * (j as f32 + 0.5) / GRID as f32,
                ),
                wavelength: rng.gen_range(15.0..25.0),
                phase: rng.gen_range(0.0..TAU),
                drift: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
                drift_speed: rng.gen_range(0.0002..0.0005),
            });
        }
    }
    Box::new(EmergingText {
        sources,
        viewport,
        time: 0.0,
        touch: None,
    })
}

impl EmergingText {
    fn field(&self, point: Vec2) -> f32 {
        let mut amplitude = 0.0;
        for source in &self.sources {
            let distance = point.distance(source.position);
            amplitude += (distance / source.wavelength * TAU - self.time * 0.05 + source.phase).sin();
        }
        if let Some((origin, strength)) = self.touch {
            let distance = point.distance(origin);
            amplitude += (distance / 20.0 * TAU - self.time * 0.1).sin() * strength * 4.0;
        }
        amplitude / self.sources.len().max(1) as f32
    }

    fn wrap(&mut self) {
        let (w, h) = (self.viewport.width as f32, self.viewport.height as f32);
        for source in &mut self.sources {
            if source.position.x < 0.0 {
                source.position.x = w;
            } else if source.position.x > w {
                source.position.x = 0.0;
            }
            if source.position.y < 0.0 {
                source.position.y = h;
            } else if source.position.y > h {
                source.position.y = 0.0;
            }
        }
    }
}

impl Artwork for EmergingText {
    fn resize(&mut self, viewport: Viewport) {
        let old = self.viewport;
        self.viewport = viewport;
        if old.is_empty() {
            return;
        }
        let scale = Vec2::new(
            viewport.width as f32 / old.width as f32,
            viewport.height as f32 / old.height as f32,
        );
        for source in &mut self.sources {
            source.position *= scale;
        }
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let ticks = frame.ticks();
        self.time += ticks;
        for source in &mut self.sources {
            let t = self.time * source.drift_speed + source.phase;
            source.position += Vec2::new(t.sin() * source.drift.x, (t * 0.7).cos() * source.drift.y) * ticks;
        }
        self.wrap();
        if let Some((_, strength)) = self.touch.as_mut() {
            *strength = decay(*strength, 0.97, ticks);
        }
        if self.touch.is_some_and(|(_, strength)| strength < 0.01) {
            self.touch = None;
        }

        let canvas = &mut *surface.canvas;
        canvas.clear(Color::PAPER);
        let ink = Color::UMBER.with_alpha(0.8);

        let cols = self.viewport.width as usize / RESOLUTION + 1;
        let rows = self.viewport.height as usize / RESOLUTION + 1;
        for row in 0..rows {
            for col in 0..cols {
                let point = Vec2::new((col * RESOLUTION) as f32, (row * RESOLUTION) as f32);
                let value = self.field(point);
                if value.abs() < THRESHOLD {
                    let weight = 1.0 - value.abs() / THRESHOLD;
                    canvas.plot(point.x, point.y, ink.with_alpha(0.3 + weight * 0.5));
                    if weight > 0.6 {
                        canvas.plot(point.x + 1.0, point.y, ink.with_alpha(weight * 0.4));
                    }
                }
            }
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        if event.is_press() {
            self.touch = Some((event.position(), 1.0));
        }
    }

    fn teardown(&mut self) {
        self.sources = Vec::new();
    }
}
