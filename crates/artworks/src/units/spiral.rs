//! Growing Spiral: a phyllotaxis garden inside a breathing mandala.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{pointer_or_center, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, Surface, Viewport};

const GOLDEN_ANGLE: f32 = 2.399_963;
const MAX_SEEDS: usize = 720;
const SEEDS_PER_SECOND: f32 = 90.0;
const LAYERS: usize = 8;

struct Layer {
    radius: f32,
    petals: usize,
    rotation_speed: f32,
    breath: f32,
    color: Color,
}

pub struct GrowingSpiral {
    viewport: Viewport,
    layers: Vec<Layer>,
    breath_phase: f32,
    pointer_radius: f32,
    seeds: usize,
    jitter: Vec<f32>,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    Box::new(GrowingSpiral::new(viewport, seed))
}

impl GrowingSpiral {
    fn new(viewport: Viewport, seed: u64) -> Self {
        let mut rng = seeded(seed);
        let layers = (0..LAYERS)
            .map(|layer| Layer {
                radius: 50.0 + layer as f32 * 30.0,
                petals: 6 + layer * 2,
                rotation_speed: 0.01 + layer as f32 * 0.002,
                breath: 10.0 + layer as f32 * 5.0,
                color: Color::rgb(
                    139 - layer as u8 * 5,
                    115 - layer as u8 * 3,
                    85 + layer as u8 * 10,
                ),
            })
            .collect();
        let jitter = (0..MAX_SEEDS).map(|_| rng.gen_range(0.85..1.15)).collect();
        Self {
            viewport,
            layers,
            breath_phase: 0.0,
            pointer_radius: 0.0,
            seeds: 0,
            jitter,
        }
    }

    fn fit(&self) -> f32 {
        // Outermost layer at full breath should still fit the canvas.
        let outer = 50.0 + (LAYERS as f32 - 1.0) * 30.0;
        (self.viewport.min_side() * 0.48 / (outer * 1.3 + 45.0)).min(1.0)
    }
}

impl Artwork for GrowingSpiral {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let ticks = frame.ticks();
        let center = self.viewport.center();
        let fit = self.fit();

        self.breath_phase += 0.02 * ticks;
        let breath = self.breath_phase.sin() * 0.3 + 1.0;
        let target = pointer_or_center(frame.pointer.position, self.viewport).distance(center);
        self.pointer_radius += (target - self.pointer_radius) * (0.1 * ticks).min(1.0);
        let sway = (self.pointer_radius / (self.viewport.width.max(1) as f32 * 0.5)).min(1.0);
        self.seeds = ((frame.seconds() * SEEDS_PER_SECOND) as usize).min(self.jitter.len());

        let canvas = &mut *surface.canvas;
        canvas.fade(Color::VOID, 30.0 / 255.0);
        canvas.fill_circle(center.x, center.y, 20.0 * breath * fit, Color::rgba(0, 0, 0, 150));

        let spin = frame.index as f32;
        for (index, layer) in self.layers.iter().enumerate() {
            let rotation = spin * layer.rotation_speed + sway * (spin * 0.05).sin() * 0.5;
            let radius = (layer.radius * breath + (self.breath_phase * 2.0 + index as f32).sin() * layer.breath) * fit;
            let petal = (15.0 + index as f32 * 3.0) * breath * fit * 0.5;
            let intensity = 0.5 + 0.5 * (self.breath_phase + index as f32 * 0.4).sin().abs();
            for p in 0..layer.petals {
                let angle = rotation + TAU / layer.petals as f32 * p as f32;
                let at = center + Vec2::from_angle(angle) * radius;
                canvas.stroke_circle(at.x, at.y, petal, layer.color.scaled(intensity + 0.3).with_alpha(0.45));
            }
        }

        // Seeds sprout outward one by one along the golden angle.
        let spacing = 4.2 * fit;
        for n in 0..self.seeds {
            let angle = n as f32 * GOLDEN_ANGLE + spin * 0.002;
            let radius = spacing * (n as f32).sqrt() * self.jitter[n] * breath.sqrt();
            let at = center + Vec2::from_angle(angle) * radius;
            let age = (self.seeds - n) as f32 / MAX_SEEDS as f32;
            let size = (1.0 + age * 2.5) * fit.max(0.3);
            canvas.fill_circle(at.x, at.y, size, Color::TAN.with_alpha(0.35 + age * 0.5));
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.jitter = Vec::new();
        self.seeds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Canvas, PointerState};
    use std::time::Duration;

    #[test]
    fn seed_count_grows_then_caps() {
        let viewport = Viewport::new(300, 300);
        let mut art = GrowingSpiral::new(viewport, 4);
        let mut canvas = Canvas::new(300, 300).unwrap();
        let mut frame = Frame {
            elapsed: Duration::from_secs(1),
            delta: Duration::from_millis(16),
            index: 60,
            pointer: PointerState::default(),
            viewport,
        };
        art.step(&frame, &mut Surface::flat(&mut canvas)).unwrap();
        assert_eq!(art.seeds, 90);
        frame.elapsed = Duration::from_secs(600);
        art.step(&frame, &mut Surface::flat(&mut canvas)).unwrap();
        assert_eq!(art.seeds, MAX_SEEDS);

        art.teardown();
        art.step(&frame, &mut Surface::flat(&mut canvas)).unwrap();
        assert_eq!(art.seeds, 0);
    }

    #[test]
    fn fit_shrinks_for_small_canvases() {
        let mut art = GrowingSpiral {
            viewport: Viewport::new(2000, 2000),
            layers: Vec::new(),
            breath_phase: 0.0,
            pointer_radius: 0.0,
            seeds: 0,
            jitter: Vec::new(),
        };
        assert_eq!(art.fit(), 1.0);
        art.resize(Viewport::new(100, 100));
        assert!(art.fit() < 0.2);
    }
}
