//! Zen Garden: a small community of particles keeping a comfortable
//! distance, linked by threads that fade with separation.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{decay, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const STONES: usize = 25;
const LINK_DISTANCE: f32 = 120.0;
const FADE_ZONE: f32 = 30.0;

struct Stone {
    position: Vec2,
    velocity: Vec2,
    size: f32,
    noise: f32,
    ideal_space: f32,
    clusters: bool,
}

pub struct ZenGarden {
    stones: Vec<Stone>,
    viewport: Viewport,
    time: f32,
    attractor: Option<(Vec2, f32)>,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut rng = seeded(seed);
    let center = viewport.center();
    let stones = (0..STONES)
        .map(|i| {
            let angle = i as f32 / STONES as f32 * TAU;
            let cluster = rng.gen::<f32>();
            let shift = if cluster < 0.3 {
                15.0
            } else if cluster > 0.7 {
                -15.0
            } else {
                0.0
            };
            let radius = rng.gen_range(30.0..90.0) + shift;
            Stone {
                position: center + Vec2::from_angle(angle) * radius,
                velocity: Vec2::new(rng.gen_range(-0.005..0.005), rng.gen_range(-0.005..0.005)),
                size: rng.gen_range(0.6..1.8),
                noise: rng.gen_range(0.0..1000.0),
                ideal_space: rng.gen_range(35.0..50.0),
                clusters: cluster < 0.4,
            }
        })
        .collect();
    Box::new(ZenGarden {
        stones,
        viewport,
        time: 0.0,
        attractor: None,
    })
}

/// Cheap smooth noise in `-1..=1` from layered sines.
fn drift(seed: f32, t: f32) -> Vec2 {
    Vec2::new(
        (seed * 0.37 + t * 1.3).sin() * 0.6 + (seed * 1.91 + t * 2.9).sin() * 0.4,
        (seed * 0.73 + t * 1.7).cos() * 0.6 + (seed * 2.39 + t * 2.3).cos() * 0.4,
    )
}

/// Opacity of the thread between two stones `distance` apart.
fn link_alpha(distance: f32) -> f32 {
    if distance >= LINK_DISTANCE {
        0.0
    } else if distance > LINK_DISTANCE - FADE_ZONE {
        (LINK_DISTANCE - distance) / FADE_ZONE * 0.35
    } else {
        0.35
    }
}

impl ZenGarden {
    fn settle(&mut self, ticks: f32) {
        let count = self.stones.len();
        let mut push = vec![Vec2::ZERO; count];
        for i in 0..count {
            for j in (i + 1)..count {
                let offset = self.stones[j].position - self.stones[i].position;
                let distance = offset.length();
                if distance <= f32::EPSILON {
                    continue;
                }
                let ideal = (self.stones[i].ideal_space + self.stones[j].ideal_space) * 0.5;
                let tolerance = if self.stones[i].clusters && self.stones[j].clusters {
                    0.6
                } else {
                    1.0
                };
                let error = distance - ideal * tolerance;
                if error < 0.0 || distance < LINK_DISTANCE * 0.5 {
                    let force = offset / distance * error * 0.0015;
                    push[i] += force;
                    push[j] -= force;
                }
            }
        }

        let center = self.viewport.center();
        let bound = self.viewport.min_side() * 0.45;
        for (stone, push) in self.stones.iter_mut().zip(push) {
            let mut accel = push + drift(stone.noise, self.time) * 0.004;
            if let Some((point, strength)) = self.attractor {
                accel += (point - stone.position).normalize_or_zero() * 0.02 * strength;
            }
            let from_center = stone.position - center;
            if from_center.length() > bound {
                accel -= from_center.normalize_or_zero() * 0.01;
            }
            stone.velocity = (stone.velocity + accel * ticks) * 0.96f32.powf(ticks);
            stone.position += stone.velocity * ticks;
        }
    }
}

impl Artwork for ZenGarden {
    fn resize(&mut self, viewport: Viewport) {
        let shift = viewport.center() - self.viewport.center();
        for stone in &mut self.stones {
            stone.position += shift;
        }
        self.viewport = viewport;
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let ticks = frame.ticks();
        self.time += 0.0025 * ticks;
        if let Some((_, strength)) = self.attractor.as_mut() {
            *strength = decay(*strength, 0.98, ticks);
        }
        self.settle(ticks);

        let canvas = &mut *surface.canvas;
        canvas.clear(Color::VOID);

        for (i, a) in self.stones.iter().enumerate() {
            for b in &self.stones[i + 1..] {
                let alpha = link_alpha(a.position.distance(b.position));
                if alpha > 0.0 {
                    canvas.line(
                        a.position.x,
                        a.position.y,
                        b.position.x,
                        b.position.y,
                        Color::OCHRE.with_alpha(alpha),
                    );
                }
            }
        }
        for stone in &self.stones {
            let glow = 0.6 + 0.4 * (self.time * 40.0 + stone.noise).sin().abs();
            canvas.fill_circle(stone.position.x, stone.position.y, stone.size * 2.0, Color::TAN.with_alpha(glow));
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        if event.is_press() {
            self.attractor = Some((event.position(), 1.0));
        } else if let Some((point, _)) = self.attractor.as_mut() {
            *point = event.position();
        }
    }
}
