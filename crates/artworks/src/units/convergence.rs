//! 3D Memory Rooms: two halves of a disc of particles trade places through
//! a slow convergence, stepping at a fixed 20 Hz regardless of frame rate.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use super::{decay, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const PARTICLES: usize = 6000;
const SIMULATION_STEP: Duration = Duration::from_millis(50);
const MAX_CATCH_UP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Dark,
    Light,
}

struct Particle {
    side: Side,
    angle: f32,
    radius: f32,
    phase: f32,
    speed: f32,
    size: f32,
    position: Vec2,
}

pub struct MemoryRooms {
    particles: Vec<Particle>,
    viewport: Viewport,
    time: f32,
    pending: Duration,
    swirl: Option<(Vec2, f32)>,
    primed: bool,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut rng = seeded(seed);
    let particles = (0..PARTICLES)
        .map(|i| {
            let side = if i < PARTICLES / 2 { Side::Dark } else { Side::Light };
            let raw = rng.gen_range(0.0..PI);
            let angle = match side {
                Side::Dark => raw,
                Side::Light => raw + PI,
            };
            Particle {
                side,
                angle,
                radius: rng.gen::<f32>().sqrt(),
                phase: rng.gen_range(0.0..TAU),
                speed: rng.gen_range(0.005..0.01),
                size: rng.gen_range(0.3..0.7),
                position: Vec2::ZERO,
            }
        })
        .collect();
    let mut rooms = MemoryRooms {
        particles,
        viewport,
        time: 0.0,
        pending: Duration::ZERO,
        swirl: None,
        primed: false,
    };
    rooms.advance();
    Box::new(rooms)
}

impl MemoryRooms {
    fn advance(&mut self) {
        self.time += 0.008 * 60.0 / 20.0;
        let center = self.viewport.center();
        let disc = self.viewport.min_side() * 0.35;
        let ease = if self.primed { 0.25 } else { 1.0 };
        self.primed = true;

        for particle in &mut self.particles {
            // 0 at home, 1 fully converged onto the opposite half.
            let exchange = ((self.time * particle.speed * 20.0 + particle.phase).sin() * 0.5 + 0.5).powi(3);
            let swing = match particle.side {
                Side::Dark => exchange * PI,
                Side::Light => -exchange * PI,
            };
            let breathing = 1.0 + 0.04 * (self.time * 0.7 + particle.phase).sin();
            let angle = particle.angle + swing + self.time * 0.05;
            let mut target = center + Vec2::from_angle(angle) * particle.radius * disc * breathing;

            if let Some((origin, strength)) = self.swirl {
                let offset = target - origin;
                let distance = offset.length();
                if distance < disc && distance > f32::EPSILON {
                    let twist = (1.0 - distance / disc) * strength * 0.8;
                    target = origin + Vec2::from_angle(twist).rotate(offset);
                }
            }
            particle.position += (target - particle.position) * ease;
        }
    }
}

impl Artwork for MemoryRooms {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        self.pending += frame.delta;
        let mut steps = 0;
        while self.pending >= SIMULATION_STEP && steps < MAX_CATCH_UP {
            self.pending -= SIMULATION_STEP;
            self.advance();
            steps += 1;
        }
        if steps == MAX_CATCH_UP {
            self.pending = Duration::ZERO;
        }
        if let Some((_, strength)) = self.swirl.as_mut() {
            *strength = decay(*strength, 0.97, frame.ticks());
        }

        let canvas = &mut *surface.canvas;
        canvas.clear(Color::VOID);
        let dark = Color::rgb(120, 98, 72);
        let light = Color::rgb(232, 224, 208);
        for particle in &self.particles {
            let color = match particle.side {
                Side::Dark => dark,
                Side::Light => light,
            };
            canvas.fill_circle(
                particle.position.x,
                particle.position.y,
                particle.size,
                color.with_alpha(0.55 + particle.size * 0.4),
            );
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        let strength = if event.is_press() {
            1.0
        } else {
            self.swirl.map(|(_, s)| s).unwrap_or(0.0).max(0.15)
        };
        self.swirl = Some((event.position(), strength));
    }

    fn teardown(&mut self) {
        self.particles = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Canvas, PointerState};

    fn rooms() -> MemoryRooms {
        MemoryRooms {
            particles: Vec::new(),
            viewport: Viewport::new(100, 100),
            time: 0.0,
            pending: Duration::ZERO,
            swirl: None,
            primed: false,
        }
    }

    fn frame(delta: Duration) -> Frame {
        Frame {
            elapsed: delta,
            delta,
            index: 0,
            pointer: PointerState::default(),
            viewport: Viewport::new(100, 100),
        }
    }

    #[test]
    fn simulation_steps_at_twenty_hertz() {
        let mut art = rooms();
        let mut canvas = Canvas::new(100, 100).unwrap();
        for _ in 0..3 {
            art.step(&frame(Duration::from_millis(16)), &mut Surface::flat(&mut canvas))
                .unwrap();
        }
        assert_eq!(art.time, 0.0);
        art.step(&frame(Duration::from_millis(16)), &mut Surface::flat(&mut canvas))
            .unwrap();
        assert!(art.time > 0.0);
        assert_eq!(art.pending, Duration::from_millis(14));
    }

    #[test]
    fn long_stall_is_not_replayed() {
        let mut art = rooms();
        let mut canvas = Canvas::new(100, 100).unwrap();
        art.step(&frame(Duration::from_secs(30)), &mut Surface::flat(&mut canvas))
            .unwrap();
        let per_step = 0.008 * 60.0 / 20.0;
        assert!((art.time - per_step * MAX_CATCH_UP as f32).abs() < 1e-5);
        assert_eq!(art.pending, Duration::ZERO);
    }

    #[test]
    fn press_starts_full_swirl() {
        let mut art = rooms();
        art.pointer(PointerEvent::Moved(Vec2::ONE));
        assert_eq!(art.swirl, Some((Vec2::ONE, 0.15)));
        art.pointer(PointerEvent::Pressed(Vec2::ZERO));
        assert_eq!(art.swirl, Some((Vec2::ZERO, 1.0)));
    }
}
