//! Floating Particles: leaves carried along a slowly turning double helix.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::{decay, pointer_or_center, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const LEAVES: usize = 60;
const PERSPECTIVE: f32 = 300.0;
const PALETTE: [Color; 4] = [
    Color::rgb(139, 115, 85),
    Color::rgb(196, 181, 154),
    Color::rgb(90, 77, 65),
    Color::rgb(160, 140, 100),
];

struct Leaf {
    phase: f32,
    radius: f32,
    y: f32,
    y_speed: f32,
    spin: f32,
    size: f32,
    opacity: f32,
    color: Color,
}

pub struct FloatingParticles {
    leaves: Vec<Leaf>,
    viewport: Viewport,
    influence: f32,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut rng = seeded(seed);
    let half = viewport.height as f32 / 3.0;
    let leaves = (0..LEAVES)
        .map(|i| Leaf {
            phase: i as f32 / LEAVES as f32 * TAU,
            radius: rng.gen_range(90.0..110.0),
            y: rng.gen_range(-1.0..1.0) * half,
            y_speed: rng.gen_range(0.3..0.6) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            spin: rng.gen_range(0.005..0.0075),
            size: rng.gen_range(3.0..6.0),
            opacity: rng.gen_range(0.7..0.9),
            color: PALETTE[rng.gen_range(0..PALETTE.len())],
        })
        .collect();
    Box::new(FloatingParticles {
        leaves,
        viewport,
        influence: 0.0,
    })
}

impl Artwork for FloatingParticles {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let ticks = frame.ticks();
        let t = frame.seconds();
        let center = self.viewport.center();
        let limit = self.viewport.height as f32 * 0.5 + 20.0;
        let pointer = pointer_or_center(frame.pointer.position, self.viewport);
        self.influence = decay(self.influence, 0.95, ticks);

        let canvas = &mut *surface.canvas;
        canvas.fade(Color::VOID, 0.3);

        // Two faint strands tracing the helix itself.
        for strand in [0.0, PI] {
            for step in 0..120 {
                let y = -limit + step as f32 / 120.0 * limit * 2.0;
                let angle = y * 0.02 + t * 0.4 + strand;
                let depth = angle.sin() * 100.0;
                let scale = PERSPECTIVE / (PERSPECTIVE + depth);
                canvas.plot(
                    center.x + angle.cos() * 100.0 * scale,
                    center.y + y,
                    Color::OCHRE.with_alpha(0.15 * scale),
                );
            }
        }

        for leaf in &mut self.leaves {
            leaf.phase += leaf.spin * ticks;
            leaf.y += leaf.y_speed * ticks;
            if leaf.y > limit {
                leaf.y = -limit;
            } else if leaf.y < -limit {
                leaf.y = limit;
            }

            let depth = leaf.phase.sin() * leaf.radius;
            let scale = PERSPECTIVE / (PERSPECTIVE + depth);
            let mut position = Vec2::new(
                center.x + leaf.phase.cos() * leaf.radius * scale,
                center.y + leaf.y,
            );

            let toward = pointer - position;
            let distance = toward.length();
            if distance < 150.0 {
                let pull = (1.0 - distance / 150.0) * (0.15 + self.influence);
                position += toward * pull * 0.3;
            }

            let flutter = 1.0 + 0.2 * (t * 2.0 + leaf.phase).sin();
            canvas.fill_circle(
                position.x,
                position.y,
                leaf.size * scale * flutter,
                leaf.color.with_alpha(leaf.opacity * scale.min(1.0)),
            );
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        if event.is_press() {
            self.influence = 1.0;
        }
    }
}
