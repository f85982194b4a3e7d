//! Morning Dew: a slowly rotating bloom of motes that scatter when touched.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{decay, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const MOTES: usize = 3000;
const TOUCH_RADIUS: f32 = 120.0;

struct Mote {
    radius: f32,
    theta: f32,
    height: f32,
    phase: f32,
    offset: Vec2,
}

pub struct MorningDew {
    motes: Vec<Mote>,
    center: Vec2,
    scale: f32,
    touch: Vec2,
    influence: f32,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut rng = seeded(seed);
    let motes = (0..MOTES)
        .map(|_| Mote {
            radius: rng.gen::<f32>().powf(0.4),
            theta: rng.gen_range(0.0..TAU),
            height: rng.gen_range(-1.0..1.0),
            phase: rng.gen_range(0.0..TAU),
            offset: Vec2::ZERO,
        })
        .collect();
    let mut dew = MorningDew {
        motes,
        center: Vec2::ZERO,
        scale: 1.0,
        touch: viewport.center(),
        influence: 0.0,
    };
    dew.resize(viewport);
    Box::new(dew)
}

impl Artwork for MorningDew {
    fn resize(&mut self, viewport: Viewport) {
        self.center = viewport.center();
        self.scale = viewport.min_side() * 0.42;
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let t = frame.seconds();
        let ticks = frame.ticks();
        self.influence = decay(self.influence, 0.96, ticks);
        if let Some(position) = frame.pointer.position {
            self.touch = position;
        }

        let canvas = &mut *surface.canvas;
        canvas.fade(Color::VOID, 0.25);

        for mote in &mut self.motes {
            let bloom = 0.65 + 0.35 * (t * 0.4 + mote.phase).sin();
            let angle = mote.theta + t * 0.08 * (1.2 - mote.radius);
            let reach = mote.radius * bloom * self.scale;
            let lift = mote.height * self.scale * 0.18 * (t * 0.3 + mote.phase).sin();
            let home = self.center + Vec2::new(angle.cos() * reach, angle.sin() * reach * 0.7 + lift);

            let away = home + mote.offset - self.touch;
            let distance = away.length();
            if self.influence > 0.01 && distance < TOUCH_RADIUS && distance > f32::EPSILON {
                let push = (TOUCH_RADIUS - distance) / TOUCH_RADIUS * self.influence * 4.0;
                mote.offset += away / distance * push * ticks;
            }
            mote.offset = decay(mote.offset.length(), 0.94, ticks) * mote.offset.normalize_or_zero();

            let position = home + mote.offset;
            let shimmer = 0.25 + 0.45 * (1.0 - mote.radius) + 0.1 * (t * 3.0 + mote.phase).sin();
            canvas.plot(position.x, position.y, Color::TAN.with_alpha(shimmer));
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
        self.motes = Vec::new();
    }
}
