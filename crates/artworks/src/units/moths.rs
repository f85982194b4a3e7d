//! Digital Moths: a lit swarm circling drifting lamps inside the fogged scene.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{decay, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const MOTHS: usize = 140;
const LAMPS: usize = 3;
const MAX_SPEED: f32 = 0.12;

struct Moth {
    position: Vec3,
    velocity: Vec3,
    wing_phase: f32,
    wing_rate: f32,
    lamp: usize,
    size: f32,
}

pub struct DigitalMoths {
    moths: Vec<Moth>,
    viewport: Viewport,
    lure: Option<Vec3>,
    lure_strength: f32,
    draw_order: Vec<(usize, f32)>,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut rng = seeded(seed);
    let moths = (0..MOTHS)
        .map(|i| Moth {
            position: Vec3::new(
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-8.0..3.0),
            ),
            velocity: Vec3::ZERO,
            wing_phase: rng.gen_range(0.0..TAU),
            wing_rate: rng.gen_range(0.25..0.45),
            lamp: i % LAMPS,
            size: rng.gen_range(0.08..0.16),
        })
        .collect();
    Box::new(DigitalMoths {
        moths,
        viewport,
        lure: None,
        lure_strength: 0.0,
        draw_order: Vec::with_capacity(MOTHS),
    })
}

fn lamp_position(index: usize, t: f32) -> Vec3 {
    let offset = index as f32 / LAMPS as f32 * TAU;
    Vec3::new(
        (t * 0.23 + offset).cos() * 4.0,
        (t * 0.31 + offset * 1.7).sin() * 2.2,
        (t * 0.17 + offset).sin() * 3.0 - 2.0,
    )
}

impl DigitalMoths {
    /// Maps a canvas position onto the z = 0 plane facing the camera.
    fn unproject(&self, point: Vec2) -> Vec3 {
        let half_height = (45.0f32.to_radians() * 0.5).tan() * 10.0;
        let half_width = half_height * self.viewport.aspect();
        let ndc = Vec2::new(
            point.x / self.viewport.width.max(1) as f32 * 2.0 - 1.0,
            1.0 - point.y / self.viewport.height.max(1) as f32 * 2.0,
        );
        Vec3::new(ndc.x * half_width, ndc.y * half_height, 0.0)
    }
}

impl Artwork for DigitalMoths {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let scene = surface.scene()?;
        let viewport = surface.viewport();
        let t = frame.seconds();
        let ticks = frame.ticks();
        self.lure_strength = decay(self.lure_strength, 0.97, ticks);
        if let Some(position) = frame.pointer.position {
            self.lure = Some(self.unproject(position));
        }

        let lamps: Vec<Vec3> = (0..LAMPS).map(|i| lamp_position(i, t)).collect();
        for moth in &mut self.moths {
            let mut target = lamps[moth.lamp];
            if let Some(lure) = self.lure {
                target = target.lerp(lure, (0.3 + self.lure_strength * 0.7).min(1.0));
            }
            let toward = target - moth.position;
            let orbit = toward.cross(Vec3::Y).normalize_or_zero();
            let steer = toward.normalize_or_zero() * 0.006 + orbit * 0.004;
            moth.velocity = (moth.velocity + steer * ticks).clamp_length_max(MAX_SPEED);
            moth.position += moth.velocity * ticks;
            moth.wing_phase += moth.wing_rate * ticks;
        }

        let canvas = &mut *surface.canvas;
        canvas.clear(scene.background);

        for lamp in &lamps {
            if let Some(p) = scene.camera.project(*lamp, viewport) {
                let glow = scene.fog.apply(Color::rgb(255, 236, 200), p.distance);
                canvas.fill_circle(p.x, p.y, (0.25 * p.scale).max(1.0), glow.with_alpha(0.2));
                canvas.fill_circle(p.x, p.y, (0.08 * p.scale).max(1.0), glow);
            }
        }

        self.draw_order.clear();
        for (index, moth) in self.moths.iter().enumerate() {
            self.draw_order
                .push((index, scene.camera.position.distance(moth.position)));
        }
        self.draw_order
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for &(index, _) in &self.draw_order {
            let moth = &self.moths[index];
            let Some(body) = scene.camera.project(moth.position, viewport) else {
                continue;
            };
            let heading = moth.velocity.normalize_or_zero();
            let normal = if heading == Vec3::ZERO {
                Vec3::Z
            } else {
                heading.cross(Vec3::Y).cross(heading).normalize_or_zero()
            };
            let light = scene.lights.shade(normal);
            let color = scene
                .fog
                .apply(Color::rgb(214, 204, 186).scaled(light), body.distance);

            let span = moth.size * body.scale;
            let beat = moth.wing_phase.sin().abs() * 0.8 + 0.2;
            let wing = Vec2::new(span, -span * beat);
            canvas.line(body.x, body.y, body.x - wing.x, body.y + wing.y, color);
            canvas.line(body.x, body.y, body.x + wing.x, body.y + wing.y, color);
            canvas.fill_circle(body.x, body.y, (span * 0.25).max(0.8), color);
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.lure = Some(self.unproject(event.position()));
        if event.is_press() {
            self.lure_strength = 1.0;
        }
    }

    fn teardown(&mut self) {
        self.moths = Vec::new();
        self.draw_order = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unproject_maps_center_to_origin() {
        let viewport = Viewport::new(400, 300);
        let moths = DigitalMoths {
            moths: Vec::new(),
            viewport,
            lure: None,
            lure_strength: 0.0,
            draw_order: Vec::new(),
        };
        let world = moths.unproject(viewport.center());
        assert!(world.length() < 1e-4);
        let corner = moths.unproject(Vec2::ZERO);
        assert!(corner.x < 0.0 && corner.y > 0.0);
    }

    #[test]
    fn lamps_stay_in_front_of_camera() {
        for i in 0..LAMPS {
            for step in 0..200 {
                let lamp = lamp_position(i, step as f32 * 0.5);
                assert!(lamp.z < 10.0);
            }
        }
    }
}
