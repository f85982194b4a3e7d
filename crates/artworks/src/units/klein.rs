//! Klein Bottle: a figure-eight immersion sampled as a point cloud, grown
//! band by band, turned by dragging.

use std::f32::consts::TAU;

use glam::{Mat3, Vec2, Vec3};
use rand::Rng;

use super::{decay, seeded};
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const U_STEPS: usize = 120;
const V_STEPS: usize = 28;
const BAND_RADIUS: f32 = 2.0;
const GROWTH_SECONDS: f32 = 6.0;

struct Sample {
    position: Vec3,
    normal: Vec3,
    u: f32,
}

pub struct KleinBottle {
    samples: Vec<Sample>,
    yaw: f32,
    pitch: f32,
    spin: f32,
    drag: Option<Vec2>,
    tint: Color,
}

pub fn build(_viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut rng = seeded(seed);
    let tint = Color::rgb(
        rng.gen_range(150..190),
        rng.gen_range(170..210),
        rng.gen_range(200..240),
    );
    Box::new(KleinBottle {
        samples: sample_surface(),
        yaw: rng.gen_range(0.0..TAU),
        pitch: 0.35,
        spin: 0.0,
        drag: None,
        tint,
    })
}

fn figure_eight(u: f32, v: f32) -> Vec3 {
    let (half_sin, half_cos) = (u * 0.5).sin_cos();
    let ring = BAND_RADIUS + half_cos * v.sin() - half_sin * (2.0 * v).sin();
    Vec3::new(
        ring * u.cos(),
        ring * u.sin(),
        half_sin * v.sin() + half_cos * (2.0 * v).sin(),
    ) * 0.9
}

fn sample_surface() -> Vec<Sample> {
    const H: f32 = 1e-3;
    let mut samples = Vec::with_capacity(U_STEPS * V_STEPS);
    for i in 0..U_STEPS {
        let u = i as f32 / U_STEPS as f32 * TAU;
        for j in 0..V_STEPS {
            let v = j as f32 / V_STEPS as f32 * TAU;
            let position = figure_eight(u, v);
            let du = (figure_eight(u + H, v) - position) / H;
            let dv = (figure_eight(u, v + H) - position) / H;
            samples.push(Sample {
                position,
                normal: du.cross(dv).normalize_or_zero(),
                u,
            });
        }
    }
    samples
}

impl Artwork for KleinBottle {
    fn resize(&mut self, _viewport: Viewport) {}

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let scene = surface.scene()?;
        let viewport = surface.viewport();
        let ticks = frame.ticks();

        self.spin = decay(self.spin, 0.95, ticks);
        self.yaw += (0.004 + self.spin) * ticks;
        if !self.yaw.is_finite() || !self.pitch.is_finite() {
            return Err(ArtworkError::Diverged(format!(
                "rotation became non-finite (yaw {}, pitch {})",
                self.yaw, self.pitch
            )));
        }

        let grown = (frame.seconds() / GROWTH_SECONDS).min(1.0) * TAU;
        let rotation = Mat3::from_rotation_x(self.pitch) * Mat3::from_rotation_y(self.yaw);

        let canvas = &mut *surface.canvas;
        canvas.clear(scene.background);

        for sample in self.samples.iter().filter(|sample| sample.u <= grown) {
            let world = rotation * sample.position;
            let Some(p) = scene.camera.project(world, viewport) else {
                continue;
            };
            let normal = rotation * sample.normal;
            // Both sides of a one-sided surface catch the light.
            let facing = if normal.dot(scene.camera.position - world) < 0.0 {
                -normal
            } else {
                normal
            };
            let shade = scene.lights.shade(facing);
            let color = scene.fog.apply(self.tint.scaled(shade), p.distance);
            canvas.fill_circle(p.x, p.y, (0.035 * p.scale).max(0.7), color.with_alpha(0.8));
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        let position = event.position();
        match event {
            PointerEvent::Pressed(_) | PointerEvent::TouchStart(_) => self.drag = Some(position),
            PointerEvent::Moved(_) => {
                if let Some(last) = self.drag {
                    let delta = position - last;
                    self.spin = (delta.x * 0.002).clamp(-0.2, 0.2);
                    self.pitch = (self.pitch + delta.y * 0.005).clamp(-1.4, 1.4);
                    self.drag = Some(position);
                }
            }
            PointerEvent::Released(_) | PointerEvent::TouchEnd(_) => self.drag = None,
        }
    }

    fn teardown(&mut self) {
        self.samples = Vec::new();
    }
}
