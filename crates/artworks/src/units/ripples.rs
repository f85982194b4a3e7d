//! Interactive Ripples: lines of code-like marks resting on water.
//!
//! Every press drops a ripple that widens by 3px per frame while its
//! amplitude decays by 2%; once it drops below one pixel it is removed.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::seeded;
use crate::{Artwork, ArtworkError, Color, Frame, PointerEvent, Surface, Viewport};

const GRID: f32 = 40.0;
const GROWTH: f32 = 3.0;
const DAMPING: f32 = 0.98;
const INITIAL_AMPLITUDE: f32 = 20.0;
const GLYPH_W: f32 = 8.0;
const LINE_H: f32 = 25.0;

const LINES: [&str; 13] = [
    "function breathe() {",
    "  return inhale().then(exhale);",
    "}",
    "",
    "while (alive) {",
    "  breathe();",
    "  observe();",
    "  reflect();",
    "}",
    "",
    "const wisdom = silence.map(thought => ",
    "  thought.filter(noise => !noise)",
    ");",
];

#[derive(Debug, Clone, Copy)]
struct Ripple {
    origin: Vec2,
    radius: f32,
    amplitude: f32,
}

struct GridPoint {
    base: Vec2,
    phase: f32,
}

pub struct InteractiveRipples {
    ripples: Vec<Ripple>,
    grid: Vec<GridPoint>,
    rng: rand::rngs::StdRng,
    last_drag: Option<Vec2>,
    pressed: bool,
}

pub fn build(viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
    let mut ripples = InteractiveRipples {
        ripples: Vec::new(),
        grid: Vec::new(),
        rng: seeded(seed),
        last_drag: None,
        pressed: false,
    };
    ripples.resize(viewport);
    Box::new(ripples)
}

impl InteractiveRipples {
    fn offset_at(&self, point: Vec2) -> f32 {
        self.ripples
            .iter()
            .filter_map(|ripple| {
                let distance = point.distance(ripple.origin);
                (distance < ripple.radius)
                    .then(|| ((distance - ripple.radius) * 0.1).sin() * ripple.amplitude)
            })
            .sum()
    }

    fn drop_ripple(&mut self, origin: Vec2, amplitude: f32) {
        self.ripples.push(Ripple {
            origin,
            radius: 0.0,
            amplitude,
        });
    }
}

impl Artwork for InteractiveRipples {
    fn resize(&mut self, viewport: Viewport) {
        let cols = (viewport.width as f32 / GRID).ceil() as usize;
        let rows = (viewport.height as f32 / GRID).ceil() as usize;
        self.grid.clear();
        for col in 0..cols {
            for row in 0..rows {
                self.grid.push(GridPoint {
                    base: Vec2::new(col as f32 * GRID, row as f32 * GRID),
                    phase: self.rng.gen_range(0.0..TAU),
                });
            }
        }
    }

    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError> {
        let ticks = frame.ticks();
        let wobble = frame.index as f32 * 0.01;

        for ripple in &mut self.ripples {
            ripple.radius += GROWTH * ticks;
            ripple.amplitude *= DAMPING.powf(ticks);
        }
        self.ripples.retain(|ripple| ripple.amplitude >= 1.0);

        let canvas = &mut *surface.canvas;
        canvas.clear(Color::PAPER);

        let grid_ink = Color::UMBER.with_alpha(50.0 / 255.0);
        for point in &self.grid {
            let offset = self.offset_at(point.base) * 0.3;
            canvas.plot(
                point.base.x + (point.phase + wobble).sin() * 2.0 + offset,
                point.base.y + (point.phase + wobble).cos() * 2.0 + offset,
                grid_ink,
            );
        }

        for (line_index, line) in LINES.iter().enumerate() {
            let y = 100.0 + line_index as f32 * LINE_H;
            for (char_index, glyph) in line.chars().enumerate() {
                if glyph.is_whitespace() {
                    continue;
                }
                let base = Vec2::new(50.0 + char_index as f32 * GLYPH_W, y);
                let lift = self.offset_at(base);
                let alpha = (180.0 - lift.abs() * 4.0).clamp(40.0, 180.0) / 255.0;
                let ink = Color::OCHRE.with_alpha(alpha);
                draw_glyph(canvas, glyph, base + Vec2::new(lift * 0.5, lift), ink);
            }
        }

        for ripple in &self.ripples {
            let alpha = (ripple.amplitude / INITIAL_AMPLITUDE).min(1.0) * 0.35;
            canvas.stroke_circle(
                ripple.origin.x,
                ripple.origin.y,
                ripple.radius,
                Color::UMBER.with_alpha(alpha),
            );
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        let position = event.position();
        match event {
            PointerEvent::Pressed(_) | PointerEvent::TouchStart(_) => {
                self.pressed = true;
                self.last_drag = Some(position);
                self.drop_ripple(position, INITIAL_AMPLITUDE);
            }
            PointerEvent::Moved(_) if self.pressed => {
                let far_enough = self
                    .last_drag
                    .map(|last| last.distance(position) > GRID * 0.5)
                    .unwrap_or(true);
                if far_enough {
                    self.last_drag = Some(position);
                    self.drop_ripple(position, INITIAL_AMPLITUDE * 0.4);
                }
            }
            PointerEvent::Released(_) | PointerEvent::TouchEnd(_) => {
                self.pressed = false;
                self.last_drag = None;
            }
            PointerEvent::Moved(_) => {}
        }
    }

    fn teardown(&mut self) {
        self.ripples.clear();
        self.grid = Vec::new();
    }
}

/// Draws a 5x7 block glyph whose pattern is derived from the character.
fn draw_glyph(canvas: &mut crate::Canvas, glyph: char, origin: Vec2, ink: Color) {
    let bits = (glyph as u32).wrapping_mul(2_654_435_761);
    for row in 0..7u32 {
        for col in 0..5u32 {
            let edge = col == 0 || row == 6;
            let bit = bits.rotate_left(row * 5 + col) & 1 == 1;
            if edge || bit {
                canvas.plot(origin.x + col as f32, origin.y + row as f32, ink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Canvas, PointerState};
    use std::time::Duration;

    fn frame(index: u64) -> Frame {
        Frame {
            elapsed: Duration::from_millis(16 * index),
            delta: Duration::from_secs_f32(1.0 / 60.0),
            index,
            pointer: PointerState::default(),
            viewport: Viewport::new(200, 200),
        }
    }

    fn ripples() -> InteractiveRipples {
        InteractiveRipples {
            ripples: Vec::new(),
            grid: Vec::new(),
            rng: seeded(1),
            last_drag: None,
            pressed: false,
        }
    }

    #[test]
    fn press_drops_ripple_that_expires() {
        let mut art = ripples();
        art.resize(Viewport::new(200, 200));
        art.pointer(PointerEvent::Pressed(Vec2::new(100.0, 100.0)));
        assert_eq!(art.ripples.len(), 1);

        let mut canvas = Canvas::new(200, 200).unwrap();
        art.step(&frame(1), &mut Surface::flat(&mut canvas)).unwrap();
        let ripple = art.ripples[0];
        assert!((ripple.radius - GROWTH).abs() < 0.01);
        assert!((ripple.amplitude - INITIAL_AMPLITUDE * DAMPING).abs() < 0.01);

        for index in 2..200 {
            art.step(&frame(index), &mut Surface::flat(&mut canvas)).unwrap();
        }
        assert!(art.ripples.is_empty());
    }

    #[test]
    fn drag_spawns_spaced_ripples() {
        let mut art = ripples();
        art.pointer(PointerEvent::Pressed(Vec2::ZERO));
        art.pointer(PointerEvent::Moved(Vec2::new(5.0, 0.0)));
        assert_eq!(art.ripples.len(), 1);
        art.pointer(PointerEvent::Moved(Vec2::new(30.0, 0.0)));
        assert_eq!(art.ripples.len(), 2);
        art.pointer(PointerEvent::Released(Vec2::new(30.0, 0.0)));
        art.pointer(PointerEvent::Moved(Vec2::new(300.0, 0.0)));
        assert_eq!(art.ripples.len(), 2);
    }

    #[test]
    fn grid_covers_viewport_at_forty_pixels() {
        let mut art = ripples();
        art.resize(Viewport::new(200, 120));
        assert_eq!(art.grid.len(), 5 * 3);
    }
}
