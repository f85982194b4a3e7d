pub mod convergence;
pub mod dew;
pub mod garden;
pub mod helix;
pub mod klein;
pub mod moths;
pub mod ripples;
pub mod spiral;
pub mod threads;
pub mod void;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::Viewport;

pub(crate) fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Decay `value` by `factor` per 60 Hz frame over `ticks` frames.
pub(crate) fn decay(value: f32, factor: f32, ticks: f32) -> f32 {
    value * factor.powf(ticks)
}

/// Pointer position, defaulting to the middle of the canvas.
pub(crate) fn pointer_or_center(pointer: Option<Vec2>, viewport: Viewport) -> Vec2 {
    pointer.unwrap_or_else(|| viewport.center())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;

    use crate::{
        Canvas, Catalog, Color, Frame, PointerEvent, PointerState, Scene, Surface, Viewport,
    };

    const FRAME: Duration = Duration::from_millis(16);

    fn run(
        slug: &str,
        viewport: Viewport,
        frames: u64,
        events: &[PointerEvent],
    ) -> Canvas {
        let catalog = Catalog::standard();
        let descriptor = catalog.find(slug).expect("known slug");
        let mut unit = descriptor.instantiate(viewport, 7);
        let mut canvas = Canvas::new(viewport.width, viewport.height).unwrap();
        let scene = Scene::new(viewport);
        let mut pointer = PointerState::default();

        for index in 0..frames {
            if let Some(event) = events.get(index as usize) {
                pointer.apply(event);
                unit.pointer(*event);
            }
            let frame = Frame {
                elapsed: FRAME * index as u32,
                delta: FRAME,
                index,
                pointer,
                viewport,
            };
            let mut surface = match descriptor.kind {
                crate::ArtworkKind::Surface2d => Surface::flat(&mut canvas),
                crate::ArtworkKind::Scene3d => Surface::with_scene(&mut canvas, &scene),
            };
            unit.step(&frame, &mut surface)
                .unwrap_or_else(|err| panic!("{slug} failed on frame {index}: {err}"));
        }
        unit.teardown();
        canvas.flush();
        canvas
    }

    fn distinct_colors(canvas: &Canvas) -> usize {
        let mut seen = std::collections::HashSet::new();
        for px in canvas.as_bytes().chunks_exact(4) {
            seen.insert([px[0], px[1], px[2]]);
        }
        seen.len()
    }

    #[test]
    fn every_artwork_draws_something() {
        let viewport = Viewport::new(160, 120);
        for descriptor in Catalog::standard().iter() {
            let canvas = run(descriptor.slug, viewport, 30, &[]);
            assert!(
                distinct_colors(&canvas) > 1,
                "{} left the canvas blank",
                descriptor.slug
            );
        }
    }

    #[test]
    fn every_artwork_accepts_pointer_input() {
        let viewport = Viewport::new(120, 90);
        let events = [
            PointerEvent::Moved(Vec2::new(10.0, 10.0)),
            PointerEvent::Pressed(Vec2::new(60.0, 45.0)),
            PointerEvent::Moved(Vec2::new(70.0, 50.0)),
            PointerEvent::Released(Vec2::new(70.0, 50.0)),
            PointerEvent::TouchStart(Vec2::new(-500.0, 9000.0)),
            PointerEvent::TouchEnd(Vec2::new(-500.0, 9000.0)),
        ];
        for descriptor in Catalog::standard().iter() {
            run(descriptor.slug, viewport, 12, &events);
        }
    }

    #[test]
    fn every_artwork_survives_resizes() {
        let catalog = Catalog::standard();
        for descriptor in catalog.iter() {
            let mut unit = descriptor.instantiate(Viewport::new(64, 48), 1);
            for viewport in [
                Viewport::new(1, 1),
                Viewport::new(64, 48),
                Viewport::new(64, 48),
                Viewport::new(3, 900),
            ] {
                unit.resize(viewport);
                let mut canvas = Canvas::new(viewport.width, viewport.height).unwrap();
                let scene = Scene::new(viewport);
                let frame = Frame {
                    elapsed: FRAME,
                    delta: FRAME,
                    index: 1,
                    pointer: PointerState::default(),
                    viewport,
                };
                let mut surface = Surface::with_scene(&mut canvas, &scene);
                unit.step(&frame, &mut surface).unwrap();
            }
        }
    }

    #[test]
    fn same_seed_draws_same_frame() {
        let viewport = Viewport::new(80, 60);
        let a = run("morning-dew", viewport, 10, &[]);
        let b = run("morning-dew", viewport, 10, &[]);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn scene_artworks_require_a_scene() {
        let catalog = Catalog::standard();
        let viewport = Viewport::new(32, 32);
        let descriptor = catalog.find("klein-bottle").unwrap();
        let mut unit = descriptor.instantiate(viewport, 3);
        let mut canvas = Canvas::new(32, 32).unwrap();
        let frame = Frame {
            elapsed: FRAME,
            delta: FRAME,
            index: 0,
            pointer: PointerState::default(),
            viewport,
        };
        let err = unit
            .step(&frame, &mut Surface::flat(&mut canvas))
            .unwrap_err();
        assert!(matches!(err, crate::ArtworkError::MissingScene));
        assert_eq!(canvas.pixel(0, 0), Some(Color::VOID));
    }
}
