use glam::Vec2;
use selection::NavKey;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::{Key, NamedKey};

use artworks::Viewport;

/// Pixels one wheel "line" is worth.
const LINE_HEIGHT: f32 = 40.0;

pub fn nav_key(key: &Key) -> NavKey {
    match key {
        Key::Named(NamedKey::ArrowLeft) => NavKey::ArrowLeft,
        Key::Named(NamedKey::ArrowRight) => NavKey::ArrowRight,
        Key::Named(NamedKey::Escape) => NavKey::Escape,
        Key::Character(value) => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => NavKey::Char(ch),
                _ => NavKey::Other,
            }
        }
        _ => NavKey::Other,
    }
}

/// Navigation key for a keyboard event. Auto-repeated presses count like
/// fresh ones so a held arrow keeps stepping through the gallery.
pub fn pressed_key(state: ElementState, key: &Key) -> Option<NavKey> {
    (state == ElementState::Pressed).then(|| nav_key(key))
}

/// Vertical wheel travel in pixels; positive scrolls down the page.
///
/// winit reports "scroll up" as a positive delta, the opposite of the
/// browser convention the navigator expects.
pub fn wheel_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
        MouseScrollDelta::PixelDelta(position) => -(position.y as f32),
    }
}

/// Maps window pixels onto the canvas, which may be smaller when the window
/// exceeds the largest surface the host allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapping {
    scale: Vec2,
}

impl PointerMapping {
    pub fn new(window: PhysicalSize<u32>, canvas: Viewport) -> Self {
        let axis = |canvas: u32, window: u32| {
            if window == 0 {
                1.0
            } else {
                canvas as f32 / window as f32
            }
        };
        Self {
            scale: Vec2::new(
                axis(canvas.width, window.width),
                axis(canvas.height, window.height),
            ),
        }
    }

    pub fn to_canvas(&self, position: PhysicalPosition<f64>) -> Vec2 {
        Vec2::new(position.x as f32, position.y as f32) * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_letters_map_to_nav_keys() {
        assert_eq!(nav_key(&Key::Named(NamedKey::ArrowLeft)), NavKey::ArrowLeft);
        assert_eq!(nav_key(&Key::Named(NamedKey::ArrowRight)), NavKey::ArrowRight);
        assert_eq!(nav_key(&Key::Named(NamedKey::Escape)), NavKey::Escape);
        assert_eq!(nav_key(&Key::Character("d".into())), NavKey::Char('d'));
        assert_eq!(nav_key(&Key::Character("ab".into())), NavKey::Other);
        assert_eq!(nav_key(&Key::Named(NamedKey::Space)), NavKey::Other);
    }

    #[test]
    fn wheel_down_is_positive() {
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -1.0)), LINE_HEIGHT);
        assert_eq!(
            wheel_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 12.0))),
            -12.0
        );
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(3.0, 0.0)), 0.0);
    }

    #[test]
    fn pointer_mapping_scales_oversized_windows() {
        let same = PointerMapping::new(PhysicalSize::new(800, 600), Viewport::new(800, 600));
        assert_eq!(same.to_canvas(PhysicalPosition::new(10.0, 20.0)), Vec2::new(10.0, 20.0));

        let halved = PointerMapping::new(PhysicalSize::new(8192, 600), Viewport::new(4096, 600));
        assert_eq!(
            halved.to_canvas(PhysicalPosition::new(8000.0, 20.0)),
            Vec2::new(4000.0, 20.0)
        );

        let minimised = PointerMapping::new(PhysicalSize::new(0, 0), Viewport::new(0, 0));
        assert_eq!(minimised.to_canvas(PhysicalPosition::new(1.0, 1.0)), Vec2::ONE);
    }

    #[test]
    fn held_arrow_keeps_navigating() {
        use selection::{GallerySelection, NavInput, Navigator};
        use std::time::{Duration, Instant};

        let now = Instant::now();
        let mut selection = GallerySelection::new(10, 0, Duration::ZERO).unwrap();
        let mut navigator =
            Navigator::new(Duration::from_millis(800), 50.0, Duration::from_secs(3), now);
        let arrow = Key::Named(NamedKey::ArrowRight);
        for _ in 0..3 {
            let key = pressed_key(ElementState::Pressed, &arrow).expect("press navigates");
            navigator.handle(NavInput::Key(key), &mut selection, now);
        }
        assert_eq!(selection.pending_target(), Some(3));
        assert_eq!(pressed_key(ElementState::Released, &arrow), None);
    }
}
