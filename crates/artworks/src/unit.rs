use crate::canvas::Canvas;
use crate::scene::Scene;
use crate::{Frame, PointerEvent, Viewport};

#[derive(Debug, thiserror::Error)]
pub enum ArtworkError {
    #[error("artwork needs a 3D scene but was mounted on a flat surface")]
    MissingScene,
    #[error("simulation diverged: {0}")]
    Diverged(String),
}

/// What a step draws into.
pub struct Surface<'a> {
    pub canvas: &'a mut Canvas,
    pub scene: Option<&'a Scene>,
}

impl<'a> Surface<'a> {
    pub fn flat(canvas: &'a mut Canvas) -> Self {
        Self {
            canvas,
            scene: None,
        }
    }

    pub fn with_scene(canvas: &'a mut Canvas, scene: &'a Scene) -> Self {
        Self {
            canvas,
            scene: Some(scene),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.canvas.viewport()
    }

    pub fn scene(&self) -> Result<&'a Scene, ArtworkError> {
        self.scene.ok_or(ArtworkError::MissingScene)
    }
}

/// One self-contained animated piece.
///
/// Construction is setup; dropping (after [`Artwork::teardown`]) is the end
/// of its life. Instances never outlive the selection that created them.
pub trait Artwork {
    /// Recompute any layout that depends on the canvas size.
    fn resize(&mut self, viewport: Viewport);

    /// Advance the simulation by one frame and draw it.
    fn step(&mut self, frame: &Frame, surface: &mut Surface<'_>) -> Result<(), ArtworkError>;

    fn pointer(&mut self, _event: PointerEvent) {}

    /// Release large buffers ahead of drop.
    fn teardown(&mut self) {}
}
