//! Puts composed canvases on screen.
//!
//! - `context` owns the wgpu instance, device and window surface and
//!   reconfigures the swapchain on resize.
//! - `blit` uploads the CPU canvas into a texture and draws it with a
//!   full-screen triangle, letterboxed when the canvas was clamped.

mod blit;
mod context;

use anyhow::Result;
use artworks::Canvas;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use blit::Blitter;
use context::GpuContext;

pub(crate) struct GpuPresenter {
    context: GpuContext,
    blitter: Blitter,
}

impl GpuPresenter {
    pub(crate) fn new<T>(target: &T, size: PhysicalSize<u32>) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, size)?;
        let blitter = Blitter::new(&context.device, context.surface_format);
        Ok(Self { context, blitter })
    }

    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    pub(crate) fn present(&mut self, canvas: &Canvas) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let surface = (self.context.config.width, self.context.config.height);
        self.blitter
            .upload(&self.context.device, &self.context.queue, canvas, surface);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("present encoder"),
            });
        self.blitter.draw(&mut encoder, &view);
        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
