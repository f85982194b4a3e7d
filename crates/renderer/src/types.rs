use galleryconfig::{GalleryConfig, Navigation};

/// Renderer configuration supplied by the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Optional FPS cap; `None` renders on every redraw the compositor allows.
    pub target_fps: Option<f32>,
    /// Index of the artwork shown first.
    pub start: usize,
    /// Seed for per-mount artwork randomness; entropy when absent.
    pub seed: Option<u64>,
    pub navigation: Navigation,
}

impl RendererConfig {
    pub fn from_gallery(config: &GalleryConfig) -> Self {
        Self {
            surface_size: (config.display.width, config.display.height),
            target_fps: config.target_fps(),
            start: config.display.start,
            seed: config.artworks.seed,
            navigation: config.navigation.clone(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::from_gallery(&GalleryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_gallery_config() {
        let config = RendererConfig::default();
        assert_eq!(config.surface_size, (1280, 800));
        assert_eq!(config.target_fps, Some(60.0));
        assert_eq!(config.start, 0);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn picks_up_display_and_seed() {
        let gallery = GalleryConfig::from_toml_str(
            "[display]\nwidth = 640\nheight = 480\nfps = 0\nstart = 3\n[artworks]\nseed = 9\n",
        )
        .unwrap();
        let config = RendererConfig::from_gallery(&gallery);
        assert_eq!(config.surface_size, (640, 480));
        assert_eq!(config.target_fps, None);
        assert_eq!(config.start, 3);
        assert_eq!(config.seed, Some(9));
    }
}
