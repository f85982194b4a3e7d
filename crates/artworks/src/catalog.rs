use std::fmt;

use tracing::debug;

use crate::unit::Artwork;
use crate::units;
use crate::Viewport;

pub type Constructor = fn(Viewport, u64) -> Box<dyn Artwork>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtworkKind {
    Surface2d,
    Scene3d,
}

impl ArtworkKind {
    pub fn badge(&self) -> &'static str {
        match self {
            ArtworkKind::Surface2d => "2D",
            ArtworkKind::Scene3d => "3D",
        }
    }
}

impl fmt::Display for ArtworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.badge())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArtworkDescriptor {
    /// Position in the catalog it was taken from.
    pub index: usize,
    pub slug: &'static str,
    pub title: &'static str,
    pub kind: ArtworkKind,
    pub description: &'static str,
    pub technique: &'static str,
    pub build: Constructor,
}

impl ArtworkDescriptor {
    pub fn instantiate(&self, viewport: Viewport, seed: u64) -> Box<dyn Artwork> {
        (self.build)(viewport, seed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown artwork '{0}'")]
    Unknown(String),
    #[error("artwork index {index} is out of range (catalog has {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered list of artworks; order defines next/previous adjacency.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<ArtworkDescriptor>,
}

impl Catalog {
    pub fn standard() -> Self {
        Self::numbered(STANDARD.to_vec())
    }

    /// Picks and orders artworks by slug. An empty list keeps the standard
    /// order.
    pub fn from_slugs<S: AsRef<str>>(slugs: &[S]) -> Result<Self, CatalogError> {
        if slugs.is_empty() {
            return Ok(Self::standard());
        }
        let entries = slugs
            .iter()
            .map(|slug| {
                let slug = slug.as_ref();
                STANDARD
                    .iter()
                    .find(|entry| entry.slug == slug)
                    .copied()
                    .ok_or_else(|| CatalogError::Unknown(slug.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), "using custom artwork order");
        Ok(Self::numbered(entries))
    }

    fn numbered(mut entries: Vec<ArtworkDescriptor>) -> Self {
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.index = index;
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArtworkDescriptor> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtworkDescriptor> {
        self.entries.iter()
    }

    /// Resolves a slug or a zero-based index.
    pub fn find(&self, query: &str) -> Result<&ArtworkDescriptor, CatalogError> {
        let query = query.trim();
        if let Ok(index) = query.parse::<usize>() {
            return self.get(index).ok_or(CatalogError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        self.entries
            .iter()
            .find(|entry| entry.slug.eq_ignore_ascii_case(query))
            .ok_or_else(|| CatalogError::Unknown(query.to_string()))
    }
}

const STANDARD: [ArtworkDescriptor; 10] = [
    ArtworkDescriptor {
        index: 0,
        slug: "morning-dew",
        title: "Morning Dew",
        kind: ArtworkKind::Surface2d,
        description: "Thousands of gentle particles bloom and flow from the center like morning dew, responding to touch with soft, luminous interactions.",
        technique: "particle bloom",
        build: units::dew::build,
    },
    ArtworkDescriptor {
        index: 1,
        slug: "floating-particles",
        title: "Floating Particles",
        kind: ArtworkKind::Surface2d,
        description: "Countless motes drift through space like pollen on warm air, following ancient migration patterns written in mathematics.",
        technique: "helix flow",
        build: units::helix::build,
    },
    ArtworkDescriptor {
        index: 2,
        slug: "interactive-ripples",
        title: "Interactive Ripples",
        kind: ArtworkKind::Surface2d,
        description: "Code rests like stones on water's surface. Touch disturbs the reflection, creating subtle interference patterns.",
        technique: "ripple displacement",
        build: units::ripples::build,
    },
    ArtworkDescriptor {
        index: 3,
        slug: "digital-moths",
        title: "Digital Moths",
        kind: ArtworkKind::Scene3d,
        description: "Delicate geometric forms drift like nocturnal moths, drawn to points of light in the digital darkness.",
        technique: "lit swarm",
        build: units::moths::build,
    },
    ArtworkDescriptor {
        index: 4,
        slug: "growing-spiral",
        title: "Growing Spiral",
        kind: ArtworkKind::Surface2d,
        description: "A garden grows according to the Fibonacci sequence, each leaf and petal emerging in perfect mathematical harmony.",
        technique: "phyllotaxis",
        build: units::spiral::build,
    },
    ArtworkDescriptor {
        index: 5,
        slug: "klein-bottle",
        title: "Klein Bottle",
        kind: ArtworkKind::Scene3d,
        description: "Crystalline forms grow in perfect balance, always returning to their stable core structure.",
        technique: "parametric surface",
        build: units::klein::build,
    },
    ArtworkDescriptor {
        index: 6,
        slug: "emerging-text",
        title: "Emerging Text",
        kind: ArtworkKind::Surface2d,
        description: "Watch as text emerges from invisible threads, weaving meaning from the spaces between letters.",
        technique: "drifting wave field",
        build: units::threads::build,
    },
    ArtworkDescriptor {
        index: 7,
        slug: "memory-rooms",
        title: "3D Memory Rooms",
        kind: ArtworkKind::Surface2d,
        description: "Thousands of particles transform through gentle convergence, showing how power emerges through harmony.",
        technique: "convergence field",
        build: units::convergence::build,
    },
    ArtworkDescriptor {
        index: 8,
        slug: "zen-garden",
        title: "Zen Garden",
        kind: ArtworkKind::Surface2d,
        description: "Interconnected particles spread across the digital landscape, sharing gentle connections that demonstrate the flow of abundance throughout the entire space.",
        technique: "proximity graph",
        build: units::garden::build,
    },
    ArtworkDescriptor {
        index: 9,
        slug: "empty-canvas",
        title: "Empty Canvas",
        kind: ArtworkKind::Surface2d,
        description: "Interactive waves continuously transform and interfere, showing how patterns emerge from openness to change and the void of pure potential.",
        technique: "wave interference",
        build: units::void::build,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_catalog_is_ordered_and_unique() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 10);
        let slugs: HashSet<_> = catalog.iter().map(|entry| entry.slug).collect();
        assert_eq!(slugs.len(), 10);
        for (position, entry) in catalog.iter().enumerate() {
            assert_eq!(entry.index, position);
        }
        assert_eq!(catalog.get(0).unwrap().title, "Morning Dew");
        assert_eq!(catalog.get(9).unwrap().title, "Empty Canvas");
    }

    #[test]
    fn both_kinds_are_present() {
        let catalog = Catalog::standard();
        let scenes: Vec<_> = catalog
            .iter()
            .filter(|entry| entry.kind == ArtworkKind::Scene3d)
            .map(|entry| entry.slug)
            .collect();
        assert_eq!(scenes, vec!["digital-moths", "klein-bottle"]);
    }

    #[test]
    fn from_slugs_reorders_and_renumbers() {
        let catalog = Catalog::from_slugs(&["zen-garden", "morning-dew"]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().slug, "zen-garden");
        assert_eq!(catalog.get(0).unwrap().index, 0);
        assert_eq!(catalog.get(1).unwrap().index, 1);
    }

    #[test]
    fn from_slugs_rejects_unknown() {
        let err = Catalog::from_slugs(&["mona-lisa"]).unwrap_err();
        assert!(matches!(err, CatalogError::Unknown(slug) if slug == "mona-lisa"));
    }

    #[test]
    fn empty_order_keeps_standard() {
        let none: [&str; 0] = [];
        assert_eq!(Catalog::from_slugs(&none).unwrap().len(), 10);
    }

    #[test]
    fn find_by_slug_or_index() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.find("5").unwrap().slug, "klein-bottle");
        assert_eq!(catalog.find("Zen-Garden").unwrap().index, 8);
        assert!(matches!(
            catalog.find("10"),
            Err(CatalogError::OutOfRange { index: 10, len: 10 })
        ));
        assert!(catalog.find("nope").is_err());
    }
}
