use std::collections::BTreeSet;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::Deserialize;

pub const CONFIG_VERSION: u32 = 1;

/// Longest transition, cooldown or inactivity delay a config may ask for.
pub const MAX_NAVIGATION_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub navigation: Navigation,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub artworks: Artworks,
    #[serde(default)]
    pub health: Health,
}

/// Timings for selection changes and gesture handling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Navigation {
    /// Delay between a selection request and the new artwork appearing.
    #[serde(
        default = "default_transition",
        deserialize_with = "deserialize_duration"
    )]
    pub transition: Duration,
    /// Minimum spacing between two wheel/swipe triggered transitions.
    #[serde(default = "default_cooldown", deserialize_with = "deserialize_duration")]
    pub cooldown: Duration,
    /// Minimum vertical travel (pixels) for a touch swipe to count.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,
    /// Idle time after which the chrome is hidden.
    #[serde(
        default = "default_inactivity",
        deserialize_with = "deserialize_duration"
    )]
    pub inactivity: Duration,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            transition: default_transition(),
            cooldown: default_cooldown(),
            swipe_threshold: default_swipe_threshold(),
            inactivity: default_inactivity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Display {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: Option<f32>,
    #[serde(default)]
    pub start: usize,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            start: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Artworks {
    /// Fixed seed for artwork randomness; entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Optional subset/reordering of the catalog by slug.
    #[serde(default)]
    pub order: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub addr: Option<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            navigation: Navigation::default(),
            display: Display::default(),
            artworks: Artworks::default(),
            health: Health::default(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_transition() -> Duration {
    Duration::from_millis(150)
}

fn default_cooldown() -> Duration {
    Duration::from_millis(800)
}

fn default_swipe_threshold() -> f32 {
    50.0
}

fn default_inactivity() -> Duration {
    Duration::from_millis(3000)
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    800
}

fn default_fps() -> Option<f32> {
    Some(60.0)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_duration_opt(deserializer)?
        .ok_or_else(|| de::Error::custom("duration must not be empty"))
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl GalleryConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: GalleryConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Frame cap for the window; `None` renders every redraw.
    pub fn target_fps(&self) -> Option<f32> {
        self.display.fps.filter(|fps| *fps > 0.0)
    }

    pub fn health_addr(&self) -> Result<Option<SocketAddr>, ConfigError> {
        self.health
            .addr
            .as_deref()
            .map(|raw| {
                raw.trim().parse::<SocketAddr>().map_err(|err| {
                    ConfigError::Invalid(format!("health.addr '{raw}' is not a socket address: {err}"))
                })
            })
            .transpose()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        let nav = &self.navigation;
        for (key, value) in [
            ("transition", nav.transition),
            ("cooldown", nav.cooldown),
            ("inactivity", nav.inactivity),
        ] {
            if value > MAX_NAVIGATION_DELAY {
                return Err(ConfigError::Invalid(format!(
                    "navigation.{key} must be at most {}",
                    humantime::format_duration(MAX_NAVIGATION_DELAY)
                )));
            }
        }
        if nav.cooldown.is_zero() {
            return Err(ConfigError::Invalid(
                "navigation.cooldown must be greater than zero".into(),
            ));
        }
        if nav.inactivity.is_zero() {
            return Err(ConfigError::Invalid(
                "navigation.inactivity must be greater than zero".into(),
            ));
        }
        if !nav.swipe_threshold.is_finite() || nav.swipe_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "navigation.swipe_threshold must be a non-negative number".into(),
            ));
        }

        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid(
                "display.width and display.height must be greater than zero".into(),
            ));
        }
        if let Some(fps) = self.display.fps {
            if fps < 0.0 {
                return Err(ConfigError::Invalid("display.fps must be >= 0".into()));
            }
        }

        let mut seen = BTreeSet::new();
        for slug in &self.artworks.order {
            if slug.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "artworks.order contains an empty slug".into(),
                ));
            }
            if !seen.insert(slug.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "artworks.order lists '{slug}' more than once"
                )));
            }
        }

        self.health_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[navigation]
transition = "200ms"
cooldown = 1
swipe_threshold = 64
inactivity = "5s"

[display]
width = 1920
height = 1080
fps = 0
start = 3

[artworks]
seed = 42
order = ["zen-garden", "empty-canvas"]

[health]
addr = "127.0.0.1:5000"
"#;

    #[test]
    fn parses_sample_config() {
        let config = GalleryConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.navigation.transition, Duration::from_millis(200));
        assert_eq!(config.navigation.cooldown, Duration::from_secs(1));
        assert_eq!(config.navigation.swipe_threshold, 64.0);
        assert_eq!(config.navigation.inactivity, Duration::from_secs(5));
        assert_eq!(config.display.start, 3);
        assert_eq!(config.artworks.seed, Some(42));
        assert_eq!(config.artworks.order, vec!["zen-garden", "empty-canvas"]);
        assert_eq!(
            config.health_addr().unwrap(),
            Some("127.0.0.1:5000".parse().unwrap())
        );
    }

    #[test]
    fn zero_fps_is_uncapped() {
        let config = GalleryConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.target_fps(), None);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = GalleryConfig::from_toml_str("").expect("empty config");
        let defaults = GalleryConfig::default();
        assert_eq!(config.navigation, defaults.navigation);
        assert_eq!(config.display, defaults.display);
        assert_eq!(config.navigation.transition, Duration::from_millis(150));
        assert_eq!(config.navigation.cooldown, Duration::from_millis(800));
        assert_eq!(config.navigation.inactivity, Duration::from_secs(3));
        assert_eq!(config.target_fps(), Some(60.0));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = GalleryConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_cooldown() {
        let err = GalleryConfig::from_toml_str(
            r#"
[navigation]
cooldown = "0s"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let err = GalleryConfig::from_toml_str(
            r#"
[artworks]
order = ["zen-garden", "zen-garden"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_health_addr() {
        let err = GalleryConfig::from_toml_str(
            r#"
[health]
addr = "localhost"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_negative_durations() {
        let err = GalleryConfig::from_toml_str(
            r#"
[navigation]
transition = -1
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unrepresentable_durations() {
        for raw in ["inf", "1e20", "1e300"] {
            let err = GalleryConfig::from_toml_str(&format!("[navigation]\ntransition = {raw}\n"))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn rejects_delays_past_a_day() {
        for (key, raw) in [
            ("transition", "86401"),
            ("cooldown", "\"2days\""),
            ("inactivity", "1.5e19"),
        ] {
            let err = GalleryConfig::from_toml_str(&format!("[navigation]\n{key} = {raw}\n"))
                .unwrap_err();
            match err {
                ConfigError::Invalid(message) => assert!(message.contains(key), "{message}"),
                other => panic!("unexpected error for {key}: {other}"),
            }
        }
        let config = GalleryConfig::from_toml_str("[navigation]\ninactivity = \"24h\"\n").unwrap();
        assert_eq!(config.navigation.inactivity, MAX_NAVIGATION_DELAY);
    }
}
