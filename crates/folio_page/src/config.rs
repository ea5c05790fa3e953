//! Page configuration
//!
//! Every knob of the behavior layer lives here: the selectors each widget
//! binds to, trigger positions, timings and labels. All fields have
//! defaults matching the stock portfolio page, so an empty file (or no file)
//! is a valid configuration.
//!
//! ```toml
//! [back_to_top]
//! threshold_px = 600
//!
//! [[reveal]]
//! selector = ".timeline-item"
//! start = "top 80%"
//! x = -50.0
//! stagger_ms = 200
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use folio_animation::{Easing, TriggerPosition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reveal::{RevealPolicy, RevealProfile};
use crate::typewriter::TypeSpeed;

/// Configuration failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Top level
// =============================================================================

/// Complete behavior-layer configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    pub hero: HeroConfig,
    /// Scroll reveal groups, one per selector
    pub reveal: Vec<RevealGroupConfig>,
    pub skill_bars: SkillBarConfig,
    pub counter: CounterConfig,
    pub typewriter: TypewriterConfig,
    pub form: FormConfig,
    pub nav: NavConfig,
    pub back_to_top: BackToTopConfig,
    pub progress: ProgressConfig,
    pub theme: ThemeConfig,
    pub cursor: CursorConfig,
    pub tilt: TiltConfig,
    pub clipboard: ClipboardConfig,
    pub device: DeviceConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            hero: HeroConfig::default(),
            reveal: default_reveal_groups(),
            skill_bars: SkillBarConfig::default(),
            counter: CounterConfig::default(),
            typewriter: TypewriterConfig::default(),
            form: FormConfig::default(),
            nav: NavConfig::default(),
            back_to_top: BackToTopConfig::default(),
            progress: ProgressConfig::default(),
            theme: ThemeConfig::default(),
            cursor: CursorConfig::default(),
            tilt: TiltConfig::default(),
            clipboard: ClipboardConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

impl PageConfig {
    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values no widget can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counter.steps == 0 {
            return Err(ConfigError::Invalid("counter.steps must be at least 1".into()));
        }
        if self.counter.tick_ms == 0 {
            return Err(ConfigError::Invalid("counter.tick_ms must be at least 1".into()));
        }
        if !(self.cursor.easing > 0.0 && self.cursor.easing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "cursor.easing must be in (0, 1], got {}",
                self.cursor.easing
            )));
        }
        if self.tilt.divisor == 0.0 {
            return Err(ConfigError::Invalid("tilt.divisor must not be zero".into()));
        }
        if let TypeSpeed::Random { min_ms, max_ms } = self.typewriter.speed {
            if min_ms > max_ms {
                return Err(ConfigError::Invalid(format!(
                    "typewriter.speed: min_ms {} exceeds max_ms {}",
                    min_ms, max_ms
                )));
            }
        }
        for group in &self.reveal {
            if group.selector.trim().is_empty() {
                return Err(ConfigError::Invalid("reveal group with empty selector".into()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Hero entrance, floating shapes and parallax
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeroConfig {
    pub elements: String,
    pub offset_y: f32,
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub stagger_ms: u32,
    pub easing: Easing,
    pub shapes: String,
    pub shape_y: f32,
    pub shape_rotation: f32,
    /// Shape `i` loops over `shape_base_ms + i * shape_step_ms`
    pub shape_base_ms: u32,
    pub shape_step_ms: u32,
    pub shape_easing: Easing,
    pub parallax: String,
    pub section: String,
    pub parallax_y: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            elements: ".title-line, .hero-description, .hero-buttons".into(),
            offset_y: 30.0,
            duration_ms: 1000,
            delay_ms: 500,
            stagger_ms: 200,
            easing: Easing::EaseOutQuart,
            shapes: ".shape".into(),
            shape_y: 20.0,
            shape_rotation: 360.0,
            shape_base_ms: 4000,
            shape_step_ms: 1000,
            shape_easing: Easing::EaseInOutSine,
            parallax: ".floating-shapes".into(),
            section: ".hero-section".into(),
            parallax_y: -100.0,
        }
    }
}

/// One batch of scroll-revealed elements
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealGroupConfig {
    pub selector: String,
    pub start: TriggerPosition,
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    pub duration_ms: u32,
    pub stagger_ms: u32,
    pub easing: Easing,
    pub policy: RevealPolicy,
}

impl Default for RevealGroupConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".into(),
            start: TriggerPosition::top_at(0.85),
            x: 0.0,
            y: 50.0,
            opacity: 0.0,
            duration_ms: 1000,
            stagger_ms: 0,
            easing: Easing::EaseOutQuart,
            policy: RevealPolicy::PlayAndReverse,
        }
    }
}

impl RevealGroupConfig {
    pub fn profile(&self) -> RevealProfile {
        RevealProfile {
            offset_x: self.x,
            offset_y: self.y,
            opacity: self.opacity,
            duration_ms: self.duration_ms,
            easing: self.easing,
            start: self.start,
            delay_ms: 0,
        }
    }
}

fn default_reveal_groups() -> Vec<RevealGroupConfig> {
    vec![
        RevealGroupConfig {
            selector: ".timeline-item".into(),
            start: TriggerPosition::top_at(0.8),
            x: -50.0,
            y: 0.0,
            stagger_ms: 200,
            ..Default::default()
        },
        RevealGroupConfig {
            selector: ".skill-category".into(),
            stagger_ms: 100,
            ..Default::default()
        },
        RevealGroupConfig {
            selector: ".project-card".into(),
            stagger_ms: 150,
            ..Default::default()
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SkillBarConfig {
    pub selector: String,
    pub bar: String,
    pub level_attribute: String,
    pub start: TriggerPosition,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for SkillBarConfig {
    fn default() -> Self {
        Self {
            selector: ".skill-item".into(),
            bar: ".skill-level".into(),
            level_attribute: "data-level".into(),
            start: TriggerPosition::top_at(0.9),
            duration_ms: 1500,
            easing: Easing::EaseOutQuart,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CounterConfig {
    pub selector: String,
    pub target_attribute: String,
    pub start: TriggerPosition,
    pub tick_ms: u32,
    /// The count reaches its target in this many ticks
    pub steps: u32,
    pub suffix: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: ".counter".into(),
            target_attribute: "data-target".into(),
            start: TriggerPosition::top_at(0.8),
            tick_ms: 30,
            steps: 50,
            suffix: "+".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub selector: String,
    /// Source text attribute; the element text is used when absent
    pub text_attribute: String,
    pub start_delay_ms: u32,
    /// Class removed once typing completes
    pub cursor_class: String,
    pub seed: u64,
    pub speed: TypeSpeed,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            selector: ".typewriter".into(),
            text_attribute: "data-text".into(),
            start_delay_ms: 500,
            cursor_class: "typing".into(),
            seed: 0x5eed,
            speed: TypeSpeed::Random {
                min_ms: 50,
                max_ms: 150,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Element id of the contact form
    pub id: String,
    pub inputs: String,
    pub button: String,
    pub focused_class: String,
    pub sending_label: String,
    pub sent_label: String,
    pub sent_background: String,
    pub sending_ms: u32,
    pub reset_ms: u32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            id: "contactForm".into(),
            inputs: "input, textarea".into(),
            button: ".submit-button".into(),
            focused_class: "focused".into(),
            sending_label: "Sending...".into(),
            sent_label: "Message Sent!".into(),
            sent_background: "#4CAF50".into(),
            sending_ms: 1500,
            reset_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavConfig {
    pub toggle: String,
    pub menu: String,
    pub anchors: String,
    /// Space left above an anchor target (fixed header height)
    pub anchor_offset: f32,
    pub smooth_scroll_ms: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle: ".menu-toggle".into(),
            menu: ".nav-menu".into(),
            anchors: "a[href^=\"#\"]".into(),
            anchor_offset: 80.0,
            smooth_scroll_ms: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackToTopConfig {
    pub selector: String,
    /// Visible strictly above this offset
    pub threshold_px: f32,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self {
            selector: ".back-to-top".into(),
            threshold_px: 500.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub selector: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            selector: ".scroll-progress".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub toggle: String,
    pub storage_key: String,
    pub dark_class: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            toggle: ".theme-toggle".into(),
            storage_key: "theme".into(),
            dark_class: "dark-mode".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CursorConfig {
    pub selector: String,
    pub hover_targets: String,
    pub hover_class: String,
    /// Fraction of the remaining distance covered each frame
    pub easing: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            selector: ".cursor".into(),
            hover_targets: "a, button, .project-card".into(),
            hover_class: "cursor-hover".into(),
            easing: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TiltConfig {
    pub selector: String,
    pub divisor: f32,
    pub perspective_px: f32,
    pub lift_px: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            selector: ".project-card".into(),
            divisor: 25.0,
            perspective_px: 1000.0,
            lift_px: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClipboardConfig {
    pub selector: String,
    /// Attribute holding the address; falls back to `email`
    pub address_attribute: String,
    pub email: String,
    pub copied_class: String,
    pub copied_ms: u32,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            selector: ".copy-email".into(),
            address_attribute: "data-email".into(),
            email: "hello@example.com".into(),
            copied_class: "copied".into(),
            copied_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub user_agent: String,
    pub mobile_class: String,
    pub mobile_duration_ms: u32,
    pub resize_debounce_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            mobile_class: "mobile".into(),
            mobile_duration_ms: 500,
            resize_debounce_ms: 250,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PageConfig::from_toml_str("").unwrap();
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.back_to_top.threshold_px, 500.0);
        assert_eq!(config.nav.anchor_offset, 80.0);
        assert_eq!(config.form.id, "contactForm");
        assert_eq!(config.reveal.len(), 3);
    }

    #[test]
    fn test_partial_override() {
        let config = PageConfig::from_toml_str(
            r#"
            [counter]
            suffix = "k"

            [[reveal]]
            selector = ".section"
            start = "top 75%"
            policy = "play_once"
            easing = "power2.out"
            "#,
        )
        .unwrap();

        assert_eq!(config.counter.suffix, "k");
        assert_eq!(config.counter.tick_ms, 30);
        assert_eq!(config.reveal.len(), 1);
        assert_eq!(config.reveal[0].start, TriggerPosition::top_at(0.75));
        assert_eq!(config.reveal[0].policy, RevealPolicy::PlayOnce);
        assert_eq!(config.reveal[0].easing, Easing::EaseOutCubic);
        assert_eq!(config.reveal[0].y, 50.0);
    }

    #[test]
    fn test_typewriter_speed_forms() {
        let fixed = PageConfig::from_toml_str("[typewriter]\nspeed = { fixed = 80 }").unwrap();
        assert_eq!(fixed.typewriter.speed, TypeSpeed::Fixed(80));

        let err = PageConfig::from_toml_str(
            "[typewriter]\nspeed = { random = { min_ms = 200, max_ms = 100 } }",
        );
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PageConfig::from_toml_str("[cursor]\neasing = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PageConfig::from_toml_str("[counter]\nsteps = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PageConfig::from_toml_str("[[reveal]]\nstart = \"middle 50%\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_serialized_default_parses_back() {
        let text = PageConfig::default().to_toml_string().unwrap();
        assert_eq!(PageConfig::from_toml_str(&text).unwrap(), PageConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = PageConfig::load("/nonexistent/folio.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
