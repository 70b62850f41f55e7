use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

use crate::error::Result;

/// Id of the optional inline JSON block that overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose output while developing with `trunk serve`
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub header: HeaderConfig,
    pub reveal: RevealConfig,
    pub theme: ThemeConfig,
    pub menu: MenuConfig,
    pub scramble: ScrambleConfig,
    pub particles: ParticleConfig,
    pub tilt: TiltConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub selector: String,
    pub scrolled_class: String,
    pub threshold: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            selector: ".site-header".to_string(),
            scrolled_class: "scrolled".to_string(),
            threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub visible_class: String,
    pub threshold: f64,
    pub root_margin: String,
    pub unobserve_after_reveal: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal-on-scroll".to_string(),
            visible_class: "visible".to_string(),
            threshold: 0.15,
            root_margin: "0px 0px -50px 0px".to_string(),
            unobserve_after_reveal: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub toggle_selector: String,
    pub dark_class: String,
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".theme-toggle".to_string(),
            dark_class: "dark-theme".to_string(),
            storage_key: "theme".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub button_selector: String,
    pub nav_selector: String,
    pub link_selector: String,
    pub nav_class: String,
    pub button_class: String,
    pub body_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            button_selector: ".mobile-menu-btn".to_string(),
            nav_selector: ".main-nav".to_string(),
            link_selector: ".nav-link".to_string(),
            nav_class: "active".to_string(),
            button_class: "open".to_string(),
            body_class: "menu-open".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrambleConfig {
    pub selector: String,
    /// Only targets that also carry this class replay on first reveal.
    pub reveal_class: String,
    pub glyphs: String,
    pub tick_ms: u32,
    pub reveal_threshold: f64,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            selector: ".hacker-text".to_string(),
            reveal_class: "reveal-on-scroll".to_string(),
            glyphs: "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%&*".to_string(),
            tick_ms: 30,
            reveal_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub canvas_id: String,
    pub count: usize,
    pub spread: f32,
    pub color: String,
    pub size: f64,
    pub opacity: f64,
    pub rotation_step_x: f64,
    pub rotation_step_y: f64,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    pub camera_z: f64,
    pub max_pixel_ratio: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            canvas_id: "cyberCanvas".to_string(),
            count: 1500,
            spread: 15.0,
            color: "#e0c110".to_string(),
            size: 0.02,
            opacity: 0.6,
            rotation_step_x: 0.0002,
            rotation_step_y: 0.0005,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_z: 5.0,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    pub selector: String,
    pub shimmer_selector: String,
    pub damping: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            selector: ".tilt-container".to_string(),
            shimmer_selector: ".mockup-shimmer".to_string(),
            damping: 20.0,
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the inline `#site-config` block, falling back to defaults when it
    /// is missing or malformed.
    pub fn from_document(document: &Document) -> Self {
        let Some(raw) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };

        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }
}
