// ABOUTME: Configuration module for the carousel-block crate
// ABOUTME: Provides carousel timing settings, page settings and environment variable handling

use crate::errors::{CarouselError, Result};
use crate::html::PageConfig;
use std::env;

pub const DEFAULT_AUTOPLAY_DELAY_MS: u64 = 5000;
pub const DEFAULT_TRANSITION_DURATION_S: f64 = 0.5;
pub const DEFAULT_TRANSITION_EASING: &str = "ease-in-out";
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;

/// Behavior settings for a single carousel instance
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    /// Whether the carousel advances on its own
    pub autoplay: bool,
    /// Period between autoplay advances
    pub autoplay_delay_ms: u64,
    /// Length of the animated track transition in seconds
    pub transition_duration_s: f64,
    /// CSS easing function for the track transition
    pub transition_easing: String,
    /// Minimum horizontal travel that counts as a swipe
    pub swipe_threshold: f64,
    /// Quiet window after the last resize before re-rendering
    pub resize_debounce_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            autoplay_delay_ms: DEFAULT_AUTOPLAY_DELAY_MS,
            transition_duration_s: DEFAULT_TRANSITION_DURATION_S,
            transition_easing: DEFAULT_TRANSITION_EASING.to_string(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

impl CarouselConfig {
    /// The CSS `transition` value used for animated renders
    pub fn transition(&self) -> String {
        format!(
            "transform {}s {}",
            self.transition_duration_s, self.transition_easing
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.autoplay_delay_ms == 0 {
            return Err(CarouselError::ConfigError(
                "autoplay delay must be greater than zero".to_string(),
            ));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(CarouselError::ConfigError(format!(
                "swipe threshold must be a non-negative number, got {}",
                self.swipe_threshold
            )));
        }
        if !self.transition_duration_s.is_finite() || self.transition_duration_s < 0.0 {
            return Err(CarouselError::ConfigError(format!(
                "transition duration must be a non-negative number, got {}",
                self.transition_duration_s
            )));
        }
        Ok(())
    }
}

/// Global configuration for the application
pub struct Config {
    pub autoplay: bool,
    pub autoplay_delay_ms: u64,
    pub swipe_threshold: f64,
    pub resize_debounce_ms: u64,
    pub embed_resources: bool,
    pub stylesheet: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autoplay: true,
            autoplay_delay_ms: DEFAULT_AUTOPLAY_DELAY_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            embed_resources: true,
            stylesheet: None,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let autoplay = env::var("CAROUSEL_AUTOPLAY")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        let autoplay_delay_ms = env::var("CAROUSEL_AUTOPLAY_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_AUTOPLAY_DELAY_MS);
        let swipe_threshold = env::var("CAROUSEL_SWIPE_THRESHOLD")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(DEFAULT_SWIPE_THRESHOLD);
        let resize_debounce_ms = env::var("CAROUSEL_RESIZE_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RESIZE_DEBOUNCE_MS);
        let embed_resources = env::var("EMBED_RESOURCES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        let stylesheet = env::var("CAROUSEL_STYLESHEET").ok();

        Self {
            autoplay,
            autoplay_delay_ms,
            swipe_threshold,
            resize_debounce_ms,
            embed_resources,
            stylesheet,
        }
    }

    /// Get a carousel configuration with defaults from this config
    pub fn get_carousel_config(
        &self,
        autoplay: Option<bool>,
        autoplay_delay_ms: Option<u64>,
        swipe_threshold: Option<f64>,
    ) -> CarouselConfig {
        CarouselConfig {
            autoplay: autoplay.unwrap_or(self.autoplay),
            autoplay_delay_ms: autoplay_delay_ms.unwrap_or(self.autoplay_delay_ms),
            swipe_threshold: swipe_threshold.unwrap_or(self.swipe_threshold),
            resize_debounce_ms: self.resize_debounce_ms,
            ..CarouselConfig::default()
        }
    }

    /// Get a page configuration with defaults
    pub fn get_page_config(
        &self,
        title: Option<String>,
        css_files: Vec<String>,
        js_files: Vec<String>,
        embed_resources: Option<bool>,
    ) -> PageConfig {
        let mut css = Vec::new();
        if let Some(stylesheet) = &self.stylesheet {
            css.push(stylesheet.clone());
        }
        css.extend(css_files);

        PageConfig {
            title: title.unwrap_or_else(|| "Carousel".to_string()),
            css_files: css.iter().map(|p| crate::ResourceFile::new(p)).collect(),
            js_files: js_files.iter().map(|p| crate::ResourceFile::new(p)).collect(),
            embed_resources: embed_resources.unwrap_or(self.embed_resources),
            auto_reload_script: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transition() {
        let config = CarouselConfig::default();
        assert_eq!(config.transition(), "transform 0.5s ease-in-out");
    }

    #[test]
    fn test_validate_rejects_zero_delay() {
        let config = CarouselConfig {
            autoplay_delay_ms: 0,
            ..CarouselConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CarouselError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let config = CarouselConfig {
            swipe_threshold: -1.0,
            ..CarouselConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(CarouselConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::new();
        let carousel = config.get_carousel_config(Some(false), Some(1200), None);
        assert!(!carousel.autoplay);
        assert_eq!(carousel.autoplay_delay_ms, 1200);
        assert_eq!(carousel.swipe_threshold, DEFAULT_SWIPE_THRESHOLD);
    }

    #[test]
    fn test_page_config_puts_configured_stylesheet_first() {
        let config = Config {
            stylesheet: Some("theme.css".to_string()),
            ..Config::default()
        };
        let page = config.get_page_config(None, vec!["extra.css".to_string()], vec![], None);
        assert_eq!(page.title, "Carousel");
        assert_eq!(page.css_files.len(), 2);
        assert_eq!(page.css_files[0].path, "theme.css");
    }
}
