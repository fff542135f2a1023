use chrono::TimeDelta;
use log::Level;
use serde::Deserialize;
use web_sys::Document;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose console output while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Id of the optional inline JSON block that overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "landing-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    pub scroll: ScrollConfig,
    pub slider_interval_ms: u32,
    pub countdown: CountdownConfig,
    pub back_to_top_padding_px: f64,
    pub storefront_domain: String,
    pub tracked_params: Vec<String>,
    pub default_utm: UtmDefaults,
    pub lazy_root_margin: String,
    pub reveal_root_margin: String,
    pub reveal_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Header gets the `scrolled` state strictly above this offset.
    pub scrolled_threshold: f64,
    /// Back-to-top is shown strictly above this offset.
    pub back_to_top_threshold: f64,
    /// Added to the scroll offset before testing section bounds.
    pub section_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    pub extension_days: i64,
    pub tick_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UtmDefaults {
    pub source: String,
    pub medium: String,
    pub campaign: String,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            slider_interval_ms: 7000,
            countdown: CountdownConfig::default(),
            back_to_top_padding_px: 20.0,
            storefront_domain: "rqgstore.com".to_string(),
            tracked_params: [
                "gclid",
                "gbraid",
                "wbraid",
                "utm_source",
                "utm_medium",
                "utm_campaign",
                "utm_term",
                "utm_content",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            default_utm: UtmDefaults::default(),
            lazy_root_margin: "200px 0px".to_string(),
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_threshold: 0.1,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 50.0,
            back_to_top_threshold: 300.0,
            section_offset: 100.0,
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            extension_days: 4,
            tick_ms: 1000,
        }
    }
}

/// Longest countdown extension a page override may ask for.
pub const MAX_EXTENSION_DAYS: i64 = 365;

impl CountdownConfig {
    /// Validated extension window; out-of-range overrides fall back to the
    /// default instead of overflowing date arithmetic later.
    pub fn extension(&self) -> TimeDelta {
        let days = if (1..=MAX_EXTENSION_DAYS).contains(&self.extension_days) {
            self.extension_days
        } else {
            let fallback = Self::default().extension_days;
            log::warn!(
                "countdown.extension_days {} outside 1..={}, using {}",
                self.extension_days,
                MAX_EXTENSION_DAYS,
                fallback
            );
            fallback
        };
        TimeDelta::days(days)
    }
}

impl Default for UtmDefaults {
    fn default() -> Self {
        Self {
            source: "landing".to_string(),
            medium: "cta".to_string(),
            campaign: "iptv_sa".to_string(),
        }
    }
}

impl LandingConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the page's inline config block, falling back to defaults when it
    /// is absent or malformed.
    pub fn load(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(config) => {
                    log::debug!("Loaded landing config overrides");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_contract() {
        let config = LandingConfig::default();
        assert_eq!(config.scroll.scrolled_threshold, 50.0);
        assert_eq!(config.scroll.back_to_top_threshold, 300.0);
        assert_eq!(config.scroll.section_offset, 100.0);
        assert_eq!(config.slider_interval_ms, 7000);
        assert_eq!(config.countdown.extension_days, 4);
        assert_eq!(config.countdown.tick_ms, 1000);
        assert_eq!(config.tracked_params.len(), 8);
        assert_eq!(config.default_utm.campaign, "iptv_sa");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = LandingConfig::from_json(
            r#"{"storefront_domain": "shop.example", "scroll": {"back_to_top_threshold": 500}}"#,
        )
        .unwrap();
        assert_eq!(config.storefront_domain, "shop.example");
        assert_eq!(config.scroll.back_to_top_threshold, 500.0);
        assert_eq!(config.scroll.scrolled_threshold, 50.0);
        assert_eq!(config.slider_interval_ms, 7000);
    }

    #[test]
    fn oversized_or_negative_extension_falls_back() {
        for raw in [
            r#"{"countdown": {"extension_days": 100000000}}"#,
            r#"{"countdown": {"extension_days": -3}}"#,
            r#"{"countdown": {"extension_days": 0}}"#,
        ] {
            let config = LandingConfig::from_json(raw).unwrap();
            assert_eq!(config.countdown.extension(), TimeDelta::days(4));
        }
        let config = LandingConfig::from_json(r#"{"countdown": {"extension_days": 7}}"#).unwrap();
        assert_eq!(config.countdown.extension(), TimeDelta::days(7));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(LandingConfig::from_json("{not json").is_err());
    }
}
