//! View configuration: animation timing, chart geometry, logging filters.
//!
//! The poster takes no environment input; a config is either the default or a
//! JSON document handed over by the embedding page.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::logging::{self, Level};

pub const DEFAULT_PLACEHOLDER_LOGO: &str = "https://via.placeholder.com/80?text=Logo";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Per-sibling delay increment inside a reveal set
    pub stagger_unit_ms: u64,
    /// Duration of a group's hidden → settled transition
    pub enter_duration_ms: u64,
    /// Duration of the card rotation
    pub flip_duration_ms: u64,
    /// Chart surface in px
    pub chart_width: f64,
    pub chart_height: f64,
    pub chart_margin: Margins,
    /// Radius of a plotted marker dot
    pub marker_radius: f64,
    /// Pointer distance (px) within which a marker counts as hovered
    pub hit_radius: f64,
    pub placeholder_logo: String,
    pub log_level: Level,
    /// `None` logs every domain
    pub log_domains: Option<Vec<String>>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            stagger_unit_ms: 80,
            enter_duration_ms: 500,
            flip_duration_ms: 600,
            chart_width: 480.0,
            chart_height: 224.0,
            chart_margin: Margins {
                top: 10.0,
                right: 20.0,
                bottom: 0.0,
                left: 0.0,
            },
            marker_radius: 4.0,
            hit_radius: 10.0,
            placeholder_logo: DEFAULT_PLACEHOLDER_LOGO.to_string(),
            log_level: Level::Info,
            log_domains: None,
        }
    }
}

impl ViewConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: ViewConfig = serde_json::from_str(raw).context("view config is not valid JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stagger_unit_ms == 0 {
            bail!("stagger_unit_ms must be > 0 so siblings enter in strictly increasing order");
        }
        if self.enter_duration_ms == 0 {
            bail!("enter_duration_ms must be > 0");
        }
        let sizes = [
            ("chart_width", self.chart_width),
            ("chart_height", self.chart_height),
            ("marker_radius", self.marker_radius),
            ("hit_radius", self.hit_radius),
        ];
        for (name, v) in sizes {
            if !v.is_finite() || v <= 0.0 {
                bail!("{} must be finite and positive, got {}", name, v);
            }
        }
        let m = self.chart_margin;
        for (name, v) in [("top", m.top), ("right", m.right), ("bottom", m.bottom), ("left", m.left)] {
            if !v.is_finite() || v < 0.0 {
                bail!("chart_margin.{} must be finite and non-negative, got {}", name, v);
            }
        }
        if m.left + m.right >= self.chart_width || m.top + m.bottom >= self.chart_height {
            bail!("chart margins leave no plotting area");
        }
        if self.placeholder_logo.trim().is_empty() {
            bail!("placeholder_logo must not be empty");
        }
        Ok(())
    }

    /// Push the logging filters into the global sink.
    pub fn apply_logging(&self) {
        logging::set_min_level(self.log_level);
        logging::set_domains(self.log_domains.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ViewConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = ViewConfig::from_json(r#"{"stagger_unit_ms": 120, "log_level": "debug"}"#).unwrap();
        assert_eq!(cfg.stagger_unit_ms, 120);
        assert_eq!(cfg.log_level, Level::Debug);
        assert_eq!(cfg.flip_duration_ms, 600);
        assert_eq!(cfg.placeholder_logo, DEFAULT_PLACEHOLDER_LOGO);
    }

    #[test]
    fn test_zero_stagger_rejected() {
        let err = ViewConfig::from_json(r#"{"stagger_unit_ms": 0}"#).unwrap_err();
        assert!(err.to_string().contains("stagger_unit_ms"));
    }

    #[test]
    fn test_margins_must_leave_plot_area() {
        let cfg = ViewConfig {
            chart_margin: Margins { top: 0.0, right: 300.0, bottom: 0.0, left: 200.0 },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(ViewConfig::from_json("{not json").is_err());
    }
}
