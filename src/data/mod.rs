//! Static poster inputs: sourced market points, provider catalog, links.
//!
//! Everything here is read-only for the life of a session. Validation runs
//! once at load; a shape fault rejects the whole dataset.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

use crate::logging::{log, obj, v_str, Domain, Level};

mod builtin;

/// One sourced market figure. Never interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub year: i32,
    /// USD, billions
    pub value: f64,
    pub source_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub name: String,
    pub site_url: String,
    pub insights: Vec<String>,
    pub logo_ref: String,
}

impl ProviderRecord {
    /// Card identity is the display name.
    pub fn id(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub href: String,
    pub label: String,
}

/// One disclosure item of the write-up accordion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteupItem {
    pub key: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub market: Vec<TimeSeriesPoint>,
    pub providers: Vec<ProviderRecord>,
    #[serde(default)]
    pub chart_sources: Vec<LinkRecord>,
    #[serde(default)]
    pub references: Vec<LinkRecord>,
    #[serde(default)]
    pub writeup: Vec<WriteupItem>,
    #[serde(default)]
    pub business_models: Vec<String>,
    #[serde(default)]
    pub team: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    Malformed(String),
    EmptyMarket,
    EmptyProviders,
    UnorderedYears { prev: i32, next: i32 },
    DuplicateYear(i32),
    NonFiniteValue { year: i32 },
    EmptyField { record: String, field: &'static str },
    InvalidUrl { record: String, url: String },
    NoInsights { provider: String },
    DuplicateProvider(String),
    DuplicateWriteupKey(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Malformed(msg) => write!(f, "malformed dataset: {}", msg),
            DatasetError::EmptyMarket => write!(f, "market series is empty"),
            DatasetError::EmptyProviders => write!(f, "provider catalog is empty"),
            DatasetError::UnorderedYears { prev, next } => {
                write!(f, "market years not ascending: {} followed by {}", prev, next)
            }
            DatasetError::DuplicateYear(y) => write!(f, "duplicate market year {}", y),
            DatasetError::NonFiniteValue { year } => write!(f, "market value for {} is not finite", year),
            DatasetError::EmptyField { record, field } => write!(f, "{}: empty {}", record, field),
            DatasetError::InvalidUrl { record, url } => write!(f, "{}: not an absolute URL: {}", record, url),
            DatasetError::NoInsights { provider } => write!(f, "provider {} has no insights", provider),
            DatasetError::DuplicateProvider(name) => write!(f, "duplicate provider id {}", name),
            DatasetError::DuplicateWriteupKey(key) => write!(f, "duplicate write-up key {}", key),
        }
    }
}

impl std::error::Error for DatasetError {}

fn require_absolute(record: &str, raw: &str) -> Result<(), DatasetError> {
    match url::Url::parse(raw) {
        Ok(u) if !u.cannot_be_a_base() => Ok(()),
        _ => Err(DatasetError::InvalidUrl {
            record: record.to_string(),
            url: raw.to_string(),
        }),
    }
}

fn require_text(record: &str, field: &'static str, value: &str) -> Result<(), DatasetError> {
    if value.trim().is_empty() {
        return Err(DatasetError::EmptyField {
            record: record.to_string(),
            field,
        });
    }
    Ok(())
}

impl Dataset {
    /// The poster's own sourced figures and catalog.
    pub fn builtin() -> Self {
        builtin::dataset()
    }

    /// Parse and validate an externally supplied dataset.
    pub fn from_json(raw: &str) -> Result<Self> {
        let ds: Dataset = serde_json::from_str(raw)
            .map_err(|e| DatasetError::Malformed(e.to_string()))
            .context("dataset rejected at load")?;
        if let Err(err) = ds.validate() {
            log(
                Level::Error,
                Domain::Dataset,
                "config_fault",
                obj(&[("msg", v_str(&err.to_string()))]),
            );
            return Err(anyhow::Error::new(err).context("dataset rejected at load"));
        }
        Ok(ds)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize dataset")
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.market.is_empty() {
            return Err(DatasetError::EmptyMarket);
        }
        let mut prev: Option<i32> = None;
        for p in &self.market {
            if !p.value.is_finite() {
                return Err(DatasetError::NonFiniteValue { year: p.year });
            }
            require_text(&format!("market {}", p.year), "sourceLabel", &p.source_label)?;
            if let Some(prev) = prev {
                if p.year == prev {
                    return Err(DatasetError::DuplicateYear(p.year));
                }
                if p.year < prev {
                    return Err(DatasetError::UnorderedYears { prev, next: p.year });
                }
            }
            prev = Some(p.year);
        }

        if self.providers.is_empty() {
            return Err(DatasetError::EmptyProviders);
        }
        let mut ids = HashSet::new();
        for p in &self.providers {
            require_text("provider", "name", &p.name)?;
            require_text(&p.name, "logoRef", &p.logo_ref)?;
            require_absolute(&p.name, &p.site_url)?;
            if p.insights.is_empty() {
                return Err(DatasetError::NoInsights { provider: p.name.clone() });
            }
            for insight in &p.insights {
                require_text(&p.name, "insight", insight)?;
            }
            if !ids.insert(p.id()) {
                return Err(DatasetError::DuplicateProvider(p.name.clone()));
            }
        }

        for link in self.chart_sources.iter().chain(&self.references) {
            require_text("link", "label", &link.label)?;
            require_absolute(&link.label, &link.href)?;
        }

        let mut keys = HashSet::new();
        for item in &self.writeup {
            require_text("write-up item", "key", &item.key)?;
            if !keys.insert(item.key.as_str()) {
                return Err(DatasetError::DuplicateWriteupKey(item.key.clone()));
            }
        }
        Ok(())
    }

    pub fn point_for_year(&self, year: i32) -> Option<&TimeSeriesPoint> {
        self.market.iter().find(|p| p.year == year)
    }

    pub fn provider(&self, id: &str) -> Option<&ProviderRecord> {
        self.providers.iter().find(|p| p.id() == id)
    }

    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.id())
    }

    /// SHA-256 of the canonical JSON form, hex encoded.
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self).context("serialize dataset for digest")?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let ds = Dataset::builtin();
        assert!(ds.validate().is_ok());
        assert_eq!(ds.market.len(), 4);
        assert_eq!(ds.providers.len(), 6);
        assert_eq!(ds.references.len(), 12);
    }

    #[test]
    fn test_builtin_literal_points() {
        let ds = Dataset::builtin();
        let p = ds.point_for_year(2025).unwrap();
        assert_eq!(p.value, 64.41);
        assert_eq!(p.source_label, "Precedence Research");
        assert_eq!(ds.point_for_year(2030).unwrap().source_label, "Grand View Research");
        assert!(ds.point_for_year(2027).is_none());
    }

    #[test]
    fn test_json_field_names() {
        let ds = Dataset::builtin();
        let json = ds.to_json().unwrap();
        assert!(json.contains("\"sourceLabel\""));
        assert!(json.contains("\"siteUrl\""));
        assert!(json.contains("\"logoRef\""));
    }

    #[test]
    fn test_missing_field_is_config_fault() {
        let raw = r#"{"market":[{"year":2024,"value":1.0}],"providers":[]}"#;
        let err = Dataset::from_json(raw).unwrap_err();
        let root = err.downcast_ref::<DatasetError>().unwrap();
        assert!(matches!(root, DatasetError::Malformed(m) if m.contains("sourceLabel")));
    }

    #[test]
    fn test_unordered_years_rejected() {
        let mut ds = Dataset::builtin();
        ds.market.swap(0, 1);
        assert_eq!(
            ds.validate(),
            Err(DatasetError::UnorderedYears { prev: 2025, next: 2024 })
        );
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let mut ds = Dataset::builtin();
        let dup = ds.market[1].clone();
        ds.market.insert(1, dup);
        assert_eq!(ds.validate(), Err(DatasetError::DuplicateYear(2025)));
    }

    #[test]
    fn test_relative_site_url_rejected() {
        let mut ds = Dataset::builtin();
        ds.providers[0].site_url = "/openai".to_string();
        assert!(matches!(ds.validate(), Err(DatasetError::InvalidUrl { .. })));
    }

    #[test]
    fn test_duplicate_provider_rejected() {
        let mut ds = Dataset::builtin();
        let dup = ds.providers[0].clone();
        ds.providers.push(dup);
        assert_eq!(ds.validate(), Err(DatasetError::DuplicateProvider("OpenAI".to_string())));
    }

    #[test]
    fn test_provider_without_insights_rejected() {
        let mut ds = Dataset::builtin();
        ds.providers[2].insights.clear();
        assert!(matches!(ds.validate(), Err(DatasetError::NoInsights { .. })));
    }

    #[test]
    fn test_digest_stable() {
        let a = Dataset::builtin().digest().unwrap();
        let b = Dataset::builtin().digest().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
