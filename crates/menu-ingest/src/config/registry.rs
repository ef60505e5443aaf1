//! Dining hall source registry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CAFE_BASE_URL: &str = "https://university-of-pennsylvania.cafebonappetit.com/cafe";

const DEFAULT_HALLS: &[&str] = &[
    "1920-commons",
    "kings-court-english-house",
    "falk-dining-commons",
    "hill-house",
    "lauder-college-house",
    "quaker-kitchen",
];

/// A dining hall and the page its menu is scraped from.
///
/// `id` is the stable slug also used as the `dining_hall` key in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningHallSource {
    pub id: String,
    pub url: String,
}

impl DiningHallSource {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Ordered set of dining hall sources with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<DiningHallSource>,
}

impl SourceRegistry {
    /// Builds a registry, rejecting duplicate ids and non-http(s) URLs.
    pub fn new(sources: Vec<DiningHallSource>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::DuplicateDiningHall {
                    id: source.id.clone(),
                });
            }
            if !(source.url.starts_with("https://") || source.url.starts_with("http://")) {
                return Err(ConfigError::InvalidUrl {
                    id: source.id.clone(),
                    url: source.url.clone(),
                });
            }
        }
        Ok(Self { sources })
    }

    pub fn get(&self, id: &str) -> Option<&DiningHallSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiningHallSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self {
            sources: default_dining_halls(),
        }
    }
}

/// The six University of Pennsylvania dining halls served by default.
pub fn default_dining_halls() -> Vec<DiningHallSource> {
    DEFAULT_HALLS
        .iter()
        .map(|id| DiningHallSource::new(*id, format!("{}/{}/", CAFE_BASE_URL, id)))
        .collect()
}
