//! Raw seed records and the dataset that holds them.
//!
//! Every record keeps the fields it does not name in `extra`, so whatever the
//! dataset carries ends up in the persisted document unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::{error, info};

use crate::error::SeedDataError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devotional {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub prayer: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kind of prayer. Unknown kinds are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrayerType {
    Guided,
    Written,
    Other(String),
}

impl From<String> for PrayerType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Guided" => PrayerType::Guided,
            "Written" => PrayerType::Written,
            _ => PrayerType::Other(s),
        }
    }
}

impl From<PrayerType> for String {
    fn from(t: PrayerType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for PrayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrayerType::Guided => f.write_str("Guided"),
            PrayerType::Written => f.write_str("Written"),
            PrayerType::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    pub title: String,
    pub slug: String,
    pub prayer_type: PrayerType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub audience_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written_prayer: Option<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub challenge_type: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The static dataset: four ordered collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub devotionals: Vec<Devotional>,
    #[serde(default)]
    pub prayers: Vec<Prayer>,
    #[serde(default)]
    pub studies: Vec<Study>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

impl SeedData {
    /// Parses and validates a dataset from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SeedDataError> {
        let data: SeedData = serde_json::from_str(json).map_err(|e| {
            error!(error = %e, "Failed to parse seed data JSON");
            SeedDataError::Parse(e)
        })?;
        data.validate()?;
        info!(
            devotionals = data.devotionals.len(),
            prayers = data.prayers.len(),
            studies = data.studies.len(),
            challenges = data.challenges.len(),
            "Loaded seed data"
        );
        Ok(data)
    }

    /// Reads, parses and validates a dataset file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedDataError> {
        let path = path.as_ref();
        info!(seed_path = ?path, "Reading seed data from file");
        let json = std::fs::read_to_string(path).map_err(|e| {
            error!(error = ?e, seed_path = ?path, "Failed to read seed data file");
            SeedDataError::Read {
                path: path.display().to_string(),
                source: e,
            }
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects records a CMS import could never succeed with: no tags,
    /// or a blank title/name or slug.
    pub fn validate(&self) -> Result<(), SeedDataError> {
        for (index, d) in self.devotionals.iter().enumerate() {
            check_record("devotionals", index, &d.title, &d.slug, &d.tags)?;
        }
        for (index, p) in self.prayers.iter().enumerate() {
            check_record("prayers", index, &p.title, &p.slug, &p.tags)?;
        }
        for (index, s) in self.studies.iter().enumerate() {
            check_record("studies", index, &s.title, &s.slug, &s.tags)?;
        }
        for (index, c) in self.challenges.iter().enumerate() {
            check_record("challenges", index, &c.name, &c.slug, &c.tags)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.devotionals.len() + self.prayers.len() + self.studies.len() + self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_record(
    collection: &'static str,
    index: usize,
    label: &str,
    slug: &str,
    tags: &[String],
) -> Result<(), SeedDataError> {
    let reason = if label.trim().is_empty() {
        Some("title/name is empty".to_string())
    } else if slug.trim().is_empty() {
        Some(format!("\"{label}\" has an empty slug"))
    } else if tags.first().map_or(true, |t| t.is_empty()) {
        Some(format!("\"{label}\" needs a non-empty first tag"))
    } else {
        None
    };
    match reason {
        Some(reason) => {
            error!(collection, index, %reason, "Invalid seed record");
            Err(SeedDataError::Invalid {
                collection,
                index,
                reason,
            })
        }
        None => Ok(()),
    }
}
