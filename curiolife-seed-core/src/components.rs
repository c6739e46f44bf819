//! Nested components attached to content records.
//!
//! These mirror the component schemas the CMS declares under the `metadata.*`
//! and `content.*` namespaces. They are never persisted on their own: they
//! always travel inside a devotional, prayer, study or challenge document.

use serde::{Deserialize, Serialize};

/// Biblical reference for content grounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureReference {
    pub book: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
    #[serde(default = "default_translation")]
    pub translation: String,
    pub display_text: String,
}

fn default_translation() -> String {
    "NIV".to_string()
}

impl ScriptureReference {
    /// Builds an NIV reference; the display text is rendered as `Book C:S-E`
    /// or `Book C:V` for a single verse.
    pub fn niv(book: &str, chapter: u32, verse_start: u32, verse_end: u32) -> Self {
        let display_text = if verse_start == verse_end {
            format!("{book} {chapter}:{verse_start}")
        } else {
            format!("{book} {chapter}:{verse_start}-{verse_end}")
        };
        Self {
            book: book.to_string(),
            chapter,
            verse_start,
            verse_end,
            translation: default_translation(),
            display_text,
        }
    }
}

/// Spiritual or topical theme categorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub description: String,
}

impl Theme {
    /// Theme named after a tag, first character upper-cased.
    pub fn from_tag(tag: &str, description: String) -> Self {
        Self {
            name: capitalize(tag),
            description,
        }
    }
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Content complexity and audience suitability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: DifficultyLevel,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Minutes,
    Hours,
    Days,
}

/// Estimated time to complete content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Duration {
    pub estimated_minutes: u32,
    #[serde(default)]
    pub unit: DurationUnit,
}

impl Duration {
    pub fn minutes(estimated_minutes: u32) -> Self {
        Self {
            estimated_minutes,
            unit: DurationUnit::Minutes,
        }
    }
}

/// Individual step in a guided prayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerStep {
    pub title: String,
    pub instruction: String,
    /// Minutes.
    pub duration: u32,
    pub order: u32,
}

/// Individual session within a study track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub title: String,
    pub description: String,
    /// HTML body.
    pub content: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripture_references: Option<Vec<ScriptureReference>>,
}
