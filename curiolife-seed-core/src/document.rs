use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::derive::{ChallengeEntry, DevotionalEntry, PrayerEntry, StudyEntry};

/// The four content types the seeder populates, in import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Devotional,
    Prayer,
    Study,
    Challenge,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Devotional,
        ContentKind::Prayer,
        ContentKind::Study,
        ContentKind::Challenge,
    ];

    pub fn singular(self) -> &'static str {
        match self {
            ContentKind::Devotional => "devotional",
            ContentKind::Prayer => "prayer",
            ContentKind::Study => "study",
            ContentKind::Challenge => "challenge",
        }
    }

    /// REST collection segment, e.g. `studies`.
    pub fn collection(self) -> &'static str {
        match self {
            ContentKind::Devotional => "devotionals",
            ContentKind::Prayer => "prayers",
            ContentKind::Study => "studies",
            ContentKind::Challenge => "challenges",
        }
    }

    /// Content-type identifier as the CMS namespaces it: `api::prayer.prayer`.
    pub fn uid(self) -> String {
        let s = self.singular();
        format!("api::{s}.{s}")
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// A derived record ready to persist: the flat field map the CMS receives.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub kind: ContentKind,
    /// Title or name, used in logs and reports.
    pub label: String,
    pub fields: Map<String, Value>,
}

impl Document {
    fn from_entry<T: Serialize>(
        kind: ContentKind,
        label: &str,
        entry: &T,
    ) -> Result<Self, serde_json::Error> {
        let fields = match serde_json::to_value(entry)? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Ok(Self {
            kind,
            label: label.to_string(),
            fields,
        })
    }

    pub fn devotional(entry: &DevotionalEntry) -> Result<Self, serde_json::Error> {
        Self::from_entry(ContentKind::Devotional, &entry.record.title, entry)
    }

    pub fn prayer(entry: &PrayerEntry) -> Result<Self, serde_json::Error> {
        Self::from_entry(ContentKind::Prayer, &entry.record.title, entry)
    }

    pub fn study(entry: &StudyEntry) -> Result<Self, serde_json::Error> {
        Self::from_entry(ContentKind::Study, &entry.record.title, entry)
    }

    pub fn challenge(entry: &ChallengeEntry) -> Result<Self, serde_json::Error> {
        Self::from_entry(ContentKind::Challenge, &entry.record.name, entry)
    }

    /// Sets `publishedAt` (RFC 3339, millisecond precision, `Z` suffix).
    pub fn stamp_published_at(&mut self, at: DateTime<Utc>) {
        self.fields.insert(
            "publishedAt".to_string(),
            Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }

    pub fn published_at(&self) -> Option<&str> {
        self.fields.get("publishedAt").and_then(Value::as_str)
    }

    pub fn slug(&self) -> Option<&str> {
        self.fields.get("slug").and_then(Value::as_str)
    }
}
