//! Limits the CMS enforces on nested components.
//!
//! Violations are reported, never fixed up: the CMS is the authority and
//! will reject the document itself.

use std::fmt;

use crate::components::{Difficulty, Duration, PrayerStep, ScriptureReference, StudySession, Theme};
use crate::derive::{ChallengeEntry, DevotionalEntry, PrayerEntry, StudyEntry};

pub const MAX_DURATION_MINUTES: u32 = 480;
pub const MAX_THEME_NAME: usize = 100;
pub const MAX_THEME_DESCRIPTION: usize = 500;
pub const MAX_DIFFICULTY_NOTES: usize = 200;
pub const MAX_BOOK: usize = 50;
pub const MAX_DISPLAY_TEXT: usize = 100;
pub const MAX_TRANSLATION: usize = 20;
pub const MAX_COMPONENT_TITLE: usize = 200;
pub const MAX_SESSION_DESCRIPTION: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Dotted path into the document, e.g. `sessions[2].order`.
    pub field: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn push(&mut self, field: impl Into<String>, message: String) {
        self.violations.push(SchemaViolation {
            field: field.into(),
            message,
        });
    }

    fn max_len(&mut self, field: impl Into<String>, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.push(field, format!("length {len} exceeds {max}"));
        }
    }

    fn at_least_one(&mut self, field: impl Into<String>, value: u32) {
        if value < 1 {
            self.push(field, "must be at least 1".to_string());
        }
    }

    fn duration(&mut self, field: &str, d: &Duration) {
        if !(1..=MAX_DURATION_MINUTES).contains(&d.estimated_minutes) {
            self.push(
                format!("{field}.estimatedMinutes"),
                format!(
                    "{} is outside 1..={MAX_DURATION_MINUTES}",
                    d.estimated_minutes
                ),
            );
        }
    }

    fn themes(&mut self, themes: &[Theme]) {
        for (i, t) in themes.iter().enumerate() {
            self.max_len(format!("themes[{i}].name"), &t.name, MAX_THEME_NAME);
            self.max_len(
                format!("themes[{i}].description"),
                &t.description,
                MAX_THEME_DESCRIPTION,
            );
        }
    }

    fn difficulty(&mut self, d: &Difficulty) {
        self.max_len("difficulty.notes", &d.notes, MAX_DIFFICULTY_NOTES);
    }

    fn scripture(&mut self, prefix: &str, refs: &[ScriptureReference]) {
        for (i, r) in refs.iter().enumerate() {
            let p = format!("{prefix}scriptureReferences[{i}]");
            self.max_len(format!("{p}.book"), &r.book, MAX_BOOK);
            self.max_len(format!("{p}.displayText"), &r.display_text, MAX_DISPLAY_TEXT);
            self.max_len(format!("{p}.translation"), &r.translation, MAX_TRANSLATION);
            self.at_least_one(format!("{p}.chapter"), r.chapter);
            self.at_least_one(format!("{p}.verseStart"), r.verse_start);
            self.at_least_one(format!("{p}.verseEnd"), r.verse_end);
        }
    }

    fn steps(&mut self, steps: &[PrayerStep]) {
        for (i, s) in steps.iter().enumerate() {
            self.max_len(format!("steps[{i}].title"), &s.title, MAX_COMPONENT_TITLE);
            self.at_least_one(format!("steps[{i}].order"), s.order);
        }
    }

    fn sessions(&mut self, sessions: &[StudySession]) {
        for (i, s) in sessions.iter().enumerate() {
            let p = format!("sessions[{i}]");
            self.max_len(format!("{p}.title"), &s.title, MAX_COMPONENT_TITLE);
            self.max_len(
                format!("{p}.description"),
                &s.description,
                MAX_SESSION_DESCRIPTION,
            );
            self.at_least_one(format!("{p}.order"), s.order);
            if let Some(minutes) = s.estimated_minutes {
                self.at_least_one(format!("{p}.estimatedMinutes"), minutes);
            }
            if let Some(refs) = &s.scripture_references {
                self.scripture(&format!("{p}."), refs);
            }
        }
    }
}

/// Derived entries whose nested components can be checked.
pub trait SchemaCheck {
    fn schema_violations(&self) -> Vec<SchemaViolation>;
}

impl SchemaCheck for DevotionalEntry {
    fn schema_violations(&self) -> Vec<SchemaViolation> {
        let mut c = Checker::default();
        c.scripture("", &self.scripture_references);
        c.themes(&self.themes);
        c.difficulty(&self.difficulty);
        c.duration("duration", &self.duration);
        c.violations
    }
}

impl SchemaCheck for PrayerEntry {
    fn schema_violations(&self) -> Vec<SchemaViolation> {
        let mut c = Checker::default();
        c.steps(&self.steps);
        c.themes(&self.themes);
        c.difficulty(&self.difficulty);
        c.duration("duration", &self.duration);
        c.violations
    }
}

impl SchemaCheck for StudyEntry {
    fn schema_violations(&self) -> Vec<SchemaViolation> {
        let mut c = Checker::default();
        c.sessions(&self.sessions);
        c.themes(&self.themes);
        c.difficulty(&self.difficulty);
        c.duration("totalDuration", &self.total_duration);
        c.violations
    }
}

impl SchemaCheck for ChallengeEntry {
    fn schema_violations(&self) -> Vec<SchemaViolation> {
        let mut c = Checker::default();
        c.themes(&self.themes);
        c.difficulty(&self.difficulty);
        c.duration("estimatedCommitment", &self.estimated_commitment);
        c.violations
    }
}
