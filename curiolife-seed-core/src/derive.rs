//! Pure derivation of nested components from raw seed records.
//!
//! Both persistence paths consume the entries produced here; nothing in this
//! module performs I/O.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::components::{
    Difficulty, DifficultyLevel, Duration, PrayerStep, ScriptureReference, StudySession, Theme,
};
use crate::error::DeriveError;
use crate::model::{Challenge, Devotional, Prayer, PrayerType, Study};

pub const DEVOTIONAL_MINUTES: u32 = 10;
/// Guided prayer whose steps add up to nothing.
pub const GUIDED_PRAYER_DEFAULT_MINUTES: u32 = 10;
pub const UNGUIDED_PRAYER_MINUTES: u32 = 5;
/// Counted for a study session without its own estimate.
pub const SESSION_DEFAULT_MINUTES: u32 = 15;
pub const CHALLENGE_COMMITMENT_MINUTES: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevotionalEntry {
    #[serde(flatten)]
    pub record: Devotional,
    pub scripture_references: Vec<ScriptureReference>,
    pub themes: Vec<Theme>,
    pub difficulty: Difficulty,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerEntry {
    #[serde(flatten)]
    pub record: Prayer,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<PrayerStep>,
    pub themes: Vec<Theme>,
    pub difficulty: Difficulty,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyEntry {
    #[serde(flatten)]
    pub record: Study,
    pub sessions: Vec<StudySession>,
    pub themes: Vec<Theme>,
    pub difficulty: Difficulty,
    pub total_duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeEntry {
    #[serde(flatten)]
    pub record: Challenge,
    pub difficulty: Difficulty,
    pub estimated_commitment: Duration,
    pub themes: Vec<Theme>,
}

fn first_tag<'a>(label: &str, tags: &'a [String]) -> Result<&'a str, DeriveError> {
    tags.first()
        .map(String::as_str)
        .ok_or_else(|| DeriveError::MissingTags(label.to_string()))
}

pub fn derive_devotional(
    catalog: &Catalog,
    devotional: &Devotional,
) -> Result<DevotionalEntry, DeriveError> {
    let tag = first_tag(&devotional.title, &devotional.tags)?;
    Ok(DevotionalEntry {
        scripture_references: catalog.scripture_for(&devotional.title).to_vec(),
        themes: vec![Theme::from_tag(tag, format!("Content focused on {tag}"))],
        difficulty: Difficulty {
            level: DifficultyLevel::Beginner,
            notes: "Perfect for those new to devotional practice".to_string(),
        },
        duration: Duration::minutes(DEVOTIONAL_MINUTES),
        record: devotional.clone(),
    })
}

pub fn derive_prayer(catalog: &Catalog, prayer: &Prayer) -> Result<PrayerEntry, DeriveError> {
    let tag = first_tag(&prayer.title, &prayer.tags)?;

    let steps = match prayer.prayer_type {
        PrayerType::Guided => catalog.steps_for(&prayer.slug).to_vec(),
        _ => Vec::new(),
    };

    let estimated_minutes = match prayer.prayer_type {
        PrayerType::Guided => match steps.iter().map(|s| s.duration).sum::<u32>() {
            0 => GUIDED_PRAYER_DEFAULT_MINUTES,
            total => total,
        },
        _ => UNGUIDED_PRAYER_MINUTES,
    };

    let level = if prayer.audience_notes.contains("new") {
        DifficultyLevel::Beginner
    } else {
        DifficultyLevel::Intermediate
    };

    let mut record = prayer.clone();
    record.written_prayer = record.written_prayer.filter(|w| !w.is_empty());

    Ok(PrayerEntry {
        steps,
        themes: vec![Theme::from_tag(
            tag,
            format!("{} prayer focused on {tag}", prayer.prayer_type),
        )],
        difficulty: Difficulty {
            level,
            notes: prayer.audience_notes.clone(),
        },
        duration: Duration::minutes(estimated_minutes),
        record,
    })
}

pub fn derive_study(catalog: &Catalog, study: &Study) -> Result<StudyEntry, DeriveError> {
    let tag = first_tag(&study.title, &study.tags)?;
    let sessions = catalog.sessions_for(&study.slug).to_vec();
    // A missing or zero session length counts as the default.
    let total_minutes = sessions
        .iter()
        .map(|s| match s.estimated_minutes {
            Some(minutes) if minutes > 0 => minutes,
            _ => SESSION_DEFAULT_MINUTES,
        })
        .sum();

    let level = if study.prerequisites.contains("No prior") {
        DifficultyLevel::Beginner
    } else {
        DifficultyLevel::Intermediate
    };

    Ok(StudyEntry {
        sessions,
        themes: vec![Theme::from_tag(tag, format!("Study focused on {tag}"))],
        difficulty: Difficulty {
            level,
            notes: study.prerequisites.clone(),
        },
        total_duration: Duration::minutes(total_minutes),
        record: study.clone(),
    })
}

pub fn derive_challenge(
    _catalog: &Catalog,
    challenge: &Challenge,
) -> Result<ChallengeEntry, DeriveError> {
    let tag = first_tag(&challenge.name, &challenge.tags)?;
    Ok(ChallengeEntry {
        difficulty: Difficulty {
            level: DifficultyLevel::Beginner,
            notes: "Suitable for all experience levels".to_string(),
        },
        estimated_commitment: Duration::minutes(CHALLENGE_COMMITMENT_MINUTES),
        themes: vec![Theme::from_tag(
            tag,
            format!("{} challenge focused on {tag}", challenge.challenge_type),
        )],
        record: challenge.clone(),
    })
}
