//! Import driver: derive -> persist for the whole seed dataset.
//!
//! Content types are imported in a fixed order (devotionals, prayers,
//! studies, challenges), one record at a time. A record that fails to derive
//! or persist is logged and reported, and the batch moves on; nothing here
//! retries or rolls back.
//!
//! # Entry points
//! - [`import_all`]: the batch itself, over any [`Publisher`]. The REST path
//!   calls this directly.
//! - [`seed_direct`]: the in-process path. Wraps [`import_all`] with the run
//!   guard and the public permission grant, persisting through a
//!   [`DirectPublisher`].
//! - [`prepare_all`]: derivation and schema checks only, nothing persisted.

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::catalog::Catalog;
use crate::contract::{DocumentStore, PermissionStore, Publisher, SettingsStore};
use crate::derive::{derive_challenge, derive_devotional, derive_prayer, derive_study};
use crate::document::{ContentKind, Document};
use crate::error::{DeriveError, SeedError};
use crate::guard::{GuardPolicy, RunGuard};
use crate::model::SeedData;
use crate::permissions::{grant_public_permissions, PUBLIC_READ_ACTIONS};
use crate::schema::{SchemaCheck, SchemaViolation};
use crate::store::DirectPublisher;

/// A record after derivation, before persistence.
#[derive(Debug, Clone)]
pub struct PreparedRecord {
    pub kind: ContentKind,
    pub label: String,
    pub document: Result<Document, DeriveError>,
    pub violations: Vec<SchemaViolation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRecord {
    pub label: String,
    pub id: Option<i64>,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedRecord {
    pub label: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub kind: ContentKind,
    pub created: Vec<CreatedRecord>,
    pub failed: Vec<FailedRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub sections: Vec<SectionReport>,
}

impl ImportReport {
    pub fn total_created(&self) -> usize {
        self.sections.iter().map(|s| s.created.len()).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.sections.iter().map(|s| s.failed.len()).sum()
    }

    pub fn section(&self, kind: ContentKind) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub enum SeedOutcome {
    /// The run guard was already set; nothing was created.
    AlreadySeeded,
    Imported(ImportReport),
}

#[derive(Debug, Clone)]
pub struct DirectSeedOptions {
    /// Settings-store environment the run guard is scoped to.
    pub environment: String,
    pub guard: GuardPolicy,
}

impl Default for DirectSeedOptions {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            guard: GuardPolicy::default(),
        }
    }
}

fn prepare<R, E>(
    kind: ContentKind,
    label: &str,
    record: &R,
    catalog: &Catalog,
    derive: fn(&Catalog, &R) -> Result<E, DeriveError>,
    shape: fn(&E) -> Result<Document, serde_json::Error>,
) -> PreparedRecord
where
    E: SchemaCheck,
{
    let (document, violations) = match derive(catalog, record) {
        Ok(entry) => {
            let violations = entry.schema_violations();
            let document = shape(&entry).map_err(|e| DeriveError::Serialize {
                label: label.to_string(),
                message: e.to_string(),
            });
            (document, violations)
        }
        Err(e) => (Err(e), Vec::new()),
    };
    PreparedRecord {
        kind,
        label: label.to_string(),
        document,
        violations,
    }
}

/// Derives every record of one content type, in dataset order.
pub fn prepare_kind(catalog: &Catalog, data: &SeedData, kind: ContentKind) -> Vec<PreparedRecord> {
    match kind {
        ContentKind::Devotional => data
            .devotionals
            .iter()
            .map(|d| prepare(kind, &d.title, d, catalog, derive_devotional, Document::devotional))
            .collect(),
        ContentKind::Prayer => data
            .prayers
            .iter()
            .map(|p| prepare(kind, &p.title, p, catalog, derive_prayer, Document::prayer))
            .collect(),
        ContentKind::Study => data
            .studies
            .iter()
            .map(|s| prepare(kind, &s.title, s, catalog, derive_study, Document::study))
            .collect(),
        ContentKind::Challenge => data
            .challenges
            .iter()
            .map(|c| prepare(kind, &c.name, c, catalog, derive_challenge, Document::challenge))
            .collect(),
    }
}

/// Derives the whole dataset in import order without persisting anything.
pub fn prepare_all(catalog: &Catalog, data: &SeedData) -> Vec<PreparedRecord> {
    ContentKind::ALL
        .iter()
        .flat_map(|kind| prepare_kind(catalog, data, *kind))
        .collect()
}

/// Imports the dataset through `publisher`. Never fails as a whole: every
/// per-record error ends up in the report.
pub async fn import_all<P>(catalog: &Catalog, data: &SeedData, publisher: &P) -> ImportReport
where
    P: Publisher + ?Sized,
{
    info!(records = data.len(), "[SEED] Starting import");
    let mut report = ImportReport::default();

    for kind in ContentKind::ALL {
        info!(collection = kind.collection(), "[SEED] Importing {}", kind.collection());
        let mut section = SectionReport {
            kind,
            created: Vec::new(),
            failed: Vec::new(),
        };

        for prepared in prepare_kind(catalog, data, kind) {
            let mut document = match prepared.document {
                Ok(document) => document,
                Err(e) => {
                    error!(kind = %kind, label = %prepared.label, error = %e, "[SEED][ERROR] Derivation failed");
                    section.failed.push(FailedRecord {
                        label: prepared.label,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            for violation in &prepared.violations {
                warn!(kind = %kind, label = %prepared.label, %violation, "[SEED] Schema limit exceeded");
            }

            document.stamp_published_at(Utc::now());
            match publisher.publish(&document).await {
                Ok(published) => {
                    info!(
                        kind = %kind,
                        label = %prepared.label,
                        id = ?published.id,
                        "[SEED] Created {kind}: \"{}\"",
                        prepared.label
                    );
                    section.created.push(CreatedRecord {
                        label: prepared.label,
                        id: published.id,
                        document_id: published.document_id,
                    });
                }
                Err(e) => {
                    error!(kind = %kind, label = %prepared.label, error = %e, "[SEED][ERROR] Failed to create {kind}");
                    section.failed.push(FailedRecord {
                        label: prepared.label,
                        error: e.to_string(),
                    });
                }
            }
        }

        report.sections.push(section);
    }

    info!(
        created = report.total_created(),
        failed = report.total_failed(),
        "[SEED] Import finished"
    );
    report
}

/// In-process seeding: run guard, public read permissions, then the import
/// straight into `store`.
pub async fn seed_direct<S>(
    store: &S,
    catalog: &Catalog,
    data: &SeedData,
    options: &DirectSeedOptions,
) -> Result<SeedOutcome, SeedError>
where
    S: DocumentStore + SettingsStore + PermissionStore + ?Sized,
{
    let guard = RunGuard::new(store, &options.environment, options.guard);
    if !guard.begin().await.map_err(SeedError::Guard)? {
        warn!("[SEED] Seed data has already been imported.");
        warn!("[SEED] To reimport, delete the curiolife-setup store entry or clear your database.");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    grant_public_permissions(store, &ContentKind::ALL, &PUBLIC_READ_ACTIONS)
        .await
        .map_err(SeedError::Permissions)?;

    let publisher = DirectPublisher::new(store);
    let report = import_all(catalog, data, &publisher).await;

    guard.complete().await.map_err(SeedError::Guard)?;
    Ok(SeedOutcome::Imported(report))
}
