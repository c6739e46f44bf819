use curiolife_seed_core::catalog::Catalog;
use curiolife_seed_core::contract::{DocumentStore, MockPublisher, PublishedDocument, SettingsScope, SettingsStore};
use curiolife_seed_core::document::ContentKind;
use curiolife_seed_core::error::{PublishError, SeedError};
use curiolife_seed_core::guard::{GuardPolicy, INIT_HAS_RUN_KEY, SETUP_STORE_NAME, SETUP_STORE_TYPE};
use curiolife_seed_core::model::SeedData;
use curiolife_seed_core::seed::{import_all, prepare_all, seed_direct, DirectSeedOptions, SeedOutcome};
use curiolife_seed_core::store::FileStore;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const DATASET: &str = r#"{
  "devotionals": [
    {"title": "Finding Peace in Prayer", "slug": "finding-peace-in-prayer", "tags": ["peace"]},
    {"title": "The Power of Gratitude", "slug": "the-power-of-gratitude", "tags": ["gratitude"]}
  ],
  "prayers": [
    {"title": "Morning Centering Prayer", "slug": "morning-centering-prayer", "prayerType": "Guided",
     "audienceNotes": "For those new to prayer", "tags": ["presence"]},
    {"title": "The Serenity Prayer", "slug": "the-serenity-prayer", "prayerType": "Written",
     "audienceNotes": "Anyone", "writtenPrayer": "God, grant me the serenity", "tags": ["surrender"]}
  ],
  "studies": [
    {"title": "Prayer 101", "slug": "prayer-101-7-day-journey", "prerequisites": "No prior experience", "tags": ["prayer"]}
  ],
  "challenges": [
    {"name": "Gratitude Week", "slug": "gratitude-week", "challengeType": "Daily", "tags": ["gratitude"]}
  ]
}"#;

fn dataset() -> SeedData {
    SeedData::from_json_str(DATASET).expect("test dataset is valid")
}

fn ok_published() -> Result<PublishedDocument, PublishError> {
    Ok(PublishedDocument {
        id: Some(1),
        document_id: Some("doc".to_string()),
    })
}

#[tokio::test]
async fn import_publishes_every_record_in_kind_order() {
    let seen = Arc::new(Mutex::new(Vec::<(ContentKind, String)>::new()));
    let seen_in_mock = seen.clone();

    let mut publisher = MockPublisher::new();
    publisher.expect_publish().times(6).returning(move |doc| {
        seen_in_mock
            .lock()
            .unwrap()
            .push((doc.kind, doc.label.clone()));
        assert!(doc.published_at().is_some(), "publishedAt must be stamped");
        ok_published()
    });

    let report = import_all(&Catalog::builtin(), &dataset(), &publisher).await;

    assert_eq!(report.total_created(), 6);
    assert_eq!(report.total_failed(), 0);
    let kinds: Vec<ContentKind> = report.sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, ContentKind::ALL.to_vec());

    let seen = seen.lock().unwrap();
    let labels: Vec<&str> = seen.iter().map(|(_, l)| l.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Finding Peace in Prayer",
            "The Power of Gratitude",
            "Morning Centering Prayer",
            "The Serenity Prayer",
            "Prayer 101",
            "Gratitude Week",
        ]
    );
}

#[tokio::test]
async fn one_failed_publish_does_not_stop_the_batch() {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().times(6).returning(|doc| {
        if doc.label == "The Power of Gratitude" {
            Err(PublishError::Api {
                status: 400,
                body: json!({"error": {"message": "slug must be unique"}}),
            })
        } else {
            ok_published()
        }
    });

    let report = import_all(&Catalog::builtin(), &dataset(), &publisher).await;

    assert_eq!(report.total_created(), 5);
    assert_eq!(report.total_failed(), 1);
    let devotionals = report.section(ContentKind::Devotional).unwrap();
    assert_eq!(devotionals.created.len(), 1);
    assert_eq!(devotionals.failed[0].label, "The Power of Gratitude");
    assert!(devotionals.failed[0].error.contains("400"));
    assert_eq!(report.section(ContentKind::Challenge).unwrap().created.len(), 1);
}

#[tokio::test]
async fn every_publish_failing_still_returns_a_full_report() {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().times(6).returning(|doc| {
        Err(PublishError::Transport {
            endpoint: format!("http://cms/{}", doc.kind.collection()),
            message: "connection refused".to_string(),
        })
    });

    let report = import_all(&Catalog::builtin(), &dataset(), &publisher).await;
    assert_eq!(report.total_created(), 0);
    assert_eq!(report.total_failed(), 6);
}

#[test]
fn prepare_all_derives_without_persisting() {
    let prepared = prepare_all(&Catalog::builtin(), &dataset());
    assert_eq!(prepared.len(), 6);
    assert!(prepared.iter().all(|p| p.document.is_ok()));
    assert!(prepared.iter().all(|p| p.violations.is_empty()));

    let study = prepared.iter().find(|p| p.kind == ContentKind::Study).unwrap();
    let doc = study.document.as_ref().unwrap();
    assert_eq!(doc.fields["totalDuration"]["estimatedMinutes"], json!(130));
    assert!(doc.published_at().is_none());
}

#[test]
fn prepare_reports_schema_violations_for_unmatched_study() {
    let data = SeedData::from_json_str(
        r#"{"studies": [{"title": "Unknown", "slug": "unknown", "tags": ["x"]}]}"#,
    )
    .unwrap();
    let prepared = prepare_all(&Catalog::builtin(), &data);
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].violations.len(), 1);
    assert_eq!(prepared[0].violations[0].field, "totalDuration.estimatedMinutes");
}

#[tokio::test]
async fn direct_seed_runs_once_per_environment() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let options = DirectSeedOptions::default();

    let first = seed_direct(&store, &Catalog::builtin(), &dataset(), &options)
        .await
        .expect("first run succeeds");
    match first {
        SeedOutcome::Imported(report) => assert_eq!(report.total_created(), 6),
        SeedOutcome::AlreadySeeded => panic!("first run must import"),
    }

    let second = seed_direct(&store, &Catalog::builtin(), &dataset(), &options)
        .await
        .expect("second run succeeds");
    assert!(matches!(second, SeedOutcome::AlreadySeeded));

    assert_eq!(store.count_documents("api::devotional.devotional").await.unwrap(), 2);
    assert_eq!(store.count_documents("api::prayer.prayer").await.unwrap(), 2);
    assert_eq!(store.count_documents("api::study.study").await.unwrap(), 1);
    assert_eq!(store.count_documents("api::challenge.challenge").await.unwrap(), 1);

    // A different environment has its own guard.
    let staging = DirectSeedOptions {
        environment: "staging".to_string(),
        ..DirectSeedOptions::default()
    };
    let third = seed_direct(&store, &Catalog::builtin(), &dataset(), &staging)
        .await
        .unwrap();
    assert!(matches!(third, SeedOutcome::Imported(_)));
}

#[tokio::test]
async fn direct_seed_guard_survives_reopening_the_store() {
    let dir = tempdir().unwrap();
    {
        let store = FileStore::open(dir.path()).unwrap();
        seed_direct(&store, &Catalog::builtin(), &dataset(), &DirectSeedOptions::default())
            .await
            .unwrap();
    }
    let reopened = FileStore::open(dir.path()).unwrap();
    let outcome = seed_direct(&reopened, &Catalog::builtin(), &dataset(), &DirectSeedOptions::default())
        .await
        .unwrap();
    assert!(matches!(outcome, SeedOutcome::AlreadySeeded));
    assert_eq!(reopened.count_documents("api::challenge.challenge").await.unwrap(), 1);
}

/// A store whose permissions file has no public role makes the permission
/// grant fail, which is fatal for the run.
fn store_without_public_role(dir: &std::path::Path) -> FileStore {
    std::fs::write(
        dir.join("permissions.json"),
        serde_json::to_vec(&json!({
            "next_permission_id": 1,
            "roles": [{"id": 1, "name": "Authenticated", "type": "authenticated"}],
            "permissions": []
        }))
        .unwrap(),
    )
    .unwrap();
    FileStore::open(dir).unwrap()
}

async fn guard_flag(store: &FileStore) -> Option<Value> {
    let scope = SettingsScope::new("development", SETUP_STORE_TYPE, SETUP_STORE_NAME);
    store.get_setting(&scope, INIT_HAS_RUN_KEY).await.unwrap()
}

#[tokio::test]
async fn fatal_error_leaves_guard_unset_when_marking_after_import() {
    let dir = tempdir().unwrap();
    let store = store_without_public_role(dir.path());
    let options = DirectSeedOptions {
        guard: GuardPolicy::MarkAfterImport,
        ..DirectSeedOptions::default()
    };

    let err = seed_direct(&store, &Catalog::builtin(), &dataset(), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Permissions(_)));
    assert_eq!(guard_flag(&store).await, None);
    assert_eq!(store.count_documents("api::devotional.devotional").await.unwrap(), 0);
}

#[tokio::test]
async fn fatal_error_still_marks_guard_when_marking_before_import() {
    let dir = tempdir().unwrap();
    let store = store_without_public_role(dir.path());
    let options = DirectSeedOptions {
        guard: GuardPolicy::MarkBeforeImport,
        ..DirectSeedOptions::default()
    };

    assert!(seed_direct(&store, &Catalog::builtin(), &dataset(), &options)
        .await
        .is_err());
    assert_eq!(guard_flag(&store).await, Some(Value::Bool(true)));

    let retry = seed_direct(&store, &Catalog::builtin(), &dataset(), &options)
        .await
        .unwrap();
    assert!(matches!(retry, SeedOutcome::AlreadySeeded));
}

#[tokio::test]
async fn direct_seed_stamps_published_at_on_stored_documents() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    seed_direct(&store, &Catalog::builtin(), &dataset(), &DirectSeedOptions::default())
        .await
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("documents.json")).unwrap();
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    let prayers = parsed["collections"]["api::prayer.prayer"].as_array().unwrap();
    assert_eq!(prayers.len(), 2);
    for prayer in prayers {
        assert!(prayer["data"]["publishedAt"].as_str().unwrap().ends_with('Z'));
        assert!(!prayer["documentId"].as_str().unwrap().is_empty());
    }
    assert_eq!(prayers[0]["data"]["duration"]["estimatedMinutes"], json!(11));
    assert_eq!(prayers[1]["data"]["writtenPrayer"], json!("God, grant me the serenity"));
}
