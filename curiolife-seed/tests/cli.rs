use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, NamedTempFile};
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

fn seed_cmd() -> Command {
    let mut cmd = Command::cargo_bin("curiolife-seed").expect("Binary exists");
    cmd.env_remove("STRAPI_API_TOKEN")
        .env_remove("STRAPI_API_URL")
        .env_remove("CURIOLIFE_ENV");
    cmd
}

#[test]
fn api_without_token_prints_usage_and_exits_non_zero() {
    seed_cmd()
        .arg("api")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("STRAPI_API_TOKEN"))
        .stderr(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Created").not());
}

#[test]
fn api_with_unreachable_server_reports_failures_but_completes() {
    // Port 9 (discard) on localhost is not expected to speak HTTP.
    seed_cmd()
        .arg("api")
        .env("STRAPI_API_TOKEN", "test-token-123456")
        .env("STRAPI_API_URL", "http://127.0.0.1:9/api")
        .assert()
        .success()
        .stdout(predicate::str::contains("Token: test-tok..."))
        .stdout(predicate::str::contains("✗ Failed: \"Finding Peace in Prayer\""))
        .stdout(predicate::str::contains("created=0 failed=10"));
}

#[test]
fn direct_imports_once_then_reports_already_seeded() {
    let store = tempdir().unwrap();

    seed_cmd()
        .arg("direct")
        .arg("--store")
        .arg(store.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Created: \"Strength for the Weary\""))
        .stdout(predicate::str::contains("created=10 failed=0"));

    seed_cmd()
        .arg("direct")
        .arg("--store")
        .arg(store.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already been imported"))
        .stdout(predicate::str::contains("Created").not());

    // A different environment has not been seeded yet.
    seed_cmd()
        .arg("direct")
        .arg("--store")
        .arg(store.path())
        .arg("--environment")
        .arg("staging")
        .assert()
        .success()
        .stdout(predicate::str::contains("created=10 failed=0"));
}

#[test]
fn direct_without_public_role_fails() {
    let store = tempdir().unwrap();
    write(
        store.path().join("permissions.json"),
        br#"{"next_permission_id": 1, "roles": [], "permissions": []}"#,
    )
    .unwrap();

    seed_cmd()
        .arg("direct")
        .arg("--store")
        .arg(store.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Created").not());

    // The guard is not set, so fixing the role lets the next run import.
    std::fs::remove_file(store.path().join("permissions.json")).unwrap();
    seed_cmd()
        .arg("direct")
        .arg("--store")
        .arg(store.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("created=10 failed=0"));
}

#[test]
fn check_passes_on_bundled_data() {
    seed_cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 10 records, 0 with problems"));
}

#[test]
fn check_fails_on_records_the_cms_would_reject() {
    let data = NamedTempFile::new().unwrap();
    write(
        data.path(),
        br#"{"studies": [{"title": "Unplanned", "slug": "unplanned", "tags": ["misc"]}]}"#,
    )
    .unwrap();

    seed_cmd()
        .arg("check")
        .arg("--data")
        .arg(data.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("totalDuration.estimatedMinutes"))
        .stdout(predicate::str::contains("1 with problems"));
}

#[test]
fn invalid_data_file_fails_before_any_work() {
    let data = NamedTempFile::new().unwrap();
    write(data.path(), b"{\"devotionals\": [{\"title\": \"x\"").unwrap();
    let store = tempdir().unwrap();

    seed_cmd()
        .arg("direct")
        .arg("--store")
        .arg(store.path())
        .arg("--data")
        .arg(data.path())
        .assert()
        .failure();
    assert!(!store.path().join("settings.json").exists());
}

#[test]
fn config_file_supplies_environment_for_direct() {
    let store = tempdir().unwrap();
    let config = NamedTempFile::new().unwrap();
    write(config.path(), "direct:\n  environment: production\n").unwrap();

    seed_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("direct")
        .arg("--store")
        .arg(store.path())
        .assert()
        .success();

    let settings = std::fs::read_to_string(store.path().join("settings.json")).unwrap();
    assert!(settings.contains("\"production\""));
    assert!(!settings.contains("\"development\""));
}

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use curiolife_seed::cli::{run, Cli, Commands};

    let cli = Cli {
        config: None,
        command: Commands::Check { data: None },
    };

    let _ = run(cli).await;

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
