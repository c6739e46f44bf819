///
/// This module implements the CLI interface for curiolife-seed: command parsing,
/// configuration and dataset loading, and user-visible output.
///
/// All derivation and import logic lives in the [`curiolife-seed-core`] crate.
/// This module only wires a publisher or store to the core driver and reports.
///
/// ## Commands
/// - `api`: out-of-process import through the CMS REST API (needs `STRAPI_API_TOKEN`).
/// - `direct`: in-process import into a file-backed store, guarded to run once.
/// - `check`: derive every record and report schema-limit violations, persisting nothing.
///
/// [`curiolife-seed-core`]: ../../curiolife-seed-core/
use crate::client::{mask_token, RestClient};
use crate::load_config::{load_config, SeedConfig, TOKEN_USAGE};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use curiolife_seed_core::catalog::Catalog;
use curiolife_seed_core::guard::GuardPolicy;
use curiolife_seed_core::model::SeedData;
use curiolife_seed_core::seed::{
    import_all, prepare_all, seed_direct, DirectSeedOptions, ImportReport, SeedOutcome,
};
use curiolife_seed_core::store::FileStore;
use std::path::{Path, PathBuf};

/// The dataset shipped with the binary.
pub const BUNDLED_SEED_DATA: &str = include_str!("../data/curiolife-seed-data.json");

const RULE: &str = "========================================";

/// CLI for curiolife-seed: populate a CurioLife CMS with its initial content.
#[derive(Parser)]
#[clap(
    name = "curiolife-seed",
    version,
    about = "Seed devotionals, prayers, studies and challenges into the CurioLife CMS"
)]
pub struct Cli {
    /// Optional YAML config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create every seed record through the CMS REST API
    Api {
        /// Seed dataset to use instead of the bundled one
        #[clap(long)]
        data: Option<PathBuf>,
    },
    /// Import directly into a store directory, once per environment
    Direct {
        /// Store directory (created if missing)
        #[clap(long)]
        store: PathBuf,
        /// Environment the run guard is scoped to
        #[clap(long)]
        environment: Option<String>,
        /// Seed dataset to use instead of the bundled one
        #[clap(long)]
        data: Option<PathBuf>,
        /// Set the run guard before importing instead of after
        #[clap(long)]
        mark_before_import: bool,
    },
    /// Derive every record and report schema-limit violations without persisting
    Check {
        /// Seed dataset to use instead of the bundled one
        #[clap(long)]
        data: Option<PathBuf>,
    },
}

fn load_seed_data(cli_path: Option<&Path>, config: &SeedConfig) -> Result<SeedData> {
    match cli_path.or(config.data.as_deref()) {
        Some(path) => SeedData::from_path(path)
            .with_context(|| format!("Failed to load seed data from {}", path.display())),
        None => SeedData::from_json_str(BUNDLED_SEED_DATA).context("Bundled seed data is invalid"),
    }
}

fn print_report(report: &ImportReport) {
    for section in &report.sections {
        println!("\nImporting {}...", section.kind.collection());
        for created in &section.created {
            println!("  ✓ Created: \"{}\"", created.label);
        }
        for failed in &section.failed {
            println!("  ✗ Failed: \"{}\" - {}", failed.label, failed.error);
        }
    }
    println!("\n{RULE}");
    println!(
        "✓ Seeding Complete! created={} failed={}",
        report.total_created(),
        report.total_failed()
    );
    println!("{RULE}\n");
}

async fn run_api(config: &SeedConfig, token: &str, data: &SeedData) -> Result<()> {
    println!("\n{RULE}");
    println!("CurioLife Content Seeding via API");
    println!("{RULE}");
    println!("\nAPI URL: {}", config.api_url);
    println!("Token: {}", mask_token(token));

    let client = RestClient::new(&config.api_url, token).context("Failed to build HTTP client")?;
    let report = import_all(&Catalog::builtin(), data, &client).await;
    print_report(&report);
    Ok(())
}

async fn run_direct(
    config: &SeedConfig,
    data: &SeedData,
    store_dir: &Path,
    environment: Option<String>,
    mark_before_import: bool,
) -> Result<()> {
    let options = DirectSeedOptions {
        environment: environment.unwrap_or_else(|| config.environment.clone()),
        guard: if mark_before_import {
            GuardPolicy::MarkBeforeImport
        } else {
            config.guard
        },
    };

    println!("\n{RULE}");
    println!("CurioLife Content Seeding");
    println!("{RULE}");

    let store = FileStore::open(store_dir)
        .with_context(|| format!("Failed to open store at {}", store_dir.display()))?;
    match seed_direct(&store, &Catalog::builtin(), data, &options)
        .await
        .context("Could not import seed data")?
    {
        SeedOutcome::AlreadySeeded => {
            println!("\n⚠ Seed data has already been imported.");
            println!("To reimport, delete the curiolife-setup store entry or clear your database.\n");
        }
        SeedOutcome::Imported(report) => {
            println!("\n✓ Set public read permissions for content types");
            print_report(&report);
        }
    }
    Ok(())
}

fn run_check(data: &SeedData) -> Result<()> {
    let prepared = prepare_all(&Catalog::builtin(), data);
    let mut problems = 0usize;
    for record in &prepared {
        match &record.document {
            Ok(_) if record.violations.is_empty() => {
                println!("  ✓ {} \"{}\"", record.kind, record.label);
            }
            Ok(_) => {
                problems += 1;
                println!("  ✗ {} \"{}\"", record.kind, record.label);
                for violation in &record.violations {
                    println!("      {violation}");
                }
            }
            Err(e) => {
                problems += 1;
                println!("  ✗ {} \"{}\" - {e}", record.kind, record.label);
            }
        }
    }
    println!("\nChecked {} records, {problems} with problems", prepared.len());
    if problems > 0 {
        anyhow::bail!("{problems} seed records would be rejected");
    }
    Ok(())
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Api { data } => {
            tracing::info!(command = "api", "Starting REST import");
            // Fail on the token before touching the dataset or the network.
            let token = match config.require_api_token() {
                Ok(token) => token.to_string(),
                Err(e) => {
                    eprintln!("\n{TOKEN_USAGE}");
                    return Err(e);
                }
            };
            let data = load_seed_data(data.as_deref(), &config)?;
            run_api(&config, &token, &data).await
        }
        Commands::Direct {
            store,
            environment,
            data,
            mark_before_import,
        } => {
            tracing::info!(command = "direct", store = %store.display(), "Starting direct import");
            let data = load_seed_data(data.as_deref(), &config)?;
            run_direct(&config, &data, &store, environment, mark_before_import).await
        }
        Commands::Check { data } => {
            tracing::info!(command = "check", "Checking seed data");
            let data = load_seed_data(data.as_deref(), &config)?;
            run_check(&data)
        }
    }
}
