use anyhow::{ensure, Result};
use futures::future::join_all;
use pastebox_core::{Clock, Storage, Store, StoreConfig, SystemClock};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Paste {
    text: String,
    language: Option<String>,
}

/// Reads a setting from the environment, falling back to `default` when unset or unparsable
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pastebox_demo=info,pastebox_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let defaults = StoreConfig::default();
    let sweep_interval: u64 = env_or(
        "PASTEBOX_SWEEP_INTERVAL",
        defaults.sweep_interval.as_secs(),
    );
    let id_length: usize = env_or("PASTEBOX_ID_LENGTH", defaults.id_length);

    let config = StoreConfig::default()
        .with_sweep_interval(Duration::from_secs(sweep_interval))
        .with_id_length(id_length);
    let store = Store::with_config(config);

    tracing::info!("Pastebox demo");
    tracing::info!("   Sweep interval: {}s", sweep_interval);
    tracing::info!("   Id length: {}", id_length);

    run_lifecycle(&store)?;
    run_parallel_stores(&store).await?;
    run_expiration().await?;

    store.shutdown();
    tracing::info!("All scenarios passed");

    Ok(())
}

/// Publishes a paste, reads it back, removes it
fn run_lifecycle<S: Storage>(backend: &S) -> Result<()> {
    tracing::info!("Scenario: store, fetch, remove");

    let paste = Paste {
        text: "fn main() { println!(\"hi\"); }".to_string(),
        language: Some("rust".to_string()),
    };
    let id = backend.store(&paste, SystemClock.now() + 60)?;
    tracing::info!("   stored paste as {}", id);

    let fetched: Paste = backend.fetch(&id)?;
    ensure!(fetched == paste, "fetched paste differs from the stored one");

    backend.remove(&id);
    let missing = backend.fetch::<Paste>(&id);
    ensure!(
        matches!(missing, Err(ref err) if err.is_not_found()),
        "removed paste is still readable"
    );

    // Removing twice is harmless
    backend.remove(&id);

    tracing::info!("   ✓ lifecycle ok");
    Ok(())
}

/// Stores pastes from many tasks at once and checks every id is distinct
async fn run_parallel_stores(store: &Store) -> Result<()> {
    const TASKS: usize = 16;
    const PASTES_PER_TASK: usize = 250;

    tracing::info!(
        "Scenario: {} parallel tasks storing {} pastes each",
        TASKS,
        PASTES_PER_TASK
    );

    let expires_at = SystemClock.now() + 300;
    let tasks = (0..TASKS).map(|task| {
        let store = store.clone();
        tokio::task::spawn_blocking(move || {
            (0..PASTES_PER_TASK)
                .map(|i| {
                    let paste = Paste {
                        text: format!("task {task} paste {i}"),
                        language: None,
                    };
                    store.store(&paste, expires_at)
                })
                .collect::<Result<Vec<_>, _>>()
        })
    });

    let mut ids = HashSet::new();
    for result in join_all(tasks).await {
        for id in result?? {
            ensure!(ids.insert(id.clone()), "identifier {} handed out twice", id);
        }
    }
    ensure!(ids.len() == TASKS * PASTES_PER_TASK, "lost pastes");

    for id in &ids {
        store.remove(id);
    }

    tracing::info!("   ✓ {} distinct identifiers", ids.len());
    Ok(())
}

/// Lets a paste expire and reclaims it with a manual sweep
///
/// Uses its own store with a long sweep interval so the background sweep
/// cannot reclaim the paste first, whatever the demo was configured with.
async fn run_expiration() -> Result<()> {
    tracing::info!("Scenario: expiration");

    let config = StoreConfig::default().with_sweep_interval(Duration::from_secs(3600));
    let store = Store::with_config(config);

    let now = SystemClock.now();
    let short = store.store("gone soon", now + 1)?;
    let long = store.store("still here", now + 60)?;

    tokio::time::sleep(Duration::from_secs(2)).await;

    ensure!(
        matches!(store.fetch::<String>(&short), Err(ref err) if err.is_not_found()),
        "expired paste is still readable"
    );
    ensure!(store.len() == 2, "expired paste was reclaimed before the sweep");

    let reclaimed = store.sweep();
    ensure!(reclaimed == 1, "sweep reclaimed {} pastes, expected 1", reclaimed);
    ensure!(
        store.fetch::<String>(&long)? == "still here",
        "live paste was damaged by the sweep"
    );

    store.shutdown();
    tracing::info!("   ✓ reclaimed {} expired paste(s)", reclaimed);
    Ok(())
}
