//! Headless gameplay simulation binary.
//!
//! Composition root: reads configuration from the environment (and `.env`),
//! sets up logging, starts the runtime on the bundled content and plays a
//! short scripted encounter while logging every event the runtime publishes.
//!
//! ```bash
//! RUST_LOG=gameplay_sim=info,gameplay_runtime=debug cargo run -p gameplay-sim
//! GAMEPLAY_CONTENT_DIR=path/to/data GAMEPLAY_FIXED_DT=0.1 cargo run -p gameplay-sim
//! ```

mod scenario;

use anyhow::Result;
use gameplay_runtime::{Event, Runtime, RuntimeConfig, Topic};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const BUNDLED_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    setup_logging();

    let config = RuntimeConfig::from_env_or(BUNDLED_DATA);
    if let Some(dir) = &config.content_dir {
        tracing::info!("content directory: {}", dir.display());
    }

    let runtime = Runtime::builder().config(config).build().await?;

    let logger = tokio::spawn(log_events(
        runtime.subscribe(Topic::Gameplay),
        runtime.subscribe(Topic::Tags),
    ));

    let summary = scenario::run(&runtime).await?;
    runtime.shutdown().await?;
    logger.await?;

    tracing::info!(
        "scenario finished after {} ticks, state root {}",
        summary.ticks,
        hex::encode(summary.state_root)
    );
    for line in summary.lines {
        tracing::info!("{}", line);
    }
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Logs gameplay and tag events until the runtime's bus is dropped.
async fn log_events(
    mut gameplay: broadcast::Receiver<Event>,
    mut tags: broadcast::Receiver<Event>,
) {
    loop {
        let received = tokio::select! {
            event = gameplay.recv() => event,
            event = tags.recv() => event,
        };
        match received {
            Ok(Event::Gameplay(notice)) => {
                let event = notice.event;
                tracing::info!(
                    target: "gameplay_sim::events",
                    "[tick {:>3}] {} {} -> {} id={} magnitude={}",
                    notice.tick,
                    event.kind,
                    event.source,
                    event.target,
                    event.id,
                    event.magnitude
                );
            }
            Ok(Event::Tag(notice)) => {
                let change = notice.change;
                tracing::info!(
                    target: "gameplay_sim::events",
                    "[tick {:>3}] tag {} on {} mask={:?}",
                    notice.tick,
                    change.kind,
                    change.entity,
                    change.tag_mask
                );
            }
            Ok(Event::Tick(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("event logger lagged, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
