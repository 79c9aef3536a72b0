//! Memo Demo - walks through the staleness window of a memoized computation
//!
//! Wraps a counter, then calls it across the configured update interval to
//! show cached and recomputed values. Options come from `MEMO_*` environment
//! variables, with the update interval defaulting to 4 seconds here.

use std::env;
use std::thread::sleep;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::{memoize, MemoConfig};

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Call the memoized counter at 0s, 1s, 2s and 5s
/// 4. Report cache statistics
fn main() -> Result<()> {
    // Defaults to debug for the library, overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=debug,memo_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = MemoConfig::from_env().context("failed to load MEMO_* configuration")?;
    if env::var("MEMO_UPDATE_INTERVAL").is_err() {
        config.update_interval = Duration::from_secs(4);
    }
    info!(
        "Configuration loaded: update_interval={:?}, max_size={}, strategy={}",
        config.update_interval, config.max_size, config.strategy
    );

    let mut counter = 0u64;
    let mut next = memoize(
        move |_: ()| {
            counter += 1;
            Ok::<_, std::convert::Infallible>(counter)
        },
        config,
    )
    .context("failed to wrap counter")?;

    let mut elapsed = Duration::ZERO;
    for pause in [0, 1, 1, 3] {
        let pause = Duration::from_secs(pause);
        sleep(pause);
        elapsed += pause;

        let value = next.call(()).context("memoized call failed")?;
        info!("t={:?}: counter returned {}", elapsed, value);
    }

    let stats = next.stats();
    info!(
        "Stats: {}",
        serde_json::to_string(&stats).context("failed to serialize stats")?
    );

    Ok(())
}
