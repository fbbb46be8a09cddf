//! `xspace-quote` -- bill a visit snapshot from the command line.
//!
//! Prints the current bill for one visit, or with `QUOTE_WATCH` keeps
//! printing the running total until the visit ends or Ctrl-C.  Quotes go
//! to stdout; logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable          | Required | Default | Description                               |
//! |-------------------|----------|---------|-------------------------------------------|
//! | `VISIT_FILE`      | yes      | --      | Path to a visit JSON snapshot             |
//! | `QUOTE_FORMAT`    | no       | `text`  | `text` or `json`                          |
//! | `QUOTE_WATCH`     | no       | `false` | Re-print the running total every tick     |
//! | `QUOTE_TICK_SECS` | no       | `1`     | Seconds between refreshes in watch mode   |
//! | `RATE_*`, `GRACE_MINUTES`, `ROUND_UP_THRESHOLD_MINUTES` | no | reference rates | Pricing |

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xspace_quote::config::QuoteConfig;
use xspace_quote::{input, render, watch};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xspace_quote=info,xspace_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{e:#}"), "xspace-quote failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = QuoteConfig::from_env()?;
    tracing::info!(
        visit_file = %config.visit_file.display(),
        watch = config.watch,
        tick_secs = config.tick.as_secs(),
        "Loaded quote configuration",
    );

    // Locked per write, never across an await.
    let mut stdout = std::io::stdout();

    if config.watch {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        watch::run(&config, &mut stdout, shutdown).await?;
    } else {
        let visit = input::load_visit(&config.visit_file)?;
        render::write_quote(
            &mut stdout,
            config.format,
            &visit,
            &config.rates,
            Utc::now(),
        )?;
    }
    Ok(())
}
