//! Live running total for an open visit.
//!
//! Re-reads the snapshot and re-bills it on every tick, so a sync process
//! rewriting the file (pause, resume, products, check-out) is picked up.
//! Stops when the visit has ended or `shutdown` resolves.

use std::future::Future;
use std::io::Write;

use chrono::Utc;
use tokio::time::MissedTickBehavior;

use xspace_core::visit::{Visit, VisitStatus};

use crate::config::QuoteConfig;
use crate::input::load_visit;
use crate::render::write_quote;

/// Run the watch loop, returning the number of quotes written.
///
/// A failure to load the snapshot on the first tick is fatal; later
/// failures keep the last good snapshot and log a warning.
pub async fn run<W, S>(config: &QuoteConfig, out: &mut W, shutdown: S) -> anyhow::Result<u64>
where
    W: Write,
    S: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(config.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut visit: Option<Visit> = None;
    let mut written = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!(quotes = written, "Watch cancelled");
                break;
            }
            _ = interval.tick() => {
                match load_visit(&config.visit_file) {
                    Ok(fresh) => visit = Some(fresh),
                    Err(e) if visit.is_none() => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to reload visit, keeping last snapshot");
                    }
                }
                let Some(current) = visit.as_ref() else {
                    continue;
                };

                let bill = write_quote(out, config.format, current, &config.rates, Utc::now())?;
                written += 1;

                if bill.status == VisitStatus::Ended {
                    tracing::info!(
                        visit_id = %current.id,
                        total = bill.total,
                        "Visit has ended, stopping watch",
                    );
                    break;
                }
            }
        }
    }

    Ok(written)
}
