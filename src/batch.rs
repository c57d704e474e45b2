//! Concurrent probing of several independent targets
//!
//! Every probe runs on tokio's blocking pool with its own ping process. Probes
//! share nothing, so the only coordination is the bound on in-flight tasks.

use crate::output::ProbeReport;
use crate::probe::TtlProber;
use futures::stream::{self, StreamExt};
use log::{error, warn};

/// Probe every target, at most `concurrency` at a time, keeping input order
pub async fn probe_many(prober: &TtlProber, targets: &[String], concurrency: usize) -> Vec<ProbeReport> {
    let concurrency = concurrency.max(1);

    stream::iter(targets.iter().map(|t| t.trim().to_string()))
        .map(|target| {
            let prober = prober.clone();
            async move {
                let task_target = target.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    let result = prober.try_probe(&task_target);
                    (task_target, result)
                })
                .await;

                match joined {
                    Ok((target, Ok(ttl))) => ProbeReport::new(target, ttl),
                    Ok((target, Err(e))) => {
                        error!("{}: {}", target, e);
                        ProbeReport::new(target, None).with_error(e.to_string())
                    }
                    Err(e) => {
                        warn!("Probe task for {} did not complete: {}", target, e);
                        ProbeReport::new(target, None).with_error(e.to_string())
                    }
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await
}
