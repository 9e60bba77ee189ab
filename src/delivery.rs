//! Delivery side of the pipeline: queue → resolver → transport.
//!
//! [`tick`] performs exactly one pass and is deterministic with respect to
//! time; [`run`] repeats it forever on the configured interval. A failed
//! delivery leaves the item untouched for the next pass and never affects
//! the other queued items.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::queue::QueueStore;
use crate::resolve::AddressResolver;
use crate::transport::Transport;

/// What one delivery pass over the queue did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// One pass: resolve the target once (never cached across passes), then try
/// every staged item in sorted order. An item is removed only after the
/// transport reports acceptance.
pub async fn tick<Q, R, T>(queue: &Q, resolver: &R, transport: &T) -> DeliveryReport
where
    Q: QueueStore + ?Sized,
    R: AddressResolver + ?Sized,
    T: Transport + ?Sized,
{
    let mut report = DeliveryReport::default();

    let target = resolver.resolve().await;
    let pending = match queue.list_pending() {
        Ok(pending) => pending,
        Err(e) => {
            error!(error = %e, "Failed to list pending queue items");
            return report;
        }
    };

    for id in pending {
        report.attempted += 1;
        match deliver_item(queue, transport, &target, &id).await {
            Ok(true) => report.delivered += 1,
            Ok(false) => report.failed += 1,
            Err(e) => {
                report.failed += 1;
                error!(
                    error = %e,
                    id = %id,
                    target = %target,
                    "Delivery attempt failed, item kept for retry"
                );
            }
        }
    }
    report
}

async fn deliver_item<Q, T>(
    queue: &Q,
    transport: &T,
    target: &str,
    id: &str,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>
where
    Q: QueueStore + ?Sized,
    T: Transport + ?Sized,
{
    let payload = queue.read(id)?;
    info!(id = %id, target = %target, "Attempting delivery");
    if transport.deliver(target, &payload).await? {
        queue.remove(id)?;
        debug!(id = %id, "Delivered and removed from queue");
        Ok(true)
    } else {
        warn!(id = %id, target = %target, "Collector rejected item, kept for retry");
        Ok(false)
    }
}

/// Runs delivery passes for the lifetime of the process.
pub async fn run<Q, R, T>(queue: &Q, resolver: &R, transport: &T, interval: Duration)
where
    Q: QueueStore + ?Sized,
    R: AddressResolver + ?Sized,
    T: Transport + ?Sized,
{
    loop {
        let report = tick(queue, resolver, transport).await;
        if report.attempted > 0 {
            info!(
                attempted = report.attempted,
                delivered = report.delivered,
                failed = report.failed,
                "Delivery pass complete"
            );
        }
        tokio::time::sleep(interval).await;
    }
}
