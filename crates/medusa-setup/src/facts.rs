//! Rotating informational facts shown during long installs
//!
//! Dependency installation can take minutes. A background ticker rotates
//! short Medusa facts through the spinner message so the terminal does not
//! look stuck. The ticker is joined at the same cancellation point as the
//! install itself, so interrupts never leak a timer.

use std::time::Duration;

use indicatif::ProgressBar;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Interval between fact rotations
const ROTATION_INTERVAL: Duration = Duration::from_secs(6);

const FACTS: &[&str] = &[
    "Medusa is an open-source composable commerce platform.",
    "You can create custom endpoints by adding files under src/api.",
    "Plugins let you integrate payment, fulfillment, and notification providers.",
    "The admin dashboard will be available at localhost:9000/app once setup completes.",
    "Subscribers let you react to events like order.placed.",
    "Medusa supports multiple currencies and regions out of the box.",
];

/// Handle to a running facts ticker
pub struct FactsTicker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl FactsTicker {
    /// Spawn a ticker that rotates facts through the spinner message
    ///
    /// The ticker stops when `parent` is cancelled or when [`stop`] is
    /// called, whichever comes first.
    ///
    /// [`stop`]: FactsTicker::stop
    pub fn spawn(spinner: ProgressBar, parent: &CancellationToken) -> Self {
        let token = parent.child_token();
        let ticker_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(ROTATION_INTERVAL);
            // First tick fires immediately; keep the caller's initial message
            // on screen for one interval instead.
            interval.tick().await;

            let mut facts = FACTS.iter().cycle();
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Some(fact) = facts.next() {
                            spinner.set_message(format!("Installing dependencies... ({fact})"));
                        }
                    }
                    _ = ticker_token.cancelled() => {
                        debug!("Facts ticker stopped");
                        break;
                    }
                }
            }
        });

        Self { token, handle }
    }

    /// Stop the ticker and wait for it to finish
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_joins_ticker() {
        let spinner = ProgressBar::hidden();
        let token = CancellationToken::new();
        let ticker = FactsTicker::spawn(spinner, &token);
        // Must complete promptly; a leaked timer would hang the await.
        tokio::time::timeout(Duration::from_secs(1), ticker.stop())
            .await
            .expect("ticker did not stop");
    }

    #[tokio::test]
    async fn test_parent_cancellation_stops_ticker() {
        let spinner = ProgressBar::hidden();
        let token = CancellationToken::new();
        let ticker = FactsTicker::spawn(spinner, &token);
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), async {
            let _ = ticker.handle.await;
        })
        .await
        .expect("ticker did not observe parent cancellation");
    }
}
