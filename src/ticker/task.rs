use std::time::Duration;

use tokio::select;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{PairSource, TokenTicker};

/// Handle to a running ticker.
///
/// Stopping the task, explicitly or by dropping this handle, cancels both the
/// pending tick and any request that is still in flight.
#[derive(Debug)]
pub struct TickerTask {
    quit: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TickerTask {
    pub(super) fn spawn<S: PairSource>(ticker: TokenTicker<S>, period: Duration) -> Self {
        let (quit, mut stop) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!("start token ticker that runs every {:?}", interval.period());

            loop {
                select! {
                    biased;
                    _ = &mut stop => break,
                    _ = interval.tick() => {}
                }

                select! {
                    biased;
                    _ = &mut stop => break,
                    _ = ticker.refresh() => {}
                }
            }

            tracing::info!("token ticker stopped");
        });

        Self { quit, handle }
    }

    /// Signals the task to stop and waits until it has.
    pub async fn shutdown(self) {
        let Self { quit, handle } = self;
        let _ = quit.send(());

        if let Err(error) = handle.await {
            tracing::error!(error = ?error, "token ticker ended abnormally: {}", error);
        }
    }
}
