use crate::domain::events::Event;
use std::time::Duration;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument, warn};

#[derive(Debug, PartialEq)]
pub enum SchedulerCommand {
    CompleteTransition { target_index: usize, delay: Duration },
}

/// Runs the session's deadlines. A transition completion is scheduled for the
/// exact duration the timing model computed for the camera move; when the
/// deadline passes, the session receives the arrival event.
#[instrument(skip_all)]
pub async fn scheduler(mut rx: Receiver<SchedulerCommand>, events_tx: Sender<Event>) {
    while let Some(command) = rx.recv().await {
        match command {
            SchedulerCommand::CompleteTransition { target_index, delay } => {
                debug!("🕗 Scheduling arrival at waypoint {} in {:?}...", target_index, delay);

                let events_tx_clone = events_tx.clone();
                tokio::spawn(async move {
                    let scheduled_instant = Instant::now() + delay;
                    sleep_until(scheduled_instant).await;

                    debug!("🕗 Arriving at waypoint {}...", target_index);
                    if events_tx_clone.send(Event::TransitionCompleted { target_index }).await.is_err() {
                        warn!("🕗 Session is gone, dropping the arrival at waypoint {}", target_index);
                    }
                });
            }
        }
    }
}
