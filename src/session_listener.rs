use crate::domain::events::Event;
use crate::session::SessionSnapshot;
use crate::traversal::TraversalState;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch::Receiver;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Auto-advance for the demo binary: dwell on every presented waypoint, then
/// move on. Duplicate or early advances are absorbed by the traversal guards.
#[instrument(skip_all)]
pub async fn session_listener(mut rx: Receiver<SessionSnapshot>, events_tx: Sender<Event>, dwell: Duration) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow().state;
        match state {
            TraversalState::Presenting { current } => {
                debug!("👁️ Dwelling on waypoint {} for {:?}", current, dwell);
                sleep(dwell).await;

                if events_tx.send(Event::Advance).await.is_err() {
                    return;
                }
            }
            TraversalState::Finished => {
                info!("👁️ The tour is finished, stopping the auto-advance");
                return;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::NarrationText;
    use test_log::test;
    use tokio::sync::{mpsc, watch};
    use tokio::task;

    fn snapshot(state: TraversalState) -> SessionSnapshot {
        SessionSnapshot {
            state,
            narration: NarrationText::default(),
            active_keyframe: None,
            visible_remaining: vec![],
            gallery_index: 0,
        }
    }

    #[test(tokio::test(start_paused = true))]
    async fn advances_after_dwelling_on_a_presented_waypoint() {
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot(TraversalState::Idle));
        let (events_tx, mut events_rx) = mpsc::channel::<Event>(8);
        task::spawn(session_listener(snapshot_rx, events_tx, Duration::from_secs(5)));

        snapshot_tx.send(snapshot(TraversalState::Presenting { current: 0 })).unwrap();

        assert!(matches!(events_rx.recv().await, Some(Event::Advance)));
    }

    #[test(tokio::test(start_paused = true))]
    async fn stops_once_the_tour_is_finished() {
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot(TraversalState::Idle));
        let (events_tx, mut events_rx) = mpsc::channel::<Event>(8);
        let listener = task::spawn(session_listener(snapshot_rx, events_tx, Duration::from_secs(5)));

        snapshot_tx.send(snapshot(TraversalState::Finished)).unwrap();

        listener.await.unwrap();
        assert!(events_rx.recv().await.is_none(), "the listener dropped its sender without advancing");
    }

    #[test(tokio::test(start_paused = true))]
    async fn ignores_transitional_states() {
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot(TraversalState::Idle));
        let (events_tx, mut events_rx) = mpsc::channel::<Event>(8);
        task::spawn(session_listener(snapshot_rx, events_tx, Duration::from_millis(100)));

        snapshot_tx.send(snapshot(TraversalState::Transitioning { target: 0 })).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(events_rx.try_recv().is_err());
    }
}
