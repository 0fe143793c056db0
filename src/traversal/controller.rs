use crate::camera::{CameraError, CameraHandle};
use crate::domain::Itinerary;
use crate::scheduler::SchedulerCommand;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TraversalState {
    Idle,
    Transitioning { target: usize },
    Presenting { current: usize },
    Finished,
}

/// The top-level state machine of a guided tour: moves the active waypoint
/// forward and backward through the itinerary's flat index space, starts the
/// cinematic camera move for each hop and schedules its completion.
#[derive(Debug)]
pub struct TraversalController {
    itinerary: Arc<Itinerary>,
    state: TraversalState,
    presentation_zoom: f64,
    skip_transitions: bool,
    skip_transition_delay: Duration,
}

impl TraversalController {
    pub fn new(itinerary: Arc<Itinerary>, presentation_zoom: f64, skip_transitions: bool, skip_transition_delay: Duration) -> Self {
        TraversalController {
            itinerary,
            state: TraversalState::Idle,
            presentation_zoom,
            skip_transitions,
            skip_transition_delay,
        }
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// The flat index of the waypoint currently presented, if any.
    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            TraversalState::Presenting { current } => Some(current),
            _ => None,
        }
    }

    /// Moves toward the next waypoint; starts the tour when idle and finishes
    /// it past the last waypoint. A no-op while a transition is in progress.
    pub async fn advance(&mut self, camera: &CameraHandle, scheduler_tx: &Sender<SchedulerCommand>) {
        match self.state {
            TraversalState::Transitioning { target } => debug!("🧭 Ignoring advance, already transitioning to waypoint {}", target),
            TraversalState::Finished => debug!("🧭 Ignoring advance, the tour is finished"),
            TraversalState::Idle => self.begin_transition(0, camera, scheduler_tx).await,
            TraversalState::Presenting { current } => {
                if Some(current) == self.itinerary.last_index() {
                    info!("🧭 Reached the last waypoint, the tour is finished");
                    self.state = TraversalState::Finished;
                } else {
                    self.begin_transition(current + 1, camera, scheduler_tx).await;
                }
            }
        }
    }

    /// Moves back toward the previous waypoint. A no-op at the first waypoint
    /// and while a transition is in progress.
    pub async fn retreat(&mut self, camera: &CameraHandle, scheduler_tx: &Sender<SchedulerCommand>) {
        match self.state {
            TraversalState::Presenting { current } if current > 0 => self.begin_transition(current - 1, camera, scheduler_tx).await,
            state => debug!("🧭 Ignoring retreat in state {:?}", state),
        }
    }

    /// Pans the viewport back to the active waypoint after the user moved it
    /// away. Queued behind whatever camera sequence is running.
    pub async fn recenter(&self, camera: &CameraHandle) {
        let Some(waypoint) = self.active_index().and_then(|index| self.itinerary.waypoint_at(index)) else {
            debug!("🧭 Ignoring recenter, no waypoint is being presented");
            return;
        };

        if let Err(error) = camera.smooth_pan_to(waypoint.coordinate, self.presentation_zoom).await {
            warn!("🧭 Could not recenter on '{}': {}", waypoint.name, error);
        }
    }

    /// Marks the scheduled arrival at `target`. Returns whether the waypoint
    /// became the presented one; a completion that does not match the pending
    /// transition is stale and ignored.
    pub fn complete(&mut self, target: usize) -> bool {
        match self.state {
            TraversalState::Transitioning { target: pending } if pending == target => {
                self.state = TraversalState::Presenting { current: target };
                true
            }
            state => {
                debug!("🧭 Ignoring stale completion for waypoint {} in state {:?}", target, state);
                false
            }
        }
    }

    /// The waypoints revealed on the map beyond the active one, in order.
    pub fn visible_remaining(&self) -> Vec<String> {
        let from = match self.state {
            TraversalState::Idle => 0,
            TraversalState::Transitioning { target } => target + 1,
            TraversalState::Presenting { current } => current + 1,
            TraversalState::Finished => self.itinerary.waypoint_count(),
        };

        self.itinerary.waypoints().skip(from).map(|waypoint| waypoint.id.clone()).collect()
    }

    async fn begin_transition(&mut self, target: usize, camera: &CameraHandle, scheduler_tx: &Sender<SchedulerCommand>) {
        let Some(waypoint) = self.itinerary.waypoint_at(target).cloned() else {
            warn!("🧭 No waypoint at index {}, clearing the active state", target);
            self.state = TraversalState::Idle;
            return;
        };

        let previous = self.state;
        self.state = TraversalState::Transitioning { target };

        match camera.cinematic_pan_to(waypoint.coordinate, self.presentation_zoom).await {
            Ok(info) => {
                let delay = if self.skip_transitions { self.skip_transition_delay } else { info.duration };
                info!("🧭 Transitioning to waypoint '{}' ({:.1} km away, arriving in {:?})", waypoint.name, info.distance_km(), delay);

                let command = SchedulerCommand::CompleteTransition { target_index: target, delay };
                if scheduler_tx.send(command).await.is_err() {
                    warn!("🧭 Scheduler is gone, cannot complete the transition to waypoint {}", target);
                }
            }
            Err(CameraError::TransitionInFlight) => {
                warn!("🧭 Camera is still transitioning, keeping the previous state");
                self.state = previous;
            }
            Err(error) => {
                warn!("🧭 Camera rejected the transition to waypoint {}: {}", target, error);
                self.state = previous;
            }
        }
    }
}
