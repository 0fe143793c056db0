use crate::app_config::AppConfig;
use crate::camera::CameraHandle;
use crate::domain::audio::{AudioHandle, PlaybackError};
use crate::domain::events::Event;
use crate::domain::Itinerary;
use crate::itinerary::ItinerarySource;
use crate::narration::{NarrationSync, NarrationText, parse_keyframes};
use crate::scheduler::SchedulerCommand;
use crate::traversal::{TraversalController, TraversalState};
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// One guided demo session: owns the traversal state machine and the narration
/// engine, drains the event stream and broadcasts a snapshot of the live state
/// after every event. Dropped when the session ends.
pub struct Session {
    itinerary: Arc<Itinerary>,
    traversal: TraversalController,
    narration: NarrationSync,
    narration_enabled: bool,
    gallery_index: usize,
    camera: CameraHandle,
    scheduler_tx: Sender<SchedulerCommand>,
    source: Arc<dyn ItinerarySource>,
    audio: Arc<dyn AudioHandle>,
    rx: Receiver<Event>,
    notifier_tx: WatchSender<SessionSnapshot>,
    notifier_rx: WatchReceiver<SessionSnapshot>,
}

/// Cloneable view of the session state for whatever renders it.
#[derive(Clone, PartialEq, Debug)]
pub struct SessionSnapshot {
    pub state: TraversalState,
    pub narration: NarrationText,
    /// One past the last keyframe once playback ended, `None` before the first.
    pub active_keyframe: Option<usize>,
    pub visible_remaining: Vec<String>,
    pub gallery_index: usize,
}

impl Session {
    pub fn new(
        config: &AppConfig,
        itinerary: Arc<Itinerary>,
        camera: CameraHandle,
        scheduler_tx: Sender<SchedulerCommand>,
        source: Arc<dyn ItinerarySource>,
        audio: Arc<dyn AudioHandle>,
        rx: Receiver<Event>,
    ) -> Self {
        let traversal = TraversalController::new(
            itinerary.clone(),
            config.demo().presentation_zoom(),
            config.demo().skip_transitions(),
            config.demo().skip_transition_delay(),
        );
        let narration = NarrationSync::new(config.narration().trailing_silence_secs(), config.narration().min_duration_factor());

        let initial = SessionSnapshot {
            state: traversal.state(),
            narration: NarrationText::default(),
            active_keyframe: None,
            visible_remaining: traversal.visible_remaining(),
            gallery_index: 0,
        };
        let (notifier_tx, notifier_rx) = watch::channel(initial);

        Session {
            itinerary,
            traversal,
            narration,
            narration_enabled: config.narration().enabled(),
            gallery_index: 0,
            camera,
            scheduler_tx,
            source,
            audio,
            rx,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> WatchReceiver<SessionSnapshot> {
        self.notifier_rx.clone()
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            debug!("🔵 Received event: {:?}", event);
            match event {
                Event::Advance => self.traversal.advance(&self.camera, &self.scheduler_tx).await,
                Event::Retreat => self.traversal.retreat(&self.camera, &self.scheduler_tx).await,
                Event::Recenter => self.traversal.recenter(&self.camera).await,
                Event::TransitionCompleted { target_index } => {
                    if self.traversal.complete(target_index) {
                        self.enter_waypoint(target_index).await;
                    }
                }
                Event::PlaybackPosition(position) => self.narration.position_changed(position),
                Event::PlaybackDuration(duration) => {
                    self.narration.set_duration(duration);
                }
                Event::PlaybackEnded => self.narration.ended(),
                Event::GalleryNext => self.page_gallery(1),
                Event::GalleryPrevious => self.page_gallery(-1),
            }

            self.publish();

            if self.traversal.state() == TraversalState::Finished {
                info!("🔵 The tour is finished, ending the session");
                return;
            }
        }
    }

    async fn enter_waypoint(&mut self, index: usize) {
        let Some(waypoint) = self.itinerary.waypoint_at(index).cloned() else {
            warn!("⚠️ Arrived at unknown waypoint index {}", index);
            return;
        };

        info!("🟢 Presenting waypoint '{}' ({}/{})", waypoint.name, index + 1, self.itinerary.waypoint_count());

        // Per-waypoint UI state starts fresh
        self.gallery_index = 0;
        self.narration.clear();

        if !self.narration_enabled {
            return;
        }

        // Stop whatever the previous waypoint was still saying
        self.audio.pause().await;

        if let Some(keyframes_ref) = &waypoint.keyframes_ref {
            match self.source.keyframes(keyframes_ref).await {
                Ok(raw) => self.narration.load(parse_keyframes(&raw)),
                Err(error) => warn!("⚠️ Could not load keyframes '{}': {}, showing the description instead", keyframes_ref, error),
            }
        }

        if let Some(audio_ref) = &waypoint.narration_audio_ref {
            if let Err(error) = self.audio.load(audio_ref).await {
                warn!("⚠️ Could not load narration '{}': {}", audio_ref, error);
                return;
            }

            match self.audio.play().await {
                Ok(()) => debug!("🔵 Narration playing for '{}'", waypoint.name),
                Err(PlaybackError::Blocked) => warn!("⚠️ Autoplay was rejected by the host, awaiting manual resume"),
                Err(error) => warn!("⚠️ Could not start narration: {}", error),
            }
        }
    }

    fn page_gallery(&mut self, delta: isize) {
        let Some(waypoint) = self.traversal.active_index().and_then(|index| self.itinerary.waypoint_at(index)) else {
            return;
        };

        if waypoint.image_refs.is_empty() {
            return;
        }

        let paged = self.gallery_index as isize + delta;
        self.gallery_index = paged.clamp(0, waypoint.image_refs.len() as isize - 1) as usize;
    }

    fn publish(&self) {
        let narration = match self.traversal.active_index().and_then(|index| self.itinerary.waypoint_at(index)) {
            Some(waypoint) => self.narration.display_text(&waypoint.description),
            None => NarrationText::default(),
        };

        let snapshot = SessionSnapshot {
            state: self.traversal.state(),
            narration,
            active_keyframe: self.narration.active_index(),
            visible_remaining: self.traversal.visible_remaining(),
            gallery_index: self.gallery_index,
        };

        self.notifier_tx.send(snapshot).unwrap_or_default();
    }
}
