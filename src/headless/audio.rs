use crate::domain::audio::{AudioHandle, PlaybackError};
use crate::domain::events::Event;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use tracing::debug;

const METADATA_DELAY: Duration = Duration::from_millis(50);
const TICK: Duration = Duration::from_millis(250);

/// Simulated narration playback for the demo binary and the behavioral tests:
/// `load` resolves a fixed track duration once the "metadata" is ready, `play`
/// emits position ticks until the track ends.
#[derive(Debug)]
pub struct HeadlessAudio {
    events_tx: Sender<Event>,
    duration_secs: f64,
    autoplay_blocked: bool,
    track: Mutex<Option<String>>,
}

impl HeadlessAudio {
    pub fn new(events_tx: Sender<Event>, duration_secs: f64) -> Self {
        HeadlessAudio {
            events_tx,
            duration_secs,
            autoplay_blocked: false,
            track: Mutex::new(None),
        }
    }

    /// Simulates a host whose autoplay policy rejects `play`.
    pub fn with_autoplay_blocked(mut self) -> Self {
        self.autoplay_blocked = true;
        self
    }
}

#[async_trait]
impl AudioHandle for HeadlessAudio {
    async fn load(&self, asset_ref: &str) -> Result<(), PlaybackError> {
        debug!("🔉 Loading narration track '{}'", asset_ref);
        *self.track.lock().unwrap() = Some(asset_ref.to_string());

        let events_tx = self.events_tx.clone();
        let duration = self.duration_secs;
        tokio::spawn(async move {
            sleep(METADATA_DELAY).await;
            events_tx.send(Event::PlaybackDuration(duration)).await.unwrap_or_default();
        });

        Ok(())
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        if self.autoplay_blocked {
            return Err(PlaybackError::Blocked);
        }

        if self.track.lock().unwrap().is_none() {
            return Err(PlaybackError::NoTrack);
        }

        let events_tx = self.events_tx.clone();
        let duration = self.duration_secs;
        tokio::spawn(async move {
            let mut position = 0.0;
            while position < duration {
                sleep(TICK).await;
                position = (position + TICK.as_secs_f64()).min(duration);
                if events_tx.send(Event::PlaybackPosition(position)).await.is_err() {
                    return;
                }
            }
            events_tx.send(Event::PlaybackEnded).await.unwrap_or_default();
        });

        Ok(())
    }

    async fn pause(&self) {
        debug!("🔉 Pausing narration");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use tokio::sync::mpsc;

    #[test(tokio::test(start_paused = true))]
    async fn resolves_the_duration_after_loading() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let audio = HeadlessAudio::new(tx, 4.0);

        audio.load("wp1.mp3").await.unwrap();

        match rx.recv().await {
            Some(Event::PlaybackDuration(duration)) => assert_eq!(duration, 4.0),
            other => panic!("expected a duration event, got {:?}", other),
        }
    }

    #[test(tokio::test(start_paused = true))]
    async fn plays_through_the_track_and_reports_the_end() {
        let (tx, mut rx) = mpsc::channel::<Event>(64);
        let audio = HeadlessAudio::new(tx, 1.0);

        audio.load("wp1.mp3").await.unwrap();
        audio.play().await.unwrap();

        let mut saw_position = false;
        loop {
            match rx.recv().await {
                Some(Event::PlaybackPosition(position)) => {
                    assert!(position <= 1.0);
                    saw_position = true;
                }
                Some(Event::PlaybackEnded) => break,
                Some(Event::PlaybackDuration(_)) => {}
                other => panic!("unexpected event: {:?}", other),
            }
        }

        assert!(saw_position);
    }

    #[test(tokio::test)]
    async fn play_without_a_track_is_rejected() {
        let (tx, _rx) = mpsc::channel::<Event>(8);
        let audio = HeadlessAudio::new(tx, 4.0);

        assert!(matches!(audio.play().await, Err(PlaybackError::NoTrack)));
    }

    #[test(tokio::test)]
    async fn a_blocked_host_rejects_autoplay() {
        let (tx, _rx) = mpsc::channel::<Event>(8);
        let audio = HeadlessAudio::new(tx, 4.0).with_autoplay_blocked();

        audio.load("wp1.mp3").await.unwrap();
        assert!(matches!(audio.play().await, Err(PlaybackError::Blocked)));
    }
}
