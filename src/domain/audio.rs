use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// Narration playback handle. Position, duration and ended notifications
/// arrive as [`Event`](crate::domain::events::Event)s from the host side;
/// this trait only carries the control surface the session needs.
#[async_trait]
pub trait AudioHandle: Debug + Send + Sync {
    /// Points the handle at a narration asset. Duration becomes known
    /// asynchronously once the media resolves its own metadata.
    async fn load(&self, asset_ref: &str) -> Result<(), PlaybackError>;

    async fn play(&self) -> Result<(), PlaybackError>;

    async fn pause(&self);
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("autoplay was rejected by the host")]
    Blocked,
    #[error("no narration track is loaded")]
    NoTrack,
}
