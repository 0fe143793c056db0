use crate::domain::Itinerary;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinError;

/// Where a session's route data comes from. The engine asks once per session
/// for the itinerary and once per active waypoint for its keyframes asset; no
/// live subscription is required.
#[async_trait]
pub trait ItinerarySource: Send + Sync {
    /// The itinerary for a session identifier. `MissingData` means the demo
    /// session simply does not start.
    async fn itinerary(&self, route_id: &str) -> Result<Itinerary, ItineraryError>;

    /// The raw keyframes asset for a waypoint, `<seconds>:<cumulative text>`
    /// pairs, one per line.
    async fn keyframes(&self, asset_ref: &str) -> Result<String, ItineraryError>;
}

#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("no route data for '{0}'")]
    MissingData(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{}", source)]
    Io { source: io::Error, path: Option<PathBuf> },
    #[error("{}", source)]
    Malformed { source: serde_json::Error, path: Option<PathBuf> },
    #[error(transparent)]
    JoinError(#[from] JoinError),
}
