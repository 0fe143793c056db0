use crate::domain::Itinerary;
use crate::extensions::path_ext::FileName;
use crate::itinerary::serialized_route::SerializedRoute;
use crate::itinerary::source::{ItineraryError, ItinerarySource};
use async_trait::async_trait;
use futures::stream::FuturesUnordered;
use std::io;
use std::path::{Path, PathBuf};
use tokio::{fs, task};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReadDirStream;
use tracing::{info, instrument, warn};

/// Loads route documents from a directory of JSON files and resolves keyframe
/// assets relative to it. Used by the demo binary and by tests; deployments
/// with a route catalog service use [`HttpItinerarySource`] instead.
///
/// [`HttpItinerarySource`]: crate::itinerary::HttpItinerarySource
#[derive(Debug)]
pub struct FileItinerarySource {
    directory: PathBuf,
}

impl FileItinerarySource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        FileItinerarySource { directory: directory.into() }
    }

    #[instrument(skip(self))]
    pub async fn load_routes(&self) -> Result<Vec<SerializedRoute>, ItineraryError> {
        info!("📁 Loading routes...");
        let files = list_files(&self.directory, "json")
            .await
            .map_err(|source| ItineraryError::Io { source, path: None })?;

        let results = load_files(files).await;
        let (routes, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);

        for error in errors.iter().filter_map(|result| result.as_ref().err()) {
            log_error(error);
        }

        info!("📁 Loading routes... OK, {} loaded, {} failed", routes.len(), errors.len());
        Ok(routes.into_iter().filter_map(Result::ok).collect())
    }
}

#[async_trait]
impl ItinerarySource for FileItinerarySource {
    #[instrument(skip(self))]
    async fn itinerary(&self, route_id: &str) -> Result<Itinerary, ItineraryError> {
        let routes = self.load_routes().await?;

        let Some(route) = routes.into_iter().find(|route| route.id == route_id) else {
            return Err(ItineraryError::MissingData(route_id.to_string()));
        };

        info!("📁 Route '{}' resolved to '{}'", route_id, route.name);
        let itinerary = route.into_itinerary();
        if itinerary.is_empty() {
            return Err(ItineraryError::MissingData(route_id.to_string()));
        }

        Ok(itinerary)
    }

    async fn keyframes(&self, asset_ref: &str) -> Result<String, ItineraryError> {
        let path = self.directory.join(asset_ref);
        fs::read_to_string(&path).await.map_err(|source| ItineraryError::Io { source, path: Some(path) })
    }
}

#[instrument]
async fn list_files(directory: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let dir = fs::read_dir(directory).await?;
    let mut entries = ReadDirStream::new(dir);

    while let Some(entry) = entries.next().await {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
                    files.push(path);
                }
            }
            Err(err) => warn!("⚠️ Unable to read directory entry: {}", err),
        }
    }

    Ok(files)
}

#[instrument(skip_all)]
async fn load_files(paths: Vec<PathBuf>) -> Vec<Result<SerializedRoute, ItineraryError>> {
    FuturesUnordered::from_iter(paths.into_iter().map(|path| async move {
        match fs::read_to_string(&path).await {
            Ok(content) => {
                task::spawn_blocking(move || {
                    serde_json::from_str::<SerializedRoute>(&content).map_err(|source| ItineraryError::Malformed { source, path: Some(path) })
                })
                .await?
            }
            Err(err) => Err(ItineraryError::Io {
                source: err,
                path: Some(path),
            }),
        }
    }))
    .collect()
    .await
}

#[instrument(skip_all)]
fn log_error(error: &ItineraryError) {
    match error {
        ItineraryError::Malformed { source, path: Some(path) } => warn!("⚠️ Failed to load '{}': {}", path.string_file_name(), source),
        ItineraryError::Io { source, path } => match path {
            Some(path) => warn!("⚠️ Failed to load '{}': {}", path.string_file_name(), source),
            None => warn!("⚠️ {}", source),
        },
        error => warn!("⚠️ {}", error),
    }
}
