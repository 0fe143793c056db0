use crate::app_config::AppConfig;
use crate::camera::CameraController;
use crate::domain::Coordinate;
use crate::domain::events::Event;
use crate::headless::{HeadlessAudio, HeadlessSurface};
use crate::itinerary::{FileItinerarySource, HttpItinerarySource, ItinerarySource};
use crate::scheduler::{SchedulerCommand, scheduler};
use crate::session::Session;
use crate::session_listener::session_listener;
use crate::traversal::TraversalState;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{info, trace};

mod app_config;
mod camera;
mod coordinate_deserializer;
mod domain;
mod extensions;
mod headless;
mod itinerary;
mod narration;
mod scheduler;
mod session;
mod session_listener;
mod timing;
mod traversal;

// The headless demo narration resolves to a fixed track length
const DEMO_NARRATION_SECS: f64 = 8.0;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🧭 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");

    let source: Arc<dyn ItinerarySource> = match config.api() {
        Some(api) => Arc::new(HttpItinerarySource::new(api)?),
        None => Arc::new(FileItinerarySource::new(config.routes().directory())),
    };

    let itinerary = Arc::new(source.itinerary(config.demo().route()).await?);
    info!("✅  Loaded route '{}' with {} waypoint(s)", config.demo().route(), itinerary.waypoint_count());

    let start = itinerary
        .segments()
        .first()
        .and_then(|segment| segment.path.first())
        .copied()
        .or_else(|| itinerary.waypoint_at(0).map(|waypoint| waypoint.coordinate))
        .unwrap_or(Coordinate::new(0.0, 0.0));
    let surface = Arc::new(HeadlessSurface::new(start, config.demo().presentation_zoom()));
    trace!("Viewport starts at {:?}", start);

    let (events_tx, events_rx) = mpsc::channel::<Event>(config.core().event_buffer_size());
    let (scheduler_tx, scheduler_rx) = mpsc::channel::<SchedulerCommand>(config.core().event_buffer_size());

    let (mut camera_controller, camera) = CameraController::new(surface.clone(), config.core().camera_buffer_size());
    task::spawn(async move {
        camera_controller.listen().await;
    });
    info!("✅  Initialized camera controller");

    task::spawn(scheduler(scheduler_rx, events_tx.clone()));
    info!("✅  Initialized scheduler");

    let audio = Arc::new(HeadlessAudio::new(events_tx.clone(), DEMO_NARRATION_SECS));

    let mut session = Session::new(&config, itinerary, camera, scheduler_tx, source, audio, events_rx);
    let mut notifier_rx = session.notifier();
    task::spawn(session_listener(session.notifier(), events_tx.clone(), config.demo().waypoint_dwell()));
    task::spawn(async move {
        session.listen().await;
    });
    info!("✅  Initialized session");

    events_tx.send(Event::Advance).await.expect("Could not start the tour");
    info!("🔥 {} is touring", env!("CARGO_PKG_NAME"));

    while notifier_rx.changed().await.is_ok() {
        if notifier_rx.borrow().state == TraversalState::Finished {
            break;
        }
    }

    info!("🧭 Tour complete, rendered {} pan steps and {} zoom steps", surface.centers().len(), surface.zooms().len());
    Ok(())
}
