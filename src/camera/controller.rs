use crate::domain::surface::RenderSurface;
use crate::domain::{Coordinate, TransitionInfo};
use crate::timing;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, Sender, channel};
use tokio::sync::{oneshot, watch};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

const SMOOTH_PAN_STEPS: u32 = 20;
const SMOOTH_PAN_STEP_DELAY: Duration = Duration::from_millis(20);

const CINEMATIC_PAN_STEPS: u32 = 100;
const CINEMATIC_PAN_STEP_DELAY: Duration = Duration::from_millis(20);

// Zoom steps settle at different rates per direction: zooming back in reveals
// detail and needs the longer pause to read as smooth.
const ZOOM_OUT_STEP_DELAY: Duration = Duration::from_millis(100);
const ZOOM_IN_STEP_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub enum CameraCommand {
    SmoothPanTo {
        target: Coordinate,
        zoom: f64,
    },
    CinematicPanTo {
        target: Coordinate,
        zoom: f64,
        info_tx: oneshot::Sender<TransitionInfo>,
    },
}

/// Drives the map viewport. The controller is a single task draining a command
/// queue, so at most one interpolation is active at any time and requests are
/// served in arrival order; the viewport is mutated by nothing else.
///
/// Queue state lives on the instance, one controller per active session.
#[derive(Debug)]
pub struct CameraController<S: RenderSurface> {
    surface: S,
    rx: Receiver<CameraCommand>,
    cinematic_in_flight: Arc<AtomicBool>,
}

/// Cloneable sender half used by the rest of the session to request camera moves.
#[derive(Clone, Debug)]
pub struct CameraHandle {
    tx: Sender<CameraCommand>,
    cinematic_in_flight: Arc<AtomicBool>,
}

impl<S: RenderSurface> CameraController<S> {
    pub fn new(surface: S, buffer_size: usize) -> (Self, CameraHandle) {
        let (tx, rx) = channel::<CameraCommand>(buffer_size);
        let cinematic_in_flight = Arc::new(AtomicBool::new(false));

        let controller = CameraController {
            surface,
            rx,
            cinematic_in_flight: cinematic_in_flight.clone(),
        };

        (controller, CameraHandle { tx, cinematic_in_flight })
    }

    #[instrument(skip_all)]
    pub async fn listen(&mut self) {
        while let Some(command) = self.rx.recv().await {
            match command {
                CameraCommand::SmoothPanTo { target, zoom } => self.smooth_pan(target, zoom).await,
                CameraCommand::CinematicPanTo { target, zoom, info_tx } => {
                    self.cinematic_pan(target, zoom, info_tx).await;
                    self.cinematic_in_flight.store(false, Ordering::Release);
                }
            }
        }
    }

    async fn smooth_pan(&self, target: Coordinate, zoom: f64) {
        let from = self.surface.center();
        debug!("🎥 Panning to ({:.4}, {:.4})...", target.lat, target.lng);

        for step in 1..=SMOOTH_PAN_STEPS {
            self.surface.set_center(lerp(from, target, step as f64 / SMOOTH_PAN_STEPS as f64));
            sleep(SMOOTH_PAN_STEP_DELAY).await;
        }

        self.surface.set_zoom(zoom);
        debug!("🎥 Panning to ({:.4}, {:.4})... OK", target.lat, target.lng);
    }

    async fn cinematic_pan(&self, target: Coordinate, zoom: f64, info_tx: oneshot::Sender<TransitionInfo>) {
        let from = self.surface.center();
        let info = timing::transition_for(&from, &target);

        // Callers align their UI timing with the exact computed duration, so
        // the info goes out before the first frame of motion.
        if info_tx.send(info).is_err() {
            warn!("🎥 Cinematic transition abandoned, caller went away");
            return;
        }

        debug!("🎥 Cinematic transition over {:.1} km...", info.distance_km());

        // A haversine distance is never negative
        let zoom_out = timing::zoom_out_delta(info.distance_meters).unwrap_or(0.0);
        let floor = (self.surface.zoom() - zoom_out).max(timing::MIN_ZOOM);

        let mut acks = self.surface.zoom_notifier();
        let mut level = self.surface.zoom();

        while level > floor {
            level = (level - 1.0).max(floor);
            if !self.step_zoom(level, &mut acks, ZOOM_OUT_STEP_DELAY).await {
                return;
            }
        }

        for step in 1..=CINEMATIC_PAN_STEPS {
            self.surface.pan_to(lerp(from, target, step as f64 / CINEMATIC_PAN_STEPS as f64));
            sleep(CINEMATIC_PAN_STEP_DELAY).await;
        }

        while (level - zoom).abs() > f64::EPSILON {
            level = if level < zoom { (level + 1.0).min(zoom) } else { (level - 1.0).max(zoom) };
            if !self.step_zoom(level, &mut acks, ZOOM_IN_STEP_DELAY).await {
                return;
            }
        }

        debug!("🎥 Cinematic transition over {:.1} km... OK", info.distance_km());
    }

    /// One gated zoom step: the next level is only issued after the surface
    /// acknowledges this one through its zoom notifier. An acknowledgment that
    /// never arrives stalls the sequence here.
    /// TODO: bound the wait with a per-step timeout.
    async fn step_zoom(&self, level: f64, acks: &mut watch::Receiver<f64>, settle: Duration) -> bool {
        self.surface.set_zoom(level);

        if acks.changed().await.is_err() {
            warn!("🎥 Zoom notifier closed, ending transition at level {}", level);
            return false;
        }

        sleep(settle).await;
        true
    }
}

impl CameraHandle {
    /// Requests a simple pan. If a sequence is already running the request
    /// waits in the queue and is served once the active sequence finishes.
    pub async fn smooth_pan_to(&self, target: Coordinate, zoom: f64) -> Result<(), CameraError> {
        self.tx
            .send(CameraCommand::SmoothPanTo { target, zoom })
            .await
            .map_err(|_| CameraError::ControllerGone)
    }

    /// Requests a cinematic transition and returns its [`TransitionInfo`],
    /// delivered before any motion starts. A transition requested while
    /// another cinematic transition is in flight is rejected, never
    /// interleaved; an in-flight transition cannot be cancelled.
    pub async fn cinematic_pan_to(&self, target: Coordinate, zoom: f64) -> Result<TransitionInfo, CameraError> {
        if self.cinematic_in_flight.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return Err(CameraError::TransitionInFlight);
        }

        let (info_tx, info_rx) = oneshot::channel();
        let command = CameraCommand::CinematicPanTo { target, zoom, info_tx };

        if self.tx.send(command).await.is_err() {
            self.cinematic_in_flight.store(false, Ordering::Release);
            return Err(CameraError::ControllerGone);
        }

        info_rx.await.map_err(|_| {
            self.cinematic_in_flight.store(false, Ordering::Release);
            CameraError::ControllerGone
        })
    }
}

fn lerp(from: Coordinate, to: Coordinate, t: f64) -> Coordinate {
    Coordinate::new(from.lat + (to.lat - from.lat) * t, from.lng + (to.lng - from.lng) * t)
}

#[derive(Error, Debug, PartialEq)]
pub enum CameraError {
    #[error("a cinematic transition is already in flight")]
    TransitionInFlight,
    #[error("the camera controller is no longer running")]
    ControllerGone,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use pretty_assertions::assert_eq;
    use test_log::test;
    use tokio::task;

    const HOME: Coordinate = Coordinate { lat: 52.0, lng: 4.0 };

    fn controller(surface: Arc<HeadlessSurface>) -> (CameraController<Arc<HeadlessSurface>>, CameraHandle) {
        CameraController::new(surface, 8)
    }

    #[test(tokio::test(start_paused = true))]
    async fn smooth_pans_run_strictly_sequentially() {
        let surface = Arc::new(HeadlessSurface::new(HOME, 12.0));
        let (mut controller, handle) = controller(surface.clone());

        let first_target = Coordinate::new(53.0, 4.0);
        let second_target = Coordinate::new(53.0, 6.0);

        handle.smooth_pan_to(first_target, 12.0).await.unwrap();
        handle.smooth_pan_to(second_target, 12.0).await.unwrap();
        drop(handle);

        controller.listen().await;

        let centers = surface.centers();
        assert_eq!(centers.len(), 2 * SMOOTH_PAN_STEPS as usize);

        // The first interpolation completes before the second starts: latitudes
        // rise monotonically to the first target, then longitudes take over.
        let (first_run, second_run) = centers.split_at(SMOOTH_PAN_STEPS as usize);
        assert!(first_run.windows(2).all(|pair| pair[0].lat <= pair[1].lat));
        assert_eq!(*first_run.last().unwrap(), first_target);
        assert!(second_run.windows(2).all(|pair| pair[0].lng <= pair[1].lng));
        assert_eq!(*second_run.last().unwrap(), second_target);
    }

    #[test(tokio::test(start_paused = true))]
    async fn smooth_pan_applies_the_requested_zoom_after_the_interpolation() {
        let surface = Arc::new(HeadlessSurface::new(HOME, 12.0));
        let (mut controller, handle) = controller(surface.clone());

        handle.smooth_pan_to(Coordinate::new(52.5, 4.5), 14.0).await.unwrap();
        drop(handle);
        controller.listen().await;

        assert_eq!(surface.zoom(), 14.0);
    }

    #[test(tokio::test(start_paused = true))]
    async fn cinematic_pan_reports_the_transition_info_of_the_move() {
        let surface = Arc::new(HeadlessSurface::new(HOME, 12.0));
        let (mut controller, handle) = controller(surface.clone());
        task::spawn(async move { controller.listen().await });

        let target = Coordinate::new(52.1, 4.0);
        let info = handle.cinematic_pan_to(target, 12.0).await.unwrap();

        assert_eq!(info, timing::transition_for(&HOME, &target));
    }

    #[test(tokio::test(start_paused = true))]
    async fn a_second_cinematic_transition_is_rejected_while_one_is_in_flight() {
        let surface = Arc::new(HeadlessSurface::new(HOME, 12.0));
        let (mut controller, handle) = controller(surface.clone());
        let listen_task = task::spawn(async move { controller.listen().await });

        let target = Coordinate::new(58.0, 4.0);
        handle.cinematic_pan_to(target, 12.0).await.unwrap();

        let rejected = handle.cinematic_pan_to(Coordinate::new(52.0, 10.0), 12.0).await;
        assert_eq!(rejected, Err(CameraError::TransitionInFlight));

        // The in-flight transition is unaffected and completes, after which a
        // new cinematic request is accepted again.
        loop {
            tokio::time::sleep(Duration::from_millis(500)).await;
            match handle.cinematic_pan_to(HOME, 12.0).await {
                Ok(_) => break,
                Err(CameraError::TransitionInFlight) => continue,
                Err(error) => panic!("unexpected camera error: {}", error),
            }
        }

        drop(handle);
        listen_task.await.unwrap();

        assert_eq!(*surface.centers().last().unwrap(), HOME);
    }

    #[test(tokio::test(start_paused = true))]
    async fn cinematic_zoom_out_is_floored_at_the_minimum_zoom() {
        let surface = Arc::new(HeadlessSurface::new(HOME, 7.0));
        let (mut controller, handle) = controller(surface.clone());
        let listen_task = task::spawn(async move { controller.listen().await });

        // ~580 km hop: zoom-out delta 11 would land far below the floor
        handle.cinematic_pan_to(Coordinate::new(57.2, 4.0), 7.0).await.unwrap();
        drop(handle);
        listen_task.await.unwrap();

        let zooms = surface.zooms();
        let lowest = zooms.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(lowest, timing::MIN_ZOOM);
        assert_eq!(surface.zoom(), 7.0);
    }

    #[test(tokio::test(start_paused = true))]
    async fn cinematic_zoom_steps_one_level_at_a_time() {
        let surface = Arc::new(HeadlessSurface::new(HOME, 12.0));
        let (mut controller, handle) = controller(surface.clone());
        let listen_task = task::spawn(async move { controller.listen().await });

        handle.cinematic_pan_to(Coordinate::new(52.5, 4.0), 12.0).await.unwrap();
        drop(handle);
        listen_task.await.unwrap();

        // ~55 km selects a zoom-out delta of 5: five single steps down, five back up
        let zooms = surface.zooms();
        assert_eq!(zooms, vec![11.0, 10.0, 9.0, 8.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    }
}
