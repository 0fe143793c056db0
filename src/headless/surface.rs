use crate::domain::Coordinate;
use crate::domain::surface::RenderSurface;
use std::sync::Mutex;
use tokio::sync::watch;

/// An in-process rendering surface. Zoom changes apply instantly and are
/// acknowledged through the zoom notifier; every viewport mutation is recorded
/// so the demo binary and the behavioral tests can inspect the motion that was
/// rendered.
#[derive(Debug)]
pub struct HeadlessSurface {
    viewport: Mutex<Viewport>,
    centers: Mutex<Vec<Coordinate>>,
    zooms: Mutex<Vec<f64>>,
    zoom_tx: watch::Sender<f64>,
    zoom_rx: watch::Receiver<f64>,
}

#[derive(Clone, Copy, Debug)]
struct Viewport {
    center: Coordinate,
    zoom: f64,
}

impl HeadlessSurface {
    pub fn new(center: Coordinate, zoom: f64) -> Self {
        let (zoom_tx, zoom_rx) = watch::channel(zoom);

        HeadlessSurface {
            viewport: Mutex::new(Viewport { center, zoom }),
            centers: Mutex::new(Vec::new()),
            zooms: Mutex::new(Vec::new()),
            zoom_tx,
            zoom_rx,
        }
    }

    /// Every center the viewport was moved through, in order.
    pub fn centers(&self) -> Vec<Coordinate> {
        self.centers.lock().unwrap().clone()
    }

    /// Every zoom level the viewport was set to, in order.
    pub fn zooms(&self) -> Vec<f64> {
        self.zooms.lock().unwrap().clone()
    }
}

impl RenderSurface for HeadlessSurface {
    fn center(&self) -> Coordinate {
        self.viewport.lock().unwrap().center
    }

    fn zoom(&self) -> f64 {
        self.viewport.lock().unwrap().zoom
    }

    fn set_center(&self, center: Coordinate) {
        self.viewport.lock().unwrap().center = center;
        self.centers.lock().unwrap().push(center);
    }

    fn set_zoom(&self, zoom: f64) {
        self.viewport.lock().unwrap().zoom = zoom;
        self.zooms.lock().unwrap().push(zoom);
        self.zoom_tx.send(zoom).unwrap_or_default();
    }

    fn pan_to(&self, center: Coordinate) {
        self.set_center(center);
    }

    fn zoom_notifier(&self) -> watch::Receiver<f64> {
        self.zoom_rx.clone()
    }
}
