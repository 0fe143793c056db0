use crate::domain::Coordinate;
use std::fmt::Debug;
use tokio::sync::watch;

/// The rendering surface the camera controller drives. The viewport (center,
/// zoom) is mutated exclusively through this handle by the camera task; every
/// other component treats it as read-only.
///
/// `zoom_notifier` is the surface's zoom-changed notification: after a
/// `set_zoom` the surface publishes the applied zoom level, and gated zoom
/// stepping waits for that acknowledgment before issuing the next level.
pub trait RenderSurface: Debug + Send + Sync {
    fn center(&self) -> Coordinate;

    fn zoom(&self) -> f64;

    fn set_center(&self, center: Coordinate);

    fn set_zoom(&self, zoom: f64);

    fn pan_to(&self, center: Coordinate);

    fn zoom_notifier(&self) -> watch::Receiver<f64>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for std::sync::Arc<S> {
    fn center(&self) -> Coordinate {
        (**self).center()
    }

    fn zoom(&self) -> f64 {
        (**self).zoom()
    }

    fn set_center(&self, center: Coordinate) {
        (**self).set_center(center)
    }

    fn set_zoom(&self, zoom: f64) {
        (**self).set_zoom(zoom)
    }

    fn pan_to(&self, center: Coordinate) {
        (**self).pan_to(center)
    }

    fn zoom_notifier(&self) -> watch::Receiver<f64> {
        (**self).zoom_notifier()
    }
}
