use crate::{
    escape::Complex,
    view::{DEFAULT_ZOOM, Extent, ViewState, screen_to_plane},
};
use std::collections::VecDeque;

/// Wheel units per notch.
pub const WHEEL_DELTA: f64 = 120.0;

/// Zoom factor per wheel notch.
pub const ZOOM_BASE: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("pointer event against a zero-sized window")]
    ZeroExtent,
    #[error("wheel delta {0} would leave the zoom non-positive or non-finite")]
    DegenerateZoom(i32),
}

/// View parameters of both fractals.
///
/// Written only by [`Controller`] between frames and read by the grid passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub mandelbrot: ViewState,
    /// The Julia view's center doubles as the Julia parameter.
    pub julia: ViewState,
}

impl Scene {
    pub fn new(zoom: f64) -> Self {
        let origin = Complex::new(0.0, 0.0);
        Self {
            mandelbrot: ViewState::new(origin, zoom),
            julia: ViewState::new(origin, zoom),
        }
    }

    pub fn julia_parameter(&self) -> Complex {
        self.julia.center
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM)
    }
}

/// Input collected from the platform, applied only at frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PointerMove { x: i32, y: i32 },
    Wheel { delta: i32 },
    Reset,
}

/// FIFO of pending [`Event`]s.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}

/// Translates pointer, wheel and reset events into [`Scene`] updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controller {
    zoom_base: f64,
    default_zoom: f64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ZOOM_BASE, DEFAULT_ZOOM)
    }
}

impl Controller {
    pub fn new(zoom_base: f64, default_zoom: f64) -> Self {
        Self {
            zoom_base,
            default_zoom,
        }
    }

    /// Point the Julia parameter at the plane coordinate under the pointer,
    /// measured against the Mandelbrot view.
    pub fn on_pointer_move(
        &self,
        scene: &mut Scene,
        window: Extent,
        x: i32,
        y: i32,
    ) -> Result<Complex, InputError> {
        let coord = screen_to_plane(window, &scene.mandelbrot, x as f64, y as f64)
            .ok_or(InputError::ZeroExtent)?;
        scene.julia.center = coord;
        Ok(coord)
    }

    /// Zoom the Mandelbrot view by `zoom_base^(delta / 120)` around the last
    /// hovered point.
    pub fn on_wheel(&self, scene: &mut Scene, delta: i32) -> Result<(), InputError> {
        let scale = self.zoom_base.powf(delta as f64 / WHEEL_DELTA);
        let zoom = scene.mandelbrot.zoom * scale;
        if !(scale.is_normal() && zoom.is_normal() && zoom > 0.0) {
            return Err(InputError::DegenerateZoom(delta));
        }

        let anchor = scene.julia.center;
        let diff = scene.mandelbrot.center - anchor;
        scene.mandelbrot.center = anchor + diff / scale;
        scene.mandelbrot.zoom = zoom;
        log::debug!(
            "zoom {:.6} around ({:.6}, {:.6})",
            zoom,
            anchor.re,
            anchor.im
        );
        Ok(())
    }

    /// Restore the Mandelbrot view to the origin at the default zoom.
    pub fn on_reset(&self, scene: &mut Scene) -> Result<(), InputError> {
        scene.mandelbrot = ViewState::new(Complex::new(0.0, 0.0), self.default_zoom);
        log::debug!("mandelbrot view reset");
        Ok(())
    }

    pub fn apply(&self, scene: &mut Scene, window: Extent, event: Event) -> Result<(), InputError> {
        match event {
            Event::PointerMove { x, y } => self.on_pointer_move(scene, window, x, y).map(|_| ()),
            Event::Wheel { delta } => self.on_wheel(scene, delta),
            Event::Reset => self.on_reset(scene),
        }
    }

    /// Apply every queued event in arrival order, returning how many were
    /// applied successfully. Failures are logged and dropped.
    pub fn drain(&self, scene: &mut Scene, window: Extent, queue: &mut EventQueue) -> usize {
        let mut applied = 0;
        while let Some(event) = queue.pop() {
            match self.apply(scene, window, event) {
                Ok(()) => applied += 1,
                Err(err) => log::warn!("dropped {event:?}: {err}"),
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Extent = Extent::new(1600, 800);

    #[test]
    fn pointer_moves_julia_center() {
        let controller = Controller::default();
        let mut scene = Scene::default();
        let coord = controller
            .on_pointer_move(&mut scene, WINDOW, 400, 400)
            .unwrap();
        assert_eq!(coord, Complex::new(0.0, 0.0));

        controller
            .on_pointer_move(&mut scene, WINDOW, 600, 200)
            .unwrap();
        assert_eq!(scene.julia.center, Complex::new(1.0, -1.0));
        assert_eq!(scene.julia.zoom, DEFAULT_ZOOM);
        assert_eq!(scene.mandelbrot, ViewState::default());
    }

    #[test]
    fn pointer_on_empty_window_fails() {
        let controller = Controller::default();
        let mut scene = Scene::default();
        let err = controller.on_pointer_move(&mut scene, Extent::new(0, 0), 1, 1);
        assert_eq!(err, Err(InputError::ZeroExtent));
        assert_eq!(scene, Scene::default());
    }

    #[test]
    fn wheel_zooms_around_anchor() {
        let controller = Controller::default();
        let mut scene = Scene::default();
        scene.julia.center = Complex::new(1.0, 0.0);
        controller.on_wheel(&mut scene, 120).unwrap();
        assert_eq!(scene.mandelbrot.zoom, 0.25 * 1.1);
        // The anchor stays fixed while the center closes in on it.
        let expected = Complex::new(1.0, 0.0) + Complex::new(-1.0, 0.0) / 1.1;
        assert!((scene.mandelbrot.center - expected).norm() < 1e-12);
        assert_eq!(scene.julia.center, Complex::new(1.0, 0.0));
    }

    #[test]
    fn wheel_in_then_out_restores_zoom() {
        let controller = Controller::default();
        let mut scene = Scene::default();
        scene.julia.center = Complex::new(-0.3, 0.4);
        controller.on_wheel(&mut scene, 360).unwrap();
        controller.on_wheel(&mut scene, -360).unwrap();
        assert!((scene.mandelbrot.zoom - 0.25).abs() < 1e-12);
        assert!(scene.mandelbrot.center.norm() < 1e-12);
    }

    #[test]
    fn degenerate_wheel_is_rejected() {
        let controller = Controller::default();
        let mut scene = Scene::default();
        assert_eq!(
            controller.on_wheel(&mut scene, i32::MIN),
            Err(InputError::DegenerateZoom(i32::MIN))
        );
        assert_eq!(
            controller.on_wheel(&mut scene, i32::MAX),
            Err(InputError::DegenerateZoom(i32::MAX))
        );
        assert_eq!(scene, Scene::default());
    }

    #[test]
    fn reset_restores_default_view() {
        let controller = Controller::default();
        let mut scene = Scene::default();
        scene.julia.center = Complex::new(0.5, 0.5);
        controller.on_wheel(&mut scene, 480).unwrap();
        controller.on_reset(&mut scene).unwrap();
        assert_eq!(scene.mandelbrot, ViewState::default());
        assert_eq!(scene.julia.center, Complex::new(0.5, 0.5));
    }

    #[test]
    fn drain_applies_in_order() {
        let controller = Controller::default();
        let mut scene = Scene::default();
        let mut queue = EventQueue::default();
        queue.push(Event::PointerMove { x: 600, y: 400 });
        queue.push(Event::Wheel { delta: 120 });
        queue.push(Event::Reset);
        queue.push(Event::PointerMove { x: 200, y: 400 });
        assert_eq!(queue.len(), 4);

        assert_eq!(controller.drain(&mut scene, WINDOW, &mut queue), 4);
        assert!(queue.is_empty());
        assert_eq!(scene.mandelbrot, ViewState::default());
        assert_eq!(scene.julia.center, Complex::new(-1.0, 0.0));
    }
}
