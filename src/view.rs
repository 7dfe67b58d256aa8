use crate::escape::Complex;

/// Zoom shared by both views at start-up and after a reset.
pub const DEFAULT_ZOOM: f64 = 0.25;

/// Pan and zoom of one view onto the complex plane.
///
/// `zoom` is always positive: every mutation multiplies it by a positive
/// scale or restores the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: Complex,
    pub zoom: f64,
}

impl ViewState {
    pub const fn new(center: Complex, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Complex::new(0.0, 0.0), DEFAULT_ZOOM)
    }
}

/// Size of a raster in pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: usize,
    pub height: usize,
}

impl Extent {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> usize {
        self.width * self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// The extent of one of the two side-by-side views in a window of this size.
    pub fn half_width(&self) -> Self {
        Self::new(self.width / 2, self.height)
    }
}

/// Pixel to plane mapping for one raster, precomputed as an origin plus a
/// per-pixel step.
///
/// Built only for non-empty extents, so the aspect ratio is always defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    origin: Complex,
    step: Complex,
}

impl Viewport {
    /// `None` when `extent` has no pixels.
    pub fn new(extent: Extent, view: &ViewState) -> Option<Self> {
        if extent.is_empty() {
            return None;
        }

        let w = extent.width as f64;
        let h = extent.height as f64;
        let aspect = w / h;

        let dx = aspect / view.zoom;
        let dy = 1.0 / view.zoom;

        Some(Self {
            origin: Complex::new(view.center.re - 0.5 * dx, view.center.im - 0.5 * dy),
            step: Complex::new(dx / w, dy / h),
        })
    }

    /// Plane coordinate of the pixel at column `px`, row `py`.
    #[inline]
    pub fn plane(&self, px: usize, py: usize) -> Complex {
        Complex::new(
            self.origin.re + px as f64 * self.step.re,
            self.origin.im + py as f64 * self.step.im,
        )
    }

    pub fn origin(&self) -> Complex {
        self.origin
    }

    pub fn step(&self) -> Complex {
        self.step
    }
}

/// Reference form of [`Viewport::plane`]:
/// `center + (p / size - 0.5) * (aspect, 1) / zoom`.
pub fn pixel_to_plane(extent: Extent, view: &ViewState, px: f64, py: f64) -> Option<Complex> {
    if extent.is_empty() {
        return None;
    }

    let w = extent.width as f64;
    let h = extent.height as f64;
    let aspect = w / h;
    Some(Complex::new(
        view.center.re + (px / w - 0.5) * aspect / view.zoom,
        view.center.im + (py / h - 0.5) / view.zoom,
    ))
}

/// Map a pointer position in a window of size `window` onto the plane of the
/// Mandelbrot view, which occupies the left half of the window.
///
/// The fractional offset from the window center is clamped to
/// `[-0.25, 0.25] x [-0.5, 0.5]`, so a pointer over the Julia half pins to the
/// right edge of the Mandelbrot viewport.
pub fn screen_to_plane(window: Extent, mandelbrot: &ViewState, x: f64, y: f64) -> Option<Complex> {
    if window.is_empty() {
        return None;
    }

    let w = window.width as f64;
    let h = window.height as f64;
    let aspect = w / h;

    let fx = (x / w - 0.25).clamp(-0.25, 0.25);
    let fy = (y / h - 0.5).clamp(-0.5, 0.5);
    Some(Complex::new(
        fx * aspect / mandelbrot.zoom + mandelbrot.center.re,
        fy / mandelbrot.zoom + mandelbrot.center.im,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex, b: Complex) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn raster_center_maps_to_view_center() {
        let views = [
            ViewState::default(),
            ViewState::new(Complex::new(-0.75, 0.1), 3.0),
            ViewState::new(Complex::new(0.3, -0.6), 1234.5),
        ];
        for extent in [Extent::new(800, 800), Extent::new(640, 480), Extent::new(3, 7)] {
            for view in &views {
                let mid = pixel_to_plane(
                    extent,
                    view,
                    extent.width as f64 / 2.0,
                    extent.height as f64 / 2.0,
                )
                .unwrap();
                assert!(close(mid, view.center), "{extent:?} {view:?}");
            }
        }
    }

    #[test]
    fn viewport_matches_reference_formula() {
        let extent = Extent::new(800, 600);
        let view = ViewState::new(Complex::new(-0.5, 0.25), 0.8);
        let viewport = Viewport::new(extent, &view).unwrap();
        for (px, py) in [(0, 0), (799, 599), (400, 300), (13, 577), (640, 2)] {
            let a = viewport.plane(px, py);
            let b = pixel_to_plane(extent, &view, px as f64, py as f64).unwrap();
            assert!(close(a, b), "{px},{py}: {a} != {b}");
        }
    }

    #[test]
    fn default_view_spans_four_units_vertically() {
        let extent = Extent::new(400, 400);
        let viewport = Viewport::new(extent, &ViewState::default()).unwrap();
        assert_eq!(viewport.origin(), Complex::new(-2.0, -2.0));
        assert_eq!(viewport.step(), Complex::new(0.01, 0.01));
    }

    #[test]
    fn empty_extent_has_no_mapping() {
        let view = ViewState::default();
        assert!(Viewport::new(Extent::new(0, 10), &view).is_none());
        assert!(Viewport::new(Extent::new(10, 0), &view).is_none());
        assert!(pixel_to_plane(Extent::new(10, 0), &view, 0.0, 0.0).is_none());
        assert!(screen_to_plane(Extent::new(0, 0), &view, 0.0, 0.0).is_none());
    }

    #[test]
    fn pointer_tracks_mandelbrot_pixels() {
        // A pointer over the left half lands where the Mandelbrot raster maps
        // the same pixel.
        let window = Extent::new(1600, 800);
        let view = ViewState::new(Complex::new(-0.5, 0.1), 0.6);
        for (x, y) in [(0.0, 0.0), (200.0, 100.0), (799.0, 799.0), (400.0, 400.0)] {
            let a = screen_to_plane(window, &view, x, y).unwrap();
            let b = pixel_to_plane(window.half_width(), &view, x, y).unwrap();
            assert!(close(a, b), "{x},{y}: {a} != {b}");
        }
    }

    #[test]
    fn pointer_is_clamped() {
        let window = Extent::new(1600, 800);
        let view = ViewState::default();
        let edge = screen_to_plane(window, &view, 800.0, 400.0).unwrap();
        let julia_side = screen_to_plane(window, &view, 1500.0, 400.0).unwrap();
        assert_eq!(edge, julia_side);
        assert_eq!(edge, Complex::new(2.0, 0.0));

        let above = screen_to_plane(window, &view, -50.0, -50.0).unwrap();
        assert_eq!(above, Complex::new(-2.0, -2.0));
    }
}
