use crate::{
    escape::{Complex, EscapeMode},
    palette::{Color, Ramp},
    view::{Extent, ViewState, Viewport},
};
use rayon::prelude::*;

/// Row-major grid of colors for one view.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Raster {
    extent: Extent,
    pixels: Vec<Color>,
}

impl Raster {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            pixels: vec![Color::default(); extent.pixels()],
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, px: usize, py: usize) -> Option<Color> {
        if px >= self.extent.width {
            return None;
        }
        self.pixels.get(py * self.extent.width + px).copied()
    }

    /// Reallocate for `extent`, keeping the buffer when the size is unchanged.
    pub fn resize(&mut self, extent: Extent) {
        if self.extent != extent {
            self.extent = extent;
            self.pixels.clear();
            self.pixels.resize(extent.pixels(), Color::default());
        }
    }

    /// Pack into 8-bit RGBA, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }
}

/// Color of a single pixel: the escape count of `coord` looked up in a table
/// that already carries the palette rotation.
#[inline]
pub fn shade(
    mode: EscapeMode,
    coord: Complex,
    center: Complex,
    max_iteration: u32,
    lookup: &[Color],
) -> Color {
    let n = mode.evaluate(coord, center, max_iteration);
    lookup[n as usize]
}

/// Evaluate `mode` over every pixel of `raster` and write the rotated ramp
/// color for each escape count.
///
/// Returns `false` without touching the raster when it has no pixels or the
/// ramp is empty.
pub fn compute_set(
    raster: &mut Raster,
    ramp: &Ramp,
    view: &ViewState,
    max_iteration: u32,
    offset: u32,
    mode: EscapeMode,
) -> bool {
    let Some(viewport) = Viewport::new(raster.extent, view) else {
        return false;
    };
    if ramp.is_empty() {
        return false;
    }

    // One entry per possible escape count, so the per-pixel lookup needs no
    // modulo against the full ramp.
    let lookup = ramp.rotated(max_iteration, offset);
    let lookup = &lookup;
    let center = view.center;
    let width = raster.extent.width;

    raster
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(py, scanline)| {
            for (px, pixel) in scanline.iter_mut().enumerate() {
                let coord = viewport.plane(px, py);
                *pixel = shade(mode, coord, center, max_iteration, lookup);
            }
        });

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::iterate;

    #[test]
    fn deterministic() {
        let ramp = Ramp::default();
        let view = ViewState::new(Complex::new(-0.6, 0.2), 0.7);
        let mut a = Raster::new(Extent::new(97, 61));
        let mut b = Raster::new(Extent::new(97, 61));
        assert!(compute_set(&mut a, &ramp, &view, 256, 17, EscapeMode::Mandelbrot));
        assert!(compute_set(&mut b, &ramp, &view, 256, 17, EscapeMode::Mandelbrot));
        assert_eq!(a.to_rgba8(), b.to_rgba8());
        assert_eq!(a, b);
    }

    #[test]
    fn pixels_match_evaluator() {
        let ramp = Ramp::default();
        let view = ViewState::new(Complex::new(0.285, 0.01), 0.25);
        let extent = Extent::new(33, 21);
        let mut raster = Raster::new(extent);
        assert!(compute_set(&mut raster, &ramp, &view, 100, 5, EscapeMode::Julia));

        let viewport = Viewport::new(extent, &view).unwrap();
        for py in 0..extent.height {
            for px in 0..extent.width {
                let n = iterate(viewport.plane(px, py), view.center, 100);
                assert_eq!(raster.get(px, py), Some(ramp.at(n, 5)));
            }
        }
    }

    #[test]
    fn offset_rotates_colors() {
        let ramp = Ramp::default();
        let view = ViewState::default();
        let mut a = Raster::new(Extent::new(16, 16));
        let mut b = Raster::new(Extent::new(16, 16));
        compute_set(&mut a, &ramp, &view, 64, 0, EscapeMode::Mandelbrot);
        compute_set(&mut b, &ramp, &view, 64, 1, EscapeMode::Mandelbrot);
        assert_ne!(a, b);

        let mut c = Raster::new(Extent::new(16, 16));
        compute_set(&mut c, &ramp, &view, 64, ramp.len() as u32, EscapeMode::Mandelbrot);
        assert_eq!(a, c);
    }

    #[test]
    fn empty_raster_is_skipped() {
        let ramp = Ramp::default();
        let mut raster = Raster::new(Extent::new(0, 10));
        assert!(!compute_set(
            &mut raster,
            &ramp,
            &ViewState::default(),
            64,
            0,
            EscapeMode::Julia
        ));
        assert!(raster.pixels().is_empty());
    }

    #[test]
    fn empty_ramp_leaves_raster_untouched() {
        let mut raster = Raster::new(Extent::new(4, 4));
        assert!(!compute_set(
            &mut raster,
            &Ramp::hues(0),
            &ViewState::default(),
            64,
            0,
            EscapeMode::Mandelbrot
        ));
        assert!(raster.pixels().iter().all(|c| *c == Color::default()));
    }

    #[test]
    fn resize_reallocates() {
        let mut raster = Raster::new(Extent::new(4, 4));
        raster.resize(Extent::new(8, 2));
        assert_eq!(raster.pixels().len(), 16);
        assert_eq!(raster.extent(), Extent::new(8, 2));
        assert_eq!(raster.get(8, 0), None);
        assert_eq!(raster.get(7, 1), Some(Color::default()));
    }
}
