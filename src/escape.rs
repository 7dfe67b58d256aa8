/// A point on the complex plane.
pub type Complex = num::Complex<f64>;

/// Squared magnitude at which an orbit is considered divergent.
pub const BAILOUT: f64 = 4.0;

/// Which escape-time map a grid pass evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    /// The pixel coordinate is both the start of the orbit and its parameter.
    Mandelbrot,
    /// The pixel coordinate starts the orbit, the view center is the parameter.
    Julia,
}

impl EscapeMode {
    /// Evaluate the escape count of `coord`, where `center` is the view's
    /// center (the Julia parameter in [`EscapeMode::Julia`]).
    #[inline]
    pub fn evaluate(self, coord: Complex, center: Complex, max_iteration: u32) -> u32 {
        match self {
            Self::Mandelbrot => iterate(coord, coord, max_iteration),
            Self::Julia => iterate(coord, center, max_iteration),
        }
    }
}

// Implementation derived from:
// - https://en.wikipedia.org/wiki/Mandelbrot_set#Computer_drawings.
//
/// Apply `z = z^2 + param` starting at `z = point` until `|z|^2 >= 4` or the
/// budget runs out, returning the number of steps taken.
///
/// Starting at `point` with `param == point` is the standard Mandelbrot orbit
/// (`z0 = 0`) with its first step already applied, so the count is one lower
/// than the `z0 = 0` formulation for points that do not escape at once.
#[inline]
pub fn iterate(point: Complex, param: Complex, max_iteration: u32) -> u32 {
    let mut x = point.re;
    let mut y = point.im;
    let cx = param.re;
    let cy = param.im;

    let mut remaining = max_iteration;
    while remaining > 0 && x * x + y * y < BAILOUT {
        let tx = x * x - y * y + cx;
        y = 2.0 * x * y + cy;
        x = tx;
        remaining -= 1;
    }

    max_iteration - remaining
}
