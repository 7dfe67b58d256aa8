/// Linear RGBA color with channels in `[0, 1]`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const CYAN: Self = Self::new(0.0, 1.0, 1.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Per-channel `self + t * (to - self)`.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            r: self.r + t * (to.r - self.r),
            g: self.g + t * (to.g - self.g),
            b: self.b + t * (to.b - self.b),
            a: self.a + t * (to.a - self.a),
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Hue wheel used for the default ramp, closed back onto red by the builder.
pub const HUE_ANCHORS: [Color; 6] = [
    Color::RED,
    Color::YELLOW,
    Color::GREEN,
    Color::CYAN,
    Color::BLUE,
    Color::MAGENTA,
];

pub const STEPS_PER_SEGMENT: usize = 32;

/// Cyclic color ramp, built once and shared read-only by every grid pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Ramp {
    colors: Vec<Color>,
}

impl Ramp {
    pub fn new(anchors: &[Color], steps_per_segment: usize) -> Self {
        Self {
            colors: build_ramp(anchors, steps_per_segment),
        }
    }

    /// The default six-hue ramp.
    pub fn hues(steps_per_segment: usize) -> Self {
        Self::new(&HUE_ANCHORS, steps_per_segment)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color for an iteration count under a rotation `offset`.
    ///
    /// An empty ramp yields black.
    pub fn at(&self, iteration: u32, offset: u32) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        let len = self.colors.len() as u64;
        let index = (iteration as u64 + offset as u64) % len;
        self.colors[index as usize]
    }

    /// Sample one color per iteration count in `0..=max_iteration`, with the
    /// rotation `offset` applied.
    pub fn rotated(&self, max_iteration: u32, offset: u32) -> Vec<Color> {
        (0..=max_iteration).map(|i| self.at(i, offset)).collect()
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self::hues(STEPS_PER_SEGMENT)
    }
}

/// Interpolate `steps_per_segment` colors between each pair of consecutive
/// anchors, wrapping from the last anchor back to the first.
///
/// Each segment includes its start and excludes its end, except that the
/// final color of the ramp is the first anchor itself so the cycle closes
/// exactly. `steps_per_segment == 0` yields an empty ramp.
pub fn build_ramp(anchors: &[Color], steps_per_segment: usize) -> Vec<Color> {
    if steps_per_segment < 1 || anchors.is_empty() {
        return Vec::new();
    }

    let mut ramp = Vec::with_capacity(anchors.len() * steps_per_segment);
    for (i, &from) in anchors.iter().enumerate() {
        let to = anchors[(i + 1) % anchors.len()];
        for k in 0..steps_per_segment {
            let t = k as f32 / steps_per_segment as f32;
            ramp.push(from.lerp(to, t));
        }
    }

    if let Some(last) = ramp.last_mut() {
        *last = anchors[0];
    }
    ramp
}
