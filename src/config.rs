#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub mandelbrot_iterations: u32,
    pub julia_iterations: u32,
    pub steps_per_segment: usize,
    pub color_period_ms: u64,
    pub zoom: f64,
    pub zoom_base: f64,
}

impl Config {
    pub fn log(&self) {
        log::info!(
            "[CONFIG] {}x{}, iterations={}/{}, steps_per_segment={}, \
            color_period={}ms, zoom={}, zoom_base={}",
            self.width,
            self.height,
            self.mandelbrot_iterations,
            self.julia_iterations,
            self.steps_per_segment,
            self.color_period_ms,
            self.zoom,
            self.zoom_base,
        );
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.width < 2 || self.height == 0 {
            return Err(format!(
                "window must be at least 2x1, got {}x{}",
                self.width, self.height
            ));
        }
        if self.mandelbrot_iterations == 0 || self.julia_iterations == 0 {
            return Err("iterations must be greater than 0".to_string());
        }
        if self.steps_per_segment == 0 {
            return Err("steps_per_segment must be greater than 0".to_string());
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(format!("zoom must be positive, got {}", self.zoom));
        }
        if !(self.zoom_base.is_finite() && self.zoom_base > 0.0) {
            return Err(format!("zoom_base must be positive, got {}", self.zoom_base));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 800,
            mandelbrot_iterations: 512,
            julia_iterations: 512,
            steps_per_segment: crate::palette::STEPS_PER_SEGMENT,
            color_period_ms: crate::frame::COLOR_PERIOD_MS,
            zoom: crate::view::DEFAULT_ZOOM,
            zoom_base: crate::input::ZOOM_BASE,
        }
    }
}

pub fn from_path(path: &str) -> std::io::Result<Config> {
    match toml::from_str(&std::fs::read_to_string(path)?) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::error!("Failed to parse config: {err}");
            Err(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        }
    }
}

pub fn write_to(config: &Config, path: &str) -> std::io::Result<()> {
    match toml::to_string(config) {
        Ok(config) => std::fs::write(path, config),
        Err(err) => {
            log::error!("Failed to serialize config: {err}");
            Err(std::io::Error::other(err))
        }
    }
}

/// Load `path` if given, falling back to defaults when it is missing or
/// unreadable.
pub fn load_or_default(path: Option<&str>) -> Config {
    match path {
        Some(path) => from_path(path).unwrap_or_else(|err| {
            log::warn!("Using default config, could not load {path}: {err}");
            Config::default()
        }),
        None => Config::default(),
    }
}
