use crate::{
    config::Config,
    escape::EscapeMode,
    input::{Controller, EventQueue, Scene},
    palette::Ramp,
    software::{Raster, compute_set},
    view::Extent,
};
use std::time::Instant;

/// Milliseconds per palette rotation step.
pub const COLOR_PERIOD_MS: u64 = 100;

/// Monotonic time source driving the palette rotation.
pub trait Clock {
    /// Milliseconds since the clock started. Never decreases.
    fn elapsed_ms(&self) -> u64;
}

/// Wall clock started at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to, for headless rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualClock {
    ms: u64,
}

impl ManualClock {
    pub fn new(ms: u64) -> Self {
        Self { ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.ms = self.ms.saturating_add(ms);
    }
}

impl Clock for ManualClock {
    fn elapsed_ms(&self) -> u64 {
        self.ms
    }
}

/// Half of the window a raster is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Left half.
    Mandelbrot,
    /// Right half.
    Julia,
}

/// Consumer of finished rasters.
pub trait Presenter {
    fn present(&mut self, raster: &Raster, region: Region) -> anyhow::Result<()>;
}

/// Input state shared between the platform adapter and the frame loop.
#[derive(Debug, Default)]
pub struct Simulation {
    pub scene: Scene,
    pub controller: Controller,
    pub events: EventQueue,
}

impl Simulation {
    pub fn new(controller: Controller, scene: Scene) -> Self {
        Self {
            scene,
            controller,
            events: EventQueue::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Controller::new(config.zoom_base, config.zoom),
            Scene::new(config.zoom),
        )
    }

    /// Apply all pending events against a window of size `window`.
    pub fn apply_events(&mut self, window: Extent) -> usize {
        self.controller
            .drain(&mut self.scene, window, &mut self.events)
    }
}

/// Outcome of one [`FrameDriver::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub events: usize,
    pub color_offset: u32,
    /// `false` when the window had no area and both passes were skipped.
    pub rendered: bool,
}

/// Owns the ramp and both rasters and runs one compute pass per view each
/// frame.
#[derive(Debug)]
pub struct FrameDriver {
    ramp: Ramp,
    mandelbrot: Raster,
    julia: Raster,
    mandelbrot_iterations: u32,
    julia_iterations: u32,
    color_period_ms: u64,
}

impl FrameDriver {
    pub fn new(
        ramp: Ramp,
        mandelbrot_iterations: u32,
        julia_iterations: u32,
        color_period_ms: u64,
    ) -> Self {
        Self {
            ramp,
            mandelbrot: Raster::default(),
            julia: Raster::default(),
            mandelbrot_iterations,
            julia_iterations,
            color_period_ms: color_period_ms.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Ramp::hues(config.steps_per_segment),
            config.mandelbrot_iterations,
            config.julia_iterations,
            config.color_period_ms,
        )
    }

    pub fn ramp(&self) -> &Ramp {
        &self.ramp
    }

    pub fn mandelbrot(&self) -> &Raster {
        &self.mandelbrot
    }

    pub fn julia(&self) -> &Raster {
        &self.julia
    }

    /// `floor(elapsed_ms / period)`, reduced modulo the ramp length so it
    /// stays small; the lookup is modulo the ramp length anyway.
    pub fn color_offset(&self, elapsed_ms: u64) -> u32 {
        let steps = elapsed_ms / self.color_period_ms;
        match self.ramp.len() as u64 {
            0 => 0,
            len => (steps % len) as u32,
        }
    }

    /// Compute both rasters for a window of size `window` without presenting.
    ///
    /// Returns `false` when the window has no area.
    pub fn render(&mut self, scene: &Scene, window: Extent, color_offset: u32) -> bool {
        if window.is_empty() {
            return false;
        }

        let extent = window.half_width();
        self.mandelbrot.resize(extent);
        self.julia.resize(extent);

        let m = compute_set(
            &mut self.mandelbrot,
            &self.ramp,
            &scene.mandelbrot,
            self.mandelbrot_iterations,
            color_offset,
            EscapeMode::Mandelbrot,
        );
        let j = compute_set(
            &mut self.julia,
            &self.ramp,
            &scene.julia,
            self.julia_iterations,
            color_offset,
            EscapeMode::Julia,
        );
        m && j
    }

    /// Run one frame: apply pending input, compute both views, then hand the
    /// rasters to `presenter`.
    pub fn frame(
        &mut self,
        simulation: &mut Simulation,
        window: Extent,
        clock: &impl Clock,
        presenter: &mut impl Presenter,
    ) -> anyhow::Result<FrameStats> {
        let events = simulation.apply_events(window);
        let color_offset = self.color_offset(clock.elapsed_ms());

        let rendered = self.render(&simulation.scene, window, color_offset);
        if rendered {
            presenter.present(&self.mandelbrot, Region::Mandelbrot)?;
            presenter.present(&self.julia, Region::Julia)?;
        } else {
            log::warn!("skipping frame for {}x{} window", window.width, window.height);
        }

        Ok(FrameStats {
            events,
            color_offset,
            rendered,
        })
    }
}
