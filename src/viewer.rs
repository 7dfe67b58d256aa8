use crate::{
    config::Config,
    frame::{FrameDriver, MonotonicClock, Simulation},
    input::{Event, WHEEL_DELTA},
    pipeline::Pipeline,
    view::Extent,
};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

pub fn run(mut memory: Memory) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut memory)?;
    match memory.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Everything the viewer keeps between frames.
pub struct Memory {
    pub config: Config,
    pub simulation: Simulation,
    pub driver: FrameDriver,
    clock: MonotonicClock,
    size: Extent,
    window: Option<Arc<Window>>,
    pipeline: Option<Pipeline>,
    error: Option<anyhow::Error>,
}

impl Memory {
    pub fn from_config(config: Config) -> Self {
        Self {
            simulation: Simulation::from_config(&config),
            driver: FrameDriver::from_config(&config),
            clock: MonotonicClock::start(),
            size: Extent::new(config.width, config.height),
            window: None,
            pipeline: None,
            error: None,
            config,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, event: &WindowEvent) {
        let events = &mut self.simulation.events;
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::KeyP => {
                    let scene = &self.simulation.scene;
                    log::info!(
                        "mandelbrot: x = {}, y = {}, zoom = {}",
                        scene.mandelbrot.center.re,
                        scene.mandelbrot.center.im,
                        scene.mandelbrot.zoom
                    );
                    log::info!(
                        "julia: x = {}, y = {}",
                        scene.julia.center.re,
                        scene.julia.center.im
                    );
                }
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                events.push(Event::PointerMove {
                    x: position.x as i32,
                    y: position.y as i32,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => (*y as f64 * WHEEL_DELTA).round() as i32,
                    MouseScrollDelta::PixelDelta(position) => position.y.round() as i32,
                };
                if delta != 0 {
                    events.push(Event::Wheel { delta });
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Right,
                ..
            } => events.push(Event::Reset),
            _ => {}
        }
    }

    fn update_and_render(&mut self) -> anyhow::Result<()> {
        let (Some(window), Some(pipeline)) = (&self.window, &mut self.pipeline) else {
            return Ok(());
        };

        let stats = self
            .driver
            .frame(&mut self.simulation, self.size, &self.clock, pipeline)?;
        if stats.events > 0 {
            let coord = self.simulation.scene.julia_parameter();
            window.set_title(&format!("X:{:.6}, Y:{:.6}", coord.re, coord.im));
        }
        if stats.rendered {
            pipeline.draw()?;
        }
        Ok(())
    }
}

impl ApplicationHandler for Memory {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Mandelbrot / Julia")
            .with_inner_size(PhysicalSize::new(
                self.config.width as u32,
                self.config.height as u32,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let size = window.inner_size();
        self.size = Extent::new(size.width as usize, size.height as usize);
        match Pipeline::new(window.clone()) {
            Ok(pipeline) => self.pipeline = Some(pipeline),
            Err(err) => return self.fail(event_loop, err),
        }
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.size = Extent::new(size.width as usize, size.height as usize);
                if let Some(pipeline) = &mut self.pipeline {
                    pipeline.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.update_and_render() {
                    self.fail(event_loop, err);
                }
            }
            event => self.handle_input(event_loop, &event),
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
