#![allow(clippy::too_many_arguments)]

use crate::{
    frame::{Clock, FrameDriver, ManualClock},
    input::Scene,
    view::Extent,
};
use indicatif::ProgressBar;

pub mod config;
pub mod encoder;
pub mod escape;
pub mod frame;
pub mod input;
pub mod palette;
pub mod pipeline;
pub mod software;
pub mod view;
pub mod viewer;

/// Render both views of `scene` for a `window`-sized frame at `elapsed_ms`
/// and write them side by side to a png at `output`.
pub fn render_png(
    driver: &mut FrameDriver,
    scene: &Scene,
    window: Extent,
    elapsed_ms: u64,
    output: &str,
) -> std::io::Result<()> {
    let offset = driver.color_offset(elapsed_ms);
    if !driver.render(scene, window, offset) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("nothing to render for a {}x{} window", window.width, window.height),
        ));
    }

    let (pixels, w, h) = encoder::side_by_side(driver.mandelbrot(), driver.julia());
    encoder::png(output, &pixels, w, h)
}

/// Render `frames` pngs into `dir`, advancing `clock` by `frame_ms` between
/// frames so the palette rotates as it would in the viewer.
///
/// If `progress_bar` is supplied, the number of rendered frames will be displayed.
/// You do NOT need to specify the length.
pub fn render_frames(
    driver: &mut FrameDriver,
    scene: &Scene,
    window: Extent,
    clock: &mut ManualClock,
    frame_ms: u64,
    frames: usize,
    progress_bar: Option<&ProgressBar>,
    dir: &str,
) -> std::io::Result<Vec<String>> {
    std::fs::create_dir_all(dir)?;
    if let Some(bar) = progress_bar {
        bar.set_length(frames as u64);
        bar.set_position(0);
    }

    let mut written = Vec::with_capacity(frames);
    for i in 0..frames {
        let output = format!("{dir}/{i}.png");
        render_png(driver, scene, window, clock.elapsed_ms(), &output)?;
        written.push(output);
        clock.advance(frame_ms);
        if let Some(bar) = progress_bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = progress_bar {
        bar.finish();
    }
    Ok(written)
}
