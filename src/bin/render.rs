use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use julibrot::{
    escape::Complex,
    frame::{FrameDriver, ManualClock},
    input::Scene,
    view::Extent,
};
use std::process::ExitCode;

/// Headless Mandelbrot and Julia renderer.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Output png for a single frame, or a directory when rendering several.
    output: String,

    /// Path to a config toml.
    #[arg(short, long)]
    config: Option<String>,

    /// Number of frames to render.
    #[arg(short, long, default_value_t = 1)]
    frames: usize,

    /// Simulated milliseconds between frames.
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,

    /// Real part of the Julia parameter.
    #[arg(short, long, default_value_t = -0.8, allow_hyphen_values = true)]
    x: f64,

    /// Imaginary part of the Julia parameter.
    #[arg(short, long, default_value_t = 0.156, allow_hyphen_values = true)]
    y: f64,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = Args::parse();
    let config = julibrot::config::load_or_default(args.config.as_deref());
    if let Err(err) = config.validate() {
        log::error!("Invalid config: {err}");
        return Ok(ExitCode::FAILURE);
    }

    if args.frames == 0 {
        log::error!("Frames must be greater than 0");
        return Ok(ExitCode::FAILURE);
    }

    let window = Extent::new(config.width, config.height);
    let mut scene = Scene::new(config.zoom);
    scene.julia.center = Complex::new(args.x, args.y);
    let mut driver = FrameDriver::from_config(&config);
    let mut clock = ManualClock::default();

    log::info!(
        "[RENDER] {}x{}, {} frame(s) @ {}ms, c = {}",
        window.width,
        window.height,
        args.frames,
        args.frame_ms,
        scene.julia_parameter()
    );
    config.log();

    if args.frames == 1 {
        if !args.output.to_lowercase().ends_with(".png") {
            log::error!("Invalid image format, expected PNG");
            return Ok(ExitCode::FAILURE);
        }
        julibrot::render_png(&mut driver, &scene, window, 0, &args.output)?;
    } else {
        let bar = ProgressBar::no_length();
        let frames_width = args.frames.to_string().len();
        bar.set_style(
            ProgressStyle::with_template(&format!(
                "[{{elapsed_precise}}] {{bar:40.cyan/blue}} \
                frames={{pos:>{frames_width}}}/{{len:{frames_width}}} eta={{eta_precise}}",
            ))?
            .progress_chars("##-"),
        );

        let written = julibrot::render_frames(
            &mut driver,
            &scene,
            window,
            &mut clock,
            args.frame_ms,
            args.frames,
            Some(&bar),
            &args.output,
        )?;
        println!("[LOG] Wrote {} images to {}", written.len(), args.output);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "[LOG] Wrote {} bytes to {}",
        std::fs::metadata(&args.output)?.len(),
        args.output
    );
    Ok(ExitCode::SUCCESS)
}
