use clap::Parser;
use std::process::ExitCode;

/// Mandelbrot and Julia set viewer.
///
/// The Julia set follows the point under the pointer, the wheel zooms the
/// Mandelbrot view and a right click resets it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a config toml.
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = Args::parse();
    let config = julibrot::config::load_or_default(args.config.as_deref());
    if let Err(err) = config.validate() {
        log::error!("Invalid config: {err}");
        return Ok(ExitCode::FAILURE);
    }
    config.log();

    let memory = julibrot::viewer::Memory::from_config(config);
    julibrot::viewer::run(memory)?;
    Ok(ExitCode::SUCCESS)
}
