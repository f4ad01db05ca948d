/// Stripe progress bar demo. Renders to /dev/fb0, or headless to a PNG.

mod fb;
mod input;
mod renderer;
mod screen;
mod text;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use stripe_progress::{StripeStyle, ValidatedStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::screen::{Action, DemoScreen};

#[derive(Parser, Debug)]
#[command(name = "stripe-demo", version, about = "Animated stripe progress bar demo")]
struct Args {
    /// Framebuffer device
    #[arg(long, default_value = "/dev/fb0")]
    fb: String,

    /// Stripe style JSON file
    #[arg(long)]
    style: Option<PathBuf>,

    /// TrueType font for labels (defaults to a common system font)
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Seconds between automatic progress ticks
    #[arg(long, default_value_t = 1.0)]
    tick_secs: f64,

    /// Initial contents of the percentage field
    #[arg(long, default_value = "")]
    text: String,

    /// Render headless and write the last frame to this PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frames to simulate in snapshot mode
    #[arg(long, default_value_t = 60, requires = "snapshot")]
    frames: u32,

    /// Automatic ticks to apply in snapshot mode
    #[arg(long, default_value_t = 0, requires = "snapshot")]
    auto_ticks: u32,

    /// Snapshot size
    #[arg(long, default_value_t = 800, requires = "snapshot")]
    width: u32,

    #[arg(long, default_value_t = 480, requires = "snapshot")]
    height: u32,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let style = load_style(args.style.as_deref())?;
    let text = text::TextRenderer::load(args.font.as_deref())?;
    let tick_interval = Duration::try_from_secs_f64(args.tick_secs)
        .context("--tick-secs must be a non-negative number of seconds")?;

    match &args.snapshot {
        Some(path) => snapshot(&args, style, &text, tick_interval, path),
        None => run(&args, style, &text, tick_interval),
    }
}

fn load_style(path: Option<&std::path::Path>) -> Result<ValidatedStyle> {
    let style = match path {
        Some(path) => StripeStyle::load(path)?,
        None => StripeStyle::default(),
    };
    Ok(style.validate()?)
}

fn run(args: &Args, style: ValidatedStyle, text: &text::TextRenderer, tick_interval: Duration) -> Result<()> {
    let mut framebuffer = fb::Framebuffer::open(&args.fb)?;
    let info = framebuffer.info();
    let mut renderer = renderer::Renderer::new(info.width, info.height)?;
    let mut keys = input::KeyReader::open()?;

    let mut screen = DemoScreen::new(style, info.width, tick_interval)?;
    screen.set_text(&args.text);

    let frame_duration = Duration::from_secs(1) / args.fps;
    let mut last_frame = Instant::now();
    info!(fps = args.fps, "entering main loop");

    'frames: loop {
        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        last_frame = now;

        for key in keys.poll() {
            if screen.handle_key(key)? == Action::Quit {
                break 'frames;
            }
        }

        screen.update(elapsed);
        if screen.needs_redraw() {
            screen.draw(&mut renderer, text);
            framebuffer.present(&renderer.pixmap);
        }

        let spent = now.elapsed();
        if spent < frame_duration {
            std::thread::sleep(frame_duration - spent);
        }
    }

    screen.shutdown();
    info!("exiting");
    Ok(())
}

fn snapshot(
    args: &Args,
    style: ValidatedStyle,
    text: &text::TextRenderer,
    tick_interval: Duration,
    path: &std::path::Path,
) -> Result<()> {
    let mut renderer = renderer::Renderer::new(args.width, args.height)?;
    let mut screen = DemoScreen::new(style, args.width, tick_interval)?;
    screen.set_text(&args.text);
    for _ in 0..args.auto_ticks {
        screen.tick_auto();
    }

    let frame_duration = Duration::from_secs(1) / args.fps;
    for _ in 0..args.frames {
        screen.update(frame_duration);
    }
    screen.draw(&mut renderer, text);
    renderer
        .pixmap
        .save_png(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    screen.shutdown();

    info!(
        path = %path.display(),
        frames = args.frames,
        manual = screen.manual_progress(),
        auto = screen.auto_progress(),
        "snapshot written"
    );
    Ok(())
}
