use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use hero_sequencer::{FrameRGBA, HeroOptions, HeroSession, HexColor, Millis, SequencerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hero-sequencer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the scene at one point in time as a PNG.
    Frame(FrameArgs),
    /// Render a PNG sequence.
    Render(RenderArgs),
    /// Dump per-frame phase/element/overlay snapshots as JSON.
    Timeline(TimelineArgs),
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Sequencer config JSON. Stock settings when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Honour reduced motion.
    #[arg(long)]
    reduced_motion: bool,

    /// Logo gap in pixels.
    #[arg(long, default_value_t = 0.0)]
    gap: f64,

    /// Drive phases from progress instead of timers; progress runs linearly 0→1 over the run.
    #[arg(long)]
    progress_mode: bool,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Time offset from start, in milliseconds.
    #[arg(long)]
    at_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Run length in milliseconds.
    #[arg(long, default_value_t = 8_000)]
    duration_ms: u64,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct TimelineArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Run length in milliseconds.
    #[arg(long, default_value_t = 8_000)]
    duration_ms: u64,

    /// Keep one snapshot every N frames.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Timeline(args) => cmd_timeline(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<SequencerConfig> {
    let mut cfg = match path {
        Some(p) => SequencerConfig::from_path(p)
            .with_context(|| format!("load sequencer config '{}'", p.display()))?,
        None => SequencerConfig::default(),
    };
    if cfg.clear.is_none() {
        cfg.clear = Some(HexColor::from("#12141C"));
    }
    cfg.validate().context("validate sequencer config")?;
    Ok(cfg)
}

/// Drives a session at a fixed frame rate, feeding progress when asked to.
struct Driver {
    session: HeroSession,
    fps: u32,
    progress_mode: bool,
    run_ms: u64,
}

impl Driver {
    fn new(args: &SessionArgs, run_ms: u64) -> anyhow::Result<Self> {
        if args.fps == 0 {
            anyhow::bail!("--fps must be > 0");
        }
        let cfg = read_config(args.config.as_deref())?;
        let opts = HeroOptions {
            reduced_motion: args.reduced_motion,
            progress_driven: args.progress_mode,
            gap: args.gap,
        };
        let mut session = HeroSession::new(cfg, opts).context("create hero session")?;
        session.start(Millis(0));
        Ok(Self {
            session,
            fps: args.fps,
            progress_mode: args.progress_mode,
            run_ms: run_ms.max(1),
        })
    }

    fn frame_count(&self) -> u64 {
        self.run_ms * u64::from(self.fps) / 1000 + 1
    }

    fn step(&mut self, frame: u64) -> anyhow::Result<(Millis, Option<FrameRGBA>)> {
        let now = Millis::from_frame(frame, self.fps);
        if self.progress_mode {
            let p = now.0 as f64 / self.run_ms as f64;
            self.session.set_progress(p, now);
        }
        let rgba = self
            .session
            .frame(now)
            .with_context(|| format!("render frame at {} ms", now.0))?;
        Ok((now, rgba))
    }
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &unpremultiply(&frame.data),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut driver = Driver::new(&args.session, args.at_ms)?;
    let last = driver.frame_count() - 1;
    let mut out = None;
    for i in 0..=last {
        out = driver.step(i)?.1;
    }
    let frame = out.context("scene produced no frame")?;
    write_png(&args.out, &frame)?;

    eprintln!(
        "wrote {} (phase {})",
        args.out.display(),
        driver.session.phase()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut driver = Driver::new(&args.session, args.duration_ms)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut written = 0u64;
    for i in 0..driver.frame_count() {
        if let (_, Some(frame)) = driver.step(i)? {
            write_png(&args.out_dir.join(format!("frame_{i:05}.png")), &frame)?;
            written += 1;
        }
    }
    driver.session.stop();

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

#[derive(serde::Serialize)]
struct TimelineEntry {
    frame: u64,
    at_ms: u64,
    #[serde(flatten)]
    snapshot: hero_sequencer::FrameSnapshot,
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let mut driver = Driver::new(&args.session, args.duration_ms)?;
    let every = args.every.max(1);

    let mut entries = Vec::new();
    for i in 0..driver.frame_count() {
        let (now, _) = driver.step(i)?;
        if i % every == 0 {
            entries.push(TimelineEntry {
                frame: i,
                at_ms: now.0,
                snapshot: driver.session.snapshot(),
            });
        }
    }
    driver.session.stop();

    match &args.out {
        Some(path) => {
            let f = File::create(path)
                .with_context(|| format!("create timeline '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &entries).context("write timeline JSON")?;
            w.flush().context("flush timeline")?;
            eprintln!("wrote {} snapshots to {}", entries.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, &entries).context("write timeline JSON")?;
            writeln!(w).context("write timeline JSON")?;
        }
    }
    Ok(())
}
