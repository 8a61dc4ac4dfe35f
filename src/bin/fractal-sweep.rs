use std::{
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fractal_sweep::{
    CameraState, FfmpegSink, FfmpegSinkOpts, FractalRenderer as _, Project, Sequencer,
};

#[derive(Parser, Debug)]
#[command(name = "fractal-sweep", version)]
struct Cli {
    /// Log at DEBUG level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default project JSON.
    Init(InitArgs),
    /// Print evaluated camera states as JSON lines.
    Sample(SampleArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole sweep to an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Output project JSON.
    #[arg(long)]
    out: PathBuf,

    /// Replace an existing file.
    #[arg(long)]
    force: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input project JSON; the default project when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Number of evenly spaced samples; one per video frame when omitted.
    #[arg(long)]
    count: Option<u64>,

    /// Evaluate every sample from scratch instead of through the segment cursor.
    #[arg(long)]
    stateless: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON; the default project when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Timeline position in `[0, 1]`.
    #[arg(long, default_value_t = 0.0)]
    t: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Accumulation passes; the project's `steps_per_frame` when omitted.
    #[arg(long)]
    passes: Option<u32>,

    /// Override the project's output width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the project's output height.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input project JSON; the default project when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// x264 constant rate factor.
    #[arg(long)]
    crf: Option<u8>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Init(args) => cmd_init(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_project(path: Option<&PathBuf>) -> anyhow::Result<Project> {
    match path {
        Some(path) => Project::from_path(path)
            .with_context(|| format!("load project '{}'", path.display())),
        None => Ok(Project::default()),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    if args.out.exists() && !args.force {
        anyhow::bail!(
            "'{}' already exists (pass --force to replace it)",
            args.out.display()
        );
    }
    Project::default().write_path(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let project = load_project(args.in_path.as_ref())?;
    let mut seq = project.into_sequencer()?;
    let count = args.count.unwrap_or_else(|| seq.total_frames()).max(1);
    let easing = seq.settings().time_easing;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for i in 0..count {
        let t = if count == 1 {
            0.0
        } else {
            easing.apply(i as f64 / (count - 1) as f64)
        };
        let state: CameraState = if args.stateless {
            seq.evaluate_at(t)
        } else {
            seq.evaluate(t)
        };
        serde_json::to_writer(&mut out, &state).context("serialize camera state")?;
        writeln!(out)?;
    }
    out.flush()?;

    let warnings = seq.center().precision_warnings();
    if warnings > 0 {
        eprintln!("{warnings} precision warning(s); consider a smaller arc_step");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut project = load_project(args.in_path.as_ref())?;
    if let Some(width) = args.width {
        project.video.width = width;
    }
    if let Some(height) = args.height {
        project.video.height = height;
    }
    let mut seq = project.into_sequencer()?;
    let mut renderer = project.renderer()?;

    renderer.set_size(seq.settings().canvas())?;
    let state = seq.evaluate_at(args.t);
    Sequencer::apply(&state, &mut renderer);
    renderer.refine(args.passes.unwrap_or(seq.settings().steps_per_frame))?;
    let frame = renderer.capture_frame_buffer()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let project = load_project(args.in_path.as_ref())?;
    let mut seq = project.into_sequencer()?;
    let mut renderer = project.renderer()?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: !args.no_overwrite,
        crf: args.crf,
    });

    let stats = seq.run(&mut renderer, &mut sink)?;
    eprintln!(
        "wrote {} ({} frames{})",
        args.out.display(),
        stats.frames_rendered,
        if stats.precision_warnings > 0 {
            format!(", {} precision warning(s)", stats.precision_warnings)
        } else {
            String::new()
        }
    );
    Ok(())
}
