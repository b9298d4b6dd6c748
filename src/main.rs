use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use dotkonvert_rs::dot_pipeline::{
    config::{builtin_presets, resolve_preset, CustomPreset},
    conversions::DEFAULT_FPS,
    export::export_name_from_file_name,
    generators::builtin_palette_ids,
    render::DEFAULT_CELL_PX,
    DotGrid, DotPipeline, FrameSequence, Generator, GeneratorKind, GeneratorParams,
    ImageFrameReader, JsonExportWriter, OutputMode, Palette, PermutationTable, PresetSnapshot,
    ProcessConfig, SeededNoise, TimedSource, VideoSource, render_preview,
};
use dotkonvert_rs::logger;

type CliPipeline = DotPipeline<ImageFrameReader, JsonExportWriter, SeededNoise>;

#[derive(Parser, Debug)]
#[command(name = "dotkonvert", version, about = "Convert frames and procedural patterns into dot matrix exports")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert decoded image frames (PNG, JPEG) into a dot matrix export.
    Frames(FramesArgs),
    /// Convert a time range of a video file (decoded with ffmpeg).
    Video(VideoArgs),
    /// Render a procedural generator into a dot matrix export.
    Generate(GenerateArgs),
    /// Save the current settings as a custom preset.
    SavePreset(SavePresetArgs),
    /// List preset ids and labels.
    Presets(PresetsArgs),
    /// List palette ids.
    Palettes,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Preset id the options below are applied on top of.
    #[arg(long, default_value = "8level")]
    preset: String,

    /// JSON file holding saved custom presets.
    #[arg(long)]
    preset_file: Option<PathBuf>,

    #[arg(long)]
    cols: Option<usize>,

    #[arg(long)]
    rows: Option<usize>,

    /// `full`, `1` (binary), or a level count.
    #[arg(long)]
    output_mode: Option<OutputMode>,

    /// Binary threshold (0-255), used when not dithering.
    #[arg(long)]
    threshold: Option<u8>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    dither: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    invert: Option<bool>,

    /// Keep RGB per cell instead of gray levels.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    color: Option<bool>,

    /// Zoom in percent.
    #[arg(long)]
    zoom: Option<f64>,

    /// Seed for the noise filter and the generator permutation table.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Export frame rate (1-60).
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Name stored in the export.
    #[arg(long)]
    name: Option<String>,

    /// Export JSON path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the export JSON.
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Render the first frame as a PNG preview.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Preview pixels per cell.
    #[arg(long, default_value_t = DEFAULT_CELL_PX)]
    cell_px: u32,

    /// Print per-stage processing times to stderr.
    #[arg(long, default_value_t = false)]
    timings: bool,
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Frame files, in playback order.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Treat the files as a clip and export from this time (seconds).
    #[arg(long)]
    start: Option<f64>,

    /// End of the exported range (seconds); defaults to the clip length.
    #[arg(long)]
    end: Option<f64>,

    /// Frame rate of the input clip; defaults to `--fps`.
    #[arg(long)]
    source_fps: Option<f64>,

    /// Repeat a single still frame for this many seconds.
    #[arg(long)]
    seconds: Option<f64>,

    #[command(flatten)]
    process: ProcessArgs,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args, Debug)]
struct VideoArgs {
    /// Video file; needs `ffmpeg` and `ffprobe` on PATH.
    video: PathBuf,

    /// Start of the exported range (seconds).
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Length of the exported range (seconds); cut at the end of the video.
    #[arg(long, default_value_t = 10.0)]
    duration: f64,

    #[command(flatten)]
    process: ProcessArgs,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// perlin, waves, waves3d, vertex, plasma, or terrain.
    kind: GeneratorKind,

    /// Length of the export in seconds (minimum 0.5).
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Generator time of the first frame.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    #[arg(long)]
    speed: Option<f64>,

    #[arg(long)]
    scale: Option<f64>,

    #[arg(long)]
    octaves: Option<u32>,

    /// Wave frequency (wavelength for `vertex`).
    #[arg(long)]
    frequency: Option<f64>,

    /// Wave amplitude (depth for `vertex`).
    #[arg(long)]
    amplitude: Option<f64>,

    /// Light azimuth in degrees.
    #[arg(long)]
    light: Option<f64>,

    /// Colorize generators that support it.
    #[arg(long, default_value_t = false)]
    colorize: bool,

    /// Palette id for colorized output (`default` for procedural colors).
    #[arg(long)]
    palette: Option<String>,

    #[command(flatten)]
    process: ProcessArgs,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args, Debug)]
struct SavePresetArgs {
    /// Display name; the id is derived from it.
    name: String,

    /// Dot size in percent of the cell.
    #[arg(long)]
    dot_size: Option<u32>,

    #[command(flatten)]
    process: ProcessArgs,
}

#[derive(Args, Debug)]
struct PresetsArgs {
    /// Also list the presets saved in this file.
    #[arg(long)]
    preset_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();
    ExitCode::from(exit_status(run(cli)))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Video(args) => cmd_video(args),
        Command::Generate(args) => cmd_generate(args),
        Command::SavePreset(args) => cmd_save_preset(args),
        Command::Presets(args) => cmd_presets(args),
        Command::Palettes => cmd_palettes(),
    }
}

/// Logs a failure once and maps it to the process exit status.
fn exit_status(result: anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:#}");
            1
        }
    }
}

fn load_custom_presets(path: &Path) -> anyhow::Result<Vec<CustomPreset>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read preset file '{}'", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse preset file '{}'", path.display()))?;
    Ok(CustomPreset::list_from_value(&value))
}

/// Preset first, then explicit overrides. Returns the config and the dot size fraction.
fn resolve_config(args: &ProcessArgs) -> anyhow::Result<(ProcessConfig, f64)> {
    let custom = match &args.preset_file {
        Some(path) => load_custom_presets(path)?,
        None => Vec::new(),
    };
    let snapshot = resolve_preset(&args.preset, &custom)?;
    let mut config = snapshot.process_config();

    config.grid = config.grid.with_overrides(args.cols, args.rows);
    if let Some(mode) = args.output_mode {
        config.output_mode = mode;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(dither) = args.dither {
        config.dither = dither;
    }
    if let Some(invert) = args.invert {
        config.invert = invert;
    }
    if let Some(color) = args.color {
        config.color_mode = color;
    }
    if let Some(zoom) = args.zoom {
        config.zoom = zoom;
    }

    Ok((config.sanitized(), snapshot.dot_size()))
}

fn build_pipeline(config: ProcessConfig, seed: Option<u64>, pretty: bool) -> CliPipeline {
    let noise = seed.map_or_else(SeededNoise::from_entropy, SeededNoise::new);
    DotPipeline::with_custom(ImageFrameReader, JsonExportWriter { pretty }, noise, config)
}

fn finish(
    pipeline: &CliPipeline,
    frames: Vec<DotGrid>,
    out: &OutputArgs,
    default_name: &str,
    dot_size: f64,
) -> anyhow::Result<()> {
    if frames.is_empty() {
        warn!("No frames were captured");
    }

    if let (Some(path), Some(first)) = (&out.preview, frames.first()) {
        render_preview(first, out.cell_px, dot_size)
            .save(path)
            .with_context(|| format!("write preview '{}'", path.display()))?;
        info!(preview = %path.display(), "Preview written");
    }

    if out.timings {
        pipeline.timings().print_summary();
    }

    let name = out.name.as_deref().unwrap_or(default_name);
    let export = pipeline.build_export(frames, out.fps, name);

    match &out.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            pipeline.write_export_file(&export, path)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            pipeline.write_export(&export, &mut lock)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (config, dot_size) = resolve_config(&args.process)?;
    let mut pipeline = build_pipeline(config, args.process.seed, args.out.pretty);

    let mut rasters = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let raster = pipeline
            .read_frame_file(path)
            .with_context(|| format!("load frame '{}'", path.display()))?;
        rasters.push(raster);
    }
    info!(files = rasters.len(), "Decoded input frames");

    let frames = if args.start.is_some() || args.end.is_some() {
        let source_fps = args.source_fps.unwrap_or(f64::from(args.out.fps));
        let mut clip = FrameSequence::new(rasters, source_fps)?;
        let start = args.start.unwrap_or(0.0);
        let end = args.end.or(clip.duration()).unwrap_or(start);
        pipeline.record_range(&mut clip, start, end, args.out.fps)?
    } else if let Some(seconds) = args.seconds {
        if rasters.len() != 1 {
            bail!("--seconds repeats a single still frame, got {} files", rasters.len());
        }
        pipeline.record_still(&rasters[0], seconds, args.out.fps)?
    } else {
        pipeline.record_frames(rasters)?
    };

    let default_name = args
        .files
        .first()
        .and_then(|path| path.file_name())
        .map(|name| export_name_from_file_name(&name.to_string_lossy()))
        .unwrap_or_else(|| export_name_from_file_name(""));

    finish(&pipeline, frames, &args.out, &default_name, dot_size)
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let (config, dot_size) = resolve_config(&args.process)?;
    let mut pipeline = build_pipeline(config, args.process.seed, args.out.pretty);

    let mut video = VideoSource::open(&args.video)
        .with_context(|| format!("open video '{}'", args.video.display()))?;
    let end = args.start + args.duration;
    let frames = pipeline.record_range(&mut video, args.start, end, args.out.fps)?;

    let default_name = args
        .video
        .file_name()
        .map(|name| export_name_from_file_name(&name.to_string_lossy()))
        .unwrap_or_else(|| export_name_from_file_name(""));

    finish(&pipeline, frames, &args.out, &default_name, dot_size)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let (config, dot_size) = resolve_config(&args.process)?;

    let palette = match args.palette.as_deref() {
        None | Some("default") => None,
        Some(id) => match Palette::builtin(id) {
            Some(palette) => Some(palette),
            None => bail!("unknown palette '{id}' (see `dotkonvert palettes`)"),
        },
    };
    if (args.colorize || palette.is_some()) && !args.kind.supports_color() {
        warn!(kind = %args.kind, "Generator has no color variant, rendering grayscale");
    }

    let defaults = GeneratorParams::defaults_for(args.kind);
    let params = GeneratorParams {
        speed: args.speed.unwrap_or(defaults.speed),
        scale: args.scale.unwrap_or(defaults.scale),
        octaves: args.octaves.unwrap_or(defaults.octaves),
        frequency: args.frequency.unwrap_or(defaults.frequency),
        amplitude: args.amplitude.unwrap_or(defaults.amplitude),
        light_deg: args.light.unwrap_or(defaults.light_deg),
        color: args.colorize || palette.is_some(),
        palette,
    };

    let seeded_table = args.process.seed.map(PermutationTable::new);
    let table = seeded_table.as_ref().unwrap_or_else(|| PermutationTable::shared());
    let generator = Generator::new(args.kind, params, table);

    let mut pipeline = build_pipeline(config, args.process.seed, args.out.pretty);
    let frames = pipeline.record_generator(&generator, args.start, args.seconds, args.out.fps)?;

    let default_name = format!("{}_dotted", args.kind);
    finish(&pipeline, frames, &args.out, &default_name, dot_size)
}

fn cmd_save_preset(args: SavePresetArgs) -> anyhow::Result<()> {
    let Some(path) = args.process.preset_file.clone() else {
        bail!("--preset-file is required to save a preset");
    };
    let (config, dot_size) = resolve_config(&args.process)?;
    let dot_size = args.dot_size.map_or(dot_size, |percent| f64::from(percent) / 100.0);

    let snapshot = PresetSnapshot::from_config(&config, dot_size);
    let Some(entry) = CustomPreset::new(&args.name, snapshot) else {
        bail!("preset name must not be empty");
    };

    let mut list = load_custom_presets(&path)?;
    let id = entry.id.clone();
    CustomPreset::upsert(&mut list, entry);

    let json = serde_json::to_vec_pretty(&list).context("encode preset file")?;
    std::fs::write(&path, json).with_context(|| format!("write preset file '{}'", path.display()))?;
    info!(id = %id, file = %path.display(), "Preset saved");
    println!("{id}");
    Ok(())
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    for preset in builtin_presets() {
        println!("{:<12} {}", preset.id, preset.label);
    }
    if let Some(path) = &args.preset_file {
        for preset in load_custom_presets(path)? {
            println!("{:<12} {}", preset.id, preset.name);
        }
    }
    Ok(())
}

fn cmd_palettes() -> anyhow::Result<()> {
    println!("default");
    for id in builtin_palette_ids() {
        println!("{id}");
    }
    Ok(())
}
