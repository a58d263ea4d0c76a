use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version)]
struct Cli {
    /// Composer config JSON. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Caption font (TTF/OTF). Overrides the config and `REELSMITH_FONT`.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize, caption and encode a script into a WebM file (requires `espeak-ng` and
    /// `ffmpeg`).
    Generate(GenerateArgs),
    /// Render a single caption frame as a PNG.
    Frame(FrameArgs),
    /// List voice and palette presets.
    Presets,
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Script JSON (one record or an array of records).
    #[arg(long = "script")]
    script_path: PathBuf,

    /// Script id to use when the file holds several records. Defaults to the first.
    #[arg(long)]
    id: Option<String>,

    /// Backdrop palette.
    #[arg(long, default_value = "violet")]
    palette: reelsmith::PaletteId,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    script: ScriptArgs,

    /// Voice preset.
    #[arg(long, default_value = "neutral")]
    voice: reelsmith::VoiceKey,

    /// Pitch override, clamped to the preset range.
    #[arg(long)]
    pitch: Option<u16>,

    /// Speed override, clamped to the preset range.
    #[arg(long)]
    speed: Option<u16>,

    /// Replacement narration text.
    #[arg(long)]
    text: Option<String>,

    /// Output directory for the WebM file.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    script: ScriptArgs,

    /// Instant to draw, in seconds since the start of the run.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Narration length to schedule captions against, in seconds.
    #[arg(long)]
    audio_secs: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.font)?;
    match cli.cmd {
        Command::Generate(args) => cmd_generate(config, args),
        Command::Frame(args) => cmd_frame(config, args),
        Command::Presets => {
            cmd_presets();
            Ok(())
        }
    }
}

fn load_config(
    path: Option<&Path>,
    font: Option<PathBuf>,
) -> anyhow::Result<reelsmith::ComposerConfig> {
    let mut config = match path {
        Some(p) => reelsmith::ComposerConfig::from_path(p)?,
        None => reelsmith::ComposerConfig::default(),
    }
    .with_env_overrides();
    if font.is_some() {
        config.font_path = font;
    }
    Ok(config)
}

fn pick_script(args: &ScriptArgs) -> anyhow::Result<reelsmith::Script> {
    let catalog = reelsmith::Script::load_catalog(&args.script_path)?;
    let script = match args.id.as_deref() {
        Some(id) => catalog.into_iter().find(|s| s.id == id),
        None => catalog.into_iter().next(),
    };
    script.with_context(|| format!("no matching script in '{}'", args.script_path.display()))
}

fn cmd_generate(config: reelsmith::ComposerConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let script = pick_script(&args.script)?;
    let mut composer = reelsmith::Composer::new(config)?;
    composer.select_script(script);
    composer.select_palette(args.script.palette);
    composer.select_voice(args.voice);
    if let Some(p) = args.pitch {
        composer.set_pitch(p);
    }
    if let Some(s) = args.speed {
        composer.set_speed(s);
    }
    if let Some(text) = args.text {
        composer.set_text(text);
    }

    let stats = composer.stats();
    eprintln!(
        "{} segments, {} words, ~{} wpm",
        stats.segments, stats.words, stats.words_per_minute
    );

    match composer.generate()? {
        None => anyhow::bail!("narration is too short to generate a video"),
        Some(reelsmith::GenerationState::Complete) => {}
        Some(_) => {
            for entry in composer.log().entries() {
                eprintln!("  {:?}: {}", entry.status, entry.label);
            }
            anyhow::bail!(
                "generation failed: {}",
                composer.error().unwrap_or("unknown error")
            );
        }
    }

    let result = composer
        .result()
        .context("generation completed without a result")?;
    let path = result.artifact.save(&args.out_dir)?;
    eprintln!(
        "wrote {} ({}, {:.1}s, {} bytes)",
        path.display(),
        result.format_label(),
        result.duration_secs,
        result.artifact.len()
    );
    Ok(())
}

fn cmd_frame(config: reelsmith::ComposerConfig, args: FrameArgs) -> anyhow::Result<()> {
    let script = pick_script(&args.script)?;
    let segments = reelsmith::segment_narration(&script.narration_text);
    let audio_secs = args
        .audio_secs
        .unwrap_or(f64::from(script.duration_seconds));

    let mut surface = reelsmith::FrameSurface::portrait()?;
    if let Some(path) = config.font_path.as_ref() {
        surface = surface.with_font(reelsmith::CaptionFont::load(path)?);
    }
    let mut compositor =
        reelsmith::FrameCompositor::new(args.script.palette.palette(), segments, audio_secs)?;
    let frame = compositor.compose(&mut surface, args.at)?;

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

fn cmd_presets() {
    println!("voices:");
    for key in reelsmith::VoiceKey::ALL {
        let p = key.profile();
        let voice = match p.variant {
            Some(v) => format!("{}+{v}", p.base_voice),
            None => p.base_voice.to_string(),
        };
        println!(
            "  {:<12} {:<20} voice={voice} pitch={} speed={}",
            key.as_str(),
            p.label,
            p.pitch,
            p.speed
        );
    }
    println!("palettes:");
    for id in reelsmith::PaletteId::ALL {
        let p = id.palette();
        println!(
            "  {:<12} {:<20} {} -> {} accent {}",
            id.as_str(),
            p.label,
            p.stops[0].to_hex(),
            p.stops[1].to_hex(),
            p.accent.to_hex()
        );
    }
}
