use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "aniver", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a card over a background image and write it as PNG.
    Render(RenderArgs),
    /// Print the caption line layout as JSON without rasterizing.
    Layout(LayoutArgs),
    /// Print which face each font family resolves to.
    Fonts,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Style JSON file; flags below override its fields.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Caption text.
    #[arg(long)]
    caption: Option<String>,

    /// Font family: handwritten, sans or serif.
    #[arg(long)]
    font: Option<aniver::FontFamily>,

    /// Font size in editor units (the card uses twice this in pixels).
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i32>,

    /// Vertical caption offset in pixels; negative moves up.
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i32>,

    /// Caption color as #RRGGBB.
    #[arg(long)]
    color: Option<aniver::Rgb8>,

    /// Disable the caption shadow and outline.
    #[arg(long)]
    no_shadow: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Background image (PNG, JPEG, WebP) or a text file holding a data URL.
    #[arg(long)]
    background: PathBuf,

    /// Output PNG path, or a directory to write `aniverapp-<name>.png` into.
    #[arg(long)]
    out: PathBuf,

    /// Display name used for the download file name.
    #[arg(long, default_value = "card")]
    name: String,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    style: StyleArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Fonts => cmd_fonts(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_style(args: &StyleArgs) -> anyhow::Result<aniver::StyleParameters> {
    let mut style = match &args.style {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("open style '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f)).with_context(|| "parse style JSON")?
        }
        None => aniver::StyleParameters::default(),
    };

    if let Some(caption) = &args.caption {
        style.text = caption.clone();
    }
    if let Some(font) = args.font {
        style.font_family = font;
    }
    if let Some(size) = args.size {
        style.font_size = size;
    }
    if let Some(offset) = args.offset {
        style.vertical_offset = offset;
    }
    if let Some(color) = args.color {
        style.color = color;
    }
    if args.no_shadow {
        style.shadow = false;
    }
    Ok(style)
}

fn read_background(path: &Path) -> anyhow::Result<aniver::BackgroundSource> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read background '{}'", path.display()))?;
    let text_start = bytes.trim_ascii_start();
    if text_start.starts_with(b"data:") {
        let url = String::from_utf8(bytes).with_context(|| "data URL is not UTF-8")?;
        return Ok(aniver::BackgroundSource::from_data_url(url));
    }
    Ok(aniver::BackgroundSource::from_bytes(bytes))
}

fn output_path(out: &Path, name: &str) -> PathBuf {
    if out.is_dir() {
        out.join(aniver::download_filename(name))
    } else {
        out.to_path_buf()
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let style = read_style(&args.style)?;
    let source = read_background(&args.background)?;
    let session = aniver::CardSession::story(&aniver::CompositorOpts::from_env())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;
    let outcome = runtime.block_on(session.render(source, style))?;
    let aniver::RenderOutcome::Completed(frame) = outcome else {
        anyhow::bail!("render was superseded");
    };

    let out = output_path(&args.out, &args.name);
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    aniver::write_png(&frame, &out)?;

    tracing::info!(
        path = %out.display(),
        digest = %format!("{:016x}", aniver::digest_u64(&frame.data)),
        "card written"
    );
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let style = read_style(&args.style)?;
    let mut compositor = aniver::Compositor::new(&aniver::CompositorOpts::from_env());
    let layout = compositor.layout_caption(&style, aniver::Canvas::STORY)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn cmd_fonts() -> anyhow::Result<()> {
    let opts = aniver::CompositorOpts::from_env();
    let mut book = aniver::FontBook::load(&opts.fonts);
    println!("faces loaded: {}", book.face_count());
    for family in aniver::FontFamily::ALL {
        let weight = family.caption_weight();
        match book.resolve(family, weight) {
            Ok(font) => {
                println!("{family} ({}, weight {weight}):", family.face_name());
                println!("  family: {}", font.family_name);
                println!("  index:  {}", font.index);
                println!("  sha256: {}", sha256_hex(&font.bytes));
            }
            Err(e) => println!("{family}: {e}"),
        }
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
