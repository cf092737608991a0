use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sticker_editor::{
    Canvas, EditScript, EditorOpts, EditorSession, FontSource, LoadStatus, LocalImageSource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sticker-editor", version)]
struct Cli {
    /// Log at debug level (`RUST_LOG` overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an edit script and save the flattened sticker as PNG.
    Edit(EditArgs),
    /// Replay an edit script and write the editor view (overlays included) as PNG.
    Preview(EditArgs),
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Source image: a path, `file://` URL or `data:` URL.
    #[arg(long)]
    image: String,

    /// Edit script JSON. Without one the image is saved as framed by default.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Directory relative image paths are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Font file for the text overlay; defaults to a heavy system sans-serif.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also print the PNG as a `data:` URL on stdout.
    #[arg(long, default_value_t = false)]
    data_url: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Edit(args) => cmd_edit(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_session(args: &EditArgs) -> anyhow::Result<EditorSession> {
    let canvas = Canvas::new(args.width, args.height)?;
    let font = match &args.font {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            FontSource::Bytes(Arc::new(bytes))
        }
        None => FontSource::System,
    };
    let opts = EditorOpts::default().with_canvas(canvas).with_font(font);
    let source = LocalImageSource::new(&args.root);
    let mut session = EditorSession::open_with(args.image.as_str(), &source, opts)?;
    if session.load_status() != LoadStatus::Loaded {
        anyhow::bail!("could not load source image '{}'", args.image);
    }

    if let Some(path) = &args.script {
        let script = EditScript::from_path(path)?;
        script
            .apply(&mut session)
            .with_context(|| format!("apply edit script '{}'", path.display()))?;
    }
    Ok(session)
}

fn ensure_parent(out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let session = open_session(&args)?;
    let exported = session.save()?;

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, &exported.png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    if args.data_url {
        println!("{}", exported.to_data_url());
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_preview(args: EditArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args)?;
    let frame = session.render()?;
    session.cancel();

    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
