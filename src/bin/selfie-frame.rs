use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use selfie_frame::{
    Border, Canvas, CompositeRequest, ExportNamer, FrameCatalog, LoadedFrame, PlacementState,
    RemoveBgClient, Studio, StudioConfig,
    assets::decode_image,
    compose::{encode_png, write_bytes},
    studio::cut_out,
};
use tokio::io::AsyncReadExt as _;
use tracing_subscriber::EnvFilter;

/// Input name that reads one encoded image from stdin.
const STDIN_INPUT: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "selfie-frame", version)]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the frame catalog.
    Frames(CatalogArgs),
    /// Remove the background of one photo and write the cut-out.
    Remove(RemoveArgs),
    /// Frame an already cut-out subject.
    Compose(ComposeArgs),
    /// Remove backgrounds of many photos concurrently and frame each one.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct CatalogArgs {
    /// JSON frame catalog (overrides the config file).
    #[arg(long)]
    frames: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Frame id; defaults to the first catalog entry.
    #[arg(long)]
    frame: Option<String>,

    /// Output size: square, square-small, portrait, or WxH.
    #[arg(long)]
    canvas: Option<Canvas>,

    /// Subject zoom (0.3 to 3.0).
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Horizontal pan in offset units (-50 to 50 unless `placement.offset_unit_span` says otherwise).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_x: f64,

    /// Vertical pan in offset units (same range as `--offset-x`).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_y: f64,

    /// Directory for `framed-selfie-<millis>.png` outputs.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RemoveArgs {
    /// Photo path, or `-` for stdin.
    input: String,

    /// Output path of the cut-out.
    #[arg(long)]
    out: PathBuf,

    /// Removal endpoint (overrides config and environment).
    #[arg(long)]
    endpoint: Option<String>,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Background-removed subject image, or `-` for stdin.
    subject: String,

    #[command(flatten)]
    render: RenderArgs,

    /// Exact output path instead of a timestamped name in the output directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Photo paths; `-` reads one photo from stdin.
    #[arg(required = true)]
    inputs: Vec<String>,

    #[command(flatten)]
    render: RenderArgs,

    /// Removal endpoint (overrides config and environment).
    #[arg(long)]
    endpoint: Option<String>,

    /// Also write each background-removed image next to its composite.
    #[arg(long)]
    keep_cutout: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => StudioConfig::from_path(path)?,
        None => StudioConfig::default(),
    };
    cfg.apply_env();

    match cli.cmd {
        Command::Frames(args) => cmd_frames(&cfg, &args),
        Command::Remove(args) => cmd_remove(cfg, args).await,
        Command::Compose(args) => cmd_compose(cfg, args).await,
        Command::Run(args) => cmd_run(cfg, args).await,
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,selfie_frame=info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(cfg: &StudioConfig, args: &CatalogArgs) -> anyhow::Result<FrameCatalog> {
    match args.frames.as_ref().or(cfg.frames.as_ref()) {
        Some(path) => Ok(FrameCatalog::from_path(path)?),
        None => Ok(FrameCatalog::builtin()),
    }
}

fn describe_border(border: Border) -> String {
    match border.reference {
        Some(reference) => format!("{}px@{reference}", border.px),
        None => format!("{}px", border.px),
    }
}

fn cmd_frames(cfg: &StudioConfig, args: &CatalogArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(cfg, args)?;
    let current = catalog.current(cfg.frame.as_deref())?.id.clone();
    for frame in catalog.iter() {
        let marker = if frame.id == current { "*" } else { " " };
        println!(
            "{marker} {}\t{}\t{}\t{}",
            frame.id,
            frame.name,
            describe_border(frame.border),
            frame.source
        );
    }
    Ok(())
}

async fn read_input(input: &str) -> anyhow::Result<(String, Vec<u8>)> {
    if input == STDIN_INPUT {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .context("read image from stdin")?;
        return Ok(("stdin".to_string(), bytes));
    }
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("read input '{input}'"))?;
    Ok((input.to_string(), bytes))
}

fn removal_client(cfg: &mut StudioConfig, endpoint: Option<String>) -> anyhow::Result<RemoveBgClient> {
    if let Some(endpoint) = endpoint {
        cfg.endpoint = endpoint;
    }
    cfg.validate()?;
    Ok(RemoveBgClient::new(&cfg.removal_settings())?)
}

/// Resolved rendering options after layering flags over the config.
struct RenderPlan {
    frame: LoadedFrame,
    canvas: Canvas,
    placement: PlacementState,
    out_dir: PathBuf,
}

async fn render_plan(
    cfg: &StudioConfig,
    args: RenderArgs,
    http: &reqwest::Client,
) -> anyhow::Result<RenderPlan> {
    let catalog = load_catalog(cfg, &args.catalog)?;
    let selected = args.frame.as_deref().or(cfg.frame.as_deref());
    let id = catalog.current(selected)?.id.clone();
    let frame = catalog
        .load(&id, http)
        .await
        .with_context(|| format!("load frame '{id}'"))?;
    Ok(RenderPlan {
        frame,
        canvas: args.canvas.unwrap_or(cfg.canvas),
        placement: cfg.placement.state(args.scale, args.offset_x, args.offset_y),
        out_dir: args.out_dir.unwrap_or_else(|| cfg.output_dir.clone()),
    })
}

async fn cmd_remove(mut cfg: StudioConfig, args: RemoveArgs) -> anyhow::Result<()> {
    let client = removal_client(&mut cfg, args.endpoint)?;
    let (label, bytes) = read_input(&args.input).await?;
    let cutout = cut_out(&client, bytes)
        .await
        .with_context(|| format!("remove background of '{label}'"))?;
    write_bytes(&args.out, &cutout.encoded).await?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_compose(cfg: StudioConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let http = reqwest::Client::new();
    let plan = render_plan(&cfg, args.render, &http).await?;
    let (label, bytes) = read_input(&args.subject).await?;
    let subject = decode_image(&bytes).with_context(|| format!("decode subject '{label}'"))?;

    let composite = selfie_frame::compose(
        &CompositeRequest {
            frame: &plan.frame.art,
            border_px: plan.frame.border_px(plan.canvas),
            subject: &subject,
            placement: plan.placement,
            canvas: plan.canvas,
        },
        &cfg.placement,
    )?;

    let path = match args.out {
        Some(path) => {
            write_bytes(&path, &encode_png(&composite.surface)?).await?;
            path
        }
        None => {
            ExportNamer::default()
                .write_png(&plan.out_dir, &composite.surface)
                .await?
        }
    };
    eprintln!("wrote {}", path.display());
    Ok(())
}

async fn cmd_run(mut cfg: StudioConfig, args: RunArgs) -> anyhow::Result<()> {
    if args.inputs.iter().filter(|i| *i == STDIN_INPUT).count() > 1 {
        anyhow::bail!("stdin ('-') can be used as an input only once");
    }

    let client = removal_client(&mut cfg, args.endpoint)?;
    let plan = render_plan(&cfg, args.render, client.http()).await?;
    let mut studio = Studio::new(client, cfg.placement, plan.canvas)?;
    studio.select_frame(plan.frame);

    let mut failures = 0usize;
    for input in &args.inputs {
        let added = match read_input(input).await {
            Ok((label, bytes)) => studio.add_image(label, bytes).map_err(anyhow::Error::from),
            Err(err) => Err(err),
        };
        if let Err(err) = added {
            eprintln!("{input}: {err:#}");
            failures += 1;
        }
    }

    let report = studio.process_pending().await;
    for (id, message) in &report.failed {
        let label = studio.get(*id).map(|r| r.label().to_string()).unwrap_or_default();
        eprintln!("{label}: {message}");
    }
    failures += report.failed.len();

    for id in &report.ready {
        studio.set_scale(*id, plan.placement.scale())?;
        studio.set_offset(*id, plan.placement.offset_x(), plan.placement.offset_y())?;
    }

    for (id, exported) in studio.export_all(&plan.out_dir).await {
        let label = studio.get(id).map(|r| r.label().to_string()).unwrap_or_default();
        let path = match exported {
            Ok(path) => path,
            Err(err) => {
                eprintln!("{label}: {err}");
                failures += 1;
                continue;
            }
        };
        println!("{label}\t{}", path.display());
        if args.keep_cutout {
            if let Err(err) = studio.export_cutout(id, &path).await {
                eprintln!("{label}: cut-out not written: {err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} images failed", args.inputs.len());
    }
    Ok(())
}
