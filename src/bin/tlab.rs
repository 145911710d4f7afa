use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use num_format::{Locale, ToFormattedString};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tileset_lab::api::DEFAULT_BASE_URL;
use tileset_lab::legend::{self, LegendSettings};
use tileset_lab::models::{ClassificationMethod, ClassificationRequest};
use tileset_lab::palette::{self, SchemeCategory};
use tileset_lab::progress::{POLL_INTERVAL, ProgressMessages};
use tileset_lab::tiles::{self, MAX_ZOOM};
use tileset_lab::{
    BoundingBox, Client, JobRef, MapSession, PollState, TierStore, spawn_poller, stats, storage,
};

#[derive(Parser, Debug)]
#[command(
    name = "tlab",
    version,
    about = "Estimate tiles, style tiers & watch tileset jobs of a tile lab server"
)]
struct Cli {
    /// Base URL of the tile lab API.
    #[arg(long, global = true, env = "TILESET_LAB_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate how many tiles a bounding box covers per zoom level.
    Tiles(TilesArgs),
    /// List the built-in color schemes.
    Palettes(PalettesArgs),
    /// Print tier ranges and colors for given breaks (optionally export a legend).
    Tiers(TiersArgs),
    /// Ask the server for class breaks and print the resulting tiers.
    Classify(ClassifyArgs),
    /// Poll a dataset or tileset job until it completes or fails.
    Watch(WatchArgs),
    /// Show the vector layers of a generated tileset.
    Metadata(TilesetArgs),
    /// Time repeated metadata loads of a tileset and summarize the latency.
    Bench(BenchArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum Category {
    Sequential,
    Diverging,
}

impl From<Category> for SchemeCategory {
    fn from(c: Category) -> Self {
        match c {
            Category::Sequential => SchemeCategory::Sequential,
            Category::Diverging => SchemeCategory::Diverging,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum Method {
    Quantile,
    NaturalBreaks,
    Percentile,
}

impl From<Method> for ClassificationMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::Quantile => ClassificationMethod::Quantile,
            Method::NaturalBreaks => ClassificationMethod::NaturalBreaks,
            Method::Percentile => ClassificationMethod::Percentile,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct TilesArgs {
    /// Bounding box as west,south,east,north in degrees (e.g., -74.1,40.6,-73.8,40.9)
    #[arg(long, allow_hyphen_values = true)]
    bbox: String,
    /// Lowest zoom level (default 0).
    #[arg(long, default_value_t = 0)]
    min_zoom: u8,
    /// Highest zoom level (default 14).
    #[arg(long, default_value_t = 14)]
    max_zoom: u8,
    /// Reject inverted or out-of-range boxes instead of estimating them as given.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct PalettesArgs {
    /// Only list schemes of this category.
    #[arg(long, value_enum)]
    category: Option<Category>,
    /// Sample every scheme down to this many colors.
    #[arg(long)]
    count: Option<usize>,
}

#[derive(Args, Debug)]
struct LegendArgs {
    /// Write an SVG legend to this path.
    #[arg(long)]
    legend: Option<PathBuf>,
    /// Legend title (default "Legend").
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct TiersArgs {
    /// Class breaks separated by comma or semicolon (e.g., 10,20,30)
    #[arg(long, allow_hyphen_values = true)]
    breaks: String,
    /// Color scheme name (e.g., Burg).
    #[arg(long, default_value = "Burg")]
    scheme: String,
    /// Field the breaks were computed for.
    #[arg(long, default_value = "value")]
    field: String,
    #[command(flatten)]
    legend: LegendArgs,
}

#[derive(Args, Debug)]
struct TilesetArgs {
    #[arg(long)]
    dataset: u64,
    #[arg(long)]
    tileset: u64,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    #[command(flatten)]
    target: TilesetArgs,
    /// Numeric field to classify.
    #[arg(long)]
    field: String,
    #[arg(long, value_enum, default_value = "quantile")]
    method: Method,
    /// Number of classes (default 5).
    #[arg(long, default_value_t = 5)]
    classes: u32,
    /// Color scheme name (e.g., Burg).
    #[arg(long, default_value = "Burg")]
    scheme: String,
    #[command(flatten)]
    legend: LegendArgs,
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[arg(long)]
    dataset: u64,
    /// Watch tileset generation instead of dataset ingestion.
    #[arg(long)]
    tileset: Option<u64>,
    /// Poll interval in milliseconds (default 2000).
    #[arg(long, default_value_t = POLL_INTERVAL.as_millis() as u64)]
    interval_ms: u64,
}

#[derive(Args, Debug)]
struct BenchArgs {
    #[command(flatten)]
    target: TilesetArgs,
    /// Number of loads to time (default 5).
    #[arg(long, default_value_t = 5)]
    runs: u32,
    /// Save the timings to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn parse_numbers(s: &str) -> Result<Vec<f64>> {
    s.split([',', ';'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<f64>()
                .with_context(|| format!("invalid number {x:?}"))
        })
        .collect()
}

fn parse_bbox(s: &str) -> Result<BoundingBox> {
    let v = parse_numbers(s)?;
    let &[west, south, east, north] = v.as_slice() else {
        bail!("invalid --bbox, expected west,south,east,north");
    };
    Ok(BoundingBox::new(west, south, east, north))
}

fn fmt_ms(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.1}"),
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Tiles(args) => cmd_tiles(args),
        Command::Palettes(args) => cmd_palettes(args),
        Command::Tiers(args) => cmd_tiers(args),
        Command::Classify(args) => cmd_classify(&cli.api_url, args),
        Command::Watch(args) => cmd_watch(&cli.api_url, args),
        Command::Metadata(args) => cmd_metadata(&cli.api_url, args),
        Command::Bench(args) => cmd_bench(&cli.api_url, args),
    }
}

fn cmd_tiles(args: TilesArgs) -> Result<()> {
    let bbox = parse_bbox(&args.bbox)?;
    if args.strict {
        bbox.validate()?;
    }
    if args.min_zoom > args.max_zoom {
        bail!("--min-zoom must not exceed --max-zoom");
    }
    if args.max_zoom > MAX_ZOOM {
        bail!("--max-zoom must be at most {MAX_ZOOM}");
    }
    let estimates = tiles::zoom_estimates(&bbox, args.min_zoom..=args.max_zoom);
    for e in &estimates {
        println!("z{:<2} {:>16}", e.zoom, e.tiles.to_formatted_string(&Locale::en));
    }
    let total = estimates
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(e.tiles));
    println!("total {:>15}", total.to_formatted_string(&Locale::en));
    Ok(())
}

fn cmd_palettes(args: PalettesArgs) -> Result<()> {
    for group in palette::theme_groups() {
        if let Some(c) = args.category.clone()
            && SchemeCategory::from(c) != group.category
        {
            continue;
        }
        println!("{}", group.label);
        for scheme in group.schemes {
            let colors = match args.count {
                Some(n) => tileset_lab::sample_colors(scheme.colors, n),
                None => scheme.colors.iter().map(|c| c.to_string()).collect(),
            };
            println!("  {:<14} {}", scheme.name, colors.join(" "));
        }
    }
    Ok(())
}

fn print_and_export(store: &TierStore, legend_args: &LegendArgs) -> Result<()> {
    let items = store.legend_items();
    if items.is_empty() {
        bail!("no tier colors: unknown scheme or empty breaks");
    }
    for item in &items {
        println!("{}  {}", item.color, item.label);
    }
    if let Some(path) = legend_args.legend.as_ref() {
        let mut settings = LegendSettings::default();
        if let Some(title) = legend_args.title.as_ref() {
            settings.title = title.clone();
        }
        legend::render_legend_svg(&items, &settings, path)?;
        eprintln!("Wrote legend to {}", path.display());
    }
    Ok(())
}

fn cmd_tiers(args: TiersArgs) -> Result<()> {
    let breaks = parse_numbers(&args.breaks)?;
    if breaks.is_empty() {
        bail!("at least one break is required");
    }
    let mut store = TierStore::new();
    store.apply_scheme(args.field, breaks, &args.scheme);
    print_and_export(&store, &args.legend)
}

fn cmd_classify(api_url: &str, args: ClassifyArgs) -> Result<()> {
    let client = Client::new(api_url)?;
    let req = ClassificationRequest {
        field: args.field,
        method: args.method.into(),
        classes: args.classes,
    };
    let breaks = client.classify(args.target.dataset, args.target.tileset, &req)?;
    let mut store = TierStore::new();
    store.apply_scheme(req.field, breaks, &args.scheme);
    print_and_export(&store, &args.legend)
}

fn cmd_watch(api_url: &str, args: WatchArgs) -> Result<()> {
    let client = Client::new(api_url)?;
    let job = match args.tileset {
        Some(tileset_id) => JobRef::TilesetGeneration {
            dataset_id: args.dataset,
            tileset_id,
        },
        None => JobRef::DatasetIngestion {
            dataset_id: args.dataset,
        },
    };
    let messages = ProgressMessages::for_job(&job);
    let printer = messages.clone();
    let handle = spawn_poller(
        Arc::new(client),
        job,
        Duration::from_millis(args.interval_ms),
        move |view| {
            eprintln!(
                "{}: {} ({:.0}%)",
                job,
                printer.title(view.display),
                view.percentage
            );
        },
    );
    let Some(view) = handle.join() else {
        bail!("progress poller for {job} stopped unexpectedly");
    };
    if !view.state.is_terminal() {
        bail!("stopped watching {job} before it finished");
    }
    println!("{}", messages.description(view.display));
    if view.state == PollState::Failed {
        bail!("{}", messages.title(view.display));
    }
    Ok(())
}

fn cmd_metadata(api_url: &str, args: TilesetArgs) -> Result<()> {
    let client = Client::new(api_url)?;
    let meta = client.tileset_metadata(args.dataset, args.tileset)?;
    let mut session = MapSession::new();
    session.select_dataset(args.dataset, meta.metadata.name.clone());
    session.select_tileset(Some(args.tileset));
    session.load_metadata(&meta);

    let h = &meta.header;
    println!(
        "zoom {}-{}  bounds {:?}  ~{} tiles",
        h.min_zoom,
        h.max_zoom,
        h.bounds,
        tiles::total_tile_count(&h.bounding_box(), h.min_zoom..=h.max_zoom)
            .to_formatted_string(&Locale::en)
    );
    for layer in &meta.metadata.vector_layers {
        let fields: Vec<&str> = layer.fields.keys().map(String::as_str).collect();
        println!(
            "{:<20} z{}-{}  fields: {}",
            layer.id,
            layer.minzoom,
            layer.maxzoom,
            fields.join(", ")
        );
    }
    eprintln!("{} layer(s) visible", session.layers().len());
    Ok(())
}

fn cmd_bench(api_url: &str, args: BenchArgs) -> Result<()> {
    if args.runs == 0 {
        bail!("--runs must be at least 1");
    }
    let client = Client::new(api_url)?;
    let source = format!("tileset-{}", args.target.tileset);
    let mut session = MapSession::for_source(source.clone());
    session.select_dataset(args.target.dataset, "");
    session.select_tileset(Some(args.target.tileset));

    for _ in 0..args.runs {
        session.monitor_mut().record_start(&source, Instant::now());
        client.tileset_metadata(args.target.dataset, args.target.tileset)?;
        session.monitor_mut().record_end(&source, Instant::now());
    }

    let monitor = session.monitor();
    let s = monitor.stats();
    println!(
        "{}: requests={} initial={:?} avg={:?} min={:?} max={:?}",
        monitor.target().unwrap_or("all sources"),
        s.total_requests, s.initial_load_time, s.avg_load_time, s.min_load_time, s.max_load_time
    );
    for row in stats::per_source_summary(monitor.metrics()) {
        println!(
            "{}  count={}  min={} max={} mean={} median={} (ms)",
            row.source_id,
            row.count,
            fmt_ms(row.min_ms),
            fmt_ms(row.max_ms),
            fmt_ms(row.mean_ms),
            fmt_ms(row.median_ms)
        );
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_metrics_csv(monitor.metrics(), path)?,
            "json" => storage::save_metrics_json(monitor.metrics(), path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} timings to {}", s.total_requests, path.display());
    }
    Ok(())
}
