use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use treemap_core::human::human_value;
use treemap_core::labels::ApproxMetrics;
use treemap_core::loader::{LoadMsg, Loader};
use treemap_core::treemap::Tiling;
use treemap_core::{export, logging, render, search, Chart, ChartConfig};

#[derive(Parser, Debug)]
#[command(name = "treemap-cli", about = "Render a hierarchical JSON dataset as a treemap")]
struct Args {
    /// Hierarchy JSON file ({ name, children: [{ name, category, value }] })
    input: PathBuf,
    /// Output SVG path
    #[arg(short, long)]
    svg: Option<PathBuf>,
    /// Output standalone HTML page with hover tooltip
    #[arg(long)]
    html: Option<PathBuf>,
    /// Output JSON report of tiles and legend
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// Output CSV of tiles
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Output PDF
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// Chart config JSON; missing keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Diagram width, overrides the config
    #[arg(long)]
    width: Option<f64>,
    /// Diagram height, overrides the config
    #[arg(long)]
    height: Option<f64>,
    /// squarify, dice, slice or slice-dice
    #[arg(long)]
    tiling: Option<Tiling>,
    /// List tiles whose name fuzzy-matches this text
    #[arg(long)]
    find: Option<String>,
}

fn main() -> anyhow::Result<()> {
    logging::init("info");
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ChartConfig::from_file(path)?,
        None => ChartConfig::default(),
    };
    if let Some(w) = args.width {
        config.layout.width = w;
    }
    if let Some(h) = args.height {
        config.layout.height = h;
    }
    if let Some(t) = args.tiling {
        config.layout.tiling = t;
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = crossbeam_channel::unbounded::<LoadMsg>();
    let loader = Loader::new(cancel);
    std::thread::spawn({
        let input = args.input.clone();
        move || loader.load(input, tx)
    });

    let mut data = None;
    while let Ok(msg) = rx.recv() {
        match msg {
            LoadMsg::Started { path } => tracing::debug!(path = %path.display(), "loading"),
            LoadMsg::Loaded(d) => {
                data = Some(d);
                break;
            }
            LoadMsg::Error(e) => bail!("could not load {}: {e}", args.input.display()),
        }
    }
    let Some(data) = data else {
        bail!("loader stopped without a result");
    };

    let chart = Chart::build(&data, &config, &ApproxMetrics)?;

    if let Some(path) = &args.svg {
        std::fs::write(path, render::to_svg(&chart))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.html {
        std::fs::write(path, render::to_html(&chart))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.json {
        let json = export::to_json(&chart);
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::to_csv(&chart, file)?;
    }
    if let Some(path) = &args.pdf {
        export::to_pdf(&chart, path)?;
    }

    if let Some(needle) = &args.find {
        for (i, score) in search::find_tiles(&chart, needle) {
            let t = &chart.tiles[i];
            println!("{score:>5}  {}  [{}]  {}", t.name, t.category, human_value(t.value));
        }
    }

    println!(
        "{}: {} tiles in {} categories, total {}",
        chart.title,
        chart.tiles.len(),
        chart.scale.domain.len(),
        human_value(chart.total)
    );
    Ok(())
}
