//! Renders the score sheets and the note count graph of a DTX/GDA chart into SVG files.
//!
//! ```sh
//! cargo run --example render_svg -- path/to/chart.dtx --part drum --out sheets
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use dtx_chart::prelude::*;

/// Configuration parameters
#[derive(Parser, Debug)]
#[command(name = "render_svg")]
#[command(about = "Renders the score sheets of a DTX/GDA chart into SVG files", long_about = None)]
struct Config {
    /// Chart file path
    #[arg(value_name = "FILE")]
    chart_path: PathBuf,

    /// The dialect of the chart. Guessed from the file extension if omitted
    #[arg(long)]
    dialect: Option<Dialect>,

    /// The instrument to draw
    #[arg(short, long, value_enum, default_value = "drum")]
    part: Part,

    /// The lane arrangement
    #[arg(long, default_value = "full")]
    chart_type: ChartType,

    /// The arrangement of the graph bars
    #[arg(long, default_value = "gitadora")]
    graph: DrumGraphOption,

    /// Pixels per normalized line
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// The content height of a page in pixels
    #[arg(long, default_value = "720")]
    page_height: f64,

    /// The pages on a canvas
    #[arg(long, default_value = "20")]
    pages_per_canvas: usize,

    /// `fixed` or `measure`
    #[arg(long, default_value = "fixed")]
    alignment: Alignment,

    /// `up` or `down`
    #[arg(long, default_value = "up")]
    direction: Direction,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Part {
    Drum,
    Guitar,
    Bass,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let config = Config::parse();

    let bytes = std::fs::read(&config.chart_path)
        .map_err(|e| format!("Failed to read file: {e}"))?;
    // The editors write Shift_JIS.
    let source = encoding_rs::SHIFT_JIS.decode(&bytes).0.into_owned();

    let dialect = match config.dialect {
        Some(dialect) => dialect,
        None => guess_dialect(&config.chart_path)?,
    };
    let DtxOutput { document, warnings } =
        parse_dtx(&source, DecodeConfig { dialect }).map_err(|e| e.to_string())?;
    let name = config.chart_path.display().to_string();
    emit_dtx_warnings(&name, &source, &warnings);

    println!(
        "{} / {} ({} measures)",
        document.chart_info.title,
        document.chart_info.artist,
        document.bar_groups.len()
    );
    let timing = TimingMapper::build(&document).map_err(|e| e.to_string())?;
    println!(
        "Length: {}",
        format_duration(timing.estimate_duration())
    );

    let layout = LayoutConfig::default()
        .with_scale(config.scale)
        .with_page_height(config.page_height)
        .with_pages_per_canvas(config.pages_per_canvas)
        .with_alignment(config.alignment)
        .with_direction(config.direction);
    std::fs::create_dir_all(&config.out)
        .map_err(|e| format!("Failed to create {}: {e}", config.out.display()))?;

    let instrument = match config.part {
        Part::Drum => {
            let drawer = DrumDrawer::new(config.chart_type);
            render(&document, &timing, layout, drawer, &config.out)?;
            Instrument::Drum
        }
        Part::Guitar | Part::Bass => {
            let half = if matches!(config.part, Part::Guitar) {
                Half::Guitar
            } else {
                Half::Bass
            };
            let drawer = GuitarDrawer::new(half, config.chart_type);
            render(&document, &timing, layout, drawer, &config.out)?;
            half.instrument()
        }
    };

    match NoteGraph::from_document(&document, instrument, config.graph) {
        Some(graph) => {
            let surface = graph
                .render(&SvgSurfaceFactory, "dtxgraph")
                .map_err(|e| e.to_string())?;
            write_svg(&config.out, "dtxgraph", surface)?;
        }
        None => println!("No {instrument} chart, skipping the graph"),
    }
    Ok(())
}

fn guess_dialect(path: &Path) -> Result<Dialect, String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| "Invalid file extension".to_string())?
        .parse()
        .map_err(|e: dtx_chart::dtx::command::UnknownDialect| e.to_string())
}

fn render<D: NoteDrawer>(
    document: &ChartDocument,
    timing: &TimingMapper,
    layout: LayoutConfig,
    drawer: D,
    out: &Path,
) -> Result<(), String> {
    let engine = LayoutEngine::new(document, timing, layout, drawer);
    let sheets = engine
        .render(&SvgSurfaceFactory)
        .map_err(|e| e.to_string())?;
    for (canvas, sheet) in engine.canvases().iter().zip(sheets) {
        let Some(sheet) = sheet else {
            eprintln!("Skipped {}", canvas.id);
            continue;
        };
        write_svg(out, &canvas.id, sheet)?;
    }
    Ok(())
}

fn write_svg(out: &Path, id: &str, surface: SvgSurface) -> Result<(), String> {
    let bytes = surface.finalize().map_err(|e| e.to_string())?;
    let path = out.join(format!("{id}.svg"));
    std::fs::write(&path, bytes).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
