//! Example: extract the graph of a skeleton PNG.
//!
//! Loads an already thinned, one-pixel-wide skeleton image, converts it to a
//! binary mask, runs the extraction pipeline and writes nodes, edges and
//! extraction counters to a JSON file next to the input image.
//!
//! Run from the workspace root:
//!   cargo run -p skeleton-graph --example skeleton_png -- --help
//!   cargo run -p skeleton-graph --example skeleton_png -- --input data/skeleton.png

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use serde::Serialize;
use skeleton_graph::{
    ExtractConfig, ExtractionStats, ImageView, MaskPolarity, NodeKind, extract, mask_from_u8,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Extract a topological graph from a skeleton image")]
struct Args {
    /// Path to the skeleton PNG
    #[arg(long, default_value = "data/skeleton.png")]
    input: PathBuf,

    /// Arc length (pixels) between emitted path samples
    #[arg(long, default_value_t = 10.0)]
    step_length: f64,

    /// Treat black pixels as skeleton (black strokes on white paper)
    #[arg(long)]
    dark_foreground: bool,

    /// Output JSON path (default: <input stem>_graph.json next to input)
    #[arg(long)]
    out: Option<PathBuf>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct NodeDto {
    id: usize,
    x: f32,
    y: f32,
    kind: NodeKind,
}

#[derive(Serialize)]
struct GraphDto {
    source: String,
    width: usize,
    height: usize,
    step_length: f64,
    nodes: Vec<NodeDto>,
    edges: Vec<[usize; 2]>,
    stats: ExtractionStats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tracing::info!("Loading skeleton: {}", args.input.display());
    let gray = ImageReader::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?
        .decode()
        .with_context(|| format!("decoding {}", args.input.display()))?
        .to_luma8();
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let raw = ImageView::from_slice(w, h, w, gray.as_raw().as_slice())?;
    tracing::info!("Image size: {}x{}", w, h);

    let polarity = if args.dark_foreground {
        MaskPolarity::Zero
    } else {
        MaskPolarity::NonZero
    };
    let mask = mask_from_u8(&raw, polarity);
    let cfg = ExtractConfig {
        step_length: args.step_length,
    };

    let t0 = Instant::now();
    let out = extract(&mask, &cfg)?;
    tracing::info!(
        nodes = out.graph.num_nodes(),
        edges = out.graph.num_edges(),
        junctions = out.graph.num_junctions(),
        ends = out.graph.num_ends(),
        elapsed_ms = t0.elapsed().as_secs_f64() * 1e3,
        "graph extracted"
    );

    let dto = GraphDto {
        source: args.input.display().to_string(),
        width: out.graph.width,
        height: out.graph.height,
        step_length: cfg.step_length,
        nodes: out
            .graph
            .nodes
            .iter()
            .map(|n| NodeDto {
                id: n.id,
                x: n.pos.x,
                y: n.pos.y,
                kind: n.kind,
            })
            .collect(),
        edges: out.graph.edges.iter().map(|e| [e.a, e.b]).collect(),
        stats: out.traced.stats,
    };

    let out_path = args.out.unwrap_or_else(|| {
        let stem = args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "skeleton".to_owned());
        args.input.with_file_name(format!("{stem}_graph.json"))
    });

    let json = serde_json::to_string_pretty(&dto)?;
    std::fs::write(&out_path, json)
        .with_context(|| format!("writing {}", out_path.display()))?;
    tracing::info!("Graph written to {}", out_path.display());

    Ok(())
}
