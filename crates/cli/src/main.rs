//! nicheoverlap CLI - niche overlap between niche model predictions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nicheoverlap_algorithms::batch::{self, BatchConfig};
use nicheoverlap_algorithms::normalize::{normalize, normalize_and_write, write_normalized};
use nicheoverlap_algorithms::similarity::{compare_pair, GridPair};
use nicheoverlap_core::io::{read_ascii_grid, AsciiWriteOptions, RowLayout};
use nicheoverlap_core::raster::AsciiGrid;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "nicheoverlap")]
#[command(author, version, about = "Niche overlap (I, D) between niche model grids", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about an ASCII grid
    Info {
        /// Input grid file
        input: PathBuf,
    },
    /// Compute I and D between two grids
    Compare {
        /// Tuned model grid
        test: PathBuf,
        /// Baseline grid
        reference: PathBuf,
        /// Also write both normalized grids to normalized_grids/
        #[arg(long)]
        write_cache: bool,
        /// Write all nrows rows to the cache instead of nrows - 1
        #[arg(long)]
        full_rows: bool,
    },
    /// Normalize grids and write them to normalized_grids/
    Normalize {
        /// Input grid files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Write all nrows rows instead of nrows - 1
        #[arg(long)]
        full_rows: bool,
    },
    /// Compare every tuned run under ROOT against the baseline tree
    Batch {
        /// Directory with one subdirectory per tuned run
        root: PathBuf,
        /// JSON settings file; flags given here override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Baseline tree (default: "default" next to ROOT)
        #[arg(long)]
        baseline: Option<PathBuf>,
        /// Species directory to compare (repeatable)
        #[arg(long = "species")]
        species: Vec<String>,
        /// Entry name to ignore in species directories (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        /// Report file (default: <ROOT>_I_values.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Name of the baseline in report rows
        #[arg(long)]
        baseline_label: Option<String>,
        /// Write all nrows rows to the cache instead of nrows - 1
        #[arg(long)]
        full_rows: bool,
        /// Stop at the first failed pair
        #[arg(long)]
        fail_fast: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}

fn read_grid(path: &Path) -> Result<AsciiGrid> {
    let pb = spinner("Reading grid...");
    let grid = read_ascii_grid(path).context("Failed to read grid")?;
    pb.finish_and_clear();
    info!("Input: {} x {}, {} cells", grid.ncols(), grid.nrows(), grid.len());
    Ok(grid)
}

fn write_options(full_rows: bool) -> AsciiWriteOptions {
    AsciiWriteOptions {
        row_layout: if full_rows {
            RowLayout::Full
        } else {
            RowLayout::Legacy
        },
    }
}

fn done(name: &str, elapsed: std::time::Duration) {
    println!("{} done", name);
    println!("  Processing time: {:.2?}", elapsed);
}

#[allow(clippy::too_many_arguments)]
fn batch_config(
    root: PathBuf,
    config: Option<PathBuf>,
    baseline: Option<PathBuf>,
    species: Vec<String>,
    exclude: Vec<String>,
    output: Option<PathBuf>,
    baseline_label: Option<String>,
    full_rows: bool,
    fail_fast: bool,
) -> Result<BatchConfig> {
    let mut cfg = match config {
        Some(path) => BatchConfig::load(&path).context("Failed to load batch settings")?,
        None => BatchConfig::default(),
    };

    cfg.root_dir = root;
    if baseline.is_some() {
        cfg.baseline_dir = baseline;
    }
    if !species.is_empty() {
        cfg.species = species;
    }
    cfg.exclude_dir_names.extend(exclude);
    if output.is_some() {
        cfg.output = output;
    }
    if let Some(label) = baseline_label {
        cfg.baseline_label = label;
    }
    if full_rows {
        cfg.row_layout = RowLayout::Full;
    }
    cfg.fail_fast |= fail_fast;

    cfg.validate().context("Invalid batch settings")?;
    Ok(cfg)
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let grid = read_grid(&input)?;
            let bounds = grid.transform().bounds(grid.ncols(), grid.nrows());
            let stats = grid.statistics();

            println!("File: {}", input.display());
            println!(
                "Dimensions: {} x {} ({} cells read)",
                grid.ncols(),
                grid.nrows(),
                grid.len()
            );
            println!("Cell size: {}", grid.header().cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            println!("NoData: {}", grid.nodata());
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!("  Sum: {}", stats.sum);
            if !grid.is_empty() {
                println!(
                    "  Valid cells: {} ({:.1}%)",
                    stats.valid_count,
                    100.0 * stats.valid_count as f64 / grid.len() as f64
                );
            }
        }

        // ── Compare ──────────────────────────────────────────────────
        Commands::Compare {
            test,
            reference,
            write_cache,
            full_rows,
        } => {
            let start = Instant::now();
            let pb = spinner("Normalizing grids...");
            let set = normalize([&test, &reference]).context("Failed to normalize grids")?;
            if write_cache {
                write_normalized(&set, &write_options(full_rows))
                    .context("Failed to write normalized grids")?;
            }
            pb.finish_and_clear();

            let result = compare_pair(&set, &GridPair::new(test, reference))
                .context("Failed to compare grids")?;
            let elapsed = start.elapsed();

            println!("I: {}", result.i);
            println!("D: {}", result.d);
            println!("  Cells compared: {}", result.cells);
            done("Comparison", elapsed);
        }

        // ── Normalize ────────────────────────────────────────────────
        Commands::Normalize { inputs, full_rows } => {
            let start = Instant::now();
            let pb = spinner("Normalizing grids...");
            let (set, summary) = normalize_and_write(&inputs, &write_options(full_rows))
                .context("Failed to normalize grids")?;
            pb.finish_and_clear();

            for grid in set.iter() {
                println!("{} -> {}", grid.source().display(), grid.output().display());
            }
            println!(
                "{} written, {} already cached, {} skipped (not .asc)",
                summary.written,
                summary.skipped,
                inputs.len() - set.len()
            );
            done("Normalization", start.elapsed());
        }

        // ── Batch ────────────────────────────────────────────────────
        Commands::Batch {
            root,
            config,
            baseline,
            species,
            exclude,
            output,
            baseline_label,
            full_rows,
            fail_fast,
        } => {
            let cfg = batch_config(
                root,
                config,
                baseline,
                species,
                exclude,
                output,
                baseline_label,
                full_rows,
                fail_fast,
            )?;

            let start = Instant::now();
            let mut pb: Option<ProgressBar> = None;
            let result = batch::run(&cfg, |job, idx, total| {
                let bar = pb.get_or_insert_with(|| progress_bar(total));
                bar.set_position(idx as u64);
                bar.set_message(format!("{} / {}", job.species, job.run));
            });
            if let Some(bar) = pb {
                bar.finish_and_clear();
            }
            let summary = result.context("Batch comparison failed")?;

            println!("Report saved to: {}", summary.output.display());
            println!(
                "  Pairs: {} ({} written, {} failed)",
                summary.pairs, summary.written, summary.failed
            );
            println!(
                "  Normalized grids: {} written, {} already cached",
                summary.cache_written, summary.cache_skipped
            );
            done("Batch", start.elapsed());
        }
    }

    Ok(())
}
