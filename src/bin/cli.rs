// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Surfgrow CLI

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use surfgrow::{analyze, snapshot_channel, GrowthConfig, MeshStats, SeedShape, Simulation, Snapshot};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "surfgrow")]
#[command(about = "Surfgrow - curvature-driven growth of closed surface meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation and consume snapshots
    Run {
        /// Configuration file (defaults to surfgrow.toml when present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Number of snapshots to consume before stopping
        #[arg(short, long, default_value = "100")]
        frames: u64,

        /// Write snapshots as JSON lines
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Fixed seed for the growth noise
        #[arg(long)]
        rng_seed: Option<u64>,

        /// Minimum time per growth step in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Print statistics for a seed shape
    Seed {
        #[arg(short, long, default_value = "icosahedron")]
        shape: SeedShape,

        #[arg(short, long, default_value = "1.0")]
        radius: f64,
    },

    /// Write the default configuration as TOML
    Config {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            frames,
            out,
            rng_seed,
            interval_ms,
        } => {
            run_command(config.as_deref(), frames, out.as_deref(), rng_seed, interval_ms)?;
        }
        Commands::Seed { shape, radius } => {
            seed_command(shape, radius)?;
        }
        Commands::Config { output } => {
            config_command(output.as_deref())?;
        }
        Commands::Version => {
            println!("Surfgrow v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GrowthConfig> {
    match path {
        Some(path) => {
            let mut config = GrowthConfig::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            Ok(config)
        }
        None => GrowthConfig::load(),
    }
}

fn run_command(
    config_path: Option<&Path>,
    frames: u64,
    out: Option<&Path>,
    rng_seed: Option<u64>,
    interval_ms: Option<u64>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if rng_seed.is_some() {
        config.rng_seed = rng_seed;
    }
    if let Some(ms) = interval_ms {
        config.interval_ms = ms;
    }

    let mut sim = Simulation::new(config.clone()).context("Failed to start simulation")?;
    let (tx, rx) = snapshot_channel(config.snapshot_backlog);

    let start = Instant::now();
    let worker = thread::spawn(move || {
        let mut tx = tx;
        sim.run(&mut tx)
    });

    let mut writer = match out {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        )),
        None => None,
    };

    let pb = ProgressBar::new(frames);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut last: Option<Snapshot> = None;
    for _ in 0..frames {
        // Err means the simulation thread stopped on its own
        let Ok(snapshot) = rx.recv() else { break };
        if let Some(w) = writer.as_mut() {
            serde_json::to_writer(&mut *w, &snapshot)?;
            w.write_all(b"\n")?;
        }
        pb.set_message(format!("step {} / {} vertices", snapshot.step, snapshot.vertex_count()));
        pb.inc(1);
        last = Some(snapshot);
    }
    pb.finish_and_clear();

    drop(rx);
    let summary = worker
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))?
        .context("Simulation failed")?;

    if let Some(mut w) = writer {
        w.flush()?;
    }

    println!("\n{}", "═".repeat(60).bright_black());
    println!("{}", "Growth Summary".bold());
    println!("{}", "═".repeat(60).bright_black());
    println!("  {} {}", "Steps:".bright_black(), summary.steps.to_string().cyan());
    println!("  {} {}", "Delivered:".bright_black(), summary.delivered.to_string().green());
    println!(
        "  {} {}",
        "Dropped:".bright_black(),
        if summary.dropped > 0 {
            summary.dropped.to_string().yellow()
        } else {
            summary.dropped.to_string().green()
        }
    );
    println!("  {} {:.2?}", "Elapsed:".bright_black(), start.elapsed());

    if let Some(snapshot) = &last {
        println!(
            "  {} {:.4}",
            "Bounding radius:".bright_black(),
            snapshot.bounding_radius
        );
        print_stats(&analyze(&snapshot.to_mesh()));
    }
    if let Some(path) = out {
        println!("  {} {}", "Snapshots:".bright_black(), path.display().to_string().cyan());
    }
    println!("{}", "═".repeat(60).bright_black());

    Ok(())
}

fn seed_command(shape: SeedShape, radius: f64) -> Result<()> {
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(anyhow!("radius must be positive, got {}", radius));
    }
    let mesh = shape.to_mesh(radius);
    println!("{} {} (radius {})", "Seed:".bold(), shape.to_string().cyan(), radius);
    print_stats(&analyze(&mesh));
    Ok(())
}

fn config_command(output: Option<&Path>) -> Result<()> {
    let config = GrowthConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            println!("{} {}", "✓".green(), format!("Wrote {}", path.display()).green());
        }
        None => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}

fn print_stats(stats: &MeshStats) {
    println!("  {} {}", "Vertices:".bright_black(), stats.vertex_count.to_string().cyan());
    println!("  {} {}", "Cells:".bright_black(), stats.cell_count.to_string().cyan());
    println!("  {} {}", "Edges:".bright_black(), stats.edge_count.to_string().cyan());
    println!(
        "  {} {}",
        "Euler characteristic:".bright_black(),
        stats.euler_characteristic
    );
    println!("  {} {:.4}", "Surface area:".bright_black(), stats.surface_area);
    println!(
        "  {} {:.4} / {:.4} / {:.4}",
        "Edge length (min/mean/max):".bright_black(),
        stats.min_edge_length,
        stats.mean_edge_length,
        stats.max_edge_length
    );
    println!(
        "  {} {}",
        "Closed manifold:".bright_black(),
        if stats.is_closed_manifold {
            "yes".green()
        } else {
            "no".red()
        }
    );
}
