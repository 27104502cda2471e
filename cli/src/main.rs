use anyhow::Context;
use clap::{Parser, Subcommand};
use eda_common::db::core::LayoutDB;
use eda_common::geom::rect::Rect;
use eda_common::util::config::Config;
use eda_common::util::profiler::ScopedTimer;
use eda_common::util::{generator, logger};
use eda_thermal::ThermalEngine;
use eda_thermal::grid::ThermalGrid;
use eda_thermal::physics::correlation::pearson_correlation;
use eda_thermal::physics::entropy::spatial_entropy;
use eda_thermal::physics::masks::ThermalMasks;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Thermal analysis and hotspot clustering of generated layouts
    Evaluate {
        #[arg(short = 'n', long, default_value_t = 10)]
        evaluations: usize,
        /// Overrides `layout.seed` from the config
        #[arg(long)]
        seed: Option<u64>,
        /// Writes the last thermal map as a whitespace-separated matrix
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// Prints the per-layer 1D masks
    Masks,
    /// Generates one layout and prints its summary
    Generate {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = load_config(&args.config)?;
    config.validate().context("Invalid configuration")?;

    let command = args.command.unwrap_or(Commands::Evaluate {
        evaluations: 10,
        seed: None,
        dump: None,
    });

    match command {
        Commands::Evaluate {
            evaluations,
            seed,
            dump,
        } => run_evaluations(&config, evaluations, seed, dump.as_deref())?,
        Commands::Masks => {
            let masks = ThermalMasks::build(config.layout.layers, &config.thermal)
                .context("Failed to build thermal masks")?;
            for (layer, mask) in masks.iter().enumerate() {
                let values: Vec<String> = mask.iter().map(|v| format!("{:.6}", v)).collect();
                log::info!("Layer {}: [{}]", layer, values.join(", "));
            }
        }
        Commands::Generate { seed } => {
            let layout = generator::generate_random_layout(
                &config.layout,
                seed.unwrap_or(config.layout.seed),
            );
            log_layout_summary(&layout);
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            path
        );
        return Ok(Config::default());
    }

    log::info!("Loading configuration from {:?}", path);
    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config TOML {:?}", path))
}

fn run_evaluations(
    config: &Config,
    evaluations: usize,
    seed: Option<u64>,
    dump: Option<&Path>,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or(config.layout.seed);
    let die_area = Rect::from_coords(0.0, 0.0, config.layout.die_width, config.layout.die_height);

    // Masks and buffers are built once and shared by every candidate on this die
    let mut engine = ThermalEngine::new(
        config.layout.layers,
        die_area,
        config.thermal.clone(),
        config.hotspot.clone(),
    )
    .context("Failed to set up the thermal engine")?;

    let timer = ScopedTimer::new("Evaluation loop");
    let mut best: Option<(usize, f64)> = None;
    for i in 0..evaluations {
        let layout =
            generator::generate_random_layout(&config.layout, seed.wrapping_add(i as u64));

        let eval = engine.evaluate(&layout);
        let stats = eval.stats;
        let top = eval
            .hotspots
            .iter()
            .next()
            .map(|r| (r.peak_temp, r.len(), r.score));
        log::info!(
            "#{:<3} cost {:>12.4}  max {:.4} K  avg {:.4} K  hotspots {:>3}  clusters {:>3}",
            i,
            stats.cost_temp,
            stats.max_temp,
            stats.avg_temp,
            eval.hotspots.len(),
            eval.clusters.num_hotspot_clusters(),
        );

        if let Some((peak, bins, score)) = top {
            log::debug!(
                "#{:<3} top hotspot: peak {:.4} K, {} bins, score {:.3}",
                i,
                peak,
                bins,
                score
            );
        }
        // Cross analysis of the unpadded power maps
        if log::log_enabled!(log::Level::Debug) {
            let analyzer = engine.analyzer();
            let correlation =
                pearson_correlation(&analyzer.power_maps_orig[0], &analyzer.thermal_map);
            let entropy = spatial_entropy(&analyzer.power_maps_orig);
            log::debug!(
                "#{:<3} power/thermal correlation (layer 0) {:.3}, spatial entropy {:.4}",
                i,
                correlation,
                entropy
            );
        }

        if best.is_none_or(|(_, cost)| stats.cost_temp < cost) {
            best = Some((i, stats.cost_temp));
        }
    }

    if let Some((i, cost)) = best {
        log::info!("Best candidate: #{} with cost {:.4}", i, cost);
        log::info!(
            "{} evaluations in {:?} ({:?} each)",
            evaluations,
            timer.elapsed(),
            timer.elapsed() / evaluations as u32
        );
    }

    if let Some(path) = dump {
        write_thermal_map(&engine.analyzer().thermal_map, path)?;
        log::info!("Thermal map written to {:?}", path);
    }
    Ok(())
}

fn write_thermal_map(grid: &ThermalGrid, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create thermal map file {:?}", path))?;
    let mut out = std::io::BufWriter::new(file);
    for y in 0..grid.dim() {
        let row: Vec<String> = (0..grid.dim())
            .map(|x| format!("{:.6}", grid.temp(x, y)))
            .collect();
        writeln!(out, "{}", row.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

fn log_layout_summary(layout: &LayoutDB) {
    let die = layout.die_outline();
    log::info!("Die {:.1} x {:.1}, {} layers", die.x, die.y, layout.layers);
    log::info!(
        "{} blocks, {} nets ({} segments), {} TSV islands ({} dummy)",
        layout.num_blocks(),
        layout.num_nets(),
        layout.segments.len(),
        layout.tsv_islands.len(),
        layout.tsv_islands.iter().filter(|t| t.is_dummy).count()
    );
    for layer in 0..layout.layers {
        log::info!(
            "Layer {}: block power {:.4}",
            layer,
            layout.layer_block_power(layer)
        );
    }
    let wire_power: f64 = layout.nets.iter().map(|n| n.wire_power).sum();
    log::info!("Total wire power {:.4}", wire_power);
}
