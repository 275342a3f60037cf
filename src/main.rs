use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fronthaul_capacity::api::report_dto::{FinancialSummaryDto, LinkStatsDto, TrafficPointDto, optimization_report, simulation_report};
use fronthaul_capacity::domain::aligner::align_cells;
use fronthaul_capacity::domain::config::AnalysisConfig;
use fronthaul_capacity::domain::network_analysis::NetworkAnalysis;
use fronthaul_capacity::loader::aligned_table::{load_aligned_dir, write_aligned_series};
use fronthaul_capacity::loader::parser::write_json_file;
use fronthaul_capacity::loader::topology_table::{
    CAPACITY_REPORT_FILE, CORRELATION_MATRIX_FILE, capacity_report_rows, read_topology_table, write_capacity_report, write_correlation_matrix,
};
use fronthaul_capacity::loader::trace_reader::{read_cell_traces, scan_log_dir};
use fronthaul_capacity::{load_config, logger};

#[derive(Debug, Parser)]
#[command(name = "fronthaul-capacity", version, about = "Fronthaul link capacity estimation from per-cell traces")]
struct Cli {
    /// JSON analysis configuration; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Clean and time-align the raw traces of every cell.
    Align {
        log_dir: PathBuf,
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,
    },
    /// Infer the link topology and write the capacity report.
    Infer {
        #[arg(long, default_value = "output")]
        data_dir: PathBuf,
    },
    /// Run every link at one candidate capacity.
    Simulate {
        #[arg(long, default_value = "output")]
        data_dir: PathBuf,
        #[arg(long)]
        capacity: f64,
        #[arg(long)]
        buffer_time: Option<f64>,
    },
    /// Find the minimal capacity per link.
    Optimize {
        #[arg(long, default_value = "output")]
        data_dir: PathBuf,
        #[arg(long)]
        buffer_time: Option<f64>,
        #[arg(long)]
        sla: Option<f64>,
    },
    /// Convert saved capacity into money.
    Financials {
        #[arg(long, default_value = "output")]
        data_dir: PathBuf,
        #[arg(long)]
        buffer_time: Option<f64>,
        #[arg(long)]
        sla: Option<f64>,
        #[arg(long)]
        cost: Option<f64>,
    },
    /// Precompute the JSON summaries served to the dashboard.
    Report {
        #[arg(long, default_value = "output")]
        data_dir: PathBuf,
        #[arg(long)]
        buffer_time: Option<f64>,
    },
}

fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::Align { log_dir, out_dir } => run_align(&log_dir, &out_dir, &config),
        Command::Infer { data_dir } => run_infer(&data_dir, config),
        Command::Simulate { data_dir, capacity, buffer_time } => {
            let buffer_time = buffer_time.unwrap_or(config.simulation.buffer_time_sec);
            let analysis = open_analysis(&data_dir, config)?;
            print_json(&simulation_report(&analysis.simulate_network(capacity, buffer_time)))
        }
        Command::Optimize { data_dir, buffer_time, sla } => {
            let buffer_time = buffer_time.unwrap_or(config.simulation.buffer_time_sec);
            let sla = sla.unwrap_or(config.optimizer.sla_drop_rate);
            let analysis = open_analysis(&data_dir, config)?;
            print_json(&optimization_report(&analysis.find_optimal_capacity(buffer_time, sla)))
        }
        Command::Financials { data_dir, buffer_time, sla, cost } => {
            let buffer_time = buffer_time.unwrap_or(config.simulation.buffer_time_sec);
            let sla = sla.unwrap_or(config.optimizer.sla_drop_rate);
            let cost = cost.unwrap_or(config.financial.cost_per_gbps);
            let analysis = open_analysis(&data_dir, config)?;
            print_json(&FinancialSummaryDto::from(&analysis.calculate_financials(buffer_time, sla, cost)))
        }
        Command::Report { data_dir, buffer_time } => {
            let buffer_time = buffer_time.unwrap_or(config.simulation.buffer_time_sec);
            run_report(&data_dir, config, buffer_time)
        }
    }
}

fn run_align(log_dir: &Path, out_dir: &Path, config: &AnalysisConfig) -> Result<()> {
    let cells = scan_log_dir(log_dir).with_context(|| format!("cannot scan '{}'", log_dir.display()))?;
    fs::create_dir_all(out_dir).with_context(|| format!("cannot create '{}'", out_dir.display()))?;

    let batch = align_cells(cells.into_iter().map(|(cell, files)| (cell, read_cell_traces(&files))), &config.aligner);

    for outcome in &batch.aligned {
        let path = write_aligned_series(out_dir, &outcome.series)?;
        log::info!("Cell {}: {} spikes removed, written to '{}'.", outcome.series.cell(), outcome.spikes_removed, path.display());
    }

    log::info!("Alignment complete. Processed {} cells, skipped {}.", batch.aligned.len(), batch.skipped.len());
    Ok(())
}

fn run_infer(data_dir: &Path, config: AnalysisConfig) -> Result<()> {
    let data = load_aligned_dir(data_dir).with_context(|| format!("cannot read aligned data in '{}'", data_dir.display()))?;
    anyhow::ensure!(!data.series.is_empty(), "no aligned data found in '{}'; run `align` first", data_dir.display());

    let buffer_time = config.simulation.buffer_time_sec;
    let sla = config.optimizer.sla_drop_rate;
    let analysis = NetworkAnalysis::new(&data.series, config)?;

    if let Some(matrix) = analysis.correlation() {
        write_correlation_matrix(data_dir.join(CORRELATION_MATRIX_FILE), matrix)?;
    }

    let results = analysis.find_optimal_capacity(buffer_time, sla);
    let rows = capacity_report_rows(analysis.topology(), &results);
    write_capacity_report(data_dir.join(CAPACITY_REPORT_FILE), &rows)?;

    log::info!("Capacity estimates saved to '{}'.", data_dir.join(CAPACITY_REPORT_FILE).display());
    print_json(&analysis.topology_graph())
}

fn run_report(data_dir: &Path, config: AnalysisConfig, buffer_time: f64) -> Result<()> {
    let sla = config.optimizer.sla_drop_rate;
    let analysis = open_analysis(data_dir, config)?;

    let mut traffic_summary: BTreeMap<String, Vec<TrafficPointDto>> = BTreeMap::new();
    let mut link_stats: BTreeMap<String, LinkStatsDto> = BTreeMap::new();
    for link in analysis.topology().link_ids() {
        let sample = analysis.traffic_sample(link)?;
        traffic_summary.insert(link.to_string(), sample.iter().map(TrafficPointDto::from).collect());

        if let Some(stats) = analysis.link_stats(link)? {
            link_stats.insert(link.to_string(), LinkStatsDto::new(link, &stats));
        }
    }
    write_json_file(data_dir.join("traffic_summary.json"), &traffic_summary)?;
    write_json_file(data_dir.join("link_stats.json"), &link_stats)?;

    let cache_key = format!("{}", (buffer_time * 1e6).round() as u64);
    let mut optimization_cache = BTreeMap::new();
    optimization_cache.insert(cache_key, optimization_report(&analysis.find_optimal_capacity(buffer_time, sla)));
    write_json_file(data_dir.join("optimization_cache.json"), &optimization_cache)?;

    log::info!("JSON summaries saved to '{}'.", data_dir.display());
    Ok(())
}

/// Loads the aligned data and reuses a stored topology when one exists.
fn open_analysis(data_dir: &Path, config: AnalysisConfig) -> Result<NetworkAnalysis> {
    let data = load_aligned_dir(data_dir).with_context(|| format!("cannot read aligned data in '{}'", data_dir.display()))?;

    let report = data_dir.join(CAPACITY_REPORT_FILE);
    let analysis = if report.exists() {
        let topology = read_topology_table(&report)?;
        NetworkAnalysis::with_topology(&data.series, topology, config)?
    } else {
        log::warn!("'{}' not found; inferring topology from scratch.", report.display());
        NetworkAnalysis::new(&data.series, config)?
    };

    Ok(analysis)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
