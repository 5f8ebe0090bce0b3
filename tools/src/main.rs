//! galaxy-gen: headless galaxy generator.
//!
//! Usage:
//!   galaxy-gen --seed andromeda
//!   galaxy-gen --seed andromeda --config galaxy.json --output ./out --verbose

use anyhow::{Context, Result};
use clap::Parser;
use oikumene_core::{ConfigOverrides, GenError, GeneratorConfig, Pipeline, RunReport};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a deterministic star cluster from a seed", long_about = None)]
struct Args {
    /// Seed string; the same seed and config always produce the same galaxy
    #[arg(long)]
    seed: String,

    /// Output directory [default: ./galaxy-output/]
    #[arg(short, long)]
    output: Option<String>,

    /// JSON config file merged over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of spiral arms
    #[arg(long)]
    arms: Option<u32>,

    /// Target number of Oikumene systems
    #[arg(long)]
    oikumene_count: Option<usize>,

    /// Longest straight-line distance a trade route may span
    #[arg(long)]
    max_route_range: Option<f64>,

    /// Hard cap on the number of generated stars
    #[arg(long)]
    max_stars: Option<usize>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output: self.output.clone(),
            arms: self.arms,
            oikumene_count: self.oikumene_count,
            max_route_range: self.max_route_range,
            max_stars: self.max_stars,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match generate(&args).await {
        Ok(report) => {
            if let Err(e) = print_summary(&report) {
                log::warn!("Could not print run summary: {e:#}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("galaxy-gen: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn generate(args: &Args) -> Result<RunReport, GenError> {
    let config = GeneratorConfig::resolve(args.config.as_deref(), &args.overrides())?;
    log::debug!("Resolved config: {:?}", config);
    Pipeline::new(&args.seed, config)?.run().await
}

fn print_summary(report: &RunReport) -> Result<()> {
    let galaxy = &report.galaxy;
    let stats = &galaxy.stats;
    let mut out = io::stdout().lock();

    writeln!(out, "=== RUN SUMMARY ===").context("writing summary")?;
    writeln!(out, "  seed:             {} ({:#010x})", galaxy.seed, galaxy.numeric_seed)?;
    writeln!(out, "  systems:          {}", stats.total_systems)?;
    writeln!(out, "  oikumene:         {}", stats.oikumene_systems)?;
    writeln!(out, "  beyond:           {}", stats.beyond_systems)?;
    writeln!(out, "    uninhabited:    {}", stats.beyond_uninhabited)?;
    writeln!(out, "    lost colonies:  {}", stats.beyond_lost_colonies)?;
    writeln!(out, "    enclaves:       {}", stats.beyond_hidden_enclaves)?;
    writeln!(out, "  routes:           {}", stats.oikumene_routes)?;
    writeln!(out, "  avg route cost:   {:.2}", stats.average_route_cost)?;
    writeln!(
        out,
        "  cost map:         {}x{}",
        galaxy.cost_map.width(),
        galaxy.cost_map.height()
    )?;

    writeln!(out)?;
    writeln!(out, "=== STAGE TIMINGS ===")?;
    for t in &galaxy.stage_timings {
        writeln!(out, "  {}. {:<28} {:>9.1} ms", t.number, t.name, t.elapsed_ms)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Wrote {} files to {}",
        report.files_written,
        report.output_dir.display()
    )?;
    Ok(())
}
