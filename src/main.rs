//! Batch generation entry point.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;

use scene_ngin::batch::{generate_batch, BatchSummary};
use scene_ngin::config::GenConfig;
use scene_ngin::oracle::{CommandOracle, FixedOracle};
use scene_ngin::resources::CatalogProvider;

#[derive(Debug, Parser)]
#[command(name = "scene-ngin", about = "Generate labeled symbolic 3D scenes")]
struct Cli {
    /// Path to the YAML config file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
    /// Override the number of scenes to generate.
    #[arg(long)]
    scenes: Option<usize>,
    /// Override the base RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the output directory.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = GenConfig::from_yaml_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(scenes) = cli.scenes {
        config.num_scenes = scenes;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }

    let provider = CatalogProvider;
    let summary: BatchSummary = match (&config.oracle_command, &config.structures_file) {
        (Some(command), _) => {
            let command = command.clone();
            let timeout = Duration::from_secs(config.oracle_timeout_secs);
            generate_batch(&config, &provider, |_| {
                CommandOracle::new(command.clone(), timeout)
            })?
        }
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("loading structures from {}", path.display()))?;
            let lines: Vec<String> = raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect();
            if lines.is_empty() {
                bail!("structures file {} contains no structures", path.display());
            }
            generate_batch(&config, &provider, |index| {
                // Each scene gets one canned structure, round-robin.
                FixedOracle::new(vec![lines[index % lines.len()].clone()])
            })?
        }
        (None, None) => bail!("config needs either oracle_command or structures_file"),
    };

    println!(
        "{}/{} scenes generated ({} oracle timeouts), output in {}",
        summary.succeeded,
        summary.total,
        summary.oracle_timeouts,
        config.output_dir.display()
    );
    if summary.total > 0 && summary.succeeded == 0 {
        bail!("every scene failed");
    }
    Ok(())
}
