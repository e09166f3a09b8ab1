use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use propload::io::{
    ensure_outdir, write_manifest_json, write_table_csv, Manifest, OUTPUT_SCHEMA_VERSION,
};
use propload::logging::init_logging;
use propload::{generate_datasets, GeneratorConfig, LowFidelityFormula, NoiseSettings};

#[derive(Debug, Parser)]
#[command(name = "propload-gen")]
#[command(about = "Generate synthetic low/high-fidelity propeller load datasets")]
struct Cli {
    /// TOML generator config; built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "output-propload")]
    outdir: PathBuf,

    /// Override the low-fidelity formula (`bracket` or `additive`).
    #[arg(long)]
    formula: Option<LowFidelityFormula>,

    /// Enable noise on the high-fidelity table above this axial advance ratio.
    #[arg(long)]
    noise_threshold: Option<f64>,
}

fn resolve_default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("configs").join("default.toml");
    if local.exists() {
        return Some(local);
    }

    let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("configs")
        .join("default.toml");
    bundled.exists().then_some(bundled)
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn formula_name(formula: LowFidelityFormula) -> &'static str {
    match formula {
        LowFidelityFormula::Bracket => "bracket",
        LowFidelityFormula::Additive => "additive",
    }
}

fn main() -> Result<()> {
    init_logging().context("failed to initialise logging")?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(resolve_default_config_path);
    let mut cfg = load_config(config_path.as_deref())?;

    if let Some(formula) = cli.formula {
        cfg.low_fidelity_formula = formula;
    }
    if let Some(threshold) = cli.noise_threshold {
        let mut noise = cfg.noise.unwrap_or_default();
        noise.axial_noise_adv_rat = threshold;
        cfg.noise = Some(noise);
    }
    cfg.validate().context("invalid generator configuration")?;

    info!(
        rows = cfg.grid.len(),
        formula = formula_name(cfg.low_fidelity_formula),
        noise = cfg.noise.is_some(),
        "generating datasets"
    );
    let datasets = generate_datasets(&cfg)?;

    ensure_outdir(&cli.outdir)
        .with_context(|| format!("failed to create output directory: {}", cli.outdir.display()))?;

    let files = cfg.output_files();
    for (name, table) in files.iter().zip([&datasets.low, &datasets.high]) {
        let path = cli.outdir.join(name);
        write_table_csv(&path, table)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let manifest = Manifest {
        schema_version: OUTPUT_SCHEMA_VERSION.to_string(),
        rows: datasets.low.len(),
        low_fidelity_formula: formula_name(cfg.low_fidelity_formula).to_string(),
        noise_seed: cfg.noise.as_ref().map(|n: &NoiseSettings| n.seed),
        files: files.to_vec(),
    };
    let manifest_path =
        write_manifest_json(&cli.outdir, &manifest).context("failed to write manifest")?;

    info!(outdir = %cli.outdir.display(), manifest = %manifest_path.display(), "wrote datasets");
    Ok(())
}
