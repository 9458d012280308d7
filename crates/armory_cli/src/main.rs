use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use armory_core::{ArmoryConfig, EncounterReport, Ledger, WeaponType};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Run armory encounters and shop transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a seeded encounter and emit a JSON report.
    Simulate(SimulateArgs),
    /// Print the configured price list.
    Prices(ConfigArgs),
    /// Try a single purchase against a fresh wallet.
    Buy(BuyArgs),
    /// Summarize an existing report.
    Report(ReportArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// TOML config; the built-in armory is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    config: ConfigArgs,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_turns: Option<u32>,
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct BuyArgs {
    #[command(flatten)]
    config: ConfigArgs,
    #[arg(long)]
    kind: WeaponType,
    #[arg(long)]
    money: i64,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate(args) => handle_simulate(args),
        Commands::Prices(args) => handle_prices(args),
        Commands::Buy(args) => handle_buy(args),
        Commands::Report(args) => handle_report(args),
    }
}

fn load_config(args: &ConfigArgs) -> Result<ArmoryConfig> {
    match &args.config {
        Some(path) => ArmoryConfig::from_path(path),
        None => Ok(ArmoryConfig::default()),
    }
}

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let mut params = config.encounter_params();
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(max_turns) = args.max_turns {
        params.max_turns = max_turns;
    }

    let mut encounter = config.encounter(params)?;
    let outcome = encounter.run()?;
    tracing::info!(?outcome, seed = params.seed, "simulation complete");

    let run_id = args
        .id
        .unwrap_or_else(|| format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S")));
    let report = encounter.report(run_id);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");

    if let Some(path) = args.out.as_ref() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &json)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn handle_prices(args: ConfigArgs) -> Result<()> {
    let config = load_config(&args)?;
    let prices = config.price_list()?;
    for (kind, price) in prices.iter() {
        println!("{kind:<8} {price:>6}");
    }
    Ok(())
}

fn handle_buy(args: BuyArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let mut shop = config.shop()?;
    let mut wallet = Ledger::wallet(args.money)?;
    if !shop.can_buy(args.kind, &wallet)? {
        println!(
            "Cannot afford {} ({} > {})",
            args.kind,
            shop.price(args.kind)?,
            wallet.value()
        );
        return Ok(());
    }
    let weapon = shop
        .buy(args.kind, &mut wallet)
        .with_context(|| format!("purchase of {} failed", args.kind))?;
    println!(
        "Bought {} #{} (damage {}), {} left",
        weapon.kind(),
        weapon.serial(),
        weapon.damage(),
        wallet.value()
    );
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let report = read_report(&args.input)?;
    let summary = &report.summary;
    println!(
        "Report {} (seed {}) -> {:?} after {} turns: {} kills, {} money, {} health",
        report.id,
        report.seed,
        summary.outcome,
        summary.turns,
        summary.kills,
        summary.money,
        summary.health
    );
    Ok(())
}

fn read_report(path: &Path) -> Result<EncounterReport> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    Ok(serde_json::from_str(&data)?)
}
