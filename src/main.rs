use anyhow::Result;
use apiary_core::metrics::init_logging;
use apiary_core::EngineConfig;
use apiary_lib::{Apiary, Session};
use clap::Parser;
use std::path::Path;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "apiary.toml")]
    config: String,

    /// Species data file; the built-in base species when absent
    #[arg(short, long)]
    species: Option<String>,

    /// Princess species uid
    #[arg(long, default_value = "species_forest")]
    princess: String,

    /// Drone species uid
    #[arg(long, default_value = "species_meadows")]
    drone: String,

    #[arg(short, long, default_value_t = 100)]
    generations: u32,

    /// Overrides the configured seed and forces deterministic mode
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "apiarist")]
    player: String,

    /// Print the session summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = EngineConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.rng.seed = Some(seed);
        config.rng.deterministic = true;
    }
    init_logging(&config.logging.level);

    let apiary = match &args.species {
        Some(path) => Apiary::from_species_file(config, Path::new(path))?,
        None => Apiary::standard(config)?,
    };
    let players = apiary.load_ledger()?;
    tracing::info!(players, "Discovery ledger loaded");

    let player = Uuid::new_v5(&Uuid::NAMESPACE_OID, args.player.as_bytes());
    let mut rng = apiary.config.rng();
    let summary = Session::new(&apiary, player, &args.player).run(
        &args.princess,
        &args.drone,
        args.generations,
        &mut rng,
    )?;
    apiary.save_ledger()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let total = apiary.genetics().catalog().all_species().len();
    let progress = apiary.ledger().progress(player, total);
    println!("Bred {} generations", summary.generations);
    println!("Mutations:     {}", summary.mutations);
    println!("Product units: {}", summary.product_units);
    println!("Total ticks:   {}", summary.ticks);
    println!("Final species: {}", summary.final_species);
    println!(
        "Discovered {}/{} species ({:.0}%)",
        progress.discovered,
        progress.total,
        progress.percent()
    );
    for (species, count) in &summary.species {
        println!("  {species:<24} {count}");
    }
    Ok(())
}
