use apiary_io::load_registry;
use clap::Parser;
use serde::Serialize;

/// Checks a species data file: every species registers, and every species
/// can be bred from the root species.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "data/species.toml")]
    species: String,

    /// Write the mutation graph in Graphviz format.
    #[arg(short, long)]
    dot: Option<String>,

    /// Fail when some species is unreachable.
    #[arg(long)]
    strict: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct Report {
    species: usize,
    mutations: usize,
    roots: Vec<String>,
    unreachable: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let genetics = load_registry(&args.species)?.build()?;

    let report = Report {
        species: genetics.catalog().all_species().len(),
        mutations: genetics.mutations().len(),
        roots: genetics.root_species(),
        unreachable: genetics.unreachable_species(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Verifying {}", args.species);
        println!("Species:   {}", report.species);
        println!("Mutations: {}", report.mutations);
        println!("Roots:     {}", report.roots.join(", "));
        if report.unreachable.is_empty() {
            println!("\n✅ Every species is reachable.");
        } else {
            println!("\n❌ Unreachable species:");
            for uid in &report.unreachable {
                println!("  - {uid}");
            }
        }
    }

    if let Some(path) = &args.dot {
        std::fs::write(path, genetics.mutations().species_graph().to_dot())?;
        println!("Mutation graph written to {path}");
    }

    anyhow::ensure!(
        !args.strict || report.unreachable.is_empty(),
        "{} unreachable species",
        report.unreachable.len()
    );
    Ok(())
}
