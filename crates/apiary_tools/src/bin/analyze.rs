use apiary_core::Genome;
use apiary_data::GenomeRecord;
use apiary_io::{
    export_genome, from_hex_dna, load_record, load_registry, record_fingerprint, save_record,
};
use clap::Parser;

/// Decodes a genome from hex DNA or an rkyv record file and prints every
/// chromosome pair.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "data/species.toml")]
    species: String,

    /// Hex DNA to decode.
    #[arg(long, conflicts_with_all = ["record", "template"])]
    dna: Option<String>,

    /// rkyv record file to decode.
    #[arg(short, long, conflicts_with = "template")]
    record: Option<String>,

    /// Analyze the pure-bred genome of this species.
    #[arg(short, long)]
    template: Option<String>,

    /// Save the decoded genome as an rkyv record file.
    #[arg(short, long)]
    output: Option<String>,
}

fn describe(genome: &Genome) -> Vec<String> {
    genome
        .pairs()
        .map(|(slot, pair)| {
            let marker = if pair.is_homozygous() { "" } else { " *" };
            format!(
                "{:<13} {:<22} {:<22} -> {}{}",
                slot.to_string(),
                pair.primary.uid(),
                pair.secondary.uid(),
                pair.expressed().display_name(),
                marker
            )
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let genetics = load_registry(&args.species)?.build()?;
    let codec = genetics.codec();

    let record: GenomeRecord = match (&args.dna, &args.record, &args.template) {
        (Some(dna), _, _) => from_hex_dna(dna)?,
        (_, Some(path), _) => load_record(path)?,
        (_, _, Some(species)) => codec.encode(&genetics.template_genome(species)?),
        _ => anyhow::bail!("one of --dna, --record or --template is required"),
    };
    let genome = codec.decode(&record)?;

    println!("Species:     {}", genome.species().display_name());
    println!("Fingerprint: {}", record_fingerprint(&record)?);
    println!();
    for line in describe(&genome) {
        println!("{line}");
    }
    println!("\nDNA: {}", export_genome(&codec, &genome)?);

    if let Some(path) = &args.output {
        save_record(&codec.encode(&genome), path)?;
        println!("Record written to {path}");
    }
    Ok(())
}
