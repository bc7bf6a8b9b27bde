mod common;

use apiary_data::ChromosomeType;
use apiary_io::{load_species_file, SpeciesFile};
use common::{species_file, GeneticsBuilder};

#[test]
fn test_bundled_species_file_is_consistent() {
    let file = load_species_file(species_file()).unwrap();
    let genetics = GeneticsBuilder::bundled().build();

    assert_eq!(genetics.catalog().all_species().len(), file.species.len());
    let declared: usize = file.species.iter().map(|s| s.mutations.len()).sum();
    assert_eq!(genetics.mutations().len(), declared);
    assert!(genetics.unreachable_species().is_empty());

    let roots = genetics.root_species();
    assert!(roots.contains(&"species_forest".to_string()));
    assert!(!roots.contains(&"species_common".to_string()));
}

#[test]
fn test_every_species_has_items() {
    let genetics = GeneticsBuilder::bundled().build();
    let codec = genetics.codec();
    for species in genetics.catalog().all_species() {
        let items = genetics.species_items(species.uid()).unwrap();
        let genome = codec.decode_from_item(&items.princess).unwrap().unwrap();
        assert_eq!(genome.species().uid(), species.uid());
        assert!(genome.is_homozygous());
        assert!(items.drone.display_name.ends_with("Drone"));
    }
}

#[test]
fn test_template_overrides_apply() {
    let genetics = GeneticsBuilder::bundled().build();
    let industrious = genetics.template_genome("species_industrious").unwrap();
    assert_eq!(
        industrious.expressed(ChromosomeType::Productivity).uid(),
        "productivity_very_high"
    );
    assert_eq!(
        industrious.expressed(ChromosomeType::Plant).uid(),
        "plant_none"
    );
    let secret = genetics.species("species_secret").unwrap();
    assert!(secret.species().unwrap().secret);
}

#[test]
fn test_mutation_with_unknown_parent_is_skipped() {
    let file = SpeciesFile::from_toml(
        r#"
        [[species]]
        uid = "species_forest"

        [[species]]
        uid = "species_orphan"

        [[species.mutations]]
        parents = ["species_forest", "species_missing"]
        chance = 0.2
        "#,
    )
    .unwrap();
    let mut registry = apiary_core::RegistryBuilder::new();
    apiary_core::setup::register_standard_alleles(&mut registry).unwrap();
    file.apply(&mut registry).unwrap();

    let genetics = registry.build().unwrap();
    assert!(genetics.mutations().is_empty());
    assert_eq!(genetics.unreachable_species(), Vec::<String>::new());
    assert_eq!(genetics.root_species().len(), 2);
}
