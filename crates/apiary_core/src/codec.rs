//! Genome <-> persisted record conversion.
//!
//! The record is a flat list of `(slot, primary uid, secondary uid)` in slot
//! order. On items it is stored as a validated rkyv archive, so the same
//! genome always produces the same bytes.

use crate::catalog::AlleleCatalog;
use crate::error::{GeneticsError, Result};
use crate::genome::{ChromosomePair, Genome};
use apiary_data::{ChromosomeType, GenomeCarrier, GenomeRecord, LocusRecord, CHROMOSOME_COUNT};
use rkyv::de::deserializers::SharedDeserializeMap;
use rkyv::ser::serializers::AllocSerializer;
use rkyv::ser::Serializer;
use rkyv::Deserialize;

/// Encodes and decodes genomes against one catalog.
#[derive(Debug, Clone, Copy)]
pub struct GenomeCodec<'a> {
    catalog: &'a AlleleCatalog,
}

impl<'a> GenomeCodec<'a> {
    pub fn new(catalog: &'a AlleleCatalog) -> Self {
        Self { catalog }
    }

    /// Flat record ordered by slot index.
    #[must_use]
    pub fn encode(&self, genome: &Genome) -> GenomeRecord {
        GenomeRecord {
            loci: genome
                .pairs()
                .map(|(slot, pair)| LocusRecord {
                    slot,
                    primary: pair.primary.uid().to_string(),
                    secondary: pair.secondary.uid().to_string(),
                })
                .collect(),
        }
    }

    /// Rebuilds a genome, resolving every uid against the catalog.
    pub fn decode(&self, record: &GenomeRecord) -> Result<Genome> {
        let mut loci: [Option<&LocusRecord>; CHROMOSOME_COUNT] = [None; CHROMOSOME_COUNT];
        for locus in &record.loci {
            let entry = &mut loci[locus.slot.index()];
            if entry.is_some() {
                return Err(GeneticsError::corrupt(format!(
                    "slot {} appears twice",
                    locus.slot
                )));
            }
            *entry = Some(locus);
        }

        let pairs = ChromosomeType::ALL
            .iter()
            .map(|&slot| {
                let locus = loci[slot.index()]
                    .ok_or_else(|| GeneticsError::corrupt(format!("slot {slot} is missing")))?;
                let primary = self.resolve(slot, &locus.primary)?;
                let secondary = self.resolve(slot, &locus.secondary)?;
                Ok(ChromosomePair::new(primary, secondary))
            })
            .collect::<Result<Vec<_>>>()?;

        Genome::from_pairs(pairs).map_err(|e| GeneticsError::corrupt(e.to_string()))
    }

    /// Archived bytes of [`encode`](Self::encode).
    pub fn encode_bytes(&self, genome: &Genome) -> Result<Vec<u8>> {
        record_to_bytes(&self.encode(genome))
    }

    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Genome> {
        self.decode(&record_from_bytes(bytes)?)
    }

    /// `Ok(None)` when the item carries no genome record at all; an error
    /// when it carries one that cannot be decoded.
    pub fn decode_from_item<I: GenomeCarrier>(&self, item: &I) -> Result<Option<Genome>> {
        item.genome_record()
            .map(|bytes| self.decode_bytes(bytes))
            .transpose()
    }

    /// A copy of `item` with its genome record replaced.
    pub fn update_item<I: GenomeCarrier>(&self, item: &I, genome: &Genome) -> Result<I> {
        Ok(item.with_genome_record(self.encode_bytes(genome)?))
    }

    /// Decodes `item`, replaces one locus and writes the result back.
    /// `Ok(None)` when the item is not a bee.
    pub fn alter_item<I: GenomeCarrier>(
        &self,
        item: &I,
        slot: ChromosomeType,
        uid: &str,
        set_primary: bool,
        set_secondary: bool,
    ) -> Result<Option<I>> {
        let Some(genome) = self.decode_from_item(item)? else {
            return Ok(None);
        };
        let allele = self.catalog.require(slot, uid)?;
        let altered = genome.with_locus_set(slot, allele, set_primary, set_secondary)?;
        self.update_item(item, &altered).map(Some)
    }

    fn resolve(&self, slot: ChromosomeType, uid: &str) -> Result<std::sync::Arc<crate::Allele>> {
        self.catalog
            .lookup(slot, uid)
            .ok_or_else(|| GeneticsError::corrupt(format!("unknown {slot} allele {uid}")))
    }
}

/// Serializes a record into an rkyv archive.
pub fn record_to_bytes(record: &GenomeRecord) -> Result<Vec<u8>> {
    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(record)
        .map_err(|e| GeneticsError::corrupt(format!("record serialization failed: {e:?}")))?;
    Ok(serializer.into_serializer().into_inner().to_vec())
}

/// Validates and deserializes an rkyv archive into a record.
pub fn record_from_bytes(bytes: &[u8]) -> Result<GenomeRecord> {
    // item storage gives no alignment guarantee
    let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    let archived = rkyv::check_archived_root::<GenomeRecord>(&aligned)
        .map_err(|e| GeneticsError::corrupt(format!("record validation failed: {e:?}")))?;
    let mut deserializer = SharedDeserializeMap::default();
    archived
        .deserialize(&mut deserializer)
        .map_err(|e| GeneticsError::corrupt(format!("record deserialization failed: {e:?}")))
}
