//! On-disk formats: rkyv genome record files and the JSON discovery ledger.
//!
//! Every write goes to a sibling `.tmp` file first and is renamed into place,
//! so a crash never leaves a half-written file behind.

use crate::error::{IoError, Result};
use apiary_core::DiscoveryLedger;
use apiary_data::{GenomeRecord, LedgerSnapshot};
use rkyv::de::deserializers::SharedDeserializeMap;
use rkyv::ser::serializers::AllocSerializer;
use rkyv::ser::Serializer;
use rkyv::{AlignedVec, Archive, Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn write_atomic(path: &Path, write: impl FnOnce(&mut BufWriter<File>) -> Result<()>) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn save_rkyv<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize<AllocSerializer<4096>>,
    P: AsRef<Path>,
{
    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(data)
        .map_err(|e| IoError::rkyv(format!("serialization failed: {e:?}")))?;
    let bytes = serializer.into_serializer().into_inner();
    write_atomic(path.as_ref(), |w| Ok(w.write_all(&bytes)?))
}

pub fn load_rkyv<T, P>(path: P) -> Result<T>
where
    T: Archive,
    T::Archived: Deserialize<T, SharedDeserializeMap>
        + for<'a> rkyv::CheckBytes<rkyv::validation::validators::DefaultValidator<'a>>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::not_found(path.display().to_string()));
    }
    let raw = std::fs::read(path)?;
    let mut bytes = AlignedVec::with_capacity(raw.len());
    bytes.extend_from_slice(&raw);

    let archived = rkyv::check_archived_root::<T>(&bytes)
        .map_err(|e| IoError::rkyv(format!("validation failed: {e:?}")))?;
    archived
        .deserialize(&mut SharedDeserializeMap::default())
        .map_err(|e| IoError::rkyv(format!("deserialization failed: {e:?}")))
}

/// Writes a genome record as an rkyv file.
pub fn save_record<P: AsRef<Path>>(record: &GenomeRecord, path: P) -> Result<()> {
    save_rkyv(record, path)
}

pub fn load_record<P: AsRef<Path>>(path: P) -> Result<GenomeRecord> {
    load_rkyv(&path).map_err(|e| e.with_context(format!("loading record {:?}", path.as_ref())))
}

pub fn save_snapshot<P: AsRef<Path>>(snapshot: &LedgerSnapshot, path: P) -> Result<()> {
    write_atomic(path.as_ref(), |w| Ok(serde_json::to_writer_pretty(w, snapshot)?))
}

/// An empty snapshot when the file does not exist yet.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<LedgerSnapshot> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(LedgerSnapshot::default());
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Durable storage for a discovery ledger.
pub trait LedgerPersistence {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Replaces the in-memory contents with the file's, keeping only
    /// `known_species`. Returns how many players were loaded.
    fn load<'a, P: AsRef<Path>>(
        &self,
        path: P,
        known_species: impl IntoIterator<Item = &'a str>,
    ) -> Result<usize>;
}

impl LedgerPersistence for DiscoveryLedger {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let snapshot = self.snapshot();
        save_snapshot(&snapshot, &path)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            players = snapshot.players.len(),
            "Discovery ledger saved"
        );
        Ok(())
    }

    fn load<'a, P: AsRef<Path>>(
        &self,
        path: P,
        known_species: impl IntoIterator<Item = &'a str>,
    ) -> Result<usize> {
        let snapshot = load_snapshot(&path)
            .map_err(|e| e.with_context(format!("loading ledger {:?}", path.as_ref())))?;
        let players = snapshot.players.len();
        self.restore(snapshot, known_species);
        Ok(players)
    }
}
