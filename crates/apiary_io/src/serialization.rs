//! JSON and hex-DNA export of genome records.
//!
//! Hex DNA is the hex encoding of a record's JSON form. It is what players
//! copy around, so decoding is strict and every failure says what was wrong
//! with the input.

use crate::error::{IoError, Result};
use apiary_core::{Genome, GenomeCodec};
use apiary_data::GenomeRecord;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))
}

pub fn to_json_pretty<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))
}

/// Rejects blank input before handing it to serde.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }
    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {e}")))
}

pub fn to_hex_dna<T: Serialize>(data: &T) -> Result<String> {
    Ok(hex::encode(to_json(data)?.as_bytes()))
}

pub fn from_hex_dna<T: DeserializeOwned>(dna: &str) -> Result<T> {
    let dna = dna.trim();
    if dna.is_empty() {
        return Err(IoError::validation("Empty hex string"));
    }
    let bytes =
        hex::decode(dna).map_err(|e| IoError::validation(format!("Invalid hex encoding: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| IoError::validation(format!("Invalid UTF-8 in hex: {e}")))?;
    from_json(&json)
}

/// Cheap syntactic check; does not parse the JSON inside.
#[must_use]
pub fn is_valid_hex_dna(dna: &str) -> bool {
    let dna = dna.trim();
    !dna.is_empty() && dna.len() % 2 == 0 && hex::decode(dna).is_ok()
}

/// Hex DNA of a genome, in slot order.
pub fn export_genome(codec: &GenomeCodec<'_>, genome: &Genome) -> Result<String> {
    to_hex_dna(&codec.encode(genome))
}

/// Parses hex DNA and resolves every uid against the catalog.
pub fn import_genome(codec: &GenomeCodec<'_>, dna: &str) -> Result<Genome> {
    let record: GenomeRecord = from_hex_dna(dna)?;
    codec
        .decode(&record)
        .map_err(|e| IoError::from(e).with_context("importing genome"))
}

/// Stable SHA-256 of a record's JSON form, for comparing bees by genome.
pub fn record_fingerprint(record: &GenomeRecord) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(to_json(record)?.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

pub fn write_json_file<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let json = to_json_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })
}

pub fn read_json_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}
