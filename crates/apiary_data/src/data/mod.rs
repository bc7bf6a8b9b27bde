//! Core data structures for the apiary genetics engine.

pub mod chromosome;
pub mod discovery;
pub mod item;
pub mod mutation;
pub mod product;
pub mod record;
