//! Runtime facade over the apiary crates: one [`Apiary`] per process holds
//! the frozen genetics registry, the discovery ledger and the metrics, and
//! [`session::Session`] drives headless breeding runs against it.

pub mod apiary;
pub mod session;

pub use apiary::Apiary;
pub use session::{Session, SessionSummary};
