//! Tolerant repair of near-YAML message lists produced by an LLM: recover
//! entry boundaries, fields, and multi-line scalars from malformed input and
//! re-emit them as valid YAML.

pub mod classify;
pub mod emit;
pub mod pipeline;
pub mod recover;
pub mod segment;
pub mod strict;
pub mod types;

pub use pipeline::{repair, repair_default};
pub use types::{Record, RepairAction, RepairError, RepairOptions, RepairResult};
