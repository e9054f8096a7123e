#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod arena;
mod node;

mod error;
pub use error::PersistenceError;

mod level;
pub use level::{CoinFlip, LevelGenerator};

mod list;
pub use list::{EntryRef, InsertOutcome, Iter, SkipList};

mod map;
pub use map::SkipMap;

mod options;
pub use options::{Options, DEFAULT_SNAPSHOT_PATH};

mod snapshot;
pub use snapshot::{LoadReport, DELIMITER};

/// The highest level a node can ever be linked into. Larger configured maximums are
/// clamped to this value.
pub const MAX_LEVEL: usize = 32;

/// The maximum level used when none is configured.
pub const DEFAULT_MAX_LEVEL: usize = 16;

#[cfg(test)]
mod tests;
