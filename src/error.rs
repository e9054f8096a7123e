use std::{io, path::PathBuf};

/// Error returned by snapshot dumps and loads.
///
/// Duplicate keys, missing keys and malformed snapshot lines are not errors: they are
/// reported through [`InsertOutcome`](crate::InsertOutcome), `Option` and
/// [`LoadReport`](crate::LoadReport).
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
  /// The snapshot file, its staging file, or its parent directory could not be opened
  /// or created.
  #[error("failed to open snapshot `{}`: {source}", .path.display())]
  OpenFailed {
    /// The path that could not be opened.
    path: PathBuf,
    /// The underlying I/O error.
    #[source]
    source: io::Error,
  },

  /// Writing, syncing or publishing the snapshot failed.
  #[error("failed to write snapshot: {0}")]
  WriteFailed(#[source] io::Error),

  /// Reading the snapshot failed.
  #[error("failed to read snapshot: {0}")]
  ReadFailed(#[source] io::Error),

  /// An entry cannot be written as a `<key>:<value>` line that loads back unchanged.
  #[error("record {record} cannot be written to the snapshot: {reason}")]
  InvalidRecord {
    /// The 1-based position of the entry in key order.
    record: usize,
    /// Why the entry cannot be encoded.
    reason: &'static str,
  },
}

impl PersistenceError {
  #[inline]
  pub(crate) fn open_failed(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
    let path = path.into();
    move |source| Self::OpenFailed { path, source }
  }
}
