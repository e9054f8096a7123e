use std::path::{Path, PathBuf};

use super::{DEFAULT_MAX_LEVEL, MAX_LEVEL};

/// The snapshot file used when no path is configured.
pub const DEFAULT_SNAPSHOT_PATH: &str = "store/dumpFile";

/// Options for [`SkipList`](crate::SkipList) and [`SkipMap`](crate::SkipMap).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Options {
  max_level: usize,
  capacity: usize,
  seed: Option<u64>,
  snapshot_path: PathBuf,
  atomic_snapshot: bool,
}

impl Default for Options {
  #[inline]
  fn default() -> Options {
    Options::new()
  }
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub fn new() -> Options {
    Options {
      max_level: DEFAULT_MAX_LEVEL,
      capacity: 0,
      seed: None,
      snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
      atomic_snapshot: true,
    }
  }

  /// Sets the highest level a node can be linked into.
  ///
  /// Values above [`MAX_LEVEL`](crate::MAX_LEVEL) are clamped.
  ///
  /// Default is [`DEFAULT_MAX_LEVEL`](crate::DEFAULT_MAX_LEVEL).
  ///
  /// ## Example
  ///
  /// ```
  /// use skipkv::{Options, MAX_LEVEL};
  ///
  /// let opts = Options::new().with_max_level(6);
  /// assert_eq!(opts.max_level(), 6);
  ///
  /// let opts = Options::new().with_max_level(1000);
  /// assert_eq!(opts.max_level(), MAX_LEVEL);
  /// ```
  #[inline]
  pub fn with_max_level(mut self, max_level: usize) -> Options {
    self.max_level = max_level.min(MAX_LEVEL);
    self
  }

  /// Sets how many nodes the arena reserves room for up front.
  ///
  /// This is a hint, the arena grows past it on demand. Default is `0`.
  #[inline]
  pub fn with_capacity(mut self, capacity: usize) -> Options {
    self.capacity = capacity;
    self
  }

  /// Seeds the level generator, making the node layout reproducible.
  ///
  /// Default is `None`, which seeds from the operating system.
  ///
  /// ## Example
  ///
  /// ```
  /// use skipkv::Options;
  ///
  /// let opts = Options::new().with_seed(Some(42));
  /// assert_eq!(opts.seed(), Some(42));
  /// ```
  #[inline]
  pub fn with_seed(mut self, seed: Option<u64>) -> Options {
    self.seed = seed;
    self
  }

  /// Sets the file [`SkipMap::dump`](crate::SkipMap::dump) writes to and
  /// [`SkipMap::load`](crate::SkipMap::load) reads from.
  ///
  /// Default is `store/dumpFile`, relative to the working directory.
  #[inline]
  pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Options {
    self.snapshot_path = path.into();
    self
  }

  /// Sets whether dumps are staged in a sibling `.tmp` file and renamed over the
  /// snapshot once fully written and synced.
  ///
  /// With `false` the snapshot is truncated and rewritten in place, so a failed dump
  /// leaves a partial file behind.
  ///
  /// Default is `true`.
  #[inline]
  pub fn with_atomic_snapshot(mut self, atomic: bool) -> Options {
    self.atomic_snapshot = atomic;
    self
  }

  /// Returns the highest level a node can be linked into.
  #[inline]
  pub const fn max_level(&self) -> usize {
    self.max_level
  }

  /// Returns the initial arena capacity.
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the level generator seed.
  #[inline]
  pub const fn seed(&self) -> Option<u64> {
    self.seed
  }

  /// Returns the snapshot file path.
  #[inline]
  pub fn snapshot_path(&self) -> &Path {
    &self.snapshot_path
  }

  /// Returns whether dumps go through a temporary file.
  #[inline]
  pub const fn atomic_snapshot(&self) -> bool {
    self.atomic_snapshot
  }
}
