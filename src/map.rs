use core::{
  borrow::Borrow,
  fmt::{self, Display},
  str::FromStr,
};
use std::path::{Path, PathBuf};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
  level::{CoinFlip, LevelGenerator},
  list::{InsertOutcome, SkipList},
  snapshot::LoadReport,
  Options, PersistenceError,
};


/// A thread-safe ordered map: a [`SkipList`] behind its own read-write lock, plus the
/// location of its snapshot file.
///
/// Writers ([`insert`](Self::insert), [`remove`](Self::remove), [`clear`](Self::clear),
/// [`load`](Self::load)) take the lock exclusively. Readers ([`get`](Self::get),
/// [`len`](Self::len), [`dump`](Self::dump), [`read`](Self::read)) share it, so a read
/// always observes the map between two complete writes. Each map has its own lock;
/// distinct maps never contend.
///
/// ## Example
///
/// ```rust
/// use std::{sync::Arc, thread};
/// use skipkv::SkipMap;
///
/// let map = Arc::new(SkipMap::new(12));
/// let handles: Vec<_> = (0..4u32)
///   .map(|t| {
///     let map = map.clone();
///     thread::spawn(move || {
///       for i in 0..100 {
///         let _ = map.insert(t * 100 + i, i);
///       }
///     })
///   })
///   .collect();
/// for h in handles {
///   h.join().unwrap();
/// }
/// assert_eq!(map.len(), 400);
/// ```
pub struct SkipMap<K, V, G = CoinFlip> {
  list: RwLock<SkipList<K, V, G>>,
  snapshot_path: PathBuf,
  atomic_snapshot: bool,
}

impl<K, V> SkipMap<K, V> {
  /// Creates an empty map whose nodes reach at most `max_level`, with default
  /// [`Options`] otherwise.
  #[inline]
  pub fn new(max_level: usize) -> Self {
    Self::with_options(Options::new().with_max_level(max_level))
  }

  /// Creates an empty map configured by `opts`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::{Options, SkipMap};
  ///
  /// let map = SkipMap::<u64, String>::with_options(
  ///   Options::new()
  ///     .with_max_level(6)
  ///     .with_seed(Some(7))
  ///     .with_snapshot_path("data/kv.snapshot"),
  /// );
  /// assert_eq!(map.max_level(), 6);
  /// assert!(map.snapshot_path().ends_with("kv.snapshot"));
  /// ```
  pub fn with_options(opts: Options) -> Self {
    let snapshot_path = opts.snapshot_path().to_path_buf();
    let atomic_snapshot = opts.atomic_snapshot();
    Self::from_list(SkipList::with_options(opts), snapshot_path, atomic_snapshot)
  }
}

impl<K, V, G> SkipMap<K, V, G> {
  /// Creates an empty map configured by `opts` that draws node levels from `generator`.
  ///
  /// The seed in `opts` is ignored.
  pub fn with_generator(opts: Options, generator: G) -> Self {
    let list = SkipList::from_parts(opts.max_level(), opts.capacity(), generator);
    Self::from_list(list, opts.snapshot_path().to_path_buf(), opts.atomic_snapshot())
  }

  fn from_list(list: SkipList<K, V, G>, snapshot_path: PathBuf, atomic_snapshot: bool) -> Self {
    Self {
      list: RwLock::new(list),
      snapshot_path,
      atomic_snapshot,
    }
  }

  /// Returns the number of entries in the map.
  #[inline]
  pub fn len(&self) -> usize {
    self.list.read().len()
  }

  /// Returns `true` if the map holds no entries.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.list.read().is_empty()
  }

  /// Returns the highest level a node of this map can reach.
  #[inline]
  pub fn max_level(&self) -> usize {
    self.list.read().max_level()
  }

  /// Returns the highest level that currently links at least one node.
  #[inline]
  pub fn level(&self) -> usize {
    self.list.read().level()
  }

  /// Returns the file [`dump`](Self::dump) and [`load`](Self::load) use.
  #[inline]
  pub fn snapshot_path(&self) -> &Path {
    &self.snapshot_path
  }

  /// Removes every entry.
  #[inline]
  pub fn clear(&self) {
    self.list.write().clear();
  }

  /// Locks the map for reading and returns the underlying list.
  ///
  /// Writers block until the guard is dropped. Use it to run several reads against one
  /// consistent state, or to walk the levels with [`SkipList::levels`].
  #[inline]
  pub fn read(&self) -> RwLockReadGuard<'_, SkipList<K, V, G>> {
    self.list.read()
  }

  /// Locks the map for writing and returns the underlying list.
  #[inline]
  pub fn write(&self) -> RwLockWriteGuard<'_, SkipList<K, V, G>> {
    self.list.write()
  }

  /// Consumes the map, returning the underlying list.
  #[inline]
  pub fn into_inner(self) -> SkipList<K, V, G> {
    self.list.into_inner()
  }
}

impl<K: Ord, V, G> SkipMap<K, V, G> {
  /// Returns a clone of the value stored under `key`.
  #[inline]
  pub fn get<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    V: Clone,
  {
    self.list.read().get(key).cloned()
  }

  /// Calls `f` with the value stored under `key` while holding the read lock.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::SkipMap;
  ///
  /// let map = SkipMap::new(6);
  /// let _ = map.insert("k", String::from("value"));
  /// assert_eq!(map.get_with("k", |v| v.len()), Some(5));
  /// assert_eq!(map.get_with("missing", |v| v.len()), None);
  /// ```
  #[inline]
  pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    F: FnOnce(&V) -> R,
  {
    self.list.read().get(key).map(f)
  }

  /// Returns `true` if the map contains `key`.
  #[inline]
  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    self.list.read().contains_key(key)
  }

  /// Removes `key`, returning its value if it was present.
  #[inline]
  pub fn remove<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    self.list.write().remove(key)
  }
}

impl<K: Ord, V, G: LevelGenerator> SkipMap<K, V, G> {
  /// Inserts `key` with `value`, unless `key` is already present.
  ///
  /// See [`SkipList::insert`].
  #[inline]
  pub fn insert(&self, key: K, value: V) -> InsertOutcome {
    self.list.write().insert(key, value)
  }
}

impl<K: Display, V: Display, G> SkipMap<K, V, G> {
  /// Writes every entry to the snapshot file, one `<key>:<value>` line per entry in
  /// ascending key order, and returns the number of lines written.
  ///
  /// Holds the read lock for the whole dump, so the file reflects a single state of
  /// the map.
  pub fn dump(&self) -> Result<usize, PersistenceError> {
    self
      .list
      .read()
      .dump_file(&self.snapshot_path, self.atomic_snapshot)
  }
}

impl<K, V, G> SkipMap<K, V, G>
where
  K: Ord + FromStr,
  V: FromStr,
  G: LevelGenerator,
{
  /// Inserts every well-formed record of the snapshot file. Keys already present keep
  /// their current value.
  ///
  /// Holds the write lock for the whole load.
  ///
  /// See [`SkipList::load_from`].
  pub fn load(&self) -> Result<LoadReport, PersistenceError> {
    self.list.write().load_file(&self.snapshot_path)
  }
}

impl<K: fmt::Debug, V: fmt::Debug, G> fmt::Debug for SkipMap<K, V, G> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SkipMap")
      .field("entries", &*self.list.read())
      .field("snapshot_path", &self.snapshot_path)
      .finish()
  }
}
