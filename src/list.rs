use core::{borrow::Borrow, fmt, iter::FusedIterator};

use super::{
  arena::{Arena, NodeId},
  level::{CoinFlip, LevelGenerator},
  node::Node,
  Options, MAX_LEVEL,
};

#[cfg(test)]
mod tests;

/// The result of [`SkipList::insert`].
#[must_use = "an insert may be rejected because the key already exists"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertOutcome {
  /// A new entry was linked into the list.
  Inserted,
  /// The key was already present. The list is unchanged and the stored value is kept.
  AlreadyExists,
}

impl InsertOutcome {
  /// Returns `true` if a new entry was created.
  #[inline]
  pub const fn is_inserted(&self) -> bool {
    matches!(self, Self::Inserted)
  }
}

/// A position a descent can stop at: the header tower or a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
  Head,
  Node(NodeId),
}

/// An ordered map implemented as a skiplist whose nodes live in an arena.
///
/// `SkipList` is the unsynchronized core: mutation requires `&mut self`. Wrap it in a
/// [`SkipMap`](crate::SkipMap) to share it between threads.
///
/// Every node is linked into level `0`; a node whose level is `L` is additionally linked
/// into levels `1..=L`. Node levels are drawn from the list's [`LevelGenerator`].
pub struct SkipList<K, V, G = CoinFlip> {
  arena: Arena<Node<K, V>>,
  /// Header tower, `max_level + 1` links. Slots above `level` are always `None`.
  head: Box<[Option<NodeId>]>,
  max_level: usize,
  /// Highest level that currently links at least one node, 0 when empty.
  level: usize,
  len: usize,
  generator: G,
}

impl<K, V> SkipList<K, V> {
  /// Creates an empty list whose nodes reach at most `max_level`, with a level generator
  /// seeded from the operating system.
  ///
  /// `max_level` is clamped to [`MAX_LEVEL`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::SkipList;
  ///
  /// let mut l = SkipList::new(6);
  /// assert!(l.insert(1, "one").is_inserted());
  /// assert_eq!(l.get(&1), Some(&"one"));
  /// ```
  #[inline]
  pub fn new(max_level: usize) -> Self {
    Self::with_generator(max_level, CoinFlip::from_os_rng())
  }

  /// Creates an empty list configured by `opts`.
  ///
  /// The snapshot settings of `opts` are ignored here, they are only used by
  /// [`SkipMap`](crate::SkipMap).
  pub fn with_options(opts: Options) -> Self {
    let generator = match opts.seed() {
      Some(seed) => CoinFlip::seeded(seed),
      None => CoinFlip::from_os_rng(),
    };
    Self::from_parts(opts.max_level(), opts.capacity(), generator)
  }
}

impl<K, V, G> SkipList<K, V, G> {
  /// Creates an empty list that draws node levels from `generator`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::{CoinFlip, SkipList};
  ///
  /// let mut l = SkipList::with_generator(12, CoinFlip::seeded(42));
  /// for i in 0..100 {
  ///   assert!(l.insert(i, i * 2).is_inserted());
  /// }
  /// assert_eq!(l.len(), 100);
  /// ```
  #[inline]
  pub fn with_generator(max_level: usize, generator: G) -> Self {
    Self::from_parts(max_level, 0, generator)
  }

  pub(crate) fn from_parts(max_level: usize, capacity: usize, generator: G) -> Self {
    let max_level = max_level.min(MAX_LEVEL);
    Self {
      arena: Arena::with_capacity(capacity),
      head: vec![None; max_level + 1].into_boxed_slice(),
      max_level,
      level: 0,
      len: 0,
      generator,
    }
  }

  /// Returns the number of entries in the list.
  #[inline]
  pub const fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the list holds no entries.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns the highest level a node of this list can reach.
  #[inline]
  pub const fn max_level(&self) -> usize {
    self.max_level
  }

  /// Returns the highest level that currently links at least one node.
  ///
  /// This is `0` for an empty list.
  #[inline]
  pub const fn level(&self) -> usize {
    self.level
  }

  /// Returns a reference to the level generator.
  #[inline]
  pub const fn generator(&self) -> &G {
    &self.generator
  }

  /// Removes every entry. The list stays usable.
  pub fn clear(&mut self) {
    self.arena.clear();
    self.head.iter_mut().for_each(|link| *link = None);
    self.level = 0;
    self.len = 0;
  }

  /// Returns an iterator over all entries in ascending key order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, K, V> {
    self.level_iter(0)
  }

  /// Returns an iterator over the entries linked into `level`, in ascending key order.
  ///
  /// The result is empty if nothing reaches `level`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::{CoinFlip, SkipList};
  ///
  /// let mut l = SkipList::with_generator(8, CoinFlip::seeded(3));
  /// for i in 0..32 {
  ///   let _ = l.insert(i, ());
  /// }
  ///
  /// for level in 1..=l.level() {
  ///   for ent in l.level_iter(level) {
  ///     assert!(ent.level() >= level);
  ///   }
  /// }
  /// ```
  #[inline]
  pub fn level_iter(&self, level: usize) -> Iter<'_, K, V> {
    Iter {
      arena: &self.arena,
      next: self.head.get(level).copied().flatten(),
      level,
    }
  }

  /// Returns one iterator per active level, from level `0` up to [`level`](Self::level).
  pub fn levels(&self) -> impl Iterator<Item = Iter<'_, K, V>> + '_ {
    (0..=self.level).map(move |level| self.level_iter(level))
  }

  #[inline]
  fn next(&self, link: Link, level: usize) -> Option<NodeId> {
    match link {
      Link::Head => self.head[level],
      Link::Node(id) => self.arena[id].next(level),
    }
  }

  #[inline]
  fn set_next(&mut self, link: Link, level: usize, next: Option<NodeId>) {
    match link {
      Link::Head => self.head[level] = next,
      Link::Node(id) => self.arena[id].set_next(level, next),
    }
  }
}

impl<K: Ord, V, G> SkipList<K, V, G> {
  /// Walks from the top active level down to level 0, stopping on each level at the last
  /// node whose key is less than `key`. `record` sees that predecessor for every level.
  ///
  /// Returns the first level-0 node whose key is not less than `key`.
  fn seek<Q>(&self, key: &Q, mut record: impl FnMut(usize, Link)) -> Option<NodeId>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    let mut cursor = Link::Head;
    for level in (0..=self.level).rev() {
      while let Some(next) = self.next(cursor, level) {
        if self.arena[next].key().borrow() < key {
          cursor = Link::Node(next);
        } else {
          break;
        }
      }
      record(level, cursor);
    }
    self.next(cursor, 0)
  }

  fn find<Q>(&self, key: &Q) -> Option<NodeId>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    self
      .seek(key, |_, _| {})
      .filter(|&id| self.arena[id].key().borrow() == key)
  }

  /// Returns a reference to the value stored under `key`.
  #[inline]
  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    self.find(key).map(|id| self.arena[id].value())
  }

  /// Returns a mutable reference to the value stored under `key`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::SkipList;
  ///
  /// let mut l = SkipList::new(4);
  /// let _ = l.insert("a", 1);
  /// if let Some(v) = l.get_mut("a") {
  ///   *v += 1;
  /// }
  /// assert_eq!(l.get("a"), Some(&2));
  /// ```
  #[inline]
  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    let id = self.find(key)?;
    Some(self.arena[id].value_mut())
  }

  /// Replaces the value stored under `key`, returning the previous value.
  ///
  /// Returns `Err(value)` if the key is not present.
  pub fn replace<Q>(&mut self, key: &Q, value: V) -> Result<V, V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    match self.find(key) {
      Some(id) => Ok(self.arena[id].set_value(value)),
      None => Err(value),
    }
  }

  /// Returns `true` if the list contains `key`.
  #[inline]
  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    self.find(key).is_some()
  }

  /// Removes `key` from the list, returning its value if it was present.
  ///
  /// Removing an absent key leaves the list untouched.
  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    let mut update = [Link::Head; MAX_LEVEL + 1];
    let target = self
      .seek(key, |level, link| update[level] = link)
      .filter(|&id| self.arena[id].key().borrow() == key)?;

    // A node is only reachable on levels up to its own, so the first predecessor that
    // does not point at it ends the unlinking.
    for (level, &pred) in update.iter().enumerate().take(self.level + 1) {
      if self.next(pred, level) != Some(target) {
        break;
      }
      let next = self.arena[target].next(level);
      self.set_next(pred, level, next);
    }

    while self.level > 0 && self.head[self.level].is_none() {
      self.level -= 1;
    }

    let node = self.arena.dealloc(target)?;
    self.len -= 1;
    debug_assert_eq!(self.len, self.arena.len());
    Some(node.into_value())
  }
}

impl<K: Ord, V, G: LevelGenerator> SkipList<K, V, G> {
  /// Inserts `key` with `value`.
  ///
  /// If `key` is already present nothing changes, the stored value is kept and
  /// [`InsertOutcome::AlreadyExists`] is returned.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::{InsertOutcome, SkipList};
  ///
  /// let mut l = SkipList::new(6);
  /// assert_eq!(l.insert(5, "X"), InsertOutcome::Inserted);
  /// assert_eq!(l.insert(5, "Y"), InsertOutcome::AlreadyExists);
  /// assert_eq!(l.get(&5), Some(&"X"));
  /// ```
  pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
    let mut update = [Link::Head; MAX_LEVEL + 1];
    if let Some(id) = self.seek(&key, |level, link| update[level] = link) {
      if *self.arena[id].key() == key {
        return InsertOutcome::AlreadyExists;
      }
    }

    let level = self.generator.random_level(self.max_level).min(self.max_level);
    if level > self.level {
      // nothing spans the new levels yet, the header precedes the new node there
      update[self.level + 1..=level].fill(Link::Head);
      self.level = level;
    }

    let id = self.arena.alloc(Node::new(key, value, level));
    for (i, &pred) in update.iter().enumerate().take(level + 1) {
      let next = self.next(pred, i);
      self.arena[id].set_next(i, next);
      self.set_next(pred, i, Some(id));
    }

    self.len += 1;
    InsertOutcome::Inserted
  }
}

impl<K: fmt::Debug, V: fmt::Debug, G> fmt::Debug for SkipList<K, V, G> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(self.iter().map(|ent| (ent.key(), ent.value())))
      .finish()
  }
}

impl<'a, K, V, G> IntoIterator for &'a SkipList<K, V, G> {
  type Item = EntryRef<'a, K, V>;
  type IntoIter = Iter<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// A borrowed entry of a [`SkipList`].
pub struct EntryRef<'a, K, V> {
  node: &'a Node<K, V>,
}

impl<K, V> Clone for EntryRef<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K, V> Copy for EntryRef<'_, K, V> {}

impl<'a, K, V> EntryRef<'a, K, V> {
  /// Returns the key of the entry.
  #[inline]
  pub const fn key(&self) -> &'a K {
    self.node.key()
  }

  /// Returns the value of the entry.
  #[inline]
  pub const fn value(&self) -> &'a V {
    self.node.value()
  }

  /// Returns the highest level the entry is linked into.
  #[inline]
  pub fn level(&self) -> usize {
    self.node.level()
  }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for EntryRef<'_, K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EntryRef")
      .field("key", self.key())
      .field("value", self.value())
      .field("level", &self.level())
      .finish()
  }
}

/// An iterator over the entries of one level of a [`SkipList`].
pub struct Iter<'a, K, V> {
  arena: &'a Arena<Node<K, V>>,
  next: Option<NodeId>,
  level: usize,
}

impl<K, V> Iter<'_, K, V> {
  /// Returns the level this iterator walks.
  #[inline]
  pub const fn level(&self) -> usize {
    self.level
  }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
  type Item = EntryRef<'a, K, V>;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let arena = self.arena;
    let node = &arena[self.next?];
    self.next = node.next(self.level);
    Some(EntryRef { node })
  }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
