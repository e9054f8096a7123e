use super::arena::NodeId;

/// A single entry of the skiplist.
///
/// The tower (`forward`) holds one link per level the node participates in. Links are
/// arena handles, so dropping a node never touches the nodes it points to: they are
/// owned and released by the list's arena.
#[derive(Debug)]
pub(super) struct Node<K, V> {
  // Immutable after creation.
  key: K,

  value: V,
  // forward.len() == level + 1, fixed at creation.
  forward: Box<[Option<NodeId>]>,
}

impl<K, V> Node<K, V> {
  #[inline]
  pub(super) fn new(key: K, value: V, level: usize) -> Self {
    Self {
      key,
      value,
      forward: vec![None; level + 1].into_boxed_slice(),
    }
  }

  #[inline]
  pub(super) const fn key(&self) -> &K {
    &self.key
  }

  #[inline]
  pub(super) const fn value(&self) -> &V {
    &self.value
  }

  #[inline]
  pub(super) fn value_mut(&mut self) -> &mut V {
    &mut self.value
  }

  /// Replaces the value in place, returning the old one.
  #[inline]
  pub(super) fn set_value(&mut self, value: V) -> V {
    core::mem::replace(&mut self.value, value)
  }

  /// Returns the highest level this node is linked into.
  #[inline]
  pub(super) fn level(&self) -> usize {
    self.forward.len() - 1
  }

  /// Returns the next node at `level`, or `None` if this node is the tail of that level
  /// or does not reach it.
  #[inline]
  pub(super) fn next(&self, level: usize) -> Option<NodeId> {
    self.forward.get(level).copied().flatten()
  }

  /// ## Panics
  /// - if `level` is above the node's own level.
  #[inline]
  pub(super) fn set_next(&mut self, level: usize, next: Option<NodeId>) {
    self.forward[level] = next;
  }

  #[inline]
  pub(super) fn into_value(self) -> V {
    self.value
  }
}
