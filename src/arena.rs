use core::ops::{Index, IndexMut};

/// A stable handle to a slot in an [`Arena`].
///
/// Handles stay valid until the slot is released; a released slot goes back on the free
/// list and may be handed out again by a later allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
  #[inline]
  const fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug)]
enum Slot<T> {
  Occupied(T),
  Vacant,
}

/// Slab storage for skiplist nodes.
///
/// All nodes of a list live here and are addressed by [`NodeId`]. Freed slots are kept
/// on a LIFO free stack and reused before the backing vector grows.
#[derive(Debug)]
pub(crate) struct Arena<T> {
  slots: Vec<Slot<T>>,
  free: Vec<NodeId>,
  len: usize,
}

impl<T> Default for Arena<T> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Arena<T> {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      slots: Vec::new(),
      free: Vec::new(),
      len: 0,
    }
  }

  #[inline]
  pub(crate) fn with_capacity(cap: usize) -> Self {
    Self {
      slots: Vec::with_capacity(cap),
      free: Vec::new(),
      len: 0,
    }
  }

  /// Returns the number of occupied slots.
  #[inline]
  pub(crate) const fn len(&self) -> usize {
    self.len
  }

  /// Stores `value` and returns its handle.
  ///
  /// ## Panics
  /// - if the arena already holds `u32::MAX` slots.
  pub(crate) fn alloc(&mut self, value: T) -> NodeId {
    self.len += 1;
    match self.free.pop() {
      Some(id) => {
        self.slots[id.index()] = Slot::Occupied(value);
        id
      }
      None => {
        let Ok(idx) = u32::try_from(self.slots.len()) else {
          panic!("arena cannot hold more than u32::MAX nodes");
        };
        self.slots.push(Slot::Occupied(value));
        NodeId(idx)
      }
    }
  }

  /// Releases the slot behind `id` and returns what it held.
  ///
  /// Returns `None` if the slot is already vacant.
  pub(crate) fn dealloc(&mut self, id: NodeId) -> Option<T> {
    let slot = self.slots.get_mut(id.index())?;
    match core::mem::replace(slot, Slot::Vacant) {
      Slot::Occupied(value) => {
        self.free.push(id);
        self.len -= 1;
        Some(value)
      }
      Slot::Vacant => None,
    }
  }

  #[inline]
  pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
    match self.slots.get(id.index()) {
      Some(Slot::Occupied(value)) => Some(value),
      _ => None,
    }
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
    match self.slots.get_mut(id.index()) {
      Some(Slot::Occupied(value)) => Some(value),
      _ => None,
    }
  }

  /// Drops every stored value and forgets all handles.
  pub(crate) fn clear(&mut self) {
    self.slots.clear();
    self.free.clear();
    self.len = 0;
  }
}

impl<T> Index<NodeId> for Arena<T> {
  type Output = T;

  #[inline]
  fn index(&self, id: NodeId) -> &T {
    match self.get(id) {
      Some(value) => value,
      None => panic!("dangling node handle {id:?}"),
    }
  }
}

impl<T> IndexMut<NodeId> for Arena<T> {
  #[inline]
  fn index_mut(&mut self, id: NodeId) -> &mut T {
    match self.get_mut(id) {
      Some(value) => value,
      None => panic!("dangling node handle {id:?}"),
    }
  }
}
