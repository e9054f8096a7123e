#![allow(dead_code)]

use core::fmt::Debug;

use super::{LevelGenerator, SkipList};

/// Only used for testing
pub(crate) fn key(i: usize) -> String {
  format!("{:05}", i)
}

/// Only used for testing
pub(crate) fn new_value(i: usize) -> String {
  format!("v{:05}", i)
}

/// Hands out levels from a fixed script, cycling when it runs out.
#[derive(Debug, Clone)]
pub(crate) struct Scripted {
  levels: Vec<usize>,
  pos: usize,
}

impl Scripted {
  pub(crate) fn new(levels: impl Into<Vec<usize>>) -> Self {
    Self {
      levels: levels.into(),
      pos: 0,
    }
  }
}

impl LevelGenerator for Scripted {
  fn random_level(&mut self, max_level: usize) -> usize {
    let level = self.levels[self.pos % self.levels.len()];
    self.pos += 1;
    level.min(max_level)
  }
}

/// Walks every level and checks the structural invariants of `l`.
pub(crate) fn assert_invariants<K: Ord + Debug, V, G>(l: &SkipList<K, V, G>) {
  let base: Vec<_> = l.iter().collect();
  assert_eq!(base.len(), l.len(), "len does not match the level 0 chain");

  for pair in base.windows(2) {
    assert!(
      pair[0].key() < pair[1].key(),
      "level 0 out of order: {:?} then {:?}",
      pair[0].key(),
      pair[1].key()
    );
  }

  let top = base.iter().map(|ent| ent.level()).max().unwrap_or(0);
  assert_eq!(l.level(), top, "current level is not the highest node level");
  assert!(l.level() <= l.max_level());

  for level in 0..=l.max_level() {
    let expected: Vec<&K> = base
      .iter()
      .filter(|ent| ent.level() >= level)
      .map(|ent| ent.key())
      .collect();
    let actual: Vec<&K> = l.level_iter(level).map(|ent| ent.key()).collect();
    assert_eq!(actual, expected, "level {level} is not the filtered level 0 chain");
  }
  assert_eq!(l.level_iter(l.max_level() + 1).count(), 0);
}
