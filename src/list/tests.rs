use super::*;
use crate::tests::{assert_invariants, key, new_value, Scripted};

fn seeded<K, V>(max_level: usize) -> SkipList<K, V> {
  SkipList::with_generator(max_level, CoinFlip::seeded(0xdead_beef))
}

fn empty_in<G>(l: SkipList<String, String, G>) {
  assert!(l.is_empty());
  assert_eq!(l.len(), 0);
  assert_eq!(l.level(), 0);
  assert!(l.get("aaa").is_none());
  assert!(!l.contains_key("aaa"));
  assert!(l.iter().next().is_none());
  assert_eq!(l.levels().count(), 1);
  assert_invariants(&l);
}

#[test]
fn test_empty() {
  empty_in(seeded(12));
  empty_in(SkipList::new(0));
  empty_in(SkipList::with_generator(4, Scripted::new([1])));
}

#[test]
fn test_basic() {
  let mut l = seeded(6);
  assert_eq!(l.insert(1, "A"), InsertOutcome::Inserted);
  assert_eq!(l.insert(3, "B"), InsertOutcome::Inserted);
  assert_eq!(l.insert(7, "C"), InsertOutcome::Inserted);
  assert_eq!(l.len(), 3);
  assert_eq!(l.get(&3), Some(&"B"));

  assert_eq!(l.remove(&3), Some("B"));
  assert_eq!(l.len(), 2);
  assert!(l.get(&3).is_none());
  assert_invariants(&l);

  let entries: Vec<_> = l.iter().map(|ent| (*ent.key(), *ent.value())).collect();
  assert_eq!(entries, [(1, "A"), (7, "C")]);
}

#[test]
fn test_duplicate_insert_keeps_value() {
  let mut l = seeded(6);
  assert_eq!(l.insert(5, "X"), InsertOutcome::Inserted);
  let level = l.level();
  assert_eq!(l.insert(5, "Y"), InsertOutcome::AlreadyExists);
  assert!(!l.insert(5, "Z").is_inserted());
  assert_eq!(l.get(&5), Some(&"X"));
  assert_eq!(l.len(), 1);
  assert_eq!(l.level(), level);
  assert_invariants(&l);
}

#[test]
fn test_duplicate_insert_does_not_sample() {
  // a rejected insert must not consume a level from the generator
  let mut l = SkipList::with_generator(8, Scripted::new([3, 1, 2]));
  let _ = l.insert(10, ());
  let _ = l.insert(10, ());
  let _ = l.insert(20, ());
  let levels: Vec<_> = l.iter().map(|ent| ent.level()).collect();
  assert_eq!(levels, [3, 1]);
}

#[test]
fn test_search_many() {
  const N: usize = 1000;
  let mut l = seeded(12);
  for i in (0..N).step_by(2) {
    assert!(l.insert(key(i), new_value(i)).is_inserted());
  }
  assert_eq!(l.len(), N / 2);

  for i in 0..N {
    let k = key(i);
    if i % 2 == 0 {
      assert_eq!(l.get(&k), Some(&new_value(i)), "broken: {i}");
      assert!(l.contains_key(k.as_str()));
    } else {
      assert!(l.get(&k).is_none(), "unexpected: {i}");
    }
  }
  assert_invariants(&l);
}

#[test]
fn test_insert_reverse_and_shuffled_order() {
  let mut l = seeded(10);
  for i in (0..200).rev() {
    let _ = l.insert(i, i);
  }
  for i in [500, 250, 375, 201, 999, 300] {
    let _ = l.insert(i, i);
  }
  assert_invariants(&l);
  let keys: Vec<_> = l.iter().map(|ent| *ent.key()).collect();
  let mut sorted = keys.clone();
  sorted.sort_unstable();
  assert_eq!(keys, sorted);
  assert_eq!(keys.len(), 206);
}

#[test]
fn test_remove() {
  const N: usize = 500;
  let mut l = seeded(10);
  for i in 0..N {
    let _ = l.insert(i, new_value(i));
  }

  for i in (0..N).filter(|i| i % 3 == 0) {
    let before = l.len();
    assert_eq!(l.remove(&i), Some(new_value(i)));
    assert_eq!(l.len(), before - 1);
    assert!(l.get(&i).is_none());
  }
  assert_invariants(&l);

  for i in 0..N {
    assert_eq!(l.get(&i).is_some(), i % 3 != 0, "broken: {i}");
  }
}

#[test]
fn test_remove_absent() {
  let mut l: SkipList<u32, u32> = seeded(6);
  assert_eq!(l.remove(&1), None);

  for i in [2, 4, 6] {
    let _ = l.insert(i, i * 10);
  }
  let level = l.level();
  for i in [1, 3, 5, 7] {
    assert!(l.remove(&i).is_none());
  }
  assert_eq!(l.len(), 3);
  assert_eq!(l.level(), level);
  assert_invariants(&l);
}

#[test]
fn test_remove_everything_shrinks_level() {
  let mut l = seeded(12);
  for i in 0..300 {
    let _ = l.insert(i, ());
  }
  assert!(l.level() > 1);
  for i in 0..300 {
    assert!(l.remove(&i).is_some());
    assert_invariants(&l);
  }
  assert!(l.is_empty());
  assert_eq!(l.level(), 0);

  // still usable afterwards
  let _ = l.insert(42, ());
  assert!(l.contains_key(&42));
  assert_invariants(&l);
}

#[test]
fn test_remove_node_at_max_level() {
  let max_level = 5;
  let mut l = SkipList::with_generator(max_level, Scripted::new([1, 2, max_level, 1, 3]));
  for i in 1..=5 {
    let _ = l.insert(i, i);
  }
  let tall: Vec<_> = l.iter().filter(|ent| ent.level() == max_level).collect();
  assert_eq!(tall.len(), 1);
  assert_eq!(*tall[0].key(), 3);
  assert_eq!(l.level(), max_level);

  assert_eq!(l.remove(&3), Some(3));
  assert_invariants(&l);
  for level in 0..=max_level {
    assert!(l.level_iter(level).all(|ent| *ent.key() != 3), "level {level}");
  }
  // the next tallest node is at level 3
  assert_eq!(l.level(), 3);
  assert!(l.level_iter(4).next().is_none());
  assert!(l.level_iter(max_level).next().is_none());
}

#[test]
fn test_generator_above_max_level_is_capped() {
  let mut l = SkipList::with_generator(2, Scripted::new([9]));
  let _ = l.insert("a", 1);
  let _ = l.insert("b", 2);
  assert_eq!(l.level(), 2);
  assert!(l.iter().all(|ent| ent.level() == 2));
  assert_invariants(&l);
}

#[test]
fn test_max_level_is_clamped() {
  let l: SkipList<u8, u8> = seeded(MAX_LEVEL * 4);
  assert_eq!(l.max_level(), MAX_LEVEL);
}

#[test]
fn test_with_options() {
  let opts = Options::new()
    .with_max_level(7)
    .with_capacity(64)
    .with_seed(Some(9));
  let layout = |opts: Options| {
    let mut l = SkipList::with_options(opts);
    for i in 0..100 {
      let _ = l.insert(i, ());
    }
    assert_eq!(l.max_level(), 7);
    assert_invariants(&l);
    l.iter().map(|ent| ent.level()).collect::<Vec<_>>()
  };
  assert_eq!(layout(opts.clone()), layout(opts));
}

#[test]
fn test_max_level_zero() {
  let mut l = SkipList::with_generator(0, CoinFlip::seeded(1));
  for i in 0..50 {
    let _ = l.insert(i, i);
  }
  assert_eq!(l.level(), 0);
  assert!(l.iter().all(|ent| ent.level() == 0));
  assert_eq!(l.remove(&25), Some(25));
  assert_invariants(&l);
}

#[test]
fn test_get_mut_and_replace() {
  let mut l = seeded(6);
  let _ = l.insert(key(1), 1);
  *l.get_mut(key(1).as_str()).unwrap() += 10;
  assert_eq!(l.get(key(1).as_str()), Some(&11));

  assert_eq!(l.replace(key(1).as_str(), 5), Ok(11));
  assert_eq!(l.replace(key(2).as_str(), 6), Err(6));
  assert_eq!(l.get(key(1).as_str()), Some(&5));
  assert!(l.get_mut(key(2).as_str()).is_none());
}

#[test]
fn test_clear() {
  let mut l = seeded(8);
  for i in 0..100 {
    let _ = l.insert(i, new_value(i));
  }
  l.clear();
  assert!(l.is_empty());
  assert_eq!(l.level(), 0);
  assert!(l.get(&5).is_none());
  assert_invariants(&l);

  let _ = l.insert(5, new_value(5));
  assert_eq!(l.get(&5), Some(&new_value(5)));
  assert_invariants(&l);
}

#[test]
fn test_levels_listing() {
  let mut l = SkipList::with_generator(4, Scripted::new([1, 3, 2]));
  for i in [10, 20, 30] {
    let _ = l.insert(i, i);
  }
  let listing: Vec<(usize, Vec<i32>)> = l
    .levels()
    .map(|it| (it.level(), it.map(|ent| *ent.key()).collect()))
    .collect();
  assert_eq!(
    listing,
    [
      (0, vec![10, 20, 30]),
      (1, vec![10, 20, 30]),
      (2, vec![20, 30]),
      (3, vec![20]),
    ]
  );
}

#[test]
fn test_same_seed_same_layout() {
  let layout = |seed| {
    let mut l = SkipList::with_generator(12, CoinFlip::seeded(seed));
    for i in 0..200 {
      let _ = l.insert(i, ());
    }
    l.iter().map(|ent| ent.level()).collect::<Vec<_>>()
  };
  assert_eq!(layout(11), layout(11));
  assert_ne!(layout(11), layout(12));
}

#[test]
fn test_random_ops_against_btree() {
  use rand::{rngs::StdRng, Rng, SeedableRng};
  use std::collections::BTreeMap;

  let mut rng = StdRng::seed_from_u64(7);
  let mut l = seeded(8);
  let mut model = BTreeMap::new();

  for round in 0..5000u32 {
    let k: u16 = rng.random_range(0..512);
    if rng.random_bool(0.6) {
      let expected = if model.contains_key(&k) {
        InsertOutcome::AlreadyExists
      } else {
        model.insert(k, round);
        InsertOutcome::Inserted
      };
      assert_eq!(l.insert(k, round), expected);
    } else {
      assert_eq!(l.remove(&k), model.remove(&k));
    }
    assert_eq!(l.len(), model.len());
  }

  assert_invariants(&l);
  let entries: Vec<_> = l.iter().map(|ent| (*ent.key(), *ent.value())).collect();
  let expected: Vec<_> = model.into_iter().collect();
  assert_eq!(entries, expected);
}

#[test]
fn test_debug() {
  let mut l = seeded(4);
  let _ = l.insert(2, "b");
  let _ = l.insert(1, "a");
  assert_eq!(format!("{l:?}"), r#"{1: "a", 2: "b"}"#);

  let ent = l.iter().next().unwrap();
  assert!(format!("{ent:?}").starts_with(r#"EntryRef { key: 1, value: "a", level: "#));
}

#[test]
fn test_into_iter() {
  let mut l = seeded(4);
  for i in 0..10 {
    let _ = l.insert(i, i * i);
  }
  let mut sum = 0;
  for ent in &l {
    sum += ent.value();
  }
  assert_eq!(sum, (0..10).map(|i| i * i).sum::<i32>());
}
