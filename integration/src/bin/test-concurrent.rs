use integration::{big_value, key, new_value};
use skipkv::*;
use std::sync::Arc;

fn main() {
  {
    const N: usize = 1000;
    let l = Arc::new(SkipMap::new(DEFAULT_MAX_LEVEL));
    for i in 0..N {
      let l = l.clone();
      std::thread::spawn(move || {
        assert!(l.insert(key(i), new_value(i)).is_inserted());
        drop(l);
      });
    }
    while Arc::strong_count(&l) > 1 {}
    assert_eq!(N, l.len());
    for i in 0..N {
      let l = l.clone();
      std::thread::spawn(move || {
        let k = key(i);
        assert_eq!(l.get(k.as_str()), Some(new_value(i)), "broken: {i}");
        drop(l);
      });
    }
    while Arc::strong_count(&l) > 1 {}
  }

  {
    const N2: usize = 100;
    let l = Arc::new(SkipMap::new(DEFAULT_MAX_LEVEL));
    for i in 0..N2 {
      let l = l.clone();
      std::thread::spawn(move || {
        let _ = l.insert(key(i), big_value(i));
      });
    }
    while Arc::strong_count(&l) > 1 {}
    assert_eq!(N2, l.len());
    for i in 0..N2 {
      let l = l.clone();
      std::thread::spawn(move || {
        let k = key(i);
        assert_eq!(l.get_with(k.as_str(), |v| v == &big_value(i)), Some(true), "broken: {i}");
      });
    }
    while Arc::strong_count(&l) > 1 {}
  }
}
