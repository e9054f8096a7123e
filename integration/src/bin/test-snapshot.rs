use integration::{key, new_value};
use skipkv::*;

fn main() {
  const N: usize = 10_000;
  let dir = tempfile::tempdir().unwrap();
  let opts = Options::new()
    .with_max_level(18)
    .with_snapshot_path(dir.path().join("store").join("dumpFile"));

  let l = SkipMap::with_options(opts.clone());
  for i in 0..N {
    assert!(l.insert(key(i), new_value(i)).is_inserted());
  }
  for i in (0..N).step_by(2) {
    assert_eq!(l.remove(key(i).as_str()), Some(new_value(i)));
  }
  assert_eq!(l.dump().unwrap(), N / 2);

  let restored = SkipMap::<String, String>::with_options(opts);
  let report = restored.load().unwrap();
  assert_eq!(report.inserted(), N / 2);
  assert_eq!(report.duplicates(), 0);
  assert_eq!(report.malformed(), 0);
  for i in 0..N {
    let k = key(i);
    if i % 2 == 0 {
      assert!(!restored.contains_key(k.as_str()), "resurrected: {i}");
    } else {
      assert_eq!(restored.get(k.as_str()), Some(new_value(i)), "broken: {i}");
    }
  }

  // a second load only reports duplicates
  let report = restored.load().unwrap();
  assert_eq!(report.inserted(), 0);
  assert_eq!(report.duplicates(), N / 2);
}
