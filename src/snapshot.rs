use core::{fmt::Display, str::FromStr};
use std::{
  ffi::OsString,
  fs::{self, File},
  io::{BufRead, BufReader, BufWriter, Write},
  path::{Path, PathBuf},
};

use super::{level::LevelGenerator, list::InsertOutcome, PersistenceError, SkipList};


/// Separates the key from the value on a snapshot line.
pub const DELIMITER: char = ':';

/// What a snapshot load did with each line it read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadReport {
  inserted: usize,
  duplicates: usize,
  malformed: usize,
}

impl LoadReport {
  /// Returns the number of records that created a new entry.
  #[inline]
  pub const fn inserted(&self) -> usize {
    self.inserted
  }

  /// Returns the number of well-formed records whose key was already present.
  #[inline]
  pub const fn duplicates(&self) -> usize {
    self.duplicates
  }

  /// Returns the number of lines that were skipped because they could not be parsed.
  #[inline]
  pub const fn malformed(&self) -> usize {
    self.malformed
  }
}

/// Splits a snapshot line at its first delimiter.
///
/// Returns `None` when the line has no delimiter or either side is empty.
fn split_record(line: &str) -> Option<(&str, &str)> {
  let (key, value) = line.split_once(DELIMITER)?;
  if key.is_empty() || value.is_empty() {
    return None;
  }
  Some((key, value))
}

fn check_record(record: usize, key: &str, value: &str) -> Result<(), PersistenceError> {
  let reason = if key.is_empty() {
    "key is empty"
  } else if key.contains(DELIMITER) {
    "key contains the delimiter"
  } else if key.contains(['\n', '\r']) {
    "key contains a line break"
  } else if value.is_empty() {
    "value is empty"
  } else if value.contains(['\n', '\r']) {
    "value contains a line break"
  } else {
    return Ok(());
  };
  Err(PersistenceError::InvalidRecord { record, reason })
}

/// `<path>.tmp`, next to the snapshot so the final rename stays on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(".tmp");
  PathBuf::from(name)
}

fn remove_staging(path: &Path) {
  if let Err(_e) = fs::remove_file(path) {
    #[cfg(feature = "tracing")]
    tracing::warn!(path = %path.display(), err = %_e, "failed to remove snapshot staging file");
  }
}

impl<K: Display, V: Display, G> SkipList<K, V, G> {
  /// Fails on the first entry that cannot be encoded, before anything is written.
  fn check_records(&self) -> Result<(), PersistenceError> {
    self.iter().enumerate().try_for_each(|(idx, ent)| {
      check_record(idx + 1, &ent.key().to_string(), &ent.value().to_string())
    })
  }

  fn write_records<W: Write>(&self, writer: &mut W) -> Result<usize, PersistenceError> {
    let mut written = 0;
    for ent in self.iter() {
      written += 1;
      let key = ent.key().to_string();
      let value = ent.value().to_string();
      check_record(written, &key, &value)?;
      writeln!(writer, "{key}{DELIMITER}{value}").map_err(PersistenceError::WriteFailed)?;
    }
    Ok(written)
  }

  /// Writes every entry to `writer` as a `<key>:<value>` line, in ascending key order.
  ///
  /// Returns the number of lines written.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::SkipList;
  ///
  /// let mut l = SkipList::new(6);
  /// let _ = l.insert(7, "C");
  /// let _ = l.insert(1, "A");
  ///
  /// let mut buf = Vec::new();
  /// assert_eq!(l.dump_to(&mut buf).unwrap(), 2);
  /// assert_eq!(buf, b"1:A\n7:C\n");
  /// ```
  pub fn dump_to<W: Write>(&self, writer: W) -> Result<usize, PersistenceError> {
    let mut writer = BufWriter::new(writer);
    let written = self.write_records(&mut writer)?;
    writer.flush().map_err(PersistenceError::WriteFailed)?;
    Ok(written)
  }

  /// Writes the snapshot to the file at `path`, creating its parent directory if needed.
  ///
  /// Every entry is checked before the file is opened, so an entry that cannot be
  /// encoded fails the dump with [`PersistenceError::InvalidRecord`] and leaves an
  /// existing snapshot untouched.
  ///
  /// With `atomic`, the lines go to `<path>.tmp` first, which is synced and then renamed
  /// over `path`; an existing snapshot is left intact if anything fails. Without it,
  /// `path` is truncated and written in place, so an I/O failure part way through leaves
  /// a partial file.
  pub fn dump_file(&self, path: impl AsRef<Path>, atomic: bool) -> Result<usize, PersistenceError> {
    let path = path.as_ref();
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), entries = self.len(), atomic, "dumping snapshot");

    // an unencodable entry must not truncate the previous snapshot
    self.check_records()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(PersistenceError::open_failed(parent))?;
    }

    let target = if atomic { staging_path(path) } else { path.to_path_buf() };
    let file = File::create(&target).map_err(PersistenceError::open_failed(&target))?;

    let res = self.write_synced(file).and_then(|written| {
      if atomic {
        fs::rename(&target, path).map_err(PersistenceError::WriteFailed)?;
      }
      Ok(written)
    });

    match res {
      Ok(written) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), written, "snapshot dumped");
        Ok(written)
      }
      Err(e) => {
        if atomic {
          remove_staging(&target);
        }
        Err(e)
      }
    }
  }

  fn write_synced(&self, file: File) -> Result<usize, PersistenceError> {
    let mut writer = BufWriter::new(file);
    let written = self.write_records(&mut writer)?;
    let file = writer
      .into_inner()
      .map_err(|e| PersistenceError::WriteFailed(e.into_error()))?;
    file.sync_all().map_err(PersistenceError::WriteFailed)?;
    Ok(written)
  }
}

impl<K, V, G> SkipList<K, V, G>
where
  K: Ord + FromStr,
  V: FromStr,
  G: LevelGenerator,
{
  /// Inserts every well-formed `<key>:<value>` line of `reader`.
  ///
  /// Lines are split at their first delimiter, so values may contain it but keys may
  /// not. A line without a delimiter, with an empty side, or with a side that fails to
  /// parse is skipped. Keys already present keep their current value, so loading the same
  /// snapshot twice is harmless.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::SkipList;
  ///
  /// let mut l = SkipList::<u32, String>::new(6);
  /// let report = l.load_from("1:A\ngarbage\n7:C:D\n".as_bytes()).unwrap();
  /// assert_eq!(report.inserted(), 2);
  /// assert_eq!(report.malformed(), 1);
  /// assert_eq!(l.get(&7).map(String::as_str), Some("C:D"));
  /// ```
  pub fn load_from<R: BufRead>(&mut self, reader: R) -> Result<LoadReport, PersistenceError> {
    let mut report = LoadReport::default();
    for (_idx, line) in reader.lines().enumerate() {
      let line = line.map_err(PersistenceError::ReadFailed)?;
      let line = line.strip_suffix('\r').unwrap_or(&line);

      let parsed = split_record(line)
        .and_then(|(key, value)| Some((key.parse::<K>().ok()?, value.parse::<V>().ok()?)));
      let Some((key, value)) = parsed else {
        #[cfg(feature = "tracing")]
        tracing::warn!(line = _idx + 1, "skipping malformed snapshot record");
        report.malformed += 1;
        continue;
      };

      match self.insert(key, value) {
        InsertOutcome::Inserted => report.inserted += 1,
        InsertOutcome::AlreadyExists => report.duplicates += 1,
      }
    }
    Ok(report)
  }

  /// Loads the snapshot file at `path`. See [`load_from`](Self::load_from).
  pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, PersistenceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(PersistenceError::open_failed(path))?;
    let report = self.load_from(BufReader::new(file))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
      path = %path.display(),
      inserted = report.inserted,
      duplicates = report.duplicates,
      malformed = report.malformed,
      "snapshot loaded"
    );
    Ok(report)
  }
}
