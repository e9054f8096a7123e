/// Only used for testing
pub fn key(i: usize) -> String {
  format!("{:05}", i)
}

/// Only used for testing
pub fn big_value(i: usize) -> String {
  format!("{:065536}", i)
}

/// Only used for testing
pub fn new_value(i: usize) -> String {
  format!("{:05}", i)
}
