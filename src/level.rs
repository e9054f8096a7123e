use rand::{rngs::StdRng, Rng, SeedableRng};

/// Picks the level of a newly inserted node.
///
/// Implementations must return a value in `0..=max_level`. The list calls this once per
/// successful insert, always while it holds exclusive access to the list.
pub trait LevelGenerator {
  /// Returns the level for a new node, never greater than `max_level`.
  fn random_level(&mut self, max_level: usize) -> usize;
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for &mut G {
  #[inline]
  fn random_level(&mut self, max_level: usize) -> usize {
    (**self).random_level(max_level)
  }
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for Box<G> {
  #[inline]
  fn random_level(&mut self, max_level: usize) -> usize {
    (**self).random_level(max_level)
  }
}

/// The default [`LevelGenerator`]: flips a fair coin until it comes up tails.
///
/// Levels start at `1` and grow by one for every head, so `P(level >= k) = 2^-(k-1)`,
/// capped at `max_level`.
///
/// The generator always owns an explicitly seeded RNG. Use [`CoinFlip::seeded`] for
/// reproducible layouts, [`CoinFlip::from_os_rng`] to seed from the operating system, or
/// [`CoinFlip::new`] to inject any other [`Rng`].
#[derive(Debug, Clone)]
pub struct CoinFlip<R = StdRng> {
  rng: R,
}

impl CoinFlip {
  /// Creates a generator whose sequence of levels is fully determined by `seed`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skipkv::{CoinFlip, LevelGenerator};
  ///
  /// let mut a = CoinFlip::seeded(7);
  /// let mut b = CoinFlip::seeded(7);
  /// for _ in 0..100 {
  ///   assert_eq!(a.random_level(16), b.random_level(16));
  /// }
  /// ```
  #[inline]
  pub fn seeded(seed: u64) -> Self {
    Self::new(StdRng::seed_from_u64(seed))
  }

  /// Creates a generator seeded from the operating system's entropy source.
  #[inline]
  pub fn from_os_rng() -> Self {
    Self::new(StdRng::from_os_rng())
  }
}

impl<R: Rng> CoinFlip<R> {
  /// Creates a generator that draws its coin flips from `rng`.
  #[inline]
  pub const fn new(rng: R) -> Self {
    Self { rng }
  }

  /// Consumes the generator, returning the underlying RNG.
  #[inline]
  pub fn into_inner(self) -> R {
    self.rng
  }
}

impl<R: Rng> LevelGenerator for CoinFlip<R> {
  fn random_level(&mut self, max_level: usize) -> usize {
    let mut level = 1;
    while level < max_level && self.rng.random_bool(0.5) {
      level += 1;
    }
    level.min(max_level)
  }
}
