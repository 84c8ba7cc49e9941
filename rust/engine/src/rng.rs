//! Deterministic pseudo-random generator shared by every peer.
//!
//! A 31-bit linear congruential generator. It is fast and reproducible, not
//! unpredictable: every peer must derive the same deal from the same seed,
//! so the arithmetic below is part of the wire contract and must not change.

/// Seed identifying one deterministic deal sequence.
pub type Seed = u32;

const MULTIPLIER: f64 = 1_103_515_245.0;
const INCREMENT: f64 = 12_345.0;
const MASK: u64 = 0x7fff_ffff;

/// Seeded linear congruential generator.
///
/// # Examples
///
/// ```
/// use cardtable_engine::rng::SeededRng;
///
/// let mut a = SeededRng::new(42);
/// let mut b = SeededRng::new(42);
/// assert_eq!(a.next_f64(), b.next_f64());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: Seed) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    /// Advances the generator and returns the raw 31-bit state.
    ///
    /// The step is carried out in `f64`, rounding the product exactly as a
    /// double-precision peer does once it passes 2^53. The result is always
    /// a non-negative integer below 2^64, so its low 31 bits are the masked
    /// state.
    pub fn next_state(&mut self) -> u32 {
        let p = self.state as f64 * MULTIPLIER + INCREMENT;
        self.state = (p as u64) & MASK;
        self.state as u32
    }

    /// Next value in `[0, 1]`; `1.0` only when the state is all ones.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_state()) / MASK as f64
    }

    /// Index in `0..len`, clamped so a draw of exactly `1.0` stays in range.
    fn index_below(&mut self, len: usize) -> usize {
        let j = (self.next_f64() * len as f64).floor() as usize;
        j.min(len.saturating_sub(1))
    }

    /// Fisher-Yates pass from the last index down to 1.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index_below(i + 1);
            items.swap(i, j);
        }
    }

    /// Shuffled copy of `items`, leaving the input untouched.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut v = items.to_vec();
        self.shuffle(&mut v);
        v
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let j = self.index_below(items.len());
        items.get(j)
    }

    /// Integer in `min..=max`.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i64;
        (min + offset).min(max)
    }
}
