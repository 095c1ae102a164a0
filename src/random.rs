//! Injectable randomness.
//!
//! Every random choice in the engine (tip of the day, coach reply, alert,
//! bubble attributes, card shuffle, rhythm points) draws from a `RandomSource`
//! owned by the session. Production uses `ThreadRandom` (StdRng seeded from
//! the OS); tests use `ScriptedRandom` to replay a fixed sequence.

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait RandomSource: Send {
  /// Uniform sample in `[0, 1)`.
  fn next_unit(&mut self) -> f64;

  /// Uniform index in `0..len`. `len` must be non-zero.
  fn pick_index(&mut self, len: usize) -> usize {
    let i = (self.next_unit() * len as f64) as usize;
    i.min(len.saturating_sub(1))
  }

  /// Uniform value in `[lo, hi)`.
  fn between(&mut self, lo: f64, hi: f64) -> f64 {
    lo + self.next_unit() * (hi - lo)
  }

  /// Uniform integer in `lo..=hi`.
  fn between_u32(&mut self, lo: u32, hi: u32) -> u32 {
    if hi <= lo { return lo; }
    let span = (hi - lo + 1) as f64;
    lo + ((self.next_unit() * span) as u32).min(hi - lo)
  }

  /// Uniform duration in `[lo_ms, hi_ms]`, millisecond granularity.
  fn between_ms(&mut self, lo_ms: u64, hi_ms: u64) -> Duration {
    if hi_ms <= lo_ms { return Duration::from_millis(lo_ms); }
    let ms = lo_ms + (self.next_unit() * (hi_ms - lo_ms) as f64).round() as u64;
    Duration::from_millis(ms.min(hi_ms))
  }
}

/// Fisher–Yates shuffle driven by a `RandomSource`.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
  for i in (1..items.len()).rev() {
    let j = rng.pick_index(i + 1);
    items.swap(i, j);
  }
}

pub struct ThreadRandom(StdRng);

impl ThreadRandom {
  pub fn new() -> Self {
    Self(StdRng::from_entropy())
  }
}

impl RandomSource for ThreadRandom {
  fn next_unit(&mut self) -> f64 {
    self.0.gen::<f64>()
  }
}

/// Replays `values` in order, wrapping around at the end.
#[cfg(test)]
pub struct ScriptedRandom {
  values: Vec<f64>,
  pos: usize,
}

#[cfg(test)]
impl ScriptedRandom {
  pub fn new(values: Vec<f64>) -> Self {
    assert!(!values.is_empty(), "scripted sequence must not be empty");
    Self { values, pos: 0 }
  }

  /// Always yields the same value.
  pub fn constant(v: f64) -> Self {
    Self::new(vec![v])
  }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
  fn next_unit(&mut self) -> f64 {
    let v = self.values[self.pos % self.values.len()];
    self.pos += 1;
    v
  }
}
