//! Test helpers: a replayable random source and one-time logger setup.

use std::sync::Once;

use crate::generator::RandomSource;

/// Replays a fixed sequence of draws, so a test can dictate the exact tree
/// shape and names a generation pass produces.
pub struct ScriptedSource {
  draws: std::vec::IntoIter<u64>,
}

impl ScriptedSource {
  pub fn new(draws: impl IntoIterator<Item = u64>) -> Self {
    Self {
      draws: draws.into_iter().collect::<Vec<_>>().into_iter(),
    }
  }
}

impl RandomSource for ScriptedSource {
  fn below(&mut self, bound: u64) -> u64 {
    let draw = self.draws.next().expect("scripted draws exhausted");
    assert!(draw < bound, "scripted draw {draw} not below bound {bound}");
    draw
  }
}

/// Initializes `env_logger` once across the whole test binary.
pub fn init_test_logger() {
  static INIT: Once = Once::new();
  INIT.call_once(|| {
    let _ = env_logger::builder().is_test(true).try_init();
  });
}
