//! Mini-games. Only one is mounted at a time; `ActiveGame` owns it.

use std::time::Duration;

use serde::Serialize;

use crate::config::Timing;
use crate::domain::GameKind;
use crate::random::RandomSource;

pub mod bubble;
pub mod memory;
pub mod rhythm;

use bubble::{BubbleGame, BubbleView};
use memory::{MemoryGame, MemoryView};
use rhythm::{RhythmGame, RhythmView};

pub enum ActiveGame {
  Bubble(BubbleGame),
  Rhythm(RhythmGame),
  Memory(MemoryGame),
}

impl ActiveGame {
  pub fn open(kind: GameKind, timing: &Timing, symbols: &[String], rng: &mut dyn RandomSource) -> Self {
    match kind {
      GameKind::Bubble => ActiveGame::Bubble(BubbleGame::new(timing, rng)),
      GameKind::Rhythm => ActiveGame::Rhythm(RhythmGame::new(timing)),
      GameKind::Memory => ActiveGame::Memory(MemoryGame::new(
        symbols.to_vec(),
        Duration::from_millis(timing.memory_mismatch_ms),
        rng,
      )),
    }
  }

  pub fn kind(&self) -> GameKind {
    match self {
      ActiveGame::Bubble(_) => GameKind::Bubble,
      ActiveGame::Rhythm(_) => GameKind::Rhythm,
      ActiveGame::Memory(_) => GameKind::Memory,
    }
  }

  pub fn view(&self) -> GameView<'_> {
    match self {
      ActiveGame::Bubble(g) => GameView::Bubble(g.view()),
      ActiveGame::Rhythm(g) => GameView::Rhythm(g.view()),
      ActiveGame::Memory(g) => GameView::Memory(g.view()),
    }
  }
}

#[derive(Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameView<'a> {
  Bubble(BubbleView<'a>),
  Rhythm(RhythmView<'a>),
  Memory(MemoryView<'a>),
}
