//! Memory pairs: a shuffled deck of symbol pairs, two flips per move.

use std::time::Duration;

use serde::Serialize;

use crate::random::{shuffle, RandomSource};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCard {
  pub id: usize,
  pub symbol: String,
  pub face_up: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
  Ignored,
  Revealed,
  Matched,
  Mismatched,
}

pub struct MemoryGame {
  symbols: Vec<String>,
  mismatch_delay: Duration,
  cards: Vec<MemoryCard>,
  flipped: Vec<usize>,
  solved: Vec<usize>,
  moves: u32,
  flip_back_in: Option<Duration>,
}

impl MemoryGame {
  pub fn new(symbols: Vec<String>, mismatch_delay: Duration, rng: &mut dyn RandomSource) -> Self {
    let mut g = Self {
      symbols,
      mismatch_delay,
      cards: Vec::new(),
      flipped: Vec::new(),
      solved: Vec::new(),
      moves: 0,
      flip_back_in: None,
    };
    g.new_game(rng);
    g
  }

  #[cfg(test)]
  pub fn cards(&self) -> &[MemoryCard] { &self.cards }
  #[cfg(test)]
  pub fn flipped(&self) -> &[usize] { &self.flipped }
  #[cfg(test)]
  pub fn solved(&self) -> &[usize] { &self.solved }
  #[cfg(test)]
  pub fn moves(&self) -> u32 { self.moves }

  pub fn is_won(&self) -> bool {
    !self.cards.is_empty() && self.solved.len() == self.cards.len()
  }

  /// Reshuffle the deck and reset moves.
  pub fn new_game(&mut self, rng: &mut dyn RandomSource) {
    let mut deck = self.symbols.clone();
    shuffle(rng, &mut deck);
    self.cards = deck
      .into_iter()
      .enumerate()
      .map(|(id, symbol)| MemoryCard { id, symbol, face_up: false })
      .collect();
    self.flipped.clear();
    self.solved.clear();
    self.moves = 0;
    self.flip_back_in = None;
  }

  pub fn flip(&mut self, index: usize) -> FlipOutcome {
    if index >= self.cards.len()
      || self.flipped.len() == 2
      || self.flipped.contains(&index)
      || self.solved.contains(&index)
    {
      return FlipOutcome::Ignored;
    }

    self.cards[index].face_up = true;
    self.flipped.push(index);
    if self.flipped.len() < 2 {
      return FlipOutcome::Revealed;
    }

    self.moves += 1;
    let (a, b) = (self.flipped[0], self.flipped[1]);
    if self.cards[a].symbol == self.cards[b].symbol {
      self.solved.extend([a, b]);
      self.flipped.clear();
      FlipOutcome::Matched
    } else {
      self.flip_back_in = Some(self.mismatch_delay);
      FlipOutcome::Mismatched
    }
  }

  /// Runs the mismatch delay. Returns the indices turned face down, if any.
  pub fn tick(&mut self, elapsed: Duration) -> Option<Vec<usize>> {
    let left = self.flip_back_in?.saturating_sub(elapsed);
    if !left.is_zero() {
      self.flip_back_in = Some(left);
      return None;
    }
    self.flip_back_in = None;
    let turned: Vec<usize> = self.flipped.drain(..).collect();
    for i in &turned {
      self.cards[*i].face_up = false;
    }
    Some(turned)
  }

  pub fn view(&self) -> MemoryView<'_> {
    MemoryView {
      cards: &self.cards,
      flipped: &self.flipped,
      solved: &self.solved,
      moves: self.moves,
      won: self.is_won(),
    }
  }
}

#[derive(Serialize)]
pub struct MemoryView<'a> {
  pub cards: &'a [MemoryCard],
  pub flipped: &'a [usize],
  pub solved: &'a [usize],
  pub moves: u32,
  pub won: bool,
}
