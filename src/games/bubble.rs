//! Bubble pop: timed round, random spawns, pop-to-score.

use std::time::Duration;

use serde::Serialize;

use crate::config::Timing;
use crate::random::RandomSource;

const SECOND: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BubbleColor {
  Cyan,
  Purple,
  Pink,
  Emerald,
}

const COLORS: [BubbleColor; 4] = [BubbleColor::Cyan, BubbleColor::Purple, BubbleColor::Pink, BubbleColor::Emerald];

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bubble {
  pub id: u64,
  /// Percent of the play field width, 10–90.
  pub x: f64,
  /// Diameter in pixels, 40–80.
  pub size: f64,
  pub rise_secs: f64,
  pub color: BubbleColor,
  #[serde(skip)]
  age: Duration,
  #[serde(skip)]
  rise: Duration,
}

/// Things the front end should hear about between commands.
#[derive(Clone, Debug, PartialEq)]
pub enum BubbleEvent {
  Spawned(u64),
  Expired(u64),
  GameOver { score: u32 },
}

pub struct BubbleGame {
  round_secs: u32,
  points: u32,
  spawn_ms: (u64, u64),
  rise_ms: (u64, u64),
  bubbles: Vec<Bubble>,
  score: u32,
  time_left: u32,
  game_over: bool,
  next_id: u64,
  until_second: Duration,
  until_spawn: Duration,
}

impl BubbleGame {
  pub fn new(timing: &Timing, rng: &mut dyn RandomSource) -> Self {
    let mut g = Self {
      round_secs: timing.bubble_round_secs,
      points: timing.bubble_points,
      spawn_ms: (timing.bubble_spawn_min_ms, timing.bubble_spawn_max_ms),
      rise_ms: (timing.bubble_rise_min_ms, timing.bubble_rise_max_ms),
      bubbles: Vec::new(),
      score: 0,
      time_left: 0,
      game_over: false,
      next_id: 1,
      until_second: SECOND,
      until_spawn: Duration::ZERO,
    };
    g.restart(rng);
    g
  }

  #[cfg(test)]
  pub fn score(&self) -> u32 { self.score }
  #[cfg(test)]
  pub fn time_left(&self) -> u32 { self.time_left }
  #[cfg(test)]
  pub fn is_over(&self) -> bool { self.game_over }
  #[cfg(test)]
  pub fn bubbles(&self) -> &[Bubble] { &self.bubbles }

  pub fn restart(&mut self, rng: &mut dyn RandomSource) {
    self.bubbles.clear();
    self.score = 0;
    self.time_left = self.round_secs;
    self.game_over = self.round_secs == 0;
    self.until_second = SECOND;
    self.until_spawn = self.spawn_interval(rng);
  }

  fn spawn_interval(&self, rng: &mut dyn RandomSource) -> Duration {
    rng.between_ms(self.spawn_ms.0, self.spawn_ms.1).max(Duration::from_millis(1))
  }

  /// Remove bubble `id` and score it. Unknown ids and pops after the round
  /// ended change nothing.
  pub fn pop(&mut self, id: u64) -> bool {
    if self.game_over { return false; }
    let before = self.bubbles.len();
    self.bubbles.retain(|b| b.id != id);
    if self.bubbles.len() == before { return false; }
    self.score += self.points;
    true
  }

  fn spawn(&mut self, rng: &mut dyn RandomSource) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    let rise = rng.between_ms(self.rise_ms.0, self.rise_ms.1);
    self.bubbles.push(Bubble {
      id,
      x: rng.between(10.0, 90.0),
      size: rng.between(40.0, 80.0),
      rise_secs: rise.as_secs_f64(),
      color: COLORS[rng.pick_index(COLORS.len())],
      age: Duration::ZERO,
      rise,
    });
    id
  }

  /// Advance the round clock. Countdown, spawns and rise expiry are
  /// interleaved in time order within `elapsed`.
  pub fn tick(&mut self, elapsed: Duration, rng: &mut dyn RandomSource) -> Vec<BubbleEvent> {
    let mut events = Vec::new();
    let mut remaining = elapsed;

    while !self.game_over && !remaining.is_zero() {
      let next_expiry = self.bubbles.iter().map(|b| b.rise.saturating_sub(b.age)).min();
      let mut step = remaining.min(self.until_second).min(self.until_spawn);
      if let Some(e) = next_expiry {
        if !e.is_zero() { step = step.min(e); }
      }

      remaining -= step;
      self.until_second -= step;
      self.until_spawn -= step;
      for b in &mut self.bubbles {
        b.age += step;
      }
      let mut expired = Vec::new();
      self.bubbles.retain(|b| {
        let done = b.age >= b.rise;
        if done { expired.push(b.id); }
        !done
      });
      events.extend(expired.into_iter().map(BubbleEvent::Expired));

      if self.until_second.is_zero() {
        self.until_second = SECOND;
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
          self.game_over = true;
          self.bubbles.clear();
          events.push(BubbleEvent::GameOver { score: self.score });
          break;
        }
      }

      if self.until_spawn.is_zero() {
        let id = self.spawn(rng);
        events.push(BubbleEvent::Spawned(id));
        self.until_spawn = self.spawn_interval(rng);
      }
    }
    events
  }

  pub fn view(&self) -> BubbleView<'_> {
    BubbleView {
      score: self.score,
      time_left: self.time_left,
      game_over: self.game_over,
      bubbles: &self.bubbles,
    }
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleView<'a> {
  pub score: u32,
  pub time_left: u32,
  pub game_over: bool,
  pub bubbles: &'a [Bubble],
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::random::ScriptedRandom;

  fn game(rng: &mut ScriptedRandom) -> BubbleGame {
    BubbleGame::new(&Timing::default(), rng)
  }

  #[test]
  fn spawns_on_interval_and_expires_after_rise() {
    // 0.0 everywhere: spawn every 600ms, rise 3s
    let mut rng = ScriptedRandom::constant(0.0);
    let mut g = game(&mut rng);
    let ev = g.tick(Duration::from_millis(600), &mut rng);
    assert_eq!(ev, vec![BubbleEvent::Spawned(1)]);
    assert_eq!(g.bubbles().len(), 1);
    assert_eq!(g.bubbles()[0].x, 10.0);
    assert_eq!(g.bubbles()[0].color, BubbleColor::Cyan);

    let ev = g.tick(Duration::from_millis(3_000), &mut rng);
    assert!(ev.contains(&BubbleEvent::Expired(1)));
    assert!(g.bubbles().iter().all(|b| b.id != 1));
  }

  #[test]
  fn pop_scores_once() {
    let mut rng = ScriptedRandom::constant(0.0);
    let mut g = game(&mut rng);
    g.tick(Duration::from_millis(1_200), &mut rng);
    assert_eq!(g.bubbles().len(), 2);
    assert!(g.pop(1));
    assert!(!g.pop(1));
    assert!(!g.pop(99));
    assert_eq!(g.score(), 10);
    assert_eq!(g.bubbles().len(), 1);
  }

  #[test]
  fn round_ends_after_thirty_seconds() {
    let mut rng = ScriptedRandom::constant(0.5);
    let mut g = game(&mut rng);
    for _ in 0..29 {
      g.tick(Duration::from_secs(1), &mut rng);
    }
    assert!(!g.is_over());
    assert_eq!(g.time_left(), 1);
    let live = g.bubbles().first().map(|b| b.id).expect("a bubble");

    let ev = g.tick(Duration::from_secs(1), &mut rng);
    assert!(g.is_over());
    assert_eq!(g.time_left(), 0);
    assert!(matches!(ev.last(), Some(BubbleEvent::GameOver { .. })));
    assert!(g.bubbles().is_empty());

    let score = g.score();
    assert!(!g.pop(live));
    assert!(g.tick(Duration::from_secs(5), &mut rng).is_empty());
    assert_eq!(g.score(), score);
  }

  #[test]
  fn restart_resets_round() {
    let mut rng = ScriptedRandom::constant(0.0);
    let mut g = game(&mut rng);
    g.tick(Duration::from_millis(700), &mut rng);
    g.pop(1);
    g.tick(Duration::from_secs(40), &mut rng);
    assert!(g.is_over());
    g.restart(&mut rng);
    assert!(!g.is_over());
    assert_eq!(g.score(), 0);
    assert_eq!(g.time_left(), 30);
    assert!(g.bubbles().is_empty());
  }
}
