//! Breathing exercise timer.
//!
//! A running session ticks once per second. The phase for a tick is read off
//! the technique's cycle before the counter advances, so the first second of
//! a session is always the start of the first non-empty phase.

use std::time::Duration;

use serde::Serialize;

use crate::domain::Technique;

const SECOND: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum Phase {
  Ready,
  Inhale,
  Hold,
  Exhale,
  Sustain,
}

/// Phase at `timer` seconds into a session. `None` when the cycle is empty.
pub fn phase_at(durations: [u32; 4], timer: u64) -> Option<Phase> {
  let cycle: u64 = durations.iter().map(|d| *d as u64).sum();
  if cycle == 0 { return None; }
  let elapsed = timer % cycle;
  let [d0, d1, d2, _] = durations.map(|d| d as u64);
  Some(if elapsed < d0 {
    Phase::Inhale
  } else if elapsed < d0 + d1 {
    Phase::Hold
  } else if elapsed < d0 + d1 + d2 {
    Phase::Exhale
  } else {
    Phase::Sustain
  })
}

pub struct BreathingSession {
  technique: Technique,
  active: bool,
  phase: Phase,
  timer: u64,
  carry: Duration,
}

impl BreathingSession {
  pub fn new(technique: Technique) -> Self {
    Self { technique, active: false, phase: Phase::Ready, timer: 0, carry: Duration::ZERO }
  }

  #[cfg(test)]
  pub fn technique(&self) -> &Technique { &self.technique }
  #[cfg(test)]
  pub fn is_active(&self) -> bool { self.active }
  #[cfg(test)]
  pub fn phase(&self) -> Phase { self.phase }
  #[cfg(test)]
  pub fn timer(&self) -> u64 { self.timer }

  /// Seconds into the current cycle, as shown under the phase label.
  pub fn cycle_second(&self) -> u64 {
    match self.technique.cycle_length() {
      0 => 0,
      n => self.timer % n as u64,
    }
  }

  /// Begin/pause. Pausing always returns to `Ready` with the timer at zero.
  pub fn toggle(&mut self) {
    if self.active {
      self.stop();
    } else {
      self.active = true;
    }
  }

  fn stop(&mut self) {
    self.active = false;
    self.phase = Phase::Ready;
    self.timer = 0;
    self.carry = Duration::ZERO;
  }

  /// Replace the duration table; a running session is stopped first.
  pub fn select(&mut self, technique: Technique) {
    self.stop();
    self.technique = technique;
  }

  /// Advance by `elapsed`. Returns the phases entered, in order, each with
  /// the timer value at the second it was entered.
  pub fn tick(&mut self, elapsed: Duration) -> Vec<(Phase, u64)> {
    let mut entered = Vec::new();
    if !self.active { return entered; }
    self.carry += elapsed;
    while self.carry >= SECOND {
      self.carry -= SECOND;
      let Some(next) = phase_at(self.technique.phase_durations, self.timer) else { break };
      self.timer += 1;
      if next != self.phase {
        self.phase = next;
        entered.push((next, self.timer));
      }
    }
    entered
  }

  pub fn view(&self) -> BreathingView<'_> {
    BreathingView {
      technique: &self.technique,
      active: self.active,
      phase: self.phase,
      timer: self.timer,
      cycle_second: self.cycle_second(),
    }
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreathingView<'a> {
  pub technique: &'a Technique,
  pub active: bool,
  pub phase: Phase,
  pub timer: u64,
  pub cycle_second: u64,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::seed_techniques;

  fn technique(id: &str) -> Technique {
    seed_techniques().into_iter().find(|t| t.id == id).expect("technique")
  }

  #[test]
  fn box_breathing_timer_ten_is_exhale() {
    assert_eq!(phase_at([4, 4, 4, 4], 10), Some(Phase::Exhale));
    assert_eq!(phase_at([4, 4, 4, 4], 0), Some(Phase::Inhale));
    assert_eq!(phase_at([4, 4, 4, 4], 7), Some(Phase::Hold));
    assert_eq!(phase_at([4, 4, 4, 4], 15), Some(Phase::Sustain));
    assert_eq!(phase_at([4, 4, 4, 4], 16), Some(Phase::Inhale));
  }

  #[test]
  fn zero_width_phases_are_skipped() {
    let seen: Vec<Phase> = (0..8).filter_map(|t| phase_at([4, 0, 4, 0], t)).collect();
    assert!(!seen.contains(&Phase::Hold));
    assert!(!seen.contains(&Phase::Sustain));
    assert_eq!(phase_at([4, 7, 8, 0], 18), Some(Phase::Exhale));
    assert_eq!(phase_at([4, 7, 8, 0], 19), Some(Phase::Inhale));
    assert_eq!(phase_at([0, 0, 0, 0], 3), None);
  }

  #[test]
  fn ticks_walk_the_cycle() {
    let mut s = BreathingSession::new(technique("box"));
    assert!(s.tick(Duration::from_secs(3)).is_empty());
    s.toggle();
    assert_eq!(s.tick(Duration::from_millis(999)), vec![]);
    assert_eq!(s.tick(Duration::from_millis(1)), vec![(Phase::Inhale, 1)]);
    assert_eq!(s.tick(Duration::from_secs(4)), vec![(Phase::Hold, 5)]);
    assert_eq!(s.timer(), 5);
    assert_eq!(s.tick(Duration::from_secs(6)), vec![(Phase::Exhale, 9)]);
    assert_eq!(s.timer(), 11);
    assert_eq!(s.phase(), Phase::Exhale);
    assert_eq!(s.cycle_second(), 11);
  }

  #[test]
  fn pause_resets_and_resume_restarts() {
    let mut s = BreathingSession::new(technique("box"));
    s.toggle();
    s.tick(Duration::from_secs(9));
    s.toggle();
    assert_eq!(s.phase(), Phase::Ready);
    assert_eq!(s.timer(), 0);
    s.toggle();
    assert_eq!(s.tick(Duration::from_secs(1)), vec![(Phase::Inhale, 1)]);
    assert_eq!(s.timer(), 1);
  }

  #[test]
  fn long_tick_reports_each_phase_at_its_own_second() {
    let mut s = BreathingSession::new(technique("box"));
    s.toggle();
    assert_eq!(
      s.tick(Duration::from_secs(9)),
      vec![(Phase::Inhale, 1), (Phase::Hold, 5), (Phase::Exhale, 9)]
    );
    assert_eq!(s.timer(), 9);
  }

  #[test]
  fn switching_technique_deactivates() {
    let mut s = BreathingSession::new(technique("box"));
    s.toggle();
    s.tick(Duration::from_secs(6));
    s.select(technique("relax"));
    assert!(!s.is_active());
    assert_eq!(s.phase(), Phase::Ready);
    assert_eq!(s.timer(), 0);
    assert_eq!(s.technique().phase_durations, [4, 7, 8, 0]);
  }
}
