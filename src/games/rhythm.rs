//! Focus rhythm: a breathing cue flipping inhale/exhale on a fixed period,
//! with taps scoring a random amount. Taps never touch the cue.

use std::time::Duration;

use serde::Serialize;

use crate::config::Timing;
use crate::random::RandomSource;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
  Inhale,
  Exhale,
}

impl Cue {
  fn flipped(self) -> Self {
    match self {
      Cue::Inhale => Cue::Exhale,
      Cue::Exhale => Cue::Inhale,
    }
  }
}

pub struct RhythmGame {
  period: Duration,
  feedback_ttl: Duration,
  points: (u32, u32),
  cue: Cue,
  until_flip: Duration,
  score: u32,
  feedback: Option<(String, Duration)>,
}

impl RhythmGame {
  pub fn new(timing: &Timing) -> Self {
    let period = Duration::from_millis(timing.rhythm_phase_ms.max(1));
    Self {
      period,
      feedback_ttl: Duration::from_millis(timing.rhythm_feedback_ms),
      points: (timing.rhythm_points_min, timing.rhythm_points_max),
      cue: Cue::Inhale,
      until_flip: period,
      score: 0,
      feedback: None,
    }
  }

  #[cfg(test)]
  pub fn cue(&self) -> Cue { self.cue }
  #[cfg(test)]
  pub fn score(&self) -> u32 { self.score }
  pub fn feedback(&self) -> Option<&str> { self.feedback.as_ref().map(|(t, _)| t.as_str()) }

  /// Score a tap. A new tap replaces any feedback still on screen and
  /// restarts its display time.
  pub fn tap(&mut self, rng: &mut dyn RandomSource) -> u32 {
    let pts = rng.between_u32(self.points.0, self.points.1);
    self.score += pts;
    self.feedback = Some((format!("Perfect! +{pts}"), self.feedback_ttl));
    pts
  }

  /// Returns the cues entered during `elapsed`.
  pub fn tick(&mut self, elapsed: Duration) -> Vec<Cue> {
    let faded = match &mut self.feedback {
      Some((_, left)) => {
        *left = left.saturating_sub(elapsed);
        left.is_zero()
      }
      None => false,
    };
    if faded {
      self.feedback = None;
    }

    let mut entered = Vec::new();
    let mut remaining = elapsed;
    while remaining >= self.until_flip {
      remaining -= self.until_flip;
      self.until_flip = self.period;
      self.cue = self.cue.flipped();
      entered.push(self.cue);
    }
    self.until_flip -= remaining;
    entered
  }

  pub fn view(&self) -> RhythmView<'_> {
    RhythmView { cue: self.cue, score: self.score, feedback: self.feedback() }
  }
}

#[derive(Serialize)]
pub struct RhythmView<'a> {
  pub cue: Cue,
  pub score: u32,
  pub feedback: Option<&'a str>,
}
