//! Dashboard view state: a local copy of the metrics fixture plus the two
//! demo widgets (water counter, mood slider) and the tip of the day.

use serde::Serialize;

use crate::domain::{MetricsSnapshot, Milestone};
use crate::random::RandomSource;

const DEFAULT_MOOD: u8 = 80;
const PREVIEW_MILESTONES: usize = 3;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoodBand {
  Great,
  Good,
  Okay,
  Low,
}

pub fn mood_band(value: u8) -> MoodBand {
  match value {
    76.. => MoodBand::Great,
    51..=75 => MoodBand::Good,
    26..=50 => MoodBand::Okay,
    _ => MoodBand::Low,
  }
}

/// Pick one tip uniformly; empty pools give an empty string.
pub fn pick_tip(tips: &[String], rng: &mut dyn RandomSource) -> String {
  if tips.is_empty() { return String::new(); }
  tips[rng.pick_index(tips.len())].clone()
}

pub struct Dashboard {
  metrics: MetricsSnapshot,
  step_ml: u32,
  hydration: u32,
  mood: u8,
  tip: String,
}

impl Dashboard {
  pub fn new(metrics: MetricsSnapshot, step_ml: u32, tips: &[String], rng: &mut dyn RandomSource) -> Self {
    let hydration = metrics.hydration.current.min(metrics.hydration.target);
    Self { metrics, step_ml, hydration, mood: DEFAULT_MOOD, tip: pick_tip(tips, rng) }
  }

  #[cfg(test)]
  pub fn hydration(&self) -> u32 { self.hydration }
  #[cfg(test)]
  pub fn mood(&self) -> u8 { self.mood }
  #[cfg(test)]
  pub fn tip(&self) -> &str { &self.tip }

  /// One glass; never past the daily target.
  pub fn add_water(&mut self) -> u32 {
    self.hydration = (self.hydration + self.step_ml).min(self.metrics.hydration.target);
    self.hydration
  }

  pub fn set_mood(&mut self, value: i64) -> u8 {
    self.mood = value.clamp(0, 100) as u8;
    self.mood
  }

  pub fn view(&self) -> DashboardView<'_> {
    let completed = self.metrics.milestones.iter().filter(|m| m.completed).count();
    DashboardView {
      metrics: &self.metrics,
      hydration: self.hydration,
      hydration_pct: percent(self.hydration, self.metrics.hydration.target),
      mood: self.mood,
      mood_band: mood_band(self.mood),
      tip: &self.tip,
      milestones_completed: completed,
      milestones_total: self.metrics.milestones.len(),
      milestone_preview: &self.metrics.milestones[..self.metrics.milestones.len().min(PREVIEW_MILESTONES)],
      detox_pct: percent(self.metrics.detox.days_left, self.metrics.detox.total),
    }
  }
}

fn percent(current: u32, target: u32) -> u32 {
  if target == 0 { return 0; }
  ((current as u64 * 100) / target as u64).min(100) as u32
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
  pub metrics: &'a MetricsSnapshot,
  pub hydration: u32,
  pub hydration_pct: u32,
  pub mood: u8,
  pub mood_band: MoodBand,
  pub tip: &'a str,
  pub milestones_completed: usize,
  pub milestones_total: usize,
  pub milestone_preview: &'a [Milestone],
  pub detox_pct: u32,
}
