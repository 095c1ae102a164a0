//! Journey view: ordered milestones with a completed/locked flag.

use serde::Serialize;

use crate::domain::Milestone;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JourneySummary {
  pub milestones: Vec<Milestone>,
  pub completed: usize,
  pub total: usize,
  /// Last completed milestone, in list order.
  pub current: Option<Milestone>,
  /// First milestone still locked.
  pub next: Option<Milestone>,
}

pub fn summarize(milestones: &[Milestone]) -> JourneySummary {
  JourneySummary {
    milestones: milestones.to_vec(),
    completed: milestones.iter().filter(|m| m.completed).count(),
    total: milestones.len(),
    current: milestones.iter().rev().find(|m| m.completed).cloned(),
    next: milestones.iter().find(|m| !m.completed).cloned(),
  }
}
