//! Toast notifications: a session-wide centre of self-expiring entries plus
//! the periodic alert scheduler that feeds it.

use std::time::Duration;

use serde::Serialize;

use crate::domain::{Alert, NotificationKind};
use crate::random::RandomSource;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Notification {
  pub id: u64,
  pub message: String,
  pub kind: NotificationKind,
  pub title: &'static str,
  #[serde(skip)]
  remaining: Duration,
}

#[derive(Default)]
pub struct NotificationCenter {
  active: Vec<Notification>,
  next_id: u64,
}

impl NotificationCenter {
  pub fn new() -> Self { Self::default() }

  pub fn active(&self) -> &[Notification] { &self.active }

  pub fn push(&mut self, message: &str, kind: NotificationKind, ttl: Duration) -> u64 {
    self.next_id += 1;
    let id = self.next_id;
    self.active.push(Notification {
      id,
      message: message.to_string(),
      kind,
      title: kind.title(),
      remaining: ttl,
    });
    id
  }

  /// Remove immediately. Unknown or already-expired ids are a no-op.
  pub fn dismiss(&mut self, id: u64) -> bool {
    let before = self.active.len();
    self.active.retain(|n| n.id != id);
    self.active.len() != before
  }

  /// Age every entry; returns the ids that expired.
  pub fn tick(&mut self, elapsed: Duration) -> Vec<u64> {
    let mut expired = Vec::new();
    self.active.retain_mut(|n| {
      n.remaining = n.remaining.saturating_sub(elapsed);
      if n.remaining.is_zero() {
        expired.push(n.id);
        false
      } else {
        true
      }
    });
    expired
  }
}

/// Fires one random alert per interval.
pub struct AlertScheduler {
  interval: Duration,
  until_next: Duration,
}

impl AlertScheduler {
  pub fn new(interval: Duration) -> Self {
    Self { interval, until_next: interval }
  }

  /// Alerts due during `elapsed`, picked from `pool`.
  pub fn tick(&mut self, elapsed: Duration, pool: &[Alert], rng: &mut dyn RandomSource) -> Vec<Alert> {
    let mut fired = Vec::new();
    if self.interval.is_zero() || pool.is_empty() { return fired; }
    let mut remaining = elapsed;
    while remaining >= self.until_next {
      remaining -= self.until_next;
      self.until_next = self.interval;
      fired.push(pool[rng.pick_index(pool.len())].clone());
    }
    self.until_next -= remaining;
    fired
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::random::ScriptedRandom;
  use crate::seeds::seed_alerts;

  #[test]
  fn notifications_expire_after_ttl() {
    let mut c = NotificationCenter::new();
    let a = c.push("drink water", NotificationKind::Info, Duration::from_secs(5));
    c.tick(Duration::from_secs(2));
    let b = c.push("stretch", NotificationKind::Success, Duration::from_secs(5));
    assert_eq!(c.tick(Duration::from_secs(3)), vec![a]);
    assert_eq!(c.active().len(), 1);
    assert_eq!(c.active()[0].id, b);
    assert_eq!(c.active()[0].title, "success");
  }

  #[test]
  fn dismissed_notification_never_reappears() {
    let mut c = NotificationCenter::new();
    let id = c.push("breathe", NotificationKind::Info, Duration::from_secs(5));
    assert_eq!(c.active()[0].title, "Reminder");
    c.tick(Duration::from_secs(1));
    assert!(c.dismiss(id));
    assert!(c.active().iter().all(|n| n.id != id));
    assert!(c.tick(Duration::from_secs(10)).is_empty());
    assert!(c.active().is_empty());
    assert!(!c.dismiss(id));
  }

  #[test]
  fn scheduler_fires_once_per_interval() {
    let pool = seed_alerts();
    let mut s = AlertScheduler::new(Duration::from_secs(60));
    let mut rng = ScriptedRandom::new(vec![0.0, 0.3]);
    assert!(s.tick(Duration::from_secs(59), &pool, &mut rng).is_empty());
    let fired = s.tick(Duration::from_secs(1), &pool, &mut rng);
    assert_eq!(fired, vec![pool[0].clone()]);
    let fired = s.tick(Duration::from_secs(120), &pool, &mut rng);
    assert_eq!(fired, vec![pool[1].clone(), pool[0].clone()]);
  }
}
