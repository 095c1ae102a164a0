//! Loading engine configuration (timings + content overrides) from TOML.
//!
//! See `AppConfig`, `Timing` and `ContentCfg` for the expected schema. Every
//! field is optional; anything missing falls back to the built-in defaults.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Alert, Technique};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub timing: Timing,
  #[serde(default)]
  pub content: ContentCfg,
}

/// Every delay and interval the session clock uses, in milliseconds unless
/// the name says otherwise.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timing {
  /// Cadence of the per-connection tick loop.
  pub tick_ms: u64,
  pub assessment_calc_ms: u64,
  pub hydration_step_ml: u32,
  pub chat_delay_min_ms: u64,
  pub chat_delay_max_ms: u64,
  pub notification_interval_secs: u64,
  pub notification_ttl_ms: u64,
  pub bubble_round_secs: u32,
  pub bubble_points: u32,
  pub bubble_spawn_min_ms: u64,
  pub bubble_spawn_max_ms: u64,
  pub bubble_rise_min_ms: u64,
  pub bubble_rise_max_ms: u64,
  pub rhythm_phase_ms: u64,
  pub rhythm_feedback_ms: u64,
  pub rhythm_points_min: u32,
  pub rhythm_points_max: u32,
  pub memory_mismatch_ms: u64,
}

impl Default for Timing {
  fn default() -> Self {
    Self {
      tick_ms: 100,
      assessment_calc_ms: 2_000,
      hydration_step_ml: 250,
      chat_delay_min_ms: 1_500,
      chat_delay_max_ms: 2_500,
      notification_interval_secs: 60,
      notification_ttl_ms: 5_000,
      bubble_round_secs: 30,
      bubble_points: 10,
      bubble_spawn_min_ms: 600,
      bubble_spawn_max_ms: 800,
      bubble_rise_min_ms: 3_000,
      bubble_rise_max_ms: 5_000,
      rhythm_phase_ms: 4_000,
      rhythm_feedback_ms: 800,
      rhythm_points_min: 50,
      rhythm_points_max: 99,
      memory_mismatch_ms: 1_000,
    }
  }
}

impl Timing {
  pub fn tick(&self) -> Duration {
    Duration::from_millis(self.tick_ms.max(10))
  }

  pub fn notification_interval(&self) -> Duration {
    Duration::from_secs(self.notification_interval_secs)
  }

  pub fn notification_ttl(&self) -> Duration {
    Duration::from_millis(self.notification_ttl_ms)
  }
}

/// Content pools that may be replaced from TOML. Empty lists are ignored.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ContentCfg {
  #[serde(default)] pub tips: Vec<String>,
  #[serde(default)] pub coach_responses: Vec<String>,
  #[serde(default)] pub coach_greeting: Option<String>,
  #[serde(default)] pub alerts: Vec<Alert>,
  #[serde(default)] pub techniques: Vec<Technique>,
}

/// Parse configuration text. Errors carry the TOML diagnostic.
pub fn parse_config(s: &str) -> Result<AppConfig, String> {
  toml::from_str::<AppConfig>(s).map_err(|e| format!("Invalid config TOML: {e}"))
}

/// Attempt to load `AppConfig` from VITAFLOW_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("VITAFLOW_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "vitaflow_backend", %path, "Loaded engine config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "vitaflow_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "vitaflow_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::NotificationKind;

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse_config("").expect("empty config");
    assert_eq!(cfg.timing.notification_interval_secs, 60);
    assert_eq!(cfg.timing.bubble_round_secs, 30);
    assert!(cfg.content.tips.is_empty());
  }

  #[test]
  fn partial_timing_keeps_other_defaults() {
    let cfg = parse_config(
      r#"
        [timing]
        chat_delay_min_ms = 10
        chat_delay_max_ms = 20

        [content]
        tips = ["Sleep early."]

        [[content.alerts]]
        message = "Stand up!"
        kind = "alert"

        [[content.alerts]]
        message = "Drink water"
      "#,
    )
    .expect("config");
    assert_eq!(cfg.timing.chat_delay_min_ms, 10);
    assert_eq!(cfg.timing.memory_mismatch_ms, 1_000);
    assert_eq!(cfg.content.tips, vec!["Sleep early.".to_string()]);
    assert_eq!(cfg.content.alerts[0].kind, NotificationKind::Alert);
    assert_eq!(cfg.content.alerts[1].kind, NotificationKind::Info);
    assert!(cfg.content.techniques.is_empty());
  }

  #[test]
  fn techniques_can_be_supplied() {
    let cfg = parse_config(
      r#"
        [[content.techniques]]
        id = "calm"
        name = "Calm"
        phaseDurations = [5, 0, 5, 0]
      "#,
    )
    .expect("config");
    assert_eq!(cfg.content.techniques[0].phase_durations, [5, 0, 5, 0]);
    assert_eq!(cfg.content.techniques[0].subtitle, "");
  }

  #[test]
  fn malformed_config_is_an_error() {
    let err = parse_config("[timing]\ntick_ms = \"fast\"").unwrap_err();
    assert!(err.contains("Invalid config TOML"));
  }
}
