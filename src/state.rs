//! Application state: content catalogue, timings and the live-session registry.
//!
//! This module owns:
//!   - `Content`: built-in seeds with optional TOML overrides applied
//!   - the `Timing` table every session clock reads
//!   - a registry of connected sessions (id -> page last seen), for health
//!
//! Session state itself is never shared: each connection owns its `Session`.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::config::{load_config_from_env, AppConfig, Timing};
use crate::domain::{Alert, MetricsSnapshot, Page, Question, Technique};
use crate::random::ThreadRandom;
use crate::seeds::{
    memory_symbols, seed_alerts, seed_coach_responses, seed_metrics, seed_questions,
    seed_techniques, seed_tips, COACH_GREETING,
};
use crate::session::Session;

/// Read-only catalogue shared by every session.
#[derive(Clone, Debug)]
pub struct Content {
    pub questions: Arc<Vec<Question>>,
    pub techniques: Vec<Technique>,
    pub metrics: MetricsSnapshot,
    pub tips: Vec<String>,
    pub coach_greeting: String,
    pub coach_responses: Arc<Vec<String>>,
    pub alerts: Vec<Alert>,
    pub memory_symbols: Vec<String>,
}

impl Content {
    #[cfg(test)]
    pub fn builtin() -> Self {
        Self::from_config(&AppConfig::default())
    }

    /// Seeds, with any non-empty content pool from `cfg` replacing its seed.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let c = &cfg.content;
        let tips = if c.tips.is_empty() { seed_tips() } else { c.tips.clone() };
        let coach_responses = if c.coach_responses.is_empty() {
            seed_coach_responses()
        } else {
            c.coach_responses.clone()
        };
        let alerts = if c.alerts.is_empty() { seed_alerts() } else { c.alerts.clone() };
        let coach_greeting = c
            .coach_greeting
            .clone()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| COACH_GREETING.to_string());

        let configured = if c.techniques.is_empty() { seed_techniques() } else { c.techniques.clone() };
        let mut techniques: Vec<Technique> = configured
            .into_iter()
            .filter(|t| {
                let ok = t.cycle_length() > 0;
                if !ok {
                    warn!(target: "vitaflow_backend", id = %t.id, "Skipping technique with an empty cycle");
                }
                ok
            })
            .collect();
        if techniques.is_empty() {
            warn!(target: "vitaflow_backend", "No usable breathing technique configured; using built-ins");
            techniques = seed_techniques();
        }

        Self {
            questions: Arc::new(seed_questions()),
            techniques,
            metrics: seed_metrics(),
            tips,
            coach_greeting,
            coach_responses: Arc::new(coach_responses),
            alerts,
            memory_symbols: memory_symbols().into_iter().map(String::from).collect(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<Content>,
    pub timing: Arc<Timing>,
    pub sessions: Arc<RwLock<HashMap<String, Page>>>,
}

impl AppState {
    /// Build state from env: load config, apply content overrides.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_config_from_env().unwrap_or_default();
        let state = Self::from_config(&cfg);
        info!(
            target: "vitaflow_backend",
            questions = state.content.questions.len(),
            techniques = state.content.techniques.len(),
            tips = state.content.tips.len(),
            coach_responses = state.content.coach_responses.len(),
            alerts = state.content.alerts.len(),
            tick_ms = state.timing.tick_ms,
            "Content catalogue ready"
        );
        state
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            content: Arc::new(Content::from_config(cfg)),
            timing: Arc::new(cfg.timing.clone()),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a fresh session and register it.
    #[instrument(level = "info", skip(self))]
    pub async fn open_session(&self) -> Session {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), Page::Home);
        info!(target: "session", %id, "Session opened");
        Session::new(id, self.timing.clone(), self.content.clone(), Box::new(ThreadRandom::new()))
    }

    /// Record the page a session is on.
    #[instrument(level = "debug", skip(self))]
    pub async fn touch_session(&self, id: &str, page: Page) {
        if let Some(p) = self.sessions.write().await.get_mut(id) {
            *p = page;
        }
    }

    #[instrument(level = "info", skip(self))]
    pub async fn close_session(&self, id: &str) {
        self.sessions.write().await.remove(id);
        info!(target: "session", %id, "Session closed");
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
