//! Session: the root-scoped state store owned by one client connection.
//!
//! This module owns:
//!   - the mounted page's state machine (assessment, dashboard, breathing, game)
//!   - the session-wide coach chat and notification centre
//!   - the periodic alert scheduler
//!   - the injected random source
//!
//! Navigating away from a page drops its state machine, which is what stops
//! its timers. Everything advances through `tick(elapsed)`; the caller decides
//! where time comes from (tokio interval in the service, a manual clock in
//! tests).

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::assessment::{Assessment, AssessmentView, SelectOutcome};
use crate::breathing::{BreathingSession, BreathingView, Phase};
use crate::coach::{ChatView, CoachChat};
use crate::config::Timing;
use crate::dashboard::{Dashboard, DashboardView};
use crate::domain::{AssessmentResult, ChatMessage, GameKind, Page};
use crate::games::bubble::BubbleEvent;
use crate::games::memory::FlipOutcome;
use crate::games::rhythm::Cue;
use crate::games::{ActiveGame, GameView};
use crate::journey::{summarize, JourneySummary};
use crate::notifications::{AlertScheduler, Notification, NotificationCenter};
use crate::random::RandomSource;
use crate::state::Content;

/// Changes produced by the clock rather than by a command.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
  AssessmentComplete { result: AssessmentResult },
  BreathingPhase { phase: Phase, timer: u64 },
  BubbleSpawned { id: u64 },
  BubbleExpired { id: u64 },
  BubbleGameOver { score: u32 },
  RhythmCue { cue: Cue },
  MemoryFlippedBack { indices: Vec<usize> },
  ChatReply { message: ChatMessage },
  NotificationAdded { notification: Notification },
  NotificationExpired { id: u64 },
}

pub struct Session {
  id: String,
  timing: Arc<Timing>,
  content: Arc<Content>,
  rng: Box<dyn RandomSource>,
  page: Page,
  assessment: Option<Assessment>,
  dashboard: Option<Dashboard>,
  breathing: Option<BreathingSession>,
  game: Option<ActiveGame>,
  chat: CoachChat,
  notifications: NotificationCenter,
  alerts: AlertScheduler,
}

impl Session {
  pub fn new(id: String, timing: Arc<Timing>, content: Arc<Content>, rng: Box<dyn RandomSource>) -> Self {
    let chat = CoachChat::new(
      &content.coach_greeting,
      content.coach_responses.clone(),
      (timing.chat_delay_min_ms, timing.chat_delay_max_ms),
    );
    let alerts = AlertScheduler::new(timing.notification_interval());
    Self {
      id,
      timing,
      content,
      rng,
      page: Page::Home,
      assessment: None,
      dashboard: None,
      breathing: None,
      game: None,
      chat,
      notifications: NotificationCenter::new(),
      alerts,
    }
  }

  pub fn id(&self) -> &str { &self.id }
  pub fn page(&self) -> Page { self.page }

  /// Tear down the current page and mount `page`. Re-navigating to the
  /// mounted page is a no-op.
  #[instrument(level = "info", skip(self), fields(session = %self.id))]
  pub fn navigate(&mut self, page: Page) {
    if page == self.page { return; }
    self.assessment = None;
    self.dashboard = None;
    self.breathing = None;
    self.game = None;

    match page {
      Page::Assessment => {
        let delay = Duration::from_millis(self.timing.assessment_calc_ms);
        self.assessment = Some(Assessment::new(self.content.questions.clone(), delay));
      }
      Page::Dashboard => {
        self.dashboard = Some(Dashboard::new(
          self.content.metrics.clone(),
          self.timing.hydration_step_ml,
          &self.content.tips,
          self.rng.as_mut(),
        ));
      }
      Page::Relax => {
        if let Some(t) = self.content.techniques.first() {
          self.breathing = Some(BreathingSession::new(t.clone()));
        }
      }
      Page::Home | Page::Games | Page::Journey => {}
    }
    info!(target: "session", from = ?self.page, to = ?page, "Page mounted");
    self.page = page;
  }

  //
  // Assessment
  //

  pub fn assessment_start(&mut self, name: &str) -> bool {
    self.assessment.as_mut().map(|a| a.start(name)).unwrap_or(false)
  }

  pub fn assessment_select(&mut self, option: usize) -> SelectOutcome {
    let outcome = self.assessment.as_mut().map(|a| a.select(option)).unwrap_or(SelectOutcome::Ignored);
    if let SelectOutcome::Advanced { step } = outcome {
      debug!(target: "assessment", session = %self.id, step, "Question answered");
    }
    outcome
  }

  pub fn assessment_reset(&mut self) {
    if let Some(a) = self.assessment.as_mut() {
      a.reset();
    }
  }

  //
  // Dashboard
  //

  pub fn add_water(&mut self) -> Option<u32> {
    self.dashboard.as_mut().map(|d| d.add_water())
  }

  pub fn set_mood(&mut self, value: i64) -> Option<u8> {
    self.dashboard.as_mut().map(|d| d.set_mood(value))
  }

  //
  // Breathing
  //

  pub fn breathing_toggle(&mut self) -> bool {
    match self.breathing.as_mut() {
      Some(b) => {
        b.toggle();
        true
      }
      None => false,
    }
  }

  /// Switch technique by id. Unknown ids are ignored.
  pub fn breathing_select(&mut self, technique_id: &str) -> bool {
    let Some(b) = self.breathing.as_mut() else { return false };
    let Some(t) = self.content.techniques.iter().find(|t| t.id == technique_id) else { return false };
    b.select(t.clone());
    true
  }

  //
  // Games
  //

  /// Mount a game. Only available on the games page; replaces any open game.
  #[instrument(level = "info", skip(self), fields(session = %self.id))]
  pub fn game_open(&mut self, kind: GameKind) -> bool {
    if self.page != Page::Games { return false; }
    self.game = Some(ActiveGame::open(kind, &self.timing, &self.content.memory_symbols, self.rng.as_mut()));
    info!(target: "games", ?kind, "Game opened");
    true
  }

  pub fn game_exit(&mut self) {
    if let Some(g) = self.game.take() {
      info!(target: "games", kind = ?g.kind(), "Game closed");
    }
  }

  pub fn bubble_pop(&mut self, id: u64) -> bool {
    match self.game.as_mut() {
      Some(ActiveGame::Bubble(g)) => g.pop(id),
      _ => false,
    }
  }

  pub fn bubble_restart(&mut self) -> bool {
    match self.game.as_mut() {
      Some(ActiveGame::Bubble(g)) => {
        g.restart(self.rng.as_mut());
        true
      }
      _ => false,
    }
  }

  pub fn rhythm_tap(&mut self) -> Option<u32> {
    match self.game.as_mut() {
      Some(ActiveGame::Rhythm(g)) => Some(g.tap(self.rng.as_mut())),
      _ => None,
    }
  }

  pub fn memory_flip(&mut self, index: usize) -> FlipOutcome {
    match self.game.as_mut() {
      Some(ActiveGame::Memory(g)) => g.flip(index),
      _ => FlipOutcome::Ignored,
    }
  }

  pub fn memory_new_game(&mut self) -> bool {
    match self.game.as_mut() {
      Some(ActiveGame::Memory(g)) => {
        g.new_game(self.rng.as_mut());
        true
      }
      _ => false,
    }
  }

  //
  // Session-wide widgets
  //

  pub fn chat_send(&mut self, text: &str) -> bool {
    self.chat.send(text, self.rng.as_mut())
  }

  pub fn notification_dismiss(&mut self, id: u64) -> bool {
    self.notifications.dismiss(id)
  }

  /// Advance every live timer by `elapsed`.
  pub fn tick(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
    let mut events = Vec::new();

    if let Some(result) = self.assessment.as_mut().and_then(|a| a.tick(elapsed)) {
      events.push(SessionEvent::AssessmentComplete { result });
    }

    if let Some(b) = self.breathing.as_mut() {
      events.extend(b.tick(elapsed).into_iter().map(|(phase, timer)| SessionEvent::BreathingPhase { phase, timer }));
    }

    match self.game.as_mut() {
      Some(ActiveGame::Bubble(g)) => {
        events.extend(g.tick(elapsed, self.rng.as_mut()).into_iter().map(|e| match e {
          BubbleEvent::Spawned(id) => SessionEvent::BubbleSpawned { id },
          BubbleEvent::Expired(id) => SessionEvent::BubbleExpired { id },
          BubbleEvent::GameOver { score } => SessionEvent::BubbleGameOver { score },
        }));
      }
      Some(ActiveGame::Rhythm(g)) => {
        events.extend(g.tick(elapsed).into_iter().map(|cue| SessionEvent::RhythmCue { cue }));
      }
      Some(ActiveGame::Memory(g)) => {
        if let Some(indices) = g.tick(elapsed) {
          events.push(SessionEvent::MemoryFlippedBack { indices });
        }
      }
      None => {}
    }

    events.extend(
      self.chat.tick(elapsed, self.rng.as_mut()).into_iter().map(|message| SessionEvent::ChatReply { message }),
    );

    events.extend(
      self.notifications.tick(elapsed).into_iter().map(|id| SessionEvent::NotificationExpired { id }),
    );
    let ttl = self.timing.notification_ttl();
    for alert in self.alerts.tick(elapsed, &self.content.alerts, self.rng.as_mut()) {
      let id = self.notifications.push(&alert.message, alert.kind, ttl);
      debug!(target: "session", session = %self.id, id, "Notification raised");
      if let Some(n) = self.notifications.active().iter().find(|n| n.id == id) {
        events.push(SessionEvent::NotificationAdded { notification: n.clone() });
      }
    }

    events
  }

  pub fn snapshot(&self) -> SessionSnapshot<'_> {
    SessionSnapshot {
      id: &self.id,
      page: self.page,
      assessment: self.assessment.as_ref().map(|a| a.view()),
      dashboard: self.dashboard.as_ref().map(|d| d.view()),
      breathing: self.breathing.as_ref().map(|b| b.view()),
      game: self.game.as_ref().map(|g| g.view()),
      journey: (self.page == Page::Journey).then(|| summarize(&self.content.metrics.milestones)),
      chat: self.chat.view(),
      notifications: self.notifications.active(),
    }
  }
}

#[derive(Serialize)]
pub struct SessionSnapshot<'a> {
  pub id: &'a str,
  pub page: Page,
  pub assessment: Option<AssessmentView<'a>>,
  pub dashboard: Option<DashboardView<'a>>,
  pub breathing: Option<BreathingView<'a>>,
  pub game: Option<GameView<'a>>,
  pub journey: Option<JourneySummary>,
  pub chat: ChatView<'a>,
  pub notifications: &'a [Notification],
}
