//! Domain models shared across views: quiz questions/answers, archetypes,
//! metrics fixture, breathing techniques, chat messages and alerts.

use serde::{Deserialize, Serialize};

/// One selectable answer of a quiz question.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizOption {
  pub label: String,
  pub score: u32,
  #[serde(default)] pub feedback: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub category: String,
  pub text: String,
  pub options: Vec<QuizOption>,
}

/// Answer recorded for a question. Keyed by `question_id`, one per question.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
  pub question_id: String,
  pub label: String,
  pub score: u32,
}

/// Qualitative wellness label derived from the assessment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
  Balanced,
  Restless,
  Warrior,
  Seeker,
}

impl Archetype {
  pub fn label(self) -> &'static str {
    match self {
      Archetype::Balanced => "balanced",
      Archetype::Restless => "restless",
      Archetype::Warrior => "warrior",
      Archetype::Seeker => "seeker",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Archetype::Balanced => "The Balanced Sage",
      Archetype::Restless => "The Restless Achiever",
      Archetype::Warrior => "The Resilient Warrior",
      Archetype::Seeker => "The Wellness Seeker",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Archetype::Balanced => "You have found a great rhythm. Keep nurturing this harmony.",
      Archetype::Restless => "High energy but high stress. Prioritize grounding yourself.",
      Archetype::Warrior => "You push through challenges, but remember to rest as hard as you work.",
      Archetype::Seeker => "You are on the path, but need more consistency to reach your peak.",
    }
  }
}

/// Per-answer highlight shown under the result card.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerHighlight {
  pub question_id: String,
  pub label: String,
  pub positive: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
  pub final_score: u32,
  pub archetype: Archetype,
  pub title: String,
  pub description: String,
  pub breakdown: Vec<AnswerHighlight>,
}

//
// Metrics fixture (camelCase on the wire, matching the front-end data file)
//

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Progress {
  pub current: u32,
  pub target: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SleepPoint {
  pub day: String,
  pub hours: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StressPoint {
  pub day: String,
  pub level: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
  pub active_minutes: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScreenTime {
  pub hours: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Detox {
  pub days_left: u32,
  pub total: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
  pub id: u32,
  pub label: String,
  pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
  pub user: String,
  pub score: u32,
  pub streak: u32,
  pub calories: Progress,
  pub sleep: Vec<SleepPoint>,
  pub stress: Vec<StressPoint>,
  pub hydration: Progress,
  pub activity: Activity,
  pub screen_time: ScreenTime,
  pub detox: Detox,
  pub milestones: Vec<Milestone>,
}

/// Named breathing pattern: [inhale, hold, exhale, sustain] in seconds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
  pub id: String,
  pub name: String,
  #[serde(default)] pub subtitle: String,
  pub phase_durations: [u32; 4],
}

impl Technique {
  pub fn cycle_length(&self) -> u32 {
    self.phase_durations.iter().sum()
  }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
  User,
  Assistant,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
  pub role: ChatRole,
  pub text: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  Info,
  Success,
  Alert,
}

impl NotificationKind {
  pub fn title(self) -> &'static str {
    match self {
      NotificationKind::Info => "Reminder",
      NotificationKind::Success => "success",
      NotificationKind::Alert => "alert",
    }
  }
}

impl Default for NotificationKind {
  fn default() -> Self { NotificationKind::Info }
}

/// Entry of the periodic alert pool.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
  pub message: String,
  #[serde(default)] pub kind: NotificationKind,
}

/// Top-level views a session can mount.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Page {
  Home,
  Assessment,
  Dashboard,
  Relax,
  Games,
  Journey,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
  Bubble,
  Rhythm,
  Memory,
}
