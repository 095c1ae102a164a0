//! Built-in content: quiz questions, breathing techniques, metrics fixture,
//! tips, coach replies, alert pool and memory-card symbols.
//!
//! Tips, coach replies, the greeting and alerts can be overridden from TOML
//! (see `config::ContentCfg`); everything else is fixed.

use crate::domain::{
  Activity, Alert, Detox, MetricsSnapshot, Milestone, NotificationKind, Progress, Question,
  QuizOption, ScreenTime, SleepPoint, StressPoint, Technique,
};

fn opt(label: &str, score: u32, feedback: &str) -> QuizOption {
  QuizOption { label: label.into(), score, feedback: feedback.into() }
}

/// The four assessment questions, in presentation order.
pub fn seed_questions() -> Vec<Question> {
  vec![
    Question {
      id: "sleep".into(),
      category: "Physical".into(),
      text: "How did you sleep last night?".into(),
      options: vec![
        opt("< 5h", 20, "Rest is vital!"),
        opt("5-7h", 60, "Getting there."),
        opt("7-9h", 100, "Perfect!"),
        opt("> 9h", 80, "Hibernating?"),
      ],
    },
    Question {
      id: "energy".into(),
      category: "Physical".into(),
      text: "How is your energy level right now?".into(),
      options: vec![
        opt("Exhausted", 20, "Take it slow."),
        opt("Low", 40, "Need a boost?"),
        opt("Good", 80, "Great!"),
        opt("Unstoppable", 100, "Let's go!"),
      ],
    },
    Question {
      id: "stress".into(),
      category: "Mental".into(),
      text: "How are you feeling mentally?".into(),
      options: vec![
        opt("Overwhelmed", 20, "Breathe..."),
        opt("Stressed", 40, "One thing at a time."),
        opt("Okay", 70, "Dependent on the moment."),
        opt("Zen", 100, "Inner peace."),
      ],
    },
    Question {
      id: "diet".into(),
      category: "Lifestyle".into(),
      text: "How was your nutrition today?".into(),
      options: vec![
        opt("Fast Food", 20, "Treat yourself better."),
        opt("Mixed", 60, "Balance is key."),
        opt("Balanced", 90, "Fueling correctly!"),
        opt("Super Clean", 100, "Clean energy."),
      ],
    },
  ]
}

pub fn seed_techniques() -> Vec<Technique> {
  vec![
    Technique {
      id: "box".into(),
      name: "Box Breathing".into(),
      subtitle: "Focus & Clarity".into(),
      phase_durations: [4, 4, 4, 4],
    },
    Technique {
      id: "relax".into(),
      name: "4-7-8 Relax".into(),
      subtitle: "Calm & Sleep".into(),
      phase_durations: [4, 7, 8, 0],
    },
    Technique {
      id: "energy".into(),
      name: "Energy Boost".into(),
      subtitle: "Awake & Alert".into(),
      phase_durations: [4, 0, 4, 0],
    },
  ]
}

/// Mock metrics fixture consumed by the dashboard and journey views.
pub fn seed_metrics() -> MetricsSnapshot {
  let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
  let sleep_hours = [6.5, 7.2, 5.8, 8.1, 7.0, 8.4, 7.5];
  let stress_levels = [45, 60, 72, 50, 38, 25, 30];

  MetricsSnapshot {
    user: "Alex".into(),
    score: 84,
    streak: 3,
    calories: Progress { current: 1840, target: 2400 },
    sleep: days
      .iter()
      .zip(sleep_hours)
      .map(|(d, h)| SleepPoint { day: (*d).into(), hours: h })
      .collect(),
    stress: days
      .iter()
      .zip(stress_levels)
      .map(|(d, l)| StressPoint { day: (*d).into(), level: l })
      .collect(),
    hydration: Progress { current: 1250, target: 2500 },
    activity: Activity { active_minutes: 45 },
    screen_time: ScreenTime { hours: 4.2 },
    detox: Detox { days_left: 4, total: 7 },
    milestones: vec![
      Milestone { id: 1, label: "Start Journey".into(), completed: true },
      Milestone { id: 2, label: "First 5k Steps".into(), completed: true },
      Milestone { id: 3, label: "7 Day Streak".into(), completed: true },
      Milestone { id: 4, label: "Perfect Sleep Week".into(), completed: false },
      Milestone { id: 5, label: "Meditation Master".into(), completed: false },
    ],
  }
}

pub fn seed_tips() -> Vec<String> {
  [
    "Drink a glass of water before each meal to stay on top of hydration.",
    "A 10-minute walk after lunch helps steady your afternoon energy.",
    "Dim the lights an hour before bed to cue your body for sleep.",
    "Try box breathing for two minutes when stress starts to climb.",
    "Stand up and stretch every hour you spend at a screen.",
    "Add one extra serving of greens to your dinner tonight.",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

pub const COACH_GREETING: &str =
  "Hello! I am Vita, your personal wellness AI. How can I help you today?";

pub fn seed_coach_responses() -> Vec<String> {
  [
    "Based on your recent sleep data, I recommend a 10-minute wind-down routine tonight. 🌙",
    "Hydration is key! You're slightly behind your target. Drink a glass now. 💧",
    "Great job on active minutes! Maybe try a quick stretch to avoid stiffness. 🧘",
    "I sense a bit of stress. How about a quick breathing exercise in the Relax tab? 🌬️",
    "Your focus score is excellent today! Keep up the momentum. 🚀",
    "Have you taken a screen break recently? Your eyes might need a rest. 👀",
    "Consistency is key. You're on a 3-day streak! Keep going! 🔥",
    "Remember to eat some greens today! Your nutrition score could use a boost. 🥗",
    "Need a quick energy boost? Try 20 jumping jacks! ⚡",
    "Sleep quality > Sleep duration. Try to avoid screens 30 mins before bed. 📱🚫",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

pub fn seed_alerts() -> Vec<Alert> {
  [
    ("Remember to drink water! 💧", NotificationKind::Info),
    ("Time for a quick stretch? 🧘", NotificationKind::Success),
    ("Your focus score is rising! 🚀", NotificationKind::Success),
    ("Take a deep breath... 🌬️", NotificationKind::Info),
  ]
  .into_iter()
  .map(|(m, kind)| Alert { message: m.into(), kind })
  .collect()
}

/// Six symbols, each dealt twice.
pub fn memory_symbols() -> Vec<&'static str> {
  let pairs = ["🌙", "💧", "🧘", "🥗", "🏃", "🧠"];
  pairs.iter().flat_map(|s| [*s, *s]).collect()
}
