//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Dispatching a client command onto the connection's `Session`
//!   - Stateless scoring of a submitted answer set
//!   - Tip of the day
//!
//! UI guard failures (blank names, empty chat, clicks on solved cards,
//! commands for a view that is not mounted) are absorbed here: the command is
//! a no-op and the caller still replies with a fresh snapshot.

use tracing::{debug, instrument};

use crate::assessment::{answers_from_indices, score_answers, SelectOutcome};
use crate::dashboard::pick_tip;
use crate::games::memory::FlipOutcome;
use crate::protocol::{ClientWsMessage, ScoreIn, ScoreOut};
use crate::random::RandomSource;
use crate::session::Session;
use crate::state::Content;

/// What the transport should do after a command was applied.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
  Pong,
  Snapshot,
}

#[instrument(level = "debug", skip(session), fields(session = %session.id()))]
pub fn apply_command(session: &mut Session, msg: ClientWsMessage) -> Reply {
  let applied = match msg {
    ClientWsMessage::Ping => return Reply::Pong,
    ClientWsMessage::Snapshot => true,
    ClientWsMessage::Navigate { page } => {
      session.navigate(page);
      true
    }
    ClientWsMessage::AssessmentStart { name } => session.assessment_start(&name),
    ClientWsMessage::AssessmentSelect { option } => {
      session.assessment_select(option) != SelectOutcome::Ignored
    }
    ClientWsMessage::AssessmentReset => {
      session.assessment_reset();
      true
    }
    ClientWsMessage::AddWater => session.add_water().is_some(),
    ClientWsMessage::SetMood { value } => session.set_mood(value).is_some(),
    ClientWsMessage::BreathingToggle => session.breathing_toggle(),
    ClientWsMessage::BreathingSelect { technique_id } => session.breathing_select(&technique_id),
    ClientWsMessage::GameOpen { game } => session.game_open(game),
    ClientWsMessage::GameExit => {
      session.game_exit();
      true
    }
    ClientWsMessage::BubblePop { bubble_id } => session.bubble_pop(bubble_id),
    ClientWsMessage::BubbleRestart => session.bubble_restart(),
    ClientWsMessage::RhythmTap => session.rhythm_tap().is_some(),
    ClientWsMessage::MemoryFlip { index } => {
      session.memory_flip(index) != FlipOutcome::Ignored
    }
    ClientWsMessage::MemoryNewGame => session.memory_new_game(),
    ClientWsMessage::ChatSend { text } => session.chat_send(&text),
    ClientWsMessage::NotificationDismiss { id } => session.notification_dismiss(id),
  };
  if !applied {
    debug!(target: "session", "Command ignored by guard");
  }
  Reply::Snapshot
}

#[instrument(level = "info", skip(content, body), fields(answers = body.answers.len()))]
pub fn score_submission(content: &Content, body: &ScoreIn) -> ScoreOut {
  let answers = match answers_from_indices(&content.questions, &body.answers) {
    Ok(a) => a,
    Err(e) => return ScoreOut { ok: false, result: None, message: Some(e) },
  };
  match score_answers(&content.questions, &answers) {
    Some(result) => ScoreOut { ok: true, result: Some(result), message: None },
    None => ScoreOut {
      ok: false,
      result: None,
      message: Some(format!(
        "Answered {} of {} questions; scoring needs every answer.",
        answers.len(),
        content.questions.len()
      )),
    },
  }
}

pub fn tip_of_the_day(content: &Content, rng: &mut dyn RandomSource) -> String {
  pick_tip(&content.tips, rng)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;
  use std::sync::Arc;

  use crate::config::Timing;
  use crate::domain::{Archetype, Page};
  use crate::random::ScriptedRandom;

  fn session() -> Session {
    Session::new(
      "logic".into(),
      Arc::new(Timing::default()),
      Arc::new(Content::builtin()),
      Box::new(ScriptedRandom::constant(0.0)),
    )
  }

  fn parse(json: &str) -> ClientWsMessage {
    serde_json::from_str(json).expect("client message")
  }

  #[test]
  fn commands_parse_and_apply() {
    let mut s = session();
    assert_eq!(apply_command(&mut s, parse(r#"{"type":"ping"}"#)), Reply::Pong);
    apply_command(&mut s, parse(r#"{"type":"navigate","page":"games"}"#));
    apply_command(&mut s, parse(r#"{"type":"game_open","game":"rhythm"}"#));
    assert_eq!(apply_command(&mut s, parse(r#"{"type":"rhythm_tap"}"#)), Reply::Snapshot);
    assert_eq!(s.page(), Page::Games);
    let json = serde_json::to_value(s.snapshot()).expect("json");
    assert_eq!(json["game"]["score"], 50);

    apply_command(&mut s, parse(r#"{"type":"chat_send","text":"  "}"#));
    assert_eq!(s.snapshot().chat.messages.len(), 1);
    apply_command(&mut s, parse(r#"{"type":"breathing_select","techniqueId":"relax"}"#));
    assert!(s.snapshot().breathing.is_none());
  }

  #[test]
  fn unknown_command_is_a_parse_error() {
    assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"launch_rocket"}"#).is_err());
  }

  #[test]
  fn scoring_requires_every_answer() {
    let content = Content::builtin();
    let mut answers = HashMap::new();
    answers.insert("sleep".to_string(), 2);
    let out = score_submission(&content, &ScoreIn { answers: answers.clone() });
    assert!(!out.ok);
    assert!(out.message.unwrap_or_default().contains("1 of 4"));

    answers.insert("energy".to_string(), 3);
    answers.insert("stress".to_string(), 0);
    answers.insert("diet".to_string(), 3);
    let out = score_submission(&content, &ScoreIn { answers });
    // (100 + 100 + 20 + 100) / 4 = 80, stress 20 -> restless
    let result = out.result.expect("result");
    assert_eq!(result.final_score, 80);
    assert_eq!(result.archetype, Archetype::Restless);
  }

  #[test]
  fn tip_is_drawn_from_content() {
    let content = Content::builtin();
    let mut rng = ScriptedRandom::constant(0.0);
    assert_eq!(tip_of_the_day(&content, &mut rng), content.tips[0]);
  }
}
