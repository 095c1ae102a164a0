//! Assessment quiz: name gate, sequential questions, delayed scoring.
//!
//! Flow:
//! 1) `start(name)` leaves the name gate (blank names are ignored).
//! 2) `select(option)` records the answer for the current question and moves on.
//! 3) After the last answer the quiz sits in `Calculating` until the analysis
//!    delay has elapsed on the session clock, then derives the result once.
//!
//! Scoring only ever runs over a complete answer set.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{AnswerHighlight, Archetype, AssessmentResult, Question, QuizAnswer};
use crate::util::{fill_template, is_blank};

const STRESS_QUESTION: &str = "stress";
const STRESS_DEFAULT: u32 = 50;
const HIGHLIGHT_QUESTIONS: [&str; 3] = ["sleep", "stress", "diet"];

/// `round(sum / count)` with halves rounded up, capped at 100.
pub fn final_score(scores: &[u32], question_count: usize) -> u32 {
  if question_count == 0 { return 0; }
  let sum: u64 = scores.iter().map(|s| *s as u64).sum();
  let n = question_count as u64;
  let rounded = (2 * sum + n) / (2 * n);
  rounded.min(100) as u32
}

/// Archetype precedence: balanced > restless > warrior > seeker.
pub fn archetype_for(final_score: u32, stress_score: Option<u32>) -> Archetype {
  let stress = stress_score.unwrap_or(STRESS_DEFAULT);
  if final_score > 80 {
    Archetype::Balanced
  } else if stress < 50 {
    Archetype::Restless
  } else if final_score > 50 {
    Archetype::Warrior
  } else {
    Archetype::Seeker
  }
}

/// Derive the result, or `None` if any question is still unanswered.
pub fn score_answers(questions: &[Question], answers: &[QuizAnswer]) -> Option<AssessmentResult> {
  let lookup = |id: &str| answers.iter().find(|a| a.question_id == id);
  if questions.is_empty() || questions.iter().any(|q| lookup(&q.id).is_none()) {
    return None;
  }

  let scores: Vec<u32> = questions
    .iter()
    .filter_map(|q| lookup(&q.id).map(|a| a.score))
    .collect();
  let score = final_score(&scores, questions.len());
  let archetype = archetype_for(score, lookup(STRESS_QUESTION).map(|a| a.score));

  let breakdown = HIGHLIGHT_QUESTIONS
    .iter()
    .filter_map(|id| lookup(id))
    .map(|a| AnswerHighlight {
      question_id: a.question_id.clone(),
      label: a.label.clone(),
      positive: a.score > 50,
    })
    .collect();

  Some(AssessmentResult {
    final_score: score,
    archetype,
    title: archetype.title().into(),
    description: archetype.description().into(),
    breakdown,
  })
}

/// Map `{questionId: optionIndex}` onto recorded answers, in question order.
pub fn answers_from_indices(
  questions: &[Question],
  picks: &HashMap<String, usize>,
) -> Result<Vec<QuizAnswer>, String> {
  let mut out = Vec::with_capacity(picks.len());
  for q in questions {
    let Some(idx) = picks.get(&q.id) else { continue };
    let option = q
      .options
      .get(*idx)
      .ok_or_else(|| format!("Question '{}' has no option {}", q.id, idx))?;
    out.push(QuizAnswer { question_id: q.id.clone(), label: option.label.clone(), score: option.score });
  }
  if let Some(unknown) = picks.keys().find(|k| !questions.iter().any(|q| &q.id == *k)) {
    return Err(format!("Unknown question id: {unknown}"));
  }
  Ok(out)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
  NameEntry,
  Question { step: usize },
  Calculating { remaining: Duration },
  Complete(AssessmentResult),
}

/// Result of `Assessment::select`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
  Ignored,
  Advanced { step: usize },
  Calculating,
}

pub struct Assessment {
  questions: Arc<Vec<Question>>,
  calc_delay: Duration,
  name: String,
  answers: Vec<QuizAnswer>,
  stage: Stage,
}

impl Assessment {
  pub fn new(questions: Arc<Vec<Question>>, calc_delay: Duration) -> Self {
    Self { questions, calc_delay, name: String::new(), answers: Vec::new(), stage: Stage::NameEntry }
  }

  #[cfg(test)]
  pub fn stage(&self) -> &Stage { &self.stage }

  #[cfg(test)]
  pub fn answers(&self) -> &[QuizAnswer] { &self.answers }

  pub fn result(&self) -> Option<&AssessmentResult> {
    match &self.stage {
      Stage::Complete(r) => Some(r),
      _ => None,
    }
  }

  /// Leave the name gate. Returns false (and does nothing) on a blank name.
  #[instrument(level = "debug", skip(self, name), fields(name_len = name.len()))]
  pub fn start(&mut self, name: &str) -> bool {
    if self.stage != Stage::NameEntry || is_blank(name) || self.questions.is_empty() {
      return false;
    }
    self.name = name.trim().to_string();
    self.stage = Stage::Question { step: 0 };
    true
  }

  /// Question text, personalised with the name on the first step.
  pub fn prompt(&self) -> Option<String> {
    let Stage::Question { step } = self.stage else { return None };
    let q = self.questions.get(step)?;
    if step == 0 {
      Some(fill_template("{name}, {question}", &[("name", &self.name), ("question", &q.text.to_lowercase())]))
    } else {
      Some(q.text.clone())
    }
  }

  #[instrument(level = "debug", skip(self))]
  pub fn select(&mut self, option_index: usize) -> SelectOutcome {
    let Stage::Question { step } = self.stage else { return SelectOutcome::Ignored };
    let Some(q) = self.questions.get(step) else { return SelectOutcome::Ignored };
    let Some(option) = q.options.get(option_index) else { return SelectOutcome::Ignored };

    let answer = QuizAnswer { question_id: q.id.clone(), label: option.label.clone(), score: option.score };
    match self.answers.iter_mut().find(|a| a.question_id == answer.question_id) {
      Some(existing) => *existing = answer,
      None => self.answers.push(answer),
    }
    debug!(target: "assessment", question = %q.id, score = option.score, "Answer recorded");

    if step + 1 < self.questions.len() {
      self.stage = Stage::Question { step: step + 1 };
      SelectOutcome::Advanced { step: step + 1 }
    } else {
      self.stage = Stage::Calculating { remaining: self.calc_delay };
      SelectOutcome::Calculating
    }
  }

  /// Advance the analysis delay. Returns the result on the tick that completes it.
  pub fn tick(&mut self, elapsed: Duration) -> Option<AssessmentResult> {
    let Stage::Calculating { remaining } = self.stage else { return None };
    let left = remaining.saturating_sub(elapsed);
    if !left.is_zero() {
      self.stage = Stage::Calculating { remaining: left };
      return None;
    }
    let result = score_answers(&self.questions, &self.answers)?;
    info!(target: "assessment", score = result.final_score, archetype = result.archetype.label(), "Assessment complete");
    self.stage = Stage::Complete(result.clone());
    Some(result)
  }

  pub fn reset(&mut self) {
    self.name.clear();
    self.answers.clear();
    self.stage = Stage::NameEntry;
  }

  pub fn view(&self) -> AssessmentView<'_> {
    let (stage, step) = match &self.stage {
      Stage::NameEntry => ("name_entry", None),
      Stage::Question { step } => ("question", Some(*step)),
      Stage::Calculating { .. } => ("calculating", None),
      Stage::Complete(_) => ("complete", None),
    };
    AssessmentView {
      stage,
      name: &self.name,
      step,
      total: self.questions.len(),
      question: step.and_then(|s| self.questions.get(s)),
      prompt: self.prompt(),
      answers: &self.answers,
      result: self.result(),
    }
  }
}

#[derive(Serialize)]
pub struct AssessmentView<'a> {
  pub stage: &'static str,
  pub name: &'a str,
  pub step: Option<usize>,
  pub total: usize,
  pub question: Option<&'a Question>,
  pub prompt: Option<String>,
  pub answers: &'a [QuizAnswer],
  pub result: Option<&'a AssessmentResult>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::seed_questions;

  fn quiz() -> Assessment {
    Assessment::new(Arc::new(seed_questions()), Duration::from_secs(2))
  }

  fn answer(id: &str, score: u32) -> QuizAnswer {
    QuizAnswer { question_id: id.into(), label: format!("{id}-{score}"), score }
  }

  #[test]
  fn final_score_rounds_half_up_and_caps() {
    assert_eq!(final_score(&[20, 100, 100, 100], 4), 80);
    assert_eq!(final_score(&[40, 100, 100, 100], 4), 85);
    assert_eq!(final_score(&[20, 40, 70, 60], 4), 48); // 47.5
    assert_eq!(final_score(&[100, 100, 100, 100], 4), 100);
    assert_eq!(final_score(&[250, 250], 2), 100);
    assert_eq!(final_score(&[], 0), 0);
  }

  #[test]
  fn archetype_precedence() {
    assert_eq!(archetype_for(85, Some(20)), Archetype::Balanced);
    assert_eq!(archetype_for(80, Some(40)), Archetype::Restless);
    assert_eq!(archetype_for(30, Some(20)), Archetype::Restless);
    assert_eq!(archetype_for(80, Some(70)), Archetype::Warrior);
    assert_eq!(archetype_for(50, Some(70)), Archetype::Seeker);
    // unanswered stress counts as 50: not restless
    assert_eq!(archetype_for(60, None), Archetype::Warrior);
    assert_eq!(archetype_for(40, None), Archetype::Seeker);
  }

  #[test]
  fn high_mean_is_balanced_regardless_of_stress() {
    let qs = seed_questions();
    let answers = vec![
      answer("sleep", 40),
      answer("energy", 100),
      answer("stress", 100),
      answer("diet", 100),
    ];
    let r = score_answers(&qs, &answers).expect("complete");
    assert_eq!(r.final_score, 85);
    assert_eq!(r.archetype, Archetype::Balanced);

    let answers = vec![
      answer("sleep", 100),
      answer("energy", 100),
      answer("stress", 20),
      answer("diet", 100),
    ];
    let r = score_answers(&qs, &answers).expect("complete");
    assert_eq!(r.final_score, 80);
    assert_eq!(r.archetype, Archetype::Restless);
  }

  #[test]
  fn partial_answers_never_score() {
    let qs = seed_questions();
    assert!(score_answers(&qs, &[answer("sleep", 100), answer("energy", 100)]).is_none());
  }

  #[test]
  fn blank_name_is_refused() {
    let mut a = quiz();
    assert!(!a.start("   "));
    assert_eq!(a.stage(), &Stage::NameEntry);
    assert!(a.start(" Sam "));
    assert_eq!(a.prompt().as_deref(), Some("Sam, how did you sleep last night?"));
  }

  #[test]
  fn full_flow_scores_after_delay() {
    let mut a = quiz();
    assert!(a.start("Sam"));
    assert_eq!(a.select(2), SelectOutcome::Advanced { step: 1 }); // sleep 100
    assert_eq!(a.select(9), SelectOutcome::Ignored);
    assert_eq!(a.select(2), SelectOutcome::Advanced { step: 2 }); // energy 80
    assert_eq!(a.select(1), SelectOutcome::Advanced { step: 3 }); // stress 40
    assert_eq!(a.select(2), SelectOutcome::Calculating); // diet 90
    assert_eq!(a.answers().len(), 4);

    assert!(a.tick(Duration::from_millis(1_500)).is_none());
    assert!(a.result().is_none());
    let r = a.tick(Duration::from_millis(500)).expect("result");
    // (100 + 80 + 40 + 90) / 4 = 77.5 -> 78, stress 40 -> restless
    assert_eq!(r.final_score, 78);
    assert_eq!(r.archetype, Archetype::Restless);
    assert_eq!(r.breakdown.len(), 3);
    assert!(r.breakdown[0].positive);
    assert!(!r.breakdown[1].positive);

    assert_eq!(a.select(0), SelectOutcome::Ignored);
    assert!(a.tick(Duration::from_secs(5)).is_none());
    assert_eq!(a.result().map(|r| r.final_score), Some(78));
  }

  #[test]
  fn reset_clears_answers() {
    let mut a = quiz();
    a.start("Sam");
    a.select(0);
    a.reset();
    assert!(a.answers().is_empty());
    assert_eq!(a.stage(), &Stage::NameEntry);
  }

  #[test]
  fn indices_map_to_answers() {
    let qs = seed_questions();
    let mut picks = HashMap::new();
    picks.insert("sleep".to_string(), 2usize);
    picks.insert("diet".to_string(), 0usize);
    let answers = answers_from_indices(&qs, &picks).expect("answers");
    assert_eq!(answers[0], QuizAnswer { question_id: "sleep".into(), label: "7-9h".into(), score: 100 });
    assert_eq!(answers[1].question_id, "diet");

    picks.insert("diet".to_string(), 7);
    assert!(answers_from_indices(&qs, &picks).is_err());
    picks.insert("diet".to_string(), 1);
    picks.insert("mood".to_string(), 1);
    assert!(answers_from_indices(&qs, &picks).unwrap_err().contains("mood"));
  }
}
