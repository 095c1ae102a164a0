//! HTTP endpoint handlers. These are thin read-only wrappers over the content
//! catalogue plus the stateless scoring call.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::journey::summarize;
use crate::logic::{score_submission, tip_of_the_day};
use crate::protocol::*;
use crate::random::ThreadRandom;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, active_sessions: state.active_sessions().await })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.content.metrics.clone())
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_tips(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.content.tips.clone())
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_tip(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let tip = tip_of_the_day(&state.content, &mut ThreadRandom::new());
  Json(TipOut { tip })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_techniques(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.content.techniques.clone())
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.content.questions.as_ref().clone())
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_journey(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(summarize(&state.content.metrics.milestones))
}

#[instrument(level = "info", skip(state, body), fields(answers = body.answers.len()))]
pub async fn http_post_score(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ScoreIn>,
) -> impl IntoResponse {
  let out = score_submission(&state.content, &body);
  info!(
    target: "assessment",
    ok = out.ok,
    score = out.result.as_ref().map(|r| r.final_score),
    "HTTP assessment scored"
  );
  Json(out)
}
