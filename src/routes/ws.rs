//! WebSocket upgrade + session loop. Each connection owns one `Session`:
//! client messages are parsed as JSON and applied to it, and a tick interval
//! advances its clock and pushes the resulting events. Dropping the
//! connection drops the session and every timer with it.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, error, instrument, debug};

use crate::logic::{apply_command, Reply};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::session::Session;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "vitaflow_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

fn encode(msg: &ServerWsMessage<'_>) -> String {
  serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

/// A session plus the instant its clock was last advanced to.
/// Every entry point catches the clock up first, so a command always runs
/// against current time and its timers start from the moment it arrived.
struct Connection {
  session: Session,
  last: Instant,
}

impl Connection {
  fn new(session: Session, now: Instant) -> Self {
    Self { session, last: now }
  }

  /// Advance the session to `now`; returns the encoded events.
  fn catch_up(&mut self, now: Instant) -> Vec<String> {
    let elapsed = now.saturating_duration_since(self.last);
    self.last = now;
    self.session
      .tick(elapsed)
      .into_iter()
      .map(|event| encode(&ServerWsMessage::Event { event }))
      .collect()
  }

  /// Handle one text frame received at `now`. Pending events go out before
  /// the reply.
  fn on_text(&mut self, now: Instant, txt: &str) -> Vec<String> {
    let mut frames = self.catch_up(now);
    let reply = match serde_json::from_str::<ClientWsMessage>(txt) {
      Ok(cmd) => {
        debug!(target: "session", id = %self.session.id(), "WS received: {:?}", &cmd);
        match apply_command(&mut self.session, cmd) {
          Reply::Pong => encode(&ServerWsMessage::Pong),
          Reply::Snapshot => encode(&ServerWsMessage::Snapshot { session: self.session.snapshot() }),
        }
      }
      Err(e) => encode(&ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }),
    };
    frames.push(reply);
    frames
  }
}

async fn send_all(socket: &mut WebSocket, frames: Vec<String>) -> Result<(), axum::Error> {
  for frame in frames {
    socket.send(Message::Text(frame)).await?;
  }
  Ok(())
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let session = state.open_session().await;
  let id = session.id().to_string();
  info!(target: "vitaflow_backend", %id, "WebSocket connected");

  let mut ticker = interval(state.timing.tick());
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
  let mut conn = Connection::new(session, Instant::now());

  let hello = encode(&ServerWsMessage::Snapshot { session: conn.session.snapshot() });
  if socket.send(Message::Text(hello)).await.is_ok() {
    loop {
      let frames = tokio::select! {
        incoming = socket.recv() => {
          let Some(Ok(msg)) = incoming else { break };
          match msg {
            Message::Text(txt) => {
              let page_before = conn.session.page();
              let frames = conn.on_text(Instant::now(), &txt);
              if conn.session.page() != page_before {
                state.touch_session(&id, conn.session.page()).await;
              }
              frames
            }
            Message::Ping(payload) => {
              let _ = socket.send(Message::Pong(payload)).await;
              continue;
            }
            Message::Close(_) => break,
            _ => continue,
          }
        }
        _ = ticker.tick() => conn.catch_up(Instant::now()),
      };
      if let Err(e) = send_all(&mut socket, frames).await {
        error!(target: "vitaflow_backend", %id, error = %e, "WS send error");
        break;
      }
    }
  }

  state.close_session(&id).await;
  info!(target: "vitaflow_backend", %id, "WebSocket disconnected");
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;
  use serde_json::Value;

  use crate::config::Timing;
  use crate::random::ScriptedRandom;
  use crate::state::Content;

  fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
  }

  fn connection(now: Instant) -> Connection {
    let session = Session::new(
      "ws".into(),
      Arc::new(Timing::default()),
      Arc::new(Content::builtin()),
      Box::new(ScriptedRandom::constant(0.0)),
    );
    Connection::new(session, now)
  }

  fn parse(frame: &str) -> Value {
    serde_json::from_str(frame).expect("json frame")
  }

  fn has_chat_reply(frames: &[String]) -> bool {
    frames.iter().any(|f| parse(f)["event"]["kind"] == "chat_reply")
  }

  #[test]
  fn command_between_ticks_starts_its_timer_on_arrival() {
    let t0 = Instant::now();
    let mut conn = connection(t0);
    assert!(conn.catch_up(t0 + ms(100)).is_empty());

    let sent_at = t0 + ms(199);
    conn.on_text(sent_at, r#"{"type":"chat_send","text":"hi"}"#);

    let mut at = t0 + ms(200);
    let replied_at = loop {
      if has_chat_reply(&conn.catch_up(at)) {
        break at;
      }
      at += ms(100);
      assert!(at < t0 + Duration::from_secs(5), "no reply");
    };
    // Default reply delay is 1.5 s at the low end of the range.
    assert!(replied_at - sent_at >= ms(1500), "reply after {:?}", replied_at - sent_at);
  }

  #[test]
  fn due_events_precede_the_reply() {
    let t0 = Instant::now();
    let mut conn = connection(t0);
    conn.on_text(t0, r#"{"type":"chat_send","text":"hi"}"#);
    let frames = conn.on_text(t0 + ms(1600), r#"{"type":"snapshot"}"#);
    assert_eq!(frames.len(), 2);
    assert_eq!(parse(&frames[0])["event"]["kind"], "chat_reply");
    let snap = parse(&frames[1]);
    assert_eq!(snap["type"], "snapshot");
    assert_eq!(snap["session"]["chat"]["messages"].as_array().map(|m| m.len()), Some(3));
  }

  #[test]
  fn malformed_frame_gets_an_error_reply() {
    let t0 = Instant::now();
    let mut conn = connection(t0);
    let frames = conn.on_text(t0, "{not json");
    let reply = parse(frames.last().expect("reply"));
    assert_eq!(reply["type"], "error");
    assert!(reply["message"].as_str().is_some_and(|m| m.starts_with("Invalid JSON")));

    let frames = conn.on_text(t0, r#"{"type":"launch_rocket"}"#);
    assert_eq!(parse(&frames[0])["type"], "error");
  }

  #[test]
  fn ping_gets_pong() {
    let t0 = Instant::now();
    let mut conn = connection(t0);
    let frames = conn.on_text(t0, r#"{"type":"ping"}"#);
    assert_eq!(frames, vec![r#"{"type":"pong"}"#.to_string()]);
  }
}
