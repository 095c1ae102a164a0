//! Scripted wellness coach.
//!
//! No inference happens here: every reply is drawn uniformly from a fixed
//! pool once a randomized "thinking" delay has elapsed. Sends are not
//! serialized, so each send owns its own pending reply.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{ChatMessage, ChatRole};
use crate::random::RandomSource;
use crate::util::{is_blank, trunc_for_log};

pub struct CoachChat {
  responses: Arc<Vec<String>>,
  delay_ms: (u64, u64),
  messages: Vec<ChatMessage>,
  pending: Vec<Duration>,
}

impl CoachChat {
  pub fn new(greeting: &str, responses: Arc<Vec<String>>, delay_ms: (u64, u64)) -> Self {
    Self {
      responses,
      delay_ms,
      messages: vec![ChatMessage { role: ChatRole::Assistant, text: greeting.to_string() }],
      pending: Vec::new(),
    }
  }

  #[cfg(test)]
  pub fn messages(&self) -> &[ChatMessage] { &self.messages }

  pub fn is_typing(&self) -> bool { !self.pending.is_empty() }

  /// Append the user's message and schedule a reply. Blank input is ignored.
  #[instrument(level = "debug", skip(self, text, rng), fields(text_len = text.len()))]
  pub fn send(&mut self, text: &str, rng: &mut dyn RandomSource) -> bool {
    if is_blank(text) { return false; }
    self.messages.push(ChatMessage { role: ChatRole::User, text: text.to_string() });
    let delay = rng.between_ms(self.delay_ms.0, self.delay_ms.1);
    self.pending.push(delay);
    debug!(target: "coach", text = %trunc_for_log(text, 64), delay_ms = delay.as_millis() as u64, "Reply scheduled");
    true
  }

  /// Deliver every reply whose delay ran out during `elapsed`.
  pub fn tick(&mut self, elapsed: Duration, rng: &mut dyn RandomSource) -> Vec<ChatMessage> {
    let mut due = 0;
    self.pending.retain_mut(|left| {
      *left = left.saturating_sub(elapsed);
      if left.is_zero() {
        due += 1;
        false
      } else {
        true
      }
    });

    let mut delivered = Vec::with_capacity(due);
    for _ in 0..due {
      if self.responses.is_empty() { break; }
      let text = self.responses[rng.pick_index(self.responses.len())].clone();
      let msg = ChatMessage { role: ChatRole::Assistant, text };
      self.messages.push(msg.clone());
      delivered.push(msg);
    }
    delivered
  }

  pub fn view(&self) -> ChatView<'_> {
    ChatView { messages: &self.messages, typing: self.is_typing() }
  }
}

#[derive(Serialize)]
pub struct ChatView<'a> {
  pub messages: &'a [ChatMessage],
  pub typing: bool,
}
