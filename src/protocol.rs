//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{AssessmentResult, GameKind, Page};
use crate::session::{SessionEvent, SessionSnapshot};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Snapshot,
    Navigate {
        page: Page,
    },
    AssessmentStart {
        name: String,
    },
    AssessmentSelect {
        option: usize,
    },
    AssessmentReset,
    AddWater,
    SetMood {
        value: i64,
    },
    BreathingToggle,
    BreathingSelect {
        #[serde(rename = "techniqueId")]
        technique_id: String,
    },
    GameOpen {
        game: GameKind,
    },
    GameExit,
    BubblePop {
        #[serde(rename = "bubbleId")]
        bubble_id: u64,
    },
    BubbleRestart,
    RhythmTap,
    MemoryFlip {
        index: usize,
    },
    MemoryNewGame,
    ChatSend {
        text: String,
    },
    NotificationDismiss {
        id: u64,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage<'a> {
    Pong,
    Snapshot {
        session: SessionSnapshot<'a>,
    },
    Event {
        event: SessionEvent,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct ScoreIn {
    /// question id -> selected option index
    pub answers: HashMap<String, usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOut {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AssessmentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct TipOut {
    pub tip: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOut {
    pub ok: bool,
    pub active_sessions: usize,
}
