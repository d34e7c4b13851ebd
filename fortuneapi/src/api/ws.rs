use crate::core::prelude::*;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use models::{ChannelMsg, SessionStatus, WsMessage};
use session::CookieSession;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, info_span, warn, Instrument};

/// Module for models for the websocket API.
///
/// Clients send `{"method": "crack"}` or `{"method": "close"}`; the server
/// answers on the `status`, `fortune` and `error` channels.
///
pub mod models {
    use crate::domain::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
    #[serde(tag = "method", rename_all = "lowercase")]
    pub enum WsMessage {
        Crack,
        Close,
    }

    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
    #[serde(tag = "channel", rename_all = "lowercase")]
    pub enum ChannelMsg {
        Status { data: Status },
        Fortune { data: FortuneRecord, revealed_at: String },
        Error { data: Misread },
    }

    #[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum SessionStatus {
        Cracking,
        Closed,
        Busy,
        Invalid,
    }

    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
    pub struct Status {
        pub state: SessionStatus,
        pub message: String,
    }

    /// Notice shown to the user when a fortune could not be generated.
    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
    pub struct Misread {
        pub title: String,
        pub description: String,
    }

    impl Default for Misread {
        fn default() -> Self {
            Self {
                title: "Fortune Misread".to_string(),
                description: "The universe is unclear. Please try again.".to_string(),
            }
        }
    }

    impl ChannelMsg {
        pub fn status(state: SessionStatus, message: impl Into<String>) -> Self {
            Self::Status {
                data: Status {
                    state,
                    message: message.into(),
                },
            }
        }
    }
}

/// Module for the per-connection cookie session.
///
/// The session is the re-entrancy guard for a single viewer: at most one
/// generation is in flight, and the revealed flag tracks whether a fortune is
/// currently showing.
///
pub mod session {
    use super::models::{ChannelMsg, Misread, SessionStatus};
    use crate::core::prelude::*;
    use crate::domain::prelude::*;

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub enum CookieState {
        #[default]
        Closed,
        Cracking,
        Open,
    }

    #[derive(Debug, Default)]
    pub struct CookieSession {
        pub state: CookieState,
    }

    impl CookieSession {
        /// Starts cracking a cookie.
        ///
        /// Returns `false` when a generation is already pending, in which case
        /// the request must be ignored. An open cookie is folded away first.
        ///
        pub fn crack(&mut self) -> bool {
            if self.state == CookieState::Cracking {
                return false;
            }
            self.state = CookieState::Cracking;
            true
        }

        /// Records the outcome of the pending generation and builds the reply.
        pub fn finish(&mut self, result: Result<FortuneRecord, GenerationError>) -> ChannelMsg {
            match result {
                Ok(record) => {
                    self.state = CookieState::Open;
                    ChannelMsg::Fortune {
                        data: record,
                        revealed_at: chrono::Utc::now().to_rfc3339(),
                    }
                }
                Err(_) => {
                    self.state = CookieState::Closed;
                    ChannelMsg::Error {
                        data: Misread::default(),
                    }
                }
            }
        }

        /// Folds the cookie back, hiding the revealed fortune.
        ///
        /// Returns `false` while a generation is pending.
        ///
        pub fn close(&mut self) -> bool {
            if self.state == CookieState::Cracking {
                return false;
            }
            self.state = CookieState::Closed;
            true
        }

        pub fn is_revealed(&self) -> bool {
            self.state == CookieState::Open
        }

        pub fn busy_reply() -> ChannelMsg {
            ChannelMsg::status(SessionStatus::Busy, "Consulting the stars...")
        }
    }
}

/// The endpoint for the websocket API.
///
/// This function upgrades the websocket connection and runs one cookie
/// session for its lifetime.
///
pub async fn endpoint(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    /// Splits the websocket into a sink and stream, and runs a read and a
    /// write task joined by an mpsc channel of outgoing messages.
    ///
    async fn handle(socket: WebSocket, state: AppState) {
        let (sender, receiver) = socket.split();
        let session = Arc::new(RwLock::new(CookieSession::default()));
        let (out_tx, out_rx) = mpsc::channel(16);

        let read_task = tokio::spawn(read(receiver, session, state, out_tx).in_current_span());
        let write_task = tokio::spawn(write(sender, out_rx).in_current_span());

        tokio::select! {
            _ = read_task => {},
            _ = write_task => {},
        }
        info!("session closed");
    }

    let span = info_span!("ws", session_id = %uuid::Uuid::new_v4());
    ws.on_upgrade(move |socket| {
        async move {
            info!("session opened");
            handle(socket, state).await
        }
        .instrument(span)
    })
}

/// Read side of the websocket connection.
///
/// Parses client messages and hands them to [`handle_message`] until the
/// socket closes.
///
async fn read(
    mut receiver: SplitStream<WebSocket>,
    session: Arc<RwLock<CookieSession>>,
    state: AppState,
    out: mpsc::Sender<ChannelMsg>,
) {
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<WsMessage>(text.as_str()) {
                Ok(ws_msg) => handle_message(ws_msg, &session, &state, &out).await,
                Err(e) => {
                    warn!("invalid client message: {e}");
                    let reply = ChannelMsg::status(
                        SessionStatus::Invalid,
                        format!("Invalid message: {e}"),
                    );
                    if out.send(reply).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Write side of the websocket connection.
///
/// Forwards every queued message to the socket, stopping once the socket
/// rejects a send or all senders are gone.
///
async fn write(mut sender: SplitSink<WebSocket, Message>, mut out: mpsc::Receiver<ChannelMsg>) {
    while let Some(msg) = out.recv().await {
        if !send_message(&msg, &mut sender).await {
            break;
        }
    }
}

/// Applies one client message to the session.
///
/// A crack is acknowledged with `cracking` before the generation is spawned in
/// its own task, so the socket keeps reading while it runs and the fortune
/// always arrives after the acknowledgement. Further cracks are answered with
/// `busy`. If the connection goes away first, the generation still completes
/// and its result is dropped.
///
async fn handle_message(
    msg: WsMessage,
    session: &Arc<RwLock<CookieSession>>,
    state: &AppState,
    out: &mpsc::Sender<ChannelMsg>,
) {
    let (reply, started) = match msg {
        WsMessage::Crack => {
            let mut session = session.write().await;
            if session.is_revealed() {
                debug!("hiding revealed fortune for a new crack");
            }
            if session.crack() {
                let cracking =
                    ChannelMsg::status(SessionStatus::Cracking, "Consulting the stars...");
                (cracking, true)
            } else {
                (CookieSession::busy_reply(), false)
            }
        }
        WsMessage::Close => {
            if session.write().await.close() {
                let closed = ChannelMsg::status(SessionStatus::Closed, "The cookie is closed.");
                (closed, false)
            } else {
                (CookieSession::busy_reply(), false)
            }
        }
    };

    if out.send(reply).await.is_err() {
        debug!("session gone, discarding reply");
        return;
    }

    if started {
        let session = session.clone();
        let generator = state.generator.clone();
        let out = out.clone();
        tokio::spawn(
            async move {
                let result = generator.generate().await;
                let reply = session.write().await.finish(result);
                if out.send(reply).await.is_err() {
                    debug!("session gone, discarding fortune");
                }
            }
            .in_current_span(),
        );
    }
}

/// Sends a message by serializing it and writing it to the websocket.
///
/// Returns `false` when the socket is no longer writable.
///
async fn send_message(msg: &ChannelMsg, sender: &mut SplitSink<WebSocket, Message>) -> bool {
    match serde_json::to_string(msg) {
        Ok(serialized) => sender.send(Message::Text(serialized.into())).await.is_ok(),
        Err(e) => {
            warn!("failed to serialize message: {e}");
            true
        }
    }
}
