//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::description::{parse_description, serialize_description};
use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::richtext::text_to_html;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "probforge", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "probforge", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "probforge", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "probforge", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "probforge", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Chat { messages, memory } => match do_chat_turn(state, &messages, memory).await {
      Ok(turn) => ServerWsMessage::Assistant { reply: turn.reply, raw: turn.raw, memory: turn.memory },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::GenerateDescription { messages, memory } => {
      match do_generate_description(state, &messages, memory.as_ref()).await {
        Ok((raw, description)) => {
          let html = text_to_html(&serialize_description(&description));
          ServerWsMessage::Description { raw, description, html }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::ParseDescription { text } => {
      let description = parse_description(&text);
      info!(target: "description", sections = description.filled(), "WS description parsed");
      ServerWsMessage::Parsed { description }
    }
  }
}
