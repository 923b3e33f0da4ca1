//! WebSocket connection handlers.

use std::sync::{Arc, Mutex as StdMutex};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, OutboundEvent, RoomId},
    infrastructure::dto::websocket::ClientEvent,
    infrastructure::message_pusher::OUTBOUND_QUEUE_CAPACITY,
    ui::state::AppState,
    usecase::OperationError,
};

/// Room the connection is currently joined to, if any.
///
/// Shared between the receive loop (which updates it on join/leave) and the
/// teardown path (which performs the implicit leave on disconnect). A std
/// mutex is enough: it is never held across an await.
type SessionRoom = Arc<StdMutex<Option<RoomId>>>;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// The channel is the same bounded queue the `MessagePusher` delivers into;
/// when the pusher drops an overflowing connection this loop ends, the
/// socket closes, and the disconnect path below performs the implicit
/// leave.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Identity of this connection for its whole lifetime; participants are
    // keyed by this, never by display name.
    let connection_id = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    state.message_pusher.register(connection_id.clone(), tx);
    tracing::info!("Connection '{}' established", connection_id);

    let session: SessionRoom = Arc::new(StdMutex::new(None));

    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();
    let recv_session = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(
                        "WebSocket error on connection '{}': {}",
                        recv_connection_id,
                        e
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_frame(&recv_state, &recv_connection_id, &recv_session, &text).await;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping from '{}'", recv_connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Implicit leave: a dropped socket behaves exactly like an explicit
    // leave of whatever room the connection was in.
    let current_room = session.lock().expect("session lock poisoned").take();
    if let Some(room_id) = current_room
        && let Err(e) = state
            .leave_room_usecase
            .execute(&connection_id, &room_id)
            .await
    {
        tracing::warn!(
            "Failed to leave room '{}' on disconnect of '{}': {}",
            room_id,
            connection_id,
            e
        );
    }
    state.message_pusher.unregister(&connection_id);
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Decode one inbound frame and dispatch it to the matching use case.
///
/// Every rejection, malformed JSON included, is reported back to the
/// requesting connection only, as a `notice` event; nothing else observes
/// failed operations.
async fn handle_frame(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    session: &SessionRoom,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
            notify(
                state,
                connection_id,
                crate::domain::Severity::Error,
                format!("malformed event: {}", e),
            );
            return;
        }
    };

    if let Err(e) = dispatch_event(state, connection_id, session, event).await {
        notify(state, connection_id, e.severity(), e.notice_message());
    }
}

async fn dispatch_event(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    session: &SessionRoom,
    event: ClientEvent,
) -> Result<(), OperationError> {
    match event {
        ClientEvent::Join { room_id, user_name } => {
            // Joining while already in a room implies leaving the old one.
            let previous = session.lock().expect("session lock poisoned").take();
            if let Some(previous) = previous {
                state
                    .leave_room_usecase
                    .execute(connection_id, &previous)
                    .await?;
            }
            let joined = state
                .join_room_usecase
                .execute(connection_id, room_id, user_name)
                .await?;
            *session.lock().expect("session lock poisoned") = Some(joined);
            Ok(())
        }
        ClientEvent::Leave => {
            let current = session.lock().expect("session lock poisoned").take();
            if let Some(room_id) = current {
                state
                    .leave_room_usecase
                    .execute(connection_id, &room_id)
                    .await?;
            }
            Ok(())
        }
        ClientEvent::CodeChange { room_id, code } => {
            state
                .edit_code_usecase
                .code_change(connection_id, room_id, code)
                .await
        }
        ClientEvent::TypingPing { room_id, .. } => {
            state
                .edit_code_usecase
                .typing_ping(connection_id, room_id)
                .await
        }
        ClientEvent::LanguageChange { room_id, language } => {
            state
                .change_language_usecase
                .execute(connection_id, room_id, language)
                .await
        }
        ClientEvent::ToggleTypingLock { room_id, .. } => {
            state
                .toggle_typing_lock_usecase
                .execute(connection_id, room_id)
                .await
        }
        ClientEvent::Run {
            room_id,
            code,
            language,
            version_hint,
            stdin,
        } => {
            state
                .run_code_usecase
                .execute(connection_id, room_id, code, language, version_hint, stdin)
                .await
        }
        ClientEvent::ChatMessage {
            room_id, message, ..
        } => {
            state
                .chat_usecase
                .send_message(connection_id, room_id, message)
                .await
        }
        ClientEvent::ClearChat { room_id } => {
            state.chat_usecase.clear(connection_id, room_id).await
        }
    }
}

fn notify(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    severity: crate::domain::Severity,
    message: String,
) {
    let event = OutboundEvent::Notice { severity, message };
    if let Err(e) = state.message_pusher.push_to(connection_id, &event) {
        tracing::debug!("Failed to notify connection '{}': {}", connection_id, e);
    }
}
