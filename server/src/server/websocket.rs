use super::{AppState, Broadcaster};
use crate::protocol::{ClientMessage, ServerMessage};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use metrics::counter;
use tracing::{debug, error, info, warn};

fn record_client_message(msg: &ClientMessage) {
    counter!("overlay_ws_client_messages_total", "type" => msg.message_type()).increment(1);
}

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    match state.broadcaster {
        Some(broadcaster) => ws.on_upgrade(|socket| handle_socket(socket, broadcaster)),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, broadcaster: Broadcaster) {
    let subscription = broadcaster.connect().await;
    let connection_id = subscription.id;
    let tx = subscription.sender;
    let mut rx = subscription.receiver;
    info!("Client connected: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Forward queued events to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    record_client_message(&client_msg);
                    match client_msg {
                        ClientMessage::Ping { seq } => {
                            let _ = tx.send(ServerMessage::Pong { seq }).await;
                        }
                    }
                }
                Err(e) => {
                    warn!("Ignoring unrecognized client message: {}", e);
                }
            },
            Ok(Message::Close(_)) => {
                debug!("Client {} requested close", connection_id);
                break;
            }
            // Pings are answered by axum; binary frames carry nothing for us
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error for {}: {}", connection_id, e);
                break;
            }
        }
    }

    send_task.abort();
    broadcaster.disconnect(connection_id).await;

    info!("Client disconnected: {}", connection_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_client_messages_are_counted_by_type() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_client_message(&ClientMessage::Ping { seq: 1 });
            record_client_message(&ClientMessage::Ping { seq: 2 });
        });

        let rendered = handle.render();
        assert!(
            rendered.contains(r#"overlay_ws_client_messages_total{type="ping"} 2"#),
            "{rendered}"
        );
    }
}
