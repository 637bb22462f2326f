//! Per-connection WebSocket serve loop.
//!
//! One independent task per connection, strictly sequential within it:
//! receive → detect → annotate → send, paced to a minimum inter-frame
//! interval. Any error inside the loop is terminal for the connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;

use facerelay_core::detection::infrastructure::onnx_ssd_detector::OnnxSsdDetector;
use facerelay_core::relay::error::RelayError;
use facerelay_core::relay::frame_processor::FrameProcessor;
use facerelay_core::relay::message::ClientMessage;

use crate::AppState;

/// Upgrade an inbound request to a WebSocket and hand it to the serve
/// loop. A failed upgrade is abandoned by axum with no registration.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| serve_connection(socket, state))
}

/// Serve one connection until the stream closes or an error is terminal.
///
/// The registry guard and the socket are released on every exit path.
async fn serve_connection(mut socket: WebSocket, state: Arc<AppState>) {
    let guard = state.registry.register();
    let id = guard.id();
    log::info!("Connection #{id} open ({} active)", state.registry.len());

    match serve_loop(&mut socket, &state).await {
        Ok(()) => log::info!("Connection #{id} closed"),
        Err(err) => log::error!("Connection #{id} terminated: {err}"),
    }
    // Guard drops here, removing the registry entry; the socket closes
    // on drop.
}

async fn serve_loop(socket: &mut WebSocket, state: &Arc<AppState>) -> Result<(), RelayError> {
    // Per-connection detector load; missing or malformed model files are
    // fatal for this connection only.
    let detector =
        OnnxSsdDetector::new(&state.model_path).map_err(|e| RelayError::Model(e.to_string()))?;
    let mut processor = FrameProcessor::with_defaults(Box::new(detector), state.confidence);

    let mut pacer = tokio::time::interval(state.frame_interval);
    pacer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        // Minimum inter-frame interval; processing time counts toward it.
        pacer.tick().await;

        let message = match socket.recv().await {
            Some(Ok(message)) => message,
            Some(Err(err)) => return Err(RelayError::Transport(err.to_string())),
            None => return Ok(()),
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => return Ok(()),
            // The transport answers pings on its own.
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Binary(_) => {
                return Err(RelayError::Transport("unexpected binary message".into()))
            }
        };

        let inbound: ClientMessage = serde_json::from_str(&text)?;
        let Some(image) = inbound.image else {
            // No image in this message: skip it without responding.
            continue;
        };

        let outbound = processor.process(&image)?;
        let json = serde_json::to_string(&outbound)?;
        socket
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;
    }
}
