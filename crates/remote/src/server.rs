// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection is a sequence of independent requests. A `submit` is
//! answered with `accepted` or `rejected` carrying the same request id.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use fr_core::protocol::{ClientMessage, ServerMessage};

use crate::state::{ServerState, SIMULATED_FAILURE};

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state).await?;
    Ok(())
}

/// Accept connections forever on an already bound listener.
pub async fn serve(listener: TcpListener, state: ServerState) -> std::io::Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                debug!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    debug!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(&text, &state).await;
                let json = response.to_json()?;
                ws_sink.send(Message::Text(json.into())).await?;
            }
            Ok(Message::Close(_)) => {
                debug!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(_) => {
                // Ignore other message types (Binary, Pong, Frame)
            }
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    debug!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process a client message and return the response.
pub(crate) async fn handle_client_message(text: &str, state: &ServerState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Malformed message: {}", e);
            return ServerMessage::error(format!("malformed message: {}", e));
        }
    };

    match msg {
        ClientMessage::Submit { request_id, report } => {
            let local_id = report.local_id;
            if state.should_fail() {
                info!(local_id, "Rejecting submission (simulated failure)");
                return ServerMessage::rejected(request_id, SIMULATED_FAILURE);
            }
            match state.accept(report).await {
                Ok(remote_id) => {
                    info!(local_id, remote_id = %remote_id, "Report accepted");
                    ServerMessage::accepted(request_id, remote_id)
                }
                Err(e) => {
                    error!(local_id, error = %e, "Failed to store report");
                    ServerMessage::rejected(request_id, e.to_string())
                }
            }
        }

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            ServerMessage::pong(id)
        }
    }
}
