use crate::catalog::SharedCatalog;
use crate::models::websocket::{ ClientMessage, ServerMessage };
use crate::responder::quick_suggestions;
use crate::transcript::{ ChatSession, ReplyDelay };

use std::error::Error;
use std::net::SocketAddr;
use std::num::NonZeroU32;

use tokio::io::{ AsyncRead, AsyncWrite };
use tokio::net::TcpListener;

use tokio_tungstenite::{ accept_async_with_config, WebSocketStream };
use tokio_tungstenite::tungstenite::error::CapacityError;
use tokio_tungstenite::tungstenite::protocol::{ Message, WebSocketConfig };

use lazy_static::lazy_static;
use governor::{ RateLimiter, Quota, state::{ InMemoryState, NotKeyed }, clock::DefaultClock };

use log::{ debug, info, warn, error };
use futures::{ Sink, SinkExt, StreamExt };

const MAX_MESSAGE_SIZE: usize = 64 * 1024;

lazy_static! {
    static ref CONNECTION_LIMITER: RateLimiter<NotKeyed, InMemoryState, DefaultClock> =
        RateLimiter::direct(Quota::per_second(NonZeroU32::new(10).expect("non-zero quota")));
}

/// Frames and messages above `MAX_MESSAGE_SIZE` are refused while reading,
/// before the payload is buffered.
pub fn ws_config() -> WebSocketConfig {
    WebSocketConfig {
        max_message_size: Some(MAX_MESSAGE_SIZE),
        max_frame_size: Some(MAX_MESSAGE_SIZE),
        ..Default::default()
    }
}

/// What every chat connection needs: the shared snapshot, reply pacing and
/// the human-contact link advertised in the welcome frame.
#[derive(Clone)]
pub struct ChatContext {
    pub catalog: SharedCatalog,
    pub delay: ReplyDelay,
    pub contact_link: String,
}

pub async fn start_ws_server(
    addr: &str,
    ctx: ChatContext
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await.map_err(|e|
        format!("Failed to bind websocket server to {}: {}", addr, e)
    )?;
    info!("WS server listening on: {}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;

        if CONNECTION_LIMITER.check().is_err() {
            warn!("Global connection rate limit exceeded for {}. Dropping connection.", peer);
            continue;
        }

        info!("Incoming connection from: {}", peer);
        let ctx = ctx.clone();

        tokio::spawn(async move {
            match accept_async_with_config(stream, Some(ws_config())).await {
                Ok(ws) => handle_connection(peer, ws, ctx).await,
                Err(e) => error!("Handshake failed for {}: {}", peer, e),
            }
        });
    }
}

async fn send_frame<S>(tx: &mut S, frame: &ServerMessage) -> Result<(), Box<dyn Error + Send + Sync>>
    where S: Sink<Message> + Unpin, S::Error: Error + Send + Sync + 'static
{
    let json = serde_json::to_string(frame)?;
    tx.send(Message::Text(json)).await?;
    Ok(())
}

pub async fn handle_connection<S>(peer: SocketAddr, websocket: WebSocketStream<S>, ctx: ChatContext)
    where S: AsyncRead + AsyncWrite + Unpin
{
    let (mut tx, mut rx) = websocket.split();
    let session = ChatSession::new(ctx.catalog.clone(), ctx.delay);
    info!("Assigned conversation ID {} to {}", session.id(), peer);

    let welcome = ServerMessage::Welcome {
        conversation_id: session.id().to_string(),
        suggestions: quick_suggestions(),
        contact_link: ctx.contact_link.clone(),
    };
    if let Err(e) = send_frame(&mut tx, &welcome).await {
        error!("Error sending welcome to {}: {}", peer, e);
        return;
    }

    while let Some(msg) = rx.next().await {
        let message = match msg {
            Ok(message) => message,
            Err(tokio_tungstenite::tungstenite::Error::Capacity(CapacityError::MessageTooLong { size, max_size })) => {
                warn!("Message from {} exceeds size limit ({} > {})", peer, size, max_size);
                let frame = ServerMessage::Error { message: "Message too large".to_string() };
                if send_frame(&mut tx, &frame).await.is_err() {
                    error!("Failed to send size limit error to {}", peer);
                }
                break;
            }
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        };

        match message {
            Message::Text(text) => {
                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Chat { content }) => {
                        if let Err(e) = answer(&session, &content, &mut tx).await {
                            error!("Error answering {}: {}", peer, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse message from {}: {}", peer, e);
                        let frame = ServerMessage::Error {
                            message: format!("Failed to parse message: {}", e),
                        };
                        if let Err(e) = send_frame(&mut tx, &frame).await {
                            error!("Error sending parse error to {}: {}", peer, e);
                            break;
                        }
                    }
                }
            }
            Message::Close(_) => {
                info!("Received close frame from {}", peer);
                break;
            }
            Message::Ping(ping_data) => {
                if tx.send(Message::Pong(ping_data)).await.is_err() {
                    error!("Failed to send pong to {}", peer);
                    break;
                }
            }
            Message::Pong(_) => {}
            Message::Binary(_) => {
                warn!("Ignoring binary message from {}", peer);
            }
            Message::Frame(_) => {}
        }
    }
    info!("WebSocket connection closed for {} (Conv ID: {})", peer, session.id());
}

/// Sends `typing`, waits out the reply delay, then sends the reply. The next
/// frame is not read until this returns, so a client cannot stack requests
/// on one connection.
async fn answer<S>(
    session: &ChatSession,
    content: &str,
    tx: &mut S
) -> Result<(), Box<dyn Error + Send + Sync>>
    where S: Sink<Message> + Unpin, S::Error: Error + Send + Sync + 'static
{
    let pending = match session.submit(content).await {
        Some(pending) => pending,
        None => {
            debug!("Ignoring blank chat message in {}", session.id());
            return Ok(());
        }
    };

    send_frame(tx, &ServerMessage::Typing).await?;

    let frame = match pending.wait().await {
        Ok(reply) => ServerMessage::Response {
            suggestions: if reply.show_suggestions { quick_suggestions() } else { Vec::new() },
            content: reply.text,
            show_suggestions: reply.show_suggestions,
            timestamp: reply.timestamp,
        },
        Err(e) => {
            error!("Reply for {} failed: {}", session.id(), e);
            ServerMessage::Error { message: "Maaf, terjadi kesalahan. Silakan coba lagi.".to_string() }
        }
    };
    send_frame(tx, &frame).await
}
