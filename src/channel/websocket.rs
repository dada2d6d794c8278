//! WebSocket push channel.
//!
//! Same JSON frames as the TCP transport, carried as text messages.
//! Reconnects with exponential backoff while the channel is alive.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::stream::SessionEnd;
use super::{wire, ChannelError, ChannelEvent, Outbound, PushChannel, ReconnectPolicy, EVENT_BUFFER};

#[derive(Debug)]
pub struct WebSocketChannel {
    events: mpsc::Receiver<ChannelEvent>,
    outbound: mpsc::UnboundedSender<Outbound>,
    description: String,
}

impl WebSocketChannel {
    /// Spawn a background task that connects to `url` (`ws://` or `wss://`).
    ///
    /// Must be called within a tokio runtime.
    pub fn connect(url: &str, policy: ReconnectPolicy) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let target = url.to_string();

        tokio::spawn(async move {
            let mut attempt = 0u32;
            let mut unsent = None;

            while !event_tx.is_closed() {
                match connect_async(target.as_str()).await {
                    Ok((ws, _response)) => {
                        attempt = 0;
                        info!(url = %target, "push channel connected");
                        if event_tx.send(ChannelEvent::Connected).await.is_err() {
                            break;
                        }
                        if run_session(ws, &event_tx, &mut outbound_rx, &mut unsent).await
                            == SessionEnd::Dropped
                        {
                            break;
                        }
                        warn!(url = %target, "push channel lost");
                        if event_tx.send(ChannelEvent::Disconnected).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(url = %target, error = %e, attempt, "connect failed");
                    }
                }

                tokio::time::sleep(policy.delay(attempt)).await;
                attempt = attempt.saturating_add(1);
            }
        });

        Self {
            events: event_rx,
            outbound: outbound_tx,
            description: format!("ws: {}", url),
        }
    }
}

/// A request whose send failed is left in `unsent` and goes out first on
/// the next session.
async fn run_session<S>(
    ws: S,
    events: &mpsc::Sender<ChannelEvent>,
    outbound: &mut mpsc::UnboundedReceiver<Outbound>,
    unsent: &mut Option<Outbound>,
) -> SessionEnd
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    let (mut sink, mut stream) = ws.split();

    if let Some(request) = unsent.take() {
        if let Err(e) = send_frame(&mut sink, request).await {
            warn!(error = %e, "write error on push channel");
            *unsent = Some(request);
            return SessionEnd::Lost;
        }
    }

    loop {
        tokio::select! {
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => match wire::decode(&text) {
                    Ok(Some(event)) => {
                        if events.send(event).await.is_err() {
                            return SessionEnd::Dropped;
                        }
                    }
                    Ok(None) => debug!("ignoring unhandled event frame"),
                    Err(e) => debug!(error = %e, "dropping unparsable frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "push channel closed by server");
                    return SessionEnd::Lost;
                }
                // Pings are answered by tungstenite; binary frames are not part of the protocol
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "read error on push channel");
                    return SessionEnd::Lost;
                }
                None => return SessionEnd::Lost,
            },
            request = outbound.recv() => {
                let Some(request) = request else {
                    return SessionEnd::Dropped;
                };
                if let Err(e) = send_frame(&mut sink, request).await {
                    warn!(error = %e, "write error on push channel");
                    *unsent = Some(request);
                    return SessionEnd::Lost;
                }
            }
        }
    }
}

async fn send_frame<K>(sink: &mut K, request: Outbound) -> Result<(), ChannelError>
where
    K: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let frame = request.encode()?;
    sink.send(Message::Text(frame)).await?;
    Ok(())
}

impl PushChannel for WebSocketChannel {
    fn poll_event(&mut self) -> Option<ChannelEvent> {
        self.events.try_recv().ok()
    }

    fn request_latest(&mut self) -> Result<(), ChannelError> {
        self.outbound
            .send(Outbound::RequestLatest)
            .map_err(|_| ChannelError::Closed)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
