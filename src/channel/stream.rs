//! Stream-based push channel.
//!
//! Exchanges newline-delimited JSON frames (see [`wire`](super::wire)) over
//! an async byte stream. [`StreamChannel::connect`] dials a TCP endpoint and
//! keeps reconnecting; [`StreamChannel::spawn`] wraps an existing stream for
//! a single session.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{wire, ChannelError, ChannelEvent, Outbound, PushChannel, ReconnectPolicy, EVENT_BUFFER};

/// A push channel backed by a background task that owns the stream.
///
/// # Example with an in-memory stream
///
/// ```
/// use levelwatch::StreamChannel;
///
/// # tokio_test::block_on(async {
/// let (client, _server) = tokio::io::duplex(1024);
/// let channel = StreamChannel::spawn(client, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamChannel {
    events: mpsc::Receiver<ChannelEvent>,
    outbound: mpsc::UnboundedSender<Outbound>,
    description: String,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    /// The remote side closed the stream or it failed.
    Lost,
    /// The channel was dropped; the task should exit.
    Dropped,
}

impl StreamChannel {
    /// Spawn a background task that dials `addr` and reconnects with
    /// backoff whenever the connection is lost.
    ///
    /// Must be called within a tokio runtime.
    pub fn connect(addr: &str, policy: ReconnectPolicy) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let target = addr.to_string();

        tokio::spawn(async move {
            let mut attempt = 0u32;
            let mut unsent = None;

            while !event_tx.is_closed() {
                match TcpStream::connect(&target).await {
                    Ok(stream) => {
                        attempt = 0;
                        info!(addr = %target, "push channel connected");
                        if event_tx.send(ChannelEvent::Connected).await.is_err() {
                            break;
                        }
                        if run_session(stream, &event_tx, &mut outbound_rx, &mut unsent).await
                            == SessionEnd::Dropped
                        {
                            break;
                        }
                        warn!(addr = %target, "push channel lost");
                        if event_tx.send(ChannelEvent::Disconnected).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(addr = %target, error = %e, attempt, "connect failed");
                    }
                }

                tokio::time::sleep(policy.delay(attempt)).await;
                attempt = attempt.saturating_add(1);
            }
        });

        Self {
            events: event_rx,
            outbound: outbound_tx,
            description: format!("tcp: {}", addr),
        }
    }

    /// Spawn a background task serving one already-open stream.
    ///
    /// Emits `Connected` immediately and `Disconnected` once the stream
    /// ends. There is no reconnection.
    pub fn spawn<S>(stream: S, description: &str) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut unsent = None;
            if event_tx.send(ChannelEvent::Connected).await.is_err() {
                return;
            }
            if run_session(stream, &event_tx, &mut outbound_rx, &mut unsent).await == SessionEnd::Lost {
                let _ = event_tx.send(ChannelEvent::Disconnected).await;
            }
        });

        Self {
            events: event_rx,
            outbound: outbound_tx,
            description: format!("stream: {}", description),
        }
    }
}

/// Pump frames in both directions until the stream ends or the channel is
/// dropped.
///
/// A request whose write failed is left in `unsent` and goes out first on
/// the next session.
async fn run_session<S>(
    stream: S,
    events: &mpsc::Sender<ChannelEvent>,
    outbound: &mut mpsc::UnboundedReceiver<Outbound>,
    unsent: &mut Option<Outbound>,
) -> SessionEnd
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    if let Some(request) = unsent.take() {
        if let Err(e) = write_frame(&mut writer, request).await {
            warn!(error = %e, "write error on push channel");
            *unsent = Some(request);
            return SessionEnd::Lost;
        }
    }

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match wire::decode(line) {
                        Ok(Some(event)) => {
                            if events.send(event).await.is_err() {
                                return SessionEnd::Dropped;
                            }
                        }
                        Ok(None) => debug!("ignoring unhandled event frame"),
                        Err(e) => debug!(error = %e, "dropping unparsable frame"),
                    }
                }
                Ok(None) => return SessionEnd::Lost,
                Err(e) => {
                    warn!(error = %e, "read error on push channel");
                    return SessionEnd::Lost;
                }
            },
            request = outbound.recv() => {
                let Some(request) = request else {
                    return SessionEnd::Dropped;
                };
                if let Err(e) = write_frame(&mut writer, request).await {
                    warn!(error = %e, "write error on push channel");
                    *unsent = Some(request);
                    return SessionEnd::Lost;
                }
            }
        }
    }
}

async fn write_frame<W>(writer: &mut W, request: Outbound) -> Result<(), ChannelError>
where
    W: AsyncWrite + Unpin,
{
    let mut frame = request.encode()?;
    frame.push('\n');
    writer.write_all(frame.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

impl PushChannel for StreamChannel {
    fn poll_event(&mut self) -> Option<ChannelEvent> {
        // Try to receive without blocking
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::duplex;
    use tokio::time::{sleep, Duration};

    fn frame(level: u32) -> String {
        format!(
            "{}\n",
            json!({
                "event": "new_measurement",
                "data": { "timestamp": 0, "data": { "water_level": level } }
            })
        )
    }

    #[tokio::test]
    async fn test_spawn_emits_connected_then_measurements() {
        let (client, mut server) = duplex(4096);
        let mut channel = StreamChannel::spawn(client, "test");

        server.write_all(frame(15).as_bytes()).await.unwrap();
        server.write_all(frame(45).as_bytes()).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        assert_eq!(channel.poll_event(), Some(ChannelEvent::Connected));
        for expected in [15, 45] {
            let Some(ChannelEvent::Measurement(payload)) = channel.poll_event() else {
                panic!("expected a measurement");
            };
            assert_eq!(payload["data"]["water_level"], json!(expected));
        }
        assert!(channel.poll_event().is_none());
    }

    #[tokio::test]
    async fn test_spawn_skips_garbage_lines() {
        let (client, mut server) = duplex(4096);
        let mut channel = StreamChannel::spawn(client, "test");

        server
            .write_all(b"not json\n\n{\"event\":\"other\"}\n")
            .await
            .unwrap();
        server.write_all(frame(30).as_bytes()).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        assert_eq!(channel.poll_event(), Some(ChannelEvent::Connected));
        assert!(matches!(channel.poll_event(), Some(ChannelEvent::Measurement(_))));
        assert!(channel.poll_event().is_none());
    }

    #[tokio::test]
    async fn test_spawn_reports_disconnect_on_eof() {
        let (client, server) = duplex(64);
        let mut channel = StreamChannel::spawn(client, "test");
        drop(server);
        sleep(Duration::from_millis(50)).await;

        assert_eq!(channel.poll_event(), Some(ChannelEvent::Connected));
        assert_eq!(channel.poll_event(), Some(ChannelEvent::Disconnected));
    }

    #[tokio::test]
    async fn test_request_latest_is_written_to_stream() {
        let (client, server) = duplex(4096);
        let mut channel = StreamChannel::spawn(client, "test");
        channel.request_latest().unwrap();

        let mut lines = BufReader::new(server).lines();
        let line = tokio::time::timeout(Duration::from_secs(1), lines.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(line.as_deref(), Some(r#"{"event":"request_latest"}"#));
    }

    fn broken_pipe() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer gone")
    }

    #[tokio::test]
    async fn test_failed_request_write_is_kept() {
        let stream = tokio_test::io::Builder::new()
            .write_error(broken_pipe())
            .build();
        let (events, _events_rx) = mpsc::channel(EVENT_BUFFER);
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        outbound_tx.send(Outbound::RequestLatest).unwrap();

        let mut unsent = None;
        let end = run_session(stream, &events, &mut outbound_rx, &mut unsent).await;
        assert_eq!(end, SessionEnd::Lost);
        assert_eq!(unsent, Some(Outbound::RequestLatest));
    }

    #[tokio::test]
    async fn test_kept_request_goes_out_first_on_next_session() {
        let (client, server) = duplex(4096);
        let (events, _events_rx) = mpsc::channel(EVENT_BUFFER);
        let (_outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let mut unsent = Some(Outbound::RequestLatest);

        let session = tokio::spawn(async move {
            run_session(client, &events, &mut outbound_rx, &mut unsent).await;
            unsent
        });

        let mut lines = BufReader::new(server).lines();
        let line = tokio::time::timeout(Duration::from_secs(1), lines.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(line.as_deref(), Some(r#"{"event":"request_latest"}"#));

        drop(lines);
        let unsent = tokio::time::timeout(Duration::from_secs(1), session)
            .await
            .unwrap()
            .unwrap();
        assert!(unsent.is_none());
    }

    #[tokio::test]
    async fn test_description() {
        let (client, _server) = duplex(64);
        let channel = StreamChannel::spawn(client, "tcp://localhost:9090");
        assert_eq!(channel.description(), "stream: tcp://localhost:9090");
    }
}
