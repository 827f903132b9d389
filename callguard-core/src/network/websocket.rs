// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Transport
//!
//! Real transport implementation using tungstenite.
//! Supports both native-tls and rustls TLS backends.
//!
//! tungstenite sockets are blocking, so each connection runs on its own
//! worker thread. The worker owns the socket and talks to the transport
//! through two queues: commands in, events out. Dropping the event receiver
//! is what detaches a connection; the worker notices on its next send and
//! shuts the socket down.

use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

#[cfg(feature = "network-rustls")]
use std::sync::Arc;

use tungstenite::client::IntoClientRequest;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Connector, Message, WebSocket};
use url::Url;

use super::error::NetworkError;
use super::transport::{Transport, TransportConfig, TransportEvent, TransportResult};

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

enum Command {
    Send(String),
    Close,
}

struct Connection {
    commands: Sender<Command>,
    events: Receiver<TransportEvent>,
}

/// WebSocket transport for the fraud-signaling endpoint.
///
/// Supports both ws:// (plaintext) and wss:// (TLS) connections.
///
/// # Example
///
/// ```ignore
/// use callguard_core::network::{Transport, TransportConfig, WebSocketTransport};
///
/// let mut transport = WebSocketTransport::new(TransportConfig::default());
/// transport.open("wss://fraud.example.com/api/ws?user_id=u&phone_number=1")?;
/// while let Some(event) = transport.poll_event() {
///     println!("{:?}", event);
/// }
/// ```
pub struct WebSocketTransport {
    config: TransportConfig,
    connection: Option<Connection>,
}

impl WebSocketTransport {
    /// Creates a new WebSocket transport.
    pub fn new(config: TransportConfig) -> Self {
        WebSocketTransport {
            config,
            connection: None,
        }
    }

    /// Returns true while a connection is attached.
    pub fn is_attached(&self) -> bool {
        self.connection.is_some()
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Transport for WebSocketTransport {
    fn open(&mut self, url: &str) -> TransportResult<()> {
        self.close();

        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let config = self.config.clone();
        let url = url.to_string();

        thread::Builder::new()
            .name("callguard-ws".into())
            .spawn(move || run_connection(&url, &config, command_rx, event_tx))
            .map_err(|e| NetworkError::ConnectionFailed(format!("Worker spawn failed: {}", e)))?;

        self.connection = Some(Connection {
            commands: command_tx,
            events: event_rx,
        });
        Ok(())
    }

    fn poll_event(&mut self) -> Option<TransportEvent> {
        let connection = self.connection.as_ref()?;
        connection.events.try_recv().ok()
    }

    fn send_text(&mut self, text: &str) -> TransportResult<()> {
        let connection = self.connection.as_ref().ok_or(NetworkError::NotConnected)?;
        connection
            .commands
            .send(Command::Send(text.to_string()))
            .map_err(|_| NetworkError::ConnectionClosed)
    }

    fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            // The worker may already be gone
            let _ = connection.commands.send(Command::Close);
        }
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Worker thread body: connect, then pump commands and frames until the
/// connection ends or is detached.
fn run_connection(
    url: &str,
    config: &TransportConfig,
    commands: Receiver<Command>,
    events: Sender<TransportEvent>,
) {
    let mut socket = match connect(url, config) {
        Ok(socket) => socket,
        Err(e) => {
            let _ = events.send(TransportEvent::Error(e.to_string()));
            let _ = events.send(TransportEvent::Closed {
                code: None,
                reason: e.to_string(),
            });
            return;
        }
    };

    if events.send(TransportEvent::Opened).is_err() {
        shutdown(&mut socket);
        return;
    }

    loop {
        loop {
            match commands.try_recv() {
                Ok(Command::Send(text)) => {
                    if let Err(e) = socket.send(Message::Text(text)) {
                        let _ = events.send(TransportEvent::Error(format!("Send failed: {}", e)));
                    }
                }
                Ok(Command::Close) | Err(TryRecvError::Disconnected) => {
                    shutdown(&mut socket);
                    return;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        let event = match socket.read() {
            Ok(Message::Text(text)) => TransportEvent::Message(text),
            Ok(Message::Binary(data)) => match String::from_utf8(data) {
                Ok(text) => TransportEvent::Message(text),
                Err(_) => {
                    tracing::debug!("Ignoring non-UTF-8 binary frame");
                    continue;
                }
            },
            Ok(Message::Close(frame)) => {
                let (code, reason) = frame
                    .map(|f| (Some(u16::from(f.code)), f.reason.to_string()))
                    .unwrap_or((None, String::new()));
                let _ = socket.flush();
                let _ = events.send(TransportEvent::Closed { code, reason });
                return;
            }
            // Pings are answered by tungstenite on the next read/write
            Ok(_) => continue,
            Err(tungstenite::Error::Io(ref e)) if is_timeout(e) => continue,
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                let _ = events.send(TransportEvent::Closed {
                    code: None,
                    reason: String::new(),
                });
                return;
            }
            Err(e) => {
                let _ = events.send(TransportEvent::Error(e.to_string()));
                let _ = events.send(TransportEvent::Closed {
                    code: None,
                    reason: e.to_string(),
                });
                return;
            }
        };

        if events.send(event).is_err() {
            shutdown(&mut socket);
            return;
        }
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

fn shutdown(socket: &mut Socket) {
    let _ = socket.close(None);
    let _ = socket.flush();
}

/// Opens TCP, wraps TLS if needed, and performs the WebSocket handshake.
fn connect(url: &str, config: &TransportConfig) -> Result<Socket, NetworkError> {
    let parsed = Url::parse(url)
        .map_err(|e| NetworkError::InvalidEndpoint(format!("{}: {}", url, e)))?;
    let is_tls = match parsed.scheme() {
        "wss" => true,
        "ws" => false,
        other => {
            return Err(NetworkError::InvalidEndpoint(format!(
                "Invalid URL scheme '{}' (expected ws:// or wss://)",
                other
            )))
        }
    };

    let addr = parsed
        .socket_addrs(|| None)
        .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| NetworkError::ConnectionFailed("No address for host".into()))?;

    let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
    let tcp_stream = TcpStream::connect_timeout(&addr, connect_timeout)
        .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

    // Long timeouts for the handshake; the read timeout drops to the poll
    // interval afterwards. The clone shares the socket, so it can adjust
    // timeouts once the stream is wrapped in TLS.
    tcp_stream
        .set_read_timeout(Some(connect_timeout))
        .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;
    tcp_stream
        .set_write_timeout(Some(connect_timeout))
        .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;
    let control = tcp_stream
        .try_clone()
        .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

    let request = url
        .into_client_request()
        .map_err(|e| NetworkError::ConnectionFailed(format!("Invalid WebSocket request: {}", e)))?;

    let connector = tls_connector(is_tls)?;
    let (socket, _response) =
        tungstenite::client_tls_with_config(request, tcp_stream, None, Some(connector)).map_err(
            |e| NetworkError::ConnectionFailed(format!("WebSocket handshake failed: {}", e)),
        )?;

    control
        .set_read_timeout(Some(Duration::from_millis(config.io_poll_interval_ms.max(1))))
        .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

    Ok(socket)
}

/// Create a TLS connector using native-tls
#[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
fn tls_connector(is_tls: bool) -> Result<Connector, NetworkError> {
    if !is_tls {
        return Ok(Connector::Plain);
    }
    let connector = native_tls::TlsConnector::new()
        .map_err(|e| NetworkError::ConnectionFailed(format!("TLS error: {}", e)))?;
    Ok(Connector::NativeTls(connector))
}

/// Create a TLS connector using rustls
#[cfg(feature = "network-rustls")]
fn tls_connector(is_tls: bool) -> Result<Connector, NetworkError> {
    if !is_tls {
        return Ok(Connector::Plain);
    }

    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| NetworkError::ConnectionFailed(format!("TLS setup failed: {}", e)))?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Ok(Connector::Rustls(Arc::new(config)))
}
