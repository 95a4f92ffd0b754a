// SPDX-License-Identifier: MIT OR Apache-2.0

//! The move transport between two rule-engine instances
//!
//! One channel is either the host (listens for a single inbound peer) or
//! the client (dials out). Once connected both roles behave identically:
//! a background task polls the socket and queues decoded moves; the
//! foreground drains the queue on its own schedule and never touches the
//! connection handles directly.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use checkers_core::MoveRecord;

use crate::net_util::CancellationToken;
use crate::wire::{self, FrameBuffer};

/// Default TCP port for hosting a game.
pub const DEFAULT_PORT: u16 = 50001;

/// Poll interval of the hosting accept loop.
const ACCEPT_POLL: Duration = Duration::from_millis(50);
/// Poll interval of the receive loop.
const RECV_POLL: Duration = Duration::from_millis(10);
/// Deadline for an outbound connection attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection state of a [`NetworkChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkStatus {
    /// No session; hosting or connecting may be started
    Disconnected,
    /// Listening for one inbound peer
    Hosting,
    /// Outbound connection attempt in progress
    Connecting,
    /// Duplex session established
    Connected,
}

/// Session-setup failures, rendered into the status text at the public
/// boundary.
#[derive(Debug, Error)]
enum SetupError {
    #[error("channel is not disconnected")]
    Busy,
    #[error("failed to start listener: {0}")]
    Listen(#[source] std::io::Error),
    #[error("failed to resolve host address")]
    Resolve,
    #[error("connection attempt timed out")]
    Timeout,
    #[error("failed to connect to host: {0}")]
    Connect(#[source] std::io::Error),
}

#[derive(Debug)]
struct StatusCell {
    status: NetworkStatus,
    message: String,
}

/// State shared between the foreground and the background task.
#[derive(Debug)]
struct Shared {
    status: Mutex<StatusCell>,
    /// Received moves in arrival order. The lock is held only for
    /// enqueue/dequeue, never across I/O.
    moves: Mutex<VecDeque<MoveRecord>>,
    /// Write half of the active connection; locked across the awaited
    /// send, so an async mutex.
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
}

impl Shared {
    fn new() -> Self {
        Self {
            status: Mutex::new(StatusCell {
                status: NetworkStatus::Disconnected,
                message: String::new(),
            }),
            moves: Mutex::new(VecDeque::new()),
            writer: tokio::sync::Mutex::new(None),
        }
    }

    fn status(&self) -> NetworkStatus {
        self.status.lock().status
    }

    fn set_status(&self, status: NetworkStatus, message: impl Into<String>) {
        let mut cell = self.status.lock();
        cell.status = status;
        cell.message = message.into();
    }
}

/// Transports compact move records between two peers over one TCP
/// connection.
pub struct NetworkChannel {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl NetworkChannel {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            cancel: CancellationToken::new(),
            task: None,
            local_addr: None,
        }
    }

    /// Current connection state.
    pub fn status(&self) -> NetworkStatus {
        self.shared.status()
    }

    /// Human-readable description of the last state change.
    pub fn status_text(&self) -> String {
        self.shared.status.lock().message.clone()
    }

    /// The locally bound address of the listener or connection, once a
    /// session has been started. With port 0 this reveals the actual
    /// port picked by the OS.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// The LAN address to advertise to the peer.
    pub fn local_ip() -> String {
        // Routing-table probe; no traffic is sent.
        std::net::UdpSocket::bind("0.0.0.0:0")
            .and_then(|socket| {
                socket.connect("8.8.8.8:80")?;
                socket.local_addr()
            })
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Start listening for one inbound peer. Fails unless currently
    /// Disconnected; on failure the reason is available from
    /// [`status_text`](Self::status_text).
    pub async fn host_game(&mut self, port: u16) -> bool {
        match self.start_hosting(port).await {
            Ok(()) => true,
            Err(SetupError::Busy) => {
                warn!("host_game called while not disconnected");
                false
            }
            Err(err) => {
                warn!("hosting failed: {err}");
                self.shared
                    .set_status(NetworkStatus::Disconnected, err.to_string());
                false
            }
        }
    }

    async fn start_hosting(&mut self, port: u16) -> Result<(), SetupError> {
        if self.shared.status() != NetworkStatus::Disconnected {
            return Err(SetupError::Busy);
        }
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(SetupError::Listen)?;
        self.local_addr = listener.local_addr().ok();
        self.shared.set_status(
            NetworkStatus::Hosting,
            "Waiting for opponent to connect...",
        );
        self.cancel = CancellationToken::new();
        let shared = self.shared.clone();
        let cancel = self.cancel.clone();
        self.task = Some(tokio::spawn(accept_loop(listener, shared, cancel)));
        info!(addr = ?self.local_addr, "hosting game");
        Ok(())
    }

    /// Connect out to a hosting peer. Fails unless currently
    /// Disconnected; the attempt is bounded by a 5 second timeout.
    pub async fn connect_to_game(&mut self, host: &str, port: u16) -> bool {
        match self.start_connecting(host, port).await {
            Ok(()) => true,
            Err(SetupError::Busy) => {
                warn!("connect_to_game called while not disconnected");
                false
            }
            Err(err) => {
                warn!("connecting failed: {err}");
                self.shared
                    .set_status(NetworkStatus::Disconnected, err.to_string());
                false
            }
        }
    }

    async fn start_connecting(&mut self, host: &str, port: u16) -> Result<(), SetupError> {
        if self.shared.status() != NetworkStatus::Disconnected {
            return Err(SetupError::Busy);
        }
        self.shared
            .set_status(NetworkStatus::Connecting, "Connecting to host...");
        let addr = tokio::net::lookup_host((host, port))
            .await
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(SetupError::Resolve)?;
        let stream = match timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(SetupError::Connect(err)),
            Err(_) => return Err(SetupError::Timeout),
        };
        self.local_addr = stream.local_addr().ok();
        let (reader, writer) = stream.into_split();
        *self.shared.writer.lock().await = Some(writer);
        self.shared
            .set_status(NetworkStatus::Connected, "Connected to host");
        self.cancel = CancellationToken::new();
        let shared = self.shared.clone();
        let cancel = self.cancel.clone();
        self.task = Some(tokio::spawn(recv_loop(reader, shared, cancel)));
        info!(%addr, "connected to host");
        Ok(())
    }

    /// Serialize and transmit one move. Fails unless Connected; a
    /// transmit failure demotes the channel to Disconnected.
    pub async fn send_move(
        &self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> bool {
        if self.shared.status() != NetworkStatus::Connected {
            return false;
        }
        let record = MoveRecord::new(from_row, from_col, to_row, to_col);
        let frame = wire::encode_move(&record);
        let mut guard = self.shared.writer.lock().await;
        let Some(writer) = guard.as_mut() else {
            return false;
        };
        if let Err(err) = writer.write_all(&frame).await {
            warn!("failed to send move: {err}");
            *guard = None;
            self.shared
                .set_status(NetworkStatus::Disconnected, "Failed to send move");
            return false;
        }
        debug!(?record, "sent move");
        true
    }

    /// Whether a received move is waiting in the queue.
    pub fn has_received_move(&self) -> bool {
        !self.shared.moves.lock().is_empty()
    }

    /// Pop the oldest received move, or [`MoveRecord::INVALID`] when the
    /// queue is empty.
    pub fn take_received_move(&self) -> MoveRecord {
        self.shared
            .moves
            .lock()
            .pop_front()
            .unwrap_or(MoveRecord::INVALID)
    }

    /// Tear down the session: stop the background task, drop the
    /// connection, clear unconsumed moves. Idempotent; the task is
    /// joined before returning.
    pub async fn disconnect(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("background task failed: {err}");
            }
        }
        *self.shared.writer.lock().await = None;
        self.shared.moves.lock().clear();
        self.shared.set_status(NetworkStatus::Disconnected, "");
        self.local_addr = None;
    }

    /// Cancel hosting, or tear down whatever session followed it.
    /// Idempotent.
    pub async fn stop_hosting(&mut self) {
        self.disconnect().await;
    }
}

impl Default for NetworkChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Host role: poll for one inbound peer, then become the receive loop.
async fn accept_loop(listener: TcpListener, shared: Arc<Shared>, cancel: CancellationToken) {
    loop {
        if cancel.is_cancelled() {
            return;
        }
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer))) => {
                info!(%peer, "opponent connected");
                let (reader, writer) = stream.into_split();
                *shared.writer.lock().await = Some(writer);
                shared.set_status(NetworkStatus::Connected, "Opponent connected");
                // Single peer only: stop listening for further connections.
                drop(listener);
                recv_loop(reader, shared, cancel).await;
                return;
            }
            Ok(Err(err)) => {
                warn!("accept failed: {err}");
                shared.set_status(NetworkStatus::Disconnected, "Failed to accept connection");
                return;
            }
            Err(_) => {
                // Poll window elapsed; check cancellation and wait again.
            }
        }
    }
}

/// Poll the read half, decode complete records and queue them in
/// arrival order.
async fn recv_loop(reader: OwnedReadHalf, shared: Arc<Shared>, cancel: CancellationToken) {
    let mut frames = FrameBuffer::new();
    let mut chunk = [0u8; 256];
    while !cancel.is_cancelled() && shared.status() == NetworkStatus::Connected {
        match reader.try_read(&mut chunk) {
            Ok(0) => {
                info!("opponent disconnected");
                shared.set_status(NetworkStatus::Disconnected, "Opponent disconnected");
                return;
            }
            Ok(n) => {
                frames.extend(&chunk[..n]);
                let mut moves = shared.moves.lock();
                while let Some(record) = frames.next_record() {
                    debug!(?record, "received move");
                    moves.push_back(record);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                tokio::time::sleep(RECV_POLL).await;
            }
            Err(err) => {
                warn!("receive failed: {err}");
                shared.set_status(NetworkStatus::Disconnected, "Connection lost");
                return;
            }
        }
    }
}
