//! Handshake sequencer.
//!
//! Takes a fresh connection to a joined game session:
//!
//! ```text
//! Connected ─greeting─▶ Ping ─▶ Noop ─▶ LoginSent ─▶ AwaitingAccounts
//!   ─▶ ServerOpenSent ─▶ AwaitingRoles ─▶ JoinSent ─▶ AwaitingJoinAck ─▶ Interactive
//! ```
//!
//! # Best effort, never blocking forever
//!
//! Every wait is bounded.  A missing or malformed reply is logged and the
//! sequence moves on; each request is sent exactly once.  Only transport
//! failures (I/O errors, the server closing the connection) end the run.
//!
//! # Correlation
//!
//! Replies are matched by their `type` field alone: the first line with the
//! expected type within the step deadline satisfies the step.  There are no
//! request ids, so a late reply to one request can satisfy a later step that
//! happens to expect the same type.  Lines that do not match are echoed and
//! skipped.

use std::fmt;
use std::time::Duration;

use nel_core::framing::ReadOutcome;
use nel_core::protocol::{InboundLine, OutboundMessage, Request, ACCOUNTS_TYPE, SERVER_ROLES_TYPE};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::ports::{LineSink, LineSource, Transcript};
use crate::domain::{deadline_after, ProbeConfig};
use crate::error::ProbeError;

/// Where the sequencer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Connected,
    Ping,
    Noop,
    LoginSent,
    AwaitingAccounts,
    ServerOpenSent,
    AwaitingRoles,
    JoinSent,
    AwaitingJoinAck,
    Interactive,
}

/// Result of one handshake step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The awaited reply arrived.  For single-line steps: any line arrived.
    Matched,
    /// The deadline passed without the awaited reply.
    TimedOut,
    /// Replies were consumed without being correlated.
    Skipped,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepOutcome::Matched => "matched",
            StepOutcome::TimedOut => "timed-out",
            StepOutcome::Skipped => "skipped",
        })
    }
}

/// What the handshake saw, step by step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeReport {
    pub greeting: StepOutcome,
    pub ping: StepOutcome,
    pub noop: StepOutcome,
    pub accounts: StepOutcome,
    pub server_roles: StepOutcome,
    pub join: StepOutcome,
    /// Role id sent with `join_game`; empty if none could be resolved.
    pub role_id: String,
    /// Lines drained after `join_game`.
    pub join_lines: usize,
}

impl fmt::Display for HandshakeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "greeting={} ping={} noop={} accounts={} server_roles={} join={} ({} lines) role={:?}",
            self.greeting,
            self.ping,
            self.noop,
            self.accounts,
            self.server_roles,
            self.join,
            self.join_lines,
            self.role_id
        )
    }
}

/// Drives the handshake over a borrowed connection.
///
/// The connection is only borrowed: once [`run`](Self::run) returns, the
/// caller moves the source (and the leftover bytes inside it) on to the
/// interactive session.
pub struct HandshakeSequencer<'a, S, K> {
    source: &'a mut S,
    sink: &'a mut K,
    config: &'a ProbeConfig,
    transcript: &'a dyn Transcript,
    state: HandshakeState,
}

impl<'a, S, K> HandshakeSequencer<'a, S, K>
where
    S: LineSource,
    K: LineSink,
{
    pub fn new(
        source: &'a mut S,
        sink: &'a mut K,
        config: &'a ProbeConfig,
        transcript: &'a dyn Transcript,
    ) -> Self {
        Self {
            source,
            sink,
            config,
            transcript,
            state: HandshakeState::Connected,
        }
    }

    /// Current state of the sequence.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Runs every step once, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::ConnectionClosed`] if the server closes the
    /// connection, or another [`ProbeError`] if a read or write fails.
    pub async fn run(&mut self) -> Result<HandshakeReport, ProbeError> {
        let config = self.config;

        let greeting = self.read_one(config.socket_timeout).await?;
        if greeting == StepOutcome::TimedOut {
            info!("no greeting within {:?}", config.socket_timeout);
        }

        self.advance(HandshakeState::Ping);
        self.send(OutboundMessage::Ping).await?;
        let ping = self.read_one(config.socket_timeout).await?;
        if ping == StepOutcome::TimedOut {
            warn!("no reply to ping within {:?}", config.socket_timeout);
        }

        self.advance(HandshakeState::Noop);
        self.send(Request::Noop.into()).await?;
        let noop = self.read_one(config.socket_timeout).await?;
        if noop == StepOutcome::TimedOut {
            warn!("no reply to noop within {:?}", config.socket_timeout);
        }

        self.advance(HandshakeState::LoginSent);
        self.send(
            Request::Login4399 {
                account: config.account.clone(),
                password: config.password.clone(),
            }
            .into(),
        )
        .await?;
        self.advance(HandshakeState::AwaitingAccounts);
        let (accounts, _) = self.await_type(ACCOUNTS_TYPE, config.poll.login).await?;
        if accounts != StepOutcome::Matched {
            warn!("no `accounts` reply to login_4399; continuing with next step");
        }

        self.advance(HandshakeState::ServerOpenSent);
        self.send(
            Request::OpenServer {
                server_id: config.server_id.clone(),
            }
            .into(),
        )
        .await?;
        self.advance(HandshakeState::AwaitingRoles);
        info!("waiting up to {:?} for server_roles", config.step_timeout);
        let (server_roles, reply) = self
            .await_type(SERVER_ROLES_TYPE, config.poll.open_server)
            .await?;

        let mut role_id = config.preset_role().unwrap_or_default().to_string();
        if let Some(reply) = reply {
            match reply.first_role_id() {
                Some(id) if role_id.is_empty() => {
                    info!("using first server role {id:?}");
                    role_id = id;
                }
                Some(_) => debug!("keeping pre-supplied role {role_id:?}"),
                None => warn!(
                    "server_roles carried no usable role ({} items)",
                    reply.item_count()
                ),
            }
        }
        if role_id.is_empty() {
            warn!("no role id resolved; join_game may fail");
        }

        self.advance(HandshakeState::JoinSent);
        self.send(
            Request::JoinGame {
                server_id: config.server_id.clone(),
                role: role_id.clone(),
                server_name: config.server_name.clone(),
            }
            .into(),
        )
        .await?;
        self.advance(HandshakeState::AwaitingJoinAck);
        info!("waiting up to {:?} for join_game replies", config.step_timeout);
        let join_lines = self.drain(config.poll.join, config.join_drain_limit).await?;

        self.advance(HandshakeState::Interactive);

        Ok(HandshakeReport {
            greeting,
            ping,
            noop,
            accounts,
            server_roles,
            join: StepOutcome::Skipped,
            role_id,
            join_lines,
        })
    }

    fn advance(&mut self, next: HandshakeState) {
        debug!("handshake {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    async fn send(&mut self, message: OutboundMessage) -> Result<(), ProbeError> {
        let line = self.sink.send(&message).await?;
        self.transcript.sent(message.label(), &line);
        Ok(())
    }

    /// Passes a received line to the transcript; blank lines are not shown.
    fn echo(&self, line: &str) {
        if !line.is_empty() {
            self.transcript.received(line);
        }
    }

    /// Consumes a single line without looking at it.
    async fn read_one(&mut self, timeout: Duration) -> Result<StepOutcome, ProbeError> {
        match self.source.read_line(timeout).await? {
            ReadOutcome::Line(line) => {
                self.echo(&line);
                Ok(StepOutcome::Matched)
            }
            ReadOutcome::TimedOut => Ok(StepOutcome::TimedOut),
            ReadOutcome::Closed => Err(ProbeError::ConnectionClosed),
        }
    }

    /// Polls lines until one has `type == expected` or the step deadline passes.
    async fn await_type(
        &mut self,
        expected: &str,
        poll: Duration,
    ) -> Result<(StepOutcome, Option<InboundLine>), ProbeError> {
        let deadline = deadline_after(self.config.step_timeout);
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok((StepOutcome::TimedOut, None));
            }
            let window = poll.min(deadline - now);
            match self.source.read_line(window).await? {
                ReadOutcome::Line(text) => {
                    self.echo(&text);
                    let line = InboundLine::parse(text);
                    if line.has_type(expected) {
                        return Ok((StepOutcome::Matched, Some(line)));
                    }
                    debug!(
                        "skipping {:?} while awaiting {expected}",
                        line.message_type().unwrap_or(line.text())
                    );
                }
                ReadOutcome::TimedOut => {}
                ReadOutcome::Closed => return Err(ProbeError::ConnectionClosed),
            }
        }
    }

    /// Echoes up to `limit` non-empty lines until the step deadline passes.
    /// Blank keep-alive lines do not count toward the limit.
    async fn drain(&mut self, poll: Duration, limit: usize) -> Result<usize, ProbeError> {
        let deadline = deadline_after(self.config.step_timeout);
        let mut drained = 0;
        while drained < limit {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.source.read_line(poll.min(deadline - now)).await? {
                ReadOutcome::Line(line) if line.is_empty() => {}
                ReadOutcome::Line(line) => {
                    self.transcript.received(&line);
                    drained += 1;
                }
                ReadOutcome::TimedOut => {}
                ReadOutcome::Closed => return Err(ProbeError::ConnectionClosed),
            }
        }
        Ok(drained)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
