//! Probe configuration.
//!
//! [`ProbeConfig`] is resolved once at startup and passed explicitly into the
//! handshake and the interactive session.  Nothing below `main.rs` reads the
//! environment.

use std::time::Duration;

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default bound for the greeting, ping and noop replies.
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(120);
/// Default deadline for each correlated handshake step.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(15);
/// Server joined when nothing else is configured.
pub const DEFAULT_SERVER_ID: &str = "4661334467366178884";
/// Maximum number of lines drained after `join_game`.
pub const DEFAULT_JOIN_DRAIN_LIMIT: usize = 5;

/// Per-attempt read windows.
///
/// A step deadline is split into attempts of at most this length so that each
/// individual read stays short.  Each window is additionally clamped to the
/// time left before the step deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Attempt window while waiting for `accounts`.
    pub login: Duration,
    /// Attempt window while waiting for `server_roles`.
    pub open_server: Duration,
    /// Attempt window while draining replies to `join_game`.
    pub join: Duration,
    /// Attempt window of the interactive background reader.  Also bounds how
    /// long it takes the reader to notice the stop signal.
    pub interactive: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(2),
            open_server: Duration::from_secs(5),
            join: Duration::from_secs(5),
            interactive: Duration::from_secs(1),
        }
    }
}

/// All runtime settings of one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Server hostname or IP address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Bound for the unconditional single-line steps (greeting, ping, noop).
    pub socket_timeout: Duration,
    /// Deadline of each correlated step (accounts, server_roles, join drain).
    pub step_timeout: Duration,
    /// 4399 account name sent with `login_4399`.
    pub account: String,
    /// 4399 password sent with `login_4399`.
    pub password: String,
    /// Server opened with `open_server` and joined with `join_game`.
    pub server_id: String,
    /// Display name sent with `join_game`.
    pub server_name: String,
    /// Pre-supplied role id.  When set, the role list returned by the server
    /// is ignored.
    pub role_id: Option<String>,
    /// Per-attempt read windows.
    pub poll: PollIntervals,
    /// Maximum number of lines drained after `join_game`.
    pub join_drain_limit: usize,
}

impl ProbeConfig {
    /// `host:port`, suitable for `TcpStream::connect` and log messages.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns `true` if either credential is empty.
    pub fn credentials_missing(&self) -> bool {
        self.account.is_empty() || self.password.is_empty()
    }

    /// The pre-supplied role id, treating an empty string as absent.
    pub fn preset_role(&self) -> Option<&str> {
        self.role_id.as_deref().filter(|r| !r.is_empty())
    }
}

impl Default for ProbeConfig {
    /// | Field            | Default               |
    /// |------------------|-----------------------|
    /// | host             | `127.0.0.1`           |
    /// | port             | `8080`                |
    /// | socket_timeout   | 120 seconds           |
    /// | step_timeout     | 15 seconds            |
    /// | server_id        | `4661334467366178884` |
    /// | join_drain_limit | 5                     |
    ///
    /// Credentials, server name and role id are empty.
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            socket_timeout: DEFAULT_SOCKET_TIMEOUT,
            step_timeout: DEFAULT_STEP_TIMEOUT,
            account: String::new(),
            password: String::new(),
            server_id: DEFAULT_SERVER_ID.to_string(),
            server_name: String::new(),
            role_id: None,
            poll: PollIntervals::default(),
            join_drain_limit: DEFAULT_JOIN_DRAIN_LIMIT,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
