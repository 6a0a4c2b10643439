//! nel-probe: protocol-level test client for NEL session servers.
//!
//! Connects to a server, walks it through the login handshake
//! (`ping` → `noop` → `login_4399` → `open_server` → `join_game`) and then
//! drops into an interactive mode that forwards operator-typed lines verbatim
//! while printing everything the server sends.
//!
//! # Usage
//!
//! ```text
//! nel-probe [OPTIONS] [HOST] [PORT]
//!
//! Arguments:
//!   [HOST]  Server hostname or IP [default: 127.0.0.1]
//!   [PORT]  Server port [env: NEL_PORT] [default: 8080]
//!
//! Options:
//!   --socket-timeout <SECS>  Bound for greeting/ping/noop [default: 120]
//!   --step-timeout <SECS>    Deadline per correlated step [default: 15]
//!   --account <NAME>         4399 account
//!   --password <PASSWORD>    4399 password
//!   --server-id <ID>         Server to open and join
//!   --server-name <NAME>     Display name sent with join_game
//!   --role <ID>              Use this role instead of the server's list
//!   --profile <FILE>         TOML profile with any of the above
//! ```
//!
//! Every option also reads an environment variable (see `--help`).  The
//! command line wins over the environment, which wins over the profile,
//! which wins over the built-in defaults.  A malformed port or timeout is
//! logged and ignored, so the next source in that order applies.
//!
//! The sent/received transcript goes to stdout; diagnostics go to stderr
//! through `tracing` and are filtered with `RUST_LOG`.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nel_probe::application::{HandshakeSequencer, InteractiveSession, Transcript};
use nel_probe::domain::ProbeConfig;
use nel_probe::infrastructure::{load_profile, ConsoleTranscript, ProbeConnection, ProbeProfile};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Protocol-level test client for NEL session servers.
///
/// Options left unset fall back to the environment, then to the profile file,
/// then to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "nel-probe",
    about = "Line-delimited JSON test client for NEL session servers",
    version
)]
struct Cli {
    /// Server hostname or IP address.
    host: Option<String>,

    /// Server TCP port.  Falls back to `NEL_PORT` if missing or malformed.
    port: Option<String>,

    /// `NEL_PORT`, kept apart from the positional port so that a malformed
    /// positional value still falls back to it.
    #[arg(long = "env-port", env = "NEL_PORT", hide = true)]
    env_port: Option<String>,

    /// Seconds to wait for the greeting and the ping/noop replies.
    #[arg(long, env = "TEST_TIMEOUT", value_name = "SECS")]
    socket_timeout: Option<String>,

    /// Seconds to wait for each correlated handshake reply.
    #[arg(long, env = "TEST_STEP_TIMEOUT", value_name = "SECS")]
    step_timeout: Option<String>,

    /// 4399 account name sent with `login_4399`.
    #[arg(long, env = "TEST_4399_ACCOUNT")]
    account: Option<String>,

    /// 4399 password sent with `login_4399`.
    #[arg(long, env = "TEST_4399_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Server opened with `open_server` and joined with `join_game`.
    #[arg(long, env = "TEST_SERVER_ID")]
    server_id: Option<String>,

    /// Display name sent with `join_game`.
    #[arg(long, env = "TEST_SERVER_NAME")]
    server_name: Option<String>,

    /// Role id to join with.  When set, the server's role list is ignored.
    #[arg(long = "role", env = "TEST_ROLE", value_name = "ID")]
    role: Option<String>,

    /// TOML profile providing defaults for any of the above.
    #[arg(long, env = "NEL_PROBE_PROFILE", value_name = "FILE")]
    profile: Option<PathBuf>,
}

/// Parses an optional numeric setting.  A malformed value is logged and
/// treated as unset, so the next source in line decides.
fn parse_lenient<T: FromStr>(name: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring invalid {name} {raw:?}");
            None
        }
    }
}

impl Cli {
    /// Layers the command line (and environment) over `profile`.
    ///
    /// Port and timeouts are parsed here rather than by clap: a malformed
    /// value falls back to the next source instead of aborting startup.
    fn into_probe_config(self, profile: ProbeProfile) -> ProbeConfig {
        let base = profile.into_config();
        let port = parse_lenient("port", self.port.as_deref())
            .or_else(|| parse_lenient("NEL_PORT", self.env_port.as_deref()));
        let socket_timeout = parse_lenient("socket timeout", self.socket_timeout.as_deref());
        let step_timeout = parse_lenient("step timeout", self.step_timeout.as_deref());

        ProbeConfig {
            host: self.host.unwrap_or(base.host),
            port: port.unwrap_or(base.port),
            socket_timeout: socket_timeout.map_or(base.socket_timeout, Duration::from_secs),
            step_timeout: step_timeout.map_or(base.step_timeout, Duration::from_secs),
            account: self.account.unwrap_or(base.account),
            password: self.password.unwrap_or(base.password),
            server_id: self.server_id.unwrap_or(base.server_id),
            server_name: self.server_name.unwrap_or(base.server_name),
            role_id: self.role.or(base.role_id),
            ..base
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let profile = match &cli.profile {
        Some(path) => load_profile(path)
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => ProbeProfile::default(),
    };
    let config = cli.into_probe_config(profile);

    if config.credentials_missing() {
        warn!("account or password is empty; login_4399 will likely be rejected");
    }

    info!("connecting to {}", config.server_addr());
    let ProbeConnection {
        mut reader,
        mut writer,
        peer_addr,
    } = ProbeConnection::connect(&config)
        .await
        .context("opening connection")?;
    info!("connected to {peer_addr}");

    let transcript = Arc::new(ConsoleTranscript::new());

    let report = HandshakeSequencer::new(&mut reader, &mut writer, &config, transcript.as_ref())
        .run()
        .await
        .context("handshake")?;
    info!("handshake finished: {report}");

    let transcript: Arc<dyn Transcript> = transcript;
    let summary = InteractiveSession::new(writer, transcript, config.poll.interactive)
        .run(reader, BufReader::new(tokio::io::stdin()))
        .await
        .context("interactive session")?;

    info!(
        "session ended ({:?}, {} lines sent)",
        summary.exit_reason, summary.lines_sent
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
