//! Messages the client sends to the session server.
//!
//! Wire format: one JSON object (or one raw text line) followed by exactly one
//! `\n`.  Sending is fire-and-forget; there is no acknowledgement at this
//! layer and no request identifier.
//!
//! ```text
//! {"ping":"ok"}
//! {"type":"noop"}
//! {"type":"login_4399","account":"…","password":"…"}
//! {"type":"open_server","serverId":"…"}
//! {"type":"join_game","serverId":"…","role":"…","serverName":"…"}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while encoding an outbound message.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The message could not be serialised to JSON.
    #[error("failed to serialise message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Typed requests carrying a `type` discriminator.
///
/// Serde's internal tagging puts `"type"` first, followed by the fields in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Keeps the session warm; the server answers with a single line.
    #[serde(rename = "noop")]
    Noop,

    /// Account login with 4399 credentials.  Answered by an `accounts` message.
    #[serde(rename = "login_4399")]
    Login4399 { account: String, password: String },

    /// Opens a game server.  Answered by a `server_roles` message.
    #[serde(rename = "open_server")]
    OpenServer {
        #[serde(rename = "serverId")]
        server_id: String,
    },

    /// Joins the opened server with one of its roles.
    #[serde(rename = "join_game")]
    JoinGame {
        #[serde(rename = "serverId")]
        server_id: String,
        role: String,
        #[serde(rename = "serverName")]
        server_name: String,
    },
}

impl Request {
    /// The value of the `type` field this request is sent with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Request::Noop => "noop",
            Request::Login4399 { .. } => "login_4399",
            Request::OpenServer { .. } => "open_server",
            Request::JoinGame { .. } => "join_game",
        }
    }
}

/// The `{"ping":"ok"}` body.  It is the only request without a `type` field.
#[derive(Serialize)]
struct PingBody {
    ping: &'static str,
}

/// Anything the client can put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Liveness probe, `{"ping":"ok"}`.
    Ping,
    /// A typed JSON request.
    Request(Request),
    /// Free-form text typed by the operator, sent verbatim.
    Raw(String),
}

impl OutboundMessage {
    /// Short label used when echoing the message to the console.
    pub fn label(&self) -> &'static str {
        match self {
            OutboundMessage::Ping => "ping",
            OutboundMessage::Request(request) => request.type_name(),
            OutboundMessage::Raw(_) => "manual",
        }
    }

    /// Encodes the message as a single line of text, without the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialize`] if JSON serialisation fails.
    pub fn encode_line(&self) -> Result<String, CodecError> {
        let line = match self {
            OutboundMessage::Ping => serde_json::to_string(&PingBody { ping: "ok" })?,
            OutboundMessage::Request(request) => serde_json::to_string(request)?,
            OutboundMessage::Raw(text) => text.clone(),
        };
        Ok(line)
    }

    /// Encodes the message as the exact bytes to write: the line plus one `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialize`] if JSON serialisation fails.
    pub fn to_wire(&self) -> Result<Vec<u8>, CodecError> {
        let mut bytes = self.encode_line()?.into_bytes();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl From<Request> for OutboundMessage {
    fn from(request: Request) -> Self {
        OutboundMessage::Request(request)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_encodes_without_type_field() {
        let line = OutboundMessage::Ping.encode_line().unwrap();
        assert_eq!(line, r#"{"ping":"ok"}"#);
    }

    #[test]
    fn test_noop_encodes_as_bare_type() {
        let line = OutboundMessage::from(Request::Noop).encode_line().unwrap();
        assert_eq!(line, r#"{"type":"noop"}"#);
    }

    #[test]
    fn test_login_encodes_type_first_then_credentials() {
        // Arrange
        let msg = OutboundMessage::from(Request::Login4399 {
            account: "user".to_string(),
            password: "secret".to_string(),
        });

        // Act
        let line = msg.encode_line().unwrap();

        // Assert: exact field names and order as the server expects them
        assert_eq!(
            line,
            r#"{"type":"login_4399","account":"user","password":"secret"}"#
        );
    }

    #[test]
    fn test_open_server_uses_camel_case_server_id() {
        let msg = OutboundMessage::from(Request::OpenServer {
            server_id: "4661334467366178884".to_string(),
        });
        assert_eq!(
            msg.encode_line().unwrap(),
            r#"{"type":"open_server","serverId":"4661334467366178884"}"#
        );
    }

    #[test]
    fn test_join_game_encodes_all_fields_even_when_empty() {
        let msg = OutboundMessage::from(Request::JoinGame {
            server_id: "42".to_string(),
            role: String::new(),
            server_name: String::new(),
        });
        assert_eq!(
            msg.encode_line().unwrap(),
            r#"{"type":"join_game","serverId":"42","role":"","serverName":""}"#
        );
    }

    #[test]
    fn test_non_ascii_credentials_are_not_escaped() {
        let msg = OutboundMessage::from(Request::Login4399 {
            account: "账号".to_string(),
            password: "密码".to_string(),
        });
        let line = msg.encode_line().unwrap();
        assert!(line.contains("账号"));
        assert!(line.contains("密码"));
    }

    #[test]
    fn test_raw_text_is_sent_verbatim() {
        let msg = OutboundMessage::Raw("hello server".to_string());
        assert_eq!(msg.encode_line().unwrap(), "hello server");
    }

    #[test]
    fn test_to_wire_appends_exactly_one_newline() {
        let bytes = OutboundMessage::Ping.to_wire().unwrap();
        assert_eq!(bytes, b"{\"ping\":\"ok\"}\n");
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn test_labels_match_request_types() {
        assert_eq!(OutboundMessage::Ping.label(), "ping");
        assert_eq!(OutboundMessage::from(Request::Noop).label(), "noop");
        assert_eq!(
            OutboundMessage::from(Request::OpenServer {
                server_id: String::new()
            })
            .label(),
            "open_server"
        );
        assert_eq!(OutboundMessage::Raw("x".to_string()).label(), "manual");
    }

    #[test]
    fn test_request_deserializes_from_server_echo() {
        // The server side parses the same shapes; make sure they are symmetric.
        let request: Request =
            serde_json::from_str(r#"{"type":"open_server","serverId":"7"}"#).unwrap();
        assert_eq!(
            request,
            Request::OpenServer {
                server_id: "7".to_string()
            }
        );
    }
}
