//! Lines received from the session server.
//!
//! Parsing is best-effort.  A line that is not JSON, or is JSON but not an
//! object, is kept as opaque text: it can still be printed, but it never
//! satisfies a correlation check.
//!
//! Correlation is by the `type` field only.  There are no request ids, so the
//! first line with the expected type wins, whatever request it was actually
//! answering.

use serde_json::Value;

/// `type` of the reply to `login_4399`.
pub const ACCOUNTS_TYPE: &str = "accounts";

/// `type` of the reply to `open_server`.  Carries an `items` list of roles.
pub const SERVER_ROLES_TYPE: &str = "server_roles";

/// A decoded line plus its JSON value, when it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundLine {
    text: String,
    value: Option<Value>,
}

impl InboundLine {
    /// Wraps `text`, attempting to parse it as JSON.
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = serde_json::from_str::<Value>(&text).ok();
        Self { text, value }
    }

    /// The line exactly as received.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The `type` discriminator, present only for objects with a string `type`.
    pub fn message_type(&self) -> Option<&str> {
        match &self.value {
            Some(Value::Object(map)) => map.get("type").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Correlation predicate: `true` iff this is an object whose `type` equals
    /// `expected`.
    pub fn has_type(&self, expected: &str) -> bool {
        self.message_type() == Some(expected)
    }

    /// The id of the first role in a `server_roles` reply.
    ///
    /// Reads `items[0].id`.  String ids are returned unchanged and numeric ids
    /// are stringified.  A missing, null or empty `items` list, or a first
    /// item without a usable id, yields `None`.
    pub fn first_role_id(&self) -> Option<String> {
        let Some(Value::Object(map)) = &self.value else {
            return None;
        };
        let first = map.get("items")?.as_array()?.first()?;
        match first.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Number of entries in the `items` list, `0` when absent.
    pub fn item_count(&self) -> usize {
        self.value
            .as_ref()
            .and_then(|v| v.get("items"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_with_type_is_matchable() {
        let line = InboundLine::parse(r#"{"type":"accounts","items":[]}"#);
        assert_eq!(line.message_type(), Some("accounts"));
        assert!(line.has_type(ACCOUNTS_TYPE));
        assert!(!line.has_type(SERVER_ROLES_TYPE));
    }

    #[test]
    fn test_plain_text_is_kept_but_never_matches() {
        // The server greets new connections with a bare token.
        let line = InboundLine::parse("connected");
        assert_eq!(line.text(), "connected");
        assert_eq!(line.message_type(), None);
        assert!(!line.has_type("connected"));
    }

    #[test]
    fn test_json_non_object_never_matches() {
        for text in [r#""accounts""#, "42", r#"["accounts"]"#, "null"] {
            let line = InboundLine::parse(text);
            assert_eq!(line.message_type(), None, "{text}");
            assert!(!line.has_type(ACCOUNTS_TYPE), "{text} must not match");
        }
    }

    #[test]
    fn test_non_string_type_never_matches() {
        let line = InboundLine::parse(r#"{"type":7}"#);
        assert_eq!(line.message_type(), None);
    }

    #[test]
    fn test_truncated_json_is_opaque() {
        let line = InboundLine::parse(r#"{"type":"ser"#);
        assert_eq!(line.text(), r#"{"type":"ser"#);
        assert!(!line.has_type(SERVER_ROLES_TYPE));
    }

    #[test]
    fn test_first_role_id_takes_first_item() {
        let line = InboundLine::parse(
            r#"{"type":"server_roles","items":[{"id":"r1","name":"a"},{"id":"r2"}]}"#,
        );
        assert_eq!(line.first_role_id().as_deref(), Some("r1"));
        assert_eq!(line.item_count(), 2);
    }

    #[test]
    fn test_first_role_id_stringifies_numeric_id() {
        let line = InboundLine::parse(r#"{"type":"server_roles","items":[{"id":1024}]}"#);
        assert_eq!(line.first_role_id().as_deref(), Some("1024"));
    }

    #[test]
    fn test_first_role_id_empty_or_missing_list_is_none() {
        for text in [
            r#"{"type":"server_roles","items":[]}"#,
            r#"{"type":"server_roles","items":null}"#,
            r#"{"type":"server_roles"}"#,
            r#"{"type":"server_roles","items":[{"name":"no id"}]}"#,
            r#"{"type":"server_roles","items":[{"id":""}]}"#,
        ] {
            let line = InboundLine::parse(text);
            assert_eq!(line.first_role_id(), None, "{text}");
        }
    }

    #[test]
    fn test_item_count_of_opaque_line_is_zero() {
        assert_eq!(InboundLine::parse("not json").item_count(), 0);
    }
}
