//! Message codec for the line-delimited JSON session protocol.

pub mod inbound;
pub mod outbound;

pub use inbound::{InboundLine, ACCOUNTS_TYPE, SERVER_ROLES_TYPE};
pub use outbound::{CodecError, OutboundMessage, Request};
