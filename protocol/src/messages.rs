use serde::Deserialize;
use serde::Serialize;

/// Inbound request submitted by the conversational transport.
///
/// Only `content` crosses the boundary; unknown fields are rejected during
/// deserialization so a malformed envelope fails loudly instead of being
/// silently truncated.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserRequest {
    /// Free-form request text.
    pub content: String,
}

impl UserRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Reply envelope produced by the session coordinator.
///
/// Every branch of the dispatch state machine returns this shape; `role`
/// carries the session identifier so a multiplexed transport can attribute
/// the reply.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AgentResponse {
    /// Session identifier of the coordinator that produced the reply.
    pub role: String,
    /// Reply text.
    pub content: String,
}

impl AgentResponse {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}
