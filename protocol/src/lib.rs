//! Defines the message boundary of a RepoMind session: the request shape a
//! conversational transport submits to the session coordinator and the
//! uniform reply envelope it gets back.

#![deny(unreachable_pub)]

mod messages;

pub use messages::AgentResponse;
pub use messages::UserRequest;
