//! Remote agent collaborator for frontdesk
//!
//! The conversation loop only knows the [`ReceptionAgent`] trait: hand it the
//! visitor's utterance, the session id, and the prior turns, get back one
//! complete response text. The hosted-model mechanics (endpoint, prompt,
//! history window) live in the implementations.

pub mod error;
pub mod groq;
#[cfg(test)]
pub mod mock;

pub use error::AgentError;
pub use groq::GroqAgent;

use crate::session::types::Turn;

/// Trait for the hosted receptionist agent.
///
/// Implementations must be Send + Sync. The call is synchronous from the
/// loop's point of view: one utterance in, one complete response out, no
/// streaming and no retry at this seam.
#[async_trait::async_trait]
pub trait ReceptionAgent: Send + Sync {
    /// Produce the receptionist's response to `utterance`.
    ///
    /// `history` is the conversation so far, not including `utterance`; how
    /// much of it the agent actually feeds to the model is its own policy.
    async fn run(
        &self,
        utterance: &str,
        session_id: &str,
        history: &[Turn],
    ) -> Result<String, AgentError>;

    /// Implementation name, for logging
    fn name(&self) -> &'static str;
}
