//! Mock receptionist agent for unit tests
//!
//! Configurable canned response or error, with a call counter and capture of
//! the last arguments for verification. No network.

use std::sync::{Arc, Mutex};

use crate::agent::error::AgentError;
use crate::agent::ReceptionAgent;
use crate::session::types::Turn;

/// Captured arguments from the most recent `run` call.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub utterance: String,
    pub session_id: String,
    pub history: Vec<Turn>,
}

pub struct MockAgent {
    response: Arc<Mutex<String>>,
    error: Arc<Mutex<Option<AgentError>>>,
    call_count: Arc<Mutex<usize>>,
    last_call: Arc<Mutex<Option<CapturedCall>>>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new("Mock response".to_string())),
            error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Sets the response to return
    pub fn set_response(&self, content: impl Into<String>) {
        *self.response.lock().unwrap() = content.into();
    }

    /// Sets an error to return instead of the response
    pub fn set_error(&self, error: AgentError) {
        *self.error.lock().unwrap() = Some(error);
    }

    /// Number of times `run` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Arguments of the last `run` call, if any
    pub fn last_call(&self) -> Option<CapturedCall> {
        self.last_call.lock().unwrap().clone()
    }
}

impl Default for MockAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReceptionAgent for MockAgent {
    async fn run(
        &self,
        utterance: &str,
        session_id: &str,
        history: &[Turn],
    ) -> Result<String, AgentError> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_call.lock().unwrap() = Some(CapturedCall {
            utterance: utterance.to_string(),
            session_id: session_id.to_string(),
            history: history.to_vec(),
        });

        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.response.lock().unwrap().clone())
    }

    fn name(&self) -> &'static str {
        "MockAgent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_response() {
        let mock = MockAgent::new();
        mock.set_response("Confirmed for Friday at 3pm.");

        let reply = mock.run("book me in", "abc", &[]).await.unwrap();
        assert_eq!(reply, "Confirmed for Friday at 3pm.");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_returns_configured_error() {
        let mock = MockAgent::new();
        mock.set_error(AgentError::network("down"));

        let result = mock.run("hello", "abc", &[]).await;
        assert!(matches!(result, Err(AgentError::Network { .. })));
    }

    #[tokio::test]
    async fn test_mock_captures_arguments() {
        let mock = MockAgent::new();
        let history = vec![Turn::user("earlier")];

        mock.run("now", "session-1", &history).await.unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(call.utterance, "now");
        assert_eq!(call.session_id, "session-1");
        assert_eq!(call.history, history);
    }
}
