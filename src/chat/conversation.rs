//! The conversation loop: one utterance in, one completed exchange out.
//!
//! `submit` is the only path by which new turns enter Working Memory and the
//! turn store. It runs to completion once started: no cancellation, no
//! timeout beyond the agent's own, no retry. Persistence is deliberately
//! asymmetric, matching observed behavior: real exchanges are stored,
//! the farewell (like the greeting) lives only in Working Memory.

use std::sync::Arc;

use tracing::{debug, info};

use crate::agent::ReceptionAgent;
use crate::session::SessionController;
use crate::session::types::Turn;
use crate::store::TurnStore;
use crate::utils::error::Result;

/// Utterances that end the conversation. Case-insensitive, exact match:
/// "bye" closes, "goodbye" does not.
pub const CLOSING_PHRASES: [&str; 3] = ["exit", "quit", "bye"];

/// What a `submit` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No session is active; the utterance was ignored.
    Inactive,
    /// A closing phrase was detected; the farewell was added to Working
    /// Memory (and NOT persisted).
    Farewell(String),
    /// A full exchange completed; both turns were persisted.
    Replied(String),
}

/// Drives one exchange at a time against the agent and the turn store.
pub struct ConversationLoop {
    agent: Arc<dyn ReceptionAgent>,
    store: Arc<TurnStore>,
    farewell: String,
}

impl ConversationLoop {
    pub fn new(
        agent: Arc<dyn ReceptionAgent>,
        store: Arc<TurnStore>,
        farewell: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            store,
            farewell: farewell.into(),
        }
    }

    /// True if `utterance` is one of the fixed closing phrases.
    pub fn is_closing_phrase(utterance: &str) -> bool {
        CLOSING_PHRASES
            .iter()
            .any(|phrase| utterance.eq_ignore_ascii_case(phrase))
    }

    /// Processes one visitor utterance against the active session.
    ///
    /// With no active session this is a no-op; the surrounding shell is
    /// responsible for disabling input in that state. On agent failure the
    /// error is returned unmasked and nothing is persisted (the visitor's
    /// utterance remains visible in Working Memory only).
    pub async fn submit(
        &self,
        controller: &mut SessionController,
        utterance: &str,
    ) -> Result<SubmitOutcome> {
        let Some(session_id) = controller.current_session().map(str::to_string) else {
            debug!("submit ignored: no active session");
            return Ok(SubmitOutcome::Inactive);
        };

        if Self::is_closing_phrase(utterance) {
            info!(session_id = %session_id, "Closing phrase received");
            controller.push_turn(Turn::assistant(self.farewell.clone()));
            return Ok(SubmitOutcome::Farewell(self.farewell.clone()));
        }

        // History is the conversation before this utterance
        let history = controller.working_memory().to_vec();
        let user_turn = Turn::user(utterance);
        controller.push_turn(user_turn.clone());

        let response = self
            .agent
            .run(utterance, &session_id, &history)
            .await?;

        let assistant_turn = Turn::assistant(response.clone());
        controller.push_turn(assistant_turn.clone());

        // Both turns of the exchange become durable together
        self.store.append(&session_id, &user_turn).await?;
        self.store.append(&session_id, &assistant_turn).await?;

        info!(
            session_id = %session_id,
            agent = self.agent.name(),
            "Exchange completed"
        );
        Ok(SubmitOutcome::Replied(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use crate::agent::mock::MockAgent;
    use crate::session::types::Role;

    const GREETING: &str = "Welcome to Cavity Dental Clinic! How can I assist you today?";
    const FAREWELL: &str = "Thank you for visiting Cavity Dental Clinic. Have a great day!";

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<TurnStore>,
        agent: Arc<MockAgent>,
        controller: SessionController,
        conversation: ConversationLoop,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            TurnStore::open(&dir.path().join("agent_storage.db"))
                .await
                .unwrap(),
        );
        let agent = Arc::new(MockAgent::new());
        let controller = SessionController::new(Arc::clone(&store), GREETING);
        let conversation = ConversationLoop::new(
            Arc::clone(&agent) as Arc<dyn ReceptionAgent>,
            Arc::clone(&store),
            FAREWELL,
        );
        Fixture {
            _dir: dir,
            store,
            agent,
            controller,
            conversation,
        }
    }

    #[test]
    fn test_closing_phrase_detection() {
        assert!(ConversationLoop::is_closing_phrase("bye"));
        assert!(ConversationLoop::is_closing_phrase("BYE"));
        assert!(ConversationLoop::is_closing_phrase("Quit"));
        assert!(ConversationLoop::is_closing_phrase("exit"));
        // Exact match only
        assert!(!ConversationLoop::is_closing_phrase("goodbye"));
        assert!(!ConversationLoop::is_closing_phrase("exit now"));
        assert!(!ConversationLoop::is_closing_phrase(""));
    }

    #[tokio::test]
    async fn test_submit_without_session_is_noop() {
        let mut f = fixture().await;

        let outcome = f
            .conversation
            .submit(&mut f.controller, "hello")
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Inactive);
        assert_eq!(f.agent.call_count(), 0);
        assert!(f.controller.working_memory().is_empty());
    }

    #[tokio::test]
    async fn test_submit_persists_both_turns() {
        let mut f = fixture().await;
        let id = f.controller.new_session().await;
        f.agent.set_response("Confirmed for Friday at 3pm.");

        let outcome = f
            .conversation
            .submit(&mut f.controller, "Book a cleaning for Friday 3pm")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Replied("Confirmed for Friday at 3pm.".to_string())
        );

        // Working Memory: greeting + user + assistant
        let memory = f.controller.working_memory();
        assert_eq!(memory.len(), 3);
        assert_eq!(memory[1], Turn::user("Book a cleaning for Friday 3pm"));
        assert_eq!(memory[2], Turn::assistant("Confirmed for Friday at 3pm."));

        // Store: exactly the two real turns, no greeting
        let stored = f.store.read(&id).await.unwrap().unwrap();
        assert_eq!(
            stored,
            vec![
                Turn::user("Book a cleaning for Friday 3pm"),
                Turn::assistant("Confirmed for Friday at 3pm."),
            ]
        );
    }

    #[tokio::test]
    async fn test_farewell_not_persisted() {
        let mut f = fixture().await;
        let id = f.controller.new_session().await;

        let outcome = f.conversation.submit(&mut f.controller, "bye").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Farewell(FAREWELL.to_string()));

        // Farewell visible in Working Memory
        let memory = f.controller.working_memory();
        assert_eq!(memory.last().unwrap(), &Turn::assistant(FAREWELL));

        // Agent never called, store never touched for this session
        assert_eq!(f.agent.call_count(), 0);
        assert!(f.store.read(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_farewell_leaves_existing_turns_unchanged() {
        let mut f = fixture().await;
        let id = f.controller.new_session().await;
        f.agent.set_response("Hello!");

        f.conversation.submit(&mut f.controller, "hi").await.unwrap();
        let before = f.store.read(&id).await.unwrap().unwrap();

        f.conversation.submit(&mut f.controller, "QUIT").await.unwrap();
        let after = f.store.read(&id).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_agent_failure_is_fatal_to_the_turn() {
        let mut f = fixture().await;
        let id = f.controller.new_session().await;
        f.agent.set_error(AgentError::network("connection refused"));

        let result = f.conversation.submit(&mut f.controller, "hello").await;
        assert!(result.is_err());

        // Nothing persisted; the utterance stays in Working Memory only
        assert!(f.store.read(&id).await.unwrap().is_none());
        assert_eq!(
            f.controller.working_memory().last().unwrap().role,
            Role::User
        );
    }

    #[tokio::test]
    async fn test_agent_receives_prior_history_and_session_id() {
        let mut f = fixture().await;
        let id = f.controller.new_session().await;
        f.agent.set_response("first reply");
        f.conversation.submit(&mut f.controller, "first").await.unwrap();

        f.agent.set_response("second reply");
        f.conversation.submit(&mut f.controller, "second").await.unwrap();

        let call = f.agent.last_call().unwrap();
        assert_eq!(call.session_id, id);
        assert_eq!(call.utterance, "second");
        // History ends right before the new utterance
        assert_eq!(call.history.last().unwrap(), &Turn::assistant("first reply"));
        assert!(!call.history.iter().any(|t| t.content == "second"));
    }

    #[tokio::test]
    async fn test_exchange_roundtrip_via_reload() {
        let mut f = fixture().await;
        let id = f.controller.new_session().await;
        f.agent.set_response("Confirmed for Friday at 3pm.");
        f.conversation
            .submit(&mut f.controller, "Book a cleaning for Friday 3pm")
            .await
            .unwrap();

        // A fresh controller replays exactly the stored exchange
        let mut reloaded = SessionController::new(Arc::clone(&f.store), GREETING);
        reloaded.load_session(&id).await.unwrap();
        assert_eq!(
            reloaded.working_memory(),
            &[
                Turn::user("Book a cleaning for Friday 3pm"),
                Turn::assistant("Confirmed for Friday at 3pm."),
            ]
        );
    }
}
