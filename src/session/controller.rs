//! Session lifecycle and the Working Memory mirror.
//!
//! `SessionController` is the only owner of the "current session" pointer and
//! of Working Memory (the in-process, display-facing mirror of the active
//! session's turns). All mutation passes through it; nothing else in the
//! crate holds conversation state.
//!
//! Loading is fail-open at the caller: `load_session` returns an explicit
//! `Result` and never commits partial state, and the caller converts any
//! error into a degraded-but-usable session via `fail_open` plus a
//! user-visible notice. A missing session is not an error at all, just an
//! empty session that starts from the greeting.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::session::types::Turn;
use crate::store::TurnStore;
use crate::utils::error::{FrontdeskError, Result};

/// How a `load_session` call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The session existed; this many turns were replayed into Working
    /// Memory. Zero means the store held only unrecoverable rows and the
    /// greeting was substituted.
    Replayed(usize),
    /// The id was unknown; Working Memory was reset to the greeting.
    NotFound,
}

/// Owns the current-session pointer and Working Memory.
pub struct SessionController {
    store: Arc<TurnStore>,
    greeting: String,
    current: Option<String>,
    memory: Vec<Turn>,
}

impl SessionController {
    /// Creates a controller with no active session. `greeting` is the
    /// synthetic assistant turn shown for new or empty sessions; it is never
    /// persisted until a real turn follows it.
    pub fn new(store: Arc<TurnStore>, greeting: impl Into<String>) -> Self {
        Self {
            store,
            greeting: greeting.into(),
            current: None,
            memory: Vec::new(),
        }
    }

    /// The active session id, if any.
    pub fn current_session(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The display-facing mirror of the active session's turns.
    pub fn working_memory(&self) -> &[Turn] {
        &self.memory
    }

    fn greeting_turn(&self) -> Turn {
        Turn::assistant(self.greeting.clone())
    }

    /// Starts a fresh session: generates an id not present in the store at
    /// call time, makes it current, and resets Working Memory to the
    /// greeting. Infallible: if the store cannot even be listed, the
    /// freshly generated UUID is used as-is.
    pub async fn new_session(&mut self) -> String {
        let existing = match self.store.list_session_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Could not list sessions for collision check");
                Vec::new()
            }
        };

        let mut id = Uuid::new_v4().to_string();
        while existing.iter().any(|known| known == &id) {
            id = Uuid::new_v4().to_string();
        }

        self.current = Some(id.clone());
        self.memory = vec![self.greeting_turn()];
        info!(session_id = %id, "Created new session");
        id
    }

    /// Loads `session_id`, replaying its stored turns into Working Memory.
    ///
    /// The current-session pointer moves to `session_id` before the store is
    /// consulted, matching the resume flow: even a failed load leaves the
    /// user "in" that session, just without its history. On error, Working
    /// Memory is left untouched (no partial replay is ever visible); the
    /// caller is expected to invoke [`fail_open`](Self::fail_open).
    pub async fn load_session(&mut self, session_id: &str) -> Result<LoadOutcome> {
        if session_id.trim().is_empty() {
            return Err(FrontdeskError::invalid_input("session id must be non-empty"));
        }

        self.current = Some(session_id.to_string());

        match self.store.read(session_id).await? {
            None => {
                warn!(session_id = %session_id, "No stored data for session, starting empty");
                self.memory = vec![self.greeting_turn()];
                Ok(LoadOutcome::NotFound)
            }
            Some(turns) => {
                let replayed = turns.len();
                if turns.is_empty() {
                    // Store recorded only unrecoverable rows
                    self.memory = vec![self.greeting_turn()];
                } else {
                    self.memory = turns;
                }
                info!(session_id = %session_id, turn_count = replayed, "Session loaded");
                Ok(LoadOutcome::Replayed(replayed))
            }
        }
    }

    /// Degrades to the minimal usable state after a failed load: greeting
    /// only, current pointer unchanged. The user keeps a working, if
    /// memory-less, chat.
    pub fn fail_open(&mut self) {
        self.memory = vec![self.greeting_turn()];
    }

    /// Appends a turn to Working Memory. Persistence is the conversation
    /// loop's decision, not an automatic side effect.
    pub fn push_turn(&mut self, turn: Turn) {
        self.memory.push(turn);
    }
}
