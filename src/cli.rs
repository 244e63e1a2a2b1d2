//! Terminal shell: argument parsing, the session picker, and the chat REPL.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::agent::{GroqAgent, ReceptionAgent};
use crate::chat::render::ChatRenderer;
use crate::chat::typewriter::word_chunks;
use crate::chat::{ConversationLoop, SubmitOutcome};
use crate::config::{self, Config};
use crate::session::types::Role;
use crate::session::{LoadOutcome, SessionController, SessionRegistry};
use crate::store::TurnStore;

/// Pause between typing-effect chunks.
pub const TYPING_DELAY_MS: u64 = 50;

const NEW_SESSION_CHOICE: &str = "Start a new session";

#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(about = "frontdesk - AI receptionist for the terminal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Talk to the receptionist (default)
    Chat {
        /// Resume a specific session by id
        #[arg(short, long)]
        session: Option<String>,

        /// Path to the turn store database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Model name to use
        #[arg(short, long)]
        model: Option<String>,

        /// Path to the configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List stored session ids
    Sessions {
        /// Path to the turn store database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Chat {
            session,
            db,
            model,
            config: config_path,
        }) => {
            let config = config::load_config(model, db, config_path)?;
            run_chat(config, session).await
        }
        Some(Commands::Sessions { db }) => {
            let config = config::load_config(None, db, None)?;
            run_sessions(config).await
        }
        None => {
            let config = config::load_config(None, None, None)?;
            run_chat(config, None).await
        }
    }
}

/// Renders the conversation to stdout. Typing updates rewrite the current
/// line in place; `typing_done` commits it.
struct ConsoleRenderer;

impl ConsoleRenderer {
    fn label(role: Role) -> &'static str {
        match role {
            Role::User => "You",
            Role::Assistant => "Receptionist",
        }
    }
}

impl ChatRenderer for ConsoleRenderer {
    fn render_turn(&mut self, turn: &crate::session::types::Turn) {
        println!("{}: {}", Self::label(turn.role), turn.content);
    }

    fn typing_update(&mut self, partial: &str) {
        print!("\rReceptionist: {}", partial);
        let _ = std::io::stdout().flush();
    }

    fn typing_done(&mut self, text: &str) {
        println!("\rReceptionist: {}", text);
    }

    fn notice(&mut self, message: &str) {
        println!("[frontdesk] {}", message);
    }
}

fn greeting_for(clinic_name: &str) -> String {
    format!("Welcome to {}! How can I assist you today?", clinic_name)
}

fn farewell_for(clinic_name: &str) -> String {
    format!("Thank you for visiting {}. Have a great day!", clinic_name)
}

async fn run_chat(config: Config, session: Option<String>) -> Result<()> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .context("No API key configured. Set GROQ_API_KEY or add api_key to the config file")?;

    let store = Arc::new(
        TurnStore::open(&config.db_path())
            .await
            .context("Failed to open the turn store")?,
    );
    let registry = SessionRegistry::new(Arc::clone(&store));
    let agent: Arc<dyn ReceptionAgent> = Arc::new(GroqAgent::new(
        api_key,
        config.model().to_string(),
        config.clinic_name().to_string(),
    )?);

    let clinic = config.clinic_name();
    let mut controller = SessionController::new(Arc::clone(&store), greeting_for(clinic));
    let conversation = ConversationLoop::new(agent, Arc::clone(&store), farewell_for(clinic));

    let mut renderer = ConsoleRenderer;

    match session {
        Some(id) => resume_session(&mut controller, &id, &mut renderer).await,
        None => pick_session(&mut controller, &registry, &mut renderer).await?,
    }

    for turn in controller.working_memory().to_vec() {
        renderer.render_turn(&turn);
    }

    chat_repl(&conversation, &mut controller, &mut renderer).await
}

/// Resume `id`, falling back to a fresh greeting if the store is unavailable
/// or the session does not exist.
async fn resume_session(
    controller: &mut SessionController,
    id: &str,
    renderer: &mut impl ChatRenderer,
) {
    match controller.load_session(id).await {
        Ok(LoadOutcome::Replayed(count)) => {
            tracing::info!(session_id = %id, turns = count, "Resumed session");
        }
        Ok(LoadOutcome::NotFound) => {
            renderer.notice("No saved conversation under that id; starting fresh.");
        }
        Err(err) => {
            tracing::warn!(session_id = %id, error = %err, "Failed to load session, continuing without history");
            renderer.notice("Could not load the saved conversation; starting fresh.");
            controller.fail_open();
        }
    }
}

/// Offer stored sessions to resume, or start a new one. Store failures here
/// degrade to a new session rather than aborting.
async fn pick_session(
    controller: &mut SessionController,
    registry: &SessionRegistry,
    renderer: &mut impl ChatRenderer,
) -> Result<()> {
    let existing = match registry.list_session_ids().await {
        Ok(ids) => ids,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to list sessions");
            renderer.notice("Could not read stored sessions; starting fresh.");
            Vec::new()
        }
    };

    if existing.is_empty() {
        let id = controller.new_session().await;
        tracing::info!(session_id = %id, "Started new session");
        return Ok(());
    }

    let mut options = vec![NEW_SESSION_CHOICE.to_string()];
    options.extend(existing);

    let choice = inquire::Select::new("Resume a session or start a new one?", options)
        .prompt()
        .context("Session selection cancelled")?;

    if choice == NEW_SESSION_CHOICE {
        let id = controller.new_session().await;
        tracing::info!(session_id = %id, "Started new session");
    } else {
        resume_session(controller, &choice, renderer).await;
    }
    Ok(())
}

async fn chat_repl(
    conversation: &ConversationLoop,
    controller: &mut SessionController,
    renderer: &mut ConsoleRenderer,
) -> Result<()> {
    loop {
        let utterance = match inquire::Text::new("You:").prompt() {
            Ok(text) => text,
            Err(inquire::InquireError::OperationCanceled)
            | Err(inquire::InquireError::OperationInterrupted) => {
                renderer.notice("Conversation closed.");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read input"),
        };

        if utterance.trim().is_empty() {
            continue;
        }

        match conversation.submit(controller, utterance.trim()).await {
            Ok(SubmitOutcome::Replied(response)) => {
                type_out(renderer, &response).await;
            }
            Ok(SubmitOutcome::Farewell(farewell)) => {
                type_out(renderer, &farewell).await;
                return Ok(());
            }
            Ok(SubmitOutcome::Inactive) => {
                renderer.notice("No active session.");
                return Ok(());
            }
            Err(err) => {
                tracing::error!(error = %err, "Submission failed");
                renderer.notice(&format!("Something went wrong: {}", err));
            }
        }
    }
}

/// Word-by-word reveal of `response` at the fixed typing pace.
async fn type_out(renderer: &mut impl ChatRenderer, response: &str) {
    for chunk in word_chunks(response) {
        renderer.typing_update(&chunk);
        tokio::time::sleep(Duration::from_millis(TYPING_DELAY_MS)).await;
    }
    renderer.typing_done(response);
}

async fn run_sessions(config: Config) -> Result<()> {
    let store = TurnStore::open(&config.db_path())
        .await
        .context("Failed to open the turn store")?;
    let registry = SessionRegistry::new(Arc::new(store));

    let ids = registry
        .list_session_ids()
        .await
        .context("Failed to list sessions")?;

    if ids.is_empty() {
        println!("No stored sessions.");
    } else {
        for id in ids {
            println!("{}", id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::render::testing::RecordingRenderer;
    use crate::session::types::Turn;

    #[test]
    fn test_greeting_and_farewell_wording() {
        assert_eq!(
            greeting_for("Cavity Dental Clinic"),
            "Welcome to Cavity Dental Clinic! How can I assist you today?"
        );
        assert_eq!(
            farewell_for("Cavity Dental Clinic"),
            "Thank you for visiting Cavity Dental Clinic. Have a great day!"
        );
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(ConsoleRenderer::label(Role::User), "You");
        assert_eq!(ConsoleRenderer::label(Role::Assistant), "Receptionist");
    }

    #[tokio::test]
    async fn test_type_out_ends_with_full_text() {
        let mut renderer = RecordingRenderer::default();
        type_out(&mut renderer, "See you Friday").await;

        assert_eq!(renderer.partials.len(), 3);
        assert_eq!(renderer.finals, vec!["See you Friday".to_string()]);
    }

    #[tokio::test]
    async fn test_resume_session_missing_id_notices() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            TurnStore::open(&dir.path().join("store.db")).await.unwrap(),
        );
        let mut controller = SessionController::new(store, greeting_for("Cavity Dental Clinic"));
        let mut renderer = RecordingRenderer::default();

        resume_session(&mut controller, "no-such-session", &mut renderer).await;

        assert_eq!(renderer.notices.len(), 1);
        // Fresh greeting after the fallback
        assert_eq!(
            controller.working_memory(),
            &[Turn::assistant(greeting_for("Cavity Dental Clinic"))]
        );
    }

    #[test]
    fn test_cli_parses_chat_with_session() {
        let cli = Cli::try_parse_from(["frontdesk", "chat", "--session", "abc-123"]).unwrap();
        match cli.command {
            Some(Commands::Chat { session, .. }) => {
                assert_eq!(session, Some("abc-123".to_string()));
            }
            _ => panic!("expected chat subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_sessions_with_db() {
        let cli = Cli::try_parse_from(["frontdesk", "sessions", "--db", "/tmp/x.db"]).unwrap();
        match cli.command {
            Some(Commands::Sessions { db }) => {
                assert_eq!(db, Some(PathBuf::from("/tmp/x.db")));
            }
            _ => panic!("expected sessions subcommand"),
        }
    }
}
