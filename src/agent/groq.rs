//! Groq-hosted receptionist agent.
//!
//! Talks to Groq's OpenAI-compatible `/chat/completions` endpoint. The
//! request carries a receptionist system prompt (clinic name and today's
//! date baked in), a bounded window of prior turns, and the new utterance.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::agent::error::{AgentError, Result};
use crate::agent::ReceptionAgent;
use crate::session::types::{Role, Turn};

/// Default hosted model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Groq's OpenAI-compatible chat completions endpoint
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// How many prior user/assistant exchanges accompany each request
pub const HISTORY_RESPONSES: usize = 3;

/// Timeout for the model call in seconds
pub const AGENT_TIMEOUT_SECS: u64 = 30;

/// Agent backed by the Groq API.
pub struct GroqAgent {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    clinic_name: String,
}

impl GroqAgent {
    /// Creates an agent for the given clinic. Fails if `api_key` is empty or
    /// the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        clinic_name: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AgentError::config("GROQ_API_KEY is not set"));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(AGENT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AgentError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: GROQ_API_URL.to_string(),
            clinic_name: clinic_name.into(),
        })
    }

    /// Overrides the endpoint (local stub servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The configured model id
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

/// The receptionist persona sent as the system message. Kept close to the
/// front-desk script: lead with the answer, grouped bullets, confirm
/// bookings with exact dates.
fn system_prompt(clinic_name: &str, today: NaiveDate) -> String {
    format!(
        "You are a friendly and professional virtual receptionist for '{clinic_name}'. \
Start every response with the most relevant answer, followed by concise bullet points using emojis. \
Lead with the main message, group related details, and be brief and structured.\n\n\
Your responsibilities:\n\
- Book appointments (ask for name, contact number, preferred date & time)\n\
- Share dental services in grouped, easy-to-scan bullets:\n\
  - Preventive: cleaning, checkups, fluoride\n\
  - Cosmetic: whitening, veneers, smile design\n\
  - Orthodontic: braces, aligners\n\
- Answer FAQs with clear, short answers\n\n\
Avoid long paragraphs. Use friendly emojis. Confirm bookings with exact dates.\n\
Today's date: {}.",
        today.format("%Y-%m-%d")
    )
}

/// Keeps the last `responses` user/assistant exchanges (two turns each).
fn history_window(history: &[Turn], responses: usize) -> &[Turn] {
    let keep = responses * 2;
    let start = history.len().saturating_sub(keep);
    &history[start..]
}

/// Assembles the wire messages: system prompt, bounded history, utterance.
fn build_messages(clinic_name: &str, history: &[Turn], utterance: &str) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(history.len().min(HISTORY_RESPONSES * 2) + 2);
    messages.push(WireMessage {
        role: "system".to_string(),
        content: system_prompt(clinic_name, Utc::now().date_naive()),
    });
    for turn in history_window(history, HISTORY_RESPONSES) {
        messages.push(WireMessage {
            role: match turn.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: turn.content.clone(),
        });
    }
    messages.push(WireMessage {
        role: "user".to_string(),
        content: utterance.to_string(),
    });
    messages
}

#[async_trait::async_trait]
impl ReceptionAgent for GroqAgent {
    async fn run(
        &self,
        utterance: &str,
        session_id: &str,
        history: &[Turn],
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: build_messages(&self.clinic_name, history, utterance),
        };

        debug!(
            session_id = %session_id,
            model = %self.model,
            message_count = request.messages.len(),
            "Calling Groq chat completions"
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(session_id = %session_id, status = %status, "Groq request failed");
            return Err(match status.as_u16() {
                401 | 403 => AgentError::auth(format!("Groq rejected the API key: {body}")),
                _ => AgentError::service(body, Some(status.as_str())),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AgentError::serialization("response contained no choices"))?;

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "GroqAgent"
    }
}
