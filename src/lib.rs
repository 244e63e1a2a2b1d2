//! frontdesk - conversational receptionist with durable sessions.
//!
//! The pieces, bottom up:
//! - [`store`]: append-only SQLite turn store, the durable record
//! - [`session`]: turn/role types, the session controller's Working Memory,
//!   and the registry of stored sessions
//! - [`agent`]: the [`agent::ReceptionAgent`] seam and its Groq-hosted
//!   implementation
//! - [`chat`]: the conversation loop, typing effect, and render seam
//! - [`cli`] / [`config`]: the terminal shell and layered configuration

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod session;
pub mod store;
pub mod utils;
