pub mod conversation;
pub mod render;
pub mod typewriter;

pub use conversation::{CLOSING_PHRASES, ConversationLoop, SubmitOutcome};
pub use render::ChatRenderer;
pub use typewriter::word_chunks;
