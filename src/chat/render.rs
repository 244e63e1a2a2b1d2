//! Display surface seam.
//!
//! The core hands the renderer finished turns and in-progress typing
//! updates; how they are drawn (terminal, web, test buffer) is the
//! implementation's business.

use crate::session::types::Turn;

/// Sink for rendered conversation output.
pub trait ChatRenderer {
    /// Render one completed turn.
    fn render_turn(&mut self, turn: &Turn);

    /// Replace the single in-progress message with `partial`.
    fn typing_update(&mut self, partial: &str);

    /// The in-progress message is complete; show `text` as final.
    fn typing_done(&mut self, text: &str);

    /// Out-of-band notice (load warnings, degraded-state errors).
    fn notice(&mut self, message: &str);
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Records everything it is asked to render.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub turns: Vec<Turn>,
        pub partials: Vec<String>,
        pub finals: Vec<String>,
        pub notices: Vec<String>,
    }

    impl ChatRenderer for RecordingRenderer {
        fn render_turn(&mut self, turn: &Turn) {
            self.turns.push(turn.clone());
        }

        fn typing_update(&mut self, partial: &str) {
            self.partials.push(partial.to_string());
        }

        fn typing_done(&mut self, text: &str) {
            self.finals.push(text.to_string());
        }

        fn notice(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
    }
}
