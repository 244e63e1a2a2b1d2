//! Word-by-word typing effect.
//!
//! Purely presentational: the response is shown as a growing prefix, one
//! whitespace-delimited word at a time, before the final text replaces it.
//! Stored data is never touched by this module.

/// Iterator of running prefix concatenations of `text`'s words.
///
/// Each item is the previous item plus the next word plus a trailing space,
/// so `"Your appointment is confirmed"` yields
/// `"Your "`, `"Your appointment "`, `"Your appointment is "`,
/// `"Your appointment is confirmed "`. Finite, strictly ordered, not
/// restartable. Runs of whitespace collapse to single spaces in the emitted
/// prefixes; trimming the last item reproduces a single-spaced `text`.
pub struct WordChunks<'a> {
    words: std::str::SplitWhitespace<'a>,
    acc: String,
}

impl Iterator for WordChunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let word = self.words.next()?;
        self.acc.push_str(word);
        self.acc.push(' ');
        Some(self.acc.clone())
    }
}

/// Splits `text` into its typing-effect prefix sequence.
pub fn word_chunks(text: &str) -> WordChunks<'_> {
    WordChunks {
        words: text.split_whitespace(),
        acc: String::with_capacity(text.len() + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_prefixes() {
        let chunks: Vec<String> = word_chunks("Your appointment is confirmed").collect();
        assert_eq!(
            chunks,
            vec![
                "Your ",
                "Your appointment ",
                "Your appointment is ",
                "Your appointment is confirmed ",
            ]
        );
    }

    #[test]
    fn test_last_chunk_trims_to_original() {
        let text = "Your appointment is confirmed";
        let last = word_chunks(text).last().unwrap();
        assert_eq!(last.trim_end(), text);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert_eq!(word_chunks("").count(), 0);
        assert_eq!(word_chunks("   ").count(), 0);
    }

    #[test]
    fn test_single_word() {
        let chunks: Vec<String> = word_chunks("Hello!").collect();
        assert_eq!(chunks, vec!["Hello! "]);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let chunks: Vec<String> = word_chunks("a  b\tc\nd").collect();
        assert_eq!(chunks.last().unwrap(), "a b c d ");
    }
}
