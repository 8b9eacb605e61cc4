//! Two-sentence extractive summary.

/// Keep the first two fragments between `.`, `!` and `?`, each trimmed, joined
/// with `". "` and closed with a period. Text without terminators comes back
/// whole with a period appended.
pub fn summarize(text: &str) -> String {
    let fragments: Vec<&str> = text
        .split(&['.', '!', '?'][..])
        .take(2)
        .map(str::trim)
        .collect();
    format!("{}.", fragments.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_two_sentences() {
        assert_eq!(summarize("A. B. C."), "A. B.");
    }

    #[test]
    fn unterminated_text_gets_period() {
        assert_eq!(summarize("hello world"), "hello world.");
    }

    #[test]
    fn mixed_terminators() {
        assert_eq!(
            summarize("Are you SOC2 certified? We need it! Thanks."),
            "Are you SOC2 certified. We need it."
        );
    }

    #[test]
    fn single_terminated_sentence_keeps_empty_tail() {
        assert_eq!(summarize("Hi!"), "Hi. .");
        assert_eq!(summarize(""), ".");
    }
}
