//! Cheap check for text that might contain a linkable citation.

use std::sync::LazyLock;

use regex::Regex;

/// Section signs, `Art.`, and the two-digit groups typical of file numbers
/// (`12/05`, `1 BvR 3.05`) and paragraph lists (`12, `).
///
/// The trailing groups stand in for negative lookahead: a two-digit group
/// must not run on into a third digit.
static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"§|&sect;|Art\.",
        r"|/[0-9]{2}(?:[^0-9/]|$)",
        r"| [0-9]{1,2}[/.][0-9]{2}(?:[^0-9.]|$)",
        r"|[0-9]{2}, ",
    ))
    .expect("citation prefilter pattern is valid")
});

/// Returns true when `text` plausibly contains a citation.
///
/// False positives only cost a remote call; false negatives skip annotation.
pub fn has_candidate(text: &str) -> bool {
    CANDIDATE.is_match(text)
}
