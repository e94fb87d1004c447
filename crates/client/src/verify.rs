//! Integrity check for annotated text returned by the linking service.
//!
//! The service may add anchors around citations but must not change the
//! prose. A candidate is accepted only if removing the injected anchors
//! from both texts leaves them byte-equal.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Anchors pointing at dejure.org or, for the secondary-source fallback, buzer.de.
static INJECTED_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a href="https?://(?:dejure\.org|(?:www\.)?buzer\.de)/[^>]*>([^<]*)</a>"#)
        .expect("injected anchor pattern is valid")
});

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Candidate is shorter than the original.
    Truncated { original_len: usize, candidate_len: usize },
    /// Candidate differs from the original beyond the injected anchors.
    Altered,
}

/// Outcome of verifying a candidate against the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The trimmed candidate.
    Accept(String),
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }
}

/// Replace every injected anchor with its inner text.
pub fn strip_injected_links(text: &str) -> Cow<'_, str> {
    INJECTED_ANCHOR.replace_all(text, "$1")
}

/// Verify that `candidate` is `original` plus injected anchors only.
pub fn verify(original: &str, candidate: &str) -> Verdict {
    let original = original.trim();
    let candidate = candidate.trim();

    if candidate.len() < original.len() {
        return Verdict::Reject(RejectReason::Truncated {
            original_len: original.len(),
            candidate_len: candidate.len(),
        });
    }

    if strip_injected_links(original) == strip_injected_links(candidate) {
        Verdict::Accept(candidate.to_string())
    } else {
        Verdict::Reject(RejectReason::Altered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = "Der Kaufvertrag ist in § 433 BGB geregelt.";
    const WIDE: &str = r#"Der Kaufvertrag ist in <a href="https://dejure.org/gesetze/BGB/433.html" title="§ 433 BGB: Vertragstypische Pflichten beim Kaufvertrag">§ 433 BGB</a> geregelt."#;
    const NARROW: &str = r#"Der Kaufvertrag ist in § <a href="https://dejure.org/gesetze/BGB/433.html" title="§ 433 BGB: Vertragstypische Pflichten beim Kaufvertrag">433</a> BGB geregelt."#;

    #[test]
    fn test_accept_wide_links() {
        assert_eq!(verify(ORIGINAL, WIDE), Verdict::Accept(WIDE.to_string()));
    }

    #[test]
    fn test_accept_narrow_links() {
        assert!(verify(ORIGINAL, NARROW).is_accept());
    }

    #[test]
    fn test_accept_unchanged_text() {
        assert_eq!(verify(ORIGINAL, ORIGINAL), Verdict::Accept(ORIGINAL.to_string()));
    }

    #[test]
    fn test_accept_trims_both_sides() {
        let verdict = verify(&format!("  {ORIGINAL}\n"), &format!("\n{WIDE}  \r\n"));
        assert_eq!(verdict, Verdict::Accept(WIDE.to_string()));
    }

    #[test]
    fn test_accept_buzer_fallback_and_http() {
        let original = "Nach § 1 GwG gilt.";
        let candidate =
            r#"Nach <A HREF="http://www.buzer.de/gesetz/1/a1.htm" target="_blank" class="norm">§ 1 GwG</A> gilt."#;
        assert!(verify(original, candidate).is_accept());
    }

    #[test]
    fn test_reject_truncated() {
        let truncated = &WIDE[..21];
        assert_eq!(
            verify(ORIGINAL, truncated),
            Verdict::Reject(RejectReason::Truncated { original_len: ORIGINAL.len(), candidate_len: 21 })
        );
    }

    #[test]
    fn test_reject_altered_prose() {
        let altered = WIDE.replace("geregelt", "verboten");
        assert_eq!(verify(ORIGINAL, &altered), Verdict::Reject(RejectReason::Altered));
    }

    #[test]
    fn test_reject_foreign_links() {
        let foreign = WIDE.replace("https://dejure.org/", "https://evil.example/");
        assert_eq!(verify(ORIGINAL, &foreign), Verdict::Reject(RejectReason::Altered));
    }

    #[test]
    fn test_reject_appended_content() {
        let appended = format!("{WIDE}<script>alert(1)</script>");
        assert_eq!(verify(ORIGINAL, &appended), Verdict::Reject(RejectReason::Altered));
    }

    #[test]
    fn test_existing_links_in_original_are_stripped_too() {
        let original = r#"Vgl. <a href="https://dejure.org/gesetze/GG/12.html">Art. 12 GG</a> und § 433 BGB."#;
        let candidate = r#"Vgl. <a href="https://dejure.org/gesetze/GG/12.html">Art. 12 GG</a> und <a href="https://dejure.org/gesetze/BGB/433.html">§ 433 BGB</a>."#;
        assert!(verify(original, candidate).is_accept());
    }

    #[test]
    fn test_strip_injected_links() {
        assert_eq!(strip_injected_links(NARROW), ORIGINAL);
        assert!(matches!(strip_injected_links(ORIGINAL), Cow::Borrowed(_)));
    }
}
