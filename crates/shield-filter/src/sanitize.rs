//! Best-effort input sanitization.
//!
//! Sanitization is only attempted for inputs that tripped a signature but
//! fell below the escalation thresholds. It strips the structural tricks an
//! attacker uses to fake turn boundaries and smuggle encoded payloads; it
//! does not try to rewrite natural-language content.

use regex::Regex;

/// Strips injection markers and encoded blobs from an input string.
///
/// The cleaner is idempotent on already-clean text: running it over its own
/// output is a no-op.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    end_marker: Regex,
    begin_marker: Regex,
    special_token: Regex,
    whitespace: Regex,
    base64_run: Regex,
}

/// Placeholder substituted for stripped base64 runs.
pub const ENCODED_CONTENT_PLACEHOLDER: &str = "[ENCODED_CONTENT_REMOVED]";

impl Sanitizer {
    /// Compile the cleanup patterns.
    pub fn new() -> Self {
        Self {
            end_marker: Regex::new(r"(?i)---\s*END\s+\w+").expect("valid pattern"),
            begin_marker: Regex::new(r"(?i)---\s*BEGIN\s+\w+").expect("valid pattern"),
            special_token: Regex::new(r"(?i)<\|?\w+\|?>").expect("valid pattern"),
            whitespace: Regex::new(r"\s+").expect("valid pattern"),
            base64_run: Regex::new(r"[A-Za-z0-9+/]{40,}={0,2}").expect("valid pattern"),
        }
    }

    /// Produce a cleaned copy of `input`.
    ///
    /// Four passes: remove fake boundary markers, remove special tokens,
    /// collapse whitespace runs and trim, then replace long base64-looking
    /// spans with [`ENCODED_CONTENT_PLACEHOLDER`].
    pub fn sanitize(&self, input: &str) -> String {
        let cleaned = self.end_marker.replace_all(input, "");
        let cleaned = self.begin_marker.replace_all(&cleaned, "");
        let cleaned = self.special_token.replace_all(&cleaned, "");
        let cleaned = self.whitespace.replace_all(&cleaned, " ");
        let cleaned = cleaned.trim();
        self.base64_run
            .replace_all(cleaned, ENCODED_CONTENT_PLACEHOLDER)
            .into_owned()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
