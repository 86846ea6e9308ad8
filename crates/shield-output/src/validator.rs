//! Output scanning and redaction.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Violation code for system prompt leakage.
pub const SYSTEM_PROMPT_LEAKAGE: &str = "SYSTEM_PROMPT_LEAKAGE";
/// Violation code for credential assignments in output.
pub const CREDENTIAL_EXPOSURE: &str = "CREDENTIAL_EXPOSURE";

/// Result of validating one model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no violations were found.
    pub safe: bool,

    /// Violation codes in check order. May repeat `CREDENTIAL_EXPOSURE`
    /// when multiple credential forms appear.
    pub violations: Vec<String>,

    /// The output with all applicable redactions applied. Present iff at
    /// least one violation occurred. A leakage-only result carries the
    /// original text here - leakage has no redaction.
    pub redacted_output: Option<String>,
}

/// A PII class: its name and detection pattern.
struct PiiPattern {
    kind: &'static str,
    pattern: Regex,
}

/// The output validator.
///
/// Compiles its patterns once at construction; `validate` is pure and
/// deterministic.
pub struct OutputValidator {
    pii: Vec<PiiPattern>,
    credentials: Vec<Regex>,
}

impl OutputValidator {
    /// Build a validator with the standard pattern set.
    pub fn new() -> Self {
        let pii_pattern = |kind, pattern: &str| PiiPattern {
            kind,
            pattern: Regex::new(pattern).expect("valid PII pattern"),
        };

        Self {
            pii: vec![
                pii_pattern("SSN", r"\b\d{3}-\d{2}-\d{4}\b"),
                pii_pattern("CREDIT_CARD", r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b"),
                pii_pattern(
                    "EMAIL",
                    r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                ),
                pii_pattern("PHONE", r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b"),
                pii_pattern("API_KEY", r"\b[A-Za-z0-9]{32,}\b"),
            ],
            credentials: [
                r"(?i)password\s*[:=]\s*\S+",
                r"(?i)api[_-]?key\s*[:=]\s*\S+",
                r"(?i)secret\s*[:=]\s*\S+",
                r"(?i)token\s*[:=]\s*\S+",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("valid credential pattern"))
            .collect(),
        }
    }

    /// Scan `output` for PII, credential material, and prompt leakage.
    ///
    /// Checks run unconditionally and each contributes independent
    /// violations; multiple may fire for the same text. Matching is done
    /// against the original output while redactions accumulate on one
    /// working copy.
    pub fn validate(&self, output: &str) -> ValidationResult {
        let mut violations = Vec::new();
        let mut redacted = output.to_string();

        for pii in &self.pii {
            if pii.pattern.is_match(output) {
                violations.push(format!("PII_{}_DETECTED", pii.kind));
                redacted = pii
                    .pattern
                    .replace_all(&redacted, format!("[{}_REDACTED]", pii.kind).as_str())
                    .into_owned();
            }
        }

        let lowered = output.to_lowercase();
        if lowered.contains("system prompt") || lowered.contains("your instructions") {
            violations.push(SYSTEM_PROMPT_LEAKAGE.to_string());
        }

        for pattern in &self.credentials {
            if pattern.is_match(output) {
                violations.push(CREDENTIAL_EXPOSURE.to_string());
                redacted = pattern
                    .replace_all(&redacted, "[CREDENTIAL_REDACTED]")
                    .into_owned();
            }
        }

        let safe = violations.is_empty();
        ValidationResult {
            safe,
            violations,
            redacted_output: if safe { None } else { Some(redacted) },
        }
    }
}

impl Default for OutputValidator {
    fn default() -> Self {
        Self::new()
    }
}
