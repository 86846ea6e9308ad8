//! # Shield Output - Model Output Validation
//!
//! The Output Validator is the last layer in the PromptShield pipeline. It
//! scans model responses before they are returned to the caller, looking for
//! content that must never leave the system: personally identifiable
//! information, credential material, and echoes of the system prompt.
//!
//! ## Checks
//!
//! | Check | Violation code | Redaction |
//! |-------|----------------|-----------|
//! | SSN | `PII_SSN_DETECTED` | `[SSN_REDACTED]` |
//! | Credit card | `PII_CREDIT_CARD_DETECTED` | `[CREDIT_CARD_REDACTED]` |
//! | Email | `PII_EMAIL_DETECTED` | `[EMAIL_REDACTED]` |
//! | Phone | `PII_PHONE_DETECTED` | `[PHONE_REDACTED]` |
//! | API-key-like token | `PII_API_KEY_DETECTED` | `[API_KEY_REDACTED]` |
//! | Prompt leakage | `SYSTEM_PROMPT_LEAKAGE` | none (detect only) |
//! | Credential assignment | `CREDENTIAL_EXPOSURE` | `[CREDENTIAL_REDACTED]` |
//!
//! Checks are non-exclusive: every applicable violation is reported, and all
//! redactions are applied to a single working copy of the text. Prompt
//! leakage has no safe replacement, so it is flagged without redaction -
//! callers must treat it as "cannot auto-fix".
//!
//! Validation is pure, stateless, and total: any `&str` yields a result,
//! never an error.
//!
//! ## Usage
//!
//! ```rust
//! use shield_output::OutputValidator;
//!
//! let validator = OutputValidator::new();
//! let result = validator.validate("The user's SSN is 123-45-6789");
//!
//! assert!(!result.safe);
//! assert!(result.redacted_output.unwrap().contains("[SSN_REDACTED]"));
//! ```

pub mod validator;

pub use validator::{OutputValidator, ValidationResult};
