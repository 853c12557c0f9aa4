//! Error types for stylesheet parsing.
//!
//! Parsing is error-tolerant: a malformed rule is dropped and the parse
//! continues with the next one. Errors therefore travel through the token
//! source's error channel and end up as [`Diagnostic`]s on the stylesheet,
//! instead of aborting the parse. Only loading a file can fail outright.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::token::Location;

/// Errors that can occur while parsing or loading a stylesheet.
///
/// # Examples
///
/// ```rust
/// use cssom::StyleSheet;
/// use cssom::CssError;
///
/// let sheet = StyleSheet::parse("@frobnicate foo;");
/// assert!(sheet.rules().is_empty());
/// assert!(matches!(
///     sheet.diagnostics()[0].error,
///     CssError::UnknownRuleKeyword(ref name) if name == "frobnicate"
/// ));
/// ```
#[derive(Error, Debug)]
pub enum CssError {
    /// At-rule dispatch was entered but the first token is not an at-keyword.
    #[error("Expected an '@'")]
    MalformedRuleStart,

    /// The at-keyword does not name a known rule.
    #[error("Unknown rule @{0}")]
    UnknownRuleKeyword(String),

    /// A rule parsed successfully but tokens remain before its terminator.
    #[error("Junk at end of @-rule")]
    TrailingJunk,

    /// Invalid CSS syntax was encountered inside a rule.
    #[error("CSS syntax error: {0}")]
    InvalidSyntax(String),

    /// Input that is syntactically fine but not understood, and skipped.
    #[error("Unknown value: {0}")]
    UnknownValue(String),

    /// An I/O error occurred while reading a stylesheet file.
    #[error("I/O error reading stylesheet")]
    Io(#[from] std::io::Error),
}

impl CssError {
    /// Returns `true` for the "unknown" class of errors.
    ///
    /// These describe input that was understood well enough to skip, as
    /// opposed to hard syntax errors.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            CssError::UnknownRuleKeyword(_) | CssError::TrailingJunk | CssError::UnknownValue(_)
        )
    }
}

/// An error recorded by the root token source, with where it happened.
#[derive(Debug)]
pub struct Diagnostic {
    pub error: CssError,
    pub location: Location,
    /// File the tokens came from, if the source was attributed to one.
    pub file: Option<PathBuf>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}: {}", file.display(), self.location, self.error),
            None => write!(f, "{}: {}", self.location, self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_classification() {
        assert!(CssError::UnknownRuleKeyword("foo".into()).is_warning());
        assert!(CssError::TrailingJunk.is_warning());
        assert!(CssError::UnknownValue("x".into()).is_warning());
        assert!(!CssError::MalformedRuleStart.is_warning());
        assert!(!CssError::InvalidSyntax("x".into()).is_warning());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            error: CssError::UnknownRuleKeyword("frobnicate".into()),
            location: Location::new(3, 5, 20),
            file: Some(PathBuf::from("theme.css")),
        };
        assert_eq!(diagnostic.to_string(), "theme.css:3:5: Unknown rule @frobnicate");

        let diagnostic = Diagnostic {
            error: CssError::TrailingJunk,
            location: Location::new(1, 1, 0),
            file: None,
        };
        assert_eq!(diagnostic.to_string(), "1:1: Junk at end of @-rule");
    }
}
