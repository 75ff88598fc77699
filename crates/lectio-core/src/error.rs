use crate::model::date::PlanDate;
use crate::store::StoreError;
use std::fmt;

/// Machine-readable error codes for scripting-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotSignedIn,
    ConfigParseError,
    UnknownPlan,
    UnknownDate,
    UnknownReading,
    EmptyComment,
    StoreUnavailable,
    BadCursor,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotSignedIn => "E1001",
            Self::ConfigParseError => "E1002",
            Self::UnknownPlan => "E2001",
            Self::UnknownDate => "E2002",
            Self::UnknownReading => "E2003",
            Self::EmptyComment => "E3001",
            Self::StoreUnavailable => "E5001",
            Self::BadCursor => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotSignedIn => "Not signed in",
            Self::ConfigParseError => "Config file parse error",
            Self::UnknownPlan => "Unknown reading plan",
            Self::UnknownDate => "No readings scheduled for that date",
            Self::UnknownReading => "Unknown reading id",
            Self::EmptyComment => "Empty comment",
            Self::StoreUnavailable => "Store unavailable",
            Self::BadCursor => "Invalid feed cursor",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotSignedIn => Some("Run `lct signin <name>` first."),
            Self::ConfigParseError => Some("Fix syntax in .lectio/config.toml and retry."),
            Self::UnknownPlan => Some("Run `lct plans` to list available plans."),
            Self::UnknownDate => Some("Use an M/D date that appears in the plan (Feb 29 never does)."),
            Self::UnknownReading => Some("Check the id with `lct show`; ids look like mcheyne-64-2."),
            Self::EmptyComment => Some("Write a non-empty comment body."),
            Self::StoreUnavailable => Some("Check that .lectio/lectio.db is readable and retry."),
            Self::BadCursor => Some("Use the cursor printed by the previous `lct activity` page."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Core error taxonomy.
///
/// `NotFound` conditions never appear here: an absent document is an empty
/// default state, not an error. Store failures wrap [`StoreError`] and are
/// degraded to safe defaults at read call sites; validation and routing
/// failures reject the operation before any write.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not signed in")]
    NotSignedIn,

    #[error("unknown plan '{0}'")]
    UnknownPlan(String),

    #[error("no readings scheduled for {0}")]
    UnknownDate(PlanDate),

    #[error("unknown reading '{0}'")]
    UnknownReading(String),

    #[error("comment body must not be empty")]
    EmptyComment,

    #[error("config file parse error: {0}")]
    ConfigParse(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// Map to the stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotSignedIn => ErrorCode::NotSignedIn,
            Self::UnknownPlan(_) => ErrorCode::UnknownPlan,
            Self::UnknownDate(_) => ErrorCode::UnknownDate,
            Self::UnknownReading(_) => ErrorCode::UnknownReading,
            Self::EmptyComment => ErrorCode::EmptyComment,
            Self::ConfigParse(_) => ErrorCode::ConfigParseError,
            Self::Store(StoreError::BadCursor(_)) => ErrorCode::BadCursor,
            Self::Store(_) => ErrorCode::StoreUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotSignedIn,
            ErrorCode::ConfigParseError,
            ErrorCode::UnknownPlan,
            ErrorCode::UnknownDate,
            ErrorCode::UnknownReading,
            ErrorCode::EmptyComment,
            ErrorCode::StoreUnavailable,
            ErrorCode::BadCursor,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::UnknownPlan.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
