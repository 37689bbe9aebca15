use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "storage io error: {}", err),
            StorageError::Serialization(err) => write!(f, "storage serialization error: {}", err),
            StorageError::QuotaExceeded {
                key,
                needed,
                available,
            } => write!(
                f,
                "QuotaExceededError: writing {:?} needs {} bytes, {} available",
                key, needed, available
            ),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Serialization(err) => Some(err),
            StorageError::QuotaExceeded { .. } => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err)
    }
}

/// Which structural rule a restored game payload broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NotAnObject,
    MissingField(&'static str),
    WrongType(&'static str),
    BadLength(&'static str),
    DigitOutOfRange(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnObject => write!(f, "saved state is not an object"),
            ValidationError::MissingField(field) => write!(f, "missing field {}", field),
            ValidationError::WrongType(field) => write!(f, "field {} has the wrong type", field),
            ValidationError::BadLength(field) => write!(f, "field {} has the wrong length", field),
            ValidationError::DigitOutOfRange(field) => {
                write!(f, "field {} holds a value outside 0..=9", field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// What the player sees when something unexpected goes wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub message: String,
    pub details: Option<String>,
    pub severity: Severity,
}

const FRIENDLY_MESSAGES: &[(&str, &str, Severity)] = &[
    (
        "QuotaExceededError",
        "Storage is full. Please clear some space and try again.",
        Severity::Medium,
    ),
    (
        "storage io error",
        "Your game could not be saved or loaded. Progress may not be kept.",
        Severity::Medium,
    ),
    (
        "serialization error",
        "Saved data looked corrupted and was ignored.",
        Severity::Low,
    ),
];

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again or start a new game.";

impl ErrorNotice {
    pub fn from_error(err: &dyn std::error::Error, debug: bool) -> Self {
        let technical = err.to_string();
        let (message, severity) = FRIENDLY_MESSAGES
            .iter()
            .find(|(pattern, _, _)| technical.contains(pattern))
            .map(|(_, friendly, severity)| (friendly.to_string(), *severity))
            .unwrap_or_else(|| (GENERIC_MESSAGE.to_string(), Severity::High));

        Self {
            message,
            details: debug.then_some(technical),
            severity,
        }
    }
}

impl fmt::Display for ErrorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}
