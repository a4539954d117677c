use thiserror::Error;

#[derive(Error, Debug)]
pub enum FortuneError {
    #[error("Birthdate is missing or could not be read")]
    MissingBirthdate,

    #[error("Invalid date: {input}")]
    InvalidDate { input: String },

    #[error("Question must be longer than {min_length} characters (got {actual})")]
    QuestionTooShort { min_length: usize, actual: usize },

    #[error("Prompt variable '{name}' has no value")]
    MissingPromptVariable { name: String },

    #[error("Invalid spread: {message}")]
    InvalidSpread { message: String },

    #[error("Expected {expected} fortune paragraphs, got {actual}")]
    FortuneFormatMismatch { expected: usize, actual: usize },

    #[error("Fortune service failed: {message}")]
    ExternalServiceError { message: String },

    #[error("A fortune is already being divined")]
    RequestInFlight,

    #[error("Catalog error in {file}: {message}")]
    CatalogError { file: String, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    External,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FortuneError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FortuneError::MissingBirthdate
            | FortuneError::InvalidDate { .. }
            | FortuneError::QuestionTooShort { .. }
            | FortuneError::RequestInFlight => ErrorCategory::Input,
            FortuneError::MissingPromptVariable { .. }
            | FortuneError::InvalidSpread { .. }
            | FortuneError::CatalogError { .. }
            | FortuneError::SerializationError(_) => ErrorCategory::Data,
            FortuneError::FortuneFormatMismatch { .. }
            | FortuneError::ExternalServiceError { .. }
            | FortuneError::ApiError(_) => ErrorCategory::External,
            FortuneError::IoError(_)
            | FortuneError::ConfigError { .. }
            | FortuneError::MissingConfigError { .. }
            | FortuneError::InvalidConfigValueError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::External => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short text suitable for the action button.
    pub fn user_friendly_message(&self) -> String {
        match self {
            FortuneError::MissingBirthdate => "ERROR: Bad birthdate :(".to_string(),
            FortuneError::InvalidDate { .. } => {
                "Birthdate input incorrect...Try Again?".to_string()
            }
            FortuneError::QuestionTooShort { actual: 0, .. } => {
                "ERROR: No question entered.".to_string()
            }
            FortuneError::QuestionTooShort { min_length, .. } => {
                format!("ERROR: Need minimum {} characters.", min_length)
            }
            FortuneError::RequestInFlight => "Still divining...".to_string(),
            FortuneError::FortuneFormatMismatch { .. } => {
                "A complex fortune...scroll to the very bottom.".to_string()
            }
            FortuneError::ExternalServiceError { .. } | FortuneError::ApiError(_) => {
                "The spirits are silent...Try Again?".to_string()
            }
            _ => "...Try Again?".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FortuneError::MissingBirthdate | FortuneError::InvalidDate { .. } => {
                "Enter a past birthdate as YYYY-MM-DD"
            }
            FortuneError::QuestionTooShort { .. } => {
                "Ask a longer question, using I statements and first person"
            }
            FortuneError::RequestInFlight => "Wait for the current fortune to finish",
            FortuneError::MissingPromptVariable { .. } | FortuneError::InvalidSpread { .. } => {
                "Check the spread definitions in tarot_spreads.json"
            }
            FortuneError::CatalogError { .. } | FortuneError::SerializationError(_) => {
                "Check the JSON files in the assets directory"
            }
            FortuneError::FortuneFormatMismatch { .. } => {
                "Read the full fortune below or ask again"
            }
            FortuneError::ExternalServiceError { .. } | FortuneError::ApiError(_) => {
                "Check the network connection, API key and endpoint, then retry"
            }
            FortuneError::IoError(_) => "Check that the file exists and is readable",
            FortuneError::ConfigError { .. }
            | FortuneError::MissingConfigError { .. }
            | FortuneError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, FortuneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_messages() {
        let empty = FortuneError::QuestionTooShort {
            min_length: 10,
            actual: 0,
        };
        assert_eq!(empty.user_friendly_message(), "ERROR: No question entered.");

        let short = FortuneError::QuestionTooShort {
            min_length: 10,
            actual: 4,
        };
        assert_eq!(
            short.user_friendly_message(),
            "ERROR: Need minimum 10 characters."
        );
    }

    #[test]
    fn test_severity_follows_category() {
        assert_eq!(FortuneError::MissingBirthdate.severity(), ErrorSeverity::Low);
        assert_eq!(
            FortuneError::ExternalServiceError {
                message: "down".to_string()
            }
            .severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            FortuneError::ConfigError {
                message: "bad".to_string()
            }
            .category(),
            ErrorCategory::System
        );
    }
}
