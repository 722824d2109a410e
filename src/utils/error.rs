use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error(
        "Group capacity of {max} participants reached: {current} registered, {remaining} more can be added"
    )]
    CapacityExceeded {
        max: usize,
        current: usize,
        remaining: usize,
    },

    #[error("Tournament {tournament_id} already has the maximum of {max} groups")]
    GroupLimitExceeded { tournament_id: String, max: u8 },

    #[error("Group {group_number} already exists in tournament {tournament_id}")]
    GroupAlreadyExists {
        tournament_id: String,
        group_number: u8,
    },

    #[error("Group {group_number} not found in tournament {tournament_id}")]
    GroupNotFound {
        tournament_id: String,
        group_number: u8,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 使用者輸入問題，修正後重試即可
    Low,
    /// 違反業務規則
    Medium,
    /// 設定或資料檔案問題
    High,
    /// 系統層級錯誤
    Critical,
}

impl RosterError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::CapacityExceeded { .. }
            | Self::GroupLimitExceeded { .. }
            | Self::GroupAlreadyExists { .. }
            | Self::GroupNotFound { .. } => ErrorSeverity::Medium,
            Self::ConfigError { .. } | Self::CsvError(_) | Self::TomlError(_) => {
                ErrorSeverity::High
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => format!("Invalid input: {}", message),
            Self::CapacityExceeded {
                max,
                current,
                remaining,
            } => format!(
                "The group is full ({} of {} places taken, {} left)",
                current, max, remaining
            ),
            Self::GroupNotFound { group_number, .. } => {
                format!("GROUP {} does not exist", group_number)
            }
            Self::ConfigError { field, .. } => {
                format!("The configuration value '{}' is invalid", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Check the participant name, affiliation and rank (e.g. 初段, 3段, 5級)"
            }
            Self::CapacityExceeded { .. } => {
                "Withdraw participants or register them in another group"
            }
            Self::GroupLimitExceeded { .. } => "Remove an unused group before creating a new one",
            Self::GroupAlreadyExists { .. } => "Choose a different group number",
            Self::GroupNotFound { .. } => "Create the group before registering participants",
            Self::ConfigError { .. } | Self::TomlError(_) => {
                "Fix the tournament configuration file and run again"
            }
            Self::CsvError(_) => "Make sure the CSV has an 'affiliation,name,rank' header",
            Self::IoError(_) | Self::SerializationError(_) => {
                "Check that the data directory exists and is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
