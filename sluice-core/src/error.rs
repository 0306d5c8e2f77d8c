use std::path::PathBuf;

use thiserror::Error;

use crate::address::AddressValidationError;
use crate::amount::AmountParseError;
use crate::output::{AgentError, RowIssue};
use crate::row::HoursParseError;

#[derive(Debug, Error)]
pub enum SluiceError {
    #[error("missing sender address")]
    MissingSender,

    #[error("address {address} is invalid: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressValidationError,
    },

    #[error("invalid amount {value:?}: {source}")]
    InvalidAmount {
        value: String,
        #[source]
        source: AmountParseError,
    },

    #[error("invalid hours {value:?}: {source}")]
    InvalidHours {
        value: String,
        #[source]
        source: HoursParseError,
    },

    #[error("-m and --csv cannot be combined")]
    ConflictingInputModes,

    #[error("malformed batch input: {reason}")]
    MalformedBatchInput { reason: String },

    #[error("expected {expected} positional arguments [address] [coins] [hours], got {actual}")]
    InsufficientArguments { expected: usize, actual: usize },

    #[error("{}", join_issues(.issues))]
    RowValidationFailure { issues: Vec<RowIssue> },

    #[error("failed to read batch file {}: {source}", .path.display())]
    BatchFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join_issues(issues: &[RowIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl SluiceError {
    /// Stable numeric code used in agent-mode payloads.
    pub const fn code(&self) -> u16 {
        match self {
            Self::MissingSender => 1001,
            Self::InvalidAddress { .. } => 1002,
            Self::InvalidAmount { .. } => 1003,
            Self::InvalidHours { .. } => 1004,
            Self::ConflictingInputModes => 1005,
            Self::MalformedBatchInput { .. } => 1006,
            Self::InsufficientArguments { .. } => 1007,
            Self::RowValidationFailure { .. } => 1008,
            Self::BatchFileRead { .. } => 3001,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::MissingSender => "MISSING_SENDER",
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidHours { .. } => "INVALID_HOURS",
            Self::ConflictingInputModes => "CONFLICTING_INPUT_MODES",
            Self::MalformedBatchInput { .. } => "MALFORMED_BATCH_INPUT",
            Self::InsufficientArguments { .. } => "INSUFFICIENT_ARGUMENTS",
            Self::RowValidationFailure { .. } => "ROW_VALIDATION_FAILURE",
            Self::BatchFileRead { .. } => "BATCH_FILE_READ",
        }
    }

    /// True for errors caused by user input rather than the environment.
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::BatchFileRead { .. })
    }

    pub fn row_issues(&self) -> Option<&[RowIssue]> {
        match self {
            Self::RowValidationFailure { issues } => Some(issues.as_slice()),
            _ => None,
        }
    }

    pub fn to_agent_error(&self) -> AgentError {
        AgentError {
            error: self.name().to_string(),
            code: self.code(),
            message: self.to_string(),
            details: self.row_issues().map(<[RowIssue]>::to_vec),
        }
    }
}

pub type Result<T> = std::result::Result<T, SluiceError>;
