use thiserror::Error;

/// Rejected caller input. Only the outer surfaces raise these; the
/// allocation engine itself accepts everything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Binary-level failures mapped to process exit codes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Input(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
