use goldrun_core::MetricsError;
use goldrun_warehouse::WarehouseError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] goldrun_core::ValidationError),

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Metrics(MetricsError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<MetricsError> for CliError {
    fn from(error: MetricsError) -> Self {
        match error {
            MetricsError::Validation(error) => Self::Validation(error),
            MetricsError::Warehouse(error) => Self::Warehouse(error),
            MetricsError::Serialization(error) => Self::Serialization(error),
            MetricsError::Io(error) => Self::Io(error),
            other => Self::Metrics(other),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Warehouse(_) => 3,
            Self::Metrics(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
