use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Broad classes of failure, used by callers that only care whether a load or a
/// query went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Field,
    Config,
    Io,
    Output,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Missing required column '{column}' (found: {available})")]
    MissingColumn { column: String, available: String },

    #[error("Invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(char),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' is not available on {record_type} records")]
    FieldNotInSchema {
        field: &'static str,
        record_type: &'static str,
    },

    #[error("Field '{0}' is continuous and cannot be used as a group key")]
    NotGroupable(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl PipelineError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        PipelineError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Csv(_)
            | PipelineError::Parse { .. }
            | PipelineError::MissingColumn { .. }
            | PipelineError::InvalidDelimiter(_) => ErrorKind::Parse,
            PipelineError::UnknownField(_)
            | PipelineError::FieldNotInSchema { .. }
            | PipelineError::NotGroupable(_) => ErrorKind::Field,
            PipelineError::Config(_)
            | PipelineError::ConfigLoad(_)
            | PipelineError::Validation(_) => ErrorKind::Config,
            PipelineError::Io(_) | PipelineError::TaskJoin(_) => ErrorKind::Io,
            PipelineError::Parquet(_) | PipelineError::Arrow(_) | PipelineError::Json(_) => {
                ErrorKind::Output
            }
        }
    }

    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    pub fn is_field_error(&self) -> bool {
        self.kind() == ErrorKind::Field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(PipelineError::parse(3, "bad timestamp").is_parse_error());
        assert!(PipelineError::InvalidDelimiter('→').is_parse_error());
        assert!(PipelineError::UnknownField("speed".to_string()).is_field_error());
        assert!(PipelineError::NotGroupable("trip_duration").is_field_error());
        assert_eq!(
            PipelineError::Config("bad range".to_string()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_parse_error_message_names_line() {
        let err = PipelineError::parse(7, "invalid timestamp 'yesterday'");
        assert_eq!(
            err.to_string(),
            "Parse error on line 7: invalid timestamp 'yesterday'"
        );
    }
}
