use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TleError {
    #[error("line {line}: {message}")]
    Format { line: u8, message: String },
    #[error("line {line}: checksum mismatch (computed {computed}, found {found})")]
    Checksum { line: u8, computed: u8, found: u8 },
    #[error("catalog numbers differ between lines ({line1} vs {line2})")]
    Consistency { line1: u32, line2: u32 },
}

impl TleError {
    pub(crate) fn format(line: u8, message: impl Into<String>) -> Self {
        TleError::Format {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("TLE path not found: {0}")]
    NotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE in {file}: {source}")]
    InvalidTle {
        file: String,
        #[source]
        source: TleError,
    },
}
