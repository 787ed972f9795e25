use thiserror::Error;

/// Errors from raw byte access while reading a message.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("message too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}

/// Errors raised while encoding a preset into a message buffer.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("message length {length} cannot hold the {needed}-byte header")]
    HeaderTooLong { needed: usize, length: usize },
    #[error("parameter '{parameter}' at byte offset {offset} outside message of {length} bytes")]
    OffsetOutOfRange {
        parameter: String,
        offset: usize,
        length: usize,
    },
    #[error("checksum offset {offset} outside message of {length} bytes")]
    ChecksumOutOfRange { offset: usize, length: usize },
}

/// Errors raised by file-level decode and encode entry points.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported file format '{extension}', expected .syx or .json")]
    UnsupportedFormat { extension: String },
    #[error("invalid preset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no SysEx data found in JSON preset")]
    MissingSysexData,
    #[error("invalid hex in SysEx data: {text}")]
    InvalidHex { text: String },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
