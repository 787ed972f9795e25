use thiserror::Error;

/// Errors raised while loading or validating a format description.
///
/// All of these are fatal at load time; a definition that parses is fully
/// usable by the codec.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("I/O error reading definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid definition config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported config format '{extension}', expected .json")]
    UnsupportedConfigFormat { extension: String },
    #[error("manufacturer_id must not be empty")]
    EmptyManufacturerId,
    #[error("parameter '{name}': value_range min {min} exceeds max {max}")]
    InvalidValueRange { name: String, min: u32, max: u32 },
    #[error("parameter '{name}': cc_number {cc} out of MIDI range 0..=127")]
    InvalidCcNumber { name: String, cc: u8 },
    #[error("parameter '{name}': byte_offset {offset} outside total_length {total}")]
    OffsetOutsideMessage {
        name: String,
        offset: usize,
        total: usize,
    },
    #[error("{field} offset {offset} outside total_length {total}")]
    LayoutOutsideMessage {
        field: &'static str,
        offset: usize,
        total: usize,
    },
}
