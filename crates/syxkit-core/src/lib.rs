//! Syxkit core library for SysEx preset codecs.
//!
//! This crate implements the configuration-driven codec used by the CLI:
//! device format definitions drive the codec layer (layout/reader/scan/
//! decoder/encoder), which turns raw byte streams into named, normalized
//! parameter sets and re-encodes parameter sets into bit-exact messages.
//! Decoding and encoding are byte-oriented and side-effect free; file I/O
//! is confined to the file-level entry points (`decode_file`, batch,
//! analyzer). Message framing conventions live in `layout` so the codec
//! stays minimal and consistent across devices.
//!
//! Invariants:
//! - Decoded output is deterministic: parameter maps and format listings
//!   iterate in stable order.
//! - Decoding never fails on malformed individual parameters; only a header
//!   mismatch rejects a message.
//! - Normalize/denormalize are exact inverses over each parameter's declared
//!   raw range, so encode-then-decode round-trips every representable value.
//!
//! Version française (résumé):
//! Cette crate fournit le cœur du codec SysEx : définitions de formats ->
//! décodeur/encodeur -> jeux de paramètres normalisés. Les E/S restent dans
//! les points d'entrée fichier ; le décodage est pur et déterministe.
//!
//! # Examples
//! ```
//! use syxkit_core::{ACCESS_VIRUS, FormatRegistry};
//!
//! let registry = FormatRegistry::new();
//! let decoder = registry.get_decoder(ACCESS_VIRUS)?;
//! let presets = decoder.decode_bytes(&[0xF0, 0x00, 0x20, 0x33, 0x00, 0xF7]);
//! assert_eq!(presets.len(), 1);
//! # Ok::<(), syxkit_core::RegistryError>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod analyzer;
mod batch;
mod codec;
mod definition;
mod registry;

pub use analyzer::{analyze_bytes, analyze_file, FileAnalysis, MessageInfo};
pub use batch::{batch_decode, BatchError, BatchReport, FailedFile, ProcessedFile};
pub use codec::{
    CodecError, EncodeError, FileError, MessageScanner, MessageSpan, SysexDecoder, SysexEncoder,
    SysexReader,
};
pub use definition::{
    DataType, DefinitionConfig, DefinitionError, HeaderConfig, ParameterConfig,
    ParameterDefinition, SysexDefinition, SysexHeader,
};
pub use registry::{FormatRegistry, RegistryError, ACCESS_VIRUS};

/// Default timestamp used when no wall-clock time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of decoding one message.
///
/// # Examples
/// ```
/// use syxkit_core::{ACCESS_VIRUS, FormatRegistry};
///
/// let registry = FormatRegistry::new();
/// let decoder = registry.get_decoder(ACCESS_VIRUS)?;
/// let mut message = vec![0u8; 256];
/// message[0] = 0xF0;
/// message[1..4].copy_from_slice(&[0x00, 0x20, 0x33]);
/// message[40] = 100;
/// message[255] = 0xF7;
///
/// let preset = decoder.decode_message(&message).expect("header matches");
/// let cutoff = &preset.parameters["filter_cutoff"];
/// assert!((cutoff.normalized_value - 100.0 / 127.0).abs() < 1e-9);
/// # Ok::<(), syxkit_core::RegistryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedPreset {
    /// Decoded fields keyed by parameter name, in stable order.
    pub parameters: BTreeMap<String, DecodedParameter>,
    /// Device and message metadata.
    pub metadata: PresetMetadata,
    /// Original bytes kept for lossless round-trips and debugging.
    pub raw_data: RawData,
}

/// One decoded parameter value with its definition context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedParameter {
    /// Raw integer value as found on the wire.
    pub raw_value: u32,
    /// Raw value rescaled into `[0.0, 1.0]`.
    pub normalized_value: f64,
    /// Classification tag from the definition (e.g. "filter", "lfo").
    pub category: String,
    /// Associated MIDI CC number, when the parameter is automatable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_number: Option<u8>,
    /// Free-text description from the definition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Metadata attached to a decoded preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetMetadata {
    /// Device name from the definition.
    pub synthesizer: String,
    /// Message length in bytes, framing included.
    pub sysex_length: usize,
    /// Version string of the definition that produced this preset.
    pub definition_version: String,
    /// Embedded preset name, when the definition locates one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_name: Option<String>,
    /// Checksum verdict, when the definition locates a checksum byte.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_valid: Option<bool>,
    /// Path of the file this preset was decoded from, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Plugin name from a JSON preset export, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Plugin version from a JSON preset export, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_version: Option<String>,
}

/// Original message bytes with a hex rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    pub bytes: Vec<u8>,
    /// Spaced lowercase hex, e.g. `f0 00 20 33 f7`.
    pub hex: String,
}
