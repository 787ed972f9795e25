use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::definition::types::{DataType, ParameterDefinition, SysexDefinition};
use crate::{DecodedParameter, DecodedPreset, PresetMetadata, RawData};

use super::common::{format_hex, message_checksum, parse_hex};
use super::error::FileError;
use super::reader::SysexReader;
use super::scan::MessageScanner;

/// DAW preset export carrying SysEx bytes as hex text.
#[derive(Debug, Deserialize)]
struct JsonPreset {
    #[serde(default)]
    sysex: String,
    #[serde(default)]
    plugin: Option<String>,
    #[serde(default, rename = "pluginVersion")]
    plugin_version: Option<String>,
}

/// Decodes raw messages into named, normalized parameter sets.
///
/// A decoder borrows its [`SysexDefinition`]; decoding is pure over the
/// input bytes and never fails on malformed individual parameters — only a
/// header mismatch rejects a message.
///
/// # Examples
/// ```
/// use syxkit_core::FormatRegistry;
///
/// let registry = FormatRegistry::new();
/// let decoder = registry.get_decoder(syxkit_core::ACCESS_VIRUS)?;
/// let mut message = vec![0u8; 256];
/// message[0] = 0xF0;
/// message[1..4].copy_from_slice(&[0x00, 0x20, 0x33]);
/// message[255] = 0xF7;
/// let preset = decoder.decode_message(&message).expect("header matches");
/// assert_eq!(preset.metadata.synthesizer, "Access Virus C");
/// # Ok::<(), syxkit_core::RegistryError>(())
/// ```
#[derive(Debug)]
pub struct SysexDecoder<'a> {
    definition: &'a SysexDefinition,
}

impl<'a> SysexDecoder<'a> {
    pub fn new(definition: &'a SysexDefinition) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &SysexDefinition {
        self.definition
    }

    /// Decode one framed message; `None` when the header does not match.
    pub fn decode_message(&self, message: &[u8]) -> Option<DecodedPreset> {
        if !self.definition.header_matches(message) {
            return None;
        }
        let reader = SysexReader::new(message);

        let mut parameters = BTreeMap::new();
        for (name, param) in &self.definition.parameters {
            if let Some(raw_value) = extract_parameter(&reader, param) {
                parameters.insert(
                    name.clone(),
                    DecodedParameter {
                        raw_value,
                        normalized_value: param.normalize(raw_value),
                        category: param.category.clone(),
                        cc_number: param.cc_number,
                        description: param.description.clone(),
                    },
                );
            }
        }

        let preset_name = self
            .definition
            .preset_name_offset
            .map(|offset| reader.read_preset_name(offset, self.definition.preset_name_length));
        let checksum_valid = self
            .definition
            .checksum_offset
            .map(|offset| self.verify_checksum(message, offset));

        Some(DecodedPreset {
            parameters,
            metadata: PresetMetadata {
                synthesizer: self.definition.name.clone(),
                sysex_length: message.len(),
                definition_version: self.definition.version.clone(),
                preset_name,
                checksum_valid,
                source_file: None,
                plugin: None,
                plugin_version: None,
            },
            raw_data: RawData {
                bytes: message.to_vec(),
                hex: format_hex(message),
            },
        })
    }

    /// Decode every matching message found in a raw byte stream.
    pub fn decode_bytes(&self, data: &[u8]) -> Vec<DecodedPreset> {
        MessageScanner::new(data)
            .filter_map(|span| self.decode_message(span.bytes))
            .collect()
    }

    /// Decode a `.syx` dump or a `.json` preset export.
    pub fn decode_file(&self, path: &Path) -> Result<Vec<DecodedPreset>, FileError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "syx" => {
                let data = fs::read(path)?;
                Ok(self.decode_bytes(&data))
            }
            "json" => {
                let text = fs::read_to_string(path)?;
                let mut presets = self.decode_json_text(&text)?;
                for preset in &mut presets {
                    preset.metadata.source_file = Some(path.display().to_string());
                }
                Ok(presets)
            }
            _ => Err(FileError::UnsupportedFormat { extension }),
        }
    }

    /// Decode the `sysex` hex field of a JSON preset export. A non-matching
    /// header yields an empty list, same as stream scanning.
    pub(crate) fn decode_json_text(&self, text: &str) -> Result<Vec<DecodedPreset>, FileError> {
        let json: JsonPreset = serde_json::from_str(text)?;
        if json.sysex.is_empty() {
            return Err(FileError::MissingSysexData);
        }
        let bytes = parse_hex(&json.sysex).ok_or_else(|| FileError::InvalidHex {
            text: json.sysex.clone(),
        })?;
        Ok(self
            .decode_message(&bytes)
            .map(|mut preset| {
                preset.metadata.plugin = json.plugin;
                preset.metadata.plugin_version = json.plugin_version;
                vec![preset]
            })
            .unwrap_or_default())
    }

    fn verify_checksum(&self, message: &[u8], checksum_offset: usize) -> bool {
        let reader = SysexReader::new(message);
        match reader.read_u8(checksum_offset) {
            Ok(expected) => message_checksum(message, checksum_offset) == expected,
            Err(_) => false,
        }
    }
}

/// Raw field extraction; a field past the message end is skipped, not an
/// error, so partial dumps still decode.
fn extract_parameter(reader: &SysexReader<'_>, param: &ParameterDefinition) -> Option<u32> {
    let combined = match param.data_type {
        DataType::Uint8 => u32::from(reader.read_u8(param.byte_offset).ok()?),
        DataType::Uint16 => u32::from(reader.read_u16_be(param.byte_offset).ok()?),
    };
    Some((combined & param.bit_mask) >> param.bit_shift)
}
