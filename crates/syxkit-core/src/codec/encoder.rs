use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::definition::types::{DataType, SysexDefinition};

use super::common::message_checksum;
use super::error::{EncodeError, FileError};
use super::layout;

/// Builds bit-exact messages from normalized parameter sets.
///
/// The counterpart of [`SysexDecoder`](super::decoder::SysexDecoder):
/// encoding a preset and decoding the result with the same definition
/// reproduces every representable input value.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
///
/// use syxkit_core::FormatRegistry;
///
/// let registry = FormatRegistry::new();
/// let encoder = registry.get_encoder(syxkit_core::ACCESS_VIRUS)?;
/// let parameters = HashMap::from([("filter_cutoff".to_string(), 0.5)]);
/// let message = encoder.encode_preset(&parameters, "Bass1")?;
/// assert_eq!(message[0], 0xF0);
/// assert_eq!(*message.last().unwrap(), 0xF7);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SysexEncoder<'a> {
    definition: &'a SysexDefinition,
}

impl<'a> SysexEncoder<'a> {
    pub fn new(definition: &'a SysexDefinition) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &SysexDefinition {
        self.definition
    }

    /// Encode one preset into a framed message of the definition's nominal
    /// length (256 bytes when unset).
    pub fn encode_preset(
        &self,
        parameters: &HashMap<String, f64>,
        preset_name: &str,
    ) -> Result<Vec<u8>, EncodeError> {
        let length = self
            .definition
            .total_length
            .unwrap_or(layout::DEFAULT_MESSAGE_LENGTH);
        let header = &self.definition.header;
        if header.encoded_len() >= length {
            return Err(EncodeError::HeaderTooLong {
                needed: header.encoded_len(),
                length,
            });
        }

        let mut message = vec![0u8; length];
        message[0] = layout::SYSEX_START;
        let mut offset = 1;
        for &byte in &header.manufacturer_id {
            message[offset] = byte;
            offset += 1;
        }
        for byte in [header.device_id, header.model_id, header.command]
            .into_iter()
            .flatten()
        {
            message[offset] = byte;
            offset += 1;
        }

        for (name, param) in &self.definition.parameters {
            let Some(&normalized) = parameters.get(name) else {
                continue;
            };
            let raw = param.denormalize(normalized);
            match param.data_type {
                DataType::Uint8 => {
                    if param.byte_offset >= length {
                        return Err(EncodeError::OffsetOutOfRange {
                            parameter: name.clone(),
                            offset: param.byte_offset,
                            length,
                        });
                    }
                    let current = u32::from(message[param.byte_offset]);
                    let updated = (current & !param.bit_mask)
                        | ((raw << param.bit_shift) & param.bit_mask);
                    message[param.byte_offset] = updated as u8;
                }
                DataType::Uint16 => {
                    if param.byte_offset + 1 >= length {
                        return Err(EncodeError::OffsetOutOfRange {
                            parameter: name.clone(),
                            offset: param.byte_offset,
                            length,
                        });
                    }
                    let current = (u32::from(message[param.byte_offset]) << 8)
                        | u32::from(message[param.byte_offset + 1]);
                    let updated = (current & !param.bit_mask)
                        | ((raw << param.bit_shift) & param.bit_mask);
                    message[param.byte_offset] = (updated >> 8) as u8;
                    message[param.byte_offset + 1] = updated as u8;
                }
            }
        }

        if let Some(name_offset) = self.definition.preset_name_offset {
            self.write_preset_name(&mut message, name_offset, preset_name);
        }

        if let Some(checksum_offset) = self.definition.checksum_offset {
            if checksum_offset >= length {
                return Err(EncodeError::ChecksumOutOfRange {
                    offset: checksum_offset,
                    length,
                });
            }
            message[checksum_offset] = message_checksum(&message, checksum_offset);
        }

        message[length - 1] = layout::SYSEX_END;
        Ok(message)
    }

    /// ASCII name field: truncated, `?`-replaced, NUL-padded to the
    /// configured length, writes clipped to the buffer.
    fn write_preset_name(&self, message: &mut [u8], offset: usize, preset_name: &str) {
        let length = self.definition.preset_name_length;
        let encoded: Vec<u8> = preset_name
            .chars()
            .map(|c| {
                if c.is_ascii() {
                    c as u8
                } else {
                    layout::ASCII_REPLACEMENT
                }
            })
            .take(length)
            .collect();
        for i in 0..length {
            if offset + i >= message.len() {
                break;
            }
            message[offset + i] = encoded.get(i).copied().unwrap_or(0);
        }
    }

    /// Encode presets back to back into one `.syx` file. Unnamed presets
    /// are numbered `Preset_1`, `Preset_2`, ...
    pub fn write_syx_file(
        &self,
        presets: &[HashMap<String, f64>],
        preset_names: Option<&[String]>,
        path: &Path,
    ) -> Result<(), FileError> {
        let mut data = Vec::new();
        for (index, preset) in presets.iter().enumerate() {
            let fallback = format!("Preset_{}", index + 1);
            let name = preset_names
                .and_then(|names| names.get(index))
                .map(String::as_str)
                .unwrap_or(&fallback);
            data.extend_from_slice(&self.encode_preset(preset, name)?);
        }
        fs::write(path, data)?;
        Ok(())
    }
}
