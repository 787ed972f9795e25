use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::layout;

use super::error::DefinitionError;
use super::types::{DataType, ParameterDefinition, SysexDefinition, SysexHeader};

/// Declarative format description as found in a config file.
///
/// Optional fields are filled with their documented defaults during
/// deserialization; [`DefinitionConfig::into_definition`] then applies the
/// semantic checks and produces an immutable [`SysexDefinition`].
///
/// # Examples
/// ```
/// use syxkit_core::DefinitionConfig;
///
/// let config = DefinitionConfig::from_json_str(
///     r#"{
///         "name": "Test Synth",
///         "header": { "manufacturer_id": [0, 32, 51] },
///         "parameters": { "cutoff": { "byte_offset": 10 } }
///     }"#,
/// )?;
/// let definition = config.into_definition()?;
/// assert_eq!(definition.parameters["cutoff"].value_range, (0, 127));
/// # Ok::<(), syxkit_core::DefinitionError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub header: HeaderConfig,
    #[serde(default)]
    pub strict_header: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_name_offset: Option<usize>,
    #[serde(default = "default_preset_name_length")]
    pub preset_name_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length: Option<usize>,
    pub parameters: BTreeMap<String, ParameterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub manufacturer_id: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterConfig {
    pub byte_offset: usize,
    #[serde(default = "default_bit_mask")]
    pub bit_mask: u32,
    #[serde(default)]
    pub bit_shift: u32,
    #[serde(default = "default_value_range")]
    pub value_range: (u32, u32),
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_number: Option<u8>,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    layout::DEFAULT_DEFINITION_VERSION.to_string()
}

fn default_preset_name_length() -> usize {
    layout::DEFAULT_PRESET_NAME_LENGTH
}

fn default_bit_mask() -> u32 {
    layout::DEFAULT_BIT_MASK
}

fn default_value_range() -> (u32, u32) {
    layout::DEFAULT_VALUE_RANGE
}

fn default_category() -> String {
    "unknown".to_string()
}

impl DefinitionConfig {
    /// Parse a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a `.json` config file.
    pub fn from_file(path: &Path) -> Result<Self, DefinitionError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if extension != "json" {
            return Err(DefinitionError::UnsupportedConfigFormat { extension });
        }
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate the description and build the immutable definition.
    pub fn into_definition(self) -> Result<SysexDefinition, DefinitionError> {
        if self.header.manufacturer_id.is_empty() {
            return Err(DefinitionError::EmptyManufacturerId);
        }
        if let Some(total) = self.total_length {
            if let Some(offset) = self.preset_name_offset {
                if offset >= total {
                    return Err(DefinitionError::LayoutOutsideMessage {
                        field: "preset_name",
                        offset,
                        total,
                    });
                }
            }
            if let Some(offset) = self.checksum_offset {
                if offset >= total {
                    return Err(DefinitionError::LayoutOutsideMessage {
                        field: "checksum",
                        offset,
                        total,
                    });
                }
            }
        }

        let mut header = SysexHeader::new(self.header.manufacturer_id);
        header.device_id = self.header.device_id;
        header.model_id = self.header.model_id;
        header.command = self.header.command;

        let mut definition = SysexDefinition::new(self.name, header);
        definition.version = self.version;
        definition.strict_header = self.strict_header;
        definition.preset_name_offset = self.preset_name_offset;
        definition.preset_name_length = self.preset_name_length;
        definition.checksum_offset = self.checksum_offset;
        definition.total_length = self.total_length;

        for (name, config) in self.parameters {
            let (min, max) = config.value_range;
            if min > max {
                return Err(DefinitionError::InvalidValueRange { name, min, max });
            }
            if let Some(cc) = config.cc_number {
                if cc > 127 {
                    return Err(DefinitionError::InvalidCcNumber { name, cc });
                }
            }
            if let Some(total) = self.total_length {
                let width = match config.data_type {
                    DataType::Uint8 => 1,
                    DataType::Uint16 => 2,
                };
                if config.byte_offset + width > total {
                    return Err(DefinitionError::OffsetOutsideMessage {
                        name,
                        offset: config.byte_offset,
                        total,
                    });
                }
            }
            definition.insert_parameter(ParameterDefinition {
                name: name.clone(),
                byte_offset: config.byte_offset,
                bit_mask: config.bit_mask,
                bit_shift: config.bit_shift,
                value_range: config.value_range,
                category: config.category,
                cc_number: config.cc_number,
                data_type: config.data_type,
                description: config.description,
            });
        }

        Ok(definition)
    }

    /// Starter config for a new device, ready to fill in and load back.
    pub fn template(synth_name: &str) -> Self {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "example_parameter".to_string(),
            ParameterConfig {
                byte_offset: 10,
                bit_mask: layout::DEFAULT_BIT_MASK,
                bit_shift: 0,
                value_range: layout::DEFAULT_VALUE_RANGE,
                category: "oscillator".to_string(),
                cc_number: Some(74),
                data_type: DataType::Uint8,
                description: "Example parameter description".to_string(),
            },
        );
        Self {
            name: synth_name.to_string(),
            version: default_version(),
            header: HeaderConfig {
                manufacturer_id: vec![0x00, 0x00, 0x00],
                device_id: Some(0x01),
                model_id: Some(0x00),
                command: Some(0x10),
            },
            strict_header: false,
            preset_name_offset: Some(100),
            preset_name_length: layout::DEFAULT_PRESET_NAME_LENGTH,
            checksum_offset: Some(200),
            total_length: Some(layout::DEFAULT_MESSAGE_LENGTH),
            parameters,
        }
    }
}
