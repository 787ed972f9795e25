use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::layout;

/// Wire representation of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// One byte at `byte_offset`.
    #[default]
    Uint8,
    /// Two bytes, most significant first, starting at `byte_offset`.
    Uint16,
}

/// One scalar field of a device's parameter set.
///
/// # Examples
/// ```
/// use syxkit_core::ParameterDefinition;
///
/// let cutoff = ParameterDefinition::new("filter_cutoff", 40, "filter");
/// assert_eq!(cutoff.normalize(127), 1.0);
/// assert_eq!(cutoff.denormalize(0.0), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub byte_offset: usize,
    pub bit_mask: u32,
    pub bit_shift: u32,
    /// Inclusive raw value bounds, `min <= max`.
    pub value_range: (u32, u32),
    pub category: String,
    pub cc_number: Option<u8>,
    pub data_type: DataType,
    pub description: String,
}

impl ParameterDefinition {
    /// Build a plain 8-bit parameter with default mask, shift, and range.
    pub fn new(name: impl Into<String>, byte_offset: usize, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_offset,
            bit_mask: layout::DEFAULT_BIT_MASK,
            bit_shift: 0,
            value_range: layout::DEFAULT_VALUE_RANGE,
            category: category.into(),
            cc_number: None,
            data_type: DataType::Uint8,
            description: String::new(),
        }
    }

    /// Same as [`ParameterDefinition::new`] with an associated CC number.
    pub fn with_cc(
        name: impl Into<String>,
        byte_offset: usize,
        category: impl Into<String>,
        cc_number: u8,
    ) -> Self {
        let mut param = Self::new(name, byte_offset, category);
        param.cc_number = Some(cc_number);
        param
    }

    /// Rescale a raw value into `[0.0, 1.0]`; degenerate ranges map to `0.0`.
    pub fn normalize(&self, raw_value: u32) -> f64 {
        let (min, max) = self.value_range;
        let clamped = raw_value.clamp(min, max);
        if max > min {
            (clamped - min) as f64 / (max - min) as f64
        } else {
            0.0
        }
    }

    /// Map a normalized value back to the raw domain.
    ///
    /// Rounds half away from zero (`f64::round`), so `0.5` over `[0, 127]`
    /// yields `64`. Exact inverse of [`ParameterDefinition::normalize`] for
    /// every raw value in range.
    pub fn denormalize(&self, normalized: f64) -> u32 {
        let (min, max) = self.value_range;
        let raw = (normalized * (max - min) as f64 + min as f64).round();
        (raw as i64).clamp(min as i64, max as i64) as u32
    }
}

/// Leading bytes a message must carry after the SysEx start marker.
///
/// # Examples
/// ```
/// use syxkit_core::SysexHeader;
///
/// let header = SysexHeader::new(vec![0x00, 0x20, 0x33]);
/// assert!(header.matches(&[0xF0, 0x00, 0x20, 0x33, 0x01, 0xF7]));
/// assert!(!header.matches(&[0xF0, 0x00, 0x20, 0x34, 0x01, 0xF7]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysexHeader {
    pub manufacturer_id: Vec<u8>,
    pub device_id: Option<u8>,
    pub model_id: Option<u8>,
    pub command: Option<u8>,
}

impl SysexHeader {
    pub fn new(manufacturer_id: Vec<u8>) -> Self {
        Self {
            manufacturer_id,
            device_id: None,
            model_id: None,
            command: None,
        }
    }

    /// Check the start marker and manufacturer bytes only.
    ///
    /// Device/model/command bytes are deliberately not inspected here; units
    /// of the same family answer with varying device ids. Use
    /// [`SysexHeader::matches_strict`] when that variance is unwanted.
    pub fn matches(&self, message: &[u8]) -> bool {
        if message.len() < 1 + self.manufacturer_id.len() {
            return false;
        }
        if message[0] != layout::SYSEX_START {
            return false;
        }
        message[1..1 + self.manufacturer_id.len()] == self.manufacturer_id[..]
    }

    /// [`SysexHeader::matches`] plus device/model/command bytes, each checked
    /// at its header position when declared.
    pub fn matches_strict(&self, message: &[u8]) -> bool {
        if !self.matches(message) {
            return false;
        }
        let mut offset = 1 + self.manufacturer_id.len();
        for expected in [self.device_id, self.model_id, self.command]
            .into_iter()
            .flatten()
        {
            match message.get(offset) {
                Some(actual) if *actual == expected => offset += 1,
                _ => return false,
            }
        }
        true
    }

    /// Number of leading bytes the encoder writes: start marker,
    /// manufacturer id, and each declared header byte.
    pub fn encoded_len(&self) -> usize {
        1 + self.manufacturer_id.len()
            + [self.device_id, self.model_id, self.command]
                .iter()
                .flatten()
                .count()
    }
}

/// One synthesizer family's full wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysexDefinition {
    pub name: String,
    pub version: String,
    pub header: SysexHeader,
    /// Parameter table keyed by unique name; iteration order is stable.
    pub parameters: BTreeMap<String, ParameterDefinition>,
    pub preset_name_offset: Option<usize>,
    pub preset_name_length: usize,
    pub checksum_offset: Option<usize>,
    /// Nominal message length used when encoding from scratch; not enforced
    /// on decode.
    pub total_length: Option<usize>,
    /// Verify device/model/command header bytes on decode as well.
    pub strict_header: bool,
}

impl SysexDefinition {
    pub fn new(name: impl Into<String>, header: SysexHeader) -> Self {
        Self {
            name: name.into(),
            version: layout::DEFAULT_DEFINITION_VERSION.to_string(),
            header,
            parameters: BTreeMap::new(),
            preset_name_offset: None,
            preset_name_length: layout::DEFAULT_PRESET_NAME_LENGTH,
            checksum_offset: None,
            total_length: None,
            strict_header: false,
        }
    }

    pub fn insert_parameter(&mut self, parameter: ParameterDefinition) {
        self.parameters.insert(parameter.name.clone(), parameter);
    }

    /// Header check honouring the definition's matching mode.
    pub fn header_matches(&self, message: &[u8]) -> bool {
        if self.strict_header {
            self.header.matches_strict(message)
        } else {
            self.header.matches(message)
        }
    }
}
