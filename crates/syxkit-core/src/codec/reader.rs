use super::error::CodecError;
use super::layout;

/// Safe byte access over one framed SysEx message.
pub struct SysexReader<'a> {
    message: &'a [u8],
}

impl<'a> SysexReader<'a> {
    pub fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    pub fn len(&self) -> usize {
        self.message.len()
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), CodecError> {
        if self.message.len() < needed {
            return Err(CodecError::TooShort {
                needed,
                actual: self.message.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, CodecError> {
        self.message
            .get(offset)
            .copied()
            .ok_or(CodecError::TooShort {
                needed: offset + 1,
                actual: self.message.len(),
            })
    }

    /// Two bytes at `offset`, most significant first.
    pub fn read_u16_be(&self, offset: usize) -> Result<u16, CodecError> {
        let bytes = self.read_slice(offset..offset + 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], CodecError> {
        self.message
            .get(range.clone())
            .ok_or(CodecError::TooShort {
                needed: range.end,
                actual: self.message.len(),
            })
    }

    /// Embedded ASCII preset name at `offset`, clipped to the message end.
    ///
    /// Trailing NUL bytes and whitespace are stripped; an empty or non-ASCII
    /// field yields the `"Unknown"` sentinel.
    pub fn read_preset_name(&self, offset: usize, length: usize) -> String {
        let end = (offset + length).min(self.message.len());
        if offset >= end {
            return layout::UNKNOWN_PRESET_NAME.to_string();
        }
        let bytes = &self.message[offset..end];
        if !bytes.is_ascii() {
            return layout::UNKNOWN_PRESET_NAME.to_string();
        }
        let name = String::from_utf8_lossy(bytes);
        let name = name.trim_end_matches('\0').trim();
        if name.is_empty() {
            layout::UNKNOWN_PRESET_NAME.to_string()
        } else {
            name.to_string()
        }
    }
}
