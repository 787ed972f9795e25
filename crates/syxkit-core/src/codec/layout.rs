pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;

pub const DEFAULT_MESSAGE_LENGTH: usize = 256;
pub const DEFAULT_PRESET_NAME_LENGTH: usize = 16;
pub const DEFAULT_BIT_MASK: u32 = 0xFF;
pub const DEFAULT_VALUE_RANGE: (u32, u32) = (0, 127);
pub const DEFAULT_DEFINITION_VERSION: &str = "1.0";

pub const CHECKSUM_MODULUS: u32 = 128;
pub const UNKNOWN_PRESET_NAME: &str = "Unknown";
pub const ASCII_REPLACEMENT: u8 = b'?';

pub const HEX_PREVIEW_LEN: usize = 16;
