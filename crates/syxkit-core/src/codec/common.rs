use super::layout;

/// Spaced lowercase hex rendering, e.g. `f0 00 20 33 f7`.
pub(crate) fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse hex text into bytes, tolerating whitespace between digits.
pub(crate) fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() || compact.len() % 2 != 0 {
        return None;
    }
    compact
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}

/// Checksum over every byte except the start marker, the checksum byte
/// itself, and the final byte (the end marker): `(128 - sum % 128) % 128`.
///
/// This mirrors the device convention the parameter tables were built
/// against; it is a validity heuristic, not a verified hardware checksum.
pub(crate) fn message_checksum(message: &[u8], checksum_offset: usize) -> u8 {
    let len = message.len();
    let mut sum: u32 = 0;
    if len >= 2 {
        let head_end = checksum_offset.clamp(1, len);
        sum += message[1..head_end]
            .iter()
            .map(|&b| u32::from(b))
            .sum::<u32>();
        let tail_start = (checksum_offset + 1).min(len);
        let tail_end = len - 1;
        if tail_start < tail_end {
            sum += message[tail_start..tail_end]
                .iter()
                .map(|&b| u32::from(b))
                .sum::<u32>();
        }
    }
    ((layout::CHECKSUM_MODULUS - sum % layout::CHECKSUM_MODULUS) % layout::CHECKSUM_MODULUS) as u8
}
