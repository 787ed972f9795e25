//! Inventory reports for unknown SysEx files.
//!
//! The analyzer does not decode parameters; it lists every framed message in
//! a byte stream with enough context (offset, length, manufacturer bytes,
//! hex preview) to identify the device family and write a format definition
//! for it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::common::format_hex;
use crate::codec::layout;
use crate::codec::scan::MessageScanner;

/// Message inventory of one file.
///
/// # Examples
/// ```
/// use syxkit_core::analyze_bytes;
///
/// let analysis = analyze_bytes(&[0xF0, 0x00, 0x20, 0x33, 0xF7]);
/// assert_eq!(analysis.messages.len(), 1);
/// assert_eq!(analysis.messages[0].manufacturer_id, vec![0x00, 0x20, 0x33]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Input size in bytes.
    pub file_size: usize,
    /// Messages in stream order.
    pub messages: Vec<MessageInfo>,
}

/// One framed message found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageInfo {
    /// 1-based index in stream order.
    pub message_id: usize,
    /// Offset of the start marker within the file.
    pub start_offset: usize,
    /// Message length, framing bytes included.
    pub length: usize,
    /// The three bytes after the start marker; empty when the message is
    /// shorter than that.
    pub manufacturer_id: Vec<u8>,
    /// Spaced hex of the first 16 bytes, `...`-suffixed when truncated.
    pub hex_preview: String,
}

/// Inventory every framed message in a raw byte stream.
pub fn analyze_bytes(data: &[u8]) -> FileAnalysis {
    let messages = MessageScanner::new(data)
        .enumerate()
        .map(|(index, span)| {
            let message = span.bytes;
            let manufacturer_id = if message.len() > 3 {
                message[1..4].to_vec()
            } else {
                Vec::new()
            };
            let preview_len = message.len().min(layout::HEX_PREVIEW_LEN);
            let mut hex_preview = format_hex(&message[..preview_len]);
            if message.len() > layout::HEX_PREVIEW_LEN {
                hex_preview.push_str("...");
            }
            MessageInfo {
                message_id: index + 1,
                start_offset: span.offset,
                length: message.len(),
                manufacturer_id,
                hex_preview,
            }
        })
        .collect();

    FileAnalysis {
        file_size: data.len(),
        messages,
    }
}

/// Read a file and inventory its messages.
pub fn analyze_file(path: &Path) -> Result<FileAnalysis, std::io::Error> {
    let data = fs::read(path)?;
    Ok(analyze_bytes(&data))
}
