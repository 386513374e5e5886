//! 1DD header reading and metadata extraction.
//!
//! Each file opens with a fixed block of `NUM_LON * 4` ASCII bytes holding
//! whitespace separated `key=value` tokens. The day count is not taken from
//! the parsed fields: it is read positionally from the `days=1-nn` range.

use crate::constants::{DAY_COUNT_OFFSET, DAY_COUNT_WIDTH, DAYS_MARKER, HEADER_LEN, MAX_DAYS};
use crate::error::{GpcpError, Result};
use crate::models::{DayCount, Metadata};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// ASCII whitespace including vertical tab, which `u8::is_ascii_whitespace` omits
fn is_header_whitespace(byte: &u8) -> bool {
    byte.is_ascii_whitespace() || *byte == 0x0b
}

/// Leading header block with trailing whitespace removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    bytes: Vec<u8>,
}

impl Header {
    /// Build a header from a raw block, trimming trailing whitespace
    pub fn from_block(block: &[u8]) -> Self {
        let end = block
            .iter()
            .rposition(|b| !is_header_whitespace(b))
            .map_or(0, |last| last + 1);
        Self {
            bytes: block[..end].to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Header text, with any non UTF-8 bytes replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn metadata(&self) -> Metadata {
        parse_metadata(&self.bytes)
    }
}

/// Read the header block from the current position of `reader`
///
/// On success the reader is positioned on the first payload byte.
pub fn read_header<R: Read>(reader: &mut R, path: &Path) -> Result<Header> {
    let mut block = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut block)
        .map_err(|e| GpcpError::io(path, e))?;
    Ok(Header::from_block(&block))
}

/// Open `path` and read only its header
pub fn read_header_file(path: &Path) -> Result<Header> {
    let mut file = File::open(path).map_err(|e| GpcpError::io(path, e))?;
    read_header(&mut file, path)
}

/// Split header text into `key=value` fields
///
/// Tokens are separated by ASCII whitespace or vertical tab and split on
/// their first `=`.
/// Tokens without `=` are skipped. A repeated key keeps its last value.
pub fn parse_metadata(header: &[u8]) -> Metadata {
    let mut metadata = Metadata::new();

    for token in header
        .split(is_header_whitespace)
        .filter(|t| !t.is_empty())
    {
        let Some(eq) = token.iter().position(|&b| b == b'=') else {
            continue;
        };
        let key = String::from_utf8_lossy(&token[..eq]);
        let value = String::from_utf8_lossy(&token[eq + 1..]);
        metadata.insert(key, value);
    }

    metadata
}

/// Read the number of days from the `days=1-nn` range
///
/// The two bytes found `DAY_COUNT_OFFSET` bytes after the start of `days=`
/// must be decimal digits forming a value in `1..=31`.
pub fn extract_day_count(header: &[u8], path: &Path) -> Result<DayCount> {
    let marker = header
        .windows(DAYS_MARKER.len())
        .position(|w| w == DAYS_MARKER)
        .ok_or_else(|| GpcpError::format(path, "header has no 'days=' marker"))?;

    let start = marker + DAY_COUNT_OFFSET;
    let field = header.get(start..start + DAY_COUNT_WIDTH).ok_or_else(|| {
        GpcpError::format(path, "header ends before the day count field")
    })?;

    if !field.iter().all(u8::is_ascii_digit) {
        return Err(GpcpError::format(
            path,
            format!(
                "day count field '{}' is not a two-digit number",
                String::from_utf8_lossy(field)
            ),
        ));
    }

    let days = field.iter().fold(0u8, |acc, d| acc * 10 + (d - b'0'));
    let count = DayCount::new(days).ok_or_else(|| {
        GpcpError::format(
            path,
            format!("day count {days} is outside 1..={MAX_DAYS}"),
        )
    })?;

    debug!("{}: {} days", path.display(), days);
    Ok(count)
}
