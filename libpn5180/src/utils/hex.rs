//! Hexadecimal helpers used for UID strings and debug logging.
//!
//! Output is lowercase. The parser accepts optional whitespace and colon
//! separators so the canonical colon form of a UID round-trips.

use std::fmt::Write;

use crate::{Error, Result};

fn join_hex(bytes: &[u8], sep: Option<char>) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            if let Some(sep) = sep {
                s.push(sep);
            }
        }
        // write! never fails writing to a String
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

/// Convert a byte slice to a lowercase hex string without separators.
///
/// Example: `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    join_hex(bytes, None)
}

/// Example: `&[0xde, 0xad]` -> `"de ad"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    join_hex(bytes, Some(' '))
}

/// Canonical UID form.
///
/// Example: `&[0xde, 0xad]` -> `"de:ad"`
pub fn bytes_to_hex_colon(bytes: &[u8]) -> String {
    join_hex(bytes, Some(':'))
}

/// Parse a hex string into bytes, ignoring whitespace and `:` separators.
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = s
        .bytes()
        .filter(|c| !c.is_ascii_whitespace() && *c != b':')
        .collect();

    if cleaned.len() % 2 != 0 {
        return Err(Error::InvalidArgument(
            "hex string has odd length".to_string(),
        ));
    }

    cleaned
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair)
                .map_err(|_| Error::InvalidArgument("hex string is not ASCII".to_string()))?;
            u8::from_str_radix(pair, 16)
                .map_err(|e| Error::InvalidArgument(format!("invalid hex pair '{}': {}", pair, e)))
        })
        .collect()
}
