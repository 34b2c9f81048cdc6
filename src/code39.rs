//! Code 39 (3 of 9).
//!
//! Every character is five bars and four spaces, three of the nine elements
//! wide. Characters are separated by a narrow space and the payload is framed
//! by `*` start and stop characters.

use crate::error::{BarcodeError, Result};
use crate::symbol::{wide_narrow_flags, wide_narrow_widths, BarSequence};
use tracing::debug;

/// Wide elements are three modules.
const WIDE: u32 = 3;

const CHARSET: &[u8; 44] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%*";

/// Wide flags per element, bar first, in [`CHARSET`] order.
const PATTERNS: [&[u8; 9]; 44] = [
    b"000110100", b"100100001", b"001100001", b"101100000", b"000110001", b"100110000", b"001110000",
    b"000100101", b"100100100", b"001100100", b"100001001", b"001001001", b"101001000", b"000011001",
    b"100011000", b"001011000", b"000001101", b"100001100", b"001001100", b"000011100", b"100000011",
    b"001000011", b"101000010", b"000010011", b"100010010", b"001010010", b"000000111", b"100000110",
    b"001000110", b"000010110", b"110000001", b"011000001", b"111000000", b"010010001", b"110010000",
    b"011010000", b"010000101", b"110000100", b"011000100", b"010101000", b"010100010", b"010001010",
    b"000101010", b"010010100",
];

const GUARD: u8 = b'*';

/// Encodes digits, upper-case letters and `- . $ / + %` or space.
///
/// Lower-case letters are upper-cased. Fails with
/// [`BarcodeError::UnsupportedInput`] on an empty payload, on `*` or on any
/// other character outside the set.
pub fn encode_code39(data: &[u8], bar_height: u32) -> Result<BarSequence> {
    if data.is_empty() {
        return Err(BarcodeError::unsupported("Code 39 data cannot be empty"));
    }
    let text = data.to_ascii_uppercase();
    if let Some(&bad) = text.iter().find(|&&c| c == GUARD || !CHARSET.contains(&c)) {
        return Err(BarcodeError::unsupported(format!(
            "invalid Code 39 character {:?}, only 0-9, A-Z, space and -.$/+% are allowed",
            char::from(bad)
        )));
    }

    let framed: Vec<u8> = std::iter::once(GUARD)
        .chain(text.iter().copied())
        .chain(std::iter::once(GUARD))
        .collect();
    let mut widths: Vec<u32> = Vec::with_capacity(framed.len() * 10);
    for (i, &c) in framed.iter().enumerate() {
        if i > 0 {
            widths.push(1);
        }
        let index = CHARSET.iter().position(|&a| a == c).unwrap_or_default();
        widths.extend(wide_narrow_widths(PATTERNS[index], WIDE));
    }

    let label = String::from_utf8_lossy(&text).into_owned();
    let bars = BarSequence::new(widths, bar_height)?.with_text(&label);
    if decode(bars.widths()).as_deref() != Some(text.as_slice()) {
        return Err(BarcodeError::Internal("Code 39 symbol does not decode to its payload".into()));
    }
    debug!(chars = text.len(), "encoded Code 39");
    Ok(bars)
}

/// Reads the payload back, without the `*` framing.
pub fn decode(widths: &[u32]) -> Option<Vec<u8>> {
    if (widths.len() + 1) % 10 != 0 {
        return None;
    }
    let mut chars = Vec::with_capacity((widths.len() + 1) / 10);
    for (i, group) in widths.chunks(10).enumerate() {
        let (pattern, gap) = group.split_at(9);
        if gap.iter().any(|&w| w != 1) {
            return None;
        }
        let flags = wide_narrow_flags(pattern, WIDE)?;
        let index = PATTERNS.iter().position(|p| p[..] == flags[..])?;
        let c = CHARSET[index];
        let framing = i == 0 || (i + 1) * 10 > widths.len();
        if framing != (c == GUARD) {
            return None;
        }
        chars.push(c);
    }
    if chars.len() < 2 {
        return None;
    }
    Some(chars[1..chars.len() - 1].to_vec())
}
