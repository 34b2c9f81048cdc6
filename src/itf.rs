//! ITF-14, the 14-digit Interleaved 2 of 5 used on shipping cartons.
//!
//! Digits are taken in pairs: the first digit of a pair sets the widths of
//! five bars, the second the widths of the five spaces between them.

use crate::ean::normalize_digits;
use crate::error::{BarcodeError, Result};
use crate::symbol::{wide_narrow_flags, wide_narrow_widths, BarSequence};
use tracing::debug;

const WIDE: u32 = 3;

/// Wide flags of the five elements of each digit.
const DIGIT_FLAGS: [&[u8; 5]; 10] = [
    b"00110", b"10001", b"01001", b"11000", b"00101", b"10100", b"01100", b"00011", b"10010", b"01010",
];

const START: [u32; 4] = [1, 1, 1, 1];
const STOP: [u32; 3] = [WIDE, 1, 1];

/// Elements in a 14-digit symbol.
const ELEMENTS: usize = START.len() + 7 * 10 + STOP.len();

/// Encodes 13 digits (check digit appended) or 14 digits (check digit verified).
///
/// The check digit is the GS1 mod-10 digit shared with EAN-13. Spaces and
/// hyphens are ignored.
pub fn encode_itf14(data: &[u8], bar_height: u32) -> Result<BarSequence> {
    let digits = normalize_digits(data, 13, "ITF-14")?;

    let mut widths: Vec<u32> = Vec::with_capacity(ELEMENTS);
    widths.extend_from_slice(&START);
    for pair in digits.chunks(2) {
        let bars = wide_narrow_widths(DIGIT_FLAGS[usize::from(pair[0])], WIDE);
        let spaces = wide_narrow_widths(DIGIT_FLAGS[usize::from(pair[1])], WIDE);
        for (bar, space) in bars.zip(spaces) {
            widths.push(bar);
            widths.push(space);
        }
    }
    widths.extend_from_slice(&STOP);

    let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    let bars = BarSequence::new(widths, bar_height)?.with_text(&text);
    if decode(bars.widths()).as_deref() != Some(digits.as_slice()) {
        return Err(BarcodeError::Internal("ITF-14 bar pattern does not decode to its own digits".into()));
    }
    debug!(digits = %text, "encoded ITF-14");
    Ok(bars)
}

/// Reads the 14 digits back from a bar sequence.
pub fn decode(widths: &[u32]) -> Option<Vec<u8>> {
    if widths.len() != ELEMENTS || widths[..4] != START || widths[ELEMENTS - 3..] != STOP {
        return None;
    }
    let lookup = |flags: Vec<u8>| DIGIT_FLAGS.iter().position(|d| d[..] == flags[..]).map(|d| d as u8);
    let mut digits = Vec::with_capacity(14);
    for group in widths[4..ELEMENTS - 3].chunks(10) {
        let bars: Vec<u32> = group.iter().step_by(2).copied().collect();
        let spaces: Vec<u32> = group.iter().skip(1).step_by(2).copied().collect();
        digits.push(lookup(wide_narrow_flags(&bars, WIDE)?)?);
        digits.push(lookup(wide_narrow_flags(&spaces, WIDE)?)?);
    }
    Some(digits)
}
