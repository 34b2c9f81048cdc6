//! Codabar, as used on library cards and blood bank labels.

use crate::error::{BarcodeError, Result};
use crate::symbol::{wide_narrow_flags, wide_narrow_widths, BarSequence};
use tracing::debug;

const WIDE: u32 = 3;

const CHARSET: &[u8; 20] = b"0123456789-$:/.+ABCD";

/// Wide flags of four bars and three spaces, bar first, in [`CHARSET`] order.
const PATTERNS: [&[u8; 7]; 20] = [
    b"0000011", b"0000110", b"0001001", b"1100000", b"0010010", b"1000010", b"0100001", b"0100100",
    b"0110000", b"1001000", b"0001100", b"0011000", b"1000101", b"1010001", b"1010100", b"0010101",
    b"0011010", b"0101001", b"0001011", b"0001110",
];

fn is_guard(c: u8) -> bool {
    matches!(c, b'A'..=b'D')
}

/// Encodes a payload that starts and ends with one of the guards `A` to `D`.
///
/// Between the guards, digits and `- $ : / . +` are allowed. Lower-case
/// guards are upper-cased.
pub fn encode_codabar(data: &[u8], bar_height: u32) -> Result<BarSequence> {
    if data.is_empty() {
        return Err(BarcodeError::unsupported("Codabar data cannot be empty"));
    }
    let text = data.to_ascii_uppercase();
    if let Some(&bad) = text.iter().find(|&&c| !CHARSET.contains(&c)) {
        return Err(BarcodeError::unsupported(format!(
            "invalid Codabar character {:?}, only 0-9, -$:/.+ and A-D are allowed",
            char::from(bad)
        )));
    }
    let (first, last) = (text[0], text[text.len() - 1]);
    if text.len() < 2 || !is_guard(first) || !is_guard(last) {
        return Err(BarcodeError::unsupported("Codabar data must start and end with A, B, C or D"));
    }

    let mut widths: Vec<u32> = Vec::with_capacity(text.len() * 8);
    for (i, &c) in text.iter().enumerate() {
        if i > 0 {
            widths.push(1);
        }
        let index = CHARSET.iter().position(|&a| a == c).unwrap_or_default();
        widths.extend(wide_narrow_widths(PATTERNS[index], WIDE));
    }

    let label = String::from_utf8_lossy(&text).into_owned();
    let bars = BarSequence::new(widths, bar_height)?.with_text(&label);
    if decode(bars.widths()).as_deref() != Some(text.as_slice()) {
        return Err(BarcodeError::Internal("Codabar symbol does not decode to its payload".into()));
    }
    debug!(chars = text.len(), start = %char::from(first), stop = %char::from(last), "encoded Codabar");
    Ok(bars)
}

/// Reads the payload back, guards included.
pub fn decode(widths: &[u32]) -> Option<Vec<u8>> {
    if (widths.len() + 1) % 8 != 0 {
        return None;
    }
    widths
        .chunks(8)
        .map(|group| {
            let (pattern, gap) = group.split_at(7);
            if gap.iter().any(|&w| w != 1) {
                return None;
            }
            let flags = wide_narrow_flags(pattern, WIDE)?;
            PATTERNS.iter().position(|p| p[..] == flags[..]).map(|i| CHARSET[i])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codabar_empty_data() {
        assert!(matches!(encode_codabar(b"", 50), Err(BarcodeError::UnsupportedInput(_))));
    }

    #[test]
    fn test_codabar_invalid_chars() {
        assert!(matches!(encode_codabar(b"A123X456B", 50), Err(BarcodeError::UnsupportedInput(_))));
    }

    #[test]
    fn test_codabar_missing_start_stop() {
        assert!(matches!(encode_codabar(b"12345", 50), Err(BarcodeError::UnsupportedInput(_))));
        assert!(matches!(encode_codabar(b"A12345", 50), Err(BarcodeError::UnsupportedInput(_))));
        assert!(matches!(encode_codabar(b"A", 50), Err(BarcodeError::UnsupportedInput(_))));
    }

    #[test]
    fn test_codabar_valid_special_chars() {
        let bars = encode_codabar(b"A-$:/.+B", 50).unwrap();
        assert_eq!(decode(bars.widths()).unwrap(), b"A-$:/.+B");
        assert_eq!(bars.text(), Some("A-$:/.+B"));
    }

    #[test]
    fn test_codabar_case_insensitive() {
        assert_eq!(encode_codabar(b"a123b", 50).unwrap(), encode_codabar(b"A123B", 50).unwrap());
    }

    #[test]
    fn test_codabar_different_start_stop() {
        let bars = encode_codabar(b"A1234C", 20).unwrap();
        // six characters of 8 elements less the trailing gap
        assert_eq!(bars.widths().len(), 6 * 8 - 1);
        assert_eq!(bars.height(), 20);
    }
}
