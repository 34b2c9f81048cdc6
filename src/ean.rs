//! EAN-13 and UPC-A.
//!
//! Both symbologies share one layout of 95 modules: a 3-module start guard,
//! six left-half digits, a 5-module center guard, six right-half digits and
//! a 3-module end guard. UPC-A is the EAN-13 subset whose leading digit is 0.

use crate::checksum::{compute_check_digit, verify_check_digit};
use crate::error::{BarcodeError, Result};
use crate::symbol::BarSequence;
use tracing::debug;

/// Left-odd (L) digit widths, space first. Right (R) digits use the same
/// widths starting with a bar; left-even (G) digits are L reversed.
const DIGIT_WIDTHS: [[u32; 4]; 10] = [
    [3, 2, 1, 1],
    [2, 2, 2, 1],
    [2, 1, 2, 2],
    [1, 4, 1, 1],
    [1, 1, 3, 2],
    [1, 2, 3, 1],
    [1, 1, 1, 4],
    [1, 3, 1, 2],
    [1, 2, 1, 3],
    [3, 1, 1, 2],
];

/// Parity of the six left-half digits, chosen by the leading digit. `true` is G.
const FIRST_DIGIT_PARITY: [[bool; 6]; 10] = {
    const L: bool = false;
    const G: bool = true;
    [
        [L, L, L, L, L, L],
        [L, L, G, L, G, G],
        [L, L, G, G, L, G],
        [L, L, G, G, G, L],
        [L, G, L, L, G, G],
        [L, G, G, L, L, G],
        [L, G, G, G, L, L],
        [L, G, L, G, L, G],
        [L, G, L, G, G, L],
        [L, G, G, L, G, L],
    ]
};

const SIDE_GUARD: [u32; 3] = [1, 1, 1];
const CENTER_GUARD: [u32; 5] = [1, 1, 1, 1, 1];

/// Modules in an EAN-13 or UPC-A symbol.
pub const TOTAL_MODULES: u32 = 95;

/// Encodes 12 digits (check digit appended) or 13 digits (check digit verified).
pub fn encode_ean13(data: &[u8], bar_height: u32) -> Result<BarSequence> {
    let digits = normalize_digits(data, 12, "EAN-13")?;
    let text = digits_to_string(&digits);
    let bars = build(&digits, bar_height)?.with_text(&text);
    debug!(digits = %text, "encoded EAN-13");
    Ok(bars)
}

/// Encodes 11 digits (check digit appended) or 12 digits (check digit verified).
pub fn encode_upca(data: &[u8], bar_height: u32) -> Result<BarSequence> {
    let digits = normalize_digits(data, 11, "UPC-A")?;
    let mut ean = Vec::with_capacity(13);
    ean.push(0);
    ean.extend_from_slice(&digits);
    let text = digits_to_string(&digits);
    let bars = build(&ean, bar_height)?.with_text(&text);
    debug!(digits = %text, "encoded UPC-A");
    Ok(bars)
}

/// Validates a payload and returns its digits including the check digit.
///
/// Spaces and hyphens are ignored. With `data_len` digits the check digit is
/// computed and appended; with `data_len + 1` digits the last one must be the
/// correct check digit, otherwise the payload is rejected.
pub fn normalize_digits(data: &[u8], data_len: usize, name: &str) -> Result<Vec<u8>> {
    let mut digits: Vec<u8> = Vec::with_capacity(data_len + 1);
    for &b in data.iter().filter(|&&b| b != b' ' && b != b'-') {
        if !b.is_ascii_digit() {
            return Err(BarcodeError::unsupported(format!("{name} data must contain only digits")));
        }
        digits.push(b - b'0');
    }

    if digits.len() == data_len {
        let check = compute_check_digit(&digits)?;
        digits.push(check);
        Ok(digits)
    } else if digits.len() == data_len + 1 {
        let expected = compute_check_digit(&digits[..data_len])?;
        let given = digits[data_len];
        if given != expected {
            return Err(BarcodeError::unsupported(format!(
                "invalid {name} check digit: expected {expected}, got {given}"
            )));
        }
        Ok(digits)
    } else {
        Err(BarcodeError::unsupported(format!(
            "{name} data must be {} or {} digits long, got {}",
            data_len,
            data_len + 1,
            digits.len()
        )))
    }
}

fn build(digits: &[u8], bar_height: u32) -> Result<BarSequence> {
    debug_assert_eq!(digits.len(), 13);
    let parity = FIRST_DIGIT_PARITY[usize::from(digits[0])];
    let mut widths: Vec<u32> = Vec::with_capacity(59);
    widths.extend_from_slice(&SIDE_GUARD);
    for (&digit, &even) in digits[1..7].iter().zip(&parity) {
        let mut w = DIGIT_WIDTHS[usize::from(digit)];
        if even {
            w.reverse();
        }
        widths.extend_from_slice(&w);
    }
    widths.extend_from_slice(&CENTER_GUARD);
    for &digit in &digits[7..13] {
        widths.extend_from_slice(&DIGIT_WIDTHS[usize::from(digit)]);
    }
    widths.extend_from_slice(&SIDE_GUARD);

    let bars = BarSequence::new(widths, bar_height)?;
    match decode_digits(bars.widths()) {
        Some(decoded) if decoded == digits && verify_check_digit(&decoded) => Ok(bars),
        _ => Err(BarcodeError::Internal("EAN bar pattern does not decode to its own digits".into())),
    }
}

/// Reads the 13 digits back from a bar sequence, or `None` if it is malformed.
pub fn decode_digits(widths: &[u32]) -> Option<Vec<u8>> {
    if widths.len() != 59 || widths.iter().sum::<u32>() != TOTAL_MODULES {
        return None;
    }
    if widths[..3] != SIDE_GUARD || widths[27..32] != CENTER_GUARD || widths[56..] != SIDE_GUARD {
        return None;
    }

    let lookup = |w: &[u32]| DIGIT_WIDTHS.iter().position(|d| d[..] == *w).map(|d| d as u8);
    let mut digits = vec![0u8];
    let mut parity = [false; 6];
    for (i, group) in widths[3..27].chunks(4).enumerate() {
        if let Some(d) = lookup(group) {
            digits.push(d);
        } else {
            let reversed: Vec<u32> = group.iter().rev().copied().collect();
            digits.push(lookup(&reversed)?);
            parity[i] = true;
        }
    }
    digits[0] = FIRST_DIGIT_PARITY.iter().position(|p| *p == parity)? as u8;
    for group in widths[32..56].chunks(4) {
        digits.push(lookup(group)?);
    }
    Some(digits)
}

fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}
