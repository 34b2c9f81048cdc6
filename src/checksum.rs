//! Check digits for the linear symbologies.

use crate::error::{BarcodeError, Result};

/// Weighted mod-10 check digit used by EAN-13 and UPC-A.
///
/// Weights alternate 3 and 1 starting from the rightmost data digit, and
/// the check digit is `(10 - sum % 10) % 10`.
///
/// Fails with [`BarcodeError::UnsupportedInput`] if any value is not a
/// decimal digit or if `digits` is empty.
///
/// # Example
///
/// ```rust
/// use quickcodes::checksum::compute_check_digit;
///
/// assert_eq!(compute_check_digit(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2]).unwrap(), 8);
/// ```
pub fn compute_check_digit(digits: &[u8]) -> Result<u8> {
    if digits.is_empty() {
        return Err(BarcodeError::unsupported("check digit of an empty digit string"));
    }
    if let Some(&bad) = digits.iter().find(|&&d| d > 9) {
        return Err(BarcodeError::unsupported(format!("{bad} is not a decimal digit")));
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    Ok(((10 - sum % 10) % 10) as u8)
}

/// Whether the last digit of `digits` is the correct check digit for the rest.
pub fn verify_check_digit(digits: &[u8]) -> bool {
    match digits.split_last() {
        Some((&check, data)) => compute_check_digit(data).is_ok_and(|c| c == check),
        None => false,
    }
}

/// Code 128 symbol check character: start value plus position-weighted data
/// values, modulo 103. `values` excludes the start symbol.
pub fn code128_checksum(start: u8, values: &[u8]) -> u8 {
    let sum = values
        .iter()
        .enumerate()
        .fold(u32::from(start), |acc, (i, &v)| acc + u32::from(v) * (i as u32 + 1));
    (sum % 103) as u8
}
