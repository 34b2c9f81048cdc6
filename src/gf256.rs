//! Arithmetic in GF(2^8) with the QR Code reducing polynomial
//! x^8 + x^4 + x^3 + x^2 + 1 (0x11D) and primitive element 2.
//!
//! Both tables are built at compile time and never change.

const REDUCING_POLY: u16 = 0x11d;

/// `EXP[i] = 2^i`. Doubled in length so that `EXP[log a + log b]` never wraps.
static EXP: [u8; 512] = build_exp();

/// `LOG[a]` for `a != 0`. `LOG[0]` is unused.
static LOG: [u8; 256] = build_log();

const fn build_exp() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        table[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= REDUCING_POLY;
        }
        i += 1;
    }
    table[510] = table[0];
    table[511] = table[1];
    table
}

const fn build_log() -> [u8; 256] {
    let exp = build_exp();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Returns `2^power`, for any power.
pub fn exp(power: usize) -> u8 {
    EXP[power % 255]
}

/// Discrete logarithm of a non-zero element.
///
/// # Panics
///
/// Panics if `x` is zero.
pub fn log(x: u8) -> u8 {
    assert_ne!(x, 0, "Logarithm of zero");
    LOG[usize::from(x)]
}

pub fn multiply(x: u8, y: u8) -> u8 {
    if x == 0 || y == 0 {
        return 0;
    }
    EXP[usize::from(LOG[usize::from(x)]) + usize::from(LOG[usize::from(y)])]
}

/// Returns `x / y`.
///
/// # Panics
///
/// Panics if `y` is zero.
pub fn divide(x: u8, y: u8) -> u8 {
    assert_ne!(y, 0, "Division by zero");
    if x == 0 {
        return 0;
    }
    EXP[usize::from(LOG[usize::from(x)]) + 255 - usize::from(LOG[usize::from(y)])]
}
