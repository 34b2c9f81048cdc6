//! Code 128 over ASCII 0..=127.
//!
//! The encoder picks start code, latches (CODE A/B/C) and single-character
//! shifts so that the symbol has the fewest possible symbol characters. The
//! search is a small dynamic program over (position, active code set).

use crate::checksum::code128_checksum;
use crate::error::{BarcodeError, Result};
use crate::symbol::BarSequence;
use tracing::debug;

/// Bar/space widths of symbol values 0..=105, bar first. Each sums to 11 modules.
const PATTERNS: [&[u8; 6]; 106] = [
    b"212222", b"222122", b"222221", b"121223", b"121322", b"131222", b"122213", b"122312", b"132212",
    b"221213", b"221312", b"231212", b"112232", b"122132", b"122231", b"113222", b"123122", b"123221",
    b"223211", b"221132", b"221231", b"213212", b"223112", b"312131", b"311222", b"321122", b"321221",
    b"312212", b"322112", b"322211", b"212123", b"212321", b"232121", b"111323", b"131123", b"131321",
    b"112313", b"132113", b"132311", b"211313", b"231113", b"231311", b"112133", b"112331", b"132131",
    b"113123", b"113321", b"133121", b"313121", b"211331", b"231131", b"213113", b"213311", b"213131",
    b"311123", b"311321", b"331121", b"312113", b"312311", b"332111", b"314111", b"221411", b"431111",
    b"111224", b"111422", b"121124", b"121421", b"141122", b"141221", b"112214", b"112412", b"122114",
    b"122411", b"142112", b"142211", b"241211", b"221114", b"413111", b"241112", b"134111", b"111242",
    b"121142", b"121241", b"114212", b"124112", b"124211", b"411212", b"421112", b"421211", b"212141",
    b"214121", b"412121", b"111143", b"111341", b"131141", b"114113", b"114311", b"411113", b"411311",
    b"113141", b"114131", b"311141", b"411131", b"211412", b"211214", b"211232",
];

/// Stop pattern including the final 2-module termination bar.
const STOP: [u32; 7] = [2, 3, 3, 1, 1, 1, 2];

const SHIFT: u8 = 98;
const CODE_C: u8 = 99;
const CODE_B: u8 = 100;
const CODE_A: u8 = 101;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CodeSet {
    A,
    B,
    C,
}

impl CodeSet {
    const ALL: [CodeSet; 3] = [CodeSet::B, CodeSet::C, CodeSet::A];

    fn index(self) -> usize {
        self as usize
    }

    fn start_value(self) -> u8 {
        match self {
            CodeSet::A => 103,
            CodeSet::B => 104,
            CodeSet::C => 105,
        }
    }

    fn latch_value(self) -> u8 {
        match self {
            CodeSet::A => CODE_A,
            CodeSet::B => CODE_B,
            CodeSet::C => CODE_C,
        }
    }

    /// The symbol value of the character(s) at `data[i..]` in this set, and
    /// how many bytes it consumes.
    fn value_at(self, data: &[u8], i: usize) -> Option<(u8, usize)> {
        let c = data[i];
        match self {
            CodeSet::A if c < 32 => Some((c + 64, 1)),
            CodeSet::A if c < 96 => Some((c - 32, 1)),
            CodeSet::B if (32..128).contains(&c) => Some((c - 32, 1)),
            CodeSet::C => {
                let d = *data.get(i + 1)?;
                (c.is_ascii_digit() && d.is_ascii_digit()).then(|| ((c - b'0') * 10 + (d - b'0'), 2))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Direct,
    Latch(CodeSet),
    Shift(CodeSet),
}

const UNREACHABLE: usize = usize::MAX / 2;

/// Chooses the start set and the symbol values for `data`, excluding the
/// check character.
fn plan(data: &[u8]) -> (CodeSet, Vec<u8>) {
    let n = data.len();
    // cost[i][s]: fewest symbols to encode data[i..] with set s active
    let mut cost = vec![[0usize; 3]; n + 1];
    let mut step = vec![[Step::Direct; 3]; n];

    for i in (0..n).rev() {
        for s in CodeSet::ALL {
            let mut best = UNREACHABLE;
            let mut best_step = Step::Direct;
            if let Some((_, used)) = s.value_at(data, i) {
                best = 1 + cost[i + used][s.index()];
            }
            for t in CodeSet::ALL {
                if t == s {
                    continue;
                }
                if let Some((_, used)) = t.value_at(data, i) {
                    let latched = 2 + cost[i + used][t.index()];
                    if latched < best {
                        best = latched;
                        best_step = Step::Latch(t);
                    }
                }
            }
            let other = match s {
                CodeSet::A => Some(CodeSet::B),
                CodeSet::B => Some(CodeSet::A),
                CodeSet::C => None,
            };
            if let Some(t) = other {
                if t.value_at(data, i).is_some() {
                    let shifted = 2 + cost[i + 1][s.index()];
                    if shifted < best {
                        best = shifted;
                        best_step = Step::Shift(t);
                    }
                }
            }
            cost[i][s.index()] = best;
            step[i][s.index()] = best_step;
        }
    }

    let mut set = CodeSet::B;
    let mut best = UNREACHABLE;
    for s in CodeSet::ALL {
        if s.value_at(data, 0).is_some() && cost[0][s.index()] < best {
            best = cost[0][s.index()];
            set = s;
        }
    }
    let start = set;

    let mut values: Vec<u8> = Vec::with_capacity(best);
    let mut i = 0;
    while i < n {
        match step[i][set.index()] {
            Step::Direct => {}
            Step::Latch(t) => {
                values.push(t.latch_value());
                set = t;
            }
            Step::Shift(t) => {
                if let Some((value, _)) = t.value_at(data, i) {
                    values.push(SHIFT);
                    values.push(value);
                }
                i += 1;
                continue;
            }
        }
        match set.value_at(data, i) {
            Some((value, used)) => {
                values.push(value);
                i += used;
            }
            None => break,
        }
    }
    (start, values)
}

/// Encodes a non-empty ASCII payload.
///
/// Fails with [`BarcodeError::UnsupportedInput`] on an empty payload or on
/// any byte above 127.
pub fn encode_code128(data: &[u8], bar_height: u32) -> Result<BarSequence> {
    if data.is_empty() {
        return Err(BarcodeError::unsupported("Code 128 data cannot be empty"));
    }
    if let Some(pos) = data.iter().position(|&b| b >= 128) {
        return Err(BarcodeError::unsupported(format!(
            "Code 128 encodes ASCII only, byte {:#04x} at offset {pos}",
            data[pos]
        )));
    }

    let (start, values) = plan(data);
    let start_value = start.start_value();
    let checksum = code128_checksum(start_value, &values);

    let mut widths: Vec<u32> = Vec::with_capacity(6 * (values.len() + 2) + STOP.len());
    for &v in std::iter::once(&start_value).chain(&values).chain(std::iter::once(&checksum)) {
        widths.extend(PATTERNS[usize::from(v)].iter().map(|&w| u32::from(w - b'0')));
    }
    widths.extend_from_slice(&STOP);

    let bars = BarSequence::new(widths, bar_height)?.with_text(String::from_utf8_lossy(data));
    if decode(bars.widths()).as_deref() != Some(data) {
        return Err(BarcodeError::Internal("Code 128 symbol does not decode to its payload".into()));
    }
    debug!(?start, symbols = values.len() + 2, "encoded Code 128");
    Ok(bars)
}

/// Decodes a bar sequence back to its payload, verifying start, check character and stop.
pub fn decode(widths: &[u32]) -> Option<Vec<u8>> {
    if widths.len() < 6 * 2 + STOP.len() || (widths.len() - STOP.len()) % 6 != 0 {
        return None;
    }
    let (body, stop) = widths.split_at(widths.len() - STOP.len());
    if stop != STOP {
        return None;
    }
    let symbols: Vec<u8> = body
        .chunks(6)
        .map(|group| {
            PATTERNS
                .iter()
                .position(|p| p.iter().zip(group).all(|(&a, &b)| u32::from(a - b'0') == b))
                .map(|v| v as u8)
        })
        .collect::<Option<_>>()?;

    let (&start, rest) = symbols.split_first()?;
    let (&checksum, values) = rest.split_last()?;
    if code128_checksum(start, values) != checksum {
        return None;
    }
    let mut set = match start {
        103 => CodeSet::A,
        104 => CodeSet::B,
        105 => CodeSet::C,
        _ => return None,
    };

    let mut out = Vec::new();
    let mut shifted = false;
    for &v in values {
        let active = match (shifted, set) {
            (true, CodeSet::A) => CodeSet::B,
            (true, CodeSet::B) => CodeSet::A,
            _ => set,
        };
        shifted = false;
        match (active, v) {
            (CodeSet::C, 0..=99) => {
                out.push(b'0' + v / 10);
                out.push(b'0' + v % 10);
            }
            (_, CODE_A) if active != CodeSet::A => set = CodeSet::A,
            (_, CODE_B) if active != CodeSet::B => set = CodeSet::B,
            (_, CODE_C) => set = CodeSet::C,
            (CodeSet::A | CodeSet::B, SHIFT) => shifted = true,
            (CodeSet::A, 0..=63) => out.push(v + 32),
            (CodeSet::A, 64..=95) => out.push(v - 64),
            (CodeSet::B, 0..=95) => out.push(v + 32),
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_of(data: &[u8]) -> (CodeSet, Vec<u8>) {
        plan(data)
    }

    #[test]
    fn test_patterns_are_eleven_modules() {
        for p in PATTERNS.iter() {
            assert_eq!(p.iter().map(|&w| u32::from(w - b'0')).sum::<u32>(), 11);
        }
        assert_eq!(STOP.iter().sum::<u32>(), 13);
    }

    #[test]
    fn test_code128_empty_data() {
        assert!(matches!(encode_code128(b"", 50), Err(BarcodeError::UnsupportedInput(_))));
    }

    #[test]
    fn test_code128_rejects_non_ascii() {
        assert!(matches!(encode_code128("héllo".as_bytes(), 50), Err(BarcodeError::UnsupportedInput(_))));
    }

    #[test]
    fn test_plain_text_uses_set_b() {
        let (start, values) = values_of(b"Hello123");
        assert_eq!(start, CodeSet::B);
        assert_eq!(values, vec![40, 69, 76, 76, 79, 17, 18, 19]);
    }

    #[test]
    fn test_even_digit_run_uses_set_c() {
        let (start, values) = values_of(b"123456");
        assert_eq!(start, CodeSet::C);
        assert_eq!(values, vec![12, 34, 56]);
    }

    #[test]
    fn test_latch_into_set_c_for_long_digit_run() {
        let (start, values) = values_of(b"ab123456");
        assert_eq!(start, CodeSet::B);
        assert_eq!(values, vec![65, 66, CODE_C, 12, 34, 56]);
    }

    #[test]
    fn test_shift_for_single_control_character() {
        // One control code inside lowercase text is cheaper as a shift than two latches.
        let (start, values) = values_of(b"ab\ncd");
        assert_eq!(start, CodeSet::B);
        assert_eq!(values, vec![65, 66, SHIFT, 74, 67, 68]);
    }

    #[test]
    fn test_control_characters_use_set_a() {
        let (start, values) = values_of(b"\t\t");
        assert_eq!(start, CodeSet::A);
        assert_eq!(values, vec![73, 73]);
    }

    #[test]
    fn test_symbol_width() {
        // start + 8 data + check = 10 symbols of 11 modules, plus 13 for stop
        let bars = encode_code128(b"Hello123", 50).unwrap();
        assert_eq!(bars.total_width(), 10 * 11 + 13);
        assert_eq!(bars.height(), 50);
    }

    #[test]
    fn test_decode_round_trip_mixed_sets() {
        for payload in [&b"PJJ123C"[..], b"0", b"1234567", b"A\x01b\x7f99", b"\x00\x1f~"] {
            let bars = encode_code128(payload, 30).unwrap();
            assert_eq!(decode(bars.widths()).unwrap(), payload);
        }
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let bars = encode_code128(b"TEST", 30).unwrap();
        let mut widths = bars.widths().to_vec();
        // Replace the check character with value 0
        let at = widths.len() - STOP.len() - 6;
        widths.splice(at..at + 6, [2, 1, 2, 2, 2, 2]);
        assert!(decode(&widths).is_none());
    }
}
