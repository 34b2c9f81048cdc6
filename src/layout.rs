//! Module placement for QR Code symbols.
//!
//! A [`Canvas`] starts with every function pattern of its version drawn:
//! finders with separators, timing lines, alignment patterns, the reserved
//! format area and version information. Codeword bits then fill the remaining
//! modules in the standard two-column zig-zag, and one of eight masks is XORed
//! onto that data region.

use crate::qrcode::{format_bits, version_bits, ErrorCorrectionLevel, Mask, QrCode, Version};
use tracing::trace;

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Canvas {
    version: Version,
    size: usize,
    modules: Vec<bool>,
    is_function: Vec<bool>,
}

impl Canvas {
    /// A canvas with every function pattern drawn and the format area reserved.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut canvas = Self {
            version,
            size,
            modules: vec![false; size * size],
            is_function: vec![false; size * size],
        };
        canvas.draw_function_patterns();
        canvas
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.is_function[y * self.size + x]
    }

    pub fn into_modules(self) -> Vec<bool> {
        self.modules
    }

    fn set_function_module(&mut self, x: usize, y: usize, isdark: bool) {
        let index = y * self.size + x;
        self.modules[index] = isdark;
        self.is_function[index] = true;
    }

    fn draw_function_patterns(&mut self) {
        let size = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Skip the three alignment positions that overlap finder patterns
        let alignpatpos = self.alignment_pattern_positions();
        let numalign = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                let on_finder = (i == 0 && j == 0) ||
                    (i == 0 && j == numalign - 1) ||
                    (i == numalign - 1 && j == 0);
                if !on_finder {
                    self.draw_alignment_pattern(pos0, pos1);
                }
            }
        }

        // Reserve the format area with a dummy mask; the real bits come last
        self.draw_format_bits(ErrorCorrectionLevel::Low, Mask::new(0));
        self.draw_version();
    }

    /// 9x9 finder including its light separator, clipped at the symbol edge.
    fn draw_finder_pattern(&mut self, x: usize, y: usize) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let xx = x as i32 + dx;
                let yy = y as i32 + dy;
                if (0..self.size as i32).contains(&xx) && (0..self.size as i32).contains(&yy) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function_module(xx as usize, yy as usize, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: usize, y: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let dist = dx.abs().max(dy.abs());
                self.set_function_module(
                    (x as i32 + dx) as usize,
                    (y as i32 + dy) as usize,
                    dist != 1
                );
            }
        }
    }

    /// Draws both copies of the format information plus the fixed dark module.
    pub fn draw_format_bits(&mut self, ecl: ErrorCorrectionLevel, mask: Mask) {
        let bits = format_bits(ecl, mask);
        let size = self.size;
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    /// Reads back both format information copies, in drawing order.
    pub fn read_format_bits(&self) -> (u32, u32) {
        let size = self.size;
        let mut primary = 0u32;
        let mut secondary = 0u32;
        let put = |word: &mut u32, i: usize, dark: bool| *word |= u32::from(dark) << i;
        for i in 0..6 {
            put(&mut primary, i, self.get(8, i));
        }
        put(&mut primary, 6, self.get(8, 7));
        put(&mut primary, 7, self.get(8, 8));
        put(&mut primary, 8, self.get(7, 8));
        for i in 9..15 {
            put(&mut primary, i, self.get(14 - i, 8));
        }
        for i in 0..8 {
            put(&mut secondary, i, self.get(size - 1 - i, 8));
        }
        for i in 8..15 {
            put(&mut secondary, i, self.get(8, size - 15 + i));
        }
        (primary, secondary)
    }

    fn draw_version(&mut self) {
        if self.version.value() < 7 {
            return;
        }
        let bits = version_bits(self.version);
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + (i % 3);
            let b = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Center coordinates of alignment patterns, ascending.
    fn alignment_pattern_positions(&self) -> Vec<usize> {
        let ver = usize::from(self.version.value());
        if ver == 1 {
            return Vec::new();
        }
        let numalign = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            ((ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2)) * 2
        };
        let mut result: Vec<usize> = (0..numalign - 1).map(|i| self.size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    /// Non-function module coordinates in codeword placement order: column
    /// pairs from the right edge, alternating upward and downward, skipping
    /// the vertical timing column.
    fn data_positions(&self) -> Vec<(usize, usize)> {
        let size = self.size;
        let mut positions = Vec::with_capacity(QrCode::get_num_raw_data_modules(self.version));
        let mut right = size as i32 - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = if upward { size - 1 - vert } else { vert };
                for j in 0..2 {
                    let x = (right - j) as usize;
                    if !self.is_function(x, y) {
                        positions.push((x, y));
                    }
                }
            }
            right -= 2;
        }
        positions
    }

    /// Places the interleaved codewords, most significant bit first. Remainder
    /// bits past the last codeword stay light.
    pub fn draw_codewords(&mut self, data: &[u8]) {
        let positions = self.data_positions();
        assert_eq!(data.len(), positions.len() / 8, "Illegal argument");
        for (i, (x, y)) in positions.into_iter().take(data.len() * 8).enumerate() {
            self.modules[y * self.size + x] = get_bit(data[i >> 3].into(), 7 - (i & 7));
        }
    }

    /// Reads every full codeword back out of a masked canvas.
    pub fn read_codewords(&self, mask: Mask) -> Vec<u8> {
        let positions = self.data_positions();
        let mut result = vec![0u8; positions.len() / 8];
        for (i, &(x, y)) in positions.iter().take(result.len() * 8).enumerate() {
            if self.get(x, y) ^ mask.inverts(x, y) {
                result[i >> 3] |= 1 << (7 - (i & 7));
            }
        }
        result
    }

    /// XORs the mask onto every non-function module. Applying the same mask twice undoes it.
    pub fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                if !self.is_function(x, y) && mask.inverts(x, y) {
                    let index = y * self.size + x;
                    self.modules[index] = !self.modules[index];
                }
            }
        }
    }

    /// Tries all eight masks and returns the one with the lowest penalty,
    /// the lowest index winning ties. Leaves the canvas unmasked.
    pub fn choose_mask(&mut self, ecl: ErrorCorrectionLevel) -> Mask {
        let mut best = Mask::new(0);
        let mut minpenalty = i32::MAX;
        for i in 0u8..8 {
            let mask = Mask::new(i);
            self.apply_mask(mask);
            self.draw_format_bits(ecl, mask);
            let penalty = self.get_penalty_score();
            trace!(mask = i, penalty, "mask penalty");
            if penalty < minpenalty {
                best = mask;
                minpenalty = penalty;
            }
            self.apply_mask(mask); // Undoes the mask due to XOR
        }
        best
    }

    pub fn get_penalty_score(&self) -> i32 {
        let size = self.size;
        let mut result: i32 = 0;
        for y in 0..size {
            result += self.line_penalty(|x| self.get(x, y));
        }
        for x in 0..size {
            result += self.line_penalty(|y| self.get(x, y));
        }

        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.get(x, y);
                if color == self.get(x + 1, y) &&
                    color == self.get(x, y + 1) &&
                    color == self.get(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        let dark = self.modules.iter().filter(|&&m| m).count() as i32;
        let total = (size * size) as i32;
        // Smallest k such that (45-5k)% <= dark <= (55+5k)%
        let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
        result
    }

    /// Run-length and finder-like penalties along one row or column.
    fn line_penalty(&self, module: impl Fn(usize) -> bool) -> i32 {
        let mut result = 0;
        let mut runcolor = false;
        let mut runlen: i32 = 0;
        let mut runhistory = FinderPenalty::new(self.size);
        for i in 0..self.size {
            if module(i) == runcolor {
                runlen += 1;
                if runlen == 5 {
                    result += PENALTY_N1;
                } else if runlen > 5 {
                    result += 1;
                }
            } else {
                runhistory.add_history(runlen);
                if !runcolor {
                    result += runhistory.count_patterns() * PENALTY_N3;
                }
                runcolor = module(i);
                runlen = 1;
            }
        }
        result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
    }
}

/// Tracks the last seven run lengths of a line to spot 1:1:3:1:1 finder-like
/// patterns with four light modules on either side. The area outside the symbol counts as light.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: usize) -> Self {
        Self {
            qr_size: size as i32,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size;
        }
        let len = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

fn get_bit(x: u32, i: usize) -> bool {
    ((x >> i) & 1) != 0
}
