//! Reed-Solomon error correction codewords over GF(2^8).

use crate::gf256;

/// Longest EC block in any QR Code version.
pub const MAX_DEGREE: usize = 30;

/// A monic generator polynomial `(x - 2^0)(x - 2^1)...(x - 2^(degree-1))`.
///
/// The leading coefficient is implied. `divisor` holds the remaining
/// coefficients from the highest power down to the constant term.
pub struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// # Panics
    ///
    /// Panics if `degree` is outside `1..=MAX_DEGREE`.
    pub fn new(degree: usize) -> Self {
        assert!((1..=MAX_DEGREE).contains(&degree), "Degree out of range");
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = gf256::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = gf256::multiply(root, 0x02);
        }
        Self { divisor }
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Non-leading generator coefficients, highest power first.
    pub fn coefficients(&self) -> &[u8] {
        &self.divisor
    }

    /// Remainder of `data(x) * x^degree` divided by the generator.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.degree()];
        for &b in data {
            let factor = b ^ result[0];
            result.rotate_left(1);
            let last = result.len() - 1;
            result[last] = 0;
            for (x, &y) in result.iter_mut().zip(&self.divisor) {
                *x ^= gf256::multiply(y, factor);
            }
        }
        result
    }
}

/// Computes `ec_count` error correction codewords for one block of data codewords.
///
/// An `ec_count` of zero yields no codewords.
///
/// # Panics
///
/// Panics if `ec_count` exceeds [`MAX_DEGREE`].
pub fn generate_ec_codewords(data_codewords: &[u8], ec_count: usize) -> Vec<u8> {
    if ec_count == 0 {
        return Vec::new();
    }
    ReedSolomonGenerator::new(ec_count).compute_remainder(data_codewords)
}
