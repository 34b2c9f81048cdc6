//! QR code encoding functionality.
//!
//! This module turns a payload into the codeword sequence of a QR Code Model 2 symbol. It picks
//! the most compact segment mode (numeric, alphanumeric or byte) and the smallest version (1–40)
//! that holds the data at the requested error correction level, then assembles the bit stream
//! and splits it into Reed-Solomon blocks. Module placement and masking live in `layout`.
#![forbid(unsafe_code)]
use crate::error::{BarcodeError, Result};
use crate::layout::Canvas;
use crate::reed_solomon::{self, ReedSolomonGenerator};
use crate::symbol::ModuleGrid;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// Instances are immutable after creation and always pass [`QrCode::verify`].
///
/// # Example
///
/// ```rust
/// use quickcodes::qrcode::{ErrorCorrectionLevel, QrCode};
///
/// let qr = QrCode::encode(b"Hello, World!", ErrorCorrectionLevel::Low).unwrap();
/// assert_eq!(qr.version().value(), 1);
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,
    ecl: ErrorCorrectionLevel,
    mask: Mask,
    canvas: Canvas,
}

/// The data and error correction codewords of one Reed-Solomon block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CodewordBlock {
    pub data: Vec<u8>,
    pub ecc: Vec<u8>,
}

impl QrCode {
    /// Encodes a payload using the most compact single segment mode.
    ///
    /// The smallest version that holds the payload at `ecl` is chosen and the mask with the
    /// lowest penalty score is applied. An empty payload yields a version 1 symbol.
    ///
    /// Fails with [`BarcodeError::PayloadTooLarge`] if no version is large enough.
    pub fn encode(data: &[u8], ecl: ErrorCorrectionLevel) -> Result<Self> {
        let segs: Vec<QrSegment> = if data.is_empty() {
            Vec::new()
        } else {
            vec![QrSegment::for_payload(data)]
        };
        debug!(mode = ?segs.first().map(QrSegment::mode), len = data.len(), "selected QR segment mode");
        Self::encode_segments(&segs, ecl, None)
    }

    /// Encodes the given segments. `mask` can be `None` for automatic selection.
    pub fn encode_segments(
        segs: &[QrSegment],
        ecl: ErrorCorrectionLevel,
        mask: Option<Mask>
    ) -> Result<Self> {
        let version = Self::select_version(segs, ecl)?;
        let datacodewords = Self::encode_segments_to_codewords(segs, version, ecl);
        Self::encode_codewords(&datacodewords, version, ecl, mask)
    }

    /// Finds the minimal version whose data capacity holds `segs` at `ecl`.
    pub fn select_version(segs: &[QrSegment], ecl: ErrorCorrectionLevel) -> Result<Version> {
        let mut version: Version = Version::MIN;
        loop {
            let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
            let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
            if dataused.map_or(false, |n| n <= datacapacitybits) {
                return Ok(version);
            } else if version >= Version::MAX {
                return Err(BarcodeError::PayloadTooLarge(match dataused {
                    None => "segment exceeds the character count field of every version".into(),
                    Some(n) =>
                        format!(
                            "data length = {} bits, version 40-{:?} holds {} bits",
                            n,
                            ecl,
                            datacapacitybits
                        ),
                }));
            }
            version = Version::new(version.value() + 1);
        }
    }

    /// Assembles mode indicators, character counts, payload bits, terminator and pad bytes
    /// into exactly [`QrCode::get_num_data_codewords`] codewords.
    ///
    /// # Panics
    ///
    /// Panics if the segments do not fit in `version`; use [`QrCode::select_version`] first.
    pub fn encode_segments_to_codewords(
        segs: &[QrSegment],
        version: Version,
        ecl: ErrorCorrectionLevel
    ) -> Vec<u8> {
        let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
        let mut bb = BitBuffer::new();
        for seg in segs {
            bb.append_bits(seg.mode.mode_bits(), 4);
            bb.append_bits(seg.numchars as u32, seg.mode.num_char_count_bits(version));
            bb.append_buffer(&seg.data);
        }
        assert!(bb.len() <= datacapacitybits, "Segments exceed version capacity");

        // Add terminator and pad up to a byte if applicable
        let numzerobits: usize = core::cmp::min(4, datacapacitybits - bb.len());
        bb.append_bits(0, numzerobits as u8);
        let numzerobits: usize = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xec, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }
        bb.into_bytes()
    }

    /// Creates a QR Code from data codewords: adds error correction, places every module,
    /// applies the mask (chosen by penalty score when `msk` is `None`) and verifies the result.
    pub fn encode_codewords(
        datacodewords: &[u8],
        version: Version,
        ecl: ErrorCorrectionLevel,
        msk: Option<Mask>
    ) -> Result<Self> {
        if datacodewords.len() != QrCode::get_num_data_codewords(version, ecl) {
            return Err(
                BarcodeError::Internal(
                    format!(
                        "{} data codewords given, version {}-{:?} needs {}",
                        datacodewords.len(),
                        version.value(),
                        ecl,
                        QrCode::get_num_data_codewords(version, ecl)
                    )
                )
            );
        }
        let allcodewords = Self::add_ecc_and_interleave(datacodewords, version, ecl);

        let mut canvas = Canvas::new(version);
        canvas.draw_codewords(&allcodewords);
        let mask = match msk {
            Some(m) => m,
            None => canvas.choose_mask(ecl),
        };
        canvas.apply_mask(mask);
        canvas.draw_format_bits(ecl, mask);

        let result = Self { version, ecl, mask, canvas };
        if result.data_codewords() != datacodewords {
            return Err(BarcodeError::Internal("placed data codewords do not read back".into()));
        }
        result.verify()?;
        debug!(version = version.value(), ?ecl, mask = mask.value(), "encoded QR Code");
        Ok(result)
    }

    /// Checks the symbol against itself: both format information copies must carry this
    /// symbol's level and mask, and every block's EC codewords must be the Reed-Solomon
    /// remainder of its data codewords.
    pub fn verify(&self) -> Result<()> {
        let expected = format_bits(self.ecl, self.mask);
        let (primary, secondary) = self.canvas.read_format_bits();
        if primary != expected || secondary != expected {
            return Err(BarcodeError::Internal("format information does not match".into()));
        }
        for (i, block) in self.codeword_blocks().iter().enumerate() {
            if reed_solomon::generate_ec_codewords(&block.data, block.ecc.len()) != block.ecc {
                return Err(BarcodeError::Internal(format!("EC codewords of block {i} do not match")));
            }
        }
        Ok(())
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.canvas.size() as i32
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> ErrorCorrectionLevel {
        self.ecl
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size();
        range.contains(&x) && range.contains(&y) && self.canvas.get(x as usize, y as usize)
    }

    /// Reads the interleaved codewords back out of the grid and splits them into blocks.
    pub fn codeword_blocks(&self) -> Vec<CodewordBlock> {
        let rawcodewords = self.canvas.read_codewords(self.mask);
        Self::deinterleave(&rawcodewords, self.version, self.ecl)
    }

    /// Data codewords in bit-stream order, read back from the grid.
    pub fn data_codewords(&self) -> Vec<u8> {
        self.codeword_blocks()
            .into_iter()
            .flat_map(|block| block.data)
            .collect()
    }

    /// Converts the symbol into the renderer's module grid.
    pub fn into_grid(self) -> Result<ModuleGrid> {
        let size = self.canvas.size();
        ModuleGrid::new(size, self.canvas.into_modules())
    }

    fn block_layout(ver: Version, ecl: ErrorCorrectionLevel) -> BlockLayout {
        let numblocks: usize = QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let blockecclen: usize = QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords: usize = QrCode::get_num_raw_data_modules(ver) / 8;
        BlockLayout {
            numblocks,
            blockecclen,
            numshortblocks: numblocks - (rawcodewords % numblocks),
            shortblocklen: rawcodewords / numblocks,
        }
    }

    fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: ErrorCorrectionLevel) -> Vec<u8> {
        assert_eq!(data.len(), QrCode::get_num_data_codewords(ver, ecl));
        let layout = Self::block_layout(ver, ecl);
        let rs = ReedSolomonGenerator::new(layout.blockecclen);

        // Short blocks get a placeholder byte so that every block has the same length
        let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(layout.numblocks);
        let mut dat: &[u8] = data;
        for i in 0..layout.numblocks {
            let datlen = layout.data_len(i);
            let mut block = dat[..datlen].to_vec();
            let ecc = rs.compute_remainder(&block);
            if i < layout.numshortblocks {
                block.push(0);
            }
            block.extend_from_slice(&ecc);
            blocks.push(block);
            dat = &dat[datlen..];
        }
        debug_assert_eq!(dat.len(), 0);

        let mut result: Vec<u8> = Vec::with_capacity(QrCode::get_num_raw_data_modules(ver) / 8);
        for i in 0..=layout.shortblocklen {
            for (j, block) in blocks.iter().enumerate() {
                if layout.holds(i, j) {
                    result.push(block[i]);
                }
            }
        }
        result
    }

    fn deinterleave(rawcodewords: &[u8], ver: Version, ecl: ErrorCorrectionLevel) -> Vec<CodewordBlock> {
        let layout = Self::block_layout(ver, ecl);
        let mut blocks: Vec<Vec<u8>> = vec![vec![0u8; layout.shortblocklen + 1]; layout.numblocks];
        let mut stream = rawcodewords.iter();
        for i in 0..=layout.shortblocklen {
            for (j, block) in blocks.iter_mut().enumerate() {
                if layout.holds(i, j) {
                    block[i] = stream.next().copied().unwrap_or(0);
                }
            }
        }
        blocks
            .into_iter()
            .enumerate()
            .map(|(j, mut block)| {
                let datlen = layout.data_len(j);
                if j < layout.numshortblocks {
                    block.remove(datlen);
                }
                let ecc = block.split_off(datlen);
                CodewordBlock { data: block, ecc }
            })
            .collect()
    }

    /// Number of data bits that can be stored in a symbol of the given version, after all
    /// function modules are excluded. Includes remainder bits.
    pub fn get_num_raw_data_modules(ver: Version) -> usize {
        let ver = usize::from(ver.value());
        let mut result: usize = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign: usize = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    /// Number of 8-bit data codewords (excluding error correction) at the given version and level.
    pub fn get_num_data_codewords(ver: Version, ecl: ErrorCorrectionLevel) -> usize {
        QrCode::get_num_raw_data_modules(ver) / 8 -
            QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl) *
                QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
    }

    fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: ErrorCorrectionLevel) -> usize {
        table[ecl.ordinal()][usize::from(ver.value())] as usize
    }
}

struct BlockLayout {
    numblocks: usize,
    blockecclen: usize,
    numshortblocks: usize,
    /// Data plus EC codewords of a short block.
    shortblocklen: usize,
}

impl BlockLayout {
    fn data_len(&self, block: usize) -> usize {
        self.shortblocklen - self.blockecclen + usize::from(block >= self.numshortblocks)
    }

    // Index `i` of padded block `j` carries a real codeword.
    fn holds(&self, i: usize, j: usize) -> bool {
        i != self.shortblocklen - self.blockecclen || j >= self.numshortblocks
    }
}

/// The 15-bit format information word for a level and mask, BCH-protected and XOR-masked.
pub(crate) fn format_bits(ecl: ErrorCorrectionLevel, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// The 18-bit version information word, BCH-protected. Only drawn for versions 7 and up.
pub(crate) fn version_bits(ver: Version) -> u32 {
    let ver = u32::from(ver.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    (ver << 12) | rem
}

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl ErrorCorrectionLevel {
    pub const ALL: [ErrorCorrectionLevel; 4] = [Self::Low, Self::Medium, Self::Quartile, Self::High];

    fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    fn format_bits(self) -> u8 {
        use ErrorCorrectionLevel::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self> {
        use ErrorCorrectionLevel::*;
        match s.to_ascii_lowercase().as_str() {
            "low" | "l" => Ok(Low),
            "medium" | "m" => Ok(Medium),
            "quartile" | "q" => Ok(Quartile),
            "high" | "h" => Ok(High),
            _ => Err(BarcodeError::unknown_option(format!("error correction level `{s}`"))),
        }
    }
}

/// A segment of data in a QR code, already converted to its bit representation.
#[derive(Clone, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: BitBuffer,
}

impl QrSegment {
    /// Picks the most compact mode that represents `data` losslessly.
    pub fn for_payload(data: &[u8]) -> Self {
        if QrSegment::is_numeric(data) {
            QrSegment::make_numeric(data)
        } else if QrSegment::is_alphanumeric(data) {
            QrSegment::make_alphanumeric(data)
        } else {
            QrSegment::make_bytes(data)
        }
    }

    /// Creates a segment for binary data in byte mode.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::new();
        for &b in data {
            bb.append_bits(b.into(), 8);
        }
        QrSegment { mode: QrSegmentMode::Byte, numchars: data.len(), data: bb }
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains non-digit characters.
    pub fn make_numeric(text: &[u8]) -> Self {
        let mut bb = BitBuffer::new();
        for chunk in text.chunks(3) {
            let mut accumdata: u32 = 0;
            for &b in chunk {
                assert!(b.is_ascii_digit(), "String contains non-numeric characters");
                accumdata = accumdata * 10 + u32::from(b - b'0');
            }
            bb.append_bits(accumdata, (chunk.len() as u8) * 3 + 1);
        }
        QrSegment { mode: QrSegmentMode::Numeric, numchars: text.len(), data: bb }
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains invalid characters.
    pub fn make_alphanumeric(text: &[u8]) -> Self {
        let mut bb = BitBuffer::new();
        for pair in text.chunks(2) {
            let mut accumdata: u32 = 0;
            for &c in pair {
                let i = ALPHANUMERIC_CHARSET.iter()
                    .position(|&a| a == c)
                    .expect("String contains unencodable characters in alphanumeric mode");
                accumdata = accumdata * 45 + i as u32;
            }
            bb.append_bits(accumdata, if pair.len() == 2 { 11 } else { 6 });
        }
        QrSegment { mode: QrSegmentMode::Alphanumeric, numchars: text.len(), data: bb }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// Length of the payload bits, without mode indicator or character count.
    pub fn bit_len(&self) -> usize {
        self.data.len()
    }

    fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if seg.numchars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    pub fn is_numeric(text: &[u8]) -> bool {
        text.iter().all(u8::is_ascii_digit)
    }

    pub fn is_alphanumeric(text: &[u8]) -> bool {
        text.iter().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

static ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl QrSegmentMode {
    fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (
            match self {
                Numeric => [10, 12, 14],
                Alphanumeric => [9, 11, 13],
                Byte => [8, 16, 16],
            }
        )[usize::from((ver.value() + 7) / 17)]
    }
}

/// An appendable sequence of bits, packed big-endian into bytes.
#[derive(Clone, Default, Debug)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0);
        for i in (0..len).rev() {
            let shift = 7 - (self.length & 7);
            if shift == 7 {
                self.data.push(0);
            }
            let bit = ((val >> i) & 1) as u8;
            if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    fn append_buffer(&mut self, other: &BitBuffer) {
        for i in 0..other.length {
            let bit = (other.data[i >> 3] >> (7 - (i & 7))) & 1;
            self.append_bits(bit.into(), 1);
        }
    }

    /// The packed bytes. A partial final byte is zero-padded.
    fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length in modules, `version * 4 + 17`.
    pub const fn size(self) -> usize {
        (self.0 as usize) * 4 + 17
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this mask inverts the module at column `x`, row `y`.
    pub fn inverts(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => ((x * y) % 2) + ((x * y) % 3) == 0,
            6 => (((x * y) % 2) + ((x * y) % 3)) % 2 == 0,
            7 => (((x + y) % 2) + ((x * y) % 3)) % 2 == 0,
            _ => unreachable!(),
        }
    }
}
