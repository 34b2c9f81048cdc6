//! # quickcodes
//!
//! A Rust library for generating barcodes as SVG or PNG images.
//!
//! `quickcodes` encodes text or binary data into QR Codes (Model 2, versions 1 to 40, four
//! error correction levels) and into the linear symbologies EAN-13, UPC-A, Code 128, Code 39,
//! ITF-14 and Codabar. Every
//! symbol is checked against its own payload before it is rendered, and rendering is
//! deterministic: the same input always yields the same bytes.
//!
//! ## Features
//!
//! - Encode QR Codes in numeric, alphanumeric or byte mode with automatic version selection.
//! - Compute and verify EAN-13/UPC-A check digits.
//! - Encode Code 128 with the shortest mix of code sets A, B and C.
//! - Encode Code 39, ITF-14 and Codabar.
//! - Optionally print the human-readable payload under linear symbols in SVG.
//! - Render as SVG documents or PNG images with custom size, quiet zone and colors.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! ```rust
//! use quickcodes::{generate, BarcodeType, EncodeOptions, ErrorCorrectionLevel, ExportFormat};
//!
//! let options = EncodeOptions::default().with_error_correction(ErrorCorrectionLevel::High);
//! let svg = generate(BarcodeType::QRCode, "https://example.com", ExportFormat::SVG, &options).unwrap();
//! assert!(String::from_utf8(svg).unwrap().contains("</svg>"));
//!
//! let png = generate(BarcodeType::EAN13, "123456789012", ExportFormat::PNG, &EncodeOptions::default()).unwrap();
//! assert_eq!(&png[..4], b"\x89PNG");
//! ```
//!
//! Encode once, render twice:
//!
//! ```rust
//! use quickcodes::{encode, render, BarcodeType, EncodeOptions, ExportFormat, Symbol};
//!
//! let options = EncodeOptions::default().with_width(300);
//! let symbol = encode(BarcodeType::Code128, "PJJ123C", &options).unwrap();
//! assert!(matches!(symbol, Symbol::Linear(_)));
//! let svg = render(&symbol, ExportFormat::SVG, &options).unwrap();
//! let png = render(&symbol, ExportFormat::PNG, &options).unwrap();
//! assert!(!svg.is_empty() && !png.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: QR Code encoding and introspection.
//! - [`ean`], [`code128`], [`code39`], [`itf`], [`codabar`]: linear symbologies.
//! - [`checksum`], [`reed_solomon`], [`gf256`]: check digits and error correction.
//! - [`mod@render`]: SVG and PNG backends.

pub mod checksum;
pub mod codabar;
pub mod code128;
pub mod code39;
pub mod ean;
pub mod error;
pub mod gf256;
pub mod itf;
mod layout;
pub mod options;
pub mod qrcode;
pub mod reed_solomon;
pub mod render;
pub mod symbol;
pub mod types;

pub use error::{BarcodeError, Result};
pub use options::{Color, EncodeOptions};
pub use qrcode::{ErrorCorrectionLevel, QrCode};
pub use render::render;
pub use symbol::{BarSequence, ModuleGrid, Symbol};
pub use types::{BarcodeType, ExportFormat};

use options::DEFAULT_BAR_HEIGHT;
use std::path::Path;
use tracing::debug;

/// Encodes `data` into the canonical symbol of `barcode_type`.
///
/// Only the options that apply to the symbology are read: `error_correction` for QR Codes and
/// `bar_height` for linear codes.
///
/// # Errors
///
/// - [`BarcodeError::UnsupportedInput`] if the payload breaks the symbology's alphabet or length rules.
/// - [`BarcodeError::PayloadTooLarge`] if a QR payload exceeds version 40.
/// - [`BarcodeError::UnknownOption`] if `bar_height` is zero for a linear symbology.
#[tracing::instrument(skip(data, options))]
pub fn encode(barcode_type: BarcodeType, data: impl AsRef<[u8]>, options: &EncodeOptions) -> Result<Symbol> {
    let data = data.as_ref();
    if barcode_type.is_matrix() {
        let grid = QrCode::encode(data, options.error_correction)?.into_grid()?;
        debug!(size = grid.size(), "encoded symbol");
        return Ok(Symbol::Matrix(grid));
    }

    let bar_height = match options.bar_height {
        Some(0) => return Err(BarcodeError::unknown_option("bar_height must be positive")),
        Some(h) => h,
        None => DEFAULT_BAR_HEIGHT,
    };
    let bars = match barcode_type {
        BarcodeType::EAN13 => ean::encode_ean13(data, bar_height)?,
        BarcodeType::UPCA => ean::encode_upca(data, bar_height)?,
        BarcodeType::Code128 => code128::encode_code128(data, bar_height)?,
        BarcodeType::Code39 => code39::encode_code39(data, bar_height)?,
        BarcodeType::ITF14 => itf::encode_itf14(data, bar_height)?,
        BarcodeType::Codabar => codabar::encode_codabar(data, bar_height)?,
        BarcodeType::QRCode => return Err(BarcodeError::Internal("QR Code reached the linear encoders".into())),
    };
    let symbol = Symbol::Linear(bars);
    debug!(extent = ?symbol.extent(), "encoded symbol");
    Ok(symbol)
}

/// Encodes `data` and renders it, returning the complete image bytes.
///
/// Nothing is returned on failure; see [`encode`] and [`render`] for the error cases.
#[tracing::instrument(skip(data, options))]
pub fn generate(
    barcode_type: BarcodeType,
    data: impl AsRef<[u8]>,
    format: ExportFormat,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    let symbol = encode(barcode_type, data, options)?;
    render(&symbol, format, options)
}

/// Generates a symbol with default options and writes it to `path`.
///
/// The format is inferred from the extension (`.svg` or `.png`). The image is fully built
/// before the file is opened, so a failing encode leaves any existing file untouched.
///
/// # Example
///
/// ```rust
/// use quickcodes::{generate_to_file, BarcodeType};
///
/// let path = std::env::temp_dir().join("quickcodes_doc_example.svg");
/// generate_to_file(BarcodeType::QRCode, "Hello, World!", &path).unwrap();
/// # std::fs::remove_file(&path).unwrap();
/// ```
#[tracing::instrument(skip(data, path), fields(path = %path.as_ref().display()))]
pub fn generate_to_file(barcode_type: BarcodeType, data: impl AsRef<[u8]>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = ExportFormat::from_extension(path)?;
    let bytes = generate(barcode_type, data, format, &EncodeOptions::default())?;
    std::fs::write(path, &bytes)?;
    debug!(len = bytes.len(), "wrote symbol");
    Ok(())
}
