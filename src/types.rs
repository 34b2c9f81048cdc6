//! Symbology and output format selectors.

use crate::error::{BarcodeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The symbologies this crate can encode.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BarcodeType {
    /// QR Code Model 2, versions 1 to 40.
    QRCode,
    /// EAN-13, twelve data digits plus a check digit.
    EAN13,
    /// UPC-A, eleven data digits plus a check digit.
    UPCA,
    /// Code 128 over the full ASCII range.
    Code128,
    /// Code 39: digits, upper-case letters and a few symbols.
    Code39,
    /// ITF-14, thirteen data digits plus a check digit.
    ITF14,
    /// Codabar framed by A to D guards.
    Codabar,
}

impl BarcodeType {
    /// Every symbology, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::QRCode,
        Self::EAN13,
        Self::UPCA,
        Self::Code128,
        Self::Code39,
        Self::ITF14,
        Self::Codabar,
    ];

    /// Whether the symbology produces a two-dimensional module grid.
    pub fn is_matrix(self) -> bool {
        matches!(self, Self::QRCode)
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::QRCode => "QRCode",
            Self::EAN13 => "EAN13",
            Self::UPCA => "UPCA",
            Self::Code128 => "Code128",
            Self::Code39 => "Code39",
            Self::ITF14 => "ITF14",
            Self::Codabar => "Codabar",
        };
        f.write_str(name)
    }
}

impl FromStr for BarcodeType {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "qrcode" | "qr" | "qr_code" => Ok(Self::QRCode),
            "ean13" | "ean-13" => Ok(Self::EAN13),
            "upca" | "upc-a" | "upc" => Ok(Self::UPCA),
            "code128" | "code-128" => Ok(Self::Code128),
            "code39" | "code-39" => Ok(Self::Code39),
            "itf14" | "itf-14" | "itf" => Ok(Self::ITF14),
            "codabar" => Ok(Self::Codabar),
            _ => Err(BarcodeError::unknown_option(format!("barcode type `{s}`"))),
        }
    }
}

/// Image serialization backends.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ExportFormat {
    SVG,
    PNG,
}

impl ExportFormat {
    /// Infers the format from a file path's extension, ignoring case.
    pub fn from_extension(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                BarcodeError::unknown_option(format!(
                    "no file extension on `{}`, expected .svg or .png",
                    path.display()
                ))
            })?
            .parse()
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::SVG => "svg",
            Self::PNG => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SVG => "SVG",
            Self::PNG => "PNG",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::SVG),
            "png" => Ok(Self::PNG),
            _ => Err(BarcodeError::unknown_option(format!("export format `{s}`"))),
        }
    }
}
