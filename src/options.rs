//! Encoding and rendering options.
//!
//! [`EncodeOptions`] is shared by every symbology. Options that do not apply
//! to a symbology are ignored, so `error_correction` has no effect on linear
//! codes and `width`/`height` only control the output size.
//!
//! Bindings that receive options as strings go through [`EncodeOptions::set`],
//! which validates each value once, before any encoder runs.

use crate::error::{BarcodeError, Result};
use crate::qrcode::ErrorCorrectionLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quiet zone around a QR Code, in modules.
pub const DEFAULT_MATRIX_MARGIN: u32 = 4;

/// Quiet zone on each side of a linear symbol, in modules.
pub const DEFAULT_LINEAR_MARGIN: u32 = 10;

/// Bar height of a linear symbol, in modules.
pub const DEFAULT_BAR_HEIGHT: u32 = 50;

/// Largest accepted quiet zone, in modules.
pub const MAX_MARGIN: u32 = 1_000;

/// Largest raster a PNG may have, in pixels (`width * height`). About 200 MiB of RGB.
pub const MAX_PIXELS: u64 = 1 << 26;

/// An opaque RGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    /// Formats the color as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = BarcodeError;

    /// Parses `#RRGGBB` or `RRGGBB`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(BarcodeError::unknown_option(format!("color `{s}`")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| BarcodeError::unknown_option(format!("color `{s}`")))
        };
        Ok(Color([channel(0)?, channel(2)?, channel(4)?]))
    }
}

/// Options recognised by [`generate`](crate::generate).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Target output width in pixels.
    ///
    /// PNG output samples the nearest module for every pixel, so a width below the symbol's
    /// module count (quiet zone included) drops modules and the image may not scan.
    pub width: Option<u32>,
    /// Target output height in pixels. Same sampling caveat as `width`.
    pub height: Option<u32>,
    /// Quiet zone in modules, at most [`MAX_MARGIN`]. `None` picks the symbology default.
    pub margin: Option<u32>,
    /// QR Code redundancy level.
    pub error_correction: ErrorCorrectionLevel,
    /// Bar height of linear symbols, in modules.
    pub bar_height: Option<u32>,
    pub foreground: Color,
    pub background: Color,
    /// Print the human-readable payload under linear symbols in SVG output.
    pub include_text: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            margin: None,
            error_correction: ErrorCorrectionLevel::Medium,
            bar_height: None,
            foreground: Color::BLACK,
            background: Color::WHITE,
            include_text: false,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_error_correction(mut self, level: ErrorCorrectionLevel) -> Self {
        self.error_correction = level;
        self
    }

    pub fn with_bar_height(mut self, bar_height: u32) -> Self {
        self.bar_height = Some(bar_height);
        self
    }

    pub fn with_colors(mut self, foreground: Color, background: Color) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    pub fn with_text(mut self, include_text: bool) -> Self {
        self.include_text = include_text;
        self
    }

    /// Sets an option from its string form.
    ///
    /// Recognised keys are `width`, `height`, `margin`, `error_correction`,
    /// `bar_height`, `foreground`, `background` and `include_text`. An unknown key or a value
    /// that does not parse fails with [`BarcodeError::UnknownOption`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use quickcodes::{EncodeOptions, ErrorCorrectionLevel};
    ///
    /// let mut options = EncodeOptions::default();
    /// options.set("error_correction", "High").unwrap();
    /// options.set("margin", "2").unwrap();
    /// assert_eq!(options.error_correction, ErrorCorrectionLevel::High);
    /// assert!(options.set("error_correction", "Invalid").is_err());
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "width" => self.width = Some(parse_dimension(key, value)?),
            "height" => self.height = Some(parse_dimension(key, value)?),
            "bar_height" => self.bar_height = Some(parse_dimension(key, value)?),
            "margin" => self.margin = Some(parse_margin(value)?),
            "error_correction" => self.error_correction = value.parse()?,
            "foreground" => self.foreground = value.parse()?,
            "background" => self.background = value.parse()?,
            "include_text" => self.include_text = parse_flag(key, value)?,
            _ => return Err(BarcodeError::unknown_option(format!("option key `{key}`"))),
        }
        Ok(())
    }

    /// Builds options from string key/value pairs, as handed over by bindings.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            options.set(key, value)?;
        }
        Ok(options)
    }
}

fn parse_count(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| BarcodeError::unknown_option(format!("`{key}` expects an integer, got `{value}`")))
}

/// Rejects quiet zones above [`MAX_MARGIN`].
pub(crate) fn check_margin(margin: u32) -> Result<u32> {
    if margin > MAX_MARGIN {
        return Err(BarcodeError::unknown_option(format!("`margin` must be at most {MAX_MARGIN}, got {margin}")));
    }
    Ok(margin)
}

fn parse_margin(value: &str) -> Result<u32> {
    check_margin(parse_count("margin", value)?)
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(BarcodeError::unknown_option(format!("`{key}` expects true or false, got `{value}`"))),
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32> {
    match parse_count(key, value)? {
        0 => Err(BarcodeError::unknown_option(format!("`{key}` must be positive"))),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_recognised_keys() {
        let options = EncodeOptions::from_pairs([
            ("width", "300"),
            ("height", "120"),
            ("margin", "0"),
            ("error_correction", "Q"),
            ("foreground", "#102030"),
            ("background", "ffffff"),
        ])
        .unwrap();
        assert_eq!(options.width, Some(300));
        assert_eq!(options.height, Some(120));
        assert_eq!(options.margin, Some(0));
        assert_eq!(options.error_correction, ErrorCorrectionLevel::Quartile);
        assert_eq!(options.foreground, Color([0x10, 0x20, 0x30]));
        assert_eq!(options.background, Color::WHITE);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut options = EncodeOptions::default();
        assert!(matches!(options.set("error_correction", "Invalid"), Err(BarcodeError::UnknownOption(_))));
        assert!(matches!(options.set("width", "0"), Err(BarcodeError::UnknownOption(_))));
        assert!(matches!(options.set("width", "-3"), Err(BarcodeError::UnknownOption(_))));
        assert!(matches!(options.set("dpi", "300"), Err(BarcodeError::UnknownOption(_))));
        assert!(matches!(options.set("foreground", "#12345"), Err(BarcodeError::UnknownOption(_))));
        assert!(matches!(options.set("include_text", "maybe"), Err(BarcodeError::UnknownOption(_))));
        assert_eq!(options, EncodeOptions::new());
    }

    #[test]
    fn test_margin_upper_bound() {
        let mut options = EncodeOptions::new();
        options.set("margin", "1000").unwrap();
        assert_eq!(options.margin, Some(MAX_MARGIN));
        assert!(matches!(options.set("margin", "1001"), Err(BarcodeError::UnknownOption(_))));
        assert!(matches!(options.set("margin", "4294967295"), Err(BarcodeError::UnknownOption(_))));
        assert_eq!(options.margin, Some(MAX_MARGIN));
    }

    #[test]
    fn test_include_text_flag() {
        let mut options = EncodeOptions::new();
        assert!(!options.include_text);
        options.set("include_text", "True").unwrap();
        assert!(options.include_text);
        options.set("include_text", "0").unwrap();
        assert!(!options.include_text);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color([255, 165, 0]).to_hex(), "#FFA500");
        assert_eq!("#FFA500".parse::<Color>().unwrap(), Color([255, 165, 0]));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let options: EncodeOptions =
            serde_json::from_str(r#"{"margin": 2, "error_correction": "High"}"#).unwrap();
        assert_eq!(options.margin, Some(2));
        assert_eq!(options.error_correction, ErrorCorrectionLevel::High);
        assert_eq!(options.width, None);
        assert_eq!(options.foreground, Color::BLACK);
    }
}
