//! SVG and PNG backends.
//!
//! Both backends draw the same geometry. A symbol is laid out on a grid of
//! units, one unit per module (or per bar module), surrounded by a quiet zone
//! of `margin` units on every side. Linear symbols are `bar_height` units tall.
//! With `include_text`, SVG output of a linear symbol gains a band of
//! [`TEXT_BAND`] units under the bars holding its human-readable line.

use crate::error::{BarcodeError, Result};
use crate::options::{check_margin, EncodeOptions, DEFAULT_LINEAR_MARGIN, DEFAULT_MATRIX_MARGIN, MAX_PIXELS};
use crate::symbol::{ModuleGrid, Symbol};
use crate::types::ExportFormat;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tracing::{debug, warn};

/// Height in units of the human-readable band under a linear symbol.
pub const TEXT_BAND: u32 = 10;

const FONT_SIZE: u32 = 8;

/// Renders `symbol` as image bytes in `format`.
///
/// Rendering is a pure function of its arguments, so the same symbol and
/// options always produce byte-identical output.
///
/// # Errors
///
/// [`BarcodeError::UnknownOption`] if the margin exceeds
/// [`MAX_MARGIN`](crate::options::MAX_MARGIN), if a size is zero or does not
/// fit in `u32`, or if a PNG would exceed [`MAX_PIXELS`].
pub fn render(symbol: &Symbol, format: ExportFormat, options: &EncodeOptions) -> Result<Vec<u8>> {
    let geometry = Geometry::new(symbol, format, options)?;
    let (width, height) = geometry.pixel_size(options)?;
    let bytes = match format {
        ExportFormat::SVG => to_svg_string(&geometry, width, height, options).into_bytes(),
        ExportFormat::PNG => {
            if u64::from(width) * u64::from(height) > MAX_PIXELS {
                return Err(BarcodeError::unknown_option(format!(
                    "a {width}x{height} PNG exceeds the {MAX_PIXELS} pixel limit"
                )));
            }
            let (uw, uh) = geometry.units;
            if width < uw || height < uh {
                warn!(width, height, units_w = uw, units_h = uh, "PNG is smaller than one pixel per module");
            }
            to_png_bytes(&geometry, width, height, options)?
        }
    };
    debug!(%format, width, height, len = bytes.len(), "rendered symbol");
    Ok(bytes)
}

enum Cells<'a> {
    Matrix(&'a ModuleGrid),
    Linear { modules: Vec<bool>, height: u32 },
}

/// Unit-space layout of a symbol and its quiet zone.
struct Geometry<'a> {
    cells: Cells<'a>,
    margin: u32,
    /// Human-readable line drawn in the text band, SVG only.
    text: Option<&'a str>,
    units: (u32, u32),
}

impl<'a> Geometry<'a> {
    fn new(symbol: &'a Symbol, format: ExportFormat, options: &EncodeOptions) -> Result<Self> {
        let (cells, default_margin, text) = match symbol {
            Symbol::Matrix(grid) => (Cells::Matrix(grid), DEFAULT_MATRIX_MARGIN, None),
            Symbol::Linear(bars) => (
                Cells::Linear { modules: bars.modules(), height: bars.height() },
                DEFAULT_LINEAR_MARGIN,
                bars.text().filter(|t| !t.is_empty() && options.include_text && format == ExportFormat::SVG),
            ),
        };
        let margin = check_margin(options.margin.unwrap_or(default_margin))?;
        let band = if text.is_some() { TEXT_BAND } else { 0 };
        let (w, h) = symbol.extent();
        let too_large = || BarcodeError::unknown_option(format!("a {w}x{h} symbol with margin {margin} is too large"));
        let quiet = 2 * margin;
        let uw = w.checked_add(quiet).ok_or_else(too_large)?;
        let uh = h.checked_add(quiet).and_then(|v| v.checked_add(band)).ok_or_else(too_large)?;
        Ok(Self { cells, margin, text, units: (uw, uh) })
    }

    /// Whether the unit at column `x`, row `y` (quiet zone included) is dark.
    fn is_dark(&self, x: u32, y: u32) -> bool {
        let (Some(x), Some(y)) = (x.checked_sub(self.margin), y.checked_sub(self.margin)) else {
            return false;
        };
        match &self.cells {
            Cells::Matrix(grid) => grid.get(x as usize, y as usize),
            Cells::Linear { modules, height } => y < *height && modules.get(x as usize).copied().unwrap_or(false),
        }
    }

    /// Dark rectangles as `(x, y, width, height)` in units. Coordinates stay
    /// below `units`, which `new` has checked against `u32`.
    fn rects(&self) -> Vec<(u32, u32, u32, u32)> {
        let m = self.margin;
        match &self.cells {
            Cells::Matrix(grid) => {
                let size = grid.size();
                (0..size)
                    .flat_map(|y| (0..size).map(move |x| (x, y)))
                    .filter(|&(x, y)| grid.get(x, y))
                    .map(|(x, y)| (x as u32 + m, y as u32 + m, 1, 1))
                    .collect()
            }
            Cells::Linear { modules, height } => {
                let mut rects = Vec::new();
                let mut x = 0;
                while x < modules.len() {
                    let run = modules[x..].iter().take_while(|&&dark| dark == modules[x]).count();
                    if modules[x] {
                        rects.push((x as u32 + m, m, run as u32, *height));
                    }
                    x += run;
                }
                rects
            }
        }
    }

    /// Baseline of the human-readable line, in units.
    fn text_baseline(&self) -> u32 {
        self.units.1 - self.margin - TEXT_BAND + FONT_SIZE
    }

    /// Output size in pixels. A single given dimension keeps the aspect ratio;
    /// with neither, one pixel per unit.
    fn pixel_size(&self, options: &EncodeOptions) -> Result<(u32, u32)> {
        let (uw, uh) = self.units;
        let scale = |given: u32, from: u32, to: u32| {
            let scaled = (u64::from(given) * u64::from(to) + u64::from(from) / 2) / u64::from(from);
            u32::try_from(scaled.max(1)).map_err(|_| BarcodeError::unknown_option(format!("output size {scaled}")))
        };
        match (options.width, options.height) {
            (Some(0), _) | (_, Some(0)) => Err(BarcodeError::unknown_option("width and height must be positive")),
            (Some(w), Some(h)) => Ok((w, h)),
            (Some(w), None) => Ok((w, scale(w, uw, uh)?)),
            (None, Some(h)) => Ok((scale(h, uh, uw)?, h)),
            (None, None) => Ok((uw, uh)),
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Returns an SVG document of the symbol; the `viewBox` is in units and the
/// `width`/`height` attributes in pixels. Always uses Unix newlines.
fn to_svg_string(geometry: &Geometry<'_>, width: u32, height: u32, options: &EncodeOptions) -> String {
    let (uw, uh) = geometry.units;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {uw} {uh}\" preserveAspectRatio=\"none\" shape-rendering=\"crispEdges\" stroke=\"none\">\n"
    );
    result += &format!("\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n", options.background);
    result += &format!("\t<g fill=\"{}\">\n", options.foreground);
    for (x, y, w, h) in geometry.rects() {
        result += &format!("\t\t<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\"/>\n");
    }
    result += "\t</g>\n";
    if let Some(text) = geometry.text {
        result += &format!(
            "\t<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"monospace\" font-size=\"{FONT_SIZE}\" fill=\"{}\">{}</text>\n",
            f64::from(uw) / 2.0,
            geometry.text_baseline(),
            options.foreground,
            escape_xml(text)
        );
    }
    result += "</svg>\n";
    result
}

/// Rasterizes by nearest-unit sampling and encodes the buffer as PNG.
fn to_png_bytes(geometry: &Geometry<'_>, width: u32, height: u32, options: &EncodeOptions) -> Result<Vec<u8>> {
    let (uw, uh) = geometry.units;
    let foreground = Rgb(options.foreground.0);
    let background = Rgb(options.background.0);
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
        let ux = (u64::from(x) * u64::from(uw) / u64::from(width)) as u32;
        let uy = (u64::from(y) * u64::from(uh) / u64::from(height)) as u32;
        if geometry.is_dark(ux, uy) {
            foreground
        } else {
            background
        }
    });

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Color;
    use crate::qrcode::{ErrorCorrectionLevel, QrCode};
    use crate::symbol::BarSequence;

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn qr_symbol(text: &str) -> Symbol {
        let qr = QrCode::encode(text.as_bytes(), ErrorCorrectionLevel::Low).unwrap();
        Symbol::Matrix(qr.into_grid().unwrap())
    }

    fn decode_png(bytes: &[u8]) -> RgbImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Png).unwrap().to_rgb8()
    }

    #[test]
    fn test_to_svg_string() {
        let symbol = qr_symbol("HELLO WORLD");
        let svg = String::from_utf8(render(&symbol, ExportFormat::SVG, &EncodeOptions::default()).unwrap()).unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(svg.matches("<svg").count(), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
        // version 1 plus the default quiet zone on both sides
        assert!(svg.contains("viewBox=\"0 0 29 29\""));
    }

    #[test]
    fn test_svg_one_rect_per_dark_module() {
        let symbol = qr_symbol("12345");
        let Symbol::Matrix(grid) = &symbol else { unreachable!() };
        let svg = String::from_utf8(render(&symbol, ExportFormat::SVG, &EncodeOptions::default()).unwrap()).unwrap();
        // the background adds one rect
        assert_eq!(svg.matches("<rect").count(), grid.dark_count() + 1);
    }

    #[test]
    fn test_svg_linear_bars_and_colors() {
        let bars = BarSequence::new(vec![1, 2, 3], 20).unwrap();
        let options = EncodeOptions::default().with_margin(2).with_colors(Color([255, 0, 0]), Color([0, 0, 255]));
        let svg = String::from_utf8(render(&Symbol::Linear(bars), ExportFormat::SVG, &options).unwrap()).unwrap();
        assert!(svg.contains("viewBox=\"0 0 10 24\""));
        assert!(svg.contains("<rect x=\"2\" y=\"2\" width=\"1\" height=\"20\"/>"));
        assert!(svg.contains("<rect x=\"5\" y=\"2\" width=\"3\" height=\"20\"/>"));
        assert!(svg.contains("fill=\"#FF0000\""));
        assert!(svg.contains("fill=\"#0000FF\""));
    }

    #[test]
    fn test_generate_image_buffer() {
        // "Hello, world!" at level Low is version 1; with a border of 4 it is 29x29.
        let bytes = render(&qr_symbol("Hello, world!"), ExportFormat::PNG, &EncodeOptions::default()).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);
        let img = decode_png(&bytes);
        assert_eq!(img.dimensions(), (29, 29));
        // top-left finder corner is dark, quiet zone is light
        assert_eq!(*img.get_pixel(4, 4), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_png_requested_size() {
        let symbol = qr_symbol("size");
        let options = EncodeOptions::default().with_width(290).with_height(145);
        let img = decode_png(&render(&symbol, ExportFormat::PNG, &options).unwrap());
        assert_eq!(img.dimensions(), (290, 145));
    }

    #[test]
    fn test_png_keeps_aspect_ratio() {
        // 3 modules wide, 20 tall, margin 0
        let bars = BarSequence::new(vec![1, 1, 1], 20).unwrap();
        let symbol = Symbol::Linear(bars);
        let options = EncodeOptions::default().with_margin(0).with_width(30);
        let img = decode_png(&render(&symbol, ExportFormat::PNG, &options).unwrap());
        assert_eq!(img.dimensions(), (30, 200));
        assert_eq!(*img.get_pixel(5, 100), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(15, 100), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(25, 100), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut options = EncodeOptions::default();
        options.width = Some(0);
        assert!(matches!(
            render(&qr_symbol("x"), ExportFormat::PNG, &options),
            Err(BarcodeError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let symbol = qr_symbol("determinism");
        let options = EncodeOptions::default().with_width(100);
        for format in [ExportFormat::SVG, ExportFormat::PNG] {
            assert_eq!(render(&symbol, format, &options).unwrap(), render(&symbol, format, &options).unwrap());
        }
    }

    #[test]
    fn test_margin_overflow_rejected() {
        let mut options = EncodeOptions::default();
        options.margin = Some(u32::MAX);
        for format in [ExportFormat::SVG, ExportFormat::PNG] {
            assert!(matches!(render(&qr_symbol("x"), format, &options), Err(BarcodeError::UnknownOption(_))));
        }
    }

    #[test]
    fn test_bar_height_overflow_rejected() {
        let symbol = Symbol::Linear(BarSequence::new(vec![1], u32::MAX).unwrap());
        assert!(matches!(
            render(&symbol, ExportFormat::SVG, &EncodeOptions::default()),
            Err(BarcodeError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_png_pixel_limit() {
        let options = EncodeOptions::default().with_width(u32::MAX).with_height(u32::MAX);
        assert!(matches!(
            render(&qr_symbol("x"), ExportFormat::PNG, &options),
            Err(BarcodeError::UnknownOption(_))
        ));
        // only attributes grow in SVG
        assert!(render(&qr_symbol("x"), ExportFormat::SVG, &options).is_ok());

        let tall = Symbol::Linear(BarSequence::new(vec![1, 1, 1], 1_000_000_000).unwrap());
        assert!(matches!(
            render(&tall, ExportFormat::PNG, &EncodeOptions::default()),
            Err(BarcodeError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_undersized_png_keeps_requested_size() {
        let options = EncodeOptions::default().with_width(10).with_height(10);
        let img = decode_png(&render(&qr_symbol("small"), ExportFormat::PNG, &options).unwrap());
        assert_eq!(img.dimensions(), (10, 10));
    }

    #[test]
    fn test_svg_text_band() {
        let bars = BarSequence::new(vec![1, 2, 3], 20).unwrap().with_text("A<&B");
        let symbol = Symbol::Linear(bars);
        let options = EncodeOptions::default().with_margin(2).with_text(true);
        let svg = String::from_utf8(render(&symbol, ExportFormat::SVG, &options).unwrap()).unwrap();
        assert!(svg.contains(&format!("viewBox=\"0 0 10 {}\"", 24 + TEXT_BAND)));
        assert!(svg.contains("<text x=\"5\" y=\"30\" text-anchor=\"middle\""));
        assert!(svg.contains(">A&lt;&amp;B</text>"));
    }

    #[test]
    fn test_text_only_when_requested() {
        let symbol = Symbol::Linear(BarSequence::new(vec![1, 2, 3], 20).unwrap().with_text("123"));
        let plain = EncodeOptions::default().with_margin(2);
        let svg = String::from_utf8(render(&symbol, ExportFormat::SVG, &plain).unwrap()).unwrap();
        assert!(!svg.contains("<text"));
        assert!(svg.contains("viewBox=\"0 0 10 24\""));

        // PNG has no text band
        let img = decode_png(&render(&symbol, ExportFormat::PNG, &plain.clone().with_text(true)).unwrap());
        assert_eq!(img.dimensions(), (10, 24));

        // matrix symbols never carry text
        let qr = String::from_utf8(
            render(&qr_symbol("x"), ExportFormat::SVG, &EncodeOptions::default().with_text(true)).unwrap(),
        )
        .unwrap();
        assert!(!qr.contains("<text"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a\"b'<c>&"), "a&quot;b'&lt;c&gt;&amp;");
    }
}
