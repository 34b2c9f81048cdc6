//! The canonical intermediate handed from encoders to renderers.

use crate::error::{BarcodeError, Result};

/// A square grid of modules, `true` meaning dark.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleGrid {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Wraps row-major modules. `modules.len()` must equal `size * size`.
    pub fn new(size: usize, modules: Vec<bool>) -> Result<Self> {
        if size == 0 || modules.len() != size * size {
            return Err(BarcodeError::Internal(format!(
                "{} modules do not form a {size}x{size} grid",
                modules.len()
            )));
        }
        Ok(Self { size, modules })
    }

    /// Side length in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the module at column `x`, row `y`. Out-of-range coordinates are light.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.modules[y * self.size + x]
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }
}

/// Alternating bar and space widths of a linear symbol, starting with a bar.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BarSequence {
    widths: Vec<u32>,
    height: u32,
    text: Option<String>,
}

impl BarSequence {
    /// Every width and the height must be positive, and the sequence must
    /// start and end with a bar (odd length).
    pub fn new(widths: Vec<u32>, height: u32) -> Result<Self> {
        if widths.is_empty() || widths.len() % 2 == 0 {
            return Err(BarcodeError::Internal(format!(
                "bar sequence of {} elements does not start and end with a bar",
                widths.len()
            )));
        }
        if height == 0 || widths.contains(&0) {
            return Err(BarcodeError::Internal("bar sequence has a zero-width element".into()));
        }
        Ok(Self { widths, height, text: None })
    }

    /// Attaches the human-readable line printed under the bars. Control
    /// characters are dropped.
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        let text: String = text.as_ref().chars().filter(|c| !c.is_control()).collect();
        self.text = Some(text);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Builds a sequence from per-module colors, `true` meaning bar.
    pub fn from_modules(modules: &[bool], height: u32) -> Result<Self> {
        let mut widths: Vec<u32> = Vec::new();
        let mut current = true;
        let mut run = 0u32;
        for &module in modules {
            if module == current {
                run += 1;
            } else {
                widths.push(run);
                current = module;
                run = 1;
            }
        }
        widths.push(run);
        Self::new(widths, height)
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Symbol height in modules.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total symbol width in modules, without quiet zone.
    pub fn total_width(&self) -> u32 {
        self.widths.iter().sum()
    }

    /// Yields `(offset, width)` of every bar.
    pub fn bars(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.widths
            .iter()
            .scan(0u32, |offset, &w| {
                let start = *offset;
                *offset += w;
                Some((start, w))
            })
            .step_by(2)
    }

    /// Expands the widths back into per-module colors.
    pub fn modules(&self) -> Vec<bool> {
        self.widths
            .iter()
            .enumerate()
            .flat_map(|(i, &w)| std::iter::repeat(i % 2 == 0).take(w as usize))
            .collect()
    }
}

/// Widths of a two-width pattern written as `0` (narrow, one module) and `1` (`wide` modules).
pub(crate) fn wide_narrow_widths(flags: &[u8], wide: u32) -> impl Iterator<Item = u32> + '_ {
    flags.iter().map(move |&f| if f == b'1' { wide } else { 1 })
}

/// Inverse of [`wide_narrow_widths`]; `None` if a width is neither narrow nor wide.
pub(crate) fn wide_narrow_flags(widths: &[u32], wide: u32) -> Option<Vec<u8>> {
    widths
        .iter()
        .map(|&w| match w {
            1 => Some(b'0'),
            w if w == wide => Some(b'1'),
            _ => None,
        })
        .collect()
}

/// Output of an encoder.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Symbol {
    Matrix(ModuleGrid),
    Linear(BarSequence),
}

impl Symbol {
    /// Extent in modules as `(width, height)`, without quiet zone.
    pub fn extent(&self) -> (u32, u32) {
        match self {
            Self::Matrix(grid) => (grid.size() as u32, grid.size() as u32),
            Self::Linear(bars) => (bars.total_width(), bars.height()),
        }
    }
}
