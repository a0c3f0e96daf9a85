// File: crates/mzchart-core/src/palette.rs
// Summary: RGB color type and the grow-on-demand series/highlight palette.

use std::fmt;

/// Alpha applied to every series of a chart while a selection is active.
pub const DIM_ALPHA: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Seed colors, in legend order.
const SEED: [Color; 13] = [
    Color::new(0xFF, 0x66, 0x00),
    Color::new(0xFC, 0xD2, 0x02),
    Color::new(0xB0, 0xDE, 0x09),
    Color::new(0x0D, 0x8E, 0xCF),
    Color::new(0x2A, 0x0C, 0xD0),
    Color::new(0xCD, 0x0D, 0x74),
    Color::new(0xCC, 0x00, 0x00),
    Color::new(0x00, 0xCC, 0x00),
    Color::new(0x00, 0x00, 0xCC),
    Color::new(0xDD, 0xDD, 0xDD),
    Color::new(0x99, 0x99, 0x99),
    Color::new(0x33, 0x33, 0x33),
    Color::new(0x99, 0x00, 0x00),
];

/// Color list shared by both charts and the selection highlights. Indexing
/// past the end generates further colors on demand, so any number of series
/// can be drawn.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self { colors: SEED.to_vec() }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, growing the palette as needed.
    pub fn color(&mut self, index: usize) -> Color {
        while self.colors.len() <= index {
            let next = generated(self.colors.len() - SEED.len());
            self.colors.push(next);
        }
        self.colors[index]
    }

    /// Highlight color for selection slot `slot`. Slots start past the seed
    /// colors so a highlighted point never matches its own series color.
    pub fn slot_color(&mut self, slot: usize) -> Color {
        self.color(SEED.len() + slot)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

/// Golden-angle hue rotation keeps consecutive generated colors far apart.
fn generated(i: usize) -> Color {
    let hue = (i as f64 * 137.508) % 360.0;
    hsv_to_rgb(hue, 0.65, 0.85)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Color {
    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    Color::new(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
