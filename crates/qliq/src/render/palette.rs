//! Per-level colour coding

use serde::Serialize;

/// Horizontal offset added per tree level, in layout units.
pub const INDENT_UNIT: u32 = 16;

/// Background/foreground pair used for one tree level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelColors {
    /// Card background, as `#rrggbb`
    pub background: &'static str,
    /// Text colour, as `#rrggbb`
    pub foreground: &'static str,
}

/// Level palette: blue, green, yellow, pink, purple.
pub const PALETTE: [LevelColors; 5] = [
    LevelColors {
        background: "#d0e2ff",
        foreground: "#003a75",
    },
    LevelColors {
        background: "#d0ffd6",
        foreground: "#004d20",
    },
    LevelColors {
        background: "#fff2cc",
        foreground: "#7a5700",
    },
    LevelColors {
        background: "#ffd6e8",
        foreground: "#660033",
    },
    LevelColors {
        background: "#e5d7ff",
        foreground: "#3d0072",
    },
];

/// Palette slot for a depth. Depths past the palette wrap around.
pub fn palette_index(depth: u32) -> usize {
    depth as usize % PALETTE.len()
}

/// Colours for a depth.
pub fn level_colors(depth: u32) -> LevelColors {
    PALETTE[palette_index(depth)]
}

impl LevelColors {
    /// Background as an `(r, g, b)` triple.
    pub fn background_rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex(self.background)
    }

    /// Foreground as an `(r, g, b)` triple.
    pub fn foreground_rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex(self.foreground)
    }
}

/// Parse `#rrggbb`.
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
