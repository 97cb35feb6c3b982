//! Colour palettes shared by the blob and fractal scenes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Named colour palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// Dark green code theme.
    #[default]
    Emerald,
    Ocean,
    Ember,
    Dusk,
}

const EMERALD: [Rgba; 6] = [
    Rgba::rgb(0, 255, 136),
    Rgba::rgb(16, 185, 129),
    Rgba::rgb(34, 197, 94),
    Rgba::rgb(74, 222, 128),
    Rgba::rgb(20, 184, 166),
    Rgba::rgb(45, 212, 191),
];

const OCEAN: [Rgba; 6] = [
    Rgba::rgb(56, 189, 248),
    Rgba::rgb(14, 165, 233),
    Rgba::rgb(59, 130, 246),
    Rgba::rgb(99, 102, 241),
    Rgba::rgb(34, 211, 238),
    Rgba::rgb(125, 211, 252),
];

const EMBER: [Rgba; 6] = [
    Rgba::rgb(249, 115, 22),
    Rgba::rgb(239, 68, 68),
    Rgba::rgb(251, 191, 36),
    Rgba::rgb(234, 88, 12),
    Rgba::rgb(244, 63, 94),
    Rgba::rgb(253, 186, 116),
];

const DUSK: [Rgba; 6] = [
    Rgba::rgb(168, 85, 247),
    Rgba::rgb(236, 72, 153),
    Rgba::rgb(129, 140, 248),
    Rgba::rgb(192, 132, 252),
    Rgba::rgb(244, 114, 182),
    Rgba::rgb(99, 102, 241),
];

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Emerald,
        Palette::Ocean,
        Palette::Ember,
        Palette::Dusk,
    ];

    /// Cycle to the next palette.
    pub fn next(self) -> Self {
        match self {
            Palette::Emerald => Palette::Ocean,
            Palette::Ocean => Palette::Ember,
            Palette::Ember => Palette::Dusk,
            Palette::Dusk => Palette::Emerald,
        }
    }

    /// Accent colours, never empty.
    pub fn colors(self) -> &'static [Rgba] {
        match self {
            Palette::Emerald => &EMERALD,
            Palette::Ocean => &OCEAN,
            Palette::Ember => &EMBER,
            Palette::Dusk => &DUSK,
        }
    }

    /// Accent colour for an index, wrapping around.
    pub fn color(self, index: usize) -> Rgba {
        let colors = self.colors();
        colors[index % colors.len()]
    }

    /// Opaque backdrop colour.
    pub fn background(self) -> Rgba {
        match self {
            Palette::Emerald => Rgba::rgb(13, 17, 23),
            Palette::Ocean => Rgba::rgb(8, 15, 30),
            Palette::Ember => Rgba::rgb(24, 12, 10),
            Palette::Dusk => Rgba::rgb(18, 12, 30),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Palette::Emerald => "emerald",
            Palette::Ocean => "ocean",
            Palette::Ember => "ember",
            Palette::Dusk => "dusk",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown palette '{s}' (expected emerald, ocean, ember or dusk)"))
    }
}
