//! Colours of the field parts
//!
//! Every part has a default and a player-chosen colour. Colours serialize as
//! `"#RRGGBB"` strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed ARGB with the given alpha (for canvas style hosts)
    pub fn to_argb(self, alpha: u8) -> u32 {
        u32::from_be_bytes([alpha, self.r, self.g, self.b])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #RRGGBB, got {s:?}"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("{s:?}: {e}"))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parts of the field with their own colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColoredPart {
    Field,
    Player,
    Obstacle,
    Goal,
}

impl ColoredPart {
    pub const ALL: [ColoredPart; 4] = [
        ColoredPart::Field,
        ColoredPart::Player,
        ColoredPart::Obstacle,
        ColoredPart::Goal,
    ];

    pub fn default_color(&self) -> Rgb {
        match self {
            ColoredPart::Field => Rgb::new(0x00, 0x80, 0xFF),
            ColoredPart::Player => Rgb::new(0xFF, 0x80, 0x00),
            ColoredPart::Obstacle => Rgb::new(0xC0, 0xFF, 0x00),
            ColoredPart::Goal => Rgb::new(0x00, 0xFF, 0x80),
        }
    }
}

/// Current colour of every part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub field: Rgb,
    pub player: Rgb,
    pub obstacle: Rgb,
    pub goal: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            field: ColoredPart::Field.default_color(),
            player: ColoredPart::Player.default_color(),
            obstacle: ColoredPart::Obstacle.default_color(),
            goal: ColoredPart::Goal.default_color(),
        }
    }
}

impl Palette {
    pub fn get(&self, part: ColoredPart) -> Rgb {
        match part {
            ColoredPart::Field => self.field,
            ColoredPart::Player => self.player,
            ColoredPart::Obstacle => self.obstacle,
            ColoredPart::Goal => self.goal,
        }
    }

    pub fn set(&mut self, part: ColoredPart, color: Rgb) {
        let slot = match part {
            ColoredPart::Field => &mut self.field,
            ColoredPart::Player => &mut self.player,
            ColoredPart::Obstacle => &mut self.obstacle,
            ColoredPart::Goal => &mut self.goal,
        };
        *slot = color;
    }

    pub fn reset(&mut self, part: ColoredPart) {
        self.set(part, part.default_color());
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    /// Colour to draw a part with, honouring the goal flash swap
    pub fn display_color(&self, part: ColoredPart, swapped: bool) -> Rgb {
        match (part, swapped) {
            (ColoredPart::Player, true) => self.goal,
            (ColoredPart::Goal, true) => self.player,
            _ => self.get(part),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        let c = Rgb::new(0xC0, 0xFF, 0x00);
        assert_eq!(c.to_string(), "#C0FF00");
        assert_eq!("#c0ff00".parse::<Rgb>().unwrap(), c);
        assert_eq!("C0FF00".parse::<Rgb>().unwrap(), c);
        assert!("#C0FF0".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_argb() {
        assert_eq!(Rgb::new(0x00, 0x80, 0xFF).to_argb(0x40), 0x400080FF);
    }

    #[test]
    fn test_set_and_reset() {
        let mut palette = Palette::default();
        palette.set(ColoredPart::Obstacle, Rgb::new(1, 2, 3));
        palette.set(ColoredPart::Goal, Rgb::new(4, 5, 6));
        assert_eq!(palette.get(ColoredPart::Obstacle), Rgb::new(1, 2, 3));

        palette.reset(ColoredPart::Obstacle);
        assert_eq!(palette.obstacle, ColoredPart::Obstacle.default_color());
        assert_eq!(palette.goal, Rgb::new(4, 5, 6));

        palette.reset_all();
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn test_swap_during_flash() {
        let palette = Palette::default();
        assert_eq!(palette.display_color(ColoredPart::Player, true), palette.goal);
        assert_eq!(palette.display_color(ColoredPart::Goal, true), palette.player);
        assert_eq!(palette.display_color(ColoredPart::Field, true), palette.field);
        assert_eq!(palette.display_color(ColoredPart::Player, false), palette.player);
    }

    #[test]
    fn test_palette_json() {
        let json = serde_json::to_string(&Palette::default()).unwrap();
        assert!(json.contains("\"field\":\"#0080FF\""));
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Palette::default());
    }
}
