//! RGBA color type and CSS-style color parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::RasterError;

/// An 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    pub fn a(&self) -> u8 {
        self.0[3]
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha_f32(&self) -> f32 {
        f32::from(self.0[3]) / 255.0
    }

    /// Format the color channels as `rgb(r, g, b)`, dropping alpha.
    pub fn to_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r(), self.g(), self.b())
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r(),
                self.g(),
                self.b(),
                self.a()
            )
        }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(value: Rgba) -> Self {
        value.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().to_ascii_lowercase();
        let invalid = || RasterError::InvalidColor(s.to_string());

        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        if let Some(body) = spec
            .strip_prefix("rgba(")
            .or_else(|| spec.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body).ok_or_else(invalid);
        }

        named(&spec).ok_or_else(invalid)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        3 => Some(Rgba::rgb(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
        )),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Rgba> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let channel = |p: &str| p.parse::<u8>().ok();

    match parts.as_slice() {
        [r, g, b] => Some(Rgba::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha: f32 = a.parse().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            Some(Rgba::new(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (alpha * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

fn named(name: &str) -> Option<Rgba> {
    let color = match name {
        "black" => Rgba::BLACK,
        "white" => Rgba::WHITE,
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "yellow" => Rgba::rgb(255, 255, 0),
        "cyan" => Rgba::rgb(0, 255, 255),
        "magenta" => Rgba::rgb(255, 0, 255),
        "orange" => Rgba::rgb(255, 165, 0),
        "transparent" => Rgba::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}
