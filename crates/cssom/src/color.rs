//! Color values for `@define-color`.
//!
//! A [`ColorValue`] is kept symbolic (references to other defined colors and
//! color functions stay unevaluated) so it can be printed back as written.
//! [`ColorValue::resolve`] evaluates it to a concrete [`Rgba`].
//!
//! ## Supported Syntax
//!
//! - **Hex**: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - **Named**: CSS color names like `red`, `steelblue`, plus `transparent`
//! - **RGB**: `rgb(r, g, b)`, `rgba(r, g, b, a)`, components as numbers or percentages
//! - **References**: `@name` refers to another `@define-color`
//! - **Functions**: `shade(c, f)`, `alpha(c, f)`, `mix(c1, c2, f)`, `lighter(c)`, `darker(c)`

use std::fmt;

use phf::phf_map;

use crate::source::{TokenRole, TokenSource};
use crate::token::{Token, TokenType, write_number};

/// References nested deeper than this do not resolve, which also stops cycles.
const MAX_RESOLVE_DEPTH: usize = 32;

/// Color functions nested deeper than this are rejected while parsing.
const MAX_NESTING_DEPTH: usize = 32;

/// An RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha component (0.0 = transparent, 1.0 = opaque).
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses the digits of a hex color, without the leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;

        match digits[..] {
            [r, g, b] => Some(Self::rgb(r * 17, g * 17, b * 17)),
            [r, g, b, a] => Some(Self::rgba(r * 17, g * 17, b * 17, (a * 17) as f32 / 255.0)),
            [r1, r2, g1, g2, b1, b2] => Some(Self::rgb(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
            [r1, r2, g1, g2, b1, b2, a1, a2] => Some(Self::rgba(
                r1 * 16 + r2,
                g1 * 16 + g2,
                b1 * 16 + b2,
                (a1 * 16 + a2) as f32 / 255.0,
            )),
            _ => None,
        }
    }

    /// Looks up a CSS color name, ASCII case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .get(name.as_str())
            .map(|&(r, g, b)| Self::rgb(r, g, b))
    }

    fn to_hsl(self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + (if g < b { 6.0 } else { 0.0 })
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    fn from_hsl(h: f32, s: f32, l: f32, a: f32) -> Self {
        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };
        Self::rgba(to_channel(r), to_channel(g), to_channel(b), a)
    }

    /// Scales lightness and saturation by `factor`.
    pub fn shade(self, factor: f64) -> Self {
        let factor = factor as f32;
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, (s * factor).clamp(0.0, 1.0), (l * factor).clamp(0.0, 1.0), self.a)
    }

    pub fn with_alpha_factor(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor as f32).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Interpolates towards `other`; `factor` 0 is `self`, 1 is `other`.
    pub fn mix(self, other: Self, factor: f64) -> Self {
        let t = (factor as f32).clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::rgba(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
            self.a + (other.a - self.a) * t,
        )
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, ", self.r, self.g, self.b)?;
            write_number(f, self.a as f64)?;
            f.write_str(")")
        }
    }
}

/// Map of CSS color names to their RGB components.
static NAMED_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "black" => (0, 0, 0),
    "white" => (255, 255, 255),
    "red" => (255, 0, 0),
    "green" => (0, 128, 0),
    "lime" => (0, 255, 0),
    "blue" => (0, 0, 255),
    "yellow" => (255, 255, 0),
    "cyan" => (0, 255, 255),
    "aqua" => (0, 255, 255),
    "magenta" => (255, 0, 255),
    "fuchsia" => (255, 0, 255),
    "gray" => (128, 128, 128),
    "grey" => (128, 128, 128),
    "silver" => (192, 192, 192),
    "maroon" => (128, 0, 0),
    "olive" => (128, 128, 0),
    "purple" => (128, 0, 128),
    "teal" => (0, 128, 128),
    "navy" => (0, 0, 128),
    "orange" => (255, 165, 0),
    "pink" => (255, 192, 203),
    "brown" => (165, 42, 42),
    "coral" => (255, 127, 80),
    "gold" => (255, 215, 0),
    "indigo" => (75, 0, 130),
    "violet" => (238, 130, 238),
    "crimson" => (220, 20, 60),
    "tomato" => (255, 99, 71),
    "salmon" => (250, 128, 114),
    "khaki" => (240, 230, 140),
    "orchid" => (218, 112, 214),
    "plum" => (221, 160, 221),
    "tan" => (210, 180, 140),
    "beige" => (245, 245, 220),
    "ivory" => (255, 255, 240),
    "lavender" => (230, 230, 250),
    "steelblue" => (70, 130, 180),
    "skyblue" => (135, 206, 235),
    "slategray" => (112, 128, 144),
    "darkgray" => (169, 169, 169),
    "lightgray" => (211, 211, 211),
    "dimgray" => (105, 105, 105),
    "aliceblue" => (240, 248, 255),
    "rebeccapurple" => (102, 51, 153),
};

/// A color as written in a stylesheet.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorValue {
    Literal(Rgba),
    /// `@name`, a reference to another defined color.
    Reference(String),
    Shade(Box<ColorValue>, f64),
    Alpha(Box<ColorValue>, f64),
    Mix(Box<ColorValue>, Box<ColorValue>, f64),
    Lighter(Box<ColorValue>),
    Darker(Box<ColorValue>),
}

impl ColorValue {
    /// Parses a color from `source`, reporting errors through it.
    pub fn parse(source: &mut dyn TokenSource) -> Option<ColorValue> {
        Self::parse_nested(source, 0)
    }

    fn parse_nested(source: &mut dyn TokenSource, depth: usize) -> Option<ColorValue> {
        let token = source.get_token().clone();
        match token {
            Token::Hash(hex) => {
                source.consume_token_as(TokenRole::Color);
                match Rgba::from_hex(&hex) {
                    Some(rgba) => Some(ColorValue::Literal(rgba)),
                    None => {
                        source.error(&format!("Invalid hex color #{}", hex));
                        None
                    }
                }
            }
            Token::Ident(name) => {
                source.consume_token_as(TokenRole::Color);
                match Rgba::from_name(&name) {
                    Some(rgba) => Some(ColorValue::Literal(rgba)),
                    None => {
                        source.error(&format!("'{}' is not a valid color name", name));
                        None
                    }
                }
            }
            Token::AtKeyword(name) => {
                source.consume_token_as(TokenRole::Color);
                Some(ColorValue::Reference(name))
            }
            Token::Function(name) => {
                if depth >= MAX_NESTING_DEPTH {
                    source.error("Color nested too deeply");
                    return None;
                }
                source.consume_token_as(TokenRole::Color);
                let color = Self::parse_function(source, &name.to_ascii_lowercase(), depth + 1)?;
                if !source.consume_if(TokenType::CloseParens, TokenRole::Color) {
                    source.error(&format!("Expected ')' at end of {}()", name));
                    return None;
                }
                Some(color)
            }
            _ => {
                source.error("Expected a color");
                None
            }
        }
    }

    /// Parses the arguments of a color function, up to but excluding the `)`.
    fn parse_function(
        source: &mut dyn TokenSource,
        name: &str,
        depth: usize,
    ) -> Option<ColorValue> {
        match name {
            "rgb" | "rgba" => parse_rgb_arguments(source).map(ColorValue::Literal),
            "shade" => {
                let color = Self::parse_nested(source, depth)?;
                expect_comma(source)?;
                let factor = parse_number(source)?;
                Some(ColorValue::Shade(Box::new(color), factor))
            }
            "alpha" => {
                let color = Self::parse_nested(source, depth)?;
                expect_comma(source)?;
                let factor = parse_number(source)?;
                Some(ColorValue::Alpha(Box::new(color), factor))
            }
            "mix" => {
                let first = Self::parse_nested(source, depth)?;
                expect_comma(source)?;
                let second = Self::parse_nested(source, depth)?;
                expect_comma(source)?;
                let factor = parse_number(source)?;
                Some(ColorValue::Mix(Box::new(first), Box::new(second), factor))
            }
            "lighter" => {
                Self::parse_nested(source, depth).map(|c| ColorValue::Lighter(Box::new(c)))
            }
            "darker" => {
                Self::parse_nested(source, depth).map(|c| ColorValue::Darker(Box::new(c)))
            }
            _ => {
                source.error(&format!("Unknown color function {}()", name));
                None
            }
        }
    }

    /// Evaluates this color, looking up references with `lookup`.
    ///
    /// Returns `None` if a reference is undefined or references nest too
    /// deeply (including cycles).
    pub fn resolve(&self, lookup: &dyn Fn(&str) -> Option<ColorValue>) -> Option<Rgba> {
        self.resolve_at_depth(lookup, 0)
    }

    fn resolve_at_depth(
        &self,
        lookup: &dyn Fn(&str) -> Option<ColorValue>,
        depth: usize,
    ) -> Option<Rgba> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }
        let resolve = |color: &ColorValue| color.resolve_at_depth(lookup, depth + 1);

        match self {
            ColorValue::Literal(rgba) => Some(*rgba),
            ColorValue::Reference(name) => resolve(&lookup(name)?),
            ColorValue::Shade(color, factor) => Some(resolve(color)?.shade(*factor)),
            ColorValue::Alpha(color, factor) => Some(resolve(color)?.with_alpha_factor(*factor)),
            ColorValue::Mix(first, second, factor) => {
                Some(resolve(first)?.mix(resolve(second)?, *factor))
            }
            ColorValue::Lighter(color) => Some(resolve(color)?.shade(1.3)),
            ColorValue::Darker(color) => Some(resolve(color)?.shade(0.7)),
        }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Literal(rgba) => write!(f, "{}", rgba),
            ColorValue::Reference(name) => write!(f, "@{}", name),
            ColorValue::Shade(color, factor) => {
                write!(f, "shade({}, ", color)?;
                write_number(f, *factor)?;
                f.write_str(")")
            }
            ColorValue::Alpha(color, factor) => {
                write!(f, "alpha({}, ", color)?;
                write_number(f, *factor)?;
                f.write_str(")")
            }
            ColorValue::Mix(first, second, factor) => {
                write!(f, "mix({}, {}, ", first, second)?;
                write_number(f, *factor)?;
                f.write_str(")")
            }
            ColorValue::Lighter(color) => write!(f, "lighter({})", color),
            ColorValue::Darker(color) => write!(f, "darker({})", color),
        }
    }
}

fn expect_comma(source: &mut dyn TokenSource) -> Option<()> {
    if source.consume_if(TokenType::Comma, TokenRole::Punctuation) {
        Some(())
    } else {
        source.error("Expected ','");
        None
    }
}

fn parse_number(source: &mut dyn TokenSource) -> Option<f64> {
    match *source.get_token() {
        Token::Number(value) => {
            source.consume_token_as(TokenRole::Value);
            Some(value)
        }
        _ => {
            source.error("Expected a number");
            None
        }
    }
}

/// A color channel: a number in 0-255 or a percentage.
fn parse_channel(source: &mut dyn TokenSource) -> Option<u8> {
    let channel = match *source.get_token() {
        Token::Number(value) => value,
        Token::Percentage(value) => value * 255.0 / 100.0,
        _ => {
            source.error("Expected a color channel value");
            return None;
        }
    };
    source.consume_token_as(TokenRole::Color);
    Some(channel.round().clamp(0.0, 255.0) as u8)
}

fn parse_rgb_arguments(source: &mut dyn TokenSource) -> Option<Rgba> {
    let r = parse_channel(source)?;
    expect_comma(source)?;
    let g = parse_channel(source)?;
    expect_comma(source)?;
    let b = parse_channel(source)?;

    let a = if source.consume_if(TokenType::Comma, TokenRole::Punctuation) {
        parse_number(source)?.clamp(0.0, 1.0) as f32
    } else {
        1.0
    };
    Some(Rgba::rgba(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CssError;
    use crate::source::TokenizerSource;

    fn parse(input: &str) -> Option<ColorValue> {
        ColorValue::parse(&mut TokenizerSource::new(input))
    }

    fn no_lookup(_: &str) -> Option<ColorValue> {
        None
    }

    fn nested_lighter(depth: usize) -> String {
        format!("{}red{}", "lighter(".repeat(depth), ")".repeat(depth))
    }

    // ==================== LITERALS ====================

    #[test]
    fn test_hex_forms() {
        assert_eq!(Rgba::from_hex("f00"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::from_hex("0000"), Some(Rgba::rgba(0, 0, 0, 0.0)));
        assert_eq!(Rgba::from_hex("9932CC"), Some(Rgba::rgb(0x99, 0x32, 0xcc)));
        assert_eq!(
            Rgba::from_hex("ff000080"),
            Some(Rgba::rgba(255, 0, 0, 0x80 as f32 / 255.0))
        );
        assert_eq!(Rgba::from_hex("ff00"), Some(Rgba::rgba(255, 255, 0, 0.0)));
        assert_eq!(Rgba::from_hex("12345"), None);
        assert_eq!(Rgba::from_hex("xyz"), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(Rgba::from_name("Red"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::from_name("transparent"), Some(Rgba::TRANSPARENT));
        assert_eq!(Rgba::from_name("notacolor"), None);
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse("#00f"), Some(ColorValue::Literal(Rgba::rgb(0, 0, 255))));
        assert_eq!(parse("  coral"), Some(ColorValue::Literal(Rgba::rgb(255, 127, 80))));
        assert_eq!(
            parse("rgba(255, 0, 0, 0.5)"),
            Some(ColorValue::Literal(Rgba::rgba(255, 0, 0, 0.5)))
        );
        assert_eq!(
            parse("rgb(100%, 0%, 50%)"),
            Some(ColorValue::Literal(Rgba::rgb(255, 0, 128)))
        );
    }

    #[test]
    fn test_parse_functions_and_references() {
        assert_eq!(
            parse("shade(@bg, 0.8)"),
            Some(ColorValue::Shade(Box::new(ColorValue::Reference("bg".into())), 0.8))
        );
        assert_eq!(
            parse("mix(red, blue, 0.5)").map(|c| c.to_string()),
            Some("mix(#ff0000, #0000ff, 0.5)".to_string())
        );
        assert_eq!(
            parse("lighter(alpha(#000, 0.5))").map(|c| c.to_string()),
            Some("lighter(alpha(#000000, 0.5))".to_string())
        );
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let mut source = TokenizerSource::new("frobnicate(red)");
        assert_eq!(ColorValue::parse(&mut source), None);
        assert_eq!(source.diagnostics().len(), 1);

        let mut source = TokenizerSource::new("rgb(1, 2)");
        assert_eq!(ColorValue::parse(&mut source), None);
        assert_eq!(source.diagnostics().len(), 1);

        let mut source = TokenizerSource::new(";");
        assert_eq!(ColorValue::parse(&mut source), None);
        assert_eq!(source.peek_token(), &Token::Semicolon);
    }

    // ==================== RESOLUTION ====================

    #[test]
    fn test_resolve_functions() {
        let black = ColorValue::Literal(Rgba::rgb(0, 0, 0));
        let white = ColorValue::Literal(Rgba::rgb(255, 255, 255));

        let mixed = ColorValue::Mix(Box::new(black.clone()), Box::new(white.clone()), 0.5);
        assert_eq!(mixed.resolve(&no_lookup), Some(Rgba::rgb(128, 128, 128)));

        let faded = ColorValue::Alpha(Box::new(white.clone()), 0.25);
        assert_eq!(faded.resolve(&no_lookup), Some(Rgba::rgba(255, 255, 255, 0.25)));

        let gray = ColorValue::Literal(Rgba::rgb(128, 128, 128));
        let darker = ColorValue::Shade(Box::new(gray), 0.5);
        assert_eq!(darker.resolve(&no_lookup), Some(Rgba::rgb(64, 64, 64)));

        let still_white = ColorValue::Lighter(Box::new(white));
        assert_eq!(still_white.resolve(&no_lookup), Some(Rgba::rgb(255, 255, 255)));
    }

    #[test]
    fn test_resolve_references_and_cycles() {
        let lookup = |name: &str| match name {
            "base" => Some(ColorValue::Literal(Rgba::rgb(10, 20, 30))),
            "alias" => Some(ColorValue::Reference("base".into())),
            "loop" => Some(ColorValue::Reference("loop".into())),
            _ => None,
        };

        let alias = ColorValue::Reference("alias".into());
        assert_eq!(alias.resolve(&lookup), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(ColorValue::Reference("loop".into()).resolve(&lookup), None);
        assert_eq!(ColorValue::Reference("missing".into()).resolve(&lookup), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgba::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(Rgba::rgba(1, 2, 3, 0.5).to_string(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(ColorValue::Reference("fg".into()).to_string(), "@fg");
    }

    // ==================== NESTING ====================

    #[test]
    fn test_nesting_up_to_limit() {
        let color = parse(&nested_lighter(MAX_NESTING_DEPTH)).unwrap();
        assert!(matches!(color, ColorValue::Lighter(_)));
    }

    #[test]
    fn test_nesting_past_limit_is_rejected() {
        let input = nested_lighter(MAX_NESTING_DEPTH + 1);
        let mut source = TokenizerSource::new(&input);
        assert_eq!(ColorValue::parse(&mut source), None);

        let diagnostics = source.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(
            matches!(&diagnostics[0].error, CssError::InvalidSyntax(m) if m == "Color nested too deeply")
        );
        // The error points at the first function past the limit.
        assert_eq!(diagnostics[0].location.column, 1 + "lighter(".len() * MAX_NESTING_DEPTH);
    }
}
