//! What the engine needs from a rendering backend.
//!
//! The engine never draws pixels itself.  It computes where things go and
//! hands them to a [`DialCanvas`]; text sizes come back through a
//! [`TextMeasure`].

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(s: &str) -> Option<Rgba> {
        let hex = s.trim().strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Horizontal alignment of drawn text relative to its x anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    pub size: f32,
    pub align: TextAlign,
}

/// Axis-aligned rectangle in engine units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Vertical linear gradient, clamped outside `[from_y, to_y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub from_y: f32,
    pub to_y: f32,
    pub from_color: Rgba,
    pub to_color: Rgba,
}

impl LinearGradient {
    /// Color at height `y`.
    pub fn color_at(&self, y: f32) -> Rgba {
        let span = self.to_y - self.from_y;
        if span == 0.0 {
            return self.to_color;
        }
        self.from_color.lerp(self.to_color, (y - self.from_y) / span)
    }
}

/// Pixel bounds of a piece of text relative to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub width: f32,
    pub height: f32,
    /// Vertical center of the glyph box relative to the baseline; negative
    /// when the text sits above it.
    pub center_y: f32,
}

/// Text measurement supplied by the backend.
pub trait TextMeasure {
    fn text_bounds(&self, text: &str, size: f32) -> TextBounds;
}

/// Drawing surface supplied by the backend.
pub trait DialCanvas {
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    fn fill_gradient(&mut self, rect: RectF, gradient: &LinearGradient);
}
