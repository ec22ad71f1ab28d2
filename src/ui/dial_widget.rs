//! Ratatui widget that renders a [`DialPicker`] into a terminal buffer.
//!
//! The engine works in continuous units.  Horizontally one unit is one
//! column; vertically one terminal row spans `leading / ROWS_PER_ITEM`
//! units, so items land on every other row with a blank row between them.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Widget},
};

use crate::core::dial::DialPicker;
use crate::core::geometry::{Padding, Viewport};
use crate::core::render::{
    DialCanvas, LinearGradient, RectF, Rgba, TextAlign, TextBounds, TextMeasure, TextStyle,
};

use super::theme::Theme;

/// Terminal rows per item.
pub const ROWS_PER_ITEM: u16 = 2;

/// Columns kept free on each side of the text.
const SIDE_PADDING: f32 = 1.0;

/// Engine units covered by one terminal row.
pub fn row_height(leading: f32) -> f32 {
    leading / ROWS_PER_ITEM as f32
}

/// Text metrics in terminal cells: width is the display width in columns,
/// and every glyph is one row tall and centered in it.
pub struct CellMeasure {
    pub row_height: f32,
}

impl TextMeasure for CellMeasure {
    fn text_bounds(&self, text: &str, _size: f32) -> TextBounds {
        TextBounds {
            width: Span::raw(text).width() as f32,
            height: self.row_height,
            center_y: -self.row_height / 2.0,
        }
    }
}

/// Padding the dial is measured and laid out with.
pub fn dial_padding() -> Padding {
    Padding {
        start: SIDE_PADDING,
        end: SIDE_PADDING,
        ..Padding::default()
    }
}

/// Viewport (in engine units) for a dial drawn into `area`.
pub fn viewport_for(area: Rect, row_height: f32) -> Viewport {
    Viewport {
        width: area.width as f32,
        height: area.height as f32 * row_height,
        padding: dial_padding(),
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// [`DialCanvas`] over a ratatui buffer region.
struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    row_height: f32,
}

impl BufferCanvas<'_> {
    /// Buffer row holding engine height `y`, if it is inside the area.
    fn row_at(&self, y: f32) -> Option<u16> {
        let row = (y / self.row_height).floor();
        if row < 0.0 || row >= self.area.height as f32 {
            return None;
        }
        Some(self.area.y + row as u16)
    }
}

impl DialCanvas for BufferCanvas<'_> {
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        // Baseline sits half a row below the glyph center.
        let Some(row) = self.row_at(y - self.row_height / 2.0) else {
            return;
        };
        let width = Span::raw(text).width() as f32;
        let left = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
        };
        let col = left.round().max(0.0) as u16;
        if col >= self.area.width {
            return;
        }
        self.buf.set_stringn(
            self.area.x + col,
            row,
            text,
            (self.area.width - col) as usize,
            Style::default().fg(to_color(style.color)),
        );
    }

    fn fill_gradient(&mut self, rect: RectF, gradient: &LinearGradient) {
        let left = rect.left.max(0.0).round() as u16;
        let right = (rect.right.round().max(0.0) as u16).min(self.area.width);
        for r in 0..self.area.height {
            let y = (r as f32 + 0.5) * self.row_height;
            if y < rect.top || y >= rect.bottom {
                continue;
            }
            let shade = gradient.color_at(y);
            let amount = shade.a as f32 / 255.0;
            for c in left..right {
                let Some(cell) = self.buf.cell_mut((self.area.x + c, self.area.y + r)) else {
                    continue;
                };
                if let Color::Rgb(red, green, blue) = cell.fg {
                    let blended = Rgba::new(red, green, blue, 255)
                        .lerp(Rgba { a: 255, ..shade }, amount);
                    cell.fg = to_color(blended);
                }
            }
        }
    }
}

/// The dial widget itself, created fresh each frame.  The picker must have
/// been laid out for the block's inner area.
pub struct DialWidget<'a> {
    dial: &'a DialPicker,
    block: Option<Block<'a>>,
}

impl<'a> DialWidget<'a> {
    pub fn new(dial: &'a DialPicker) -> Self {
        Self { dial, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for DialWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.is_empty() {
            return;
        }

        let row_height = row_height(self.dial.config().leading);
        let mut canvas = BufferCanvas {
            buf,
            area: inner,
            row_height,
        };
        self.dial.draw(&mut canvas);

        // Mark the selection line.
        let Some(row) = canvas.row_at(self.dial.geometry().center_y()) else {
            return;
        };
        let line = Rect::new(inner.x, row, inner.width, 1);
        canvas.buf.set_style(line, Style::default().add_modifier(Modifier::BOLD));
        canvas.buf.set_string(inner.x, row, "›", Theme::marker_style());
    }
}
