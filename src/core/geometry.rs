//! Layout and geometry of the dial.
//!
//! Everything here is a pure function of the configured leading, the
//! measured text and the viewport the host gives us.  The engine asks it
//! where the dial's edges are, where each row's baseline falls and how many
//! rows the window must be rotated after the offset moved.

use super::render::{LinearGradient, RectF, Rgba, TextBounds, TextMeasure};
use super::roller::SLOTS;

/// Extra width added to the intrinsic size so glyph overhang is not clipped.
const WIDTH_SLACK: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub start: f32,
    pub end: f32,
}

/// The area the host gives the dial.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub padding: Padding,
}

/// Size constraint handed down by the host for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureSpec {
    Exactly(f32),
    AtMost(f32),
    Unspecified,
}

impl MeasureSpec {
    fn resolve(self, content: f32) -> f32 {
        match self {
            MeasureSpec::Exactly(size) => size,
            MeasureSpec::AtMost(bound) => content.min(bound),
            MeasureSpec::Unspecified => content,
        }
    }
}

/// How far the window has to rotate after an offset change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Inside,
    /// The top row left the dial; recycle this many rows to the bottom.
    CrossedTop(usize),
    /// The bottom row left the dial; recycle this many rows to the top.
    CrossedBottom(usize),
}

/// Find the item with the widest rendered text.
pub fn widest_item<'a>(
    items: &'a [String],
    measure: &dyn TextMeasure,
    size: f32,
) -> Option<(&'a str, TextBounds)> {
    let mut best: Option<(&'a str, TextBounds)> = None;
    for item in items {
        let bounds = measure.text_bounds(item, size);
        if best.map_or(true, |(_, b)| bounds.width > b.width) {
            best = Some((item.as_str(), bounds));
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialGeometry {
    leading: f32,
    gradient_view_window: f32,
    description_start_padding: f32,
    viewport: Viewport,
    /// Bounds of the widest item.
    item_bounds: TextBounds,
    description_bounds: TextBounds,
}

impl DialGeometry {
    pub fn new(leading: f32, gradient_view_window: f32, description_start_padding: f32) -> Self {
        Self {
            leading,
            gradient_view_window,
            description_start_padding,
            viewport: Viewport::default(),
            item_bounds: TextBounds::default(),
            description_bounds: TextBounds::default(),
        }
    }

    pub fn set_text_metrics(&mut self, item_bounds: TextBounds, description_bounds: TextBounds) {
        self.item_bounds = item_bounds;
        self.description_bounds = description_bounds;
    }

    /// Intrinsic size under the host's constraints.
    pub fn measure(&self, width: MeasureSpec, height: MeasureSpec, padding: Padding) -> (f32, f32) {
        let content_width = padding.start
            + self.item_bounds.width
            + self.description_start_padding
            + self.description_bounds.width
            + padding.end
            + WIDTH_SLACK;
        let content_height = self.dial_height() + padding.top + padding.bottom;
        (width.resolve(content_width), height.resolve(content_height))
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// `false` for a zero-size viewport; drawing is skipped.
    pub fn is_drawable(&self) -> bool {
        self.viewport.width > 0.0 && self.viewport.height > 0.0
    }

    pub fn dial_height(&self) -> f32 {
        SLOTS as f32 * self.leading
    }

    pub fn center_y(&self) -> f32 {
        self.viewport.height / 2.0 + self.viewport.padding.top
    }

    pub fn top(&self) -> f32 {
        self.center_y() - self.dial_height() / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center_y() + self.dial_height() / 2.0
    }

    /// Offset at which a freshly synced window has its middle row centered.
    pub fn rest_offset(&self) -> f32 {
        self.top() - self.leading / 2.0
    }

    /// Horizontal anchor of the (center-aligned) item text.
    pub fn text_x(&self) -> f32 {
        self.viewport.padding.start + self.item_bounds.width / 2.0
    }

    /// Left edge of the description label.
    pub fn description_x(&self) -> f32 {
        self.viewport.padding.start + self.item_bounds.width + self.description_start_padding
    }

    pub fn description_baseline(&self) -> f32 {
        self.center_y() - self.description_bounds.center_y
    }

    /// Baseline of a row at `position` while the strip is at `offset`.
    pub fn baseline(&self, offset: f32, position: f32) -> f32 {
        offset - self.item_bounds.center_y + position
    }

    /// Height of each fade gradient, measured from the center.
    pub fn gradient_window(&self) -> f32 {
        self.dial_height() / 2.0 * self.gradient_view_window
    }

    /// Fade over the upper half: edge color at the top, middle color at the
    /// center.
    pub fn upper_gradient(&self, edge: Rgba, middle: Rgba) -> (RectF, LinearGradient) {
        let center = self.center_y();
        (
            RectF {
                left: 0.0,
                top: 0.0,
                right: self.viewport.width,
                bottom: center,
            },
            LinearGradient {
                from_y: center - self.gradient_window(),
                to_y: center,
                from_color: edge,
                to_color: middle,
            },
        )
    }

    pub fn lower_gradient(&self, edge: Rgba, middle: Rgba) -> (RectF, LinearGradient) {
        let center = self.center_y();
        (
            RectF {
                left: 0.0,
                top: center,
                right: self.viewport.width,
                bottom: self.viewport.height,
            },
            LinearGradient {
                from_y: center + self.gradient_window(),
                to_y: center,
                from_color: edge,
                to_color: middle,
            },
        )
    }

    /// Check the top row, then the bottom row, against the dial edges.
    pub fn boundary(&self, offset: f32, first_position: f32, last_position: f32) -> Boundary {
        let moving_top = offset + first_position;
        if moving_top <= self.top() {
            let rows = ((self.top() - moving_top) / self.leading).floor() as usize + 1;
            return Boundary::CrossedTop(rows);
        }
        let moving_bottom = offset + last_position;
        if moving_bottom > self.bottom() {
            let rows = ((moving_bottom - self.bottom()) / self.leading).floor() as usize + 1;
            return Boundary::CrossedBottom(rows);
        }
        Boundary::Inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWidth;

    impl TextMeasure for FixedWidth {
        fn text_bounds(&self, text: &str, size: f32) -> TextBounds {
            TextBounds {
                width: text.chars().count() as f32 * size / 2.0,
                height: size,
                center_y: -size / 2.0,
            }
        }
    }

    fn geometry() -> DialGeometry {
        let mut g = DialGeometry::new(70.0, 0.9, 10.0);
        g.set_viewport(Viewport {
            width: 200.0,
            height: 350.0,
            padding: Padding::default(),
        });
        g
    }

    #[test]
    fn test_edges_and_rest_offset() {
        let g = geometry();
        assert_eq!(g.dial_height(), 350.0);
        assert_eq!(g.center_y(), 175.0);
        assert_eq!(g.top(), 0.0);
        assert_eq!(g.bottom(), 350.0);
        assert_eq!(g.rest_offset(), -35.0);
        // Middle row (position 3 * leading) sits on the center at rest.
        assert_eq!(g.rest_offset() + 210.0, g.center_y());
    }

    #[test]
    fn test_boundary_at_rest_is_inside() {
        let g = geometry();
        assert_eq!(g.boundary(-35.0, 70.0, 350.0), Boundary::Inside);
    }

    #[test]
    fn test_boundary_counts_rows_crossed() {
        let g = geometry();
        // Half a row up: the top row just touched the edge.
        assert_eq!(g.boundary(-70.0, 70.0, 350.0), Boundary::CrossedTop(1));
        assert_eq!(g.boundary(-105.0, 70.0, 350.0), Boundary::CrossedTop(1));
        assert_eq!(g.boundary(-245.0, 70.0, 350.0), Boundary::CrossedTop(3));
        // Exactly half a row down stays put; any further crosses.
        assert_eq!(g.boundary(0.0, 70.0, 350.0), Boundary::Inside);
        assert_eq!(g.boundary(1.0, 70.0, 350.0), Boundary::CrossedBottom(1));
        assert_eq!(g.boundary(141.0, 70.0, 350.0), Boundary::CrossedBottom(3));
    }

    #[test]
    fn test_gradients_meet_at_center() {
        let g = geometry();
        let (upper_rect, upper) = g.upper_gradient(Rgba::WHITE, Rgba::TRANSPARENT);
        let (lower_rect, lower) = g.lower_gradient(Rgba::WHITE, Rgba::TRANSPARENT);
        assert_eq!(upper_rect.bottom, lower_rect.top);
        assert_eq!(upper.to_y, 175.0);
        assert_eq!(upper.from_y, 175.0 - 157.5);
        assert_eq!(lower.from_y, 175.0 + 157.5);
        assert_eq!(lower_rect.bottom, 350.0);
    }

    #[test]
    fn test_measure_follows_constraints() {
        let mut g = geometry();
        let items: Vec<String> = ["1", "22", "333", "4", "55"].iter().map(|s| s.to_string()).collect();
        let (widest, bounds) = widest_item(&items, &FixedWidth, 30.0).unwrap();
        assert_eq!(widest, "333");
        g.set_text_metrics(bounds, FixedWidth.text_bounds("Min", 20.0));

        let padding = Padding {
            top: 4.0,
            bottom: 6.0,
            start: 2.0,
            end: 3.0,
        };
        let (w, h) = g.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified, padding);
        assert_eq!(w, 2.0 + 45.0 + 10.0 + 30.0 + 3.0 + 5.0);
        assert_eq!(h, 360.0);

        let (w, h) = g.measure(MeasureSpec::Exactly(500.0), MeasureSpec::AtMost(100.0), padding);
        assert_eq!((w, h), (500.0, 100.0));
    }

    #[test]
    fn test_zero_viewport_is_not_drawable() {
        let mut g = geometry();
        g.set_viewport(Viewport::default());
        assert!(!g.is_drawable());
    }
}
