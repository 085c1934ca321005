// Resolved style values and bounding boxes
// Inputs to the "actually visible" predicate

/// Resolved `display` value of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    Flex,
    None,
}

/// Resolved `visibility` value of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// Resolved style triple consulted by the visibility predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
    pub opacity: f32,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            visibility: Visibility::Visible,
            opacity: 1.0,
        }
    }
}

impl ComputedStyle {
    /// Style of an element hidden via `display: none`.
    pub fn display_none() -> Self {
        Self {
            display: Display::None,
            ..Self::default()
        }
    }

    /// True when the resolved values alone do not hide the element:
    /// display is not none, visibility is visible, opacity is non-zero.
    pub fn renders(&self) -> bool {
        self.display != Display::None
            && self.visibility == Visibility::Visible
            && self.opacity > 0.0
    }
}

/// Bounding box as reported by layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// A degenerate box never counts as visible: the all-zero rect of
    /// an unrendered element, or a box with no usable area in either
    /// dimension.
    pub fn is_degenerate(&self) -> bool {
        let all_zero =
            self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0;
        all_zero || (self.width <= 0.0 && self.height <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_renders() {
        assert!(ComputedStyle::default().renders());
    }

    #[test]
    fn test_display_none_does_not_render() {
        assert!(!ComputedStyle::display_none().renders());
    }

    #[test]
    fn test_hidden_and_transparent_do_not_render() {
        let hidden = ComputedStyle {
            visibility: Visibility::Hidden,
            ..ComputedStyle::default()
        };
        assert!(!hidden.renders());

        let transparent = ComputedStyle {
            opacity: 0.0,
            ..ComputedStyle::default()
        };
        assert!(!transparent.renders());
    }

    #[test]
    fn test_zero_rect_is_degenerate() {
        assert!(Rect::default().is_degenerate());
        assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_degenerate());
    }

    #[test]
    fn test_offset_rect_without_area_is_degenerate() {
        assert!(Rect::new(10.0, 10.0, 0.0, 0.0).is_degenerate());
    }

    #[test]
    fn test_one_dimension_suffices() {
        // A zero-width but positioned, non-zero-height box still counts.
        assert!(!Rect::new(5.0, 5.0, 0.0, 20.0).is_degenerate());
        assert!(!Rect::sized(120.0, 80.0).is_degenerate());
    }
}
