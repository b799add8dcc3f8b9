#![forbid(unsafe_code)]

//! Pixel-space geometry primitives.
//!
//! Rectangles and offsets are `f64` pixel values as reported by the
//! geometry feedback mechanism. All scroll math happens along a single
//! [`Axis`]; the cross axis only matters for multi-column stacking.

/// The primary scroll axis of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Vertical scrolling (the common case).
    #[default]
    Vertical,
    /// Horizontal scrolling.
    Horizontal,
}

/// A 2-D translation applied to a visual slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    /// Horizontal component in px.
    pub x: f64,
    /// Vertical component in px.
    pub y: f64,
}

impl Offset {
    /// Create an offset from axis/cross components for the given axis.
    #[must_use]
    pub fn from_axis(axis: Axis, main: f64, cross: f64) -> Self {
        match axis {
            Axis::Vertical => Self { x: cross, y: main },
            Axis::Horizontal => Self { x: main, y: cross },
        }
    }

    /// Component along the scroll axis.
    #[must_use]
    pub fn main(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    /// Component across the scroll axis.
    #[must_use]
    pub fn cross(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.x,
            Axis::Horizontal => self.y,
        }
    }

    /// This offset translated along the scroll axis by `delta`.
    #[must_use]
    pub fn translated(&self, axis: Axis, delta: f64) -> Self {
        Self::from_axis(axis, self.main(axis) + delta, self.cross(axis))
    }
}

/// A bounding rectangle in px, as reported by geometry feedback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in px.
    pub width: f64,
    /// Height in px.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Leading edge coordinate along the scroll axis.
    #[must_use]
    pub fn leading(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    /// Trailing edge coordinate along the scroll axis.
    #[must_use]
    pub fn trailing(&self, axis: Axis) -> f64 {
        self.leading(axis) + self.extent(axis)
    }

    /// Extent along the scroll axis.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    /// Extent across the scroll axis.
    #[must_use]
    pub fn cross_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.width,
            Axis::Horizontal => self.height,
        }
    }

    /// Whether the rectangle has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
