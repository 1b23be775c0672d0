//! Geometry value types
//!
//! Rectangles and edge insets owned by a view. Mutators report what changed
//! so the owning view can raise exactly the invalidations it needs.

use std::fmt;

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Which parts of a [`Rect`] a mutation touched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RectChanges {
    pub position: bool,
    pub size: bool,
}

impl RectChanges {
    pub const NONE: RectChanges = RectChanges {
        position: false,
        size: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.position && !self.size
    }
}

/// Position and size of a view, relative to its parent
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Bulk update from another rect
    pub fn set(&mut self, other: Rect) -> RectChanges {
        let position = self.set_position(other.origin.x, other.origin.y);
        let size = self.set_size(other.size.width, other.size.height);
        RectChanges {
            position: position.position,
            size: size.size,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> RectChanges {
        let origin = Point::new(x, y);
        if self.origin == origin {
            return RectChanges::NONE;
        }
        self.origin = origin;
        RectChanges {
            position: true,
            size: false,
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> RectChanges {
        let size = Size::new(width, height);
        if self.size == size {
            return RectChanges::NONE;
        }
        self.size = size;
        RectChanges {
            position: false,
            size: true,
        }
    }

    pub fn set_width(&mut self, width: f32) -> RectChanges {
        self.set_size(width, self.size.height)
    }

    pub fn set_height(&mut self, height: f32) -> RectChanges {
        self.set_size(self.size.width, height)
    }
}

/// Insets on the four edges of a box (used for margin and padding)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Left + right
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top + bottom
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Bulk update; returns true if any edge changed
    pub fn set(&mut self, other: EdgeInsets) -> bool {
        if *self == other {
            return false;
        }
        *self = other;
        true
    }

    /// Shorthand string in CSS edge order (top right bottom left)
    pub fn to_css_string(&self, unit: &str) -> String {
        format!(
            "{}{unit} {}{unit} {}{unit} {}{unit}",
            self.top, self.right, self.bottom, self.left
        )
    }
}

impl fmt::Display for EdgeInsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string("px"))
    }
}
