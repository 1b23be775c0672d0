//! Layout parameter descriptors

/// Intended size of a view along one axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dimension {
    /// The view keeps whatever size it was given explicitly
    #[default]
    Unset,
    /// Take the parent's resolved size along this axis
    MatchParent,
}

/// How a view wants to be sized by the layout pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutParams {
    pub width: Dimension,
    pub height: Dimension,
}

impl LayoutParams {
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    /// Match the parent on both axes
    pub fn match_parent() -> Self {
        Self::new(Dimension::MatchParent, Dimension::MatchParent)
    }

    pub fn match_parent_width() -> Self {
        Self::new(Dimension::MatchParent, Dimension::Unset)
    }

    pub fn match_parent_height() -> Self {
        Self::new(Dimension::Unset, Dimension::MatchParent)
    }
}
