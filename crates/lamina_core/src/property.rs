//! Render-invalidation property tags

use std::borrow::Cow;
use std::fmt;

/// A view property whose presentation value may be stale.
///
/// The built-in tags have dedicated reconciliation steps; `Custom` tags are
/// raised by animations (or consumers) and surface as validation events.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Position,
    Size,
    Transform,
    Opacity,
    Padding,
    Margin,
    Custom(Cow<'static, str>),
}

impl Property {
    /// A custom tag
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        let builtin = match &*name {
            "position" => Some(Property::Position),
            "size" => Some(Property::Size),
            "transform" => Some(Property::Transform),
            "opacity" => Some(Property::Opacity),
            "padding" => Some(Property::Padding),
            "margin" => Some(Property::Margin),
            _ => None,
        };
        builtin.unwrap_or(Property::Custom(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Property::Position => "position",
            Property::Size => "size",
            Property::Transform => "transform",
            Property::Opacity => "opacity",
            Property::Padding => "padding",
            Property::Margin => "margin",
            Property::Custom(name) => &**name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Property::Custom(_))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_names_resolve_to_builtins() {
        assert_eq!(Property::custom("opacity"), Property::Opacity);
        assert_eq!(Property::custom("filter"), Property::Custom("filter".into()));
        assert!(Property::custom("filter").is_custom());
        assert_eq!(Property::Margin.to_string(), "margin");
    }
}
