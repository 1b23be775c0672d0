//! Transform value type
//!
//! A transform is an ordered list of CSS-style transform functions. Keeping
//! the functions (instead of collapsing them into a matrix) lets animations
//! interpolate each component and lets the presentation write stay a plain
//! transform string.

use std::fmt;
use std::mem;

use smallvec::SmallVec;

/// One function in a transform list
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformFunction {
    /// 2D translation in pixels
    Translate { x: f32, y: f32 },
    /// 3D translation in pixels
    Translate3d { x: f32, y: f32, z: f32 },
    /// Scale factors
    Scale { x: f32, y: f32 },
    /// Rotation around the Z axis in degrees
    Rotate(f32),
    /// Rotation around the X axis in degrees
    RotateX(f32),
    /// Rotation around the Y axis in degrees
    RotateY(f32),
    /// Perspective distance in pixels
    Perspective(f32),
}

impl TransformFunction {
    /// True when this function only has meaning in 3D space
    pub fn is_3d(&self) -> bool {
        matches!(
            self,
            TransformFunction::Translate3d { .. }
                | TransformFunction::RotateX(_)
                | TransformFunction::RotateY(_)
                | TransformFunction::Perspective(_)
        )
    }

    /// True when both functions are the same kind of operation
    pub fn same_kind(&self, other: &TransformFunction) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// The no-op function of the same kind
    pub fn identity(&self) -> TransformFunction {
        match self {
            TransformFunction::Translate { .. } => TransformFunction::Translate { x: 0.0, y: 0.0 },
            TransformFunction::Translate3d { .. } => TransformFunction::Translate3d {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            TransformFunction::Scale { .. } => TransformFunction::Scale { x: 1.0, y: 1.0 },
            TransformFunction::Rotate(_) => TransformFunction::Rotate(0.0),
            TransformFunction::RotateX(_) => TransformFunction::RotateX(0.0),
            TransformFunction::RotateY(_) => TransformFunction::RotateY(0.0),
            // Perspective has no true identity; an infinite distance is closest.
            TransformFunction::Perspective(_) => TransformFunction::Perspective(f32::INFINITY),
        }
    }

    /// Interpolate towards `to`; `None` when the kinds differ
    pub fn lerp(&self, to: &TransformFunction, t: f32) -> Option<TransformFunction> {
        use TransformFunction::*;

        let mix = |a: f32, b: f32| a + (b - a) * t;
        let f = match (*self, *to) {
            (Translate { x: ax, y: ay }, Translate { x: bx, y: by }) => Translate {
                x: mix(ax, bx),
                y: mix(ay, by),
            },
            (
                Translate3d {
                    x: ax,
                    y: ay,
                    z: az,
                },
                Translate3d {
                    x: bx,
                    y: by,
                    z: bz,
                },
            ) => Translate3d {
                x: mix(ax, bx),
                y: mix(ay, by),
                z: mix(az, bz),
            },
            (Scale { x: ax, y: ay }, Scale { x: bx, y: by }) => Scale {
                x: mix(ax, bx),
                y: mix(ay, by),
            },
            (Rotate(a), Rotate(b)) => Rotate(mix(a, b)),
            (RotateX(a), RotateX(b)) => RotateX(mix(a, b)),
            (RotateY(a), RotateY(b)) => RotateY(mix(a, b)),
            (Perspective(a), Perspective(b)) => {
                if a.is_finite() && b.is_finite() {
                    Perspective(mix(a, b))
                } else if t < 1.0 {
                    Perspective(a)
                } else {
                    Perspective(b)
                }
            }
            _ => return None,
        };
        Some(f)
    }
}

impl fmt::Display for TransformFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformFunction::Translate { x, y } => write!(f, "translate({x}px, {y}px)"),
            TransformFunction::Translate3d { x, y, z } => {
                write!(f, "translate3d({x}px, {y}px, {z}px)")
            }
            TransformFunction::Scale { x, y } => write!(f, "scale({x}, {y})"),
            TransformFunction::Rotate(deg) => write!(f, "rotate({deg}deg)"),
            TransformFunction::RotateX(deg) => write!(f, "rotateX({deg}deg)"),
            TransformFunction::RotateY(deg) => write!(f, "rotateY({deg}deg)"),
            TransformFunction::Perspective(d) if d.is_finite() => write!(f, "perspective({d}px)"),
            TransformFunction::Perspective(_) => f.write_str("perspective(none)"),
        }
    }
}

/// Ordered list of transform functions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    functions: SmallVec<[TransformFunction; 4]>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn functions(&self) -> &[TransformFunction] {
        &self.functions
    }

    /// Append a function
    pub fn push(&mut self, function: TransformFunction) -> &mut Self {
        self.functions.push(function);
        self
    }

    /// Builder: append a 2D translation
    pub fn translate(mut self, x: f32, y: f32) -> Self {
        self.functions.push(TransformFunction::Translate { x, y });
        self
    }

    /// Builder: append a 3D translation
    pub fn translate_3d(mut self, x: f32, y: f32, z: f32) -> Self {
        self.functions
            .push(TransformFunction::Translate3d { x, y, z });
        self
    }

    /// Builder: append a scale
    pub fn scale(mut self, x: f32, y: f32) -> Self {
        self.functions.push(TransformFunction::Scale { x, y });
        self
    }

    /// Builder: append a Z rotation in degrees
    pub fn rotate(mut self, degrees: f32) -> Self {
        self.functions.push(TransformFunction::Rotate(degrees));
        self
    }

    /// Builder: append a perspective distance
    pub fn perspective(mut self, distance: f32) -> Self {
        self.functions.push(TransformFunction::Perspective(distance));
        self
    }

    /// The first 2D translation, or `(0, 0)`
    pub fn translation(&self) -> (f32, f32) {
        self.functions
            .iter()
            .find_map(|f| match f {
                TransformFunction::Translate { x, y } => Some((*x, *y)),
                _ => None,
            })
            .unwrap_or((0.0, 0.0))
    }

    /// Update the first 2D translation in place, appending one if absent
    pub fn set_translation(&mut self, x: f32, y: f32) {
        for f in self.functions.iter_mut() {
            if let TransformFunction::Translate { .. } = f {
                *f = TransformFunction::Translate { x, y };
                return;
            }
        }
        self.functions.push(TransformFunction::Translate { x, y });
    }

    /// Bulk update; returns true if the transform changed
    pub fn set(&mut self, other: &Transform) -> bool {
        if self == other {
            return false;
        }
        self.functions.clone_from(&other.functions);
        true
    }

    pub fn clear(&mut self) {
        self.functions.clear();
    }

    /// True when any function needs 3D compositing
    pub fn has_3d_transforms(&self) -> bool {
        self.functions.iter().any(TransformFunction::is_3d)
    }

    /// Interpolate between two transform lists.
    ///
    /// Lists are matched function by function; a missing entry on either side
    /// is treated as the identity of its counterpart. If any pair has
    /// mismatched kinds the result snaps to `to` once `t` reaches 1.
    pub fn lerp(from: &Transform, to: &Transform, t: f32) -> Transform {
        let len = from.functions.len().max(to.functions.len());
        let mut out = Transform::new();
        for i in 0..len {
            let (a, b) = match (from.functions.get(i), to.functions.get(i)) {
                (Some(a), Some(b)) => (*a, *b),
                (Some(a), None) => (*a, a.identity()),
                (None, Some(b)) => (b.identity(), *b),
                (None, None) => continue,
            };
            match a.lerp(&b, t) {
                Some(f) => {
                    out.functions.push(f);
                }
                None => return if t < 1.0 { from.clone() } else { to.clone() },
            }
        }
        out
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{function}")?;
        }
        Ok(())
    }
}
