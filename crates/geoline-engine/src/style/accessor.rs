use std::fmt;

use crate::coords::Position;

use super::StrokeColor;

/// Error returned by a fallible accessor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct AccessorError {
    pub message: String,
}

impl AccessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Names the per-point value an accessor produces. Used in error reports.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StyleKey {
    Position,
    StrokeWidth,
    StrokeColor,
    StrokeOpacity,
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleKey::Position => "position",
            StyleKey::StrokeWidth => "stroke_width",
            StyleKey::StrokeColor => "stroke_color",
            StyleKey::StrokeOpacity => "stroke_opacity",
        };
        f.write_str(name)
    }
}

type AccessorFn<P, T> = dyn Fn(&P, usize, &[P], usize) -> Result<T, AccessorError>;

/// A pure function of `(point, point_index, polyline, polyline_index)`.
///
/// Accessors are evaluated exactly once per point per rebuild.
pub struct Accessor<P, T> {
    f: Box<AccessorFn<P, T>>,
}

impl<P: 'static, T: 'static> Accessor<P, T> {
    /// Wraps an infallible function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&P, usize, &[P], usize) -> T + 'static,
    {
        Self { f: Box::new(move |p, i, line, li| Ok(f(p, i, line, li))) }
    }

    /// Wraps a function that may fail; failures abort the whole rebuild.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&P, usize, &[P], usize) -> Result<T, AccessorError> + 'static,
    {
        Self { f: Box::new(f) }
    }

    /// Same value for every point.
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Self { f: Box::new(move |_, _, _, _| Ok(value.clone())) }
    }
}

impl<P, T> Accessor<P, T> {
    #[inline]
    pub fn eval(
        &self,
        point: &P,
        index: usize,
        polyline: &[P],
        polyline_index: usize,
    ) -> Result<T, AccessorError> {
        (self.f)(point, index, polyline, polyline_index)
    }
}

impl<P> Accessor<P, Position>
where
    P: Copy + Into<Position> + 'static,
{
    /// Uses the point itself as its position.
    pub fn identity() -> Self {
        Self::new(|p: &P, _, _, _| (*p).into())
    }
}

impl<P, T> fmt::Debug for Accessor<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// The accessor set the geometry builder evaluates for every point.
///
/// Defaults: width `1.0`, white, fully opaque.
#[derive(Debug)]
pub struct LineAccessors<P> {
    pub position: Accessor<P, Position>,
    pub stroke_width: Accessor<P, f32>,
    pub stroke_color: Accessor<P, StrokeColor>,
    pub stroke_opacity: Accessor<P, f32>,
}

impl<P: 'static> LineAccessors<P> {
    pub fn new(position: Accessor<P, Position>) -> Self {
        Self {
            position,
            stroke_width: Accessor::constant(1.0),
            stroke_color: Accessor::constant(StrokeColor::white()),
            stroke_opacity: Accessor::constant(1.0),
        }
    }
}
