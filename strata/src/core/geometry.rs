//! Contains the 2D point type and a few numeric helpers that keep the
//! coordinate computations well defined.

/// The smallest distance that we divide by.
pub const EPSILON: f64 = 0.001;

/// A location in the drawing, or the width and height of a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn zero() -> Point {
        Self { x: 0., y: 0. }
    }

    pub fn new(x: f64, y: f64) -> Point {
        Self { x, y }
    }

    pub fn splat(s: f64) -> Point {
        Point::new(s, s)
    }

    /// \returns the point with the axes swapped. Horizontal layouts use it
    /// to view a size along the layer axis.
    pub fn transpose(&self) -> Point {
        Point::new(self.y, self.x)
    }

    /// \returns True if the point lies on an axis-aligned line with \p other.
    pub fn is_axis_aligned_with(&self, other: Point) -> bool {
        (self.x - other.x).abs() < EPSILON || (self.y - other.y).abs() < EPSILON
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(x: {:.3}, y: {:.3})", self.x, self.y)
    }
}

/// \returns \p val, or zero if the value is negative or not a number.
/// Sizes and distances that come from the user go through this filter.
pub fn clamp_non_negative(val: f64) -> f64 {
    if val.is_nan() || val < 0. {
        return 0.;
    }
    val
}

/// \returns \p val clamped to at least EPSILON, so it is safe to divide by.
pub fn clamp_positive(val: f64) -> f64 {
    if val.is_nan() || val < EPSILON {
        return EPSILON;
    }
    val
}

/// \returns the arithmetic mean of the values, or zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    let n = clamp_positive(values.len() as f64);
    values.iter().sum::<f64>() / n
}

#[test]
fn test_clamp() {
    assert_eq!(clamp_non_negative(-3.), 0.);
    assert_eq!(clamp_non_negative(f64::NAN), 0.);
    assert_eq!(clamp_non_negative(2.5), 2.5);
    assert_eq!(clamp_positive(0.), EPSILON);
    assert_eq!(clamp_positive(4.), 4.);
}

#[test]
fn test_mean() {
    assert_eq!(mean(&[]), 0.);
    assert_eq!(mean(&[1., 2., 3., 6.]), 3.);
}

#[test]
fn test_axis_aligned() {
    let p = Point::new(1., 5.);
    assert!(p.is_axis_aligned_with(Point::new(1., 9.)));
    assert!(p.is_axis_aligned_with(Point::new(-4., 5.)));
    assert!(!p.is_axis_aligned_with(Point::new(2., 6.)));
    assert_eq!(p.transpose(), Point::new(5., 1.));
}
