//! Immutable 2D point / displacement.

use std::ops::{Add, Mul};

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Vector { x, y }
    }

    /// Component-wise sum. Never mutates `self`.
    #[inline]
    pub fn plus(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    /// Scale both components. Negative factors reverse direction.
    #[inline]
    pub fn times(self, factor: f64) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        self.plus(rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.times(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_adds_components() {
        let a = Vector::new(1.5, -2.0);
        let b = Vector::new(0.5, 4.0);
        let c = a.plus(b);
        assert_eq!(c, Vector::new(2.0, 2.0));
        // receiver untouched
        assert_eq!(a, Vector::new(1.5, -2.0));
    }

    #[test]
    fn times_scales_components() {
        let v = Vector::new(2.0, -3.0);
        assert_eq!(v.times(2.0), Vector::new(4.0, -6.0));
        assert_eq!(v.times(-1.0), Vector::new(-2.0, 3.0));
        assert_eq!(v.times(0.0), Vector::ZERO);
    }

    #[test]
    fn operators_match_methods() {
        let a = Vector::new(3.0, 1.0);
        let b = Vector::new(-1.0, 1.0);
        assert_eq!(a + b, a.plus(b));
        assert_eq!(a * 0.5, a.times(0.5));
    }

    #[test]
    fn finiteness() {
        assert!(Vector::new(1.0, 2.0).is_finite());
        assert!(!Vector::new(f64::NAN, 0.0).is_finite());
        assert!(!Vector::new(0.0, f64::INFINITY).is_finite());
    }
}
