//! Math utilities and types
//!
//! Provides the 2D math types used by the collision world. Everything is
//! `f32`, matching the simulation's fixed precision.

pub use nalgebra::Vector2;

/// 2D vector type (velocities, deltas, ray directions)
pub type Vec2 = Vector2<f32>;

/// 2D point type (corners, centers, ray endpoints)
pub type Point2 = nalgebra::Point2<f32>;

/// Returns `true` if both components are finite (not NaN or infinite)
pub fn is_finite_vec(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Returns `true` if both coordinates are finite (not NaN or infinite)
pub fn is_finite_point(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Linear interpolation `from + (to - from) * alpha`.
///
/// `alpha` is not clamped, so values outside `[0, 1]` extrapolate.
pub fn lerp_point(from: &Point2, to: &Point2, alpha: f32) -> Point2 {
    from + (to - from) * alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_point_endpoints_and_midpoint() {
        let a = Point2::new(0.0, 10.0);
        let b = Point2::new(8.0, 2.0);

        assert_eq!(lerp_point(&a, &b, 0.0), a);
        assert_eq!(lerp_point(&a, &b, 1.0), b);
        assert_relative_eq!(lerp_point(&a, &b, 0.5), Point2::new(4.0, 6.0));
    }

    #[test]
    fn test_lerp_point_extrapolates() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);

        assert_relative_eq!(lerp_point(&a, &b, 1.5), Point2::new(15.0, 0.0));
        assert_relative_eq!(lerp_point(&a, &b, -0.5), Point2::new(-5.0, 0.0));
    }

    #[test]
    fn test_finite_checks() {
        assert!(is_finite_vec(&Vec2::new(1.0, -2.0)));
        assert!(!is_finite_vec(&Vec2::new(f32::NAN, 0.0)));
        assert!(!is_finite_point(&Point2::new(0.0, f32::INFINITY)));
    }
}
