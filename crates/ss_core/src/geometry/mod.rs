//! 2D geometry kernel
//!
//! Vectors are plain `nalgebra::Vector2<f64>`. The helpers the simulation
//! needs on top of nalgebra (perpendicular, clockwise sign, truncation,
//! reflection, zero-safe normalisation) live on [`Vector2DExt`].

pub mod intersect;
pub mod transform;
pub mod wall;

pub use intersect::{
    distance_to_ray_plane_intersection, line_intersection_2d, tangent_points, where_is_point,
    SpanType,
};
pub use transform::{
    point_to_local_space, point_to_world_space, vec_rotate_around_origin, vector_to_world_space,
    Transform2D,
};
pub use wall::Wall2D;

/// World-space 2D vector.
pub type Vector2D = nalgebra::Vector2<f64>;

/// Shorthand constructor.
#[inline]
pub fn vec2(x: f64, y: f64) -> Vector2D {
    Vector2D::new(x, y)
}

/// Tolerance used by plane classification and zero checks.
pub const EPSILON: f64 = 1e-6;

/// Extra vector operations used throughout the engine.
pub trait Vector2DExt {
    /// Vector rotated 90 degrees anticlockwise: `(-y, x)`.
    fn perpendicular(&self) -> Vector2D;

    /// Unit vector, or zero when the length is (near) zero.
    fn normalized_or_zero(&self) -> Vector2D;

    /// Copy whose length is capped at `max`.
    fn truncated(&self, max: f64) -> Vector2D;

    /// `-1` if `other` is anticlockwise of `self`, `1` otherwise
    /// (y axis pointing down, as on the pitch).
    fn sign(&self, other: &Vector2D) -> f64;

    /// Reflection about a unit normal.
    fn reflected(&self, normal: &Vector2D) -> Vector2D;

    fn is_zero_length(&self) -> bool;

    fn distance_sq(&self, other: &Vector2D) -> f64;

    fn distance(&self, other: &Vector2D) -> f64;
}

impl Vector2DExt for Vector2D {
    #[inline]
    fn perpendicular(&self) -> Vector2D {
        Vector2D::new(-self.y, self.x)
    }

    #[inline]
    fn normalized_or_zero(&self) -> Vector2D {
        self.try_normalize(f64::EPSILON).unwrap_or_else(Vector2D::zeros)
    }

    #[inline]
    fn truncated(&self, max: f64) -> Vector2D {
        if self.norm() > max {
            self.normalized_or_zero() * max
        } else {
            *self
        }
    }

    #[inline]
    fn sign(&self, other: &Vector2D) -> f64 {
        if self.y * other.x > self.x * other.y {
            -1.0
        } else {
            1.0
        }
    }

    #[inline]
    fn reflected(&self, normal: &Vector2D) -> Vector2D {
        *self - *normal * (2.0 * self.dot(normal))
    }

    #[inline]
    fn is_zero_length(&self) -> bool {
        self.norm_squared() < EPSILON * EPSILON
    }

    #[inline]
    fn distance_sq(&self, other: &Vector2D) -> f64 {
        (other - self).norm_squared()
    }

    #[inline]
    fn distance(&self, other: &Vector2D) -> f64 {
        (other - self).norm()
    }
}
