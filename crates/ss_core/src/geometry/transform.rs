//! 2D affine transform and local/world space conversions.

use nalgebra::Matrix3;

use super::Vector2D;

/// Homogeneous 3x3 transform. Points are column vectors, so each call
/// composes the new operation after the ones already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    matrix: Matrix3<f64>,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    fn then(mut self, op: Matrix3<f64>) -> Self {
        self.matrix = op * self.matrix;
        self
    }

    pub fn translate(self, x: f64, y: f64) -> Self {
        #[rustfmt::skip]
        let op = Matrix3::new(
            1.0, 0.0, x,
            0.0, 1.0, y,
            0.0, 0.0, 1.0,
        );
        self.then(op)
    }

    pub fn scale(self, sx: f64, sy: f64) -> Self {
        #[rustfmt::skip]
        let op = Matrix3::new(
            sx,  0.0, 0.0,
            0.0, sy,  0.0,
            0.0, 0.0, 1.0,
        );
        self.then(op)
    }

    /// Rotation by `angle` radians (anticlockwise in a y-up frame).
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        #[rustfmt::skip]
        let op = Matrix3::new(
            cos, -sin, 0.0,
            sin,  cos, 0.0,
            0.0,  0.0, 1.0,
        );
        self.then(op)
    }

    /// Rotation that maps the x axis onto `fwd` and the y axis onto `side`.
    pub fn rotate_to(self, fwd: &Vector2D, side: &Vector2D) -> Self {
        #[rustfmt::skip]
        let op = Matrix3::new(
            fwd.x, side.x, 0.0,
            fwd.y, side.y, 0.0,
            0.0,   0.0,    1.0,
        );
        self.then(op)
    }

    pub fn transform_point(&self, p: &Vector2D) -> Vector2D {
        let h = self.matrix * nalgebra::Vector3::new(p.x, p.y, 1.0);
        Vector2D::new(h.x, h.y)
    }

    /// Applies rotation/scale only, ignoring translation.
    pub fn transform_vector(&self, v: &Vector2D) -> Vector2D {
        let h = self.matrix * nalgebra::Vector3::new(v.x, v.y, 0.0);
        Vector2D::new(h.x, h.y)
    }
}

/// Converts a point in an agent's local frame to world space.
pub fn point_to_world_space(
    point: &Vector2D,
    heading: &Vector2D,
    side: &Vector2D,
    position: &Vector2D,
) -> Vector2D {
    Transform2D::identity()
        .rotate_to(heading, side)
        .translate(position.x, position.y)
        .transform_point(point)
}

/// Converts a direction in an agent's local frame to world space.
pub fn vector_to_world_space(vec: &Vector2D, heading: &Vector2D, side: &Vector2D) -> Vector2D {
    Transform2D::identity()
        .rotate_to(heading, side)
        .transform_vector(vec)
}

/// Projects a world point into the frame with origin `position`, x along
/// `heading` and y along `side`.
pub fn point_to_local_space(
    point: &Vector2D,
    heading: &Vector2D,
    side: &Vector2D,
    position: &Vector2D,
) -> Vector2D {
    let tx = -position.dot(heading);
    let ty = -position.dot(side);
    #[rustfmt::skip]
    let matrix = Matrix3::new(
        heading.x, heading.y, tx,
        side.x,    side.y,    ty,
        0.0,       0.0,       1.0,
    );
    Transform2D { matrix }.transform_point(point)
}

pub fn vec_rotate_around_origin(v: &Vector2D, angle: f64) -> Vector2D {
    Transform2D::identity().rotate(angle).transform_vector(v)
}
