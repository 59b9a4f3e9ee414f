//! Ray, plane, circle and segment intersection tests.

use super::{Vector2D, EPSILON};

/// Side of a plane a point lies on, relative to the plane normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanType {
    Front,
    Back,
    OnPlane,
}

/// Distance along the ray to the plane, or `-1.0` when the ray is parallel.
pub fn distance_to_ray_plane_intersection(
    ray_origin: &Vector2D,
    ray_heading: &Vector2D,
    point_on_plane: &Vector2D,
    plane_normal: &Vector2D,
) -> f64 {
    let d = -plane_normal.dot(point_on_plane);
    let numer = plane_normal.dot(ray_origin) + d;
    let denom = plane_normal.dot(ray_heading);

    if denom.abs() < EPSILON {
        return -1.0;
    }

    -(numer / denom)
}

pub fn where_is_point(
    point: &Vector2D,
    point_on_plane: &Vector2D,
    plane_normal: &Vector2D,
) -> SpanType {
    let dir = point_on_plane - point;
    let d = dir.dot(plane_normal);

    if d < -EPSILON {
        SpanType::Front
    } else if d > EPSILON {
        SpanType::Back
    } else {
        SpanType::OnPlane
    }
}

/// Tangent points on the circle `(center, radius)` seen from `point`.
///
/// Returns `None` when the point lies inside or on the circle.
pub fn tangent_points(
    center: &Vector2D,
    radius: f64,
    point: &Vector2D,
) -> Option<(Vector2D, Vector2D)> {
    let pmc = point - center;
    let sq_len = pmc.norm_squared();
    let r_sq = radius * radius;
    if sq_len <= r_sq {
        return None;
    }

    let inv_sq_len = 1.0 / sq_len;
    let root = (sq_len - r_sq).abs().sqrt();

    let t1 = Vector2D::new(
        center.x + radius * (radius * pmc.x - pmc.y * root) * inv_sq_len,
        center.y + radius * (radius * pmc.y + pmc.x * root) * inv_sq_len,
    );
    let t2 = Vector2D::new(
        center.x + radius * (radius * pmc.x + pmc.y * root) * inv_sq_len,
        center.y + radius * (radius * pmc.y - pmc.x * root) * inv_sq_len,
    );

    Some((t1, t2))
}

/// True when segments `ab` and `cd` cross strictly inside both.
/// Parallel segments never intersect.
pub fn line_intersection_2d(a: &Vector2D, b: &Vector2D, c: &Vector2D, d: &Vector2D) -> bool {
    let r_top = (a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y);
    let s_top = (a.y - c.y) * (b.x - a.x) - (a.x - c.x) * (b.y - a.y);
    let bot = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);

    if bot == 0.0 {
        return false;
    }

    let r = r_top / bot;
    let s = s_top / bot;

    r > 0.0 && r < 1.0 && s > 0.0 && s < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{vec2, Vector2DExt};

    #[test]
    fn test_ray_hits_plane() {
        // plane x = 10 facing -x, ray from origin along +x
        let d = distance_to_ray_plane_intersection(
            &vec2(0.0, 0.0),
            &vec2(1.0, 0.0),
            &vec2(10.0, 0.0),
            &vec2(-1.0, 0.0),
        );
        assert!((d - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_ray_returns_negative() {
        let d = distance_to_ray_plane_intersection(
            &vec2(0.0, 0.0),
            &vec2(0.0, 1.0),
            &vec2(10.0, 0.0),
            &vec2(-1.0, 0.0),
        );
        assert_eq!(d, -1.0);
    }

    #[test]
    fn test_where_is_point() {
        let on_plane = vec2(0.0, 20.0);
        let normal = vec2(0.0, 1.0);
        assert_eq!(where_is_point(&vec2(5.0, 30.0), &on_plane, &normal), SpanType::Front);
        assert_eq!(where_is_point(&vec2(5.0, 10.0), &on_plane, &normal), SpanType::Back);
        assert_eq!(where_is_point(&vec2(5.0, 20.0), &on_plane, &normal), SpanType::OnPlane);
    }

    #[test]
    fn test_tangents_lie_on_circle_and_are_perpendicular() {
        let c = vec2(100.0, 100.0);
        let p = vec2(0.0, 100.0);
        let (t1, t2) = tangent_points(&c, 30.0, &p).expect("outside circle");
        for t in [t1, t2] {
            assert!((t.distance(&c) - 30.0).abs() < 1e-9);
            assert!((t - c).dot(&(t - p)).abs() < 1e-6);
        }
        assert!(t1 != t2);
    }

    #[test]
    fn test_no_tangent_from_inside() {
        assert!(tangent_points(&vec2(0.0, 0.0), 10.0, &vec2(3.0, 4.0)).is_none());
    }

    #[test]
    fn test_segment_crossing() {
        let a = vec2(0.0, 0.0);
        let b = vec2(10.0, 10.0);
        assert!(line_intersection_2d(&a, &b, &vec2(0.0, 10.0), &vec2(10.0, 0.0)));
        // touching at an endpoint is not a strict crossing
        assert!(!line_intersection_2d(&a, &b, &vec2(10.0, 10.0), &vec2(20.0, 0.0)));
        // parallel
        assert!(!line_intersection_2d(&a, &b, &vec2(1.0, 0.0), &vec2(11.0, 10.0)));
    }
}
