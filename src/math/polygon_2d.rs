use std::cmp::Ordering;

use super::{Point2, Vector2};

/// Computes the signed area of a closed ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. Rings with
/// fewer than 3 points have no area and return 0.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Arithmetic mean of the given points, or `None` for an empty slice.
#[must_use]
pub fn centroid(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / points.len() as f64;
    Some(Point2::from(mean))
}

/// Returns the indices of `points` sorted by polar angle around their centroid.
///
/// Angles are `atan2(dy, dx)` ascending; equal angles are ordered by squared
/// distance from the centroid, nearest first. For a convex or star-shaped
/// point set this yields a simple ring.
#[must_use]
pub fn sort_by_polar_angle(points: &[Point2]) -> Vec<usize> {
    let Some(center) = centroid(points) else {
        return Vec::new();
    };
    let keys: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            let d = p - center;
            (d.y.atan2(d.x), d.norm_squared())
        })
        .collect();

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (angle_a, dist_a) = keys[a];
        let (angle_b, dist_b) = keys[b];
        angle_a
            .partial_cmp(&angle_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| dist_a.partial_cmp(&dist_b).unwrap_or(Ordering::Equal))
    });
    order
}
