//! Coverage rasterization for chalk marks.
//!
//! A dot is a disc and a stroke segment is a capsule (a segment with round
//! caps). Both are rasterized by sampling the signed distance at each pixel
//! center `(px + 0.5, py + 0.5)` and turning it into a coverage value with a
//! one-pixel ramp across the edge, which approximates the anti-aliasing a
//! browser canvas applies.

use crate::geometry::Point;

/// Coverage of a pixel whose center is `distance` away from a shape of the
/// given `radius`, in `0.0..=1.0`.
pub fn edge_coverage(radius: f64, distance: f64) -> f32 {
    (radius - distance + 0.5).clamp(0.0, 1.0) as f32
}

/// Shortest distance from `p` to the segment `a`-`b`.
///
/// A degenerate segment (`a == b`) measures the distance to `a`.
///
/// ```
/// use chalkx::geometry::Point;
/// use chalkx::shapes::distance_to_segment;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(10.0, 0.0);
/// assert_eq!(distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0);
/// assert_eq!(distance_to_segment(Point::new(13.0, 4.0), a, b), 5.0);
/// ```
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Pixel-space bounds of a shape, clipped to a `width` x `height` raster.
///
/// Ranges are half-open. Returns `None` when nothing is on the raster.
fn clipped_bounds(
    min: Point,
    max: Point,
    pad: f64,
    width: u32,
    height: u32,
) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
    let x0 = (min.x - pad - 1.0).floor().max(0.0);
    let y0 = (min.y - pad - 1.0).floor().max(0.0);
    let x1 = (max.x + pad + 1.0).ceil().min(width as f64);
    let y1 = (max.y + pad + 1.0).ceil().min(height as f64);
    if x0 >= x1 || y0 >= y1 || x1 <= 0.0 || y1 <= 0.0 {
        return None;
    }
    Some((x0 as u32..x1 as u32, y0 as u32..y1 as u32))
}

/// Rasterize a filled disc of `radius` around `center`.
///
/// `plot` receives each touched pixel with its coverage; pixels with zero
/// coverage are skipped.
pub fn rasterize_disc<F>(center: Point, radius: f64, width: u32, height: u32, mut plot: F)
where
    F: FnMut(u32, u32, f32),
{
    if radius.is_nan() || radius <= 0.0 {
        return;
    }
    let Some((xs, ys)) = clipped_bounds(center, center, radius, width, height) else {
        return;
    };
    for y in ys {
        for x in xs.clone() {
            let sample = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let coverage = edge_coverage(radius, sample.distance(center));
            if coverage > 0.0 {
                plot(x, y, coverage);
            }
        }
    }
}

/// Rasterize a segment stroked `2 * radius` wide with round caps.
pub fn rasterize_capsule<F>(a: Point, b: Point, radius: f64, width: u32, height: u32, mut plot: F)
where
    F: FnMut(u32, u32, f32),
{
    if radius.is_nan() || radius <= 0.0 {
        return;
    }
    let min = Point::new(a.x.min(b.x), a.y.min(b.y));
    let max = Point::new(a.x.max(b.x), a.y.max(b.y));
    let Some((xs, ys)) = clipped_bounds(min, max, radius, width, height) else {
        return;
    };
    for y in ys {
        for x in xs.clone() {
            let sample = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let coverage = edge_coverage(radius, distance_to_segment(sample, a, b));
            if coverage > 0.0 {
                plot(x, y, coverage);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn collect_disc(center: Point, radius: f64, w: u32, h: u32) -> HashMap<(u32, u32), f32> {
        let mut out = HashMap::new();
        rasterize_disc(center, radius, w, h, |x, y, c| {
            out.insert((x, y), c);
        });
        out
    }

    #[test]
    fn test_edge_coverage_ramp() {
        assert_eq!(edge_coverage(2.0, 0.0), 1.0);
        assert_eq!(edge_coverage(2.0, 2.0), 0.5);
        assert_eq!(edge_coverage(2.0, 3.0), 0.0);
    }

    #[test]
    fn test_disc_center_fully_covered() {
        let pixels = collect_disc(Point::new(10.5, 10.5), 3.0, 20, 20);
        assert_eq!(pixels.get(&(10, 10)), Some(&1.0));
        assert_eq!(pixels.get(&(12, 10)), Some(&1.0));
        assert!(!pixels.contains_key(&(15, 10)));
    }

    #[test]
    fn test_disc_is_symmetric() {
        let pixels = collect_disc(Point::new(10.0, 10.0), 4.0, 20, 20);
        for (&(x, y), &c) in &pixels {
            let mirrored = (19 - x, y);
            assert_eq!(pixels.get(&mirrored), Some(&c), "asymmetric at ({}, {})", x, y);
        }
    }

    #[test]
    fn test_disc_clipped_at_edges() {
        let pixels = collect_disc(Point::new(0.0, 0.0), 3.0, 10, 10);
        assert!(pixels.contains_key(&(0, 0)));
        assert!(pixels.keys().all(|&(x, y)| x < 10 && y < 10));

        let off_canvas = collect_disc(Point::new(-50.0, -50.0), 3.0, 10, 10);
        assert!(off_canvas.is_empty());
    }

    #[test]
    fn test_zero_radius_draws_nothing() {
        assert!(collect_disc(Point::new(5.0, 5.0), 0.0, 10, 10).is_empty());
    }

    #[test]
    fn test_capsule_covers_whole_segment() {
        let mut covered = HashMap::new();
        rasterize_capsule(Point::new(2.5, 5.5), Point::new(17.5, 5.5), 1.0, 20, 10, |x, y, c| {
            covered.insert((x, y), c);
        });
        for x in 2..=17 {
            assert_eq!(covered.get(&(x, 5)), Some(&1.0), "gap at x={}", x);
        }
        assert!(!covered.contains_key(&(10, 8)));
    }

    #[test]
    fn test_capsule_degenerate_matches_disc() {
        let p = Point::new(6.0, 6.0);
        let disc = collect_disc(p, 2.5, 12, 12);
        let mut capsule = HashMap::new();
        rasterize_capsule(p, p, 2.5, 12, 12, |x, y, c| {
            capsule.insert((x, y), c);
        });
        assert_eq!(disc, capsule);
    }
}
