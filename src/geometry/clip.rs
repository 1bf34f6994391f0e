//! Polygon boolean adapter.
//!
//! Wraps the `geo` crate's boolean operations behind the two calls the
//! pipeline needs: union over a collection of rings and keep-minus-cut
//! difference. This is the only place coordinates ever touch the integer
//! grid: every ring is scaled by [`PRECISION`], rounded, and cleaned of
//! duplicate vertices before an operation, and results are snapped back to
//! the same grid so repeated runs stay byte-identical.

use anyhow::{bail, Result};
use geo::{BooleanOps, LineString, MultiPolygon, Polygon};

use super::path::{Path, Point};

/// Fixed-point scale applied before boolean operations: three decimal places
/// of millimetre survive the integer grid.
pub const PRECISION: f64 = 1000.0;

/// Cleanup tolerance in integer grid units. 0.7² = 0.49 < 0.5, so only
/// duplicate vertices collapse, never distinct grid points.
const CLEAN_DIST: f64 = 0.7;

/// Unions a collection of closed paths into a canonical set of rings.
///
/// Rings may overlap, nest or share edges; the result is their merged
/// coverage under the non-zero fill rule. Degenerate rings (fewer than three
/// vertices after cleanup) are dropped.
///
/// # Errors
///
/// Fails when a ring carries a non-finite coordinate; the caller is expected
/// to mark the affected layer errored and continue with the others.
pub fn union(paths: &[Path]) -> Result<Vec<Path>> {
    Ok(union_multi(paths)?.map(|mp| from_multi(&mp)).unwrap_or_default())
}

/// Subtracts the merged `clip` region from the merged `subject` region,
/// returning the retained rings (holes come back as separate rings).
///
/// # Errors
///
/// Fails when either side carries a non-finite coordinate.
pub fn difference(subject: &[Path], clip: &[Path]) -> Result<Vec<Path>> {
    let Some(subject_mp) = union_multi(subject)? else {
        return Ok(Vec::new());
    };
    match union_multi(clip)? {
        Some(clip_mp) => Ok(from_multi(&subject_mp.difference(&clip_mp))),
        None => Ok(from_multi(&subject_mp)),
    }
}

/// Folds the paths into one merged `MultiPolygon` in grid coordinates.
/// Pairwise folding keeps every intermediate operand a valid polygon set
/// even when the input rings overlap each other.
fn union_multi(paths: &[Path]) -> Result<Option<MultiPolygon<f64>>> {
    let mut acc: Option<MultiPolygon<f64>> = None;
    for path in paths {
        let ring = to_grid(path)?;
        if ring.len() < 3 {
            continue;
        }
        let next = MultiPolygon::new(vec![Polygon::new(
            LineString::from(ring.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()),
            Vec::new(),
        )]);
        acc = Some(match acc {
            Some(merged) => merged.union(&next),
            None => next,
        });
    }
    Ok(acc)
}

/// Scales a path onto the integer grid and removes duplicate vertices.
fn to_grid(path: &Path) -> Result<Vec<Point>> {
    let mut ring = Vec::with_capacity(path.len());
    for p in path.iter() {
        if !p.x.is_finite() || !p.y.is_finite() {
            bail!("non-finite coordinate ({}, {}) in polygon ring", p.x, p.y);
        }
        ring.push(Point::new((p.x * PRECISION).round(), (p.y * PRECISION).round()));
    }
    Ok(clean_ring(ring))
}

/// Drops consecutive vertices (wrapping around the ring) closer than the
/// cleanup tolerance.
fn clean_ring(ring: Vec<Point>) -> Vec<Point> {
    let limit = CLEAN_DIST * CLEAN_DIST;
    let mut cleaned: Vec<Point> = Vec::with_capacity(ring.len());
    for p in ring {
        if let Some(last) = cleaned.last() {
            let (dx, dy) = (p.x - last.x, p.y - last.y);
            if dx * dx + dy * dy <= limit {
                continue;
            }
        }
        cleaned.push(p);
    }
    while cleaned.len() > 1 {
        let (first, last) = (cleaned[0], cleaned[cleaned.len() - 1]);
        let (dx, dy) = (first.x - last.x, first.y - last.y);
        if dx * dx + dy * dy <= limit {
            cleaned.pop();
        } else {
            break;
        }
    }
    cleaned
}

/// Converts a grid-space result back to millimetre paths: every ring of
/// every polygon (exterior and holes) becomes its own cleaned path.
fn from_multi(mp: &MultiPolygon<f64>) -> Vec<Path> {
    let mut out = Vec::new();
    for poly in mp {
        for line in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            let mut ring: Vec<Point> = line
                .coords()
                .map(|c| Point::new(c.x.round(), c.y.round()))
                .collect();
            // geo rings repeat the first vertex at the end; ours are
            // implicitly closed.
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            let ring = clean_ring(ring);
            if ring.len() >= 3 {
                out.push(Path(
                    ring.into_iter()
                        .map(|p| Point::new(p.x / PRECISION, p.y / PRECISION))
                        .collect(),
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::surface_area;

    fn square(x: f64, y: f64, side: f64) -> Path {
        Path::from(vec![(x, y), (x + side, y), (x + side, y + side), (x, y + side)])
    }

    #[test]
    fn test_clean_keeps_spaced_vertices() {
        // Vertices spaced further than 0.7 grid units survive untouched.
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(1000.0, 0.0),
            Point::new(1000.0, 1000.0),
            Point::new(0.0, 1000.0),
        ];
        assert_eq!(clean_ring(ring.clone()), ring);
    }

    #[test]
    fn test_clean_drops_duplicates() {
        let ring = vec![
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(1.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 1.0),
        ];
        assert_eq!(clean_ring(ring).len(), 4);
    }

    #[test]
    fn test_clean_drops_wrapping_duplicate() {
        let ring = vec![
            Point::new(1.0, 1.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, 5.0),
            Point::new(1.0, 1.0),
        ];
        assert_eq!(clean_ring(ring).len(), 3);
    }

    #[test]
    fn test_union_merges_overlap() {
        // Two 2x2 squares overlapping by 1x2 merge into a single 3x2 ring.
        let merged = union(&[square(0.0, 0.0, 2.0), square(1.0, 0.0, 2.0)]).unwrap();
        assert_eq!(merged.len(), 1);
        assert!((surface_area(&merged) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_keeps_disjoint_rings() {
        let merged = union(&[square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)]).unwrap();
        assert_eq!(merged.len(), 2);
        assert!((surface_area(&merged) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_is_idempotent() {
        let once = union(&[square(0.0, 0.0, 3.0), square(2.0, 2.0, 3.0)]).unwrap();
        let twice = union(&once).unwrap();
        assert!((surface_area(&once) - surface_area(&twice)).abs() < 1e-9);
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn test_difference_removes_material() {
        let keep = vec![square(0.0, 0.0, 10.0)];
        let cut = vec![square(2.0, 2.0, 2.0)];
        let result = difference(&keep, &cut).unwrap();
        assert!((surface_area(&result) - (100.0 + 4.0)).abs() < 1e-6);
        // A fully interior cut becomes a hole ring.
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_difference_never_grows() {
        let keep = vec![square(0.0, 0.0, 5.0)];
        let cut = vec![square(4.0, 4.0, 5.0)];
        let result = difference(&keep, &cut).unwrap();
        // Area of the retained region only: shoelace sums rings, and the cut
        // overlaps one corner so a single smaller ring remains.
        assert!(surface_area(&result) < 25.0);
    }

    #[test]
    fn test_difference_with_empty_cut() {
        let keep = vec![square(0.0, 0.0, 4.0)];
        let result = difference(&keep, &[]).unwrap();
        assert!((surface_area(&result) - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_non_finite() {
        let bad = Path::from(vec![(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)]);
        assert!(union(&[bad]).is_err());
    }
}
