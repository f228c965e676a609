use crate::error::{Error, Result};

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
pub(crate) fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// Index of the closest centroid to `point`.
///
/// Centroids are scanned in index order and only a strictly smaller distance
/// replaces the current best, so ties go to the lowest index.
pub(crate) fn nearest(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = euclidean(point, centroid);
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    best
}

/// Distance from `point` to the closest of `centroids` (`INFINITY` if there are none).
pub(crate) fn min_distance(point: &[f32], centroids: &[Vec<f32>]) -> f32 {
    centroids
        .iter()
        .map(|c| euclidean(point, c))
        .fold(f32::INFINITY, f32::min)
}

/// Coordinate-wise mean of the points selected by `members`.
///
/// `members` must be non-empty.
pub(crate) fn mean(data: &[Vec<f32>], members: &[usize]) -> Vec<f32> {
    debug_assert!(!members.is_empty());
    let d = data[members[0]].len();
    let mut acc = vec![0.0f64; d];
    for &i in members {
        for (a, &x) in acc.iter_mut().zip(data[i].iter()) {
            *a += f64::from(x);
        }
    }
    let count = members.len() as f64;
    acc.into_iter().map(|a| (a / count) as f32).collect()
}

/// Check that `data` is non-empty and rectangular. Returns the dimensionality.
pub(crate) fn check_dataset(data: &[Vec<f32>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    check_rows(data, d)?;
    Ok(d)
}

/// Check that every row of `rows` has exactly `d` finite components.
pub(crate) fn check_rows(rows: &[Vec<f32>], d: usize) -> Result<()> {
    for (r, row) in rows.iter().enumerate() {
        if row.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: row.len(),
            });
        }
        if let Some(column) = row.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFinite { row: r, column });
        }
    }
    Ok(())
}
