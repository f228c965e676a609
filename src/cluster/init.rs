//! Centroid initialization strategies.
//!
//! Every dataset-sampling strategy returns exactly `k` centroids, each a copy of
//! some dataset point. Callers guarantee `1 <= k <= data.len()`.
//!
//! ## Farthest-first traversal
//!
//! After a uniformly random first pick, each new centroid is the point whose
//! distance to its nearest already-chosen centroid is largest. Deterministic
//! given the first pick.
//!
//! ## K-means++
//!
//! 1. Choose first centroid uniformly at random
//! 2. Choose next centroid with probability proportional to D(x)²
//!    (squared distance to nearest existing centroid)
//!
//! Selection is a roulette wheel: normalize the weights, take their running
//! sum, draw `r ~ U[0, 1)` and pick the first index whose cumulative
//! probability reaches `r`.

use super::util;
use rand::prelude::*;

/// `k` distinct dataset points, sampled uniformly without replacement.
pub(crate) fn random<R: Rng + ?Sized>(data: &[Vec<f32>], k: usize, rng: &mut R) -> Vec<Vec<f32>> {
    rand::seq::index::sample(rng, data.len(), k)
        .iter()
        .map(|i| data[i].clone())
        .collect()
}

/// Farthest-first traversal.
pub(crate) fn farthest_first<R: Rng + ?Sized>(
    data: &[Vec<f32>],
    k: usize,
    rng: &mut R,
) -> Vec<Vec<f32>> {
    let first = rng.random_range(0..data.len());
    farthest_first_from(data, k, first)
}

fn farthest_first_from(data: &[Vec<f32>], k: usize, first: usize) -> Vec<Vec<f32>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[first].clone());

    while centroids.len() < k {
        // First maximum wins.
        let mut best = 0;
        let mut best_dist = f32::NEG_INFINITY;
        for (i, point) in data.iter().enumerate() {
            let d = util::min_distance(point, &centroids);
            if d > best_dist {
                best_dist = d;
                best = i;
            }
        }
        centroids.push(data[best].clone());
    }

    centroids
}

/// K-means++ seeding.
pub(crate) fn kmeans_plus_plus<R: Rng + ?Sized>(
    data: &[Vec<f32>],
    k: usize,
    rng: &mut R,
) -> Vec<Vec<f32>> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.random_range(0..n)].clone());

    while centroids.len() < k {
        let r = rng.random::<f64>();
        let next = match weighted_pick(data, &centroids, r) {
            Some(j) => j,
            // Every point coincides with a centroid.
            None => rng.random_range(0..n),
        };
        centroids.push(data[next].clone());
    }

    centroids
}

/// Roulette-wheel pick over D² weights for a uniform draw `r` in `[0, 1)`.
///
/// Returns `None` when every weight is zero.
fn weighted_pick(data: &[Vec<f32>], centroids: &[Vec<f32>], r: f64) -> Option<usize> {
    let weights: Vec<f64> = data
        .iter()
        .map(|p| f64::from(util::min_distance(p, centroids)).powi(2))
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let mut cumulative = 0.0;
    for (j, w) in weights.iter().enumerate() {
        cumulative += w / total;
        if cumulative >= r {
            return Some(j);
        }
    }
    Some(data.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Vec<f32>> {
        (0..n).map(|i| vec![i as f32, 0.0]).collect()
    }

    #[test]
    fn test_random_picks_distinct_points() {
        let data = line(10);
        let mut rng = StdRng::seed_from_u64(7);
        let centroids = random(&data, 10, &mut rng);
        assert_eq!(centroids.len(), 10);

        let mut xs: Vec<i32> = centroids.iter().map(|c| c[0] as i32).collect();
        xs.sort_unstable();
        assert_eq!(xs, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_farthest_first_reaches_the_extremes() {
        // Whatever the first pick, the second is the endpoint farther from it.
        let data = line(11);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let centroids = farthest_first(&data, 2, &mut rng);
            let first = centroids[0][0];
            let expected = if first >= 5.0 { 0.0 } else { 10.0 };
            assert_eq!(centroids[1][0], expected, "seed {seed}");
        }
    }

    #[test]
    fn test_farthest_first_deterministic_after_first_pick() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 0.0], vec![5.0, 8.0]];
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        assert_eq!(farthest_first(&data, 3, &mut a), farthest_first(&data, 3, &mut b));
    }

    #[test]
    fn test_farthest_first_uses_distance_to_nearest_centroid() {
        // From [0]: 10 is farthest. Then 6 (nearest centroid 4 away) beats
        // 1 (1 away); measuring against the last centroid only would pick 0 again.
        let data = vec![vec![0.0], vec![1.0], vec![10.0], vec![6.0]];
        let centroids = farthest_first_from(&data, 3, 0);
        assert_eq!(centroids, vec![vec![0.0], vec![10.0], vec![6.0]]);

        let centroids = farthest_first_from(&data, 4, 0);
        assert_eq!(centroids[3], vec![1.0]);
    }

    #[test]
    fn test_weighted_pick_uses_squared_distances() {
        // Centroid at 0. D² weights [0, 1, 9] normalize to cumulative
        // [0.0, 0.1, 1.0]; plain distances would give [0.0, 0.25, 1.0].
        let data = vec![vec![0.0], vec![1.0], vec![3.0]];
        let centroids = vec![vec![0.0]];
        assert_eq!(weighted_pick(&data, &centroids, 0.05), Some(1));
        assert_eq!(weighted_pick(&data, &centroids, 0.1), Some(1));
        assert_eq!(weighted_pick(&data, &centroids, 0.15), Some(2));
        assert_eq!(weighted_pick(&data, &centroids, 0.99), Some(2));
        assert_eq!(weighted_pick(&data, &centroids, 0.0), Some(0));

        // Minimum over all centroids: with 0 and 3 chosen only 1 has weight.
        let centroids = vec![vec![0.0], vec![3.0]];
        assert_eq!(weighted_pick(&data, &centroids, 0.5), Some(1));

        let same = vec![vec![2.0]; 3];
        assert_eq!(weighted_pick(&same, &[vec![2.0]], 0.5), None);
    }

    #[test]
    fn test_kmeans_plus_plus_never_repeats_a_centroid_with_positive_weight_left() {
        // Chosen points have zero weight, so they cannot be drawn again while
        // any other point has positive weight.
        let data = line(6);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let centroids = kmeans_plus_plus(&data, 6, &mut rng);
            let mut xs: Vec<i32> = centroids.iter().map(|c| c[0] as i32).collect();
            xs.sort_unstable();
            xs.dedup();
            assert_eq!(xs.len(), 6, "seed {seed}");
        }
    }

    #[test]
    fn test_kmeans_plus_plus_identical_points() {
        let data = vec![vec![1.0, 1.0]; 4];
        let mut rng = StdRng::seed_from_u64(0);
        let centroids = kmeans_plus_plus(&data, 3, &mut rng);
        assert_eq!(centroids, vec![vec![1.0, 1.0]; 3]);
    }
}
