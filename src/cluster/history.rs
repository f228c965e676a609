//! Iteration snapshots and the append-only history log.

use serde::{Deserialize, Serialize};

/// Engine state after initialization or after one step.
///
/// `clusters[c]` holds the dataset indices assigned to cluster `c`, in dataset
/// order. Entries recorded by initialization have empty clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Centroids, indexed by cluster label.
    pub centroids: Vec<Vec<f32>>,
    /// Point indices per cluster.
    pub clusters: Vec<Vec<usize>>,
    /// Iteration counter at the time of the snapshot (0 for initialization).
    pub iteration: usize,
    /// Whether this step moved no centroid component by more than the tolerance.
    pub converged: bool,
}

impl Snapshot {
    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// True for entries recorded by initialization rather than a step.
    pub fn is_initialization(&self) -> bool {
        self.iteration == 0
    }

    /// Per-point cluster labels.
    ///
    /// `None` for an initialization entry, or if the clusters do not cover
    /// indices `0..n` exactly once.
    pub fn labels(&self) -> Option<Vec<usize>> {
        let n: usize = self.clusters.iter().map(Vec::len).sum();
        if n == 0 {
            return None;
        }
        let mut labels = vec![None; n];
        for (c, members) in self.clusters.iter().enumerate() {
            for &i in members {
                let slot = labels.get_mut(i)?;
                if slot.is_some() {
                    return None;
                }
                *slot = Some(c);
            }
        }
        labels.into_iter().collect()
    }

    /// The points of each cluster, copied out of `data`.
    ///
    /// `data` must be the dataset the snapshot was computed on; returns `None`
    /// if a member index is out of range for it.
    pub fn cluster_points(&self, data: &[Vec<f32>]) -> Option<Vec<Vec<Vec<f32>>>> {
        self.clusters
            .iter()
            .map(|members| {
                members
                    .iter()
                    .map(|&i| data.get(i).cloned())
                    .collect::<Option<Vec<_>>>()
            })
            .collect()
    }

    /// Size of each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Vec::len).collect()
    }
}

/// Append-only log of snapshots. The last entry is the engine's current state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent snapshot.
    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    /// Snapshot at position `index` in recording order.
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    /// Snapshots in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.entries.iter()
    }

    /// All snapshots as a slice.
    pub fn as_slice(&self) -> &[Snapshot] {
        &self.entries
    }

    /// Number of initialization entries (re-initializing appends, it never truncates).
    pub fn initializations(&self) -> usize {
        self.entries.iter().filter(|s| s.is_initialization()).count()
    }

    /// Snapshots recorded since the most recent initialization, inclusive.
    pub fn current_run(&self) -> &[Snapshot] {
        let start = self
            .entries
            .iter()
            .rposition(Snapshot::is_initialization)
            .unwrap_or(0);
        &self.entries[start..]
    }

    /// Iteration of the first converged step since the most recent initialization.
    pub fn converged_at(&self) -> Option<usize> {
        self.current_run()
            .iter()
            .find(|s| s.converged)
            .map(|s| s.iteration)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Coarse engine state, derived from the latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No centroids yet.
    Uninitialized,
    /// Centroids chosen, no step taken since.
    Initialized,
    /// At least one step taken, not converged, below `max_iter`.
    Stepping,
    /// Last step converged.
    Converged,
    /// Iteration counter reached `max_iter` without convergence.
    MaxIterReached,
}

impl Status {
    pub(crate) fn of(last: Option<&Snapshot>, max_iter: usize) -> Self {
        match last {
            None => Status::Uninitialized,
            Some(s) if s.is_initialization() => Status::Initialized,
            Some(s) if s.converged => Status::Converged,
            Some(s) if s.iteration >= max_iter => Status::MaxIterReached,
            Some(_) => Status::Stepping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(iteration: usize, converged: bool) -> Snapshot {
        Snapshot {
            centroids: vec![vec![0.0], vec![5.0]],
            clusters: if iteration == 0 {
                vec![Vec::new(), Vec::new()]
            } else {
                vec![vec![0, 2], vec![1]]
            },
            iteration,
            converged,
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(snapshot(0, false).labels(), None);
        assert_eq!(snapshot(1, false).labels(), Some(vec![0, 1, 0]));
        assert_eq!(snapshot(1, false).cluster_sizes(), vec![2, 1]);
    }

    #[test]
    fn test_cluster_points() {
        let data = vec![vec![0.0], vec![5.0], vec![1.0]];
        let points = snapshot(1, false).cluster_points(&data);
        assert_eq!(
            points,
            Some(vec![vec![vec![0.0], vec![1.0]], vec![vec![5.0]]])
        );

        // Wrong dataset for this snapshot.
        assert_eq!(snapshot(1, false).cluster_points(&data[..2]), None);
    }

    #[test]
    fn test_labels_of_malformed_snapshot() {
        let mut gap = snapshot(1, false);
        gap.clusters = vec![vec![0, 5], vec![1]];
        assert_eq!(gap.labels(), None);

        let mut repeated = snapshot(1, false);
        repeated.clusters = vec![vec![0, 1], vec![1]];
        assert_eq!(repeated.labels(), None);

        let json = r#"{"centroids":[[0.0]],"clusters":[[7]],"iteration":1,"converged":false}"#;
        let decoded: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.labels(), None);
        assert_eq!(decoded.cluster_points(&[vec![0.0]]), None);
    }

    #[test]
    fn test_history_replay() {
        let mut history = History::new();
        history.push(snapshot(0, false));
        history.push(snapshot(1, false));
        history.push(snapshot(2, true));
        history.push(snapshot(0, false));
        history.push(snapshot(1, false));

        assert_eq!(history.len(), 5);
        assert_eq!(history.initializations(), 2);
        assert_eq!(history.current_run().len(), 2);
        assert_eq!(history.converged_at(), None);

        let iterations: Vec<usize> = history.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![0, 1, 2, 0, 1]);

        history.push(snapshot(2, true));
        assert_eq!(history.converged_at(), Some(2));
    }

    #[test]
    fn test_status() {
        assert_eq!(Status::of(None, 10), Status::Uninitialized);
        assert_eq!(Status::of(Some(&snapshot(0, false)), 10), Status::Initialized);
        assert_eq!(Status::of(Some(&snapshot(3, false)), 10), Status::Stepping);
        assert_eq!(Status::of(Some(&snapshot(3, true)), 3), Status::Converged);
        assert_eq!(Status::of(Some(&snapshot(3, false)), 3), Status::MaxIterReached);
    }

    #[test]
    fn test_history_serializes_as_array() {
        let mut history = History::new();
        history.push(snapshot(1, true));
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"converged\":true"));
        let back: History = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }
}
