//! Step-wise K-means.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS), one Lloyd iteration at a time.
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids (random, farthest-first, k-means++ or manual)
//! 2. **Assign**: Each point → nearest centroid
//! 3. **Update**: Each centroid → mean of assigned points
//! 4. Repeat until convergence
//!
//! [`Kmeans`] exposes each of these as a separate operation and records a
//! [`Snapshot`] after initialization and after every step, so a front end can
//! animate or replay the whole fit from [`Kmeans::history`].
//!
//! # State
//!
//! The history is the only record of engine state: the current centroids,
//! clusters and iteration counter are read from its last entry. A step
//! computes everything from a copy and appends one entry at the end, so a
//! failed call leaves the engine untouched.
//!
//! # Empty clusters
//!
//! A cluster that captures no points gets a fresh centroid drawn uniformly
//! from the dataset. This is expected and never an error.

use super::config::{CentroidOverride, Initialization, KmeansConfig};
use super::history::{History, Snapshot, Status};
use super::init;
use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Absolute per-component tolerance for the convergence test.
pub const CONVERGENCE_TOL: f32 = 1e-4;

/// Per-point result of [`Kmeans::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Coordinates of the centroid each point is assigned to.
    pub centroids: Vec<Vec<f32>>,
    /// Cluster label of each point.
    pub labels: Vec<usize>,
}

/// Step-wise K-means engine.
///
/// One engine owns the state of one fit. Callers that serve several sessions
/// hold one engine per session.
///
/// ```rust
/// use lloyd::cluster::Kmeans;
///
/// let data = vec![
///     vec![0.0, 0.0],
///     vec![0.1, 0.1],
///     vec![10.0, 10.0],
///     vec![10.1, 10.1],
/// ];
///
/// let mut kmeans = Kmeans::new(2).with_seed(42);
/// kmeans.initialize(&data, None).unwrap();
/// let first = kmeans.step(&data).unwrap();
/// assert_eq!(first.iteration, 1);
///
/// let last = kmeans.run(&data).unwrap();
/// assert!(last.converged);
/// let labels = kmeans.predict(&data).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct Kmeans {
    config: KmeansConfig,
    history: History,
    rng: StdRng,
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

impl Kmeans {
    /// Create a new K-means engine with `k` clusters and default settings.
    pub fn new(k: usize) -> Self {
        let config = KmeansConfig::new(k);
        Self {
            rng: seeded_rng(config.random_seed),
            config,
            history: History::new(),
        }
    }

    /// Create an engine from a full configuration.
    pub fn from_config(config: KmeansConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: seeded_rng(config.random_seed),
            config,
            history: History::new(),
        })
    }

    /// Set maximum iterations.
    ///
    /// Not validated here; `initialize` and `run` reject 0.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    /// Set the initialization strategy.
    pub fn with_initialization(mut self, initialization: Initialization) -> Self {
        self.config.initialization = initialization;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &KmeansConfig {
        &self.config
    }

    /// Change the initialization strategy.
    ///
    /// Only allowed before the first initialization.
    pub fn set_initialization(&mut self, initialization: Initialization) -> Result<()> {
        if !self.history.is_empty() {
            return Err(Error::AlreadyInitialized);
        }
        self.config.initialization = initialization;
        Ok(())
    }

    /// Every snapshot recorded so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The latest snapshot.
    pub fn current(&self) -> Option<&Snapshot> {
        self.history.last()
    }

    /// Current centroids, if initialized.
    pub fn centroids(&self) -> Option<&[Vec<f32>]> {
        self.current().map(|s| s.centroids.as_slice())
    }

    /// Current iteration counter (0 until the first step after initialization).
    pub fn iterations(&self) -> usize {
        self.current().map_or(0, |s| s.iteration)
    }

    /// Where the engine is in its initialize → step → converge cycle.
    pub fn status(&self) -> Status {
        Status::of(self.current(), self.config.max_iter)
    }

    /// Choose initial centroids with the configured strategy.
    ///
    /// `manual_centroids` is required (with exactly `k` rows) for
    /// [`Initialization::Manual`] and ignored otherwise. Resets the iteration
    /// counter and appends an initialization entry; earlier history is kept.
    pub fn initialize(
        &mut self,
        data: &[Vec<f32>],
        manual_centroids: Option<&[Vec<f32>]>,
    ) -> Result<Snapshot> {
        self.config.validate()?;
        let d = util::check_dataset(data)?;
        let k = self.config.n_clusters;
        let strategy = self.config.initialization;

        if strategy.samples_dataset() && k > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: data.len(),
            });
        }

        let centroids = match strategy {
            Initialization::Random => init::random(data, k, &mut self.rng),
            Initialization::Farthest => init::farthest_first(data, k, &mut self.rng),
            Initialization::KmeansPlusPlus => init::kmeans_plus_plus(data, k, &mut self.rng),
            Initialization::Manual => {
                let manual = manual_centroids.ok_or(Error::MissingManualCentroids)?;
                self.check_centroids(manual, d)?;
                manual.to_vec()
            }
        };

        info!(
            initialization = %strategy,
            k = k,
            n = data.len(),
            dim = d,
            "initialized centroids"
        );
        Ok(self.record_initialization(centroids))
    }

    /// Assign every point to its nearest current centroid.
    ///
    /// Returns the point indices of each cluster. Ties go to the lowest
    /// cluster index.
    pub fn assign(&self, data: &[Vec<f32>]) -> Result<Vec<Vec<usize>>> {
        let centroids = self
            .centroids()
            .ok_or(Error::NotInitialized { operation: "assign" })?;
        let d = util::check_dataset(data)?;
        util::check_rows(centroids, d)?;
        Ok(assign_clusters(centroids, data))
    }

    /// New centroids from a cluster assignment: the mean of each cluster's
    /// points, or a random dataset point for an empty cluster.
    ///
    /// Consumes randomness only for empty clusters; engine state is otherwise
    /// untouched.
    pub fn update_centroids(
        &mut self,
        clusters: &[Vec<usize>],
        data: &[Vec<f32>],
    ) -> Result<Vec<Vec<f32>>> {
        util::check_dataset(data)?;
        if clusters.len() != self.config.n_clusters {
            return Err(Error::InvalidParameter {
                name: "clusters",
                message: "must have one entry per cluster",
            });
        }
        if clusters.iter().flatten().any(|&i| i >= data.len()) {
            return Err(Error::InvalidParameter {
                name: "clusters",
                message: "point index out of range",
            });
        }
        Ok(self.recompute(clusters, data).0)
    }

    /// Advance one iteration.
    ///
    /// On an engine without centroids this initializes instead and returns the
    /// initialization snapshot (iteration 0); the next call takes the first step.
    pub fn step(&mut self, data: &[Vec<f32>]) -> Result<Snapshot> {
        self.step_with(data, &CentroidOverride::none())
    }

    /// Advance one iteration, first replacing the centroids with `overrides`
    /// when it resolves to a centroid set at the current iteration.
    pub fn step_with(
        &mut self,
        data: &[Vec<f32>],
        overrides: &CentroidOverride,
    ) -> Result<Snapshot> {
        let d = util::check_dataset(data)?;

        let injected = overrides.resolve(self.iterations());
        let base = match (injected, self.centroids()) {
            (Some(c), _) => {
                self.check_centroids(c, d)?;
                c.to_vec()
            }
            (None, Some(c)) => {
                util::check_rows(c, d)?;
                c.to_vec()
            }
            (None, None) => {
                debug!("step on uninitialized engine, initializing instead");
                return self.initialize(data, None);
            }
        };

        if self.history.is_empty() {
            debug!("recording injected centroids as initialization");
            self.record_initialization(base.clone());
        }

        let clusters = assign_clusters(&base, data);
        let (centroids, reseeded) = self.recompute(&clusters, data);

        let diffs = || {
            base.iter()
                .zip(centroids.iter())
                .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()))
        };
        // NaN compares false, so it never counts as converged.
        let converged = diffs().all(|delta| delta <= CONVERGENCE_TOL);
        let shift = diffs().fold(0.0f32, f32::max);

        let snapshot = Snapshot {
            centroids,
            clusters,
            iteration: self.iterations() + 1,
            converged,
        };
        debug!(
            iteration = snapshot.iteration,
            shift = shift,
            converged = converged,
            reseeded = reseeded,
            "step"
        );
        self.history.push(snapshot.clone());
        Ok(snapshot)
    }

    /// Step until a step converges or the iteration counter reaches `max_iter`.
    ///
    /// Continues from the current state. Hitting `max_iter` is a normal
    /// outcome; inspect `converged` on the returned snapshot.
    pub fn run(&mut self, data: &[Vec<f32>]) -> Result<Snapshot> {
        self.run_with(data, &CentroidOverride::none())
    }

    /// [`run`](Self::run), applying `overrides` to the first step only.
    pub fn run_with(
        &mut self,
        data: &[Vec<f32>],
        overrides: &CentroidOverride,
    ) -> Result<Snapshot> {
        self.config.validate()?;
        let mut pending = Some(overrides);
        while self.iterations() < self.config.max_iter {
            let snapshot = match pending.take() {
                Some(o) => self.step_with(data, o)?,
                None => self.step(data)?,
            };
            if snapshot.converged {
                info!(iteration = snapshot.iteration, "converged");
                return Ok(snapshot);
            }
        }

        info!(
            max_iter = self.config.max_iter,
            "reached maximum iterations without convergence"
        );
        self.current()
            .cloned()
            .ok_or(Error::NotInitialized { operation: "run" })
    }

    /// Discard all state, as if freshly constructed from the same config.
    pub fn reset(&mut self) {
        self.history = History::new();
        self.rng = seeded_rng(self.config.random_seed);
    }

    /// Label each point with its nearest centroid.
    ///
    /// `data` need not be the dataset the engine was fitted on.
    pub fn predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let centroids = self
            .centroids()
            .ok_or(Error::NotInitialized { operation: "predict" })?;
        let d = centroids.first().map_or(0, Vec::len);
        util::check_rows(data, d)?;
        Ok(data.iter().map(|p| util::nearest(p, centroids)).collect())
    }

    /// Each point's assigned centroid and label.
    pub fn evaluate(&self, data: &[Vec<f32>]) -> Result<Evaluation> {
        let labels = self.predict(data)?;
        let centroids = self
            .centroids()
            .ok_or(Error::NotInitialized { operation: "evaluate" })?;
        Ok(Evaluation {
            centroids: labels.iter().map(|&l| centroids[l].clone()).collect(),
            labels,
        })
    }

    /// Within-cluster sum of squares of `data` under the current centroids.
    pub fn inertia(&self, data: &[Vec<f32>]) -> Result<f64> {
        let labels = self.predict(data)?;
        let centroids = self
            .centroids()
            .ok_or(Error::NotInitialized { operation: "inertia" })?;
        Ok(data
            .iter()
            .zip(labels.iter())
            .map(|(p, &l)| f64::from(util::squared_euclidean(p, &centroids[l])))
            .sum())
    }

    fn check_centroids(&self, centroids: &[Vec<f32>], d: usize) -> Result<()> {
        if centroids.len() != self.config.n_clusters {
            return Err(Error::CentroidCount {
                expected: self.config.n_clusters,
                found: centroids.len(),
            });
        }
        util::check_rows(centroids, d)
    }

    fn record_initialization(&mut self, centroids: Vec<Vec<f32>>) -> Snapshot {
        let snapshot = Snapshot {
            clusters: vec![Vec::new(); centroids.len()],
            centroids,
            iteration: 0,
            converged: false,
        };
        self.history.push(snapshot.clone());
        snapshot
    }

    /// Returns the new centroids and the number of empty clusters reseeded.
    fn recompute(&mut self, clusters: &[Vec<usize>], data: &[Vec<f32>]) -> (Vec<Vec<f32>>, usize) {
        let mut reseeded = 0;
        let centroids: Vec<Vec<f32>> = clusters
            .iter()
            .map(|members| {
                if members.is_empty() {
                    reseeded += 1;
                    data[self.rng.random_range(0..data.len())].clone()
                } else {
                    util::mean(data, members)
                }
            })
            .collect();
        (centroids, reseeded)
    }
}

fn assign_clusters(centroids: &[Vec<f32>], data: &[Vec<f32>]) -> Vec<Vec<usize>> {
    let mut clusters = vec![Vec::new(); centroids.len()];
    for (i, point) in data.iter().enumerate() {
        clusters[util::nearest(point, centroids)].push(i);
    }
    clusters
}

impl Clustering for Kmeans {
    /// Fit a fresh engine with the same configuration and label `data`.
    ///
    /// `self` is not modified.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let mut model = Kmeans::from_config(self.config.clone())?;
        model.run(data)?;
        model.predict(data)
    }

    fn n_clusters(&self) -> usize {
        self.config.n_clusters
    }
}
