//! Centroid clustering, one iteration at a time.
//!
//! ## K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Instead of a single `fit` call, [`Kmeans`] is a small state machine:
//!
//! ```text
//! Uninitialized → Initialized → Stepping → Converged
//!                                   ↘ MaxIterReached
//! ```
//!
//! Every transition appends a [`Snapshot`] to the engine's [`History`], which
//! front ends use to render or replay the fit.
//!
//! ## Initialization
//!
//! | Strategy | First centroid | Remaining centroids |
//! |----------|----------------|---------------------|
//! | `random` | uniform | uniform, without replacement |
//! | `farthest` | uniform | point farthest from its nearest centroid |
//! | `kmeans++` | uniform | sampled ∝ squared distance to nearest centroid |
//! | `manual` | caller | caller |
//!
//! ## Usage
//!
//! ```rust
//! use lloyd::cluster::{CentroidOverride, Initialization, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let mut kmeans = Kmeans::new(2)
//!     .with_initialization(Initialization::Manual)
//!     .with_seed(7);
//! kmeans
//!     .initialize(&data, Some(&[vec![1.0, 1.0], vec![9.0, 9.0]]))
//!     .unwrap();
//!
//! // A user dragged the centroids before the first step.
//! let dragged = CentroidOverride::manual(vec![vec![0.0, 0.0], vec![10.0, 10.0]]);
//! let snapshot = kmeans.step_with(&data, &dragged).unwrap();
//! assert_eq!(snapshot.clusters, vec![vec![0, 1], vec![2, 3]]);
//!
//! let last = kmeans.run(&data).unwrap();
//! assert!(last.converged);
//! assert_eq!(kmeans.history().len(), last.iteration + 1);
//! ```

mod config;
mod history;
mod init;
mod kmeans;
mod traits;
mod util;

pub use config::{CentroidOverride, Initialization, KmeansConfig};
pub use history::{History, Snapshot, Status};
pub use kmeans::{Evaluation, Kmeans, CONVERGENCE_TOL};
pub use traits::Clustering;
