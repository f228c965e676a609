//! Step-wise centroid clustering.
//!
//! `lloyd` is a small k-means engine built for interactive use: instead of one
//! opaque `fit`, it exposes initialization, single Lloyd steps and run-to-convergence
//! as separate operations and keeps a replayable history of its state.
//!
//! The primary public API is under [`cluster`], which provides:
//! - four centroid initialization strategies (random, farthest-first, k-means++, manual)
//! - step / run with optional externally edited centroids
//! - prediction and evaluation against the fitted centroids

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    CentroidOverride, Clustering, Evaluation, History, Initialization, Kmeans, KmeansConfig,
    Snapshot, Status,
};
pub use error::{Error, ErrorKind, Result};
