//! Engine configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Centroid initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Initialization {
    /// `k` distinct dataset points chosen uniformly at random.
    Random,
    /// Farthest-first traversal after a random first pick.
    Farthest,
    /// k-means++ seeding (D² weighted sampling).
    #[default]
    KmeansPlusPlus,
    /// Caller-supplied centroids.
    Manual,
}

impl Initialization {
    /// Canonical name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Initialization::Random => "random",
            Initialization::Farthest => "farthest",
            Initialization::KmeansPlusPlus => "kmeans++",
            Initialization::Manual => "manual",
        }
    }

    /// Whether centroids are picked from the dataset (every strategy but `Manual`).
    pub fn samples_dataset(&self) -> bool {
        !matches!(self, Initialization::Manual)
    }
}

impl fmt::Display for Initialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Initialization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(Initialization::Random),
            "farthest" => Ok(Initialization::Farthest),
            "kmeans++" => Ok(Initialization::KmeansPlusPlus),
            "manual" => Ok(Initialization::Manual),
            other => Err(Error::UnknownInitialization(other.to_string())),
        }
    }
}

impl TryFrom<String> for Initialization {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Initialization> for String {
    fn from(init: Initialization) -> Self {
        init.as_str().to_string()
    }
}

/// Engine configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmeansConfig {
    /// Number of clusters `k`.
    pub n_clusters: usize,
    /// Iteration bound for [`run`](super::Kmeans::run).
    pub max_iter: usize,
    /// Centroid initialization strategy.
    pub initialization: Initialization,
    /// Seed for every random draw the engine makes.
    pub random_seed: Option<u64>,
}

impl Default for KmeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: 8,
            max_iter: 300,
            initialization: Initialization::KmeansPlusPlus,
            random_seed: None,
        }
    }
}

impl KmeansConfig {
    /// Config with `k` clusters and defaults for everything else.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Self::default()
        }
    }

    /// Reject parameter values no dataset could satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "n_clusters",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Externally edited centroids to apply before a `step` or `run`.
///
/// Interactive front ends let users drag centroids around between calls.
/// `manual_centroids` is honoured only while the iteration counter is still 0;
/// otherwise `current_centroids`, when present, replace the engine's centroids.
/// Empty lists count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentroidOverride {
    /// Centroids placed by hand before the first step.
    pub manual_centroids: Option<Vec<Vec<f32>>>,
    /// The caller's last-known centroids.
    pub current_centroids: Option<Vec<Vec<f32>>>,
}

impl CentroidOverride {
    /// No override.
    pub fn none() -> Self {
        Self::default()
    }

    /// Override with hand-placed centroids (first step only).
    pub fn manual(centroids: Vec<Vec<f32>>) -> Self {
        Self {
            manual_centroids: Some(centroids),
            current_centroids: None,
        }
    }

    /// Override with the caller's last-known centroids.
    pub fn current(centroids: Vec<Vec<f32>>) -> Self {
        Self {
            manual_centroids: None,
            current_centroids: Some(centroids),
        }
    }

    /// The centroids that take effect at `iteration`, if any.
    pub fn resolve(&self, iteration: usize) -> Option<&[Vec<f32>]> {
        let manual = self
            .manual_centroids
            .as_deref()
            .filter(|c| !c.is_empty() && iteration == 0);
        let current = self.current_centroids.as_deref().filter(|c| !c.is_empty());
        manual.or(current)
    }
}
