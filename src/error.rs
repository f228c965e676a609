use thiserror::Error;

/// Errors returned by the clustering engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset (or a dataset and the fitted centroids) have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A point or centroid has a NaN or infinite component.
    #[error("non-finite value at row {row}, column {column}")]
    NonFinite {
        /// Row index.
        row: usize,
        /// Component index.
        column: usize,
    },

    /// Initialization strategy name is not recognised.
    #[error("unknown initialization method: {0}")]
    UnknownInitialization(String),

    /// Manual initialization was requested without supplying centroids.
    #[error("manual centroids must be provided and match n_clusters")]
    MissingManualCentroids,

    /// Supplied centroid set does not have exactly `n_clusters` rows.
    #[error("centroid count mismatch: expected {expected}, found {found}")]
    CentroidCount {
        /// Configured number of clusters.
        expected: usize,
        /// Number of centroids supplied.
        found: usize,
    },

    /// Operation needs fitted centroids but none exist yet.
    #[error("{operation} requires initialized centroids")]
    NotInitialized {
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// Configuration change attempted after centroids were initialized.
    #[error("initialization strategy can only be changed before the first initialization")]
    AlreadyInitialized,
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad engine configuration or caller-supplied centroids.
    Configuration,
    /// Operation invoked in the wrong engine state.
    State,
    /// Malformed dataset.
    InvalidInput,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter { .. }
            | Error::InvalidClusterCount { .. }
            | Error::UnknownInitialization(_)
            | Error::MissingManualCentroids
            | Error::CentroidCount { .. } => ErrorKind::Configuration,
            Error::NotInitialized { .. } | Error::AlreadyInitialized => ErrorKind::State,
            Error::EmptyInput | Error::DimensionMismatch { .. } | Error::NonFinite { .. } => {
                ErrorKind::InvalidInput
            }
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
