//! Sample dataset loading.
//!
//! The dataset is a static JSON array of [`Sample`] records. Loading either
//! succeeds with the full collection or fails with a distinct error state;
//! callers never see a silently empty dataset.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sample::Sample;

/// An immutable, loaded collection of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
    fingerprint: String,
    source: Option<PathBuf>,
}

impl Dataset {
    /// Load a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetRead`] if the file cannot be read and
    /// [`Error::DatasetParse`] if it is not a JSON array of samples.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading dataset from {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| Error::DatasetRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut dataset = Self::parse(&bytes).map_err(|source| Error::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;
        dataset.source = Some(path.to_path_buf());

        info!(
            "Loaded {} samples from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse a dataset from in-memory JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the bytes are not a JSON array of samples.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::parse(bytes)?)
    }

    /// Build a dataset from already-parsed samples.
    ///
    /// The fingerprint is computed over the canonical JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the samples cannot be serialized.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let bytes = serde_json::to_vec(&samples)?;
        Ok(Self {
            fingerprint: Self::compute_fingerprint(&bytes),
            samples,
            source: None,
        })
    }

    fn parse(bytes: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let samples: Vec<Sample> = serde_json::from_slice(bytes)?;
        Ok(Self {
            samples,
            fingerprint: Self::compute_fingerprint(bytes),
            source: None,
        })
    }

    /// Compute the BLAKE3 fingerprint of raw dataset bytes.
    #[must_use]
    pub fn compute_fingerprint(bytes: &[u8]) -> String {
        blake3::hash(bytes).to_hex().to_string()
    }

    /// All samples, in source order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Hex fingerprint of the content this dataset was built from.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// File the dataset was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct beach types, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        categories(&self.samples)
    }
}

/// Distinct beach types of `samples`, in first-seen order.
///
/// This is the vocabulary offered by the category filter. It is always
/// derived from the full collection, never from a filtered view.
#[must_use]
pub fn categories(samples: &[Sample]) -> Vec<&str> {
    let mut seen = HashSet::new();
    samples
        .iter()
        .map(|s| s.beach_type.as_str())
        .filter(|t| seen.insert(*t))
        .collect()
}

/// Loading state of the sample dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    /// The dataset has not been loaded yet.
    #[default]
    Loading,
    /// The dataset is available.
    Ready(Dataset),
    /// Loading failed; the message describes why.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

impl LoadState {
    /// Load the dataset at `path` into a terminal state.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::from_result(Dataset::load(path))
    }

    /// Convert a load result into a state.
    #[must_use]
    pub fn from_result(result: Result<Dataset>) -> Self {
        match result {
            Ok(dataset) => Self::Ready(dataset),
            Err(e) => {
                warn!("Dataset unavailable: {}", e);
                Self::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// The working set: all samples when ready, otherwise empty.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        match self {
            Self::Ready(dataset) => dataset.samples(),
            Self::Loading | Self::Failed { .. } => &[],
        }
    }

    /// The dataset, if loaded.
    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            Self::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// Whether loading failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The failure message, if loading failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Short label for status output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}
