//! Configuration for spectral clustering and cluster-count selection.
//!
//! Everything here is a plain value: the random seed is carried in
//! [`SpectralConfig`] and threaded into every clustering call, so two runs
//! with equal configs over equal input produce equal labels.

use serde::{Deserialize, Serialize};

use crate::error::SpectralError;

/// Seed used for k-means initialisation unless overridden.
pub const DEFAULT_SEED: u64 = 42;
/// Number of k-means restarts; the lowest-inertia run wins.
pub const DEFAULT_N_INIT: usize = 10;
pub const DEFAULT_MAX_ITER: usize = 300;
/// k-means convergence tolerance on centroid movement.
pub const DEFAULT_TOL: f64 = 1e-4;
pub const DEFAULT_K_MIN: usize = 2;
pub const DEFAULT_K_MAX: usize = 15;

/// Tunables of the spectral partitioner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectralConfig {
    /// Seed for the k-means initialisation RNG.
    pub seed: u64,
    /// Independent k-means restarts per clustering call.
    pub n_init: usize,
    /// Iteration cap per restart.
    pub max_iter: usize,
    /// Convergence tolerance on centroid movement.
    pub tol: f64,
}

impl SpectralConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn validate(&self) -> Result<(), SpectralError> {
        if self.n_init == 0 {
            return Err(SpectralError::InvalidConfig("n_init must be >= 1".into()));
        }
        if self.max_iter == 0 {
            return Err(SpectralError::InvalidConfig("max_iter must be >= 1".into()));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(SpectralError::InvalidConfig(format!(
                "tol must be a finite positive number (got {})",
                self.tol
            )));
        }
        Ok(())
    }
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            n_init: DEFAULT_N_INIT,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
        }
    }
}

/// Search range and diagnostics of the cluster-count selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Smallest candidate k (inclusive).
    pub k_min: usize,
    /// Largest candidate k (inclusive); clamped to `n_documents - 1`.
    pub k_max: usize,
    /// Also report the Laplacian eigengap suggestion.
    pub eigengap: bool,
}

impl SelectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, k_min: usize, k_max: usize) -> Self {
        self.k_min = k_min;
        self.k_max = k_max;
        self
    }

    pub fn with_eigengap(mut self, eigengap: bool) -> Self {
        self.eigengap = eigengap;
        self
    }

    pub fn validate(&self) -> Result<(), SpectralError> {
        if self.k_min < 2 {
            return Err(SpectralError::InvalidConfig(format!(
                "k_min must be >= 2 (got {})",
                self.k_min
            )));
        }
        if self.k_max < self.k_min {
            return Err(SpectralError::InvalidConfig(format!(
                "k_max ({}) must be >= k_min ({})",
                self.k_max, self.k_min
            )));
        }
        Ok(())
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            k_min: DEFAULT_K_MIN,
            k_max: DEFAULT_K_MAX,
            eigengap: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectral_defaults() {
        let cfg = SpectralConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.n_init, 10);
        assert_eq!(cfg.max_iter, 300);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn spectral_builder_chain() {
        let cfg = SpectralConfig::new()
            .with_seed(7)
            .with_n_init(3)
            .with_max_iter(50)
            .with_tol(1e-6);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.n_init, 3);
        assert_eq!(cfg.max_iter, 50);
        assert_eq!(cfg.tol, 1e-6);
    }

    #[test]
    fn spectral_invalid_values() {
        assert!(SpectralConfig::new().with_n_init(0).validate().is_err());
        assert!(SpectralConfig::new().with_max_iter(0).validate().is_err());
        assert!(SpectralConfig::new().with_tol(f64::NAN).validate().is_err());
        assert!(SpectralConfig::new().with_tol(0.0).validate().is_err());
    }

    #[test]
    fn selector_defaults_and_validation() {
        let cfg = SelectorConfig::default();
        assert_eq!((cfg.k_min, cfg.k_max), (2, 15));
        assert!(cfg.eigengap);
        assert!(cfg.validate().is_ok());
        assert!(SelectorConfig::new().with_range(1, 5).validate().is_err());
        assert!(SelectorConfig::new().with_range(6, 5).validate().is_err());
        assert!(SelectorConfig::new().with_range(3, 3).validate().is_ok());
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = SpectralConfig::new().with_seed(99);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SpectralConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
