//! Gaussian noise models attached to measurements
//!
//! Orientation initialization only needs the standard deviation of the
//! rotation component of a measurement. Isotropic and diagonal models expose
//! it directly; a full covariance couples rotation with translation and is
//! rejected rather than silently approximated.

use nalgebra::{DMatrix, DVector};

/// Noise model of a measurement
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseModel {
    /// Same standard deviation on every component
    Isotropic { dim: usize, sigma: f64 },
    /// Independent standard deviation per component
    Diagonal { sigmas: DVector<f64> },
    /// Full covariance matrix
    Gaussian { covariance: DMatrix<f64> },
}

impl NoiseModel {
    pub fn isotropic(dim: usize, sigma: f64) -> Self {
        Self::Isotropic { dim, sigma }
    }

    pub fn from_sigmas(sigmas: &[f64]) -> Self {
        Self::Diagonal {
            sigmas: DVector::from_column_slice(sigmas),
        }
    }

    pub fn from_variances(variances: &[f64]) -> Self {
        Self::Diagonal {
            sigmas: DVector::from_iterator(variances.len(), variances.iter().map(|v| v.sqrt())),
        }
    }

    pub fn from_covariance(covariance: DMatrix<f64>) -> Self {
        Self::Gaussian { covariance }
    }

    /// Dimension of the measurement this model applies to
    pub fn dim(&self) -> usize {
        match self {
            NoiseModel::Isotropic { dim, .. } => *dim,
            NoiseModel::Diagonal { sigmas } => sigmas.len(),
            NoiseModel::Gaussian { covariance } => covariance.nrows(),
        }
    }

    /// Standard deviation of component `index`
    ///
    /// Returns a description of the problem when the model cannot be reduced
    /// to a single positive standard deviation for that component.
    pub fn sigma(&self, index: usize) -> std::result::Result<f64, String> {
        let sigma = match self {
            NoiseModel::Isotropic { dim, sigma } => {
                if index >= *dim {
                    return Err(format!("component {} out of range for dimension {}", index, dim));
                }
                *sigma
            }
            NoiseModel::Diagonal { sigmas } => match sigmas.get(index) {
                Some(sigma) => *sigma,
                None => {
                    return Err(format!(
                        "component {} out of range for dimension {}",
                        index,
                        sigmas.len()
                    ))
                }
            },
            NoiseModel::Gaussian { .. } => {
                return Err("only isotropic or diagonal noise models are supported".to_string())
            }
        };

        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(format!("standard deviation {} is not positive and finite", sigma));
        }
        Ok(sigma)
    }
}
