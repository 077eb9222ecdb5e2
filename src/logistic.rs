//! Logistic regression for binary expression labels
//!
//! Batch gradient descent over the encoded feature matrix. Weights start at
//! zero, so fitting is fully deterministic.

use ndarray::{Array1, Array2};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogisticRegressionError {
    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("dimension mismatch: model expects {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("feature matrix has {rows} rows but label vector has {labels} entries")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("cannot fit on an empty dataset")]
    EmptyInput,
}

/// Logistic regression classifier
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Fitted coefficients, one per feature
    pub weights: Option<Array1<f32>>,
    /// Fitted intercept
    pub intercept: Option<f32>,
    /// Log-loss after each gradient step
    pub cost_history: Vec<f32>,
    learning_rate: f32,
    max_iter: usize,
    tolerance: f32,
}

/// Numerically stable sigmoid
#[inline]
pub fn sigmoid(z: f32) -> f32 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Binary cross-entropy with clamped probabilities
pub fn log_loss(y_true: &Array1<f32>, y_prob: &Array1<f32>) -> f32 {
    const EPS: f32 = 1e-7;
    let n = y_true.len() as f32;
    let sum: f32 = y_true
        .iter()
        .zip(y_prob.iter())
        .map(|(&y, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            y * p.ln() + (1.0 - y) * (1.0 - p).ln()
        })
        .sum();
    -sum / n
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(
            crate::defaults::LEARNING_RATE,
            crate::defaults::EPOCHS,
            crate::defaults::TOLERANCE,
        )
    }
}

impl LogisticRegression {
    pub fn new(learning_rate: f32, max_iter: usize, tolerance: f32) -> Self {
        LogisticRegression {
            weights: None,
            intercept: None,
            cost_history: Vec::new(),
            learning_rate,
            max_iter,
            tolerance,
        }
    }

    /// Fit with full-batch gradient descent.
    ///
    /// Stops early once the log-loss improvement drops below the tolerance.
    pub fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &Array1<f32>,
    ) -> Result<(), LogisticRegressionError> {
        if x.nrows() != y.len() {
            return Err(LogisticRegressionError::LengthMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(LogisticRegressionError::EmptyInput);
        }

        let n = x.nrows() as f32;
        let mut weights = Array1::<f32>::zeros(x.ncols());
        let mut intercept = 0.0f32;
        let mut prev_loss = f32::INFINITY;
        self.cost_history.clear();

        for iter in 0..self.max_iter {
            let z = x.dot(&weights) + intercept;
            let probs = z.mapv(sigmoid);
            let residual = &probs - y;

            let grad_w = x.t().dot(&residual) / n;
            let grad_b = residual.sum() / n;
            weights.scaled_add(-self.learning_rate, &grad_w);
            intercept -= self.learning_rate * grad_b;

            let loss = log_loss(y, &probs);
            self.cost_history.push(loss);
            if (prev_loss - loss).abs() < self.tolerance {
                log::debug!("logistic regression converged after {} iterations", iter + 1);
                break;
            }
            prev_loss = loss;
        }

        self.weights = Some(weights);
        self.intercept = Some(intercept);
        Ok(())
    }

    /// Predicted probability of label 1 for each row
    pub fn predict_proba(
        &self,
        x: &Array2<f32>,
    ) -> Result<Array1<f32>, LogisticRegressionError> {
        let weights = self
            .weights
            .as_ref()
            .ok_or(LogisticRegressionError::NotFitted)?;
        let intercept = self.intercept.ok_or(LogisticRegressionError::NotFitted)?;
        if x.ncols() != weights.len() {
            return Err(LogisticRegressionError::DimensionMismatch {
                expected: weights.len(),
                got: x.ncols(),
            });
        }
        Ok((x.dot(weights) + intercept).mapv(sigmoid))
    }

    /// Hard 0/1 predictions at a 0.5 threshold
    pub fn predict(&self, x: &Array2<f32>) -> Result<Array1<f32>, LogisticRegressionError> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}
