//! Small feed-forward network for binary expression labels
//!
//! One ReLU hidden layer and a sigmoid output unit, trained with minibatch
//! SGD on binary cross-entropy. Weights use Xavier initialization from a
//! seeded RNG, so training is deterministic for a given seed.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("dimension mismatch: network expects {expected} inputs, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("feature matrix has {rows} rows but label vector has {labels} entries")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("cannot train on an empty dataset")]
    EmptyInput,
}

fn xavier_weights(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f32> {
    let std_dev = (2.0 / (rows + cols) as f32).sqrt();
    let normal = Normal::new(0.0, std_dev).expect("standard deviation is positive");
    Array2::from_shape_fn((rows, cols), |_| normal.sample(rng))
}

/// Feed-forward classifier: input -> hidden (ReLU) -> sigmoid
pub struct Network {
    /// hidden x input weights
    w1: Array2<f32>,
    /// hidden biases
    b1: Array1<f32>,
    /// output weights, one per hidden unit
    w2: Array1<f32>,
    /// output bias
    b2: f32,
    input_size: usize,
    /// Mean training loss per epoch
    pub loss_history: Vec<f32>,
}

impl Network {
    pub fn new(input_size: usize, hidden_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let w1 = xavier_weights(hidden_size, input_size, &mut rng);
        let w2 = xavier_weights(1, hidden_size, &mut rng).row(0).to_owned();
        Network {
            w1,
            b1: Array1::zeros(hidden_size),
            w2,
            b2: 0.0,
            input_size,
            loss_history: Vec::new(),
        }
    }

    fn check_features(&self, x: &Array2<f32>) -> Result<(), NetworkError> {
        if x.ncols() != self.input_size {
            return Err(NetworkError::DimensionMismatch {
                expected: self.input_size,
                got: x.ncols(),
            });
        }
        Ok(())
    }

    // Forward pass for a batch; returns hidden pre-activations, hidden
    // activations, and output probabilities (all needed for backprop).
    fn forward(&self, x: &Array2<f32>) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
        let z1 = x.dot(&self.w1.t()) + &self.b1;
        let a1 = z1.mapv(|v| v.max(0.0));
        let z2 = a1.dot(&self.w2) + self.b2;
        let probs = z2.mapv(crate::logistic::sigmoid);
        (z1, a1, probs)
    }

    /// Train with minibatch SGD.
    ///
    /// Minibatches are drawn in a freshly shuffled order each epoch from the
    /// network's own seeded RNG stream.
    pub fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &Array1<f32>,
        epochs: usize,
        batch_size: usize,
        learning_rate: f32,
        seed: u64,
    ) -> Result<(), NetworkError> {
        self.check_features(x)?;
        if x.nrows() != y.len() {
            return Err(NetworkError::LengthMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(NetworkError::EmptyInput);
        }

        let batch_size = batch_size.max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        self.loss_history.clear();

        for epoch in 0..epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0f32;
            let mut batches = 0usize;

            for chunk in order.chunks(batch_size) {
                let xb = x.select(Axis(0), chunk);
                let yb = y.select(Axis(0), chunk);
                let m = chunk.len() as f32;

                let (z1, a1, probs) = self.forward(&xb);
                epoch_loss += crate::logistic::log_loss(&yb, &probs);
                batches += 1;

                // output layer gradients
                let dz2 = (&probs - &yb) / m;
                let dw2 = a1.t().dot(&dz2);
                let db2 = dz2.sum();

                // hidden layer gradients through the ReLU mask
                let da1 = dz2
                    .view()
                    .insert_axis(Axis(1))
                    .dot(&self.w2.view().insert_axis(Axis(0)));
                let dz1 = &da1 * &z1.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
                let dw1 = dz1.t().dot(&xb);
                let db1 = dz1.sum_axis(Axis(0));

                self.w2.scaled_add(-learning_rate, &dw2);
                self.b2 -= learning_rate * db2;
                self.w1.scaled_add(-learning_rate, &dw1);
                self.b1.scaled_add(-learning_rate, &db1);
            }

            let mean_loss = epoch_loss / batches as f32;
            self.loss_history.push(mean_loss);
            if epoch % 50 == 0 {
                log::debug!("epoch {}: mean loss {:.6}", epoch, mean_loss);
            }
        }

        Ok(())
    }

    /// Predicted probability of label 1 for each row
    pub fn predict_proba(&self, x: &Array2<f32>) -> Result<Array1<f32>, NetworkError> {
        self.check_features(x)?;
        let (_, _, probs) = self.forward(x);
        Ok(probs)
    }

    /// Hard 0/1 predictions at a 0.5 threshold
    pub fn predict(&self, x: &Array2<f32>) -> Result<Array1<f32>, NetworkError> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_deterministic_forward() {
        let a = Network::new(8, 4, 7);
        let b = Network::new(8, 4, 7);
        let x = Array2::from_shape_fn((3, 8), |(i, j)| (i + j) as f32 * 0.1);
        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }

    #[test]
    fn test_fit_separable() {
        // two well-separated clusters on one feature
        let x = array![
            [1.0, 0.0],
            [0.9, 0.1],
            [1.1, -0.1],
            [-1.0, 0.0],
            [-0.9, 0.1],
            [-1.1, -0.1]
        ];
        let y = array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0];

        let mut net = Network::new(2, 8, 42);
        net.fit(&x, &y, 500, 2, 0.1, 42).unwrap();

        let first = net.loss_history.first().copied().unwrap();
        let last = net.loss_history.last().copied().unwrap();
        assert!(last < first, "loss should decrease: {} -> {}", first, last);
        assert_eq!(net.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_input_size_mismatch() {
        let net = Network::new(4, 2, 1);
        let x = array![[1.0, 2.0]];
        assert!(matches!(
            net.predict_proba(&x),
            Err(NetworkError::DimensionMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn test_empty_input() {
        let mut net = Network::new(2, 2, 1);
        let x = Array2::<f32>::zeros((0, 2));
        let y = Array1::<f32>::zeros(0);
        assert!(matches!(
            net.fit(&x, &y, 10, 4, 0.1, 1),
            Err(NetworkError::EmptyInput)
        ));
    }
}
