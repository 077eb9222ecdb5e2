//! Classification metrics for the binary expression label

use ndarray::Array1;

/// Confusion matrix at a 0.5 threshold
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &Array1<f32>, y_prob: &Array1<f32>) -> Self {
        let mut cm = ConfusionMatrix {
            tp: 0,
            tn: 0,
            fp: 0,
            fn_: 0,
        };
        for (&t, &p) in y_true.iter().zip(y_prob.iter()) {
            match (t >= 0.5, p >= 0.5) {
                (true, true) => cm.tp += 1,
                (false, false) => cm.tn += 1,
                (false, true) => cm.fp += 1,
                (true, false) => cm.fn_ += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }
}

/// Accuracy, precision, recall and F1, with zero denominators reported as 0
#[derive(Debug, Clone)]
pub struct ClassificationMetrics {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

impl ClassificationMetrics {
    pub fn from_predictions(y_true: &Array1<f32>, y_prob: &Array1<f32>) -> Self {
        let cm = ConfusionMatrix::from_predictions(y_true, y_prob);
        let accuracy = ratio(cm.tp + cm.tn, cm.total());
        let precision = ratio(cm.tp, cm.tp + cm.fp);
        let recall = ratio(cm.tp, cm.tp + cm.fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        ClassificationMetrics {
            confusion: cm,
            accuracy,
            precision,
            recall,
            f1,
        }
    }

    /// One-line summary for the log
    pub fn summary(&self) -> String {
        format!(
            "accuracy {:.4}, precision {:.4}, recall {:.4}, F1 {:.4} (TP {} TN {} FP {} FN {})",
            self.accuracy,
            self.precision,
            self.recall,
            self.f1,
            self.confusion.tp,
            self.confusion.tn,
            self.confusion.fp,
            self.confusion.fn_
        )
    }
}
