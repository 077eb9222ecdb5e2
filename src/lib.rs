pub mod dataset; // Directory iteration, accumulation, train/test split
pub mod defaults;
pub mod encode; // One-hot encoding and fixed-length alignment
pub mod fasta_reader; // FASTA reading with gzip/BGZF auto-detection
pub mod logistic; // Logistic regression classifier
pub mod metrics; // Confusion matrix and derived scores
pub mod network; // Feed-forward classifier
pub mod record; // Pipe-delimited header metadata
pub mod train; // Pipeline orchestration
