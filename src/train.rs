// Pipeline orchestration
//
// Loads the train/test split from a FASTA directory, fits the selected
// classifier on the encoded feature matrix, and reports metrics on both
// splits. Also provides the TSV dump used to hand the encoded matrix to
// external tooling.

use crate::dataset::{self, Dataset};
use crate::encode::EncodeOpt;
use crate::logistic::LogisticRegression;
use crate::metrics::ClassificationMetrics;
use crate::network::Network;
use anyhow::{Context, Result};
use ndarray::Array1;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Classifier selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Logistic,
    Mlp,
}

/// Training hyperparameters
#[derive(Debug, Clone)]
pub struct TrainOpt {
    pub epochs: usize,
    pub learning_rate: f32,
    pub tolerance: f32,
    pub hidden_size: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for TrainOpt {
    fn default() -> Self {
        TrainOpt {
            epochs: crate::defaults::EPOCHS,
            learning_rate: crate::defaults::LEARNING_RATE,
            tolerance: crate::defaults::TOLERANCE,
            hidden_size: crate::defaults::HIDDEN_SIZE,
            batch_size: crate::defaults::BATCH_SIZE,
            seed: crate::defaults::SEED,
        }
    }
}

fn report(split: &str, dataset: &Dataset, probs: &Array1<f32>) {
    let metrics = ClassificationMetrics::from_predictions(&dataset.labels, probs);
    log::info!("{} set: {}", split, metrics.summary());
}

/// Load, fit and evaluate.
pub fn main_train(
    data_dir: &Path,
    encode_opt: &EncodeOpt,
    n_train_files: usize,
    n_test_files: usize,
    model: ModelKind,
    opt: &TrainOpt,
) -> Result<()> {
    let (train, test) = dataset::load_split(data_dir, encode_opt, n_train_files, n_test_files)?;
    log::info!(
        "Feature matrix: {} x {} (train), {} x {} (test)",
        train.features.nrows(),
        train.features.ncols(),
        test.features.nrows(),
        test.features.ncols()
    );

    match model {
        ModelKind::Logistic => {
            log::info!(
                "Fitting logistic regression: lr {}, max {} iterations",
                opt.learning_rate,
                opt.epochs
            );
            let mut model =
                LogisticRegression::new(opt.learning_rate, opt.epochs, opt.tolerance);
            model
                .fit(&train.features, &train.labels)
                .context("fitting logistic regression")?;
            if let Some(loss) = model.cost_history.last() {
                log::info!("Final training loss: {:.6}", loss);
            }
            report("Training", &train, &model.predict_proba(&train.features)?);
            report("Test", &test, &model.predict_proba(&test.features)?);
        }
        ModelKind::Mlp => {
            log::info!(
                "Fitting feed-forward network: {} hidden units, lr {}, {} epochs, batch {}",
                opt.hidden_size,
                opt.learning_rate,
                opt.epochs,
                opt.batch_size
            );
            let mut net = Network::new(encode_opt.feature_len, opt.hidden_size, opt.seed);
            net.fit(
                &train.features,
                &train.labels,
                opt.epochs,
                opt.batch_size,
                opt.learning_rate,
                opt.seed,
            )
            .context("training feed-forward network")?;
            if let Some(loss) = net.loss_history.last() {
                log::info!("Final training loss: {:.6}", loss);
            }
            report("Training", &train, &net.predict_proba(&train.features)?);
            report("Test", &test, &net.predict_proba(&test.features)?);
        }
    }

    Ok(())
}

/// Encode every FASTA file in a directory and dump the matrix as TSV.
///
/// One row per record: the label, then the feature entries.
pub fn main_encode(data_dir: &Path, output: Option<&Path>, encode_opt: &EncodeOpt) -> Result<()> {
    let files = dataset::list_fasta_files(data_dir)?;
    anyhow::ensure!(
        !files.is_empty(),
        "no FASTA files found in {}",
        data_dir.display()
    );
    let data = dataset::load_files(&files, encode_opt)?;
    log::info!(
        "Encoded {} records ({} positive) from {} files",
        data.len(),
        data.positives(),
        files.len()
    );

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("creating output file {}", path.display())
        })?)),
        None => Box::new(io::stdout()),
    };

    for (row, &label) in data.features.rows().into_iter().zip(data.labels.iter()) {
        write!(writer, "{}", label as i32)?;
        for value in row.iter() {
            write!(writer, "\t{}", value)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(())
}
