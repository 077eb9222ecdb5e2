// Dataset assembly
//
// Reads every FASTA file in one directory, encodes each record into an
// aligned feature vector, and partitions records into train/test sets by
// file order: the first N files feed the training set, the next M the test
// set, any remainder is unused.
//
// Directory listing order is platform-dependent, so the split boundary is
// pinned to lexicographic filename order to keep runs reproducible. The
// split is deliberately not randomized.

use crate::encode::{encode_record, EncodeOpt};
use crate::fasta_reader::FastaReader;
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Encoded records: one feature row and one label per record, in arrival order
#[derive(Debug)]
pub struct Dataset {
    /// records x feature_len matrix
    pub features: Array2<f32>,
    /// expression labels, parallel to the feature rows
    pub labels: Array1<f32>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of records carrying label 1
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1.0).count()
    }
}

fn is_fasta_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    name.ends_with(".fa")
        || name.ends_with(".fasta")
        || name.ends_with(".fa.gz")
        || name.ends_with(".fasta.gz")
}

/// List FASTA files in a directory, sorted by filename
pub fn list_fasta_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("reading directory {}", dir.display()))?
            .path();
        if path.is_file() && is_fasta_path(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Encode all records from the given files, preserving record order.
///
/// Encoding fails fast: the first malformed header or unknown symbol aborts
/// the whole load with the offending record identified in the error chain.
pub fn load_files(paths: &[PathBuf], opt: &EncodeOpt) -> Result<Dataset> {
    let mut raw: Vec<(String, Vec<u8>, PathBuf)> = Vec::new();
    for path in paths {
        let mut reader = FastaReader::new(path)
            .with_context(|| format!("opening FASTA file {}", path.display()))?;
        let mut count = 0usize;
        while let Some(record) = reader
            .read_record()
            .with_context(|| format!("parsing FASTA file {}", path.display()))?
        {
            let header = FastaReader::full_header(&record);
            raw.push((header, record.seq().to_vec(), path.clone()));
            count += 1;
        }
        log::debug!("{}: {} records", path.display(), count);
    }

    // encode_record is pure, so records encode in parallel; collect
    // preserves arrival order and surfaces the first error.
    let encoded: Vec<(Vec<f32>, i32)> = raw
        .par_iter()
        .map(|(header, seq, path)| {
            encode_record(header, seq, opt)
                .with_context(|| format!("encoding record from {}", path.display()))
        })
        .collect::<Result<_>>()?;

    let n = encoded.len();
    let mut flat = Vec::with_capacity(n * opt.feature_len);
    let mut labels = Vec::with_capacity(n);
    for (features, label) in encoded {
        flat.extend_from_slice(&features);
        labels.push(label as f32);
    }

    let features = Array2::from_shape_vec((n, opt.feature_len), flat)
        .context("assembling feature matrix")?;

    Ok(Dataset {
        features,
        labels: Array1::from_vec(labels),
    })
}

/// Load train and test datasets from one directory.
///
/// The first `n_train_files` files (sorted) become the training set, the
/// next `n_test_files` the test set. Files past the boundary are ignored.
pub fn load_split(
    dir: &Path,
    opt: &EncodeOpt,
    n_train_files: usize,
    n_test_files: usize,
) -> Result<(Dataset, Dataset)> {
    let files = list_fasta_files(dir)?;
    if files.len() < n_train_files + n_test_files {
        bail!(
            "directory {} has {} FASTA files, but the split needs {} (train) + {} (test)",
            dir.display(),
            files.len(),
            n_train_files,
            n_test_files
        );
    }
    if files.len() > n_train_files + n_test_files {
        log::warn!(
            "{} FASTA files beyond the train/test boundary are unused",
            files.len() - n_train_files - n_test_files
        );
    }

    let train = load_files(&files[..n_train_files], opt)?;
    let test = load_files(&files[n_train_files..n_train_files + n_test_files], opt)?;

    log::info!(
        "Loaded {} training records ({} positive) from {} files",
        train.len(),
        train.positives(),
        n_train_files
    );
    log::info!(
        "Loaded {} test records ({} positive) from {} files",
        test.len(),
        test.positives(),
        n_test_files
    );

    Ok((train, test))
}

#[path = "dataset_test.rs"]
mod dataset_test;
