// End-to-end pipeline tests: FASTA directory -> encoded split -> classifier

use seqexpr::dataset::load_split;
use seqexpr::encode::EncodeOpt;
use seqexpr::logistic::LogisticRegression;
use seqexpr::metrics::ClassificationMetrics;
use seqexpr::network::Network;
use seqexpr::train::{main_encode, main_train, ModelKind, TrainOpt};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn setup_test_dir(test_name: &str) -> io::Result<PathBuf> {
    let temp_dir = PathBuf::from(format!("target/test_pipeline_{test_name}"));
    if temp_dir.exists() {
        fs::remove_dir_all(&temp_dir)?;
    }
    fs::create_dir_all(&temp_dir)?;
    Ok(temp_dir)
}

fn cleanup_test_dir(temp_dir: &Path) {
    if temp_dir.exists() {
        if let Err(e) = fs::remove_dir_all(temp_dir) {
            eprintln!(
                "Failed to clean up test directory {}: {}",
                temp_dir.display(),
                e
            );
        }
    }
}

// Expressed records are poly-A, silent records are poly-T: trivially
// separable, so both classifiers must fit the training set exactly.
fn write_toy_dataset(dir: &Path) -> io::Result<()> {
    let make_file = |name: &str, start: usize| {
        let mut content = String::new();
        for i in start..start + 4 {
            if i % 2 == 0 {
                content.push_str(&format!(">on_{i}|1|region|+\n{}\n", "A".repeat(40)));
            } else {
                content.push_str(&format!(">off_{i}|0|region|+\n{}\n", "T".repeat(40)));
            }
        }
        fs::write(dir.join(name), content)
    };
    make_file("01_first.fa", 0)?;
    make_file("02_second.fa", 4)?;
    make_file("03_third.fa", 8)?;
    Ok(())
}

fn toy_opt() -> EncodeOpt {
    EncodeOpt {
        feature_len: 160, // 40 bases
        strand_correction: false,
    }
}

#[test]
fn test_logistic_end_to_end() -> io::Result<()> {
    let dir = setup_test_dir("logistic")?;
    write_toy_dataset(&dir)?;

    let (train, test) = load_split(&dir, &toy_opt(), 2, 1).unwrap();
    assert_eq!(train.len(), 8);
    assert_eq!(test.len(), 4);

    let mut model = LogisticRegression::new(0.5, 500, 1e-9);
    model.fit(&train.features, &train.labels).unwrap();

    let train_metrics = ClassificationMetrics::from_predictions(
        &train.labels,
        &model.predict_proba(&train.features).unwrap(),
    );
    let test_metrics = ClassificationMetrics::from_predictions(
        &test.labels,
        &model.predict_proba(&test.features).unwrap(),
    );
    assert_eq!(train_metrics.accuracy, 1.0);
    assert_eq!(test_metrics.accuracy, 1.0);

    cleanup_test_dir(&dir);
    Ok(())
}

#[test]
fn test_network_end_to_end() -> io::Result<()> {
    let dir = setup_test_dir("network")?;
    write_toy_dataset(&dir)?;

    let (train, test) = load_split(&dir, &toy_opt(), 2, 1).unwrap();

    let mut net = Network::new(160, 8, 11);
    net.fit(&train.features, &train.labels, 300, 4, 0.1, 11)
        .unwrap();

    let first = net.loss_history.first().copied().unwrap();
    let last = net.loss_history.last().copied().unwrap();
    assert!(last < first, "loss should decrease: {first} -> {last}");

    let test_metrics = ClassificationMetrics::from_predictions(
        &test.labels,
        &net.predict_proba(&test.features).unwrap(),
    );
    assert_eq!(test_metrics.accuracy, 1.0);

    cleanup_test_dir(&dir);
    Ok(())
}

#[test]
fn test_main_train_runs() -> io::Result<()> {
    let dir = setup_test_dir("main_train")?;
    write_toy_dataset(&dir)?;

    let train_opt = TrainOpt {
        epochs: 100,
        learning_rate: 0.5,
        ..TrainOpt::default()
    };
    main_train(&dir, &toy_opt(), 2, 1, ModelKind::Logistic, &train_opt).unwrap();

    cleanup_test_dir(&dir);
    Ok(())
}

#[test]
fn test_encode_dump_tsv() -> io::Result<()> {
    let dir = setup_test_dir("encode_dump")?;
    fs::write(
        dir.join("data.fa"),
        ">r1|1|region|+\nACG\n>r2|0|region|+\nTT\n",
    )?;

    let out = dir.join("matrix.tsv");
    let opt = EncodeOpt {
        feature_len: 12,
        strand_correction: false,
    };
    main_encode(&dir, Some(&out), &opt).unwrap();

    let dump = fs::read_to_string(&out)?;
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "1\t1\t0\t0\t0\t0\t1\t0\t0\t0\t0\t1\t0");
    assert_eq!(lines[1], "0\t0\t0\t0\t1\t0\t0\t0\t1\t0\t0\t0\t0");

    cleanup_test_dir(&dir);
    Ok(())
}

#[test]
fn test_strand_correction_changes_features() -> io::Result<()> {
    let dir = setup_test_dir("strand")?;
    fs::write(dir.join("data.fa"), ">r1|1|region|-\nAACG\n")?;

    let plain = EncodeOpt {
        feature_len: 16,
        strand_correction: false,
    };
    let corrected = EncodeOpt {
        feature_len: 16,
        strand_correction: true,
    };

    let files = seqexpr::dataset::list_fasta_files(&dir).unwrap();
    let as_given = seqexpr::dataset::load_files(&files, &plain).unwrap();
    let normalized = seqexpr::dataset::load_files(&files, &corrected).unwrap();

    // AACG as given
    assert_eq!(
        as_given.features.row(0).to_vec(),
        vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    );
    // CGTT after reverse complement
    assert_eq!(
        normalized.features.row(0).to_vec(),
        vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
    );

    cleanup_test_dir(&dir);
    Ok(())
}
