use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use seqexpr::encode::EncodeOpt;
use seqexpr::train::{self, ModelKind, TrainOpt};
use seqexpr::defaults;

#[derive(Parser)]
#[command(name = "seqexpr")]
#[command(about = "One-hot DNA sequence encoding and expression-label classification", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    /// Logistic regression (batch gradient descent)
    Logistic,
    /// Feed-forward network with one hidden layer
    Mlp,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Logistic => ModelKind::Logistic,
            ModelArg::Mlp => ModelKind::Mlp,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode FASTA records and dump the feature matrix as TSV
    Encode {
        /// Directory of FASTA files (headers carry id|label|...|strand)
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// Output file (default: stdout)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Feature vector length in numeric entries (4 per base)
        #[arg(short = 'l', long, value_name = "INT", default_value_t = defaults::FEATURE_LEN)]
        feature_len: usize,

        /// Reverse complement negative-strand records before encoding
        #[arg(short = 's', long)]
        strand_correction: bool,

        /// Verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace)
        #[arg(short = 'v', long, value_name = "INT", default_value_t = defaults::VERBOSITY)]
        verbosity: i32,
    },

    /// Train a classifier on encoded records and report metrics
    Train {
        /// Directory of FASTA files (headers carry id|label|...|strand)
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// Number of files (sorted by name) forming the training set
        #[arg(short = 'n', long, value_name = "INT")]
        train_files: usize,

        /// Number of files after the training files forming the test set
        #[arg(short = 'm', long, value_name = "INT")]
        test_files: usize,

        /// Feature vector length in numeric entries (4 per base)
        #[arg(short = 'l', long, value_name = "INT", default_value_t = defaults::FEATURE_LEN)]
        feature_len: usize,

        /// Reverse complement negative-strand records before encoding
        #[arg(short = 's', long)]
        strand_correction: bool,

        /// Classifier to fit
        #[arg(long, value_enum, default_value_t = ModelArg::Logistic)]
        model: ModelArg,

        /// Training epochs (gradient-descent iterations for logistic)
        #[arg(short = 'e', long, value_name = "INT", default_value_t = defaults::EPOCHS)]
        epochs: usize,

        /// Learning rate
        #[arg(short = 'r', long, value_name = "FLOAT", default_value_t = defaults::LEARNING_RATE)]
        learning_rate: f32,

        /// Hidden layer width (mlp only)
        #[arg(long, value_name = "INT", default_value_t = defaults::HIDDEN_SIZE)]
        hidden_size: usize,

        /// Minibatch size (mlp only)
        #[arg(short = 'b', long, value_name = "INT", default_value_t = defaults::BATCH_SIZE)]
        batch_size: usize,

        /// RNG seed for weight initialization and batch shuffling
        #[arg(long, value_name = "INT", default_value_t = defaults::SEED)]
        seed: u64,

        /// Number of encoder threads (default: all cores)
        #[arg(short = 't', long, value_name = "INT")]
        threads: Option<usize>,

        /// Verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace)
        #[arg(short = 'v', long, value_name = "INT", default_value_t = defaults::VERBOSITY)]
        verbosity: i32,
    },
}

// Map verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace) to log levels
fn init_logger(verbosity: i32) {
    let log_level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn configure_thread_pool(threads: Option<usize>) {
    let mut num_threads = threads.unwrap_or_else(num_cpus::get);
    if num_threads < 1 {
        log::warn!("Invalid thread count {}, using 1 thread", num_threads);
        num_threads = 1;
    }
    let max_threads = num_cpus::get() * 2;
    if num_threads > max_threads {
        log::warn!(
            "Thread count {} exceeds recommended maximum {}, capping at {}",
            num_threads,
            max_threads,
            max_threads
        );
        num_threads = max_threads;
    }

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        log::warn!(
            "Failed to configure thread pool: {} (may already be initialized)",
            e
        );
    }
    log::debug!("Using {} encoder threads", rayon::current_num_threads());
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            data_dir,
            output,
            feature_len,
            strand_correction,
            verbosity,
        } => {
            init_logger(verbosity);

            let encode_opt = EncodeOpt {
                feature_len,
                strand_correction,
            };
            log::info!("Encoding FASTA records from {}", data_dir.display());

            if let Err(e) = train::main_encode(&data_dir, output.as_deref(), &encode_opt) {
                log::error!("Encoding failed: {:#}", e);
                std::process::exit(1);
            }
        }

        Commands::Train {
            data_dir,
            train_files,
            test_files,
            feature_len,
            strand_correction,
            model,
            epochs,
            learning_rate,
            hidden_size,
            batch_size,
            seed,
            threads,
            verbosity,
        } => {
            init_logger(verbosity);
            configure_thread_pool(threads);

            let encode_opt = EncodeOpt {
                feature_len,
                strand_correction,
            };
            let train_opt = TrainOpt {
                epochs,
                learning_rate,
                tolerance: defaults::TOLERANCE,
                hidden_size,
                batch_size,
                seed,
            };

            log::info!("Training on FASTA records from {}", data_dir.display());
            if strand_correction {
                log::info!("Strand correction enabled (negative strands reverse-complemented)");
            }

            if let Err(e) = train::main_train(
                &data_dir,
                &encode_opt,
                train_files,
                test_files,
                model.into(),
                &train_opt,
            ) {
                log::error!("Training failed: {:#}", e);
                std::process::exit(1);
            }

            log::info!("Training completed successfully");
        }
    }
}
