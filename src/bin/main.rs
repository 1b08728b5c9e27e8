//! dualsvm command line interface
//!
//! Train, evaluate and inspect dual-SVM models on CSV data, and sweep
//! hyperparameter grids.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dualsvm::persistence::SerializableModel;
use dualsvm::sweep::{self, TrialConfig};
use dualsvm::{Dataset, DenseDataset, DualSvm, KernelSpec, Result};
use env_logger::Env;
use log::{error, info};

#[derive(Parser)]
#[command(name = "dualsvm")]
#[command(about = "A dual-formulation Support Vector Machine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new SVM model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Sweep a hyperparameter grid
    Sweep(SweepArgs),
}

#[derive(Args)]
struct KernelArgs {
    /// Kernel function
    #[arg(long, value_enum, default_value = "linear")]
    kernel: CliKernel,

    /// Gamma for the gaussian kernel
    #[arg(long, default_value = "1.0")]
    gamma: f64,

    /// Degree for the polynomial kernel
    #[arg(long, default_value = "3")]
    degree: u32,

    /// Offset for the polynomial kernel
    #[arg(long, default_value = "1.0")]
    offset: f64,

    /// Slope for the sigmoid kernel
    #[arg(long, default_value = "0.01")]
    kappa: f64,

    /// Intercept for the sigmoid kernel
    #[arg(long, default_value = "0.0")]
    coef0: f64,
}

impl KernelArgs {
    fn to_spec(&self) -> KernelSpec {
        match self.kernel {
            CliKernel::Linear => KernelSpec::Linear,
            CliKernel::Gaussian => KernelSpec::Gaussian { gamma: self.gamma },
            CliKernel::Polynomial => KernelSpec::Polynomial {
                degree: self.degree,
                offset: self.offset,
            },
            CliKernel::Sigmoid => KernelSpec::Sigmoid {
                kappa: self.kappa,
                coef0: self.coef0,
            },
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum CliKernel {
    /// Dot product kernel
    Linear,
    /// exp(-gamma * ||x - y||^2)
    Gaussian,
    /// (offset + x^T y)^degree
    Polynomial,
    /// tanh(kappa * x^T y + coef0)
    Sigmoid,
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (CSV, last column is the label)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    #[command(flatten)]
    kernel: KernelArgs,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file (CSV)
    #[arg(long)]
    data: PathBuf,

    /// Show decision values alongside labels
    #[arg(long)]
    confidence: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file (CSV)
    #[arg(long)]
    data: PathBuf,

    /// Show detailed metrics
    #[arg(long)]
    detailed: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct SweepArgs {
    /// Training data file (CSV)
    #[arg(long)]
    train: PathBuf,

    /// Validation data file (CSV)
    #[arg(long)]
    validation: PathBuf,

    /// Comma-separated C values; defaults to powers of ten from 0.01 to 100
    #[arg(long, value_delimiter = ',')]
    c_grid: Option<Vec<f64>>,

    #[command(flatten)]
    kernel: KernelArgs,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Predict(args) => run_predict(args),
        Commands::Evaluate(args) => run_evaluate(args),
        Commands::Info(args) => run_info(args),
        Commands::Sweep(args) => run_sweep(args),
    };

    if let Err(err) = result {
        error!("{err}");
        process::exit(1);
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let dataset = DenseDataset::from_csv_file(&args.data)?;
    info!(
        "loaded {} examples with {} features",
        dataset.len(),
        dataset.dim()
    );

    let spec = args.kernel.to_spec();
    let mut svm = DualSvm::new(spec.build()?, args.c)?;
    svm.fit(dataset.features(), dataset.labels())?;

    let model = svm.model().ok_or(dualsvm::SvmError::NotFitted)?;
    if let Some(diagnostics) = svm.diagnostics() {
        println!("Support vectors: {}", diagnostics.n_support_vectors);
        println!(
            "Bias: {:.6} (std {:.6} over {} margin vectors)",
            diagnostics.bias.mean, diagnostics.bias.std_dev, diagnostics.bias.n_margin_vectors
        );
    }

    let train_accuracy = dualsvm::accuracy(
        svm.predict(dataset.features())?.view(),
        dataset.labels(),
    );
    println!("Training accuracy: {:.4}", train_accuracy);

    SerializableModel::from_model(spec, args.c, model).save_to_file(&args.output)?;
    println!("Model saved to {}", args.output.display());
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let svm = SerializableModel::load_from_file(&args.model)?.into_classifier()?;
    let dataset = DenseDataset::from_csv_file(&args.data)?;

    if args.confidence {
        let scores = svm.decision_function(dataset.features())?;
        for &score in scores.iter() {
            let label = if score >= 0.0 { 1.0 } else { -1.0 };
            println!("{label} {score:.6}");
        }
    } else {
        for &label in svm.predict(dataset.features())?.iter() {
            println!("{label}");
        }
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let svm = SerializableModel::load_from_file(&args.model)?.into_classifier()?;
    let dataset = DenseDataset::from_csv_file(&args.data)?;

    let predicted = svm.predict(dataset.features())?;
    let accuracy = dualsvm::accuracy(predicted.view(), dataset.labels());
    println!("Accuracy: {:.4}", accuracy);

    if args.detailed {
        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;
        for (&pred, &actual) in predicted.iter().zip(dataset.labels().iter()) {
            match (pred > 0.0, actual > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }
        println!("TP: {tp}  TN: {tn}  FP: {fp}  FN: {fn_}");
    }
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    SerializableModel::load_from_file(&args.model)?.print_summary();
    Ok(())
}

fn run_sweep(args: SweepArgs) -> Result<()> {
    let train = DenseDataset::from_csv_file(&args.train)?;
    let validation = DenseDataset::from_csv_file(&args.validation)?;

    let c_grid = args.c_grid.unwrap_or_else(sweep::default_c_grid);
    let configs: Vec<TrialConfig> = sweep::grid(&[args.kernel.to_spec()], &c_grid);

    let report = sweep::run_sweep(&train, &validation, &configs)?;
    println!("kernel      C        train    validation  SVs");
    for trial in report.trials() {
        println!(
            "{:<10}  {:<7}  {:.4}   {:.4}      {}",
            trial.config.kernel.name(),
            trial.config.c,
            trial.train_accuracy,
            trial.validation_accuracy,
            trial.n_support_vectors
        );
    }
    let best = report.best();
    println!(
        "best: kernel {}, C = {} (validation accuracy {:.4})",
        best.config.kernel.name(),
        best.config.c,
        best.validation_accuracy
    );
    Ok(())
}
