//! Hyperparameter sweep driver
//!
//! Replaces ad hoc tuning loops with an explicit driver: each trial gets its
//! own immutable configuration and a fresh trainer, and the report keeps
//! every outcome rather than a running best-so-far.

use log::{info, warn};

use crate::api::accuracy;
use crate::core::{Dataset, Result, SvmError};
use crate::kernel::KernelSpec;
use crate::trainer::DualSvm;

/// A single sweep trial: kernel choice plus regularization parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TrialConfig {
    pub kernel: KernelSpec,
    pub c: f64,
}

/// Outcome of one completed trial
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub config: TrialConfig,
    pub train_accuracy: f64,
    pub validation_accuracy: f64,
    pub n_support_vectors: usize,
}

/// All completed trials, ordered as configured
#[derive(Debug)]
pub struct SweepReport {
    trials: Vec<TrialOutcome>,
    best: usize,
}

impl SweepReport {
    /// The trial with the highest validation accuracy (earliest wins ties)
    pub fn best(&self) -> &TrialOutcome {
        &self.trials[self.best]
    }

    /// All completed trials
    pub fn trials(&self) -> &[TrialOutcome] {
        &self.trials
    }
}

/// The default C grid: powers of ten from 1e-2 to 1e2
pub fn default_c_grid() -> Vec<f64> {
    (-2..=2).map(|exponent| 10f64.powi(exponent)).collect()
}

/// Cross every kernel spec with every C value
pub fn grid(kernels: &[KernelSpec], c_values: &[f64]) -> Vec<TrialConfig> {
    kernels
        .iter()
        .flat_map(|kernel| {
            c_values.iter().map(move |&c| TrialConfig {
                kernel: kernel.clone(),
                c,
            })
        })
        .collect()
}

/// Train one model per configuration and rank them by validation accuracy.
///
/// A trial whose fit fails (solver breakdown, degenerate margin) is logged
/// and skipped; the sweep fails only when every trial does, or when a
/// configuration is malformed.
pub fn run_sweep<D: Dataset>(
    train: &D,
    validation: &D,
    configs: &[TrialConfig],
) -> Result<SweepReport> {
    let mut trials: Vec<TrialOutcome> = Vec::with_capacity(configs.len());
    let mut best: Option<usize> = None;

    for config in configs {
        let kernel = config.kernel.build()?;
        let mut svm = DualSvm::new(kernel, config.c)?;
        if let Err(err) = svm.fit(train.features(), train.labels()) {
            warn!(
                "sweep trial skipped (kernel {}, C = {}): {err}",
                config.kernel.name(),
                config.c
            );
            continue;
        }

        let train_accuracy = accuracy(svm.predict(train.features())?.view(), train.labels());
        let validation_accuracy = accuracy(
            svm.predict(validation.features())?.view(),
            validation.labels(),
        );
        let n_support_vectors = svm
            .diagnostics()
            .map_or(0, |diagnostics| diagnostics.n_support_vectors);
        info!(
            "sweep trial: kernel {}, C = {}, train {:.4}, validation {:.4}, {} SVs",
            config.kernel.name(),
            config.c,
            train_accuracy,
            validation_accuracy,
            n_support_vectors
        );

        trials.push(TrialOutcome {
            config: config.clone(),
            train_accuracy,
            validation_accuracy,
            n_support_vectors,
        });
        let index = trials.len() - 1;
        if best.map_or(true, |b| {
            trials[index].validation_accuracy > trials[b].validation_accuracy
        }) {
            best = Some(index);
        }
    }

    match best {
        Some(best) => Ok(SweepReport { trials, best }),
        None => Err(SvmError::NumericalError(
            "every sweep trial failed".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DenseDataset;
    use ndarray::array;

    fn toy_dataset() -> DenseDataset {
        DenseDataset::new(
            array![
                [2.0, 2.0],
                [3.0, 3.0],
                [3.0, 2.0],
                [0.0, 0.0],
                [0.0, 1.0],
                [1.0, 0.0],
            ],
            array![1.0, 1.0, 1.0, -1.0, -1.0, -1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_default_c_grid() {
        assert_eq!(default_c_grid(), vec![0.01, 0.1, 1.0, 10.0, 100.0]);
    }

    #[test]
    fn test_grid_crosses_kernels_and_c() {
        let configs = grid(
            &[KernelSpec::Linear, KernelSpec::Gaussian { gamma: 1.0 }],
            &[0.1, 1.0],
        );
        assert_eq!(configs.len(), 4);
        assert_eq!(configs[0].kernel, KernelSpec::Linear);
        assert_eq!(configs[0].c, 0.1);
        assert_eq!(configs[3].kernel, KernelSpec::Gaussian { gamma: 1.0 });
        assert_eq!(configs[3].c, 1.0);
    }

    #[test]
    fn test_sweep_reports_all_trials_and_picks_best() {
        let dataset = toy_dataset();
        let configs = grid(&[KernelSpec::Linear], &default_c_grid());

        let report = run_sweep(&dataset, &dataset, &configs).unwrap();
        assert!(!report.trials().is_empty());

        let best = report.best();
        assert_eq!(best.validation_accuracy, 1.0);
        for trial in report.trials() {
            assert!(trial.validation_accuracy <= best.validation_accuracy);
        }
    }

    #[test]
    fn test_sweep_rejects_malformed_config() {
        let dataset = toy_dataset();
        let configs = vec![TrialConfig {
            kernel: KernelSpec::Gaussian { gamma: -1.0 },
            c: 1.0,
        }];
        assert!(run_sweep(&dataset, &dataset, &configs).is_err());
    }
}
