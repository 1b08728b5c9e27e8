//! Model serialization and persistence
//!
//! Saves a trained model as JSON — the four model artifacts plus the kernel
//! description and training metadata — and reconstructs a ready predictor
//! from the file.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::core::{Result, SvmError};
use crate::kernel::{Kernel, KernelSpec};
use crate::trainer::{DualSvm, TrainedModel};

/// Serializable representation of a trained SVM model
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Kernel description, sufficient to rebuild the kernel
    pub kernel: KernelSpec,
    /// Support vector rows
    pub support_vectors: Vec<Vec<f64>>,
    /// Labels of the support vectors
    pub support_vector_labels: Vec<f64>,
    /// Multipliers of the support vectors
    pub weights: Vec<f64>,
    /// Bias term
    pub bias: f64,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of support vectors
    pub n_support_vectors: usize,
    /// Regularization parameter used in training
    pub c: f64,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableModel {
    /// Create a serializable model from a trained model and its kernel spec
    pub fn from_model(kernel: KernelSpec, c: f64, model: &TrainedModel) -> Self {
        let support_vectors = model
            .support_vectors()
            .outer_iter()
            .map(|row| row.to_vec())
            .collect();
        Self {
            kernel,
            support_vectors,
            support_vector_labels: model.support_vector_labels().to_vec(),
            weights: model.weights().to_vec(),
            bias: model.bias(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_support_vectors: model.n_support_vectors(),
                c,
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SvmError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SvmError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SvmError::IoError)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| SvmError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Reconstruct a ready-to-predict classifier from the stored artifacts
    pub fn into_classifier(self) -> Result<DualSvm<Box<dyn Kernel>>> {
        let kernel = self.kernel.build()?;
        let n = self.support_vectors.len();
        let dim = self.support_vectors.first().map_or(0, |row| row.len());

        let mut support_vectors = Array2::zeros((n, dim));
        for (i, row) in self.support_vectors.iter().enumerate() {
            if row.len() != dim {
                return Err(SvmError::SerializationError(
                    "support vector rows have inconsistent widths".to_string(),
                ));
            }
            for (j, &value) in row.iter().enumerate() {
                support_vectors[[i, j]] = value;
            }
        }

        let model = TrainedModel::from_parts(
            self.bias,
            Array1::from(self.weights),
            support_vectors,
            Array1::from(self.support_vector_labels),
        )?;

        let mut svm = DualSvm::new(kernel, self.metadata.c)?;
        svm.restore(model);
        Ok(svm)
    }

    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== SVM Model Summary ===");
        println!("Kernel: {}", self.kernel.name());
        println!("Support Vectors: {}", self.metadata.n_support_vectors);
        println!("Bias: {:.6}", self.bias);
        println!("C: {}", self.metadata.c);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
    }
}
