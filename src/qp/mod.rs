//! Dual-QP formulation and the external solver seam
//!
//! The SVM dual problem is assembled here in dense standard form; solving it
//! is delegated to an external convex QP solver behind the `QpSolver` trait.

pub mod clarabel;
pub mod problem;

pub use self::clarabel::*;
pub use self::problem::*;
