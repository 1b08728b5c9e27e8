//! Kernel functions for SVM

pub mod gaussian;
pub mod gram;
pub mod linear;
pub mod polynomial;
pub mod sigmoid;
pub mod spec;
pub mod traits;

pub use self::gaussian::*;
pub use self::gram::*;
pub use self::linear::*;
pub use self::polynomial::*;
pub use self::sigmoid::*;
pub use self::spec::*;
pub use self::traits::*;
