pub mod superposition;

pub use superposition::{Superposition, SuperpositionError, best_transformation};
