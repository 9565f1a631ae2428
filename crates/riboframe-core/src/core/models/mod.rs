pub mod atom;
pub mod residue;
pub mod structure;
pub mod unit_id;

pub use atom::Atom;
pub use residue::Residue;
pub use structure::{Chain, Model, Structure};
