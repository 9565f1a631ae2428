pub mod defs;
pub mod registry;

pub use registry::{ModifiedTemplate, ResidueTemplate, TemplateLoadError, TemplateRegistry};
