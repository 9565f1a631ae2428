use crate::core::tables::SchemaError;
use thiserror::Error;

/// A condition that makes the loaded structure unusable.
///
/// Anything recoverable goes through [`super::Diagnostics`] instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid value '{value}' in {block}.{column} (row {row})")]
    InvalidField {
        block: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("assembly references unknown symmetry operator '{operator_id}'")]
    UnknownOperator { operator_id: String },

    #[error("no symmetry operators resolved for asym id '{asym_id}'")]
    NoOperators { asym_id: String },

    #[error("no symmetry operators in the catalog")]
    EmptyCatalog,

    #[error("duplicate sequence id '{0}'")]
    DuplicateSequenceId(String),

    #[error("duplicate unit id '{0}' in sequence mapping")]
    DuplicateUnitId(String),
}
