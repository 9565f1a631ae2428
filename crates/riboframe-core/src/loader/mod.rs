//! The structure loading pipeline.
//!
//! [`StructureLoader`] drives the full sequence: build the symmetry catalog,
//! expand atom rows through their operators, group atoms into residues,
//! normalize each residue against the template registry, and assemble the
//! model/chain hierarchy. Sequence-level queries (experimental sequence,
//! sequence mapping) run against the same dataset afterwards.

pub mod assembler;
pub mod diagnostics;
pub mod error;
pub mod frames;
pub mod grouping;
pub mod sequence;
pub mod symmetry;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::LoadError;
pub use sequence::SequenceMappingRecord;
pub use symmetry::{Operator, SymmetryCatalog};

use crate::core::models::{Residue, Structure};
use crate::core::tables::{Dataset, Row};
use crate::core::templates::TemplateRegistry;

use assembler::{ChemCatalog, EntityCatalog};

/// Placeholder values read as absent.
pub(crate) fn normalized(value: &str) -> Option<String> {
    match value {
        "" | "." | "?" => None,
        v => Some(v.to_string()),
    }
}

/// Reads and parses one required field, reporting the offending value on
/// failure.
pub(crate) fn parse_field<T: std::str::FromStr>(
    block: &str,
    column: &str,
    row: &Row<'_>,
) -> Result<T, LoadError> {
    let value = row.get(column)?;
    value.parse().map_err(|_| LoadError::InvalidField {
        block: block.to_string(),
        column: column.to_string(),
        row: row.index(),
        value: value.to_string(),
    })
}

/// Loads structures from an in-memory dataset.
pub struct StructureLoader<'a> {
    dataset: &'a Dataset,
    templates: &'a TemplateRegistry,
    diagnostics: Diagnostics,
}

impl<'a> StructureLoader<'a> {
    pub fn new(dataset: &'a Dataset, templates: &'a TemplateRegistry) -> Self {
        Self {
            dataset,
            templates,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Loads the structure described by the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error on missing required blocks or columns, unparsable
    /// required fields, and unresolvable symmetry assignments. Recoverable
    /// findings are collected in [`Self::diagnostics`] instead.
    pub fn load(&mut self) -> Result<Structure, LoadError> {
        let residues = self.residues()?;
        Ok(Structure::from_residues(self.dataset.name(), residues))
    }

    fn residues(&mut self) -> Result<Vec<Residue>, LoadError> {
        let catalog = SymmetryCatalog::from_dataset(self.dataset, &mut self.diagnostics)?;
        let entities = EntityCatalog::from_dataset(self.dataset)?;
        let chem = ChemCatalog::from_dataset(self.dataset)?;

        let atoms = assembler::expand_atoms(self.dataset, &catalog, &entities, &mut self.diagnostics)?;
        let mut residues = grouping::group_residues(atoms, &chem);
        for residue in &mut residues {
            frames::normalize_residue(residue, self.templates, &mut self.diagnostics);
        }
        Ok(residues)
    }

    /// The experimental sequence of one chain.
    pub fn experimental_sequence(&self, chain: &str) -> Result<Vec<String>, LoadError> {
        sequence::experimental_sequence(self.dataset, chain)
    }

    /// The mapping between the experimental sequence and a loaded
    /// structure's residues, restricted to `chains`.
    pub fn sequence_mapping(
        &mut self,
        structure: &Structure,
        chains: &[&str],
    ) -> Result<Vec<SequenceMappingRecord>, LoadError> {
        sequence::experimental_sequence_mapping(
            self.dataset,
            structure.residues(),
            chains,
            &mut self.diagnostics,
        )
    }

    /// Findings collected so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
