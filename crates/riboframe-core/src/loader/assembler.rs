//! Expansion of raw atom rows through assigned symmetry operators.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use nalgebra::Point3;

use super::diagnostics::Diagnostics;
use super::error::LoadError;
use super::symmetry::{Operator, SymmetryCatalog};
use super::{normalized, parse_field};
use crate::core::models::Atom;
use crate::core::tables::{Dataset, Row};

pub const ENTITY_BLOCK: &str = "entity";
pub const CHEM_COMP_BLOCK: &str = "chem_comp";
pub const ATOM_SITE_BLOCK: &str = "atom_site";

/// Entity ids mapped to their declared type.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    types: HashMap<String, String>,
}

impl EntityCatalog {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, LoadError> {
        let table = dataset.block(ENTITY_BLOCK)?;
        let mut types = HashMap::new();
        for row in table.rows() {
            types.insert(row.get("id")?.to_string(), row.get("type")?.to_string());
        }
        Ok(Self { types })
    }

    pub fn type_of(&self, entity_id: &str) -> Option<&str> {
        self.types.get(entity_id).map(String::as_str)
    }

    pub fn is_polymeric(&self, entity_id: &str) -> Option<bool> {
        self.type_of(entity_id).map(|t| t == "polymer")
    }

    pub fn is_water(&self, entity_id: &str) -> Option<bool> {
        self.type_of(entity_id).map(|t| t == "water")
    }
}

/// Chemical component ids mapped to their declared type (e.g. "RNA linking").
#[derive(Debug, Clone, Default)]
pub struct ChemCatalog {
    types: HashMap<String, String>,
}

impl ChemCatalog {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, LoadError> {
        let table = dataset.block(CHEM_COMP_BLOCK)?;
        let mut types = HashMap::new();
        for row in table.rows() {
            types.insert(row.get("id")?.to_string(), row.get("type")?.to_string());
        }
        Ok(Self { types })
    }

    pub fn type_of(&self, component_id: &str) -> Option<&str> {
        self.types.get(component_id).map(String::as_str)
    }
}

/// Expands every atom row through the operators assigned to its asym id.
///
/// The outer loop runs over operator indices `0..max`, so all first-placement
/// atoms precede all second placements. A chain with fewer assigned operators
/// than the maximum simply stops producing atoms at its own length.
///
/// # Errors
///
/// Returns an error when the catalog assigns no operators at all, when some
/// asym id resolves to an empty operator list, or when a required atom field
/// does not parse.
pub fn expand_atoms(
    dataset: &Dataset,
    catalog: &SymmetryCatalog,
    entities: &EntityCatalog,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Atom>, LoadError> {
    let table = dataset.block(ATOM_SITE_BLOCK)?;

    let max_operators = catalog.max_operator_count();
    if max_operators == 0 {
        return Err(LoadError::EmptyCatalog);
    }

    let mut assigned: HashMap<String, Vec<Arc<Operator>>> = HashMap::new();
    let mut unknown_entities = HashSet::new();
    let mut atoms = Vec::new();

    for index in 0..max_operators {
        for row in table.rows() {
            let asym_id = row.get("label_asym_id")?;
            if !assigned.contains_key(asym_id) {
                let operators = catalog.operators(asym_id, diagnostics);
                assigned.insert(asym_id.to_string(), operators);
            }
            let operators = &assigned[asym_id];
            if operators.is_empty() {
                return Err(LoadError::NoOperators {
                    asym_id: asym_id.to_string(),
                });
            }
            let Some(operator) = operators.get(index) else {
                continue;
            };
            atoms.push(build_atom(
                dataset.name(),
                &row,
                operator,
                entities,
                diagnostics,
                &mut unknown_entities,
            )?);
        }
    }

    Ok(atoms)
}

fn build_atom(
    pdb: &str,
    row: &Row<'_>,
    operator: &Operator,
    entities: &EntityCatalog,
    diagnostics: &mut Diagnostics,
    unknown_entities: &mut HashSet<String>,
) -> Result<Atom, LoadError> {
    let x: f64 = parse_field(ATOM_SITE_BLOCK, "Cartn_x", row)?;
    let y: f64 = parse_field(ATOM_SITE_BLOCK, "Cartn_y", row)?;
    let z: f64 = parse_field(ATOM_SITE_BLOCK, "Cartn_z", row)?;
    let position = operator.apply(&Point3::new(x, y, z));

    let component_index = match normalized(row.get("label_seq_id")?) {
        Some(value) => Some(value.parse().map_err(|_| LoadError::InvalidField {
            block: ATOM_SITE_BLOCK.to_string(),
            column: "label_seq_id".to_string(),
            row: row.index(),
            value,
        })?),
        None => None,
    };

    let entity_id = row.get("label_entity_id")?;
    let polymeric = match entities.is_polymeric(entity_id) {
        Some(polymeric) => polymeric,
        None => {
            if unknown_entities.insert(entity_id.to_string()) {
                diagnostics.warn(
                    "assembly",
                    format!("unknown entity id '{entity_id}'; treating its atoms as non-polymeric"),
                );
            }
            false
        }
    };

    Ok(Atom {
        pdb: pdb.to_string(),
        model: parse_field(ATOM_SITE_BLOCK, "pdbx_PDB_model_num", row)?,
        chain: row.get("auth_asym_id")?.to_string(),
        component_id: row.get("label_comp_id")?.to_string(),
        component_number: parse_field(ATOM_SITE_BLOCK, "auth_seq_id", row)?,
        component_index,
        insertion_code: normalized(row.get("pdbx_PDB_ins_code")?),
        alt_id: normalized(row.get("label_alt_id")?),
        group: row.get("group_PDB")?.to_string(),
        element: row.get("type_symbol")?.to_string(),
        name: row.get("label_atom_id")?.to_string(),
        position,
        symmetry: operator.symmetry_tag(),
        polymeric,
    })
}
