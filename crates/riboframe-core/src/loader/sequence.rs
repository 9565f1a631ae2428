//! Mapping between the experimental sequence and observed residues.

use std::collections::{HashMap, HashSet};

use super::diagnostics::Diagnostics;
use super::error::LoadError;
use super::normalized;
use crate::core::models::Residue;
use crate::core::tables::Dataset;

pub const POLY_SEQ_BLOCK: &str = "pdbx_poly_seq_scheme";

/// One experimental-sequence position, linked to an observed residue when
/// one exists.
///
/// A position missing from the structure has `unit_id: None`. A position
/// observed in several alternate conformations or symmetry copies produces
/// one record per unit id, all sharing the same `seq_id` and `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMappingRecord {
    pub unit_id: Option<String>,
    pub seq_id: String,
    pub seq_unit: String,
    pub index: usize,
    pub number: i64,
    pub chain: String,
}

/// The experimental sequence of one chain, as component ids in scheme order.
pub fn experimental_sequence(dataset: &Dataset, chain: &str) -> Result<Vec<String>, LoadError> {
    let table = dataset.block(POLY_SEQ_BLOCK)?;
    let mut sequence = Vec::new();
    for row in table.rows() {
        if row.get("pdb_strand_id")? == chain {
            sequence.push(row.get("mon_id")?.to_string());
        }
    }
    Ok(sequence)
}

type ResidueKey = (String, i64, Option<String>);

/// Builds the sequence mapping for the given chains.
///
/// Rows repeating the previous (chain, number, insertion code) key are
/// collapsed onto the first row, as some entries list one position twice
/// with different components. The per-chain position index restarts at zero
/// when the scheme moves to the next chain. Rows whose sequence number does
/// not parse are skipped with a warning.
///
/// # Errors
///
/// Emitting the same sequence id or unit id twice is fatal; it means the
/// mapping would be ambiguous.
pub fn experimental_sequence_mapping<'a>(
    dataset: &Dataset,
    residues: impl IntoIterator<Item = &'a Residue>,
    chains: &[&str],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<SequenceMappingRecord>, LoadError> {
    let mut mapping: HashMap<ResidueKey, Vec<String>> = HashMap::new();
    for residue in residues {
        if chains.contains(&residue.chain.as_str()) {
            let key = (
                residue.chain.clone(),
                residue.number,
                residue.insertion_code.clone(),
            );
            mapping.entry(key).or_default().push(residue.unit_id());
        }
    }

    let table = dataset.block(POLY_SEQ_BLOCK)?;
    let pdb = dataset.name();

    let mut prev: Option<ResidueKey> = None;
    let mut index = 0usize;
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for row in table.rows() {
        let chain = row.get("pdb_strand_id")?;
        if !chains.contains(&chain) {
            continue;
        }
        let insertion_code = normalized(row.get("pdb_ins_code")?);

        let raw_number = row.get("pdb_seq_num")?;
        let number: i64 = match raw_number.parse() {
            Ok(number) => number,
            Err(_) => {
                diagnostics.warn(
                    "sequence",
                    format!(
                        "bad sequence number '{raw_number}' in {POLY_SEQ_BLOCK} row {}",
                        row.index()
                    ),
                );
                continue;
            }
        };

        let key = (chain.to_string(), number, insertion_code.clone());
        if prev.as_ref() == Some(&key) {
            continue;
        }
        if let Some((previous_chain, _, _)) = &prev {
            if previous_chain != chain {
                index = 0;
            }
        }
        prev = Some(key.clone());

        let unit_ids: Vec<Option<String>> = match mapping.get(&key) {
            Some(ids) => ids.iter().map(|id| Some(id.clone())).collect(),
            None => vec![None],
        };

        let mon_id = row.get("mon_id")?;
        let mut seq_id = format!("{pdb}|Sequence|{chain}|{mon_id}|{number}");
        if let Some(code) = &insertion_code {
            seq_id.push_str("|||");
            seq_id.push_str(code);
        }

        if !seen.insert(seq_id.clone()) {
            return Err(LoadError::DuplicateSequenceId(seq_id));
        }

        for unit_id in unit_ids {
            if let Some(id) = &unit_id {
                if !seen.insert(id.clone()) {
                    return Err(LoadError::DuplicateUnitId(id.clone()));
                }
            }
            records.push(SequenceMappingRecord {
                unit_id,
                seq_id: seq_id.clone(),
                seq_unit: mon_id.to_string(),
                index,
                number,
                chain: chain.to_string(),
            });
        }
        index += 1;
    }

    Ok(records)
}
