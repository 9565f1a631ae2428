//! Grouping of expanded atoms into residues, with alternate-location
//! resolution.

use super::assembler::ChemCatalog;
use crate::core::models::{Atom, Residue};

type GroupKey<'a> = (
    &'a str,
    i32,
    &'a str,
    &'a str,
    i64,
    Option<&'a str>,
    &'a str,
);

fn group_key(atom: &Atom) -> GroupKey<'_> {
    (
        &atom.pdb,
        atom.model,
        &atom.chain,
        &atom.component_id,
        atom.component_number,
        atom.insertion_code.as_deref(),
        &atom.symmetry,
    )
}

/// Sorts atoms by residue identity and builds one residue per identity run,
/// splitting alternate conformations into separate residues.
///
/// The sort is stable, so atoms inside one residue keep their expansion
/// order. The chemical type is resolved through the component catalog; an
/// unknown component simply has no type.
pub fn group_residues(mut atoms: Vec<Atom>, chem: &ChemCatalog) -> Vec<Residue> {
    atoms.sort_by(|a, b| group_key(a).cmp(&group_key(b)));

    let mut residues = Vec::new();
    let mut run: Vec<Atom> = Vec::new();
    for atom in atoms {
        let boundary = run
            .first()
            .is_some_and(|first| group_key(first) != group_key(&atom));
        if boundary {
            let finished = std::mem::take(&mut run);
            push_residues(finished, chem, &mut residues);
        }
        run.push(atom);
    }
    if !run.is_empty() {
        push_residues(run, chem, &mut residues);
    }
    residues
}

fn push_residues(atoms: Vec<Atom>, chem: &ChemCatalog, residues: &mut Vec<Residue>) {
    for bucket in split_alternates(atoms) {
        let chem_type = bucket
            .first()
            .and_then(|a| chem.type_of(&a.component_id))
            .map(|t| t.to_string());
        if let Some(residue) = Residue::from_atoms(bucket, chem_type) {
            residues.push(residue);
        }
    }
}

/// Splits one residue's atoms into per-conformation buckets.
///
/// Atoms without an alt id are common to all conformations: when specific
/// alt ids exist, each common atom is copied into every specific bucket,
/// after that bucket's own atoms. Buckets come back ordered by alt id.
fn split_alternates(atoms: Vec<Atom>) -> Vec<Vec<Atom>> {
    let mut buckets: Vec<(Option<String>, Vec<Atom>)> = Vec::new();
    for atom in atoms {
        match buckets.iter_mut().find(|(alt, _)| *alt == atom.alt_id) {
            Some((_, bucket)) => bucket.push(atom),
            None => buckets.push((atom.alt_id.clone(), vec![atom])),
        }
    }

    if buckets.len() == 1 {
        return buckets.into_iter().map(|(_, bucket)| bucket).collect();
    }

    let common = buckets
        .iter()
        .position(|(alt, _)| alt.is_none())
        .map(|index| buckets.remove(index).1)
        .unwrap_or_default();
    for (alt, bucket) in &mut buckets {
        let alt = alt.as_deref().unwrap_or_default();
        for atom in &common {
            bucket.push(atom.with_alt_id(alt));
        }
    }

    buckets.sort_by(|a, b| a.0.cmp(&b.0));
    buckets.into_iter().map(|(_, bucket)| bucket).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tables::{Dataset, Table};
    use crate::loader::assembler::CHEM_COMP_BLOCK;
    use nalgebra::Point3;

    fn atom(name: &str, comp: &str, number: i64, alt_id: Option<&str>) -> Atom {
        Atom {
            pdb: "1ABC".to_string(),
            model: 1,
            chain: "A".to_string(),
            component_id: comp.to_string(),
            component_number: number,
            component_index: Some(number),
            insertion_code: None,
            alt_id: alt_id.map(str::to_string),
            group: "ATOM".to_string(),
            element: "C".to_string(),
            name: name.to_string(),
            position: Point3::origin(),
            symmetry: "1_555".to_string(),
            polymeric: true,
        }
    }

    fn chem() -> ChemCatalog {
        let mut dataset = Dataset::new("1ABC");
        let mut table = Table::new(CHEM_COMP_BLOCK, &["id", "type"]);
        table.push_row(&["A", "RNA linking"]).push_row(&["U", "RNA linking"]);
        dataset.insert(table);
        ChemCatalog::from_dataset(&dataset).unwrap()
    }

    #[test]
    fn atoms_group_into_residues_by_identity() {
        // Out of order on purpose.
        let atoms = vec![
            atom("C1'", "U", 2, None),
            atom("N9", "A", 1, None),
            atom("N1", "U", 2, None),
            atom("C1'", "A", 1, None),
        ];
        let residues = group_residues(atoms, &chem());

        assert_eq!(residues.len(), 2);
        assert_eq!(residues[0].sequence, "A");
        assert_eq!(residues[0].len(), 2);
        assert_eq!(residues[1].sequence, "U");
        assert_eq!(residues[1].chem_type.as_deref(), Some("RNA linking"));
    }

    #[test]
    fn unknown_component_has_no_chem_type() {
        let residues = group_residues(vec![atom("O", "HOH", 100, None)], &chem());
        assert!(residues[0].chem_type.is_none());
    }

    #[test]
    fn single_conformation_residue_stays_whole() {
        let atoms = vec![atom("C1'", "A", 1, None), atom("N9", "A", 1, None)];
        let residues = group_residues(atoms, &chem());
        assert_eq!(residues.len(), 1);
        assert!(residues[0].alt_id.is_none());
    }

    #[test]
    fn alternate_conformations_split_and_share_common_atoms() {
        let atoms = vec![
            atom("C1'", "A", 1, None),
            atom("N9", "A", 1, Some("B")),
            atom("N9", "A", 1, Some("A")),
        ];
        let residues = group_residues(atoms, &chem());

        assert_eq!(residues.len(), 2);
        assert_eq!(residues[0].alt_id.as_deref(), Some("A"));
        assert_eq!(residues[1].alt_id.as_deref(), Some("B"));
        for residue in &residues {
            let names: Vec<&str> = residue.atoms().iter().map(|a| a.name.as_str()).collect();
            // Specific atoms first, shared atoms appended after.
            assert_eq!(names, vec!["N9", "C1'"]);
            let alt = residue.alt_id.as_deref().unwrap();
            assert!(residue.atoms().iter().all(|a| a.alt_id.as_deref() == Some(alt)));
        }
    }

    #[test]
    fn symmetry_tag_separates_copies_of_the_same_residue() {
        let mut near = atom("C1'", "A", 1, None);
        let mut far = atom("C1'", "A", 1, None);
        far.symmetry = "2_655".to_string();
        near.position = Point3::new(1.0, 0.0, 0.0);
        far.position = Point3::new(9.0, 0.0, 0.0);

        let residues = group_residues(vec![far, near], &chem());
        assert_eq!(residues.len(), 2);
        assert_eq!(residues[0].symmetry, "1_555");
        assert_eq!(residues[1].symmetry, "2_655");
    }
}
