//! Built-in atom-group definitions for derived residue centers.
//!
//! These name the atoms whose mean position defines each named center of a
//! residue. Nucleotide groups are keyed by component id; amino acids share
//! one backbone list and get a per-residue functional-group list.

use phf::{Map, phf_map};

/// Ribose (and deoxyribose) ring atoms per nucleotide component.
#[rustfmt::skip]
pub static NT_SUGAR: Map<&'static str, &'static [&'static str]> = phf_map! {
    "A" => &["C1'", "C2'", "O2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
    "C" => &["C1'", "C2'", "O2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
    "G" => &["C1'", "C2'", "O2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
    "U" => &["C1'", "C2'", "O2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
    "DA" => &["C1'", "C2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
    "DC" => &["C1'", "C2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
    "DG" => &["C1'", "C2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
    "DT" => &["C1'", "C2'", "C3'", "O3'", "C4'", "O4'", "C5'"],
};

/// Phosphate group atoms per nucleotide component.
#[rustfmt::skip]
pub static NT_PHOSPHATE: Map<&'static str, &'static [&'static str]> = phf_map! {
    "A" => &["P", "OP1", "OP2", "O5'"],
    "C" => &["P", "OP1", "OP2", "O5'"],
    "G" => &["P", "OP1", "OP2", "O5'"],
    "U" => &["P", "OP1", "OP2", "O5'"],
    "DA" => &["P", "OP1", "OP2", "O5'"],
    "DC" => &["P", "OP1", "OP2", "O5'"],
    "DG" => &["P", "OP1", "OP2", "O5'"],
    "DT" => &["P", "OP1", "OP2", "O5'"],
};

/// Functional-group (side chain tip) atoms per standard amino acid.
#[rustfmt::skip]
pub static AA_FG: Map<&'static str, &'static [&'static str]> = phf_map! {
    "ALA" => &["CB"],
    "ARG" => &["NE", "CZ", "NH1", "NH2"],
    "ASN" => &["CG", "OD1", "ND2"],
    "ASP" => &["CG", "OD1", "OD2"],
    "CYS" => &["CB", "SG"],
    "GLN" => &["CD", "OE1", "NE2"],
    "GLU" => &["CD", "OE1", "OE2"],
    "GLY" => &["CA"],
    "HIS" => &["CG", "ND1", "CD2", "CE1", "NE2"],
    "ILE" => &["CB", "CG1", "CG2", "CD1"],
    "LEU" => &["CB", "CG", "CD1", "CD2"],
    "LYS" => &["CE", "NZ"],
    "MET" => &["CG", "SD", "CE"],
    "PHE" => &["CG", "CD1", "CD2", "CE1", "CE2", "CZ"],
    "PRO" => &["CB", "CG", "CD"],
    "SER" => &["CB", "OG"],
    "THR" => &["CB", "OG1", "CG2"],
    "TRP" => &["CG", "CD1", "CD2", "NE1", "CE2", "CE3", "CZ2", "CZ3", "CH2"],
    "TYR" => &["CG", "CD1", "CD2", "CE1", "CE2", "CZ", "OH"],
    "VAL" => &["CB", "CG1", "CG2"],
};

/// Backbone atoms shared by all standard amino acids.
pub static AA_BACKBONE: &[&str] = &["N", "CA", "C", "O"];

/// Sugar atoms applied to modified nucleotides regardless of parent.
pub fn modified_nt_sugar() -> &'static [&'static str] {
    NT_SUGAR.get("A").copied().unwrap_or_default()
}

/// Phosphate atoms applied to modified nucleotides regardless of parent.
pub fn modified_nt_phosphate() -> &'static [&'static str] {
    NT_PHOSPHATE.get("A").copied().unwrap_or_default()
}
