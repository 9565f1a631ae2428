//! Canonical unit-id encoding.
//!
//! A unit id joins, in fixed order, pdb id, model, chain, component id,
//! number, alt id, insertion code and symmetry tag with `|`. Trailing
//! optional fields are omitted entirely when absent, but an absent field
//! followed by a present one still appears as an empty segment. The exact
//! separator and omission rules are a compatibility-sensitive contract.

/// The conventional symmetry tag that counts as "no symmetry" and is
/// omitted from unit ids.
pub const DEFAULT_SYMMETRY: &str = "1_555";

const SEPARATOR: &str = "|";

/// The identity fields of one residue instance, borrowed for encoding.
#[derive(Debug, Clone, Copy)]
pub struct UnitIdParts<'a> {
    pub pdb: &'a str,
    pub model: i32,
    pub chain: &'a str,
    pub component_id: &'a str,
    pub number: i64,
    pub alt_id: Option<&'a str>,
    pub insertion_code: Option<&'a str>,
    pub symmetry: &'a str,
}

/// Encodes the canonical unit id for the given identity fields.
pub fn encode(parts: &UnitIdParts<'_>) -> String {
    let symmetry = if parts.symmetry == DEFAULT_SYMMETRY {
        None
    } else {
        Some(parts.symmetry)
    };

    let optional = [parts.alt_id, parts.insertion_code, symmetry];
    let last_present = optional.iter().rposition(Option::is_some);

    let mut segments = vec![
        parts.pdb.to_string(),
        parts.model.to_string(),
        parts.chain.to_string(),
        parts.component_id.to_string(),
        parts.number.to_string(),
    ];
    if let Some(last) = last_present {
        for field in &optional[..=last] {
            segments.push(field.unwrap_or("").to_string());
        }
    }

    segments.join(SEPARATOR)
}
