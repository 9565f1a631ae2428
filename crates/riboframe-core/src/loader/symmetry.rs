//! Symmetry operators and their per-chain assignment.

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use super::diagnostics::Diagnostics;
use super::error::LoadError;
use super::parse_field;
use crate::core::tables::Dataset;

pub const OPER_LIST_BLOCK: &str = "pdbx_struct_oper_list";
pub const ASSEMBLY_GEN_BLOCK: &str = "pdbx_struct_assembly_gen";

/// The id of the synthesized identity operator.
pub const IDENTITY_ID: &str = "I";

/// Expressions containing these cannot be expanded by splitting on commas.
const COMPLEX_SYMBOLS: [char; 3] = ['(', ')', '-'];

/// One symmetry operator, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub id: String,
    pub name: Option<String>,
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    pub transform: Matrix4<f64>,
}

impl Operator {
    pub fn new(
        id: &str,
        name: Option<&str>,
        rotation: Matrix3<f64>,
        translation: Vector3<f64>,
    ) -> Self {
        let mut transform = Matrix4::identity();
        transform.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        transform.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self {
            id: id.to_string(),
            name: name.map(|n| n.to_string()),
            rotation,
            translation,
            transform,
        }
    }

    /// The synthesized identity operator.
    ///
    /// Its translation is `[1, 1, 1]`, not zero. Every structure loaded so
    /// far carries this exact transform, so changing it would silently move
    /// all identity-placed atoms; keep it until coordinates are re-derived.
    pub fn identity() -> Self {
        Self::new(
            IDENTITY_ID,
            Some(IDENTITY_ID),
            Matrix3::identity(),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    /// The tag recorded on atoms placed by this operator: the operator name
    /// when present and meaningful, else `P_` plus the id.
    pub fn symmetry_tag(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() && name != "?" => name.to_string(),
            _ => format!("P_{}", self.id),
        }
    }

    /// Applies the homogeneous transform to a point.
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.transform.transform_point(point)
    }
}

/// Operators plus their assignment to asym ids, built from the operator and
/// assembly-generation blocks.
#[derive(Debug, Clone, Default)]
pub struct SymmetryCatalog {
    operators: HashMap<String, Arc<Operator>>,
    assemblies: HashMap<String, Vec<Arc<Operator>>>,
    asym_order: Vec<String>,
}

impl SymmetryCatalog {
    /// Builds the catalog.
    ///
    /// The identity operator always exists and shadows any operator row with
    /// the same id. Assembly expressions with combination symbols cannot be
    /// expanded; their asym ids fall back to the identity default, with a
    /// warning. An expression naming an operator id absent from the operator
    /// block is fatal.
    ///
    /// # Errors
    ///
    /// Returns an error on unparsable matrix or vector fields and on unknown
    /// operator references.
    pub fn from_dataset(
        dataset: &Dataset,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, LoadError> {
        let mut operators = HashMap::new();

        if dataset.has_block(OPER_LIST_BLOCK) {
            let table = dataset.block(OPER_LIST_BLOCK)?;
            for row in table.rows() {
                let id = row.get("id")?;
                let name = row.get_opt("name");

                let mut rotation = Matrix3::zeros();
                for r in 0..3 {
                    for c in 0..3 {
                        let column = format!("matrix[{}][{}]", r + 1, c + 1);
                        rotation[(r, c)] = parse_field(OPER_LIST_BLOCK, &column, &row)?;
                    }
                }
                let mut translation = Vector3::zeros();
                for r in 0..3 {
                    let column = format!("vector[{}]", r + 1);
                    translation[r] = parse_field(OPER_LIST_BLOCK, &column, &row)?;
                }

                operators.insert(
                    id.to_string(),
                    Arc::new(Operator::new(id, name, rotation, translation)),
                );
            }
        }

        let identity = Arc::new(Operator::identity());
        operators.insert(IDENTITY_ID.to_string(), identity.clone());

        let mut assemblies: HashMap<String, Vec<Arc<Operator>>> = HashMap::new();
        let mut asym_order = Vec::new();

        if dataset.has_block(ASSEMBLY_GEN_BLOCK) {
            let table = dataset.block(ASSEMBLY_GEN_BLOCK)?;
            for row in table.rows() {
                let expression = row.get("oper_expression")?;
                let operator_ids: Vec<&str> = if expression.contains(COMPLEX_SYMBOLS) {
                    diagnostics.warn(
                        "symmetry",
                        format!(
                            "cannot expand operator expression '{expression}'; \
                             affected asym ids fall back to the identity operator"
                        ),
                    );
                    Vec::new()
                } else {
                    expression.split(',').collect()
                };

                for asym_id in row.get("asym_id_list")?.split(',') {
                    if !assemblies.contains_key(asym_id) {
                        assemblies.insert(asym_id.to_string(), Vec::new());
                        asym_order.push(asym_id.to_string());
                    }
                    let assigned = assemblies.get_mut(asym_id).unwrap();
                    for operator_id in &operator_ids {
                        let operator = operators.get(*operator_id).ok_or_else(|| {
                            LoadError::UnknownOperator {
                                operator_id: operator_id.to_string(),
                            }
                        })?;
                        if !assigned.iter().any(|o| o.id == operator.id) {
                            assigned.push(operator.clone());
                        }
                    }
                }
            }
        }

        for asym_id in &asym_order {
            let assigned = assemblies.get_mut(asym_id).unwrap();
            if assigned.is_empty() {
                diagnostics.info(
                    "symmetry",
                    format!("adding default identity operator for asym id '{asym_id}'"),
                );
                assigned.push(identity.clone());
            }
        }

        Ok(Self {
            operators,
            assemblies,
            asym_order,
        })
    }

    pub fn operator(&self, id: &str) -> Option<&Arc<Operator>> {
        self.operators.get(id)
    }

    /// The operators assigned to one asym id.
    ///
    /// An asym id absent from every assembly gets the deduplicated union of
    /// all assigned operators, in first-occurrence order, with a warning.
    pub fn operators(
        &self,
        asym_id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Arc<Operator>> {
        if let Some(assigned) = self.assemblies.get(asym_id) {
            return assigned.clone();
        }

        diagnostics.warn(
            "symmetry",
            format!("asym id '{asym_id}' is not part of any assembly; defaulting to all operators"),
        );
        let mut seen = Vec::new();
        let mut union: Vec<Arc<Operator>> = Vec::new();
        for known in &self.asym_order {
            for operator in &self.assemblies[known] {
                if !seen.contains(&operator.id) {
                    seen.push(operator.id.clone());
                    union.push(operator.clone());
                }
            }
        }
        union
    }

    /// The largest operator-list length across all asym ids.
    pub fn max_operator_count(&self) -> usize {
        self.assemblies.values().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tables::Table;

    fn oper_columns() -> Vec<String> {
        let mut columns = vec!["id".to_string(), "name".to_string()];
        for r in 1..=3 {
            for c in 1..=3 {
                columns.push(format!("matrix[{r}][{c}]"));
            }
            columns.push(format!("vector[{r}]"));
        }
        columns
    }

    fn oper_row(id: &str, name: &str, rotation: [[f64; 3]; 3], vector: [f64; 3]) -> Vec<String> {
        let mut row = vec![id.to_string(), name.to_string()];
        for r in 0..3 {
            for c in 0..3 {
                row.push(rotation[r][c].to_string());
            }
            row.push(vector[r].to_string());
        }
        row
    }

    fn dataset_with(rows: &[Vec<String>], assemblies: &[(&str, &str)]) -> Dataset {
        let columns = oper_columns();
        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let mut opers = Table::new(OPER_LIST_BLOCK, &column_refs);
        for row in rows {
            let values: Vec<&str> = row.iter().map(String::as_str).collect();
            opers.push_row(&values);
        }

        let mut r#gen = Table::new(ASSEMBLY_GEN_BLOCK, &["asym_id_list", "oper_expression"]);
        for (asyms, expression) in assemblies {
            r#gen.push_row(&[asyms, expression]);
        }

        let mut dataset = Dataset::new("1ABC");
        dataset.insert(opers).insert(r#gen);
        dataset
    }

    const ROT_Z_180: [[f64; 3]; 3] = [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]];
    const IDENT: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    #[test]
    fn identity_operator_keeps_its_historical_translation() {
        let identity = Operator::identity();
        assert_eq!(identity.translation, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(identity.symmetry_tag(), "I");
        let moved = identity.apply(&Point3::new(0.5, 0.5, 0.5));
        assert_eq!(moved, Point3::new(1.5, 1.5, 1.5));
    }

    #[test]
    fn symmetry_tag_falls_back_to_prefixed_id() {
        let rotation = Matrix3::identity();
        let translation = Vector3::zeros();
        let unnamed = Operator::new("2", None, rotation, translation);
        assert_eq!(unnamed.symmetry_tag(), "P_2");
        let placeholder = Operator::new("3", Some("?"), rotation, translation);
        assert_eq!(placeholder.symmetry_tag(), "P_3");
        let named = Operator::new("4", Some("2_655"), rotation, translation);
        assert_eq!(named.symmetry_tag(), "2_655");
    }

    #[test]
    fn parses_operators_and_assigns_them_per_asym_id() {
        let dataset = dataset_with(
            &[
                oper_row("1", "1_555", IDENT, [0.0, 0.0, 0.0]),
                oper_row("2", "2_655", ROT_Z_180, [10.0, 0.0, 0.0]),
            ],
            &[("A,B", "1,2"), ("C", "1")],
        );
        let mut diagnostics = Diagnostics::new();
        let catalog = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap();

        let a = catalog.operators("A", &mut diagnostics);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].id, "1");
        assert_eq!(a[1].id, "2");
        assert_eq!(a[1].translation, Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(catalog.operators("C", &mut diagnostics).len(), 1);
        assert_eq!(catalog.max_operator_count(), 2);
        assert!(diagnostics.is_empty());

        let moved = a[1].apply(&Point3::new(1.0, 2.0, 3.0));
        assert_eq!(moved, Point3::new(9.0, -2.0, 3.0));
    }

    #[test]
    fn identity_shadows_an_operator_row_with_the_same_id() {
        let dataset = dataset_with(
            &[oper_row("I", "not-identity", ROT_Z_180, [5.0, 5.0, 5.0])],
            &[("A", "I")],
        );
        let mut diagnostics = Diagnostics::new();
        let catalog = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap();
        let assigned = catalog.operators("A", &mut diagnostics);
        assert_eq!(assigned[0].rotation, Matrix3::identity());
        assert_eq!(assigned[0].translation, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn duplicate_operator_ids_in_an_expression_are_attached_once() {
        let dataset = dataset_with(
            &[oper_row("1", "1_555", IDENT, [0.0, 0.0, 0.0])],
            &[("A", "1,1,1")],
        );
        let mut diagnostics = Diagnostics::new();
        let catalog = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap();
        assert_eq!(catalog.operators("A", &mut diagnostics).len(), 1);
    }

    #[test]
    fn complex_expressions_degrade_to_the_identity_default() {
        let dataset = dataset_with(
            &[oper_row("1", "1_555", IDENT, [0.0, 0.0, 0.0])],
            &[("A", "(1-4)")],
        );
        let mut diagnostics = Diagnostics::new();
        let catalog = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap();

        assert_eq!(diagnostics.warnings().count(), 1);
        let assigned = catalog.operators("A", &mut diagnostics);
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, IDENTITY_ID);
    }

    #[test]
    fn unknown_asym_id_gets_the_union_of_all_operators() {
        let dataset = dataset_with(
            &[
                oper_row("1", "1_555", IDENT, [0.0, 0.0, 0.0]),
                oper_row("2", "2_655", ROT_Z_180, [10.0, 0.0, 0.0]),
            ],
            &[("A", "1"), ("B", "2,1")],
        );
        let mut diagnostics = Diagnostics::new();
        let catalog = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap();

        let fallback = catalog.operators("Z", &mut diagnostics);
        let ids: Vec<&str> = fallback.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"], "first occurrence across assemblies");
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn unknown_operator_reference_is_fatal() {
        let dataset = dataset_with(
            &[oper_row("1", "1_555", IDENT, [0.0, 0.0, 0.0])],
            &[("A", "1,9")],
        );
        let mut diagnostics = Diagnostics::new();
        let error = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap_err();
        assert!(matches!(
            error,
            LoadError::UnknownOperator { operator_id } if operator_id == "9"
        ));
    }

    #[test]
    fn unparsable_matrix_entry_is_an_invalid_field() {
        let mut bad = oper_row("1", "1_555", IDENT, [0.0, 0.0, 0.0]);
        bad[2] = "abc".to_string();
        let dataset = dataset_with(&[bad], &[("A", "1")]);
        let mut diagnostics = Diagnostics::new();
        let error = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap_err();
        assert!(matches!(error, LoadError::InvalidField { .. }));
    }

    #[test]
    fn dataset_without_symmetry_blocks_yields_an_identity_only_catalog() {
        let dataset = Dataset::new("1ABC");
        let mut diagnostics = Diagnostics::new();
        let catalog = SymmetryCatalog::from_dataset(&dataset, &mut diagnostics).unwrap();
        assert!(catalog.operator(IDENTITY_ID).is_some());
        assert_eq!(catalog.max_operator_count(), 0);
    }
}
