use nalgebra::{Matrix4, Point3, Vector4};

/// Represents a single atom placed in world space.
///
/// Atoms carry the full identity taken from the source tables (entry id,
/// model, chain, component, alternate location, symmetry tag) together with
/// their post-symmetry cartesian coordinates. An `Atom` is immutable once
/// created; the only sanctioned modifications are the explicit
/// clone-producing operations below.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The PDB entry id this atom belongs to (e.g. "1GID").
    pub pdb: String,
    /// The model number.
    pub model: i32,
    /// The author chain identifier.
    pub chain: String,
    /// The component (residue) id, e.g. "A", "ALA".
    pub component_id: String,
    /// The author sequence number of the parent component.
    pub component_number: i64,
    /// The label sequence index, when assigned.
    pub component_index: Option<i64>,
    /// The insertion code, when present.
    pub insertion_code: Option<String>,
    /// The alternate-conformation id, when present.
    pub alt_id: Option<String>,
    /// The record group from the source file ("ATOM" or "HETATM").
    pub group: String,
    /// The element symbol (e.g. "C", "N", "P").
    pub element: String,
    /// The atom name (e.g. "C1'", "N9").
    pub name: String,
    /// World coordinates, after symmetry expansion, in Angstroms.
    pub position: Point3<f64>,
    /// The symmetry tag of the operator that placed this atom.
    pub symmetry: String,
    /// Whether the parent entity is classified as a polymer.
    pub polymeric: bool,
}

impl Atom {
    /// Creates an inferred hydrogen atom carrying only a name and
    /// coordinates.
    ///
    /// Inferred hydrogens do not come from the source tables, so they have
    /// no identity fields of their own; those default to empty values.
    pub fn hydrogen(name: &str, position: Point3<f64>) -> Self {
        Self {
            pdb: String::new(),
            model: 0,
            chain: String::new(),
            component_id: String::new(),
            component_number: 0,
            component_index: None,
            insertion_code: None,
            alt_id: None,
            group: String::new(),
            element: "H".to_string(),
            name: name.to_string(),
            position,
            symmetry: String::new(),
            polymeric: false,
        }
    }

    /// Returns a copy of this atom with its alternate-location id replaced.
    ///
    /// This is the one sanctioned way to duplicate a "common" atom into a
    /// specific alternate-conformation bucket.
    pub fn with_alt_id(&self, alt_id: &str) -> Self {
        let mut copied = self.clone();
        copied.alt_id = Some(alt_id.to_string());
        copied
    }

    /// Returns a copy of this atom with its coordinates passed through a
    /// 4x4 homogeneous transform.
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        let homogeneous = Vector4::new(self.position.x, self.position.y, self.position.z, 1.0);
        let moved = matrix * homogeneous;
        let mut copied = self.clone();
        copied.position = Point3::new(moved.x, moved.y, moved.z);
        copied
    }

    /// Euclidean distance to another atom in Angstroms.
    pub fn distance(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Point3};

    fn test_atom(name: &str, alt_id: Option<&str>) -> Atom {
        Atom {
            pdb: "1ABC".to_string(),
            model: 1,
            chain: "A".to_string(),
            component_id: "G".to_string(),
            component_number: 10,
            component_index: Some(10),
            insertion_code: None,
            alt_id: alt_id.map(str::to_string),
            group: "ATOM".to_string(),
            element: "C".to_string(),
            name: name.to_string(),
            position: Point3::new(1.0, 2.0, 3.0),
            symmetry: "1_555".to_string(),
            polymeric: true,
        }
    }

    #[test]
    fn hydrogen_carries_only_name_and_coordinates() {
        let atom = Atom::hydrogen("H1", Point3::new(0.5, 0.5, 0.5));
        assert_eq!(atom.name, "H1");
        assert_eq!(atom.element, "H");
        assert_eq!(atom.position, Point3::new(0.5, 0.5, 0.5));
        assert_eq!(atom.pdb, "");
        assert_eq!(atom.model, 0);
        assert!(atom.alt_id.is_none());
        assert!(!atom.polymeric);
    }

    #[test]
    fn with_alt_id_overrides_only_alt_id() {
        let atom = test_atom("C1'", None);
        let copied = atom.with_alt_id("B");
        assert_eq!(copied.alt_id.as_deref(), Some("B"));
        assert_eq!(copied.name, atom.name);
        assert_eq!(copied.position, atom.position);
        assert_eq!(atom.alt_id, None, "source atom is untouched");
    }

    #[test]
    fn transform_applies_homogeneous_matrix() {
        let atom = test_atom("P", None);
        let mut matrix = Matrix4::identity();
        matrix[(0, 3)] = 10.0;
        matrix[(1, 3)] = -1.0;
        let moved = atom.transform(&matrix);
        assert_eq!(moved.position, Point3::new(11.0, 1.0, 3.0));
        assert_eq!(moved.name, atom.name);
    }

    #[test]
    fn distance_between_atoms() {
        let mut a = test_atom("P", None);
        let mut b = test_atom("OP1", None);
        a.position = Point3::new(0.0, 0.0, 0.0);
        b.position = Point3::new(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }
}
